use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::macros::{impl_display, impl_from, impl_into};

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct UserId(i64);

#[derive(Debug, Error)]
#[error("Invalid user id `{value}`: {source}")]
pub struct UserIdParseError {
    value: String,
    source: ParseIntError,
}

impl FromStr for UserId {
    type Err = UserIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|source| UserIdParseError {
                value: s.to_owned(),
                source,
            })
    }
}

impl_from!(UserId; i64);
impl_into!(UserId; i64);
impl_display!(UserId);
