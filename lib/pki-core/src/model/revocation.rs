use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use shared_types::SerialNumber;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

/// X.509 CRL reason codes. Code 7 is unassigned.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Serialize_repr,
    Deserialize_repr,
    Display,
    EnumIter,
    EnumString,
)]
#[repr(u8)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RevocationReason {
    #[default]
    Unspecified = 0,
    KeyCompromise = 1,
    CaCompromise = 2,
    AffiliationChanged = 3,
    Superseded = 4,
    CessationOfOperation = 5,
    CertificateHold = 6,
    RemoveFromCrl = 8,
    PrivilegeWithdrawn = 9,
    AaCompromise = 10,
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown revocation reason `{0}`")]
pub struct UnknownRevocationReason(pub String);

impl RevocationReason {
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::iter().find(|reason| reason.code() == code)
    }

    /// Accepts either the numeric code or the kebab-case name
    pub fn parse(value: &str) -> Result<Self, UnknownRevocationReason> {
        let value = value.trim();

        match value.parse::<u8>() {
            Ok(code) => Self::from_code(code),
            Err(_) => value.parse().ok(),
        }
        .ok_or_else(|| UnknownRevocationReason(value.to_string()))
    }

    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeCertificateRequest {
    pub serial_number: SerialNumber,
    pub reason: RevocationReason,
}
