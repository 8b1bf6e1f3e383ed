use serde::{Deserialize, Serialize};

pub mod cli;
pub mod command;
pub mod init;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsoleConfig {
    pub trace_level: Option<String>,
    pub trace_json: Option<bool>,
}
