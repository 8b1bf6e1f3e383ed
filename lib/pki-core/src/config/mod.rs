use thiserror::Error;

pub mod core_config;


#[derive(Debug, Error)]
pub enum ConfigParsingError {
    #[error("Config parsing error: `{0}`")]
    GeneralParsingError(String),
    #[error("Unsupported config file `{0}`")]
    UnsupportedFile(String),
}
