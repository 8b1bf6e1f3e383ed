use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// X.509 extension requested for a new certificate
///
/// The syntax of `value` depends on the extension type and is interpreted by
/// the backend only.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub oid: String,
    pub name: Option<String>,
    pub is_critical: bool,
    pub value: String,
}

/// Catalogue of commonly requested extensions
#[derive(Clone, Copy, Debug, Eq, PartialEq, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ExtensionKind {
    BasicConstraints,
    KeyUsage,
    ExtendedKeyUsage,
    SubjectAltName,
    AuthorityKeyIdentifier,
    SubjectKeyIdentifier,
    #[strum(serialize = "CRLDistributionPoints")]
    CrlDistributionPoints,
}

impl ExtensionKind {
    pub fn oid(&self) -> &'static str {
        match self {
            Self::BasicConstraints => "2.5.29.19",
            Self::KeyUsage => "2.5.29.15",
            Self::ExtendedKeyUsage => "2.5.29.37",
            Self::SubjectAltName => "2.5.29.17",
            Self::AuthorityKeyIdentifier => "2.5.29.35",
            Self::SubjectKeyIdentifier => "2.5.29.14",
            Self::CrlDistributionPoints => "2.5.29.31",
        }
    }

    /// Starting value offered to the user for this extension type
    pub fn value_template(&self) -> &'static str {
        match self {
            Self::BasicConstraints => "CA=false",
            Self::KeyUsage => "digitalSignature,keyEncipherment",
            Self::ExtendedKeyUsage => "serverAuth,clientAuth",
            Self::SubjectAltName => "DNS=example.com,IP=127.0.0.1,email=admin@example.com",
            Self::AuthorityKeyIdentifier | Self::SubjectKeyIdentifier => "auto",
            Self::CrlDistributionPoints => "http://localhost:8080/crl",
        }
    }

    pub fn from_oid(oid: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.oid() == oid)
    }

    pub fn to_extension(self, critical: bool, value: Option<String>) -> Extension {
        Extension {
            oid: self.oid().to_string(),
            name: Some(self.to_string()),
            is_critical: critical,
            value: value.unwrap_or_else(|| self.value_template().to_string()),
        }
    }
}
