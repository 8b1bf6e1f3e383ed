use serde::{Deserialize, Deserializer, Serialize};
use serde_with::skip_serializing_none;
use shared_types::SerialNumber;
use strum::{Display, EnumString};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use super::extension::Extension;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CertificateType {
    Root,
    Intermediate,
    #[default]
    #[serde(alias = "END")]
    #[strum(to_string = "end-entity", serialize = "end")]
    EndEntity,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub serial_number: SerialNumber,
    #[serde(rename = "type")]
    pub certificate_type: Option<CertificateType>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    #[serde(serialize_with = "time::serde::rfc3339::option::serialize")]
    pub issued: Option<OffsetDateTime>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    #[serde(serialize_with = "time::serde::rfc3339::option::serialize")]
    pub expires: Option<OffsetDateTime>,
    pub signature_algorithm: Option<String>,
    #[serde(rename = "subjectCN")]
    pub subject_cn: Option<String>,
    #[serde(rename = "subjectO")]
    pub subject_o: Option<String>,
    #[serde(rename = "subjectOU")]
    pub subject_ou: Option<String>,
    #[serde(rename = "issuerCN")]
    pub issuer_cn: Option<String>,
    #[serde(rename = "issuerO")]
    pub issuer_o: Option<String>,
    #[serde(rename = "issuerOU")]
    pub issuer_ou: Option<String>,
    pub pem: Option<String>,
}

impl Certificate {
    /// Label shown when picking an issuer: `{CN}-{O}`
    pub fn issuer_label(&self) -> String {
        format!(
            "{}-{}",
            self.subject_cn.as_deref().unwrap_or_default(),
            self.subject_o.as_deref().unwrap_or_default()
        )
    }
}

/// Distinguished-name fields of the certificate subject
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub common_name: String,
    pub organization: String,
    pub organizational_unit: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub email: Option<String>,
}

/// Day precision date accepted by the create endpoint
pub const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(request_date, Date, "[year]-[month]-[day]");

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCertificateRequest {
    pub issuer_serial_number: Option<SerialNumber>,
    pub subject: Option<Subject>,
    pub extensions: Vec<Extension>,
    #[serde(default, with = "request_date::option")]
    pub issued: Option<Date>,
    #[serde(with = "request_date")]
    pub expires: Date,
    #[serde(rename = "type")]
    pub certificate_type: CertificateType,
    pub csr_pem: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Timestamp {
    Millis(i64),
    Text(String),
}

/// The backend serializes dates either as epoch milliseconds or RFC 3339
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let Some(timestamp) = Option::<Timestamp>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match timestamp {
        Timestamp::Millis(millis) => {
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
                .map(Some)
                .map_err(D::Error::custom)
        }
        Timestamp::Text(text) => {
            OffsetDateTime::parse(&text, &time::format_description::well_known::Rfc3339)
                .map(Some)
                .map_err(D::Error::custom)
        }
    }
}
