use serde::{Deserialize, Deserializer, Serialize};
use shared_types::{SerialNumber, UserId};
use strum::{Display, EnumString};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    CaUser,
    Admin,
}

impl Role {
    /// Case-insensitive, `-` and `_` are interchangeable (`ca-user`, `CA_USER`)
    pub fn from_name(name: &str) -> Option<Self> {
        name.trim().to_uppercase().replace('-', "_").parse().ok()
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown role `{name}`")))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub keycloak_id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization: Option<String>,
    pub role: Option<Role>,
    #[serde(default)]
    pub certificate_serial_numbers: Vec<SerialNumber>,
}

impl User {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name, &self.email) {
            (Some(first), Some(last), _) => format!("{first} {last}"),
            (_, _, Some(email)) => email.clone(),
            _ => self.id.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignCertificateRequest {
    pub serial_number: SerialNumber,
    pub user_id: UserId,
}
