use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pki_core::model::certificate::{CertificateType, DATE_FORMAT};
use pki_core::model::extension::{Extension, ExtensionKind};
use pki_core::model::revocation::RevocationReason;
use pki_core::router::Route;
use time::Date;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Vec<PathBuf>>,

    #[arg(long, env = "PKI_USERNAME", global = true)]
    pub username: Option<String>,

    #[arg(long, env = "PKI_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Bearer token obtained elsewhere, used instead of a password login
    #[arg(long, env = "PKI_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub access_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the signed in user
    Home,
    /// End the identity provider session
    Logout,
    #[command(subcommand)]
    Certificates(CertificatesCommand),
    /// Issue a new certificate
    CreateCertificate(CreateCertificateArgs),
    #[command(subcommand)]
    AdminCaAssign(AdminCaAssignCommand),
}

#[derive(Subcommand, Debug)]
pub enum CertificatesCommand {
    List,
    Revoke {
        serial_number: String,
        /// Reason code or name, e.g. `1` or `key-compromise`
        #[arg(long, value_parser = parse_reason, default_value = "unspecified")]
        reason: RevocationReason,
    },
    /// List the available revocation reasons
    Reasons,
    /// Download the CRL of an issuer
    Crl {
        #[arg(long)]
        issuer_dn: String,
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminCaAssignCommand {
    /// Unassigned certificates and CA users
    List,
    Assign { serial_number: String, user_id: String },
}

#[derive(Args, Debug)]
pub struct CreateCertificateArgs {
    /// Issuer label (`CN-O`) or serial number; admins may omit it for a self-signed root
    #[arg(long)]
    pub issuer: Option<String>,

    #[arg(long)]
    pub common_name: Option<String>,
    #[arg(long)]
    pub organization: Option<String>,
    #[arg(long)]
    pub organizational_unit: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub locality: Option<String>,
    #[arg(long)]
    pub email: Option<String>,

    /// `KIND[=VALUE]` or `OID=VALUE`, repeatable
    #[arg(long = "extension", value_name = "KIND[=VALUE]", value_parser = parse_extension)]
    pub extensions: Vec<ExtensionArg>,

    /// Marks the extension with this name or OID critical, repeatable
    #[arg(long, value_name = "KIND")]
    pub critical: Vec<String>,

    /// `yyyy-MM-dd`, defaults to today
    #[arg(long, value_parser = parse_date)]
    pub issued: Option<Date>,
    /// `yyyy-MM-dd`
    #[arg(long, value_parser = parse_date)]
    pub expires: Option<Date>,

    #[arg(long = "type", default_value = "end-entity")]
    pub certificate_type: CertificateType,

    /// PEM encoded certificate signing request
    #[arg(long, value_name = "FILE")]
    pub csr: Option<PathBuf>,

    /// Where to write the PEM of the issued certificate
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// Extension given on the command line
#[derive(Clone, Debug, PartialEq)]
pub struct ExtensionArg {
    pub kind: Option<ExtensionKind>,
    pub oid: String,
    pub value: Option<String>,
}

impl ExtensionArg {
    pub fn matches(&self, name_or_oid: &str) -> bool {
        self.oid == name_or_oid
            || self
                .kind
                .is_some_and(|kind| kind.to_string().eq_ignore_ascii_case(name_or_oid))
    }

    pub fn to_extension(&self, critical: bool) -> Extension {
        match self.kind {
            Some(kind) => kind.to_extension(critical, self.value.clone()),
            None => Extension {
                oid: self.oid.clone(),
                name: None,
                is_critical: critical,
                value: self.value.clone().unwrap_or_default(),
            },
        }
    }
}

impl Command {
    pub fn route(&self) -> Route {
        match self {
            Self::Home | Self::Logout => Route::Home,
            Self::Certificates(_) => Route::Certificates,
            Self::CreateCertificate(_) => Route::CreateCertificate,
            Self::AdminCaAssign(_) => Route::AdminCaAssign,
        }
    }
}

pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, DATE_FORMAT)
}

pub fn parse_reason(value: &str) -> Result<RevocationReason, String> {
    RevocationReason::parse(value).map_err(|e| e.to_string())
}

pub fn parse_extension(value: &str) -> Result<ExtensionArg, String> {
    let (name, extension_value) = match value.split_once('=') {
        Some((name, extension_value)) => (name.trim(), Some(extension_value.to_string())),
        None => (value.trim(), None),
    };

    if let Ok(kind) = name.parse::<ExtensionKind>() {
        return Ok(ExtensionArg {
            kind: Some(kind),
            oid: kind.oid().to_string(),
            value: extension_value,
        });
    }

    let is_oid = !name.is_empty()
        && name
            .split('.')
            .all(|arc| !arc.is_empty() && arc.chars().all(|c| c.is_ascii_digit()));
    if !is_oid {
        return Err(format!("`{name}` is neither a known extension nor an OID"));
    }

    match extension_value {
        Some(extension_value) => Ok(ExtensionArg {
            kind: ExtensionKind::from_oid(name),
            oid: name.to_string(),
            value: Some(extension_value),
        }),
        None => Err(format!("Extension `{name}` needs a value")),
    }
}
