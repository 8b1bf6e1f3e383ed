use std::path::Path;

use shared_types::SerialNumber;
use time::Date;

use crate::model::certificate::{CertificateType, CreateCertificateRequest, Subject};
use crate::model::extension::{Extension, ExtensionKind};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CreationMode {
    /// Subject fields and extensions entered by hand, key pair generated by the backend
    #[default]
    Guided,
    /// Certificate signing request supplied as PEM
    Csr,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SubjectForm {
    pub common_name: String,
    pub organization: String,
    pub organizational_unit: String,
    pub country: String,
    pub state: String,
    pub locality: String,
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CertificateForm {
    pub mode: CreationMode,
    /// Issuer label (`CN-O`) or serial number; empty for a self-signed root
    pub issuer_alias: String,
    pub subject: SubjectForm,
    pub extensions: Vec<Extension>,
    pub issued: Option<Date>,
    pub expires: Option<Date>,
    pub certificate_type: CertificateType,
    pub csr_pem: Option<String>,
}

impl CertificateForm {
    pub fn add_extension(&mut self, extension: Extension) {
        self.extensions.push(extension);
    }

    pub fn add_common_extension(&mut self, kind: ExtensionKind) {
        self.add_extension(kind.to_extension(false, None));
    }

    pub fn remove_extension(&mut self, index: usize) -> Option<Extension> {
        (index < self.extensions.len()).then(|| self.extensions.remove(index))
    }

    /// Reads a PEM encoded CSR and switches the form to CSR mode
    pub fn load_csr_file(&mut self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let csr_pem = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "CSR loaded");

        self.csr_pem = Some(csr_pem);
        self.mode = CreationMode::Csr;
        Ok(())
    }

    /// Payload for `POST /certificates`; the issued date defaults to `today`
    pub(super) fn to_request(
        &self,
        issuer_serial_number: Option<SerialNumber>,
        expires: Date,
        today: Date,
    ) -> CreateCertificateRequest {
        let subject = match self.mode {
            CreationMode::Guided => Some(self.subject.to_subject()),
            CreationMode::Csr => None,
        };
        let csr_pem = match self.mode {
            CreationMode::Guided => None,
            CreationMode::Csr => self.csr_pem.clone(),
        };

        CreateCertificateRequest {
            issuer_serial_number,
            subject,
            extensions: self
                .extensions
                .iter()
                .map(|extension| Extension {
                    oid: extension.oid.trim().to_string(),
                    name: extension.name.clone().filter(|name| !name.is_empty()),
                    is_critical: extension.is_critical,
                    value: extension.value.trim().to_string(),
                })
                .collect(),
            issued: Some(self.issued.unwrap_or(today)),
            expires,
            certificate_type: self.certificate_type,
            csr_pem,
        }
    }
}

impl SubjectForm {
    fn to_subject(&self) -> Subject {
        Subject {
            common_name: self.common_name.trim().to_string(),
            organization: self.organization.trim().to_string(),
            organizational_unit: non_empty(&self.organizational_unit),
            country: non_empty(&self.country),
            state: non_empty(&self.state),
            locality: non_empty(&self.locality),
            email: non_empty(&self.email),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
