use shared_types::SerialNumber;
use time::Date;

use crate::model::certificate::{Certificate, CreateCertificateRequest};
use crate::model::extension::ExtensionKind;
use crate::service::certificate::CertificateService;

pub mod form;
pub mod validator;


use form::CertificateForm;
use validator::{FieldError, FormErrors, validate_form};

/// Certificate issuance form, guided or CSR based
pub struct CreateCertificateView {
    service: CertificateService,
    pub form: CertificateForm,
    pub issuers: Vec<Certificate>,
    pub is_admin: bool,
    pub saving: bool,
    pub result: Option<Certificate>,
    pub error: Option<String>,
}

impl CreateCertificateView {
    pub fn new(service: CertificateService) -> Self {
        Self {
            service,
            form: CertificateForm::default(),
            issuers: vec![],
            is_admin: false,
            saving: false,
            result: None,
            error: None,
        }
    }

    pub async fn init(&mut self, is_admin: bool) {
        self.is_admin = is_admin;

        match self.service.get_issuers().await {
            Ok(issuers) => self.issuers = issuers,
            Err(error) => self.error = Some(error.user_message()),
        }

        self.form
            .add_extension(ExtensionKind::BasicConstraints.to_extension(true, None));
    }

    pub fn issuer_labels(&self) -> Vec<String> {
        self.issuers
            .iter()
            .map(Certificate::issuer_label)
            .collect()
    }

    /// Maps the issuer alias to a serial number. `None` means self-signed.
    pub fn resolve_issuer(&self) -> Result<Option<SerialNumber>, FieldError> {
        let alias = self.form.issuer_alias.trim();

        if alias.is_empty() {
            return if self.is_admin {
                Ok(None)
            } else {
                Err(FieldError::IssuerRequired)
            };
        }

        self.issuers
            .iter()
            .find(|issuer| issuer.issuer_label() == alias || issuer.serial_number == *alias)
            .map(|issuer| Some(issuer.serial_number.to_owned()))
            .ok_or_else(|| FieldError::UnknownIssuer(alias.to_string()))
    }

    pub fn validate(&self, today: Date) -> Result<(), FormErrors> {
        self.build_request(today).map(|_| ())
    }

    pub fn build_request(&self, today: Date) -> Result<CreateCertificateRequest, FormErrors> {
        let issuer = self.resolve_issuer();
        let expires = validate_form(&self.form, today);

        match (issuer, expires) {
            (Ok(issuer), Ok(expires)) => Ok(self.form.to_request(issuer, expires, today)),
            (issuer, expires) => {
                let mut errors = expires.err().map(|e| e.0).unwrap_or_default();
                errors.extend(issuer.err());
                Err(FormErrors(errors))
            }
        }
    }

    pub async fn submit(&mut self, today: Date) -> Option<&Certificate> {
        self.result = None;

        let request = match self.build_request(today) {
            Ok(request) => request,
            Err(errors) => {
                self.error = Some(errors.to_string());
                return None;
            }
        };

        self.saving = true;
        match self.service.create_certificate(&request).await {
            Ok(certificate) => {
                self.error = None;
                self.result = Some(certificate);
            }
            Err(error) => self.error = Some(error.user_message()),
        }
        self.saving = false;

        self.result.as_ref()
    }
}
