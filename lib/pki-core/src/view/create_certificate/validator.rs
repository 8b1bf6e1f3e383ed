use itertools::Itertools;
use thiserror::Error;
use time::Date;

use super::form::{CertificateForm, CreationMode};

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum FieldError {
    #[error("Expiry date is required")]
    ExpiresRequired,
    #[error("Expiry date must be in the future")]
    ExpiresNotInFuture,
    #[error("Issued date must not be after the expiry date")]
    IssuedAfterExpires,
    #[error("Common name is required")]
    CommonNameRequired,
    #[error("Organization is required")]
    OrganizationRequired,
    #[error("Extension #{0} needs an OID")]
    ExtensionOidRequired(usize),
    #[error("Extension #{0} needs a value")]
    ExtensionValueRequired(usize),
    #[error("A CSR is required")]
    CsrRequired,
    #[error("An issuer must be selected")]
    IssuerRequired,
    #[error("Unknown issuer `{0}`")]
    UnknownIssuer(String),
}

/// All problems found in a form, in field order
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{}", .0.iter().join("; "))]
pub struct FormErrors(pub Vec<FieldError>);

/// Checks the form against `today`; the expiry date must lie strictly after it
pub fn validate_form(form: &CertificateForm, today: Date) -> Result<Date, FormErrors> {
    let mut errors = vec![];

    let expires = match form.expires {
        None => {
            errors.push(FieldError::ExpiresRequired);
            None
        }
        Some(expires) if expires <= today => {
            errors.push(FieldError::ExpiresNotInFuture);
            None
        }
        Some(expires) => Some(expires),
    };

    if let (Some(issued), Some(expires)) = (form.issued, form.expires) {
        if issued > expires {
            errors.push(FieldError::IssuedAfterExpires);
        }
    }

    match form.mode {
        CreationMode::Guided => {
            if form.subject.common_name.trim().is_empty() {
                errors.push(FieldError::CommonNameRequired);
            }
            if form.subject.organization.trim().is_empty() {
                errors.push(FieldError::OrganizationRequired);
            }
        }
        CreationMode::Csr => {
            if form
                .csr_pem
                .as_deref()
                .is_none_or(|csr_pem| csr_pem.trim().is_empty())
            {
                errors.push(FieldError::CsrRequired);
            }
        }
    }

    for (index, extension) in form.extensions.iter().enumerate() {
        if extension.oid.trim().is_empty() {
            errors.push(FieldError::ExtensionOidRequired(index + 1));
        }
        if extension.value.trim().is_empty() {
            errors.push(FieldError::ExtensionValueRequired(index + 1));
        }
    }

    match expires {
        Some(expires) if errors.is_empty() => Ok(expires),
        _ => Err(FormErrors(errors)),
    }
}
