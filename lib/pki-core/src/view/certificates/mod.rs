use shared_types::SerialNumber;

use crate::model::certificate::Certificate;
use crate::model::revocation::RevocationReason;
use crate::service::certificate::CertificateService;

#[cfg(test)]
mod test;

/// Certificate list with revocation
pub struct CertificatesView {
    service: CertificateService,
    pub certificates: Vec<Certificate>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CertificatesView {
    pub fn new(service: CertificateService) -> Self {
        Self {
            service,
            certificates: vec![],
            loading: true,
            error: None,
        }
    }

    /// Choices offered when revoking
    pub fn reasons(&self) -> Vec<RevocationReason> {
        RevocationReason::all()
    }

    pub async fn load(&mut self) {
        self.loading = true;

        match self.service.get_certificates().await {
            Ok(certificates) => {
                self.certificates = certificates;
                self.error = None;
            }
            Err(error) => self.error = Some(error.user_message()),
        }

        self.loading = false;
    }

    pub async fn revoke(&mut self, serial_number: &SerialNumber, reason: RevocationReason) {
        self.loading = true;

        match self
            .service
            .revoke_certificate(serial_number, reason)
            .await
        {
            Ok(()) => {
                self.error = None;
                self.load().await;
            }
            Err(error) => {
                self.error = Some(error.user_message());
                self.loading = false;
            }
        }
    }
}
