use shared_types::SerialNumber;

use super::CertificateService;
use crate::model::certificate::{Certificate, CreateCertificateRequest};
use crate::model::revocation::{RevocationReason, RevokeCertificateRequest};
use crate::service::error::{ApiResponseExt, ServiceError};

impl CertificateService {
    pub async fn get_certificates(&self) -> Result<Vec<Certificate>, ServiceError> {
        self.get_list("/certificates").await
    }

    pub async fn get_all_unassigned(&self) -> Result<Vec<Certificate>, ServiceError> {
        self.get_list("/certificates/unassigned").await
    }

    /// CA certificates the signed in user may issue from
    pub async fn get_issuers(&self) -> Result<Vec<Certificate>, ServiceError> {
        self.get_list("/certificates/issuers").await
    }

    pub async fn revoke_certificate(
        &self,
        serial_number: &SerialNumber,
        reason: RevocationReason,
    ) -> Result<(), ServiceError> {
        let request = RevokeCertificateRequest {
            serial_number: serial_number.to_owned(),
            reason,
        };

        self.client
            .post(&self.endpoints.url("/certificates/revoke"))
            .json(&request)?
            .send()
            .await?
            .api_error_for_status()?;

        tracing::info!(%serial_number, %reason, "Certificate revoked");
        Ok(())
    }

    pub async fn create_certificate(
        &self,
        request: &CreateCertificateRequest,
    ) -> Result<Certificate, ServiceError> {
        let certificate: Certificate = self
            .client
            .post(&self.endpoints.url("/certificates"))
            .json(request)?
            .send()
            .await?
            .api_error_for_status()?
            .json()?;

        tracing::info!(serial_number = %certificate.serial_number, "Certificate issued");
        Ok(certificate)
    }

    async fn get_list(&self, path: &str) -> Result<Vec<Certificate>, ServiceError> {
        Ok(self
            .client
            .get(&self.endpoints.url(path))
            .send()
            .await?
            .api_error_for_status()?
            .json()?)
    }
}
