use super::CrlService;
use crate::service::error::{ApiResponseExt, ServiceError};

impl CrlService {
    /// DER encoded CRL of the CA identified by `issuer_dn`
    pub async fn download(&self, issuer_dn: &str) -> Result<Vec<u8>, ServiceError> {
        let mut url = self
            .crl_url
            .clone()
            .ok_or(ServiceError::MissingConfiguration("api.crlUrl"))?;
        url.query_pairs_mut().append_pair("issuerDn", issuer_dn);

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await?
            .api_error_for_status()?;

        if let Some(content_type) = response.header_get("Content-Type") {
            tracing::debug!(%content_type, bytes = response.body.len(), "CRL received");
        }

        Ok(response.body)
    }
}
