use shared_types::{SerialNumber, UserId};

use super::UserService;
use crate::model::user::{AssignCertificateRequest, User};
use crate::service::error::{ApiResponseExt, ServiceError};

impl UserService {
    /// Users eligible to hold CA certificates
    pub async fn get_ca_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self
            .client
            .get(&self.endpoints.url("/users/ca"))
            .send()
            .await?
            .api_error_for_status()?
            .json()?)
    }

    /// Returns the backend's plain text confirmation
    pub async fn assign(
        &self,
        serial_number: &SerialNumber,
        user_id: UserId,
    ) -> Result<String, ServiceError> {
        let request = AssignCertificateRequest {
            serial_number: serial_number.to_owned(),
            user_id,
        };

        let confirmation = self
            .client
            .put(&self.endpoints.url("/users/assignment"))
            .json(&request)?
            .send()
            .await?
            .api_error_for_status()?
            .text();

        tracing::info!(%serial_number, %user_id, "Certificate assigned");
        Ok(confirmation)
    }
}
