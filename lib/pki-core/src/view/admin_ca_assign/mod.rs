use shared_types::{SerialNumber, UserId};

use crate::model::certificate::Certificate;
use crate::model::user::User;
use crate::service::certificate::CertificateService;
use crate::service::user::UserService;

#[cfg(test)]
mod test;

/// Assignment of unassigned CA certificates to CA users, admins only
pub struct AdminCaAssignView {
    certificate_service: CertificateService,
    user_service: UserService,
    pub is_admin: bool,
    pub loading: bool,
    pub certificates: Vec<Certificate>,
    pub users: Vec<User>,
    pub confirmation: Option<String>,
    pub error: Option<String>,
}

impl AdminCaAssignView {
    pub fn new(certificate_service: CertificateService, user_service: UserService) -> Self {
        Self {
            certificate_service,
            user_service,
            is_admin: false,
            loading: false,
            certificates: vec![],
            users: vec![],
            confirmation: None,
            error: None,
        }
    }

    pub async fn load(&mut self, is_admin: bool) {
        if !is_admin {
            tracing::debug!("Assignment view requires the admin role");
            return;
        }
        self.is_admin = true;
        self.loading = true;

        self.refresh_certificates().await;
        match self.user_service.get_ca_users().await {
            Ok(users) => self.users = users,
            Err(error) => self.error = Some(error.user_message()),
        }

        self.loading = false;
    }

    /// Does nothing unless both values are given and the user is among the loaded CA users
    pub async fn assign(&mut self, serial_number: Option<&str>, user_id: Option<&str>) {
        let (Some(serial_number), Some(user_id)) = (serial_number, user_id) else {
            return;
        };
        let Ok(user_id) = user_id.parse::<UserId>() else {
            tracing::debug!(user_id, "Ignoring invalid user id");
            return;
        };
        let serial_number = SerialNumber::from(serial_number);

        let Some(user) = self.users.iter_mut().find(|user| user.id == user_id) else {
            tracing::debug!(%user_id, "Ignoring unknown user");
            return;
        };
        user.certificate_serial_numbers.push(serial_number.to_owned());

        self.loading = true;
        self.confirmation = None;

        match self.user_service.assign(&serial_number, user_id).await {
            Ok(confirmation) => {
                self.error = None;
                self.confirmation = Some(confirmation);
                // the assignment stands even if the list cannot be refreshed
                self.refresh_certificates().await;
            }
            Err(error) => self.error = Some(error.user_message()),
        }

        self.loading = false;
    }

    async fn refresh_certificates(&mut self) {
        match self.certificate_service.get_all_unassigned().await {
            Ok(certificates) => self.certificates = certificates,
            Err(error) => self.error = Some(error.user_message()),
        }
    }
}
