use std::sync::Arc;

use config::core_config::CoreConfig;
use provider::http_client::HttpClient;
use provider::http_client::authenticated::AuthenticatedHttpClient;
use provider::identity::AccessTokenSource;
use provider::identity::keycloak::KeycloakClient;
use service::ApiEndpoints;
use service::certificate::CertificateService;
use service::crl::CrlService;
use service::user::UserService;
use view::admin_ca_assign::AdminCaAssignView;
use view::certificates::CertificatesView;
use view::create_certificate::CreateCertificateView;

pub mod config;
pub mod model;
pub mod provider;
pub mod router;
pub mod service;
pub mod view;


/// Services of the console wired to one authenticated session
#[derive(Clone)]
pub struct PkiCore {
    pub certificate_service: CertificateService,
    pub user_service: UserService,
    pub crl_service: CrlService,
}

impl PkiCore {
    /// `http_client` is the plain transport; requests made through the
    /// services carry the bearer token from `token_source`
    pub fn new(
        config: &CoreConfig,
        http_client: Arc<dyn HttpClient>,
        token_source: Arc<dyn AccessTokenSource>,
    ) -> Self {
        let client: Arc<dyn HttpClient> =
            Arc::new(AuthenticatedHttpClient::new(http_client, token_source));
        let endpoints = ApiEndpoints::new(config.api.base_url.clone());

        Self {
            certificate_service: CertificateService::new(client.clone(), endpoints.clone()),
            user_service: UserService::new(client.clone(), endpoints),
            crl_service: CrlService::new(client, config.api.crl_url.clone()),
        }
    }

    pub fn identity_client(
        config: &CoreConfig,
        http_client: Arc<dyn HttpClient>,
    ) -> Arc<KeycloakClient> {
        Arc::new(KeycloakClient::new(http_client, config.identity.clone()))
    }

    pub fn certificates_view(&self) -> CertificatesView {
        CertificatesView::new(self.certificate_service.clone())
    }

    pub fn create_certificate_view(&self) -> CreateCertificateView {
        CreateCertificateView::new(self.certificate_service.clone())
    }

    pub fn admin_ca_assign_view(&self) -> AdminCaAssignView {
        AdminCaAssignView::new(self.certificate_service.clone(), self.user_service.clone())
    }
}
