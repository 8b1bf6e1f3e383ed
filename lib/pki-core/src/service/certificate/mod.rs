use std::sync::Arc;

use super::ApiEndpoints;
use crate::provider::http_client::HttpClient;

pub mod service;


#[derive(Clone)]
pub struct CertificateService {
    client: Arc<dyn HttpClient>,
    endpoints: ApiEndpoints,
}

impl CertificateService {
    pub fn new(client: Arc<dyn HttpClient>, endpoints: ApiEndpoints) -> Self {
        Self { client, endpoints }
    }
}
