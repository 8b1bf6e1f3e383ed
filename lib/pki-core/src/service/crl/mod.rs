use std::sync::Arc;

use url::Url;

use crate::provider::http_client::HttpClient;

pub mod service;


/// Fetches revocation lists published by the backend
#[derive(Clone)]
pub struct CrlService {
    client: Arc<dyn HttpClient>,
    crl_url: Option<Url>,
}

impl CrlService {
    pub fn new(client: Arc<dyn HttpClient>, crl_url: Option<Url>) -> Self {
        Self { client, crl_url }
    }
}
