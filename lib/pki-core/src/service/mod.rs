use url::Url;

pub mod certificate;
pub mod crl;
pub mod error;
pub mod user;

#[cfg(test)]
pub(crate) mod test_utilities;

/// Resolves REST paths against the configured API base URL
#[derive(Clone, Debug)]
pub struct ApiEndpoints {
    base_url: Url,
}

impl ApiEndpoints {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// `path` is appended verbatim, e.g. `/certificates/issuers`
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}
