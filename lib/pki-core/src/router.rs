//! Route table of the console. Every route requires a signed in user;
//! anyone else is sent back to the root route.

use std::sync::Arc;

use strum::{EnumIter, IntoEnumIterator};
use thiserror::Error;

use crate::provider::identity::session::AuthState;

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter)]
pub enum Route {
    Home,
    Certificates,
    CreateCertificate,
    AdminCaAssign,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "",
            Self::Certificates => "certificates",
            Self::CreateCertificate => "create-certificate",
            Self::AdminCaAssign => "admin-ca-assign",
        }
    }

    pub fn from_path(path: &str) -> Result<Self, RouterError> {
        let path = path.trim().trim_matches('/');

        Self::iter()
            .find(|route| route.path() == path)
            .ok_or_else(|| RouterError::UnknownRoute(path.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Navigation {
    Activate(Route),
    Redirect(Route),
}

#[derive(Debug, Error, PartialEq)]
pub enum RouterError {
    #[error("Unknown route `/{0}`")]
    UnknownRoute(String),
}

/// Lets a route activate only for authenticated users
pub struct AuthGuard {
    state: Arc<dyn AuthState>,
}

impl AuthGuard {
    pub fn new(state: Arc<dyn AuthState>) -> Self {
        Self { state }
    }

    pub async fn can_activate(&self, route: Route) -> Navigation {
        if self.state.is_authenticated().await {
            Navigation::Activate(route)
        } else {
            tracing::info!(path = route.path(), "Not authenticated, redirecting to root");
            Navigation::Redirect(Route::Home)
        }
    }
}

pub struct Router {
    guard: AuthGuard,
}

impl Router {
    pub fn new(state: Arc<dyn AuthState>) -> Self {
        Self {
            guard: AuthGuard::new(state),
        }
    }

    pub async fn navigate(&self, path: &str) -> Result<Navigation, RouterError> {
        let route = Route::from_path(path)?;
        Ok(self.guard.can_activate(route).await)
    }
}
