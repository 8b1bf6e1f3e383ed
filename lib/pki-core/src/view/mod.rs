//! Headless view-models. Each view owns the data it fetched, a loading flag
//! and an error banner; no state is shared between views.

pub mod admin_ca_assign;
pub mod certificates;
pub mod create_certificate;
pub mod home;
