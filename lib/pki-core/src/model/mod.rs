//! Transport records mirrored from the backend API.
//!
//! The backend owns every invariant of these shapes. The client only carries
//! them through a single request/response round trip.

pub mod certificate;
pub mod extension;
pub mod revocation;
pub mod user;
