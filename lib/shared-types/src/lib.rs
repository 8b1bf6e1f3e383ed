mod macros;
mod serial_number;
mod user_id;

pub use serial_number::SerialNumber;
pub use user_id::{UserId, UserIdParseError};
