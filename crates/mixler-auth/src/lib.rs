pub mod error;
pub mod helper;
pub mod location;

pub use error::AuthError;
pub use helper::{AuthHelper, CurrentUser};
pub use location::{Location, MemoryLocation};
