//! Client for the hosted auth + database backend used by the site.

pub mod client;
pub mod error;
pub mod query;
pub mod storage;
pub mod types;

pub use client::{BackendClient, Subscription};
pub use error::BackendError;
pub use query::TableQuery;
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use types::*;
