//! Persistence layer — community configs and banned words.

pub mod libsql_backend;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{CommunityConfig, Store};
