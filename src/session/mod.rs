//! Session handling: token storage and the authentication context

pub mod storage;
pub mod store;
pub mod context;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{SessionStore, TOKEN_EXPIRY_KEY, TOKEN_KEY};
pub use context::{AuthContext, Landing};
