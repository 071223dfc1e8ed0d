//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionManager`: login/registration and the persisted token/username
//! - `SessionStore`: the storage seam, with `FileStore` and `MemoryStore`
//! - `Credentials`, `RegistrationRequest`: transient request bodies
//!
//! The session has no expiry on the client; it lasts until `logout`.

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::{Credentials, RegistrationRequest};
pub use session::{Session, SessionManager, TOKEN_KEY, USERNAME_KEY};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
