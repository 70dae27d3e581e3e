//! # authgate
//!
//! Client-side session handling for a bearer-token auth REST API.
//!
//! The crate owns the client half of the session: it exchanges credentials
//! for a token, keeps the token in a durable [`store::SessionStore`], attaches
//! it to every request through [`gateway::HttpGateway`], and publishes a
//! consistent [`session::SessionState`] from [`session::SessionController`]
//! to whatever front end is rendering it. Token issuance and password checks
//! belong to the remote API.

pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod session;
pub mod store;
pub mod types;
pub mod view;

pub use error::{AuthError, ConfigError, StoreError};
pub use gateway::{AuthGateway, HttpGateway};
pub use session::{SessionController, SessionState, SessionStatus};
pub use store::{FileStore, MemoryStore, SessionStore};
pub use types::{LoginCredentials, RegisterCredentials, SessionToken, User};
