//! HTTP client for the construction-site backend.
//!
//! Holds the admin session, wraps every REST endpoint with [`reqwest`],
//! and keeps a re-fetch-after-mutate view of the site content.

pub mod api;
pub mod config;
pub mod error;
pub mod repository;
pub mod session;
pub mod state;
pub mod storage;

pub use api::{BackendApi, ImageUpload};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorKind};
pub use repository::{Confirm, ContentRepository, DeleteOutcome};
pub use session::SessionHolder;
pub use state::ContentState;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
