//! Domain core for the construction-site content client.
//!
//! Entity types, form validation, the busy-date availability model and the
//! gallery cursor. Pure logic with no I/O so it can be shared by the HTTP
//! client, the admin CLI and any future front end.

pub mod about;
pub mod availability;
pub mod contact;
pub mod error;
pub mod gallery;
pub mod project;
pub mod session;
pub mod types;
pub mod validation;
