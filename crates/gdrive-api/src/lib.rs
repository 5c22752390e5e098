//! Google Drive v2 client library with a validated search query compiler.
//!
//! The [`query`] module turns named filters such as `title_contains=report`
//! into a Drive search string; [`client::GDriveClient`] runs it and returns
//! the matching files as [`query::RecordSet`]s.
//!
//! # Quick Start
//!
//! For convenient imports, use the prelude:
//!
//! ```
//! use gdrive_api::prelude::*;
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod prelude;
pub mod query;
pub mod retry;
