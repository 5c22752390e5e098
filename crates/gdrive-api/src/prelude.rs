//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```
//! use gdrive_api::prelude::*;
//!
//! // Now you have access to:
//! // - GDriveClient, GDriveClientBuilder (API client)
//! // - OAuthClient, OAuthConfig, Credentials (authorization)
//! // - Error, ApiError, Result (error handling)
//! // - FieldRegistry, FilterValidator, QueryCompiler, RawFilterInput (query compiler)
//! // - Record, RecordSet (search results)
//! ```

// Client types
pub use crate::client::{GDriveClient, GDriveClientBuilder};

// Authorization
pub use crate::auth::{Credentials, OAuthClient, OAuthConfig};

// Error types
pub use crate::error::{ApiError, Error, Result};

// Query compiler
pub use crate::query::{
    CompiledQuery, FieldRegistry, FieldSpec, FilterToken, FilterValidator, FilterValue,
    OperatorKind, ParseMode, QueryCompiler, QueryError, RawFilterInput, RawValue, Record,
    RecordSet,
};

// Retry
pub use crate::retry::RetryConfig;
