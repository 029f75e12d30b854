//! ModernMT - Rust client for the ModernMT translation API
//!
//! This library provides asynchronous access to machine translation,
//! adaptive translation memories, glossaries, batch translation with
//! signed callbacks, and language detection.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod callback;
pub mod client;
pub mod config;
pub mod errors;
mod http;
pub mod memories;
pub mod models;

// Re-export key types for convenience
pub use callback::{CallbackVerifier, KeySource, KEY_MAX_AGE};
pub use client::ModernMt;
pub use config::ClientConfig;
pub use errors::{ClientError, Result};
pub use memories::MemoryServices;
pub use models::{
    ContextVectorOptions, DetectedLanguage, GlossaryTerm, ImportJob, Memory, MemoryId,
    TranslateOptions, Translation, User,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
