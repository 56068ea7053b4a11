//! Core types and errors for the ReconGuard gateway.
//!
//! This crate provides the foundational types shared by every other crate:
//!
//! - **Targets**: [`AuthorizedTarget`], [`ScopeDecision`], [`ScopeTier`] and
//!   the [`normalize_target`] rule used for every allow-list comparison
//! - **Payloads**: the JSON shapes returned by the recon routes
//! - **Errors**: gate and registry errors via [`GuardError`]
//!
//! # Example
//!
//! ```rust
//! use reconguard_core::{normalize_target, ScopeTier};
//!
//! assert_eq!(normalize_target("  Example.COM "), Some("example.com".to_string()));
//! assert_eq!(normalize_target("   "), None);
//! assert_eq!(ScopeTier::Active.to_string(), "active");
//! ```

#![doc(html_root_url = "https://docs.rs/reconguard-core/1.0.0")]

mod error;
mod target;
pub mod types;

pub use error::{GuardError, Result};
pub use target::{normalize_target, AuthorizedTarget, ScopeDecision, ScopeTier};
pub use types::*;
