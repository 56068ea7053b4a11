//! Target registry and scope engine.
//!
//! The registry owns the durable set of allow-listed targets. The
//! [`ScopeEngine`] wraps a registry with the single decision every recon
//! request goes through: may this target be probed?

#![doc(html_root_url = "https://docs.rs/reconguard-scope/1.0.0")]

mod engine;
pub mod registry;

pub use engine::ScopeEngine;
pub use registry::{seed, MemoryRegistry, SqlRegistry, TargetRegistry};
