//! Dirstore Core - Core abstractions for directory-backend lifecycle management
//!
//! This crate provides the fundamental traits and types the other dirstore
//! crates depend on. It defines:
//!
//! - `EntryManager` - Trait for live backend connection handles
//! - `EntryManagerFactory` - Trait for constructing handles from properties
//! - `Decrypter` - Trait for the credential decryption seam
//! - `ConnectionProperties` - Ordered connection properties with group overrides
//! - `DirstoreError` / `Result` - Common error taxonomy

mod decrypt;
mod entry;
mod error;
mod factory;
mod properties;

pub use decrypt::*;
pub use entry::*;
pub use error::*;
pub use factory::*;
pub use properties::*;
