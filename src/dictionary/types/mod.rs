//! Core types shared by parsers and serializers.
//!
//! # Submodules
//!
//! - [`models`]: the canonical model ([`Dictionary`](models::Dictionary), [`Word`](models::Word))
//! - [`error`]: fatal and per-word error types
//! - [`diagnostics`]: leveled diagnostics collector
//! - [`formats`]: format descriptors and per-call options

pub mod diagnostics;
pub mod error;
pub mod formats;
pub mod models;
