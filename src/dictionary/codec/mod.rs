//! Codec layer for text encodings and containers.
//!
//! # Submodules
//!
//! - [`encoding`][]: UTF-8 / Shift_JIS / EUC-JP / ISO-2022-JP detection and transcoding
//! - [`substitution`][]: safety reduction tables and representability probes
//! - [`archive`][]: ZIP reading and writing

pub mod archive;
pub mod encoding;
pub mod substitution;
