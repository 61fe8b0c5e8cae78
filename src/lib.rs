//! # wordgame-dict
//!
//! Converts word-game dictionaries between a canonical model and the
//! formats games read: a generic CSV/ZIP format, Catchfeeling, Catchm,
//! Inteligenceω (shiritori and quiz) and Pictsense.
//!
//! Every field is validated and corrected the same way regardless of the
//! source format; recoverable problems are reported as [`Diagnostic`]s.
pub mod dictionary;

// Re-export the main types for convenience
pub use dictionary::{
    convert, parse, serialize,
    collab::Collaborators,
    Context, Diagnostic, Diagnostics, Dictionary, DictionaryError, FieldMap, FieldName,
    FormatType, InteligenceoMode, MediaError, MediaFile, MediaKind, ParseOptions, Result,
    SerializeOptions, SerializedDictionary, Severity, Word, WordError,
};
