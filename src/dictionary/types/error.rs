//! Custom error types for the wordgame-dict crate.
//!
//! Two families are kept apart:
//! - [`DictionaryError`] aborts a whole parse or serialize call.
//! - [`WordError`] rejects exactly one word; each format loop decides whether
//!   to skip-and-log it or to promote it into a [`DictionaryError`].

use thiserror::Error;

/// The primary error type for all whole-dictionary operations.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The input violates a hard structural rule of its format.
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// The input was valid but nothing in it is expressible in the target format.
    #[error("Nothing could be serialized: {0}")]
    EmptyOutput(String),

    /// The input bytes could not be decoded in any supported encoding.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A format name or file extension did not match any supported format.
    #[error("Unknown dictionary format: {0}")]
    UnknownFormat(String),

    /// The CSV layer rejected the input or failed to write a record.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The ZIP layer rejected the archive or failed to write it.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A bundled media file was rejected by the media collaborator.
    #[error("Media error: {0}")]
    Media(#[from] MediaError),
}

impl From<WordError> for DictionaryError {
    fn from(e: WordError) -> Self {
        DictionaryError::Syntax(e.to_string())
    }
}

/// A word-level invariant violation. Rejects exactly one word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    /// `text` is absent, or validated to an empty value.
    #[error("the word has no usable `text` field")]
    MissingText,

    /// `type` is `selection` but no `option` survived validation.
    #[error("`{0}`: a selection word requires at least one `option`")]
    MissingOptions(String),

    /// An `answer` of a selection word is not one of its options.
    #[error("`{text}`: answer `{answer}` matches no option")]
    AnswerNotInOptions { text: String, answer: String },

    /// No answer was given and none could be derived from `text`.
    #[error("`{0}`: no answer was given and none can be derived from the text")]
    NoDerivableAnswer(String),

    /// Metadata fields were merged into a dictionary that has no words.
    #[error("metadata requires at least one word")]
    MetadataWithoutWords,
}

/// Rejection of a bundled media file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// The file content is not one of the supported image/audio/video types.
    #[error("`{0}` is not a supported image, audio or video file")]
    UnsupportedType(String),

    /// The file exceeds the hard size ceiling of its media kind.
    #[error("`{name}` is {size} bytes, over the {limit} byte limit for {kind} files")]
    TooLarge {
        name: String,
        kind: &'static str,
        size: u64,
        limit: u64,
    },
}

/// A convenience `Result` type alias using the crate's `DictionaryError` type.
pub type Result<T> = std::result::Result<T, DictionaryError>;
