//! Format descriptors and per-call options.

use std::fmt;
use std::path::Path;

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};

use super::error::{DictionaryError, Result};

/// The supported dictionary formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// CSV, or a ZIP archive of `dictionary.csv` plus media.
    Generic,
    /// One answer per line with a trailing `//` comment.
    Catchfeeling,
    /// One answer per line with a trailing `//` or `#` comment.
    Catchm,
    /// Shiritori word lists or paired quiz lines.
    Inteligenceo,
    /// Hiragana-only word list.
    Pictsense,
}

impl FormatType {
    pub const ALL: [FormatType; 5] = [
        FormatType::Generic,
        FormatType::Catchfeeling,
        FormatType::Catchm,
        FormatType::Inteligenceo,
        FormatType::Pictsense,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Generic => "generic",
            FormatType::Catchfeeling => "catchfeeling",
            FormatType::Catchm => "catchm",
            FormatType::Inteligenceo => "inteligenceo",
            FormatType::Pictsense => "pictsense",
        }
    }

    /// Looks a format up by name, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == lowered)
            .ok_or_else(|| DictionaryError::UnknownFormat(name.to_string()))
    }

    /// Infers the format from a file extension.
    pub fn from_extension(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" | "zip" => Ok(FormatType::Generic),
            "cfq" => Ok(FormatType::Catchfeeling),
            "dat" => Ok(FormatType::Catchm),
            "txt" => Ok(FormatType::Inteligenceo),
            _ => Err(DictionaryError::UnknownFormat(path.display().to_string())),
        }
    }

    /// Extension of serialized output. Generic output decides between
    /// `csv` and `zip` itself.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Generic => "csv",
            FormatType::Catchfeeling => "cfq",
            FormatType::Catchm => "dat",
            FormatType::Inteligenceo | FormatType::Pictsense => "txt",
        }
    }

    /// Encoding of serialized output.
    pub fn output_encoding(&self) -> &'static Encoding {
        match self {
            FormatType::Generic => UTF_8,
            FormatType::Catchfeeling | FormatType::Catchm | FormatType::Inteligenceo | FormatType::Pictsense => {
                SHIFT_JIS
            }
        }
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The two sub-grammars of the Inteligenceω format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteligenceoMode {
    /// `Q,` / `A,` line pairs.
    Quiz,
    /// `headword,reading,...` lists with affix expansion.
    Shiritori,
}

impl InteligenceoMode {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "quiz" => Ok(InteligenceoMode::Quiz),
            "shiritori" => Ok(InteligenceoMode::Shiritori),
            _ => Err(DictionaryError::UnknownFormat(format!("inteligenceo mode `{}`", name))),
        }
    }
}

/// Options for one parse call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Forces (`Some(true)`) or forbids (`Some(false)`) a generic CSV header
    /// row. `None` detects it.
    pub header: Option<bool>,
    /// Forces an Inteligenceω sub-grammar. `None` sniffs the input.
    pub inteligenceo_mode: Option<InteligenceoMode>,
    /// Source file name; its stem becomes `@title` when none is given.
    pub file_name: Option<String>,
}

/// Options for one serialize call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Forces an Inteligenceω sub-grammar. `None` picks quiz when any word
    /// carries a question or media, shiritori otherwise.
    pub inteligenceo_mode: Option<InteligenceoMode>,
}

/// Bytes produced by a serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedDictionary {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: &'static str,
}
