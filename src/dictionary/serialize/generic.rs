//! Generic format serializer.
//!
//! Writes a header row in canonical column order, repeating a column as
//! often as its most frequent field occurs, followed by unrecognized
//! columns in first-seen order. Dictionaries bundling media are written as
//! a ZIP archive of `dictionary.csv` plus the files.

use log::{debug, info};

use super::{ensure_not_empty, output_file_name};
use crate::dictionary::codec::archive;
use crate::dictionary::context::Context;
use crate::dictionary::format::generic::CSV_MEMBER;
use crate::dictionary::types::error::{DictionaryError, Result};
use crate::dictionary::types::formats::{SerializeOptions, SerializedDictionary};
use crate::dictionary::types::models::{Dictionary, FieldName, Word};

pub const CSV_MIME: &str = "text/csv; charset=UTF-8";
pub const ZIP_MIME: &str = "application/zip";

/// A column group: a field name and how many columns it spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub count: usize,
}

fn extra_values<'a>(word: &'a Word, name: &str) -> Vec<&'a str> {
    word.extra()
        .iter()
        .filter(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
        .collect()
}

/// Column layout for `words`. `text` is always present.
pub fn columns(words: &[Word]) -> Vec<Column> {
    let mut columns: Vec<Column> = FieldName::ALL
        .iter()
        .map(|field| Column {
            name: field.as_str().to_string(),
            count: words
                .iter()
                .map(|w| w.values(*field).len())
                .max()
                .unwrap_or(0),
        })
        .filter(|c| c.count > 0 || c.name == FieldName::Text.as_str())
        .collect();

    let mut extra_names: Vec<&str> = Vec::new();
    for word in words {
        for (name, _) in word.extra() {
            if !extra_names.contains(&name.as_str()) {
                extra_names.push(name);
            }
        }
    }
    for name in extra_names {
        let count = words
            .iter()
            .map(|w| extra_values(w, name).len())
            .max()
            .unwrap_or(0);
        columns.push(Column {
            name: name.to_string(),
            count,
        });
    }
    columns
}

/// Embedded newlines use CRLF like the record terminator.
fn to_crlf(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\n', "\r\n")
}

fn row(word: &Word, columns: &[Column]) -> Vec<String> {
    let mut cells = Vec::new();
    for column in columns {
        let values: Vec<String> = match FieldName::from_name(&column.name) {
            Some(field) => word.values(field),
            None => extra_values(word, &column.name)
                .into_iter()
                .map(str::to_string)
                .collect(),
        };
        for idx in 0..column.count {
            cells.push(values.get(idx).map(|v| to_crlf(v)).unwrap_or_default());
        }
    }
    cells
}

/// Renders the CSV body.
pub fn write_csv(dictionary: &Dictionary) -> Result<Vec<u8>> {
    let columns = columns(dictionary.words());
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    let header: Vec<&str> = columns
        .iter()
        .flat_map(|c| std::iter::repeat(c.name.as_str()).take(c.count))
        .collect();
    writer.write_record(&header)?;
    for word in dictionary.words() {
        writer.write_record(row(word, &columns))?;
    }

    writer
        .into_inner()
        .map_err(|e| DictionaryError::Io(e.into_error()))
}

pub fn serialize(
    dictionary: &Dictionary,
    _options: &SerializeOptions,
    _ctx: &mut Context,
) -> Result<SerializedDictionary> {
    info!("Serializing {} words as generic", dictionary.len());
    ensure_not_empty(dictionary)?;
    let csv = write_csv(dictionary)?;

    if dictionary.files().is_empty() {
        return Ok(SerializedDictionary {
            bytes: csv,
            file_name: output_file_name(dictionary, "csv"),
            mime: CSV_MIME,
        });
    }

    debug!("Bundling {} media files", dictionary.files().len());
    let members = std::iter::once((CSV_MEMBER, csv.as_slice())).chain(
        dictionary
            .files()
            .iter()
            .map(|f| (f.name.as_str(), f.bytes.as_slice())),
    );
    Ok(SerializedDictionary {
        bytes: archive::write_members(members)?,
        file_name: output_file_name(dictionary, "zip"),
        mime: ZIP_MIME,
    })
}
