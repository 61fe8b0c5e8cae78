//! Generic format parser.
//!
//! The input is either a bare CSV stream or a ZIP archive holding
//! `dictionary.csv` plus media files. Media members are validated by the
//! media collaborator, flattened to their base name and renamed through the
//! archive filename validator; field values naming a renamed member are
//! rewritten to the new name before the words are built.

use log::{debug, info, trace};

use super::finish;
use crate::dictionary::codec::archive::{self, ArchiveMember};
use crate::dictionary::codec::encoding::detect_and_decode;
use crate::dictionary::collab::media::extension_for_mime;
use crate::dictionary::context::Context;
use crate::dictionary::types::error::{DictionaryError, Result};
use crate::dictionary::types::formats::ParseOptions;
use crate::dictionary::types::models::{Dictionary, FieldMap, FieldName, MediaFile};
use crate::dictionary::utils::{normalize_newlines, strip_control_characters};
use crate::dictionary::validate::{file_location, filename};

/// Name of the CSV member of an archive.
pub const CSV_MEMBER: &str = "dictionary.csv";

/// An archive member kept under a new name.
struct Rename {
    from: String,
    to: String,
}

fn is_ignored_member(path: &str) -> bool {
    path.starts_with("__MACOSX/")
        || path.split('/').any(|part| part.starts_with('.'))
}

/// Splits an archive into its CSV bytes and validated media files.
fn unpack(input: &[u8], ctx: &mut Context) -> Result<(Vec<u8>, Vec<MediaFile>, Vec<Rename>)> {
    let members = archive::read_members(input)?;
    let mut csv = None;
    let mut files: Vec<MediaFile> = Vec::new();
    let mut renames = Vec::new();

    for ArchiveMember { path, bytes } in members {
        if path == CSV_MEMBER {
            csv = Some(bytes);
            continue;
        }
        if is_ignored_member(&path) {
            ctx.diagnostics
                .notice(format!("`{}` is a hidden or system file; it was ignored", path));
            continue;
        }

        let declared = file_location::basename(&path).to_string();
        let media = ctx.collaborators.media.validate(bytes, &declared)?;
        ctx.diagnostics.extend(media.diagnostics);

        let stem = declared.rsplit_once('.').map(|(s, _)| s).unwrap_or(&declared);
        let with_extension = format!("{}.{}", stem, extension_for_mime(media.mime));
        let existing: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        let corrected = filename::correct(
            &with_extension,
            media.kind.extensions(),
            &existing,
            ctx.collaborators.romanizer.as_ref(),
        );
        ctx.diagnostics.extend(corrected.diagnostics);

        trace!("Bundled `{}` as `{}` ({})", path, corrected.value, media.mime);
        if corrected.value != declared {
            renames.push(Rename {
                from: declared,
                to: corrected.value.clone(),
            });
        }
        files.push(MediaFile {
            name: corrected.value,
            mime: media.mime.to_string(),
            bytes: media.bytes,
        });
    }

    let csv = csv.ok_or_else(|| {
        DictionaryError::Syntax(format!("the archive has no `{}` member", CSV_MEMBER))
    })?;
    debug!("Unpacked {} media files", files.len());
    Ok((csv, files, renames))
}

fn is_media_field(name: &str) -> bool {
    matches!(
        FieldName::from_name(name),
        Some(FieldName::Image | FieldName::Audio | FieldName::Video)
    )
}

fn apply_renames<'a>(name: &str, value: &'a str, renames: &'a [Rename]) -> &'a str {
    if !is_media_field(name) {
        return value;
    }
    renames
        .iter()
        .find(|r| r.from == value || r.from.eq_ignore_ascii_case(value))
        .map(|r| r.to.as_str())
        .unwrap_or(value)
}

/// Reads every CSV record, normalized to LF and stripped of control characters.
fn read_records(csv_bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let (text, encoding) = detect_and_decode(csv_bytes)?;
    debug!("CSV encoding: {}", encoding.name());
    let text = strip_control_characters(&normalize_newlines(&text));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok(records)
}

pub fn parse(input: &[u8], options: &ParseOptions, ctx: &mut Context) -> Result<Dictionary> {
    info!("Parsing generic dictionary ({} bytes)", input.len());
    let (csv_bytes, files, renames) = if archive::is_zip(input) {
        unpack(input, ctx)?
    } else {
        (input.to_vec(), Vec::new(), Vec::new())
    };

    let mut records = read_records(&csv_bytes)?.into_iter();
    let mut dictionary = Dictionary::with_files(files);

    let Some(first) = records.next() else {
        return Err(DictionaryError::Syntax("the CSV contains no records".to_string()));
    };
    let has_header = options
        .header
        .unwrap_or_else(|| first.iter().any(|cell| cell.trim() == FieldName::Text.as_str()));

    let header: Option<Vec<String>> = has_header.then(|| first.iter().map(|c| c.trim().to_string()).collect());
    let data = if has_header {
        Box::new(records) as Box<dyn Iterator<Item = Vec<String>>>
    } else {
        Box::new(std::iter::once(first).chain(records))
    };

    for (idx, record) in data.enumerate() {
        let record_no = idx + if has_header { 2 } else { 1 };
        let mut fields = FieldMap::new();

        for (col, value) in record.iter().enumerate() {
            let name = match &header {
                Some(names) => match names.get(col) {
                    Some(name) => name.as_str(),
                    None => {
                        return Err(DictionaryError::Syntax(format!(
                            "record {}: {} fields, but the header has {}",
                            record_no,
                            record.len(),
                            names.len()
                        )))
                    }
                },
                None if col == 0 => FieldName::Text.as_str(),
                None => FieldName::Answer.as_str(),
            };
            if name.is_empty() || value.trim().is_empty() {
                continue;
            }
            fields.push(name, apply_renames(name, value, &renames));
        }

        dictionary
            .add_word(&fields, ctx)
            .map_err(|e| DictionaryError::Syntax(format!("record {}: {}", record_no, e)))?;
    }

    finish(&mut dictionary, options, ctx)?;
    info!(
        "Parsed {} words and {} media files",
        dictionary.len(),
        dictionary.files().len()
    );
    Ok(dictionary)
}
