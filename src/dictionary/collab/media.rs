//! Media validation for files bundled in a generic-format archive.

use crate::dictionary::types::diagnostics::Diagnostic;
use crate::dictionary::types::error::MediaError;
use crate::dictionary::types::models::MediaKind;

/// A media file accepted by a [`MediaValidator`].
#[derive(Debug, Clone)]
pub struct ValidatedMedia {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub kind: MediaKind,
    pub diagnostics: Vec<Diagnostic>,
}

/// Media collaborator contract.
pub trait MediaValidator {
    /// Validates (and possibly re-encodes) `bytes`, returning the corrected
    /// bytes with their MIME type.
    fn validate(&self, bytes: Vec<u8>, declared_name: &str) -> Result<ValidatedMedia, MediaError>;
}

/// Soft and hard size ceilings for one media kind, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub soft: u64,
    pub hard: u64,
}

const MIB: u64 = 1024 * 1024;

/// Identifies media by magic number and enforces per-kind size ceilings.
/// Content is passed through unchanged.
#[derive(Debug, Clone, Copy)]
pub struct SniffingMediaValidator {
    pub image: SizeLimits,
    pub audio: SizeLimits,
    pub video: SizeLimits,
}

impl Default for SniffingMediaValidator {
    fn default() -> Self {
        Self {
            image: SizeLimits { soft: MIB, hard: 10 * MIB },
            audio: SizeLimits { soft: MIB, hard: 10 * MIB },
            video: SizeLimits { soft: 2 * MIB, hard: 20 * MIB },
        }
    }
}

/// Sniffs the MIME type of `bytes`. `declared_name` disambiguates MP4
/// containers between audio and video.
pub fn sniff(bytes: &[u8], declared_name: &str) -> Option<&'static str> {
    let starts = |magic: &[u8]| bytes.starts_with(magic);

    if starts(b"\x89PNG\r\n\x1a\n") {
        return Some("image/png");
    }
    if starts(b"\xFF\xD8\xFF") {
        return Some("image/jpeg");
    }
    if starts(b"GIF87a") || starts(b"GIF89a") {
        return Some("image/gif");
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if starts(b"OggS") {
        return Some("audio/ogg");
    }
    if starts(b"\x1A\x45\xDF\xA3") {
        return Some("video/webm");
    }
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        let brand = &bytes[8..12];
        let declared_audio = declared_name.to_ascii_lowercase().ends_with(".m4a");
        return Some(if brand == b"M4A " || declared_audio {
            "audio/mp4"
        } else {
            "video/mp4"
        });
    }
    if starts(b"ID3") || (bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0) {
        return Some("audio/mpeg");
    }

    let head = &bytes[..bytes.len().min(1024)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{FEFF}').trim_start();
    if (trimmed.starts_with("<?xml") || trimmed.starts_with("<svg") || trimmed.starts_with("<!--"))
        && text.contains("<svg")
    {
        return Some("image/svg+xml");
    }
    None
}

/// File extension used for a sniffed MIME type.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "audio/mpeg" => "mp3",
        "audio/mp4" => "m4a",
        "audio/ogg" => "ogg",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        _ => "bin",
    }
}

impl SniffingMediaValidator {
    fn limits(&self, kind: MediaKind) -> SizeLimits {
        match kind {
            MediaKind::Image => self.image,
            MediaKind::Audio => self.audio,
            MediaKind::Video => self.video,
        }
    }
}

impl MediaValidator for SniffingMediaValidator {
    fn validate(&self, bytes: Vec<u8>, declared_name: &str) -> Result<ValidatedMedia, MediaError> {
        let mime = sniff(&bytes, declared_name)
            .ok_or_else(|| MediaError::UnsupportedType(declared_name.to_string()))?;
        let kind = MediaKind::from_mime(mime)
            .ok_or_else(|| MediaError::UnsupportedType(declared_name.to_string()))?;

        let size = bytes.len() as u64;
        let limits = self.limits(kind);
        if size > limits.hard {
            return Err(MediaError::TooLarge {
                name: declared_name.to_string(),
                kind: kind.name(),
                size,
                limit: limits.hard,
            });
        }

        let mut diagnostics = Vec::new();
        if size > limits.soft {
            diagnostics.push(Diagnostic::warning(format!(
                "`{}` is {} bytes; {} files should stay under {} bytes",
                declared_name,
                size,
                kind.name(),
                limits.soft
            )));
        }

        Ok(ValidatedMedia {
            bytes,
            mime,
            kind,
            diagnostics,
        })
    }
}
