//! ZIP container I/O for the generic format.

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use log::{debug, trace};
use tempfile::SpooledTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::dictionary::types::error::Result;

/// In-memory size above which archive output spills to a temporary file.
const SPOOL_THRESHOLD: usize = 8 * 1024 * 1024;

/// One regular file read from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    /// Full path inside the archive, `/`-separated.
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Whether `bytes` start with a local file header or an empty-archive record.
pub fn is_zip(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK\x03\x04") || bytes.starts_with(b"PK\x05\x06")
}

/// Upper bound on the buffer reserved up front for one member.
const PREALLOCATION_LIMIT: u64 = 1 << 20;

/// Reads every regular file of a ZIP archive.
pub fn read_members(bytes: &[u8]) -> Result<Vec<ArchiveMember>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    debug!("Archive has {} entries", archive.len());

    let mut members = Vec::with_capacity(archive.len());
    for idx in 0..archive.len() {
        let mut file = archive.by_index(idx)?;
        if file.is_dir() {
            continue;
        }
        let path = file.name().replace('\\', "/");
        // the declared size is untrusted
        let mut buf = Vec::with_capacity(file.size().min(PREALLOCATION_LIMIT) as usize);
        file.read_to_end(&mut buf)?;
        trace!("Read member {} ({} bytes)", path, buf.len());
        members.push(ArchiveMember { path, bytes: buf });
    }
    Ok(members)
}

/// Writes `members` into a deflated ZIP archive.
///
/// The archive is assembled in a spooled temporary file that is removed
/// when this call returns, on success or failure.
pub fn write_members<'a>(members: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(SpooledTempFile::new(SPOOL_THRESHOLD));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in members {
        trace!("Writing member {} ({} bytes)", name, bytes.len());
        writer.start_file(name, options)?;
        writer.write_all(bytes)?;
    }

    let mut spooled = writer.finish()?;
    spooled.seek(SeekFrom::Start(0))?;
    let mut out = Vec::new();
    spooled.read_to_end(&mut out)?;
    debug!("Archive written ({} bytes)", out.len());
    Ok(out)
}
