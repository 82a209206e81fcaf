//! Exclusive-create file copy implementation

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;

/// Result of one copy attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// A new destination file was written
    Copied { bytes: u64 },

    /// The destination appeared between the existence probe and the
    /// copy; nothing was written
    AlreadyPresent,
}

/// Copy `src` to `dest` as an exact byte stream, creating `dest` exclusively.
///
/// The destination is opened with `create_new`, so an existing file is
/// never truncated or overwritten: a file that appeared after the
/// caller's existence probe turns into `AlreadyPresent` instead of a
/// write. The copy is flushed to disk before returning, so a returned
/// `Copied` means the destination holds the full source content.
///
/// A read or write error mid-stream can leave a partial destination
/// file behind; callers report that outcome rather than hiding it.
///
/// # Arguments
/// * `src` - Source file path
/// * `dest` - Destination file path (must not exist)
///
/// # Returns
/// * `Ok(CopyOutcome::Copied { bytes })` - Number of bytes copied
/// * `Ok(CopyOutcome::AlreadyPresent)` - Destination already existed
/// * `Err(io::Error)` - Read or write failure
pub fn copy_missing(src: &Path, dest: &Path) -> io::Result<CopyOutcome> {
    let mut src_file = File::open(src)?;

    let mut dest_file = match OpenOptions::new().write(true).create_new(true).open(dest) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(CopyOutcome::AlreadyPresent),
        Err(e) => return Err(e),
    };

    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer)?;

        if bytes_read == 0 {
            break; // EOF
        }

        dest_file.write_all(&buffer[0..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    // Force OS to write data to physical disk before reporting success.
    dest_file.sync_all()?;

    Ok(CopyOutcome::Copied { bytes: total_bytes })
}
