//! Fixed-buffer data transfer for the blocking pipeline.

use crate::error::{Error, Result};
use crate::progress::ProgressTracker;
use std::io::{self, Read, Write};
use std::path::Path;

/// Size of the buffer used by the blocking copy loop (100 KiB).
pub const BUFFER_SIZE: usize = 100 * 1024;

/// Read until `buf` is full or the reader is exhausted.
///
/// A short return therefore always means end of file.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Copy `reader` into `writer` through one [`BUFFER_SIZE`] buffer.
///
/// Each chunk read is written out exactly, the running offset is reported
/// to `tracker`, and the loop stops after the first chunk shorter than the
/// buffer. An empty source performs one zero-length write. The writer is
/// flushed but not synced; the caller decides about `sync_all`.
pub(crate) fn buffered_copy<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    source: &Path,
    destination: &Path,
    tracker: &mut ProgressTracker,
) -> Result<u64> {
    let mut buf = vec![0u8; BUFFER_SIZE];
    let mut offset = 0u64;

    loop {
        let n = fill(reader, &mut buf).map_err(|e| Error::Read {
            path: source.to_path_buf(),
            source: e,
        })?;

        let written = if n == 0 {
            // write_all skips empty slices; the terminal write still happens
            writer.write(&[]).map(drop)
        } else {
            writer.write_all(&buf[..n])
        };
        written.map_err(|e| Error::Write {
            path: destination.to_path_buf(),
            source: e,
        })?;

        offset += n as u64;
        tracker.update(offset);

        if n < buf.len() {
            break;
        }
    }

    writer.flush().map_err(|e| Error::Write {
        path: destination.to_path_buf(),
        source: e,
    })?;

    Ok(offset)
}
