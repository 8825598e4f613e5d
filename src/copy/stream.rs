//! Streamed data transfer for the async pipeline.
//!
//! A reader future and a writer future run concurrently, joined by a bounded
//! channel of chunks. The first failure on either side is stored in a
//! single-assignment slot; whoever claims it first is the error the copy
//! reports. A read failure makes the writer stop at its next chunk, so a
//! writer that then closes cleanly cannot mask it.

use crate::error::{Error, Result};
use crate::progress::ProgressTracker;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Size of a chunk handed from the reader to the writer.
const CHUNK_SIZE: usize = 64 * 1024;

/// Chunks allowed in flight between reader and writer.
const CHANNEL_DEPTH: usize = 4;

/// First-error-wins slot shared by the two halves of the pipeline.
#[derive(Default)]
struct ErrorSlot(OnceLock<Error>);

impl ErrorSlot {
    /// Store `error` unless another one got there first.
    fn claim(&self, error: Error) {
        let _ = self.0.set(error);
    }

    fn is_claimed(&self) -> bool {
        self.0.get().is_some()
    }

    fn take(self) -> Option<Error> {
        self.0.into_inner()
    }
}

/// Copy `reader` into `writer` through a reader/writer pair of futures.
///
/// Returns the number of bytes the writer accepted. The writer is flushed
/// on success but not synced.
pub(crate) async fn streamed_copy<R, W>(
    reader: &mut R,
    writer: &mut W,
    source: &Path,
    destination: &Path,
    tracker: &mut ProgressTracker,
) -> Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let slot = ErrorSlot::default();
    let (tx, mut rx) = mpsc::channel::<Vec<u8>>(CHANNEL_DEPTH);

    let read_side = {
        let slot = &slot;
        async move {
            loop {
                let mut chunk = vec![0u8; CHUNK_SIZE];
                match reader.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => {
                        chunk.truncate(n);
                        // Receiver gone means the writer already failed
                        if tx.send(chunk).await.is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        slot.claim(Error::Read {
                            path: source.to_path_buf(),
                            source: e,
                        });
                        break;
                    }
                }
            }
            drop(tx);
        }
    };

    let write_side = {
        let slot = &slot;
        async move {
            let mut written = 0u64;
            while let Some(chunk) = rx.recv().await {
                if slot.is_claimed() {
                    break;
                }
                if let Err(e) = writer.write_all(&chunk).await {
                    slot.claim(Error::Write {
                        path: destination.to_path_buf(),
                        source: e,
                    });
                    break;
                }
                written += chunk.len() as u64;
                tracker.update(written);
            }
            drop(rx);

            if !slot.is_claimed() {
                if let Err(e) = writer.flush().await {
                    slot.claim(Error::Write {
                        path: destination.to_path_buf(),
                        source: e,
                    });
                }
            }
            written
        }
    };

    let ((), written) = tokio::join!(read_side, write_side);

    match slot.take() {
        Some(error) => Err(error),
        None => Ok(written),
    }
}
