//! Chunked body iteration
//!
//! Re-chunks an engine byte stream into pieces of at most `chunk_size`
//! bytes. Iterators own their source, so a body can only be walked once.

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};

use crate::error::Result;

/// Chunk size used when the caller has no preference.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Lazy, single-pass sequence of body chunks.
pub struct ContentChunks {
    source: BoxStream<'static, Result<Bytes>>,
    pending: Bytes,
    chunk_size: usize,
    finished: bool,
}

impl ContentChunks {
    /// Wrap a byte stream. A `chunk_size` of 0 is treated as 1.
    pub fn new(source: BoxStream<'static, Result<Bytes>>, chunk_size: usize) -> Self {
        Self {
            source,
            pending: Bytes::new(),
            chunk_size: chunk_size.max(1),
            finished: false,
        }
    }

    /// Iterate over an already buffered body.
    pub fn from_bytes(body: Bytes, chunk_size: usize) -> Self {
        Self::new(stream::once(async move { Ok(body) }).boxed(), chunk_size)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Next chunk, or `None` once the body is exhausted.
    ///
    /// An error from the source ends the sequence.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        loop {
            if !self.pending.is_empty() {
                let take = self.pending.len().min(self.chunk_size);
                return Ok(Some(self.pending.split_to(take)));
            }
            if self.finished {
                return Ok(None);
            }
            match self.source.next().await {
                Some(Ok(bytes)) => self.pending = bytes,
                Some(Err(e)) => {
                    self.finished = true;
                    return Err(e);
                }
                None => self.finished = true,
            }
        }
    }

    /// Decode the remaining chunks as UTF-8 text.
    pub fn decode_unicode(self) -> TextChunks {
        TextChunks {
            inner: self,
            carry: Vec::new(),
        }
    }

    /// Drain every remaining chunk into one buffer.
    pub async fn collect(mut self) -> Result<Bytes> {
        let mut buffer = Vec::new();
        while let Some(chunk) = self.next_chunk().await? {
            buffer.extend_from_slice(&chunk);
        }
        Ok(Bytes::from(buffer))
    }
}

impl std::fmt::Debug for ContentChunks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentChunks")
            .field("chunk_size", &self.chunk_size)
            .field("pending", &self.pending.len())
            .field("finished", &self.finished)
            .finish()
    }
}

/// Text view over [`ContentChunks`].
///
/// Multi-byte characters split across byte chunks are held back until
/// complete; invalid sequences become U+FFFD.
pub struct TextChunks {
    inner: ContentChunks,
    carry: Vec<u8>,
}

impl TextChunks {
    /// Next decoded piece, or `None` once the body is exhausted.
    pub async fn next_text(&mut self) -> Result<Option<String>> {
        loop {
            match self.inner.next_chunk().await? {
                Some(chunk) => {
                    self.carry.extend_from_slice(&chunk);
                    let text = drain_utf8(&mut self.carry);
                    if !text.is_empty() {
                        return Ok(Some(text));
                    }
                }
                None => {
                    if self.carry.is_empty() {
                        return Ok(None);
                    }
                    // Truncated sequence at end of body
                    let text = String::from_utf8_lossy(&self.carry).into_owned();
                    self.carry.clear();
                    return Ok(Some(text));
                }
            }
        }
    }
}

/// Decode the longest valid prefix of `buf`, leaving an incomplete
/// trailing sequence in place.
fn drain_utf8(buf: &mut Vec<u8>) -> String {
    let mut out = String::new();
    loop {
        match std::str::from_utf8(buf) {
            Ok(s) => {
                out.push_str(s);
                buf.clear();
                return out;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&buf[..valid]));
                match e.error_len() {
                    Some(len) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        buf.drain(..valid + len);
                    }
                    None => {
                        buf.drain(..valid);
                        return out;
                    }
                }
            }
        }
    }
}
