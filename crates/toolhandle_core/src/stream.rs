//! Byte streams and the draining primitives used by content decoders.
//!
//! Every decoder drains its input through [`drain`], which reads chunks in
//! stream order, one suspension point per read, until the stream completes.

use crate::error::ToolError;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream};
use futures::StreamExt;

/// A response or request body delivered as a sequence of byte chunks.
pub type ByteStream = BoxStream<'static, Result<Bytes, ToolError>>;

/// Creates a [`ByteStream`] that yields the given chunks in order.
pub fn byte_stream<I, B>(chunks: I) -> ByteStream
where
    I: IntoIterator<Item = B>,
    I::IntoIter: Send + 'static,
    B: Into<Bytes>,
{
    stream::iter(chunks.into_iter().map(|chunk| Ok(chunk.into()))).boxed()
}

/// Reads every chunk of `stream` in order, passing each to `sink`.
///
/// Returns the total number of bytes read.
pub async fn drain<F>(mut stream: ByteStream, mut sink: F) -> Result<usize, ToolError>
where
    F: FnMut(&[u8]),
{
    let mut length = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        length += chunk.len();
        sink(&chunk);
    }
    Ok(length)
}

/// Drains `stream` into one contiguous buffer.
pub async fn read_bytes(stream: ByteStream) -> Result<Bytes, ToolError> {
    let mut buffer = BytesMut::new();
    let length = drain(stream, |chunk| buffer.extend_from_slice(chunk)).await?;
    tracing::trace!(length, "drained byte stream");
    Ok(buffer.freeze())
}

/// Drains `stream` as UTF-8 text.
///
/// Multi-byte sequences split across chunks are reassembled; invalid or
/// truncated sequences decode to U+FFFD. A leading byte order mark is dropped.
pub async fn read_text(stream: ByteStream) -> Result<String, ToolError> {
    let mut decoder = Utf8StreamDecoder::default();
    let mut text = String::new();
    let length = drain(stream, |chunk| decoder.decode(chunk, &mut text)).await?;
    decoder.flush(&mut text);
    tracing::trace!(length, "drained text stream");
    match text.strip_prefix('\u{FEFF}') {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(text),
    }
}

/// Incremental UTF-8 decoder holding back incomplete trailing sequences.
#[derive(Debug, Default)]
pub(crate) struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    /// Decodes `chunk`, appending complete characters to `out`.
    pub(crate) fn decode(&mut self, chunk: &[u8], out: &mut String) {
        let mut buffer = core::mem::take(&mut self.pending);
        buffer.extend_from_slice(chunk);

        let mut rest = buffer.as_slice();
        loop {
            match core::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    return;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Flushes a truncated trailing sequence as a single U+FFFD.
    pub(crate) fn flush(&mut self, out: &mut String) {
        if !self.pending.is_empty() {
            self.pending.clear();
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_chunks(chunks: &[&[u8]]) -> String {
        let mut decoder = Utf8StreamDecoder::default();
        let mut out = String::new();
        for chunk in chunks {
            decoder.decode(chunk, &mut out);
        }
        decoder.flush(&mut out);
        out
    }

    #[test]
    fn multibyte_sequence_split_across_chunks() {
        let bytes = "héllo €".as_bytes();
        // "é" is 2 bytes at offset 1, "€" is 3 bytes at the end.
        let out = decode_chunks(&[&bytes[..2], &bytes[2..7], &bytes[7..8], &bytes[8..]]);
        assert_eq!(out, "héllo €");
    }

    #[test]
    fn invalid_byte_is_replaced() {
        assert_eq!(decode_chunks(&[b"a\xffb"]), "a\u{FFFD}b");
    }

    #[test]
    fn truncated_tail_flushes_replacement() {
        assert_eq!(decode_chunks(&[b"ok\xe2\x82"]), "ok\u{FFFD}");
    }
}
