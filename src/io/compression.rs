//! Pluggable decompression for file-backed sources.
//!
//! Record files are often shipped compressed. [`auto_detect_reader`] wraps a
//! raw reader with the right decoder so [`CsvSource`](crate::io::csv::CsvSource)
//! only ever sees plain text.
//!
//! ## Built-in Codecs
//!
//! When enabled via feature flags, the following codecs are available:
//! - **Gzip** (`.gz`) - via `flate2` crate (feature: `compression-gzip`)
//! - **Zstd** (`.zst`) - via `zstd` crate (feature: `compression-zstd`)
//!
//! Detection checks the file extension first and falls back to magic bytes.
//! Extra codecs can be added with [`register_codec`].
//!
//! ```
//! use relcsv::io::compression::{DecompressionCodec, register_codec};
//! use std::io::Read;
//! use std::sync::Arc;
//!
//! struct Passthrough;
//!
//! impl DecompressionCodec for Passthrough {
//!     fn name(&self) -> &str { "passthrough" }
//!     fn extensions(&self) -> &[&str] { &[".raw"] }
//!     fn magic_bytes(&self) -> Option<&[u8]> { None }
//!     fn wrap_reader(&self, reader: Box<dyn Read + Send>) -> std::io::Result<Box<dyn Read + Send>> {
//!         Ok(reader)
//!     }
//! }
//!
//! register_codec(Arc::new(Passthrough));
//! ```

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

static CODEC_REGISTRY: RwLock<Option<Vec<Arc<dyn DecompressionCodec>>>> = RwLock::new(None);

fn builtin_codecs() -> Vec<Arc<dyn DecompressionCodec>> {
    vec![
        #[cfg(feature = "compression-gzip")]
        Arc::new(GzipCodec),
        #[cfg(feature = "compression-zstd")]
        Arc::new(ZstdCodec),
    ]
}

fn registry() -> Vec<Arc<dyn DecompressionCodec>> {
    let mut lock = CODEC_REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    lock.get_or_insert_with(builtin_codecs).clone()
}

/// Register a custom codec; it is consulted after the built-in ones.
pub fn register_codec(codec: Arc<dyn DecompressionCodec>) {
    let mut lock = CODEC_REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    lock.get_or_insert_with(builtin_codecs).push(codec);
}

/// A decompression algorithm recognised by extension or leading bytes.
pub trait DecompressionCodec: Send + Sync {
    /// Human-readable codec name (e.g., "gzip", "zstd").
    fn name(&self) -> &str;

    /// Lowercase file extensions including the leading dot.
    fn extensions(&self) -> &[&str];

    /// Leading byte signature, if the format has one.
    fn magic_bytes(&self) -> Option<&[u8]>;

    /// Wrap `reader` so that reads yield decompressed bytes.
    fn wrap_reader(&self, reader: Box<dyn Read + Send>) -> std::io::Result<Box<dyn Read + Send>>;
}

fn detect_from_extension(path: &Path) -> Option<Arc<dyn DecompressionCodec>> {
    let path_str = path.to_string_lossy().to_lowercase();
    registry()
        .into_iter()
        .find(|codec| codec.extensions().iter().any(|ext| path_str.ends_with(ext)))
}

/// Peeks without consuming.
fn detect_from_magic<R: BufRead>(reader: &mut R) -> Option<Arc<dyn DecompressionCodec>> {
    let buf = reader.fill_buf().ok()?;
    if buf.is_empty() {
        return None;
    }
    registry()
        .into_iter()
        .find(|codec| codec.magic_bytes().is_some_and(|magic| buf.starts_with(magic)))
}

/// Wrap `reader` with a decoder chosen from `path_hint` or the stream's leading
/// bytes; uncompressed input is returned buffered but otherwise untouched.
///
/// # Errors
/// Returns an error if the chosen codec fails to initialise.
pub fn auto_detect_reader<R: Read + Send + 'static>(
    reader: R,
    path_hint: impl AsRef<Path>,
) -> std::io::Result<Box<dyn Read + Send>> {
    if let Some(codec) = detect_from_extension(path_hint.as_ref()) {
        tracing::debug!(codec = codec.name(), path = %path_hint.as_ref().display(), "decompressing by extension");
        return codec.wrap_reader(Box::new(reader));
    }

    let mut buffered = BufReader::new(reader);
    if let Some(codec) = detect_from_magic(&mut buffered) {
        tracing::debug!(codec = codec.name(), path = %path_hint.as_ref().display(), "decompressing by magic bytes");
        return codec.wrap_reader(Box::new(buffered));
    }

    Ok(Box::new(buffered))
}

#[cfg(feature = "compression-gzip")]
struct GzipCodec;

#[cfg(feature = "compression-gzip")]
impl DecompressionCodec for GzipCodec {
    fn name(&self) -> &str {
        "gzip"
    }

    fn extensions(&self) -> &[&str] {
        &[".gz", ".gzip"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0x1f, 0x8b])
    }

    fn wrap_reader(&self, reader: Box<dyn Read + Send>) -> std::io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(flate2::read::MultiGzDecoder::new(reader)))
    }
}

#[cfg(feature = "compression-zstd")]
struct ZstdCodec;

#[cfg(feature = "compression-zstd")]
impl DecompressionCodec for ZstdCodec {
    fn name(&self) -> &str {
        "zstd"
    }

    fn extensions(&self) -> &[&str] {
        &[".zst", ".zstd"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0x28, 0xb5, 0x2f, 0xfd])
    }

    fn wrap_reader(&self, reader: Box<dyn Read + Send>) -> std::io::Result<Box<dyn Read + Send>> {
        zstd::stream::read::Decoder::new(reader).map(|d| Box::new(d) as Box<dyn Read + Send>)
    }
}
