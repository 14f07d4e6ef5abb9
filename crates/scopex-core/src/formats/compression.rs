//! Compression codecs for tarball containers.
//!
//! Export tarballs are usually xz-compressed, but the codec is sniffed from
//! the stream's magic bytes rather than trusted from the file name.

use std::io::BufRead;
use std::io::Read;

/// Compression codec wrapping a tarball.
///
/// # Examples
///
/// ```
/// use scopex_core::formats::compression::CompressionCodec;
///
/// let xz_magic = [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, 0x00];
/// assert_eq!(CompressionCodec::from_magic(&xz_magic), Some(CompressionCodec::Xz));
/// assert_eq!(CompressionCodec::from_magic(b"PK\x03\x04"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip (deflate).
    Gzip,
    /// Bzip2.
    Bzip2,
    /// Xz (LZMA2).
    Xz,
    /// Zstandard.
    Zstd,
}

impl CompressionCodec {
    /// Number of leading bytes needed to recognize every codec.
    pub const MAGIC_LEN: usize = 6;

    /// Recognizes a codec from the first bytes of a stream.
    #[must_use]
    pub fn from_magic(header: &[u8]) -> Option<Self> {
        match header {
            [0x1F, 0x8B, ..] => Some(Self::Gzip),
            [b'B', b'Z', b'h', ..] => Some(Self::Bzip2),
            [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, ..] => Some(Self::Xz),
            [0x28, 0xB5, 0x2F, 0xFD, ..] => Some(Self::Zstd),
            _ => None,
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    /// Wraps `reader` in a streaming decoder for this codec.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder cannot be initialized (zstd only).
    pub fn decoder<'a, R: BufRead + 'a>(self, reader: R) -> std::io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Self::Gzip => Box::new(flate2::bufread::MultiGzDecoder::new(reader)),
            Self::Bzip2 => Box::new(bzip2::bufread::MultiBzDecoder::new(reader)),
            Self::Xz => Box::new(xz2::bufread::XzDecoder::new_multi_decoder(reader)),
            Self::Zstd => Box::new(zstd::stream::read::Decoder::with_buffer(reader)?),
        })
    }
}
