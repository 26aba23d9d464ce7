//! Minimal PNG encoder for 8-bit truecolor+alpha images.
//!
//! The output is always a signature followed by exactly three chunks:
//! IHDR, a single IDAT holding the zlib-compressed scanlines (filter type 0
//! on every row), and an empty IEND. A small chunk reader is provided for
//! inspecting and verifying files produced here or elsewhere.

use crate::crc32::Hasher;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use std::{fs, io, path::Path};
use thiserror::Error;

/// The fixed 8-byte PNG file signature.
pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Largest chunk payload PNG allows.
pub const MAX_CHUNK_LEN: u32 = i32::MAX as u32;

/// Bytes per RGBA8888 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

const BIT_DEPTH: u8 = 8;
const COLOR_TYPE_RGBA: u8 = 6;
const FILTER_NONE: u8 = 0;

#[derive(Error, Debug)]
pub enum PngError {
    /// The pixel buffer is not exactly `width * height * 4` bytes long
    #[error("pixel buffer must be RGBA8888 for {width}x{height}, got {actual} bytes")]
    InvalidBufferSize { width: u32, height: u32, actual: usize },

    /// PNG does not allow empty images
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("missing PNG signature")]
    InvalidSignature,

    #[error("truncated chunk at byte offset {offset}")]
    Truncated { offset: usize },

    #[error("CRC mismatch in {tag} chunk: stored {stored:#010x}, computed {computed:#010x}")]
    CrcMismatch {
        tag: String,
        stored: u32,
        computed: u32,
    },

    /// PNG chunk lengths are limited to 2^31 - 1 bytes
    #[error("{tag} chunk payload of {len} bytes exceeds the PNG chunk size limit")]
    ChunkTooLarge { tag: String, len: usize },

    #[error("malformed IHDR chunk ({0} bytes)")]
    InvalidHeader(usize),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PngError>;

/// Contents of the IHDR chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression: u8,
    pub filter: u8,
    pub interlace: u8,
}

impl ImageHeader {
    /// Header for an 8-bit RGBA, non-interlaced image.
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bit_depth: BIT_DEPTH,
            color_type: COLOR_TYPE_RGBA,
            compression: 0,
            filter: 0,
            interlace: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; 13] {
        let mut out = [0u8; 13];
        out[0..4].copy_from_slice(&self.width.to_be_bytes());
        out[4..8].copy_from_slice(&self.height.to_be_bytes());
        out[8] = self.bit_depth;
        out[9] = self.color_type;
        out[10] = self.compression;
        out[11] = self.filter;
        out[12] = self.interlace;
        out
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() != 13 {
            return Err(PngError::InvalidHeader(data.len()));
        }
        let be = |i: usize| u32::from_be_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
        Ok(Self {
            width: be(0),
            height: be(4),
            bit_depth: data[8],
            color_type: data[9],
            compression: data[10],
            filter: data[11],
            interlace: data[12],
        })
    }
}

/// A single length-tag-data-CRC block of a PNG stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub tag: [u8; 4],
    pub data: Vec<u8>,
    pub crc: u32,
}

impl Chunk {
    /// Build a chunk, computing its CRC over tag + data.
    pub fn new(tag: &[u8; 4], data: Vec<u8>) -> Self {
        let crc = chunk_crc(tag, &data);
        Self {
            tag: *tag,
            data,
            crc,
        }
    }

    pub fn tag_str(&self) -> &str {
        std::str::from_utf8(&self.tag).unwrap_or("????")
    }

    /// Payload length as stored in the chunk header.
    pub fn length(&self) -> Result<u32> {
        chunk_length(&self.tag, self.data.len())
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&self.length()?.to_be_bytes());
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&self.crc.to_be_bytes());
        Ok(())
    }

    /// Serialized size: length + tag + data + CRC.
    pub fn encoded_len(&self) -> usize {
        12 + self.data.len()
    }
}

fn chunk_length(tag: &[u8; 4], len: usize) -> Result<u32> {
    u32::try_from(len)
        .ok()
        .filter(|&n| n <= MAX_CHUNK_LEN)
        .ok_or_else(|| PngError::ChunkTooLarge {
            tag: String::from_utf8_lossy(tag).into_owned(),
            len,
        })
}

fn chunk_crc(tag: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(tag);
    hasher.update(data);
    hasher.finalize()
}

fn validate(width: u32, height: u32, pixels: &[u8]) -> Result<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL));
    if expected != Some(pixels.len()) {
        return Err(PngError::InvalidBufferSize {
            width,
            height,
            actual: pixels.len(),
        });
    }
    if width == 0 || height == 0 {
        return Err(PngError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Prefix every row with its filter-type byte.
fn frame_scanlines(width: u32, pixels: &[u8]) -> Vec<u8> {
    let stride = width as usize * BYTES_PER_PIXEL;
    let rows = pixels.len() / stride;
    let mut raw = Vec::with_capacity(pixels.len() + rows);
    for row in pixels.chunks_exact(stride) {
        raw.push(FILTER_NONE);
        raw.extend_from_slice(row);
    }
    raw
}

/// Encode an RGBA8888 buffer as a complete PNG byte stream.
pub fn encode(width: u32, height: u32, pixels: &[u8]) -> Result<Vec<u8>> {
    validate(width, height, pixels)?;

    let raw = frame_scanlines(width, pixels);
    let compressed = compress_to_vec_zlib(&raw, CompressionLevel::BestCompression as u8);
    log::debug!(
        "{}x{}: {} scanline bytes deflated to {}",
        width,
        height,
        raw.len(),
        compressed.len()
    );

    let chunks = [
        Chunk::new(b"IHDR", ImageHeader::rgba8(width, height).to_bytes().to_vec()),
        Chunk::new(b"IDAT", compressed),
        Chunk::new(b"IEND", Vec::new()),
    ];

    let total = SIGNATURE.len() + chunks.iter().map(Chunk::encoded_len).sum::<usize>();
    let mut png = Vec::with_capacity(total);
    png.extend_from_slice(&SIGNATURE);
    for chunk in &chunks {
        chunk.write_to(&mut png)?;
    }
    Ok(png)
}

/// Encode `pixels` and write the result to `path`, creating parent
/// directories as needed. Nothing touches the filesystem unless encoding
/// succeeded.
pub fn write_png(path: &Path, width: u32, height: u32, pixels: &[u8]) -> Result<()> {
    let png = encode(width, height, pixels)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, png)?;
    Ok(())
}

/// Split a PNG byte stream into its chunks, verifying the signature and
/// every chunk CRC.
pub fn read_chunks(bytes: &[u8]) -> Result<Vec<Chunk>> {
    if bytes.len() < SIGNATURE.len() || bytes[..SIGNATURE.len()] != SIGNATURE {
        return Err(PngError::InvalidSignature);
    }

    let mut chunks = Vec::new();
    let mut offset = SIGNATURE.len();
    while offset < bytes.len() {
        let header = bytes
            .get(offset..offset + 8)
            .ok_or(PngError::Truncated { offset })?;
        let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let tag = [header[4], header[5], header[6], header[7]];

        let data_start = offset + 8;
        let data_end = data_start
            .checked_add(len)
            .ok_or(PngError::Truncated { offset })?;
        let crc_end = data_end
            .checked_add(4)
            .ok_or(PngError::Truncated { offset })?;
        let data = bytes
            .get(data_start..data_end)
            .ok_or(PngError::Truncated { offset })?;
        let crc_bytes = bytes
            .get(data_end..crc_end)
            .ok_or(PngError::Truncated { offset })?;
        let stored = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

        let chunk = Chunk::new(&tag, data.to_vec());
        if chunk.crc != stored {
            return Err(PngError::CrcMismatch {
                tag: chunk.tag_str().to_string(),
                stored,
                computed: chunk.crc,
            });
        }
        offset += chunk.encoded_len();
        chunks.push(chunk);
    }
    Ok(chunks)
}
