//! PNG encoding for rendered heatmaps.
//!
//! Two modes:
//! - **Indexed PNG (color type 3)**: a heatmap never shows more than the 256
//!   colors of its scale, so `render_indexed` output plus the scale as palette
//!   gives the smallest file.
//! - **RGBA PNG (color type 6)**: encodes any [`Frame`](crate::Frame) directly.

use std::io::Write;

use blaze_common::Rgba;
use thiserror::Error;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum palette entries for color type 3.
const MAX_PALETTE_SIZE: usize = 256;

#[derive(Debug, Error)]
pub enum PngError {
    #[error("Buffer holds {actual} bytes, {width}x{height} image needs {expected}")]
    BufferSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Palette must hold 1..={MAX_PALETTE_SIZE} colors, got {0}")]
    PaletteSize(usize),

    #[error("IDAT compression failed: {0}")]
    Compression(#[from] std::io::Error),
}

/// Encode RGBA pixel data (4 bytes per pixel).
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, PngError> {
    check_len(pixels.len(), width * height * 4, width, height)?;

    let mut png = Vec::with_capacity(pixels.len() / 2);
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, 6));

    let idat = deflate_scanlines(pixels, width * 4, height)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode palette indices (1 byte per pixel) against `palette`.
///
/// A tRNS chunk is written only when some palette entry is not fully opaque.
pub fn create_png_indexed(
    indices: &[u8],
    width: usize,
    height: usize,
    palette: &[Rgba],
) -> Result<Vec<u8>, PngError> {
    check_len(indices.len(), width * height, width, height)?;
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(PngError::PaletteSize(palette.len()));
    }

    let mut png = Vec::with_capacity(indices.len() / 4 + palette.len() * 4);
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, 3));

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|c| c.a < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c.a).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(indices, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn check_len(actual: usize, expected: usize, width: usize, height: usize) -> Result<(), PngError> {
    if actual != expected {
        return Err(PngError::BufferSize {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(())
}

fn header(width: usize, height: usize, color_type: u8) -> [u8; 13] {
    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&(width as u32).to_be_bytes());
    ihdr[4..8].copy_from_slice(&(height as u32).to_be_bytes());
    ihdr[8] = 8; // bit depth
    ihdr[9] = color_type;
    // compression, filter and interlace methods all 0
    ihdr
}

/// Length, type, data, then CRC over type and data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix every row with filter byte 0 and zlib-compress the result.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> Result<Vec<u8>, PngError> {
    let mut raw = Vec::with_capacity(height * (1 + row_bytes));
    if row_bytes > 0 {
        for row in data.chunks_exact(row_bytes) {
            raw.push(0);
            raw.extend_from_slice(row);
        }
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&raw)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_layout() {
        let mut out = Vec::new();
        write_chunk(&mut out, b"IEND", &[]);
        assert_eq!(&out[0..4], &[0, 0, 0, 0]);
        assert_eq!(&out[4..8], b"IEND");
        // Well-known CRC of an empty IEND chunk
        assert_eq!(&out[8..12], &[0xAE, 0x42, 0x60, 0x82]);
    }

    #[test]
    fn test_header_fields() {
        let ihdr = header(640, 480, 3);
        assert_eq!(&ihdr[0..4], &640u32.to_be_bytes());
        assert_eq!(&ihdr[4..8], &480u32.to_be_bytes());
        assert_eq!(ihdr[8], 8);
        assert_eq!(ihdr[9], 3);
    }
}
