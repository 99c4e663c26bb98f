//! Tests for PNG encoding of rendered heatmaps.

use std::io::Read;

use blazemap::png::{create_png, create_png_indexed, PngError};
use blazemap::{Blazemap, HeatmapOptions, Rgba, SequentialDispatch};
use test_utils::sample_points;

// ============================================================================
// Helper functions
// ============================================================================

/// Split a PNG into (type, data) chunks after checking the signature.
fn chunks(png: &[u8]) -> Vec<([u8; 4], Vec<u8>)> {
    assert_eq!(&png[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    let mut out = Vec::new();
    let mut pos = 8;
    while pos < png.len() {
        let len = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
        let kind: [u8; 4] = png[pos + 4..pos + 8].try_into().unwrap();
        let data = png[pos + 8..pos + 8 + len].to_vec();
        let crc = u32::from_be_bytes(png[pos + 8 + len..pos + 12 + len].try_into().unwrap());

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&kind);
        hasher.update(&data);
        assert_eq!(hasher.finalize(), crc, "bad CRC on {:?}", kind);

        out.push((kind, data));
        pos += 12 + len;
    }
    out
}

fn inflate(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .unwrap();
    out
}

fn kinds(chunks: &[([u8; 4], Vec<u8>)]) -> Vec<&[u8]> {
    chunks.iter().map(|(k, _)| &k[..]).collect()
}

// ============================================================================
// RGBA encoding
// ============================================================================

#[test]
fn test_create_png_rgba() {
    let pixels = [
        255, 0, 0, 255, 0, 255, 0, 255, //
        0, 0, 255, 255, 0, 0, 0, 0,
    ];
    let png = create_png(&pixels, 2, 2).unwrap();
    let parsed = chunks(&png);

    assert_eq!(kinds(&parsed), vec![&b"IHDR"[..], &b"IDAT"[..], &b"IEND"[..]]);
    let ihdr = &parsed[0].1;
    assert_eq!(&ihdr[0..4], &2u32.to_be_bytes());
    assert_eq!(&ihdr[4..8], &2u32.to_be_bytes());
    assert_eq!(ihdr[9], 6);

    let raw = inflate(&parsed[1].1);
    assert_eq!(raw.len(), 2 * (1 + 2 * 4));
    assert_eq!(raw[0], 0);
    assert_eq!(&raw[1..9], &pixels[..8]);
}

#[test]
fn test_create_png_wrong_buffer_size() {
    let err = create_png(&[0u8; 15], 2, 2).unwrap_err();
    assert!(matches!(err, PngError::BufferSize { expected: 16, actual: 15, .. }));
}

// ============================================================================
// Indexed encoding
// ============================================================================

#[test]
fn test_indexed_png_writes_transparency() {
    let palette = [Rgba::new(0, 0, 0, 0), Rgba::new(255, 255, 255, 255)];
    let png = create_png_indexed(&[0, 1, 1, 0], 2, 2, &palette).unwrap();
    let parsed = chunks(&png);

    assert_eq!(
        kinds(&parsed),
        vec![&b"IHDR"[..], &b"PLTE"[..], &b"tRNS"[..], &b"IDAT"[..], &b"IEND"[..]]
    );
    assert_eq!(parsed[0].1[9], 3);
    assert_eq!(parsed[1].1, vec![0, 0, 0, 255, 255, 255]);
    assert_eq!(parsed[2].1, vec![0, 255]);
    assert_eq!(inflate(&parsed[3].1), vec![0, 0, 1, 0, 1, 0]);
}

#[test]
fn test_indexed_png_opaque_palette_skips_trns() {
    let palette = [Rgba::new(10, 20, 30, 255)];
    let png = create_png_indexed(&[0; 9], 3, 3, &palette).unwrap();
    assert!(!kinds(&chunks(&png)).contains(&&b"tRNS"[..]));
}

#[test]
fn test_indexed_png_palette_limits() {
    assert!(matches!(
        create_png_indexed(&[0], 1, 1, &[]),
        Err(PngError::PaletteSize(0))
    ));
    let big = vec![Rgba::TRANSPARENT; 257];
    assert!(matches!(
        create_png_indexed(&[0], 1, 1, &big),
        Err(PngError::PaletteSize(257))
    ));
}

// ============================================================================
// Heatmap output
// ============================================================================

#[test]
fn test_heatmap_to_indexed_png() {
    let options = HeatmapOptions {
        width: 200,
        height: 200,
        ..Default::default()
    };
    let mut map = Blazemap::with_dispatch(options, Box::new(SequentialDispatch)).unwrap();
    map.set_points(&sample_points()).unwrap();

    let indices = map.render_indexed().unwrap();
    let png = create_png_indexed(&indices, 200, 200, map.color_scale().unwrap().entries()).unwrap();
    let parsed = chunks(&png);

    assert_eq!(parsed[1].1.len(), 256 * 3);
    let idat: Vec<u8> = parsed
        .iter()
        .filter(|(k, _)| k == b"IDAT")
        .flat_map(|(_, d)| d.clone())
        .collect();
    let raw = inflate(&idat);
    assert_eq!(raw.len(), 200 * 201);
    // Row 100 starts with a filter byte, pixel (100, 100) sits on a point
    assert!(raw[100 * 201 + 1 + 100] > 0);
}

#[test]
fn test_heatmap_frame_to_rgba_png() {
    let options = HeatmapOptions {
        width: 50,
        height: 40,
        ..Default::default()
    };
    let mut map = Blazemap::with_dispatch(options, Box::new(SequentialDispatch)).unwrap();
    let frame = map.render().unwrap();
    let png = create_png(&frame.to_rgba8(), 50, 40).unwrap();
    assert_eq!(chunks(&png).last().unwrap().0, *b"IEND");
}
