//! Minimal PNG synthesizer for deterministic binary fixtures.
//!
//! Produces a valid 1×1 RGBA PNG with no image library: signature, IHDR,
//! one zlib-compressed scanline in IDAT, empty IEND. Chunk framing is
//! `length (4, BE) || tag (4) || data || CRC32(tag||data) (4, BE)` with the
//! standard zlib polynomial.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};

/// Fixed 8-byte PNG signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// The reference fixture: 1×1 opaque red.
pub fn sample_png() -> Vec<u8> {
    rgba_1x1([0xFF, 0x00, 0x00, 0xFF])
}

/// Build a 1×1 PNG with the given RGBA pixel.
pub fn rgba_1x1(color: [u8; 4]) -> Vec<u8> {
    // IHDR: width=1, height=1, depth=8, color type 6 (truecolor + alpha),
    // compression/filter/interlace all 0.
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);

    // One scanline: filter byte 0 ("none") + the pixel.
    let mut row = Vec::with_capacity(5);
    row.push(0);
    row.extend_from_slice(&color);
    let idat = zlib_compress(&row);

    let mut png = Vec::with_capacity(64 + idat.len());
    png.extend_from_slice(&PNG_SIGNATURE);
    png.extend_from_slice(&chunk(b"IHDR", &ihdr));
    png.extend_from_slice(&chunk(b"IDAT", &idat));
    png.extend_from_slice(&chunk(b"IEND", &[]));
    png
}

/// Frame one chunk: length, tag, data, CRC32 over tag||data.
fn chunk(tag: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut crc = Crc::new();
    crc.update(tag);
    crc.update(data);

    let mut out = Vec::with_capacity(12 + data.len());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    out
}

fn zlib_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    // Writing into a Vec-backed encoder cannot fail
    encoder.write_all(data).expect("write to Vec");
    encoder.finish().expect("finish to Vec")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    /// Split a PNG byte stream into (tag, data) pairs, verifying framing.
    fn parse_chunks(png: &[u8]) -> Vec<([u8; 4], Vec<u8>)> {
        assert_eq!(&png[..8], &PNG_SIGNATURE);
        let mut chunks = Vec::new();
        let mut pos = 8;
        while pos < png.len() {
            let len = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
            let tag: [u8; 4] = png[pos + 4..pos + 8].try_into().unwrap();
            let data = png[pos + 8..pos + 8 + len].to_vec();
            let stored_crc =
                u32::from_be_bytes(png[pos + 8 + len..pos + 12 + len].try_into().unwrap());

            let mut crc = Crc::new();
            crc.update(&tag);
            crc.update(&data);
            assert_eq!(stored_crc, crc.sum(), "bad CRC for {:?}", tag);

            chunks.push((tag, data));
            pos += 12 + len;
        }
        chunks
    }

    #[test]
    fn test_signature() {
        let png = sample_png();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_chunk_sequence() {
        let chunks = parse_chunks(&sample_png());
        let tags: Vec<&[u8; 4]> = chunks.iter().map(|(t, _)| t).collect();
        assert_eq!(tags, vec![b"IHDR", b"IDAT", b"IEND"]);
    }

    #[test]
    fn test_ihdr_fields() {
        let chunks = parse_chunks(&sample_png());
        let (_, ihdr) = &chunks[0];
        assert_eq!(ihdr.len(), 13);
        assert_eq!(u32::from_be_bytes(ihdr[0..4].try_into().unwrap()), 1); // width
        assert_eq!(u32::from_be_bytes(ihdr[4..8].try_into().unwrap()), 1); // height
        assert_eq!(ihdr[8], 8); // bit depth
        assert_eq!(ihdr[9], 6); // color type: truecolor + alpha
        assert_eq!(&ihdr[10..13], &[0, 0, 0]);
    }

    #[test]
    fn test_idat_round_trips_to_red_scanline() {
        let chunks = parse_chunks(&sample_png());
        let (_, idat) = &chunks[1];

        let mut decoder = flate2::read::ZlibDecoder::new(idat.as_slice());
        let mut row = Vec::new();
        decoder.read_to_end(&mut row).unwrap();

        assert_eq!(row, vec![0x00, 0xFF, 0x00, 0x00, 0xFF]);
    }

    #[test]
    fn test_iend_is_empty_with_known_crc() {
        let png = sample_png();
        let chunks = parse_chunks(&png);
        let (_, iend) = &chunks[2];
        assert!(iend.is_empty());
        // CRC32("IEND") is a well-known constant
        assert_eq!(&png[png.len() - 4..], &0xAE42_6082u32.to_be_bytes());
    }

    #[test]
    fn test_custom_pixel_color() {
        let png = rgba_1x1([0x12, 0x34, 0x56, 0x78]);
        let chunks = parse_chunks(&png);
        let (_, idat) = &chunks[1];

        let mut decoder = flate2::read::ZlibDecoder::new(idat.as_slice());
        let mut row = Vec::new();
        decoder.read_to_end(&mut row).unwrap();
        assert_eq!(row, vec![0x00, 0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_output_is_deterministic() {
        assert_eq!(sample_png(), sample_png());
    }

    #[test]
    fn test_zlib_round_trip() {
        let row = vec![0u8, 255, 0, 0, 255];
        let compressed = zlib_compress(&row);
        let mut decoder = flate2::read::ZlibDecoder::new(compressed.as_slice());
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, row);
    }
}
