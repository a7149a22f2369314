//! PNG reading and writing for [`PixelBuffer`]s.
//!
//! Every input is normalized to 8-bit RGBA: palettes and low bit depths are
//! expanded, 16-bit samples are truncated to their high byte, and missing
//! alpha is filled with 255. Output is always 8-bit RGBA.
//!
//! ```rust,no_run
//! use filtr_cli::png_io::{read, write};
//!
//! let buf = read("input.png")?;
//! write("output.png", &buf)?;
//! # Ok::<(), filtr_cli::png_io::PngError>(())
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use filtr_core::PixelBuffer;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// PNG I/O failures.
#[derive(Debug, thiserror::Error)]
pub enum PngError {
    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable PNG.
    #[error("failed to decode PNG: {0}")]
    Decode(String),

    /// The encoder rejected the image.
    #[error("failed to encode PNG: {0}")]
    Encode(String),

    /// A color layout this reader does not handle.
    #[error("unsupported PNG layout: {0}")]
    Unsupported(String),

    /// The decoded pixels do not form a valid buffer.
    #[error(transparent)]
    Buffer(#[from] filtr_core::Error),
}

/// Result alias for PNG I/O.
pub type PngResult<T> = std::result::Result<T, PngError>;

/// Reads a PNG file as 8-bit RGBA.
pub fn read<P: AsRef<Path>>(path: P) -> PngResult<PixelBuffer> {
    let path = path.as_ref();
    trace!(path = %path.display(), "png_io::read");
    let file = File::open(path)?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| PngError::Decode(e.to_string()))?;

    let size = reader
        .output_buffer_size()
        .ok_or_else(|| PngError::Decode("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| PngError::Decode(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let rgba: Vec<u8> = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => data.to_vec(),
        (png::ColorType::Rgb, png::BitDepth::Eight) => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            data.iter().flat_map(|&g| [g, g, g, 255]).collect()
        }
        (color_type, bit_depth) => {
            return Err(PngError::Unsupported(format!("{color_type:?} {bit_depth:?}")));
        }
    };
    debug!(width = info.width, height = info.height, color = ?info.color_type, "decoded PNG");
    Ok(PixelBuffer::from_rgba(info.width, info.height, rgba)?)
}

/// Writes a buffer as an 8-bit RGBA PNG.
pub fn write<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> PngResult<()> {
    let path = path.as_ref();
    trace!(path = %path.display(), width = buffer.width(), height = buffer.height(), "png_io::write");
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), buffer.width(), buffer.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let mut writer = encoder
        .write_header()
        .map_err(|e| PngError::Encode(e.to_string()))?;
    writer
        .write_image_data(buffer.bytes())
        .map_err(|e| PngError::Encode(e.to_string()))?;
    writer.finish().map_err(|e| PngError::Encode(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_rgba() {
        let mut data = Vec::new();
        for y in 0..6u32 {
            for x in 0..5u32 {
                data.extend([(x * 40) as u8, (y * 30) as u8, 64, (255 - x * 20) as u8]);
            }
        }
        let buf = PixelBuffer::from_rgba(5, 6, data).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.png");
        write(&path, &buf).unwrap();
        let loaded = read(&path).unwrap();
        assert_eq!(loaded, buf);
    }

    #[test]
    fn test_read_rgb_fills_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        {
            let file = File::create(&path).unwrap();
            let mut encoder = png::Encoder::new(BufWriter::new(file), 2, 1);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[1, 2, 3, 4, 5, 6]).unwrap();
        }
        let loaded = read(&path).unwrap();
        assert_eq!(loaded.get(0, 0), Some([1, 2, 3, 255]));
        assert_eq!(loaded.get(1, 0), Some([4, 5, 6, 255]));
    }

    #[test]
    fn test_missing_file() {
        let err = read("/nonexistent/filtr/none.png").unwrap_err();
        assert!(matches!(err, PngError::Io(_)));
    }
}
