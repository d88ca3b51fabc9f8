//! visionct-io - Image I/O
//!
//! Loads reference bitmaps as single-channel 8-bit images and writes
//! diagnostic dumps.
//!
//! # Supported formats
//!
//! | Format | Read | Write | Feature |
//! |--------|------|-------|---------|
//! | BMP    | 1/4/8/24/32 bpp | U8 | `bmp` |
//! | PGM    | P5, 8 and 16 bit | U8, S16 | `pnm` |
//! | PNG    | 8-bit gray/indexed/RGB(A) | U8, S16 | `png-format` |

#[cfg(feature = "bmp")]
pub mod bmp;
mod error;
mod format;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::path::Path;
use visionct_core::Image;

/// Reduce an RGB triple to 8-bit luma.
///
/// Integer BT.601 weights summing to 256, so gray inputs map to themselves.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * u32::from(r) + 150 * u32::from(g) + 29 * u32::from(b) + 128) >> 8) as u8
}

/// Read an image from a file path.
///
/// The format is detected from the file's magic number. The image text is
/// set to the file name.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let file = File::open(path)?;
    let img = read_image_format(BufReader::new(file), format)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut img = img.to_mut();
    img.set_text(Some(name));
    Ok(img.into())
}

/// Read an image from memory.
pub fn read_image_mem(data: &[u8]) -> IoResult<Image> {
    let format = detect_format_from_bytes(data)?;
    read_image_format(Cursor::new(data), format)
}

fn read_image_format<R>(reader: R, format: ImageFormat) -> IoResult<Image>
where
    R: std::io::BufRead + std::io::Seek,
{
    match format {
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::read_bmp(reader),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(reader),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(reader),
        _ => Err(IoError::UnsupportedFormat(format!(
            "{:?} reading not enabled",
            format
        ))),
    }
}

/// Write an image to a file path.
///
/// Only the active region is written. `ImageFormat::Unknown` picks the
/// format from the path's extension.
pub fn write_image<P: AsRef<Path>>(img: &Image, path: P, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    let format = match format {
        ImageFormat::Unknown => ImageFormat::from_extension(path),
        f => f,
    };
    let writer = BufWriter::new(File::create(path)?);
    match format {
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::write_bmp(img, writer),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(img, writer),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(img, writer),
        _ => Err(IoError::UnsupportedFormat(format!(
            "{:?} writing not enabled",
            format
        ))),
    }
}
