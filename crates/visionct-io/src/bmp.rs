//! BMP image format support
//!
//! Reads Windows Bitmap (BMP) files into single-channel 8-bit images and
//! writes 8-bit images as grayscale-palette BMP.
//!
//! Paletted (1, 4, 8 bpp) and direct-colour (24, 32 bpp) files are
//! accepted; colour samples are reduced to luma with [`crate::luma`].

use crate::{IoError, IoResult, luma};
use std::io::{Read, Write};
use visionct_core::{Image, PixelFormat};

/// BMP file header size
const BMP_FILE_HEADER_SIZE: usize = 14;

/// BMP info header size (BITMAPINFOHEADER)
const BMP_INFO_HEADER_SIZE: u32 = 40;

fn le_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn le_i32(b: &[u8]) -> i32 {
    i32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn le_u16(b: &[u8]) -> u16 {
    u16::from_le_bytes([b[0], b[1]])
}

/// Read a BMP image as single-channel U8
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<Image> {
    let mut file_header = [0u8; BMP_FILE_HEADER_SIZE];
    reader.read_exact(&mut file_header).map_err(IoError::Io)?;

    if &file_header[0..2] != b"BM" {
        return Err(IoError::InvalidData("not a BMP file".to_string()));
    }

    let pixel_offset = le_u32(&file_header[10..14]) as usize;

    // Info header (minimum 40 bytes)
    let mut info_header = [0u8; 40];
    reader.read_exact(&mut info_header).map_err(IoError::Io)?;

    let header_size = le_u32(&info_header[0..4]);
    if header_size < BMP_INFO_HEADER_SIZE {
        return Err(IoError::InvalidData(format!(
            "unsupported BMP header size: {}",
            header_size
        )));
    }

    let width = le_i32(&info_header[4..8]);
    let height = le_i32(&info_header[8..12]);

    let planes = le_u16(&info_header[12..14]);
    if planes != 1 {
        return Err(IoError::InvalidData(format!(
            "unsupported number of planes: {}",
            planes
        )));
    }

    let bits_per_pixel = le_u16(&info_header[14..16]);
    let compression = le_u32(&info_header[16..20]);
    let colors_used = le_u32(&info_header[32..36]) as usize;

    // Only uncompressed (BI_RGB) and BI_BITFIELDS
    if compression != 0 && compression != 3 {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP compression: {}",
            compression
        )));
    }
    if !matches!(bits_per_pixel, 1 | 4 | 8 | 24 | 32) {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP bit depth: {}",
            bits_per_pixel
        )));
    }

    let top_down = height < 0;
    let width = width.unsigned_abs();
    let height = height.unsigned_abs();
    if width == 0 || height == 0 {
        return Err(IoError::InvalidData(format!(
            "invalid BMP dimensions: {}x{}",
            width, height
        )));
    }

    let bytes_to_skip = header_size as usize - BMP_INFO_HEADER_SIZE as usize;
    if bytes_to_skip > 0 {
        let mut skip = vec![0u8; bytes_to_skip];
        reader.read_exact(&mut skip).map_err(IoError::Io)?;
    }

    // Palette, reduced to gray levels
    let palette: Vec<u8> = if bits_per_pixel <= 8 {
        let max_colors = 1usize << bits_per_pixel;
        let num_colors = if colors_used == 0 {
            max_colors
        } else {
            colors_used.min(max_colors)
        };
        let mut raw = vec![0u8; num_colors * 4];
        reader.read_exact(&mut raw).map_err(IoError::Io)?;
        raw.chunks_exact(4)
            .map(|bgra| luma(bgra[2], bgra[1], bgra[0]))
            .collect()
    } else {
        Vec::new()
    };

    // Skip to pixel data
    let current_pos = BMP_FILE_HEADER_SIZE + header_size as usize + palette.len() * 4;
    if pixel_offset > current_pos {
        let mut skip = vec![0u8; pixel_offset - current_pos];
        reader.read_exact(&mut skip).map_err(IoError::Io)?;
    }

    // BMP rows are 4-byte aligned
    let row_stride = (width as usize * bits_per_pixel as usize).div_ceil(32) * 4;
    let mut row_buffer = vec![0u8; row_stride];
    let mut data = vec![0u8; width as usize * height as usize];

    let lookup = |index: u8| -> IoResult<u8> {
        match palette.get(index as usize) {
            Some(&v) => Ok(v),
            None => Err(IoError::InvalidData(format!("no palette entry {index}"))),
        }
    };

    for row in 0..height {
        reader.read_exact(&mut row_buffer).map_err(IoError::Io)?;

        let y = if top_down { row } else { height - 1 - row };
        let out = &mut data[y as usize * width as usize..(y as usize + 1) * width as usize];

        match bits_per_pixel {
            1 => {
                for (x, v) in out.iter_mut().enumerate() {
                    let bit = (row_buffer[x / 8] >> (7 - (x % 8))) & 1;
                    *v = lookup(bit)?;
                }
            }
            4 => {
                for (x, v) in out.iter_mut().enumerate() {
                    let byte = row_buffer[x / 2];
                    let idx = if x % 2 == 0 { byte >> 4 } else { byte & 0xF };
                    *v = lookup(idx)?;
                }
            }
            8 => {
                for (x, v) in out.iter_mut().enumerate() {
                    *v = lookup(row_buffer[x])?;
                }
            }
            24 | 32 => {
                let step = bits_per_pixel as usize / 8;
                for (x, v) in out.iter_mut().enumerate() {
                    let px = &row_buffer[x * step..x * step + 3];
                    *v = luma(px[2], px[1], px[0]);
                }
            }
            _ => unreachable!(),
        }
    }

    Ok(Image::from_u8(width, height, data)?)
}

/// Write a U8 image as an 8-bit grayscale-palette BMP
///
/// Only the active region is written.
pub fn write_bmp<W: Write>(img: &Image, mut writer: W) -> IoResult<()> {
    if img.format() != PixelFormat::U8 {
        return Err(IoError::UnsupportedFormat(format!(
            "cannot write {:?} as BMP",
            img.format()
        )));
    }
    let width = img.width();
    let height = img.height();
    let bits_per_pixel: u16 = 8;

    let row_stride = (width as usize).div_ceil(4) * 4;
    let pixel_data_size = row_stride * height as usize;
    let colormap_size = 256 * 4;
    let pixel_offset = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE as usize + colormap_size;
    let file_size = pixel_offset + pixel_data_size;

    // File header
    writer.write_all(b"BM")?;
    writer.write_all(&(file_size as u32).to_le_bytes())?;
    writer.write_all(&[0u8; 4])?; // Reserved
    writer.write_all(&(pixel_offset as u32).to_le_bytes())?;

    // Info header
    writer.write_all(&BMP_INFO_HEADER_SIZE.to_le_bytes())?;
    writer.write_all(&(width as i32).to_le_bytes())?;
    writer.write_all(&(height as i32).to_le_bytes())?; // Bottom-up
    writer.write_all(&1u16.to_le_bytes())?; // Planes
    writer.write_all(&bits_per_pixel.to_le_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?; // Compression
    writer.write_all(&(pixel_data_size as u32).to_le_bytes())?;
    writer.write_all(&0i32.to_le_bytes())?; // X pixels per meter
    writer.write_all(&0i32.to_le_bytes())?; // Y pixels per meter
    writer.write_all(&256u32.to_le_bytes())?; // Colors used
    writer.write_all(&0u32.to_le_bytes())?; // Important colors

    for i in 0..=255u8 {
        writer.write_all(&[i, i, i, 0])?;
    }

    let rows: Vec<&[u8]> = img.rows_u8().collect();
    let mut row_buffer = vec![0u8; row_stride];
    for row in rows.iter().rev() {
        row_buffer[..row.len()].copy_from_slice(row);
        writer.write_all(&row_buffer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmp_roundtrip_odd_width() {
        let data: Vec<u8> = (0..7 * 5).map(|i| (i * 7) as u8).collect();
        let img = Image::from_u8(7, 5, data).unwrap();

        let mut buffer = Vec::new();
        write_bmp(&img, &mut buffer).unwrap();
        assert_eq!(buffer.len(), 14 + 40 + 1024 + 8 * 5);

        let img2 = read_bmp(std::io::Cursor::new(buffer)).unwrap();
        assert!(img.equals(&img2));
    }

    #[test]
    fn test_write_bmp_only_roi() {
        let img = Image::from_u8(4, 4, (0..16).collect()).unwrap();
        let inner = img.adjust_roi(1, 1, 1, 1).unwrap();
        let mut buffer = Vec::new();
        write_bmp(&inner, &mut buffer).unwrap();
        let back = read_bmp(std::io::Cursor::new(buffer)).unwrap();
        assert_eq!((back.width(), back.height()), (2, 2));
        assert_eq!(back.get_u8(0, 0), Some(5));
        assert_eq!(back.get_u8(1, 1), Some(10));
    }

    #[test]
    fn test_read_bmp_24bit_to_luma() {
        // 2x1 image, top-down: pure red, pure white
        let mut buf = Vec::new();
        let row_stride = 8usize;
        let offset = 54u32;
        buf.extend_from_slice(b"BM");
        buf.extend_from_slice(&(offset + row_stride as u32).to_le_bytes());
        buf.extend_from_slice(&[0u8; 4]);
        buf.extend_from_slice(&offset.to_le_bytes());
        buf.extend_from_slice(&40u32.to_le_bytes());
        buf.extend_from_slice(&2i32.to_le_bytes());
        buf.extend_from_slice(&(-1i32).to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&24u16.to_le_bytes());
        buf.extend_from_slice(&[0u8; 24]);
        buf.extend_from_slice(&[0, 0, 255, 255, 255, 255, 0, 0]);

        let img = read_bmp(std::io::Cursor::new(buf)).unwrap();
        assert_eq!(img.get_u8(0, 0), Some(luma(255, 0, 0)));
        assert_eq!(img.get_u8(1, 0), Some(255));
    }

    #[test]
    fn test_write_s16_rejected() {
        let img = Image::new(2, 2, PixelFormat::S16).unwrap();
        assert!(write_bmp(&img, Vec::new()).is_err());
    }
}
