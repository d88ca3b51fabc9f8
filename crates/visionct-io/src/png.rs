//! PNG image format support
//!
//! Reading produces single-channel U8 images: 8-bit grayscale is taken
//! as-is, 8-bit indexed and RGB/RGBA are reduced to luma. Writing emits
//! 8-bit grayscale for U8 and 16-bit grayscale (biased by +32768) for S16.

use crate::{IoError, IoResult, luma};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};
use visionct_core::{Image, PixelFormat};

/// Bias applied to S16 samples in 16-bit PNG files
const S16_BIAS: i32 = 32768;

/// Read a PNG image as single-channel U8
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::IDENTITY);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG format: {:?} {:?}",
            color_type, bit_depth
        )));
    }

    let palette: Option<Vec<u8>> = match color_type {
        ColorType::Indexed => {
            let Some(raw) = reader.info().palette.as_ref() else {
                return Err(IoError::DecodeError("PNG palette missing".to_string()));
            };
            let lumas = raw.chunks_exact(3).map(|c| luma(c[0], c[1], c[2]));
            Some(lumas.collect())
        }
        _ => None,
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let mut out = Vec::with_capacity(width as usize * height as usize);

    for y in 0..height as usize {
        let row = &data[y * bytes_per_row..(y + 1) * bytes_per_row];
        match color_type {
            ColorType::Grayscale => out.extend_from_slice(&row[..width as usize]),
            ColorType::GrayscaleAlpha => out.extend(row.chunks_exact(2).map(|c| c[0])),
            ColorType::Indexed => {
                let palette = palette.as_deref().unwrap_or_default();
                for &idx in &row[..width as usize] {
                    let v = palette.get(idx as usize).copied().ok_or_else(|| {
                        IoError::InvalidData(format!("palette index {} out of range", idx))
                    })?;
                    out.push(v);
                }
            }
            ColorType::Rgb => out.extend(row.chunks_exact(3).map(|c| luma(c[0], c[1], c[2]))),
            ColorType::Rgba => out.extend(row.chunks_exact(4).map(|c| luma(c[0], c[1], c[2]))),
        }
    }

    Ok(Image::from_u8(width, height, out)?)
}

/// Write the active region of an image as grayscale PNG
pub fn write_png<W: Write>(img: &Image, writer: W) -> IoResult<()> {
    let width = img.width();
    let height = img.height();
    let bit_depth = match img.format() {
        PixelFormat::U8 => BitDepth::Eight,
        PixelFormat::S16 => BitDepth::Sixteen,
    };

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(bit_depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let mut data = Vec::with_capacity((width * height * img.format().bytes_per_pixel()) as usize);
    match img.format() {
        PixelFormat::U8 => {
            for row in img.rows_u8() {
                data.extend_from_slice(row);
            }
        }
        PixelFormat::S16 => {
            for row in img.rows_s16() {
                for &v in row {
                    let biased = (i32::from(v) + S16_BIAS) as u16;
                    data.extend_from_slice(&biased.to_be_bytes());
                }
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}
