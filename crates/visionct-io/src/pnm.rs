//! PGM (binary, `P5`) format support
//!
//! 8-bit PGM maps to U8 images. S16 images are written as 16-bit PGM
//! (maxval 65535, big-endian) with samples biased by +32768 so the full
//! signed range survives; such files read back as S16.

use crate::{IoError, IoResult};
use std::io::{BufRead, Write};
use visionct_core::{Image, PixelFormat};

/// Bias applied to S16 samples in 16-bit PGM files
const S16_BIAS: i32 = 32768;

/// Read the next whitespace-separated header token, skipping `#` comments.
fn read_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = String::new();
    let mut in_comment = false;
    loop {
        let mut byte = [0u8; 1];
        if reader.read(&mut byte)? == 0 {
            break;
        }
        let c = byte[0];
        if in_comment {
            if c == b'\n' {
                in_comment = false;
            }
            continue;
        }
        if c == b'#' {
            in_comment = true;
            continue;
        }
        if c.is_ascii_whitespace() {
            if token.is_empty() {
                continue;
            }
            break;
        }
        token.push(c as char);
    }
    if token.is_empty() {
        return Err(IoError::InvalidData("truncated PGM header".to_string()));
    }
    Ok(token)
}

fn read_number<R: BufRead>(reader: &mut R, what: &str) -> IoResult<u32> {
    let token = read_token(reader)?;
    token
        .parse()
        .map_err(|_| IoError::InvalidData(format!("invalid PGM {what}: {token}")))
}

/// Read a binary PGM image.
///
/// # Returns
/// A U8 image for maxval <= 255, an S16 image for maxval 65535.
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<Image> {
    let magic = read_token(&mut reader)?;
    if magic != "P5" {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNM variant: {magic}"
        )));
    }
    let width = read_number(&mut reader, "width")?;
    let height = read_number(&mut reader, "height")?;
    let maxval = read_number(&mut reader, "maxval")?;
    let n = width as usize * height as usize;

    match maxval {
        1..=255 => {
            let mut data = vec![0u8; n];
            reader.read_exact(&mut data)?;
            Ok(Image::from_u8(width, height, data)?)
        }
        65535 => {
            let mut raw = vec![0u8; n * 2];
            reader.read_exact(&mut raw)?;
            let data = raw
                .chunks_exact(2)
                .map(|b| (i32::from(u16::from_be_bytes([b[0], b[1]])) - S16_BIAS) as i16)
                .collect();
            Ok(Image::from_s16(width, height, data)?)
        }
        _ => Err(IoError::UnsupportedFormat(format!(
            "unsupported PGM maxval: {maxval}"
        ))),
    }
}

/// Write the active region of an image as binary PGM.
pub fn write_pnm<W: Write>(img: &Image, mut writer: W) -> IoResult<()> {
    match img.format() {
        PixelFormat::U8 => {
            write!(writer, "P5\n{} {}\n255\n", img.width(), img.height())?;
            for row in img.rows_u8() {
                writer.write_all(row)?;
            }
        }
        PixelFormat::S16 => {
            write!(writer, "P5\n{} {}\n65535\n", img.width(), img.height())?;
            for row in img.rows_s16() {
                for &v in row {
                    let biased = (i32::from(v) + S16_BIAS) as u16;
                    writer.write_all(&biased.to_be_bytes())?;
                }
            }
        }
    }
    Ok(())
}
