//! Text dumps of image metadata and samples, for failure diagnostics.

use super::{Image, PixelFormat};
use crate::error::Result;
use std::io::Write;

impl Image {
    /// Write image metadata to a writer.
    pub fn print_info(&self, writer: &mut impl Write, label: Option<&str>) -> Result<()> {
        if let Some(text) = label {
            writeln!(writer, "  Image info for {text}:")?;
        }
        writeln!(
            writer,
            "    format = {}, width = {}, height = {}",
            self.format().fourcc(),
            self.width(),
            self.height()
        )?;
        let roi = self.roi();
        writeln!(
            writer,
            "    allocated = {}x{}, roi = ({}, {}) {}x{}",
            self.full_width(),
            self.full_height(),
            roi.x,
            roi.y,
            roi.w,
            roi.h
        )?;
        if let Some(text) = self.text() {
            writeln!(writer, "    text: {text}")?;
        }
        Ok(())
    }

    /// Write metadata followed by every sample of the active region, one
    /// row per line.
    pub fn dump_values(&self, writer: &mut impl Write, label: Option<&str>) -> Result<()> {
        self.print_info(writer, label)?;
        match self.format() {
            PixelFormat::U8 => {
                for row in self.rows_u8() {
                    let line: Vec<String> = row.iter().map(|v| format!("{v:3}")).collect();
                    writeln!(writer, "{}", line.join(" "))?;
                }
            }
            PixelFormat::S16 => {
                for row in self.rows_s16() {
                    let line: Vec<String> = row.iter().map(|v| format!("{v:6}")).collect();
                    writeln!(writer, "{}", line.join(" "))?;
                }
            }
        }
        Ok(())
    }
}
