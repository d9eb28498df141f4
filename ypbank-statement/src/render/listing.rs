//! Текстовая поверхность: по строке на команду. Удобна для отладки
//! шаблонов и для тестов.

use std::fmt::Write as _;

use crate::error::Result;
use crate::layout::{FontSpec, Rgb};
use crate::render::RenderSurface;

/// Собирает команды в текстовый листинг.
#[derive(Debug)]
pub struct ListingSurface {
    out: String,
    page: usize,
}

impl ListingSurface {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            page: 1,
        }
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        // Запись в String не падает.
        let _ = writeln!(self.out, "page {}: {}", self.page, line);
    }
}

impl Default for ListingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for ListingSurface {
    type Output = String;

    fn text(&mut self, x: f32, y: f32, text: &str, font: &FontSpec) -> Result<()> {
        let weight = if font.bold { "bold" } else { "regular" };
        self.emit(format_args!("text {:.1} {:.1} {} {:.1} {:?}", x, y, weight, font.size, text));
        Ok(())
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.emit(format_args!("rect {:.1} {:.1} {:.1} {:.1}", x, y, width, height));
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) -> Result<()> {
        self.emit(format_args!(
            "fill {:.1} {:.1} {:.1} {:.1} #{:02x}{:02x}{:02x}",
            x, y, width, height, color.0, color.1, color.2
        ));
        Ok(())
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()> {
        self.emit(format_args!("line {:.1} {:.1} {:.1} {:.1}", x1, y1, x2, y2));
        Ok(())
    }

    fn image(&mut self, asset: &str, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.emit(format_args!("image {} {:.1} {:.1} {:.1} {:.1}", asset, x, y, width, height));
        Ok(())
    }

    fn advance_page(&mut self) -> Result<()> {
        self.page += 1;
        Ok(())
    }

    fn finish(self) -> Result<String> {
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Instruction, PageInstructionStream};
    use crate::render::execute;

    #[test]
    fn test_listing_pages() {
        let mut stream = PageInstructionStream::new(595.28, 841.89);
        stream.instructions = vec![
            Instruction::Text {
                x: 28.0,
                y: 40.0,
                text: "Statement of Account".to_string(),
                font: FontSpec::bold(12.0),
            },
            Instruction::AdvancePage,
            Instruction::Line {
                x1: 28.0,
                y1: 40.0,
                x2: 567.0,
                y2: 40.0,
            },
        ];

        let listing = execute(&stream, ListingSurface::new()).unwrap();

        assert_eq!(
            listing,
            "page 1: text 28.0 40.0 bold 12.0 \"Statement of Account\"\n\
             page 2: line 28.0 40.0 567.0 40.0\n"
        );
    }

    #[test]
    fn test_empty_stream() {
        let listing = execute(&PageInstructionStream::new(100.0, 100.0), ListingSurface::default()).unwrap();
        assert_eq!(listing, "");
    }
}
