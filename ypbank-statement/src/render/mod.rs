//! Вывод потока команд на поверхность отрисовки.
//!
//! Движок верстки ничего не знает о формате результата: поток команд
//! исполняется на любой реализации [`RenderSurface`].

pub mod listing;
pub mod pdf;

pub use listing::ListingSurface;
pub use pdf::PdfSurface;

use crate::error::Result;
use crate::layout::{FontSpec, Instruction, PageInstructionStream, Rgb};

/// Поверхность отрисовки. Координаты те же, что в потоке команд: пункты,
/// начало в левом верхнем углу.
pub trait RenderSurface {
    /// Готовый документ.
    type Output;

    fn text(&mut self, x: f32, y: f32, text: &str, font: &FontSpec) -> Result<()>;
    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()>;
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) -> Result<()>;
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()>;
    fn image(&mut self, asset: &str, x: f32, y: f32, width: f32, height: f32) -> Result<()>;
    fn advance_page(&mut self) -> Result<()>;

    /// Завершает документ.
    fn finish(self) -> Result<Self::Output>;
}

/// Исполняет команды по порядку и завершает документ.
///
/// Поверхность принадлежит вызову: при ошибке она просто уничтожается.
pub fn execute<S: RenderSurface>(stream: &PageInstructionStream, mut surface: S) -> Result<S::Output> {
    for instruction in &stream.instructions {
        match instruction {
            Instruction::Text { x, y, text, font } => surface.text(*x, *y, text, font)?,
            Instruction::StrokeRect { x, y, width, height } => surface.stroke_rect(*x, *y, *width, *height)?,
            Instruction::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => surface.fill_rect(*x, *y, *width, *height, *color)?,
            Instruction::Line { x1, y1, x2, y2 } => surface.line(*x1, *y1, *x2, *y2)?,
            Instruction::Image {
                asset,
                x,
                y,
                width,
                height,
            } => surface.image(asset, *x, *y, *width, *height)?,
            Instruction::AdvancePage => surface.advance_page()?,
        }
    }
    tracing::debug!("Выведено {} команд, страниц: {}", stream.len(), stream.page_count());
    surface.finish()
}
