//! Вывод в PDF через `printpdf`.
//!
//! PDF считает ось Y снизу вверх, поэтому все координаты переворачиваются
//! относительно высоты страницы.

use std::io::BufWriter;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point,
    Polygon, Pt,
};

use crate::error::{Error, Result};
use crate::layout::{FontSpec, Rgb};
use crate::render::RenderSurface;

const LAYER: &str = "Layer 1";
const STROKE_WIDTH: f32 = 0.5;

fn render_error(e: printpdf::Error) -> Error {
    Error::Render(e.to_string())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(rgb.0) / 255.0,
        f32::from(rgb.1) / 255.0,
        f32::from(rgb.2) / 255.0,
        None,
    ))
}

/// Документ PDF, страницы которого создаются по мере исполнения команд.
pub struct PdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    page_width: f32,
    page_height: f32,
}

impl PdfSurface {
    /// Создает документ с первой страницей размером `page_width` на
    /// `page_height` пунктов.
    pub fn new(title: &str, page_width: f32, page_height: f32) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm::from(Pt(page_width)),
            Mm::from(Pt(page_height)),
            LAYER,
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        layer.set_outline_thickness(STROKE_WIDTH);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            page_width,
            page_height,
        })
    }

    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(Mm::from(Pt(x)), Mm::from(Pt(self.page_height - y)))
    }

    fn rect_points(&self, x: f32, y: f32, width: f32, height: f32) -> Vec<(Point, bool)> {
        vec![
            (self.point(x, y), false),
            (self.point(x + width, y), false),
            (self.point(x + width, y + height), false),
            (self.point(x, y + height), false),
        ]
    }
}

impl RenderSurface for PdfSurface {
    /// Байты готового PDF.
    type Output = Vec<u8>;

    fn text(&mut self, x: f32, y: f32, text: &str, font: &FontSpec) -> Result<()> {
        let face = if font.bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(color(font.color));
        // `y` задает верх строки, PDF ждет базовую линию.
        let baseline = self.page_height - (y + font.size);
        self.layer
            .use_text(text, font.size, Mm::from(Pt(x)), Mm::from(Pt(baseline)), face);
        Ok(())
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.layer.set_outline_color(color(Rgb::BLACK));
        self.layer.add_line(Line {
            points: self.rect_points(x, y, width, height),
            is_closed: true,
        });
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgb) -> Result<()> {
        self.layer.set_fill_color(color(fill));
        self.layer.add_polygon(Polygon {
            rings: vec![self.rect_points(x, y, width, height)],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
        Ok(())
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()> {
        self.layer.set_outline_color(color(Rgb::BLACK));
        self.layer.add_line(Line {
            points: vec![(self.point(x1, y1), false), (self.point(x2, y2), false)],
            is_closed: false,
        });
        Ok(())
    }

    /// Растровых данных у логотипа нет, поэтому на его месте рисуется
    /// рамка с именем.
    fn image(&mut self, asset: &str, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        tracing::warn!("Логотип {:?} выводится в PDF как рамка с подписью", asset);
        self.stroke_rect(x, y, width, height)?;
        let font = FontSpec::regular(8.0);
        self.text(x + 4.0, y + (height - font.size) / 2.0, asset, &font)
    }

    fn advance_page(&mut self) -> Result<()> {
        let (page, layer) = self.doc.add_page(
            Mm::from(Pt(self.page_width)),
            Mm::from(Pt(self.page_height)),
            LAYER,
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.layer.set_outline_thickness(STROKE_WIDTH);
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.doc
            .save(&mut BufWriter::new(&mut bytes))
            .map_err(render_error)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Instruction, PageInstructionStream, A4_HEIGHT, A4_WIDTH};
    use crate::render::execute;

    #[test]
    fn test_pdf_has_header_and_pages() {
        let mut stream = PageInstructionStream::new(A4_WIDTH, A4_HEIGHT);
        stream.instructions = vec![
            Instruction::FillRect {
                x: 28.0,
                y: 28.0,
                width: 539.0,
                height: 46.0,
                color: Rgb(0, 84, 166),
            },
            Instruction::Text {
                x: 38.0,
                y: 40.0,
                text: "State Bank of India".to_string(),
                font: FontSpec::bold(16.0).with_color(Rgb::WHITE),
            },
            Instruction::AdvancePage,
            Instruction::StrokeRect {
                x: 28.0,
                y: 40.0,
                width: 100.0,
                height: 20.0,
            },
        ];

        let surface = PdfSurface::new("Statement", A4_WIDTH, A4_HEIGHT).unwrap();
        let bytes = execute(&stream, surface).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
