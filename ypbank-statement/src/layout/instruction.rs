//! Команды отрисовки, которые производит движок верстки.
//!
//! Координаты абсолютные, в пунктах (1/72 дюйма). Начало координат в левом
//! верхнем углу страницы, ось Y направлена вниз.

/// Цвет RGB, компоненты 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// Параметры шрифта.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    /// Кегль в пунктах.
    pub size: f32,
    pub bold: bool,
    pub color: Rgb,
}

impl FontSpec {
    pub const fn regular(size: f32) -> Self {
        Self {
            size,
            bold: false,
            color: Rgb::BLACK,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            size,
            bold: true,
            color: Rgb::BLACK,
        }
    }

    pub const fn with_color(self, color: Rgb) -> Self {
        Self { color, ..self }
    }
}

/// Одна команда отрисовки.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Строка текста; `y` задает верх строки.
    Text {
        x: f32,
        y: f32,
        text: String,
        font: FontSpec,
    },
    /// Контур прямоугольника.
    StrokeRect { x: f32, y: f32, width: f32, height: f32 },
    /// Закрашенный прямоугольник.
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    /// Отрезок.
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// Изображение (логотип банка).
    Image {
        asset: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Переход на новую страницу.
    AdvancePage,
}

/// Упорядоченный поток команд для одного документа.
#[derive(Debug, Clone, PartialEq)]
pub struct PageInstructionStream {
    pub page_width: f32,
    pub page_height: f32,
    pub instructions: Vec<Instruction>,
}

impl PageInstructionStream {
    pub fn new(page_width: f32, page_height: f32) -> Self {
        Self {
            page_width,
            page_height,
            instructions: Vec::new(),
        }
    }

    /// Количество страниц (переходов на новую страницу плюс одна).
    pub fn page_count(&self) -> usize {
        1 + self
            .instructions
            .iter()
            .filter(|i| matches!(i, Instruction::AdvancePage))
            .count()
    }

    /// Команды постранично, без самих переходов.
    pub fn pages(&self) -> impl Iterator<Item = &[Instruction]> {
        self.instructions
            .split(|i| matches!(i, Instruction::AdvancePage))
    }

    /// Все текстовые строки документа в порядке вывода.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
