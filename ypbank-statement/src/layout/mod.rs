//! Верстка выписки: шаблоны банков, измерение текста и разбиение таблицы
//! транзакций на страницы.

pub mod engine;
pub mod instruction;
pub mod measure;
pub mod template;

pub use engine::{AssetProvider, DocumentLayout, ImageAsset, LayoutEngine, NoAssets, RowKind, RowPlacement};
pub use instruction::{FontSpec, Instruction, PageInstructionStream, Rgb};
pub use measure::{ApproxMetrics, MeasureError, TextMeasure};
pub use template::{
    template_for, Align, Column, ContinuationPolicy, StatementTemplate, TableTemplate, TemplateDescriptor, A4_HEIGHT,
    A4_WIDTH,
};
