//! Движок верстки: превращает журнал с остатками в поток команд отрисовки
//! с разбиением таблицы на страницы.
//!
//! Документ проходит состояния по порядку: шапка, строка заголовков таблицы,
//! строки транзакций, подвал с итогами. Высота каждой строки измеряется до
//! вывода; если строка не помещается над нижним полем, начинается новая
//! страница, и таблица продолжается с `continuation_offset` шаблона.

use crate::error::{Error, Result};
use crate::layout::instruction::{FontSpec, Instruction, PageInstructionStream, Rgb};
use crate::layout::measure::TextMeasure;
use crate::layout::template::{Align, Column, TableTemplate, TemplateDescriptor};
use crate::ledger::{LedgerEntry, LedgerTotals};
use crate::profile::AccountProfile;

/// Отступ между логотипом и заголовком.
const BRAND_GAP: f32 = 10.0;
/// Отступ перед таблицей итогов.
const FOOTER_GAP: f32 = 12.0;
/// Ширина колонки значений в таблице итогов.
const TOTALS_VALUE_WIDTH: f32 = 120.0;

/// Изображение, доступное для шапки.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub name: String,
    /// Собственные размеры, нужны только для пропорций.
    pub width: f32,
    pub height: f32,
}

/// Источник логотипов банков.
pub trait AssetProvider {
    fn image(&self, name: &str) -> Option<ImageAsset>;
}

/// Логотипов нет: всегда используется текстовая шапка.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetProvider for NoAssets {
    fn image(&self, _name: &str) -> Option<ImageAsset> {
        None
    }
}

/// Вид строки таблицы.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    TableHeader,
    /// Строка транзакции с её порядковым номером в журнале.
    Body { position: usize },
}

/// Где оказалась строка таблицы.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    /// Номер страницы, начиная с 1.
    pub page: usize,
    pub kind: RowKind,
    pub y: f32,
    pub height: f32,
    /// Строка выше целой страницы и была обрезана.
    pub clipped: bool,
}

/// Результат верстки: поток команд и размещение строк таблицы.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub stream: PageInstructionStream,
    pub rows: Vec<RowPlacement>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.stream.page_count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    HeaderRegion,
    TableHeaderRow,
    TableBodyRow,
    FooterRegion,
    Done,
}

/// Движок верстки. Не хранит состояния между документами.
pub struct LayoutEngine<'m> {
    measure: &'m dyn TextMeasure,
}

impl<'m> LayoutEngine<'m> {
    pub fn new(measure: &'m dyn TextMeasure) -> Self {
        Self { measure }
    }

    /// Верстает один документ.
    pub fn layout(
        &self,
        template: &dyn TableTemplate,
        profile: &AccountProfile,
        ledger: &[LedgerEntry],
        totals: &LedgerTotals,
        assets: &dyn AssetProvider,
    ) -> Result<DocumentLayout> {
        let mut doc = DocumentBuilder::new(self.measure, template, profile);
        let mut entries = ledger.iter().peekable();
        let mut region = Region::HeaderRegion;

        loop {
            region = match region {
                Region::HeaderRegion => {
                    doc.header_region(profile, assets)?;
                    Region::TableHeaderRow
                }
                Region::TableHeaderRow => {
                    let first_row = match entries.peek() {
                        Some(item) => Some(doc.prepare_body(item)?.height),
                        None => None,
                    };
                    doc.table_header(first_row)?;
                    Region::TableBodyRow
                }
                Region::TableBodyRow => match entries.next() {
                    Some(item) => {
                        doc.body_row(item)?;
                        Region::TableBodyRow
                    }
                    None => Region::FooterRegion,
                },
                Region::FooterRegion => {
                    doc.footer(totals)?;
                    Region::Done
                }
                Region::Done => break,
            };
        }

        doc.finish()
    }
}

/// Строка таблицы, готовая к выводу: строки текста по колонкам и высота.
struct PreparedRow {
    cells: Vec<Vec<String>>,
    height: f32,
}

/// Сколько строк текста помещается в `available` с учетом отступов ячейки.
/// Не меньше одной.
fn lines_that_fit(available: f32, line_height: f32, padding: f32) -> usize {
    (((available - 2.0 * padding) / line_height).floor() as usize).max(1)
}

/// Обрезает ячейки до `max_lines` строк, последняя видимая строка кончается на `…`.
fn truncate_lines(cells: &mut [Vec<String>], max_lines: usize) {
    for cell in cells {
        if cell.len() > max_lines {
            cell.truncate(max_lines);
            if let Some(last) = cell.last_mut() {
                last.pop();
                last.push('…');
            }
        }
    }
}

struct DocumentBuilder<'a> {
    measure: &'a dyn TextMeasure,
    template: &'a dyn TableTemplate,
    desc: &'a TemplateDescriptor,
    /// Номер счета для краткой шапки страниц продолжения.
    account_line: Option<String>,
    finished: Vec<Vec<Instruction>>,
    current: Vec<Instruction>,
    rows: Vec<RowPlacement>,
    y: f32,
    body_rows_on_page: usize,
}

impl<'a> DocumentBuilder<'a> {
    fn new(measure: &'a dyn TextMeasure, template: &'a dyn TableTemplate, profile: &AccountProfile) -> Self {
        let desc = template.descriptor();
        let schema = template.schema();
        let account_line = profile.get("account_number").map(|number| {
            let label = schema.account_label("account_number").unwrap_or("Account Number");
            format!("{}: {}", label, number)
        });

        Self {
            measure,
            template,
            desc,
            account_line,
            finished: Vec::new(),
            current: Vec::new(),
            rows: Vec::new(),
            y: desc.margin_top,
            body_rows_on_page: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Измерения
    // -------------------------------------------------------------------------

    fn wrap(&self, text: &str, font: &FontSpec, width: f32) -> Result<Vec<String>> {
        self.measure
            .wrap(text, font, width)
            .map_err(|e| Error::Measurement {
                text: text.to_string(),
                reason: e.to_string(),
            })
    }

    fn text_width(&self, text: &str, font: &FontSpec) -> Result<f32> {
        self.measure
            .text_width(text, font)
            .map_err(|e| Error::Measurement {
                text: text.to_string(),
                reason: e.to_string(),
            })
    }

    fn line_height(&self, font: &FontSpec) -> f32 {
        self.measure.line_height(font)
    }

    fn page_number(&self) -> usize {
        self.finished.len() + 1
    }

    fn push(&mut self, instruction: Instruction) {
        self.current.push(instruction);
    }

    fn text(&mut self, x: f32, y: f32, text: impl Into<String>, font: FontSpec) {
        self.push(Instruction::Text {
            x,
            y,
            text: text.into(),
            font,
        });
    }

    /// Левая граница строки текста в ячейке с учетом выравнивания.
    fn aligned_x(&self, cell_x: f32, cell_width: f32, line: &str, font: &FontSpec, align: Align) -> Result<f32> {
        let pad = self.desc.cell_padding;
        Ok(match align {
            Align::Left => cell_x + pad,
            Align::Right => cell_x + cell_width - pad - self.text_width(line, font)?,
            Align::Center => cell_x + (cell_width - self.text_width(line, font)?) / 2.0,
        })
    }

    /// Рамка строки: верхняя и нижняя линии и вертикали на границах ячеек.
    fn frame_row(&mut self, x: f32, widths: &[f32], height: f32) {
        let y = self.y;
        let total: f32 = widths.iter().sum();
        self.push(Instruction::Line { x1: x, y1: y, x2: x + total, y2: y });
        self.push(Instruction::Line {
            x1: x,
            y1: y + height,
            x2: x + total,
            y2: y + height,
        });

        let mut edge = x;
        self.push(Instruction::Line { x1: edge, y1: y, x2: edge, y2: y + height });
        for width in widths {
            edge += width;
            self.push(Instruction::Line { x1: edge, y1: y, x2: edge, y2: y + height });
        }
    }

    /// Выводит строки текста ячеек таблицы, начиная с текущего `y`.
    fn draw_cells(&mut self, columns: &[Column], cells: &[Vec<String>], font: FontSpec) -> Result<()> {
        let lh = self.line_height(&font);
        let pad = self.desc.cell_padding;
        let mut x = self.desc.margin_left;
        for (column, lines) in columns.iter().zip(cells) {
            for (idx, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let tx = self.aligned_x(x, column.width, line, &font, column.align)?;
                self.text(tx, self.y + pad + idx as f32 * lh, line.clone(), font);
            }
            x += column.width;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Страницы
    // -------------------------------------------------------------------------

    fn advance_page(&mut self, repeat_table_header: bool) -> Result<()> {
        tracing::trace!("Переход на страницу {}", self.page_number() + 1);
        self.finished.push(std::mem::take(&mut self.current));
        self.y = self.desc.continuation_offset;
        self.body_rows_on_page = 0;

        if self.desc.continuation.repeat_page_header {
            self.page_header();
        }
        if repeat_table_header {
            let (labels, height) = self.prepare_header()?;
            self.draw_table_header(&labels, height)?;
        }
        Ok(())
    }

    /// Краткая шапка страницы продолжения, целиком выше `continuation_offset`.
    fn page_header(&mut self) {
        let d = self.desc;
        let name_font = FontSpec::bold(10.0).with_color(d.accent);
        let mut y = d.margin_top;
        self.text(d.margin_left, y, self.template.institution_name(), name_font);
        y += self.line_height(&name_font);
        if let Some(line) = self.account_line.clone() {
            self.text(d.margin_left, y, line, d.body_font);
        }

        let rule_y = d.continuation_offset - 6.0;
        self.push(Instruction::Line {
            x1: d.margin_left,
            y1: rule_y,
            x2: d.margin_left + d.table_width(),
            y2: rule_y,
        });
    }

    // -------------------------------------------------------------------------
    // Шапка документа
    // -------------------------------------------------------------------------

    fn header_region(&mut self, profile: &AccountProfile, assets: &dyn AssetProvider) -> Result<()> {
        let d = self.desc;
        let x = d.margin_left;
        let width = d.table_width();
        let band = d.brand_height - BRAND_GAP;

        let logo = d
            .logo
            .and_then(|name| assets.image(name))
            .filter(|asset| asset.width > 0.0 && asset.height > 0.0);
        match logo {
            Some(asset) => {
                let scaled = (asset.width * band / asset.height).min(width);
                self.push(Instruction::Image {
                    asset: asset.name,
                    x,
                    y: self.y,
                    width: scaled,
                    height: band,
                });
            }
            None => {
                if let Some(name) = d.logo {
                    tracing::warn!("Логотип {:?} недоступен, используется текстовая шапка", name);
                }
                self.push(Instruction::FillRect {
                    x,
                    y: self.y,
                    width,
                    height: band,
                    color: d.accent,
                });
                let font = FontSpec::bold(16.0).with_color(Rgb::WHITE);
                let ty = self.y + (band - self.line_height(&font)) / 2.0;
                self.text(x + 10.0, ty, self.template.institution_name(), font);
            }
        }
        self.y += d.brand_height;

        self.text(x, self.y, d.title, d.title_font);
        self.y += self.line_height(&d.title_font) + 6.0;

        let fields = self.template.header_fields(profile);
        if fields.is_empty() {
            return Ok(());
        }

        let label_font = FontSpec::bold(d.body_font.size);
        let lh = self.line_height(&d.body_font);
        let widths = [d.label_width, width - d.label_width];
        for (label, value) in fields {
            let label_lines = self.wrap(&label, &label_font, widths[0] - 2.0 * d.cell_padding)?;
            let value_lines = self.wrap(&value, &d.body_font, widths[1] - 2.0 * d.cell_padding)?;
            let mut cells = [label_lines, value_lines];
            let lines = cells[0].len().max(cells[1].len()).max(1);
            let mut height = lines as f32 * lh + 2.0 * d.cell_padding;

            if self.y + height > d.page_bottom() {
                let fresh_page = self.page_number() > 1 && self.y <= d.continuation_offset;
                if !fresh_page {
                    self.advance_page(false)?;
                }
                if self.y + height > d.page_bottom() {
                    let available = d.page_bottom() - self.y;
                    let max_lines = lines_that_fit(available, lh, d.cell_padding);
                    truncate_lines(&mut cells, max_lines);
                    height = (max_lines as f32 * lh + 2.0 * d.cell_padding).min(available);
                    tracing::warn!("Реквизит {:?} не помещается на страницу и обрезан до {} строк", label, max_lines);
                }
            }

            let [label_lines, value_lines] = cells;
            self.frame_row(x, &widths, height);
            let pad = d.cell_padding;
            for (idx, line) in label_lines.into_iter().enumerate() {
                self.text(x + pad, self.y + pad + idx as f32 * lh, line, label_font);
            }
            for (idx, line) in value_lines.into_iter().enumerate() {
                self.text(x + widths[0] + pad, self.y + pad + idx as f32 * lh, line, d.body_font);
            }
            self.y += height;
        }
        self.y += BRAND_GAP;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Таблица
    // -------------------------------------------------------------------------

    fn prepare_header(&self) -> Result<(Vec<Vec<String>>, f32)> {
        let d = self.desc;
        let lh = self.line_height(&d.header_font);
        let mut cells = Vec::with_capacity(d.columns.len());
        let mut lines = 1;
        for column in d.columns {
            let label = self.template.column_label(column);
            let wrapped = self.wrap(label, &d.header_font, column.width - 2.0 * d.cell_padding)?;
            lines = lines.max(wrapped.len());
            cells.push(wrapped);
        }
        let height = (lines as f32 * lh + 2.0 * d.cell_padding).max(d.min_row_height);
        Ok((cells, height))
    }

    fn draw_table_header(&mut self, labels: &[Vec<String>], height: f32) -> Result<()> {
        let d = self.desc;
        if let Some(fill) = d.header_fill {
            self.push(Instruction::FillRect {
                x: d.margin_left,
                y: self.y,
                width: d.table_width(),
                height,
                color: fill,
            });
        }
        let widths: Vec<f32> = d.columns.iter().map(|c| c.width).collect();
        self.frame_row(d.margin_left, &widths, height);

        let header_columns: Vec<Column> = d
            .columns
            .iter()
            .map(|c| Column {
                align: Align::Left,
                ..*c
            })
            .collect();
        self.draw_cells(&header_columns, labels, d.header_font)?;

        self.rows.push(RowPlacement {
            page: self.page_number(),
            kind: RowKind::TableHeader,
            y: self.y,
            height,
            clipped: false,
        });
        self.y += height;
        Ok(())
    }

    /// Строка заголовков таблицы. Если вместе с первой строкой транзакций она
    /// не помещается на странице, таблица начинается со следующей.
    fn table_header(&mut self, first_row_height: Option<f32>) -> Result<()> {
        let (labels, height) = self.prepare_header()?;
        let needed = height + first_row_height.unwrap_or(0.0);
        if self.y + needed > self.desc.page_bottom() {
            self.advance_page(false)?;
        }
        self.draw_table_header(&labels, height)
    }

    fn prepare_body(&self, item: &LedgerEntry) -> Result<PreparedRow> {
        let d = self.desc;
        let lh = self.line_height(&d.body_font);
        let mut cells = Vec::with_capacity(d.columns.len());
        let mut lines = 1;
        for column in d.columns {
            let text = self.template.cell_text(column, item);
            let wrapped = self.wrap(&text, &d.body_font, column.width - 2.0 * d.cell_padding)?;
            lines = lines.max(wrapped.len());
            cells.push(wrapped);
        }
        let height = (lines as f32 * lh + 2.0 * d.cell_padding).max(d.min_row_height);
        Ok(PreparedRow { cells, height })
    }

    /// Обрезает строку, которая выше свободного места на пустой странице.
    fn clip_row(&self, row: &mut PreparedRow, position: usize) {
        let d = self.desc;
        let lh = self.line_height(&d.body_font);
        let available = d.page_bottom() - self.y;
        let max_lines = lines_that_fit(available, lh, d.cell_padding);
        truncate_lines(&mut row.cells, max_lines);
        let content = max_lines as f32 * lh + 2.0 * d.cell_padding;
        row.height = content.max(d.min_row_height).min(available);
        tracing::warn!(
            "Строка {} не помещается на страницу и обрезана до {} строк текста",
            position,
            max_lines
        );
    }

    fn body_row(&mut self, item: &LedgerEntry) -> Result<()> {
        let d = self.desc;
        let mut row = self.prepare_body(item)?;
        let mut clipped = false;

        if self.y + row.height > d.page_bottom() {
            let fresh_page = self.page_number() > 1 && self.body_rows_on_page == 0;
            if !fresh_page {
                self.advance_page(d.continuation.repeat_table_header)?;
            }
            if self.y + row.height > d.page_bottom() {
                self.clip_row(&mut row, item.position);
                clipped = true;
            }
        }

        let widths: Vec<f32> = d.columns.iter().map(|c| c.width).collect();
        self.frame_row(d.margin_left, &widths, row.height);
        self.draw_cells(d.columns, &row.cells, d.body_font)?;

        self.rows.push(RowPlacement {
            page: self.page_number(),
            kind: RowKind::Body {
                position: item.position,
            },
            y: self.y,
            height: row.height,
            clipped,
        });
        self.y += row.height;
        self.body_rows_on_page += 1;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Подвал
    // -------------------------------------------------------------------------

    fn footer(&mut self, totals: &LedgerTotals) -> Result<()> {
        let d = self.desc;
        let pad = d.cell_padding;
        let lh = self.line_height(&d.body_font);
        let label_font = FontSpec::bold(d.body_font.size);
        let widths = [d.label_width, TOTALS_VALUE_WIDTH];
        let x = d.margin_left + d.table_width() - (d.label_width + TOTALS_VALUE_WIDTH);

        let mut rows = Vec::new();
        for (label, value) in self.template.footer_rows(totals) {
            let label_lines = self.wrap(&label, &label_font, widths[0] - 2.0 * pad)?;
            let value_lines = self.wrap(&value, &d.body_font, widths[1] - 2.0 * pad)?;
            let height = label_lines.len().max(value_lines.len()).max(1) as f32 * lh + 2.0 * pad;
            rows.push((label_lines, value_lines, height));
        }

        let mut notes = Vec::new();
        for disclaimer in self.template.disclaimers() {
            notes.extend(self.wrap(disclaimer, &d.body_font, d.table_width())?);
        }

        let rows_height: f32 = rows.iter().map(|(_, _, h)| h).sum();
        let notes_height = if notes.is_empty() { 0.0 } else { 8.0 + notes.len() as f32 * lh };
        if self.y + FOOTER_GAP + rows_height + notes_height > d.page_bottom() {
            self.advance_page(false)?;
        }

        self.y += FOOTER_GAP;
        self.push(Instruction::StrokeRect {
            x,
            y: self.y,
            width: widths[0] + widths[1],
            height: rows_height,
        });
        for (label_lines, value_lines, height) in rows {
            self.frame_row(x, &widths, height);
            for (idx, line) in label_lines.into_iter().enumerate() {
                self.text(x + pad, self.y + pad + idx as f32 * lh, line, label_font);
            }
            for (idx, line) in value_lines.into_iter().enumerate() {
                let tx = self.aligned_x(x + widths[0], widths[1], &line, &d.body_font, Align::Right)?;
                self.text(tx, self.y + pad + idx as f32 * lh, line, d.body_font);
            }
            self.y += height;
        }

        if !notes.is_empty() {
            self.y += 8.0;
            for line in notes {
                self.text(d.margin_left, self.y, line, d.body_font);
                self.y += lh;
            }
        }
        Ok(())
    }

    /// Собирает поток команд; номера страниц добавляются, когда известно их число.
    fn finish(mut self) -> Result<DocumentLayout> {
        let d = self.desc;
        self.finished.push(std::mem::take(&mut self.current));
        let total = self.finished.len();
        let number_font = FontSpec::regular(7.0);

        let mut stream = PageInstructionStream::new(d.page_width, d.page_height);
        for (idx, page) in self.finished.into_iter().enumerate() {
            if idx > 0 {
                stream.instructions.push(Instruction::AdvancePage);
            }
            stream.instructions.extend(page);
            if d.page_numbers {
                let label = format!("Page {} of {}", idx + 1, total);
                let width = self
                    .measure
                    .text_width(&label, &number_font)
                    .map_err(|e| Error::Measurement {
                        text: label.clone(),
                        reason: e.to_string(),
                    })?;
                stream.instructions.push(Instruction::Text {
                    x: d.margin_left + d.table_width() - width,
                    y: d.page_bottom() + 10.0,
                    text: label,
                    font: number_font,
                });
            }
        }

        Ok(DocumentLayout {
            stream,
            rows: self.rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Money;
    use crate::layout::measure::ApproxMetrics;
    use crate::layout::template::{template_for, StatementTemplate};
    use crate::ledger::compute_ledger;
    use crate::resolve::ResolvedEntry;
    use crate::schema::BankId;

    struct Logos;

    impl AssetProvider for Logos {
        fn image(&self, name: &str) -> Option<ImageAsset> {
            Some(ImageAsset {
                name: name.to_string(),
                width: 200.0,
                height: 50.0,
            })
        }
    }

    fn ledger(count: usize, description: &str) -> Vec<LedgerEntry> {
        let entries = (0..count)
            .map(|i| ResolvedEntry {
                date: format!("{:02}/04/2024", i % 28 + 1),
                description: description.to_string(),
                credit: Money::from_minor(10000),
                ..ResolvedEntry::default()
            })
            .collect();
        compute_ledger(entries, Money::ZERO)
    }

    fn run(template: &dyn TableTemplate, ledger: &[LedgerEntry], assets: &dyn AssetProvider) -> DocumentLayout {
        let profile = AccountProfile::from_pairs([("account_number", "1234567890")]);
        let totals = LedgerTotals::from_ledger(Money::ZERO, ledger);
        LayoutEngine::new(&ApproxMetrics)
            .layout(template, &profile, ledger, &totals, assets)
            .unwrap()
    }

    fn body_rows(layout: &DocumentLayout) -> Vec<&RowPlacement> {
        layout
            .rows
            .iter()
            .filter(|r| matches!(r.kind, RowKind::Body { .. }))
            .collect()
    }

    #[test]
    fn test_single_row_fits_one_page() {
        let layout = run(template_for(BankId::Pnb), &ledger(1, "ATM WDL"), &NoAssets);
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.rows[0].kind, RowKind::TableHeader);
        assert_eq!(layout.rows[1].kind, RowKind::Body { position: 1 });
        assert!(layout.stream.texts().any(|t| t == "Page 1 of 1"));
        assert!(layout.stream.texts().any(|t| t == "Closing Balance"));
    }

    #[test]
    fn test_rows_stay_above_bottom_margin() {
        for bank in BankId::ALL {
            let template = template_for(bank);
            let d = template.descriptor();
            let layout = run(template, &ledger(120, "NEFT transfer to supplier"), &NoAssets);
            assert!(layout.page_count() > 1, "{}", bank);
            for row in &layout.rows {
                assert!(row.y + row.height <= d.page_bottom() + 1e-3, "{} {:?}", bank, row);
            }
            assert_eq!(body_rows(&layout).len(), 120);
        }
    }

    #[test]
    fn test_continuation_pages_start_at_offset() {
        let template = template_for(BankId::Hdfc);
        let d = template.descriptor();
        let layout = run(template, &ledger(150, "UPI payment"), &NoAssets);

        for page in 2..=layout.page_count() {
            if let Some(first) = layout.rows.iter().find(|r| r.page == page) {
                assert_eq!(first.y, d.continuation_offset);
                assert_eq!(first.kind, RowKind::TableHeader);
            }
        }
        let repeated = layout.stream.texts().filter(|t| *t == template.institution_name()).count();
        assert!(repeated >= layout.page_count());
    }

    #[test]
    fn test_body_only_continuation() {
        let template = template_for(BankId::Pnb);
        let layout = run(template, &ledger(150, "UPI payment"), &NoAssets);
        let headers = layout.rows.iter().filter(|r| r.kind == RowKind::TableHeader).count();
        assert_eq!(headers, 1);

        let second = layout.rows.iter().find(|r| r.page == 2).unwrap();
        assert!(matches!(second.kind, RowKind::Body { .. }));
        assert_eq!(second.y, template.descriptor().continuation_offset);
    }

    #[test]
    fn test_rows_keep_input_order() {
        let layout = run(template_for(BankId::Sbi), &ledger(80, "Cash deposit"), &NoAssets);
        let positions: Vec<usize> = body_rows(&layout)
            .iter()
            .map(|r| match r.kind {
                RowKind::Body { position } => position,
                RowKind::TableHeader => 0,
            })
            .collect();
        assert_eq!(positions, (1..=80).collect::<Vec<_>>());
    }

    #[test]
    fn test_footer_only_on_last_page() {
        let layout = run(template_for(BankId::Sbi), &ledger(90, "Cash deposit"), &NoAssets);
        let pages: Vec<&[Instruction]> = layout.stream.pages().collect();
        let (last, rest) = pages.split_last().unwrap();
        let has_totals = |page: &[Instruction]| {
            page.iter()
                .any(|i| matches!(i, Instruction::Text { text, .. } if text == "Total Credit"))
        };
        assert!(has_totals(last));
        assert!(!rest.iter().any(|p| has_totals(p)));
    }

    #[test]
    fn test_logo_or_text_brand() {
        let template = template_for(BankId::Sbi);
        let with_logo = run(template, &ledger(1, "x"), &Logos);
        assert!(with_logo
            .stream
            .instructions
            .iter()
            .any(|i| matches!(i, Instruction::Image { asset, .. } if asset == "sbi")));

        let fallback = run(template, &ledger(1, "x"), &NoAssets);
        assert!(!fallback
            .stream
            .instructions
            .iter()
            .any(|i| matches!(i, Instruction::Image { .. })));
        assert!(fallback.stream.texts().any(|t| t == template.institution_name()));
    }

    #[test]
    fn test_empty_ledger_has_header_and_footer() {
        let layout = run(template_for(BankId::Axis), &[], &NoAssets);
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.rows.len(), 1);
        assert!(layout.stream.texts().any(|t| t == "Opening Balance"));
    }

    #[test]
    fn test_too_tall_row_is_clipped() {
        let template = StatementTemplate::new(TemplateDescriptor {
            page_height: 250.0,
            ..template_for(BankId::Sbi).descriptor().clone()
        });
        let long = vec!["narration"; 400].join(" ");
        let layout = run(&template, &ledger(1, &long), &NoAssets);
        let bottom = template.descriptor().page_bottom();

        let row = body_rows(&layout)[0];
        assert!(row.clipped);
        assert!(row.y + row.height <= bottom + 1e-3);
        assert!(layout.stream.texts().any(|t| t.ends_with('…')));
    }

    #[test]
    fn test_oversized_attribute_is_clipped() {
        let template = template_for(BankId::Sbi);
        let d = template.descriptor();
        let address = vec!["Flat 12 Sector 4"; 600].join(" ");
        let profile = AccountProfile::from_pairs([
            ("account_name", "R. Sharma"),
            ("address", address.as_str()),
            ("account_number", "1234567890"),
        ]);
        let items = ledger(3, "UPI payment");
        let totals = LedgerTotals::from_ledger(Money::ZERO, &items);
        let layout = LayoutEngine::new(&ApproxMetrics)
            .layout(template, &profile, &items, &totals, &NoAssets)
            .unwrap();

        for instruction in &layout.stream.instructions {
            if let Instruction::Text { y, text, font, .. } = instruction {
                if text.starts_with("Page ") {
                    continue;
                }
                assert!(y + ApproxMetrics.line_height(font) <= d.page_bottom() + 1e-3, "{:?}", text);
            }
        }
        assert!(layout.stream.texts().any(|t| t.ends_with('…')));
        assert!(layout.stream.texts().any(|t| t == "1234567890"));
        assert_eq!(body_rows(&layout).len(), 3);
    }

    #[test]
    fn test_invalid_font_is_reported() {
        let template = StatementTemplate::new(TemplateDescriptor {
            body_font: FontSpec::regular(0.0),
            ..template_for(BankId::Sbi).descriptor().clone()
        });
        let items = ledger(1, "x");
        let totals = LedgerTotals::from_ledger(Money::ZERO, &items);
        let result = LayoutEngine::new(&ApproxMetrics).layout(
            &template,
            &AccountProfile::new(),
            &items,
            &totals,
            &NoAssets,
        );
        assert!(matches!(result, Err(Error::Measurement { .. })));
    }
}
