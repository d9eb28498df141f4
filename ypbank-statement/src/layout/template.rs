//! Шаблоны выписок: геометрия колонок, шрифты и правила продолжения таблицы
//! для каждого банка.

use crate::amount::{Grouping, Money};
use crate::layout::instruction::{FontSpec, Rgb};
use crate::ledger::{LedgerEntry, LedgerTotals};
use crate::profile::AccountProfile;
use crate::schema::{schema, BankId, BankSchema, Field};

/// A4 в пунктах.
pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

/// Выравнивание текста в ячейке.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

/// Колонка таблицы транзакций.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub field: Field,
    pub width: f32,
    pub align: Align,
}

/// Колонка с выравниванием по типу поля: суммы вправо, остальное влево.
const fn col(field: Field, width: f32) -> Column {
    let align = if field.is_monetary() { Align::Right } else { Align::Left };
    Column { field, width, align }
}

/// Что повторяется на страницах продолжения.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuationPolicy {
    /// Повторять строку заголовков таблицы.
    pub repeat_table_header: bool,
    /// Рисовать краткую шапку (банк и номер счета) над таблицей.
    pub repeat_page_header: bool,
}

/// Параметры верстки выписки одного банка.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDescriptor {
    pub bank: BankId,
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Высота блока с логотипом на первой странице.
    pub brand_height: f32,
    /// Где начинается таблица на страницах продолжения.
    pub continuation_offset: f32,
    pub min_row_height: f32,
    pub cell_padding: f32,
    /// Ширина колонки подписей в таблице реквизитов.
    pub label_width: f32,
    pub title: &'static str,
    pub title_font: FontSpec,
    pub body_font: FontSpec,
    pub header_font: FontSpec,
    /// Заливка строки заголовков таблицы.
    pub header_fill: Option<Rgb>,
    /// Фирменный цвет банка, им же рисуется текстовая шапка без логотипа.
    pub accent: Rgb,
    pub grouping: Grouping,
    /// Дописывать `Cr`/`Dr` к остатку вместо знака.
    pub balance_suffix: bool,
    pub columns: &'static [Column],
    pub continuation: ContinuationPolicy,
    pub page_numbers: bool,
    /// Имя логотипа для [`AssetProvider`](crate::layout::AssetProvider).
    pub logo: Option<&'static str>,
    pub disclaimers: &'static [&'static str],
}

impl TemplateDescriptor {
    /// Нижняя граница области содержимого.
    pub fn page_bottom(&self) -> f32 {
        self.page_height - self.margin_bottom
    }

    /// Ширина таблицы транзакций.
    pub fn table_width(&self) -> f32 {
        self.columns.iter().map(|c| c.width).sum()
    }
}

/// Шаблон выписки банка.
///
/// Движок верстки работает только через этот интерфейс, все различия между
/// банками сосредоточены в дескрипторе и реализациях методов.
pub trait TableTemplate {
    fn descriptor(&self) -> &TemplateDescriptor;

    fn schema(&self) -> &'static BankSchema {
        schema(self.descriptor().bank)
    }

    /// Полное название банка для шапки.
    fn institution_name(&self) -> &'static str {
        self.schema().name
    }

    /// Реквизиты счета для шапки: (подпись, значение).
    fn header_fields(&self, profile: &AccountProfile) -> Vec<(String, String)> {
        profile
            .scoped(self.schema())
            .into_iter()
            .map(|(label, value)| (label.to_string(), value))
            .collect()
    }

    /// Подпись колонки.
    fn column_label(&self, column: &Column) -> &'static str {
        self.schema()
            .label(column.field)
            .unwrap_or_else(|| column.field.name())
    }

    fn format_money(&self, amount: Money) -> String {
        amount.format_grouped(self.descriptor().grouping)
    }

    fn format_balance(&self, balance: Money) -> String {
        if !self.descriptor().balance_suffix {
            return self.format_money(balance);
        }
        let suffix = if balance.is_negative() { "Dr" } else { "Cr" };
        format!("{} {}", self.format_money(balance.abs()), suffix)
    }

    /// Текст ячейки таблицы транзакций. Нулевые суммы не выводятся.
    fn cell_text(&self, column: &Column, item: &LedgerEntry) -> String {
        match column.field {
            Field::Debit if item.entry.debit.is_zero() => String::new(),
            Field::Debit => self.format_money(item.entry.debit),
            Field::Credit if item.entry.credit.is_zero() => String::new(),
            Field::Credit => self.format_money(item.entry.credit),
            Field::Balance => self.format_balance(item.balance),
            other => item.entry.text(other).to_string(),
        }
    }

    /// Строки таблицы итогов.
    fn footer_rows(&self, totals: &LedgerTotals) -> Vec<(String, String)> {
        vec![
            ("Opening Balance".to_string(), self.format_balance(totals.opening)),
            ("Total Debit".to_string(), self.format_money(totals.total_debit)),
            ("Total Credit".to_string(), self.format_money(totals.total_credit)),
            ("Closing Balance".to_string(), self.format_balance(totals.closing)),
            ("Transactions".to_string(), totals.count.to_string()),
        ]
    }

    fn disclaimers(&self) -> &[&'static str] {
        self.descriptor().disclaimers
    }
}

/// Шаблон, полностью заданный дескриптором.
#[derive(Debug)]
pub struct StatementTemplate {
    descriptor: TemplateDescriptor,
}

impl StatementTemplate {
    pub const fn new(descriptor: TemplateDescriptor) -> Self {
        Self { descriptor }
    }
}

impl TableTemplate for StatementTemplate {
    fn descriptor(&self) -> &TemplateDescriptor {
        &self.descriptor
    }
}

/// Шаблон банка.
pub fn template_for(bank: BankId) -> &'static StatementTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.descriptor.bank == bank)
        .unwrap_or_else(|| unreachable!("нет шаблона для {}", bank))
}

// =============================================================================
// Дескрипторы банков
// =============================================================================

const MARGIN: f32 = 28.0;

const COMPUTER_GENERATED: &str =
    "This is a computer generated statement and does not require a signature.";

const PLAIN: ContinuationPolicy = ContinuationPolicy {
    repeat_table_header: true,
    repeat_page_header: false,
};

const WITH_PAGE_HEADER: ContinuationPolicy = ContinuationPolicy {
    repeat_table_header: true,
    repeat_page_header: true,
};

const BODY_ONLY: ContinuationPolicy = ContinuationPolicy {
    repeat_table_header: false,
    repeat_page_header: false,
};

/// Общая часть дескриптора; банк переопределяет только свои отличия.
const BASE: TemplateDescriptor = TemplateDescriptor {
    bank: BankId::Sbi,
    page_width: A4_WIDTH,
    page_height: A4_HEIGHT,
    margin_left: MARGIN,
    margin_top: MARGIN,
    margin_bottom: 40.0,
    brand_height: 56.0,
    continuation_offset: 40.0,
    min_row_height: 20.0,
    cell_padding: 3.0,
    label_width: 140.0,
    title: "Statement of Account",
    title_font: FontSpec::bold(12.0),
    body_font: FontSpec::regular(8.0),
    header_font: FontSpec::bold(8.0).with_color(Rgb::WHITE),
    header_fill: None,
    accent: Rgb::BLACK,
    grouping: Grouping::Indian,
    balance_suffix: false,
    columns: &[],
    continuation: PLAIN,
    page_numbers: true,
    logo: None,
    disclaimers: &[COMPUTER_GENERATED],
};

static TEMPLATES: [StatementTemplate; 8] = [
    StatementTemplate {
        descriptor: TemplateDescriptor {
            bank: BankId::Sbi,
            min_row_height: 20.0,
            header_fill: Some(Rgb(0, 84, 166)),
            accent: Rgb(0, 84, 166),
            columns: &[
                col(Field::Date, 52.0),
                col(Field::ValueDate, 52.0),
                col(Field::Description, 145.0),
                col(Field::RefNo, 70.0),
                col(Field::BranchCode, 40.0),
                col(Field::Debit, 60.0),
                col(Field::Credit, 60.0),
                col(Field::Balance, 60.0),
            ],
            logo: Some("sbi"),
            disclaimers: &[
                COMPUTER_GENERATED,
                "Please do not share your ATM, debit card PIN or OTP with anyone.",
            ],
            ..BASE
        },
    },
    StatementTemplate {
        descriptor: TemplateDescriptor {
            bank: BankId::Pnb,
            min_row_height: 18.0,
            header_fill: Some(Rgb(162, 20, 47)),
            accent: Rgb(162, 20, 47),
            balance_suffix: true,
            columns: &[
                col(Field::Date, 60.0),
                col(Field::ChequeNo, 60.0),
                col(Field::Description, 215.0),
                col(Field::Debit, 68.0),
                col(Field::Credit, 68.0),
                col(Field::Balance, 68.0),
            ],
            continuation: BODY_ONLY,
            logo: Some("pnb"),
            ..BASE
        },
    },
    StatementTemplate {
        descriptor: TemplateDescriptor {
            bank: BankId::Hdfc,
            min_row_height: 22.0,
            continuation_offset: 72.0,
            header_font: FontSpec::bold(8.0),
            header_fill: Some(Rgb(214, 226, 240)),
            accent: Rgb(0, 76, 143),
            grouping: Grouping::Western,
            columns: &[
                col(Field::Date, 50.0),
                col(Field::Description, 180.0),
                col(Field::RefNo, 80.0),
                col(Field::ValueDate, 50.0),
                col(Field::Debit, 60.0),
                col(Field::Credit, 60.0),
                col(Field::Balance, 59.0),
            ],
            continuation: WITH_PAGE_HEADER,
            logo: Some("hdfc"),
            disclaimers: &[
                COMPUTER_GENERATED,
                "Contents of this statement will be considered correct if no error is reported within 30 days of receipt.",
            ],
            ..BASE
        },
    },
    StatementTemplate {
        descriptor: TemplateDescriptor {
            bank: BankId::Icici,
            min_row_height: 24.0,
            continuation_offset: 72.0,
            title: "Detailed Statement",
            header_fill: Some(Rgb(174, 40, 46)),
            accent: Rgb(241, 90, 34),
            balance_suffix: true,
            columns: &[
                col(Field::Date, 55.0),
                col(Field::ValueDate, 55.0),
                col(Field::ChequeNo, 60.0),
                col(Field::Description, 169.0),
                col(Field::Debit, 67.0),
                col(Field::Credit, 67.0),
                col(Field::Balance, 66.0),
            ],
            continuation: WITH_PAGE_HEADER,
            logo: Some("icici"),
            ..BASE
        },
    },
    StatementTemplate {
        descriptor: TemplateDescriptor {
            bank: BankId::Axis,
            min_row_height: 20.0,
            header_font: FontSpec::bold(8.0),
            accent: Rgb(151, 20, 77),
            grouping: Grouping::Western,
            columns: &[
                col(Field::Date, 55.0),
                col(Field::ChequeNo, 55.0),
                col(Field::Description, 194.0),
                col(Field::Debit, 65.0),
                col(Field::Credit, 65.0),
                col(Field::Balance, 70.0),
                col(Field::BranchCode, 35.0),
            ],
            logo: Some("axis"),
            ..BASE
        },
    },
    StatementTemplate {
        descriptor: TemplateDescriptor {
            bank: BankId::Kotak,
            min_row_height: 26.0,
            continuation_offset: 72.0,
            title: "Account Statement",
            header_fill: Some(Rgb(0, 56, 118)),
            accent: Rgb(237, 28, 36),
            balance_suffix: true,
            columns: &[
                col(Field::Date, 55.0),
                col(Field::Description, 210.0),
                col(Field::RefNo, 70.0),
                col(Field::Debit, 68.0),
                col(Field::Credit, 68.0),
                col(Field::Balance, 68.0),
            ],
            continuation: WITH_PAGE_HEADER,
            logo: Some("kotak"),
            ..BASE
        },
    },
    StatementTemplate {
        descriptor: TemplateDescriptor {
            bank: BankId::Bob,
            min_row_height: 18.0,
            header_fill: Some(Rgb(244, 111, 33)),
            accent: Rgb(244, 111, 33),
            columns: &[
                col(Field::Date, 55.0),
                col(Field::Description, 215.0),
                col(Field::ChequeNo, 65.0),
                col(Field::Debit, 68.0),
                col(Field::Credit, 68.0),
                col(Field::Balance, 68.0),
            ],
            continuation: BODY_ONLY,
            page_numbers: false,
            logo: Some("bob"),
            ..BASE
        },
    },
    StatementTemplate {
        descriptor: TemplateDescriptor {
            bank: BankId::Canara,
            min_row_height: 28.0,
            header_fill: Some(Rgb(0, 115, 185)),
            accent: Rgb(0, 115, 185),
            columns: &[
                col(Field::Date, 52.0),
                col(Field::ValueDate, 52.0),
                col(Field::BranchCode, 40.0),
                col(Field::RefNo, 70.0),
                col(Field::Description, 145.0),
                col(Field::Debit, 60.0),
                col(Field::Credit, 60.0),
                col(Field::Balance, 60.0),
            ],
            logo: Some("canara"),
            disclaimers: &[
                COMPUTER_GENERATED,
                "Customers are requested to verify the entries and report discrepancies to the branch.",
            ],
            ..BASE
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResolvedEntry;

    #[test]
    fn test_every_bank_has_template() {
        for id in BankId::ALL {
            assert_eq!(template_for(id).descriptor().bank, id);
        }
    }

    #[test]
    fn test_columns_fit_page_and_match_schema() {
        for id in BankId::ALL {
            let d = template_for(id).descriptor();
            assert!(d.table_width() <= d.page_width - 2.0 * d.margin_left, "{}", id);
            assert!((18.0..=28.0).contains(&d.min_row_height), "{}", id);
            for column in d.columns {
                assert!(schema(id).label(column.field).is_some(), "{} {}", id, column.field);
            }
            assert_eq!(d.columns.len(), schema(id).transaction_fields.len(), "{}", id);
        }
    }

    #[test]
    fn test_monetary_columns_are_right_aligned() {
        for column in template_for(BankId::Sbi).descriptor().columns {
            let expected = if column.field.is_monetary() { Align::Right } else { Align::Left };
            assert_eq!(column.align, expected);
        }
    }

    #[test]
    fn test_cell_text() {
        let template = template_for(BankId::Pnb);
        let item = LedgerEntry {
            position: 1,
            entry: ResolvedEntry {
                description: "ATM WDL".to_string(),
                debit: Money::from_minor(250000),
                ..ResolvedEntry::default()
            },
            balance: Money::from_minor(-12345678),
        };
        let by_field = |field| {
            let column = template.descriptor().columns.iter().find(|c| c.field == field).unwrap();
            template.cell_text(column, &item)
        };
        assert_eq!(by_field(Field::Description), "ATM WDL");
        assert_eq!(by_field(Field::Debit), "2,500.00");
        assert_eq!(by_field(Field::Credit), "");
        assert_eq!(by_field(Field::Balance), "1,23,456.78 Dr");
    }
}
