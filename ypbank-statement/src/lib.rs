//! # YPBank Statement
//!
//! Библиотека для генерации банковских выписок: нормализация сумм, схемы
//! выгрузок банков, расчет остатков и постраничная верстка таблицы
//! транзакций с выводом в PDF.
//!
//! ## Конвейер
//!
//! - **amount** - разбор «грязных» сумм в [`Money`]
//! - **schema** - схемы колонок восьми банков
//! - **resolve** - сопоставление строки входного файла со схемой
//! - **ledger** - текущий остаток и итоги
//! - **layout** - шаблоны банков и разбиение таблицы на страницы
//! - **render** - вывод потока команд в PDF или текстовый листинг
//!
//! ## Пример использования
//!
//! ```rust,ignore
//! use ypbank_statement::{generate_statement, ApproxMetrics, NoAssets, PdfSurface, StatementRequest};
//! use std::fs::File;
//!
//! let request = StatementRequest::from_json_reader(File::open("request.json")?)?;
//! let surface = PdfSurface::new("Statement", ypbank_statement::A4_WIDTH, ypbank_statement::A4_HEIGHT)?;
//! let pdf = generate_statement(&request, &ApproxMetrics, &NoAssets, surface)?;
//! ```

pub mod amount;
pub mod csv;
pub mod error;
pub mod layout;
pub mod ledger;
pub mod profile;
pub mod render;
pub mod resolve;
pub mod schema;

pub use amount::{parse_amount, Grouping, Money};
pub use error::{Error, Result};
pub use layout::{
    template_for, ApproxMetrics, AssetProvider, DocumentLayout, ImageAsset, LayoutEngine, NoAssets,
    PageInstructionStream, StatementTemplate, TableTemplate, TextMeasure, A4_HEIGHT, A4_WIDTH,
};
pub use ledger::{compute_ledger, LedgerEntry, LedgerTotals};
pub use profile::AccountProfile;
pub use render::{execute, ListingSurface, PdfSurface, RenderSurface};
pub use resolve::{resolve, resolve_rows, RawRow, ResolvedEntry};
pub use schema::{schema, schema_for, BankId, BankSchema, Field};

use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::Read;

use crate::profile::scalar_to_string;

/// Запрос на генерацию выписки.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementRequest {
    /// Код банка, например `PNB`.
    pub bank: String,
    pub opening_balance: Money,
    pub profile: AccountProfile,
    /// Транзакции в порядке файла.
    pub rows: Vec<RawRow>,
}

/// JSON-представление запроса.
#[derive(Deserialize)]
struct RequestDocument {
    bank: String,
    #[serde(default)]
    opening_balance: Value,
    #[serde(default)]
    profile: Value,
    #[serde(default)]
    transactions: Vec<Value>,
}

impl StatementRequest {
    pub fn new(bank: impl Into<String>) -> Self {
        Self {
            bank: bank.into(),
            ..Self::default()
        }
    }

    /// Читает запрос из JSON:
    ///
    /// ```json
    /// {
    ///   "bank": "PNB",
    ///   "opening_balance": "0.00",
    ///   "profile": { "account_number": "1234567890" },
    ///   "transactions": [ { "Withdrawal": "100", "Narration": "ATM WDL" } ]
    /// }
    /// ```
    ///
    /// Остаток может быть строкой или числом и разбирается по тем же правилам,
    /// что и суммы в транзакциях.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let document: RequestDocument = serde_json::from_reader(reader)?;

        let opening_balance = parse_amount(scalar_to_string(&document.opening_balance).as_deref());
        let profile = match document.profile {
            Value::Null => AccountProfile::new(),
            other => AccountProfile::from_json_value(other)?,
        };
        let rows = document
            .transactions
            .into_iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Object(map) => Ok(row_from_json(map)),
                _ => Err(Error::InvalidFormat(format!(
                    "Транзакция {} должна быть JSON-объектом",
                    idx + 1
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            bank: document.bank,
            opening_balance,
            profile,
            rows,
        })
    }
}

/// Плоский объект транзакции. Колонки идут в порядке ключей документа.
/// Вложенные значения и `null` считаются отсутствующими колонками.
fn row_from_json(map: Map<String, Value>) -> RawRow {
    let mut row = RawRow::new();
    for (key, value) in map {
        if let Some(text) = scalar_to_string(&value) {
            row.insert(key, text);
        }
    }
    row
}

/// Выписка, готовая к верстке.
#[derive(Debug, Clone)]
pub struct PreparedStatement {
    pub schema: &'static BankSchema,
    pub template: &'static StatementTemplate,
    pub profile: AccountProfile,
    pub ledger: Vec<LedgerEntry>,
    pub totals: LedgerTotals,
}

/// Находит схему банка и считает журнал с итогами.
///
/// Неизвестный банк является единственной ошибкой на этом шаге; грязные
/// данные в строках заменяются нулями и пустыми значениями.
pub fn prepare(request: &StatementRequest) -> Result<PreparedStatement> {
    let schema = schema_for(&request.bank)?;
    let entries = resolve_rows(schema, &request.rows, request.opening_balance);
    let ledger = compute_ledger(entries, request.opening_balance);
    let totals = LedgerTotals::from_ledger(request.opening_balance, &ledger);
    tracing::debug!(
        "{}: {} транзакций, остаток {} -> {}",
        schema.id,
        totals.count,
        totals.opening,
        totals.closing
    );

    Ok(PreparedStatement {
        schema,
        template: template_for(schema.id),
        profile: request.profile.clone(),
        ledger,
        totals,
    })
}

impl PreparedStatement {
    /// Верстает выписку по шаблону банка.
    pub fn layout(&self, measure: &dyn TextMeasure, assets: &dyn AssetProvider) -> Result<DocumentLayout> {
        LayoutEngine::new(measure).layout(self.template, &self.profile, &self.ledger, &self.totals, assets)
    }
}

/// Полный цикл: подготовка, верстка и вывод на поверхность.
///
/// Поверхность передается во владение. Если банк неизвестен или текст не
/// удалось измерить, на нее не попадает ни одной команды.
pub fn generate_statement<S: RenderSurface>(
    request: &StatementRequest,
    measure: &dyn TextMeasure,
    assets: &dyn AssetProvider,
    surface: S,
) -> Result<S::Output> {
    let prepared = prepare(request)?;
    let layout = prepared.layout(measure, assets)?;
    execute(&layout.stream, surface)
}
