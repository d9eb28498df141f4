//! Разрешение полей: из строки входного файла с произвольными именами
//! колонок в каноническую запись транзакции.

use crate::amount::{parse_amount, Money};
use crate::schema::{AmountMode, BankSchema, Field};
use std::collections::BTreeMap;

/// Строка входного файла: пары (колонка, значение) в исходном порядке колонок.
///
/// Имена колонок хранятся как есть, с исходным регистром и пробелами.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Создает строку из пар (колонка, значение).
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = RawRow::new();
        for (key, value) in pairs {
            row.insert(key, value);
        }
        row
    }

    /// Добавляет колонку. Значение колонки с точно таким же именем заменяется.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((key, value)),
        }
    }

    /// Значение по точному совпадению имени колонки.
    pub fn get_exact(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Значение по имени без учета регистра и пробелов по краям.
    /// При нескольких совпадениях побеждает первая колонка.
    pub fn get_ignore_case(&self, key: &str) -> Option<&str> {
        self.find_ignore_case(key).map(|(_, v)| v)
    }

    fn find_ignore_case(&self, key: &str) -> Option<(&str, &str)> {
        let key = key.trim();
        self.cells
            .iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(key))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Ищет первую подходящую колонку по списку синонимов.
    ///
    /// Для каждого кандидата сначала проверяется точное совпадение, затем
    /// совпадение без учета регистра. Возвращает имя найденной колонки и значение.
    pub fn lookup(&self, candidates: &[&str]) -> Option<(&str, &str)> {
        candidates.iter().find_map(|candidate| {
            self.cells
                .iter()
                .find(|(k, _)| k == candidate)
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .or_else(|| self.find_ignore_case(candidate))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Каноническая запись транзакции после разрешения полей.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedEntry {
    /// Дата проводки в исходном виде.
    pub date: String,
    /// Дата валютирования.
    pub value_date: Option<String>,
    /// Описание/назначение платежа.
    pub description: String,
    pub debit: Money,
    pub credit: Money,
    /// Остаток из входного файла, если он там был. В расчете не участвует.
    pub balance_hint: Option<Money>,
    /// Поля конкретной схемы (`cheque_no`, `ref_no`, `branch_code`) и все
    /// нераспознанные колонки без изменений.
    pub extra: BTreeMap<String, String>,
}

impl ResolvedEntry {
    /// Изменение остатка: поступление минус списание.
    pub fn delta(&self) -> Money {
        self.credit - self.debit
    }

    /// Значение поля в виде текста для вывода в таблицу.
    ///
    /// Денежные поля здесь не форматируются, это делает шаблон.
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Date => &self.date,
            Field::ValueDate => self.value_date.as_deref().unwrap_or(""),
            Field::Description => &self.description,
            other => self.extra.get(other.name()).map(String::as_str).unwrap_or(""),
        }
    }
}

/// Собирает значения полей и запоминает использованные колонки.
struct FieldLookup<'a> {
    schema: &'a BankSchema,
    row: &'a RawRow,
    consumed: Vec<&'a str>,
}

impl<'a> FieldLookup<'a> {
    fn new(schema: &'a BankSchema, row: &'a RawRow) -> Self {
        Self {
            schema,
            row,
            consumed: Vec::new(),
        }
    }

    fn get(&mut self, field: Field) -> Option<&'a str> {
        let (key, value) = self.row.lookup(self.schema.synonyms_for(field))?;
        self.consumed.push(key);
        Some(value)
    }

    /// Значение поля без пробелов по краям; пустое значение считается отсутствующим.
    fn text(&mut self, field: Field) -> Option<String> {
        let value = self.get(field)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    fn passthrough(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.row
            .iter()
            .filter(move |(k, _)| !self.consumed.contains(k))
    }
}

/// Разрешает одну строку входного файла по схеме банка.
///
/// `prior_balance_hint` задает остаток до этой строки. Он нужен только для строк,
/// в которых нет ни списания, ни поступления, но есть итоговый остаток: тогда
/// движение вычисляется как разница остатков.
pub fn resolve(schema: &BankSchema, row: &RawRow, prior_balance_hint: Option<Money>) -> ResolvedEntry {
    let mut lookup = FieldLookup::new(schema, row);

    let date = lookup.text(Field::Date).unwrap_or_else(|| {
        tracing::debug!("В строке нет даты ({} колонок)", row.len());
        String::new()
    });
    let value_date = lookup.text(Field::ValueDate);
    let description = lookup.text(Field::Description).unwrap_or_default();

    let (mut debit, mut credit, has_movement) = match schema.amount_mode {
        AmountMode::Split => {
            let debit_raw = lookup.text(Field::Debit);
            let credit_raw = lookup.text(Field::Credit);
            let has_movement = debit_raw.is_some() || credit_raw.is_some();
            (
                parse_amount(debit_raw.as_deref()),
                parse_amount(credit_raw.as_deref()),
                has_movement,
            )
        }
        AmountMode::Indicator => {
            let amount_raw = lookup.text(Field::Amount);
            let indicator = lookup.text(Field::DrCr);
            let amount = parse_amount(amount_raw.as_deref());
            let (debit, credit) = split_by_indicator(amount, indicator.as_deref());
            (debit, credit, amount_raw.is_some())
        }
    };

    let balance_hint = lookup.text(Field::Balance).map(|b| parse_amount(Some(&b)));

    if !has_movement {
        match (balance_hint, prior_balance_hint) {
            (Some(balance), Some(prior)) => {
                let delta = balance - prior;
                if delta.is_negative() {
                    debit = delta.abs();
                } else {
                    credit = delta;
                }
                tracing::debug!("Движение {} вычислено по остатку {}", delta, balance);
            }
            _ => tracing::debug!("В строке от {:?} нет суммы, движение 0.00", date),
        }
    }

    let mut extra = BTreeMap::new();
    for (field, _) in schema.transaction_fields {
        if matches!(field, Field::ChequeNo | Field::RefNo | Field::BranchCode) {
            if let Some(value) = lookup.text(*field) {
                extra.insert(field.name().to_string(), value);
            }
        }
    }
    for (key, value) in lookup.passthrough() {
        extra.entry(key.to_string()).or_insert_with(|| value.to_string());
    }

    ResolvedEntry {
        date,
        value_date,
        description,
        debit,
        credit,
        balance_hint,
        extra,
    }
}

/// Делит сумму на списание и поступление по индикатору `Dr`/`Cr`.
///
/// Без распознанного индикатора решает знак суммы: отрицательная означает списание.
fn split_by_indicator(amount: Money, indicator: Option<&str>) -> (Money, Money) {
    match indicator.and_then(|s| s.chars().next()) {
        Some('D') | Some('d') => (amount.abs(), Money::ZERO),
        Some('C') | Some('c') => (Money::ZERO, amount.abs()),
        _ if amount.is_negative() => (amount.abs(), Money::ZERO),
        _ => (Money::ZERO, amount),
    }
}

/// Разрешает все строки файла, передавая текущий остаток как подсказку.
pub fn resolve_rows(schema: &BankSchema, rows: &[RawRow], opening_balance: Money) -> Vec<ResolvedEntry> {
    let mut running = opening_balance;
    rows.iter()
        .map(|row| {
            let entry = resolve(schema, row, Some(running));
            running += entry.delta();
            entry
        })
        .collect()
}
