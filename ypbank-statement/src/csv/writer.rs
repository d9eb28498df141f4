//! Запись CSV: шаблон для ручного ввода и рассчитанный журнал.

use crate::error::Result;
use crate::ledger::LedgerEntry;
use crate::schema::{BankSchema, Field};
use std::io::Write;

/// Пишет шаблон: одна строка заголовков с каноническими колонками банка.
pub fn write_template<W: Write>(schema: &BankSchema, writer: W) -> Result<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(schema.input_fields().iter().map(Field::name))?;
    wtr.flush()?;
    Ok(())
}

/// Пишет журнал с рассчитанным остатком.
///
/// Колонки соответствуют каноническим полям таблицы банка; для схем с индикатором
/// сумма уже разнесена по `debit`/`credit`. Нулевые списания и поступления
/// остаются пустыми, как в банковских выгрузках.
pub fn write_ledger<W: Write>(schema: &BankSchema, ledger: &[LedgerEntry], writer: W) -> Result<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(schema.transaction_fields.iter().map(|(field, _)| field.name()))?;

    for item in ledger {
        let record: Vec<String> = schema
            .transaction_fields
            .iter()
            .map(|(field, _)| match field {
                Field::Debit => non_zero(item.entry.debit),
                Field::Credit => non_zero(item.entry.credit),
                Field::Balance => item.balance.to_string(),
                other => item.entry.text(*other).to_string(),
            })
            .collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn non_zero(amount: crate::amount::Money) -> String {
    if amount.is_zero() {
        String::new()
    } else {
        amount.to_string()
    }
}
