//! Чтение CSV с транзакциями.

use crate::error::{Error, Result};
use crate::resolve::RawRow;
use std::io::Read;

/// Читает CSV из любого источника, реализующего трейт Read.
///
/// Первая строка обязана быть заголовком. Имена колонок сохраняются как есть,
/// сопоставлением с каноническими полями занимается резолвер. Полностью
/// пустые строки пропускаются, лишние значения без заголовка получают имена
/// `column_N`.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::InvalidFormat(
            "CSV без строки заголовков".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            tracing::trace!("Пустая строка {} пропущена", idx + 2);
            continue;
        }

        let mut row = RawRow::new();
        for (col, value) in record.iter().enumerate() {
            match headers.get(col) {
                Some(name) => row.insert(name, value),
                None => row.insert(format!("column_{}", col + 1), value),
            }
        }
        rows.push(row);
    }

    tracing::debug!("Прочитано {} строк CSV", rows.len());
    Ok(rows)
}

/// Читает CSV из строки.
pub fn parse_rows(content: &str) -> Result<Vec<RawRow>> {
    read_rows(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows_keeps_header_names() {
        let rows = parse_rows("Txn Date, Narration ,Withdrawal\n01/04/2024,\"NEFT, ACME\",\"1,500.00\"\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_exact(" Narration "), Some("NEFT, ACME"));
        assert_eq!(rows[0].get_ignore_case("withdrawal"), Some("1,500.00"));
    }

    #[test]
    fn test_blank_lines_skipped_and_extra_columns_named() {
        let rows = parse_rows("date,debit\n01/04/2024,10,note\n,\n02/04/2024,20\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_exact("column_3"), Some("note"));
        assert_eq!(rows[1].get_exact("debit"), Some("20"));
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(matches!(parse_rows(""), Err(Error::InvalidFormat(_))));
    }
}
