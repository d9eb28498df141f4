//! Модуль импорта и экспорта CSV.
//!
//! Импорт превращает файл с заголовком в набор строк [`RawRow`](crate::resolve::RawRow),
//! экспорт пишет пустой шаблон с каноническими колонками банка или
//! рассчитанный журнал.

pub mod parser;
pub mod writer;

pub use parser::{parse_rows, read_rows};
pub use writer::{write_ledger, write_template};
