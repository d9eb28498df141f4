//! CLI-утилита для расчета остатков по выгрузке банка.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

use ypbank_statement::csv::{read_rows, write_ledger, write_template};
use ypbank_statement::schema::AmountMode;
use ypbank_statement::{parse_amount, prepare, schema_for, BankId, LedgerEntry, LedgerTotals, StatementRequest};

/// YPBank Ledger - журнал с остатками и шаблоны CSV.
#[derive(Parser)]
#[command(name = "ypbank-ledger")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Подробный вывод
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Показать журнал с остатками и итоги
    Show {
        /// Код банка
        #[arg(long, short)]
        bank: String,

        /// CSV-файл с транзакциями (по умолчанию stdin)
        #[arg(long, short)]
        input: Option<String>,

        /// Входящий остаток
        #[arg(long = "opening-balance", allow_hyphen_values = true)]
        opening_balance: Option<String>,

        /// Вывести журнал в CSV
        #[arg(long)]
        csv: bool,
    },
    /// Вывести пустой CSV-шаблон банка
    Template {
        /// Код банка
        #[arg(long, short)]
        bank: String,
    },
    /// Список поддерживаемых банков
    Banks,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn format_entry(item: &LedgerEntry) -> String {
    format!(
        "{:>4} {:<12} {:<40} {:>14} {:>14} {:>16}",
        item.position,
        item.entry.date,
        truncate(&item.entry.description, 40),
        item.entry.debit.to_string(),
        item.entry.credit.to_string(),
        item.balance.to_string()
    )
}

fn print_ledger(ledger: &[LedgerEntry], totals: &LedgerTotals) {
    println!(
        "{:>4} {:<12} {:<40} {:>14} {:>14} {:>16}",
        "#", "Дата", "Описание", "Списание", "Поступление", "Остаток"
    );
    for item in ledger {
        println!("{}", format_entry(item));
    }

    println!();
    println!("Входящий остаток:  {}", totals.opening);
    println!("Всего списаний:    {}", totals.total_debit);
    println!("Всего поступлений: {}", totals.total_credit);
    println!("Исходящий остаток: {}", totals.closing);
    println!("Транзакций:        {}", totals.count);
}

fn show(bank: &str, input: Option<&str>, opening_balance: Option<&str>, csv: bool) -> Result<(), String> {
    let rows = match input {
        Some(path) => {
            let file = File::open(path).map_err(|e| format!("Не удалось открыть файл '{}': {}", path, e))?;
            read_rows(file)
        }
        None => read_rows(io::stdin().lock()),
    }
    .map_err(|e| format!("Ошибка чтения транзакций: {}", e))?;

    let request = StatementRequest {
        bank: bank.to_string(),
        opening_balance: parse_amount(opening_balance),
        rows,
        ..StatementRequest::default()
    };
    let prepared = prepare(&request).map_err(|e| e.to_string())?;

    if csv {
        write_ledger(prepared.schema, &prepared.ledger, io::stdout().lock()).map_err(|e| e.to_string())
    } else {
        print_ledger(&prepared.ledger, &prepared.totals);
        Ok(())
    }
}

fn template(bank: &str) -> Result<(), String> {
    let schema = schema_for(bank).map_err(|e| e.to_string())?;
    write_template(schema, io::stdout().lock()).map_err(|e| e.to_string())
}

fn banks() {
    for id in BankId::ALL {
        let schema = ypbank_statement::schema(id);
        let mode = match schema.amount_mode {
            AmountMode::Split => "списание/поступление",
            AmountMode::Indicator => "сумма + Dr/Cr",
        };
        println!("{:<7} {:<32} {}", id.code(), schema.name, mode);
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Command::Show {
            ref bank,
            ref input,
            ref opening_balance,
            csv,
        } => show(bank, input.as_deref(), opening_balance.as_deref(), csv),
        Command::Template { ref bank } => template(bank),
        Command::Banks => {
            banks();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Ошибка: {}", e);
        process::exit(1);
    }
}
