//! CLI-утилита для генерации банковской выписки в PDF.

use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, Write};
use std::process;
use tracing_subscriber::EnvFilter;

use ypbank_statement::csv::read_rows;
use ypbank_statement::{
    generate_statement, parse_amount, template_for, AccountProfile, ApproxMetrics, BankId, ListingSurface, NoAssets,
    PdfSurface, StatementRequest, TableTemplate,
};

/// Формат результата.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// PDF-документ
    Pdf,
    /// Текстовый листинг команд отрисовки
    Listing,
}

/// YPBank Render - генерация выписки по шаблону банка.
///
/// Транзакции читаются из CSV (по умолчанию stdin) или из JSON-запроса.
#[derive(Parser)]
#[command(name = "ypbank-render")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Код банка (SBI, PNB, HDFC, ICICI, AXIS, KOTAK, BOB, CANARA)
    #[arg(long, short)]
    bank: Option<String>,

    /// CSV-файл с транзакциями
    #[arg(long, short)]
    input: Option<String>,

    /// JSON-запрос целиком: банк, остаток, реквизиты и транзакции
    #[arg(long, short, conflicts_with = "input")]
    request: Option<String>,

    /// JSON-файл с реквизитами счета
    #[arg(long, short)]
    profile: Option<String>,

    /// Входящий остаток
    #[arg(long = "opening-balance", allow_hyphen_values = true)]
    opening_balance: Option<String>,

    /// Выходной файл (по умолчанию stdout)
    #[arg(long, short)]
    output: Option<String>,

    /// Формат результата
    #[arg(long, short, value_enum, default_value = "pdf")]
    format: OutputFormat,

    /// Подробный вывод
    #[arg(short, long)]
    verbose: bool,
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

fn open(path: &str) -> Result<File, String> {
    File::open(path).map_err(|e| format!("Не удалось открыть файл '{}': {}", path, e))
}

fn build_request(args: &Args) -> Result<StatementRequest, String> {
    let mut request = match args.request {
        Some(ref path) => StatementRequest::from_json_reader(open(path)?)
            .map_err(|e| format!("Ошибка в запросе '{}': {}", path, e))?,
        None => {
            let rows = match args.input {
                Some(ref path) => read_rows(open(path)?),
                None => read_rows(io::stdin().lock()),
            }
            .map_err(|e| format!("Ошибка чтения транзакций: {}", e))?;
            StatementRequest {
                rows,
                ..StatementRequest::default()
            }
        }
    };

    if let Some(ref bank) = args.bank {
        request.bank = bank.clone();
    }
    if request.bank.trim().is_empty() {
        return Err("Не указан банк: используйте --bank или поле bank в запросе".to_string());
    }
    if let Some(ref path) = args.profile {
        request.profile = AccountProfile::from_json_reader(open(path)?)
            .map_err(|e| format!("Ошибка в реквизитах '{}': {}", path, e))?;
    }
    if let Some(ref balance) = args.opening_balance {
        request.opening_balance = parse_amount(Some(balance));
    }

    Ok(request)
}

fn render(request: &StatementRequest, format: OutputFormat) -> Result<Vec<u8>, String> {
    let bank: BankId = request.bank.parse().map_err(|e| format!("{}", e))?;

    match format {
        OutputFormat::Pdf => {
            let d = template_for(bank).descriptor();
            let surface = PdfSurface::new(template_for(bank).institution_name(), d.page_width, d.page_height)
                .map_err(|e| e.to_string())?;
            generate_statement(request, &ApproxMetrics, &NoAssets, surface).map_err(|e| e.to_string())
        }
        OutputFormat::Listing => generate_statement(request, &ApproxMetrics, &NoAssets, ListingSurface::new())
            .map(String::into_bytes)
            .map_err(|e| e.to_string()),
    }
}

fn write_output(path: Option<&str>, bytes: &[u8]) -> Result<(), String> {
    match path {
        Some(path) => {
            let mut file =
                File::create(path).map_err(|e| format!("Не удалось создать файл '{}': {}", path, e))?;
            file.write_all(bytes).map_err(|e| format!("Ошибка записи: {}", e))
        }
        None => io::stdout()
            .write_all(bytes)
            .map_err(|e| format!("Ошибка записи: {}", e)),
    }
}

fn run(args: &Args) -> Result<(), String> {
    let request = build_request(args)?;
    let bytes = render(&request, args.format)?;
    write_output(args.output.as_deref(), &bytes)
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Ошибка: {}", e);
        process::exit(1);
    }
}
