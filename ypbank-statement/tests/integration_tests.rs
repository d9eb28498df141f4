//! Интеграционные тесты для ypbank-statement.

use std::cell::Cell;

use ypbank_statement::csv::{parse_rows, write_template};
use ypbank_statement::layout::{FontSpec, Instruction, MeasureError, RowKind};
use ypbank_statement::{
    generate_statement, prepare, schema, AccountProfile, ApproxMetrics, AssetProvider, BankId, Error, ImageAsset,
    ListingSurface, Money, NoAssets, RawRow, RenderSurface, StatementRequest, TableTemplate, TextMeasure,
};

/// Поверхность, которая только считает полученные команды.
struct CountingSurface<'a> {
    count: &'a Cell<usize>,
}

impl CountingSurface<'_> {
    fn bump(&mut self) -> ypbank_statement::Result<()> {
        self.count.set(self.count.get() + 1);
        Ok(())
    }
}

impl RenderSurface for CountingSurface<'_> {
    type Output = usize;

    fn text(&mut self, _x: f32, _y: f32, _text: &str, _font: &FontSpec) -> ypbank_statement::Result<()> {
        self.bump()
    }
    fn stroke_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) -> ypbank_statement::Result<()> {
        self.bump()
    }
    fn fill_rect(
        &mut self,
        _x: f32,
        _y: f32,
        _w: f32,
        _h: f32,
        _color: ypbank_statement::layout::Rgb,
    ) -> ypbank_statement::Result<()> {
        self.bump()
    }
    fn line(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32) -> ypbank_statement::Result<()> {
        self.bump()
    }
    fn image(&mut self, _asset: &str, _x: f32, _y: f32, _w: f32, _h: f32) -> ypbank_statement::Result<()> {
        self.bump()
    }
    fn advance_page(&mut self) -> ypbank_statement::Result<()> {
        self.bump()
    }
    fn finish(self) -> ypbank_statement::Result<usize> {
        Ok(self.count.get())
    }
}

/// Метрики, которые не умеют измерять ничего.
struct BrokenMetrics;

impl TextMeasure for BrokenMetrics {
    fn text_width(&self, _text: &str, font: &FontSpec) -> Result<f32, MeasureError> {
        Err(MeasureError::InvalidFontSize(font.size))
    }
}

struct Logos;

impl AssetProvider for Logos {
    fn image(&self, name: &str) -> Option<ImageAsset> {
        Some(ImageAsset {
            name: name.to_string(),
            width: 120.0,
            height: 40.0,
        })
    }
}

fn pnb_request() -> StatementRequest {
    let mut request = StatementRequest::new("PNB");
    request.profile = AccountProfile::from_pairs([
        ("account_name", "R. Sharma"),
        ("account_number", "0123456789"),
    ]);
    request.rows = vec![
        RawRow::from_pairs([("Txn Date", "01/04/2024"), ("Withdrawal", "100"), ("Narration", "ATM WDL")]),
        RawRow::from_pairs([("Txn Date", "02/04/2024"), ("Deposit", "250"), ("Narration", "SALARY")]),
        RawRow::from_pairs([("Txn Date", "03/04/2024"), ("Withdrawal", "50"), ("Narration", "UPI")]),
    ];
    request
}

fn many_rows(count: usize) -> Vec<RawRow> {
    (0..count)
        .map(|i| {
            let description = if i % 7 == 0 {
                "NEFT transfer to ACME Industries Private Limited for invoice settlement of March quarter"
            } else {
                "UPI payment"
            };
            RawRow::from_pairs([
                ("date", format!("{:02}/05/2024", i % 28 + 1)),
                ("description", description.to_string()),
                ("credit", "1,000.00".to_string()),
            ])
        })
        .collect()
}

// =============================================================================
// Расчет журнала
// =============================================================================

#[test]
fn test_pnb_ledger_scenario() {
    let prepared = prepare(&pnb_request()).unwrap();

    let balances: Vec<Money> = prepared.ledger.iter().map(|e| e.balance).collect();
    assert_eq!(
        balances,
        vec![Money::from_minor(-10000), Money::from_minor(15000), Money::from_minor(10000)]
    );
    assert_eq!(prepared.totals.total_debit, Money::from_minor(15000));
    assert_eq!(prepared.totals.total_credit, Money::from_minor(25000));
    assert_eq!(prepared.totals.closing, Money::from_minor(10000));
    assert_eq!(prepared.totals.count, 3);
}

#[test]
fn test_unknown_bank_emits_nothing() {
    let count = Cell::new(0);
    let result = generate_statement(
        &StatementRequest::new("XYZ"),
        &ApproxMetrics,
        &NoAssets,
        CountingSurface { count: &count },
    );

    assert!(matches!(result, Err(Error::UnknownInstitution(code)) if code == "XYZ"));
    assert_eq!(count.get(), 0);
}

#[test]
fn test_measurement_failure_emits_nothing() {
    let count = Cell::new(0);
    let result = generate_statement(&pnb_request(), &BrokenMetrics, &NoAssets, CountingSurface { count: &count });

    assert!(matches!(result, Err(Error::Measurement { .. })));
    assert_eq!(count.get(), 0);
}

#[test]
fn test_generate_listing() {
    let listing = generate_statement(&pnb_request(), &ApproxMetrics, &NoAssets, ListingSurface::new()).unwrap();

    assert!(listing.starts_with("page 1: "));
    assert!(listing.contains("\"Punjab National Bank\""));
    assert!(listing.contains("\"ATM WDL\""));
    assert!(listing.contains("\"Closing Balance\""));
    assert!(listing.contains("\"100.00 Cr\""));
    assert!(!listing.contains("page 2: "));
}

#[test]
fn test_counting_surface_sees_every_instruction() {
    let prepared = prepare(&pnb_request()).unwrap();
    let layout = prepared.layout(&ApproxMetrics, &NoAssets).unwrap();

    let count = Cell::new(0);
    let seen = generate_statement(&pnb_request(), &ApproxMetrics, &NoAssets, CountingSurface { count: &count }).unwrap();
    assert_eq!(seen, layout.stream.len());
}

// =============================================================================
// Верстка
// =============================================================================

#[test]
fn test_pagination_invariants_for_every_bank() {
    for bank in BankId::ALL {
        let mut request = StatementRequest::new(bank.code());
        request.rows = many_rows(140);
        let prepared = prepare(&request).unwrap();
        let layout = prepared.layout(&ApproxMetrics, &NoAssets).unwrap();
        let d = prepared.template.descriptor();

        assert!(layout.page_count() > 2, "{}", bank);
        for row in &layout.rows {
            assert!(row.y + row.height <= d.page_bottom() + 1e-3, "{} {:?}", bank, row);
        }
        for page in 2..=layout.page_count() {
            if let Some(first) = layout.rows.iter().find(|r| r.page == page) {
                assert_eq!(first.y, d.continuation_offset, "{} page {}", bank, page);
            }
        }

        let body = layout
            .rows
            .iter()
            .filter(|r| matches!(r.kind, RowKind::Body { .. }))
            .count();
        assert_eq!(body, 140, "{}", bank);
    }
}

#[test]
fn test_page_numbers_follow_template() {
    let mut request = StatementRequest::new("SBI");
    request.rows = many_rows(100);
    let layout = prepare(&request).unwrap().layout(&ApproxMetrics, &NoAssets).unwrap();
    let pages = layout.page_count();
    let last = format!("Page {} of {}", pages, pages);
    assert!(layout.stream.texts().any(|t| t == last));

    request.bank = "BOB".to_string();
    let layout = prepare(&request).unwrap().layout(&ApproxMetrics, &NoAssets).unwrap();
    assert!(!layout.stream.texts().any(|t| t.starts_with("Page ")));
}

#[test]
fn test_header_attributes_follow_schema() {
    let prepared = prepare(&pnb_request()).unwrap();
    let layout = prepared.layout(&ApproxMetrics, &NoAssets).unwrap();
    let texts: Vec<&str> = layout.stream.texts().collect();

    let name = texts.iter().position(|t| *t == "R. Sharma").unwrap();
    let number = texts.iter().position(|t| *t == "0123456789").unwrap();
    assert!(name < number);
}

#[test]
fn test_logo_asset_is_used_when_available() {
    let prepared = prepare(&pnb_request()).unwrap();

    let with_logo = prepared.layout(&ApproxMetrics, &Logos).unwrap();
    let image = with_logo
        .stream
        .instructions
        .iter()
        .find_map(|i| match i {
            Instruction::Image { asset, height, .. } => Some((asset.clone(), *height)),
            _ => None,
        })
        .unwrap();
    assert_eq!(image.0, "pnb");
    assert!(image.1 > 0.0);

    let fallback = prepared.layout(&ApproxMetrics, &NoAssets).unwrap();
    assert!(fallback
        .stream
        .instructions
        .iter()
        .any(|i| matches!(i, Instruction::FillRect { .. })));
}

// =============================================================================
// CSV
// =============================================================================

#[test]
fn test_csv_indicator_bank_end_to_end() {
    let mut template = Vec::new();
    write_template(schema(BankId::Kotak), &mut template).unwrap();
    let mut content = String::from_utf8(template).unwrap();
    content.push_str("01/04/2024,Opening deposit,REF1,\"5,000.00\",CR,\n");
    content.push_str("02/04/2024,Card swipe,REF2,1200.50,DR,\n");
    content.push_str(",,,,,\n");
    content.push_str("03/04/2024,Reversal,REF3,-200,,\n");

    let mut request = StatementRequest::new("kotak");
    request.rows = parse_rows(&content).unwrap();
    let prepared = prepare(&request).unwrap();

    assert_eq!(prepared.ledger.len(), 3);
    assert_eq!(prepared.totals.total_credit, Money::from_minor(500000));
    assert_eq!(prepared.totals.total_debit, Money::from_minor(140050));
    assert_eq!(prepared.totals.closing, Money::from_minor(359950));
    assert_eq!(prepared.ledger[0].entry.text(ypbank_statement::Field::RefNo), "REF1");

    let listing = generate_statement(&request, &ApproxMetrics, &NoAssets, ListingSurface::new()).unwrap();
    assert!(listing.contains("\"Card swipe\""));
}

#[test]
fn test_balance_only_rows_derive_movement() {
    let mut request = StatementRequest::new("SBI");
    request.opening_balance = Money::from_minor(100000);
    request.rows = parse_rows("date,description,balance\n01/04/2024,Interest,1025.50\n02/04/2024,Charges,1000\n").unwrap();

    let prepared = prepare(&request).unwrap();
    assert_eq!(prepared.ledger[0].entry.credit, Money::from_minor(2550));
    assert_eq!(prepared.ledger[1].entry.debit, Money::from_minor(2550));
    assert_eq!(prepared.totals.closing, Money::from_minor(100000));
}

#[test]
fn test_csv_without_header_is_rejected() {
    let err = parse_rows("").unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)));
}
