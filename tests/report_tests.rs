use faresheet::core::period::PayPeriod;
use faresheet::errors::AppError;
use faresheet::export::naming::{code_from_file_name, fare_file_name, timesheet_file_name};
use faresheet::export::report::{Cell, GRAND_TOTAL_LABEL, Merge, RowRole};
use faresheet::export::xlsx::render_xlsx;
use faresheet::export::{ReportBuilder, ReportKind, ReportRow};
use std::io::{Cursor, Read};

mod common;
use common::{approx, day};

fn row(emp: &str, name: &str, loc: &str, date: &str, value: f64) -> ReportRow {
    ReportRow {
        emp_id: emp.into(),
        name: name.into(),
        location: loc.into(),
        date: day(date),
        value,
    }
}

/// Two employees, two locations each, three distinct dates.
fn sample_rows() -> Vec<ReportRow> {
    vec![
        row("1001", "Aslam", "Fahaheel", "2025-11-01", 0.5),
        row("1001", "Aslam", "Farwaniya 1", "2025-11-02", 0.25),
        row("1001", "Aslam", "Fahaheel", "2025-11-03", 0.5),
        row("2002", "Anas", "Jaleeb", "2025-11-02", 1.0),
        row("2002", "Anas", "Mangaf", "2025-11-03", 0.75),
        // same day twice: summed
        row("2002", "Anas", "Mangaf", "2025-11-03", 0.25),
    ]
}

fn text(c: &Cell) -> Option<&str> {
    match c {
        Cell::Text(s) => Some(s),
        _ => None,
    }
}

fn number(c: &Cell) -> Option<f64> {
    match c {
        Cell::Number(n) => Some(*n),
        _ => None,
    }
}

#[test]
fn test_report_layout() {
    let signatories = vec!["P/B".to_string(), "HRM".to_string()];
    let sheet = ReportBuilder::new(ReportKind::Fare, "PART TIME CASHIER BUS FARE - NOV - 2025")
        .signatories(&signatories)
        .build(&sample_rows())
        .unwrap();

    // NO, EMP ID, NAME, LOCATION, 3 dates, TOTAL
    assert_eq!(sheet.column_count(), 8);
    assert_eq!(sheet.dates.len(), 3);

    assert_eq!(sheet.rows[0].role, RowRole::Title);
    assert_eq!(sheet.rows[1].role, RowRole::Blank);
    let header: Vec<&str> = sheet.rows[2].cells.iter().filter_map(text).collect();
    assert_eq!(
        header,
        vec!["NO", "EMP ID", "NAME", "LOCATION", "01-Nov-25", "02-Nov-25", "03-Nov-25", "TOTAL"]
    );

    let data: Vec<_> = sheet.rows_with_role(RowRole::Data).collect();
    assert_eq!(data.len(), 4);

    // first line of an employee carries NO / EMP ID / NAME, the second does not
    let (_, first) = data[0];
    assert_eq!(number(&first.cells[0]), Some(1.0));
    assert_eq!(text(&first.cells[1]), Some("1001"));
    assert_eq!(text(&first.cells[3]), Some("Fahaheel"));
    assert_eq!(first.cells[5], Cell::Empty);
    assert_eq!(number(&first.cells[7]), Some(1.0));

    let (_, second) = data[1];
    assert_eq!(second.cells[0], Cell::Empty);
    assert_eq!(text(&second.cells[3]), Some("Farwaniya 1"));

    let (_, mangaf) = data[3];
    assert_eq!(number(&mangaf.cells[0]), None);
    assert_eq!(number(&mangaf.cells[6]), Some(1.0));

    assert_eq!(sheet.rows_with_role(RowRole::Separator).count(), 2);

    let (total_row, total) = sheet.rows_with_role(RowRole::GrandTotal).next().unwrap();
    assert_eq!(text(&total.cells[0]), Some(GRAND_TOTAL_LABEL));
    assert!(approx(number(&total.cells[7]).unwrap(), 3.25));
    assert!(approx(sheet.grand_total, 3.25));

    assert!(sheet.merges.contains(&Merge { row: 0, first_col: 0, last_col: 7 }));
    assert!(sheet.merges.contains(&Merge { row: total_row, first_col: 0, last_col: 3 }));

    let (_, footer) = sheet.rows_with_role(RowRole::Footer).next().unwrap();
    let labels: Vec<&str> = footer.cells.iter().filter_map(text).collect();
    assert_eq!(labels, vec!["P/B:", "HRM:"]);

    assert!(sheet.column_widths.iter().all(|w| *w <= 30.0));
}

#[test]
fn test_empty_rows_are_rejected() {
    let err = ReportBuilder::new(ReportKind::Timesheet, "x").build(&[]).unwrap_err();
    assert!(matches!(err, AppError::EmptySelection(_)));
}

#[test]
fn test_sheet_name_is_sanitized() {
    let sheet = ReportBuilder::new(ReportKind::Timesheet, "t")
        .sheet_name("Farwaniya/Jaleeb: [all]")
        .build(&sample_rows())
        .unwrap();
    assert_eq!(sheet.sheet_name, "FarwaniyaJaleeb all");
}

#[test]
fn test_xlsx_contains_title_headers_and_merges() {
    let sheet = ReportBuilder::new(ReportKind::Timesheet, "PART TIME CASHIER - NOVEMBER-2025 (Farwaniya)")
        .sheet_name("Farwaniya")
        .signatories(&["PREPARED BY".to_string()])
        .build(&sample_rows())
        .unwrap();
    let bytes = render_xlsx(&sheet).unwrap();

    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid xlsx");

    let mut strings = String::new();
    zip.by_name("xl/sharedStrings.xml")
        .unwrap()
        .read_to_string(&mut strings)
        .unwrap();
    assert!(strings.contains("PART TIME CASHIER - NOVEMBER-2025 (Farwaniya)"));
    assert!(strings.contains("EMP ID"));
    assert!(strings.contains("03-Nov-25"));
    assert!(strings.contains("SUBTOTAL"));
    assert!(strings.contains("PREPARED BY"));

    let mut workbook = String::new();
    zip.by_name("xl/workbook.xml")
        .unwrap()
        .read_to_string(&mut workbook)
        .unwrap();
    assert!(workbook.contains("Farwaniya"));

    let mut sheet1 = String::new();
    zip.by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut sheet1)
        .unwrap();
    assert!(sheet1.contains("<mergeCell ref=\"A1:H1\"/>"));
    assert!(sheet1.contains("landscape"));

    // every merge of the layout, and nothing else
    for m in &sheet.merges {
        let range = format!(
            "<mergeCell ref=\"{}{}:{}{}\"/>",
            col_letter(m.first_col),
            m.row + 1,
            col_letter(m.last_col),
            m.row + 1
        );
        assert!(sheet1.contains(&range), "missing {range}");
    }
    assert_eq!(sheet1.matches("<mergeCell ref=").count(), sheet.merges.len());
}

fn col_letter(c: u16) -> char {
    (b'A' + c as u8) as char
}

fn zip_entry(bytes: Vec<u8>, name: &str) -> String {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid xlsx");
    let mut out = String::new();
    zip.by_name(name).unwrap().read_to_string(&mut out).unwrap();
    out
}

#[test]
fn test_print_area_covers_a_footer_wider_than_the_table() {
    let signatories: Vec<String> = ["P/B", "HRM", "FM", "COO"].iter().map(|s| s.to_string()).collect();
    let rows = vec![row("1001", "Aslam", "Fahaheel", "2025-11-01", 0.5)];
    let sheet = ReportBuilder::new(ReportKind::Fare, "PART TIME CASHIER BUS FARE - NOV - 2025")
        .signatories(&signatories)
        .build(&rows)
        .unwrap();

    // NO, EMP ID, NAME, LOCATION, one date, TOTAL; the footer needs eight
    assert_eq!(sheet.last_col(), 5);
    assert_eq!(sheet.print_last_col(), 7);

    let workbook = zip_entry(render_xlsx(&sheet).unwrap(), "xl/workbook.xml");
    let last_row = sheet.rows.len();
    assert!(
        workbook.contains(&format!("!$A$1:$H${last_row}")),
        "print area too narrow: {workbook}"
    );
}

#[test]
fn test_report_file_names_carry_the_code() {
    let period = PayPeriod::containing(day("2025-10-30"));

    let names = vec![
        "Aslam".to_string(),
        "Mohd Anas".to_string(),
        "Aslam".to_string(),
    ];
    let fare = fare_file_name(&names, &period, 7);
    assert_eq!(fare, "aslam-mohd-anas-fare-NOV-2025_07.xlsx");
    assert_eq!(code_from_file_name(&fare), Some(7));

    let ts = timesheet_file_name("Mohd Aslam", "Farwaniya", &period, 42);
    assert_eq!(ts, "mohd-aslam-timesheet-farwaniya-november-2025_42.xlsx");
    assert_eq!(code_from_file_name(&ts), Some(42));

    assert_eq!(code_from_file_name("report.xlsx"), None);
}
