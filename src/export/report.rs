//! Sheet layout of the HR reports, independent of the file format.
//!
//! ```text
//! row 0   title (merged across every column)
//! row 1   blank
//! row 2   NO | EMP ID | NAME | LOCATION | <dates...> | TOTAL
//!         one row per (employee, location), blank row after each employee
//!         SUBTOTAL (merged over the first four columns) ... grand total
//!         blank
//!         signature footer (label / blank pairs, merged)
//! ```

use crate::errors::{AppError, AppResult};
use crate::export::ReportKind;
use crate::utils::date::report_column_label;
use crate::utils::formatting::round2;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use unicode_width::UnicodeWidthStr;

const FIXED_HEADERS: [&str; 4] = ["NO", "EMP ID", "NAME", "LOCATION"];
const MAX_COLUMN_WIDTH: usize = 30;
const COLUMN_PADDING: usize = 2;
pub const GRAND_TOTAL_LABEL: &str = "SUBTOTAL";
/// Columns covered by the SUBTOTAL label.
const GRAND_TOTAL_SPAN: u16 = 4;

/// One value to place in the report: a fare sub-total or hours worked.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub emp_id: String,
    pub name: String,
    /// Location name, or location group for timesheets.
    pub location: String,
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    fn display_width(&self) -> usize {
        match self {
            Cell::Empty => 0,
            Cell::Text(s) => UnicodeWidthStr::width(s.as_str()),
            Cell::Number(n) => n.to_string().len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRole {
    Title,
    Blank,
    Header,
    Data,
    Separator,
    GrandTotal,
    Footer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub role: RowRole,
    pub cells: Vec<Cell>,
}

/// Inclusive merged range on a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    pub row: u32,
    pub first_col: u16,
    pub last_col: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSheet {
    pub kind: ReportKind,
    pub sheet_name: String,
    pub title: String,
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<SheetRow>,
    pub merges: Vec<Merge>,
    pub column_widths: Vec<f64>,
    pub grand_total: f64,
}

impl ReportSheet {
    pub fn column_count(&self) -> u16 {
        (FIXED_HEADERS.len() + self.dates.len() + 1) as u16
    }

    pub fn last_col(&self) -> u16 {
        self.column_count() - 1
    }

    /// Right-most column holding anything, the signature footer included.
    pub fn print_last_col(&self) -> u16 {
        let widest_row = self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        let widest_merge = self.merges.iter().map(|m| m.last_col).max().unwrap_or(0);
        self.last_col()
            .max(widest_row.saturating_sub(1) as u16)
            .max(widest_merge)
    }

    pub fn merges_on(&self, row: u32) -> impl Iterator<Item = &Merge> {
        self.merges.iter().filter(move |m| m.row == row)
    }

    pub fn rows_with_role(&self, role: RowRole) -> impl Iterator<Item = (u32, &SheetRow)> {
        self.rows
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.role == role)
            .map(|(i, r)| (i as u32, r))
    }
}

/// Values of one employee at one location, per date.
struct LocationLine {
    location: String,
    values: Vec<(NaiveDate, f64)>,
}

struct EmployeeBlock {
    emp_id: String,
    name: String,
    lines: Vec<LocationLine>,
}

/// Group rows by employee then location, both in first-seen order.
/// Values for the same date add up.
fn group_rows(rows: &[ReportRow]) -> Vec<EmployeeBlock> {
    let mut blocks: Vec<EmployeeBlock> = Vec::new();

    for r in rows {
        let idx = match blocks.iter().position(|b| b.emp_id == r.emp_id) {
            Some(i) => i,
            None => {
                blocks.push(EmployeeBlock {
                    emp_id: r.emp_id.clone(),
                    name: r.name.clone(),
                    lines: Vec::new(),
                });
                blocks.len() - 1
            }
        };
        let block = &mut blocks[idx];

        let line_idx = match block.lines.iter().position(|l| l.location == r.location) {
            Some(i) => i,
            None => {
                block.lines.push(LocationLine {
                    location: r.location.clone(),
                    values: Vec::new(),
                });
                block.lines.len() - 1
            }
        };
        let line = &mut block.lines[line_idx];

        match line.values.iter_mut().find(|(d, _)| *d == r.date) {
            Some((_, v)) => *v += r.value,
            None => line.values.push((r.date, r.value)),
        }
    }

    blocks
}

pub struct ReportBuilder {
    pub kind: ReportKind,
    pub title: String,
    pub sheet_name: String,
    pub signatories: Vec<String>,
}

impl ReportBuilder {
    pub fn new(kind: ReportKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            sheet_name: "Report".to_string(),
            signatories: Vec::new(),
        }
    }

    pub fn sheet_name(mut self, name: &str) -> Self {
        self.sheet_name = sanitize_sheet_name(name);
        self
    }

    pub fn signatories(mut self, labels: &[String]) -> Self {
        self.signatories = labels.to_vec();
        self
    }

    pub fn build(&self, rows: &[ReportRow]) -> AppResult<ReportSheet> {
        if rows.is_empty() {
            return Err(AppError::EmptySelection("no rows to report".into()));
        }

        let dates: Vec<NaiveDate> = rows
            .iter()
            .map(|r| r.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let width = FIXED_HEADERS.len() + dates.len() + 1;

        let mut out: Vec<SheetRow> = Vec::new();
        let mut merges = Vec::new();

        // title + spacer
        let mut title = vec![Cell::Empty; width];
        title[0] = Cell::Text(self.title.clone());
        out.push(SheetRow {
            role: RowRole::Title,
            cells: title,
        });
        merges.push(Merge {
            row: 0,
            first_col: 0,
            last_col: (width - 1) as u16,
        });
        out.push(SheetRow {
            role: RowRole::Blank,
            cells: Vec::new(),
        });

        // header
        let mut header: Vec<Cell> = FIXED_HEADERS
            .iter()
            .map(|h| Cell::Text(h.to_string()))
            .collect();
        header.extend(dates.iter().map(|d| Cell::Text(report_column_label(*d))));
        header.push(Cell::Text("TOTAL".to_string()));
        out.push(SheetRow {
            role: RowRole::Header,
            cells: header,
        });

        // body
        let mut grand_total = 0.0;
        for (no, block) in group_rows(rows).into_iter().enumerate() {
            for (i, line) in block.lines.iter().enumerate() {
                let mut cells = if i == 0 {
                    vec![
                        Cell::Number((no + 1) as f64),
                        Cell::Text(block.emp_id.clone()),
                        Cell::Text(block.name.clone()),
                    ]
                } else {
                    vec![Cell::Empty, Cell::Empty, Cell::Empty]
                };
                cells.push(Cell::Text(line.location.clone()));

                let mut total = 0.0;
                for d in &dates {
                    let v = line
                        .values
                        .iter()
                        .find(|(day, _)| day == d)
                        .map(|(_, v)| *v)
                        .unwrap_or(0.0);
                    if v == 0.0 {
                        cells.push(Cell::Empty);
                    } else {
                        total += v;
                        cells.push(Cell::Number(round2(v)));
                    }
                }

                let total = round2(total);
                grand_total += total;
                cells.push(Cell::Number(total));
                out.push(SheetRow {
                    role: RowRole::Data,
                    cells,
                });
            }

            out.push(SheetRow {
                role: RowRole::Separator,
                cells: Vec::new(),
            });
        }
        let grand_total = round2(grand_total);

        // grand total
        let total_row = out.len() as u32;
        let mut cells = vec![Cell::Empty; width];
        cells[0] = Cell::Text(GRAND_TOTAL_LABEL.to_string());
        cells[width - 1] = Cell::Number(grand_total);
        out.push(SheetRow {
            role: RowRole::GrandTotal,
            cells,
        });
        merges.push(Merge {
            row: total_row,
            first_col: 0,
            last_col: GRAND_TOTAL_SPAN - 1,
        });

        // footer
        out.push(SheetRow {
            role: RowRole::Blank,
            cells: Vec::new(),
        });
        if !self.signatories.is_empty() {
            let footer_row = out.len() as u32;
            let mut cells = vec![Cell::Empty; self.signatories.len() * 2];
            for (i, label) in self.signatories.iter().enumerate() {
                cells[i * 2] = Cell::Text(self.kind.footer_label(label));
                merges.push(Merge {
                    row: footer_row,
                    first_col: (i * 2) as u16,
                    last_col: (i * 2 + 1) as u16,
                });
            }
            out.push(SheetRow {
                role: RowRole::Footer,
                cells,
            });
        }

        let column_widths = column_widths(&out, width);

        Ok(ReportSheet {
            kind: self.kind,
            sheet_name: self.sheet_name.clone(),
            title: self.title.clone(),
            dates,
            rows: out,
            merges,
            column_widths,
            grand_total,
        })
    }
}

/// Longest value per column over the header and body rows, padded and capped.
/// The merged title and the footer are left out.
fn column_widths(rows: &[SheetRow], width: usize) -> Vec<f64> {
    let mut widths = vec![0usize; width];
    for row in rows
        .iter()
        .filter(|r| matches!(r.role, RowRole::Header | RowRole::Data))
    {
        for (c, cell) in row.cells.iter().enumerate().take(width) {
            widths[c] = widths[c].max(cell.display_width());
        }
    }
    widths
        .into_iter()
        .map(|w| (w + COLUMN_PADDING).min(MAX_COLUMN_WIDTH) as f64)
        .collect()
}

/// Excel sheet names: at most 31 chars, none of `[]:*?/\`.
fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Report".to_string()
    } else {
        cleaned
    }
}
