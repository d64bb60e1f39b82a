// src/export/xlsx.rs

use crate::errors::AppResult;
use crate::export::report::{Cell, Merge, ReportSheet, RowRole};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

const ROW_HEIGHT: f64 = 15.0;
const TITLE_FONT_SIZE: f64 = 14.0;
const A4_PAPER: u8 = 9;

struct Styles {
    title: Format,
    header: Format,
    text: Format,
    number: Format,
    total: Format,
    plain: Format,
    footer: Format,
}

impl Styles {
    fn new(number_format: Option<&str>) -> Self {
        let centered = Format::new()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
        let bordered = centered
            .clone()
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::Black);

        let number = match number_format {
            Some(f) => bordered.clone().set_num_format(f),
            None => bordered.clone(),
        };

        Self {
            title: centered.clone().set_bold().set_font_size(TITLE_FONT_SIZE),
            header: bordered.clone().set_bold(),
            text: bordered.clone(),
            total: number.clone().set_bold(),
            number,
            plain: centered,
            footer: Format::new()
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::VerticalCenter)
                .set_bold(),
        }
    }
}

/// Render the sheet into an in-memory `.xlsx` file.
pub fn render_xlsx(sheet: &ReportSheet) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheet.sheet_name)?;

    let styles = Styles::new(sheet.kind.number_format());

    for (r, row) in sheet.rows.iter().enumerate() {
        let r = r as u32;
        worksheet.set_row_height(r, ROW_HEIGHT)?;

        let merges: Vec<&Merge> = sheet.merges_on(r).collect();
        let merged = |c: u16| merges.iter().any(|m| (m.first_col..=m.last_col).contains(&c));

        match row.role {
            RowRole::Title | RowRole::Blank | RowRole::Separator | RowRole::Footer => {}
            RowRole::Header => {
                write_cells(worksheet, r, &row.cells, &merged, &styles.header, &styles.header)?
            }
            RowRole::Data => {
                write_cells(worksheet, r, &row.cells, &merged, &styles.text, &styles.number)?
            }
            RowRole::GrandTotal => {
                write_cells(worksheet, r, &row.cells, &merged, &styles.plain, &styles.total)?
            }
        }

        let merge_fmt = match row.role {
            RowRole::Title => &styles.title,
            RowRole::GrandTotal => &styles.total,
            RowRole::Footer => &styles.footer,
            _ => &styles.text,
        };
        for m in merges {
            let label = match row.cells.get(m.first_col as usize) {
                Some(Cell::Text(s)) => s.as_str(),
                _ => "",
            };
            worksheet.merge_range(r, m.first_col, r, m.last_col, label, merge_fmt)?;
        }
    }

    for (c, w) in sheet.column_widths.iter().enumerate() {
        worksheet.set_column_width(c as u16, *w)?;
    }

    // single landscape A4 page
    let last_row = sheet.rows.len().saturating_sub(1) as u32;
    worksheet
        .set_landscape()
        .set_paper_size(A4_PAPER)
        .set_print_fit_to_pages(1, 1)
        .set_margins(0.5, 0.5, 0.5, 0.5, 0.3, 0.3);
    worksheet.set_print_area(0, 0, last_row, sheet.print_last_col())?;

    Ok(workbook.save_to_buffer()?)
}

/// Cells covered by a merge are left to the merged range. Blank cells keep
/// the row's border.
fn write_cells(
    ws: &mut Worksheet,
    row: u32,
    cells: &[Cell],
    merged: &dyn Fn(u16) -> bool,
    text_fmt: &Format,
    number_fmt: &Format,
) -> AppResult<()> {
    for (c, cell) in cells.iter().enumerate() {
        let c = c as u16;
        if merged(c) {
            continue;
        }
        match cell {
            Cell::Empty => {
                ws.write_blank(row, c, text_fmt)?;
            }
            Cell::Text(s) => {
                ws.write_string_with_format(row, c, s, text_fmt)?;
            }
            Cell::Number(n) => {
                ws.write_number_with_format(row, c, *n, number_fmt)?;
            }
        }
    }
    Ok(())
}
