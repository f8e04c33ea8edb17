// Reading ballots from Excel worksheets.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use snafu::OptionExt;

use crate::rcv::{io_common::*, *};

pub fn read_excel_ranking(path: &str, source: &TabularSource) -> RcvResult<Vec<RawBallot>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match &source.worksheet_name {
        Some(worksheet) => workbook.worksheet_range(worksheet).context(MissingWorksheetSnafu {
            path,
            worksheet: worksheet.clone(),
        })?,
        None => workbook.worksheet_range_at(0).context(MissingWorksheetSnafu {
            path,
            worksheet: "(first)".to_string(),
        })?,
    }
    .context(OpeningExcelSnafu { path })?;

    let mut iter = wrange.rows();
    if source.has_header {
        let header = iter.next();
        debug!("read_excel_ranking: header: {:?}", header);
    }
    let row_offset = if source.has_header { 2 } else { 1 };

    let mut res: Vec<RawBallot> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = idx + row_offset;
        let cells: Vec<String> = row
            .iter()
            .skip(source.first_vote_column)
            .map(|cell| read_choice_calamine(cell, lineno))
            .collect::<RcvResult<Vec<String>>>()?;
        let ballot = assemble_ranks(&cells);
        debug!("read_excel_ranking: lineno: {:?} ballot: {:?}", lineno, ballot);
        res.push(ballot);
    }
    Ok(res)
}

// Choices are names, but a spreadsheet may store a numeric name as a number.
fn read_choice_calamine(cell: &DataType, lineno: usize) -> RcvResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok(String::new()),
        DataType::Int(i) => Ok(i.to_string()),
        // Whole numbers are displayed without a fraction.
        DataType::Float(f) => Ok(f.to_string()),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}
