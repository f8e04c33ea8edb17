// Primitives for reading CSV files.

use std::io::Read;

use crate::rcv::{io_common::*, *};

pub fn read_csv_ranking(path: &str, source: &TabularSource) -> RcvResult<Vec<RawBallot>> {
    let rdr = csv_builder(source)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_records(rdr, source)
}

pub fn parse_csv_ranking(contents: &str, source: &TabularSource) -> RcvResult<Vec<RawBallot>> {
    let rdr = csv_builder(source).from_reader(contents.as_bytes());
    read_records(rdr, source)
}

fn csv_builder(source: &TabularSource) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(source.has_header).flexible(true);
    builder
}

fn read_records<R: Read>(
    rdr: csv::Reader<R>,
    source: &TabularSource,
) -> RcvResult<Vec<RawBallot>> {
    // Line numbers start at 1, after the header if any.
    let row_offset = if source.has_header { 2 } else { 1 };
    let mut res: Vec<RawBallot> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + row_offset;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let cells: Vec<&str> = line.iter().skip(source.first_vote_column).collect();
        let ballot = assemble_ranks(&cells);
        debug!("read_csv_ranking: lineno: {:?} ballot: {:?}", lineno, ballot);
        res.push(ballot);
    }
    Ok(res)
}
