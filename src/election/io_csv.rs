// Primitives for reading CSV files.

use crate::election::*;

/// Reads all the lines of a CSV export, header included. Lines may have
/// different lengths.
pub fn read_csv_rows(path: &str) -> BElectionResult<Vec<Vec<String>>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut res: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let line = line_r.context(CsvLineParseSnafu {})?;
        debug!("read_csv_rows: lineno: {:?} row: {:?}", idx + 1, &line);
        res.push(line.iter().map(|s| s.to_string()).collect());
    }
    Ok(res)
}
