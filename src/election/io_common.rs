// Layout of a form-responses sheet, shared by the CSV and Excel readers.

use std::path::Path;

use crate::election::*;

/// The file name without directories nor extension.
pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Form tools title grid columns "Question [Candidate]".
fn header_to_candidate(cell: &str) -> String {
    let s = cell.trim();
    match (s.rfind('['), s.ends_with(']')) {
        (Some(start), true) => s[start + 1..s.len() - 1].trim().to_string(),
        _ => s.to_string(),
    }
}

/// The candidate names: the configured ones, or else the header row of the
/// responses from the first rank column onwards.
pub fn candidate_names(
    configured: Option<Vec<String>>,
    rows: &[Vec<String>],
    source: &ResponseSource,
) -> BElectionResult<Vec<String>> {
    if let Some(names) = configured {
        ensure!(!names.is_empty(), MissingCandidatesSnafu {});
        return Ok(names);
    }
    let first_row = source.first_row()?;
    let header = if first_row > 0 {
        rows.get(first_row - 1)
    } else {
        None
    };
    let header = header.context(MissingCandidatesSnafu {})?;
    let mut names: Vec<String> = header
        .iter()
        .skip(source.first_rank_column()?)
        .map(|c| header_to_candidate(c))
        .collect();
    while names.last().map(|n| n.is_empty()) == Some(true) {
        names.pop();
    }
    ensure!(!names.is_empty(), MissingCandidatesSnafu {});
    debug!("candidate_names: read from the header: {:?}", names);
    Ok(names)
}

/// Reads one ballot per data row. Blank rows are skipped, missing cells
/// are unranked.
pub fn ballots_from_rows(
    rows: &[Vec<String>],
    source: &ResponseSource,
    candidate_count: usize,
) -> BElectionResult<Vec<RawBallot>> {
    let voter_col = source.voter_column()?;
    let first_rank_col = source.first_rank_column()?;
    let first_row = source.first_row()?;

    let mut res: Vec<RawBallot> = Vec::new();
    for (idx, row) in rows.iter().enumerate().skip(first_row) {
        let lineno = idx + 1;
        if row.iter().all(|c| c.trim().is_empty()) {
            debug!("ballots_from_rows: skipping blank line {}", lineno);
            continue;
        }
        let voter_id = row
            .get(voter_col)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let cells: Vec<&str> = row.iter().skip(first_rank_col).map(|s| s.as_str()).collect();
        if cells
            .iter()
            .skip(candidate_count)
            .any(|c| !c.trim().is_empty())
        {
            warn!(
                "Line {}: values past the last candidate column are ignored: {:?}",
                lineno,
                &cells[candidate_count..]
            );
        }
        let ranks: Vec<Option<i64>> = (0..candidate_count)
            .map(|i| cells.get(i).and_then(|c| parse_rank_cell(c)))
            .collect();
        debug!("ballots_from_rows: line {}: {:?} {:?}", lineno, voter_id, ranks);
        res.push(RawBallot { voter_id, ranks });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn simplify() {
        assert_eq!(simplify_file_name("/tmp/data/Board.xlsx"), "Board");
        assert_eq!(simplify_file_name("responses"), "responses");
    }

    #[test]
    fn header_names() {
        let source = ElectionConfig::from_input("r.csv").response_source;
        let data = rows(&[
            &["Timestamp", "Name", "Rank [Alice]", " Bob ", "Carol", "", ""],
            &["t", "ann", "1", "2", "3"],
        ]);
        assert_eq!(
            candidate_names(None, &data, &source).unwrap(),
            vec!["Alice", "Bob", "Carol"]
        );
        let configured = Some(vec!["X".to_string()]);
        assert_eq!(
            candidate_names(configured, &data, &source).unwrap(),
            vec!["X"]
        );
    }

    #[test]
    fn no_header_no_candidates() {
        let mut source = ElectionConfig::from_input("r.csv").response_source;
        source.first_row_index = Some(serde_json::json!(1));
        let data = rows(&[&["t", "ann", "1", "2"]]);
        assert!(matches!(
            candidate_names(None, &data, &source).map_err(|e| *e),
            Err(ElectionError::MissingCandidates {})
        ));
    }

    #[test]
    fn ballots() {
        let source = ElectionConfig::from_input("r.csv").response_source;
        let data = rows(&[
            &["Timestamp", "Name", "Alice", "Bob", "Carol"],
            &["t1", " ann ", "2", "1", "3"],
            &["", "", "", "", ""],
            &["t2", "ben", "1st", ""],
            &["t3", "cat", "3", "2", "1", "4"],
        ]);
        let ballots = ballots_from_rows(&data, &source, 3).unwrap();
        assert_eq!(
            ballots,
            vec![
                RawBallot {
                    voter_id: "ann".to_string(),
                    ranks: vec![Some(2), Some(1), Some(3)]
                },
                RawBallot {
                    voter_id: "ben".to_string(),
                    ranks: vec![Some(1), None, None]
                },
                RawBallot {
                    voter_id: "cat".to_string(),
                    ranks: vec![Some(3), Some(2), Some(1)]
                },
            ]
        );
    }
}
