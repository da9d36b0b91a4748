use log::{debug, info, warn};

use preference_voting::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::election::config_reader::*;
use crate::election::output::build_summary_js;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;
mod output;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ElectionError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook has no worksheet"))]
    EmptyExcel {},
    #[snafu(display("Worksheet {name:?} not found"))]
    MissingWorksheet { name: String },
    #[snafu(display(
        "The workbook has several worksheets ({names:?}), use --excel-worksheet-name to pick one"
    ))]
    AmbiguousWorksheet { names: Vec<String> },
    #[snafu(display("Unexpected cell type at line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive number or a column letter, got {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Unknown input type {provider:?}, expected csv or xlsx"))]
    UnknownProvider { provider: String },
    #[snafu(display("Unknown option {value:?} for {field}"))]
    UnknownRule { field: String, value: String },
    #[snafu(display(
        "No candidates: list them in the configuration or in the header row of the responses"
    ))]
    MissingCandidates {},
    #[snafu(display("No input: pass --config or --input"))]
    MissingInput {},
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Cannot count the ballots: {source}"))]
    Voting { source: VotingErrors },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},
}

pub type ElectionResult<T> = Result<T, ElectionError>;
pub type BElectionResult<T> = Result<T, Box<ElectionError>>;

/// Collects the trace of the count and echoes it to the log.
#[derive(Debug, Default)]
struct LoggedTrace {
    log: LogTrace,
    records: Vec<TraceRecord>,
}

impl TraceSink for LoggedTrace {
    fn record(&mut self, record: TraceRecord) {
        self.log.record(record.clone());
        self.records.push(record);
    }
}

fn read_responses(root: &Path, source: &ResponseSource) -> BElectionResult<Vec<Vec<String>>> {
    let p: PathBuf = root.join(&source.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read response file {:?}", p2);
    match source.provider()?.as_str() {
        "csv" => io_csv::read_csv_rows(&p2),
        "xlsx" => io_xlsx::read_xlsx_rows(&p2, &source.excel_worksheet_name),
        x => Err(Box::new(ElectionError::UnknownProvider {
            provider: x.to_string(),
        })),
    }
}

/// Reads the responses described by the configuration and runs every
/// selected method. Returns the JSON summary.
pub fn run_election(
    config: &ElectionConfig,
    root: &Path,
    with_trace: bool,
) -> BElectionResult<JSValue> {
    info!("config: {:?}", config);
    let rules = validate_rules(&config.rules)?;
    let source = &config.response_source;

    let rows = read_responses(root, source)?;
    let candidates = io_common::candidate_names(config.candidate_names(), &rows, source)?;
    let ballots = io_common::ballots_from_rows(&rows, source, candidates.len())?;
    debug!("run_election: {} ballots read", ballots.len());

    let mut sink = LoggedTrace::default();
    let report = run_election_report(&candidates, &ballots, &rules, &mut sink)?;
    let trace = if with_trace {
        Some(sink.records.as_slice())
    } else {
        None
    };
    Ok(build_summary_js(config, &report, trace))
}

fn run_election_report(
    candidates: &[String],
    ballots: &[RawBallot],
    rules: &VoteRules,
    sink: &mut dyn TraceSink,
) -> BElectionResult<ElectionReport> {
    let report = preference_voting::run_election(candidates, ballots, rules, sink)
        .context(VotingSnafu {})?;
    for line in report.method_summary() {
        info!(
            "{}: {}",
            line.method.name(),
            match (&line.winner, &line.tie) {
                (Some(w), _) => w.clone(),
                (None, Some(t)) => format!("tie between {}", t.join(", ")),
                (None, None) => "no winner".to_string(),
            }
        );
    }
    Ok(report)
}

/// Compares a computed summary with a reference file, printing the
/// differences.
pub fn check_reference(summary: &JSValue, reference_path: &str) -> BElectionResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    let pretty_js_stats = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(
            pretty_js_summary_ref.as_str(),
            pretty_js_stats.as_ref(),
            "\n",
        );
        return Err(Box::new(ElectionError::ReferenceMismatch {}));
    }
    Ok(())
}

fn write_summary(
    pretty: &str,
    out: &Option<String>,
    config: &ElectionConfig,
    root: &Path,
) -> BElectionResult<()> {
    let target: Option<PathBuf> = match out.as_deref() {
        Some("stdout") | Some("") => None,
        Some(p) => Some(PathBuf::from(p)),
        None => config
            .output_settings
            .output_directory
            .as_ref()
            .map(|d| root.join(d).join("summary.json")),
    };
    match target {
        None => {
            println!("{}", pretty);
        }
        Some(p) => {
            let path = p.display().to_string();
            info!("Writing summary to {:?}", path);
            if let Some(parent) = p.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).context(WritingOutputSnafu { path: path.clone() })?;
                }
            }
            fs::write(&p, pretty).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}

/// Entry point of the command line.
pub fn run_election_cli(args: &Args) -> BElectionResult<()> {
    let (mut config, root): (ElectionConfig, PathBuf) = match (&args.config, &args.input) {
        (Some(config_path), _) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        (None, Some(input)) => (ElectionConfig::from_input(input), PathBuf::new()),
        (None, None) => return Err(Box::new(ElectionError::MissingInput {})),
    };

    // Command line settings take precedence over the configuration file.
    if let (Some(_), Some(input)) = (&args.config, &args.input) {
        info!("Replacing the response file of the configuration with {:?}", input);
        // Relative to the working directory, not to the configuration.
        let p = std::env::current_dir()
            .map(|d| d.join(input))
            .unwrap_or_else(|_| PathBuf::from(input));
        config.response_source.file_path = p.display().to_string();
    }
    if let Some(input_type) = &args.input_type {
        config.response_source.provider = Some(input_type.clone());
    }
    if let Some(worksheet) = &args.excel_worksheet_name {
        config.response_source.excel_worksheet_name = Some(worksheet.clone());
    }

    let summary = run_election(&config, &root, args.trace)?;
    let pretty = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;
    write_summary(&pretty, &args.out, &config, &root)?;

    if let Some(reference) = &args.reference {
        check_reference(&summary, reference)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
    }

    fn run_fixture(name: &str) -> JSValue {
        let _ = env_logger::builder().is_test(true).try_init();
        let config_path = data_dir().join(name).join("config.json");
        let config = read_config(&config_path.display().to_string()).unwrap();
        run_election(&config, &data_dir().join(name), true).unwrap()
    }

    #[test]
    fn board_election_csv() {
        let js = run_fixture("board_election");
        assert_eq!(js["config"]["contest"], "Board election");
        assert_eq!(js["ballots"], 6);
        assert_eq!(js["candidates"], serde_json::json!(["Alice", "Bob", "Carol", "Dave"]));
        assert_eq!(js["instantRunoff"]["winner"], "Carol");
        let rounds = js["instantRunoff"]["rounds"].as_array().unwrap();
        assert_eq!(rounds.len(), 4);
        assert_eq!(
            rounds[0]["decision"],
            serde_json::json!({"eliminated": "Dave", "reason": "fewest second choice votes"})
        );
        assert_eq!(
            rounds[2]["decision"],
            serde_json::json!({"eliminated": "Bob", "reason": "most last-place votes"})
        );
        let trace = js["trace"].as_array().unwrap();
        assert_eq!(trace[0]["round"], 1);
        assert_eq!(trace.last().unwrap()["round"], 4);
        assert_eq!(
            trace.last().unwrap()["message"],
            "Round 4: Carol wins with more than 50% of the votes"
        );
    }

    #[test]
    fn duplicate_voters_keep_the_latest_ballot() {
        let js = run_fixture("duplicate_voters");
        // Five rows, "ann" voted twice.
        assert_eq!(js["ballots"], 4);
        assert_eq!(js["instantRunoff"]["winner"], "Bob");
        assert_eq!(js["candidates"], serde_json::json!(["Alice", "Bob"]));
    }

    #[test]
    fn cycle_has_no_condorcet_winner() {
        let js = run_fixture("cycle");
        let methods = js["methods"].as_array().unwrap();
        let winners: Vec<JSValue> = methods.iter().map(|m| m["winner"].clone()).collect();
        assert_eq!(
            winners,
            vec![
                serde_json::json!("A"),
                JSValue::Null,
                serde_json::json!("A"),
                serde_json::json!("A"),
                serde_json::json!("A")
            ]
        );
        assert_eq!(js["pairwise"][0]["evidence"]["matrix"][1][2], 7);
    }

    #[test]
    fn summary_matches_itself_as_reference() {
        let js = run_fixture("board_election");
        let dir = std::env::temp_dir().join("prefvote_reference_test");
        fs::create_dir_all(&dir).unwrap();
        let p = dir.join("expected_summary.json");
        fs::write(&p, serde_json::to_string(&js).unwrap()).unwrap();
        check_reference(&js, &p.display().to_string()).unwrap();

        let mut other = js.clone();
        other["instantRunoff"]["winner"] = serde_json::json!("Alice");
        let res = check_reference(&other, &p.display().to_string());
        assert!(matches!(
            res.map_err(|e| *e),
            Err(ElectionError::ReferenceMismatch {})
        ));
    }

    #[test]
    fn unknown_provider_is_reported() {
        let mut config = ElectionConfig::from_input("responses.ods");
        config.response_source.provider = Some("ods".to_string());
        let res = run_election(&config, &data_dir(), false);
        assert!(matches!(
            res.map_err(|e| *e),
            Err(ElectionError::UnknownProvider { .. })
        ));
    }
}
