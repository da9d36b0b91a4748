use crate::election::*;

use preference_voting::methods::PairwiseMethod;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

/// Where the ballots come from. Indexes are 1-based, columns may also be
/// written as spreadsheet letters.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "voterColumnIndex")]
    pub voter_column_index: Option<JSValue>,
    #[serde(rename = "firstRankColumnIndex")]
    pub first_rank_column_index: Option<JSValue>,
    #[serde(rename = "firstRowIndex")]
    pub first_row_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

// Form-responses layout: timestamp, voter name, then one column per candidate.
const DEFAULT_VOTER_COLUMN: usize = 2;
const DEFAULT_FIRST_RANK_COLUMN: usize = 3;
const DEFAULT_FIRST_ROW: usize = 2;

impl ResponseSource {
    /// The provider, or the one matching the file extension.
    pub fn provider(&self) -> BElectionResult<String> {
        if let Some(p) = &self.provider {
            return Ok(p.to_lowercase());
        }
        let ext = std::path::Path::new(&self.file_path)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok("csv".to_string()),
            "xlsx" => Ok("xlsx".to_string()),
            _ => Err(Box::new(ElectionError::UnknownProvider { provider: ext })),
        }
    }

    /// 0-based column of the voter identifier.
    pub fn voter_column(&self) -> ElectionResult<usize> {
        read_index(&self.voter_column_index, DEFAULT_VOTER_COLUMN)
    }

    /// 0-based column of the first candidate.
    pub fn first_rank_column(&self) -> ElectionResult<usize> {
        read_index(&self.first_rank_column_index, DEFAULT_FIRST_RANK_COLUMN)
    }

    /// 0-based row of the first ballot. The row above it, if any, is the
    /// header row.
    pub fn first_row(&self) -> ElectionResult<usize> {
        read_index(&self.first_row_index, DEFAULT_FIRST_ROW)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionCandidate {
    pub name: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ElectionRules {
    #[serde(rename = "duplicateVoters")]
    pub duplicate_voters: Option<String>,
    pub methods: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "responseSource")]
    pub response_source: ResponseSource,
    pub candidates: Option<Vec<ElectionCandidate>>,
    #[serde(default)]
    pub rules: ElectionRules,
}

impl ElectionConfig {
    /// The configuration used when only a response file is given.
    pub fn from_input(input: &str) -> ElectionConfig {
        ElectionConfig {
            output_settings: OutputSettings {
                contest_name: io_common::simplify_file_name(input),
                contest_date: None,
                output_directory: None,
            },
            response_source: ResponseSource {
                provider: None,
                file_path: input.to_string(),
                voter_column_index: None,
                first_rank_column_index: None,
                first_row_index: None,
                excel_worksheet_name: None,
            },
            candidates: None,
            rules: ElectionRules::default(),
        }
    }

    pub fn candidate_names(&self) -> Option<Vec<String>> {
        self.candidates
            .as_ref()
            .map(|cs| cs.iter().map(|c| c.name.clone()).collect())
    }
}

/// Turns the rules of the configuration file into the rules of the engine.
pub fn validate_rules(rules: &ElectionRules) -> BElectionResult<VoteRules> {
    let duplicate_voter_mode = match rules.duplicate_voters.as_deref() {
        None | Some("keepLatest") => DuplicateVoterMode::KeepLatest,
        Some("keepAll") => DuplicateVoterMode::KeepAll,
        Some(x) => {
            return Err(Box::new(ElectionError::UnknownRule {
                field: "duplicateVoters".to_string(),
                value: x.to_string(),
            }))
        }
    };
    let mut methods: Vec<Method> = Vec::new();
    for name in rules.methods.iter().flatten() {
        let m = match name.as_str() {
            "instantRunoff" => Method::InstantRunoff,
            "condorcet" => Method::Pairwise(PairwiseMethod::Condorcet),
            "schulze" => Method::Pairwise(PairwiseMethod::Schulze),
            "rankedPairs" => Method::Pairwise(PairwiseMethod::RankedPairs),
            "minimax" => Method::Pairwise(PairwiseMethod::Minimax),
            x => {
                return Err(Box::new(ElectionError::UnknownRule {
                    field: "methods".to_string(),
                    value: x.to_string(),
                }))
            }
        };
        if !methods.contains(&m) {
            methods.push(m);
        }
    }
    Ok(VoteRules {
        duplicate_voter_mode,
        methods,
    })
}

pub fn read_config(path: &str) -> BElectionResult<ElectionConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    let config: ElectionConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Reads a summary file written by this program.
pub fn read_summary(path: &str) -> BElectionResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn read_index(x: &Option<JSValue>, default: usize) -> ElectionResult<usize> {
    let idx = match x {
        None => default,
        Some(v) => read_js_int(v)?,
    };
    if idx == 0 {
        return Err(ElectionError::ParsingJsonNumber {
            content: "0".to_string(),
        });
    }
    Ok(idx - 1)
}

/// Reads a 1-based index: a number, a numeric string or a spreadsheet column
/// ("A", "C", "AB").
fn read_js_int(x: &JSValue) -> ElectionResult<usize> {
    match x {
        JSValue::Number(n) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {
                content: n.to_string(),
            }),
        JSValue::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => s
            .to_ascii_lowercase()
            .chars()
            .try_fold(0usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add((c as usize) - ('a' as usize) + 1)
            })
            .context(ParsingJsonNumberSnafu { content: s.clone() }),
        JSValue::String(s) => s
            .trim()
            .parse::<usize>()
            .ok()
            .context(ParsingJsonNumberSnafu { content: s.clone() }),
        _ => None.context(ParsingJsonNumberSnafu {
            content: x.to_string(),
        }),
    }
}
