//! Preference aggregation over ranked ballots: instant runoff with a
//! tie-break chain, and the Condorcet, Schulze, Ranked Pairs and Minimax
//! methods over a shared pairwise matrix.
//!
//! See [`manual`] for the counting rules.

mod config;
mod election;
mod irv;
mod matrix;
mod normalize;
mod report;
mod tiebreak;
mod trace;

pub mod builder;
pub mod manual;
pub mod methods;

use log::info;

pub use crate::config::*;
pub use crate::election::{register_candidates, Election};
pub use crate::irv::run_instant_runoff;
pub use crate::matrix::PreferenceMatrix;
pub use crate::normalize::{compress_ranks, normalize_ballots, parse_rank_cell};
pub use crate::report::{candidate_summary, ElectionReport, MethodSummary};
pub use crate::tiebreak::{break_tie, count_position, TieBreakOutcome};
pub use crate::trace::{LogTrace, NoTrace, TieBreakCriterion, TraceRecord, TraceSink};

/// Runs the methods selected by the rules over the given ballots.
///
/// Arguments:
/// * `candidate_names` the registered candidates, in ballot column order
/// * `ballots` the ballots in submission order
/// * `rules` the rules that govern this election
/// * `sink` receives the trace of the instant-runoff count
pub fn run_election(
    candidate_names: &[String],
    ballots: &[RawBallot],
    rules: &VoteRules,
    sink: &mut dyn TraceSink,
) -> Result<ElectionReport, VotingErrors> {
    info!(
        "run_election: processing {} ballots, candidates: {:?}, rules: {:?}",
        ballots.len(),
        candidate_names,
        rules
    );
    let election = Election::new(candidate_names, ballots, rules)?;
    election.report(sink)
}
