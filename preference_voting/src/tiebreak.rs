//! Tie-break chain for choosing which of several last-place candidates to
//! eliminate.
//!
//! 1. fewest ballots ranking the candidate second;
//! 2. among those still tied, most ballots ranking the candidate last;
//! 3. otherwise the tie is left for manual review.
//!
//! Both counts read the compressed ballots as submitted, independently of
//! which candidates have been eliminated.

use log::debug;
use std::collections::HashSet;

use crate::config::{Candidate, EliminationReason, NormalizedBallot};
use crate::trace::{TieBreakCriterion, TraceRecord, TraceSink};

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TieBreakOutcome {
    Resolved {
        candidate: usize,
        reason: EliminationReason,
    },
    Unresolved {
        remaining: Vec<usize>,
    },
}

impl TieBreakOutcome {
    /// Explanation suitable for a report.
    pub fn describe(&self, candidates: &[Candidate]) -> String {
        match self {
            TieBreakOutcome::Resolved { reason, .. } => reason.to_string(),
            TieBreakOutcome::Unresolved { remaining } => format!(
                "unable to eliminate a last place tie between: {}",
                names(candidates, remaining).join(", ")
            ),
        }
    }
}

fn names(candidates: &[Candidate], idxs: &[usize]) -> Vec<String> {
    idxs.iter().map(|i| candidates[*i].name.clone()).collect()
}

/// Counts, for each tied candidate, the ballots placing it at the position
/// the criterion looks at. The result follows the order of `tied`.
pub fn count_position(
    tied: &[usize],
    ballots: &[NormalizedBallot],
    criterion: TieBreakCriterion,
) -> Vec<(usize, u64)> {
    let watched: HashSet<usize> = tied.iter().cloned().collect();
    let mut counts: Vec<(usize, u64)> = tied.iter().map(|c| (*c, 0)).collect();
    for ballot in ballots.iter() {
        let order = ballot.preference_order();
        let picked = match criterion {
            TieBreakCriterion::SecondChoice => order.get(1),
            TieBreakCriterion::LastPlace => order.last(),
        };
        if let Some(cid) = picked {
            if watched.contains(cid) {
                if let Some(entry) = counts.iter_mut().find(|(c, _)| c == cid) {
                    entry.1 += 1;
                }
            }
        }
    }
    counts
}

fn apply_step(
    tied: &[usize],
    ballots: &[NormalizedBallot],
    candidates: &[Candidate],
    criterion: TieBreakCriterion,
    round: u32,
    sink: &mut dyn TraceSink,
) -> Vec<usize> {
    let counts = count_position(tied, ballots, criterion);
    sink.record(TraceRecord::TieBreakCount {
        round,
        criterion,
        counts: counts
            .iter()
            .map(|(cid, n)| (candidates[*cid].name.clone(), *n))
            .collect(),
    });
    let target = match criterion {
        TieBreakCriterion::SecondChoice => counts.iter().map(|(_, n)| *n).min(),
        TieBreakCriterion::LastPlace => counts.iter().map(|(_, n)| *n).max(),
    };
    counts
        .iter()
        .filter(|(_, n)| Some(*n) == target)
        .map(|(cid, _)| *cid)
        .collect()
}

/// Runs the chain over the tied candidates.
pub fn break_tie(
    tied: &[usize],
    ballots: &[NormalizedBallot],
    candidates: &[Candidate],
    round: u32,
    sink: &mut dyn TraceSink,
) -> TieBreakOutcome {
    debug!("break_tie: round {} tied: {:?}", round, tied);

    let fewest_second = apply_step(
        tied,
        ballots,
        candidates,
        TieBreakCriterion::SecondChoice,
        round,
        sink,
    );
    if let [single] = fewest_second.as_slice() {
        return TieBreakOutcome::Resolved {
            candidate: *single,
            reason: EliminationReason::FewestSecondChoices,
        };
    }
    sink.record(TraceRecord::TieBreakFailed {
        round,
        criterion: TieBreakCriterion::SecondChoice,
        remaining: names(candidates, &fewest_second),
    });

    let most_last = apply_step(
        &fewest_second,
        ballots,
        candidates,
        TieBreakCriterion::LastPlace,
        round,
        sink,
    );
    if let [single] = most_last.as_slice() {
        return TieBreakOutcome::Resolved {
            candidate: *single,
            reason: EliminationReason::MostLastPlace,
        };
    }
    sink.record(TraceRecord::TieBreakFailed {
        round,
        criterion: TieBreakCriterion::LastPlace,
        remaining: names(candidates, &most_last),
    });

    debug!("break_tie: round {} manual review required", round);
    let outcome = TieBreakOutcome::Unresolved {
        remaining: most_last,
    };
    sink.record(TraceRecord::ManualReview {
        round,
        reason: outcome.describe(candidates),
    });
    outcome
}
