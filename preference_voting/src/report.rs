//! Tables handed to a presentation layer.

use std::cmp::Ordering;

use crate::config::*;
use crate::methods::ResolverResult;

/// Builds the candidate summary table for one round of an instant-runoff
/// count.
///
/// Active candidates come first, by votes (most first). Eliminated candidates
/// follow, the most recently eliminated first. Candidates that compare equal
/// stay in registry order. `winner` is the candidate the count has declared
/// elected, if any.
pub fn candidate_summary(
    candidates: &[Candidate],
    states: &[CandidateRoundState],
    winner: Option<usize>,
) -> Vec<SummaryRow> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|a, b| {
        match (&states[*a].eliminated, &states[*b].eliminated) {
            (Some(ea), Some(eb)) => eb.round.cmp(&ea.round),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => states[*b].votes.cmp(&states[*a].votes),
        }
    });

    order
        .into_iter()
        .map(|idx| {
            let state = &states[idx];
            match &state.eliminated {
                Some(e) => SummaryRow {
                    candidate: candidates[idx].name.clone(),
                    status: CandidateStatus::Eliminated,
                    votes: e.votes_at_elimination,
                    elimination_round: Some(e.round),
                    elimination_reason: Some(e.reason),
                },
                None => {
                    let status = if winner == Some(idx) {
                        CandidateStatus::Winner
                    } else if state.votes == 0 {
                        CandidateStatus::NoVotes
                    } else {
                        CandidateStatus::Active
                    };
                    SummaryRow {
                        candidate: candidates[idx].name.clone(),
                        status,
                        votes: state.votes,
                        elimination_round: None,
                        elimination_reason: None,
                    }
                }
            }
        })
        .collect()
}

/// One line of the method comparison table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MethodSummary {
    pub method: Method,
    pub winner: Option<String>,
    /// Set when the method ended without a single winner and can name the
    /// candidates it could not separate.
    pub tie: Option<Vec<String>>,
    pub ranking: Vec<ScoredCandidate>,
}

/// Everything computed for one election.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionReport {
    pub candidates: Vec<String>,
    pub ballot_count: usize,
    /// SHA-256 of the normalized ballots, see `Election::digest`.
    pub digest: String,
    pub instant_runoff: Option<RcvOutcome>,
    /// In the order the methods were selected.
    pub pairwise: Vec<ResolverResult>,
}

impl ElectionReport {
    /// The winner of each method that was run, instant runoff first.
    pub fn method_summary(&self) -> Vec<MethodSummary> {
        let mut res: Vec<MethodSummary> = Vec::new();
        if let Some(rcv) = &self.instant_runoff {
            res.push(MethodSummary {
                method: Method::InstantRunoff,
                winner: rcv.winner.clone(),
                tie: rcv.tie.clone(),
                ranking: rcv
                    .summary
                    .iter()
                    .map(|row| ScoredCandidate {
                        candidate: row.candidate.clone(),
                        score: row.votes as i64,
                    })
                    .collect(),
            });
        }
        for r in self.pairwise.iter() {
            let tie = match (&r.winner, r.ranked_candidates.first()) {
                (None, Some(top)) => {
                    let tied: Vec<String> = r
                        .ranked_candidates
                        .iter()
                        .filter(|s| s.score == top.score)
                        .map(|s| s.candidate.clone())
                        .collect();
                    if tied.len() > 1 {
                        Some(tied)
                    } else {
                        None
                    }
                }
                _ => None,
            };
            res.push(MethodSummary {
                method: Method::Pairwise(r.method),
                winner: r.winner.clone(),
                tie,
                ranking: r.ranked_candidates.clone(),
            });
        }
        res
    }

    /// The name of the winner if every method that produced one agrees.
    pub fn consensus_winner(&self) -> Option<String> {
        let summary = self.method_summary();
        let first = summary.first()?.winner.clone()?;
        if summary.iter().all(|s| s.winner.as_ref() == Some(&first)) {
            Some(first)
        } else {
            None
        }
    }
}
