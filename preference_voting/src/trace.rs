//! The round trace of an instant-runoff count.
//!
//! The engine appends structured records to a sink that the caller passes in
//! for one run. How the records are shown is up to the caller.

use log::info;
use std::fmt::Display;

use crate::config::{EliminationReason, SummaryRow};

/// Criterion applied by one step of the tie-break chain.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TieBreakCriterion {
    SecondChoice,
    LastPlace,
}

impl Display for TieBreakCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieBreakCriterion::SecondChoice => write!(f, "By rank 2"),
            TieBreakCriterion::LastPlace => write!(f, "By rank Last"),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TraceRecord {
    /// The ballots as they stand at the start of a round, re-ranked over the
    /// candidates still in the count.
    BallotSnapshot {
        round: u32,
        title: String,
        active_candidates: Vec<String>,
        /// One row per ballot, one column per active candidate.
        ballots: Vec<Vec<Option<u32>>>,
    },
    CandidateSummary {
        round: u32,
        rows: Vec<SummaryRow>,
    },
    TieBreakCount {
        round: u32,
        criterion: TieBreakCriterion,
        counts: Vec<(String, u64)>,
    },
    TieBreakFailed {
        round: u32,
        criterion: TieBreakCriterion,
        remaining: Vec<String>,
    },
    Elected {
        round: u32,
        candidate: String,
    },
    Eliminated {
        round: u32,
        candidate: String,
        reason: EliminationReason,
        votes: u64,
    },
    /// The tie-break chain ran out of criteria.
    ManualReview {
        round: u32,
        reason: String,
    },
    TieUnresolved {
        round: u32,
        candidates: Vec<String>,
    },
}

impl TraceRecord {
    pub fn round(&self) -> u32 {
        match self {
            TraceRecord::BallotSnapshot { round, .. }
            | TraceRecord::CandidateSummary { round, .. }
            | TraceRecord::TieBreakCount { round, .. }
            | TraceRecord::TieBreakFailed { round, .. }
            | TraceRecord::Elected { round, .. }
            | TraceRecord::Eliminated { round, .. }
            | TraceRecord::ManualReview { round, .. }
            | TraceRecord::TieUnresolved { round, .. } => *round,
        }
    }
}

impl Display for TraceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceRecord::BallotSnapshot {
                title,
                active_candidates,
                ballots,
                ..
            } => {
                write!(
                    f,
                    "{} ({} ballots over {})",
                    title,
                    ballots.len(),
                    active_candidates.join(", ")
                )
            }
            TraceRecord::CandidateSummary { round, rows } => {
                let parts: Vec<String> = rows
                    .iter()
                    .map(|r| format!("{} {} ({})", r.votes, r.candidate, r.status))
                    .collect();
                write!(f, "Round {} candidate summary: {}", round, parts.join(", "))
            }
            TraceRecord::TieBreakCount {
                criterion, counts, ..
            } => {
                let parts: Vec<String> =
                    counts.iter().map(|(c, n)| format!("{}: {}", c, n)).collect();
                write!(f, "{}: {}", criterion, parts.join(", "))
            }
            TraceRecord::TieBreakFailed {
                criterion,
                remaining,
                ..
            } => {
                let label = match criterion {
                    TieBreakCriterion::SecondChoice => "Second choice",
                    TieBreakCriterion::LastPlace => "Most last place",
                };
                write!(f, "{} failed, tie remains: {}", label, remaining.join(", "))
            }
            TraceRecord::Elected { round, candidate } => write!(
                f,
                "Round {}: {} wins with more than 50% of the votes",
                round, candidate
            ),
            TraceRecord::Eliminated {
                round,
                candidate,
                reason,
                ..
            } => write!(
                f,
                "Round {}: {} eliminated - {}, votes are redistributed",
                round, candidate, reason
            ),
            TraceRecord::ManualReview { reason, .. } => {
                write!(f, "Manual review required ({})", reason)
            }
            TraceRecord::TieUnresolved { candidates, .. } => write!(
                f,
                "Tie remains after all tie-breakers: {}. Manual review required for runoff.",
                candidates.join(", ")
            ),
        }
    }
}

/// Receives trace records, in order.
pub trait TraceSink {
    fn record(&mut self, record: TraceRecord);
}

impl TraceSink for Vec<TraceRecord> {
    fn record(&mut self, record: TraceRecord) {
        self.push(record);
    }
}

/// Drops every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn record(&mut self, _record: TraceRecord) {}
}

/// Writes every record to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn record(&mut self, record: TraceRecord) {
        info!("{}", record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_keeps_order() {
        let mut sink: Vec<TraceRecord> = Vec::new();
        sink.record(TraceRecord::Elected {
            round: 2,
            candidate: "Bob".to_string(),
        });
        sink.record(TraceRecord::TieUnresolved {
            round: 3,
            candidates: vec!["A".to_string(), "B".to_string()],
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].round(), 2);
        assert_eq!(
            sink[1].to_string(),
            "Tie remains after all tie-breakers: A, B. Manual review required for runoff."
        );
    }

    #[test]
    fn eliminations_read_like_the_log() {
        let r = TraceRecord::Eliminated {
            round: 1,
            candidate: "Carol".to_string(),
            reason: EliminationReason::FewestVotes,
            votes: 1,
        };
        assert_eq!(
            r.to_string(),
            "Round 1: Carol eliminated - fewest votes, votes are redistributed"
        );
        let r = TraceRecord::TieBreakFailed {
            round: 1,
            criterion: TieBreakCriterion::SecondChoice,
            remaining: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(r.to_string(), "Second choice failed, tie remains: A, B");
    }
}
