//! Instant-runoff count.
//!
//! Each round counts every ballot for its highest ranked candidate still in
//! the race, checks for a majority of the continuing ballots, and otherwise
//! eliminates one candidate. The state of every round is kept as an
//! immutable `RoundSnapshot`; the next round is derived from the last one.

use log::{debug, info};

use crate::config::*;
use crate::report::candidate_summary;
use crate::tiebreak::{break_tie, TieBreakOutcome};
use crate::trace::{TraceRecord, TraceSink};

struct RoundTally {
    votes: Vec<u64>,
    continuing: u64,
}

/// First choices among the candidates still running.
fn count_round(orders: &[Vec<usize>], eliminated: &[Option<Elimination>]) -> RoundTally {
    let mut votes = vec![0; eliminated.len()];
    let mut continuing: u64 = 0;
    for order in orders.iter() {
        if let Some(cid) = order.iter().find(|cid| eliminated[**cid].is_none()) {
            votes[*cid] += 1;
            continuing += 1;
        }
    }
    RoundTally { votes, continuing }
}

/// The ballots re-ranked over the candidates still running.
fn effective_ballots(
    round: u32,
    candidates: &[Candidate],
    orders: &[Vec<usize>],
    eliminated: &[Option<Elimination>],
) -> TraceRecord {
    let active: Vec<usize> = (0..candidates.len())
        .filter(|idx| eliminated[*idx].is_none())
        .collect();
    let ballots: Vec<Vec<Option<u32>>> = orders
        .iter()
        .map(|order| {
            let remaining: Vec<usize> = order
                .iter()
                .cloned()
                .filter(|cid| eliminated[*cid].is_none())
                .collect();
            active
                .iter()
                .map(|cid| {
                    remaining
                        .iter()
                        .position(|c| c == cid)
                        .map(|pos| (pos + 1) as u32)
                })
                .collect()
        })
        .collect();
    let title = if round == 1 {
        "Initial ballots".to_string()
    } else {
        format!("Redistributed ballots in round {}", round)
    };
    TraceRecord::BallotSnapshot {
        round,
        title,
        active_candidates: active.iter().map(|i| candidates[*i].name.clone()).collect(),
        ballots,
    }
}

fn names(candidates: &[Candidate], idxs: &[usize]) -> Vec<String> {
    idxs.iter().map(|i| candidates[*i].name.clone()).collect()
}

/// Runs an instant-runoff count over normalized ballots.
///
/// The trace of the count is appended to `sink`. Ties that the tie-break
/// chain cannot separate end the count with `RcvOutcome::tie` set; this is a
/// normal outcome, not an error.
pub fn run_instant_runoff(
    candidates: &[Candidate],
    ballots: &[NormalizedBallot],
    sink: &mut dyn TraceSink,
) -> Result<RcvOutcome, VotingErrors> {
    if candidates.is_empty() {
        return Err(VotingErrors::NoCandidates);
    }
    if ballots.is_empty() {
        return Err(VotingErrors::NoBallots);
    }
    info!(
        "Processing {} ballots, {} candidates",
        ballots.len(),
        candidates.len()
    );
    for c in candidates.iter() {
        info!("Candidate: {}: {}", c.index, c.name);
    }

    let orders: Vec<Vec<usize>> = ballots.iter().map(|b| b.preference_order()).collect();
    let mut rounds: Vec<RoundSnapshot> = Vec::new();

    loop {
        let round = rounds.len() as u32 + 1;
        // Eliminations carried over from the previous round.
        let eliminated: Vec<Option<Elimination>> = match rounds.last() {
            Some(prev) => prev.states.iter().map(|s| s.eliminated.clone()).collect(),
            None => vec![None; candidates.len()],
        };
        sink.record(effective_ballots(round, candidates, &orders, &eliminated));

        let tally = count_round(&orders, &eliminated);
        let exhausted = ballots.len() as u64 - tally.continuing;
        let active: Vec<usize> = (0..candidates.len())
            .filter(|idx| eliminated[*idx].is_none())
            .collect();
        debug!(
            "run_instant_runoff: round {} votes: {:?} continuing: {} exhausted: {}",
            round, tally.votes, tally.continuing, exhausted
        );

        let majority = active
            .iter()
            .cloned()
            .find(|idx| 2 * tally.votes[*idx] > tally.continuing);
        // A lone candidate wins even when every ballot is exhausted.
        let winner = match (majority, active.as_slice()) {
            (Some(w), _) => Some(w),
            (None, [single]) => Some(*single),
            _ => None,
        };

        let mut states: Vec<CandidateRoundState> = tally
            .votes
            .iter()
            .zip(eliminated.iter())
            .map(|(votes, elim)| CandidateRoundState {
                votes: *votes,
                eliminated: elim.clone(),
            })
            .collect();
        let summary = candidate_summary(candidates, &states, winner);
        sink.record(TraceRecord::CandidateSummary {
            round,
            rows: summary.clone(),
        });

        if let Some(w) = winner {
            info!("Round {}: winner: {}", round, candidates[w].name);
            sink.record(TraceRecord::Elected {
                round,
                candidate: candidates[w].name.clone(),
            });
            rounds.push(RoundSnapshot {
                round,
                states,
                continuing_ballots: tally.continuing,
                exhausted_ballots: exhausted,
                decision: RoundDecision::Elected(w),
            });
            return Ok(RcvOutcome {
                winner: Some(candidates[w].name.clone()),
                tie: None,
                summary,
                rounds,
            });
        }

        // At least two candidates are still running here.
        let min_votes = active
            .iter()
            .map(|idx| tally.votes[*idx])
            .min()
            .unwrap_or(0);
        let lowest: Vec<usize> = active
            .iter()
            .cloned()
            .filter(|idx| tally.votes[*idx] == min_votes)
            .collect();

        let (loser, reason) = if let [single] = lowest.as_slice() {
            (*single, EliminationReason::FewestVotes)
        } else {
            match break_tie(&lowest, ballots, candidates, round, sink) {
                TieBreakOutcome::Resolved { candidate, reason } => (candidate, reason),
                TieBreakOutcome::Unresolved { .. } => {
                    let tied = names(candidates, &lowest);
                    info!("Round {}: unresolved tie: {:?}", round, tied);
                    sink.record(TraceRecord::TieUnresolved {
                        round,
                        candidates: tied.clone(),
                    });
                    rounds.push(RoundSnapshot {
                        round,
                        states,
                        continuing_ballots: tally.continuing,
                        exhausted_ballots: exhausted,
                        decision: RoundDecision::TieUnresolved(lowest),
                    });
                    return Ok(RcvOutcome {
                        winner: None,
                        tie: Some(tied),
                        summary,
                        rounds,
                    });
                }
            }
        };

        info!(
            "Round {}: eliminating {} ({})",
            round, candidates[loser].name, reason
        );
        sink.record(TraceRecord::Eliminated {
            round,
            candidate: candidates[loser].name.clone(),
            reason,
            votes: min_votes,
        });
        states[loser].eliminated = Some(Elimination {
            round,
            reason,
            votes_at_elimination: min_votes,
        });
        rounds.push(RoundSnapshot {
            round,
            states,
            continuing_ballots: tally.continuing,
            exhausted_ballots: exhausted,
            decision: RoundDecision::Eliminated {
                candidate: loser,
                reason,
            },
        });
    }
}
