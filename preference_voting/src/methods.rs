//! The pairwise (Condorcet family) methods.
//!
//! All four methods read the same [`PreferenceMatrix`] and share no state, so
//! they can be evaluated in any order, or concurrently.

mod condorcet;
mod minimax;
mod ranked_pairs;
mod schulze;

use crate::config::{Candidate, ScoredCandidate};
use crate::matrix::PreferenceMatrix;

pub use condorcet::resolve_condorcet;
pub use minimax::resolve_minimax;
pub use ranked_pairs::{lock_pairs, resolve_ranked_pairs, ranked_pair_list, RankedPair};
pub use schulze::{resolve_schulze, strongest_paths};

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum PairwiseMethod {
    Condorcet,
    Schulze,
    RankedPairs,
    Minimax,
}

impl PairwiseMethod {
    pub const ALL: [PairwiseMethod; 4] = [
        PairwiseMethod::Condorcet,
        PairwiseMethod::Schulze,
        PairwiseMethod::RankedPairs,
        PairwiseMethod::Minimax,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PairwiseMethod::Condorcet => "Condorcet",
            PairwiseMethod::Schulze => "Schulze",
            PairwiseMethod::RankedPairs => "Ranked Pairs",
            PairwiseMethod::Minimax => "Minimax",
        }
    }

    pub fn resolve(&self, matrix: &PreferenceMatrix, candidates: &[Candidate]) -> ResolverResult {
        match self {
            PairwiseMethod::Condorcet => resolve_condorcet(matrix, candidates),
            PairwiseMethod::Schulze => resolve_schulze(matrix, candidates),
            PairwiseMethod::RankedPairs => resolve_ranked_pairs(matrix, candidates),
            PairwiseMethod::Minimax => resolve_minimax(matrix, candidates),
        }
    }
}

/// The data a method based its decision on, kept for audit.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Evidence {
    /// The head-to-head counts.
    Matrix(PreferenceMatrix),
    /// Schulze strongest path strengths, `paths[i][j]`.
    StrongestPaths(Vec<Vec<u64>>),
    /// Ranked pairs edges, `locked[winner][loser]`.
    LockedEdges(Vec<Vec<bool>>),
    /// Minimax worst defeat per candidate.
    DefeatScores(Vec<u64>),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResolverResult {
    pub method: PairwiseMethod,
    pub winner: Option<String>,
    /// Best first. Candidates with equal scores stay in registry order.
    pub ranked_candidates: Vec<ScoredCandidate>,
    pub evidence: Evidence,
}

/// Orders candidates by score, keeping registry order among equal scores.
fn rank_by_score(
    candidates: &[Candidate],
    scores: &[i64],
    descending: bool,
) -> Vec<ScoredCandidate> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    if descending {
        order.sort_by(|a, b| scores[*b].cmp(&scores[*a]));
    } else {
        order.sort_by(|a, b| scores[*a].cmp(&scores[*b]));
    }
    order
        .into_iter()
        .map(|idx| ScoredCandidate {
            candidate: candidates[idx].name.clone(),
            score: scores[idx],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizedBallot;

    fn candidates(names: &[&str]) -> Vec<Candidate> {
        names
            .iter()
            .enumerate()
            .map(|(index, n)| Candidate {
                index,
                name: n.to_string(),
            })
            .collect()
    }

    fn repeat(order: &[usize], times: usize, size: usize) -> Vec<NormalizedBallot> {
        let mut ranks = vec![None; size];
        for (pos, idx) in order.iter().enumerate() {
            ranks[*idx] = Some((pos + 1) as u32);
        }
        (0..times)
            .map(|_| NormalizedBallot {
                voter_id: String::new(),
                ranks: ranks.clone(),
            })
            .collect()
    }

    #[test]
    fn ranking_is_stable() {
        let cs = candidates(&["A", "B", "C"]);
        let r = rank_by_score(&cs, &[1, 3, 1], true);
        let names: Vec<&str> = r.iter().map(|s| s.candidate.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        let r = rank_by_score(&cs, &[2, 1, 1], false);
        let names: Vec<&str> = r.iter().map(|s| s.candidate.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn cycle_splits_the_methods() {
        // A>B 6-3, B>C 7-2, C>A 5-4
        let cs = candidates(&["A", "B", "C"]);
        let mut ballots = repeat(&[0, 1, 2], 4, 3);
        ballots.extend(repeat(&[1, 2, 0], 3, 3));
        ballots.extend(repeat(&[2, 0, 1], 2, 3));
        let m = PreferenceMatrix::from_ballots(3, &ballots);

        let winners: Vec<Option<String>> = PairwiseMethod::ALL
            .iter()
            .map(|method| method.resolve(&m, &cs).winner)
            .collect();
        assert_eq!(
            winners,
            vec![
                None,
                Some("A".to_string()),
                Some("A".to_string()),
                Some("A".to_string())
            ]
        );
    }

    #[test]
    fn results_carry_their_method() {
        let cs = candidates(&["A", "B"]);
        let m = PreferenceMatrix::from_ballots(2, &repeat(&[0, 1], 1, 2));
        for method in PairwiseMethod::ALL.iter() {
            let r = method.resolve(&m, &cs);
            assert_eq!(r.method, *method);
            assert_eq!(r.winner, Some("A".to_string()));
            assert_eq!(r.ranked_candidates.len(), 2);
        }
    }
}
