use log::debug;

use super::{rank_by_score, Evidence, PairwiseMethod, ResolverResult};
use crate::config::Candidate;
use crate::matrix::PreferenceMatrix;

/// Basic Condorcet: the winner beats every other candidate head to head.
///
/// Two candidates cannot both beat each other, so there is at most one such
/// winner. The ranking score is the number of head-to-head wins.
pub fn resolve_condorcet(matrix: &PreferenceMatrix, candidates: &[Candidate]) -> ResolverResult {
    let n = candidates.len();
    let wins: Vec<i64> = (0..n)
        .map(|i| (0..n).filter(|&j| j != i && matrix.beats(i, j)).count() as i64)
        .collect();
    debug!("resolve_condorcet: head-to-head wins: {:?}", wins);

    let winner = (0..n)
        .find(|&i| (0..n).all(|j| j == i || matrix.beats(i, j)))
        .map(|i| candidates[i].name.clone());

    ResolverResult {
        method: PairwiseMethod::Condorcet,
        winner,
        ranked_candidates: rank_by_score(candidates, &wins, true),
        evidence: Evidence::Matrix(matrix.clone()),
    }
}
