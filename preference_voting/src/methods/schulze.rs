use log::debug;

use super::{rank_by_score, Evidence, PairwiseMethod, ResolverResult};
use crate::config::Candidate;
use crate::matrix::PreferenceMatrix;

/// Computes the strongest path strengths between every pair of candidates.
///
/// Direct links are the pairwise wins (`p[i][j] = d[i][j]` when `i` beats
/// `j`, 0 otherwise). The closure is widest-path Floyd–Warshall with the
/// intermediate candidate in the outermost loop.
pub fn strongest_paths(matrix: &PreferenceMatrix) -> Vec<Vec<u64>> {
    let n = matrix.size();
    let mut p: Vec<Vec<u64>> = vec![vec![0; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i != j && matrix.beats(i, j) {
                p[i][j] = matrix.get(i, j);
            }
        }
    }

    for via in 0..n {
        for j in 0..n {
            if j == via {
                continue;
            }
            for k in 0..n {
                if k == via || k == j {
                    continue;
                }
                let through = p[j][via].min(p[via][k]);
                if through > p[j][k] {
                    p[j][k] = through;
                }
            }
        }
    }
    p
}

/// Schulze method. The winner beats every other candidate on strongest path
/// strength; the ranking score is the sum of a candidate's path strengths.
pub fn resolve_schulze(matrix: &PreferenceMatrix, candidates: &[Candidate]) -> ResolverResult {
    let n = candidates.len();
    let p = strongest_paths(matrix);
    debug!("resolve_schulze: strongest paths: {:?}", p);

    let winner = (0..n)
        .find(|&i| (0..n).all(|j| j == i || p[i][j] > p[j][i]))
        .map(|i| candidates[i].name.clone());

    let scores: Vec<i64> = p.iter().map(|row| row.iter().sum::<u64>() as i64).collect();

    ResolverResult {
        method: PairwiseMethod::Schulze,
        winner,
        ranked_candidates: rank_by_score(candidates, &scores, true),
        evidence: Evidence::StrongestPaths(p),
    }
}
