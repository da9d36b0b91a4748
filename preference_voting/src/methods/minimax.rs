use log::debug;

use super::{rank_by_score, Evidence, PairwiseMethod, ResolverResult};
use crate::config::Candidate;
use crate::matrix::PreferenceMatrix;

/// Minimax (Simpson). Each candidate is scored by the largest number of
/// voters preferring some opponent over it; the smallest score wins, but only
/// if no other candidate shares it.
pub fn resolve_minimax(matrix: &PreferenceMatrix, candidates: &[Candidate]) -> ResolverResult {
    let n = candidates.len();
    let worst_defeats: Vec<u64> = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| j != i)
                .map(|j| matrix.get(j, i))
                .max()
                .unwrap_or(0)
        })
        .collect();
    debug!("resolve_minimax: worst defeats: {:?}", worst_defeats);

    let winner = match worst_defeats.iter().min() {
        Some(best) => {
            let holders: Vec<usize> = (0..n).filter(|&i| worst_defeats[i] == *best).collect();
            match holders.as_slice() {
                [single] => Some(candidates[*single].name.clone()),
                _ => None,
            }
        }
        None => None,
    };

    let scores: Vec<i64> = worst_defeats.iter().map(|s| *s as i64).collect();
    ResolverResult {
        method: PairwiseMethod::Minimax,
        winner,
        ranked_candidates: rank_by_score(candidates, &scores, false),
        evidence: Evidence::DefeatScores(worst_defeats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizedBallot;

    fn setup(groups: &[(&[usize], usize)], n: usize) -> (PreferenceMatrix, Vec<Candidate>) {
        let mut ballots: Vec<NormalizedBallot> = Vec::new();
        for (order, count) in groups.iter() {
            let mut ranks = vec![None; n];
            for (pos, idx) in order.iter().enumerate() {
                ranks[*idx] = Some((pos + 1) as u32);
            }
            for _ in 0..*count {
                ballots.push(NormalizedBallot {
                    voter_id: String::new(),
                    ranks: ranks.clone(),
                });
            }
        }
        let candidates = (0..n)
            .map(|index| Candidate {
                index,
                name: ["A", "B", "C"][index].to_string(),
            })
            .collect();
        (PreferenceMatrix::from_ballots(n, &ballots), candidates)
    }

    #[test]
    fn smallest_worst_defeat_wins() {
        // A>B 6-3, B>C 7-2, C>A 5-4
        let (m, cs) = setup(&[(&[0, 1, 2], 4), (&[1, 2, 0], 3), (&[2, 0, 1], 2)], 3);
        let r = resolve_minimax(&m, &cs);
        assert_eq!(r.evidence, Evidence::DefeatScores(vec![5, 6, 7]));
        assert_eq!(r.winner, Some("A".to_string()));
        let order: Vec<&str> = r.ranked_candidates.iter().map(|s| s.candidate.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn shared_minimum_is_a_tie() {
        let (m, cs) = setup(&[(&[0, 1, 2], 1), (&[1, 2, 0], 1), (&[2, 0, 1], 1)], 3);
        let r = resolve_minimax(&m, &cs);
        assert_eq!(r.evidence, Evidence::DefeatScores(vec![2, 2, 2]));
        assert_eq!(r.winner, None);
    }

    #[test]
    fn undefeated_candidate_scores_zero() {
        let (m, cs) = setup(&[(&[2, 0, 1], 3)], 3);
        let r = resolve_minimax(&m, &cs);
        assert_eq!(r.winner, Some("C".to_string()));
        assert_eq!(r.ranked_candidates[0].score, 0);
    }
}
