use log::debug;

use super::{rank_by_score, Evidence, PairwiseMethod, ResolverResult};
use crate::config::Candidate;
use crate::matrix::PreferenceMatrix;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct RankedPair {
    pub winner: usize,
    pub loser: usize,
    pub margin: u64,
}

/// All strict pairwise wins, largest margin first.
///
/// Pairs with the same margin stay in matrix order (winner index, then loser
/// index).
pub fn ranked_pair_list(matrix: &PreferenceMatrix) -> Vec<RankedPair> {
    let n = matrix.size();
    let mut pairs: Vec<RankedPair> = Vec::new();
    for winner in 0..n {
        for loser in 0..n {
            if winner != loser && matrix.beats(winner, loser) {
                pairs.push(RankedPair {
                    winner,
                    loser,
                    margin: matrix.get(winner, loser) - matrix.get(loser, winner),
                });
            }
        }
    }
    pairs.sort_by(|a, b| b.margin.cmp(&a.margin));
    pairs
}

/// True if `to` can be reached from `from` along locked edges.
fn reaches(locked: &[Vec<bool>], from: usize, to: usize) -> bool {
    let mut visited = vec![false; locked.len()];
    let mut stack = vec![from];
    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if visited[node] {
            continue;
        }
        visited[node] = true;
        for (next, &edge) in locked[node].iter().enumerate() {
            if edge && !visited[next] {
                stack.push(next);
            }
        }
    }
    false
}

/// Locks the pairs in order, skipping any pair that would close a cycle.
pub fn lock_pairs(size: usize, pairs: &[RankedPair]) -> Vec<Vec<bool>> {
    let mut locked = vec![vec![false; size]; size];
    for pair in pairs.iter() {
        if reaches(&locked, pair.loser, pair.winner) {
            debug!("lock_pairs: skipping {:?}, it would create a cycle", pair);
        } else {
            locked[pair.winner][pair.loser] = true;
        }
    }
    locked
}

/// Ranked pairs (Tideman).
///
/// The winner is the only candidate with no locked edge pointing to it. If
/// the locked graph has several sources (pairwise ties leave candidates
/// unconnected), there is no winner. The ranking score is out-degree minus
/// in-degree.
pub fn resolve_ranked_pairs(matrix: &PreferenceMatrix, candidates: &[Candidate]) -> ResolverResult {
    let n = candidates.len();
    let pairs = ranked_pair_list(matrix);
    debug!("resolve_ranked_pairs: sorted pairs: {:?}", pairs);
    let locked = lock_pairs(n, &pairs);

    let sources: Vec<usize> = (0..n)
        .filter(|&i| (0..n).all(|j| !locked[j][i]))
        .collect();
    debug!("resolve_ranked_pairs: sources: {:?}", sources);
    let winner = match sources.as_slice() {
        [single] => Some(candidates[*single].name.clone()),
        _ => None,
    };

    let scores: Vec<i64> = (0..n)
        .map(|i| {
            let outgoing = locked[i].iter().filter(|&&e| e).count() as i64;
            let incoming = (0..n).filter(|&j| locked[j][i]).count() as i64;
            outgoing - incoming
        })
        .collect();

    ResolverResult {
        method: PairwiseMethod::RankedPairs,
        winner,
        ranked_candidates: rank_by_score(candidates, &scores, true),
        evidence: Evidence::LockedEdges(locked),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizedBallot;

    fn matrix_of(groups: &[(&[usize], usize)], n: usize) -> PreferenceMatrix {
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
        PreferenceMatrix::from_ballots(n, &ballots)
    }

    fn names(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|index| Candidate {
                index,
                name: ["A", "B", "C", "D"][index].to_string(),
            })
            .collect()
    }

    #[test]
    fn weakest_link_of_the_cycle_is_dropped() {
        // A>B 6-3, B>C 7-2, C>A 5-4
        let m = matrix_of(&[(&[0, 1, 2], 4), (&[1, 2, 0], 3), (&[2, 0, 1], 2)], 3);
        let pairs = ranked_pair_list(&m);
        let margins: Vec<(usize, usize, u64)> =
            pairs.iter().map(|p| (p.winner, p.loser, p.margin)).collect();
        assert_eq!(margins, vec![(1, 2, 5), (0, 1, 3), (2, 0, 1)]);

        let r = resolve_ranked_pairs(&m, &names(3));
        assert_eq!(r.winner, Some("A".to_string()));
        assert_eq!(
            r.evidence,
            Evidence::LockedEdges(vec![
                vec![false, true, false],
                vec![false, false, true],
                vec![false, false, false],
            ])
        );
        let scores: Vec<(String, i64)> = r
            .ranked_candidates
            .iter()
            .map(|s| (s.candidate.clone(), s.score))
            .collect();
        assert_eq!(
            scores,
            vec![
                ("A".to_string(), 1),
                ("B".to_string(), 0),
                ("C".to_string(), -1)
            ]
        );
    }

    #[test]
    fn reachability_follows_chains() {
        let locked = vec![
            vec![false, true, false, false],
            vec![false, false, true, false],
            vec![false, false, false, false],
            vec![false, false, false, false],
        ];
        assert!(reaches(&locked, 0, 2));
        assert!(!reaches(&locked, 2, 0));
        assert!(!reaches(&locked, 0, 3));
    }

    #[test]
    fn disconnected_candidates_block_the_winner() {
        // A and B tie head to head: no edge, two sources.
        let m = matrix_of(&[(&[0, 1], 1), (&[1, 0], 1)], 2);
        let r = resolve_ranked_pairs(&m, &names(2));
        assert_eq!(r.winner, None);
    }

    #[test]
    fn equal_margins_lock_in_matrix_order() {
        let m = matrix_of(&[(&[0, 1, 2], 1), (&[1, 2, 0], 1), (&[2, 0, 1], 1)], 3);
        let r = resolve_ranked_pairs(&m, &names(3));
        // A>B and B>C lock first, C>A would close the cycle.
        assert_eq!(r.winner, Some("A".to_string()));
    }
}
