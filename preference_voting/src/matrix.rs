use log::debug;

use crate::config::NormalizedBallot;

/// Head-to-head preference counts.
///
/// `get(i, j)` is the number of ballots that rank both `i` and `j` and put
/// `i` strictly ahead of `j`. The diagonal is always zero.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PreferenceMatrix {
    size: usize,
    counts: Vec<u64>,
}

impl PreferenceMatrix {
    pub fn zeros(size: usize) -> PreferenceMatrix {
        PreferenceMatrix {
            size,
            counts: vec![0; size * size],
        }
    }

    /// Tallies every ordered pair of ranked candidates on every ballot.
    pub fn from_ballots(size: usize, ballots: &[NormalizedBallot]) -> PreferenceMatrix {
        let mut m = PreferenceMatrix::zeros(size);
        for ballot in ballots.iter() {
            for i in 0..size {
                let rank_i = match ballot.rank_of(i) {
                    Some(r) => r,
                    None => continue,
                };
                for j in 0..size {
                    if i == j {
                        continue;
                    }
                    if let Some(rank_j) = ballot.rank_of(j) {
                        if rank_i < rank_j {
                            m.counts[i * size + j] += 1;
                        }
                    }
                }
            }
        }
        debug!("PreferenceMatrix::from_ballots: {:?}", m.rows());
        m
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.counts[i * self.size + j]
    }

    /// True if `i` wins the head-to-head contest against `j`.
    pub fn beats(&self, i: usize, j: usize) -> bool {
        self.get(i, j) > self.get(j, i)
    }

    pub fn rows(&self) -> Vec<Vec<u64>> {
        self.counts
            .chunks(self.size.max(1))
            .take(self.size)
            .map(|row| row.to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ballot(ranks: &[Option<u32>]) -> NormalizedBallot {
        NormalizedBallot {
            voter_id: String::new(),
            ranks: ranks.to_vec(),
        }
    }

    #[test]
    fn counts_pairs() {
        let ballots = vec![
            ballot(&[Some(1), Some(2), Some(3)]),
            ballot(&[Some(2), Some(1), None]),
        ];
        let m = PreferenceMatrix::from_ballots(3, &ballots);
        assert_eq!(m.rows(), vec![vec![0, 1, 1], vec![1, 0, 1], vec![0, 0, 0]]);
        assert!(m.beats(1, 2));
        assert!(!m.beats(0, 1));
        assert!(!m.beats(1, 0));
    }

    #[test]
    fn unranked_candidates_give_nothing() {
        let ballots = vec![ballot(&[Some(1), None, None])];
        let m = PreferenceMatrix::from_ballots(3, &ballots);
        assert_eq!(m, PreferenceMatrix::zeros(3));
    }

    #[test]
    fn empty_matrix_has_no_rows() {
        assert!(PreferenceMatrix::zeros(0).rows().is_empty());
    }
}
