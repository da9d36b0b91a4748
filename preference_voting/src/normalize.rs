//! Ballot normalization: deduplication by voter and rank compression.

use log::{debug, info, warn};
use std::collections::HashMap;

use crate::config::*;

/// Reads a rank out of a spreadsheet cell.
///
/// The leading integer of the cell is the rank, so `"2"`, `"2.0"` and
/// `"2nd"` all read as 2. Blank or non-numeric cells are unranked.
pub fn parse_rank_cell(cell: &str) -> Option<i64> {
    let s = cell.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Compresses the ranks of one ballot to `1..=k`.
///
/// Ranks outside `1..=candidate_count` are dropped. Equal raw ranks keep the
/// candidate order (the sort is stable), which is the only tie rule applied.
pub fn compress_ranks(ranks: &[Option<i64>], candidate_count: usize) -> Vec<Option<u32>> {
    let mut ranked: Vec<(usize, i64)> = ranks
        .iter()
        .take(candidate_count)
        .enumerate()
        .filter_map(|(idx, r)| match r {
            Some(rank) if *rank >= 1 && *rank <= candidate_count as i64 => Some((idx, *rank)),
            _ => None,
        })
        .collect();
    ranked.sort_by_key(|(_, rank)| *rank);

    let mut compressed: Vec<Option<u32>> = vec![None; candidate_count];
    for (pos, (idx, _)) in ranked.iter().enumerate() {
        compressed[*idx] = Some((pos + 1) as u32);
    }
    compressed
}

/// Deduplicates and compresses the raw ballots.
///
/// Under `KeepLatest`, the last ballot of a voter replaces the earlier ones
/// entirely. The surviving ballots are listed in the order in which their voter
/// first appeared.
pub fn normalize_ballots(
    candidate_count: usize,
    raw: &[RawBallot],
    mode: DuplicateVoterMode,
) -> Result<Vec<NormalizedBallot>, VotingErrors> {
    if candidate_count == 0 {
        return Err(VotingErrors::NoCandidates);
    }
    if raw.is_empty() {
        return Err(VotingErrors::NoBallots);
    }

    let kept: Vec<&RawBallot> = match mode {
        DuplicateVoterMode::KeepAll => raw.iter().collect(),
        DuplicateVoterMode::KeepLatest => {
            let mut slots: HashMap<&str, usize> = HashMap::new();
            let mut latest: Vec<&RawBallot> = Vec::new();
            for ballot in raw.iter() {
                match slots.get(ballot.voter_id.as_str()) {
                    Some(&slot) => {
                        debug!(
                            "normalize_ballots: voter {:?} voted again, replacing the previous ballot",
                            ballot.voter_id
                        );
                        latest[slot] = ballot;
                    }
                    None => {
                        slots.insert(ballot.voter_id.as_str(), latest.len());
                        latest.push(ballot);
                    }
                }
            }
            latest
        }
    };

    let res: Vec<NormalizedBallot> = kept
        .iter()
        .map(|b| {
            if b.ranks.len() > candidate_count && b.ranks[candidate_count..].iter().any(|r| r.is_some()) {
                warn!(
                    "normalize_ballots: voter {:?}: ignoring {} cells beyond the {} candidates",
                    b.voter_id,
                    b.ranks.len() - candidate_count,
                    candidate_count
                );
            }
            NormalizedBallot {
                voter_id: b.voter_id.clone(),
                ranks: compress_ranks(&b.ranks, candidate_count),
            }
        })
        .collect();
    debug!(
        "normalize_ballots: {} raw ballots, {} after deduplication",
        raw.len(),
        res.len()
    );
    let blank = res.iter().filter(|b| b.is_blank()).count();
    if blank > 0 {
        info!(
            "normalize_ballots: {} ballots rank no candidate and are exhausted from the start",
            blank
        );
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(voter: &str, ranks: &[Option<i64>]) -> RawBallot {
        RawBallot {
            voter_id: voter.to_string(),
            ranks: ranks.to_vec(),
        }
    }

    #[test]
    fn parse_cells() {
        assert_eq!(parse_rank_cell("3"), Some(3));
        assert_eq!(parse_rank_cell(" 2 "), Some(2));
        assert_eq!(parse_rank_cell("2.0"), Some(2));
        assert_eq!(parse_rank_cell("1st"), Some(1));
        assert_eq!(parse_rank_cell("-1"), Some(-1));
        assert_eq!(parse_rank_cell(""), None);
        assert_eq!(parse_rank_cell("abc"), None);
        assert_eq!(parse_rank_cell("-"), None);
    }

    #[test]
    fn compression_removes_gaps() {
        let c = compress_ranks(&[Some(1), Some(2), Some(3), None, Some(5)], 5);
        assert_eq!(c, vec![Some(1), Some(2), Some(3), None, Some(4)]);
    }

    #[test]
    fn compression_keeps_column_order_on_equal_ranks() {
        let c = compress_ranks(&[Some(2), Some(1), Some(2)], 3);
        assert_eq!(c, vec![Some(2), Some(1), Some(3)]);
    }

    #[test]
    fn compression_drops_out_of_range() {
        let c = compress_ranks(&[Some(0), Some(4), Some(3), Some(-2)], 4);
        assert_eq!(c, vec![None, Some(2), Some(1), None]);
        let c = compress_ranks(&[Some(1), Some(9)], 2);
        assert_eq!(c, vec![Some(1), None]);
    }

    #[test]
    fn short_ballots_are_padded() {
        let c = compress_ranks(&[Some(2)], 3);
        assert_eq!(c, vec![Some(1), None, None]);
    }

    #[test]
    fn latest_ballot_wins() {
        let ballots = vec![
            raw("ann", &[Some(1), Some(2)]),
            raw("bob", &[Some(2), Some(1)]),
            raw("ann", &[None, Some(1)]),
        ];
        let res = normalize_ballots(2, &ballots, DuplicateVoterMode::KeepLatest).unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].voter_id, "ann");
        assert_eq!(res[0].ranks, vec![None, Some(1)]);
        assert_eq!(res[1].voter_id, "bob");
    }

    #[test]
    fn keep_all_keeps_duplicates() {
        let ballots = vec![raw("", &[Some(1), Some(2)]), raw("", &[Some(2), Some(1)])];
        let res = normalize_ballots(2, &ballots, DuplicateVoterMode::KeepAll).unwrap();
        assert_eq!(res.len(), 2);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let ballots = vec![raw("ann", &[Some(1)])];
        assert_eq!(
            normalize_ballots(0, &ballots, DuplicateVoterMode::KeepLatest),
            Err(VotingErrors::NoCandidates)
        );
        assert_eq!(
            normalize_ballots(1, &[], DuplicateVoterMode::KeepLatest),
            Err(VotingErrors::NoBallots)
        );
    }

    #[test]
    fn preference_order_follows_ranks() {
        let b = NormalizedBallot {
            voter_id: "x".to_string(),
            ranks: vec![Some(3), None, Some(1), Some(2)],
        };
        assert_eq!(b.preference_order(), vec![2, 3, 0]);
        assert_eq!(b.rank_of(1), None);
        assert_eq!(b.rank_of(0), Some(3));
        assert!(!b.is_blank());
    }

    #[test]
    fn blank_ballots_are_kept() {
        let ballots = vec![
            raw("ann", &[Some(1), Some(2)]),
            raw("ben", &[None, Some(7)]),
        ];
        let res = normalize_ballots(2, &ballots, DuplicateVoterMode::KeepLatest).unwrap();
        assert_eq!(res.len(), 2);
        assert!(!res[0].is_blank());
        assert!(res[1].is_blank());
    }
}
