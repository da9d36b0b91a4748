pub use crate::config::*;
use crate::election::{register_candidates, Election};
use crate::normalize::parse_rank_cell;

/// A builder for adding ballots one at a time.
///
/// ```
/// pub use preference_voting::builder::Builder;
/// pub use preference_voting::VoteRules;
/// # use preference_voting::VotingErrors;
/// use preference_voting::NoTrace;
///
/// let mut builder = Builder::new(&VoteRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_ballot("voter 1", &[Some(1), Some(2)])?;
/// builder.add_ballot_cells("voter 2", &["2".to_string(), "1".to_string()])?;
/// builder.add_ballot_cells("voter 3", &["1".to_string(), "".to_string()])?;
///
/// let election = builder.build()?;
/// let outcome = election.run_instant_runoff(&mut NoTrace)?;
/// assert_eq!(outcome.winner, Some("Anna".to_string()));
///
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: VoteRules,
    pub(crate) _candidates: Option<Vec<Candidate>>,
    pub(crate) _ballots: Vec<RawBallot>,
}

impl Builder {
    pub fn new(rules: &VoteRules) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _candidates: None,
            _ballots: Vec::new(),
        })
    }

    /// Registers the candidates. Any ballot added before is discarded.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: self._rules,
            _candidates: Some(register_candidates(cands)?),
            _ballots: Vec::new(),
        })
    }

    /// Adds a ballot given as one optional rank per candidate, in candidate
    /// order.
    pub fn add_ballot(&mut self, voter_id: &str, ranks: &[Option<i64>]) -> Result<(), VotingErrors> {
        if self._candidates.is_none() {
            return Err(VotingErrors::NoCandidates);
        }
        self._ballots.push(RawBallot {
            voter_id: voter_id.to_string(),
            ranks: ranks.to_vec(),
        });
        Ok(())
    }

    /// Adds a ballot from the text of spreadsheet cells. Cells that do not
    /// hold a number are unranked.
    pub fn add_ballot_cells(&mut self, voter_id: &str, cells: &[String]) -> Result<(), VotingErrors> {
        let ranks: Vec<Option<i64>> = cells.iter().map(|c| parse_rank_cell(c)).collect();
        self.add_ballot(voter_id, &ranks)
    }

    pub fn ballot_count(&self) -> usize {
        self._ballots.len()
    }

    pub fn build(self) -> Result<Election, VotingErrors> {
        let candidates = self._candidates.ok_or(VotingErrors::NoCandidates)?;
        let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
        Election::new(&names, &self._ballots, &self._rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ballots_need_candidates() {
        let mut b = Builder::new(&VoteRules::DEFAULT_RULES).unwrap();
        assert_eq!(b.add_ballot("x", &[Some(1)]), Err(VotingErrors::NoCandidates));
        assert_eq!(b.build().err(), Some(VotingErrors::NoCandidates));
    }

    #[test]
    fn cells_are_parsed() {
        let mut b = Builder::new(&VoteRules::DEFAULT_RULES)
            .unwrap()
            .candidates(&["A".to_string(), "B".to_string(), "C".to_string()])
            .unwrap();
        b.add_ballot_cells("x", &["3".to_string(), "n/a".to_string(), "1.0".to_string()])
            .unwrap();
        assert_eq!(b.ballot_count(), 1);
        let e = b.build().unwrap();
        assert_eq!(e.ballots()[0].ranks, vec![Some(2), None, Some(1)]);
    }

    #[test]
    fn empty_builder_has_no_ballots() {
        let b = Builder::new(&VoteRules::DEFAULT_RULES)
            .unwrap()
            .candidates(&["A".to_string()])
            .unwrap();
        assert_eq!(b.build().err(), Some(VotingErrors::NoBallots));
    }
}
