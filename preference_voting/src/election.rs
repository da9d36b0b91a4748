use log::{debug, info};
use std::collections::HashSet;

use crate::config::*;
use crate::irv::run_instant_runoff;
use crate::matrix::PreferenceMatrix;
use crate::methods::{PairwiseMethod, ResolverResult};
use crate::normalize::normalize_ballots;
use crate::report::ElectionReport;
use crate::trace::TraceSink;

/// Registers the candidates, in order.
pub fn register_candidates(names: &[String]) -> Result<Vec<Candidate>, VotingErrors> {
    if names.is_empty() {
        return Err(VotingErrors::NoCandidates);
    }
    let mut seen: HashSet<&str> = HashSet::new();
    let mut res: Vec<Candidate> = Vec::new();
    for (index, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(VotingErrors::EmptyCandidateName);
        }
        if !seen.insert(name.as_str()) {
            return Err(VotingErrors::DuplicateCandidate(name.clone()));
        }
        res.push(Candidate {
            index,
            name: name.clone(),
        });
    }
    Ok(res)
}

/// A validated election: registered candidates and normalized ballots.
///
/// Every counting method borrows the election immutably, so any number of
/// them can be run on the same instance.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Election {
    candidates: Vec<Candidate>,
    ballots: Vec<NormalizedBallot>,
    rules: VoteRules,
}

impl Election {
    pub fn new(
        candidate_names: &[String],
        raw_ballots: &[RawBallot],
        rules: &VoteRules,
    ) -> Result<Election, VotingErrors> {
        let candidates = register_candidates(candidate_names)?;
        let ballots = normalize_ballots(candidates.len(), raw_ballots, rules.duplicate_voter_mode)?;
        info!(
            "Election: {} candidates, {} ballots ({} submitted)",
            candidates.len(),
            ballots.len(),
            raw_ballots.len()
        );
        Ok(Election {
            candidates,
            ballots,
            rules: rules.clone(),
        })
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn ballots(&self) -> &[NormalizedBallot] {
        &self.ballots
    }

    pub fn matrix(&self) -> PreferenceMatrix {
        PreferenceMatrix::from_ballots(self.candidates.len(), &self.ballots)
    }

    pub fn run_pairwise(&self, method: PairwiseMethod) -> ResolverResult {
        method.resolve(&self.matrix(), &self.candidates)
    }

    pub fn run_instant_runoff(&self, sink: &mut dyn TraceSink) -> Result<RcvOutcome, VotingErrors> {
        run_instant_runoff(&self.candidates, &self.ballots, sink)
    }

    /// SHA-256 (hex) of the candidate list and the normalized rankings.
    ///
    /// Voter ids are not part of the digest: two elections with the same
    /// candidates and the same ballots in the same order share a digest.
    pub fn digest(&self) -> String {
        let mut text = self
            .candidates
            .iter()
            .map(|c| c.name.clone())
            .collect::<Vec<String>>()
            .join("\t");
        for b in self.ballots.iter() {
            text.push('\n');
            let cells: Vec<String> = b
                .ranks
                .iter()
                .map(|r| r.map(|x| x.to_string()).unwrap_or_default())
                .collect();
            text.push_str(&cells.join(","));
        }
        sha256::digest(text.as_str())
    }

    /// Runs every method selected by the rules.
    ///
    /// The pairwise methods share a single matrix.
    pub fn report(&self, sink: &mut dyn TraceSink) -> Result<ElectionReport, VotingErrors> {
        let methods = self.rules.selected_methods();
        debug!("Election::report: methods: {:?}", methods);
        let matrix = self.matrix();
        let mut instant_runoff: Option<RcvOutcome> = None;
        let mut pairwise: Vec<ResolverResult> = Vec::new();
        for m in methods.iter() {
            match m {
                Method::InstantRunoff => {
                    instant_runoff = Some(self.run_instant_runoff(sink)?);
                }
                Method::Pairwise(pm) => pairwise.push(pm.resolve(&matrix, &self.candidates)),
            }
        }
        Ok(ElectionReport {
            candidates: self.candidates.iter().map(|c| c.name.clone()).collect(),
            ballot_count: self.ballots.len(),
            digest: self.digest(),
            instant_runoff,
            pairwise,
        })
    }
}
