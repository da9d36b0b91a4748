// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A registered candidate.
///
/// The index is the position of the candidate in the registry. It is the key
/// used by every ballot, matrix and tally in this crate and never changes
/// during a run.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Candidate {
    pub index: usize,
    pub name: String,
}

/// A ballot as delivered by the intake.
///
/// `ranks[i]` is the rank given to candidate `i`, or `None` if the voter left
/// that candidate unranked. Values are not trusted: they may have gaps,
/// duplicates or be out of range. The normalizer sorts this out.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawBallot {
    pub voter_id: String,
    pub ranks: Vec<Option<i64>>,
}

/// A ballot after deduplication and rank compression.
///
/// Invariant: the filled ranks are exactly `1..=k` for some `k`, with no
/// duplicates. Positions are candidate indexes.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct NormalizedBallot {
    pub voter_id: String,
    pub ranks: Vec<Option<u32>>,
}

impl NormalizedBallot {
    /// The candidate indexes in preference order (best first).
    pub fn preference_order(&self) -> Vec<usize> {
        let mut order: Vec<(u32, usize)> = self
            .ranks
            .iter()
            .enumerate()
            .filter_map(|(idx, r)| r.map(|rank| (rank, idx)))
            .collect();
        order.sort();
        order.into_iter().map(|(_, idx)| idx).collect()
    }

    pub fn rank_of(&self, candidate: usize) -> Option<u32> {
        self.ranks.get(candidate).copied().flatten()
    }

    pub fn is_blank(&self) -> bool {
        self.ranks.iter().all(|r| r.is_none())
    }
}

// ******** Output data structures *********

/// Why a candidate was eliminated in the instant-runoff count.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum EliminationReason {
    FewestVotes,
    FewestSecondChoices,
    MostLastPlace,
}

impl Display for EliminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EliminationReason::FewestVotes => "fewest votes",
            EliminationReason::FewestSecondChoices => "fewest second choice votes",
            EliminationReason::MostLastPlace => "most last-place votes",
        };
        write!(f, "{}", s)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Elimination {
    pub round: u32,
    pub reason: EliminationReason,
    pub votes_at_elimination: u64,
}

/// The state of one candidate as counted in one round.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateRoundState {
    pub votes: u64,
    pub eliminated: Option<Elimination>,
}

/// What the count decided at the end of a round.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RoundDecision {
    Elected(usize),
    Eliminated {
        candidate: usize,
        reason: EliminationReason,
    },
    TieUnresolved(Vec<usize>),
}

/// Immutable record of one round. Rounds are kept in order, so the whole
/// history of a count can be inspected without replaying it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundSnapshot {
    pub round: u32,
    /// Indexed by candidate.
    pub states: Vec<CandidateRoundState>,
    pub continuing_ballots: u64,
    pub exhausted_ballots: u64,
    pub decision: RoundDecision,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum CandidateStatus {
    Winner,
    Active,
    Eliminated,
    NoVotes,
}

impl Display for CandidateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CandidateStatus::Winner => "Winner",
            CandidateStatus::Active => "Active",
            CandidateStatus::Eliminated => "Eliminated",
            CandidateStatus::NoVotes => "No Votes",
        };
        write!(f, "{}", s)
    }
}

/// One row of the candidate summary table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SummaryRow {
    pub candidate: String,
    pub status: CandidateStatus,
    pub votes: u64,
    pub elimination_round: Option<u32>,
    pub elimination_reason: Option<EliminationReason>,
}

/// Final result of an instant-runoff count.
///
/// Exactly one of `winner` and `tie` is set.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RcvOutcome {
    pub winner: Option<String>,
    pub tie: Option<Vec<String>>,
    pub summary: Vec<SummaryRow>,
    pub rounds: Vec<RoundSnapshot>,
}

/// A candidate with the score the method ranked it by.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: String,
    pub score: i64,
}

/// Errors that prevent a tabulation from starting.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    NoCandidates,
    NoBallots,
    DuplicateCandidate(String),
    EmptyCandidateName,
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::NoCandidates => write!(f, "no candidates registered"),
            VotingErrors::NoBallots => write!(f, "no ballots to count"),
            VotingErrors::DuplicateCandidate(name) => {
                write!(f, "candidate {:?} is registered more than once", name)
            }
            VotingErrors::EmptyCandidateName => write!(f, "candidate names may not be empty"),
        }
    }
}

// ********* Configuration **********

/// How ballots sharing a voter id are treated.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DuplicateVoterMode {
    /// Only the last ballot submitted under a voter id counts.
    KeepLatest,
    /// Every ballot counts, for anonymous intakes.
    KeepAll,
}

/// The counting methods offered by the engine.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Method {
    InstantRunoff,
    Pairwise(crate::methods::PairwiseMethod),
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::InstantRunoff,
        Method::Pairwise(crate::methods::PairwiseMethod::Condorcet),
        Method::Pairwise(crate::methods::PairwiseMethod::Schulze),
        Method::Pairwise(crate::methods::PairwiseMethod::RankedPairs),
        Method::Pairwise(crate::methods::PairwiseMethod::Minimax),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Method::InstantRunoff => "Instant Runoff",
            Method::Pairwise(m) => m.name(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteRules {
    pub duplicate_voter_mode: DuplicateVoterMode,
    pub methods: Vec<Method>,
}

impl VoteRules {
    pub const DEFAULT_RULES: VoteRules = VoteRules {
        duplicate_voter_mode: DuplicateVoterMode::KeepLatest,
        methods: Vec::new(),
    };

    /// The methods to run. An empty list means all of them.
    pub fn selected_methods(&self) -> Vec<Method> {
        if self.methods.is_empty() {
            Method::ALL.to_vec()
        } else {
            self.methods.clone()
        }
    }
}

impl Default for VoteRules {
    fn default() -> Self {
        VoteRules::DEFAULT_RULES
    }
}
