// ********* Input data structures ***********

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::Display;

/// The ballot cast by the focal voter: the subset of the candidates they
/// approve of.
///
/// An empty ballot is an abstention. The full candidate set is never produced
/// by the enumerator since approving everyone is behaviorally identical to
/// abstaining.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Ballot {
    /// The approved candidates, in the order of the candidate list.
    pub approved: Vec<String>,
}

impl Ballot {
    pub fn abstention() -> Ballot {
        Ballot { approved: vec![] }
    }

    pub fn new(approved: Vec<String>) -> Ballot {
        Ballot { approved }
    }

    pub fn is_abstention(&self) -> bool {
        self.approved.is_empty()
    }

    pub fn approves(&self, name: &str) -> bool {
        self.approved.iter().any(|c| c == name)
    }
}

/// The pairwise head-to-head results between candidates.
///
/// For any unordered pair, either direction or neither may be recorded.
/// A pair with no recorded direction is undefined: the outcome engine treats
/// it as maximal uncertainty and both candidates stay possible winners.
/// Recording both directions for the same pair is rejected as a conflict.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Matchups {
    wins: HashSet<(String, String)>,
}

impl Matchups {
    pub fn new() -> Matchups {
        Matchups::default()
    }

    /// Records that `winner` beats `loser` head to head. A self-matchup or a
    /// direction contradicting one already recorded is a conflict.
    pub fn declare(&mut self, winner: &str, loser: &str) -> Result<(), StrategyError> {
        if winner == loser || self.beats(loser, winner) {
            return Err(StrategyError::ConflictingMatchup(
                winner.to_string(),
                loser.to_string(),
            ));
        }
        self.wins.insert((winner.to_string(), loser.to_string()));
        Ok(())
    }

    pub fn beats(&self, winner: &str, loser: &str) -> bool {
        self.wins
            .contains(&(winner.to_string(), loser.to_string()))
    }

    /// The winner of a pairing, or None when the pair is undefined.
    pub fn winner_of<'a>(&self, first: &'a str, second: &'a str) -> Option<&'a str> {
        if self.beats(first, second) {
            Some(first)
        } else if self.beats(second, first) {
            Some(second)
        } else {
            None
        }
    }

    /// All the recorded (winner, loser) directions, in no particular order.
    pub fn pairs(&self) -> impl Iterator<Item = (&String, &String)> + '_ {
        self.wins.iter().map(|(w, l)| (w, l))
    }
}

/// A full strategic-voting scenario: the fixed background against which the
/// focal voter picks a ballot.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Scenario {
    pub candidates: Vec<String>,
    /// The approval counts from all the other voters, before the focal ballot
    /// is added. Absent candidates count as zero.
    pub base_votes: HashMap<String, u64>,
    pub matchups: Matchups,
    /// The focal voter's strict preference order, most preferred first.
    /// Must be a permutation of the candidate list.
    pub preference: Vec<String>,
}

// ******** Output data structures *********

/// A possible second-round pairing, with its winner when the matchup table
/// defines one.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunoffPairing {
    pub first: String,
    pub second: String,
    pub winner: Option<String>,
}

/// The resolution of a single focal ballot.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Outcome {
    /// Candidates certain to reach the runoff round. Empty in approval mode.
    pub a_set: Vec<String>,
    /// Candidates with a chance to reach the runoff round, depending on how
    /// ties are broken. Empty in approval mode.
    pub b_set: Vec<String>,
    pub possible_runoffs: Vec<RunoffPairing>,
    /// Every candidate who could still end up winning, in candidate order.
    /// Non-empty whenever the candidate list is non-empty.
    pub gamma: Vec<String>,
    /// The final tally including the focal ballot, in candidate order.
    pub votes: Vec<(String, u64)>,
    pub approval_mode: bool,
}

/// The resolution and classification of one enumerated ballot.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BallotOutcome {
    pub ballot: Ballot,
    pub outcome: Outcome,
    pub sincere: bool,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StrategyReport {
    /// One entry per enumerated ballot, in enumeration order.
    pub ballots: Vec<BallotOutcome>,
    /// The insincere ballots whose outcome strictly beats the outcome of
    /// every sincere ballot.
    pub dominant_insincere: Vec<Ballot>,
    pub manipulable: bool,
}

/// Errors raised on malformed scenarios. All of them are caller bugs: the
/// analysis itself is total over well-formed inputs.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StrategyError {
    EmptyElection,
    DuplicateCandidate(String),
    UnknownCandidate(String),
    InvalidPreference,
    ConflictingMatchup(String, String),
}

impl Error for StrategyError {}

impl Display for StrategyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyError::EmptyElection => write!(f, "empty candidate set"),
            StrategyError::DuplicateCandidate(name) => {
                write!(f, "duplicate candidate {:?}", name)
            }
            StrategyError::UnknownCandidate(name) => {
                write!(f, "unknown candidate {:?}", name)
            }
            StrategyError::InvalidPreference => {
                write!(f, "preference is not a permutation of the candidates")
            }
            StrategyError::ConflictingMatchup(winner, loser) => {
                write!(f, "conflicting matchup {:?} vs {:?}", winner, loser)
            }
        }
    }
}

// ********* Configuration **********

/// Which election rule the outcome engine applies.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RuleMode {
    /// Plain approval: the winners are the candidates with the top tally.
    Approval,
    /// Approval followed by a pairwise runoff between the top qualifiers.
    Runoff,
}

/// The configuration of one analysis. It is passed explicitly to every call
/// that needs it; there is no process-wide mode.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct AnalysisConfig {
    pub mode: RuleMode,
    /// Whether the empty ballot counts as sincere. Abstention conveys no
    /// ranking information, so its classification is a modeling choice.
    pub abstention_is_sincere: bool,
}

impl AnalysisConfig {
    pub const DEFAULT_CONFIG: AnalysisConfig = AnalysisConfig {
        mode: RuleMode::Runoff,
        abstention_is_sincere: true,
    };
}
