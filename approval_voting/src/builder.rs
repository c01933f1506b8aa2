pub use crate::config::*;

use std::collections::HashMap;

/// A builder for assembling a scenario.
///
/// ```
/// pub use approval_voting::builder::Builder;
/// # use approval_voting::StrategyError;
///
/// let mut builder = Builder::new()
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_approvals("Anna", 4)?;
/// builder.add_matchup("Bob", "Anna")?;
/// let scenario = builder.build(&["Anna".to_string(), "Bob".to_string()])?;
///
/// # Ok::<(), StrategyError>(())
/// ```
pub struct Builder {
    pub(crate) _candidates: Vec<String>,
    pub(crate) _base_votes: HashMap<String, u64>,
    pub(crate) _matchups: Matchups,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _candidates: Vec::new(),
            _base_votes: HashMap::new(),
            _matchups: Matchups::new(),
        }
    }

    pub fn candidates(self, cands: &[String]) -> Result<Builder, StrategyError> {
        for (idx, name) in cands.iter().enumerate() {
            if cands[..idx].contains(name) {
                return Err(StrategyError::DuplicateCandidate(name.clone()));
            }
        }
        Ok(Builder {
            _candidates: cands.to_vec(),
            _base_votes: HashMap::new(),
            _matchups: Matchups::new(),
        })
    }

    /// Registers the approvals cast by the other voters for one candidate.
    /// Calling this again for the same candidate accumulates.
    pub fn add_approvals(&mut self, name: &str, count: u64) -> Result<(), StrategyError> {
        self.check_name(name)?;
        *self._base_votes.entry(name.to_string()).or_insert(0) += count;
        Ok(())
    }

    /// Records a pairwise result. Leaving a pair undeclared keeps it
    /// undefined, which the outcome engine reports as uncertainty.
    pub fn add_matchup(&mut self, winner: &str, loser: &str) -> Result<(), StrategyError> {
        self.check_name(winner)?;
        self.check_name(loser)?;
        self._matchups.declare(winner, loser)
    }

    /// Assembles the scenario for a voter holding the given preference order.
    ///
    /// The preference is not validated here; the analysis checks it against
    /// the candidate list before running.
    pub fn build(&self, preference: &[String]) -> Result<Scenario, StrategyError> {
        Ok(Scenario {
            candidates: self._candidates.clone(),
            base_votes: self._base_votes.clone(),
            matchups: self._matchups.clone(),
            preference: preference.to_vec(),
        })
    }

    fn check_name(&self, name: &str) -> Result<(), StrategyError> {
        if self._candidates.iter().any(|c| c == name) {
            Ok(())
        } else {
            Err(StrategyError::UnknownCandidate(name.to_string()))
        }
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}
