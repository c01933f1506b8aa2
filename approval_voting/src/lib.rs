mod config;
pub mod builder;
pub mod manual;

use log::{debug, info};

use std::{
    collections::{HashMap, HashSet},
    ops::AddAssign,
};

pub use crate::config::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CandidateId(u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

// The candidates in declared order, with a compact id per name.
struct Roster {
    names: Vec<String>,
    ids: HashMap<String, CandidateId>,
}

impl Roster {
    fn from_candidates(candidates: &[String]) -> Roster {
        let names = candidates.to_vec();
        let ids = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), CandidateId(idx as u32)))
            .collect();
        Roster { names, ids }
    }

    fn id(&self, name: &str) -> Option<CandidateId> {
        self.ids.get(name).copied()
    }

    fn name(&self, cid: CandidateId) -> &str {
        &self.names[cid.0 as usize]
    }

    // Converts a set of ids back to names, in the declared candidate order.
    fn ordered_names(&self, ids: &[CandidateId]) -> Vec<String> {
        let set: HashSet<CandidateId> = ids.iter().cloned().collect();
        self.names
            .iter()
            .enumerate()
            .filter(|(idx, _)| set.contains(&CandidateId(*idx as u32)))
            .map(|(_, name)| name.clone())
            .collect()
    }
}

/// Enumerates every ballot the focal voter could cast over the given
/// candidates: all the subsets of the list except the full set, which behaves
/// exactly like an abstention. The empty ballot comes first and the order is
/// stable (bitmask order).
///
/// For `n` candidates this returns `2^n - 1` ballots, so callers are expected
/// to keep the candidate list small.
pub fn enumerate_ballots(candidates: &[String]) -> Vec<Ballot> {
    let n = candidates.len();
    let full: u64 = (1u64 << n) - 1;
    let mut res: Vec<Ballot> = Vec::new();
    for mask in 0..=full {
        if mask == full {
            continue;
        }
        let approved: Vec<String> = candidates
            .iter()
            .enumerate()
            .filter(|(idx, _)| mask & (1u64 << idx) != 0)
            .map(|(_, name)| name.clone())
            .collect();
        res.push(Ballot::new(approved));
    }
    res
}

/// Resolves one focal ballot against the background votes and the matchup
/// table, under the given rule mode.
///
/// This function is total: absent vote counts are zero and an undefined
/// matchup direction is not an error, it leaves both candidates of the
/// pairing as possible winners.
pub fn resolve_outcome(
    base_votes: &HashMap<String, u64>,
    matchups: &Matchups,
    ballot: &Ballot,
    candidates: &[String],
    mode: RuleMode,
) -> Outcome {
    let roster = Roster::from_candidates(candidates);
    let approved: HashSet<CandidateId> = ballot
        .approved
        .iter()
        .filter_map(|name| roster.id(name))
        .collect();

    // The tally covers every declared candidate, with or without votes.
    let tally: Vec<(CandidateId, VoteCount)> = roster
        .names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cid = CandidateId(idx as u32);
            let mut count = VoteCount(base_votes.get(name).copied().unwrap_or(0));
            if approved.contains(&cid) {
                count += VoteCount(1);
            }
            (cid, count)
        })
        .collect();
    debug!("resolve_outcome: tally: {:?}", tally);

    let votes: Vec<(String, u64)> = tally
        .iter()
        .map(|(cid, vc)| (roster.name(*cid).to_string(), vc.0))
        .collect();

    match mode {
        RuleMode::Approval => resolve_approval(&roster, &tally, votes),
        RuleMode::Runoff => resolve_runoff(&roster, &tally, matchups, votes),
    }
}

// Plain approval: the possible winners are exactly the top-tally candidates.
fn resolve_approval(
    roster: &Roster,
    tally: &[(CandidateId, VoteCount)],
    votes: Vec<(String, u64)>,
) -> Outcome {
    let max_votes = tally
        .iter()
        .map(|p| p.1)
        .max()
        .unwrap_or(VoteCount::EMPTY);
    let winners: Vec<CandidateId> = tally
        .iter()
        .filter(|p| p.1 == max_votes)
        .map(|p| p.0)
        .collect();
    Outcome {
        a_set: vec![],
        b_set: vec![],
        possible_runoffs: vec![],
        gamma: roster.ordered_names(&winners),
        votes,
        approval_mode: true,
    }
}

fn resolve_runoff(
    roster: &Roster,
    tally: &[(CandidateId, VoteCount)],
    matchups: &Matchups,
    votes: Vec<(String, u64)>,
) -> Outcome {
    let max_votes = tally
        .iter()
        .map(|p| p.1)
        .max()
        .unwrap_or(VoteCount::EMPTY);
    let second_max = tally.iter().map(|p| p.1).filter(|vc| *vc < max_votes).max();

    let top_tier: Vec<CandidateId> = tally
        .iter()
        .filter(|p| p.1 == max_votes)
        .map(|p| p.0)
        .collect();
    let second_tier: Vec<CandidateId> = match second_max {
        Some(vc) => tally.iter().filter(|p| p.1 == vc).map(|p| p.0).collect(),
        None => vec![],
    };
    debug!(
        "resolve_runoff: top_tier: {:?} second_tier: {:?}",
        top_tier, second_tier
    );

    // A tie for first leaves no one certain of a runoff slot; a single leader
    // is certain and the second tier contends for the remaining slot.
    let (a_set, b_set) = if top_tier.len() >= 2 {
        (vec![], top_tier.clone())
    } else {
        (top_tier.clone(), second_tier)
    };

    let mut pairings: Vec<(CandidateId, CandidateId)> = Vec::new();
    match (a_set.as_slice(), b_set.as_slice()) {
        ([x, y], _) => pairings.push((*x, *y)),
        ([x], bs) => {
            for b in bs {
                pairings.push((*x, *b));
            }
        }
        ([], bs) if bs.len() >= 2 => {
            for i in 0..bs.len() {
                for j in i + 1..bs.len() {
                    pairings.push((bs[i], bs[j]));
                }
            }
        }
        // Degenerate elections (a single candidate) have no pairing at all.
        _ => {}
    }

    let mut possible_runoffs: Vec<RunoffPairing> = Vec::new();
    let mut gamma_ids: Vec<CandidateId> = Vec::new();
    for (x, y) in pairings {
        let x_name = roster.name(x);
        let y_name = roster.name(y);
        let winner = if matchups.beats(x_name, y_name) {
            Some(x)
        } else if matchups.beats(y_name, x_name) {
            Some(y)
        } else {
            None
        };
        match winner {
            Some(w) => gamma_ids.push(w),
            None => {
                // Undefined pairing: both candidates remain possible winners.
                gamma_ids.push(x);
                gamma_ids.push(y);
            }
        }
        possible_runoffs.push(RunoffPairing {
            first: x_name.to_string(),
            second: y_name.to_string(),
            winner: winner.map(|w| roster.name(w).to_string()),
        });
    }

    if gamma_ids.is_empty() {
        if let [single] = top_tier.as_slice() {
            gamma_ids.push(*single);
        }
    }

    Outcome {
        a_set: roster.ordered_names(&a_set),
        b_set: roster.ordered_names(&b_set),
        possible_runoffs,
        gamma: roster.ordered_names(&gamma_ids),
        votes,
        approval_mode: false,
    }
}

/// Compares two outcomes from the point of view of a voter holding
/// `preference` (most preferred first). Returns 1 if the first outcome is
/// better, -1 if the second one is, and 0 for indifference.
///
/// The comparison is set-equality first, then the certainty-vs-risk rule for
/// a sure winner measured against the same winner at risk with one other
/// candidate, then best-case and worst-case ranks. It is a partial order:
/// indifference does not mean the possible-winner sets are identical.
pub fn compare_outcomes(
    outcome_a: &Outcome,
    outcome_b: &Outcome,
    preference: &[String],
) -> Result<i32, StrategyError> {
    let set_a: HashSet<&String> = outcome_a.gamma.iter().collect();
    let set_b: HashSet<&String> = outcome_b.gamma.iter().collect();
    if set_a == set_b {
        return Ok(0);
    }

    let ranks: HashMap<&str, usize> = preference
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    if let Some(v) = singleton_vs_pair(&outcome_a.gamma, &outcome_b.gamma, &ranks)? {
        return Ok(v);
    }
    if let Some(v) = singleton_vs_pair(&outcome_b.gamma, &outcome_a.gamma, &ranks)? {
        return Ok(-v);
    }

    let (best_a, worst_a) = rank_span(&outcome_a.gamma, &ranks)?;
    let (best_b, worst_b) = rank_span(&outcome_b.gamma, &ranks)?;
    if best_a != best_b {
        return Ok(if best_a < best_b { 1 } else { -1 });
    }
    if worst_a != worst_b {
        return Ok(if worst_a < worst_b { 1 } else { -1 });
    }
    Ok(0)
}

// The certainty-vs-risk rule: a sure winner {x} against {x, y} reduces to
// comparing x with y. The sure thing wins exactly when x is preferred.
// Returns 1 when the singleton side is better, -1 when the pair side is.
fn singleton_vs_pair(
    single: &[String],
    pair: &[String],
    ranks: &HashMap<&str, usize>,
) -> Result<Option<i32>, StrategyError> {
    match (single, pair) {
        ([x], [p, q]) if p == x || q == x => {
            let y = if p == x { q } else { p };
            let rank_x = rank_of(x, ranks)?;
            let rank_y = rank_of(y, ranks)?;
            Ok(Some(if rank_x < rank_y { 1 } else { -1 }))
        }
        _ => Ok(None),
    }
}

fn rank_of(name: &str, ranks: &HashMap<&str, usize>) -> Result<usize, StrategyError> {
    ranks
        .get(name)
        .copied()
        .ok_or_else(|| StrategyError::UnknownCandidate(name.to_string()))
}

// The (best, worst) preference ranks reachable within a possible-winner set.
// An empty set sorts after everything.
fn rank_span(
    gamma: &[String],
    ranks: &HashMap<&str, usize>,
) -> Result<(usize, usize), StrategyError> {
    if gamma.is_empty() {
        return Ok((usize::MAX, usize::MAX));
    }
    let mut best = usize::MAX;
    let mut worst = 0;
    for name in gamma {
        let rank = rank_of(name, ranks)?;
        best = best.min(rank);
        worst = worst.max(rank);
    }
    Ok((best, worst))
}

/// Whether a ballot is a sincere approval ballot for `preference`: the
/// approved set is exactly a top-k prefix of the preference order, with no
/// gap. The empty ballot carries no ranking information, so its status is
/// whatever `abstention_is_sincere` says.
pub fn is_sincere_ballot(
    ballot: &Ballot,
    preference: &[String],
    abstention_is_sincere: bool,
) -> Result<bool, StrategyError> {
    if ballot.is_abstention() {
        return Ok(abstention_is_sincere);
    }
    let ranks: HashMap<&str, usize> = preference
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();
    let mut seen: HashSet<usize> = HashSet::new();
    let mut deepest = 0;
    for name in ballot.approved.iter() {
        let rank = rank_of(name, &ranks)?;
        if !seen.insert(rank) {
            return Ok(false);
        }
        deepest = deepest.max(rank);
    }
    // The distinct ranks cover 0..=deepest exactly when there is no gap.
    Ok(seen.len() == deepest + 1)
}

/// Runs the full strategic-voting analysis for a scenario.
///
/// Every possible focal ballot is enumerated and resolved, each one is
/// classified as sincere or not, and the report lists the insincere ballots
/// whose outcome strictly beats the outcome of every sincere ballot. The
/// scenario is manipulable exactly when that list is non-empty.
pub fn run_strategy_analysis(
    scenario: &Scenario,
    config: &AnalysisConfig,
) -> Result<StrategyReport, StrategyError> {
    info!(
        "run_strategy_analysis: {:?} candidates, config: {:?}",
        scenario.candidates.len(),
        config
    );
    check_scenario(scenario)?;

    let ballots = enumerate_ballots(&scenario.candidates);
    debug!("run_strategy_analysis: {:?} ballots to evaluate", ballots.len());

    let mut entries: Vec<BallotOutcome> = Vec::new();
    for ballot in ballots {
        let outcome = resolve_outcome(
            &scenario.base_votes,
            &scenario.matchups,
            &ballot,
            &scenario.candidates,
            config.mode,
        );
        let sincere =
            is_sincere_ballot(&ballot, &scenario.preference, config.abstention_is_sincere)?;
        debug!(
            "run_strategy_analysis: ballot {:?} gamma {:?} sincere {:?}",
            ballot.approved, outcome.gamma, sincere
        );
        entries.push(BallotOutcome {
            ballot,
            outcome,
            sincere,
        });
    }

    let sincere_indices: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, e)| if e.sincere { Some(idx) } else { None })
        .collect();

    let mut dominant_insincere: Vec<Ballot> = Vec::new();
    for entry in entries.iter().filter(|e| !e.sincere) {
        let mut beats_every_sincere = !sincere_indices.is_empty();
        for &idx in sincere_indices.iter() {
            if compare_outcomes(&entry.outcome, &entries[idx].outcome, &scenario.preference)? != 1 {
                beats_every_sincere = false;
                break;
            }
        }
        if beats_every_sincere {
            dominant_insincere.push(entry.ballot.clone());
        }
    }

    let manipulable = !dominant_insincere.is_empty();
    info!(
        "run_strategy_analysis: manipulable: {:?}, dominant insincere ballots: {:?}",
        manipulable,
        dominant_insincere.len()
    );
    Ok(StrategyReport {
        ballots: entries,
        dominant_insincere,
        manipulable,
    })
}

// Scenarios are validated once at the front door; the resolution functions
// themselves stay total.
fn check_scenario(scenario: &Scenario) -> Result<(), StrategyError> {
    if scenario.candidates.is_empty() {
        return Err(StrategyError::EmptyElection);
    }
    let mut declared: HashSet<&String> = HashSet::new();
    for name in scenario.candidates.iter() {
        if !declared.insert(name) {
            return Err(StrategyError::DuplicateCandidate(name.clone()));
        }
    }
    if scenario.preference.len() != scenario.candidates.len() {
        return Err(StrategyError::InvalidPreference);
    }
    let mut ranked: HashSet<&String> = HashSet::new();
    for name in scenario.preference.iter() {
        if !declared.contains(name) || !ranked.insert(name) {
            return Err(StrategyError::InvalidPreference);
        }
    }
    for name in scenario.base_votes.keys() {
        if !declared.contains(name) {
            return Err(StrategyError::UnknownCandidate(name.clone()));
        }
    }
    for (winner, loser) in scenario.matchups.pairs() {
        if !declared.contains(winner) {
            return Err(StrategyError::UnknownCandidate(winner.clone()));
        }
        if !declared.contains(loser) {
            return Err(StrategyError::UnknownCandidate(loser.clone()));
        }
    }
    Ok(())
}
