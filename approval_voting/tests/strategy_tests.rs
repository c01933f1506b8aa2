use approval_voting::*;

use std::collections::{HashMap, HashSet};

fn names(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

fn counts(xs: &[(&str, u64)]) -> HashMap<String, u64> {
    xs.iter().map(|(n, c)| (n.to_string(), *c)).collect()
}

fn outcome_with_gamma(gamma: &[&str]) -> Outcome {
    Outcome {
        a_set: vec![],
        b_set: vec![],
        possible_runoffs: vec![],
        gamma: names(gamma),
        votes: vec![],
        approval_mode: false,
    }
}

#[test]
fn enumerate_all_proper_subsets() {
    let cands = names(&["A", "B", "C"]);
    let ballots = enumerate_ballots(&cands);
    assert_eq!(ballots.len(), 7);

    let distinct: HashSet<&Ballot> = ballots.iter().collect();
    assert_eq!(distinct.len(), 7);

    // The abstention comes first and exactly once; the full set never shows up.
    assert!(ballots[0].is_abstention());
    assert_eq!(ballots.iter().filter(|b| b.is_abstention()).count(), 1);
    assert!(!ballots.iter().any(|b| b.approved.len() == 3));
}

#[test]
fn enumerate_degenerate_sizes() {
    assert_eq!(enumerate_ballots(&[]).len(), 0);
    let single = enumerate_ballots(&names(&["A"]));
    assert_eq!(single, vec![Ballot::abstention()]);
}

#[test]
fn approval_mode_takes_the_argmax() {
    let cands = names(&["A", "B", "C"]);
    let base = counts(&[("A", 4), ("B", 5), ("C", 1)]);
    let outcome = resolve_outcome(
        &base,
        &Matchups::new(),
        &Ballot::new(names(&["A"])),
        &cands,
        RuleMode::Approval,
    );
    assert!(outcome.approval_mode);
    assert_eq!(outcome.gamma, names(&["A", "B"]));
    assert_eq!(outcome.a_set, Vec::<String>::new());
    assert_eq!(outcome.b_set, Vec::<String>::new());
    assert!(outcome.possible_runoffs.is_empty());
    assert_eq!(
        outcome.votes,
        vec![
            ("A".to_string(), 5),
            ("B".to_string(), 5),
            ("C".to_string(), 1)
        ]
    );
}

#[test]
fn runoff_single_top_and_single_second() {
    // Base A:5 B:5 C:2 plus a ballot for A alone.
    let cands = names(&["A", "B", "C"]);
    let base = counts(&[("A", 5), ("B", 5), ("C", 2)]);
    let mut matchups = Matchups::new();
    matchups.declare("B", "A").unwrap();

    let outcome = resolve_outcome(
        &base,
        &matchups,
        &Ballot::new(names(&["A"])),
        &cands,
        RuleMode::Runoff,
    );
    assert_eq!(
        outcome.votes,
        vec![
            ("A".to_string(), 6),
            ("B".to_string(), 5),
            ("C".to_string(), 2)
        ]
    );
    assert_eq!(outcome.a_set, names(&["A"]));
    assert_eq!(outcome.b_set, names(&["B"]));
    assert_eq!(outcome.possible_runoffs.len(), 1);
    assert_eq!(outcome.possible_runoffs[0].first, "A");
    assert_eq!(outcome.possible_runoffs[0].second, "B");
    assert_eq!(outcome.possible_runoffs[0].winner, Some("B".to_string()));
    assert_eq!(outcome.gamma, names(&["B"]));
    assert!(!outcome.approval_mode);
}

#[test]
fn runoff_tie_for_first_leaves_no_one_certain() {
    let cands = names(&["A", "B", "C"]);
    let base = counts(&[("A", 5), ("B", 5), ("C", 2)]);
    let outcome = resolve_outcome(
        &base,
        &Matchups::new(),
        &Ballot::abstention(),
        &cands,
        RuleMode::Runoff,
    );
    assert_eq!(outcome.a_set, Vec::<String>::new());
    assert_eq!(outcome.b_set, names(&["A", "B"]));
    assert_eq!(outcome.possible_runoffs.len(), 1);
    // No direction declared: both finalists stay possible winners.
    assert_eq!(outcome.possible_runoffs[0].winner, None);
    assert_eq!(outcome.gamma, names(&["A", "B"]));
}

#[test]
fn runoff_three_way_tie_pairs_everyone() {
    let cands = names(&["A", "B", "C"]);
    let base = counts(&[("A", 3), ("B", 3), ("C", 3)]);
    let mut matchups = Matchups::new();
    matchups.declare("A", "B").unwrap();

    let outcome = resolve_outcome(
        &base,
        &matchups,
        &Ballot::abstention(),
        &cands,
        RuleMode::Runoff,
    );
    assert_eq!(outcome.b_set, names(&["A", "B", "C"]));
    assert_eq!(outcome.possible_runoffs.len(), 3);
    // (A,B) resolves to A; (A,C) and (B,C) are undefined.
    assert_eq!(outcome.gamma, names(&["A", "B", "C"]));
}

#[test]
fn runoff_single_candidate_wins_outright() {
    let cands = names(&["A"]);
    let outcome = resolve_outcome(
        &counts(&[("A", 3)]),
        &Matchups::new(),
        &Ballot::abstention(),
        &cands,
        RuleMode::Runoff,
    );
    assert_eq!(outcome.a_set, names(&["A"]));
    assert_eq!(outcome.b_set, Vec::<String>::new());
    assert!(outcome.possible_runoffs.is_empty());
    assert_eq!(outcome.gamma, names(&["A"]));
}

#[test]
fn zero_vote_candidates_still_contend_for_the_second_slot() {
    // A leads; B and C both sit at zero, the second-highest tally.
    let cands = names(&["A", "B", "C"]);
    let outcome = resolve_outcome(
        &counts(&[("A", 2)]),
        &Matchups::new(),
        &Ballot::abstention(),
        &cands,
        RuleMode::Runoff,
    );
    assert_eq!(outcome.a_set, names(&["A"]));
    assert_eq!(outcome.b_set, names(&["B", "C"]));
    assert_eq!(outcome.possible_runoffs.len(), 2);
}

#[test]
fn compare_equal_sets_is_indifferent() {
    let pref = names(&["A", "B", "C"]);
    let x = outcome_with_gamma(&["A", "C"]);
    let y = outcome_with_gamma(&["C", "A"]);
    assert_eq!(compare_outcomes(&x, &y, &pref), Ok(0));
}

#[test]
fn compare_certainty_beats_risk_of_worse() {
    // Preference A > B > C: a certain A beats a chance of ending up with B.
    let pref = names(&["A", "B", "C"]);
    let certain = outcome_with_gamma(&["A"]);
    let risky = outcome_with_gamma(&["A", "B"]);
    assert_eq!(compare_outcomes(&certain, &risky, &pref), Ok(1));
    assert_eq!(compare_outcomes(&risky, &certain, &pref), Ok(-1));
}

#[test]
fn compare_risk_of_better_beats_certainty_of_worse() {
    // Preference B > A > C: the same sets now favor the risky outcome.
    let pref = names(&["B", "A", "C"]);
    let certain = outcome_with_gamma(&["A"]);
    let risky = outcome_with_gamma(&["A", "B"]);
    assert_eq!(compare_outcomes(&certain, &risky, &pref), Ok(-1));
    assert_eq!(compare_outcomes(&risky, &certain, &pref), Ok(1));
}

#[test]
fn compare_best_case_then_worst_case() {
    let pref = names(&["A", "B", "C", "D"]);
    // Better best case wins.
    let x = outcome_with_gamma(&["A", "D"]);
    let y = outcome_with_gamma(&["B", "C"]);
    assert_eq!(compare_outcomes(&x, &y, &pref), Ok(1));
    // Best cases tie, the better worst case wins.
    let x = outcome_with_gamma(&["A", "C"]);
    let y = outcome_with_gamma(&["A", "B"]);
    assert_eq!(compare_outcomes(&x, &y, &pref), Ok(-1));
    // Same span, different middles: indifferent.
    let x = outcome_with_gamma(&["A", "B", "D"]);
    let y = outcome_with_gamma(&["A", "C", "D"]);
    assert_eq!(compare_outcomes(&x, &y, &pref), Ok(0));
}

#[test]
fn compare_is_antisymmetric() {
    let pref = names(&["A", "B", "C"]);
    let gammas: Vec<Outcome> = vec![
        outcome_with_gamma(&["A"]),
        outcome_with_gamma(&["B"]),
        outcome_with_gamma(&["A", "B"]),
        outcome_with_gamma(&["B", "C"]),
        outcome_with_gamma(&["A", "B", "C"]),
    ];
    for x in gammas.iter() {
        for y in gammas.iter() {
            let forward = compare_outcomes(x, y, &pref).unwrap();
            let backward = compare_outcomes(y, x, &pref).unwrap();
            assert_eq!(forward, -backward, "gammas {:?} / {:?}", x.gamma, y.gamma);
        }
    }
}

#[test]
fn compare_rejects_unknown_candidates() {
    let pref = names(&["A", "B"]);
    let x = outcome_with_gamma(&["A"]);
    let y = outcome_with_gamma(&["Z"]);
    assert_eq!(
        compare_outcomes(&x, &y, &pref),
        Err(StrategyError::UnknownCandidate("Z".to_string()))
    );
}

#[test]
fn sincere_ballots_are_preference_prefixes() {
    let pref = names(&["A", "B", "C"]);
    assert_eq!(
        is_sincere_ballot(&Ballot::new(names(&["A", "B"])), &pref, true),
        Ok(true)
    );
    assert_eq!(
        is_sincere_ballot(&Ballot::new(names(&["A"])), &pref, true),
        Ok(true)
    );
    // Gap at B: approving C while skipping B is insincere.
    assert_eq!(
        is_sincere_ballot(&Ballot::new(names(&["A", "C"])), &pref, true),
        Ok(false)
    );
    assert_eq!(
        is_sincere_ballot(&Ballot::new(names(&["B"])), &pref, true),
        Ok(false)
    );
}

#[test]
fn abstention_sincerity_follows_the_flag() {
    let pref = names(&["A", "B"]);
    assert_eq!(is_sincere_ballot(&Ballot::abstention(), &pref, true), Ok(true));
    assert_eq!(
        is_sincere_ballot(&Ballot::abstention(), &pref, false),
        Ok(false)
    );
}

#[test]
fn sincerity_rejects_unknown_candidates() {
    let pref = names(&["A", "B"]);
    assert_eq!(
        is_sincere_ballot(&Ballot::new(names(&["Z"])), &pref, true),
        Err(StrategyError::UnknownCandidate("Z".to_string()))
    );
}

#[test]
fn matchups_reject_conflicting_directions() {
    let mut matchups = Matchups::new();
    matchups.declare("A", "B").unwrap();
    assert_eq!(
        matchups.declare("B", "A"),
        Err(StrategyError::ConflictingMatchup(
            "B".to_string(),
            "A".to_string()
        ))
    );
    assert_eq!(
        matchups.declare("A", "A"),
        Err(StrategyError::ConflictingMatchup(
            "A".to_string(),
            "A".to_string()
        ))
    );
    assert_eq!(matchups.winner_of("B", "A"), Some("A"));
    assert_eq!(matchups.winner_of("B", "C"), None);
}

#[test]
fn analysis_flags_a_manipulable_scenario() {
    let _ = env_logger::builder().is_test(true).try_init();

    // A leads, B and C trail. Only A-vs-B is defined, so every sincere ballot
    // leaves the voter with {A, C}. Boosting B drags the runoff to (A, B),
    // which A wins for certain.
    let scenario = Scenario {
        candidates: names(&["A", "B", "C"]),
        base_votes: counts(&[("A", 5), ("B", 4), ("C", 4)]),
        matchups: {
            let mut m = Matchups::new();
            m.declare("A", "B").unwrap();
            m
        },
        preference: names(&["A", "C", "B"]),
    };
    let config = AnalysisConfig {
        mode: RuleMode::Runoff,
        abstention_is_sincere: true,
    };
    let report = run_strategy_analysis(&scenario, &config).unwrap();

    assert_eq!(report.ballots.len(), 7);
    assert!(report.manipulable);
    assert_eq!(
        report.dominant_insincere,
        vec![
            Ballot::new(names(&["B"])),
            Ballot::new(names(&["A", "B"]))
        ]
    );
    for entry in report.ballots.iter() {
        if entry.sincere {
            assert_eq!(entry.outcome.gamma, names(&["A", "C"]));
        }
    }
}

#[test]
fn analysis_reports_a_stable_scenario() {
    // Whatever the focal voter does, B wins the runoff.
    let scenario = Scenario {
        candidates: names(&["A", "B", "C"]),
        base_votes: counts(&[("A", 5), ("B", 5), ("C", 2)]),
        matchups: {
            let mut m = Matchups::new();
            m.declare("B", "A").unwrap();
            m
        },
        preference: names(&["A", "B", "C"]),
    };
    let report = run_strategy_analysis(&scenario, &AnalysisConfig::DEFAULT_CONFIG).unwrap();
    assert!(!report.manipulable);
    assert!(report.dominant_insincere.is_empty());
    for entry in report.ballots.iter() {
        assert_eq!(entry.outcome.gamma, names(&["B"]));
    }
}

#[test]
fn analysis_rejects_malformed_scenarios() {
    let base = Scenario {
        candidates: names(&["A", "B"]),
        base_votes: HashMap::new(),
        matchups: Matchups::new(),
        preference: names(&["A", "B"]),
    };
    let config = AnalysisConfig::DEFAULT_CONFIG;

    let mut empty = base.clone();
    empty.candidates = vec![];
    empty.preference = vec![];
    assert_eq!(
        run_strategy_analysis(&empty, &config),
        Err(StrategyError::EmptyElection)
    );

    let mut duplicated = base.clone();
    duplicated.candidates = names(&["A", "A"]);
    assert_eq!(
        run_strategy_analysis(&duplicated, &config),
        Err(StrategyError::DuplicateCandidate("A".to_string()))
    );

    let mut partial = base.clone();
    partial.preference = names(&["A"]);
    assert_eq!(
        run_strategy_analysis(&partial, &config),
        Err(StrategyError::InvalidPreference)
    );

    let mut repeated = base.clone();
    repeated.preference = names(&["A", "A"]);
    assert_eq!(
        run_strategy_analysis(&repeated, &config),
        Err(StrategyError::InvalidPreference)
    );

    let mut stray_votes = base.clone();
    stray_votes.base_votes = counts(&[("Z", 1)]);
    assert_eq!(
        run_strategy_analysis(&stray_votes, &config),
        Err(StrategyError::UnknownCandidate("Z".to_string()))
    );

    let mut stray_matchup = base;
    stray_matchup.matchups.declare("A", "Z").unwrap();
    assert_eq!(
        run_strategy_analysis(&stray_matchup, &config),
        Err(StrategyError::UnknownCandidate("Z".to_string()))
    );
}
