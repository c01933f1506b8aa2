use log::{info, warn};

use approval_voting::*;
use snafu::{prelude::*, ErrorCompat, Snafu};

use std::collections::HashMap;
use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::analysis::scenario_reader::*;

#[derive(Debug, Snafu)]
pub enum AnalysisError {
    #[snafu(display("Error opening file"))]
    OpeningJson { source: std::io::Error },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing summary file {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type AnalysisResult<T> = Result<T, AnalysisError>;

pub mod scenario_reader {
    use crate::analysis::*;

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct ScenarioRules {
        pub mode: String,
        #[serde(rename = "abstentionIsSincere")]
        pub abstention_is_sincere: Option<bool>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct ScenarioMatchup {
        pub winner: String,
        pub loser: String,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct ScenarioConfig {
        #[serde(rename = "contestName")]
        pub contest_name: Option<String>,
        pub candidates: Vec<String>,
        #[serde(rename = "baseVotes")]
        pub base_votes: HashMap<String, u64>,
        pub matchups: Vec<ScenarioMatchup>,
        pub preference: Vec<String>,
        pub rules: ScenarioRules,
    }

    /// The configuration echoed at the top of the output summary.
    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct OutputConfig {
        pub contest: Option<String>,
        pub mode: String,
        #[serde(rename = "abstentionIsSincere")]
        pub abstention_is_sincere: bool,
    }

    pub fn read_scenario(path: String) -> AnalysisResult<ScenarioConfig> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
        let config: ScenarioConfig =
            serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        Ok(config)
    }

    pub fn read_summary(path: String) -> AnalysisResult<JSValue> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
        let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        Ok(js)
    }
}

fn validate_rules(rules: &ScenarioRules) -> AnalysisResult<AnalysisConfig> {
    let mode = match rules.mode.as_str() {
        "approval" => RuleMode::Approval,
        "runoff" => RuleMode::Runoff,
        x => {
            whatever!("Cannot use rule mode {:?} (expected approval or runoff)", x)
        }
    };
    Ok(AnalysisConfig {
        mode,
        abstention_is_sincere: rules.abstention_is_sincere.unwrap_or(true),
    })
}

fn build_scenario(config: &ScenarioConfig) -> AnalysisResult<Scenario> {
    let mut matchups = Matchups::new();
    for m in config.matchups.iter() {
        if let Err(e) = matchups.declare(&m.winner, &m.loser) {
            whatever!("Invalid matchup table: {}", e)
        }
    }
    Ok(Scenario {
        candidates: config.candidates.clone(),
        base_votes: config.base_votes.clone(),
        matchups,
        preference: config.preference.clone(),
    })
}

/// Renders a ballot as `∅ (abstain)` or `{A, B}`.
pub fn format_ballot(ballot: &Ballot) -> String {
    if ballot.is_abstention() {
        "∅ (abstain)".to_string()
    } else {
        format!("{{{}}}", ballot.approved.join(", "))
    }
}

/// Renders a possible-winner set: the bare candidate when it is a singleton,
/// `undefined` when it is empty, `{A, B}` otherwise.
pub fn format_gamma(gamma: &[String]) -> String {
    match gamma {
        [] => "undefined".to_string(),
        [single] => single.clone(),
        _ => format!("{{{}}}", gamma.join(", ")),
    }
}

fn report_to_json(report: &StrategyReport) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for entry in report.ballots.iter() {
        l.push(json!({
            "ballot": format_ballot(&entry.ballot),
            "gamma": format_gamma(&entry.outcome.gamma),
            "sincere": entry.sincere,
        }));
    }
    l
}

fn build_summary_js(
    config: &ScenarioConfig,
    analysis_config: &AnalysisConfig,
    report: &StrategyReport,
) -> JSValue {
    let c = OutputConfig {
        contest: config.contest_name.clone(),
        mode: match analysis_config.mode {
            RuleMode::Approval => "approval".to_string(),
            RuleMode::Runoff => "runoff".to_string(),
        },
        abstention_is_sincere: analysis_config.abstention_is_sincere,
    };
    let dominant: Vec<String> = report
        .dominant_insincere
        .iter()
        .map(format_ballot)
        .collect();
    json!({
        "config": c,
        "ballots": report_to_json(report),
        "dominantInsincere": dominant,
        "manipulable": report.manipulable,
    })
}

pub fn run_analysis(
    scenario_path: String,
    check_summary_path: Option<String>,
    out_path: Option<String>,
) -> AnalysisResult<()> {
    let config = read_scenario(scenario_path)?;
    info!("scenario: {:?}", config);

    let analysis_config = validate_rules(&config.rules)?;
    let scenario = build_scenario(&config)?;

    let report = match run_strategy_analysis(&scenario, &analysis_config) {
        Result::Ok(x) => x,
        Result::Err(x) => {
            whatever!("Analysis error: {}", x)
        }
    };
    info!(
        "analysis done: {} ballots, manipulable: {}",
        report.ballots.len(),
        report.manipulable
    );

    // Assemble the final json
    let result_js = build_summary_js(&config, &analysis_config, &report);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    println!("summary:{}", pretty_js_stats);

    if let Some(p) = out_path {
        fs::write(p.clone(), pretty_js_stats.as_bytes())
            .context(WritingSummarySnafu { path: p })?;
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        info!("reference summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

fn scenario_dir() -> String {
    option_env!("AVSTRAT_SCENARIO_DIR")
        .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios"))
        .to_string()
}

pub fn test_wrapper(test_name: &str) {
    let dir = scenario_dir();
    info!("Running scenario test {}", test_name);
    let res = run_analysis(
        format!("{}/{}_scenario.json", dir, test_name),
        Some(format!("{}/{}_expected_summary.json", dir, test_name)),
        None,
    );
    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        panic!("scenario test {} failed: {}", test_name, e);
    }
}
