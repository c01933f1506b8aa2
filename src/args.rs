use clap::Parser;

/// This is a strategic-voting analyzer for approval-with-runoff elections.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON scenario describing the candidates, the background
    /// approval counts, the pairwise matchups, the focal voter's preference
    /// order and the rules.
    #[clap(short, long, value_parser)]
    pub scenario: String,

    /// (file path) A reference summary in JSON format. If provided, avstrat will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path or empty) If specified, the summary of the analysis will be
    /// written in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
