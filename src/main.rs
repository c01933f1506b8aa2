use clap::Parser;
use log::debug;

mod analysis;
mod args;

use crate::args::Args;

fn main() {
    let args = Args::parse();
    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    debug!("args: {:?}", args);

    if let Err(e) = analysis::run_analysis(args.scenario, args.reference, args.out) {
        eprintln!("An error occured {}", e);
        std::process::exit(1);
    }
}
