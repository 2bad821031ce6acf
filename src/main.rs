use clap::Parser;
use log::error;
use noun_cooccurrence::{Config, Pipeline, Stage};
use std::path::PathBuf;
use std::process;


#[derive(Parser, Debug)]
#[command(version, about = "Noun co-occurrence network and PPMI weighting for a Chinese corpus", long_about = None)]
struct Args {
    /// Path to the json configuration file
    config: PathBuf,

    /// Which part of the pipeline to run
    #[arg(long, value_enum, default_value_t = Stage::All)]
    stage: Stage,

    /// Overrides window_size from the configuration
    #[arg(long)]
    window_size: Option<usize>,

    /// Overrides min_count from the configuration
    #[arg(long)]
    min_count: Option<usize>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let params = match Config::from_file(&args.config).and_then(|c| c.with_overrides(args.window_size, args.min_count)) {
        Ok(config) => config.get_params(),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Pipeline::run(&params, args.stage) {
        error!("{}", e);
        process::exit(1);
    }
}
