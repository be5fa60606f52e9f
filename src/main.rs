use figma_qa::cli::commands::{CliArgs, Commands};
use figma_qa::cli::handlers::{
    handle_analyze, handle_compare, handle_config, handle_generate, handle_missing,
    handle_pipeline, handle_scenarios, handle_serve,
};
use figma_qa::util::logging::{init_logging, parse_level, LoggingConfig};
use figma_qa::{NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    // A missing .env is fine; the environment may already be set
    let dotenv = dotenvy::dotenv();

    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Generate(generate_args) => {
            handle_generate(generate_args, args.quiet, args.verbose).await
        }
        Commands::Analyze(analyze_args) => handle_analyze(analyze_args).await,
        Commands::Compare(compare_args) => handle_compare(compare_args).await,
        Commands::Pipeline(pipeline_args) => handle_pipeline(pipeline_args).await,
        Commands::Missing(missing_args) => handle_missing(missing_args, args.quiet).await,
        Commands::Scenarios(scenarios_args) => handle_scenarios(scenarios_args, args.quiet),
        Commands::Serve(serve_args) => handle_serve(serve_args).await,
        Commands::Config(config_args) => handle_config(config_args),
    };

    process::exit(exit_code);
}

/// `--log-level` wins, then `-v`/`-q`, then the environment
fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();
    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }
    init_logging(config);
}
