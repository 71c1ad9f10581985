use clap::Parser;
use mood_mirror::cli::{self, Args, CliError, Command};
use mood_mirror::config::Config;
use mood_mirror::scheduler::StopHandle;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

/// Set up the Ctrl+C handler, stopping the loop through `stop`.
fn setup_ctrlc_handler(stop: StopHandle) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        eprintln!("\nReceived Ctrl+C, shutting down...");
        stop.stop();
    })
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Run(run_args) => {
            // If --config is given, a missing file still yields defaults
            let config = Config::load(args.config.as_deref())?;

            let stop = StopHandle::new();
            if let Err(e) = setup_ctrlc_handler(stop.clone()) {
                log::warn!("Could not set up Ctrl+C handler: {}", e);
            }

            let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
            runtime.block_on(cli::run_session(&run_args, config, Some(stop)))?;
            Ok(())
        }
        Command::Profiles => {
            cli::print_profiles();
            Ok(())
        }
        Command::Config { action } => cli::handle_config_action(action, args.config.as_deref()),
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
