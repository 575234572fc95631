//! Command wiring for the CLI.

pub mod generate;

use crate::cli::Cli;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::PipelineError;

/// Executes the CLI request end to end.
///
/// Loads configuration, initializes logging, builds the live service
/// context, and runs the generation pipeline on a current-thread runtime.
///
/// # Errors
///
/// Returns the first terminal [`PipelineError`] from configuration loading
/// or the pipeline itself.
pub fn dispatch(cli: &Cli) -> Result<(), PipelineError> {
    // .env may carry ANTHROPIC_API_KEY; absence is fine.
    let _ = dotenvy::dotenv();

    let cfg = Config::load(cli.config.as_deref())?;
    init_logging(&cfg, cli.quiet);

    let ctx = ServiceContext::live(&cfg);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| PipelineError::Io(format!("failed to start async runtime: {e}")))?;
    match runtime.block_on(generate::run(&ctx, &cfg, cli)) {
        Ok(()) => Ok(()),
        Err(err) => {
            log::error!("{err}");
            Err(err)
        }
    }
}

/// Initializes the console logger from configuration.
///
/// Quiet mode caps output at warnings. Repeated initialization (as in
/// tests) is ignored.
fn init_logging(cfg: &Config, quiet: bool) {
    let level = if quiet { cfg.log_filter().min(log::LevelFilter::Warn) } else { cfg.log_filter() };
    let _ = env_logger::Builder::new().filter_level(level).format_timestamp_secs().try_init();
}
