//! Core library entry for the `recap` CLI.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod context;
pub mod describe;
pub mod error;
pub mod locator;
pub mod output;
pub mod ports;
pub mod recording;

#[cfg(test)]
pub(crate) mod test_support;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or the pipeline
/// reports a terminal error.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_flag() {
        let result = run(["recap", "--unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_help_succeeds() {
        let result = run(["recap", "--help"]);
        assert!(result.is_ok());
    }

    #[test]
    fn run_errors_on_missing_config_file() {
        let result = run(["recap", "--config", "/nonexistent/recap.yaml", "--quiet"]);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("configuration error"));
    }
}
