//! The description generation pipeline: locate, describe, write.

use std::io;

use crate::cli::Cli;
use crate::config::Config;
use crate::console::Prompter;
use crate::context::ServiceContext;
use crate::describe;
use crate::error::PipelineError;
use crate::locator;
use crate::output;

/// Runs one full pipeline pass.
///
/// Locates the recording (specific id or latest), generates one sentence
/// per event, optionally validates the finished set, and persists the
/// numbered lines. An operator declining the large-recording gate is a
/// clean cancel, not an error.
///
/// # Errors
///
/// Returns the first terminal [`PipelineError`] from any stage; no file
/// exists on disk when an error is returned.
pub async fn run(ctx: &ServiceContext, cfg: &Config, cli: &Cli) -> Result<(), PipelineError> {
    log::info!("starting description generation");

    let recording =
        locator::locate(ctx.store.as_ref(), cli.recording_id, cfg.store_timeout()).await?;
    log::info!(
        "found recording {}: {} ({} events)",
        recording.id,
        recording.task_description,
        recording.events.len()
    );

    if recording.events.is_empty() {
        log::warn!("recording {} has no events to describe", recording.id);
        return Ok(());
    }

    if recording.events.len() > cfg.max_events && !confirm_large_run(cfg, cli, &recording)? {
        log::info!("generation cancelled by operator");
        return Ok(());
    }

    let lines = describe::describe_all(ctx, cfg, &recording.events).await?;

    if cli.validate {
        describe::validate::validate_descriptions(ctx, cfg, &lines).await?;
        log::info!("description set passed validation");
    }

    let path = if cli.quiet {
        // Quiet runs answer the overwrite prompt with its "no" default.
        let mut prompter = Prompter::new(io::empty(), io::sink());
        output::write_descriptions(
            ctx,
            &mut prompter,
            &lines,
            recording.id,
            &recording.task_description,
            cfg,
            cli.force,
        )?
    } else {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        output::write_descriptions(
            ctx,
            &mut prompter,
            &lines,
            recording.id,
            &recording.task_description,
            cfg,
            cli.force,
        )?
    };

    log::info!("saved {} descriptions to {}", lines.len(), path.display());
    Ok(())
}

/// Gate for recordings above `max_events`: one model call per event, so
/// ask before spending. Quiet runs cannot ask and abort instead.
fn confirm_large_run(
    cfg: &Config,
    cli: &Cli,
    recording: &crate::recording::Recording,
) -> Result<bool, PipelineError> {
    if cli.quiet {
        return Err(PipelineError::Config(format!(
            "recording {} has {} events, over the configured max_events of {}; \
             raise max_events or run without --quiet",
            recording.id,
            recording.events.len(),
            cfg.max_events
        )));
    }
    let question = format!(
        "About to generate descriptions for {} events, one model call each. Proceed?",
        recording.events.len()
    );
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    prompter.confirm(&question)
}
