//! Event-to-sentence generation through the language model port.
//!
//! Each event is summarized independently; the only coupling between
//! events is their position, which the output writer turns into line
//! numbers. A first terminal failure aborts the whole run, since a
//! partial description set is not valid output.

pub mod validate;

use futures::future::join_all;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::PipelineError;
use crate::ports::llm::CompletionRequest;
use crate::recording::ActionEvent;

/// Token budget for a single one-sentence description.
const DESCRIPTION_MAX_TOKENS: u32 = 256;

/// Generates one sentence for one event.
///
/// The response is collapsed to a single line so a chatty model cannot
/// break the one-sentence-per-line file invariant.
///
/// # Errors
///
/// Returns [`PipelineError::Generation`] when the call fails, times out,
/// or produces an empty result.
pub async fn describe(
    ctx: &ServiceContext,
    cfg: &Config,
    event: &ActionEvent,
) -> Result<String, PipelineError> {
    let request = CompletionRequest {
        model: cfg.model.clone(),
        prompt: build_prompt(event),
        max_tokens: DESCRIPTION_MAX_TOKENS,
    };

    let response = tokio::time::timeout(cfg.generation_timeout(), ctx.llm.complete(&request))
        .await
        .map_err(|_| {
            PipelineError::Generation(format!(
                "{} description timed out after {}s",
                event.kind_name(),
                cfg.request_timeout
            ))
        })?
        .map_err(|e| {
            PipelineError::Generation(format!("{} description failed: {e}", event.kind_name()))
        })?;

    let sentence = flatten(&response.text);
    if sentence.is_empty() {
        return Err(PipelineError::Generation(format!(
            "model returned an empty description for a {} event",
            event.kind_name()
        )));
    }
    log::debug!("described {} event: {sentence}", event.kind_name());
    Ok(sentence)
}

/// Generates sentences for all events, preserving event order.
///
/// Calls are issued in chunks of `max_in_flight`; within a chunk they run
/// concurrently and results are reassembled in input order before the
/// caller numbers them.
///
/// # Errors
///
/// Returns the first [`PipelineError::Generation`] encountered.
pub async fn describe_all(
    ctx: &ServiceContext,
    cfg: &Config,
    events: &[ActionEvent],
) -> Result<Vec<String>, PipelineError> {
    log::info!("generating descriptions for {} events", events.len());
    let mut lines = Vec::with_capacity(events.len());
    for batch in events.chunks(cfg.max_in_flight.max(1)) {
        let results = join_all(batch.iter().map(|event| describe(ctx, cfg, event))).await;
        for result in results {
            lines.push(result?);
        }
    }
    Ok(lines)
}

/// Builds the instruction sent to the model for one event.
fn build_prompt(event: &ActionEvent) -> String {
    let mut prompt = String::from(
        "Describe the following recorded UI action as one short declarative \
         sentence, in the style \"Move mouse to 'Calculator icon'\" or \
         \"Left singleclick 'Calculator icon'\". Respond with the sentence \
         only.\n\n",
    );
    prompt.push_str(&encode_event(event));
    prompt
}

/// Textual encoding of an event's structured data for the prompt.
fn encode_event(event: &ActionEvent) -> String {
    match event {
        ActionEvent::MouseMove { x, y, target } => {
            let mut enc = format!("action: move mouse\nposition: ({x}, {y})");
            if let Some(target) = target {
                enc.push_str(&format!("\ntarget: {target}"));
            }
            enc
        }
        ActionEvent::Click { button, double, x, y, target } => {
            let count = if *double { "doubleclick" } else { "singleclick" };
            let mut enc =
                format!("action: {} {count}\nposition: ({x}, {y})", button.name());
            if let Some(target) = target {
                enc.push_str(&format!("\ntarget: {target}"));
            }
            enc
        }
        ActionEvent::KeyPress { key } => format!("action: press key\nkey: {key}"),
        ActionEvent::TypeText { text } => format!("action: type text\ntext: {text}"),
        ActionEvent::Scroll { dx, dy } => format!("action: scroll\namount: ({dx}, {dy})"),
    }
}

/// Collapses all whitespace runs, including newlines, to single spaces.
fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
