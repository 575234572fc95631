//! Post-generation sanity check on the full description list.
//!
//! Optional gate behind `--validate`: the numbered list goes back to the
//! model, which must answer strictly `true` or `false` on whether the
//! lines read as replayable numbered steps. Anything but `true` keeps the
//! file from being written.

use std::fmt::Write as _;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::PipelineError;
use crate::ports::llm::CompletionRequest;

/// Token budget for the verdict; the answer is a single word.
const VERDICT_MAX_TOKENS: u32 = 16;

/// Checks the finished description set with the model.
///
/// # Errors
///
/// Returns [`PipelineError::Validation`] on a `false` or unparseable
/// verdict, and [`PipelineError::Generation`] when the call itself fails
/// or times out.
pub async fn validate_descriptions(
    ctx: &ServiceContext,
    cfg: &Config,
    lines: &[String],
) -> Result<(), PipelineError> {
    let request = CompletionRequest {
        model: cfg.model.clone(),
        prompt: build_prompt(lines),
        max_tokens: VERDICT_MAX_TOKENS,
    };

    let response = tokio::time::timeout(cfg.generation_timeout(), ctx.llm.complete(&request))
        .await
        .map_err(|_| {
            PipelineError::Generation(format!(
                "validation request timed out after {}s",
                cfg.request_timeout
            ))
        })?
        .map_err(|e| PipelineError::Generation(format!("validation request failed: {e}")))?;

    match response.text.trim() {
        "true" => Ok(()),
        "false" => Err(PipelineError::Validation(
            "model judged the description set not replayable".into(),
        )),
        other => {
            Err(PipelineError::Validation(format!("unexpected verdict from model: {other:?}")))
        }
    }
}

/// Builds the verdict prompt over the numbered list.
fn build_prompt(lines: &[String]) -> String {
    let mut prompt = String::from("Review the following numbered action descriptions:\n");
    for (i, line) in lines.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {line}", i + 1);
    }
    prompt.push_str(
        "\nDo these read as human-readable numbered steps that could be used \
         to replay the recorded actions? Reply strictly with 'true' or \
         'false' only.",
    );
    prompt
}
