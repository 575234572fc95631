//! Output writer: naming, conflict resolution, and persistence.
//!
//! The writer is the only stateful stage of the pipeline. It decides the
//! final path (timestamp-versioning when the operator declines an
//! overwrite), enforces the size limit before touching the destination,
//! and writes through a temporary file so a failed run leaves nothing
//! behind.

use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::console::Prompter;
use crate::context::ServiceContext;
use crate::error::PipelineError;

/// Longest sanitized task label kept in a file name, in bytes.
const MAX_LABEL_LENGTH: usize = 255;

/// Writes the numbered description lines for a recording.
///
/// `lines` must be non-empty and in event order; each is written as
/// `"<n>. <sentence>"` with 1-based numbering. Returns the path the file
/// landed at.
///
/// # Errors
///
/// Returns [`PipelineError::FileTooLarge`] when the serialized content
/// exceeds the configured limit, [`PipelineError::WriteConflict`] when
/// both the candidate and its timestamped alternate exist, and
/// [`PipelineError::Io`] for filesystem failures.
pub fn write_descriptions<R: BufRead, W: Write>(
    ctx: &ServiceContext,
    prompter: &mut Prompter<R, W>,
    lines: &[String],
    recording_id: i64,
    task_label: &str,
    cfg: &Config,
    force: bool,
) -> Result<PathBuf, PipelineError> {
    debug_assert!(!lines.is_empty(), "writer requires a non-empty line set");

    let content = render(lines);
    if content.len() > cfg.max_file_size {
        return Err(PipelineError::FileTooLarge(format!(
            "serialized output is {} bytes, over the {}-byte limit",
            content.len(),
            cfg.max_file_size
        )));
    }

    let label = sanitize_label(task_label);
    let stem = format!("prompt_recording_{recording_id}_{label}");
    let candidate = cfg.output_dir.join(format!("{stem}.txt"));

    let path = if !ctx.fs.exists(&candidate) || force {
        candidate
    } else {
        let question = format!("File {} already exists. Overwrite it?", candidate.display());
        if prompter.confirm(&question)? {
            candidate
        } else {
            let stamp =
                ctx.clock.now().with_timezone(&chrono::Local).format("%Y%m%d_%H%M%S");
            let alternate = cfg.output_dir.join(format!("{stem}_{stamp}.txt"));
            if ctx.fs.exists(&alternate) {
                return Err(PipelineError::WriteConflict(format!(
                    "both {} and {} already exist",
                    candidate.display(),
                    alternate.display()
                )));
            }
            log::info!("saving to new file: {}", alternate.display());
            alternate
        }
    };

    // Temp-then-rename: the destination only ever sees a complete file.
    let temp = path.with_extension("txt.tmp");
    ctx.fs
        .write(&temp, &content)
        .map_err(|e| PipelineError::Io(format!("failed to write {}: {e}", temp.display())))?;
    ctx.fs
        .rename(&temp, &path)
        .map_err(|e| PipelineError::Io(format!("failed to move output into {}: {e}", path.display())))?;

    Ok(path)
}

/// Serializes lines as numbered text, one per line, trailing newline.
fn render(lines: &[String]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let _ = writeln!(out, "{}. {line}", i + 1);
    }
    out
}

/// Replaces filesystem-hostile characters and whitespace with underscores
/// and bounds the length. An empty label becomes `unnamed`.
fn sanitize_label(name: &str) -> String {
    if name.is_empty() {
        return "unnamed".into();
    }
    let mut out: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    if out.len() > MAX_LABEL_LENGTH {
        let mut end = MAX_LABEL_LENGTH;
        while !out.is_char_boundary(end) {
            end -= 1;
        }
        out.truncate(end);
    }
    out
}
