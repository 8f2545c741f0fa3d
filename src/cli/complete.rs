//! `palaver complete`: replay a prompt and stream the completion to stdout.

use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{ClientErrorKind, Prompt};
use crate::cli::CliContext;
use crate::core::playground::{has_template, Playground};

/// Parse an `INDEX=TEXT` message edit.
pub fn parse_edit(raw: &str) -> Result<(usize, String), String> {
    let (index, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=TEXT, got '{raw}'"))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("'{}' is not a message index", index.trim()))?;
    Ok((index, text.to_string()))
}

pub(crate) fn read_prompt(path: &Path) -> Result<Prompt, Box<dyn Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read prompt {}: {err}", path.display()))?;
    let prompt = serde_json::from_str(&contents)
        .map_err(|err| format!("Failed to parse prompt {}: {err}", path.display()))?;
    Ok(prompt)
}

/// Load `prompt` into a playground and apply the requested edits.
pub(crate) fn prepare_playground(
    prompt: Prompt,
    edits: &[(usize, String)],
    add_message: bool,
) -> Result<Playground, Box<dyn Error>> {
    let templated = has_template(&prompt);
    let mut playground = Playground::new();
    playground.load(prompt);

    if add_message {
        playground.add_message();
    }
    for (index, text) in edits {
        if !playground.update_message(*index, text, templated) {
            return Err(format!("Prompt has no message at index {index}").into());
        }
    }
    Ok(playground)
}

pub async fn run_complete(
    ctx: &CliContext,
    prompt_path: &Path,
    edits: &[(usize, String)],
    add_message: bool,
) -> Result<(), Box<dyn Error>> {
    let prompt = read_prompt(prompt_path)?;
    let playground = prepare_playground(prompt, edits, add_message)?;
    debug!(title = playground.title(), "replaying prompt");

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let mut updates = playground.state().subscribe();
    let printer = tokio::spawn(async move {
        let mut printed = 0usize;
        let mut stdout = io::stdout();
        while updates.changed().await.is_ok() {
            let fresh = {
                let state = updates.borrow_and_update();
                let completion = state
                    .prompt
                    .as_ref()
                    .and_then(|prompt| prompt.completion.as_deref())
                    .unwrap_or_default();
                if completion.len() < printed {
                    printed = 0;
                }
                let fresh = completion.get(printed..).unwrap_or_default().to_string();
                printed += fresh.len();
                fresh
            };
            if !fresh.is_empty() {
                let _ = stdout.write_all(fresh.as_bytes());
                let _ = stdout.flush();
            }
        }
        printed
    });

    let access_token = ctx.access_token();
    let result = playground
        .replay(
            &ctx.client,
            &ctx.config.user_env,
            access_token.as_deref(),
            &cancel,
        )
        .await;
    let cancelled = cancel.is_cancelled();
    interrupt.abort();
    drop(playground);

    let printed = printer.await.unwrap_or_else(|err| {
        warn!(error = %err, "completion printer stopped early");
        0
    });

    match result {
        Ok(completion) => {
            if let Some(rest) = completion.get(printed..) {
                print!("{rest}");
            }
            println!();
            if cancelled {
                eprintln!("⏹️  Completion cancelled");
            }
            Ok(())
        }
        Err(err) if err.kind() == ClientErrorKind::Cancelled => {
            eprintln!("⏹️  Completion cancelled before the backend answered");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
