//! The `commit` command: generate a commit message for the staged diff.

use anyhow::{Result, bail};
use dialoguer::{Confirm, theme::ColorfulTheme};
use ez_core::client::CompletionClient;
use ez_core::completion::ChatMessage;
use ez_core::config::ValidConfig;
use ez_core::locale;
use tokio::process::Command;
use tracing::debug;

use crate::ux::{GenerationSpinner, KnownError, prompt_opt};

// Large diffs are truncated before being sent; the model does not need the
// full text of a generated lockfile to describe the change.
const MAX_DIFF_CHARS: usize = 8000;

pub async fn execute(config: &ValidConfig, context: Option<&str>, yes: bool) -> Result<()> {
    let diff = staged_diff().await?;
    if diff.trim().is_empty() {
        return Err(KnownError::new(locale::t("No staged changes to commit")).into());
    }

    let client = CompletionClient::new(&config.openai_key, &config.openai_api_endpoint);
    let prompt = build_prompt(&diff, context);

    let spinner = GenerationSpinner::new(locale::t("Thinking..."));
    let message = client
        .complete(&config.model, &[ChatMessage::user(prompt)])
        .await;
    spinner.clear();
    let message = message?.trim().to_string();

    println!("{message}\n");

    let confirmed = yes
        || prompt_opt(
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(locale::t("Commit with this message?"))
                .default(true)
                .interact_opt(),
        )?
        .unwrap_or(false);

    if !confirmed {
        println!("{}", locale::t("Commit aborted"));
        return Ok(());
    }

    git_commit(&message).await
}

async fn staged_diff() -> Result<String> {
    let output = Command::new("git")
        .args(["diff", "--cached"])
        .output()
        .await?;
    if !output.status.success() {
        bail!(
            "git diff failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

async fn git_commit(message: &str) -> Result<()> {
    let status = Command::new("git")
        .args(["commit", "-m", message])
        .status()
        .await?;
    if !status.success() {
        bail!("git commit exited with {status}");
    }
    Ok(())
}

fn build_prompt(diff: &str, context: Option<&str>) -> String {
    let diff = if diff.len() > MAX_DIFF_CHARS {
        let mut end = MAX_DIFF_CHARS;
        while !diff.is_char_boundary(end) {
            end -= 1;
        }
        debug!(total = diff.len(), sent = end, "diff truncated");
        &diff[..end]
    } else {
        diff
    };

    let mut prompt = String::from(
        "Write a git commit message for the following staged diff. \
         Use the conventional commit format: a short imperative subject line, \
         optionally followed by a blank line and a brief body. \
         Reply with the commit message only.\n",
    );
    if let Some(context) = context {
        prompt.push_str(&format!("\nAdditional context: {context}\n"));
    }
    prompt.push_str(&format!("\n```diff\n{diff}\n```\n"));
    prompt
}
