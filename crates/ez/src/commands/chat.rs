//! Interactive chat over a streaming completion.
//!
//! The loop alternates between awaiting input and awaiting a completion.
//! Empty input, EOF, Ctrl-C at the prompt, or the literal `exit` keyword all
//! end the session. While a completion streams, no input is accepted.

use std::io::Write;

use anyhow::Result;
use ez_core::client::CompletionClient;
use ez_core::completion::ChatMessage;
use ez_core::config::ValidConfig;
use ez_core::locale;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::ux::{GenerationSpinner, MessageType, style_text};

/// In-memory transcript for one chat session. Append-only, never persisted.
#[derive(Debug, Default)]
pub struct ChatSession {
    transcript: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn push_user(&mut self, text: &str) {
        self.transcript.push(ChatMessage::user(text));
    }

    /// Streams a completion for the current transcript, invoking
    /// `on_fragment` for each fragment as it arrives, and appends the
    /// accumulated text as the assistant reply once the stream ends.
    pub async fn stream_reply(
        &mut self,
        client: &CompletionClient,
        model: &str,
        mut on_fragment: impl FnMut(&str),
    ) -> Result<()> {
        use futures::StreamExt;

        let mut content = String::new();
        let mut stream = client.complete_stream(model, &self.transcript);
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            on_fragment(&fragment);
            content.push_str(&fragment);
        }
        debug!(chars = content.len(), "assistant reply complete");
        self.transcript.push(ChatMessage::assistant(content));
        Ok(())
    }
}

/// Whether a line of input ends the session.
fn is_exit(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line == "exit"
}

pub async fn execute(config: &ValidConfig) -> Result<()> {
    let client = CompletionClient::new(&config.openai_key, &config.openai_api_endpoint);
    let mut session = ChatSession::new();

    println!("{}", locale::t("Starting new conversation"));
    println!(
        "{}",
        style_text(
            &locale::t("send a message ('exit' to quit)"),
            MessageType::Footer
        )
    );

    let mut rl = rustyline::DefaultEditor::new()?;
    let prompt = format!(
        "\n{} ",
        style_text(&format!("{}:", locale::t("You")), MessageType::Prompt)
    );

    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        if is_exit(&line) {
            break;
        }
        rl.add_history_entry(&line)?;
        session.push_user(line.trim());

        let spinner = GenerationSpinner::new(locale::t("Thinking..."));
        let mut first_fragment = true;
        let streamed = session
            .stream_reply(&client, &config.model, |fragment| {
                if first_fragment {
                    spinner.clear();
                    println!("{}", style_text("AI:", MessageType::Reply));
                    first_fragment = false;
                }
                print!("{fragment}");
                let _ = std::io::stdout().flush();
            })
            .await;
        // Clear before propagating so a failed stream leaves no spinner line.
        spinner.clear();
        streamed?;
        println!();
    }

    println!("{}", locale::t("Goodbye!"));
    Ok(())
}
