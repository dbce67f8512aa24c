//! Terminal presentation helpers: styling, spinner, error reporting.

use console::{Style, StyledObject, style};
use ez_core::{config::ConfigError, locale};
use indicatif::{ProgressBar, ProgressStyle};

const BUG_REPORT_URL: &str = "https://github.com/qihangnet/ez-cli/issues/new";

/// Represents the type of a message, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// The prompt for user input.
    Prompt,
    /// The assistant reply marker.
    Reply,
    /// Secondary information.
    Footer,
    /// An error message.
    Error,
}

/// Styles a string of text according to the specified `MessageType`.
pub fn style_text(text: &str, style: MessageType) -> StyledObject<&str> {
    let style_obj = match style {
        MessageType::Prompt => Style::new().cyan().bold(),
        MessageType::Reply => Style::new().green().bold(),
        MessageType::Footer => Style::new().white().dim(),
        MessageType::Error => Style::new().red().bold(),
    };
    style_obj.apply_to(text)
}

/// A validation failure with a user-facing message and no diagnostic value.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct KnownError(pub String);

impl KnownError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

fn is_known(error: &anyhow::Error) -> bool {
    error.downcast_ref::<ConfigError>().is_some() || error.downcast_ref::<KnownError>().is_some()
}

/// Normalizes a cancellable prompt result: Ctrl-C during the prompt behaves
/// like Esc and yields `None` instead of an interrupted-IO error.
pub fn prompt_opt<T>(result: Result<Option<T>, dialoguer::Error>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(choice) => Ok(choice),
        Err(dialoguer::Error::IO(err)) if err.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Like [`prompt_opt`] for text prompts, which have no Esc path of their own;
/// Ctrl-C is the only way to cancel them.
pub fn prompt_text(result: Result<String, dialoguer::Error>) -> anyhow::Result<Option<String>> {
    prompt_opt(result.map(Some))
}

/// Prints an error to stderr. Known errors (config validation, invalid CLI
/// use) get the bare message; anything else gets the full chain and a bug
/// report pointer.
pub fn present_error(error: &anyhow::Error) {
    let marker = style("✖").red().bold();
    if is_known(error) {
        eprintln!("\n{marker} {error}");
        return;
    }

    // {:?} on anyhow prints the cause chain and, with the backtrace feature,
    // the captured backtrace.
    eprintln!("\n{marker} {error:?}");
    eprintln!(
        "\n  {}",
        style(format!("ez v{}", env!("CARGO_PKG_VERSION"))).dim()
    );
    eprintln!(
        "\n  {}:",
        locale::t("Please open a bug report with the information above")
    );
    eprintln!("  {BUG_REPORT_URL}");
}

/// A spinner to indicate that a response is being generated.
#[derive(Debug)]
pub struct GenerationSpinner {
    spinner: ProgressBar,
}

impl GenerationSpinner {
    /// Creates a new `GenerationSpinner` with a message.
    pub fn new(msg: String) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.set_message(msg);
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));

        Self { spinner }
    }

    /// Stops the spinner and clears it from the terminal.
    pub fn clear(&self) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_message_styles() {
        let styled = style_text("test", MessageType::Error);
        assert_eq!(
            styled.force_styling(true).to_string(),
            "\u{1b}[31m\u{1b}[1mtest\u{1b}[0m"
        );
    }

    #[test]
    fn test_known_error_classification() {
        let known: anyhow::Error = ConfigError::MissingKey.into();
        assert!(is_known(&known));

        let known: anyhow::Error = KnownError::new("no staged changes").into();
        assert!(is_known(&known));

        let unexpected = anyhow!("connection reset by peer");
        assert!(!is_known(&unexpected));
    }

    #[test]
    fn test_known_error_survives_context() {
        let err: anyhow::Error = ConfigError::InvalidKey("FOO".to_string()).into();
        let err = err.context("while setting config");
        assert!(is_known(&err));
    }

    #[test]
    fn test_prompt_interrupt_is_cancel() {
        let interrupted: Result<Option<bool>, dialoguer::Error> =
            Err(std::io::Error::from(std::io::ErrorKind::Interrupted).into());
        assert!(prompt_opt(interrupted).unwrap().is_none());

        let interrupted: Result<String, dialoguer::Error> =
            Err(std::io::Error::from(std::io::ErrorKind::Interrupted).into());
        assert!(prompt_text(interrupted).unwrap().is_none());
    }

    #[test]
    fn test_prompt_other_results_pass_through() {
        assert_eq!(prompt_opt(Ok(Some(3))).unwrap(), Some(3));
        assert_eq!(prompt_opt::<usize>(Ok(None)).unwrap(), None);
        assert_eq!(prompt_text(Ok("sk-abc".into())).unwrap().as_deref(), Some("sk-abc"));

        let broken: Result<Option<bool>, dialoguer::Error> =
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe).into());
        assert!(prompt_opt(broken).is_err());
    }

    #[test]
    fn test_generation_spinner_new() {
        let spinner = GenerationSpinner::new("Testing...".to_string());
        assert_eq!(spinner.spinner.message(), "Testing...");
        spinner.clear();
    }
}
