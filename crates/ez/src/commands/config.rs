//! The `config` command: get, set, and the interactive editor.

use anyhow::Result;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use ez_core::client::CompletionClient;
use ez_core::config::{ConfigError, ConfigKey, ConfigStore, RawConfig};
use ez_core::locale;

use crate::commands::ConfigAction;
use crate::ux::{GenerationSpinner, prompt_opt, prompt_text};

pub async fn execute(action: &ConfigAction, store: &ConfigStore) -> Result<()> {
    match action {
        ConfigAction::Set { pairs } => {
            let pairs = parse_pairs(pairs)?;
            store.set(&pairs)?;
            Ok(())
        }
        ConfigAction::Get => {
            for (key, value) in store.entries()? {
                println!("{key}={value}");
            }
            Ok(())
        }
        ConfigAction::Ui => run_editor(store).await,
    }
}

/// Splits `KEY=value` arguments. An argument without `=` is an invalid
/// property.
fn parse_pairs(args: &[String]) -> Result<Vec<(String, String)>, ConfigError> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| ConfigError::InvalidKey(arg.clone()))
        })
        .collect()
}

fn field_label(key: ConfigKey) -> String {
    let label = match key {
        ConfigKey::OpenaiKey => "OpenAI Key",
        ConfigKey::Model => "Model",
        ConfigKey::SilentMode => "Silent Mode",
        ConfigKey::OpenaiApiEndpoint => "OpenAI API Endpoint",
        ConfigKey::Language => "Language",
    };
    locale::t(label)
}

/// The credential shows only its last three characters in the menu.
fn mask_credential(value: &str) -> String {
    let tail: String = {
        let chars: Vec<char> = value.chars().collect();
        chars[chars.len().saturating_sub(3)..].iter().collect()
    };
    format!("sk-...{tail}")
}

fn field_hint(key: ConfigKey, value: &str) -> String {
    if value.is_empty() {
        return locale::t("(not set)");
    }
    match key {
        ConfigKey::OpenaiKey => mask_credential(value),
        _ => value.to_string(),
    }
}

/// The interactive editor: an explicit select loop over the five fields plus
/// an exit entry. Cancelling the menu or a field prompt terminates the loop
/// the same way the exit entry does.
async fn run_editor(store: &ConfigStore) -> Result<()> {
    let theme = ColorfulTheme::default();
    loop {
        let entries = store.entries()?;
        let mut items: Vec<String> = entries
            .iter()
            .map(|(key, value)| format!("{} — {}", field_label(*key), field_hint(*key, value)))
            .collect();
        items.push(format!(
            "{} — {}",
            locale::t("Exit"),
            locale::t("Exit the program")
        ));

        let choice = prompt_opt(
            Select::with_theme(&theme)
                .with_prompt(format!("{}:", locale::t("Set config")))
                .items(&items)
                .default(0)
                .interact_opt(),
        )?;

        let index = match choice {
            Some(index) if index < entries.len() => index,
            _ => return Ok(()),
        };

        if !edit_field(store, entries[index].0, &theme).await? {
            return Ok(());
        }
    }
}

/// Prompts for a new value for `key` and persists it. Returns `Ok(false)`
/// when the user cancelled (Esc or Ctrl-C), which ends the editor session.
async fn edit_field(store: &ConfigStore, key: ConfigKey, theme: &ColorfulTheme) -> Result<bool> {
    let value = match key {
        ConfigKey::OpenaiKey => {
            match prompt_text(
                Input::with_theme(theme)
                    .with_prompt(locale::t("Enter your OpenAI API key"))
                    .interact_text(),
            )? {
                Some(key_input) => key_input,
                None => return Ok(false),
            }
        }
        ConfigKey::OpenaiApiEndpoint => {
            match prompt_text(
                Input::with_theme(theme)
                    .with_prompt(locale::t("Enter your OpenAI API Endpoint"))
                    .allow_empty(true)
                    .interact_text(),
            )? {
                Some(endpoint) => endpoint,
                None => return Ok(false),
            }
        }
        ConfigKey::SilentMode => {
            match prompt_opt(
                Confirm::with_theme(theme)
                    .with_prompt(locale::t("Enable silent mode?"))
                    .interact_opt(),
            )? {
                Some(enabled) => enabled.to_string(),
                None => return Ok(false),
            }
        }
        ConfigKey::Model => {
            // Listing models needs a valid credential; a failed round trip
            // fails the whole editor session.
            let valid = store.load(&RawConfig::new())?;
            let client = CompletionClient::new(&valid.openai_key, &valid.openai_api_endpoint);
            let spinner = GenerationSpinner::new(locale::t("Thinking..."));
            let models = client.list_models().await;
            spinner.clear();
            let models = models?;

            match prompt_opt(
                Select::with_theme(theme)
                    .with_prompt(locale::t("Pick a model"))
                    .items(&models)
                    .default(0)
                    .interact_opt(),
            )? {
                Some(index) => models[index].clone(),
                None => return Ok(false),
            }
        }
        ConfigKey::Language => {
            let labels: Vec<&str> = locale::LANGUAGES.iter().map(|(_, label)| *label).collect();
            match prompt_opt(
                Select::with_theme(theme)
                    .with_prompt(locale::t("Pick a language"))
                    .items(&labels)
                    .default(0)
                    .interact_opt(),
            )? {
                Some(index) => {
                    let code = locale::LANGUAGES[index].0.to_string();
                    locale::set_language(&code);
                    code
                }
                None => return Ok(false),
            }
        }
    };

    store.set(&[(key.as_str().to_string(), value)])?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let pairs = parse_pairs(&[
            "OPENAI_KEY=sk-abc".to_string(),
            "MODEL=gpt-4o".to_string(),
        ])
        .unwrap();
        assert_eq!(
            pairs,
            vec![
                ("OPENAI_KEY".to_string(), "sk-abc".to_string()),
                ("MODEL".to_string(), "gpt-4o".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_pairs_keeps_equals_in_value() {
        let pairs = parse_pairs(&["OPENAI_KEY=sk-a=b".to_string()]).unwrap();
        assert_eq!(pairs[0].1, "sk-a=b");
    }

    #[test]
    fn test_parse_pairs_rejects_bare_key() {
        let err = parse_pairs(&["MODEL".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKey(ref k) if k == "MODEL"));
    }

    #[test]
    fn test_mask_credential() {
        assert_eq!(mask_credential("sk-abcdef123"), "sk-...123");
        assert_eq!(mask_credential("ab"), "sk-...ab");
    }

    #[test]
    fn test_field_hint() {
        assert_eq!(field_hint(ConfigKey::OpenaiKey, ""), "(not set)");
        assert_eq!(field_hint(ConfigKey::OpenaiKey, "sk-abcdef123"), "sk-...123");
        assert_eq!(field_hint(ConfigKey::Model, "gpt-4o-mini"), "gpt-4o-mini");
    }
}
