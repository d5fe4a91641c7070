use anyhow::{Context, Result};
use std::env;

use crate::config::{Config, ConfigStore, Provider};
use crate::prompt;
use crate::providers::{CompletionProvider, GeminiProvider, OpenAiProvider};
use crate::shell;

/// Generate a shell command for the given free-text description.
///
/// Loads the configuration (a missing or broken config is fatal for
/// generation), detects the shell and OS, and hands off to the provider
/// selected in the config. The returned string is the API's first choice
/// verbatim; it may be empty, multi-line, or unsafe to run.
pub async fn generate(description: &str, store: &ConfigStore) -> Result<String> {
    let config = store
        .load()
        .context("Could not load configuration for command generation")?;

    let provider = build_provider(&config);
    generate_with_provider(provider.as_ref(), description).await
}

/// Generation with an injected provider. Split out so tests can swap the
/// network call for a mock.
pub async fn generate_with_provider(
    provider: &dyn CompletionProvider,
    description: &str,
) -> Result<String> {
    let shell_info = shell::detect();
    let messages = prompt::build_messages(&shell_info, env::consts::OS, description);

    provider
        .complete(&messages)
        .await
        .with_context(|| format!("{} completion failed", provider.name()))
}

fn build_provider(config: &Config) -> Box<dyn CompletionProvider> {
    match config.provider {
        Provider::OpenAi => Box::new(OpenAiProvider::new(
            config.openai_api_token.clone(),
            config.model.clone(),
        )),
        Provider::Gemini => Box::new(GeminiProvider::new(
            config.openai_api_token.clone(),
            config.model.clone(),
        )),
    }
}
