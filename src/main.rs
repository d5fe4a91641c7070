use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

mod config;
mod execution;
mod generator;
mod output;
mod prompt;
mod providers;
mod shell;

use config::{Config, ConfigStore, Provider};
use output::{display_error, display_fatal, display_success};

#[derive(Parser)]
#[command(name = "genshell")]
#[command(version)]
#[command(about = "Generate shell commands from natural-language descriptions using a hosted AI model")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Description of the command to generate
    #[arg(trailing_var_arg = true)]
    description: Vec<String>,

    /// Execute the generated command
    #[arg(short, long)]
    execute: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the API token, model, and provider
    Config {
        /// Your API token
        #[arg(long)]
        api_token: String,

        /// The model to use (defaults per provider)
        #[arg(long, default_value = "")]
        model: String,

        /// The completion provider: openai or gemini
        #[arg(long, default_value = "openai")]
        provider: Provider,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        display_fatal(&e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config {
            api_token,
            model,
            provider,
        }) => handle_config(api_token, model, provider),
        None => {
            let description = cli.description.join(" ");
            if description.trim().is_empty() {
                return Err(anyhow!(
                    "expected a description for the command, e.g.: genshell list all hidden files"
                ));
            }
            handle_generate(&description, cli.execute).await
        }
    }
}

fn handle_config(api_token: String, model: String, provider: Provider) -> Result<()> {
    if api_token.trim().is_empty() {
        return Err(anyhow!("You must provide an API token"));
    }

    let store = ConfigStore::new()?;
    store.save(&Config::new(api_token, model, provider))?;

    display_success("Configuration saved successfully.");
    Ok(())
}

async fn handle_generate(description: &str, execute: bool) -> Result<()> {
    let store = ConfigStore::new()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈")
            .template("{spinner:.cyan} {msg}")?,
    );
    pb.set_message("Generating command...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = generator::generate(description, &store).await;
    pb.finish_and_clear();

    let command_text = result?;
    println!("{}", command_text);

    if execute {
        run_generated_command(&command_text);
    }

    Ok(())
}

/// Run the generated command and print whatever it produced. A failing
/// generated command is reported but never turns into a non-zero exit of
/// genshell itself: the tool's job ended when the command was printed.
fn run_generated_command(command_text: &str) {
    match execution::execute(command_text) {
        Ok(outcome) => {
            if !outcome.success {
                display_error(&format!(
                    "Command exited with status {}",
                    outcome
                        .exit_code
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "unknown".to_string())
                ));
            }
            print!("{}", outcome.output);
        }
        Err(e) => {
            display_error(&format!("Error executing command: {:#}", e));
        }
    }
}
