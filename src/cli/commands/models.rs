//! LLM model listing command.

use console::style;

use certylex::config::Config;
use certylex::llm::{LanguageModel, LlmClient};

/// Show the LLM configuration and list available models.
pub async fn cmd_models(config: &Config) -> anyhow::Result<()> {
    let llm_client = LlmClient::new(config.llm.clone());

    println!("\n{}", style("LLM Configuration").bold());
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {}",
        "Enabled:",
        if config.llm.enabled { "Yes" } else { "No" }
    );
    println!("{:<20} {}", "Endpoint:", config.llm.endpoint);
    println!("{:<20} {}", "Current Model:", config.llm.model);
    println!("{:<20} {}", "Max Tokens:", config.llm.max_tokens);
    println!("{:<20} {}", "Summary Tokens:", config.llm.summary_max_tokens);
    println!("{:<20} {:.2}", "Temperature:", config.llm.temperature);
    println!("{:<20} {:.2}", "Top P:", config.llm.top_p);
    println!(
        "{:<20} {}",
        "Streaming:",
        if config.llm.stream { "Yes" } else { "No" }
    );

    if !llm_client.is_available().await {
        println!(
            "\n{} {}",
            style("!").yellow(),
            config.llm.availability_hint()
        );
        return Ok(());
    }

    println!("\n{}", style("Available Models").bold());
    println!("{}", "-".repeat(40));

    match llm_client.list_models().await {
        Ok(models) => {
            if models.is_empty() {
                println!("  No models available");
            } else {
                for model in models {
                    let marker = if model == config.llm.model {
                        style("*").green().to_string()
                    } else {
                        " ".to_string()
                    };
                    println!("{} {}", marker, model);
                }
            }
        }
        Err(e) => {
            println!("{} Failed to list models: {}", style("✗").red(), e);
        }
    }

    Ok(())
}
