//! Web server command.

use console::style;

use certylex::config::Config;
use certylex::server::parse_bind_address;

/// Start the API server.
pub async fn cmd_serve(config: &Config, bind: &str) -> anyhow::Result<()> {
    let addr = parse_bind_address(bind)?;

    println!(
        "{} Starting certylex API at http://{}",
        style("→").cyan(),
        addr
    );
    println!(
        "  LLM: {} ({}), entities: {:?}",
        config.llm.model, config.llm.endpoint, config.entities.backend
    );
    println!("  Press Ctrl+C to stop");

    certylex::server::serve(config, addr).await
}
