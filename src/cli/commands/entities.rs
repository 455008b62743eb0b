//! Entity extraction command.

use std::path::Path;

use console::style;

use super::super::helpers::{build_service, load_document, spinner};
use certylex::config::Config;
use certylex::services::entities::{EntityTable, Pairing};

/// Extract entities from a document and print the correlated table.
pub async fn cmd_entities(
    config: &Config,
    file: Option<&Path>,
    sample: bool,
    json: bool,
) -> anyhow::Result<()> {
    let text = load_document(file, sample).await?;
    let service = build_service(config);

    let pb = spinner(format!(
        "Extracting entities ({} backend)...",
        service.extractor().backend_id()
    ));
    let result = service.extract_entities(&text).await;
    pb.finish_and_clear();
    let table = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    print_table(&table);
    Ok(())
}

/// Print rows as `name  id`, marking approximate pairings.
pub fn print_table(table: &EntityTable) {
    if table.rows.is_empty() {
        println!("  No se encontraron nombres");
    }
    for row in &table.rows {
        let id = row.personal_id.as_deref().unwrap_or("-");
        let marker = match row.pairing {
            Pairing::Positional => String::new(),
            Pairing::Reused => style(" (reutilizado)").yellow().to_string(),
            Pairing::Absent => style(" (sin DNI)").dim().to_string(),
        };
        println!("  {:<40} {}{}", row.name, id, marker);
    }

    if !table.unmatched_ids.is_empty() {
        println!(
            "{} DNI/NIE sin nombre asociado: {}",
            style("!").yellow(),
            table.unmatched_ids.join(", ")
        );
    }
    if !table.company_ids.is_empty() {
        println!("{:<42} {}", "  CIF:", table.company_ids.join(", "));
    }
    if table.rows.iter().any(|r| r.pairing != Pairing::Positional) {
        println!(
            "{}",
            style("  Emparejamiento por posición: verifique los DNI antes de usarlos.").dim()
        );
    }
}
