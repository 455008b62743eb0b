//! Document analysis command.

use std::path::PathBuf;

use console::style;

use super::super::helpers::{build_service, load_document, spinner};
use certylex::config::Config;
use certylex::services::annotation::Severity;
use certylex::services::AnalysisOutcome;

use super::entities::print_table;

pub struct AnalyzeArgs {
    pub file: Option<PathBuf>,
    pub sample: bool,
    pub question: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
    pub entities: bool,
    pub json: bool,
}

/// Analyze a document and print the analysis, alerts and annotated copy.
pub async fn cmd_analyze(config: &Config, args: AnalyzeArgs) -> anyhow::Result<()> {
    let text = load_document(args.file.as_deref(), args.sample).await?;
    let mut config = config.clone();
    if let Some(model) = args.model.as_deref() {
        config.llm = config.llm.with_model(model);
    }
    let config = &config;
    let service = build_service(config);

    let mut options = service.default_options();
    if let Some(t) = args.temperature {
        options.temperature = t;
    }
    if let Some(p) = args.top_p {
        options.top_p = p;
    }
    if let Some(n) = args.max_tokens {
        options.max_tokens = n;
    }

    let pb = spinner(format!("Analyzing with {}...", config.llm.model));
    let question = args.question.as_deref();
    let (outcome, table) = if args.entities {
        let (outcome, table) = service.review(&text, question, options).await;
        (outcome, Some(table))
    } else {
        (service.analyze(&text, question, options).await, None)
    };
    pb.finish_and_clear();

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            if !e.is_input_error() {
                eprintln!(
                    "{} {}",
                    style("!").yellow(),
                    config.llm.availability_hint()
                );
            }
            return Err(e.into());
        }
    };

    // Entity failures don't discard a finished analysis.
    let table = match table {
        Some(Ok(table)) => Some(table),
        Some(Err(e)) => {
            eprintln!("{} Entity extraction failed: {}", style("✗").red(), e);
            None
        }
        None => None,
    };

    if args.json {
        let value = serde_json::json!({
            "analysis": &outcome,
            "entities": table,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_outcome(&outcome);
    if let Some(table) = table {
        println!("\n{}", style("Entidades").bold());
        println!("{}", "-".repeat(60));
        print_table(&table);
    }
    Ok(())
}

fn print_outcome(outcome: &AnalysisOutcome) {
    println!("{}", style(&outcome.analysis.title).bold());
    println!(
        "{}",
        style(format!(
            "model {} · request {}",
            outcome.model, outcome.request_id
        ))
        .dim()
    );
    println!("{}", outcome.formatted_analysis);

    if !outcome.alerts.is_empty() {
        println!("{}", style("Alertas").bold());
        println!("{}", "-".repeat(60));
        for alert in &outcome.alerts {
            let label = match alert.severity {
                Severity::High => style(&alert.label).red().bold(),
                Severity::Medium => style(&alert.label).yellow(),
                Severity::Low => style(&alert.label).cyan(),
            };
            println!("{}", label);
            for line in alert.body.lines() {
                println!("  {}", line);
            }
        }
    }

    println!("\n{}", style("Documento anotado").bold());
    println!("{}", "-".repeat(60));
    println!("{}", outcome.annotated_document.text);
}
