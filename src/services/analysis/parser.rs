//! Tolerant parsing of model replies.
//!
//! The reply layout requested in the prompts is advisory. Headings may be
//! missing, reordered, differ in case, lose their accents or be wrapped in
//! bold markers. A section body runs from the end of its heading line to the
//! next recognised heading (or end of text). Parsing never fails: anything
//! not found degrades to the default value.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{ParsedAnalysis, SummaryAnalysis, DEFAULT_TITLE};

/// Build a line-anchored markdown heading matcher. `name` is a regex fragment;
/// the rest of the heading line is consumed so bodies start on the next line.
fn heading(name: &str) -> Regex {
    let pattern = format!(r"(?im)^[ \t]*#{{1,6}}[ \t]*(?:\*\*)?[ \t]*{}\b[^\n]*", name);
    Regex::new(&pattern).expect("heading pattern should compile")
}

static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*#{1,6}[ \t]*(?:\*\*)?[ \t]*an[aá]lisis del[ \t]+([^\n]*)")
        .expect("title pattern should compile")
});

static INTRODUCTION: LazyLock<Regex> = LazyLock::new(|| heading(r"introducci[oó]n"));
static DETAILS: LazyLock<Regex> = LazyLock::new(|| heading(r"detalles"));
static CONCLUSION: LazyLock<Regex> = LazyLock::new(|| heading(r"conclusi[oó]n"));

static SUMMARY: LazyLock<Regex> = LazyLock::new(|| heading(r"resumen"));
static SUGGESTIONS: LazyLock<Regex> = LazyLock::new(|| heading(r"sugerencias"));
static CRITICAL_POINTS: LazyLock<Regex> = LazyLock::new(|| heading(r"puntos[ \t]+cr[ií]ticos"));

/// A recognised heading line in a reply.
#[derive(Debug, Clone, Copy)]
struct Heading {
    slot: usize,
    start: usize,
    end: usize,
}

/// Locate every heading line matched by `patterns`, ordered by position.
/// `slot` is the index of the pattern that matched.
fn find_headings(text: &str, patterns: &[&Regex]) -> Vec<Heading> {
    let mut headings: Vec<Heading> = patterns
        .iter()
        .enumerate()
        .flat_map(|(slot, re)| {
            re.find_iter(text).map(move |m| Heading {
                slot,
                start: m.start(),
                end: m.end(),
            })
        })
        .collect();
    headings.sort_by_key(|h| (h.start, h.slot));
    // A line matched by two patterns counts once.
    headings.dedup_by_key(|h| h.start);
    headings
}

/// Body of the first heading for each slot, trimmed. Missing slots are empty.
fn section_bodies(text: &str, patterns: &[&Regex]) -> Vec<String> {
    let headings = find_headings(text, patterns);
    let mut bodies = vec![None; patterns.len()];

    for (i, heading) in headings.iter().enumerate() {
        if bodies[heading.slot].is_some() {
            continue;
        }
        let stop = headings
            .get(i + 1)
            .map(|next| next.start.max(heading.end))
            .unwrap_or(text.len());
        bodies[heading.slot] = Some(text[heading.end..stop].trim().to_string());
    }

    bodies.into_iter().map(Option::unwrap_or_default).collect()
}

fn parse_title(reply: &str) -> String {
    TITLE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().trim_end_matches('*').trim())
        .filter(|rest| !rest.is_empty())
        .map(|rest| format!("Análisis del {}", rest))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Parse the structured analysis reply.
pub fn parse_analysis(reply: &str) -> ParsedAnalysis {
    let title = parse_title(reply);
    // The title heading is a boundary too, so an introduction never swallows it.
    let mut bodies = section_bodies(reply, &[&INTRODUCTION, &DETAILS, &CONCLUSION, &TITLE])
        .into_iter();

    let introduction = bodies.next().unwrap_or_default();
    let details = bodies.next().unwrap_or_default();
    let conclusion = bodies.next().unwrap_or_default();

    ParsedAnalysis::new(title, introduction, details, conclusion)
}

/// Parse the summary-with-suggestions reply.
pub fn parse_summary(reply: &str) -> SummaryAnalysis {
    let mut bodies = section_bodies(reply, &[&SUMMARY, &SUGGESTIONS, &CRITICAL_POINTS]).into_iter();

    SummaryAnalysis {
        summary: bodies.next().unwrap_or_default(),
        suggestions: bodies.next().unwrap_or_default(),
        critical_points: bodies.next().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_reply() {
        let reply = "# Análisis del Contrato de Arrendamiento\n## Introducción\nResumen.\n## Detalles\nClausulas.\n## Conclusión\nFinal.";
        let parsed = parse_analysis(reply);

        assert_eq!(parsed.title, "Análisis del Contrato de Arrendamiento");
        assert_eq!(parsed.introduction, "Resumen.");
        assert_eq!(parsed.details, "Clausulas.");
        assert_eq!(parsed.conclusion, "Final.");
    }

    #[test]
    fn empty_reply_degrades_to_defaults() {
        let parsed = parse_analysis("");
        assert_eq!(parsed.title, DEFAULT_TITLE);
        assert_eq!(parsed.introduction, "");
        assert_eq!(parsed.details, "");
        assert_eq!(parsed.conclusion, "");
        assert_eq!(parsed, ParsedAnalysis::default());
    }

    #[test]
    fn reply_without_headings_degrades_to_defaults() {
        let parsed = parse_analysis("El contrato parece correcto. No hay nada que añadir.");
        assert_eq!(parsed, ParsedAnalysis::default());
    }

    #[test]
    fn reordered_headings_are_still_found() {
        let reply = "## Conclusión\nFin.\n\n## Introducción\nInicio.\n\n## Detalles\nMedio.\n";
        let parsed = parse_analysis(reply);

        assert_eq!(parsed.title, DEFAULT_TITLE);
        assert_eq!(parsed.introduction, "Inicio.");
        assert_eq!(parsed.details, "Medio.");
        assert_eq!(parsed.conclusion, "Fin.");

        let intro = parsed.full_response.find("## Introducción").unwrap();
        let details = parsed.full_response.find("## Detalles").unwrap();
        let conclusion = parsed.full_response.find("## Conclusión").unwrap();
        assert!(intro < details && details < conclusion);
    }

    #[test]
    fn heading_variants_are_tolerated() {
        let reply = "#Analisis del   Contrato de Obra  \n### **INTRODUCCION**\nUno.\n##  detalles:\nDos.\n## Conclusion final\nTres.";
        let parsed = parse_analysis(reply);

        assert_eq!(parsed.title, "Análisis del Contrato de Obra");
        assert_eq!(parsed.introduction, "Uno.");
        assert_eq!(parsed.details, "Dos.");
        assert_eq!(parsed.conclusion, "Tres.");
    }

    #[test]
    fn missing_middle_section_stops_at_next_heading() {
        let reply = "## Introducción\nSolo intro.\n## Conclusión\nSolo fin.";
        let parsed = parse_analysis(reply);
        assert_eq!(parsed.introduction, "Solo intro.");
        assert_eq!(parsed.details, "");
        assert_eq!(parsed.conclusion, "Solo fin.");
    }

    #[test]
    fn canonical_output_reparses_to_same_fields() {
        let first = parse_analysis("# Análisis del Poder Notarial\n## Detalles\nTexto.\n");
        let second = parse_analysis(&first.full_response);
        assert_eq!(first, second);
    }

    #[test]
    fn keywords_inside_body_lines_are_not_headings() {
        let reply = "## Detalles\nLos detalles de la conclusión se ven abajo.\n## Conclusión\nFin.";
        let parsed = parse_analysis(reply);
        assert_eq!(parsed.details, "Los detalles de la conclusión se ven abajo.");
    }

    #[test]
    fn parses_summary_reply() {
        let reply = "## RESUMEN\nContrato de servicios.\n\n## SUGERENCIAS DE MEJORA\n1. Añadir penalización.\n2. Fijar plazos.\n\n## PUNTOS CRÍTICOS\n- Resolución unilateral.";
        let summary = parse_summary(reply);

        assert_eq!(summary.summary, "Contrato de servicios.");
        assert_eq!(summary.suggestions, "1. Añadir penalización.\n2. Fijar plazos.");
        assert_eq!(summary.critical_points, "- Resolución unilateral.");
    }

    #[test]
    fn summary_sections_are_optional() {
        let summary = parse_summary("## PUNTOS CRITICOS\n- Falta preaviso.");
        assert_eq!(summary.summary, "");
        assert_eq!(summary.suggestions, "");
        assert_eq!(summary.critical_points, "- Falta preaviso.");

        assert!(parse_summary("sin formato").is_empty());
    }
}
