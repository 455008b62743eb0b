//! Line-oriented document annotation.
//!
//! Walks the source document once, tracking the active legal section, and
//! inserts annotation blocks right after the lines that trigger a rule. The
//! source is never modified; the result is a new annotated copy.

use tracing::debug;

use crate::services::analysis::{AnalysisError, ParsedAnalysis, SummaryAnalysis};

use super::sections::{Rule, SectionMarker, SectionTracker, Transition};
use super::types::{
    AnnotatedDocument, AnnotationBlock, AnnotationKind, ABUSIVE_TERMINATION_ALERT,
    ARBITRATION_NOTE, CRITICAL_POINTS_HEADING,
};

/// Word that triggers the arbitration note inside the governing-law section.
const ARBITRATION_KEYWORD: &str = "arbitraje";

/// Source document text. Guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document(String);

impl Document {
    /// Accept document text, rejecting empty or whitespace-only input.
    pub fn parse(text: impl Into<String>) -> Result<Self, AnalysisError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }
        Ok(Self(text))
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// Lines as split on `\n`, in order.
    pub fn lines(&self) -> Vec<&str> {
        self.0.split('\n').collect()
    }
}

impl AsRef<str> for Document {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Best-effort guard: the line just before `index` already carries a block of
/// `kind`. Only one line is inspected, so this is not an exactness guarantee.
fn already_annotated_preceding_line(lines: &[&str], index: usize, kind: AnnotationKind) -> bool {
    index
        .checked_sub(1)
        .and_then(|prev| lines.get(prev))
        .is_some_and(|line| line.contains(kind.guard_keyword()))
}

/// Best-effort guard: the line just after `index` already carries a block of
/// `kind`. Only one line is inspected.
fn already_annotated_following_line(lines: &[&str], index: usize, kind: AnnotationKind) -> bool {
    lines
        .get(index + 1)
        .is_some_and(|line| line.contains(kind.guard_keyword()))
}

/// Pick the block (if any) the current line triggers. At most one rule fires
/// per line and each rule fires at most once per section entry.
fn rule_for_line(
    lines: &[&str],
    index: usize,
    transition: Transition,
    tracker: &SectionTracker,
    analysis: &ParsedAnalysis,
    summary: &SummaryAnalysis,
) -> Option<(Rule, AnnotationBlock)> {
    let line = lines[index];
    let marker = transition.marker();

    if marker == Some(SectionMarker::Clausulas)
        && !tracker.has_fired(Rule::ClauseSuggestions)
        && !already_annotated_preceding_line(lines, index, AnnotationKind::Suggestion)
    {
        let body = if summary.suggestions.is_empty() {
            &analysis.introduction
        } else {
            &summary.suggestions
        };
        return Some((
            Rule::ClauseSuggestions,
            AnnotationBlock::new(AnnotationKind::Suggestion, body),
        ));
    }

    if marker == Some(SectionMarker::Resolucion)
        && !tracker.has_fired(Rule::AbusiveTermination)
        && !already_annotated_preceding_line(lines, index, AnnotationKind::Alert)
    {
        return Some((
            Rule::AbusiveTermination,
            AnnotationBlock::new(AnnotationKind::Alert, ABUSIVE_TERMINATION_ALERT),
        ));
    }

    if tracker.current() == Some(SectionMarker::LeyAplicable)
        && line.contains(ARBITRATION_KEYWORD)
        && !tracker.has_fired(Rule::ArbitrationNote)
        && !already_annotated_following_line(lines, index, AnnotationKind::Note)
    {
        return Some((
            Rule::ArbitrationNote,
            AnnotationBlock::new(AnnotationKind::Note, ARBITRATION_NOTE),
        ));
    }

    None
}

/// Body of the trailing summary block: critical points (when present) followed
/// by the analysis conclusion.
fn summary_body(analysis: &ParsedAnalysis, summary: &SummaryAnalysis) -> String {
    if summary.critical_points.is_empty() {
        analysis.conclusion.clone()
    } else {
        format!(
            "{}\n{}\n\n{}",
            CRITICAL_POINTS_HEADING, summary.critical_points, analysis.conclusion
        )
    }
}

/// Produce the annotated copy of `document`.
///
/// Every source line is emitted unchanged, followed by the block it triggers
/// (if any). A summary block is always appended at the end.
pub fn annotate(
    document: &Document,
    analysis: &ParsedAnalysis,
    summary: &SummaryAnalysis,
) -> AnnotatedDocument {
    let lines = document.lines();
    let mut tracker = SectionTracker::new();
    let mut text = String::with_capacity(document.text().len() * 2);
    let mut blocks = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let transition = tracker.advance(line);

        text.push_str(line);
        text.push('\n');

        if let Some((rule, block)) =
            rule_for_line(&lines, index, transition, &tracker, analysis, summary)
        {
            debug!(line = index + 1, kind = ?block.kind, "Inserting annotation block");
            tracker.record(rule);
            text.push('\n');
            text.push_str(&block.render());
            text.push_str("\n\n");
            blocks.push(block);
        }
    }

    let trailing = AnnotationBlock::new(AnnotationKind::Summary, &summary_body(analysis, summary));
    text.push('\n');
    text.push_str(&trailing.render());
    text.push('\n');
    blocks.push(trailing);

    AnnotatedDocument { text, blocks }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document::parse(text).unwrap()
    }

    fn suggestions(text: &str) -> SummaryAnalysis {
        SummaryAnalysis {
            suggestions: text.to_string(),
            ..Default::default()
        }
    }

    fn kinds(annotated: &AnnotatedDocument) -> Vec<AnnotationKind> {
        annotated.blocks.iter().map(|b| b.kind).collect()
    }

    #[test]
    fn document_rejects_blank_text() {
        assert!(matches!(Document::parse(""), Err(AnalysisError::EmptyDocument)));
        assert!(matches!(Document::parse(" \n\t "), Err(AnalysisError::EmptyDocument)));
        assert_eq!(doc("a\nb").lines(), vec!["a", "b"]);
    }

    #[test]
    fn suggestion_follows_clauses_heading() {
        let document = doc("CLÁUSULAS\nPRIMERA.- OBJETO\nEl objeto del contrato.");
        let annotated = annotate(
            &document,
            &ParsedAnalysis::default(),
            &suggestions("Add a penalty clause."),
        );

        assert!(annotated
            .text
            .starts_with("CLÁUSULAS\n\n/* SUGERENCIAS DE MEJORA:\nAdd a penalty clause.\n*/\n\nPRIMERA.- OBJETO\n"));
        assert_eq!(annotated.blocks[0].kind, AnnotationKind::Suggestion);
        assert_eq!(annotated.blocks[0].body, "Add a penalty clause.");
    }

    #[test]
    fn suggestion_falls_back_to_introduction() {
        let analysis = ParsedAnalysis::new("t", "Contrato de servicios.", "", "");
        let annotated = annotate(&doc("CLÁUSULAS"), &analysis, &SummaryAnalysis::default());
        assert_eq!(annotated.blocks[0].body, "Contrato de servicios.");
    }

    #[test]
    fn termination_clause_gets_fixed_alert() {
        let annotated = annotate(
            &doc("SEPTIMA.- RESOLUCIÓN DEL CONTRATO\nNinguna parte podrá resolver."),
            &ParsedAnalysis::default(),
            &SummaryAnalysis::default(),
        );

        let alert = &annotated.blocks[0];
        assert_eq!(alert.kind, AnnotationKind::Alert);
        assert_eq!(alert.body, ABUSIVE_TERMINATION_ALERT);
        assert!(alert.body.contains("abusiva"));
        assert!(alert.body.contains("preaviso razonable"));
        assert!(annotated
            .text
            .contains("RESOLUCIÓN DEL CONTRATO\n\n/* ALERTA - POSIBLE CLÁUSULA ABUSIVA:\n"));
    }

    #[test]
    fn arbitration_note_only_inside_governing_law() {
        let text = "PRIMERA.- OBJETO\nSin arbitraje aquí.\nOCTAVA.- LEY APLICABLE\nLas partes se someten al arbitraje.\nFin.";
        let annotated = annotate(&doc(text), &ParsedAnalysis::default(), &SummaryAnalysis::default());

        assert_eq!(kinds(&annotated), vec![AnnotationKind::Note, AnnotationKind::Summary]);
        assert_eq!(annotated.blocks[0].body, ARBITRATION_NOTE);
        assert!(annotated
            .text
            .contains("Las partes se someten al arbitraje.\n\n/* NOTA LEGAL:\n"));
    }

    #[test]
    fn note_skipped_when_next_line_has_note() {
        let text = "LEY APLICABLE\nse someten al arbitraje.\n/* NOTA LEGAL: ya revisado */";
        let annotated = annotate(&doc(text), &ParsedAnalysis::default(), &SummaryAnalysis::default());
        assert_eq!(kinds(&annotated), vec![AnnotationKind::Summary]);
    }

    #[test]
    fn suggestion_skipped_when_previous_line_has_suggestions() {
        let text = "/* SUGERENCIAS previas */\nCLÁUSULAS";
        let annotated = annotate(&doc(text), &ParsedAnalysis::default(), &suggestions("x"));
        assert_eq!(kinds(&annotated), vec![AnnotationKind::Summary]);
    }

    #[test]
    fn repeated_keyword_in_same_section_fires_once() {
        let text = "CLÁUSULAS\nTexto.\nMás texto.\nVéanse las CLÁUSULAS anteriores.";
        let annotated = annotate(&doc(text), &ParsedAnalysis::default(), &suggestions("Una."));
        assert_eq!(
            kinds(&annotated),
            vec![AnnotationKind::Suggestion, AnnotationKind::Summary]
        );
    }

    #[test]
    fn re_entering_a_section_fires_again() {
        let text = "CLÁUSULAS\nPRIMERA.- OBJETO\nTexto.\nCLÁUSULAS ADICIONALES";
        let annotated = annotate(&doc(text), &ParsedAnalysis::default(), &suggestions("Una."));
        assert_eq!(
            kinds(&annotated),
            vec![
                AnnotationKind::Suggestion,
                AnnotationKind::Suggestion,
                AnnotationKind::Summary
            ]
        );
    }

    #[test]
    fn arbitration_note_fires_once_per_section_entry() {
        let text = "LEY APLICABLE\narbitraje uno\nTexto.\narbitraje dos";
        let annotated = annotate(&doc(text), &ParsedAnalysis::default(), &SummaryAnalysis::default());
        assert_eq!(kinds(&annotated), vec![AnnotationKind::Note, AnnotationKind::Summary]);
    }

    #[test]
    fn trailing_summary_block_layout() {
        let analysis = ParsedAnalysis::new("t", "", "", "Revisar la cláusula séptima.");
        let summary = SummaryAnalysis {
            critical_points: "- Resolución unilateral.".into(),
            ..Default::default()
        };
        let annotated = annotate(&doc("Texto libre."), &analysis, &summary);

        assert_eq!(
            annotated.text,
            "Texto libre.\n\n/* RESUMEN DE MEJORAS SUGERIDAS:\nPUNTOS CRÍTICOS QUE REQUIEREN ATENCIÓN INMEDIATA:\n- Resolución unilateral.\n\nRevisar la cláusula séptima.\n*/\n"
        );
    }

    #[test]
    fn trailing_summary_without_critical_points() {
        let analysis = ParsedAnalysis::new("t", "", "", "Todo correcto.");
        let annotated = annotate(&doc("x"), &analysis, &SummaryAnalysis::default());
        let last = annotated.blocks.last().unwrap();
        assert_eq!(last.kind, AnnotationKind::Summary);
        assert_eq!(last.body, "Todo correcto.");
    }

    #[test]
    fn source_lines_are_preserved_in_order() {
        let text = "REUNIDOS\nDE UNA PARTE\nEXPONEN\nCLÁUSULAS\nRESOLUCIÓN\nLEY APLICABLE\narbitraje";
        let annotated = annotate(&doc(text), &ParsedAnalysis::default(), &suggestions("s"));

        let mut remaining = annotated.text.as_str();
        for line in text.split('\n') {
            let at = remaining.find(line).unwrap();
            remaining = &remaining[at + line.len()..];
        }
    }
}
