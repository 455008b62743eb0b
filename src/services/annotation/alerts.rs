//! Recover annotation blocks from an annotated document for display.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::types::{AnnotationKind, BLOCK_CLOSE};

/// Matches every block opening written by the annotator, lazily up to the
/// first closing delimiter.
static BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let tags = AnnotationKind::ALL
        .iter()
        .map(|kind| regex::escape(kind.tag()))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?s)/\* ({}):\n(.*?){}", tags, regex::escape(BLOCK_CLOSE));
    Regex::new(&pattern).expect("annotation block pattern should compile")
});

/// Display priority of an extracted block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn for_kind(kind: AnnotationKind) -> Self {
        match kind {
            AnnotationKind::Alert => Severity::High,
            AnnotationKind::Note => Severity::Medium,
            AnnotationKind::Suggestion | AnnotationKind::Summary => Severity::Low,
        }
    }
}

/// One annotation block found in a document, classified for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AnnotationKind,
    pub severity: Severity,
    /// Short Spanish label shown next to the body.
    pub label: String,
    pub body: String,
}

impl Alert {
    pub fn new(kind: AnnotationKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::for_kind(kind),
            label: label_for(kind).to_string(),
            body: body.into(),
        }
    }
}

fn label_for(kind: AnnotationKind) -> &'static str {
    match kind {
        AnnotationKind::Alert => "Advertencia",
        AnnotationKind::Note => "Nota Legal",
        AnnotationKind::Suggestion => "Sugerencia",
        AnnotationKind::Summary => "Resumen",
    }
}

/// Every annotation block in `annotated`, in document order, with delimiters
/// stripped and bodies trimmed.
///
/// Any text shaped like a block opening is picked up, including text that was
/// already present in the source document.
pub fn extract_alerts(annotated: &str) -> Vec<Alert> {
    BLOCK_PATTERN
        .captures_iter(annotated)
        .filter_map(|caps| {
            let kind = AnnotationKind::from_tag(caps.get(1)?.as_str())?;
            let body = caps.get(2).map_or("", |m| m.as_str()).trim();
            Some(Alert::new(kind, body))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::{ParsedAnalysis, SummaryAnalysis};
    use crate::services::annotation::types::{ABUSIVE_TERMINATION_ALERT, ARBITRATION_NOTE};
    use crate::services::annotation::{annotate, Document};

    #[test]
    fn extracts_blocks_with_classification() {
        let text = "CLÁUSULAS\n\n/* SUGERENCIAS DE MEJORA:\n  Añadir penalización.  \n*/\n\nFin\n/* NOTA LEGAL:\nRevisar.\n*/\n";
        let alerts = extract_alerts(text);

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AnnotationKind::Suggestion);
        assert_eq!(alerts[0].label, "Sugerencia");
        assert_eq!(alerts[0].severity, Severity::Low);
        assert_eq!(alerts[0].body, "Añadir penalización.");
        assert_eq!(alerts[1].kind, AnnotationKind::Note);
        assert_eq!(alerts[1].severity, Severity::Medium);
    }

    #[test]
    fn plain_comments_are_ignored() {
        assert!(extract_alerts("/* comentario normal */\ntexto").is_empty());
        assert!(extract_alerts("").is_empty());
    }

    #[test]
    fn recovers_exactly_what_annotate_inserted() {
        let document = Document::parse(
            "REUNIDOS\nEXPONEN\nCLÁUSULAS\nPRIMERA.- OBJETO\nSEPTIMA.- RESOLUCIÓN\nOCTAVA.- LEY APLICABLE\nSe someten al arbitraje.\n",
        )
        .unwrap();
        let analysis = ParsedAnalysis::new("t", "intro", "det", "Conclusión */ final.");
        let summary = SummaryAnalysis {
            summary: "s".into(),
            suggestions: "1. Fijar penalización.\n2. Usar /* comentarios */ con cuidado.".into(),
            critical_points: "- Plazo.".into(),
        };

        let annotated = annotate(&document, &analysis, &summary);
        let alerts = extract_alerts(&annotated.text);

        let recovered: Vec<_> = alerts.iter().map(|a| (a.kind, a.body.as_str())).collect();
        let inserted: Vec<_> = annotated
            .blocks
            .iter()
            .map(|b| (b.kind, b.body.as_str()))
            .collect();
        assert_eq!(recovered, inserted);

        assert_eq!(
            recovered.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            vec![
                AnnotationKind::Suggestion,
                AnnotationKind::Alert,
                AnnotationKind::Note,
                AnnotationKind::Summary
            ]
        );
        assert_eq!(alerts[1].body, ABUSIVE_TERMINATION_ALERT);
        assert_eq!(alerts[2].body, ARBITRATION_NOTE);
        assert_eq!(alerts[1].severity, Severity::High);
    }
}
