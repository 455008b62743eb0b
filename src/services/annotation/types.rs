//! Types shared by the annotator and the alert extractor.

use serde::{Deserialize, Serialize};

/// Closing delimiter of every annotation block.
pub const BLOCK_CLOSE: &str = "*/";

/// Replacement for a closing delimiter found inside a block body.
const ESCAPED_CLOSE: &str = "* /";

/// Fixed warning inserted after a termination clause.
pub const ABUSIVE_TERMINATION_ALERT: &str = "Esta cláusula podría considerarse abusiva al no permitir la resolución del contrato por ninguna de las partes.\nSe recomienda modificarla para incluir causas justificadas de resolución y preaviso razonable.";

/// Fixed note inserted after an arbitration submission in the governing-law clause.
pub const ARBITRATION_NOTE: &str =
    "Se recomienda especificar la corte de arbitraje y el procedimiento a seguir.";

/// Heading placed before the critical points inside the trailing summary block.
pub const CRITICAL_POINTS_HEADING: &str = "PUNTOS CRÍTICOS QUE REQUIEREN ATENCIÓN INMEDIATA:";

/// Kind of an inline annotation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// Improvement suggestions, placed after the clauses heading.
    Suggestion,
    /// Possible abusive clause.
    Alert,
    /// Legal note.
    Note,
    /// Trailing summary of suggested improvements.
    Summary,
}

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 4] = [
        AnnotationKind::Suggestion,
        AnnotationKind::Alert,
        AnnotationKind::Note,
        AnnotationKind::Summary,
    ];

    /// Header text written after `/* ` in the opening delimiter.
    pub fn tag(self) -> &'static str {
        match self {
            AnnotationKind::Suggestion => "SUGERENCIAS DE MEJORA",
            AnnotationKind::Alert => "ALERTA - POSIBLE CLÁUSULA ABUSIVA",
            AnnotationKind::Note => "NOTA LEGAL",
            AnnotationKind::Summary => "RESUMEN DE MEJORAS SUGERIDAS",
        }
    }

    /// Full opening delimiter line, e.g. `/* NOTA LEGAL:`.
    pub fn opening(self) -> String {
        format!("/* {}:", self.tag())
    }

    /// Short keyword the neighbour-line guards look for.
    pub fn guard_keyword(self) -> &'static str {
        match self {
            AnnotationKind::Suggestion => "SUGERENCIAS",
            AnnotationKind::Alert => "ALERTA",
            AnnotationKind::Note => "NOTA",
            AnnotationKind::Summary => "RESUMEN DE MEJORAS",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// An annotation inserted into the document copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationBlock {
    pub kind: AnnotationKind,
    pub body: String,
}

impl AnnotationBlock {
    /// Create a block. The body is trimmed and any closing delimiter inside it
    /// is neutralised so the block can be re-extracted losslessly.
    pub fn new(kind: AnnotationKind, body: &str) -> Self {
        Self {
            kind,
            body: body.trim().replace(BLOCK_CLOSE, ESCAPED_CLOSE),
        }
    }

    /// Render the block the way it appears inside the annotated document.
    pub fn render(&self) -> String {
        format!("{}\n{}\n{}", self.kind.opening(), self.body, BLOCK_CLOSE)
    }
}

/// Result of annotating a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    /// Original lines with annotation blocks interleaved.
    pub text: String,
    /// Blocks in the order they were inserted.
    pub blocks: Vec<AnnotationBlock>,
}
