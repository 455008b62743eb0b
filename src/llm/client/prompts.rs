//! Prompt templates for legal document review.
//!
//! Templates use `{question}` and `{document}` placeholders. The document text
//! is embedded verbatim after the instructions.

/// Question used when the caller does not ask anything specific.
pub const DEFAULT_QUESTION: &str = "Analiza este documento legal y proporciona mejoras";

/// Structured analysis prompt. The reply layout it demands is what
/// `parse_analysis` looks for.
pub const ANALYSIS_PROMPT: &str = r#"Eres un asistente legal especializado en análisis de documentos jurídicos.
Analiza el siguiente documento legal y proporciona un análisis detallado con el siguiente formato EXACTO:

# Análisis del [Tipo de documento]

## Introducción
[Proporciona un resumen conciso del documento, su propósito y las partes involucradas]

## Detalles
[Analiza las cláusulas más importantes, identificando:
1. Cláusulas principales y su significado
2. Obligaciones de cada parte
3. Plazos relevantes
4. Condiciones económicas
5. Posibles cláusulas problemáticas o ambiguas]

## Conclusión
[Resume los puntos principales del documento, proporciona recomendaciones concretas y destaca los aspectos que requieren atención]

La pregunta específica del usuario es: "{question}"

DOCUMENTO A ANALIZAR:
{document}"#;

/// Summary prompt: short summary, five numbered suggestions, critical points.
pub const SUMMARY_PROMPT: &str = r#"Eres un asistente legal especializado en documentos jurídicos.
Lee detenidamente el siguiente documento legal y proporciona:
1. Un resumen BREVE del contenido (máximo 3 párrafos)
2. Una lista de 5 sugerencias específicas y prácticas para mejorar este documento
3. Destaca los puntos más problemáticos que deberían corregirse inmediatamente

Formato tu respuesta así:

## RESUMEN
[Tu resumen aquí]

## SUGERENCIAS DE MEJORA
1. [Primera sugerencia]
2. [Segunda sugerencia]
3. [Tercera sugerencia]
4. [Cuarta sugerencia]
5. [Quinta sugerencia]

## PUNTOS CRÍTICOS
- [Primer punto crítico]
- [Segundo punto crítico]
- [Tercer punto crítico]

DOCUMENTO A ANALIZAR:
{document}"#;

/// Build the structured analysis prompt.
///
/// A missing or blank question falls back to [`DEFAULT_QUESTION`].
pub fn build_analysis_prompt(document: &str, question: Option<&str>) -> String {
    let question = question
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(DEFAULT_QUESTION);

    let (head, tail) = split_at_document(ANALYSIS_PROMPT);
    format!("{}{}{}", head.replace("{question}", question), document, tail)
}

/// Build the summary-with-suggestions prompt.
pub fn build_summary_prompt(document: &str) -> String {
    let (head, tail) = split_at_document(SUMMARY_PROMPT);
    format!("{}{}{}", head, document, tail)
}

/// Split a template around its `{document}` placeholder. Substitution happens
/// on the pieces so text inside the document or question is never re-expanded.
fn split_at_document(template: &str) -> (&str, &str) {
    template.split_once("{document}").unwrap_or((template, ""))
}
