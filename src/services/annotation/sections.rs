//! Legal section detection.
//!
//! A document line enters a section when it contains the section keyword.
//! The active section persists until another marker line is seen.

use serde::{Deserialize, Serialize};

/// Keywords that open a named part of a Spanish contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionMarker {
    /// Identification of the parties.
    Reunidos,
    /// Recitals.
    Exponen,
    /// Clauses heading.
    Clausulas,
    /// First clause.
    Primera,
    /// Termination clause.
    Resolucion,
    /// Governing law and jurisdiction.
    LeyAplicable,
}

/// Markers in detection order. The first keyword found in a line wins.
pub const SECTION_MARKERS: [SectionMarker; 6] = [
    SectionMarker::Reunidos,
    SectionMarker::Exponen,
    SectionMarker::Clausulas,
    SectionMarker::Primera,
    SectionMarker::Resolucion,
    SectionMarker::LeyAplicable,
];

impl SectionMarker {
    pub fn keyword(self) -> &'static str {
        match self {
            SectionMarker::Reunidos => "REUNIDOS",
            SectionMarker::Exponen => "EXPONEN",
            SectionMarker::Clausulas => "CLÁUSULAS",
            SectionMarker::Primera => "PRIMERA",
            SectionMarker::Resolucion => "RESOLUCIÓN",
            SectionMarker::LeyAplicable => "LEY APLICABLE",
        }
    }

    /// Marker whose keyword appears in `line`, honouring detection order.
    /// Matching is case-sensitive: headings are upper case in contract text.
    pub fn detect(line: &str) -> Option<Self> {
        SECTION_MARKERS
            .into_iter()
            .find(|marker| line.contains(marker.keyword()))
    }
}

/// Annotation rules that fire at section boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    ClauseSuggestions,
    AbusiveTermination,
    ArbitrationNote,
}

/// How a line moved the section state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No marker on this line.
    Unchanged,
    /// A marker line entered a different section (or the first one).
    Entered(SectionMarker),
    /// A marker line repeated the keyword of the section already active.
    Repeated(SectionMarker),
}

impl Transition {
    /// Marker found on the line, whether or not it changed the section.
    pub fn marker(self) -> Option<SectionMarker> {
        match self {
            Transition::Unchanged => None,
            Transition::Entered(m) | Transition::Repeated(m) => Some(m),
        }
    }
}

/// Current-section state machine.
///
/// Keeps "which section is active" apart from "which rules already fired for
/// this section entry". Rule history resets only when a different section is
/// entered, so a keyword repeated inside its own section never inserts a
/// second block.
#[derive(Debug, Default)]
pub struct SectionTracker {
    current: Option<SectionMarker>,
    fired: Vec<Rule>,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<SectionMarker> {
        self.current
    }

    /// Feed the next document line.
    pub fn advance(&mut self, line: &str) -> Transition {
        match SectionMarker::detect(line) {
            None => Transition::Unchanged,
            Some(marker) if self.current == Some(marker) => Transition::Repeated(marker),
            Some(marker) => {
                self.current = Some(marker);
                self.fired.clear();
                Transition::Entered(marker)
            }
        }
    }

    pub fn has_fired(&self, rule: Rule) -> bool {
        self.fired.contains(&rule)
    }

    pub fn record(&mut self, rule: Rule) {
        if !self.fired.contains(&rule) {
            self.fired.push(rule);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_uses_marker_order() {
        assert_eq!(
            SectionMarker::detect("SEPTIMA.- RESOLUCIÓN DEL CONTRATO"),
            Some(SectionMarker::Resolucion)
        );
        assert_eq!(
            SectionMarker::detect("OCTAVA.- LEY APLICABLE Y JURISDICCIÓN"),
            Some(SectionMarker::LeyAplicable)
        );
        // Both keywords present: the earlier marker in the list wins.
        assert_eq!(
            SectionMarker::detect("REUNIDOS conforme a las CLÁUSULAS"),
            Some(SectionMarker::Reunidos)
        );
        assert_eq!(SectionMarker::detect("Para la resolución de controversias"), None);
    }

    #[test]
    fn tracker_persists_section_until_next_marker() {
        let mut tracker = SectionTracker::new();
        assert_eq!(tracker.current(), None);
        assert_eq!(
            tracker.advance("OCTAVA.- LEY APLICABLE"),
            Transition::Entered(SectionMarker::LeyAplicable)
        );
        assert_eq!(tracker.advance("se someten al arbitraje."), Transition::Unchanged);
        assert_eq!(tracker.current(), Some(SectionMarker::LeyAplicable));
        assert_eq!(
            tracker.advance("PRIMERA.- OBJETO"),
            Transition::Entered(SectionMarker::Primera)
        );
    }

    #[test]
    fn fired_rules_reset_only_on_new_section() {
        let mut tracker = SectionTracker::new();
        tracker.advance("CLÁUSULAS");
        tracker.record(Rule::ClauseSuggestions);

        assert_eq!(
            tracker.advance("ver CLÁUSULAS anteriores"),
            Transition::Repeated(SectionMarker::Clausulas)
        );
        assert!(tracker.has_fired(Rule::ClauseSuggestions));

        tracker.advance("PRIMERA.- OBJETO");
        assert!(!tracker.has_fired(Rule::ClauseSuggestions));
    }
}
