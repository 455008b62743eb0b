//! Pairing of extracted names with personal IDs for tabular display.
//!
//! Pairing is positional: the name at index `i` gets the ID at index `i`,
//! reusing the last ID once the list runs out. This assumes names and IDs
//! appear in the same document order, which nothing guarantees, so every row
//! records how its ID was chosen.

use serde::{Deserialize, Serialize};

use super::ner::ExtractedEntities;

/// How a row's personal ID was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pairing {
    /// Same index in both lists.
    Positional,
    /// More names than IDs; the last ID was reused.
    Reused,
    /// No IDs were extracted.
    Absent,
}

/// One display row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRow {
    pub name: String,
    pub personal_id: Option<String>,
    pub pairing: Pairing,
}

/// Correlated rows plus any IDs no name was paired with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correlation {
    /// Exactly one row per name, in name order.
    pub rows: Vec<EntityRow>,
    /// IDs beyond the number of names.
    pub unmatched_ids: Vec<String>,
}

/// Pair `names` with `personal_ids` by position.
pub fn correlate(names: &[String], personal_ids: &[String]) -> Correlation {
    let rows = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let (personal_id, pairing) = match personal_ids.len() {
                0 => (None, Pairing::Absent),
                len if i < len => (Some(personal_ids[i].clone()), Pairing::Positional),
                len => (Some(personal_ids[len - 1].clone()), Pairing::Reused),
            };
            EntityRow {
                name: name.clone(),
                personal_id,
                pairing,
            }
        })
        .collect();

    let unmatched_ids = personal_ids.iter().skip(names.len()).cloned().collect();

    Correlation {
        rows,
        unmatched_ids,
    }
}

/// Entity lists and their correlated rows, as returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTable {
    pub names: Vec<String>,
    pub personal_ids: Vec<String>,
    pub company_ids: Vec<String>,
    pub rows: Vec<EntityRow>,
    pub unmatched_ids: Vec<String>,
}

impl From<ExtractedEntities> for EntityTable {
    fn from(entities: ExtractedEntities) -> Self {
        let Correlation {
            rows,
            unmatched_ids,
        } = correlate(&entities.names, &entities.personal_ids);
        Self {
            names: entities.names,
            personal_ids: entities.personal_ids,
            company_ids: entities.company_ids,
            rows,
            unmatched_ids,
        }
    }
}
