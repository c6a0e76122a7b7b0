//! Template vs layout key coverage.

use std::collections::BTreeSet;

use keycap_match::KeyLayout;
use serde::Serialize;
use serde_json::{Map, Value};

/// Template sections whose object keys are key ids.
pub const KEYED_SECTIONS: [&str; 3] = ["customizedColor", "customizedTemplate", "customizedContent"];

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct CoverageReport {
    /// Referenced by the template but absent from the layout.
    pub missing_from_layout: BTreeSet<String>,
    /// In the layout but referenced by no template section.
    pub unreferenced: BTreeSet<String>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.missing_from_layout.is_empty() && self.unreferenced.is_empty()
    }
}

/// Key ids referenced by any keyed section of the template.
pub fn referenced_keys(template: &Map<String, Value>) -> BTreeSet<String> {
    KEYED_SECTIONS
        .iter()
        .filter_map(|section| template.get(*section).and_then(Value::as_object))
        .flat_map(|section| section.keys().cloned())
        .collect()
}

pub fn coverage(layout: &KeyLayout, template: &Map<String, Value>) -> CoverageReport {
    let referenced = referenced_keys(template);
    let known: BTreeSet<String> = layout.key_ids().map(str::to_string).collect();

    CoverageReport {
        missing_from_layout: referenced.difference(&known).cloned().collect(),
        unreferenced: known.difference(&referenced).cloned().collect(),
    }
}
