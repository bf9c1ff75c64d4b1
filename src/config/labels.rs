//! Display labels for Bugzilla priority and severity values.
//!
//! The vocabularies drift with Bugzilla's field configuration, so they are
//! data: defaults below, overridable from `settings.conf` with
//! `priority_label.<value> = text` and `severity_label.<value> = text`.

/// Placeholder replaced by the raw value in a fallback label.
pub const VALUE_PLACEHOLDER: &str = "{value}";

/// Mapping from raw field values to human labels, with a fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelTable {
    /// `(lowercased raw value, label)` pairs in display order.
    entries: Vec<(String, String)>,
    /// Label for unknown values; `{value}` is replaced by the raw value.
    fallback: String,
}

impl LabelTable {
    /// Build a table from `(raw, label)` pairs and a fallback template.
    #[must_use]
    pub fn new(entries: &[(&str, &str)], fallback: &str) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(k, v)| (k.to_lowercase(), (*v).to_string()))
                .collect(),
            fallback: fallback.to_string(),
        }
    }

    /// Default priority vocabulary (`--`, `P1`..`P5`).
    #[must_use]
    pub fn default_priorities() -> Self {
        Self::new(
            &[
                ("--", "No Priority"),
                ("p1", "P1: This Release/Iteration"),
                ("p2", "P2: Next Release/Iteration"),
                ("p3", "P3: Backlog"),
                ("p4", "P4: Bot Managed"),
                ("p5", "P5: Won't fix but will accept a patch"),
            ],
            "Undefined (this shouldn't happen; contact the maintainer)",
        )
    }

    /// Default severity vocabulary (`--`, `S1`..`S4` and legacy values).
    #[must_use]
    pub fn default_severities() -> Self {
        Self::new(
            &[
                ("--", "No Severity Set"),
                ("s1", "S1: (Catastrophic)"),
                ("s2", "S2: (Serious)"),
                ("s3", "S3: (Normal)"),
                ("s4", "S4: (Trivial)"),
                ("n/a", "Triage problem: Defects cannot have a severity of N/A"),
                (
                    "normal",
                    "Normal (this is the old default value; and should be reviewed)",
                ),
            ],
            "{value} (This should be updated to the new, correct value)",
        )
    }

    /// What: Look up the label for a raw value.
    ///
    /// Inputs:
    /// - `raw`: Value as returned by Bugzilla; matched case-insensitively.
    ///
    /// Output:
    /// - Configured label, or the fallback with `{value}` replaced by `raw`.
    #[must_use]
    pub fn label(&self, raw: &str) -> String {
        let key = raw.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or_else(
                || self.fallback.replace(VALUE_PLACEHOLDER, raw),
                |(_, v)| v.clone(),
            )
    }

    /// Insert or replace the label for `raw`.
    pub fn set(&mut self, raw: &str, label: &str) {
        let key = raw.trim().to_lowercase();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = label.to_string();
        } else {
            self.entries.push((key, label.to_string()));
        }
    }

    /// Replace the fallback template.
    pub fn set_fallback(&mut self, fallback: &str) {
        self.fallback = fallback.to_string();
    }
}

/// Priority and severity label tables used when projecting rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelTables {
    /// Priority labels.
    pub priority: LabelTable,
    /// Severity labels.
    pub severity: LabelTable,
}

impl Default for LabelTables {
    fn default() -> Self {
        Self {
            priority: LabelTable::default_priorities(),
            severity: LabelTable::default_severities(),
        }
    }
}
