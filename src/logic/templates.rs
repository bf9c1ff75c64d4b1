//! The five named search templates and their client-side post-filters.
//!
//! Field values are the decoded parameter values of Bugzilla's advanced
//! search; [`crate::logic::query::Query`] takes care of encoding them.

use crate::config::ReleaseTrain;
use crate::state::{Bug, SearchName};

/// Client-side predicate applied after fetch for conditions the API cannot express.
pub type PostFilter = fn(&Bug) -> bool;

/// A template field value: a single value or a list expanded into repeated keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// One `key=value` pair.
    One(String),
    /// One `key=value` pair per element, in order.
    Many(Vec<String>),
}

/// Fixed filter parameters of one named search.
#[derive(Clone, Debug)]
pub struct SearchTemplate {
    /// Which search this template drives.
    pub name: SearchName,
    /// Filter fields in the order they are appended to the query.
    pub fields: Vec<(String, FieldValue)>,
    /// Optional predicate applied to fetched bugs.
    pub post_filter: Option<PostFilter>,
}

/// Status values that count as a decision for a release's status field.
const DECIDED_STATUSES: &str =
    "affected,unaffected,fixed,verified,disabled,verified disabled,wontfix,fix-optional";

/// What: Keep bugs that have a needinfo requested from someone other than its setter.
///
/// Inputs:
/// - `bug`: Fetched bug.
///
/// Output:
/// - `true` when at least one `needinfo` flag has `requestee != setter`.
///
/// Details:
/// - Self-needinfos are reminders, not stuck conversations, so they are dropped.
/// - A needinfo without requestee counts as foreign (nobody specific is asked).
#[must_use]
pub fn has_foreign_needinfo(bug: &Bug) -> bool {
    bug.flags
        .iter()
        .any(|f| f.name == "needinfo" && f.requestee.as_deref() != Some(f.setter.as_str()))
}

fn one(pairs: &[(&str, &str)]) -> Vec<(String, FieldValue)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), FieldValue::One((*v).to_string())))
        .collect()
}

/// What: Build the five standard search templates for a release train.
///
/// Inputs:
/// - `train`: Release dates, version numbers and staleness thresholds.
///
/// Output:
/// - Templates in [`SearchName::ALL`] order.
///
/// Details:
/// - Triage: defects filed since the current nightly started, excluding bots,
///   without a pending needinfo, whose severity is unset or whose component is
///   still "Untriaged".
/// - Stale needinfo/review: open requests untouched for the configured number of days.
/// - Stale decision: regressions filed since the next nightly with no decision on the beta status.
/// - Stale range: regressions with no decision on either the release or the beta status.
#[must_use]
pub fn standard_templates(train: &ReleaseTrain) -> Vec<SearchTemplate> {
    let beta_status = train.beta_status_field();
    let release_status = train.release_status_field();
    let needinfo_age = format!("{}d", train.needinfo_stale_days);
    let review_age = format!("{}d", train.review_stale_days);

    let triage = SearchTemplate {
        name: SearchName::Triage,
        fields: one(&[
            ("email1", "intermittent-bug-filer@mozilla.bugs"),
            ("emailreporter1", "1"),
            ("emailtype1", "notequals"),
            ("email2", "wptsync@mozilla.bugs"),
            ("emailreporter2", "1"),
            ("emailtype2", "notequals"),
            ("resolution", "---"),
            ("f1", "bug_type"),
            ("o1", "equals"),
            ("v1", "defect"),
            ("f2", "flagtypes.name"),
            ("o2", "notsubstring"),
            ("v2", "needinfo?"),
            ("f3", "OP"),
            ("f4", "bug_severity"),
            ("o4", "anyexact"),
            ("v4", "--"),
            ("f5", "component"),
            ("o5", "equals"),
            ("v5", "untriaged"),
            ("f6", "CP"),
            ("j3", "OR"),
            ("limit", "0"),
            ("chfield", "[Bug creation]"),
            ("chfieldto", "Now"),
            ("chfieldfrom", train.first_nightly_current.as_str()),
        ]),
        post_filter: None,
    };

    let stale_needinfo = SearchTemplate {
        name: SearchName::StaleNeedinfo,
        fields: one(&[
            ("f1", "flagtypes.name"),
            ("o1", "substring"),
            ("v1", "needinfo"),
            ("f2", "delta_ts"),
            // "lessthan" on delta_ts means "older than"
            ("o2", "lessthan"),
            ("v2", needinfo_age.as_str()),
            ("resolution", "---"),
            ("query_format", "advanced"),
        ]),
        post_filter: Some(has_foreign_needinfo),
    };

    let stale_review = SearchTemplate {
        name: SearchName::StaleReview,
        fields: one(&[
            ("f1", "flagtypes.name"),
            ("o1", "regexp"),
            ("v1", r"^(review|superreview|ui-review|feedback|a11y-review)\?"),
            ("resolution", "---"),
            ("f2", "delta_ts"),
            ("o2", "lessthan"),
            ("v2", review_age.as_str()),
            ("query_format", "advanced"),
        ]),
        post_filter: None,
    };

    let stale_decision = SearchTemplate {
        name: SearchName::StaleDecision,
        fields: one(&[
            ("keywords", "regression"),
            ("keywords_type", "allwords"),
            ("v1", DECIDED_STATUSES),
            ("chfieldto", "Now"),
            ("o1", "nowords"),
            ("chfield", "[Bug creation]"),
            ("chfieldfrom", train.first_nightly_next.as_str()),
            ("f1", beta_status.as_str()),
            ("resolution", "---"),
            ("query_format", "advanced"),
        ]),
        post_filter: None,
    };

    let stale_range = SearchTemplate {
        name: SearchName::StaleRange,
        fields: one(&[
            ("chfield", "[Bug creation]"),
            ("chfieldfrom", train.first_nightly_next.as_str()),
            ("chfieldto", "Now"),
            ("f1", release_status.as_str()),
            ("f2", beta_status.as_str()),
            ("j_top", "OR"),
            ("keywords", "regression"),
            ("keywords_type", "allwords"),
            ("o1", "nowords"),
            ("o2", "nowords"),
            ("query_format", "advanced"),
            ("resolution", "---"),
            ("v1", DECIDED_STATUSES),
            ("v2", DECIDED_STATUSES),
        ]),
        post_filter: None,
    };

    vec![
        triage,
        stale_needinfo,
        stale_review,
        stale_decision,
        stale_range,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::BugFlag;

    fn bug_with_flags(id: u64, flags: &[(&str, Option<&str>, &str)]) -> Bug {
        Bug {
            id,
            flags: flags
                .iter()
                .map(|(name, requestee, setter)| BugFlag {
                    name: (*name).to_string(),
                    requestee: requestee.map(str::to_string),
                    setter: (*setter).to_string(),
                })
                .collect(),
            ..Bug::default()
        }
    }

    fn field<'a>(t: &'a SearchTemplate, key: &str) -> Option<&'a FieldValue> {
        t.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[test]
    /// What: Self-needinfos are filtered out, needinfos to others are kept.
    ///
    /// Inputs:
    /// - Bug with `needinfo` a→a and bug with `needinfo` a→b.
    ///
    /// Output:
    /// - Only the second passes the post-filter.
    fn templates_needinfo_filter_drops_self_requests() {
        let own = bug_with_flags(1, &[("needinfo", Some("a"), "a")]);
        let other = bug_with_flags(2, &[("needinfo", Some("b"), "a")]);
        assert!(!has_foreign_needinfo(&own));
        assert!(has_foreign_needinfo(&other));
    }

    #[test]
    /// What: Non-needinfo flags never satisfy the needinfo filter.
    fn templates_needinfo_filter_ignores_other_flags() {
        let review = bug_with_flags(3, &[("review", Some("b"), "a")]);
        let none = bug_with_flags(4, &[]);
        let mixed = bug_with_flags(
            5,
            &[("needinfo", Some("a"), "a"), ("needinfo", None, "a")],
        );
        assert!(!has_foreign_needinfo(&review));
        assert!(!has_foreign_needinfo(&none));
        assert!(has_foreign_needinfo(&mixed));
    }

    #[test]
    /// What: Templates follow the release train configuration.
    ///
    /// Inputs:
    /// - Default train (release 77, beta 78) with custom staleness thresholds.
    ///
    /// Output:
    /// - Status fields, dates and ages reflect the train.
    fn templates_follow_release_train() {
        let train = ReleaseTrain {
            needinfo_stale_days: 21,
            review_stale_days: 3,
            ..ReleaseTrain::default()
        };
        let ts = standard_templates(&train);
        let names: Vec<SearchName> = ts.iter().map(|t| t.name).collect();
        assert_eq!(names, SearchName::ALL.to_vec());

        let needinfo = &ts[1];
        assert_eq!(field(needinfo, "v2"), Some(&FieldValue::One("21d".into())));
        assert!(needinfo.post_filter.is_some());
        assert_eq!(field(&ts[2], "v2"), Some(&FieldValue::One("3d".into())));
        assert_eq!(
            field(&ts[3], "f1"),
            Some(&FieldValue::One("cf_status_firefox78".into()))
        );
        assert_eq!(
            field(&ts[4], "f1"),
            Some(&FieldValue::One("cf_status_firefox77".into()))
        );
        assert_eq!(
            field(&ts[0], "chfieldfrom"),
            Some(&FieldValue::One(train.first_nightly_current.clone()))
        );
        assert!(
            ts.iter()
                .filter(|t| t.name != SearchName::StaleNeedinfo)
                .all(|t| t.post_filter.is_none())
        );
    }
}
