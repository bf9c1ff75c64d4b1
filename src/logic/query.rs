//! Query builder: selection + search template → Bugzilla query parameters.

use url::form_urlencoded;

use crate::logic::templates::{FieldValue, SearchTemplate};

/// Product/component filters shared by every named search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommonParams {
    /// Selected product names.
    pub products: Vec<String>,
    /// Selected component names.
    pub components: Vec<String>,
}

impl CommonParams {
    /// Whether no product and no component is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.components.is_empty()
    }
}

/// An ordered multiset of query parameters.
///
/// Multi-valued fields are stored as repeated keys, never comma-joined.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    /// Empty query.
    #[must_use]
    pub const fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Append one `key=value` pair.
    pub fn append(&mut self, key: &str, value: &str) {
        self.params.push((key.to_string(), value.to_string()));
    }

    /// All pairs in insertion order.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Values recorded for `key`, in insertion order.
    #[must_use]
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Whether any parameter has `value` as its value.
    #[must_use]
    pub fn mentions(&self, value: &str) -> bool {
        self.params.iter().any(|(_, v)| v == value)
    }

    /// Form-encoded representation without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }
}

/// What: Build the full query for one named search.
///
/// Inputs:
/// - `template`: Fixed filter fields of the search.
/// - `common`: Selected products and components.
///
/// Output:
/// - `Query` with `product` pairs, then `component` pairs, then the template fields.
///
/// Details:
/// - Pure and deterministic: the same inputs always yield the same pairs in the same order.
/// - List-valued template fields are expanded into repeated keys.
#[must_use]
pub fn build_query(template: &SearchTemplate, common: &CommonParams) -> Query {
    let mut q = Query::new();
    for p in &common.products {
        q.append("product", p);
    }
    for c in &common.components {
        q.append("component", c);
    }
    for (key, value) in &template.fields {
        match value {
            FieldValue::One(v) => q.append(key, v),
            FieldValue::Many(vs) => {
                for v in vs {
                    q.append(key, v);
                }
            }
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReleaseTrain;
    use crate::logic::templates::standard_templates;
    use crate::state::SearchName;
    use crate::state::catalog::Catalog;
    use crate::state::types::ComponentRef;

    fn triage_template() -> SearchTemplate {
        standard_templates(&ReleaseTrain::default())
            .into_iter()
            .find(|t| t.name == SearchName::Triage)
            .expect("triage template exists")
    }

    #[test]
    /// What: Selecting `A:1` out of `[A:1, B:2]` filters the triage query to A/1 only.
    ///
    /// Inputs:
    /// - Catalog with products A and B, components 1 and 2; only `A:1` selected.
    ///
    /// Output:
    /// - `product=A` and `component=1` are present alongside the template fields;
    ///   nothing refers to `B` or `2`.
    fn query_triage_scoped_to_selected_component() {
        let mut catalog = Catalog::new(vec![
            ComponentRef {
                product_id: 1,
                product_name: "A".into(),
                component_id: 1,
                component_name: "1".into(),
                description: String::new(),
                selected: false,
            },
            ComponentRef {
                product_id: 2,
                product_name: "B".into(),
                component_id: 2,
                component_name: "2".into(),
                description: String::new(),
                selected: false,
            },
        ]);
        catalog.from_address(&["A:1"]);
        let q = build_query(&triage_template(), &catalog.common_params());
        assert_eq!(q.values("product"), vec!["A"]);
        assert_eq!(q.values("component"), vec!["1"]);
        assert!(!q.mentions("B"));
        assert!(!q.mentions("2"));
        assert_eq!(q.values("resolution"), vec!["---"]);
        assert_eq!(q.values("v1"), vec!["defect"]);
        let qs = q.to_query_string();
        assert!(qs.starts_with("product=A&component=1&"));
    }

    #[test]
    /// What: Multi-valued fields repeat the key in input order.
    fn query_multi_values_repeat_key() {
        let template = SearchTemplate {
            name: SearchName::StaleReview,
            fields: vec![
                (
                    "bug_status".to_string(),
                    FieldValue::Many(vec!["NEW".into(), "ASSIGNED".into()]),
                ),
                ("limit".to_string(), FieldValue::One("0".into())),
            ],
            post_filter: None,
        };
        let common = CommonParams {
            products: vec!["Core".into(), "Toolkit".into()],
            components: vec!["General".into()],
        };
        let q = build_query(&template, &common);
        assert_eq!(q.values("product"), vec!["Core", "Toolkit"]);
        assert_eq!(q.values("bug_status"), vec!["NEW", "ASSIGNED"]);
        assert_eq!(
            q.to_query_string(),
            "product=Core&product=Toolkit&component=General&bug_status=NEW&bug_status=ASSIGNED&limit=0"
        );
        assert_eq!(build_query(&template, &common), q);
    }

    #[test]
    /// What: Values with reserved characters are form-encoded once.
    fn query_encodes_reserved_characters() {
        let mut q = Query::new();
        q.append("email1", "intermittent-bug-filer@mozilla.bugs");
        q.append("v2", "needinfo?");
        q.append("chfield", "[Bug creation]");
        assert_eq!(
            q.to_query_string(),
            "email1=intermittent-bug-filer%40mozilla.bugs&v2=needinfo%3F&chfield=%5BBug+creation%5D"
        );
    }
}
