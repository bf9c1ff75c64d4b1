//! Core non-UI logic: query building, request tracking, reconciliation and the dashboard engine.

pub mod dashboard;
pub mod query;
pub mod reconcile;
pub mod templates;
pub mod tracker;

pub use dashboard::{Dashboard, EditError, Payload, RequestKey, TrackerEvent};
pub use query::{CommonParams, Query, build_query};
pub use reconcile::{Reconciled, RowFormat, reconcile};
pub use templates::{SearchTemplate, standard_templates};
