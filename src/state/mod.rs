//! Dashboard state: value types, the component catalog, the address and UI state.
//!
//! Public re-exports keep the common paths flat under `crate::state::*`.

pub mod address;
pub mod app_state;
pub mod catalog;
pub mod modal;
pub mod types;

pub use address::{Address, AddressHistory};
pub use app_state::{AppState, Tab};
pub use catalog::Catalog;
pub use modal::Modal;
pub use types::{
    Bug, BugFlag, BugList, ComponentKey, ComponentRef, SearchName, SearchStatus, SearchView,
    ViewRow,
};
