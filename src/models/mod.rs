//! Data models for the campus resources backend.
//!
//! Field names serialize in camelCase to match the dashboard's record shapes.

mod campus;
mod datastore;
mod facility;
mod request;
mod training;
mod user;

pub use campus::*;
pub use datastore::*;
pub use facility::*;
pub use request::*;
pub use training::*;
pub use user::*;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Activation flag shared by trainings, facilities, campuses and users.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ResourceStatus {
    #[default]
    Active,
    Inactive,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Active => "Active",
            ResourceStatus::Inactive => "Inactive",
        }
    }
}

/// Named, text-rendered access to a record's fields.
///
/// `FIELDS` doubles as the CSV column order. `field` returns `None` only for
/// names outside `FIELDS`; empty optional values render as `""`.
pub trait Tabular {
    const FIELDS: &'static [&'static str];
    /// Fields consulted by the free-text filter when the caller names none.
    const SEARCH_FIELDS: &'static [&'static str];

    fn field(&self, name: &str) -> Option<Cow<'_, str>>;

    fn is_field(name: &str) -> bool {
        Self::FIELDS.contains(&name)
    }
}

fn opt_field(value: &Option<String>) -> Cow<'_, str> {
    Cow::Borrowed(value.as_deref().unwrap_or(""))
}
