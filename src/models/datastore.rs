//! Datastore snapshot model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Campus, Facility, Request, School, Training, User};

pub const SCHEMA_VERSION: i32 = 1;

/// Every collection plus the counters needed to restore the store exactly.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Datastore {
    pub schema_version: i32,
    pub generated_at: String,
    pub revision_id: i64,
    /// Last issued numeric id suffix per prefixed collection.
    #[serde(default)]
    pub sequences: BTreeMap<String, u32>,
    #[serde(default)]
    pub training_requests: Vec<Request>,
    #[serde(default)]
    pub rental_requests: Vec<Request>,
    #[serde(default)]
    pub trainings: Vec<Training>,
    #[serde(default)]
    pub facilities: Vec<Facility>,
    #[serde(default)]
    pub campuses: Vec<Campus>,
    #[serde(default)]
    pub schools: Vec<School>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
