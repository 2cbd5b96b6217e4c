//! Rentable facility model.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ResourceStatus, Tabular};

/// A room, lab or hall listed for rental.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub description: String,
    pub facility_type: String,
    pub location: String,
    pub capacity: u32,
    pub status: ResourceStatus,
    #[serde(default)]
    pub version: i64,
}

/// Request body for creating a facility.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFacility {
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "is required"))]
    pub facility_type: String,
    #[validate(length(min = 1, message = "is required"))]
    pub location: String,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub capacity: u32,
    #[serde(default)]
    pub status: ResourceStatus,
}

/// Request body for updating a facility.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FacilityPatch {
    #[serde(default)]
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub facility_type: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub capacity: Option<u32>,
}

impl Tabular for Facility {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "facilityType",
        "location",
        "capacity",
        "status",
    ];
    const SEARCH_FIELDS: &'static [&'static str] =
        &["name", "description", "facilityType", "location"];

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => Cow::Borrowed(self.id.as_str()),
            "name" => Cow::Borrowed(self.name.as_str()),
            "description" => Cow::Borrowed(self.description.as_str()),
            "facilityType" => Cow::Borrowed(self.facility_type.as_str()),
            "location" => Cow::Borrowed(self.location.as_str()),
            "capacity" => Cow::Owned(self.capacity.to_string()),
            "status" => Cow::Borrowed(self.status.as_str()),
            _ => return None,
        };
        Some(value)
    }
}
