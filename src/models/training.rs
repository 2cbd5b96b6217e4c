//! Training program model.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ResourceStatus, Tabular};
use crate::views::{classify_availability, Availability};

/// A training program open for enrollment requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub id: String,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub schedule: String,
    pub capacity: u32,
    /// Supplied by seed data or snapshots; no operation increments it.
    #[serde(default)]
    pub enrolled_count: u32,
    pub status: ResourceStatus,
    #[serde(default)]
    pub version: i64,
}

impl Training {
    pub fn availability(&self) -> Availability {
        classify_availability(self.enrolled_count, self.capacity)
    }
}

/// A training as returned by the API, with availability computed on read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingView {
    #[serde(flatten)]
    pub training: Training,
    pub availability: Availability,
}

/// Request body for creating a training.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTraining {
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "is required"))]
    pub instructor: String,
    #[validate(length(min = 1, message = "is required"))]
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub schedule: String,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub capacity: u32,
    #[serde(default)]
    pub status: ResourceStatus,
}

/// Request body for updating a training.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPatch {
    #[serde(default)]
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub instructor: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub category: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub capacity: Option<u32>,
}

impl Tabular for Training {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "instructor",
        "category",
        "startDate",
        "endDate",
        "schedule",
        "capacity",
        "enrolledCount",
        "availability",
        "status",
    ];
    const SEARCH_FIELDS: &'static [&'static str] =
        &["title", "description", "instructor", "category"];

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => Cow::Borrowed(self.id.as_str()),
            "title" => Cow::Borrowed(self.title.as_str()),
            "description" => Cow::Borrowed(self.description.as_str()),
            "instructor" => Cow::Borrowed(self.instructor.as_str()),
            "category" => Cow::Borrowed(self.category.as_str()),
            "startDate" => Cow::Owned(self.start_date.to_string()),
            "endDate" => Cow::Owned(self.end_date.to_string()),
            "schedule" => Cow::Borrowed(self.schedule.as_str()),
            "capacity" => Cow::Owned(self.capacity.to_string()),
            "enrolledCount" => Cow::Owned(self.enrolled_count.to_string()),
            "availability" => Cow::Borrowed(self.availability().as_str()),
            "status" => Cow::Borrowed(self.status.as_str()),
            _ => return None,
        };
        Some(value)
    }
}
