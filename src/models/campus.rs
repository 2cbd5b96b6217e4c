//! Campus and school models.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ResourceStatus, Tabular};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campus {
    pub id: String,
    pub name: String,
    pub location: String,
    pub admin_name: String,
    pub admin_email: String,
    #[serde(default)]
    pub user_count: u32,
    pub status: ResourceStatus,
    #[serde(default)]
    pub version: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCampus {
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "is required"))]
    pub location: String,
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub admin_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub admin_email: String,
    #[serde(default)]
    pub user_count: u32,
    #[serde(default)]
    pub status: ResourceStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CampusPatch {
    #[serde(default)]
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub admin_name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub user_count: Option<u32>,
}

/// A school within a campus. Deleting the campus leaves its schools in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: String,
    pub name: String,
    pub campus_id: String,
    pub dean: String,
    #[serde(default)]
    pub department_count: u32,
    #[serde(default)]
    pub student_count: u32,
    #[serde(default)]
    pub version: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSchool {
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "is required"))]
    pub campus_id: String,
    #[validate(length(min = 1, message = "is required"))]
    pub dean: String,
    #[serde(default)]
    pub department_count: u32,
    #[serde(default)]
    pub student_count: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SchoolPatch {
    #[serde(default)]
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub campus_id: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub dean: Option<String>,
    #[serde(default)]
    pub department_count: Option<u32>,
    #[serde(default)]
    pub student_count: Option<u32>,
}

impl Tabular for Campus {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "location",
        "adminName",
        "adminEmail",
        "userCount",
        "status",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "location", "adminName"];

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => Cow::Borrowed(self.id.as_str()),
            "name" => Cow::Borrowed(self.name.as_str()),
            "location" => Cow::Borrowed(self.location.as_str()),
            "adminName" => Cow::Borrowed(self.admin_name.as_str()),
            "adminEmail" => Cow::Borrowed(self.admin_email.as_str()),
            "userCount" => Cow::Owned(self.user_count.to_string()),
            "status" => Cow::Borrowed(self.status.as_str()),
            _ => return None,
        };
        Some(value)
    }
}

impl Tabular for School {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "campusId",
        "dean",
        "departmentCount",
        "studentCount",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "dean", "campusId"];

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => Cow::Borrowed(self.id.as_str()),
            "name" => Cow::Borrowed(self.name.as_str()),
            "campusId" => Cow::Borrowed(self.campus_id.as_str()),
            "dean" => Cow::Borrowed(self.dean.as_str()),
            "departmentCount" => Cow::Owned(self.department_count.to_string()),
            "studentCount" => Cow::Owned(self.student_count.to_string()),
            _ => return None,
        };
        Some(value)
    }
}
