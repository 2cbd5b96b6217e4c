//! User account model.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{opt_field, ResourceStatus, Tabular};

/// Dashboard a user signs in to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserRole {
    SystemAdmin,
    CampusAdmin,
    Public,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::SystemAdmin, UserRole::CampusAdmin, UserRole::Public];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SystemAdmin => "SystemAdmin",
            UserRole::CampusAdmin => "CampusAdmin",
            UserRole::Public => "Public",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campus_id: Option<String>,
    pub status: ResourceStatus,
    #[serde(default)]
    pub version: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub campus_id: Option<String>,
    #[serde(default)]
    pub status: ResourceStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default)]
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub campus_id: Option<String>,
    #[serde(default)]
    pub status: Option<ResourceStatus>,
}

impl Tabular for User {
    const FIELDS: &'static [&'static str] = &["id", "name", "email", "role", "campusId", "status"];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email"];

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => Cow::Borrowed(self.id.as_str()),
            "name" => Cow::Borrowed(self.name.as_str()),
            "email" => Cow::Borrowed(self.email.as_str()),
            "role" => Cow::Borrowed(self.role.as_str()),
            "campusId" => opt_field(&self.campus_id),
            "status" => Cow::Borrowed(self.status.as_str()),
            _ => return None,
        };
        Some(value)
    }
}
