//! Training enrollment and facility rental requests.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{opt_field, Tabular};

/// Which request collection an operation targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Training,
    Rental,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Training => "training",
            RequestKind::Rental => "rental",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Training => "Training request",
            RequestKind::Rental => "Rental request",
        }
    }
}

/// Review state of a request. `Pending` is initial, the others are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An applicant's submission. Only `status` changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    /// Display name of the training or facility; not a foreign key.
    pub requested_item: String,
    pub submission_date: NaiveDate,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request body for submitting a new request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub applicant_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub applicant_email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub requested_item: String,
    #[serde(default)]
    pub motivation: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for a status transition.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestStatusChange {
    pub status: RequestStatus,
}

impl Tabular for Request {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "applicantName",
        "applicantEmail",
        "requestedItem",
        "submissionDate",
        "status",
        "motivation",
        "notes",
    ];
    const SEARCH_FIELDS: &'static [&'static str] =
        &["applicantName", "applicantEmail", "requestedItem"];

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => Cow::Borrowed(self.id.as_str()),
            "applicantName" => Cow::Borrowed(self.applicant_name.as_str()),
            "applicantEmail" => Cow::Borrowed(self.applicant_email.as_str()),
            "requestedItem" => Cow::Borrowed(self.requested_item.as_str()),
            "submissionDate" => Cow::Owned(self.submission_date.to_string()),
            "status" => Cow::Borrowed(self.status.as_str()),
            "motivation" => opt_field(&self.motivation),
            "notes" => opt_field(&self.notes),
            _ => return None,
        };
        Some(value)
    }
}
