//! Request review transitions and resource activation toggles.
//!
//! A request starts `Pending` and moves exactly once, to `Approved` or
//! `Rejected`. Both are terminal: a second decision on the same request
//! fails with `InvalidTransition` instead of overwriting the first one.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::{not_found, Activatable, Store};
use crate::errors::AppError;
use crate::models::{NewRequest, Request, RequestKind, RequestStatus, ResourceStatus};

impl Store {
    pub fn requests(&self, kind: RequestKind) -> &[Request] {
        match kind {
            RequestKind::Training => &self.training_requests,
            RequestKind::Rental => &self.rental_requests,
        }
    }

    fn requests_mut(&mut self, kind: RequestKind) -> &mut Vec<Request> {
        match kind {
            RequestKind::Training => &mut self.training_requests,
            RequestKind::Rental => &mut self.rental_requests,
        }
    }

    pub fn get_request(&self, kind: RequestKind, id: &str) -> Result<&Request, AppError> {
        self.requests(kind)
            .iter()
            .find(|request| request.id == id)
            .ok_or_else(|| request_not_found(kind, id))
    }

    /// Record a new submission as `Pending`, dated today.
    pub fn submit_request(
        &mut self,
        kind: RequestKind,
        draft: NewRequest,
    ) -> Result<Request, AppError> {
        draft.validate()?;

        let request = Request {
            id: Uuid::new_v4().to_string(),
            applicant_name: draft.applicant_name,
            applicant_email: draft.applicant_email,
            requested_item: draft.requested_item,
            submission_date: Utc::now().date_naive(),
            status: RequestStatus::Pending,
            motivation: draft.motivation,
            notes: draft.notes,
        };
        self.requests_mut(kind).push(request.clone());
        self.bump_revision();

        tracing::info!(
            "{} {} submitted for '{}'",
            kind.label(),
            request.id,
            request.requested_item
        );
        Ok(request)
    }

    /// Decide a pending request. Only `Pending -> Approved` and
    /// `Pending -> Rejected` exist; nothing but `status` changes.
    pub fn set_request_status(
        &mut self,
        kind: RequestKind,
        id: &str,
        status: RequestStatus,
    ) -> Result<Request, AppError> {
        let request = self
            .requests_mut(kind)
            .iter_mut()
            .find(|request| request.id == id)
            .ok_or_else(|| request_not_found(kind, id))?;

        if request.status.is_terminal() {
            return Err(AppError::InvalidTransition {
                message: format!(
                    "{} {} is already {} and cannot become {}",
                    kind.label(),
                    id,
                    request.status,
                    status
                ),
                current_status: request.status,
            });
        }
        if !status.is_terminal() {
            return Err(AppError::InvalidTransition {
                message: format!("{} {} cannot be set back to {}", kind.label(), id, status),
                current_status: request.status,
            });
        }

        request.status = status;
        let updated = request.clone();
        self.bump_revision();

        tracing::info!("{} {} {}", kind.label(), id, status);
        Ok(updated)
    }

    pub fn delete_request(&mut self, kind: RequestKind, id: &str) -> Result<(), AppError> {
        let requests = self.requests_mut(kind);
        let index = requests
            .iter()
            .position(|request| request.id == id)
            .ok_or_else(|| request_not_found(kind, id))?;
        requests.remove(index);
        self.bump_revision();

        tracing::info!("Deleted {} {}", kind.label(), id);
        Ok(())
    }

    /// Flip a resource's activation flag. Setting the status it already has
    /// changes nothing, including version and revision.
    pub fn set_resource_status<T: Activatable>(
        &mut self,
        id: &str,
        status: ResourceStatus,
    ) -> Result<T, AppError> {
        let record = T::collection_mut(self)
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;

        if record.status() == status {
            return Ok(record.clone());
        }

        record.set_status(status);
        record.set_version(record.version() + 1);
        let updated = record.clone();
        self.bump_revision();

        tracing::info!("{} {} set to {}", T::LABEL, id, status.as_str());
        Ok(updated)
    }
}

fn request_not_found(kind: RequestKind, id: &str) -> AppError {
    AppError::NotFound(format!("{} {} not found", kind.label(), id))
}
