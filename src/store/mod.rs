//! The authoritative in-memory store.
//!
//! `Store` is synchronous and does no I/O; [`SharedStore`] adds locking and
//! snapshot persistence around it.

mod lifecycle;
mod seed;
mod shared;

pub use seed::seed;
pub use shared::SharedStore;

use std::collections::BTreeMap;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::errors::AppError;
use crate::models::{
    Campus, CampusPatch, Datastore, Facility, FacilityPatch, NewCampus, NewFacility, NewSchool,
    NewTraining, NewUser, Request, ResourceStatus, RevisionInfo, School, SchoolPatch, Tabular,
    Training, TrainingPatch, TrainingView, User, UserPatch, SCHEMA_VERSION,
};

/// A record kept in a prefixed-id collection with full CRUD.
pub trait Entity:
    Tabular + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Human-readable name used in messages and logs.
    const LABEL: &'static str;
    /// URL segment and CSV file stem.
    const PATH: &'static str;
    const ID_PREFIX: &'static str;

    type Draft: DeserializeOwned + Validate + Send + 'static;
    type Patch: DeserializeOwned + Validate + Send + 'static;
    /// Shape returned by the API.
    type View: Serialize + Send + 'static;

    fn id(&self) -> &str;
    fn version(&self) -> i64;
    fn set_version(&mut self, version: i64);

    fn from_draft(id: String, draft: Self::Draft) -> Self;
    fn apply_patch(&mut self, patch: Self::Patch);
    fn view(&self) -> Self::View;

    fn collection(store: &Store) -> &Vec<Self>;
    fn collection_mut(store: &mut Store) -> &mut Vec<Self>;
}

/// An entity with an independently togglable Active/Inactive flag.
pub trait Activatable: Entity {
    fn status(&self) -> ResourceStatus;
    fn set_status(&mut self, status: ResourceStatus);
}

/// All collections, id sequences and the revision counter.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub(crate) training_requests: Vec<Request>,
    pub(crate) rental_requests: Vec<Request>,
    pub(crate) trainings: Vec<Training>,
    pub(crate) facilities: Vec<Facility>,
    pub(crate) campuses: Vec<Campus>,
    pub(crate) schools: Vec<School>,
    pub(crate) users: Vec<User>,
    sequences: BTreeMap<String, u32>,
    revision_id: i64,
    generated_at: String,
}

impl Store {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            ..Self::default()
        }
    }

    /// Restore a store from a snapshot. Missing sequences are recomputed from
    /// the highest id suffix present so ids are never reissued.
    pub fn from_datastore(datastore: Datastore) -> Self {
        let mut store = Self {
            training_requests: datastore.training_requests,
            rental_requests: datastore.rental_requests,
            trainings: datastore.trainings,
            facilities: datastore.facilities,
            campuses: datastore.campuses,
            schools: datastore.schools,
            users: datastore.users,
            sequences: datastore.sequences,
            revision_id: datastore.revision_id,
            generated_at: datastore.generated_at,
        };
        store.reconcile_sequence::<Training>();
        store.reconcile_sequence::<Facility>();
        store.reconcile_sequence::<Campus>();
        store.reconcile_sequence::<School>();
        store.reconcile_sequence::<User>();
        store
    }

    pub fn datastore(&self) -> Datastore {
        Datastore {
            schema_version: SCHEMA_VERSION,
            generated_at: self.generated_at.clone(),
            revision_id: self.revision_id,
            sequences: self.sequences.clone(),
            training_requests: self.training_requests.clone(),
            rental_requests: self.rental_requests.clone(),
            trainings: self.trainings.clone(),
            facilities: self.facilities.clone(),
            campuses: self.campuses.clone(),
            schools: self.schools.clone(),
            users: self.users.clone(),
        }
    }

    pub fn revision_id(&self) -> i64 {
        self.revision_id
    }

    pub fn revision_info(&self) -> RevisionInfo {
        RevisionInfo {
            revision_id: self.revision_id,
            generated_at: self.generated_at.clone(),
        }
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision_id += 1;
        self.generated_at = Utc::now().to_rfc3339();
    }

    // ==================== GENERIC ENTITY OPERATIONS ====================

    pub fn list<T: Entity>(&self) -> &[T] {
        T::collection(self)
    }

    pub fn get<T: Entity>(&self, id: &str) -> Result<&T, AppError> {
        T::collection(self)
            .iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| not_found::<T>(id))
    }

    /// Validate the draft, assign the next id and append the record.
    pub fn create<T: Entity>(&mut self, draft: T::Draft) -> Result<T, AppError> {
        draft.validate()?;

        let id = self.next_id::<T>();
        let record = T::from_draft(id, draft);
        T::collection_mut(self).push(record.clone());
        self.bump_revision();

        tracing::info!("Created {} {}", T::LABEL, record.id());
        Ok(record)
    }

    /// Apply a partial update, optionally guarded by the caller's last seen version.
    ///
    /// A patch that leaves every field as it was changes nothing, including
    /// version and revision.
    pub fn update<T: Entity>(
        &mut self,
        id: &str,
        patch: T::Patch,
        expected_version: Option<i64>,
    ) -> Result<T, AppError> {
        patch.validate()?;

        let record = T::collection_mut(self)
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;

        if let Some(expected) = expected_version {
            if record.version() != expected {
                return Err(AppError::Conflict {
                    message: format!(
                        "Version mismatch: expected {}, current {}",
                        expected,
                        record.version()
                    ),
                    current_version: record.version(),
                });
            }
        }

        let mut updated = record.clone();
        updated.apply_patch(patch);
        if updated == *record {
            return Ok(updated);
        }

        updated.set_version(record.version() + 1);
        *record = updated.clone();
        self.bump_revision();

        tracing::info!("Updated {} {}", T::LABEL, id);
        Ok(updated)
    }

    /// Remove a record unconditionally. Nothing cascades.
    pub fn delete<T: Entity>(&mut self, id: &str) -> Result<(), AppError> {
        let collection = T::collection_mut(self);
        let index = collection
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        collection.remove(index);
        self.bump_revision();

        tracing::info!("Deleted {} {}", T::LABEL, id);
        Ok(())
    }

    fn next_id<T: Entity>(&mut self) -> String {
        let next = self.sequences.get(T::PATH).copied().unwrap_or(0) + 1;
        self.sequences.insert(T::PATH.to_string(), next);
        format!("{}{:03}", T::ID_PREFIX, next)
    }

    fn reconcile_sequence<T: Entity>(&mut self) {
        let highest = T::collection(self)
            .iter()
            .filter_map(|record| id_suffix(record.id(), T::ID_PREFIX))
            .max()
            .unwrap_or(0);
        let entry = self.sequences.entry(T::PATH.to_string()).or_insert(0);
        *entry = (*entry).max(highest);
    }
}

fn id_suffix(id: &str, prefix: &str) -> Option<u32> {
    id.strip_prefix(prefix)?.parse().ok()
}

pub(crate) fn not_found<T: Entity>(id: &str) -> AppError {
    AppError::NotFound(format!("{} {} not found", T::LABEL, id))
}

// ==================== ENTITY IMPLEMENTATIONS ====================

impl Entity for Training {
    const LABEL: &'static str = "Training";
    const PATH: &'static str = "trainings";
    const ID_PREFIX: &'static str = "T";

    type Draft = NewTraining;
    type Patch = TrainingPatch;
    type View = TrainingView;

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn from_draft(id: String, draft: NewTraining) -> Self {
        Training {
            id,
            title: draft.title,
            description: draft.description,
            instructor: draft.instructor,
            category: draft.category,
            start_date: draft.start_date,
            end_date: draft.end_date,
            schedule: draft.schedule,
            capacity: draft.capacity,
            enrolled_count: 0,
            status: draft.status,
            version: 1,
        }
    }

    fn apply_patch(&mut self, patch: TrainingPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(instructor) = patch.instructor {
            self.instructor = instructor;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(schedule) = patch.schedule {
            self.schedule = schedule;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
    }

    fn view(&self) -> TrainingView {
        TrainingView {
            training: self.clone(),
            availability: self.availability(),
        }
    }

    fn collection(store: &Store) -> &Vec<Self> {
        &store.trainings
    }

    fn collection_mut(store: &mut Store) -> &mut Vec<Self> {
        &mut store.trainings
    }
}

impl Activatable for Training {
    fn status(&self) -> ResourceStatus {
        self.status
    }

    fn set_status(&mut self, status: ResourceStatus) {
        self.status = status;
    }
}

impl Entity for Facility {
    const LABEL: &'static str = "Facility";
    const PATH: &'static str = "facilities";
    const ID_PREFIX: &'static str = "F";

    type Draft = NewFacility;
    type Patch = FacilityPatch;
    type View = Facility;

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn from_draft(id: String, draft: NewFacility) -> Self {
        Facility {
            id,
            name: draft.name,
            description: draft.description,
            facility_type: draft.facility_type,
            location: draft.location,
            capacity: draft.capacity,
            status: draft.status,
            version: 1,
        }
    }

    fn apply_patch(&mut self, patch: FacilityPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(facility_type) = patch.facility_type {
            self.facility_type = facility_type;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
    }

    fn view(&self) -> Facility {
        self.clone()
    }

    fn collection(store: &Store) -> &Vec<Self> {
        &store.facilities
    }

    fn collection_mut(store: &mut Store) -> &mut Vec<Self> {
        &mut store.facilities
    }
}

impl Activatable for Facility {
    fn status(&self) -> ResourceStatus {
        self.status
    }

    fn set_status(&mut self, status: ResourceStatus) {
        self.status = status;
    }
}

impl Entity for Campus {
    const LABEL: &'static str = "Campus";
    const PATH: &'static str = "campuses";
    const ID_PREFIX: &'static str = "C";

    type Draft = NewCampus;
    type Patch = CampusPatch;
    type View = Campus;

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn from_draft(id: String, draft: NewCampus) -> Self {
        Campus {
            id,
            name: draft.name,
            location: draft.location,
            admin_name: draft.admin_name,
            admin_email: draft.admin_email,
            user_count: draft.user_count,
            status: draft.status,
            version: 1,
        }
    }

    fn apply_patch(&mut self, patch: CampusPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(admin_name) = patch.admin_name {
            self.admin_name = admin_name;
        }
        if let Some(admin_email) = patch.admin_email {
            self.admin_email = admin_email;
        }
        if let Some(user_count) = patch.user_count {
            self.user_count = user_count;
        }
    }

    fn view(&self) -> Campus {
        self.clone()
    }

    fn collection(store: &Store) -> &Vec<Self> {
        &store.campuses
    }

    fn collection_mut(store: &mut Store) -> &mut Vec<Self> {
        &mut store.campuses
    }
}

impl Activatable for Campus {
    fn status(&self) -> ResourceStatus {
        self.status
    }

    fn set_status(&mut self, status: ResourceStatus) {
        self.status = status;
    }
}

impl Entity for School {
    const LABEL: &'static str = "School";
    const PATH: &'static str = "schools";
    const ID_PREFIX: &'static str = "S";

    type Draft = NewSchool;
    type Patch = SchoolPatch;
    type View = School;

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn from_draft(id: String, draft: NewSchool) -> Self {
        School {
            id,
            name: draft.name,
            campus_id: draft.campus_id,
            dean: draft.dean,
            department_count: draft.department_count,
            student_count: draft.student_count,
            version: 1,
        }
    }

    fn apply_patch(&mut self, patch: SchoolPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(campus_id) = patch.campus_id {
            self.campus_id = campus_id;
        }
        if let Some(dean) = patch.dean {
            self.dean = dean;
        }
        if let Some(department_count) = patch.department_count {
            self.department_count = department_count;
        }
        if let Some(student_count) = patch.student_count {
            self.student_count = student_count;
        }
    }

    fn view(&self) -> School {
        self.clone()
    }

    fn collection(store: &Store) -> &Vec<Self> {
        &store.schools
    }

    fn collection_mut(store: &mut Store) -> &mut Vec<Self> {
        &mut store.schools
    }
}

impl Entity for User {
    const LABEL: &'static str = "User";
    const PATH: &'static str = "users";
    const ID_PREFIX: &'static str = "U";

    type Draft = NewUser;
    type Patch = UserPatch;
    type View = User;

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn from_draft(id: String, draft: NewUser) -> Self {
        User {
            id,
            name: draft.name,
            email: draft.email,
            role: draft.role,
            campus_id: draft.campus_id,
            status: draft.status,
            version: 1,
        }
    }

    fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if patch.campus_id.is_some() {
            self.campus_id = patch.campus_id;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn view(&self) -> User {
        self.clone()
    }

    fn collection(store: &Store) -> &Vec<Self> {
        &store.users
    }

    fn collection_mut(store: &mut Store) -> &mut Vec<Self> {
        &mut store.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_training(title: &str) -> NewTraining {
        NewTraining {
            title: title.to_string(),
            description: "Hands-on introduction".to_string(),
            instructor: "Dr. Wanjiru".to_string(),
            category: "Technology".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
            schedule: "Mon/Wed 14:00".to_string(),
            capacity: 30,
            status: ResourceStatus::Active,
        }
    }

    #[test]
    fn test_create_assigns_prefixed_ids_and_defaults() {
        let mut store = Store::new();
        let first = store.create::<Training>(new_training("Rust Basics")).unwrap();
        let second = store.create::<Training>(new_training("Data Science")).unwrap();

        assert_eq!(first.id, "T001");
        assert_eq!(second.id, "T002");
        assert_eq!(first.enrolled_count, 0);
        assert_eq!(first.version, 1);
        assert_eq!(store.list::<Training>().len(), 2);
        assert_eq!(store.revision_id(), 2);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut store = Store::new();
        store.create::<Training>(new_training("Rust Basics")).unwrap();
        let second = store.create::<Training>(new_training("Data Science")).unwrap();
        store.delete::<Training>(&second.id).unwrap();

        let third = store.create::<Training>(new_training("Cloud Ops")).unwrap();
        assert_eq!(third.id, "T003");
    }

    #[test]
    fn test_create_rejects_invalid_draft() {
        let mut store = Store::new();
        let err = store.create::<Training>(new_training("AI")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut draft = new_training("Rust Basics");
        draft.capacity = 0;
        assert!(store.create::<Training>(draft).is_err());

        assert!(store.list::<Training>().is_empty());
        assert_eq!(store.revision_id(), 0);
    }

    #[test]
    fn test_update_applies_patch_and_checks_version() {
        let mut store = Store::new();
        let training = store.create::<Training>(new_training("Rust Basics")).unwrap();

        let patch = TrainingPatch {
            capacity: Some(45),
            ..Default::default()
        };
        let updated = store.update::<Training>(&training.id, patch, Some(1)).unwrap();
        assert_eq!(updated.capacity, 45);
        assert_eq!(updated.title, "Rust Basics");
        assert_eq!(updated.version, 2);

        let stale = TrainingPatch {
            title: Some("Rust Advanced".to_string()),
            ..Default::default()
        };
        let err = store.update::<Training>(&training.id, stale, Some(1)).unwrap_err();
        assert_eq!(
            err,
            AppError::Conflict {
                message: "Version mismatch: expected 1, current 2".to_string(),
                current_version: 2,
            }
        );
        assert_eq!(store.get::<Training>(&training.id).unwrap().title, "Rust Basics");
    }

    #[test]
    fn test_update_without_changes_keeps_version_and_revision() {
        let mut store = Store::new();
        let training = store.create::<Training>(new_training("Rust Basics")).unwrap();
        let revision = store.revision_id();

        // Unknown keys such as `status` are dropped, leaving an empty patch.
        let empty: TrainingPatch = serde_json::from_str(r#"{"status":"Inactive"}"#).unwrap();
        let unchanged = store.update::<Training>(&training.id, empty, None).unwrap();
        assert_eq!(unchanged, training);

        let same_values = TrainingPatch {
            title: Some(training.title.clone()),
            capacity: Some(training.capacity),
            ..Default::default()
        };
        let unchanged = store
            .update::<Training>(&training.id, same_values, Some(1))
            .unwrap();
        assert_eq!(unchanged.version, 1);
        assert_eq!(unchanged.status, ResourceStatus::Active);
        assert_eq!(store.revision_id(), revision);
        assert_eq!(store.get::<Training>(&training.id).unwrap(), &training);
    }

    #[test]
    fn test_update_rejects_invalid_patch() {
        let mut store = Store::new();
        let training = store.create::<Training>(new_training("Rust Basics")).unwrap();
        let patch = TrainingPatch {
            title: Some("x".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store.update::<Training>(&training.id, patch, None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_delete_missing_id_leaves_collection_unchanged() {
        let mut store = Store::new();
        store.create::<Training>(new_training("Rust Basics")).unwrap();
        let before = store.list::<Training>().to_vec();
        let revision = store.revision_id();

        let err = store.delete::<Training>("T999").unwrap_err();
        assert_eq!(err, AppError::NotFound("Training T999 not found".to_string()));
        assert_eq!(store.list::<Training>(), before.as_slice());
        assert_eq!(store.revision_id(), revision);
    }

    #[test]
    fn test_datastore_round_trip_recomputes_missing_sequences() {
        let mut store = Store::new();
        store.create::<Training>(new_training("Rust Basics")).unwrap();
        store.create::<Training>(new_training("Data Science")).unwrap();

        let mut snapshot = store.datastore();
        snapshot.sequences.clear();

        let mut restored = Store::from_datastore(snapshot);
        assert_eq!(restored.revision_id(), store.revision_id());
        let next = restored.create::<Training>(new_training("Cloud Ops")).unwrap();
        assert_eq!(next.id, "T003");
    }
}
