//! Aggregate counts behind the dashboard stat cards.

use std::collections::BTreeMap;

use serde::Serialize;

use super::Availability;
use crate::models::{
    Campus, Facility, Request, RequestKind, RequestStatus, ResourceStatus, School, Training, User,
    UserRole,
};
use crate::store::{Activatable, Store};

pub fn count_where<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| predicate(*item)).count()
}

pub fn sum_by<T>(items: &[T], value: impl Fn(&T) -> u64) -> u64 {
    items.iter().map(value).sum()
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl RequestCounts {
    pub fn of(requests: &[Request]) -> Self {
        let with = |status: RequestStatus| count_where(requests, |r: &Request| r.status == status);
        Self {
            total: requests.len(),
            pending: with(RequestStatus::Pending),
            approved: with(RequestStatus::Approved),
            rejected: with(RequestStatus::Rejected),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivationCounts {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl ActivationCounts {
    pub fn of<T: Activatable>(items: &[T]) -> Self {
        let active = count_where(items, |item: &T| item.status() == ResourceStatus::Active);
        Self {
            total: items.len(),
            active,
            inactive: items.len() - active,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingStats {
    #[serde(flatten)]
    pub activation: ActivationCounts,
    /// Keyed by availability name; every bucket is present.
    pub availability: BTreeMap<&'static str, usize>,
    pub total_capacity: u64,
    pub total_enrolled: u64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    /// Keyed by role name; every role is present.
    pub by_role: BTreeMap<&'static str, usize>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub training_requests: RequestCounts,
    pub rental_requests: RequestCounts,
    pub trainings: TrainingStats,
    pub facilities: ActivationCounts,
    pub campuses: ActivationCounts,
    /// Sum of `userCount` across campuses.
    pub campus_users: u64,
    pub schools: usize,
    pub users: UserStats,
}

pub fn dashboard_stats(store: &Store) -> DashboardStats {
    let trainings = store.list::<Training>();
    let users = store.list::<User>();
    let campuses = store.list::<Campus>();

    let availability = Availability::ALL
        .iter()
        .map(|bucket| {
            let count = count_where(trainings, |t: &Training| t.availability() == *bucket);
            (bucket.as_str(), count)
        })
        .collect();

    let by_role = UserRole::ALL
        .iter()
        .map(|role| (role.as_str(), count_where(users, |u: &User| u.role == *role)))
        .collect();

    DashboardStats {
        training_requests: RequestCounts::of(store.requests(RequestKind::Training)),
        rental_requests: RequestCounts::of(store.requests(RequestKind::Rental)),
        trainings: TrainingStats {
            activation: ActivationCounts::of(trainings),
            availability,
            total_capacity: sum_by(trainings, |t| u64::from(t.capacity)),
            total_enrolled: sum_by(trainings, |t| u64::from(t.enrolled_count)),
        },
        facilities: ActivationCounts::of(store.list::<Facility>()),
        campuses: ActivationCounts::of(campuses),
        campus_users: sum_by(campuses, |c| u64::from(c.user_count)),
        schools: store.list::<School>().len(),
        users: UserStats {
            total: users.len(),
            active: count_where(users, |u: &User| u.status == ResourceStatus::Active),
            by_role,
        },
    }
}
