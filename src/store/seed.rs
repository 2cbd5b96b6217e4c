//! Built-in sample collections, served when no snapshot can be loaded.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::Store;
use crate::models::{
    Campus, Datastore, Facility, Request, RequestStatus, ResourceStatus, School, Training, User,
    UserRole, SCHEMA_VERSION,
};

pub fn seed() -> Store {
    Store::from_datastore(Datastore {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        revision_id: 0,
        sequences: BTreeMap::new(),
        training_requests: vec![
            request(
                "Achieng Odhiambo",
                "achieng.odhiambo@student.uni.edu",
                "Introduction to Data Science",
                date(2025, 9, 2),
                RequestStatus::Pending,
                Some("Preparing for a research assistant role"),
            ),
            request(
                "Tomás Rivera",
                "t.rivera@student.uni.edu",
                "Project Management Essentials",
                date(2025, 8, 27),
                RequestStatus::Approved,
                None,
            ),
            request(
                "Leila Haddad",
                "leila.haddad@mail.com",
                "Advanced Laboratory Safety",
                date(2025, 8, 30),
                RequestStatus::Rejected,
                Some("Required before lab access"),
            ),
        ],
        rental_requests: vec![
            request(
                "Student Union",
                "events@union.uni.edu",
                "Main Auditorium",
                date(2025, 9, 1),
                RequestStatus::Pending,
                Some("Welcome week assembly"),
            ),
            request(
                "Dr. Samuel Kimani",
                "s.kimani@uni.edu",
                "Computer Lab 2",
                date(2025, 8, 25),
                RequestStatus::Approved,
                None,
            ),
        ],
        trainings: vec![
            Training {
                id: "T001".to_string(),
                title: "Introduction to Data Science".to_string(),
                description: "Python, statistics and visualisation fundamentals".to_string(),
                instructor: "Dr. Wanjiru Mwangi".to_string(),
                category: "Technology".to_string(),
                start_date: date(2025, 10, 6),
                end_date: date(2025, 12, 12),
                schedule: "Mon/Wed 14:00-16:00".to_string(),
                capacity: 40,
                enrolled_count: 22,
                status: ResourceStatus::Active,
                version: 1,
            },
            Training {
                id: "T002".to_string(),
                title: "Project Management Essentials".to_string(),
                description: "Planning, scheduling and stakeholder communication".to_string(),
                instructor: "Prof. Daniel Okafor".to_string(),
                category: "Management".to_string(),
                start_date: date(2025, 10, 13),
                end_date: date(2025, 11, 21),
                schedule: "Tue 09:00-12:00".to_string(),
                capacity: 25,
                enrolled_count: 20,
                status: ResourceStatus::Active,
                version: 1,
            },
            Training {
                id: "T003".to_string(),
                title: "Advanced Laboratory Safety".to_string(),
                description: "Chemical handling and emergency procedures".to_string(),
                instructor: "Dr. Ingrid Larsen".to_string(),
                category: "Health & Safety".to_string(),
                start_date: date(2025, 9, 22),
                end_date: date(2025, 9, 26),
                schedule: "Daily 08:00-10:00".to_string(),
                capacity: 15,
                enrolled_count: 15,
                status: ResourceStatus::Inactive,
                version: 1,
            },
        ],
        facilities: vec![
            Facility {
                id: "F001".to_string(),
                name: "Main Auditorium".to_string(),
                description: "Tiered seating with projection and sound system".to_string(),
                facility_type: "Auditorium".to_string(),
                location: "Central Campus, Block A".to_string(),
                capacity: 400,
                status: ResourceStatus::Active,
                version: 1,
            },
            Facility {
                id: "F002".to_string(),
                name: "Computer Lab 2".to_string(),
                description: "40 workstations, instructor console".to_string(),
                facility_type: "Laboratory".to_string(),
                location: "Engineering Building, Level 2".to_string(),
                capacity: 40,
                status: ResourceStatus::Active,
                version: 1,
            },
            Facility {
                id: "F003".to_string(),
                name: "Seminar Room 5".to_string(),
                description: "Round-table room with video conferencing".to_string(),
                facility_type: "Meeting Room".to_string(),
                location: "North Campus, Library Annex".to_string(),
                capacity: 20,
                status: ResourceStatus::Inactive,
                version: 1,
            },
        ],
        campuses: vec![
            Campus {
                id: "C001".to_string(),
                name: "Central Campus".to_string(),
                location: "Nairobi".to_string(),
                admin_name: "Mary Achieng".to_string(),
                admin_email: "m.achieng@uni.edu".to_string(),
                user_count: 1250,
                status: ResourceStatus::Active,
                version: 1,
            },
            Campus {
                id: "C002".to_string(),
                name: "North Campus".to_string(),
                location: "Kiambu".to_string(),
                admin_name: "Peter Kamau".to_string(),
                admin_email: "p.kamau@uni.edu".to_string(),
                user_count: 640,
                status: ResourceStatus::Active,
                version: 1,
            },
        ],
        schools: vec![
            School {
                id: "S001".to_string(),
                name: "School of Engineering".to_string(),
                campus_id: "C001".to_string(),
                dean: "Prof. Ruth Njoroge".to_string(),
                department_count: 5,
                student_count: 2100,
                version: 1,
            },
            School {
                id: "S002".to_string(),
                name: "School of Business".to_string(),
                campus_id: "C002".to_string(),
                dean: "Dr. Ahmed Salim".to_string(),
                department_count: 3,
                student_count: 1300,
                version: 1,
            },
        ],
        users: vec![
            User {
                id: "U001".to_string(),
                name: "System Administrator".to_string(),
                email: "admin@uni.edu".to_string(),
                role: UserRole::SystemAdmin,
                campus_id: None,
                status: ResourceStatus::Active,
                version: 1,
            },
            User {
                id: "U002".to_string(),
                name: "Mary Achieng".to_string(),
                email: "m.achieng@uni.edu".to_string(),
                role: UserRole::CampusAdmin,
                campus_id: Some("C001".to_string()),
                status: ResourceStatus::Active,
                version: 1,
            },
            User {
                id: "U003".to_string(),
                name: "Achieng Odhiambo".to_string(),
                email: "achieng.odhiambo@student.uni.edu".to_string(),
                role: UserRole::Public,
                campus_id: Some("C001".to_string()),
                status: ResourceStatus::Active,
                version: 1,
            },
        ],
    })
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn request(
    name: &str,
    email: &str,
    item: &str,
    submitted: NaiveDate,
    status: RequestStatus,
    motivation: Option<&str>,
) -> Request {
    Request {
        id: Uuid::new_v4().to_string(),
        applicant_name: name.to_string(),
        applicant_email: email.to_string(),
        requested_item: item.to_string(),
        submission_date: submitted,
        status,
        motivation: motivation.map(str::to_string),
        notes: None,
    }
}
