use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::database::{Database, StoreError};
use crate::models::{Category, Donation, ItemRequest, ItemStatus, Role, Urgency, User};
use crate::services::auth_service::hash_password;
use crate::utils::error::AppResult;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SeedCounts {
    pub donations: usize,
    pub requests: usize,
}

/// (id, name, email, password, role)
const DEMO_USERS: [(&str, &str, &str, &str, Role); 3] = [
    ("admin1", "Admin User", "admin@example.com", "admin123", Role::Admin),
    ("donor1", "Donor User", "donor@example.com", "donor123", Role::Donor),
    ("receiver1", "Receiver User", "receiver@example.com", "receiver123", Role::Receiver),
];

/// Puts the three demo accounts into the user store. Accounts whose email is
/// already taken are left alone, so calling this twice is harmless.
pub fn seed_demo_users(db: &Database, settings: &AuthSettings) -> AppResult<usize> {
    let now = Utc::now();
    let mut inserted = 0;

    for (id, name, email, password, role) in DEMO_USERS {
        let user = User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(settings, password)?,
            role,
            created_at: now,
            updated_at: now,
        };

        match db.users.insert(user) {
            Ok(()) => inserted += 1,
            Err(StoreError::Duplicate(_)) => {
                log::info!("👤 Demo user {} already present, skipping", email);
            }
            Err(e) => return Err(e.into()),
        }
    }

    log::info!("👥 Demo users: {} seeded", inserted);
    Ok(inserted)
}

/// Appends the sample donations and requests to the CSV tables. Every call
/// appends a fresh batch with new ids.
pub fn seed_demo_data(db: &Database) -> AppResult<SeedCounts> {
    let now = Utc::now();

    let donations = build_demo_donations(now);
    let requests = build_demo_requests(now);

    for donation in &donations {
        db.donations.append(donation)?;
    }
    for request in &requests {
        db.requests.append(request)?;
    }

    log::info!(
        "🌱 Seeded {} donations and {} requests",
        donations.len(),
        requests.len()
    );

    Ok(SeedCounts {
        donations: donations.len(),
        requests: requests.len(),
    })
}

fn build_demo_donations(now: DateTime<Utc>) -> Vec<Donation> {
    // (donor id, donor name, donor email, item, category, description, quantity, age)
    let rows = [
        (
            "donor1",
            "John Doe",
            "john@example.com",
            "Winter Clothes",
            Category::Clothes,
            "Warm winter jackets, sweaters, and pants for children ages 5-12",
            20,
            Duration::zero(),
        ),
        (
            "donor2",
            "Jane Smith",
            "jane@example.com",
            "Rice and Lentils",
            Category::Food,
            "50kg of rice and 20kg of lentils for families in need",
            70,
            Duration::days(1),
        ),
        (
            "donor3",
            "Medical Center",
            "medical@example.com",
            "Medical Supplies",
            Category::Medical,
            "First aid kits, bandages, and basic medicines",
            15,
            Duration::days(2),
        ),
        (
            "donor4",
            "Tech Company",
            "tech@example.com",
            "Laptops",
            Category::Electronics,
            "Refurbished laptops for students and educational purposes",
            5,
            Duration::days(3),
        ),
        (
            "donor5",
            "Book Lover",
            "books@example.com",
            "Educational Books",
            Category::Books,
            "Textbooks and reference books for high school students",
            50,
            Duration::days(4),
        ),
    ];

    rows.into_iter()
        .map(|(donor_id, donor_name, donor_email, item, category, description, quantity, age)| {
            let created_at = now - age;
            Donation {
                id: Uuid::new_v4().to_string(),
                donor_id: donor_id.into(),
                donor_name: donor_name.into(),
                donor_email: donor_email.into(),
                item_name: item.into(),
                category,
                description: description.into(),
                quantity,
                photo_url: None,
                status: ItemStatus::Approved,
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}

fn build_demo_requests(now: DateTime<Utc>) -> Vec<ItemRequest> {
    let rows = [
        (
            "receiver1",
            "Maria Garcia",
            "maria@example.com",
            "School Supplies",
            Category::Books,
            "Notebooks, pens, pencils for 3 children starting school",
            30,
            Urgency::Urgent,
            Duration::zero(),
        ),
        (
            "receiver2",
            "Ahmed Ali",
            "ahmed@example.com",
            "Baby Formula",
            Category::Food,
            "Infant formula for 6-month-old baby - lactose-free if possible",
            10,
            Urgency::Urgent,
            Duration::hours(12),
        ),
        (
            "receiver3",
            "Chen Wei",
            "chen@example.com",
            "Blankets",
            Category::Clothes,
            "Warm blankets for elderly family members during winter",
            5,
            Urgency::Normal,
            Duration::hours(36),
        ),
        (
            "receiver4",
            "Local Clinic",
            "clinic@example.com",
            "Blood Pressure Monitor",
            Category::Medical,
            "Digital blood pressure monitor for community health checks",
            2,
            Urgency::Normal,
            Duration::hours(60),
        ),
        (
            "receiver5",
            "Single Parent",
            "parent@example.com",
            "Children Toys",
            Category::Toys,
            "Educational toys for 2 children ages 3 and 5",
            8,
            Urgency::Normal,
            Duration::hours(84),
        ),
    ];

    rows.into_iter()
        .map(
            |(receiver_id, receiver_name, receiver_email, item, category, description, quantity, urgency, age)| {
                let created_at = now - age;
                ItemRequest {
                    id: Uuid::new_v4().to_string(),
                    receiver_id: receiver_id.into(),
                    receiver_name: receiver_name.into(),
                    receiver_email: receiver_email.into(),
                    item_needed: item.into(),
                    category,
                    description: description.into(),
                    quantity,
                    urgency,
                    status: ItemStatus::Approved,
                    created_at,
                    updated_at: created_at,
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::empty_db;
    use crate::services::public_service;

    fn settings() -> AuthSettings {
        AuthSettings {
            bcrypt_cost: 4,
            ..AuthSettings::default()
        }
    }

    #[test]
    fn test_seed_demo_users_is_idempotent() {
        let db = empty_db();

        assert_eq!(seed_demo_users(&db, &settings()).unwrap(), 3);
        assert_eq!(seed_demo_users(&db, &settings()).unwrap(), 0);

        let donor = db.users.find_by_id("donor1").unwrap().unwrap();
        assert_eq!(donor.role, Role::Donor);
        assert!(bcrypt::verify("donor123", &donor.password_hash).unwrap());
    }

    #[test]
    fn test_seed_demo_data_appends_approved_items() {
        let db = empty_db();

        let counts = seed_demo_data(&db).unwrap();
        assert_eq!(counts.donations, 5);
        assert_eq!(counts.requests, 5);

        let donations = public_service::public_donations(&db).unwrap();
        assert_eq!(donations.len(), 5);
        assert_eq!(donations[0].item_name, "Winter Clothes");

        let requests = public_service::public_requests(&db).unwrap();
        assert_eq!(requests[0].item_needed, "School Supplies");
        assert_eq!(requests[1].item_needed, "Baby Formula");

        seed_demo_data(&db).unwrap();
        assert_eq!(db.donations.read_all().unwrap().len(), 10);
    }
}
