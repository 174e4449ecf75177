use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::Database;
use crate::models::{Category, Donation, ItemStatus};
use crate::services::validation::{non_empty, parse_category, parse_quantity, ReviewAction};
use crate::utils::error::{AppError, AppResult};

/// Body of create and edit requests.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationPayload {
    pub item_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub photo_url: Option<String>,
}

struct DonationFields {
    item_name: String,
    category: Category,
    description: String,
    quantity: u32,
    photo_url: Option<String>,
}

impl DonationPayload {
    fn validate(&self) -> AppResult<DonationFields> {
        let (Some(item_name), Some(category), Some(description)) = (
            non_empty(&self.item_name),
            non_empty(&self.category),
            non_empty(&self.description),
        ) else {
            return Err(AppError::validation(
                "Item name, category, and description are required.",
            ));
        };

        Ok(DonationFields {
            item_name: item_name.to_string(),
            category: parse_category(category)?,
            description: description.to_string(),
            quantity: parse_quantity(self.quantity)?,
            photo_url: non_empty(&self.photo_url).map(String::from),
        })
    }
}

pub fn create_donation(db: &Database, donor_id: &str, payload: &DonationPayload) -> AppResult<Donation> {
    let fields = payload.validate()?;

    let donor = db
        .users
        .find_by_id(donor_id)?
        .ok_or_else(|| AppError::not_found("User not found."))?;

    let now = Utc::now();
    let donation = Donation {
        id: Uuid::new_v4().to_string(),
        donor_id: donor.id,
        donor_name: donor.name,
        donor_email: donor.email,
        item_name: fields.item_name,
        category: fields.category,
        description: fields.description,
        quantity: fields.quantity,
        photo_url: fields.photo_url,
        status: ItemStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    db.donations.append(&donation)?;
    log::info!("🎁 Donation {} created by {} (pending review)", donation.id, donor_id);

    Ok(donation)
}

pub fn list_donations_by_donor(db: &Database, donor_id: &str) -> AppResult<Vec<Donation>> {
    Ok(db
        .donations
        .read_all()?
        .into_iter()
        .filter(|d| d.donor_id == donor_id)
        .collect())
}

/// Loads a donation the caller may still modify: it must exist, belong to
/// them and still be pending.
fn editable_donation(db: &Database, donor_id: &str, id: &str, verb: &str) -> AppResult<Donation> {
    let donation = db
        .donations
        .find(id)?
        .ok_or_else(|| AppError::not_found("Donation not found."))?;

    if donation.donor_id != donor_id {
        return Err(AppError::Forbidden(format!("You can only {} your own donations.", verb)));
    }
    if donation.status != ItemStatus::Pending {
        return Err(AppError::InvalidState(format!(
            "You can only {} donations that are still pending approval.",
            verb
        )));
    }

    Ok(donation)
}

pub fn update_donation(
    db: &Database,
    donor_id: &str,
    id: &str,
    payload: &DonationPayload,
) -> AppResult<Donation> {
    let _guard = db.lifecycle_guard();
    editable_donation(db, donor_id, id, "edit")?;
    let fields = payload.validate()?;

    db.donations
        .update(id, |d| {
            d.item_name = fields.item_name;
            d.category = fields.category;
            d.description = fields.description;
            d.quantity = fields.quantity;
            d.photo_url = fields.photo_url;
        })?
        .ok_or_else(|| AppError::not_found("Failed to update donation."))
}

pub fn delete_donation(db: &Database, donor_id: &str, id: &str) -> AppResult<()> {
    let _guard = db.lifecycle_guard();
    editable_donation(db, donor_id, id, "delete")?;

    if !db.donations.delete(id)? {
        return Err(AppError::not_found("Failed to delete donation."));
    }
    log::info!("🗑️ Donation {} deleted by {}", id, donor_id);
    Ok(())
}

pub fn list_all_donations(db: &Database) -> AppResult<Vec<Donation>> {
    Ok(db.donations.read_all()?)
}

/// Admin approve/reject. Only pending donations can be reviewed.
pub fn review_donation(db: &Database, id: &str, action: ReviewAction) -> AppResult<Donation> {
    let _guard = db.lifecycle_guard();
    let donation = db
        .donations
        .find(id)?
        .ok_or_else(|| AppError::not_found("Donation not found."))?;

    if donation.status != ItemStatus::Pending {
        return Err(AppError::InvalidState(
            "Only pending donations can be approved or rejected.".to_string(),
        ));
    }

    let status = match action {
        ReviewAction::Approve => ItemStatus::Approved,
        ReviewAction::Reject => ItemStatus::Rejected,
    };

    let updated = db
        .donations
        .update(id, |d| d.status = status)?
        .ok_or_else(|| AppError::not_found("Failed to update donation status."))?;

    log::info!("📋 Donation {} {}", id, action.past_tense());
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{sample_donation, test_db};
    use std::sync::Barrier;
    use std::thread;

    fn payload() -> DonationPayload {
        DonationPayload {
            item_name: Some("Bookshelf".to_string()),
            category: Some("furniture".to_string()),
            description: Some("Oak, 5 shelves".to_string()),
            quantity: None,
            photo_url: Some(String::new()),
        }
    }

    #[test]
    fn test_create_snapshots_donor_and_starts_pending() {
        let db = test_db();
        let donation = create_donation(&db, "donor1", &payload()).unwrap();

        assert_eq!(donation.status, ItemStatus::Pending);
        assert_eq!(donation.quantity, 1);
        assert_eq!(donation.donor_email, "donor@example.com");
        assert_eq!(donation.photo_url, None);
        assert_eq!(db.donations.read_all().unwrap(), vec![donation]);
    }

    #[test]
    fn test_create_validation() {
        let db = test_db();

        let mut missing = payload();
        missing.description = None;
        assert_eq!(
            create_donation(&db, "donor1", &missing).unwrap_err().to_string(),
            "Item name, category, and description are required."
        );

        let mut bad_category = payload();
        bad_category.category = Some("vehicles".to_string());
        assert_eq!(
            create_donation(&db, "donor1", &bad_category).unwrap_err().to_string(),
            "Invalid category specified."
        );

        let mut zero = payload();
        zero.quantity = Some(0);
        assert!(matches!(create_donation(&db, "donor1", &zero), Err(AppError::Validation(_))));

        assert!(matches!(create_donation(&db, "ghost", &payload()), Err(AppError::NotFound(_))));
        assert!(db.donations.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_owner_can_edit_and_delete_while_pending() {
        let db = test_db();
        let donation = create_donation(&db, "donor1", &payload()).unwrap();

        let mut edit = payload();
        edit.quantity = Some(3);
        edit.item_name = Some("Tall bookshelf".to_string());
        let updated = update_donation(&db, "donor1", &donation.id, &edit).unwrap();
        assert_eq!(updated.item_name, "Tall bookshelf");
        assert_eq!(updated.quantity, 3);

        delete_donation(&db, "donor1", &donation.id).unwrap();
        assert!(db.donations.find(&donation.id).unwrap().is_none());
    }

    #[test]
    fn test_other_users_cannot_modify() {
        let db = test_db();
        let donation = create_donation(&db, "donor1", &payload()).unwrap();

        assert!(matches!(
            update_donation(&db, "someone-else", &donation.id, &payload()),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            delete_donation(&db, "someone-else", &donation.id),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            delete_donation(&db, "donor1", "missing"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_non_pending_donations_are_locked() {
        let db = test_db();
        for status in [ItemStatus::Approved, ItemStatus::Rejected, ItemStatus::Matched] {
            let id = format!("locked-{}", status);
            db.donations.append(&sample_donation(&id, status)).unwrap();

            assert!(matches!(
                update_donation(&db, "donor1", &id, &payload()),
                Err(AppError::InvalidState(_))
            ));
            assert!(matches!(
                delete_donation(&db, "donor1", &id),
                Err(AppError::InvalidState(_))
            ));
            assert_eq!(db.donations.find(&id).unwrap().unwrap().status, status);
        }
    }

    #[test]
    fn test_review_only_pending() {
        let db = test_db();
        let donation = create_donation(&db, "donor1", &payload()).unwrap();

        let approved = review_donation(&db, &donation.id, ReviewAction::Approve).unwrap();
        assert_eq!(approved.status, ItemStatus::Approved);

        assert!(matches!(
            review_donation(&db, &donation.id, ReviewAction::Reject),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            review_donation(&db, "missing", ReviewAction::Approve),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_by_donor() {
        let db = test_db();
        create_donation(&db, "donor1", &payload()).unwrap();
        let mut other = sample_donation("x1", ItemStatus::Pending);
        other.donor_id = "donor2".to_string();
        db.donations.append(&other).unwrap();

        assert_eq!(list_donations_by_donor(&db, "donor1").unwrap().len(), 1);
        assert_eq!(list_all_donations(&db).unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_reviews_decide_once() {
        const THREADS: usize = 8;
        let db = test_db();
        db.donations.append(&sample_donation("d1", ItemStatus::Pending)).unwrap();

        let barrier = Barrier::new(THREADS);
        let results: Vec<AppResult<Donation>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|i| {
                    let (db, barrier) = (&db, &barrier);
                    let action = if i % 2 == 0 { ReviewAction::Approve } else { ReviewAction::Reject };
                    scope.spawn(move || {
                        barrier.wait();
                        review_donation(db, "d1", action)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners: Vec<&Donation> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(db.donations.find("d1").unwrap().unwrap().status, winners[0].status);
    }

    #[test]
    fn test_delete_racing_review_never_both_succeed() {
        for _round in 0..10 {
            let db = test_db();
            db.donations.append(&sample_donation("d1", ItemStatus::Pending)).unwrap();

            let barrier = Barrier::new(2);
            let (deleted, reviewed) = thread::scope(|scope| {
                let delete = scope.spawn(|| {
                    barrier.wait();
                    delete_donation(&db, "donor1", "d1")
                });
                let review = scope.spawn(|| {
                    barrier.wait();
                    review_donation(&db, "d1", ReviewAction::Approve)
                });
                (delete.join().unwrap(), review.join().unwrap())
            });

            assert!(deleted.is_ok() != reviewed.is_ok());
            let stored = db.donations.find("d1").unwrap();
            if deleted.is_ok() {
                assert!(stored.is_none());
            } else {
                assert_eq!(stored.unwrap().status, ItemStatus::Approved);
            }
        }
    }
}
