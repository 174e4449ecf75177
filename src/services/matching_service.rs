use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::Database;
use crate::models::{DonationSummary, ItemStatus, Match, MatchDetails, MatchStatus, RequestSummary};
use crate::services::validation::non_empty;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub donation_id: Option<String>,
    pub request_id: Option<String>,
}

/// Pairs an approved donation with an approved request.
///
/// Runs under the lifecycle lock so two admins cannot claim the same item.
/// The donation and the request are flipped to `matched` with two separate
/// file rewrites and the match is stored last. A failed step puts the items
/// already flipped back to `approved`; a crash in between is not recovered.
pub fn create_match(db: &Database, body: &CreateMatchRequest) -> AppResult<Match> {
    let (Some(donation_id), Some(request_id)) = (non_empty(&body.donation_id), non_empty(&body.request_id)) else {
        return Err(AppError::validation("Both donation ID and request ID are required."));
    };

    let _guard = db.lifecycle_guard();

    let donation = db
        .donations
        .find(donation_id)?
        .ok_or_else(|| AppError::not_found("Donation not found."))?;
    let request = db
        .requests
        .find(request_id)?
        .ok_or_else(|| AppError::not_found("Request not found."))?;

    match donation.status {
        ItemStatus::Approved => {}
        ItemStatus::Matched => {
            return Err(AppError::InvalidState("This donation has already been matched.".to_string()))
        }
        _ => return Err(AppError::InvalidState("Only approved donations can be matched.".to_string())),
    }
    match request.status {
        ItemStatus::Approved => {}
        ItemStatus::Matched => {
            return Err(AppError::InvalidState("This request has already been matched.".to_string()))
        }
        _ => return Err(AppError::InvalidState("Only approved requests can be matched.".to_string())),
    }

    if donation.category != request.category {
        log::warn!(
            "⚠️  Category mismatch: Donation ({}) and Request ({})",
            donation.category,
            request.category
        );
    }

    let now = Utc::now();
    let record = Match {
        id: Uuid::new_v4().to_string(),
        donation_id: donation.id.clone(),
        request_id: request.id.clone(),
        status: MatchStatus::Active,
        created_at: now,
        updated_at: now,
    };

    set_donation_status(db, &record.donation_id, ItemStatus::Matched)?;

    if let Err(e) = set_request_status(db, &record.request_id, ItemStatus::Matched) {
        release_donation(db, &record.donation_id);
        return Err(e);
    }

    if let Err(e) = db.matches.insert(record.clone()) {
        release_donation(db, &record.donation_id);
        release_request(db, &record.request_id);
        return Err(e.into());
    }

    log::info!(
        "🤝 Match {} created: donation {} ↔ request {}",
        record.id,
        record.donation_id,
        record.request_id
    );
    Ok(record)
}

fn set_donation_status(db: &Database, id: &str, status: ItemStatus) -> AppResult<()> {
    db.donations
        .update(id, |d| d.status = status)?
        .map(|_| ())
        .ok_or_else(|| AppError::Internal(format!("Donation {} disappeared while updating its status", id)))
}

fn set_request_status(db: &Database, id: &str, status: ItemStatus) -> AppResult<()> {
    db.requests
        .update(id, |r| r.status = status)?
        .map(|_| ())
        .ok_or_else(|| AppError::Internal(format!("Request {} disappeared while updating its status", id)))
}

fn release_donation(db: &Database, id: &str) {
    if let Err(e) = set_donation_status(db, id, ItemStatus::Approved) {
        log::error!("❌ Could not release donation {}: {}", id, e);
    }
}

fn release_request(db: &Database, id: &str) {
    if let Err(e) = set_request_status(db, id, ItemStatus::Approved) {
        log::error!("❌ Could not release request {}: {}", id, e);
    }
}

/// Every match with donation/request summaries for the admin dashboard.
pub fn list_matches(db: &Database) -> AppResult<Vec<MatchDetails>> {
    let donations = db.donations.read_all()?;
    let requests = db.requests.read_all()?;

    let details = db
        .matches
        .list()?
        .into_iter()
        .map(|record| {
            let donation = donations
                .iter()
                .find(|d| d.id == record.donation_id)
                .map(DonationSummary::from);
            let request = requests
                .iter()
                .find(|r| r.id == record.request_id)
                .map(RequestSummary::from);
            MatchDetails { record, donation, request }
        })
        .collect();

    Ok(details)
}

fn active_match(db: &Database, id: &str, verb: &str) -> AppResult<Match> {
    let record = db
        .matches
        .find(id)?
        .ok_or_else(|| AppError::not_found("Match not found."))?;

    if record.status != MatchStatus::Active {
        return Err(AppError::InvalidState(format!("Only active matches can be {}.", verb)));
    }
    Ok(record)
}

fn save_match(db: &Database, record: &Match) -> AppResult<()> {
    if db.matches.save(record)? {
        Ok(())
    } else {
        Err(AppError::Internal(format!("Match {} disappeared while saving", record.id)))
    }
}

/// Marks an active match as completed. The paired items stay `matched`.
pub fn complete_match(db: &Database, id: &str) -> AppResult<Match> {
    let _guard = db.lifecycle_guard();
    let mut record = active_match(db, id, "completed")?;

    record.status = MatchStatus::Completed;
    record.updated_at = Utc::now();
    save_match(db, &record)?;

    log::info!("✅ Match {} completed", id);
    Ok(record)
}

/// Cancels an active match and puts both items back to `approved` so they
/// can be matched again.
pub fn cancel_match(db: &Database, id: &str) -> AppResult<Match> {
    let _guard = db.lifecycle_guard();
    let mut record = active_match(db, id, "cancelled")?;

    // A paired item deleted from the CSV by hand is skipped, not fatal.
    if db.donations.update(&record.donation_id, |d| d.status = ItemStatus::Approved)?.is_none() {
        log::warn!("⚠️  Match {}: donation {} no longer exists", id, record.donation_id);
    }
    if db.requests.update(&record.request_id, |r| r.status = ItemStatus::Approved)?.is_none() {
        log::warn!("⚠️  Match {}: request {} no longer exists", id, record.request_id);
    }

    record.status = MatchStatus::Cancelled;
    record.updated_at = Utc::now();
    save_match(db, &record)?;

    log::info!("↩️ Match {} cancelled, items released", id);
    Ok(record)
}
