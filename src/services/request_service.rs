use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::Database;
use crate::models::{Category, ItemRequest, ItemStatus, Urgency};
use crate::services::validation::{non_empty, parse_category, parse_quantity, parse_urgency, ReviewAction};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestPayload {
    pub item_needed: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    /// `normal` or `urgent`
    pub urgency: Option<String>,
}

struct RequestFields {
    item_needed: String,
    category: Category,
    description: String,
    quantity: u32,
    urgency: Urgency,
}

impl ItemRequestPayload {
    fn validate(&self) -> AppResult<RequestFields> {
        let (Some(item_needed), Some(category), Some(description)) = (
            non_empty(&self.item_needed),
            non_empty(&self.category),
            non_empty(&self.description),
        ) else {
            return Err(AppError::validation(
                "Item needed, category, and description are required.",
            ));
        };

        let category = parse_category(category)?;
        let urgency = parse_urgency(self.urgency.as_deref())?;

        Ok(RequestFields {
            item_needed: item_needed.to_string(),
            category,
            description: description.to_string(),
            quantity: parse_quantity(self.quantity)?,
            urgency,
        })
    }
}

pub fn create_request(db: &Database, receiver_id: &str, payload: &ItemRequestPayload) -> AppResult<ItemRequest> {
    let fields = payload.validate()?;

    let receiver = db
        .users
        .find_by_id(receiver_id)?
        .ok_or_else(|| AppError::not_found("User not found."))?;

    let now = Utc::now();
    let request = ItemRequest {
        id: Uuid::new_v4().to_string(),
        receiver_id: receiver.id,
        receiver_name: receiver.name,
        receiver_email: receiver.email,
        item_needed: fields.item_needed,
        category: fields.category,
        description: fields.description,
        quantity: fields.quantity,
        urgency: fields.urgency,
        status: ItemStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    db.requests.append(&request)?;
    log::info!(
        "🙏 Request {} created by {} ({}, pending review)",
        request.id,
        receiver_id,
        request.urgency.as_str()
    );

    Ok(request)
}

pub fn list_requests_by_receiver(db: &Database, receiver_id: &str) -> AppResult<Vec<ItemRequest>> {
    Ok(db
        .requests
        .read_all()?
        .into_iter()
        .filter(|r| r.receiver_id == receiver_id)
        .collect())
}

fn editable_request(db: &Database, receiver_id: &str, id: &str, verb: &str) -> AppResult<ItemRequest> {
    let request = db
        .requests
        .find(id)?
        .ok_or_else(|| AppError::not_found("Request not found."))?;

    if request.receiver_id != receiver_id {
        return Err(AppError::Forbidden(format!("You can only {} your own requests.", verb)));
    }
    if request.status != ItemStatus::Pending {
        return Err(AppError::InvalidState(format!(
            "You can only {} requests that are still pending approval.",
            verb
        )));
    }

    Ok(request)
}

pub fn update_request(
    db: &Database,
    receiver_id: &str,
    id: &str,
    payload: &ItemRequestPayload,
) -> AppResult<ItemRequest> {
    let _guard = db.lifecycle_guard();
    editable_request(db, receiver_id, id, "edit")?;
    let fields = payload.validate()?;

    db.requests
        .update(id, |r| {
            r.item_needed = fields.item_needed;
            r.category = fields.category;
            r.description = fields.description;
            r.quantity = fields.quantity;
            r.urgency = fields.urgency;
        })?
        .ok_or_else(|| AppError::not_found("Failed to update request."))
}

pub fn delete_request(db: &Database, receiver_id: &str, id: &str) -> AppResult<()> {
    let _guard = db.lifecycle_guard();
    editable_request(db, receiver_id, id, "delete")?;

    if !db.requests.delete(id)? {
        return Err(AppError::not_found("Failed to delete request."));
    }
    log::info!("🗑️ Request {} deleted by {}", id, receiver_id);
    Ok(())
}

pub fn list_all_requests(db: &Database) -> AppResult<Vec<ItemRequest>> {
    Ok(db.requests.read_all()?)
}

pub fn review_request(db: &Database, id: &str, action: ReviewAction) -> AppResult<ItemRequest> {
    let _guard = db.lifecycle_guard();
    let request = db
        .requests
        .find(id)?
        .ok_or_else(|| AppError::not_found("Request not found."))?;

    if request.status != ItemStatus::Pending {
        return Err(AppError::InvalidState(
            "Only pending requests can be approved or rejected.".to_string(),
        ));
    }

    let status = match action {
        ReviewAction::Approve => ItemStatus::Approved,
        ReviewAction::Reject => ItemStatus::Rejected,
    };

    let updated = db
        .requests
        .update(id, |r| r.status = status)?
        .ok_or_else(|| AppError::not_found("Failed to update request status."))?;

    log::info!("📋 Request {} {}", id, action.past_tense());
    Ok(updated)
}
