use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::CsvRecord;
use crate::models::{Category, ItemStatus, Urgency};

/// Need posted by a receiver. One row of `requests.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub id: String,
    pub receiver_id: String,
    pub receiver_name: String,
    pub receiver_email: String,
    pub item_needed: String,
    pub category: Category,
    pub description: String,
    pub quantity: u32,
    pub urgency: Urgency,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CsvRecord for ItemRequest {
    const FILE_NAME: &'static str = "requests.csv";
    const HEADERS: &'static [&'static str] = &[
        "id",
        "receiverId",
        "receiverName",
        "receiverEmail",
        "itemNeeded",
        "category",
        "description",
        "quantity",
        "urgency",
        "status",
        "createdAt",
        "updatedAt",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Owner view of a request.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestResponse {
    pub id: String,
    pub receiver_id: String,
    pub item_needed: String,
    pub category: Category,
    pub description: String,
    pub quantity: u32,
    pub urgency: Urgency,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemRequest> for ItemRequestResponse {
    fn from(request: ItemRequest) -> Self {
        ItemRequestResponse {
            id: request.id,
            receiver_id: request.receiver_id,
            item_needed: request.item_needed,
            category: request.category,
            description: request.description,
            quantity: request.quantity,
            urgency: request.urgency,
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// Unauthenticated listing view of an approved request.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicRequest {
    pub id: String,
    pub receiver_name: String,
    /// Only filled on the public requests listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_email: Option<String>,
    pub item_needed: String,
    pub category: Category,
    pub description: String,
    pub quantity: u32,
    pub urgency: Urgency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemRequest> for PublicRequest {
    fn from(request: ItemRequest) -> Self {
        PublicRequest {
            id: request.id,
            receiver_name: request.receiver_name,
            receiver_email: None,
            item_needed: request.item_needed,
            category: request.category,
            description: request.description,
            quantity: request.quantity,
            urgency: request.urgency,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}
