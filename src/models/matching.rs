use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Donation, ItemRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Active,
    Completed,
    Cancelled,
}

/// Pairing of one approved donation with one approved request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub donation_id: String,
    pub request_id: String,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationSummary {
    pub item_name: String,
    pub category: Category,
    pub donor_name: String,
}

impl From<&Donation> for DonationSummary {
    fn from(d: &Donation) -> Self {
        DonationSummary {
            item_name: d.item_name.clone(),
            category: d.category,
            donor_name: d.donor_name.clone(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub item_needed: String,
    pub category: Category,
    pub receiver_name: String,
}

impl From<&ItemRequest> for RequestSummary {
    fn from(r: &ItemRequest) -> Self {
        RequestSummary {
            item_needed: r.item_needed.clone(),
            category: r.category,
            receiver_name: r.receiver_name.clone(),
        }
    }
}

/// Match with the summaries shown on the admin dashboard. Summaries are
/// `null` when the linked row no longer exists in the CSV file.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    #[serde(flatten)]
    pub record: Match,
    pub donation: Option<DonationSummary>,
    pub request: Option<RequestSummary>,
}
