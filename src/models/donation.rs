use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::CsvRecord;
use crate::models::{Category, ItemStatus};

/// Donation offered by a donor. One row of `donations.csv`.
///
/// Field order is the column order of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub donor_id: String,
    /// Snapshot of the donor at creation time
    pub donor_name: String,
    pub donor_email: String,
    pub item_name: String,
    pub category: Category,
    pub description: String,
    pub quantity: u32,
    pub photo_url: Option<String>,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CsvRecord for Donation {
    const FILE_NAME: &'static str = "donations.csv";
    const HEADERS: &'static [&'static str] = &[
        "id",
        "donorId",
        "donorName",
        "donorEmail",
        "itemName",
        "category",
        "description",
        "quantity",
        "photoUrl",
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

/// Owner view of a donation (no donor snapshot).
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    pub id: String,
    pub donor_id: String,
    pub item_name: String,
    pub category: Category,
    pub description: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Donation> for DonationResponse {
    fn from(donation: Donation) -> Self {
        DonationResponse {
            id: donation.id,
            donor_id: donation.donor_id,
            item_name: donation.item_name,
            category: donation.category,
            description: donation.description,
            quantity: donation.quantity,
            photo_url: donation.photo_url,
            status: donation.status,
            created_at: donation.created_at,
            updated_at: donation.updated_at,
        }
    }
}

/// Unauthenticated listing view of an approved donation.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicDonation {
    pub id: String,
    pub donor_name: String,
    pub item_name: String,
    pub category: Category,
    pub description: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Donation> for PublicDonation {
    fn from(donation: Donation) -> Self {
        PublicDonation {
            id: donation.id,
            donor_name: donation.donor_name,
            item_name: donation.item_name,
            category: donation.category,
            description: donation.description,
            quantity: donation.quantity,
            photo_url: donation.photo_url,
            created_at: donation.created_at,
            updated_at: donation.updated_at,
        }
    }
}
