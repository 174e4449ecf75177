use serde::{Deserialize, Serialize};
use std::fmt;

/// Allowed item categories for donations and requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Clothes,
    Books,
    Food,
    Furniture,
    Electronics,
    Toys,
    Medical,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Clothes,
        Category::Books,
        Category::Food,
        Category::Furniture,
        Category::Electronics,
        Category::Toys,
        Category::Medical,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Clothes => "clothes",
            Category::Books => "books",
            Category::Food => "food",
            Category::Furniture => "furniture",
            Category::Electronics => "electronics",
            Category::Toys => "toys",
            Category::Medical => "medical",
            Category::Other => "other",
        }
    }

    /// Exact, case-sensitive lookup in the allow-list.
    pub fn parse(value: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review status shared by donations and requests.
///
/// `pending → approved | rejected` by an admin, `approved ⇄ matched` through
/// the matching engine. Owners may only edit or delete while `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Approved,
    Rejected,
    Matched,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Approved => "approved",
            ItemStatus::Rejected => "rejected",
            ItemStatus::Matched => "matched",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Urgent,
}

impl Urgency {
    pub fn parse(value: &str) -> Option<Urgency> {
        match value {
            "normal" => Some(Urgency::Normal),
            "urgent" => Some(Urgency::Urgent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Normal => "normal",
            Urgency::Urgent => "urgent",
        }
    }
}
