use crate::models::{Category, Urgency};
use crate::utils::error::{AppError, AppResult};

/// Trimmed value when present and not blank.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_category(value: &str) -> AppResult<Category> {
    Category::parse(value).ok_or_else(|| AppError::validation("Invalid category specified."))
}

pub fn parse_urgency(value: Option<&str>) -> AppResult<Urgency> {
    value
        .and_then(Urgency::parse)
        .ok_or_else(|| AppError::validation("Urgency must be either 'normal' or 'urgent'."))
}

/// Absent quantity defaults to 1; anything below 1 is rejected.
pub fn parse_quantity(value: Option<i64>) -> AppResult<u32> {
    match value {
        None => Ok(1),
        Some(q) if q < 1 => Err(AppError::validation("Quantity must be at least 1.")),
        Some(q) => u32::try_from(q).map_err(|_| AppError::validation("Quantity is too large.")),
    }
}

/// Admin decision on a pending donation or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn parse(value: Option<&str>) -> AppResult<Self> {
        match value {
            Some("approve") => Ok(ReviewAction::Approve),
            Some("reject") => Ok(ReviewAction::Reject),
            _ => Err(AppError::validation("Action must be either 'approve' or 'reject'.")),
        }
    }

    /// Past tense used in response messages.
    pub fn past_tense(&self) -> &'static str {
        match self {
            ReviewAction::Approve => "approved",
            ReviewAction::Reject => "rejected",
        }
    }
}
