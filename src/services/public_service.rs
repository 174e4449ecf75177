use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::models::{Category, ItemStatus, PublicDonation, PublicRequest, Urgency};
use crate::utils::error::AppResult;

const DEFAULT_MIN_QUANTITY: u32 = 1;
const DEFAULT_MAX_QUANTITY: u32 = 100;
const ACTIVITY_FEED_LIMIT: usize = 20;
const RECENCY_WINDOW_DAYS: f64 = 20.0;

/// Query string of `GET /api/public/search`. Every field is optional and
/// falls back to "no filter".
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the item name
    pub item_name: Option<String>,
    /// Category or `all`
    pub category: Option<String>,
    pub min_quantity: Option<String>,
    pub max_quantity: Option<String>,
    /// `normal`, `urgent` or `all` (requests only)
    pub urgency: Option<String>,
    /// `donations`, `requests` or `both`
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SearchResults {
    pub success: bool,
    pub donations: Vec<PublicDonation>,
    pub requests: Vec<PublicRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Donation,
    Request,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub user_name: String,
    pub item_name: String,
    pub quantity: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

/// Parsed search filters.
#[derive(Debug)]
struct SearchFilter {
    term: Option<String>,
    category: Option<Category>,
    min_quantity: u32,
    max_quantity: u32,
    urgency: Option<Urgency>,
    include_donations: bool,
    include_requests: bool,
}

impl SearchFilter {
    fn from_query(query: &SearchQuery) -> Self {
        let term = query
            .item_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let (mut include_donations, mut include_requests) = match query.kind.as_deref().unwrap_or("both") {
            "donations" => (true, false),
            "requests" => (false, true),
            "both" => (true, true),
            _ => (false, false),
        };

        // An unrecognised category or urgency matches nothing.
        let category = match query.category.as_deref().unwrap_or("all") {
            "all" => None,
            raw => {
                let parsed = Category::parse(raw);
                if parsed.is_none() {
                    include_donations = false;
                    include_requests = false;
                }
                parsed
            }
        };
        let urgency = match query.urgency.as_deref().unwrap_or("all") {
            "all" => None,
            raw => {
                let parsed = Urgency::parse(raw);
                if parsed.is_none() {
                    include_requests = false;
                }
                parsed
            }
        };

        Self {
            term,
            category,
            min_quantity: parse_bound(query.min_quantity.as_deref(), DEFAULT_MIN_QUANTITY),
            max_quantity: parse_bound(query.max_quantity.as_deref(), DEFAULT_MAX_QUANTITY),
            urgency,
            include_donations,
            include_requests,
        }
    }

    fn accepts(&self, name: &str, category: Category, quantity: u32) -> bool {
        if self.category.is_some_and(|c| c != category) {
            return false;
        }
        if let Some(term) = &self.term {
            if !name.to_lowercase().contains(term.as_str()) {
                return false;
            }
        }
        (self.min_quantity..=self.max_quantity).contains(&quantity)
    }
}

/// Numeric bound with the same fallback as the web client: unparsable or
/// zero values use the default.
fn parse_bound(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|v| *v != 0)
        .unwrap_or(default)
}

/// Score used to order search hits: exact name match 100, substring 50,
/// urgent 30, plus up to 20 points decaying linearly over 20 days of age.
pub fn relevance_score(
    name: &str,
    term: &str,
    urgent: bool,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> f64 {
    let name = name.to_lowercase();
    let term = term.to_lowercase();

    let mut score = 0.0;
    if name == term {
        score += 100.0;
    }
    if name.contains(&term) {
        score += 50.0;
    }
    if urgent {
        score += 30.0;
    }

    let age_days = (now - created_at).num_milliseconds() as f64 / 86_400_000.0;
    score + (RECENCY_WINDOW_DAYS - age_days).max(0.0)
}

/// Approved donations, newest first.
pub fn public_donations(db: &Database) -> AppResult<Vec<PublicDonation>> {
    let mut donations: Vec<PublicDonation> = db
        .donations
        .read_all()?
        .into_iter()
        .filter(|d| d.status == ItemStatus::Approved)
        .map(PublicDonation::from)
        .collect();

    donations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(donations)
}

/// Approved requests, urgent first, then newest first.
pub fn public_requests(db: &Database) -> AppResult<Vec<PublicRequest>> {
    let mut requests: Vec<PublicRequest> = db
        .requests
        .read_all()?
        .into_iter()
        .filter(|r| r.status == ItemStatus::Approved)
        .map(|r| {
            let email = if r.receiver_email.is_empty() {
                "Hidden".to_string()
            } else {
                r.receiver_email.clone()
            };
            let mut listing = PublicRequest::from(r);
            if listing.receiver_name.is_empty() {
                listing.receiver_name = "Anonymous".to_string();
            }
            listing.receiver_email = Some(email);
            listing
        })
        .collect();

    requests.sort_by(|a, b| {
        let a_urgent = a.urgency == Urgency::Urgent;
        let b_urgent = b.urgency == Urgency::Urgent;
        b_urgent
            .cmp(&a_urgent)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    Ok(requests)
}

pub fn search(db: &Database, query: &SearchQuery, now: DateTime<Utc>) -> AppResult<SearchResults> {
    let filter = SearchFilter::from_query(query);

    let mut donations: Vec<PublicDonation> = Vec::new();
    if filter.include_donations {
        donations = db
            .donations
            .read_all()?
            .into_iter()
            .filter(|d| d.status == ItemStatus::Approved)
            .filter(|d| filter.accepts(&d.item_name, d.category, d.quantity))
            .map(PublicDonation::from)
            .collect();
    }

    let mut requests: Vec<PublicRequest> = Vec::new();
    if filter.include_requests {
        requests = db
            .requests
            .read_all()?
            .into_iter()
            .filter(|r| r.status == ItemStatus::Approved)
            .filter(|r| filter.accepts(&r.item_needed, r.category, r.quantity))
            .filter(|r| filter.urgency.map_or(true, |u| u == r.urgency))
            .map(PublicRequest::from)
            .collect();
    }

    match &filter.term {
        Some(term) => {
            donations.sort_by(|a, b| {
                let sa = relevance_score(&a.item_name, term, false, a.created_at, now);
                let sb = relevance_score(&b.item_name, term, false, b.created_at, now);
                sb.total_cmp(&sa)
            });
            requests.sort_by(|a, b| {
                let sa = relevance_score(&a.item_needed, term, a.urgency == Urgency::Urgent, a.created_at, now);
                let sb = relevance_score(&b.item_needed, term, b.urgency == Urgency::Urgent, b.created_at, now);
                sb.total_cmp(&sa)
            });
        }
        None => {
            donations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
    }

    Ok(SearchResults {
        success: true,
        donations,
        requests,
    })
}

/// Approved donations and requests as a single feed, newest first, capped at
/// twenty entries.
pub fn activities(db: &Database) -> AppResult<Vec<Activity>> {
    let donations = db
        .donations
        .read_all()?
        .into_iter()
        .filter(|d| d.status == ItemStatus::Approved)
        .map(|d| Activity {
            id: d.id,
            kind: ActivityKind::Donation,
            user_name: d.donor_name,
            item_name: d.item_name,
            quantity: d.quantity.to_string(),
            location: "Local Community".to_string(),
            timestamp: d.created_at,
        });

    let requests = db
        .requests
        .read_all()?
        .into_iter()
        .filter(|r| r.status == ItemStatus::Approved)
        .map(|r| Activity {
            id: r.id,
            kind: ActivityKind::Request,
            user_name: r.receiver_name,
            item_name: r.item_needed,
            quantity: r.quantity.to_string(),
            location: "Local Community".to_string(),
            timestamp: r.created_at,
        });

    let mut feed: Vec<Activity> = donations.chain(requests).collect();
    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed.truncate(ACTIVITY_FEED_LIMIT);
    Ok(feed)
}
