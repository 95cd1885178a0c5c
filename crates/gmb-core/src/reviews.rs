//! Review records as returned by the dashboard backend.
//!
//! Reviews are immutable once received. A reply is added out-of-band via a
//! separate submission call, never by mutating the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Fallback shown when a review carries no reviewer display name.
pub const ANONYMOUS_REVIEWER: &str = "Anonymous";

/// Fallback shown when a review has no comment text.
pub const NO_COMMENT: &str = "No comment provided";

/// Star rating labels used by the reviews API.
///
/// Labels outside the five known values are kept verbatim so they can be
/// logged, and always map to zero stars. Non-string JSON (numbers, `null`,
/// objects) decodes as [`StarRating::Unrecognized`] rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum StarRating {
    One,
    Two,
    Three,
    Four,
    Five,
    Unrecognized(String),
}

impl StarRating {
    /// Number of stars for this rating, `0` for unrecognized labels.
    #[must_use]
    pub fn stars(&self) -> u8 {
        match self {
            StarRating::One => 1,
            StarRating::Two => 2,
            StarRating::Three => 3,
            StarRating::Four => 4,
            StarRating::Five => 5,
            StarRating::Unrecognized(_) => 0,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            StarRating::One => "ONE",
            StarRating::Two => "TWO",
            StarRating::Three => "THREE",
            StarRating::Four => "FOUR",
            StarRating::Five => "FIVE",
            StarRating::Unrecognized(raw) => raw,
        }
    }
}

impl Default for StarRating {
    fn default() -> Self {
        StarRating::Unrecognized(String::new())
    }
}

impl From<String> for StarRating {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ONE" => StarRating::One,
            "TWO" => StarRating::Two,
            "THREE" => StarRating::Three,
            "FOUR" => StarRating::Four,
            "FIVE" => StarRating::Five,
            _ => StarRating::Unrecognized(raw),
        }
    }
}

impl<'de> Deserialize<'de> for StarRating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(raw) => StarRating::from(raw),
            Value::Null => StarRating::default(),
            other => StarRating::Unrecognized(other.to_string()),
        })
    }
}

impl From<StarRating> for String {
    fn from(rating: StarRating) -> Self {
        match rating {
            StarRating::Unrecognized(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

impl std::fmt::Display for StarRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a star rating label to its 1–5 value. Unknown labels map to `0`.
#[must_use]
pub fn map_star_rating(label: &str) -> u8 {
    StarRating::from(label.to_string()).stars()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "reviewId", alias = "id", default, deserialize_with = "lenient_id")]
    pub review_id: String,
    #[serde(default)]
    pub reviewer: Option<Reviewer>,
    #[serde(rename = "starRating", alias = "rating", default)]
    pub star_rating: StarRating,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(rename = "createTime", default)]
    pub create_time: Option<String>,
    /// Slash-delimited resource name, e.g. `accounts/{a}/locations/{l}/reviews/{r}`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "reviewReply", alias = "reply", default)]
    pub review_reply: Option<Value>,
}

impl Review {
    /// Reviewer display name, or [`ANONYMOUS_REVIEWER`] when absent or blank.
    #[must_use]
    pub fn reviewer_name(&self) -> &str {
        self.reviewer
            .as_ref()
            .and_then(|r| r.display_name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(ANONYMOUS_REVIEWER)
    }

    /// The comment text when present and non-blank.
    #[must_use]
    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.trim().is_empty())
    }

    #[must_use]
    pub fn display_comment(&self) -> &str {
        self.comment
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(NO_COMMENT)
    }

    #[must_use]
    pub fn rating(&self) -> u8 {
        self.star_rating.stars()
    }

    /// Whether the review already carries a reply.
    ///
    /// Empty strings, `false`, `0` and `null` all count as "no reply".
    #[must_use]
    pub fn has_reply(&self) -> bool {
        match &self.review_reply {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
            Some(Value::Array(_) | Value::Object(_)) => true,
        }
    }

    /// Parsed creation timestamp; `None` when absent or not RFC 3339.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.create_time
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Envelope of the all-reviews endpoint. A missing or `null` list is empty.
///
/// Entries are kept as raw JSON so one unreadable record does not fail the
/// whole listing; see [`ReviewsEnvelope::decode`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewsEnvelope {
    #[serde(default)]
    pub reviews: Option<Vec<Value>>,
}

/// Result of decoding an envelope entry by entry.
#[derive(Debug, Default)]
pub struct DecodedReviews {
    /// Readable reviews, in server order.
    pub reviews: Vec<Review>,
    /// One error per entry that could not be read as a review.
    pub rejected: Vec<serde_json::Error>,
}

impl ReviewsEnvelope {
    #[must_use]
    pub fn decode(self) -> DecodedReviews {
        let mut decoded = DecodedReviews::default();
        for entry in self.reviews.unwrap_or_default() {
            match serde_json::from_value(entry) {
                Ok(review) => decoded.reviews.push(review),
                Err(e) => decoded.rejected.push(e),
            }
        }
        decoded
    }

    /// Readable reviews only; unreadable entries are dropped.
    #[must_use]
    pub fn into_reviews(self) -> Vec<Review> {
        self.decode().reviews
    }
}

/// Keep only reviews without a reply, preserving server order.
#[must_use]
pub fn pending_reviews(reviews: Vec<Review>) -> Vec<Review> {
    reviews.into_iter().filter(|r| !r.has_reply()).collect()
}

/// Review ids arrive as strings or numbers; `null` reads as an empty id.
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
