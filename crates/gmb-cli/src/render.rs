//! Plain-text rendering of workflow state.

use chrono::{DateTime, Local, TimeZone, Utc};
use gmb_core::Review;
use gmb_workflow::Composer;

const STAR: char = '★';

/// One star per rating point; unrecognized ratings render as nothing.
pub(crate) fn stars(rating: u8) -> String {
    std::iter::repeat_n(STAR, usize::from(rating)).collect()
}

pub(crate) fn format_timestamp<Tz>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%Y-%m-%d  %H:%M:%S").to_string()
}

pub(crate) fn review_block(review: &Review) -> String {
    let when = review
        .created_at()
        .map(|at| format_timestamp(at, &Local))
        .unwrap_or_default();
    format!(
        "{name}  {when}\n  {comment}\n  {stars}\n  id: {id}\n",
        name = review.reviewer_name(),
        comment = review.display_comment(),
        stars = stars(review.rating()),
        id = review.review_id,
    )
}

/// The pending-reviews listing, headed by the signed-in account when known.
pub(crate) fn reviews_page(reviews: &[Review], account_name: Option<&str>) -> String {
    let mut out = String::from("CUSTOMER REVIEWS WITHOUT REPLIES\n");
    if let Some(account) = account_name {
        out.push_str(&format!("Account: {account}\n"));
    }
    out.push('\n');
    if reviews.is_empty() {
        out.push_str("No reviews found\n");
        return out;
    }
    for review in reviews {
        out.push_str(&review_block(review));
        out.push('\n');
    }
    out
}

pub(crate) fn composer_view(composer: &Composer) -> String {
    let mut out = String::from("Generated Reply\n---------------\n");
    if composer.is_generating() {
        out.push_str("Generating AI reply...\n");
    } else {
        out.push_str(composer.draft());
        out.push('\n');
    }
    if let Some(err) = composer.generation_error() {
        out.push_str(&format!("(could not generate a reply: {err})\n"));
    }
    out
}

pub(crate) fn not_found_page(status: u16) -> String {
    format!("404 | Page not found (location request returned HTTP {status})\n")
}
