//! Prompt construction for reply drafts.

/// Instruction added only for ratings of 3 or less.
pub const CONCERN_CLAUSE: &str =
    "If the rating is 3 or less, acknowledge the concerns and invite suggestions for improvement.";

/// Ratings at or below this value get the [`CONCERN_CLAUSE`].
const CONCERN_THRESHOLD: u8 = 3;

/// Builds the drafting prompt for one review.
///
/// A missing or blank `comment` yields a short thank-you prompt. Otherwise
/// the prompt asks for a reply that addresses the reviewer by name, keeps a
/// friendly professional tone, ends with thanks and carries no signature;
/// ratings of 3 or less also get [`CONCERN_CLAUSE`]. A rating of `0`
/// (unrecognized label) counts as low.
#[must_use]
pub fn build_reply_prompt(comment: Option<&str>, reviewer: &str, rating: u8) -> String {
    let Some(comment) = comment.filter(|c| !c.trim().is_empty()) else {
        return format!(
            "Respond to this customer feedback with a simple thank you. \
             Customer: {reviewer}, Rating: {rating}."
        );
    };

    let mut instructions = vec![
        "Address the customer by name.",
        "Use a friendly and professional tone.",
        "End with a thank you!",
    ];
    if rating <= CONCERN_THRESHOLD {
        instructions.push(CONCERN_CLAUSE);
    }
    instructions.push("No signatures or company names.");

    let mut prompt = format!(
        "Respond to this customer feedback:\n\
         Customer: {reviewer}\n\
         Rating: {rating}\n\
         Comment: \"{comment}\"\n"
    );
    for (i, line) in instructions.iter().enumerate() {
        prompt.push_str(&format!("{}. {line}\n", i + 1));
    }
    prompt
}
