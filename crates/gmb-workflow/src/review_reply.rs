//! Review-reply workflow: list unreplied reviews, draft, regenerate, submit.
//!
//! The composer is `closed` (no selection) or `drafting` one review. While
//! drafting, `generating` and `submitting` are independent flags; a submit
//! may go out while a draft is still being generated.
//!
//! Every remote step is split into a `begin_*` transition that returns a
//! ticket and a `complete_*` transition that applies the result. A ticket
//! that no longer matches the composer (another review was selected, the
//! composer closed, or a newer generation started) is discarded on
//! completion, so a late response never lands on the wrong review. The
//! `async` helpers run both halves back to back.

use std::time::{Duration, Instant};

use gmb_client::{ClientError, GmbClient};
use gmb_core::{pending_reviews, Credentials, ResourceName, ResourceNameError, Review, Session};
use gmb_genai::{build_reply_prompt, GenerateError, TextGenerator};

use crate::error::{remote_message, WorkflowError};
use crate::notice::Notice;

/// Confirmation raised after a reply is accepted.
pub const SUBMIT_CONFIRMATION: &str = "Reply submitted successfully!";

const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

/// Whether a failed draft generation is shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationFailurePolicy {
    /// Log only; the composer keeps its previous draft and shows nothing.
    #[default]
    Silent,
    /// Also record the failure on the composer for display.
    Surface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOptions {
    pub notice_ttl: Duration,
    pub generation_failures: GenerationFailurePolicy,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            notice_ttl: DEFAULT_NOTICE_TTL,
            generation_failures: GenerationFailurePolicy::Silent,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ReviewsState {
    #[default]
    Idle,
    Loading,
    /// Reviews without a reply, in server order.
    Loaded(Vec<Review>),
    Failed(String),
}

/// The open composition view for one selected review.
#[derive(Debug, Clone, PartialEq)]
pub struct Composer {
    selection: u64,
    review: Review,
    draft: String,
    generating: bool,
    submitting: bool,
    latest_generation: Option<u64>,
    generation_error: Option<String>,
}

impl Composer {
    #[must_use]
    pub fn review(&self) -> &Review {
        &self.review
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Last generation failure; only set under [`GenerationFailurePolicy::Surface`].
    #[must_use]
    pub fn generation_error(&self) -> Option<&str> {
        self.generation_error.as_deref()
    }
}

/// A pending draft generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    seq: u64,
    selection: u64,
    prompt: String,
}

impl GenerationTicket {
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// A validated reply submission, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    selection: u64,
    credentials: Credentials,
    target: ResourceName,
    review_id: String,
    reply: String,
}

impl SubmitTicket {
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.target.account_id
    }

    #[must_use]
    pub fn location_id(&self) -> &str {
        &self.target.location_id
    }

    #[must_use]
    pub fn review_id(&self) -> &str {
        &self.review_id
    }

    #[must_use]
    pub fn reply(&self) -> &str {
        &self.reply
    }
}

#[derive(Debug, Default)]
pub struct ReviewReplyWorkflow {
    options: WorkflowOptions,
    reviews: ReviewsState,
    composer: Option<Composer>,
    notice: Option<Notice>,
    next_selection: u64,
    next_generation: u64,
}

impl ReviewReplyWorkflow {
    #[must_use]
    pub fn new(options: WorkflowOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn options(&self) -> &WorkflowOptions {
        &self.options
    }

    #[must_use]
    pub fn reviews(&self) -> &ReviewsState {
        &self.reviews
    }

    /// Loaded pending reviews; empty unless the last load succeeded.
    #[must_use]
    pub fn pending(&self) -> &[Review] {
        match &self.reviews {
            ReviewsState::Loaded(reviews) => reviews,
            _ => &[],
        }
    }

    #[must_use]
    pub fn find_review(&self, review_id: &str) -> Option<&Review> {
        self.pending().iter().find(|r| r.review_id == review_id)
    }

    #[must_use]
    pub fn composer(&self) -> Option<&Composer> {
        self.composer.as_ref()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.composer.is_some()
    }

    /// The confirmation notice while it is still visible at `now`.
    #[must_use]
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.is_visible(now))
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Load every review for the session's account and keep the unreplied ones.
    ///
    /// Failures are recorded in [`ReviewsState::Failed`] for display as well
    /// as returned.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::MissingCredentials`] before any request is made.
    /// - [`WorkflowError::Remote`] if the listing request fails.
    pub async fn load_pending_reviews(
        &mut self,
        client: &GmbClient,
        session: &Session,
    ) -> Result<&[Review], WorkflowError> {
        self.reviews = ReviewsState::Loading;

        let creds = match session.credentials() {
            Ok(creds) => creds,
            Err(e) => {
                self.reviews = ReviewsState::Failed(e.to_string());
                return Err(WorkflowError::MissingCredentials(e));
            }
        };

        match client.get_all_reviews(&creds).await {
            Ok(all) => {
                let total = all.len();
                let pending = pending_reviews(all);
                tracing::info!(total, pending = pending.len(), "loaded pending reviews");
                self.reviews = ReviewsState::Loaded(pending);
                Ok(self.pending())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load reviews");
                self.reviews = ReviewsState::Failed(remote_message(&e));
                Err(WorkflowError::Remote(e))
            }
        }
    }

    /// Open the composer for `review`, discarding any previous draft, and
    /// start a draft generation for it.
    pub fn select_review(&mut self, review: Review) -> GenerationTicket {
        self.next_selection += 1;
        self.next_generation += 1;
        tracing::debug!(review_id = %review.review_id, "selected review");

        let mut composer = Composer {
            selection: self.next_selection,
            review,
            draft: String::new(),
            generating: false,
            submitting: false,
            latest_generation: None,
            generation_error: None,
        };
        let ticket = start_generation(&mut composer, self.next_generation);
        self.composer = Some(composer);
        ticket
    }

    /// Start a new generation for the selected review; `None` when nothing
    /// is selected. Supersedes any generation still in flight.
    pub fn regenerate(&mut self) -> Option<GenerationTicket> {
        self.issue_generation()
    }

    /// Apply a generation result. Returns `false` when the ticket is stale
    /// and the result was discarded.
    pub fn complete_generation(
        &mut self,
        ticket: &GenerationTicket,
        result: Result<String, GenerateError>,
    ) -> bool {
        let policy = self.options.generation_failures;
        let Some(composer) = self
            .composer
            .as_mut()
            .filter(|c| c.selection == ticket.selection && c.latest_generation == Some(ticket.seq))
        else {
            tracing::debug!(seq = ticket.seq, "discarding stale draft generation");
            return false;
        };

        composer.generating = false;
        match result {
            Ok(text) => {
                composer.draft = text;
                composer.generation_error = None;
            }
            Err(e) => {
                tracing::error!(
                    review_id = %composer.review.review_id,
                    error = %e,
                    "error generating reply draft"
                );
                if policy == GenerationFailurePolicy::Surface {
                    composer.generation_error = Some(e.to_string());
                }
            }
        }
        true
    }

    /// Run `ticket` against `generator` and apply the result.
    pub async fn run_generation<G: TextGenerator>(
        &mut self,
        generator: &G,
        ticket: GenerationTicket,
    ) -> bool {
        let result = generator.generate(ticket.prompt()).await;
        self.complete_generation(&ticket, result)
    }

    /// Select `review` and wait for its first draft.
    pub async fn select_and_draft<G: TextGenerator>(&mut self, review: Review, generator: &G) {
        let ticket = self.select_review(review);
        self.run_generation(generator, ticket).await;
    }

    /// Regenerate the draft for the selected review; no-op without one.
    pub async fn generate_draft<G: TextGenerator>(&mut self, generator: &G) {
        if let Some(ticket) = self.regenerate() {
            self.run_generation(generator, ticket).await;
        }
    }

    /// Replace the draft with user-edited text. Ignored when closed.
    pub fn edit_draft(&mut self, text: impl Into<String>) {
        if let Some(composer) = self.composer.as_mut() {
            composer.draft = text.into();
        }
    }

    /// Validate and start submitting the current draft.
    ///
    /// # Errors
    ///
    /// Checked in order, each before any request:
    /// - [`WorkflowError::MissingCredentials`]
    /// - [`WorkflowError::NoSelection`]
    /// - [`WorkflowError::MalformedResourceName`] when the selected review's
    ///   resource name is absent or does not split into account and
    ///   location ids.
    pub fn begin_submit(&mut self, session: &Session) -> Result<SubmitTicket, WorkflowError> {
        let credentials = session.credentials()?;
        let composer = self.composer.as_mut().ok_or(WorkflowError::NoSelection)?;
        let name = composer
            .review
            .name
            .as_deref()
            .ok_or(ResourceNameError::Missing)?;
        let target = ResourceName::parse(name)?;

        composer.submitting = true;
        Ok(SubmitTicket {
            selection: composer.selection,
            credentials,
            target,
            review_id: composer.review.review_id.clone(),
            reply: composer.draft.clone(),
        })
    }

    /// Apply a submission result observed at `now`.
    ///
    /// Success raises the confirmation notice and closes the composer if it
    /// still shows the submitted review. Failure leaves the composer open
    /// for another attempt.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Remote`] when `result` is a failure.
    pub fn complete_submit(
        &mut self,
        ticket: &SubmitTicket,
        result: Result<(), ClientError>,
        now: Instant,
    ) -> Result<(), WorkflowError> {
        let current = self
            .composer
            .as_ref()
            .is_some_and(|c| c.selection == ticket.selection);

        match result {
            Ok(()) => {
                if current {
                    self.composer = None;
                }
                self.notice = Some(Notice::new(SUBMIT_CONFIRMATION, now, self.options.notice_ttl));
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    review_id = %ticket.review_id,
                    error = %e,
                    "error submitting reply"
                );
                if let Some(composer) = self.composer.as_mut().filter(|_| current) {
                    composer.submitting = false;
                }
                Err(WorkflowError::Remote(e))
            }
        }
    }

    /// Submit the current draft through `client`.
    ///
    /// # Errors
    ///
    /// See [`ReviewReplyWorkflow::begin_submit`] and
    /// [`ReviewReplyWorkflow::complete_submit`].
    pub async fn submit_reply(
        &mut self,
        client: &GmbClient,
        session: &Session,
    ) -> Result<(), WorkflowError> {
        let ticket = self.begin_submit(session)?;
        let result = client
            .reply_review(
                &ticket.credentials,
                ticket.account_id(),
                ticket.location_id(),
                ticket.review_id(),
                ticket.reply(),
            )
            .await;
        self.complete_submit(&ticket, result, Instant::now())
    }

    /// Discard the draft and close the composer. In-flight calls are not
    /// aborted; their results are discarded on completion.
    pub fn cancel(&mut self) {
        if let Some(composer) = self.composer.take() {
            tracing::debug!(review_id = %composer.review.review_id, "reply composition cancelled");
        }
    }

    fn issue_generation(&mut self) -> Option<GenerationTicket> {
        let composer = self.composer.as_mut()?;
        self.next_generation += 1;
        Some(start_generation(composer, self.next_generation))
    }
}

/// Mark `composer` as generating under `seq` and build the ticket.
fn start_generation(composer: &mut Composer, seq: u64) -> GenerationTicket {
    composer.generating = true;
    composer.latest_generation = Some(seq);
    let review = &composer.review;
    GenerationTicket {
        seq,
        selection: composer.selection,
        prompt: build_reply_prompt(review.comment_text(), review.reviewer_name(), review.rating()),
    }
}
