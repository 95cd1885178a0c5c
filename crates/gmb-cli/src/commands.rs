//! Command handlers. Each one owns a store or workflow for the duration of
//! the command and renders its state to stdout.

use std::io::Write;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use gmb_client::GmbClient;
use gmb_core::{AppConfig, FileSessionStore, Session};
use gmb_genai::GeminiClient;
use gmb_workflow::{
    GenerationFailurePolicy, LocationError, LocationStore, ReviewReplyWorkflow, ReviewsState,
    WorkflowError, WorkflowOptions,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::render;

/// Shared per-invocation state: the backend client and the session.
pub(crate) struct Context {
    pub(crate) client: GmbClient,
    pub(crate) session: Session,
}

impl Context {
    pub(crate) fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        let client = GmbClient::new(&config.api_base_url, &config.user_agent, timeout)?;
        let store = FileSessionStore::load(&config.session_path).with_context(|| {
            format!(
                "failed to load session from {}",
                config.session_path.display()
            )
        })?;
        Ok(Self {
            client,
            session: Session::from_store(&store),
        })
    }
}

pub(crate) fn workflow_options(config: &AppConfig) -> WorkflowOptions {
    WorkflowOptions {
        notice_ttl: config.notice_ttl(),
        generation_failures: if config.surface_generation_errors {
            GenerationFailurePolicy::Surface
        } else {
            GenerationFailurePolicy::Silent
        },
    }
}

pub(crate) async fn run_location(ctx: &Context, place_id: &str) -> anyhow::Result<ExitCode> {
    let mut store = LocationStore::new();
    match store.fetch(&ctx.client, &ctx.session, place_id).await {
        Ok(()) => {
            if let Some(data) = store.data() {
                println!("{}", serde_json::to_string_pretty(data)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(LocationError::Abandoned { status }) => {
            eprint!("{}", render::not_found_page(status));
            Ok(ExitCode::from(2))
        }
        Err(e) => {
            eprintln!("{}", store.error().map_or_else(|| e.to_string(), str::to_owned));
            Ok(ExitCode::FAILURE)
        }
    }
}

pub(crate) async fn run_reviews(ctx: &Context) -> anyhow::Result<ExitCode> {
    let mut workflow = ReviewReplyWorkflow::default();
    // The failure is already captured in the reviews state.
    let _ = workflow.load_pending_reviews(&ctx.client, &ctx.session).await;

    match workflow.reviews() {
        ReviewsState::Loaded(reviews) => {
            let account = ctx.session.gmb_account_name.as_deref();
            print!("{}", render::reviews_page(reviews, account));
            Ok(ExitCode::SUCCESS)
        }
        ReviewsState::Failed(message) => {
            eprintln!("Error fetching reviews: {message}");
            Ok(ExitCode::FAILURE)
        }
        ReviewsState::Idle | ReviewsState::Loading => Ok(ExitCode::FAILURE),
    }
}

/// User intents accepted by the interactive composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComposerAction {
    Submit,
    Regenerate,
    Edit,
    Cancel,
}

pub(crate) fn parse_action(input: &str) -> Option<ComposerAction> {
    match input.trim().to_ascii_lowercase().as_str() {
        "s" | "submit" => Some(ComposerAction::Submit),
        "r" | "regenerate" => Some(ComposerAction::Regenerate),
        "e" | "edit" => Some(ComposerAction::Edit),
        "c" | "cancel" => Some(ComposerAction::Cancel),
        _ => None,
    }
}

pub(crate) async fn run_reply(
    ctx: &Context,
    config: &AppConfig,
    review_id: &str,
    auto_submit: bool,
) -> anyhow::Result<ExitCode> {
    let api_key = config
        .ai_api_key
        .as_deref()
        .context("GMB_AI_API_KEY must be set to draft replies")?;
    let timeout = config.request_timeout_secs.map(Duration::from_secs);
    let generator = GeminiClient::new(&config.ai_base_url, &config.ai_model, api_key, timeout)?;

    let mut workflow = ReviewReplyWorkflow::new(workflow_options(config));
    if let Err(e) = workflow.load_pending_reviews(&ctx.client, &ctx.session).await {
        eprintln!("Error fetching reviews: {e}");
        return Ok(ExitCode::FAILURE);
    }
    let Some(review) = workflow.find_review(review_id).cloned() else {
        eprintln!("No pending review with id {review_id}");
        return Ok(ExitCode::FAILURE);
    };

    print!("{}", render::review_block(&review));
    workflow.select_and_draft(review, &generator).await;

    if auto_submit {
        let submitted = submit(ctx, &mut workflow).await?;
        return Ok(if submitted {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(composer) = workflow.composer() else {
            return Ok(ExitCode::SUCCESS);
        };
        print!("\n{}", render::composer_view(composer));
        prompt("[s]ubmit  [r]egenerate  [e]dit  [c]ancel > ")?;

        let Some(line) = lines.next_line().await? else {
            workflow.cancel();
            return Ok(ExitCode::SUCCESS);
        };
        match parse_action(&line) {
            Some(ComposerAction::Submit) => {
                if submit(ctx, &mut workflow).await? {
                    return Ok(ExitCode::SUCCESS);
                }
            }
            Some(ComposerAction::Regenerate) => workflow.generate_draft(&generator).await,
            Some(ComposerAction::Edit) => edit(&mut workflow, &mut lines).await?,
            Some(ComposerAction::Cancel) => {
                workflow.cancel();
                println!("Cancelled.");
                return Ok(ExitCode::SUCCESS);
            }
            None => println!("Unrecognized choice: {}", line.trim()),
        }
    }
}

/// Submit the current draft. `Ok(false)` means the composer is still open.
async fn submit(ctx: &Context, workflow: &mut ReviewReplyWorkflow) -> anyhow::Result<bool> {
    if workflow.composer().is_some_and(|c| c.draft().trim().is_empty()) {
        eprintln!("There is no draft to submit yet; regenerate or edit it first.");
        return Ok(false);
    }

    match workflow.submit_reply(&ctx.client, &ctx.session).await {
        Ok(()) => {
            if let Some(notice) = workflow.notice(Instant::now()) {
                println!("{}", notice.message());
            }
            Ok(true)
        }
        Err(
            e @ (WorkflowError::MalformedResourceName(_) | WorkflowError::MissingCredentials(_)),
        ) => {
            eprintln!("Cannot submit: {e}");
            Ok(false)
        }
        Err(e) => {
            eprintln!("Error submitting reply: {e}");
            Ok(false)
        }
    }
}

async fn edit(
    workflow: &mut ReviewReplyWorkflow,
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<()> {
    prompt("New reply (single line): ")?;
    if let Some(text) = lines.next_line().await? {
        let text = text.trim();
        if !text.is_empty() {
            workflow.edit_draft(text);
        }
    }
    Ok(())
}

fn prompt(text: &str) -> anyhow::Result<()> {
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(())
}
