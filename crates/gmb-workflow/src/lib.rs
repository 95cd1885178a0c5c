//! Client-side request/state synchronization for the review dashboard.
//!
//! [`LocationStore`] tracks the lifecycle of a single location fetch.
//! [`ReviewReplyWorkflow`] drives listing unreplied reviews, drafting a reply
//! with a [`gmb_genai::TextGenerator`], and submitting it. Both are plain
//! state owned by one task; the presentation layer reads their state after
//! each transition.

pub mod error;
pub mod location_store;
pub mod notice;
pub mod review_reply;

pub use error::{LocationError, WorkflowError};
pub use location_store::{LocationState, LocationStore, FETCH_FAILED_FALLBACK};
pub use notice::Notice;
pub use review_reply::{
    Composer, GenerationFailurePolicy, GenerationTicket, ReviewReplyWorkflow, ReviewsState,
    SubmitTicket, WorkflowOptions, SUBMIT_CONFIRMATION,
};
