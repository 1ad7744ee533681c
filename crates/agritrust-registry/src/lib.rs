//! # agritrust-registry — Batches, Claims and the Consumer Trail
//!
//! The domain layer of the ledger. It owns:
//!
//! - **Records** ([`model`]): farmers, batch drafts, finalized batches,
//!   claims with evidence, drafts, consumer issues and feedback.
//! - **Storage ports** ([`store`]): one trait per collection, plus
//!   [`MemoryStore`] implementing all of them.
//! - **Consumer codes** ([`code`]) and the **lookup index** ([`index`]) with
//!   atomic reservation.
//! - **Submission** ([`submission`]): digest, issue, log, persist, bind.
//! - **Trail** ([`trail`]): resolve a code and report signature, log and
//!   content signals independently.
//!
//! [`Ledger`] wires all of it together.
//!
//! ## Crate Policy
//!
//! - Records reference each other by identifier only.
//! - Verification outcomes are values; only store faults are errors.
//! - Nothing becomes visible through the index until a submission commits.

pub mod code;
pub mod consumer;
pub mod error;
pub mod index;
pub mod ledger;
pub mod model;
pub mod store;
pub mod submission;
pub mod trail;

pub use code::{CodeGenerator, ConsumerCode, DEFAULT_CODE_PREFIX};
pub use consumer::ConsumerService;
pub use error::{ConsumerError, IndexError, RegistrationError, StoreError, SubmissionError};
pub use index::{CodeIndex, IndexEntry, LookupIndex};
pub use ledger::{BatchRecord, Ledger, LedgerConfig};
pub use model::{
    Batch, BatchDraft, Claim, ClaimDraft, ClaimType, ConsumerIssue, Draft, Evidence,
    EvidenceKind, Farmer, FarmerRegistration, Feedback,
};
pub use store::{
    BatchStore, ClaimStore, CredentialStore, DraftStore, FarmerStore, FeedbackStore, IssueStore,
    MemoryStore, Stores,
};
pub use submission::{Submission, SubmissionOrchestrator, DEFAULT_CODE_ATTEMPTS};
pub use trail::{ContentStatus, LogStatus, SignatureStatus, Trail, TrailReport, TrailService, Verdict};
