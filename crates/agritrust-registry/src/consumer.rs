//! # Consumer Issues and Feedback
//!
//! Consumers can flag a problem with a batch or rate it. Both are keyed by
//! the consumer code, and the code must be bound.

use std::sync::Arc;

use uuid::Uuid;

use agritrust_core::Timestamp;

use crate::code::ConsumerCode;
use crate::error::ConsumerError;
use crate::index::LookupIndex;
use crate::model::{ConsumerIssue, Feedback};
use crate::store::Stores;

/// Accepted rating range.
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Clone)]
pub struct ConsumerService {
    stores: Stores,
    index: Arc<dyn LookupIndex>,
}

impl ConsumerService {
    pub fn new(stores: Stores, index: Arc<dyn LookupIndex>) -> Self {
        Self { stores, index }
    }

    /// Record a problem report against a bound code.
    pub fn report_issue(
        &self,
        code: &str,
        description: &str,
        contact: Option<String>,
        now: Timestamp,
    ) -> Result<ConsumerIssue, ConsumerError> {
        let code = self.bound_code(code)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(ConsumerError::EmptyField("description"));
        }
        let issue = ConsumerIssue {
            id: Uuid::new_v4(),
            code,
            description: description.to_string(),
            contact: contact.filter(|c| !c.trim().is_empty()),
            reported_at: now,
        };
        self.stores.issues.add(issue.clone())?;
        tracing::info!(code = %issue.code, issue_id = %issue.id, "consumer issue reported");
        Ok(issue)
    }

    /// Record a 1 to 5 rating against a bound code.
    pub fn leave_feedback(
        &self,
        code: &str,
        rating: u8,
        comment: &str,
        now: Timestamp,
    ) -> Result<Feedback, ConsumerError> {
        if !RATING_RANGE.contains(&rating) {
            return Err(ConsumerError::InvalidRating(rating));
        }
        let code = self.bound_code(code)?;
        let feedback = Feedback {
            id: Uuid::new_v4(),
            code,
            rating,
            comment: comment.trim().to_string(),
            submitted_at: now,
        };
        self.stores.feedback.add(feedback.clone())?;
        tracing::info!(code = %feedback.code, rating, "consumer feedback recorded");
        Ok(feedback)
    }

    pub fn issues(&self, code: &str) -> Result<Vec<ConsumerIssue>, ConsumerError> {
        let code = self.bound_code(code)?;
        Ok(self.stores.issues.list_by_code(&code)?)
    }

    pub fn feedback(&self, code: &str) -> Result<Vec<Feedback>, ConsumerError> {
        let code = self.bound_code(code)?;
        Ok(self.stores.feedback.list_by_code(&code)?)
    }

    fn bound_code(&self, code: &str) -> Result<ConsumerCode, ConsumerError> {
        let unknown = || ConsumerError::UnknownCode(code.to_string());
        let parsed = ConsumerCode::parse(code.trim()).map_err(|_| unknown())?;
        if self.index.get(&parsed).is_none() {
            return Err(unknown());
        }
        Ok(parsed)
    }
}

impl std::fmt::Debug for ConsumerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerService").finish_non_exhaustive()
    }
}
