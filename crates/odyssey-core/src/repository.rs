//! Content repository abstraction.

use async_trait::async_trait;

use crate::content::{QuestionRow, ScenarioRow};
use crate::error::DomainError;

/// Read-only source of scenario and question rows.
///
/// Both calls are idempotent reads with no caching guarantee: a later call
/// may return the rows in a different order, or none at all. Implementations
/// drop malformed rows before returning. Callers treat `Err` and an empty
/// list the same way.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Fetch the current scenario set, in source order.
    async fn fetch_scenarios(&self) -> Result<Vec<ScenarioRow>, DomainError>;

    /// Fetch the current question set, in source order.
    async fn fetch_questions(&self) -> Result<Vec<QuestionRow>, DomainError>;
}
