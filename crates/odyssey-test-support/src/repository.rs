//! Test repositories — mock `ContentRepository` implementations for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use odyssey_core::content::{QuestionRow, ScenarioRow};
use odyssey_core::error::DomainError;
use odyssey_core::repository::ContentRepository;

/// A content repository serving fixed rows. The question rows can be swapped
/// between calls to simulate a source that changes underneath a running
/// session, and every fetch is counted.
#[derive(Debug, Default)]
pub struct StaticContentRepository {
    scenarios: Mutex<Vec<ScenarioRow>>,
    questions: Mutex<Vec<QuestionRow>>,
    scenario_fetches: AtomicUsize,
    question_fetches: AtomicUsize,
}

impl StaticContentRepository {
    /// Create a repository that serves `scenarios` and `questions`.
    #[must_use]
    pub fn new(scenarios: Vec<ScenarioRow>, questions: Vec<QuestionRow>) -> Self {
        Self {
            scenarios: Mutex::new(scenarios),
            questions: Mutex::new(questions),
            ..Self::default()
        }
    }

    /// Replace the question rows served from now on.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn set_questions(&self, rows: Vec<QuestionRow>) {
        *self.questions.lock().unwrap() = rows;
    }

    /// Number of `fetch_scenarios` calls so far.
    pub fn scenario_fetches(&self) -> usize {
        self.scenario_fetches.load(Ordering::SeqCst)
    }

    /// Number of `fetch_questions` calls so far.
    pub fn question_fetches(&self) -> usize {
        self.question_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentRepository for StaticContentRepository {
    async fn fetch_scenarios(&self) -> Result<Vec<ScenarioRow>, DomainError> {
        self.scenario_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.scenarios.lock().unwrap().clone())
    }

    async fn fetch_questions(&self) -> Result<Vec<QuestionRow>, DomainError> {
        self.question_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.questions.lock().unwrap().clone())
    }
}

/// A content repository that always returns an infrastructure error. Useful
/// for testing the content-unavailable path.
#[derive(Debug)]
pub struct FailingContentRepository;

#[async_trait]
impl ContentRepository for FailingContentRepository {
    async fn fetch_scenarios(&self) -> Result<Vec<ScenarioRow>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn fetch_questions(&self) -> Result<Vec<QuestionRow>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

/// A content repository that fails its first `failures` calls (of either
/// kind) and then delegates to an inner `StaticContentRepository`.
#[derive(Debug)]
pub struct FlakyContentRepository {
    inner: StaticContentRepository,
    remaining_failures: AtomicUsize,
}

impl FlakyContentRepository {
    /// Create a repository that fails `failures` times before serving rows.
    #[must_use]
    pub fn new(inner: StaticContentRepository, failures: usize) -> Self {
        Self {
            inner,
            remaining_failures: AtomicUsize::new(failures),
        }
    }

    /// Make the next `failures` calls fail again.
    pub fn fail_next(&self, failures: usize) {
        self.remaining_failures.store(failures, Ordering::SeqCst);
    }

    fn should_fail(&self) -> bool {
        self.remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ContentRepository for FlakyContentRepository {
    async fn fetch_scenarios(&self) -> Result<Vec<ScenarioRow>, DomainError> {
        if self.should_fail() {
            return Err(DomainError::Infrastructure("timed out".into()));
        }
        self.inner.fetch_scenarios().await
    }

    async fn fetch_questions(&self) -> Result<Vec<QuestionRow>, DomainError> {
        if self.should_fail() {
            return Err(DomainError::Infrastructure("timed out".into()));
        }
        self.inner.fetch_questions().await
    }
}
