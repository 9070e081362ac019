//! Spreadsheet CSV export implementation of the `ContentRepository` trait.

use async_trait::async_trait;
use odyssey_core::content::{QuestionRow, ScenarioRow};
use odyssey_core::error::DomainError;
use odyssey_core::repository::ContentRepository;
use tracing::{debug, instrument};

use crate::error::ContentError;
use crate::rows::{valid_questions, valid_scenarios};

/// Content repository that downloads two CSV exports (one for scenarios, one
/// for questions) on every fetch. The first line of each export is a header
/// and is skipped.
#[derive(Debug, Clone)]
pub struct HttpCsvContentRepository {
    client: reqwest::Client,
    scenarios_url: String,
    questions_url: String,
}

impl HttpCsvContentRepository {
    /// Creates a repository reading from the given export URLs.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        scenarios_url: impl Into<String>,
        questions_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            scenarios_url: scenarios_url.into(),
            questions_url: questions_url.into(),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_records(&self, url: &str) -> Result<Vec<Vec<String>>, ContentError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let records = parse_csv(&body)?;
        debug!(rows = records.len(), "fetched csv export");
        Ok(records)
    }
}

#[async_trait]
impl ContentRepository for HttpCsvContentRepository {
    async fn fetch_scenarios(&self) -> Result<Vec<ScenarioRow>, DomainError> {
        let records = self
            .fetch_records(&self.scenarios_url)
            .await
            .map_err(infrastructure)?;
        Ok(valid_scenarios(&records, &self.scenarios_url))
    }

    async fn fetch_questions(&self) -> Result<Vec<QuestionRow>, DomainError> {
        let records = self
            .fetch_records(&self.questions_url)
            .await
            .map_err(infrastructure)?;
        Ok(valid_questions(&records, &self.questions_url))
    }
}

/// Splits a CSV document into records of trimmed fields, skipping the
/// header line. Records may have differing lengths so an optional trailing
/// column can be left out.
///
/// # Errors
///
/// Returns `ContentError::Csv` if the document is not valid CSV.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>, ContentError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_owned).collect());
    }
    Ok(records)
}

fn infrastructure(err: ContentError) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}
