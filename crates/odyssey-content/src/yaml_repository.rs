//! YAML content pack implementation of the `ContentRepository` trait.
//!
//! A content pack lists rows in the same positional layout as the CSV
//! exports:
//!
//! ```yaml
//! scenarios:
//!   - ["Storm at night", "Shelter", 30, "Push on", 10, "Option 2"]
//! questions:
//!   - ["Largest ocean?", "Atlantic", "Pacific", "Indian", 2, 10]
//! ```

use std::path::Path;

use async_trait::async_trait;
use odyssey_core::content::{QuestionRow, ScenarioRow};
use odyssey_core::error::DomainError;
use odyssey_core::repository::ContentRepository;
use serde::Deserialize;
use serde_yaml::Value;
use tracing::info;

use crate::error::ContentError;
use crate::rows::{valid_questions, valid_scenarios};

#[derive(Debug, Default, Deserialize)]
struct ContentPack {
    #[serde(default)]
    scenarios: Vec<Vec<Value>>,
    #[serde(default)]
    questions: Vec<Vec<Value>>,
}

/// Content repository backed by a content pack loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct YamlContentRepository {
    scenarios: Vec<ScenarioRow>,
    questions: Vec<QuestionRow>,
}

impl YamlContentRepository {
    /// Loads a content pack from a file.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the file cannot be read or is not a valid
    /// content pack.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let repo = Self::parse(&text, &path.display().to_string())?;
        info!(
            path = %path.display(),
            scenarios = repo.scenarios.len(),
            questions = repo.questions.len(),
            "loaded content pack"
        );
        Ok(repo)
    }

    /// Parses a content pack from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Yaml` if the text is not a valid content pack.
    pub fn from_yaml(text: &str) -> Result<Self, ContentError> {
        Self::parse(text, "inline")
    }

    fn parse(text: &str, source: &str) -> Result<Self, ContentError> {
        let pack: ContentPack = serde_yaml::from_str::<Option<ContentPack>>(text)?.unwrap_or_default();
        let scenarios: Vec<Vec<String>> = pack.scenarios.iter().map(|row| fields(row)).collect();
        let questions: Vec<Vec<String>> = pack.questions.iter().map(|row| fields(row)).collect();

        Ok(Self {
            scenarios: valid_scenarios(&scenarios, source),
            questions: valid_questions(&questions, source),
        })
    }
}

#[async_trait]
impl ContentRepository for YamlContentRepository {
    async fn fetch_scenarios(&self) -> Result<Vec<ScenarioRow>, DomainError> {
        Ok(self.scenarios.clone())
    }

    async fn fetch_questions(&self) -> Result<Vec<QuestionRow>, DomainError> {
        Ok(self.questions.clone())
    }
}

/// Renders YAML scalars as the text a spreadsheet cell would hold.
/// Nested values become empty fields and fail validation downstream.
fn fields(row: &[Value]) -> Vec<String> {
    row.iter()
        .map(|value| match value {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            Value::Null | Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => String::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACK: &str = r#"
scenarios:
  - ["Storm at night", "Shelter", 30, "Push on", 10, "Option 2"]
  - ["Calm sea", "Sail", 5, "Rest", 15]
  - ["Broken", "Sail", "five", "Rest", 15]
questions:
  - ["Largest ocean?", "Atlantic", "Pacific", "Indian", 2, 10]
  - ["No answers"]
"#;

    #[tokio::test]
    async fn test_from_yaml_keeps_only_valid_rows() {
        // Arrange
        let repo = YamlContentRepository::from_yaml(PACK).unwrap();

        // Act
        let scenarios = repo.fetch_scenarios().await.unwrap();
        let questions = repo.fetch_questions().await.unwrap();

        // Assert
        let keys: Vec<&str> = scenarios.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, ["Storm at night", "Calm sea"]);
        assert_eq!(scenarios[0].options[0].cost, 30);
        assert_eq!(scenarios[0].bonus_option.map(|token| token.get()), Some(2));
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct.get(), 2);
    }

    #[tokio::test]
    async fn test_empty_document_has_no_content() {
        let repo = YamlContentRepository::from_yaml("").unwrap();

        assert!(repo.fetch_scenarios().await.unwrap().is_empty());
        assert!(repo.fetch_questions().await.unwrap().is_empty());
    }

    #[test]
    fn test_from_yaml_rejects_wrong_shape() {
        let result = YamlContentRepository::from_yaml("scenarios: 5");

        assert!(matches!(result, Err(ContentError::Yaml(_))));
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let result = YamlContentRepository::from_path("/nonexistent/odyssey/content.yaml");

        assert!(matches!(result, Err(ContentError::Io(_))));
    }
}
