//! Content row model.
//!
//! Content arrives as positional text rows. A scenario row is
//! `[key, option1Text, option1Cost, option2Text, option2Cost, bonusMarker?]`
//! and a question row is
//! `[key, option1Text, option2Text, option3Text, correctToken, points]`.
//! The first field doubles as the row's display text and its identity for
//! anti-repeat tracking.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of round a session is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundKind {
    /// A two-option decision that costs time.
    Scenario,
    /// A three-option quiz question worth points.
    Question,
}

impl RoundKind {
    /// Number of options an item of this kind offers.
    #[must_use]
    pub const fn option_count(self) -> u8 {
        match self {
            Self::Scenario => ScenarioRow::OPTION_COUNT,
            Self::Question => QuestionRow::OPTION_COUNT,
        }
    }
}

impl fmt::Display for RoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scenario => f.write_str("scenario"),
            Self::Question => f.write_str("question"),
        }
    }
}

/// A 1-based option number chosen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionToken(u8);

impl OptionToken {
    /// Parses raw player text into a token in `1..=option_count`.
    ///
    /// The text is trimmed first; anything other than a single digit in range
    /// yields `None`, so signs and leading zeros are rejected.
    #[must_use]
    pub fn parse(raw: &str, option_count: u8) -> Option<Self> {
        match raw.trim().as_bytes() {
            &[digit @ b'1'..=b'9'] if digit - b'0' <= option_count => Some(Self(digit - b'0')),
            _ => None,
        }
    }

    /// Parses a content-sheet marker such as `"Option 2"` or `"2"`.
    ///
    /// Case and surrounding whitespace are ignored.
    #[must_use]
    pub fn parse_marker(raw: &str, option_count: u8) -> Option<Self> {
        let trimmed = raw.trim();
        let number = trimmed
            .get(..6)
            .filter(|prefix| prefix.eq_ignore_ascii_case("option"))
            .map_or(trimmed, |_| &trimmed[6..]);
        Self::parse(number, option_count)
    }

    /// Returns the option number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the zero-based index of the option.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }
}

impl fmt::Display for OptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a raw row was excluded from the usable content set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The row has fewer fields than its kind requires.
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields {
        /// Required field count.
        expected: usize,
        /// Actual field count.
        found: usize,
    },

    /// The key field is blank.
    #[error("row key is empty")]
    EmptyKey,

    /// A numeric field does not hold a non-negative integer.
    #[error("field {field} is not a non-negative integer: {value:?}")]
    NotANumber {
        /// Name of the offending field.
        field: &'static str,
        /// Its raw text.
        value: String,
    },

    /// The correct-answer field does not name one of the options.
    #[error("correct option {0:?} is not between 1 and 3")]
    BadCorrectOption(String),
}

/// One option of a scenario: its label and the time it costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOption {
    /// Text shown to the player.
    pub text: String,
    /// Time added to the session when chosen.
    pub cost: u32,
}

/// A validated scenario row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRow {
    /// Scenario text, also its identity.
    pub key: String,
    /// The two options, in presentation order.
    pub options: [ScenarioOption; 2],
    /// The option that grants a distinction when chosen, if any.
    pub bonus_option: Option<OptionToken>,
}

impl ScenarioRow {
    /// Number of options a scenario offers.
    pub const OPTION_COUNT: u8 = 2;

    const REQUIRED_FIELDS: usize = 5;

    /// Parses a positional scenario row.
    ///
    /// An unrecognised bonus marker is treated as "no bonus" rather than as a
    /// malformed row.
    ///
    /// # Errors
    ///
    /// Returns `RowError` if fields are missing, the key is blank, or a cost
    /// is not a non-negative integer.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, RowError> {
        require_fields(fields, Self::REQUIRED_FIELDS)?;
        let key = parse_key(fields[0].as_ref())?;
        let options = [
            ScenarioOption {
                text: fields[1].as_ref().trim().to_owned(),
                cost: parse_number("option_1_cost", fields[2].as_ref())?,
            },
            ScenarioOption {
                text: fields[3].as_ref().trim().to_owned(),
                cost: parse_number("option_2_cost", fields[4].as_ref())?,
            },
        ];
        let bonus_option = fields
            .get(5)
            .and_then(|marker| OptionToken::parse_marker(marker.as_ref(), Self::OPTION_COUNT));

        Ok(Self {
            key,
            options,
            bonus_option,
        })
    }

    /// Returns the option selected by `token`.
    #[must_use]
    pub fn option(&self, token: OptionToken) -> &ScenarioOption {
        &self.options[token.index()]
    }
}

/// A validated question row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRow {
    /// Question text, also its identity.
    pub key: String,
    /// The three answer labels, in presentation order.
    pub options: [String; 3],
    /// The correct answer.
    pub correct: OptionToken,
    /// Points awarded for a correct answer.
    pub points: u32,
}

impl QuestionRow {
    /// Number of options a question offers.
    pub const OPTION_COUNT: u8 = 3;

    const REQUIRED_FIELDS: usize = 6;

    /// Parses a positional question row.
    ///
    /// # Errors
    ///
    /// Returns `RowError` if fields are missing, the key is blank, the correct
    /// option is out of range, or the points value is not a non-negative
    /// integer.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, RowError> {
        require_fields(fields, Self::REQUIRED_FIELDS)?;
        let key = parse_key(fields[0].as_ref())?;
        let options = [
            fields[1].as_ref().trim().to_owned(),
            fields[2].as_ref().trim().to_owned(),
            fields[3].as_ref().trim().to_owned(),
        ];
        let raw_correct = fields[4].as_ref();
        let correct = OptionToken::parse_marker(raw_correct, Self::OPTION_COUNT)
            .ok_or_else(|| RowError::BadCorrectOption(raw_correct.to_owned()))?;
        let points = parse_number("points", fields[5].as_ref())?;

        Ok(Self {
            key,
            options,
            correct,
            points,
        })
    }
}

/// Parses a list of raw rows, splitting them into usable rows and rejects.
///
/// Rejects carry their zero-based position in `rows` so the caller can log
/// them.
pub fn parse_rows<T, R, S>(
    rows: &[R],
    parse: impl Fn(&[S]) -> Result<T, RowError>,
) -> (Vec<T>, Vec<(usize, RowError)>)
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut parsed = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        match parse(row.as_ref()) {
            Ok(item) => parsed.push(item),
            Err(err) => rejected.push((index, err)),
        }
    }
    (parsed, rejected)
}

fn require_fields<S>(fields: &[S], expected: usize) -> Result<(), RowError> {
    if fields.len() < expected {
        return Err(RowError::MissingFields {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

fn parse_key(raw: &str) -> Result<String, RowError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(RowError::EmptyKey);
    }
    Ok(key.to_owned())
}

fn parse_number(field: &'static str, raw: &str) -> Result<u32, RowError> {
    raw.trim().parse().map_err(|_| RowError::NotANumber {
        field,
        value: raw.to_owned(),
    })
}
