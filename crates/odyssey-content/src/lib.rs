//! Odyssey — content sources.
//!
//! Implementations of `ContentRepository` that turn positional text rows
//! from a spreadsheet CSV export or a YAML content pack into validated
//! scenario and question rows. Header rows are skipped and malformed rows
//! are dropped here, so the engine only ever sees usable content.

pub mod csv_repository;
pub mod error;
mod rows;
pub mod yaml_repository;

pub use csv_repository::HttpCsvContentRepository;
pub use error::ContentError;
pub use yaml_repository::YamlContentRepository;
