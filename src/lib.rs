//! Core library for bulker: describe a folder of sounds in a bulk-upload CSV.
pub mod config;
pub mod csv;
pub mod encoding;
pub mod error;
pub mod files;
pub mod form;
pub mod geotag;
pub mod models;
pub mod prompt;
pub mod tags;
pub mod util;
pub mod validate;

pub use csv::generate;
pub use error::{BulkerError, ValidationError};
pub use models::{CsvDocument, CsvRow, Frontend, License, Outcome, RunParameters};
