//! Encoding schema loader.
//!
//! A schema document is a YAML sequence of question rules:
//!
//! ```yaml
//! - question: "¿Te gusta programar?"
//!   type: binary
//!   encoding:
//!     "Sí": 1
//!     "No": 0
//! - question: "¿Qué lugar(es) utilizas para estudiar?"
//!   type: multiselect
//!   encoding:
//!     Biblioteca: A
//!     Casa: B
//! ```
//!
//! The form wrapped under a `survey_responses` key is accepted as well.

mod error;
mod loader;

pub use error::{Result, SchemaError};
pub use loader::{load_schema, parse_schema};
