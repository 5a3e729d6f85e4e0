//! Receipt text processing: duplicate suppression, field extraction and
//! validity.

pub mod dedup;
mod parser;
pub mod rules;
pub mod validator;

pub use dedup::{count_copies, dedupe};
pub use parser::{CompiledCatalog, ComprobanteParser, ExtractionResult};
pub use validator::validate;
