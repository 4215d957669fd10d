//! Interchange document for morph sets: Y-up JSON with basis positions and sparse deltas.

mod document;
mod error;

pub use document::{
    ExportDelta, ExportDocument, ExportTarget, FORMAT_VERSION, export, import, read_json,
    to_json_string, to_y_up, write_json,
};
pub use error::ExportError;
