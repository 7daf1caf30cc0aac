//! JSON Output

use crate::report::ExportDocument;
use crate::ExportError;

/// Generate the prettified JSON export.
///
/// Serializes the document into machine-readable bytes; results keep the
/// store's insertion order.
pub fn generate_json_export(document: &ExportDocument) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(document)?)
}
