//! JSON Schema validation of written STAC records.
//!
//! Documents are first deserialized into the `stac` crate's typed records,
//! then checked against the core STAC schema and the schema of every
//! extension listed in `stac_extensions`. Extension schemas are fetched
//! over HTTPS.

use std::path::Path;

use serde_json::Value;
use stac::Validate;
use tracing::debug;

use crate::error::{Result, StacError};
use crate::model::{Collection, Item};

/// Validate an item against the core and extension schemas.
pub async fn validate_item(item: &Item) -> Result<()> {
    item.validate()?;
    debug!(id = %item.id, "STAC item is valid");
    Ok(())
}

/// Validate a collection against the core and extension schemas.
pub async fn validate_collection(collection: &Collection) -> Result<()> {
    collection.validate()?;
    debug!(id = %collection.id, "STAC collection is valid");
    Ok(())
}

/// Read a written record back, validate it according to its `type` and
/// return the raw document.
pub async fn read_and_validate(path: &Path) -> Result<Value> {
    let doc: Value = serde_json::from_str(&tokio::fs::read_to_string(path).await?)?;
    match doc.get("type").and_then(Value::as_str) {
        Some("Feature") => validate_item(&serde_json::from_value(doc.clone())?).await?,
        Some("Collection") => validate_collection(&serde_json::from_value(doc.clone())?).await?,
        Some(other) => return Err(StacError::UnknownRecordType(other.to_string())),
        None => return Err(StacError::UnknownRecordType("<missing>".to_string())),
    }
    Ok(doc)
}
