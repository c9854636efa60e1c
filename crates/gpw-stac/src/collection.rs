//! STAC collection for a whole GPW dataset.

use serde_json::{json, Map, Value};
use stac::Provider;
use tracing::info;

use gpw_common::time::year_start;
use gpw_common::{
    BoundingBox, GPW_BOUNDING_BOX, GPW_LICENSE, GPW_PROVIDER_NAME, GPW_PROVIDER_ROLES,
    GPW_PROVIDER_URL,
};

use crate::dataset::DatasetKind;
use crate::error::Result;
use crate::model::{license_link, Collection, ITEM_ASSETS_EXTENSION, SCIENTIFIC_EXTENSION};

pub fn provider() -> Result<Provider> {
    Ok(serde_json::from_value(json!({
        "name": GPW_PROVIDER_NAME,
        "roles": GPW_PROVIDER_ROLES,
        "url": GPW_PROVIDER_URL,
    }))?)
}

/// Build the collection record of `kind`, covering the whole globe and the
/// dataset's census years.
pub fn build_collection(kind: DatasetKind) -> Result<Collection> {
    let dataset = kind.dataset();
    let start = year_start(dataset.start_year)?;
    let end = year_start(dataset.end_year)?;
    let bbox = BoundingBox::from_corners(GPW_BOUNDING_BOX);

    let mut collection = Collection::new(dataset.id.to_string(), dataset.description.to_string());
    collection.extensions = vec![
        ITEM_ASSETS_EXTENSION.to_string(),
        SCIENTIFIC_EXTENSION.to_string(),
    ];
    collection.title = Some(dataset.title.to_string());
    collection.keywords = Some(dataset.keywords.iter().map(|k| k.to_string()).collect());
    collection.license = GPW_LICENSE.to_string();
    collection.providers = Some(vec![provider()?]);
    collection.extent = serde_json::from_value(json!({
        "spatial": { "bbox": [bbox.to_vec()] },
        "temporal": { "interval": [[start, end]] },
    }))?;
    collection.links = vec![license_link()];

    let item_assets: Map<String, Value> = dataset
        .assets
        .iter()
        .map(|def| (def.key.to_string(), Value::Object(def.fields())))
        .collect();

    let fields = &mut collection.additional_fields;
    fields.insert("item_assets".to_string(), Value::Object(item_assets));
    if let (Some(doi), Some(citation)) = (dataset.doi, dataset.citation()) {
        fields.insert("sci:doi".to_string(), json!(doi));
        fields.insert("sci:citation".to_string(), json!(citation));
    }
    let publications: Vec<_> = dataset
        .publications()
        .into_iter()
        .map(|(doi, citation)| json!({ "doi": doi, "citation": citation }))
        .collect();
    fields.insert("sci:publications".to_string(), json!(publications));

    info!(id = %collection.id, assets = dataset.assets.len(), "Built STAC collection");
    Ok(collection)
}
