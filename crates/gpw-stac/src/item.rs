//! STAC item assembly from a group of co-located GPW COGs.

use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use geotiff_reader::RasterHeader;
use gpw_common::time::year_start;
use gpw_common::{BoundingBox, CrsCode, TimeRange, GPW_EPSG};

use crate::assets::{match_asset, AssetDefinition};
use crate::dataset::{Dataset, DatasetKind};
use crate::error::{Result, StacError};
use crate::filename::{GpwFileName, TileIndex};
use crate::model::{
    license_link, set_link, Item, FILE_EXTENSION, PROJECTION_EXTENSION, RASTER_EXTENSION,
    SCIENTIFIC_EXTENSION,
};
use crate::size::{local_path, SizeProbe};

/// Builds one item per tile group of a dataset.
#[derive(Debug, Clone)]
pub struct ItemBuilder {
    dataset: &'static Dataset,
    probe: SizeProbe,
}

impl ItemBuilder {
    pub fn new(kind: DatasetKind) -> Result<Self> {
        Ok(Self {
            dataset: kind.dataset(),
            probe: SizeProbe::new()?,
        })
    }

    pub fn dataset(&self) -> &'static Dataset {
        self.dataset
    }

    /// Build an item from exactly one COG per asset of the dataset.
    ///
    /// Hrefs may come in any order; each is matched to its asset by file
    /// name. Projection fields come from the first href, which must be a
    /// local file.
    #[instrument(skip_all, fields(dataset = %self.dataset.kind, hrefs = hrefs.len()))]
    pub async fn build(&self, hrefs: &[String]) -> Result<Item> {
        let dataset = self.dataset;
        if hrefs.len() != dataset.assets.len() {
            return Err(StacError::WrongAssetCount {
                dataset: dataset.id,
                expected: dataset.assets.len(),
                actual: hrefs.len(),
            });
        }

        let names = hrefs
            .iter()
            .map(|href| GpwFileName::parse(href))
            .collect::<Result<Vec<_>>>()?;
        let tile = common_tile(&names)?;
        let year = item_year(dataset, &names)?;
        let assigned = assign_assets(dataset, hrefs, &names)?;
        let id = item_id(dataset, &names[0], year, tile);
        debug!(id = %id, year = year, "Derived item id");

        let first = read_header(&hrefs[0])?;
        let epsg = match first.epsg {
            Some(code) => code,
            None => {
                warn!(href = %hrefs[0], "No EPSG code in raster header; assuming {}", GPW_EPSG);
                GPW_EPSG
            }
        };
        let crs = CrsCode::from_epsg(epsg)?;
        let bounds = first.bounds().clamp_to(&BoundingBox::global());

        let mut item = Item::new(id);
        item.extensions = vec![
            PROJECTION_EXTENSION.to_string(),
            RASTER_EXTENSION.to_string(),
            FILE_EXTENSION.to_string(),
            SCIENTIFIC_EXTENSION.to_string(),
        ];
        item.geometry = Some(serde_json::from_value(json!({
            "type": "Polygon",
            "coordinates": [bounds.to_polygon()],
        }))?);
        item.bbox = Some(serde_json::from_value(json!(bounds.to_vec()))?);

        let props = &mut item.properties;
        props.datetime = Some(year_start(year)?);
        if let Some(years) = dataset.item_span_years {
            let span = TimeRange::year_span(year, years)?;
            props.start_datetime = Some(span.start);
            props.end_datetime = Some(span.end);
        }
        props.description = Some(dataset.description.to_string());

        let fields = &mut props.additional_fields;
        fields.insert("proj:epsg".to_string(), json!(crs.epsg()));
        fields.insert("proj:bbox".to_string(), json!(bounds.to_vec()));
        fields.insert(
            "proj:transform".to_string(),
            json!(first.transform.to_proj_transform()),
        );
        fields.insert("proj:shape".to_string(), json!(first.shape()));
        if let (Some(doi), Some(citation)) = (dataset.doi, dataset.citation()) {
            fields.insert("sci:doi".to_string(), json!(doi));
            fields.insert("sci:citation".to_string(), json!(citation));
        }

        for (def, href) in assigned {
            let header = read_header(href)?;
            let size = self.probe.file_size(href).await?;

            let mut asset = def.asset(href);
            let fields = &mut asset.additional_fields;
            fields.insert("file:size".to_string(), json!(size));
            fields.insert("raster:bands".to_string(), json!([band(&header)]));
            // Coarser resolutions of the count dataset differ from the item grid
            if header.shape() != first.shape() || header.transform != first.transform {
                fields.insert("proj:shape".to_string(), json!(header.shape()));
                fields.insert(
                    "proj:transform".to_string(),
                    json!(header.transform.to_proj_transform()),
                );
            }

            item.assets.insert(def.key.to_string(), asset);
        }

        set_link(&mut item.links, license_link());

        info!(id = %item.id, assets = item.assets.len(), "Built STAC item");
        Ok(item)
    }
}

fn read_header(href: &str) -> Result<RasterHeader> {
    let path = local_path(href).ok_or_else(|| StacError::RemoteRaster(href.to_string()))?;
    Ok(RasterHeader::read(path)?)
}

/// The `raster:bands` entry of a single-band GPW raster.
fn band(header: &RasterHeader) -> Value {
    let mut band = json!({
        "data_type": header.data_type.as_str(),
        "sampling": header.sampling.as_str(),
    });
    if let Some(nodata) = header.nodata {
        band["nodata"] = nodata_value(nodata);
    }
    band
}

/// Non-finite nodata values are written as the strings STAC allows.
fn nodata_value(nodata: f64) -> Value {
    if nodata.is_nan() {
        json!("nan")
    } else if nodata == f64::INFINITY {
        json!("inf")
    } else if nodata == f64::NEG_INFINITY {
        json!("-inf")
    } else {
        json!(nodata)
    }
}

/// Every href must come from the same tile, or all from untiled rasters.
fn common_tile(names: &[GpwFileName]) -> Result<Option<TileIndex>> {
    let tile = names[0].tile;
    if let Some(other) = names.iter().find(|n| n.tile != tile) {
        return Err(StacError::MismatchedGroup {
            what: "tile",
            detail: format!("'{}' and '{}'", names[0].stem, other.stem),
        });
    }
    Ok(tile)
}

fn item_year(dataset: &Dataset, names: &[GpwFileName]) -> Result<i32> {
    let out_of_range = |year: i32| StacError::YearOutOfRange {
        dataset: dataset.id,
        year,
        start: dataset.start_year,
        end: dataset.end_year,
    };

    if let Some(reference) = dataset.reference_year {
        if let Some(year) = names.iter().filter_map(|n| n.year).find(|y| *y != reference) {
            return Err(out_of_range(year));
        }
        return Ok(reference);
    }

    let missing_year = |name: &GpwFileName| StacError::InvalidFileName {
        path: name.stem.clone(),
        reason: "no four digit year token".to_string(),
    };
    let year = names[0].year.ok_or_else(|| missing_year(&names[0]))?;
    for name in &names[1..] {
        let found = name.year.ok_or_else(|| missing_year(name))?;
        if found != year {
            return Err(StacError::MismatchedGroup {
                what: "year",
                detail: format!("{} and {}", year, found),
            });
        }
    }

    if !dataset.contains_year(year) {
        return Err(out_of_range(year));
    }
    Ok(year)
}

/// Pair each href with its asset definition, each asset exactly once, in
/// the dataset's declaration order.
fn assign_assets<'a>(
    dataset: &'static Dataset,
    hrefs: &'a [String],
    names: &[GpwFileName],
) -> Result<Vec<(&'static AssetDefinition, &'a String)>> {
    let mut assigned: Vec<(&'static AssetDefinition, &'a String)> = Vec::new();
    for (href, name) in hrefs.iter().zip(names) {
        let def = match_asset(dataset.assets, &name.base).ok_or_else(|| {
            StacError::UnknownAsset {
                dataset: dataset.id,
                href: href.clone(),
            }
        })?;
        if let Some((_, first)) = assigned.iter().find(|(d, _)| d.key == def.key) {
            return Err(StacError::DuplicateAsset {
                key: def.key,
                first: (*first).clone(),
                second: href.clone(),
            });
        }
        assigned.push((def, href));
    }
    assigned.sort_by_key(|(def, _)| dataset.assets.iter().position(|d| d.key == def.key));
    Ok(assigned)
}

fn item_id(dataset: &Dataset, first: &GpwFileName, year: i32, tile: Option<TileIndex>) -> String {
    let Some(prefix) = dataset.item_prefix else {
        return first.stem.clone();
    };
    match tile {
        Some(TileIndex { row, col }) => format!("{}-{}-{}-{}", prefix, year, row, col),
        None => format!("{}-{}", prefix, year),
    }
}
