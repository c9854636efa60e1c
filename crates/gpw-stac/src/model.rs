//! Extension schemas, media types and link helpers for GPW records.
//!
//! The records themselves are the `stac` crate's `Item`, `Collection` and
//! `Asset`; extension fields live in their `additional_fields` maps.

pub use stac::{Asset, Collection, Item, Link};

use gpw_common::{GPW_LICENSE_LINK, GPW_LICENSE_TITLE};

pub const PROJECTION_EXTENSION: &str =
    "https://stac-extensions.github.io/projection/v1.1.0/schema.json";
pub const RASTER_EXTENSION: &str = "https://stac-extensions.github.io/raster/v1.1.0/schema.json";
pub const FILE_EXTENSION: &str = "https://stac-extensions.github.io/file/v2.1.0/schema.json";
pub const SCIENTIFIC_EXTENSION: &str =
    "https://stac-extensions.github.io/scientific/v1.0.0/schema.json";
pub const ITEM_ASSETS_EXTENSION: &str =
    "https://stac-extensions.github.io/item-assets/v1.0.0/schema.json";

pub const JSON_MEDIA_TYPE: &str = "application/json";
pub const GEOJSON_MEDIA_TYPE: &str = "application/geo+json";
pub const HTML_MEDIA_TYPE: &str = "text/html";

/// A link with its media type set.
pub fn typed_link(rel: &str, href: &str, media_type: &str) -> Link {
    let mut link = Link::new(href.to_string(), rel.to_string());
    link.r#type = Some(media_type.to_string());
    link
}

/// The CC BY 4.0 link every GPW record carries.
pub fn license_link() -> Link {
    let mut link = typed_link("license", GPW_LICENSE_LINK, HTML_MEDIA_TYPE);
    link.title = Some(GPW_LICENSE_TITLE.to_string());
    link
}

/// Replace any existing link with the same `rel`.
pub fn set_link(links: &mut Vec<Link>, link: Link) {
    links.retain(|l| l.rel != link.rel);
    links.push(link);
}
