//! Static asset definitions for each GPW dataset.
//!
//! Every asset is matched to an input COG by a run of underscore-delimited
//! tokens in its file name, so hrefs can be passed in any order.

use serde_json::{json, Map, Value};
use stac::Asset;

/// Media type of every GPW asset.
pub const COG_MEDIA_TYPE: &str = "image/tiff; application=geotiff; profile=cloud-optimized";

pub const DATA_ROLES: &[&str] = &["data"];

/// Template for one thematic raster layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetDefinition {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Underscore-delimited tokens that identify the layer's file name
    pub file_pattern: &'static str,
    /// SEDAC product name, used in the citation
    pub product: &'static str,
    pub doi: Option<&'static str>,
}

impl AssetDefinition {
    /// True when `stem` contains `file_pattern` as whole tokens.
    pub fn matches(&self, stem: &str) -> bool {
        format!("_{}_", stem).contains(&format!("_{}_", self.file_pattern))
    }

    pub fn citation(&self) -> Option<String> {
        self.doi.map(|doi| citation(self.product, doi))
    }

    /// Fields shared by an item asset and the collection's `item_assets`
    /// entry: title, description, type, roles and `sci:doi`.
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("title".to_string(), json!(self.title));
        fields.insert("description".to_string(), json!(self.description));
        fields.insert("type".to_string(), json!(COG_MEDIA_TYPE));
        fields.insert("roles".to_string(), json!(DATA_ROLES));
        if let Some(doi) = self.doi {
            fields.insert("sci:doi".to_string(), json!(doi));
        }
        fields
    }

    /// An item asset for `href` with this layer's metadata.
    pub fn asset(&self, href: &str) -> Asset {
        let mut asset = Asset::new(href.to_string());
        asset.title = Some(self.title.to_string());
        asset.description = Some(self.description.to_string());
        asset.r#type = Some(COG_MEDIA_TYPE.to_string());
        asset.roles = DATA_ROLES.iter().map(|r| r.to_string()).collect();
        if let Some(doi) = self.doi {
            asset.additional_fields.insert("sci:doi".to_string(), json!(doi));
        }
        asset
    }
}

/// SEDAC's recommended citation for a GPWv4 Revision 11 product.
pub fn citation(product: &str, doi: &str) -> String {
    format!(
        "Center for International Earth Science Information Network - CIESIN - Columbia University. \
         2018. Gridded Population of the World, Version 4 (GPWv4): {}, Revision 11. Palisades, NY: \
         NASA Socioeconomic Data and Applications Center (SEDAC). https://doi.org/{}",
        product, doi
    )
}

pub const DOI_POPULATION_COUNT: &str = "10.7927/H4JW8BX5";
pub const DOI_POPULATION_COUNT_ADJUSTED: &str = "10.7927/H4PN93PB";
pub const DOI_POPULATION_DENSITY: &str = "10.7927/H49C6VHW";
pub const DOI_POPULATION_DENSITY_ADJUSTED: &str = "10.7927/H4F47M65";
pub const DOI_DATA_QUALITY: &str = "10.7927/H42Z13KG";
pub const DOI_LAND_WATER_AREA: &str = "10.7927/H4Z60M4Z";
pub const DOI_NATIONAL_IDENTIFIER: &str = "10.7927/H4TD9VDP";
pub const DOI_DEMOGRAPHIC: &str = "10.7927/H46M34XX";

const POPULATION_COUNT: &str = "Population Count";
const POPULATION_COUNT_ADJUSTED: &str = "UN WPP-Adjusted Population Count";
const POPULATION_DENSITY: &str = "Population Density";
const POPULATION_DENSITY_ADJUSTED: &str = "UN WPP-Adjusted Population Density";
const DATA_QUALITY: &str = "Data Quality Indicators";
const LAND_WATER_AREA: &str = "Land and Water Area";
const NATIONAL_IDENTIFIER: &str = "National Identifier Grid";
const DEMOGRAPHIC: &str = "Basic Demographic Characteristics";

/// Population count at five resolutions.
pub static COUNT_ASSETS: [AssetDefinition; 5] = [
    AssetDefinition {
        key: "30s1km",
        title: "30 arc-seconds, 1km",
        description:
            "Gridded Population of the World, Version 4 (GPWv4): Population Count, 1km resolution",
        file_pattern: "30_sec",
        product: POPULATION_COUNT,
        doi: Some(DOI_POPULATION_COUNT),
    },
    AssetDefinition {
        key: "2min30s5km",
        title: "2.5 arc-minutes, 5km",
        description:
            "Gridded Population of the World, Version 4 (GPWv4): Population Count, 5km resolution",
        file_pattern: "2pt5_min",
        product: POPULATION_COUNT,
        doi: Some(DOI_POPULATION_COUNT),
    },
    AssetDefinition {
        key: "15min30km",
        title: "15 arc-minutes, 30km",
        description:
            "Gridded Population of the World, Version 4 (GPWv4): Population Count, 30km resolution",
        file_pattern: "15_min",
        product: POPULATION_COUNT,
        doi: Some(DOI_POPULATION_COUNT),
    },
    AssetDefinition {
        key: "30min55km",
        title: "30 arc-minutes, 55km",
        description:
            "Gridded Population of the World, Version 4 (GPWv4): Population Count, 55km resolution",
        file_pattern: "30_min",
        product: POPULATION_COUNT,
        doi: Some(DOI_POPULATION_COUNT),
    },
    AssetDefinition {
        key: "60min110km",
        title: "60 arc-minutes, 110km",
        description:
            "Gridded Population of the World, Version 4 (GPWv4): Population Count, 110km resolution",
        file_pattern: "1_deg",
        product: POPULATION_COUNT,
        doi: Some(DOI_POPULATION_COUNT),
    },
];

/// The four 30 arc-second population layers of one census year.
pub static POPULATION_ASSETS: [AssetDefinition; 4] = [
    AssetDefinition {
        key: "pop_count",
        title: "Population Count",
        description: "Estimated number of persons per pixel, consistent with national censuses and population registers",
        file_pattern: "population_count_rev11",
        product: POPULATION_COUNT,
        doi: Some(DOI_POPULATION_COUNT),
    },
    AssetDefinition {
        key: "pop_count_adj",
        title: "UN WPP-Adjusted Population Count",
        description: "Estimated number of persons per pixel, adjusted to match the 2015 Revision of UN WPP country totals",
        file_pattern: "population_count_adjusted_to_2015_unwpp_country_totals",
        product: POPULATION_COUNT_ADJUSTED,
        doi: Some(DOI_POPULATION_COUNT_ADJUSTED),
    },
    AssetDefinition {
        key: "pop_density",
        title: "Population Density",
        description: "Estimated number of persons per square kilometer",
        file_pattern: "population_density_rev11",
        product: POPULATION_DENSITY,
        doi: Some(DOI_POPULATION_DENSITY),
    },
    AssetDefinition {
        key: "pop_density_adj",
        title: "UN WPP-Adjusted Population Density",
        description: "Estimated number of persons per square kilometer, adjusted to match the 2015 Revision of UN WPP country totals",
        file_pattern: "population_density_adjusted_to_2015_unwpp_country_totals",
        product: POPULATION_DENSITY_ADJUSTED,
        doi: Some(DOI_POPULATION_DENSITY_ADJUSTED),
    },
];

/// Data quality, area, national identifier and 2010 demographic layers.
pub static ANCILLARY_ASSETS: [AssetDefinition; 12] = [
    AssetDefinition {
        key: "data_context",
        title: "Data Context",
        description: "Categorical explanation of pixels with no population estimate (park, uninhabited, no data)",
        file_pattern: "data_quality_indicators_rev11_context",
        product: DATA_QUALITY,
        doi: Some(DOI_DATA_QUALITY),
    },
    AssetDefinition {
        key: "mean_admin_unit_area",
        title: "Mean Administrative Unit Area",
        description: "Mean area in square kilometers of the input administrative units overlapping each pixel",
        file_pattern: "mean_administrative_unit_area",
        product: DATA_QUALITY,
        doi: Some(DOI_DATA_QUALITY),
    },
    AssetDefinition {
        key: "water_mask",
        title: "Water Mask",
        description: "Pixels that are entirely water or ice",
        file_pattern: "watermask",
        product: DATA_QUALITY,
        doi: Some(DOI_DATA_QUALITY),
    },
    AssetDefinition {
        key: "land_area",
        title: "Land Area",
        description: "Land area of each pixel in square kilometers, excluding permanent ice and water",
        file_pattern: "landareakm",
        product: LAND_WATER_AREA,
        doi: Some(DOI_LAND_WATER_AREA),
    },
    AssetDefinition {
        key: "water_area",
        title: "Water Area",
        description: "Area of permanent ice and water in each pixel in square kilometers",
        file_pattern: "waterareakm",
        product: LAND_WATER_AREA,
        doi: Some(DOI_LAND_WATER_AREA),
    },
    AssetDefinition {
        key: "national_identifier",
        title: "National Identifier Grid",
        description: "Numeric UN country code of the census data source used for each pixel",
        file_pattern: "national_identifier_grid",
        product: NATIONAL_IDENTIFIER,
        doi: Some(DOI_NATIONAL_IDENTIFIER),
    },
    AssetDefinition {
        key: "pop_count_total",
        title: "Total Population Count, 2010",
        description: "Estimated number of persons per pixel for both sexes in 2010",
        file_pattern: "atotpopbt_2010_cntm",
        product: DEMOGRAPHIC,
        doi: Some(DOI_DEMOGRAPHIC),
    },
    AssetDefinition {
        key: "pop_count_female",
        title: "Female Population Count, 2010",
        description: "Estimated number of females per pixel in 2010",
        file_pattern: "atotpopft_2010_cntm",
        product: DEMOGRAPHIC,
        doi: Some(DOI_DEMOGRAPHIC),
    },
    AssetDefinition {
        key: "pop_count_male",
        title: "Male Population Count, 2010",
        description: "Estimated number of males per pixel in 2010",
        file_pattern: "atotpopmt_2010_cntm",
        product: DEMOGRAPHIC,
        doi: Some(DOI_DEMOGRAPHIC),
    },
    AssetDefinition {
        key: "pop_density_total",
        title: "Total Population Density, 2010",
        description: "Estimated persons per square kilometer for both sexes in 2010",
        file_pattern: "atotpopbt_2010_dens",
        product: DEMOGRAPHIC,
        doi: Some(DOI_DEMOGRAPHIC),
    },
    AssetDefinition {
        key: "pop_density_female",
        title: "Female Population Density, 2010",
        description: "Estimated females per square kilometer in 2010",
        file_pattern: "atotpopft_2010_dens",
        product: DEMOGRAPHIC,
        doi: Some(DOI_DEMOGRAPHIC),
    },
    AssetDefinition {
        key: "pop_density_male",
        title: "Male Population Density, 2010",
        description: "Estimated males per square kilometer in 2010",
        file_pattern: "atotpopmt_2010_dens",
        product: DEMOGRAPHIC,
        doi: Some(DOI_DEMOGRAPHIC),
    },
];

/// The single definition in `assets` matching `stem`, if exactly one does.
pub fn match_asset<'a>(assets: &'a [AssetDefinition], stem: &str) -> Option<&'a AssetDefinition> {
    let mut matching = assets.iter().filter(|def| def.matches(stem));
    match (matching.next(), matching.next()) {
        (Some(def), None) => Some(def),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn stem(name: &str) -> &str {
        name.trim_end_matches(".tif")
    }

    #[test]
    fn test_keys_are_unique() {
        for assets in [&COUNT_ASSETS[..], &POPULATION_ASSETS[..], &ANCILLARY_ASSETS[..]] {
            let keys: HashSet<_> = assets.iter().map(|a| a.key).collect();
            assert_eq!(keys.len(), assets.len());
        }
    }

    #[test]
    fn test_adjusted_layers_do_not_match_unadjusted() {
        let adjusted =
            "gpw_v4_population_count_adjusted_to_2015_unwpp_country_totals_rev11_2020_30_sec";
        assert_eq!(match_asset(&POPULATION_ASSETS, adjusted).unwrap().key, "pop_count_adj");
        assert_eq!(
            match_asset(&POPULATION_ASSETS, "gpw_v4_population_count_rev11_2020_30_sec")
                .unwrap()
                .key,
            "pop_count"
        );
    }

    #[test]
    fn test_resolution_patterns_are_whole_tokens() {
        assert_eq!(
            match_asset(&COUNT_ASSETS, stem("gpw_v4_population_count_rev11_2015_30_min.tif"))
                .unwrap()
                .key,
            "30min55km"
        );
        assert_eq!(
            match_asset(&COUNT_ASSETS, "gpw_v4_population_count_rev11_2015_1_deg_cog")
                .unwrap()
                .key,
            "60min110km"
        );
        assert!(match_asset(&COUNT_ASSETS, "gpw_v4_population_count_rev11_2015_130_sec").is_none());
    }

    #[test]
    fn test_demographic_count_and_density_are_distinct() {
        let count = "gpw_v4_basic_demographic_characteristics_rev11_atotpopft_2010_cntm_30_sec";
        let density = "gpw_v4_basic_demographic_characteristics_rev11_atotpopft_2010_dens_30_sec";
        assert_eq!(match_asset(&ANCILLARY_ASSETS, count).unwrap().key, "pop_count_female");
        assert_eq!(match_asset(&ANCILLARY_ASSETS, density).unwrap().key, "pop_density_female");
    }

    #[test]
    fn test_fields_carry_doi() {
        let fields = POPULATION_ASSETS[2].fields();
        assert_eq!(fields["type"], COG_MEDIA_TYPE);
        assert_eq!(fields["sci:doi"], DOI_POPULATION_DENSITY);
        assert!(POPULATION_ASSETS[2]
            .citation()
            .unwrap()
            .ends_with("https://doi.org/10.7927/H49C6VHW"));
    }

    #[test]
    fn test_asset_matches_item_assets_entry() {
        let def = &POPULATION_ASSETS[2];
        let asset = def.asset("./density_cog.tif");
        assert_eq!(asset.r#type.as_deref(), Some(COG_MEDIA_TYPE));
        assert_eq!(asset.roles, vec!["data"]);

        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(value["href"], "./density_cog.tif");
        for (key, expected) in def.fields() {
            assert_eq!(value[&key], expected, "{}", key);
        }
    }
}
