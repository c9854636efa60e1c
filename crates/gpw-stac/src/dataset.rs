//! The three GPW dataset variants and their collection-level metadata.

use std::fmt;
use std::str::FromStr;

use crate::assets::{
    citation, AssetDefinition, ANCILLARY_ASSETS, COUNT_ASSETS, DOI_POPULATION_COUNT,
    POPULATION_ASSETS,
};

/// Which GPW product a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Population count at five resolutions, one item per census year
    Count,
    /// Count, density and their UN WPP-adjusted variants at 30 arc-seconds
    Population,
    /// Data quality, area, national identifier and 2010 demographic layers
    Ancillary,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [Self::Count, Self::Population, Self::Ancillary];

    pub fn dataset(&self) -> &'static Dataset {
        match self {
            DatasetKind::Count => &COUNT,
            DatasetKind::Population => &POPULATION,
            DatasetKind::Ancillary => &ANCILLARY,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Count => "count",
            DatasetKind::Population => "population",
            DatasetKind::Ancillary => "ancillary",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count" => Ok(DatasetKind::Count),
            "population" | "pop" => Ok(DatasetKind::Population),
            "ancillary" | "anc" => Ok(DatasetKind::Ancillary),
            other => Err(format!("unknown GPW dataset: {}", other)),
        }
    }
}

/// Collection-level metadata of one dataset.
#[derive(Debug)]
pub struct Dataset {
    pub kind: DatasetKind,
    /// Collection id
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
    pub start_year: i32,
    pub end_year: i32,
    /// Year every item is pinned to, for single-round datasets
    pub reference_year: Option<i32>,
    /// Each item covers this many years from its census year
    pub item_span_years: Option<i32>,
    /// Prefix of generated item ids; `None` keeps the first COG's file stem
    pub item_prefix: Option<&'static str>,
    /// Collection-level DOI when the whole dataset is one SEDAC product
    pub doi: Option<&'static str>,
    pub product: &'static str,
    pub assets: &'static [AssetDefinition],
}

impl Dataset {
    pub fn asset(&self, key: &str) -> Option<&'static AssetDefinition> {
        self.assets.iter().find(|def| def.key == key)
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.assets.iter().map(|def| def.key).collect()
    }

    pub fn contains_year(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }

    pub fn citation(&self) -> Option<String> {
        self.doi.map(|doi| citation(self.product, doi))
    }

    /// Distinct `(doi, citation)` pairs across the dataset's assets, in
    /// declaration order.
    pub fn publications(&self) -> Vec<(&'static str, String)> {
        let mut seen: Vec<&'static str> = Vec::new();
        let mut publications = Vec::new();
        for def in self.assets {
            if let Some(doi) = def.doi {
                if !seen.contains(&doi) {
                    seen.push(doi);
                    publications.push((doi, citation(def.product, doi)));
                }
            }
        }
        publications
    }
}

static COUNT: Dataset = Dataset {
    kind: DatasetKind::Count,
    id: "gpw-v4-population-count",
    title: "Gridded Population of the World, Version 4 (GPWv4): Population Count, Revision 11",
    description: "Gridded Population of the World, Version 4 (GPWv4): Population Count, Revision 11 \
        consists of estimates of human population (number of persons per pixel), consistent with \
        national censuses and population registers, for the years 2000, 2005, 2010, 2015, and 2020. \
        The estimates are published at 30 arc-seconds (approximately 1km at the equator) and \
        aggregated to 2.5 arc-minutes, 15 arc-minutes, 30 arc-minutes and 1 degree.",
    keywords: &["GPW", "SEDAC", "CIESIN", "Population", "Population Count"],
    start_year: 2000,
    end_year: 2020,
    reference_year: None,
    item_span_years: Some(5),
    item_prefix: None,
    doi: Some(DOI_POPULATION_COUNT),
    product: "Population Count",
    assets: &COUNT_ASSETS,
};

static POPULATION: Dataset = Dataset {
    kind: DatasetKind::Population,
    id: "GPW-population",
    title: "Gridded Population of the World (GPW) v4.11, Population Datasets",
    description: "The Gridded Population of the World, Version 4 (GPWv4) Revision 11 Population \
        Datasets (population count, UN WPP-adjusted population count, population density, and UN \
        WPP-adjusted population density) consist of estimates of human population (number of \
        persons per pixel) and population density (number of persons per square kilometer), \
        consistent with national censuses and population registers, for the years 2000, 2005, \
        2010, 2015, and 2020. Where indicated by name, values have been adjusted to match the 2015 \
        Revision of the United Nation's World Population Prospects (UN WPP) country totals.",
    keywords: &[
        "GPW",
        "SEDAC",
        "CIESIN",
        "Population",
        "Population Density",
        "UN WPP",
    ],
    start_year: 2000,
    end_year: 2020,
    reference_year: None,
    item_span_years: None,
    item_prefix: Some("gpw-v4-population"),
    doi: None,
    product: "Population Datasets",
    assets: &POPULATION_ASSETS,
};

static ANCILLARY: Dataset = Dataset {
    kind: DatasetKind::Ancillary,
    id: "GPW-ancillary",
    title: "Gridded Population of the World (GPW) v4.11, Ancillary Datasets",
    description: "The Gridded Population of the World, Version 4 (GPWv4) Revision 11 Ancillary \
        Datasets describe the inputs behind the population estimates: data quality indicators \
        (data context, mean administrative unit area and water mask), the land and water area of \
        each pixel, the national identifier grid, and basic demographic characteristics giving \
        2010 population counts and densities by sex.",
    keywords: &[
        "GPW",
        "SEDAC",
        "CIESIN",
        "Data Quality",
        "Land Area",
        "Water Area",
        "Demographics",
    ],
    start_year: 2010,
    end_year: 2010,
    reference_year: Some(2010),
    item_span_years: None,
    item_prefix: Some("gpw-v4-ancillary"),
    doi: None,
    product: "Ancillary Datasets",
    assets: &ANCILLARY_ASSETS,
};
