//! Common test fixtures for GPW tests.
//!
//! File names follow the SEDAC GPWv4 Revision 11 naming convention.

/// Common bounding box definitions for testing, as `(xmin, ymin, xmax, ymax)`.
pub mod bbox {
    /// Global bounding box (-180 to 180, -90 to 90)
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, -90.0, 180.0, 90.0);

    /// The Americas west of 95W, used as the expansion example
    pub const AMERICAS_WEST: (f64, f64, f64, f64) = (-180.0, -77.0, -95.0, 7.0);

    /// Invalid bbox (min > max)
    pub const INVALID: (f64, f64, f64, f64) = (10.0, 10.0, 5.0, 5.0);
}

/// Raster geometry at the published resolutions.
pub mod resolution {
    /// 30 arc-seconds in degrees
    pub const ARC_30_SEC: f64 = 1.0 / 120.0;

    /// 2.5 arc-minutes in degrees
    pub const ARC_2_5_MIN: f64 = 1.0 / 24.0;

    /// 1 degree
    pub const ARC_1_DEG: f64 = 1.0;
}

/// File names for the original five-resolution population count product.
pub mod count_files {
    pub const YEAR: i32 = 2015;

    pub const NAMES: [&str; 5] = [
        "gpw_v4_population_count_rev11_2015_30_sec.tif",
        "gpw_v4_population_count_rev11_2015_2pt5_min.tif",
        "gpw_v4_population_count_rev11_2015_15_min.tif",
        "gpw_v4_population_count_rev11_2015_30_min.tif",
        "gpw_v4_population_count_rev11_2015_1_deg.tif",
    ];
}

/// File names for the four population rasters of one year.
pub mod population_files {
    pub const YEAR: i32 = 2020;

    pub const NAMES: [&str; 4] = [
        "gpw_v4_population_count_rev11_2020_30_sec.tif",
        "gpw_v4_population_count_adjusted_to_2015_unwpp_country_totals_rev11_2020_30_sec.tif",
        "gpw_v4_population_density_rev11_2020_30_sec.tif",
        "gpw_v4_population_density_adjusted_to_2015_unwpp_country_totals_rev11_2020_30_sec.tif",
    ];

    /// Names of the tile at `(row, col)` as produced by retiling plus conversion.
    pub fn tile_names(row: usize, col: usize) -> Vec<String> {
        NAMES
            .iter()
            .map(|name| {
                let stem = name.trim_end_matches(".tif");
                format!("{}_{}_{}_cog.tif", stem, row, col)
            })
            .collect()
    }
}

/// File names for the twelve ancillary rasters.
pub mod ancillary_files {
    pub const NAMES: [&str; 12] = [
        "gpw_v4_data_quality_indicators_rev11_context_30_sec.tif",
        "gpw_v4_data_quality_indicators_rev11_mean_administrative_unit_area_30_sec.tif",
        "gpw_v4_data_quality_indicators_rev11_watermask_30_sec.tif",
        "gpw_v4_land_water_area_rev11_landareakm_30_sec.tif",
        "gpw_v4_land_water_area_rev11_waterareakm_30_sec.tif",
        "gpw_v4_national_identifier_grid_rev11_30_sec.tif",
        "gpw_v4_basic_demographic_characteristics_rev11_atotpopbt_2010_cntm_30_sec.tif",
        "gpw_v4_basic_demographic_characteristics_rev11_atotpopft_2010_cntm_30_sec.tif",
        "gpw_v4_basic_demographic_characteristics_rev11_atotpopmt_2010_cntm_30_sec.tif",
        "gpw_v4_basic_demographic_characteristics_rev11_atotpopbt_2010_dens_30_sec.tif",
        "gpw_v4_basic_demographic_characteristics_rev11_atotpopft_2010_dens_30_sec.tif",
        "gpw_v4_basic_demographic_characteristics_rev11_atotpopmt_2010_dens_30_sec.tif",
    ];
}
