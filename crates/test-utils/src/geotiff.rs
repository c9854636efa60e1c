//! Synthetic GeoTIFF writer for tests.
//!
//! Writes single-band rasters with the GeoTIFF tags GPW rasters carry
//! (pixel scale, tiepoint, geokey directory, optional GDAL nodata) using the
//! pure Rust `tiff` encoder, so tests don't need GDAL installed.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{Gray32Float, Gray8};
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;

// GeoTIFF Tag IDs (not in standard tiff crate)
const GEOTIFF_MODELPIXELSCALE: u16 = 33550;
const GEOTIFF_MODELTIEPOINT: u16 = 33922;
const GEOTIFF_GEOKEYDIRECTORY: u16 = 34735;
const GDAL_NODATA: u16 = 42113;

// GeoKey IDs
const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;

const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const RASTER_PIXEL_IS_POINT: u16 = 2;

/// Sample type written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestSampleType {
    Float32,
    UInt8,
}

/// Builder for a single-band synthetic GeoTIFF.
#[derive(Debug, Clone)]
pub struct TestGeoTiff {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
    /// Upper-left corner `(x, y)` in degrees
    pub origin: (f64, f64),
    /// Cell size `(dx, dy)` in degrees, both positive
    pub pixel_size: (f64, f64),
    pub epsg: u16,
    pub nodata: Option<f64>,
    pub point_sampling: bool,
    pub sample_type: TestSampleType,
}

impl TestGeoTiff {
    /// A 30 arc-second raster anchored at the north-west corner of the globe.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), width * height, "data does not match raster size");
        Self {
            width,
            height,
            data,
            origin: (-180.0, 90.0),
            pixel_size: (1.0 / 120.0, 1.0 / 120.0),
            epsg: 4326,
            nodata: None,
            point_sampling: false,
            sample_type: TestSampleType::Float32,
        }
    }

    /// A raster whose cells exactly cover the whole globe.
    pub fn global(width: usize, height: usize, data: Vec<f32>) -> Self {
        Self::new(width, height, data).pixel_size(360.0 / width as f64, 180.0 / height as f64)
    }

    pub fn origin(mut self, x: f64, y: f64) -> Self {
        self.origin = (x, y);
        self
    }

    pub fn pixel_size(mut self, dx: f64, dy: f64) -> Self {
        self.pixel_size = (dx, dy);
        self
    }

    pub fn nodata(mut self, value: f64) -> Self {
        self.nodata = Some(value);
        self
    }

    pub fn point_sampling(mut self) -> Self {
        self.point_sampling = true;
        self
    }

    pub fn sample_type(mut self, sample_type: TestSampleType) -> Self {
        self.sample_type = sample_type;
        self
    }

    /// Geographic bounds as `(xmin, ymin, xmax, ymax)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.origin;
        let (dx, dy) = self.pixel_size;
        (
            x0,
            y0 - dy * self.height as f64,
            x0 + dx * self.width as f64,
            y0,
        )
    }

    /// Write the raster to `path`.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), tiff::TiffError> {
        let file = File::create(path)?;
        let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
        let (width, height) = (self.width as u32, self.height as u32);

        match self.sample_type {
            TestSampleType::Float32 => {
                let mut image = encoder.new_image::<Gray32Float>(width, height)?;
                self.write_geotiff_tags(image.encoder())?;
                image.write_data(&self.data)?;
            }
            TestSampleType::UInt8 => {
                let bytes: Vec<u8> = self.data.iter().map(|v| v.clamp(0.0, 255.0) as u8).collect();
                let mut image = encoder.new_image::<Gray8>(width, height)?;
                self.write_geotiff_tags(image.encoder())?;
                image.write_data(&bytes)?;
            }
        }
        Ok(())
    }

    fn write_geotiff_tags<W: std::io::Write + std::io::Seek, K: TiffKind>(
        &self,
        dir: &mut DirectoryEncoder<W, K>,
    ) -> Result<(), tiff::TiffError> {
        let pixel_scale = [self.pixel_size.0, self.pixel_size.1, 0.0];
        dir.write_tag(Tag::Unknown(GEOTIFF_MODELPIXELSCALE), pixel_scale.as_slice())?;

        // Ties pixel (0, 0) to the upper-left corner
        let tiepoint = [0.0, 0.0, 0.0, self.origin.0, self.origin.1, 0.0];
        dir.write_tag(Tag::Unknown(GEOTIFF_MODELTIEPOINT), tiepoint.as_slice())?;

        let raster_type = if self.point_sampling {
            RASTER_PIXEL_IS_POINT
        } else {
            RASTER_PIXEL_IS_AREA
        };
        let geokeys: Vec<u16> = vec![
            1, 1, 0, 3, // version, revision, minor, key count
            GT_MODEL_TYPE_GEO_KEY, 0, 1, MODEL_TYPE_GEOGRAPHIC,
            GT_RASTER_TYPE_GEO_KEY, 0, 1, raster_type,
            GEOGRAPHIC_TYPE_GEO_KEY, 0, 1, self.epsg,
        ];
        dir.write_tag(Tag::Unknown(GEOTIFF_GEOKEYDIRECTORY), geokeys.as_slice())?;

        if let Some(nodata) = self.nodata {
            let text = nodata.to_string();
            dir.write_tag(Tag::Unknown(GDAL_NODATA), text.as_str())?;
        }
        Ok(())
    }
}

/// Write a float32 raster at 30 arc-seconds anchored at (-180, 90).
///
/// Panics on failure; intended for test setup only.
pub fn write_test_geotiff<P: AsRef<Path>>(path: P, width: usize, height: usize, data: Vec<f32>) {
    TestGeoTiff::new(width, height, data)
        .write(path)
        .expect("Failed to write test GeoTIFF");
}

/// Read back every sample of a single-band test raster as f32.
pub fn read_test_samples<P: AsRef<Path>>(path: P) -> (usize, usize, Vec<f32>) {
    let file = File::open(path).expect("Failed to open test GeoTIFF");
    let mut decoder = Decoder::new(std::io::BufReader::new(file)).expect("Invalid TIFF");
    let (width, height) = decoder.dimensions().expect("Missing dimensions");
    let samples = match decoder.read_image().expect("Failed to decode image") {
        DecodingResult::F32(v) => v,
        DecodingResult::U8(v) => v.into_iter().map(f32::from).collect(),
        _ => panic!("unexpected sample format in test raster"),
    };
    (width as usize, height as usize, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.tif");
        let data = crate::create_test_grid(8, 4);

        write_test_geotiff(&path, 8, 4, data.clone());

        let (w, h, samples) = read_test_samples(&path);
        assert_eq!((w, h), (8, 4));
        assert_eq!(samples, data);
    }

    #[test]
    fn test_global_bounds() {
        let tiff = TestGeoTiff::global(36, 18, vec![0.0; 36 * 18]);
        assert_eq!(tiff.bounds(), (-180.0, -90.0, 180.0, 90.0));
    }

    #[test]
    fn test_write_u8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.tif");
        TestGeoTiff::new(2, 2, vec![0.0, 1.0, 2.0, 300.0])
            .sample_type(TestSampleType::UInt8)
            .write(&path)
            .unwrap();

        let (_, _, samples) = read_test_samples(&path);
        assert_eq!(samples, vec![0.0, 1.0, 2.0, 255.0]);
    }
}
