//! GeoTIFF header decoding.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tiff::decoder::Decoder;
use tiff::tags::Tag;
use tracing::debug;

use gpw_common::BoundingBox;

use crate::error::{GeoTiffError, Result};
use crate::transform::GeoTransform;

// GeoTIFF tag IDs
const MODEL_PIXEL_SCALE_TAG: u16 = 33550;
const MODEL_TIEPOINT_TAG: u16 = 33922;
const MODEL_TRANSFORMATION_TAG: u16 = 34264;
const GEO_KEY_DIRECTORY_TAG: u16 = 34735;
const GDAL_NODATA_TAG: u16 = 42113;

// GeoKey IDs
const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

const RASTER_PIXEL_IS_POINT: u16 = 2;
const USER_DEFINED: u16 = 32767;

/// Sample type of a raster band, named the way STAC `raster:bands` names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterDataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl RasterDataType {
    /// Map TIFF SampleFormat and BitsPerSample to a data type.
    pub fn from_tiff(sample_format: u16, bits: u16) -> Result<Self> {
        let data_type = match (sample_format, bits) {
            (1, 8) => Self::UInt8,
            (1, 16) => Self::UInt16,
            (1, 32) => Self::UInt32,
            (1, 64) => Self::UInt64,
            (2, 8) => Self::Int8,
            (2, 16) => Self::Int16,
            (2, 32) => Self::Int32,
            (2, 64) => Self::Int64,
            (3, 32) => Self::Float32,
            (3, 64) => Self::Float64,
            _ => {
                return Err(GeoTiffError::UnsupportedSampleFormat(format!(
                    "SampleFormat={} BitsPerSample={}",
                    sample_format, bits
                )))
            }
        };
        Ok(data_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }
}

impl std::fmt::Display for RasterDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether pixel values describe a cell area or the point at its center
/// (GTRasterTypeGeoKey).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sampling {
    #[default]
    Area,
    Point,
}

impl Sampling {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sampling::Area => "area",
            Sampling::Point => "point",
        }
    }
}

/// Everything the catalog needs from a raster's header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterHeader {
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub data_type: RasterDataType,
    pub sampling: Sampling,
    /// EPSG code from GeographicTypeGeoKey or ProjectedCSTypeGeoKey
    pub epsg: Option<u32>,
    pub transform: GeoTransform,
    /// Value of the GDAL_NODATA tag, if present
    pub nodata: Option<f64>,
}

impl RasterHeader {
    /// Decode the header of the first image in a GeoTIFF.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut decoder = open(path)?;

        let (width, height) = decoder.dimensions()?;
        let band_count = decoder
            .find_tag_unsigned::<u16>(Tag::SamplesPerPixel)?
            .unwrap_or(1) as usize;

        let bits = decoder
            .find_tag_unsigned_vec::<u16>(Tag::BitsPerSample)?
            .and_then(|v| v.first().copied())
            .ok_or(GeoTiffError::MissingTag("BitsPerSample"))?;
        let sample_format = decoder
            .find_tag_unsigned_vec::<u16>(Tag::SampleFormat)?
            .and_then(|v| v.first().copied())
            .unwrap_or(1);
        let data_type = RasterDataType::from_tiff(sample_format, bits)?;

        let geokeys = GeoKeys::read(&mut decoder)?;
        let sampling = match geokeys.get(GT_RASTER_TYPE_GEO_KEY) {
            Some(RASTER_PIXEL_IS_POINT) => Sampling::Point,
            _ => Sampling::Area,
        };
        let epsg = geokeys
            .get(PROJECTED_CS_TYPE_GEO_KEY)
            .or_else(|| geokeys.get(GEOGRAPHIC_TYPE_GEO_KEY))
            .filter(|code| *code != USER_DEFINED)
            .map(u32::from);

        let mut transform = read_transform(&mut decoder)?;
        if sampling == Sampling::Point {
            transform = transform.point_to_area();
        }

        let nodata = read_nodata(&mut decoder)?;

        debug!(
            path = %path.display(),
            width,
            height,
            data_type = %data_type,
            epsg = ?epsg,
            "Read GeoTIFF header"
        );

        Ok(Self {
            width: width as usize,
            height: height as usize,
            band_count,
            data_type,
            sampling,
            epsg,
            transform,
            nodata,
        })
    }

    /// Geographic bounds of the raster.
    pub fn bounds(&self) -> BoundingBox {
        self.transform.bounds(self.width, self.height)
    }

    /// `[height, width]`, the order of `proj:shape`.
    pub fn shape(&self) -> [usize; 2] {
        [self.height, self.width]
    }
}

pub(crate) fn open(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(Decoder::new(BufReader::new(file))?)
}

/// Read the GDAL_NODATA ASCII tag as a number.
pub(crate) fn read_nodata(decoder: &mut Decoder<BufReader<File>>) -> Result<Option<f64>> {
    let Some(value) = decoder.find_tag(Tag::from_u16_exhaustive(GDAL_NODATA_TAG))? else {
        return Ok(None);
    };
    let text = value.into_string()?;
    let trimmed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    let nodata = trimmed.parse::<f64>().map_err(|_| GeoTiffError::InvalidTag {
        tag: "GDAL_NODATA",
        reason: format!("not a number: {:?}", trimmed),
    })?;
    Ok(Some(nodata))
}

fn read_f64_tag(decoder: &mut Decoder<BufReader<File>>, code: u16) -> Result<Option<Vec<f64>>> {
    match decoder.find_tag(Tag::from_u16_exhaustive(code))? {
        Some(value) => Ok(Some(value.into_f64_vec()?)),
        None => Ok(None),
    }
}

fn read_transform(decoder: &mut Decoder<BufReader<File>>) -> Result<GeoTransform> {
    if let Some(matrix) = read_f64_tag(decoder, MODEL_TRANSFORMATION_TAG)? {
        return GeoTransform::from_model_transformation(&matrix).ok_or(GeoTiffError::InvalidTag {
            tag: "ModelTransformationTag",
            reason: format!("expected 16 values, got {}", matrix.len()),
        });
    }

    let scale = read_f64_tag(decoder, MODEL_PIXEL_SCALE_TAG)?
        .ok_or(GeoTiffError::MissingTag("ModelPixelScaleTag"))?;
    let tiepoint = read_f64_tag(decoder, MODEL_TIEPOINT_TAG)?
        .ok_or(GeoTiffError::MissingTag("ModelTiepointTag"))?;

    GeoTransform::from_scale_and_tiepoint(&scale, &tiepoint).ok_or(GeoTiffError::InvalidTag {
        tag: "ModelPixelScaleTag",
        reason: format!(
            "need 2 scale and 6 tiepoint values, got {} and {}",
            scale.len(),
            tiepoint.len()
        ),
    })
}

/// Inline-valued entries of the GeoKeyDirectoryTag.
struct GeoKeys {
    entries: Vec<(u16, u16)>,
}

impl GeoKeys {
    fn read(decoder: &mut Decoder<BufReader<File>>) -> Result<Self> {
        let directory = decoder
            .find_tag_unsigned_vec::<u16>(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY_TAG))?
            .unwrap_or_default();
        Self::parse(&directory)
    }

    fn parse(directory: &[u16]) -> Result<Self> {
        if directory.is_empty() {
            return Ok(Self { entries: Vec::new() });
        }
        if directory.len() < 4 {
            return Err(GeoTiffError::InvalidTag {
                tag: "GeoKeyDirectoryTag",
                reason: "header shorter than 4 values".to_string(),
            });
        }

        let count = directory[3] as usize;
        let entries = directory[4..]
            .chunks_exact(4)
            .take(count)
            // Location 0 means the value is stored inline
            .filter(|key| key[1] == 0)
            .map(|key| (key[0], key[3]))
            .collect();
        Ok(Self { entries })
    }

    fn get(&self, key: u16) -> Option<u16> {
        self.entries
            .iter()
            .find(|(id, _)| *id == key)
            .map(|(_, value)| *value)
    }
}
