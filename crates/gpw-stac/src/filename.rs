//! Parsing of SEDAC GPWv4 file names.
//!
//! Names look like `gpw_v4_population_count_rev11_2020_30_sec.tif`, with a
//! `_<row>_<col>` suffix once retiled and `_cog` once converted. Anything
//! that doesn't fit is rejected rather than guessed at.

use gpw_common::{time::parse_year, COG_SUFFIX};

use crate::error::{Result, StacError};

/// Position of a tile in the retiling grid, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileIndex {
    pub row: u32,
    pub col: u32,
}

/// The parts of a GPW file name the catalog builder relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpwFileName {
    /// File name without directories or extension
    pub stem: String,
    /// `stem` without the trailing `_cog`
    pub base: String,
    pub tokens: Vec<String>,
    pub year: Option<i32>,
    pub tile: Option<TileIndex>,
}

impl GpwFileName {
    /// Parse the file name part of a path or URL.
    pub fn parse(href: &str) -> Result<Self> {
        let invalid = |reason: &str| StacError::InvalidFileName {
            path: href.to_string(),
            reason: reason.to_string(),
        };

        let name = href
            .trim_end_matches('/')
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(href);
        let stem = match name.rsplit_once('.') {
            Some((stem, _ext)) => stem,
            None => name,
        };
        if stem.is_empty() {
            return Err(invalid("empty file name"));
        }

        let base = stem.strip_suffix(COG_SUFFIX).unwrap_or(stem);
        let tokens: Vec<String> = base.split('_').map(str::to_string).collect();

        if tokens.len() < 4 {
            return Err(invalid("expected at least 4 underscore-separated tokens"));
        }
        if tokens[0] != "gpw" {
            return Err(invalid("expected a leading 'gpw' token"));
        }
        if tokens.iter().any(|t| t.is_empty()) {
            return Err(invalid("empty token"));
        }

        let tile = tile_suffix(&tokens);
        let body_len = if tile.is_some() {
            tokens.len() - 2
        } else {
            tokens.len()
        };
        let year = find_year(&tokens[..body_len]).map_err(|reason| invalid(&reason))?;

        Ok(Self {
            stem: stem.to_string(),
            base: base.to_string(),
            tokens,
            year,
            tile,
        })
    }
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// A trailing `<row>_<col>` pair following a non-numeric token.
fn tile_suffix(tokens: &[String]) -> Option<TileIndex> {
    let n = tokens.len();
    if n < 3 || is_numeric(&tokens[n - 3]) {
        return None;
    }
    if !is_numeric(&tokens[n - 2]) || !is_numeric(&tokens[n - 1]) {
        return None;
    }
    Some(TileIndex {
        row: tokens[n - 2].parse().ok()?,
        col: tokens[n - 1].parse().ok()?,
    })
}

/// The four digit year after the `revNN` token, or anywhere when there is
/// no revision token. Two different years is an error.
fn find_year(tokens: &[String]) -> std::result::Result<Option<i32>, String> {
    let start = tokens
        .iter()
        .position(|t| t.len() > 3 && t.starts_with("rev") && is_numeric(&t[3..]))
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut year = None;
    for token in &tokens[start..] {
        if let Ok(found) = parse_year(token) {
            match year {
                None => year = Some(found),
                Some(existing) if existing != found => {
                    return Err(format!("conflicting years {} and {}", existing, found));
                }
                Some(_) => {}
            }
        }
    }
    Ok(year)
}
