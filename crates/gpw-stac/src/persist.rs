//! Writing records to disk with relative asset hrefs.

use std::env;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::error::{Result, StacError};
use crate::model::{set_link, typed_link, Collection, Item, GEOJSON_MEDIA_TYPE, JSON_MEDIA_TYPE};
use crate::size::local_path;

/// Write `item` to `<dest_dir>/<id>.json` and return the path.
///
/// Local asset hrefs are rewritten relative to `dest_dir`; remote ones are
/// kept. The written document gets a `self` link to its own location.
pub fn write_item(item: &Item, dest_dir: &Path) -> Result<PathBuf> {
    if !dest_dir.is_dir() {
        return Err(StacError::MissingDestination(dest_dir.to_path_buf()));
    }
    let path = dest_dir.join(format!("{}.json", item.id));

    let mut item = item.clone();
    for asset in item.assets.values_mut() {
        asset.href = relative_href(&asset.href.to_string(), dest_dir)?.into();
    }
    set_link(
        &mut item.links,
        typed_link("self", &self_href(&path)?, GEOJSON_MEDIA_TYPE),
    );

    fs::write(&path, serde_json::to_string_pretty(&item)?)?;
    info!(path = %path.display(), "Wrote STAC item");
    Ok(path)
}

/// Write `collection` and return the path.
///
/// A `dest` ending in `.json` is the file to write; anything else is a
/// directory that receives `<id>.json`.
pub fn write_collection(collection: &Collection, dest: &Path) -> Result<PathBuf> {
    let is_file = dest
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let path = if is_file {
        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !parent.is_dir() {
            return Err(StacError::MissingDestination(parent.to_path_buf()));
        }
        dest.to_path_buf()
    } else {
        if !dest.is_dir() {
            return Err(StacError::MissingDestination(dest.to_path_buf()));
        }
        dest.join(format!("{}.json", collection.id))
    };

    let mut collection = collection.clone();
    set_link(
        &mut collection.links,
        typed_link("self", &self_href(&path)?, JSON_MEDIA_TYPE),
    );

    fs::write(&path, serde_json::to_string_pretty(&collection)?)?;
    info!(path = %path.display(), "Wrote STAC collection");
    Ok(path)
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

/// The real location of `path`, resolving `..` and symlinks when it exists.
fn resolve(path: &Path) -> io::Result<PathBuf> {
    fs::canonicalize(path).or_else(|_| absolute(path))
}

fn self_href(path: &Path) -> Result<String> {
    let resolved = match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => resolve(parent)?.join(name),
        _ => absolute(path)?,
    };
    Ok(resolved.to_string_lossy().into_owned())
}

/// `href` relative to `base_dir` (`./` or `../` prefixed, `/` separated).
/// Remote hrefs and paths on another root are returned unchanged.
pub fn relative_href(href: &str, base_dir: &Path) -> Result<String> {
    let Some(path) = local_path(href) else {
        return Ok(href.to_string());
    };
    let target = resolve(&path)?;
    let base = resolve(base_dir)?;

    let Some(rel) = relative_path(&base, &target) else {
        return Ok(href.to_string());
    };
    let rel = rel.to_string_lossy().replace('\\', "/");
    if rel.starts_with("..") {
        Ok(rel)
    } else {
        Ok(format!("./{}", rel))
    }
}

fn relative_path(from_dir: &Path, to: &Path) -> Option<PathBuf> {
    let from: Vec<Component> = from_dir
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let to: Vec<Component> = to
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    // Different drive or root
    if from.first() != to.first() {
        return None;
    }

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for component in &to[common..] {
        rel.push(component.as_os_str());
    }
    Some(rel)
}
