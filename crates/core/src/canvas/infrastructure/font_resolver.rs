use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::shared::constants::{FALLBACK_FONT_FAMILIES, FONT_EXTENSIONS};

#[derive(Error, Debug)]
pub enum FontResolveError {
    #[error("font file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("no installed font matches {family:?} or any fallback family")]
    NotFound { family: String },
}

/// Resolve a font file for `family`.
///
/// Resolution order:
/// 1. Explicit path (must exist)
/// 2. User and system font directories, matching the requested family
/// 3. The same directories, matching well-known sans-serif families
pub fn resolve(family: &str, explicit: Option<&Path>) -> Result<PathBuf, FontResolveError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(FontResolveError::MissingFile(path.to_path_buf()))
        };
    }

    let candidates = collect_font_files(&font_search_dirs());
    std::iter::once(family)
        .chain(FALLBACK_FONT_FAMILIES.iter().copied())
        .find_map(|f| best_match(&candidates, f))
        .ok_or_else(|| FontResolveError::NotFound {
            family: family.to_string(),
        })
}

/// Directories searched for installed fonts, user directory first.
pub fn font_search_dirs() -> Vec<PathBuf> {
    let mut search: Vec<PathBuf> = dirs::font_dir().into_iter().collect();
    if let Some(home) = dirs::home_dir() {
        search.push(home.join(".fonts"));
    }

    #[cfg(target_os = "macos")]
    search.extend(["/Library/Fonts", "/System/Library/Fonts"].map(PathBuf::from));
    #[cfg(target_os = "windows")]
    search.push(PathBuf::from(r"C:\Windows\Fonts"));
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    search.extend(["/usr/share/fonts", "/usr/local/share/fonts"].map(PathBuf::from));

    search.retain(|d| d.is_dir());
    search
}

fn collect_font_files(dirs: &[PathBuf]) -> Vec<PathBuf> {
    dirs.iter()
        .flat_map(|dir| WalkDir::new(dir).follow_links(true).into_iter())
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_font_extension(path))
        .collect()
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FONT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Picks the shortest file stem containing `family` (case and whitespace
/// insensitive), which favours the regular face over styled variants.
fn best_match(candidates: &[PathBuf], family: &str) -> Option<PathBuf> {
    let needle = normalize(family);
    if needle.is_empty() {
        return None;
    }
    candidates
        .iter()
        .filter_map(|path| {
            let stem = normalize(path.file_stem()?.to_str()?);
            stem.contains(&needle).then_some((stem.len(), path))
        })
        .min()
        .map(|(_, path)| path.clone())
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
