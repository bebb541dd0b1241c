use crate::models::AudioFormat;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Return true if the given path's extension matches any of the configured
/// file_extensions patterns ("*.mp3", "mp3", ".mp3"), case-insensitive.
pub fn path_matches_extensions(path: &Path, exts: &[String]) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(s) => s.to_ascii_lowercase(),
        None => return false,
    };
    exts.iter().any(|pat| {
        let p = pat.trim();
        let p = p.strip_prefix("*.").or_else(|| p.strip_prefix('.')).unwrap_or(p);
        !p.is_empty() && ext == p.to_ascii_lowercase()
    })
}

/// Expand CLI inputs: files are kept as given, directories are walked
/// recursively for files matching `exts` (sorted per directory argument).
pub fn collect_audio_files(inputs: &[PathBuf], exts: &[String]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut files: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.path().to_path_buf())
                .filter(|p| path_matches_extensions(p, exts))
                .collect();
            files.sort();
            out.extend(files);
        } else {
            out.push(input.clone());
        }
    }
    out
}

/// MIME type for a delivered file; anything that is not mp3 is served as flac.
pub fn mime_for_path(path: &Path) -> &'static str {
    AudioFormat::from_path(path)
        .unwrap_or(AudioFormat::Flac)
        .mime_type()
}

/// Display name of a path: its file name, or the whole path if it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `name` if it is not in `taken`, else `stem (2).ext`, `stem (3).ext`, ...
pub fn unique_file_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    let p = Path::new(name);
    let stem = p.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let ext = p.extension().map(|e| e.to_string_lossy().into_owned());
    let mut n = 2;
    loop {
        let candidate = match &ext {
            Some(e) => format!("{} ({}).{}", stem, n, e),
            None => format!("{} ({})", stem, n),
        };
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
