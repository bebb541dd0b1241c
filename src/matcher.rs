use std::path::{Path, PathBuf};

/// File name without its extension, lower-cased.
///
/// Only the last extension is stripped, so `a.b.mp3` gives `a.b`. Dotfiles
/// keep their full name.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// True if the reference base name occurs anywhere in the target base name.
///
/// The rule is plain substring containment, so a short reference such as
/// `intro` also matches `introduction`.
pub fn is_match(reference: &Path, target: &Path) -> bool {
    base_name(target).contains(&base_name(reference))
}

/// Every target matching `reference`, in listing order.
pub fn match_targets<'a>(reference: &Path, targets: &'a [PathBuf]) -> Vec<&'a PathBuf> {
    let needle = base_name(reference);
    targets
        .iter()
        .filter(|t| base_name(t).contains(&needle))
        .collect()
}
