use crate::util::{display_name, unique_file_name};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive file name for a label: spaces become underscores, lower-cased.
pub fn archive_file_name(label: &str) -> String {
    format!("{}.zip", label.replace(' ', "_").to_lowercase())
}

/// Pack `files` into an in-memory DEFLATE zip, each entry named by its file
/// name. A path listed more than once is written once; different files
/// sharing a name get `name (2)`, `name (3)`, ... entries.
pub fn zip_files(files: &[PathBuf]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut seen_paths: HashSet<&PathBuf> = HashSet::new();
    let mut names: HashSet<String> = HashSet::new();

    for f in files {
        if f.file_name().is_none() || !seen_paths.insert(f) {
            continue;
        }
        let name = unique_file_name(&display_name(f), &names);
        names.insert(name.clone());
        let bytes = std::fs::read(f).with_context(|| format!("reading {} for archive", f.display()))?;
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("adding {} to archive", name))?;
        zip.write_all(&bytes)?;
    }

    let cursor = zip.finish().context("finalizing archive")?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_name_from_label() {
        assert_eq!(archive_file_name("batch_results"), "batch_results.zip");
        assert_eq!(archive_file_name("Batch Results Today"), "batch_results_today.zip");
    }

    #[test]
    fn same_file_names_get_distinct_entries() {
        let td = tempfile::tempdir().unwrap();
        let cd1 = td.path().join("CD1").join("01.mp3");
        let cd2 = td.path().join("CD2").join("01.mp3");
        for (p, body) in [(&cd1, "one"), (&cd2, "two")] {
            std::fs::create_dir_all(p.parent().unwrap()).unwrap();
            std::fs::write(p, body).unwrap();
        }

        let bytes = zip_files(&[cd1.clone(), cd2, cd1]).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["01.mp3".to_string(), "01 (2).mp3".to_string()]);
    }
}
