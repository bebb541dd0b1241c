//! Single and batch transfers: stage inputs, copy tags, package results.
use crate::archive;
use crate::copier::apply_metadata;
use crate::matcher;
use crate::models::{CopyOptions, CopyOutcome, SkipReason};
use crate::tags::load_tags;
use crate::util::{display_name, mime_for_path, unique_file_name};
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const REFERENCE_AREA: &str = "references";
const TARGET_AREA: &str = "targets";

/// Everything a transfer needs to know; built from `Config` plus CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferSettings {
    pub copy: CopyOptions,
    pub delete_reference: bool,
    pub work_dir: Option<PathBuf>,
    pub archive_label: String,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            copy: CopyOptions::default(),
            delete_reference: false,
            work_dir: None,
            archive_label: "batch_results".into(),
        }
    }
}

/// A result file ready to hand back to the user.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Delivery {
    /// Write the bytes to `dir/file_name`, creating `dir` if needed.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).with_context(|| format!("creating output dir {}", dir.display()))?;
        let out = dir.join(&self.file_name);
        std::fs::write(&out, &self.bytes).with_context(|| format!("writing {}", out.display()))?;
        Ok(out)
    }
}

#[derive(Debug)]
pub struct SingleTransfer {
    pub outcome: CopyOutcome,
    pub reference_deleted: bool,
    pub delivery: Delivery,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetResult {
    pub target: String,
    /// Entry name in the archive; differs from `target` when names collide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_as: Option<String>,
    pub outcome: CopyOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceReport {
    pub reference: String,
    pub targets: Vec<TargetResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    pub deleted: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub references: Vec<ReferenceReport>,
    /// Target file names written to the archive, first-processed order.
    pub processed: Vec<String>,
}

#[derive(Debug)]
pub struct BatchTransfer {
    pub report: BatchReport,
    /// `None` when no target was processed.
    pub archive: Option<Delivery>,
}

/// Copy tags from `reference` onto a staged copy of `target` and return the
/// modified target bytes. The caller's target file is not modified.
///
/// With `delete_reference`, the reference is removed only once the result
/// bytes are in hand and something was applied.
pub fn run_single(settings: &TransferSettings, reference: &Path, target: &Path) -> Result<SingleTransfer> {
    let ws = Workspace::create(settings.work_dir.as_deref())?;
    let staged_ref = ws.stage_in(REFERENCE_AREA, reference)?;
    let staged_target = ws.stage_in(TARGET_AREA, target)?;

    let source = load_tags(&staged_ref)?;
    if source.is_none() {
        warn!("Reference {} is not mp3/flac; no fields will be copied", reference.display());
    }
    let outcome = apply_metadata(source.as_ref(), &staged_target, &settings.copy)?;

    let bytes = std::fs::read(&staged_target)
        .with_context(|| format!("reading result {}", staged_target.display()))?;
    let delivery = Delivery {
        file_name: display_name(target),
        mime_type: mime_for_path(target),
        bytes,
    };
    ws.remove()?;

    let reference_deleted = if settings.delete_reference && outcome.is_applied() {
        delete_reference(reference)?;
        true
    } else {
        false
    };

    if outcome.is_applied() {
        info!("Metadata transferred: {} -> {}", reference.display(), target.display());
    }
    Ok(SingleTransfer { outcome, reference_deleted, delivery })
}

/// Match every reference against `targets` by base-name containment and copy
/// tags onto each match, in order. Processed targets are returned zipped.
///
/// Each target is staged once, so a target matched by several references
/// receives them one after another and the last one applied wins per field.
/// Targets sharing a file name are staged and archived under distinct names.
/// Any error aborts the whole batch: no archive is produced and no reference
/// is deleted.
pub fn run_batch(settings: &TransferSettings, references: &[PathBuf], targets: &[PathBuf]) -> Result<BatchTransfer> {
    let ws = Workspace::create(settings.work_dir.as_deref())?;
    let mut report = BatchReport::default();
    let mut staged_targets: HashMap<&Path, PathBuf> = HashMap::new();
    let mut staged_names: HashSet<String> = HashSet::new();
    let mut processed: Vec<PathBuf> = Vec::new();
    let mut to_delete: Vec<(usize, &Path)> = Vec::new();

    for reference in references {
        let name = display_name(reference);
        let staged_ref = ws.stage_in(REFERENCE_AREA, reference)?;

        let source = match load_tags(&staged_ref)? {
            Some(t) => t,
            None => {
                warn!("Skipping reference {}: not mp3/flac", name);
                report.references.push(ReferenceReport {
                    reference: name,
                    targets: Vec::new(),
                    skipped: Some(SkipReason::UnsupportedReference),
                    deleted: false,
                });
                continue;
            }
        };

        let matches = matcher::match_targets(reference, targets);
        if matches.is_empty() {
            warn!("No match for {}", name);
        } else {
            info!("{} matched {} file(s)", name, matches.len());
        }

        let mut results = Vec::with_capacity(matches.len());
        for target in matches {
            let staged = match staged_targets.get(target.as_path()) {
                Some(p) => p.clone(),
                None => {
                    let staged_name = unique_file_name(&display_name(target), &staged_names);
                    let p = ws.stage_as(TARGET_AREA, target, &staged_name)?;
                    staged_names.insert(staged_name);
                    staged_targets.insert(target.as_path(), p.clone());
                    p
                }
            };

            let outcome = apply_metadata(Some(&source), &staged, &settings.copy)?;
            let archived_as = if outcome.is_applied() {
                if !processed.contains(&staged) {
                    report.processed.push(display_name(&staged));
                    processed.push(staged.clone());
                }
                Some(display_name(&staged))
            } else {
                None
            };
            results.push(TargetResult { target: display_name(target), archived_as, outcome });
        }

        if settings.delete_reference {
            to_delete.push((report.references.len(), reference.as_path()));
        }
        report.references.push(ReferenceReport {
            skipped: if results.is_empty() { Some(SkipReason::NoMatch) } else { None },
            reference: name,
            targets: results,
            deleted: false,
        });
    }

    let archive = if processed.is_empty() {
        None
    } else {
        let bytes = archive::zip_files(&processed)?;
        info!("Batch processing complete: {} file(s) archived", processed.len());
        Some(Delivery {
            file_name: archive::archive_file_name(&settings.archive_label),
            mime_type: "application/zip",
            bytes,
        })
    };
    ws.remove()?;

    // references only go once there is an archive to show for them
    if archive.is_some() {
        for (idx, path) in to_delete {
            delete_reference(path)?;
            report.references[idx].deleted = true;
        }
    }

    Ok(BatchTransfer { report, archive })
}

fn delete_reference(path: &Path) -> Result<()> {
    std::fs::remove_file(path).with_context(|| format!("deleting reference {}", path.display()))?;
    info!("Deleted reference {}", path.display());
    Ok(())
}
