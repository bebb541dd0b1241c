use crate::models::{CopyOptions, CopyOutcome, CopyReport, Field, SkipReason};
use crate::tags::{load_tags, TagSet};
use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

/// Copy the fixed field list from `source` onto the file at `target` and save it.
///
/// Rules, in order:
/// - an unsupported target is skipped outright (no override either);
/// - each field present in `source` is copied verbatim, except the track
///   number while `delete_track_number` is set; the track total moves and
///   is suppressed together with the track number;
/// - a non-empty album override then replaces the target album;
/// - the target is saved.
///
/// Fields missing from `source` are left as they are on the target. A `None`
/// source copies nothing but still lets the album override through.
pub fn apply_metadata(source: Option<&TagSet>, target: &Path, opts: &CopyOptions) -> Result<CopyOutcome> {
    let mut target_tags = match load_tags(target)? {
        Some(t) => t,
        None => {
            debug!("Skipping {}: unsupported target format", target.display());
            return Ok(CopyOutcome::Skipped { reason: SkipReason::UnsupportedTarget });
        }
    };

    let mut report = CopyReport { source_available: source.is_some(), ..CopyReport::default() };

    if let Some(src) = source {
        for field in Field::ALL {
            if !src.contains(field) {
                continue;
            }
            if field == Field::TrackNumber && opts.delete_track_number {
                report.track_number_suppressed = true;
                continue;
            }
            let values = src.get(field);
            debug!("{}: {} = {:?}", target.display(), field, values);
            target_tags.set(field, values);
            for key in field.companion_keys() {
                target_tags.set_values(key.clone(), src.values(key));
            }
            report.copied.push(field);
        }
    }

    if let Some(album) = opts.effective_album_override() {
        target_tags.set(Field::Album, [album]);
        report.album_overridden = true;
    }

    target_tags.save()?;
    info!(
        "Wrote {} field(s) to {}{}",
        report.copied.len(),
        target.display(),
        if report.album_overridden { " (album overridden)" } else { "" }
    );

    Ok(CopyOutcome::Applied(report))
}
