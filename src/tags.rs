use crate::models::{AudioFormat, Field};
use anyhow::{bail, Context, Result};
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, Tag, TagExt, TagItem};
use std::path::{Path, PathBuf};

/// Tag container of one audio file: ID3v2 for MP3, Vorbis comments for FLAC.
///
/// Edits are held in memory until `save` writes them back to `path`.
#[derive(Clone)]
pub struct TagSet {
    path: PathBuf,
    format: AudioFormat,
    tag: Tag,
}

impl std::fmt::Debug for TagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagSet")
            .field("path", &self.path)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl TagSet {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn contains(&self, field: Field) -> bool {
        self.tag.get_strings(&field.item_key()).next().is_some()
    }

    /// All values stored for `field`, in tag order. Empty if absent.
    pub fn get(&self, field: Field) -> Vec<String> {
        self.values(&field.item_key())
    }

    /// First value for `field`.
    pub fn get_first(&self, field: Field) -> Option<&str> {
        self.tag.get_string(&field.item_key())
    }

    /// Replace every value of `field` with `values`.
    pub fn set<I, S>(&mut self, field: Field, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_values(field.item_key(), values)
    }

    /// Raw access by lofty key, for keys that ride along with a field
    /// (the track total next to the track number).
    pub fn values(&self, key: &ItemKey) -> Vec<String> {
        self.tag.get_strings(key).map(|s| s.to_string()).collect()
    }

    /// Replace every value of `key`; an empty `values` removes the key.
    pub fn set_values<I, S>(&mut self, key: ItemKey, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag.remove_key(&key);
        for v in values {
            if !self.tag.push(TagItem::new(key.clone(), ItemValue::Text(v.into()))) {
                log::warn!(
                    "{:?} not representable in {:?} tag of {}",
                    key,
                    self.tag.tag_type(),
                    self.path.display()
                );
            }
        }
    }

    /// Write the tag back and check that it can be read again.
    ///
    /// A FLAC whose STREAMINFO still carries the last-block flag hides any
    /// block appended after it, so such a save is reported as an error
    /// instead of silently losing the tag.
    pub fn save(&self) -> Result<()> {
        self.tag
            .save_to_path(&self.path, WriteOptions::default())
            .with_context(|| format!("saving tags to {}", self.path.display()))?;

        if self.tag.is_empty() {
            return Ok(());
        }
        let reread = Probe::open(&self.path)
            .and_then(|p| p.read())
            .with_context(|| format!("re-reading {} after save", self.path.display()))?;
        if reread.tag(self.tag.tag_type()).is_none() {
            bail!(
                "{:?} tag written to {} cannot be read back; the file's metadata layout is not supported",
                self.tag.tag_type(),
                self.path.display()
            );
        }
        Ok(())
    }
}

/// Open the tag container of `path`.
///
/// Returns `Ok(None)` when the extension is not mp3/flac; that is a normal
/// outcome, not an error. A supported file without a tag of its format gets
/// an empty one, so a bare target can still receive metadata.
pub fn load_tags(path: &Path) -> Result<Option<TagSet>> {
    let format = match AudioFormat::from_path(path) {
        Some(f) => f,
        None => return Ok(None),
    };

    let tagged_file = Probe::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .read()
        .with_context(|| format!("reading tags from {}", path.display()))?;

    let tag_type = format.tag_type();
    let tag = tagged_file
        .tag(tag_type)
        .cloned()
        .unwrap_or_else(|| Tag::new(tag_type));

    Ok(Some(TagSet { path: path.to_path_buf(), format, tag }))
}
