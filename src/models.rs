use lofty::tag::{ItemKey, TagType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The tag fields carried over from a reference file to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Artist,
    Album,
    Genre,
    Composer,
    AlbumArtist,
    Date,
    TrackNumber,
}

const TRACK_NUMBER_COMPANIONS: &[ItemKey] = &[ItemKey::TrackTotal];

impl Field {
    /// Fixed copy order. Not configurable.
    pub const ALL: [Field; 8] = [
        Field::Title,
        Field::Artist,
        Field::Album,
        Field::Genre,
        Field::Composer,
        Field::AlbumArtist,
        Field::Date,
        Field::TrackNumber,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Artist => "artist",
            Field::Album => "album",
            Field::Genre => "genre",
            Field::Composer => "composer",
            Field::AlbumArtist => "albumartist",
            Field::Date => "date",
            Field::TrackNumber => "tracknumber",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Generic lofty key; lofty maps it to TIT2/TPE1/... for ID3v2 and
    /// TITLE/ARTIST/... for Vorbis comments.
    pub fn item_key(self) -> ItemKey {
        match self {
            Field::Title => ItemKey::TrackTitle,
            Field::Artist => ItemKey::TrackArtist,
            Field::Album => ItemKey::AlbumTitle,
            Field::Genre => ItemKey::Genre,
            Field::Composer => ItemKey::Composer,
            Field::AlbumArtist => ItemKey::AlbumArtist,
            Field::Date => ItemKey::RecordingDate,
            Field::TrackNumber => ItemKey::TrackNumber,
        }
    }

    /// Keys stored beside this field that travel with it. ID3 keeps
    /// "3/12" in one TRCK frame, which lofty reads as a number plus a total.
    pub fn companion_keys(self) -> &'static [ItemKey] {
        match self {
            Field::TrackNumber => TRACK_NUMBER_COMPANIONS,
            _ => &[],
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Container formats the copier understands, decided by file extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Flac,
}

impl AudioFormat {
    /// Case-insensitive extension check. No content sniffing.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "flac" => Some(AudioFormat::Flac),
            _ => None,
        }
    }

    pub fn tag_type(self) -> TagType {
        match self {
            AudioFormat::Mp3 => TagType::Id3v2,
            AudioFormat::Flac => TagType::VorbisComments,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Flac => "audio/flac",
        }
    }
}

/// Per-call knobs for the copier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOptions {
    /// Replaces the target album after copying. Empty means no override.
    pub album_override: Option<String>,
    /// Leave the target's track number alone.
    pub delete_track_number: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self { album_override: None, delete_track_number: true }
    }
}

impl CopyOptions {
    /// Override value if one is set and non-empty.
    pub fn effective_album_override(&self) -> Option<&str> {
        self.album_override.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Target extension is neither mp3 nor flac.
    UnsupportedTarget,
    /// Reference extension is neither mp3 nor flac.
    UnsupportedReference,
    /// Batch mode: no target name contains the reference base name.
    NoMatch,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnsupportedTarget => f.write_str("unsupported target format"),
            SkipReason::UnsupportedReference => f.write_str("unsupported reference format"),
            SkipReason::NoMatch => f.write_str("no matching target"),
        }
    }
}

/// What the copier wrote to a target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    pub copied: Vec<Field>,
    pub track_number_suppressed: bool,
    pub album_overridden: bool,
    /// False when the reference was unsupported and nothing could be copied.
    pub source_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CopyOutcome {
    Applied(CopyReport),
    Skipped { reason: SkipReason },
}

impl CopyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CopyOutcome::Applied(_))
    }
}
