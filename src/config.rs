use crate::models::CopyOptions;
use crate::transfer::TransferSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Album name forced onto every target; empty keeps copied/existing albums.
    #[serde(default)]
    pub album_override: String,
    #[serde(default = "default_delete_track_number")]
    pub delete_track_number: bool,
    /// Delete each reference file once its targets are processed.
    #[serde(default)]
    pub delete_reference: bool,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Parent for the per-run scratch dir; system temp dir when unset.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    #[serde(default = "default_archive_label")]
    pub archive_label: String,
    /// Also log to a daily-rotated file here.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Extensions picked up when a directory is given as input.
    /// Examples: ["*.mp3", "*.flac"]. Case-insensitive.
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,
}

fn default_delete_track_number() -> bool { true }
fn default_output_dir() -> PathBuf { ".".into() }
fn default_archive_label() -> String { "batch_results".into() }

fn default_file_extensions() -> Vec<String> {
    vec!["*.mp3", "*.flac"].into_iter().map(String::from).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            album_override: String::new(),
            delete_track_number: default_delete_track_number(),
            delete_reference: false,
            output_dir: default_output_dir(),
            work_dir: None,
            archive_label: default_archive_label(),
            log_dir: None,
            file_extensions: default_file_extensions(),
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        Ok(cfg)
    }

    /// `<config dir>/song-metadata-copier/config.toml`, if the platform has a
    /// config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("song-metadata-copier").join("config.toml"))
    }

    /// Load `explicit` if given, else the default location when it exists,
    /// else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(p) = explicit {
            return Self::from_path(p);
        }
        match Self::default_path() {
            Some(p) if p.exists() => Self::from_path(&p),
            _ => Ok(Self::default()),
        }
    }

    pub fn transfer_settings(&self) -> TransferSettings {
        TransferSettings {
            copy: CopyOptions {
                album_override: Some(self.album_override.clone()).filter(|s| !s.is_empty()),
                delete_track_number: self.delete_track_number,
            },
            delete_reference: self.delete_reference,
            work_dir: self.work_dir.clone(),
            archive_label: self.archive_label.clone(),
        }
    }
}
