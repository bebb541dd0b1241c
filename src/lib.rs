//! Core library for song-metadata-copier
pub mod archive;
pub mod config;
pub mod copier;
pub mod matcher;
pub mod models;
pub mod tags;
pub mod transfer;
pub mod util;
pub mod workspace;
