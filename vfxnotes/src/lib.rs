//! vfxnotes Core Library
//!
//! Annotates the picture track of video-editing exchange documents with
//! VFX IDs: one clip note per matched clip and, optionally, one timeline
//! marker per clip on the composition's event track.
//!
//! The command-line front-end lives in the `vfxnotes-cli` crate.

pub mod core;
