//! journl - voice notes and media attachments for a personal journal
//!
//! This crate records voice notes from the microphone with a live waveform,
//! lets the user review them before saving, and stores voice notes, images
//! and documents in a content-addressed local store or a remote bucket.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Journal entries, media items, recorder state and config values
//! - **Application**: The voice recorder and uploader use cases plus port traits
//! - **Infrastructure**: Adapters (cpal, flacenc, rodio, filesystem, HTTP storage)
//! - **CLI**: Argument parsing, presentation and logging setup

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
