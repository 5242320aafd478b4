//! termtune core - playlist playback session
//!
//! This crate provides the playback session controller plus the pieces it
//! drives: library scanning, the audio engine, display helpers and the
//! render/command loops.

pub mod command;
pub mod decoder;
pub mod display;
pub mod engine;
pub mod library;
pub mod marquee;
pub mod output;
pub mod player;
pub mod runner;
pub mod session;

pub use command::Command;
pub use display::{ PlaybackMode, StatusLabel };
pub use engine::{ EngineError, EngineStatus, PlaybackEngine };
pub use library::{ LibraryError, Track, TrackList };
pub use marquee::Marquee;
pub use player::AudioEngine;
pub use session::{ Flow, Session, SessionConfig, SessionError, Snapshot };
