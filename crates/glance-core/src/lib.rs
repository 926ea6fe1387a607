//! Playback core for the Glance RSVP presenter.
//!
//! Everything here is clock-free and I/O-free: the host feeds monotonic
//! milliseconds into [`engine::PlaybackEngine`] and renders whatever the
//! engine reports through its [`engine::PlaybackListener`].

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod content;
pub mod engine;
pub mod input;
pub mod orp;
pub mod settings;
pub mod text_policy;
