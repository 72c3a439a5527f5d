//! Text-mode display for the Tacho controller
//!
//! This crate provides:
//! - `Screen`, a 20x4 character buffer with per-row change tracking
//! - `Renderer`, which turns a controller `Snapshot` into screen lines
//! - `DisplayBackend`, the trait a physical (or logging) display implements
//! - `TextDisplay`, the `StatusDisplay` implementation that layers transient
//!   messages and confirmation popups over the rendered screen
//!
//! # Architecture
//!
//! The controller core knows nothing about layout. Once per refresh it hands
//! over a snapshot; `TextDisplay` renders it, applies overlays, and pushes
//! only the rows that changed to the backend.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod renderer;
pub mod screen;
pub mod text;

// Re-export key types
pub use backend::DisplayBackend;
pub use renderer::Renderer;
pub use screen::{Screen, LINE_LEN, SCREEN_COLS, SCREEN_ROWS};
pub use tacho_core::traits::DisplayError;
pub use text::TextDisplay;
