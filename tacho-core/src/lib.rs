//! Board-agnostic core logic for the motor speed controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (sensor, actuator, buttons, display)
//! - Persisted parameter lifecycle (validate, load, save, default-fill)
//! - Sensing and alarm monitoring with a dwell-based clear
//! - Operating-mode state machine (idle / run / alarm)
//! - PID speed loop with clamped output and anti-windup
//! - Button debouncing and the menu/editing state machine
//! - The cooperative controller loop tying them together
//!
//! Everything runs from a single loop thread. Each periodic task gates
//! itself against an injected [`clock::Clock`], so the whole controller
//! can be driven deterministically from tests.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod clock;
pub mod config;
pub mod control;
pub mod controller;
pub mod input;
pub mod menu;
pub mod safety;
pub mod sensing;
pub mod state;
pub mod storage;
pub mod traits;

pub use controller::Controller;
