//! Tacho Hardware Abstraction Layer
//!
//! This crate defines the hardware primitives the motor controller is
//! written against. Chip-specific HALs implement them, the board-agnostic
//! core consumes them, and host tests substitute in-memory doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (tacho-firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tacho-core (control loop, menu, store) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tacho-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  tacho-hal-   │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`eeprom::Eeprom`] - Byte-addressable persistent storage
//! - [`shadow::SectorStore`] - Whole-sector storage behind [`shadow::ShadowEeprom`]

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod eeprom;
pub mod gpio;
pub mod shadow;

// Re-export key traits at crate root for convenience
pub use eeprom::{Eeprom, EepromError, RamEeprom};
pub use gpio::{InputPin, OutputPin};
pub use shadow::{SectorStore, ShadowEeprom};
