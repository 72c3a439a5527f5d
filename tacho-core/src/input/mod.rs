//! Button debouncing
//!
//! Raw levels are sampled on the input cadence. A level is accepted once it
//! has been stable for the debounce delay, and each accepted change yields
//! exactly one [`ButtonEvent`].

mod debounce;
mod scanner;

pub use debounce::Debouncer;
pub use scanner::{ButtonEvent, ButtonScanner, Events};
