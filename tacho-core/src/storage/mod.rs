//! Persisted parameter lifecycle
//!
//! A validity marker guards a fixed little-endian record of the five
//! parameters. Blank or foreign storage is detected through the marker and
//! rewritten with defaults; individually corrupt fields are repaired on load.

mod layout;
mod store;

pub use layout::{RECORD_LEN, VALID_MARKER};
pub use store::{ParameterStore, StoreError};
