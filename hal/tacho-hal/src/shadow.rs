//! EEPROM emulation over whole-sector storage
//!
//! Flash can only be rewritten a sector at a time. [`ShadowEeprom`] keeps
//! the emulated device in RAM and commits the full image on every write
//! that changes it. A failed commit leaves the image marked pending, so
//! the next write commits again even if it changes no bytes.

use crate::eeprom::{Eeprom, EepromError, ERASED_BYTE};

/// Storage that is loaded and rewritten as one block
pub trait SectorStore {
    /// Fill `buffer` from the start of the sector
    fn load(&mut self, buffer: &mut [u8]) -> Result<(), EepromError>;

    /// Erase the sector and program `data` at its start
    fn commit(&mut self, data: &[u8]) -> Result<(), EepromError>;
}

pub struct ShadowEeprom<S, const N: usize> {
    store: S,
    shadow: [u8; N],
    pending: bool,
}

impl<S: SectorStore, const N: usize> ShadowEeprom<S, N> {
    /// Load the shadow from `store`
    ///
    /// A failed load leaves the shadow erased, which reads as an
    /// uninitialised device.
    pub fn new(mut store: S) -> Self {
        let mut shadow = [ERASED_BYTE; N];
        if store.load(&mut shadow).is_err() {
            shadow = [ERASED_BYTE; N];
        }
        Self {
            store,
            shadow,
            pending: false,
        }
    }

    /// True while the shadow holds bytes that never reached the store
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: SectorStore, const N: usize> Eeprom for ShadowEeprom<S, N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), EepromError> {
        self.check_range(offset, buffer.len())?;
        buffer.copy_from_slice(&self.shadow[offset..offset + buffer.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError> {
        self.check_range(offset, data.len())?;
        let target = &mut self.shadow[offset..offset + data.len()];
        if target == data && !self.pending {
            return Ok(());
        }
        target.copy_from_slice(data);

        let result = self.store.commit(&self.shadow);
        self.pending = result.is_err();
        result
    }
}
