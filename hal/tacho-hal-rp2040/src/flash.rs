//! EEPROM emulation in RP2040 flash
//!
//! The RP2040 has no data EEPROM. The last 4 KiB flash sector backs a
//! [`ShadowEeprom`] that holds the emulated device in RAM and reprograms
//! the sector on each changing write.

use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use tacho_hal::{EepromError, SectorStore, ShadowEeprom};

/// Flash size of the Pico board
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Size of the emulated EEPROM
pub const EEPROM_SIZE: usize = 512;

/// Flash offset of the sector backing the emulated EEPROM
pub const EEPROM_SECTOR: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Emulated EEPROM in the last flash sector
pub type FlashEeprom<'d> = ShadowEeprom<FlashSector<'d>, EEPROM_SIZE>;

/// The flash sector reserved for the emulated EEPROM
pub struct FlashSector<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
}

impl<'d> FlashSector<'d> {
    pub fn new(flash: Peri<'d, FLASH>) -> Self {
        Self {
            flash: Flash::new_blocking(flash),
        }
    }

    /// Take the flash peripheral and load the emulated EEPROM from it
    pub fn into_eeprom(self) -> FlashEeprom<'d> {
        ShadowEeprom::new(self)
    }
}

impl SectorStore for FlashSector<'_> {
    fn load(&mut self, buffer: &mut [u8]) -> Result<(), EepromError> {
        self.flash
            .blocking_read(EEPROM_SECTOR, buffer)
            .map_err(|_| {
                #[cfg(feature = "defmt")]
                defmt::warn!("EEPROM sector read failed, starting erased");
                EepromError::Read
            })
    }

    fn commit(&mut self, data: &[u8]) -> Result<(), EepromError> {
        self.flash
            .blocking_erase(EEPROM_SECTOR, EEPROM_SECTOR + ERASE_SIZE as u32)
            .and_then(|_| self.flash.blocking_write(EEPROM_SECTOR, data))
            .map_err(|_| {
                #[cfg(feature = "defmt")]
                defmt::error!("EEPROM sector commit failed");
                EepromError::Write
            })
    }
}
