//! Byte-addressable persistent storage
//!
//! The controller keeps its tuning parameters at fixed offsets, so the
//! storage abstraction is a flat byte array rather than a key-value map.
//! Chips without a real EEPROM emulate one on top of flash.

/// Value of an erased storage byte
pub const ERASED_BYTE: u8 = 0xFF;

/// Errors from EEPROM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Access extends past the end of the device
    OutOfBounds,
    /// Underlying read failed
    Read,
    /// Underlying write or commit failed
    Write,
}

/// Byte-addressable non-volatile storage
///
/// Implementations may be slow (a flash-backed emulation erases a whole
/// sector per commit) but must be consistent: a read after a successful
/// write returns the written bytes. There is only ever one writer.
pub trait Eeprom {
    /// Total addressable size in bytes
    fn capacity(&self) -> usize;

    /// Read `buffer.len()` bytes starting at `offset`
    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), EepromError>;

    /// Write `data` starting at `offset`
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError>;

    /// Check that an access of `len` bytes at `offset` fits the device
    fn check_range(&self, offset: usize, len: usize) -> Result<(), EepromError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.capacity() => Ok(()),
            _ => Err(EepromError::OutOfBounds),
        }
    }
}

/// EEPROM held in RAM
///
/// Starts fully erased. Used for host tests and simulation; counts writes
/// and can be told to fail them so persistence error paths can be exercised.
#[derive(Debug, Clone)]
pub struct RamEeprom<const N: usize> {
    bytes: [u8; N],
    writes: usize,
    fail_writes: bool,
}

impl<const N: usize> Default for RamEeprom<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RamEeprom<N> {
    /// Create an erased device
    pub const fn new() -> Self {
        Self {
            bytes: [ERASED_BYTE; N],
            writes: 0,
            fail_writes: false,
        }
    }

    /// Number of successful write calls so far
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn set_write_fault(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Raw contents
    pub fn bytes(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> Eeprom for RamEeprom<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), EepromError> {
        self.check_range(offset, buffer.len())?;
        buffer.copy_from_slice(&self.bytes[offset..offset + buffer.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError> {
        self.check_range(offset, data.len())?;
        if self.fail_writes {
            return Err(EepromError::Write);
        }
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_erased() {
        let mut eeprom = RamEeprom::<16>::new();
        let mut buf = [0u8; 4];
        eeprom.read(0, &mut buf).unwrap();
        assert_eq!(buf, [ERASED_BYTE; 4]);
    }

    #[test]
    fn test_write_then_read() {
        let mut eeprom = RamEeprom::<16>::new();
        eeprom.write(4, &[1, 2, 3]).unwrap();

        let mut buf = [0u8; 3];
        eeprom.read(4, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(eeprom.write_count(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut eeprom = RamEeprom::<8>::new();
        assert_eq!(eeprom.write(6, &[0; 4]), Err(EepromError::OutOfBounds));

        let mut buf = [0u8; 2];
        assert_eq!(eeprom.read(usize::MAX, &mut buf), Err(EepromError::OutOfBounds));
    }

    #[test]
    fn test_write_fault_leaves_contents() {
        let mut eeprom = RamEeprom::<8>::new();
        eeprom.set_write_fault(true);
        assert_eq!(eeprom.write(0, &[0]), Err(EepromError::Write));
        assert_eq!(eeprom.bytes()[0], ERASED_BYTE);
        assert_eq!(eeprom.write_count(), 0);

        eeprom.set_write_fault(false);
        assert!(eeprom.write(0, &[0]).is_ok());
    }
}
