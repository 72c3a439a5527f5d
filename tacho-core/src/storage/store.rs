//! Parameter store over a byte-addressable EEPROM

use tacho_hal::{Eeprom, EepromError};

use super::layout::{
    decode_field, encode_fields, field_index, FIELDS_LEN, FIELDS_OFFSET, FIELD_LEN,
    MARKER_OFFSET, RECORD_LEN, VALID_MARKER,
};
use crate::config::{Field, Parameters};

/// Errors from parameter persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// The storage device rejected the access
    Eeprom(EepromError),
}

impl From<EepromError> for StoreError {
    fn from(err: EepromError) -> Self {
        StoreError::Eeprom(err)
    }
}

/// Owns the EEPROM and the factory defaults
pub struct ParameterStore<E> {
    eeprom: E,
    defaults: Parameters,
}

impl<E: Eeprom> ParameterStore<E> {
    pub fn new(eeprom: E, defaults: Parameters) -> Self {
        Self { eeprom, defaults }
    }

    pub fn defaults(&self) -> &Parameters {
        &self.defaults
    }

    pub fn eeprom(&self) -> &E {
        &self.eeprom
    }

    pub fn eeprom_mut(&mut self) -> &mut E {
        &mut self.eeprom
    }

    /// Check for the validity marker
    ///
    /// A failed read counts as invalid.
    pub fn is_valid(&mut self) -> bool {
        let mut marker = [0u8; 2];
        match self.eeprom.read(MARKER_OFFSET, &mut marker) {
            Ok(()) => u16::from_le_bytes(marker) == VALID_MARKER,
            Err(e) => {
                warn!("Marker read failed: {:?}", e);
                false
            }
        }
    }

    /// Load parameters, replacing any out-of-range field with its default
    ///
    /// Never fails: an unreadable record yields the defaults.
    pub fn load_or_default(&mut self) -> Parameters {
        let mut block = [0u8; FIELDS_LEN];
        if let Err(e) = self.eeprom.read(FIELDS_OFFSET, &mut block) {
            warn!("Parameter read failed: {:?}, using defaults", e);
            return self.defaults;
        }

        let mut params = self.defaults;
        for field in Field::ALL {
            let start = field_index(field) * FIELD_LEN;
            let mut bytes = [0u8; FIELD_LEN];
            bytes.copy_from_slice(&block[start..start + FIELD_LEN]);
            decode_field(&mut params, field, bytes);
        }

        for field in params.repair(&self.defaults) {
            warn!("Stored {:?} out of range, using default", field);
        }

        debug!("Loaded parameters: {:?}", params);
        params
    }

    /// Persist all fields and the marker in a single write
    pub fn save(&mut self, params: &Parameters) -> Result<(), StoreError> {
        let mut record = [tacho_hal::eeprom::ERASED_BYTE; RECORD_LEN];
        record[MARKER_OFFSET..MARKER_OFFSET + 2].copy_from_slice(&VALID_MARKER.to_le_bytes());
        record[FIELDS_OFFSET..].copy_from_slice(&encode_fields(params));

        self.eeprom.write(MARKER_OFFSET, &record)?;
        debug!("Parameters saved");
        Ok(())
    }

    /// Overwrite storage with the defaults and mark it valid
    pub fn initialize_with_defaults(&mut self) -> Result<Parameters, StoreError> {
        let defaults = self.defaults;
        self.save(&defaults)?;
        info!("Storage initialized with defaults");
        Ok(defaults)
    }

    /// Startup sequence: initialize blank storage, then load
    pub fn boot(&mut self) -> Parameters {
        if !self.is_valid() {
            info!("No valid parameter record, writing defaults");
            if let Err(e) = self.initialize_with_defaults() {
                error!("Default initialization failed: {:?}", e);
                return self.defaults;
            }
        }
        self.load_or_default()
    }
}
