//! Byte layout of the persisted record
//!
//! ```text
//! offset  size  content
//!      0     2  validity marker 0xABCD (u16 LE)
//!      2     2  reserved
//!      4     4  current full scale (f32 LE)
//!      8     4  speed full scale (i32 LE)
//!     12     4  Kp (f32 LE)
//!     16     4  Ki (f32 LE)
//!     20     4  Kd (f32 LE)
//! ```

use crate::config::{Field, Parameters};

pub const MARKER_OFFSET: usize = 0;
pub const VALID_MARKER: u16 = 0xABCD;

/// Offset of the first parameter field
pub const FIELDS_OFFSET: usize = 4;
pub const FIELD_LEN: usize = 4;
pub const FIELDS_LEN: usize = FIELD_LEN * Field::ALL.len();

/// Total bytes used by the record
pub const RECORD_LEN: usize = FIELDS_OFFSET + FIELDS_LEN;

/// Position of a field relative to [`FIELDS_OFFSET`]
pub fn field_index(field: Field) -> usize {
    match field {
        Field::CurrentFullScale => 0,
        Field::SpeedFullScale => 1,
        Field::Kp => 2,
        Field::Ki => 3,
        Field::Kd => 4,
    }
}

/// Absolute storage offset of a field
pub fn field_offset(field: Field) -> usize {
    FIELDS_OFFSET + field_index(field) * FIELD_LEN
}

pub fn encode_field(params: &Parameters, field: Field) -> [u8; FIELD_LEN] {
    match field {
        Field::SpeedFullScale => params.speed_full_scale.to_le_bytes(),
        other => params.get(other).to_le_bytes(),
    }
}

pub fn decode_field(params: &mut Parameters, field: Field, bytes: [u8; FIELD_LEN]) {
    match field {
        Field::SpeedFullScale => params.speed_full_scale = i32::from_le_bytes(bytes),
        other => params.set(other, f32::from_le_bytes(bytes)),
    }
}

/// Serialize all fields into one contiguous block
pub fn encode_fields(params: &Parameters) -> [u8; FIELDS_LEN] {
    let mut block = [0u8; FIELDS_LEN];
    for field in Field::ALL {
        let start = field_index(field) * FIELD_LEN;
        block[start..start + FIELD_LEN].copy_from_slice(&encode_field(params, field));
    }
    block
}
