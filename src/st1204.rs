//! MISB ST 1204 Motion Imagery Identification System Core Identifier.
//!
//! A compact binary pack labeling a stream with the UUIDs of the sensor and
//! platform that produced it, plus optional window and minor UUIDs for
//! derived streams.

use super::format::{cast_error, FormatImpl};
use super::key::UdsKey;
use super::value::ValueData;
use super::{Result, SliceReader, SliceWriter};
use std::fmt::{Display, Formatter};

/// How a device identifier was assigned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeviceIdType {
    /// No identifier included.
    None,
    /// Identifier managed by a registry.
    Managed,
    /// Identifier generated for a virtual device.
    Virtual,
    /// Identifier derived from physical device information.
    Physical,
}

impl DeviceIdType {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            1 => DeviceIdType::Managed,
            2 => DeviceIdType::Virtual,
            3 => DeviceIdType::Physical,
            _ => DeviceIdType::None,
        }
    }

    fn bits(self) -> u8 {
        match self {
            DeviceIdType::None => 0,
            DeviceIdType::Managed => 1,
            DeviceIdType::Virtual => 2,
            DeviceIdType::Physical => 3,
        }
    }
}

impl Display for DeviceIdType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeviceIdType::None => "None",
            DeviceIdType::Managed => "Managed",
            DeviceIdType::Virtual => "Virtual",
            DeviceIdType::Physical => "Physical",
        };
        write!(f, "{}", name)
    }
}

/// A 16-byte UUID as carried by ST 1204.
pub type Uuid = [u8; 16];

fn write_uuid(f: &mut Formatter<'_>, uuid: &Uuid) -> std::fmt::Result {
    for (i, byte) in uuid.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            write!(f, "-")?;
        }
        write!(f, "{:02x}", byte)?;
    }
    Ok(())
}

/// A MIIS core identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MiisId {
    /// Version of MISB ST 1204 used to encode the identifier.
    pub version: u8,
    /// How the sensor identifier was assigned.
    pub sensor_id_type: DeviceIdType,
    /// How the platform identifier was assigned.
    pub platform_id_type: DeviceIdType,
    /// UUID of the sensor producing the imagery.
    pub sensor_id: Option<Uuid>,
    /// UUID of the platform carrying the sensor.
    pub platform_id: Option<Uuid>,
    /// UUID of a windowed sub-region stream.
    pub window_id: Option<Uuid>,
    /// UUID distinguishing otherwise identical streams.
    pub minor_id: Option<Uuid>,
}

impl Display for MiisId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Version: {}, Sensor ID Type: {}, Platform ID Type: {}",
            self.version, self.sensor_id_type, self.platform_id_type
        )?;
        for (name, uuid) in [
            ("Sensor ID", &self.sensor_id),
            ("Platform ID", &self.platform_id),
            ("Window ID", &self.window_id),
            ("Minor ID", &self.minor_id),
        ] {
            if let Some(uuid) = uuid {
                write!(f, ", {}: ", name)?;
                write_uuid(f, uuid)?;
            }
        }
        write!(f, " }}")
    }
}

/// Interprets data as a ST 1204 MIIS core identifier: a version byte, a
/// usage byte encoding the identifier types and presence flags, then the
/// present UUIDs in order.
#[derive(Clone, Default)]
pub struct MiisIdFormat;

impl MiisIdFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

const WINDOW_ID_BIT: u8 = 0x08;
const MINOR_ID_BIT: u8 = 0x04;

impl FormatImpl for MiisIdFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "MIIS ID of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, _length: usize) -> Result<ValueData> {
        let version = reader.read_u8()?;
        let usage = reader.read_u8()?;
        let sensor_id_type = DeviceIdType::from_bits(usage >> 6);
        let platform_id_type = DeviceIdType::from_bits(usage >> 4);
        let sensor_id = if sensor_id_type != DeviceIdType::None {
            Some(reader.read_array::<16>()?)
        } else {
            None
        };
        let platform_id = if platform_id_type != DeviceIdType::None {
            Some(reader.read_array::<16>()?)
        } else {
            None
        };
        let window_id = if usage & WINDOW_ID_BIT != 0 {
            Some(reader.read_array::<16>()?)
        } else {
            None
        };
        let minor_id = if usage & MINOR_ID_BIT != 0 {
            Some(reader.read_array::<16>()?)
        } else {
            None
        };
        Ok(ValueData::MiisId(MiisId {
            version,
            sensor_id_type,
            platform_id_type,
            sensor_id,
            platform_id,
            window_id,
            minor_id,
        }))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        let id = match data {
            ValueData::MiisId(id) => id,
            _ => return Err(cast_error("MiisId", data)),
        };
        let mut usage = (id.sensor_id_type.bits() << 6) | (id.platform_id_type.bits() << 4);
        if id.window_id.is_some() {
            usage |= WINDOW_ID_BIT;
        }
        if id.minor_id.is_some() {
            usage |= MINOR_ID_BIT;
        }
        writer.write_u8(id.version)?;
        writer.write_u8(usage)?;
        for uuid in [&id.sensor_id, &id.platform_id, &id.window_id, &id.minor_id]
            .iter()
            .filter_map(|uuid| uuid.as_ref())
        {
            writer.write(uuid)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        let id = match data {
            ValueData::MiisId(id) => id,
            _ => return Err(cast_error("MiisId", data)),
        };
        let uuids = [&id.sensor_id, &id.platform_id, &id.window_id, &id.minor_id]
            .iter()
            .filter(|uuid| uuid.is_some())
            .count();
        Ok(2 + 16 * uuids)
    }
}

// ----------------------------------------------------------------------------
/// The UDS key for a MISB ST 1204 MIIS core identifier.
pub fn key() -> UdsKey {
    UdsKey::new(0x060E2B34_01010101, 0x0E01040503000000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::KlvFormat;
    use crate::Value;

    #[test]
    fn miis_id_round_trip() {
        let format = KlvFormat::from(MiisIdFormat::new());
        let id = MiisId {
            version: 1,
            sensor_id_type: DeviceIdType::Physical,
            platform_id_type: DeviceIdType::Virtual,
            sensor_id: Some([0x11; 16]),
            platform_id: Some([0x22; 16]),
            window_id: None,
            minor_id: Some([0x33; 16]),
        };
        let value = Value::from(id.clone());
        let length = format.length_of(&value).unwrap();
        assert_eq!(length, 2 + 3 * 16);

        let mut buffer = vec![0_u8; length];
        let mut writer = crate::SliceWriter::new(&mut buffer);
        format.write(&value, &mut writer).unwrap();
        drop(writer);

        let mut reader = SliceReader::new(&buffer);
        let parsed = format.read(&mut reader, length).unwrap();
        assert_eq!(parsed.as_miis_id().unwrap(), &id);
    }

    #[test]
    fn absent_uuids_are_skipped_on_the_wire() {
        let format = KlvFormat::from(MiisIdFormat::new());
        // Version 1, usage: no ids at all
        let bytes = [0x01_u8, 0x00];
        let mut reader = SliceReader::new(&bytes);
        let value = format.read(&mut reader, 2).unwrap();
        let id = value.as_miis_id().unwrap();
        assert_eq!(id.sensor_id_type, DeviceIdType::None);
        assert!(id.sensor_id.is_none());
        assert!(id.minor_id.is_none());
    }
}
