//! MISB EG 0104 Predator UAV Basic Universal Set.
//!
//! The deprecated predecessor of ST 0601: one universal set per metadata
//! update, with every member addressed by its own 16-byte SMPTE key and most
//! values carried as IEEE floats or ASCII strings. Kept alive here because
//! archived Predator footage still carries it.

use super::format::{BlobFormat, FloatFormat, KlvFormat, StringFormat, UintFormat};
use super::key::{LdsKey, UdsKey};
use super::set::UniversalSetFormat;
use super::tag_traits::{TagCountRange, TagTraits, TagTraitsLookup};
use super::{st0102, Error, ErrorDetails, Result};
use std::sync::OnceLock;

/// Member tags of EG 0104, numbered for use as timeline keys.
///
/// EG 0104 itself addresses members only by universal key; these small
/// integers exist so the rest of the library can treat the standard like the
/// local sets.
pub mod tag {
    use super::LdsKey;

    /// Unknown tag.
    pub const UNKNOWN: LdsKey = 0;
    /// Frame center latitude.
    pub const FRAME_CENTER_LATITUDE: LdsKey = 1;
    /// Frame center longitude.
    pub const FRAME_CENTER_LONGITUDE: LdsKey = 2;
    /// Frame center elevation.
    pub const FRAME_CENTER_ELEVATION: LdsKey = 3;
    /// Image coordinate system.
    pub const IMAGE_COORDINATE_SYSTEM: LdsKey = 4;
    /// Target width.
    pub const TARGET_WIDTH: LdsKey = 5;
    /// Start date-time.
    pub const START_DATETIME: LdsKey = 6;
    /// Event start date-time.
    pub const EVENT_START_DATETIME: LdsKey = 7;
    /// User-defined timestamp.
    pub const USER_DEFINED_TIMESTAMP: LdsKey = 8;
    /// Corner latitude, point 1.
    pub const CORNER_LATITUDE_POINT_1: LdsKey = 9;
    /// Corner latitude, point 2.
    pub const CORNER_LATITUDE_POINT_2: LdsKey = 10;
    /// Corner latitude, point 3.
    pub const CORNER_LATITUDE_POINT_3: LdsKey = 11;
    /// Corner latitude, point 4.
    pub const CORNER_LATITUDE_POINT_4: LdsKey = 12;
    /// Corner longitude, point 1.
    pub const CORNER_LONGITUDE_POINT_1: LdsKey = 13;
    /// Corner longitude, point 2.
    pub const CORNER_LONGITUDE_POINT_2: LdsKey = 14;
    /// Corner longitude, point 3.
    pub const CORNER_LONGITUDE_POINT_3: LdsKey = 15;
    /// Corner longitude, point 4.
    pub const CORNER_LONGITUDE_POINT_4: LdsKey = 16;
    /// Slant range.
    pub const SLANT_RANGE: LdsKey = 17;
    /// Sensor roll angle.
    pub const SENSOR_ROLL_ANGLE: LdsKey = 18;
    /// Angle to north.
    pub const ANGLE_TO_NORTH: LdsKey = 19;
    /// Obliquity angle.
    pub const OBLIQUITY_ANGLE: LdsKey = 20;
    /// Platform roll angle.
    pub const PLATFORM_ROLL_ANGLE: LdsKey = 21;
    /// Platform pitch angle.
    pub const PLATFORM_PITCH_ANGLE: LdsKey = 22;
    /// Platform heading angle.
    pub const PLATFORM_HEADING_ANGLE: LdsKey = 23;
    /// Sensor horizontal field of view.
    pub const HORIZONTAL_FOV: LdsKey = 24;
    /// Sensor vertical field of view.
    pub const VERTICAL_FOV: LdsKey = 25;
    /// Device altitude.
    pub const DEVICE_ALTITUDE: LdsKey = 26;
    /// Device latitude.
    pub const DEVICE_LATITUDE: LdsKey = 27;
    /// Device longitude.
    pub const DEVICE_LONGITUDE: LdsKey = 28;
    /// Image source device.
    pub const IMAGE_SOURCE_DEVICE: LdsKey = 29;
    /// Episode (mission) number.
    pub const EPISODE_NUMBER: LdsKey = 30;
    /// Device designation.
    pub const DEVICE_DESIGNATION: LdsKey = 31;
    /// Security local set (ST 0102).
    pub const SECURITY_LOCAL_SET: LdsKey = 32;
}

// ----------------------------------------------------------------------------
/// The UDS key for an EG 0104 universal set.
pub fn key() -> UdsKey {
    UdsKey::new(0x060E2B34_02010101, 0x0E01010201010000)
}

// ----------------------------------------------------------------------------
/// The format for an EG 0104 universal set.
pub fn universal_set_format() -> UniversalSetFormat {
    UniversalSetFormat::new("EG 0104 universal set", traits())
}

// ----------------------------------------------------------------------------
/// Converts an EG 0104 datetime string (`YYYYMMDDThhmmss`, UTC) to
/// microseconds since the UNIX epoch.
pub fn datetime_to_unix_microseconds(value: &str) -> Result<u64> {
    let bytes = value.as_bytes();
    if bytes.len() != 15 || bytes[8] != b'T' {
        return Err(Error::new(0, ErrorDetails::ValueNotFound));
    }
    let digits = |range: std::ops::Range<usize>| -> Result<i64> {
        value[range]
            .parse::<i64>()
            .map_err(|_| Error::new(0, ErrorDetails::ValueNotFound))
    };
    let year = digits(0..4)?;
    let month = digits(4..6)?;
    let day = digits(6..8)?;
    let hour = digits(9..11)?;
    let minute = digits(11..13)?;
    let second = digits(13..15)?;
    if !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
        || hour > 23
        || minute > 59
        || second > 60
    {
        return Err(Error::new(0, ErrorDetails::ValueNotFound));
    }

    // Days since the epoch via the civil-from-days inverse (Howard Hinnant's
    // algorithm), valid for all dates of interest
    let year_adjusted = if month <= 2 { year - 1 } else { year };
    let era = year_adjusted.div_euclid(400);
    let year_of_era = year_adjusted - era * 400;
    let month_shifted = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * month_shifted + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    let days = era * 146097 + day_of_era - 719468;

    let seconds = days * 86400 + hour * 3600 + minute * 60 + second;
    if seconds < 0 {
        return Err(Error::new(0, ErrorDetails::TypeOverflow));
    }
    Ok(seconds as u64 * 1_000_000)
}

// ----------------------------------------------------------------------------
/// The traits of every EG 0104 member.
pub fn traits() -> &'static TagTraitsLookup {
    static LOOKUP: OnceLock<TagTraitsLookup> = OnceLock::new();
    LOOKUP.get_or_init(build_traits)
}

fn build_traits() -> TagTraitsLookup {
    use TagCountRange as Count;
    let entry = TagTraits::new;
    let float = || KlvFormat::from(FloatFormat::variable());
    let string = || KlvFormat::from(StringFormat::new());
    TagTraitsLookup::new(vec![
        entry(
            UdsKey::NONE,
            tag::UNKNOWN,
            "UNKNOWN",
            BlobFormat::new().into(),
            "Unknown Tag",
            "Unknown tag.",
            Count::FORBIDDEN,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701020103020000),
            tag::FRAME_CENTER_LATITUDE,
            "FRAME_CENTER_LATITUDE",
            float(),
            "Frame Center Latitude",
            "Latitude of the frame center. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701020103040000),
            tag::FRAME_CENTER_LONGITUDE,
            "FRAME_CENTER_LONGITUDE",
            float(),
            "Frame Center Longitude",
            "Longitude of the frame center. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701020103160000),
            tag::FRAME_CENTER_ELEVATION,
            "FRAME_CENTER_ELEVATION",
            float(),
            "Frame Center Elevation",
            "Elevation of the frame center above mean sea level. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701010100000000),
            tag::IMAGE_COORDINATE_SYSTEM,
            "IMAGE_COORDINATE_SYSTEM",
            string(),
            "Image Coordinate System",
            "Name of the image coordinate system used.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701090201000000),
            tag::TARGET_WIDTH,
            "TARGET_WIDTH",
            float(),
            "Target Width",
            "Target width within the sensor field of view. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0702010201010000),
            tag::START_DATETIME,
            "START_DATETIME",
            string(),
            "Start Date-Time",
            "Start time of the mission, as YYYYMMDDThhmmss.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0702010207010000),
            tag::EVENT_START_DATETIME,
            "EVENT_START_DATETIME",
            string(),
            "Event Start Date-Time",
            "Start time of the scene, project, event, or operation, as YYYYMMDDThhmmss.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010103, 0x0702010101050000),
            tag::USER_DEFINED_TIMESTAMP,
            "USER_DEFINED_TIMESTAMP",
            UintFormat::fixed(8).into(),
            "User Defined Timestamp",
            "Timestamp for all metadata in this universal set. Measured in microseconds since \
             the UNIX epoch.",
            Count::EXACTLY_ONE,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010103, 0x0701020103070100),
            tag::CORNER_LATITUDE_POINT_1,
            "CORNER_LATITUDE_POINT_1",
            float(),
            "Corner Latitude Point 1",
            "Latitude of the upper-left image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010103, 0x0701020103080100),
            tag::CORNER_LATITUDE_POINT_2,
            "CORNER_LATITUDE_POINT_2",
            float(),
            "Corner Latitude Point 2",
            "Latitude of the upper-right image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010103, 0x0701020103090100),
            tag::CORNER_LATITUDE_POINT_3,
            "CORNER_LATITUDE_POINT_3",
            float(),
            "Corner Latitude Point 3",
            "Latitude of the lower-right image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010103, 0x07010201030A0100),
            tag::CORNER_LATITUDE_POINT_4,
            "CORNER_LATITUDE_POINT_4",
            float(),
            "Corner Latitude Point 4",
            "Latitude of the lower-left image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010103, 0x07010201030B0100),
            tag::CORNER_LONGITUDE_POINT_1,
            "CORNER_LONGITUDE_POINT_1",
            float(),
            "Corner Longitude Point 1",
            "Longitude of the upper-left image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010103, 0x07010201030C0100),
            tag::CORNER_LONGITUDE_POINT_2,
            "CORNER_LONGITUDE_POINT_2",
            float(),
            "Corner Longitude Point 2",
            "Longitude of the upper-right image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010103, 0x07010201030D0100),
            tag::CORNER_LONGITUDE_POINT_3,
            "CORNER_LONGITUDE_POINT_3",
            float(),
            "Corner Longitude Point 3",
            "Longitude of the lower-right image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010103, 0x07010201030E0100),
            tag::CORNER_LONGITUDE_POINT_4,
            "CORNER_LONGITUDE_POINT_4",
            float(),
            "Corner Longitude Point 4",
            "Longitude of the lower-left image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701080101000000),
            tag::SLANT_RANGE,
            "SLANT_RANGE",
            float(),
            "Slant Range",
            "Distance between the sensor and the frame center. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701100103000000),
            tag::SENSOR_ROLL_ANGLE,
            "SENSOR_ROLL_ANGLE",
            float(),
            "Sensor Roll Angle",
            "Roll angle of the sensor. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701100102000000),
            tag::ANGLE_TO_NORTH,
            "ANGLE_TO_NORTH",
            float(),
            "Angle to North",
            "Angle between the first image row and true north. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701100101000000),
            tag::OBLIQUITY_ANGLE,
            "OBLIQUITY_ANGLE",
            float(),
            "Obliquity Angle",
            "Angle between the optical axis and the local vertical. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701100104000000),
            tag::PLATFORM_ROLL_ANGLE,
            "PLATFORM_ROLL_ANGLE",
            float(),
            "Platform Roll Angle",
            "Roll angle of the platform. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701100105000000),
            tag::PLATFORM_PITCH_ANGLE,
            "PLATFORM_PITCH_ANGLE",
            float(),
            "Platform Pitch Angle",
            "Pitch angle of the platform. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701100106000000),
            tag::PLATFORM_HEADING_ANGLE,
            "PLATFORM_HEADING_ANGLE",
            float(),
            "Platform Heading Angle",
            "Heading angle of the platform. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0420020101080000),
            tag::HORIZONTAL_FOV,
            "HORIZONTAL_FOV",
            float(),
            "Sensor Horizontal Field of View",
            "Horizontal field of view of the active sensor. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010107, 0x04200201010A0100),
            tag::VERTICAL_FOV,
            "VERTICAL_FOV",
            float(),
            "Sensor Vertical Field of View",
            "Vertical field of view of the active sensor. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701020102020000),
            tag::DEVICE_ALTITUDE,
            "DEVICE_ALTITUDE",
            float(),
            "Device Altitude",
            "Altitude of the imaging device above mean sea level. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701020102040200),
            tag::DEVICE_LATITUDE,
            "DEVICE_LATITUDE",
            float(),
            "Device Latitude",
            "Latitude of the imaging device. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0701020102060200),
            tag::DEVICE_LONGITUDE,
            "DEVICE_LONGITUDE",
            float(),
            "Device Longitude",
            "Longitude of the imaging device. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0420010201010000),
            tag::IMAGE_SOURCE_DEVICE,
            "IMAGE_SOURCE_DEVICE",
            string(),
            "Image Source Device",
            "Name of the currently active sensor.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0105050000000000),
            tag::EPISODE_NUMBER,
            "EPISODE_NUMBER",
            float(),
            "Episode Number",
            "Episode (mission) number.",
            Count::OPTIONAL,
        ),
        entry(
            UdsKey::new(0x060E2B34_01010101, 0x0101200100000000),
            tag::DEVICE_DESIGNATION,
            "DEVICE_DESIGNATION",
            string(),
            "Device Designation",
            "Model name of the platform.",
            Count::OPTIONAL,
        ),
        entry(
            st0102::key(),
            tag::SECURITY_LOCAL_SET,
            "SECURITY_LOCAL_SET",
            KlvFormat::from(st0102::local_set_format()),
            "Security Local Set",
            "MISB ST 0102 local set for security metadata.",
            Count::OPTIONAL,
        )
        .with_subtags(st0102::traits()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_conversion_matches_epoch() {
        assert_eq!(datetime_to_unix_microseconds("19700101T000000").unwrap(), 0);
        assert_eq!(
            datetime_to_unix_microseconds("20010203T040506").unwrap(),
            981_173_106_000_000
        );
    }

    #[test]
    fn malformed_datetimes_are_rejected() {
        assert!(datetime_to_unix_microseconds("20010203-040506").is_err());
        assert!(datetime_to_unix_microseconds("2001020T3040506").is_err());
        assert!(datetime_to_unix_microseconds("20011503T040506").is_err());
    }

    #[test]
    fn timestamp_key_resolves_by_tag_and_key() {
        let lookup = traits();
        let timestamp = lookup.by_tag(tag::USER_DEFINED_TIMESTAMP);
        assert_eq!(timestamp.name(), "User Defined Timestamp");
        assert_eq!(
            lookup.by_uds_key(timestamp.uds_key()).tag(),
            tag::USER_DEFINED_TIMESTAMP
        );
    }
}
