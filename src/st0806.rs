//! MISB ST 0806 Remote Video Terminal Local Set.
//!
//! Metadata for the datalink between a UAS platform and remote video
//! terminals, closed by a CRC-32-MPEG trailer. The POI, AOI, and
//! user-defined sub-sets are carried opaquely.

use super::checksum::{ChecksumAlgorithm, ChecksumPacketFormat};
use super::format::{BlobFormat, StringFormat, UintFormat};
use super::key::{LdsKey, UdsKey};
use super::set::LocalSetFormat;
use super::tag_traits::{TagCountRange, TagTraits, TagTraitsLookup};
use std::sync::OnceLock;

/// Local set tags defined by ST 0806.5.
pub mod tag {
    use super::LdsKey;

    /// Unknown tag.
    pub const UNKNOWN: LdsKey = 0;
    /// Checksum.
    pub const CHECKSUM: LdsKey = 1;
    /// User-defined timestamp.
    pub const TIMESTAMP: LdsKey = 2;
    /// Platform true airspeed.
    pub const PLATFORM_TRUE_AIRSPEED: LdsKey = 3;
    /// Platform indicated airspeed.
    pub const PLATFORM_INDICATED_AIRSPEED: LdsKey = 4;
    /// Telemetry accuracy indicator.
    pub const TELEMETRY_ACCURACY_INDICATOR: LdsKey = 5;
    /// Fragmentation circle radius.
    pub const FRAG_CIRCLE_RADIUS: LdsKey = 6;
    /// Frame code.
    pub const FRAME_CODE: LdsKey = 7;
    /// ST 0806 version number.
    pub const VERSION_NUMBER: LdsKey = 8;
    /// Video data rate.
    pub const VIDEO_DATA_RATE: LdsKey = 9;
    /// Digital video file format.
    pub const DIGITAL_VIDEO_FILE_FORMAT: LdsKey = 10;
    /// User-defined local set.
    pub const USER_DEFINED_LOCAL_SET: LdsKey = 11;
    /// Point of interest local set.
    pub const POI_LOCAL_SET: LdsKey = 12;
    /// Area of interest local set.
    pub const AOI_LOCAL_SET: LdsKey = 13;
    /// MGRS zone.
    pub const MGRS_ZONE: LdsKey = 14;
    /// MGRS latitude band and grid square.
    pub const MGRS_LATITUDE_BAND_GRID_SQUARE: LdsKey = 15;
    /// MGRS easting.
    pub const MGRS_EASTING: LdsKey = 16;
    /// MGRS northing.
    pub const MGRS_NORTHING: LdsKey = 17;
    /// Frame center MGRS zone.
    pub const FRAME_CENTER_MGRS_ZONE: LdsKey = 18;
    /// Frame center MGRS latitude band and grid square.
    pub const FRAME_CENTER_MGRS_LATITUDE_BAND_GRID_SQUARE: LdsKey = 19;
    /// Frame center MGRS easting.
    pub const FRAME_CENTER_MGRS_EASTING: LdsKey = 20;
    /// Frame center MGRS northing.
    pub const FRAME_CENTER_MGRS_NORTHING: LdsKey = 21;
}

// ----------------------------------------------------------------------------
/// The UDS key for a MISB ST 0806 local set.
pub fn key() -> UdsKey {
    UdsKey::new(0x060E2B34_020B0101, 0x0E01030102000000)
}

// ----------------------------------------------------------------------------
/// The format for a MISB ST 0806 local set, with its CRC-32-MPEG trailer.
pub fn local_set_format() -> LocalSetFormat {
    LocalSetFormat::new("ST 0806 local set", traits()).with_checksum(ChecksumPacketFormat::new(
        ChecksumAlgorithm::Crc32Mpeg,
        [tag::CHECKSUM as u8, 4],
    ))
}

// ----------------------------------------------------------------------------
/// The traits of every ST 0806 tag.
pub fn traits() -> &'static TagTraitsLookup {
    static LOOKUP: OnceLock<TagTraitsLookup> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        use TagCountRange as Count;
        let none = UdsKey::NONE;
        let entry = TagTraits::new;
        TagTraitsLookup::new(vec![
            entry(
                none,
                tag::UNKNOWN,
                "UNKNOWN",
                BlobFormat::new().into(),
                "Unknown Tag",
                "Unknown tag.",
                Count::FORBIDDEN,
            ),
            entry(
                none,
                tag::CHECKSUM,
                "CHECKSUM",
                UintFormat::fixed(4).into(),
                "Checksum",
                "CRC-32-MPEG checksum over the enclosing local set.",
                Count::FORBIDDEN,
            ),
            entry(
                none,
                tag::TIMESTAMP,
                "TIMESTAMP",
                UintFormat::fixed(8).into(),
                "User Defined Timestamp",
                "Timestamp for all metadata in a ST 0806 local set. Measured in microseconds \
                 since the UNIX epoch.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                tag::PLATFORM_TRUE_AIRSPEED,
                "PLATFORM_TRUE_AIRSPEED",
                UintFormat::fixed(1).into(),
                "Platform True Airspeed",
                "True airspeed of the platform. Measured in meters per second.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::PLATFORM_INDICATED_AIRSPEED,
                "PLATFORM_INDICATED_AIRSPEED",
                UintFormat::fixed(1).into(),
                "Platform Indicated Airspeed",
                "Indicated airspeed of the platform. Measured in meters per second.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::TELEMETRY_ACCURACY_INDICATOR,
                "TELEMETRY_ACCURACY_INDICATOR",
                BlobFormat::new().into(),
                "Telemetry Accuracy Indicator",
                "Reserved for future use.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::FRAG_CIRCLE_RADIUS,
                "FRAG_CIRCLE_RADIUS",
                UintFormat::fixed(2).into(),
                "Fragmentation Circle Radius",
                "Size of the fragmentation circle selected by the aircrew. Measured in meters.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::FRAME_CODE,
                "FRAME_CODE",
                UintFormat::fixed(4).into(),
                "Frame Code",
                "Counter running at 60 Hz from an arbitrary time base.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::VERSION_NUMBER,
                "VERSION_NUMBER",
                UintFormat::fixed(1).into(),
                "Version Number",
                "Version of MISB ST 0806 used to encode this local set.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                tag::VIDEO_DATA_RATE,
                "VIDEO_DATA_RATE",
                UintFormat::fixed(4).into(),
                "Video Data Rate",
                "Video datalink transmission rate. Measured in bits per second.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::DIGITAL_VIDEO_FILE_FORMAT,
                "DIGITAL_VIDEO_FILE_FORMAT",
                StringFormat::new().into(),
                "Digital Video File Format",
                "Video compression being used. Examples: 'MPEG2', 'H.264'.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::USER_DEFINED_LOCAL_SET,
                "USER_DEFINED_LOCAL_SET",
                BlobFormat::new().into(),
                "User Defined Local Set",
                "Local set containing user-defined data fields.",
                Count::ANY,
            ),
            entry(
                none,
                tag::POI_LOCAL_SET,
                "POI_LOCAL_SET",
                BlobFormat::new().into(),
                "Point of Interest Local Set",
                "Local set describing a point of interest.",
                Count::ANY,
            ),
            entry(
                none,
                tag::AOI_LOCAL_SET,
                "AOI_LOCAL_SET",
                BlobFormat::new().into(),
                "Area of Interest Local Set",
                "Local set describing an area of interest.",
                Count::ANY,
            ),
            entry(
                none,
                tag::MGRS_ZONE,
                "MGRS_ZONE",
                UintFormat::fixed(1).into(),
                "MGRS Zone",
                "UTM zone of the platform location, 01 through 60.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::MGRS_LATITUDE_BAND_GRID_SQUARE,
                "MGRS_LATITUDE_BAND_GRID_SQUARE",
                StringFormat::new().into(),
                "MGRS Latitude Band and Grid Square",
                "Alphabetic MGRS latitude band and grid square of the platform location.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::MGRS_EASTING,
                "MGRS_EASTING",
                UintFormat::fixed(3).into(),
                "MGRS Easting",
                "MGRS easting of the platform location. Measured in meters.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::MGRS_NORTHING,
                "MGRS_NORTHING",
                UintFormat::fixed(3).into(),
                "MGRS Northing",
                "MGRS northing of the platform location. Measured in meters.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::FRAME_CENTER_MGRS_ZONE,
                "FRAME_CENTER_MGRS_ZONE",
                UintFormat::fixed(1).into(),
                "Frame Center MGRS Zone",
                "UTM zone of the frame center, 01 through 60.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::FRAME_CENTER_MGRS_LATITUDE_BAND_GRID_SQUARE,
                "FRAME_CENTER_MGRS_LATITUDE_BAND_GRID_SQUARE",
                StringFormat::new().into(),
                "Frame Center MGRS Latitude Band and Grid Square",
                "Alphabetic MGRS latitude band and grid square of the frame center.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::FRAME_CENTER_MGRS_EASTING,
                "FRAME_CENTER_MGRS_EASTING",
                UintFormat::fixed(3).into(),
                "Frame Center MGRS Easting",
                "MGRS easting of the frame center. Measured in meters.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::FRAME_CENTER_MGRS_NORTHING,
                "FRAME_CENTER_MGRS_NORTHING",
                UintFormat::fixed(3).into(),
                "Frame Center MGRS Northing",
                "MGRS northing of the frame center. Measured in meters.",
                Count::OPTIONAL,
            ),
        ])
    })
}
