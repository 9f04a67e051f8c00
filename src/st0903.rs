//! MISB ST 0903 Video Moving Target Indicator Local Set.
//!
//! Frame-level metadata about moving objects detected in the imagery,
//! closed by a CRC-16-CCITT trailer. The VTarget, algorithm, and ontology
//! series are carried opaquely.

use super::checksum::{ChecksumAlgorithm, ChecksumPacketFormat};
use super::format::{BlobFormat, ImapFormat, StringFormat, UintFormat};
use super::key::{LdsKey, UdsKey};
use super::set::LocalSetFormat;
use super::st1204::MiisIdFormat;
use super::tag_traits::{TagCountRange, TagTraits, TagTraitsLookup};
use std::sync::OnceLock;

/// Local set tags defined by ST 0903.6.
pub mod tag {
    use super::LdsKey;

    /// Unknown tag.
    pub const UNKNOWN: LdsKey = 0;
    /// Checksum.
    pub const CHECKSUM: LdsKey = 1;
    /// Precision timestamp.
    pub const PRECISION_TIMESTAMP: LdsKey = 2;
    /// VMTI system name.
    pub const VMTI_SYSTEM_NAME: LdsKey = 3;
    /// ST 0903 version.
    pub const VERSION: LdsKey = 4;
    /// Number of targets detected.
    pub const NUM_TARGETS_DETECTED: LdsKey = 5;
    /// Number of targets reported.
    pub const NUM_TARGETS_REPORTED: LdsKey = 6;
    /// Frame number.
    pub const FRAME_NUMBER: LdsKey = 7;
    /// Frame width.
    pub const FRAME_WIDTH: LdsKey = 8;
    /// Frame height.
    pub const FRAME_HEIGHT: LdsKey = 9;
    /// Source sensor.
    pub const SOURCE_SENSOR: LdsKey = 10;
    /// Sensor horizontal field of view.
    pub const HORIZONTAL_FOV: LdsKey = 11;
    /// Sensor vertical field of view.
    pub const VERTICAL_FOV: LdsKey = 12;
    /// MIIS identifier.
    pub const MIIS_ID: LdsKey = 13;
    /// VTarget series.
    pub const VTARGET_SERIES: LdsKey = 101;
    /// Algorithm series.
    pub const ALGORITHM_SERIES: LdsKey = 102;
    /// Ontology series.
    pub const ONTOLOGY_SERIES: LdsKey = 103;
}

// ----------------------------------------------------------------------------
/// The UDS key for a MISB ST 0903 local set.
pub fn key() -> UdsKey {
    UdsKey::new(0x060E2B34_020B0101, 0x0E01030306000000)
}

// ----------------------------------------------------------------------------
/// The format for a MISB ST 0903 local set, with its CRC-16-CCITT trailer.
pub fn local_set_format() -> LocalSetFormat {
    LocalSetFormat::new("ST 0903 local set", traits()).with_checksum(ChecksumPacketFormat::new(
        ChecksumAlgorithm::Crc16Ccitt,
        [tag::CHECKSUM as u8, 2],
    ))
}

// ----------------------------------------------------------------------------
/// The traits of every ST 0903 tag.
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
                UintFormat::fixed(2).into(),
                "Checksum",
                "CRC-16-CCITT checksum over the enclosing local set.",
                Count::FORBIDDEN,
            ),
            entry(
                none,
                tag::PRECISION_TIMESTAMP,
                "PRECISION_TIMESTAMP",
                UintFormat::fixed(8).into(),
                "Precision Timestamp",
                "Timestamp of the frame the VMTI data applies to. Measured in microseconds \
                 since the UNIX epoch.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                tag::VMTI_SYSTEM_NAME,
                "VMTI_SYSTEM_NAME",
                StringFormat::new().into(),
                "VMTI System Name",
                "Name or description of the VMTI system producing the targets.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::VERSION,
                "VERSION",
                UintFormat::variable().into(),
                "Version",
                "Version of MISB ST 0903 used to encode this local set.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                tag::NUM_TARGETS_DETECTED,
                "NUM_TARGETS_DETECTED",
                UintFormat::variable().into(),
                "Targets Detected",
                "Total number of moving targets detected in the frame.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::NUM_TARGETS_REPORTED,
                "NUM_TARGETS_REPORTED",
                UintFormat::variable().into(),
                "Targets Reported",
                "Number of moving targets reported in the VTarget series.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::FRAME_NUMBER,
                "FRAME_NUMBER",
                UintFormat::variable().into(),
                "Frame Number",
                "Number of the frame the VMTI data applies to.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::FRAME_WIDTH,
                "FRAME_WIDTH",
                UintFormat::variable().into(),
                "Frame Width",
                "Width of the frame. Measured in pixels.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::FRAME_HEIGHT,
                "FRAME_HEIGHT",
                UintFormat::variable().into(),
                "Frame Height",
                "Height of the frame. Measured in pixels.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::SOURCE_SENSOR,
                "SOURCE_SENSOR",
                StringFormat::new().into(),
                "Source Sensor",
                "Name of the sensor the VMTI system draws imagery from.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::HORIZONTAL_FOV,
                "HORIZONTAL_FOV",
                ImapFormat::fixed(0.0, 180.0, 2).into(),
                "Sensor Horizontal Field of View",
                "Horizontal field of view of the source sensor. Measured in degrees.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::VERTICAL_FOV,
                "VERTICAL_FOV",
                ImapFormat::fixed(0.0, 180.0, 2).into(),
                "Sensor Vertical Field of View",
                "Vertical field of view of the source sensor. Measured in degrees.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::MIIS_ID,
                "MIIS_ID",
                MiisIdFormat::new().into(),
                "MIIS ID",
                "MISB ST 1204 core identifier binary value.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::VTARGET_SERIES,
                "VTARGET_SERIES",
                BlobFormat::new().into(),
                "VTarget Series",
                "Series of VTarget packs, one per reported target.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::ALGORITHM_SERIES,
                "ALGORITHM_SERIES",
                BlobFormat::new().into(),
                "Algorithm Series",
                "Series of algorithm local sets describing the detectors in use.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::ONTOLOGY_SERIES,
                "ONTOLOGY_SERIES",
                BlobFormat::new().into(),
                "Ontology Series",
                "Series of ontology local sets describing the target classes in use.",
                Count::OPTIONAL,
            ),
        ])
    })
}
