//! MISB ST 1002 Range Image Local Set.
//!
//! Metadata describing range imagery and its relation to collocated video,
//! closed by a CRC-16-CCITT trailer. Section data packs and the generalized
//! transformation sub-set are carried opaquely.

use super::checksum::{ChecksumAlgorithm, ChecksumPacketFormat};
use super::format::{BlobFormat, FloatFormat, UintFormat};
use super::key::{LdsKey, UdsKey};
use super::set::LocalSetFormat;
use super::tag_traits::{TagCountRange, TagTraits, TagTraitsLookup};
use std::sync::OnceLock;

/// Local set tags defined by ST 1002.2.
pub mod tag {
    use super::LdsKey;

    /// Unknown tag.
    pub const UNKNOWN: LdsKey = 0;
    /// Precision timestamp.
    pub const PRECISION_TIMESTAMP: LdsKey = 1;
    /// ST 1002 document version.
    pub const DOCUMENT_VERSION: LdsKey = 11;
    /// Range image enumerations.
    pub const RANGE_IMAGE_ENUMERATIONS: LdsKey = 12;
    /// Single point range measurement.
    pub const SPRM: LdsKey = 13;
    /// Single point range measurement uncertainty.
    pub const SPRM_UNCERTAINTY: LdsKey = 14;
    /// Single point range measurement row.
    pub const SPRM_ROW: LdsKey = 15;
    /// Single point range measurement column.
    pub const SPRM_COLUMN: LdsKey = 16;
    /// Number of sections in X.
    pub const NUMBER_SECTIONS_X: LdsKey = 17;
    /// Number of sections in Y.
    pub const NUMBER_SECTIONS_Y: LdsKey = 18;
    /// Generalized transformation local set.
    pub const GENERALIZED_TRANSFORMATION_LOCAL_SET: LdsKey = 19;
    /// Section data pack.
    pub const SECTION_DATA_PACK: LdsKey = 20;
    /// Checksum.
    pub const CHECKSUM: LdsKey = 21;
}

// ----------------------------------------------------------------------------
/// The UDS key for a MISB ST 1002 local set.
pub fn key() -> UdsKey {
    UdsKey::new(0x060E2B34_020B0101, 0x0E0103030C000000)
}

// ----------------------------------------------------------------------------
/// The format for a MISB ST 1002 local set, with its CRC-16-CCITT trailer.
pub fn local_set_format() -> LocalSetFormat {
    LocalSetFormat::new("ST 1002 local set", traits()).with_checksum(ChecksumPacketFormat::new(
        ChecksumAlgorithm::Crc16Ccitt,
        [tag::CHECKSUM as u8, 2],
    ))
}

// ----------------------------------------------------------------------------
/// The traits of every ST 1002 tag.
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
                tag::PRECISION_TIMESTAMP,
                "PRECISION_TIMESTAMP",
                UintFormat::fixed(8).into(),
                "Precision Timestamp",
                "Timestamp of the range image. Measured in microseconds since the UNIX epoch.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                tag::DOCUMENT_VERSION,
                "DOCUMENT_VERSION",
                UintFormat::fixed(1).into(),
                "Document Version",
                "Version of MISB ST 1002 used to encode this local set.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                tag::RANGE_IMAGE_ENUMERATIONS,
                "RANGE_IMAGE_ENUMERATIONS",
                UintFormat::fixed(1).into(),
                "Range Image Enumerations",
                "Bit-packed range image source, data type, and compression method.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::SPRM,
                "SPRM",
                FloatFormat::variable().into(),
                "Single Point Range Measurement",
                "Measured range to a single point. Measured in meters.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::SPRM_UNCERTAINTY,
                "SPRM_UNCERTAINTY",
                FloatFormat::variable().into(),
                "Single Point Range Measurement Uncertainty",
                "Standard deviation of the single point range measurement. Measured in meters.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::SPRM_ROW,
                "SPRM_ROW",
                FloatFormat::variable().into(),
                "Single Point Range Measurement Row",
                "Image row of the single point range measurement. Measured in pixels.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::SPRM_COLUMN,
                "SPRM_COLUMN",
                FloatFormat::variable().into(),
                "Single Point Range Measurement Column",
                "Image column of the single point range measurement. Measured in pixels.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::NUMBER_SECTIONS_X,
                "NUMBER_SECTIONS_X",
                UintFormat::variable().into(),
                "Number of Sections in X",
                "Number of horizontal sections the range image is divided into.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::NUMBER_SECTIONS_Y,
                "NUMBER_SECTIONS_Y",
                UintFormat::variable().into(),
                "Number of Sections in Y",
                "Number of vertical sections the range image is divided into.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::GENERALIZED_TRANSFORMATION_LOCAL_SET,
                "GENERALIZED_TRANSFORMATION_LOCAL_SET",
                BlobFormat::new().into(),
                "Generalized Transformation Local Set",
                "MISB ST 1202 local set relating the range image to the collocated image.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::SECTION_DATA_PACK,
                "SECTION_DATA_PACK",
                BlobFormat::new().into(),
                "Section Data Pack",
                "Range measurements for one section of the range image.",
                Count::ANY,
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
        ])
    })
}
