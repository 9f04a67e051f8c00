//! MISB ST 1108 Interpretability and Quality Local Set.
//!
//! Image quality metrics (VNIIRS, GSD, and friends) and the compression
//! characteristics they were measured under. One parent set carries one
//! metric period plus any number of embedded metric local sets, and closes
//! with a CRC-16-CCITT trailer.

use super::checksum::{ChecksumAlgorithm, ChecksumPacketFormat};
use super::codec::{
    ber_oid_length, read_ber_oid, read_string, read_uint, string_length, write_ber_oid,
    write_string, write_uint,
};
use super::format::{cast_error, FormatImpl};
use super::format::{BlobFormat, EnumFormat, FloatFormat, StringFormat, UintFormat};
use super::key::{LdsKey, UdsKey};
use super::set::LocalSetFormat;
use super::tag_traits::{TagCountRange, TagTraits, TagTraitsLookup};
use super::value::ValueData;
use super::{ErrorDetails, Result, SliceReader, SliceWriter};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

/// Local set tags defined by ST 1108.3.
pub mod tag {
    use super::LdsKey;

    /// Unknown tag.
    pub const UNKNOWN: LdsKey = 0;
    /// Assessment point.
    pub const ASSESSMENT_POINT: LdsKey = 1;
    /// Metric period pack.
    pub const METRIC_PERIOD_PACK: LdsKey = 2;
    /// Window corners pack.
    pub const WINDOW_CORNERS_PACK: LdsKey = 3;
    /// Metric local set.
    pub const METRIC_LOCAL_SET: LdsKey = 4;
    /// Compression type.
    pub const COMPRESSION_TYPE: LdsKey = 5;
    /// Compression profile.
    pub const COMPRESSION_PROFILE: LdsKey = 6;
    /// Compression level.
    pub const COMPRESSION_LEVEL: LdsKey = 7;
    /// Compression ratio.
    pub const COMPRESSION_RATIO: LdsKey = 8;
    /// Stream bitrate.
    pub const STREAM_BITRATE: LdsKey = 9;
    /// ST 1108 document version.
    pub const DOCUMENT_VERSION: LdsKey = 10;
    /// Checksum.
    pub const CHECKSUM: LdsKey = 11;
}

/// Metric local set tags defined by ST 1108.3.
pub mod metric_tag {
    use super::LdsKey;

    /// Unknown tag.
    pub const UNKNOWN: LdsKey = 0;
    /// Metric name.
    pub const NAME: LdsKey = 1;
    /// Metric version.
    pub const VERSION: LdsKey = 2;
    /// Metric implementer.
    pub const IMPLEMENTER: LdsKey = 3;
    /// Metric parameters.
    pub const PARAMETERS: LdsKey = 4;
    /// Metric time.
    pub const TIME: LdsKey = 5;
    /// Metric value.
    pub const VALUE: LdsKey = 6;
}

/// Member names for the assessment point enumeration.
pub static ASSESSMENT_POINT_NAMES: [&str; 6] = [
    "Unknown Assessment Point",
    "Sensor",
    "Sensor Encoder",
    "GCS (Received)",
    "GCS (Transmitted)",
    "Library / Archive",
];

/// Member names for the compression type enumeration.
pub static COMPRESSION_TYPE_NAMES: [&str; 5] =
    ["Uncompressed", "H.262", "H.264", "H.265", "JPEG2000"];

/// Member names for the compression profile enumeration.
pub static COMPRESSION_PROFILE_NAMES: [&str; 9] = [
    "Uncompressed",
    "Main (H.264)",
    "Main 10 (H.265)",
    "Constrained Baseline (H.264)",
    "High (H.264)",
    "Main 4:2:2 12 (H.265)",
    "Main 4:4:4 12 (H.265)",
    "High 4:2:2 (H.264)",
    "High 4:4:4 Predictive (H.264)",
];

// ----------------------------------------------------------------------------
/// The range of time for which a set of metrics is valid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MetricPeriodPack {
    /// Start of the period. Measured in microseconds since the UNIX epoch.
    pub timestamp: u64,
    /// Length of the period. Measured in microseconds.
    pub offset: u32,
}

impl Display for MetricPeriodPack {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Timestamp: {}, Offset: {} }}",
            self.timestamp, self.offset
        )
    }
}

/// Interprets data as a ST 1108 metric period pack: an 8-byte timestamp
/// followed by a 4-byte offset.
#[derive(Clone, Default)]
pub struct MetricPeriodPackFormat;

impl MetricPeriodPackFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

impl FormatImpl for MetricPeriodPackFormat {
    fn fixed_length(&self) -> usize {
        12
    }

    fn description(&self) -> String {
        "metric period pack of 12 bytes".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, _length: usize) -> Result<ValueData> {
        let timestamp = read_uint(reader, 8)?;
        let offset = read_uint(reader, 4)? as u32;
        Ok(ValueData::MetricPeriod(MetricPeriodPack {
            timestamp,
            offset,
        }))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        let pack = match data {
            ValueData::MetricPeriod(pack) => pack,
            _ => return Err(cast_error("MetricPeriodPack", data)),
        };
        write_uint(pack.timestamp, writer, 8)?;
        write_uint(u64::from(pack.offset), writer, 4)
    }

    fn length_of_typed(&self, _data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        Ok(12)
    }
}

// ----------------------------------------------------------------------------
/// The image sub-region for which the metrics were calculated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WindowCornersPack {
    /// Column of the upper-left corner.
    pub min_x: u16,
    /// Row of the upper-left corner.
    pub min_y: u16,
    /// Column of the lower-right corner.
    pub max_x: u16,
    /// Row of the lower-right corner.
    pub max_y: u16,
}

impl Display for WindowCornersPack {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Upper Left: ( {}, {} ), Lower Right: ( {}, {} ) }}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Interprets data as a ST 1108 window corners pack: four BER-OID encoded
/// coordinates in row-column order.
#[derive(Clone, Default)]
pub struct WindowCornersPackFormat;

impl WindowCornersPackFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

impl FormatImpl for WindowCornersPackFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "window corners pack of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, _length: usize) -> Result<ValueData> {
        let mut coordinate = || -> Result<u16> {
            let remaining = reader.remaining_len();
            let value = read_ber_oid(reader, remaining)?;
            u16::try_from(value).map_err(|_| reader.make_error(ErrorDetails::TypeOverflow))
        };
        let min_y = coordinate()?;
        let min_x = coordinate()?;
        let max_y = coordinate()?;
        let max_x = coordinate()?;
        Ok(ValueData::WindowCorners(WindowCornersPack {
            min_x,
            min_y,
            max_x,
            max_y,
        }))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        let pack = match data {
            ValueData::WindowCorners(pack) => pack,
            _ => return Err(cast_error("WindowCornersPack", data)),
        };
        for coordinate in [pack.min_y, pack.min_x, pack.max_y, pack.max_x] {
            let remaining = writer.remaining_len();
            write_ber_oid(u64::from(coordinate), writer, remaining)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        let pack = match data {
            ValueData::WindowCorners(pack) => pack,
            _ => return Err(cast_error("WindowCornersPack", data)),
        };
        Ok([pack.min_y, pack.min_x, pack.max_y, pack.max_x]
            .iter()
            .map(|&coordinate| ber_oid_length(u64::from(coordinate)))
            .sum())
    }
}

// ----------------------------------------------------------------------------
/// Who implemented the software which calculated a metric.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MetricImplementer {
    /// The implementing organization.
    pub organization: String,
    /// The subgroup within the organization.
    pub subgroup: String,
}

impl Display for MetricImplementer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Organization: \"{}\", Subgroup: \"{}\" }}",
            self.organization, self.subgroup
        )
    }
}

const IMPLEMENTER_SEPARATOR: char = '\x1e';

/// Interprets data as a ST 1108 metric implementer: organization and
/// subgroup strings joined by the ASCII record separator.
#[derive(Clone, Default)]
pub struct MetricImplementerFormat;

impl MetricImplementerFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

impl FormatImpl for MetricImplementerFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "metric implementer of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<ValueData> {
        let combined = read_string(reader, length)?;
        let (organization, subgroup) = match combined.find(IMPLEMENTER_SEPARATOR) {
            Some(index) => (
                combined[..index].to_owned(),
                combined[index + 1..].to_owned(),
            ),
            None => (combined, String::new()),
        };
        Ok(ValueData::MetricImplementer(MetricImplementer {
            organization,
            subgroup,
        }))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        let implementer = match data {
            ValueData::MetricImplementer(implementer) => implementer,
            _ => return Err(cast_error("MetricImplementer", data)),
        };
        write_string(&implementer.organization, writer)?;
        if !implementer.subgroup.is_empty() {
            writer.write_u8(IMPLEMENTER_SEPARATOR as u8)?;
            write_string(&implementer.subgroup, writer)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        let implementer = match data {
            ValueData::MetricImplementer(implementer) => implementer,
            _ => return Err(cast_error("MetricImplementer", data)),
        };
        Ok(string_length(&implementer.organization)
            + if implementer.subgroup.is_empty() {
                0
            } else {
                1 + string_length(&implementer.subgroup)
            })
    }
}

// ----------------------------------------------------------------------------
/// The UDS key for a MISB ST 1108 local set.
pub fn key() -> UdsKey {
    UdsKey::new(0x060E2B34_02030101, 0x0E0103031C000000)
}

// ----------------------------------------------------------------------------
/// The UDS key for a MISB ST 1108 metric local set.
pub fn metric_set_key() -> UdsKey {
    UdsKey::new(0x060E2B34_02050101, 0x0E01050300000000)
}

// ----------------------------------------------------------------------------
/// The format for a MISB ST 1108 local set, with its CRC-16-CCITT trailer.
pub fn local_set_format() -> LocalSetFormat {
    LocalSetFormat::new("ST 1108 local set", traits()).with_checksum(ChecksumPacketFormat::new(
        ChecksumAlgorithm::Crc16Ccitt,
        [tag::CHECKSUM as u8, 2],
    ))
}

// ----------------------------------------------------------------------------
/// The format for a MISB ST 1108 metric local set.
pub fn metric_set_format() -> LocalSetFormat {
    LocalSetFormat::new("ST 1108 metric local set", metric_set_traits())
}

// ----------------------------------------------------------------------------
/// The traits of every ST 1108 tag.
pub fn traits() -> &'static TagTraitsLookup {
    static LOOKUP: OnceLock<TagTraitsLookup> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        use TagCountRange as Count;
        let entry = TagTraits::new;
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
                UdsKey::new(0x060E2B34_01010101, 0x0E01050100000000),
                tag::ASSESSMENT_POINT,
                "ASSESSMENT_POINT",
                EnumFormat::new(&ASSESSMENT_POINT_NAMES, 1).into(),
                "Assessment Point",
                "Location in the workflow where the metrics were evaluated.",
                Count::EXACTLY_ONE,
            ),
            entry(
                UdsKey::new(0x060E2B34_02050101, 0x0E01050200000000),
                tag::METRIC_PERIOD_PACK,
                "METRIC_PERIOD_PACK",
                MetricPeriodPackFormat::new().into(),
                "Metric Period Pack",
                "Period for which the metrics were evaluated.",
                Count::EXACTLY_ONE,
            ),
            entry(
                UdsKey::new(0x060E2B34_02050101, 0x0E01030201010000),
                tag::WINDOW_CORNERS_PACK,
                "WINDOW_CORNERS_PACK",
                WindowCornersPackFormat::new().into(),
                "Window Corners Pack",
                "Image sub-region for which the metrics were evaluated.",
                Count::OPTIONAL,
            ),
            entry(
                metric_set_key(),
                tag::METRIC_LOCAL_SET,
                "METRIC_LOCAL_SET",
                super::format::KlvFormat::from(metric_set_format()),
                "Metric Local Set",
                "Specification of one metric and its value.",
                Count::ONE_OR_MORE,
            )
            .with_subtags(metric_set_traits()),
            entry(
                UdsKey::new(0x060E2B34_01010101, 0x0E01050200000000),
                tag::COMPRESSION_TYPE,
                "COMPRESSION_TYPE",
                EnumFormat::new(&COMPRESSION_TYPE_NAMES, 1).into(),
                "Compression Type",
                "Type of video compression.",
                Count::EXACTLY_ONE,
            ),
            entry(
                UdsKey::new(0x060E2B34_01010101, 0x0E01050300000000),
                tag::COMPRESSION_PROFILE,
                "COMPRESSION_PROFILE",
                EnumFormat::new(&COMPRESSION_PROFILE_NAMES, 1).into(),
                "Compression Profile",
                "Video compression profile.",
                Count::EXACTLY_ONE,
            ),
            entry(
                UdsKey::new(0x060E2B34_01010101, 0x0E01050400000000),
                tag::COMPRESSION_LEVEL,
                "COMPRESSION_LEVEL",
                StringFormat::new().into(),
                "Compression Level",
                "Level of video compression.",
                Count::EXACTLY_ONE,
            ),
            entry(
                UdsKey::new(0x060E2B34_01010101, 0x0E01050500000000),
                tag::COMPRESSION_RATIO,
                "COMPRESSION_RATIO",
                FloatFormat::variable().into(),
                "Compression Ratio",
                "Source-to-compressed size ratio.",
                Count::EXACTLY_ONE,
            ),
            entry(
                UdsKey::new(0x060E2B34_01010101, 0x0E01050600000000),
                tag::STREAM_BITRATE,
                "STREAM_BITRATE",
                UintFormat::fixed(2).into(),
                "Stream Bitrate",
                "Expressed in kilobits / second.",
                Count::EXACTLY_ONE,
            ),
            entry(
                UdsKey::new(0x060E2B34_01010101, 0x0E01020505000000),
                tag::DOCUMENT_VERSION,
                "DOCUMENT_VERSION",
                UintFormat::fixed(1).into(),
                "Document Version",
                "Version number of MISB ST 1108.",
                Count::EXACTLY_ONE,
            ),
            entry(
                UdsKey::new(0x060E2B34_01010101, 0x0E0102035E000000),
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

// ----------------------------------------------------------------------------
/// The traits of every ST 1108 metric local set tag.
pub fn metric_set_traits() -> &'static TagTraitsLookup {
    static LOOKUP: OnceLock<TagTraitsLookup> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        use TagCountRange as Count;
        let none = UdsKey::NONE;
        let entry = TagTraits::new;
        TagTraitsLookup::new(vec![
            entry(
                none,
                metric_tag::UNKNOWN,
                "UNKNOWN",
                BlobFormat::new().into(),
                "Unknown Tag",
                "Unknown tag.",
                Count::FORBIDDEN,
            ),
            entry(
                none,
                metric_tag::NAME,
                "NAME",
                StringFormat::new().into(),
                "Metric Name",
                "Examples: 'VNIIRS', 'GSD', 'RER'.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                metric_tag::VERSION,
                "VERSION",
                StringFormat::new().into(),
                "Metric Version",
                "Version of the metric in use; may be empty.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                metric_tag::IMPLEMENTER,
                "IMPLEMENTER",
                MetricImplementerFormat::new().into(),
                "Metric Implementer",
                "Organization and subgroup responsible for the implementation in use.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                metric_tag::PARAMETERS,
                "PARAMETERS",
                StringFormat::new().into(),
                "Metric Parameters",
                "Parameters the metric was evaluated with; may be empty.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                metric_tag::TIME,
                "TIME",
                UintFormat::fixed(8).into(),
                "Metric Time",
                "Time of the metric's calculation. Measured in microseconds since the UNIX \
                 epoch.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                metric_tag::VALUE,
                "VALUE",
                FloatFormat::variable().into(),
                "Metric Value",
                "The calculated value of the metric.",
                Count::EXACTLY_ONE,
            ),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::KlvFormat;
    use crate::Value;

    #[test]
    fn metric_period_pack_round_trip() {
        let format = KlvFormat::from(MetricPeriodPackFormat::new());
        let pack = MetricPeriodPack {
            timestamp: 1_000_000,
            offset: 100,
        };
        let value = Value::from(pack);
        assert_eq!(format.length_of(&value).unwrap(), 12);
        let mut buffer = [0_u8; 12];
        let mut writer = crate::SliceWriter::new(&mut buffer);
        format.write(&value, &mut writer).unwrap();
        drop(writer);

        let mut reader = SliceReader::new(&buffer);
        let parsed = format.read(&mut reader, 12).unwrap();
        assert_eq!(parsed.as_metric_period().unwrap(), &pack);
    }

    #[test]
    fn window_corners_use_minimal_ber_oid() {
        let format = KlvFormat::from(WindowCornersPackFormat::new());
        let pack = WindowCornersPack {
            min_x: 0,
            min_y: 10,
            max_x: 1920,
            max_y: 1080,
        };
        let value = Value::from(pack);
        // 10 and 0 take one byte each; 1080 and 1920 take two
        assert_eq!(format.length_of(&value).unwrap(), 6);
    }

    #[test]
    fn implementer_splits_on_record_separator() {
        let format = KlvFormat::from(MetricImplementerFormat::new());
        let bytes = b"Example Org\x1eMotion Imagery Group";
        let mut reader = SliceReader::new(bytes);
        let value = format.read(&mut reader, bytes.len()).unwrap();
        let implementer = value.as_metric_implementer().unwrap();
        assert_eq!(implementer.organization, "Example Org");
        assert_eq!(implementer.subgroup, "Motion Imagery Group");
    }
}
