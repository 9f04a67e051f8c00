//! Framing for NATO STANAG 4607 Ground Moving Target Indicator packets.
//!
//! A GMTI stream is a sequence of packets, each opened by a 32-byte packet
//! header and holding one or more segments. Every segment is introduced by a
//! 5-byte segment header carrying its type and size; mission and dwell
//! segments are fully parsed here, the remaining types are consumed into
//! blobs of exactly `segment_size - 5` bytes so the stream stays framed.

use super::value::Blob;
use super::{codec, ErrorDetails, Result, SliceReader};
use log::warn;
use num_traits::FromPrimitive;
use std::fmt::{Debug, Display, Formatter};

pub mod mission;
pub use mission::{MissionPlatform, MissionReferenceTime, MissionSegment};

pub mod dwell;
pub use dwell::{
    DwellArea, DwellExistenceMask, DwellSegment, Orientation, ScaleFactor, SensorPosition,
    SensorPositionUncertainty, TargetClassification, TargetLocation, TargetMeasurementUncertainty,
    TargetReport, TruthTag,
};

// ----------------------------------------------------------------------------
// Decode an enumeration byte the way the wire defines it, erroring on
// reserved values.
pub(crate) fn from_primitive<T: FromPrimitive>(
    value: u64,
    reader: &SliceReader<'_>,
) -> Result<T> {
    match T::from_u64(value) {
        Some(decoded) => Ok(decoded),
        None => Err(reader.make_error(ErrorDetails::UnknownEnumVariant(value))),
    }
}

// Trim leading and trailing spaces from fixed-width string fields.
pub(crate) fn trim_whitespace(input: String) -> String {
    input.trim().to_owned()
}

// ----------------------------------------------------------------------------
/// The classification level of a packet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, num_derive::FromPrimitive)]
pub enum SecurityClassification {
    /// NATO Top Secret / national equivalent.
    TopSecret = 1,
    /// NATO Secret / national equivalent.
    Secret = 2,
    /// NATO Confidential / national equivalent.
    Confidential = 3,
    /// NATO Restricted / national equivalent.
    Restricted = 4,
    /// Unclassified.
    Unclassified = 5,
}

impl Display for SecurityClassification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SecurityClassification::TopSecret => "Top Secret",
            SecurityClassification::Secret => "Secret",
            SecurityClassification::Confidential => "Confidential",
            SecurityClassification::Restricted => "Restricted",
            SecurityClassification::Unclassified => "Unclassified",
        };
        write!(f, "{}", name)
    }
}

/// Additional control and handling instructions associated with the GMTI
/// data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, num_derive::FromPrimitive)]
pub enum SecurityCode {
    /// No additional instructions.
    None = 0x0000,
    /// NOCONTRACT.
    NoContract = 0x0001,
    /// ORCON.
    Orcon = 0x0002,
    /// PROPIN.
    Propin = 0x0004,
    /// WNINTEL.
    Wnintel = 0x0008,
    /// NATIONAL ONLY.
    NationalOnly = 0x0010,
    /// LIMDIS.
    Limdis = 0x0020,
    /// FOUO.
    Fouo = 0x0040,
    /// EFTO.
    Efto = 0x0080,
    /// LIMITED OFFICIAL USE.
    LimitedOfficialUse = 0x0100,
    /// NONCOMPARTMENT.
    NonCompartment = 0x0200,
    /// SPECIAL CONTROL.
    SpecialControl = 0x0400,
    /// SPECIAL INTEL.
    SpecialIntel = 0x0800,
    /// WARNING NOTICE.
    WarningNotice = 0x1000,
    /// REL NATO.
    RelNato = 0x2000,
    /// REL 4-EYES.
    RelFourEyes = 0x4000,
    /// REL 9-EYES.
    RelNineEyes = 0x8000,
}

/// Security information for a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketSecurity {
    /// Classification level of the packet.
    pub classification: SecurityClassification,
    /// National or multinational security system the classification follows.
    pub class_system: String,
    /// Additional control and handling instructions.
    pub code: SecurityCode,
}

impl Display for PacketSecurity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Classification: {}, Class. System: \"{}\", Code: {:?} }}",
            self.classification, self.class_system, self.code
        )
    }
}

/// Whether the data comes from a real-world military operation or from an
/// exercise, and whether it is real, simulated, or synthesized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, num_derive::FromPrimitive)]
pub enum ExerciseIndicator {
    /// Operation, real data.
    OperationReal = 0,
    /// Operation, simulated data.
    OperationSimulated = 1,
    /// Operation, synthesized data.
    OperationSynthesized = 2,
    /// Exercise, real data.
    ExerciseReal = 128,
    /// Exercise, simulated data.
    ExerciseSimulated = 129,
    /// Exercise, synthesized data.
    ExerciseSynthesized = 130,
}

impl Display for ExerciseIndicator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExerciseIndicator::OperationReal => "Operation, Real Data",
            ExerciseIndicator::OperationSimulated => "Operation, Simulated Data",
            ExerciseIndicator::OperationSynthesized => "Operation, Synthesized Data",
            ExerciseIndicator::ExerciseReal => "Exercise, Real Data",
            ExerciseIndicator::ExerciseSimulated => "Exercise, Simulated Data",
            ExerciseIndicator::ExerciseSynthesized => "Exercise, Synthesized Data",
        };
        write!(f, "{}", name)
    }
}

// ----------------------------------------------------------------------------
/// The 32-byte packet header: basic information concerning the platform,
/// job, mission, nationality, security, and the length of the packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    /// Version of STANAG 4607 in use, as two ASCII characters.
    pub version_id: String,
    /// Size of the entire packet, header included. Measured in bytes.
    pub packet_size: u32,
    /// Two-character nationality code of the producing platform.
    pub nationality: String,
    /// Security information for the packet.
    pub packet_security: PacketSecurity,
    /// Operation or exercise, real or simulated.
    pub exercise_indicator: ExerciseIndicator,
    /// Alphanumeric platform identifier, space padding trimmed.
    pub platform_id: String,
    /// Integral mission identifier.
    pub mission_id: u32,
    /// Platform-assigned number identifying the job; 0 means none.
    pub job_id: u32,
}

/// Number of bytes in a packet header.
pub const PACKET_HEADER_LENGTH: usize = 32;

impl PacketHeader {
    /// Read a packet header from the next 32 bytes.
    pub fn read(reader: &mut SliceReader<'_>) -> Result<Self> {
        let version_id = codec::read_string(reader, 2)?;
        let packet_size = reader.read_be_u32()?;
        let nationality = codec::read_string(reader, 2)?;
        let classification = from_primitive(u64::from(reader.read_u8()?), reader)?;
        let class_system = codec::read_string(reader, 2)?;
        let code = from_primitive(u64::from(reader.read_be_u16()?), reader)?;
        let exercise_indicator = from_primitive(u64::from(reader.read_u8()?), reader)?;
        let platform_id = trim_whitespace(codec::read_string(reader, 10)?);
        let mission_id = reader.read_be_u32()?;
        let job_id = reader.read_be_u32()?;
        Ok(Self {
            version_id,
            packet_size,
            nationality,
            packet_security: PacketSecurity {
                classification,
                class_system,
                code,
            },
            exercise_indicator,
            platform_id,
            mission_id,
            job_id,
        })
    }
}

impl Display for PacketHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Version: \"{}\", Packet Size: {}, Nationality: \"{}\", Security: {}, \
             Exercise Indicator: {}, Platform ID: \"{}\", Mission ID: {}, Job ID: {} }}",
            self.version_id,
            self.packet_size,
            self.nationality,
            self.packet_security,
            self.exercise_indicator,
            self.platform_id,
            self.mission_id,
            self.job_id
        )
    }
}

// ----------------------------------------------------------------------------
/// The type of message contained in a segment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, num_derive::FromPrimitive)]
pub enum SegmentType {
    /// Mission segment.
    Mission = 1,
    /// Dwell segment.
    Dwell = 2,
    /// High-range resolution segment.
    Hrr = 3,
    /// Job definition segment.
    JobDefinition = 5,
    /// Free text segment.
    FreeText = 6,
    /// Low reflectivity index segment.
    LowReflectivityIndex = 7,
    /// Group segment.
    Group = 8,
    /// Attached target segment.
    AttachedTarget = 9,
    /// Test and status segment.
    TestAndStatus = 10,
    /// System-specific segment.
    SystemSpecific = 11,
    /// Processing history segment.
    ProcessingHistory = 12,
    /// Platform location segment.
    PlatformLocation = 13,
    /// Job request segment.
    JobRequest = 101,
    /// Job acknowledgement segment.
    JobAcknowledge = 102,
}

impl Display for SegmentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SegmentType::Mission => "Mission Segment",
            SegmentType::Dwell => "Dwell Segment",
            SegmentType::Hrr => "HRR Segment",
            SegmentType::JobDefinition => "Job Definition Segment",
            SegmentType::FreeText => "Free Text Segment",
            SegmentType::LowReflectivityIndex => "Low Reflectivity Index Segment",
            SegmentType::Group => "Group Segment",
            SegmentType::AttachedTarget => "Attached Target Segment",
            SegmentType::TestAndStatus => "Test and Status Segment",
            SegmentType::SystemSpecific => "System-Specific Segment",
            SegmentType::ProcessingHistory => "Processing History Segment",
            SegmentType::PlatformLocation => "Platform Location Segment",
            SegmentType::JobRequest => "Job Request Segment",
            SegmentType::JobAcknowledge => "Job Acknowledge Segment",
        };
        write!(f, "{}", name)
    }
}

/// The 5-byte segment header identifying the type and size of the segment
/// that follows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SegmentHeader {
    /// Raw segment type code; see [`SegmentHeader::segment_kind`].
    pub segment_type: u8,
    /// Size of the segment, this header included. Measured in bytes.
    pub segment_size: u32,
}

/// Number of bytes in a segment header.
pub const SEGMENT_HEADER_LENGTH: usize = 5;

impl SegmentHeader {
    /// Read a segment header from the next 5 bytes.
    pub fn read(reader: &mut SliceReader<'_>) -> Result<Self> {
        let segment_type = reader.read_u8()?;
        let segment_size = reader.read_be_u32()?;
        Ok(Self {
            segment_type,
            segment_size,
        })
    }

    /// The decoded segment type, or `None` for reserved codes.
    pub fn segment_kind(&self) -> Option<SegmentType> {
        SegmentType::from_u8(self.segment_type)
    }
}

// ----------------------------------------------------------------------------
/// The payload of one segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// A fully parsed mission segment.
    Mission(MissionSegment),
    /// A fully parsed dwell segment.
    Dwell(DwellSegment),
    /// Any other segment type, consumed as raw bytes so the stream stays
    /// framed.
    Other(Blob),
}

/// One STANAG 4607 packet: a packet header and its segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Stanag4607Packet {
    /// The 32-byte packet header.
    pub header: PacketHeader,
    /// The packet's segments, each with its segment header.
    pub segments: Vec<(SegmentHeader, Segment)>,
}

// ----------------------------------------------------------------------------
/// Read one STANAG 4607 packet: its header, then segments until
/// `packet_size` bytes are consumed.
pub fn read_stanag_4607_packet(reader: &mut SliceReader<'_>) -> Result<Stanag4607Packet> {
    let start = reader.location();
    let header = PacketHeader::read(reader)?;

    let mut segments = Vec::new();
    while reader.location() - start < header.packet_size as usize {
        let segment_header = SegmentHeader::read(reader)?;
        let body_length = segment_header.segment_size as usize;
        if body_length < SEGMENT_HEADER_LENGTH {
            return Err(reader.make_error(ErrorDetails::BufferOverrun(body_length)));
        }
        let mut body = reader.sub_reader(body_length - SEGMENT_HEADER_LENGTH)?;
        let segment = match segment_header.segment_kind() {
            Some(SegmentType::Mission) => Segment::Mission(MissionSegment::read(&mut body)?),
            Some(SegmentType::Dwell) => Segment::Dwell(DwellSegment::read(&mut body)?),
            _ => Segment::Other(Blob::from(body.read_to_end()?)),
        };
        if body.remaining_len() > 0 {
            warn!(
                "segment type {} left {} bytes unread",
                segment_header.segment_type,
                body.remaining_len()
            );
            body.skip(body.remaining_len())?;
        }
        segments.push((segment_header, segment));
    }

    Ok(Stanag4607Packet { header, segments })
}

// ----------------------------------------------------------------------------
/// Read an entire buffer as a sequence of STANAG 4607 packets.
pub fn read_stanag_4607_data(reader: &mut SliceReader<'_>) -> Result<Vec<Stanag4607Packet>> {
    let mut packets = Vec::new();
    while reader.remaining_len() >= PACKET_HEADER_LENGTH {
        packets.push(read_stanag_4607_packet(reader)?);
    }
    if reader.remaining_len() > 0 {
        warn!(
            "{} bytes left over after the last GMTI packet",
            reader.remaining_len()
        );
    }
    Ok(packets)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_header_bytes(packet_size: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"31"); // version
        bytes.extend_from_slice(&packet_size.to_be_bytes());
        bytes.extend_from_slice(b"US"); // nationality
        bytes.push(5); // unclassified
        bytes.extend_from_slice(b"  "); // class system
        bytes.extend_from_slice(&0x0000_u16.to_be_bytes()); // code: none
        bytes.push(0); // operation, real data
        bytes.extend_from_slice(b"PLATFORM  ");
        bytes.extend_from_slice(&7_u32.to_be_bytes()); // mission id
        bytes.extend_from_slice(&9_u32.to_be_bytes()); // job id
        bytes
    }

    #[test]
    fn packet_header_layout() {
        let bytes = sample_header_bytes(32);
        assert_eq!(bytes.len(), PACKET_HEADER_LENGTH);
        let mut reader = SliceReader::new(&bytes);
        let header = PacketHeader::read(&mut reader).unwrap();
        assert_eq!(header.version_id, "31");
        assert_eq!(header.packet_size, 32);
        assert_eq!(header.nationality, "US");
        assert_eq!(
            header.packet_security.classification,
            SecurityClassification::Unclassified
        );
        assert_eq!(header.packet_security.code, SecurityCode::None);
        assert_eq!(header.exercise_indicator, ExerciseIndicator::OperationReal);
        assert_eq!(header.platform_id, "PLATFORM");
        assert_eq!(header.mission_id, 7);
        assert_eq!(header.job_id, 9);
    }

    #[test]
    fn unknown_segment_types_stay_framed() {
        // Header + one reserved-type segment of 5 + 3 bytes
        let mut bytes = sample_header_bytes(32 + 5 + 3);
        bytes.push(4); // reserved segment type
        bytes.extend_from_slice(&8_u32.to_be_bytes());
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);

        let mut reader = SliceReader::new(&bytes);
        let packet = read_stanag_4607_packet(&mut reader).unwrap();
        assert_eq!(packet.segments.len(), 1);
        match &packet.segments[0].1 {
            Segment::Other(blob) => assert_eq!(blob.as_slice(), &[0xAA, 0xBB, 0xCC]),
            other => panic!("expected raw segment, found {:?}", other),
        }
        assert_eq!(reader.remaining_len(), 0);
    }
}
