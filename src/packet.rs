use super::codec::{ber_length, read_ber, write_ber};
use super::format::{BlobFormat, KlvFormat};
use super::key::{read_uds_key, write_uds_key, LdsKey, UdsKey};
use super::set::LocalSetFormat;
use super::tag_traits::{TagCountRange, TagTraits, TagTraitsLookup};
use super::value::Value;
use super::{st0102, st0104, st0601, st0806, st0903, st1002, st1108, st1204};
use super::{ErrorDetails, Result, SliceReader, SliceWriter};
use log::debug;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

/// The metadata standards this library recognizes at the top level of a KLV
/// stream.
///
/// This enumeration appears nowhere in the KLV standards themselves; it is a
/// consistent handle for the traits of each standard, and the first element
/// of every timeline key.
#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Standard {
    /// A packet whose key matched no registered standard.
    Unknown = 0,
    /// MISB ST 0102 security local set.
    Misb0102 = 1,
    /// MISB ST 0104 (EG 0104) Predator basic universal set.
    Misb0104 = 2,
    /// MISB ST 0601 UAS datalink local set.
    Misb0601 = 3,
    /// MISB ST 0806 remote video terminal local set.
    Misb0806 = 4,
    /// MISB ST 0903 VMTI local set.
    Misb0903 = 5,
    /// MISB ST 1002 range image local set.
    Misb1002 = 6,
    /// MISB ST 1108 interpretability and quality local set.
    Misb1108 = 7,
    /// MISB ST 1202 generalized transformation local set.
    Misb1202 = 8,
    /// MISB ST 1204 MIIS core identifier.
    Misb1204 = 9,
    /// MISB ST 1206 SAR motion imagery local set.
    Misb1206 = 10,
    /// MISB ST 1601 geo-registration local set.
    Misb1601 = 11,
}

impl Standard {
    /// The standard registered under the given traits tag, or
    /// [`Standard::Unknown`].
    pub fn from_lds(tag: LdsKey) -> Standard {
        match tag {
            1 => Standard::Misb0102,
            2 => Standard::Misb0104,
            3 => Standard::Misb0601,
            4 => Standard::Misb0806,
            5 => Standard::Misb0903,
            6 => Standard::Misb1002,
            7 => Standard::Misb1108,
            8 => Standard::Misb1202,
            9 => Standard::Misb1204,
            10 => Standard::Misb1206,
            11 => Standard::Misb1601,
            _ => Standard::Unknown,
        }
    }

    /// The 16-byte key that introduces packets of this standard.
    pub fn uds_key(&self) -> UdsKey {
        packet_traits().by_tag(*self as LdsKey).uds_key()
    }
}

/// Top-level KLV packet.
///
/// A KLV metadata stream consists of a sequence of these.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct KlvPacket {
    /// The 16-byte key introducing the packet.
    pub key: UdsKey,
    /// The packet's payload.
    pub value: Value,
}

impl KlvPacket {
    /// Assembles a packet.
    pub fn new<V: Into<Value>>(key: UdsKey, value: V) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    /// The standard this packet's key belongs to.
    pub fn standard(&self) -> Standard {
        Standard::from_lds(packet_traits().by_uds_key(self.key).tag())
    }
}

impl Display for KlvPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let traits = packet_traits().by_uds_key(self.key);
        write!(
            f,
            "{{ {}: {} }}",
            traits.name(),
            traits.format().print(&self.value)
        )
    }
}

// ----------------------------------------------------------------------------
/// Find and read one KLV packet from a byte stream.
///
/// Scans forward for the 4-byte UDS key prefix, skipping (and logging) any
/// non-KLV bytes encoders sometimes leave between packets. The packet value
/// is parsed with the format registered for its key; payloads that fail to
/// parse are preserved as blobs rather than dropped.
///
/// Fails with [`ErrorDetails::KeyNotFound`] when no prefix exists in the
/// remaining bytes (the reader is left at the end of the buffer),
/// [`ErrorDetails::InvalidKey`] when the prefix match was coincidental, and
/// [`ErrorDetails::BufferOverrun`] when the buffer ends mid-packet.
pub fn read_klv_packet(reader: &mut SliceReader<'_>) -> Result<KlvPacket> {
    // Find the prefix which begins all UDS keys
    let remaining = reader.peek_remaining();
    let position = remaining
        .windows(UdsKey::PREFIX.len())
        .position(|window| window == UdsKey::PREFIX);
    let position = match position {
        Some(position) => position,
        None => {
            let error = reader.make_error(ErrorDetails::KeyNotFound);
            reader.skip(remaining.len())?;
            return Err(error);
        }
    };
    if position != 0 {
        debug!("skipped {} bytes in klv stream", position);
        reader.skip(position)?;
    }

    let key = read_uds_key(reader)?;
    if !key.is_valid() {
        // This might be an encoding error, or maybe we falsely detected a
        // prefix in the data between the packets
        return Err(reader.make_error(ErrorDetails::InvalidKey));
    }

    let remaining = reader.remaining_len();
    let length = read_ber(reader, remaining)? as usize;
    let value = packet_traits().by_uds_key(key).format().read(reader, length)?;

    Ok(KlvPacket { key, value })
}

// ----------------------------------------------------------------------------
/// Write one KLV packet: 16-byte key, BER length, value bytes.
pub fn write_klv_packet(packet: &KlvPacket, writer: &mut SliceWriter<'_>) -> Result<()> {
    let format = packet_traits().by_uds_key(packet.key).format();
    let length = format.length_of(&packet.value)?;
    write_uds_key(packet.key, writer)?;
    let remaining = writer.remaining_len();
    write_ber(length as u64, writer, remaining)?;
    format.write(&packet.value, writer)
}

// ----------------------------------------------------------------------------
/// Number of bytes required to store the given packet, key and length field
/// included.
pub fn klv_packet_length(packet: &KlvPacket) -> Result<usize> {
    let length = packet_traits()
        .by_uds_key(packet.key)
        .format()
        .length_of(&packet.value)?;
    Ok(UdsKey::LENGTH + ber_length(length as u64) + length)
}

// ----------------------------------------------------------------------------
/// The time at which `packet` takes effect, in microseconds, when its
/// standard defines one.
pub fn klv_packet_timestamp(packet: &KlvPacket) -> Option<u64> {
    match packet.standard() {
        Standard::Misb0104 => {
            let set = packet.value.as_universal_set().ok()?;
            let key = st0104::traits()
                .by_tag(st0104::tag::USER_DEFINED_TIMESTAMP)
                .uds_key();
            set.at(key).ok()?.as_u64().ok()
        }
        Standard::Misb0601 => {
            let set = packet.value.as_local_set().ok()?;
            set.at(st0601::tag::PRECISION_TIMESTAMP).ok()?.as_u64().ok()
        }
        Standard::Misb0806 => {
            let set = packet.value.as_local_set().ok()?;
            set.at(st0806::tag::TIMESTAMP).ok()?.as_u64().ok()
        }
        Standard::Misb0903 => {
            let set = packet.value.as_local_set().ok()?;
            set.at(st0903::tag::PRECISION_TIMESTAMP).ok()?.as_u64().ok()
        }
        Standard::Misb1002 => {
            let set = packet.value.as_local_set().ok()?;
            set.at(st1002::tag::PRECISION_TIMESTAMP).ok()?.as_u64().ok()
        }
        Standard::Misb1108 => {
            let set = packet.value.as_local_set().ok()?;
            let period = set.at(st1108::tag::METRIC_PERIOD_PACK).ok()?;
            Some(period.as_metric_period().ok()?.timestamp)
        }
        _ => None,
    }
}

// ----------------------------------------------------------------------------
// Member catalog for local sets whose members this library does not model;
// every tag decodes as a blob.
pub(crate) fn opaque_traits() -> &'static TagTraitsLookup {
    static LOOKUP: OnceLock<TagTraitsLookup> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        TagTraitsLookup::new(vec![TagTraits::new(
            UdsKey::NONE,
            0,
            "UNKNOWN",
            BlobFormat::new().into(),
            "Unknown Tag",
            "Unknown tag.",
            TagCountRange::ANY,
        )])
    })
}

// ----------------------------------------------------------------------------
/// The traits registry for top-level packet keys.
pub fn packet_traits() -> &'static TagTraitsLookup {
    static LOOKUP: OnceLock<TagTraitsLookup> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        TagTraitsLookup::new(vec![
            TagTraits::new(
                UdsKey::NONE,
                Standard::Unknown as LdsKey,
                "KLV_PACKET_UNKNOWN",
                BlobFormat::new().into(),
                "Unknown Packet",
                "Packet of unknown type.",
                TagCountRange::FORBIDDEN,
            ),
            TagTraits::new(
                st0102::key(),
                Standard::Misb0102 as LdsKey,
                "KLV_PACKET_MISB_0102_LOCAL_SET",
                KlvFormat::from(st0102::local_set_format()),
                "MISB ST 0102 Local Set",
                "Security Metadata Local Set. Contains classification and \
                 handling markings for the metadata stream it travels with.",
                TagCountRange::ANY,
            )
            .with_subtags(st0102::traits()),
            TagTraits::new(
                st0104::key(),
                Standard::Misb0104 as LdsKey,
                "KLV_PACKET_MISB_0104_UNIVERSAL_SET",
                KlvFormat::from(st0104::universal_set_format()),
                "MISB ST 0104 Universal Set",
                "Predator UAV Basic Universal Set. Contains basic metadata \
                 describing a Predator unmanned aerial system producing FMV \
                 footage. Predecessor to MISB ST 0601. Deprecated as of 2008.",
                TagCountRange::ANY,
            )
            .with_subtags(st0104::traits()),
            TagTraits::new(
                st0601::key(),
                Standard::Misb0601 as LdsKey,
                "KLV_PACKET_MISB_0601_LOCAL_SET",
                KlvFormat::from(st0601::local_set_format()),
                "MISB ST 0601 Local Set",
                "UAS Datalink Local Set. Contains a wide variety of metadata \
                 describing an unmanned aerial system producing FMV footage.",
                TagCountRange::ANY,
            )
            .with_subtags(st0601::traits()),
            TagTraits::new(
                st0806::key(),
                Standard::Misb0806 as LdsKey,
                "KLV_PACKET_MISB_0806_LOCAL_SET",
                KlvFormat::from(st0806::local_set_format()),
                "MISB ST 0806 Local Set",
                "Remote Video Terminal Local Set. Contains metadata related \
                 to datalinks between UAS platforms and remote terminals.",
                TagCountRange::ANY,
            )
            .with_subtags(st0806::traits()),
            TagTraits::new(
                st0903::key(),
                Standard::Misb0903 as LdsKey,
                "KLV_PACKET_MISB_0903_LOCAL_SET",
                KlvFormat::from(st0903::local_set_format()),
                "MISB ST 0903 Local Set",
                "Video Moving Target Indicator Local Set. Contains metadata \
                 describing moving objects detected in a video stream.",
                TagCountRange::ANY,
            )
            .with_subtags(st0903::traits()),
            TagTraits::new(
                st1002::key(),
                Standard::Misb1002 as LdsKey,
                "KLV_PACKET_MISB_1002_LOCAL_SET",
                KlvFormat::from(st1002::local_set_format()),
                "MISB ST 1002 Local Set",
                "Range Image Local Set. Contains metadata describing range \
                 imagery and its relation to any accompanying video.",
                TagCountRange::ANY,
            )
            .with_subtags(st1002::traits()),
            TagTraits::new(
                st1108::key(),
                Standard::Misb1108 as LdsKey,
                "KLV_PACKET_MISB_1108_LOCAL_SET",
                KlvFormat::from(st1108::local_set_format()),
                "MISB ST 1108 Local Set",
                "Interpretability and Quality Local Set. Contains image \
                 quality metrics and compression characteristics for a video \
                 stream or file.",
                TagCountRange::ANY,
            )
            .with_subtags(st1108::traits()),
            TagTraits::new(
                UdsKey::new(0x060E2B34_020B0101, 0x0E01030305000000),
                Standard::Misb1202 as LdsKey,
                "KLV_PACKET_MISB_1202_LOCAL_SET",
                KlvFormat::from(LocalSetFormat::new("ST 1202 local set", opaque_traits())),
                "MISB ST 1202 Local Set",
                "Generalized Transformation Local Set. Describes a \
                 transformation between two two-dimensional coordinate \
                 systems.",
                TagCountRange::ANY,
            ),
            TagTraits::new(
                st1204::key(),
                Standard::Misb1204 as LdsKey,
                "KLV_PACKET_MISB_1204_MIIS_ID",
                KlvFormat::from(st1204::MiisIdFormat::new()),
                "MISB ST 1204 MIIS ID",
                "Motion Imagery Identification System Core Identifier. \
                 Labels the stream with sensor and platform UUIDs.",
                TagCountRange::ANY,
            ),
            TagTraits::new(
                UdsKey::new(0x060E2B34_020B0101, 0x0E01030321000000),
                Standard::Misb1206 as LdsKey,
                "KLV_PACKET_MISB_1206_LOCAL_SET",
                KlvFormat::from(LocalSetFormat::new("ST 1206 local set", opaque_traits())),
                "MISB ST 1206 Local Set",
                "Synthetic Aperture Radar Motion Imagery Local Set. Contains \
                 metadata for SAR-derived motion imagery.",
                TagCountRange::ANY,
            ),
            TagTraits::new(
                UdsKey::new(0x060E2B34_020B0101, 0x0E01030503000000),
                Standard::Misb1601 as LdsKey,
                "KLV_PACKET_MISB_1601_LOCAL_SET",
                KlvFormat::from(LocalSetFormat::new("ST 1601 local set", opaque_traits())),
                "MISB ST 1601 Local Set",
                "Geo-Registration Local Set. Describes the accuracy of \
                 geo-registration solutions applied to the imagery.",
                TagCountRange::ANY,
            ),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_standard_resolves_through_the_registry() {
        for standard in [
            Standard::Misb0102,
            Standard::Misb0104,
            Standard::Misb0601,
            Standard::Misb0806,
            Standard::Misb0903,
            Standard::Misb1002,
            Standard::Misb1108,
            Standard::Misb1202,
            Standard::Misb1204,
            Standard::Misb1206,
            Standard::Misb1601,
        ] {
            let key = standard.uds_key();
            assert!(key.is_valid(), "{:?} key invalid", standard);
            let traits = packet_traits().by_uds_key(key);
            assert_eq!(Standard::from_lds(traits.tag()), standard);
        }
    }

    #[test]
    fn scanning_skips_garbage_between_packets() {
        // Garbage, then an unknown-key packet with a 1-byte payload
        let mut bytes = vec![0xDE, 0xAD, 0xBE, 0xEF];
        let key = UdsKey::new(0x060E2B34_04010101, 0x0102030405060708);
        bytes.extend_from_slice(key.as_bytes());
        bytes.push(0x01);
        bytes.push(0x55);

        let mut reader = SliceReader::new(&bytes);
        let packet = read_klv_packet(&mut reader).unwrap();
        assert_eq!(packet.key, key);
        assert_eq!(packet.standard(), Standard::Unknown);
        assert_eq!(packet.value.as_blob().unwrap().as_slice(), &[0x55]);
        assert_eq!(reader.remaining_len(), 0);
    }

    #[test]
    fn missing_prefix_reports_key_not_found() {
        let bytes = [0x00_u8; 32];
        let mut reader = SliceReader::new(&bytes);
        let err = read_klv_packet(&mut reader).unwrap_err();
        assert_eq!(err.details, ErrorDetails::KeyNotFound);
        assert_eq!(reader.remaining_len(), 0);
    }
}
