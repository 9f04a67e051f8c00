//! End-to-end exercises of the byte-level framing, the demuxer, and the
//! muxer working together.

use misb_io::{
    klv_packet_length, read_klv_packet, st0601, st1108, write_klv_packet, ChecksumAlgorithm,
    ChecksumPacketFormat, Demuxer, KlvPacket, LocalSet, Muxer, SliceReader, SliceWriter, Standard,
    Timeline, UdsKey, Value, ValueData,
};

fn to_bytes(packet: &KlvPacket) -> Vec<u8> {
    let length = klv_packet_length(packet).unwrap();
    let mut buffer = vec![0_u8; length];
    let mut writer = SliceWriter::new(&mut buffer);
    write_klv_packet(packet, &mut writer).unwrap();
    assert_eq!(writer.location(), length);
    drop(writer);
    buffer
}

fn minimal_0601(timestamp: u64, version: u64) -> KlvPacket {
    let mut set = LocalSet::new();
    set.add(st0601::tag::PRECISION_TIMESTAMP, timestamp);
    set.add(st0601::tag::VERSION_NUMBER, version);
    KlvPacket::new(st0601::key(), set)
}

// ----------------------------------------------------------------------------
#[test]
fn minimum_0601_packet_demuxes_and_remuxes() {
    let timestamp = 1_000_000_000_u64;
    let packet = minimal_0601(timestamp, 17);
    let bytes = to_bytes(&packet);

    // Key (16), BER length (1), timestamp triple (10), version triple (3),
    // checksum trailer (4)
    assert_eq!(bytes.len(), 16 + 1 + 10 + 3 + 4);
    assert_eq!(&bytes[0..4], &UdsKey::PREFIX);

    // The trailer must verify against the payload that precedes it
    let payload = &bytes[17..];
    let checksum = ChecksumPacketFormat::new(
        ChecksumAlgorithm::RunningSum16,
        [st0601::tag::CHECKSUM as u8, 2],
    );
    let stored = checksum.read(&payload[payload.len() - 4..]).unwrap();
    assert_eq!(
        stored,
        checksum.evaluate(&payload[..payload.len() - 4]),
    );

    // Parse it back and fold it into a timeline
    let mut reader = SliceReader::new(&bytes);
    let parsed = read_klv_packet(&mut reader).unwrap();
    assert_eq!(reader.remaining_len(), 0);
    assert_eq!(parsed, packet);

    let mut timeline = Timeline::new();
    let mut demuxer = Demuxer::new(&mut timeline);
    demuxer.demux_packet(&parsed);

    assert_eq!(
        timeline.at_index(
            Standard::Misb0601,
            st0601::tag::PRECISION_TIMESTAMP,
            0,
            timestamp
        ),
        Value::from(timestamp)
    );
    assert_eq!(
        timeline.at_index(Standard::Misb0601, st0601::tag::VERSION_NUMBER, 0, timestamp),
        Value::from(17_u64)
    );

    // The muxer must reproduce an equivalent packet at the same frame time
    let mut muxer = Muxer::new(&timeline);
    muxer.send_frame(timestamp);
    assert_eq!(muxer.next_frame_time(), timestamp);
    let packets = muxer.receive_frame().unwrap();
    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].key, st0601::key());

    let reparsed_bytes = to_bytes(&packets[0]);
    let mut reader = SliceReader::new(&reparsed_bytes);
    let reparsed = read_klv_packet(&mut reader).unwrap();
    assert_eq!(
        reparsed.value.as_local_set().unwrap(),
        packet.value.as_local_set().unwrap()
    );
}

// ----------------------------------------------------------------------------
#[test]
fn corrupted_checksum_still_yields_the_packet() {
    let packet = minimal_0601(5_000_000, 17);
    let mut bytes = to_bytes(&packet);
    // Damage the version number byte; the checksum no longer matches
    let version_offset = bytes.len() - 5;
    bytes[version_offset] ^= 0xFF;

    let mut reader = SliceReader::new(&bytes);
    let parsed = read_klv_packet(&mut reader).unwrap();
    let set = parsed.value.as_local_set().unwrap();
    assert!(set.has(st0601::tag::VERSION_NUMBER));
    assert_ne!(
        set.at(st0601::tag::VERSION_NUMBER).unwrap(),
        &Value::from(17_u64)
    );
}

// ----------------------------------------------------------------------------
#[test]
fn demux_mux_demux_reaches_a_fixed_point() {
    let times = [1_000_000_u64, 2_000_000, 3_000_000];
    let mut packets = Vec::new();
    for &timestamp in &times {
        let mut set = LocalSet::new();
        set.add(st0601::tag::PRECISION_TIMESTAMP, timestamp);
        set.add(st0601::tag::VERSION_NUMBER, 17_u64);
        set.add(st0601::tag::MISSION_ID, "FIXED POINT");
        set.add(st0601::tag::PLATFORM_DESIGNATION, "Reaper");
        set.add(st0601::tag::SLANT_RANGE, Value::from(ValueData::F64(0.0)));
        packets.push(KlvPacket::new(st0601::key(), set));
    }

    // Round-trip every packet through its byte form first
    let mut first = Timeline::new();
    let mut demuxer = Demuxer::new(&mut first);
    for packet in &packets {
        let bytes = to_bytes(packet);
        let mut reader = SliceReader::new(&bytes);
        demuxer.demux_packet(&read_klv_packet(&mut reader).unwrap());
    }

    let mut muxer = Muxer::new(&first);
    let mut regenerated = Vec::new();
    for &timestamp in &times {
        muxer.send_frame(timestamp);
    }
    for _ in &times {
        regenerated.extend(muxer.receive_frame().unwrap());
    }

    let mut second = Timeline::new();
    let mut demuxer = Demuxer::new(&mut second);
    for packet in &regenerated {
        demuxer.demux_packet(packet);
    }

    assert_eq!(first, second);
}

// ----------------------------------------------------------------------------
fn metric_set(name: &str, time: u64, value: f64) -> LocalSet {
    let mut set = LocalSet::new();
    set.add(st1108::metric_tag::NAME, name);
    set.add(st1108::metric_tag::VERSION, "1.0");
    set.add(
        st1108::metric_tag::IMPLEMENTER,
        st1108::MetricImplementer {
            organization: "Example Org".to_owned(),
            subgroup: "Quality".to_owned(),
        },
    );
    set.add(st1108::metric_tag::PARAMETERS, "");
    set.add(st1108::metric_tag::TIME, time);
    set.add(st1108::metric_tag::VALUE, value);
    set
}

fn quality_packet(period: st1108::MetricPeriodPack, metric: LocalSet) -> KlvPacket {
    let mut set = LocalSet::new();
    set.add(st1108::tag::ASSESSMENT_POINT, ValueData::Enumeration(2));
    set.add(st1108::tag::METRIC_PERIOD_PACK, period);
    set.add(st1108::tag::METRIC_LOCAL_SET, metric);
    set.add(st1108::tag::COMPRESSION_TYPE, ValueData::Enumeration(2));
    set.add(st1108::tag::COMPRESSION_PROFILE, ValueData::Enumeration(4));
    set.add(st1108::tag::COMPRESSION_LEVEL, "5.1");
    set.add(st1108::tag::COMPRESSION_RATIO, 22.5_f64);
    set.add(st1108::tag::STREAM_BITRATE, 4000_u64);
    set.add(st1108::tag::DOCUMENT_VERSION, 3_u64);
    KlvPacket::new(st1108::key(), set)
}

#[test]
fn adjacent_1108_periods_emerge_as_one_packet() {
    let metric = metric_set("VNIIRS", 1_000, 5.5);
    let first = quality_packet(
        st1108::MetricPeriodPack {
            timestamp: 1_000,
            offset: 100,
        },
        metric.clone(),
    );
    let second = quality_packet(
        st1108::MetricPeriodPack {
            timestamp: 1_100,
            offset: 100,
        },
        metric,
    );

    let mut timeline = Timeline::new();
    let mut demuxer = Demuxer::new(&mut timeline);
    for packet in [&first, &second] {
        let bytes = to_bytes(packet);
        let mut reader = SliceReader::new(&bytes);
        demuxer.demux_packet(&read_klv_packet(&mut reader).unwrap());
    }

    let mut muxer = Muxer::new(&timeline);
    muxer.send_frame(10_000);
    let packets = muxer.receive_frame().unwrap();
    let quality: Vec<&KlvPacket> = packets
        .iter()
        .filter(|packet| packet.standard() == Standard::Misb1108)
        .collect();
    assert_eq!(quality.len(), 1);

    let set = quality[0].value.as_local_set().unwrap();
    let period = set
        .at(st1108::tag::METRIC_PERIOD_PACK)
        .unwrap()
        .as_metric_period()
        .unwrap()
        .clone();
    assert_eq!(period.timestamp, 1_000);
    assert_eq!(period.offset, 200);

    // And the merged packet still serializes with a verifying trailer
    let bytes = to_bytes(quality[0]);
    let mut reader = SliceReader::new(&bytes);
    let reparsed = read_klv_packet(&mut reader).unwrap();
    assert!(reparsed.value.is_valid());
}

// ----------------------------------------------------------------------------
#[test]
fn unknown_packets_replay_verbatim() {
    let key = UdsKey::new(0x060E2B34_04010101, 0x0102030405060708);
    let unknown = KlvPacket::new(
        key,
        Value::from(misb_io::Blob::from(&[0xDE_u8, 0xAD, 0x42][..])),
    );

    let mut timeline = Timeline::new();
    let mut demuxer = Demuxer::new(&mut timeline);
    // Give the demuxer a clock first, then the mystery packet
    demuxer.demux_packet(&minimal_0601(1_000, 17));
    demuxer.demux_packet(&unknown);

    let mut muxer = Muxer::new(&timeline);
    muxer.send_frame(50_000);
    let packets = muxer.receive_frame().unwrap();
    assert!(packets.iter().any(|packet| *packet == unknown));
}
