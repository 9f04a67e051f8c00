//! End-to-end exercise of the STANAG 4607 packet framer.

use misb_io::codec::{write_sflint, write_sint, write_uflint};
use misb_io::stanag4607::{
    read_stanag_4607_data, DwellExistenceMask, MissionPlatform, Segment,
};
use misb_io::{SliceReader, SliceWriter};

fn packet_header(packet_size: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"31");
    bytes.extend_from_slice(&packet_size.to_be_bytes());
    bytes.extend_from_slice(b"US");
    bytes.push(5); // unclassified
    bytes.extend_from_slice(b"  ");
    bytes.extend_from_slice(&0x0000_u16.to_be_bytes());
    bytes.push(0); // operation, real data
    bytes.extend_from_slice(b"HAWK11    ");
    bytes.extend_from_slice(&1_u32.to_be_bytes());
    bytes.extend_from_slice(&2_u32.to_be_bytes());
    bytes
}

fn mission_segment() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"OP EAGLE    ");
    bytes.extend_from_slice(b"FP-0042     ");
    bytes.push(9); // Predator
    bytes.extend_from_slice(b"BLOCK 5   ");
    bytes.extend_from_slice(&2024_u16.to_be_bytes());
    bytes.push(6);
    bytes.push(15);
    bytes
}

fn dwell_segment(target_report_count: u16) -> Vec<u8> {
    let mask = DwellExistenceMask::new()
        .with_revisit_index(true)
        .with_dwell_index(true)
        .with_last_dwell_of_revisit(true)
        .with_target_report_count(true)
        .with_dwell_time(true)
        .with_sensor_lat(true)
        .with_sensor_long(true)
        .with_sensor_alt(true)
        .with_dwell_area_center_lat(true)
        .with_dwell_area_center_long(true)
        .with_dwell_area_range_half(true)
        .with_dwell_area_angle_half(true)
        .with_target_delta_lat(true)
        .with_target_delta_long(true);

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&mask.into_bytes());
    bytes.extend_from_slice(&1_u16.to_be_bytes()); // revisit index
    bytes.extend_from_slice(&1_u16.to_be_bytes()); // dwell index
    bytes.push(1); // last dwell of revisit
    bytes.extend_from_slice(&target_report_count.to_be_bytes());
    bytes.extend_from_slice(&43_200_000_u32.to_be_bytes()); // dwell time

    let mut fixed = [0_u8; 24];
    {
        let mut writer = SliceWriter::new(&mut fixed);
        // Sensor position (D7-D9)
        write_sflint(38.9, -90.0, 90.0, &mut writer, 4).unwrap();
        write_uflint(282.95, 0.0, 359.999999916, &mut writer, 4).unwrap();
        write_sint(1_500_000, &mut writer, 4).unwrap();
        // Dwell area (D24-D27)
        write_sflint(38.8, -90.0, 90.0, &mut writer, 4).unwrap();
        write_uflint(283.05, 0.0, 359.999979, &mut writer, 4).unwrap();
        write_uflint(12.5, 0.0, 255.9928, &mut writer, 2).unwrap();
        write_uflint(30.0, 0.0, 359.9945, &mut writer, 2).unwrap();
    }
    bytes.extend_from_slice(&fixed);

    for i in 0..target_report_count {
        bytes.extend_from_slice(&(10 * i).to_be_bytes()); // delta lat
        bytes.extend_from_slice(&(20 * i).to_be_bytes()); // delta long
    }
    bytes
}

#[test]
fn mission_and_dwell_stream_parses_completely() {
    let mission = mission_segment();
    let dwell = dwell_segment(2);
    let reserved = vec![0x55_u8; 6];

    let packet_size = 32 + (5 + mission.len()) + (5 + reserved.len()) + (5 + dwell.len());
    let mut bytes = packet_header(packet_size as u32);
    bytes.push(1); // mission segment
    bytes.extend_from_slice(&((5 + mission.len()) as u32).to_be_bytes());
    bytes.extend_from_slice(&mission);
    bytes.push(7); // low reflectivity index; carried as a blob
    bytes.extend_from_slice(&((5 + reserved.len()) as u32).to_be_bytes());
    bytes.extend_from_slice(&reserved);
    bytes.push(2); // dwell segment
    bytes.extend_from_slice(&((5 + dwell.len()) as u32).to_be_bytes());
    bytes.extend_from_slice(&dwell);

    let mut reader = SliceReader::new(&bytes);
    let packets = read_stanag_4607_data(&mut reader).unwrap();
    assert_eq!(reader.remaining_len(), 0);
    assert_eq!(packets.len(), 1);

    let packet = &packets[0];
    assert_eq!(packet.header.platform_id, "HAWK11");
    assert_eq!(packet.segments.len(), 3);

    match &packet.segments[0].1 {
        Segment::Mission(mission) => {
            assert_eq!(mission.mission_plan, "OP EAGLE");
            assert_eq!(mission.platform_type, MissionPlatform::Predator);
            assert_eq!(mission.reference_time.year, 2024);
        }
        other => panic!("expected a mission segment, found {:?}", other),
    }

    match &packet.segments[1].1 {
        Segment::Other(blob) => assert_eq!(blob.len(), 6),
        other => panic!("expected a raw segment, found {:?}", other),
    }

    match &packet.segments[2].1 {
        Segment::Dwell(dwell) => {
            assert_eq!(dwell.target_report_count, 2);
            assert_eq!(dwell.target_reports.len(), 2);
            assert_eq!(dwell.target_reports[1].location.delta_lat, Some(10));
            assert_eq!(dwell.target_reports[1].location.delta_long, Some(20));
            assert!((dwell.sensor_position.latitude - 38.9).abs() < 1e-4);
            assert!((dwell.dwell_area.dwell_angle_half_ext - 30.0).abs() < 0.02);
            assert!(dwell.scale_factor.is_none());
            assert!(dwell.platform_orientation.is_none());
        }
        other => panic!("expected a dwell segment, found {:?}", other),
    }
}

#[test]
fn truncated_packets_error_instead_of_hanging() {
    let mut bytes = packet_header(64);
    bytes.push(2);
    bytes.extend_from_slice(&27_u32.to_be_bytes());
    // Dwell body cut short
    bytes.extend_from_slice(&[0_u8; 4]);

    let mut reader = SliceReader::new(&bytes);
    assert!(read_stanag_4607_data(&mut reader).is_err());
}
