//! The STANAG 4607 dwell segment: a report on a grouping of zero or more
//! target reports.
//!
//! The segment opens with an 8-byte existence mask whose upper 48 bits gate,
//! field by field, which of the remaining fields are present — both the
//! dwell-level fields (D2 through D31) and the per-target fields of every
//! target report (D32.1 through D32.18).

use super::from_primitive;
use crate::codec::{read_sflint, read_sint, read_uflint, read_uint};
use crate::{read_bitfield, Result, SliceReader};
use modular_bitfield_msb::prelude::*;
use std::fmt::{Display, Formatter};

/// The dwell existence mask (field D1).
///
/// Each bit indicates whether the corresponding field of the dwell segment
/// is present in the data stream, most significant bit first, starting with
/// the revisit index (D2).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellExistenceMask {
    pub revisit_index: bool,
    pub dwell_index: bool,
    pub last_dwell_of_revisit: bool,
    pub target_report_count: bool,
    pub dwell_time: bool,
    pub sensor_lat: bool,
    pub sensor_long: bool,
    pub sensor_alt: bool,
    pub scale_fact_lat: bool,
    pub scale_fact_long: bool,
    pub sensor_pos_along_track: bool,
    pub sensor_pos_cross_track: bool,
    pub sensor_pos_alt: bool,
    pub sensor_track: bool,
    pub sensor_speed: bool,
    pub sensor_vertical_vel: bool,
    pub sensor_track_uncert: bool,
    pub sensor_speed_uncert: bool,
    pub sensor_vertical_vel_uncert: bool,
    pub platform_orient_heading: bool,
    pub platform_orient_pitch: bool,
    pub platform_orient_roll: bool,
    pub dwell_area_center_lat: bool,
    pub dwell_area_center_long: bool,
    pub dwell_area_range_half: bool,
    pub dwell_area_angle_half: bool,
    pub sensor_orient_heading: bool,
    pub sensor_orient_pitch: bool,
    pub sensor_orient_roll: bool,
    pub min_detectable_vel: bool,
    pub mti_report_index: bool,
    pub target_hi_res_lat: bool,
    pub target_hi_res_long: bool,
    pub target_delta_lat: bool,
    pub target_delta_long: bool,
    pub target_geodetic_height: bool,
    pub target_vel_los: bool,
    pub target_wrap_vel: bool,
    pub target_snr: bool,
    pub target_classification: bool,
    pub target_class_probability: bool,
    pub target_measure_slant_range: bool,
    pub target_measure_cross_range: bool,
    pub target_measure_height: bool,
    pub target_measure_radial_vel: bool,
    pub target_truth_tag_application: bool,
    pub target_truth_tag_entity: bool,
    pub target_radar_cross_section: bool,
    #[skip]
    padding: B16,
}

// The latitude/longitude encodings shared by the dwell fields.
const LATITUDE: (f64, f64) = (-90.0, 90.0);
const LONGITUDE: (f64, f64) = (0.0, 359.999999916);
const ANGLE_16: (f64, f64) = (0.0, 359.9945);

// ----------------------------------------------------------------------------
/// Position of the sensor at the temporal center of the dwell (D7–D9).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SensorPosition {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Altitude above the WGS84 ellipsoid, in centimeters.
    pub altitude: i32,
}

impl Display for SensorPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Latitude: {} degrees, Longitude: {} degrees, Altitude: {} cm }}",
            self.latitude, self.longitude, self.altitude
        )
    }
}

impl SensorPosition {
    fn read(reader: &mut SliceReader<'_>) -> Result<Self> {
        Ok(Self {
            latitude: read_sflint(LATITUDE.0, LATITUDE.1, reader, 4)?,
            longitude: read_uflint(LONGITUDE.0, LONGITUDE.1, reader, 4)?,
            altitude: read_sint(reader, 4)? as i32,
        })
    }
}

// ----------------------------------------------------------------------------
/// Factor modifying reported target positions when the reduced-bandwidth
/// target report is sent (D10–D11).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScaleFactor {
    /// Latitude scale, as a raw signed 32-bit factor.
    pub lat_scale: i32,
    /// Longitude scale, as a raw signed 32-bit factor.
    pub long_scale: i32,
}

impl ScaleFactor {
    fn read(reader: &mut SliceReader<'_>) -> Result<Self> {
        Ok(Self {
            lat_scale: read_sint(reader, 4)? as i32,
            long_scale: read_sint(reader, 4)? as i32,
        })
    }
}

// ----------------------------------------------------------------------------
/// Standard deviation of the estimated sensor location (D12–D14), in
/// centimeters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SensorPositionUncertainty {
    /// Along-track uncertainty.
    pub along_track: i32,
    /// Cross-track uncertainty.
    pub cross_track: i32,
    /// Altitude uncertainty.
    pub altitude: i32,
}

impl SensorPositionUncertainty {
    fn read(reader: &mut SliceReader<'_>) -> Result<Self> {
        Ok(Self {
            along_track: read_sint(reader, 4)? as i32,
            cross_track: read_sint(reader, 4)? as i32,
            altitude: read_sint(reader, 2)? as i32,
        })
    }
}

// ----------------------------------------------------------------------------
/// A heading / pitch / roll triple (D21–D23 and D28–D30), in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orientation {
    /// Heading, clockwise from true north.
    pub heading: f64,
    /// Pitch, positive nose up.
    pub pitch: f64,
    /// Roll, positive right wing down.
    pub roll: f64,
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Heading: {} degrees, Pitch: {} degrees, Roll: {} degrees }}",
            self.heading, self.pitch, self.roll
        )
    }
}

impl Orientation {
    fn read(reader: &mut SliceReader<'_>) -> Result<Self> {
        Ok(Self {
            heading: read_uflint(ANGLE_16.0, ANGLE_16.1, reader, 2)?,
            pitch: read_sflint(LATITUDE.0, LATITUDE.1, reader, 2)?,
            roll: read_sflint(LATITUDE.0, LATITUDE.1, reader, 2)?,
        })
    }
}

// ----------------------------------------------------------------------------
/// The position of the center of the dwell area (D24–D27).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DwellArea {
    /// Latitude of the center, in degrees.
    pub center_lat: f64,
    /// Longitude of the center, in degrees.
    pub center_long: f64,
    /// Range half extent, in kilometers.
    pub range_half_ext: f64,
    /// Dwell angle half extent, in degrees.
    pub dwell_angle_half_ext: f64,
}

impl Display for DwellArea {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Center Latitude: {} degrees, Center Longitude: {} degrees, \
             Range Half Extent: {} km, Dwell Angle Half Extent: {} degrees }}",
            self.center_lat, self.center_long, self.range_half_ext, self.dwell_angle_half_ext
        )
    }
}

impl DwellArea {
    fn read(reader: &mut SliceReader<'_>) -> Result<Self> {
        Ok(Self {
            center_lat: read_sflint(LATITUDE.0, LATITUDE.1, reader, 4)?,
            center_long: read_uflint(0.0, 359.999979, reader, 4)?,
            range_half_ext: read_uflint(0.0, 255.9928, reader, 2)?,
            dwell_angle_half_ext: read_uflint(ANGLE_16.0, ANGLE_16.1, reader, 2)?,
        })
    }
}

// ----------------------------------------------------------------------------
/// Classification of a reported target (D32.10).
#[derive(Debug, Copy, Clone, PartialEq, Eq, num_derive::FromPrimitive)]
#[allow(missing_docs)]
pub enum TargetClassification {
    NoInfoLive = 0,
    TrackedVehicleLive = 1,
    WheeledVehicleLive = 2,
    RotaryWingAircraftLive = 3,
    FixedWingAircraftLive = 4,
    StationaryRotatorLive = 5,
    MaritimeLive = 6,
    BeaconLive = 7,
    AmphibiousLive = 8,
    PersonLive = 9,
    VehicleLive = 10,
    AnimalLive = 11,
    LargeMultiReturnLiveLand = 12,
    LargeMultiReturnLiveMaritime = 13,
    OtherLive = 126,
    UnknownLive = 127,
    NoInfoSim = 128,
    TrackedVehicleSim = 129,
    WheeledVehicleSim = 130,
    RotaryWingAircraftSim = 131,
    FixedWingAircraftSim = 132,
    StationaryRotatorSim = 133,
    MaritimeSim = 134,
    BeaconSim = 135,
    AmphibiousSim = 136,
    PersonSim = 137,
    VehicleSim = 138,
    AnimalSim = 139,
    LargeMultiReturnSimLand = 140,
    LargeMultiReturnSimMaritime = 141,
    TaggingDevice = 142,
    OtherSim = 254,
    UnknownSim = 255,
}

// ----------------------------------------------------------------------------
/// Standard deviation of the target measurements (D32.12–D32.15).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TargetMeasurementUncertainty {
    /// Slant range uncertainty, in centimeters.
    pub slant_range: i32,
    /// Cross range uncertainty, in decimeters.
    pub cross_range: i32,
    /// Height uncertainty, in meters.
    pub height: i32,
    /// Radial velocity uncertainty, in centimeters per second.
    pub radial_velocity: i32,
}

impl TargetMeasurementUncertainty {
    fn read(reader: &mut SliceReader<'_>) -> Result<Self> {
        Ok(Self {
            slant_range: read_sint(reader, 2)? as i32,
            cross_range: read_sint(reader, 2)? as i32,
            height: read_sint(reader, 1)? as i32,
            radial_velocity: read_sint(reader, 2)? as i32,
        })
    }
}

// ----------------------------------------------------------------------------
/// Truth-tag information used to generate a simulated target
/// (D32.16–D32.17).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TruthTag {
    /// The application generating the target.
    pub application: u8,
    /// The entity within the application.
    pub entity: u32,
}

impl TruthTag {
    fn read(reader: &mut SliceReader<'_>) -> Result<Self> {
        Ok(Self {
            application: read_uint(reader, 1)? as u8,
            entity: read_uint(reader, 4)? as u32,
        })
    }
}

// ----------------------------------------------------------------------------
/// The position of a reported detection (D32.2–D32.6).
///
/// Either the high-resolution pair or the delta pair is present, never both;
/// the delta pair is relative to the dwell area center, scaled by the dwell
/// scale factor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TargetLocation {
    /// High-resolution latitude, in degrees.
    pub hi_res_lat: Option<f64>,
    /// High-resolution longitude, in degrees.
    pub hi_res_long: Option<f64>,
    /// Reduced-bandwidth latitude delta.
    pub delta_lat: Option<i32>,
    /// Reduced-bandwidth longitude delta.
    pub delta_long: Option<i32>,
    /// Height above the WGS84 ellipsoid, in meters.
    pub geodetic_height: Option<i32>,
}

impl TargetLocation {
    fn read(reader: &mut SliceReader<'_>, mask: &DwellExistenceMask) -> Result<Self> {
        let mut location = Self {
            hi_res_lat: None,
            hi_res_long: None,
            delta_lat: None,
            delta_long: None,
            geodetic_height: None,
        };

        // D32.2-D32.3 are conditional and always sent together; D32.4-D32.5
        // are their reduced-bandwidth replacement
        if mask.target_hi_res_lat() {
            location.hi_res_lat = Some(read_sflint(LATITUDE.0, LATITUDE.1, reader, 4)?);
            location.hi_res_long = Some(read_uflint(LONGITUDE.0, LONGITUDE.1, reader, 4)?);
        } else {
            location.delta_lat = Some(read_sint(reader, 2)? as i32);
            location.delta_long = Some(read_sint(reader, 2)? as i32);
        }

        if mask.target_geodetic_height() {
            location.geodetic_height = Some(read_sint(reader, 2)? as i32);
        }

        Ok(location)
    }
}

// ----------------------------------------------------------------------------
/// One target observed within the dwell (D32).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TargetReport {
    /// Index tying the target to an HRR report (D32.1).
    pub mti_report_index: Option<u16>,
    /// The position of the detection.
    pub location: TargetLocation,
    /// Line-of-sight velocity component, in centimeters per second (D32.7).
    pub velocity_los: Option<i32>,
    /// Target wrap velocity, in centimeters per second (D32.8).
    pub wrap_velocity: Option<i32>,
    /// Estimated signal-to-noise ratio, in decibels (D32.9).
    pub snr: Option<i32>,
    /// Classification of the target (D32.10).
    pub classification: Option<TargetClassification>,
    /// Estimated probability of the classification, in percent (D32.11).
    pub class_probability: Option<u8>,
    /// Standard deviation of the measurements (D32.12–D32.15).
    pub measurement_uncertainty: Option<TargetMeasurementUncertainty>,
    /// Truth tag of a simulated target (D32.16–D32.17).
    pub truth_tag: Option<TruthTag>,
    /// Estimated radar cross section, in quarter-decibels (D32.18).
    pub radar_cross_section: Option<i32>,
}

impl TargetReport {
    fn read(reader: &mut SliceReader<'_>, mask: &DwellExistenceMask) -> Result<Self> {
        let mti_report_index = if mask.mti_report_index() {
            Some(read_uint(reader, 2)? as u16)
        } else {
            None
        };

        let location = TargetLocation::read(reader, mask)?;

        // D32.7-D32.8 are optional and always sent together
        let (velocity_los, wrap_velocity) = if mask.target_vel_los() {
            (
                Some(read_sint(reader, 2)? as i32),
                Some(read_sint(reader, 2)? as i32),
            )
        } else {
            (None, None)
        };

        let snr = if mask.target_snr() {
            Some(read_sint(reader, 1)? as i32)
        } else {
            None
        };

        let classification = if mask.target_classification() {
            Some(from_primitive(read_uint(reader, 1)?, reader)?)
        } else {
            None
        };

        let class_probability = if mask.target_class_probability() {
            Some(read_uint(reader, 1)? as u8)
        } else {
            None
        };

        // D32.12-D32.15 are conditional and always sent together
        let measurement_uncertainty = if mask.target_measure_slant_range() {
            Some(TargetMeasurementUncertainty::read(reader)?)
        } else {
            None
        };

        // D32.16-D32.17 are conditional and always sent together
        let truth_tag = if mask.target_truth_tag_application() {
            Some(TruthTag::read(reader)?)
        } else {
            None
        };

        let radar_cross_section = if mask.target_radar_cross_section() {
            Some(read_sint(reader, 1)? as i32)
        } else {
            None
        };

        Ok(Self {
            mti_report_index,
            location,
            velocity_los,
            wrap_velocity,
            snr,
            classification,
            class_probability,
            measurement_uncertainty,
            truth_tag,
            radar_cross_section,
        })
    }
}

// ----------------------------------------------------------------------------
/// A report on a grouping of zero or more target reports.
#[derive(Debug, Clone, PartialEq)]
pub struct DwellSegment {
    /// The existence mask gating every following field (D1).
    pub existence_mask: DwellExistenceMask,
    /// Sequential count of the revisit to this dwell area (D2).
    pub revisit_index: u16,
    /// Sequential count of this dwell within the revisit (D3).
    pub dwell_index: u16,
    /// Nonzero when this is the last dwell of the revisit (D4).
    pub last_dwell_of_revisit: u8,
    /// Number of target reports in this segment (D5).
    pub target_report_count: u16,
    /// Elapsed time from midnight UTC, in milliseconds (D6).
    pub dwell_time: u32,
    /// Position of the sensor at the temporal center of the dwell (D7–D9).
    pub sensor_position: SensorPosition,
    /// Target position scale factors (D10–D11).
    pub scale_factor: Option<ScaleFactor>,
    /// Standard deviation of the sensor location (D12–D14).
    pub sensor_position_uncertainty: Option<SensorPositionUncertainty>,
    /// Ground track of the sensor, in degrees (D15).
    pub sensor_track: Option<f64>,
    /// Ground speed of the sensor, in millimeters per second (D16).
    pub sensor_speed: Option<i32>,
    /// Vertical velocity of the sensor, in decimeters per second (D17).
    pub sensor_vertical_vel: Option<i32>,
    /// Standard deviation of the sensor track, in degrees (D18).
    pub sensor_track_uncertainty: Option<i32>,
    /// Standard deviation of the sensor speed, in millimeters per second
    /// (D19).
    pub sensor_speed_uncertainty: Option<i32>,
    /// Standard deviation of the sensor vertical velocity, in centimeters
    /// per second (D20).
    pub sensor_vertical_vel_uncertainty: Option<i32>,
    /// Platform orientation (D21–D23).
    pub platform_orientation: Option<Orientation>,
    /// The position of the center of the dwell area (D24–D27).
    pub dwell_area: DwellArea,
    /// Sensor orientation (D28–D30).
    pub sensor_orientation: Option<Orientation>,
    /// Minimum velocity detectable by the sensor, in decimeters per second
    /// (D31).
    pub min_detectable_velocity: Option<u8>,
    /// The targets observed within this dwell (D32).
    pub target_reports: Vec<TargetReport>,
}

impl DwellSegment {
    /// Read a dwell segment, honoring the existence mask bit for bit.
    pub fn read(reader: &mut SliceReader<'_>) -> Result<Self> {
        // Fields D1-D9 are mandatory
        let mask = read_bitfield!(reader, DwellExistenceMask);
        let revisit_index = read_uint(reader, 2)? as u16;
        let dwell_index = read_uint(reader, 2)? as u16;
        let last_dwell_of_revisit = read_uint(reader, 1)? as u8;
        let target_report_count = read_uint(reader, 2)? as u16;
        let dwell_time = read_uint(reader, 4)? as u32;
        let sensor_position = SensorPosition::read(reader)?;

        // Fields D10-D11 are conditional and always sent together;
        // sent when D32.4 and D32.5 are sent
        let scale_factor = if mask.scale_fact_lat() {
            Some(ScaleFactor::read(reader)?)
        } else {
            None
        };

        // Fields D12-D14 are optional and always sent together
        let sensor_position_uncertainty = if mask.sensor_pos_along_track() {
            Some(SensorPositionUncertainty::read(reader)?)
        } else {
            None
        };

        // Fields D15-D17 are conditional and always sent together
        let (sensor_track, sensor_speed, sensor_vertical_vel) = if mask.sensor_track() {
            (
                Some(read_uflint(ANGLE_16.0, ANGLE_16.1, reader, 2)?),
                Some(read_sint(reader, 4)? as i32),
                Some(read_sint(reader, 1)? as i32),
            )
        } else {
            (None, None, None)
        };

        // Fields D18-D20 are optional and always sent together
        let (sensor_track_uncertainty, sensor_speed_uncertainty, sensor_vertical_vel_uncertainty) =
            if mask.sensor_track_uncert() {
                (
                    Some(read_sint(reader, 1)? as i32),
                    Some(read_sint(reader, 2)? as i32),
                    Some(read_sint(reader, 2)? as i32),
                )
            } else {
                (None, None, None)
            };

        // Fields D21-D23 are conditional and always sent together
        let platform_orientation = if mask.platform_orient_heading() {
            Some(Orientation::read(reader)?)
        } else {
            None
        };

        // Fields D24-D27 are mandatory
        let dwell_area = DwellArea::read(reader)?;

        // Fields D28-D30 are optional; if at least one is sent, all three
        // are present and any omitted fields are zero
        let sensor_orientation = if mask.sensor_orient_heading()
            || mask.sensor_orient_pitch()
            || mask.sensor_orient_roll()
        {
            Some(Orientation::read(reader)?)
        } else {
            None
        };

        // Field D31 is optional
        let min_detectable_velocity = if mask.min_detectable_vel() {
            Some(read_uint(reader, 1)? as u8)
        } else {
            None
        };

        let mut target_reports = Vec::with_capacity(usize::from(target_report_count));
        for _ in 0..target_report_count {
            target_reports.push(TargetReport::read(reader, &mask)?);
        }

        Ok(Self {
            existence_mask: mask,
            revisit_index,
            dwell_index,
            last_dwell_of_revisit,
            target_report_count,
            dwell_time,
            sensor_position,
            scale_factor,
            sensor_position_uncertainty,
            sensor_track,
            sensor_speed,
            sensor_vertical_vel,
            sensor_track_uncertainty,
            sensor_speed_uncertainty,
            sensor_vertical_vel_uncertainty,
            platform_orientation,
            dwell_area,
            sensor_orientation,
            min_detectable_velocity,
            target_reports,
        })
    }
}

impl Display for DwellSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Revisit Index: {}, Dwell Index: {}, Last Dwell of Revisit: {}, \
             Target Report Count: {}, Dwell Time: {} ms, Sensor Position: {}, Dwell Area: {}",
            self.revisit_index,
            self.dwell_index,
            if self.last_dwell_of_revisit != 0 {
                "no additional dwells"
            } else {
                "additional dwells"
            },
            self.target_report_count,
            self.dwell_time,
            self.sensor_position,
            self.dwell_area
        )?;
        if let Some(orientation) = &self.platform_orientation {
            write!(f, ", Platform Orientation: {}", orientation)?;
        }
        if let Some(orientation) = &self.sensor_orientation {
            write!(f, ", Sensor Orientation: {}", orientation)?;
        }
        write!(f, ", Target Reports: {} }}", self.target_reports.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SliceWriter;

    // Mandatory-fields-only mask: D2-D9 and D24-D27
    fn mandatory_mask() -> DwellExistenceMask {
        DwellExistenceMask::new()
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
            .with_target_delta_long(true)
    }

    fn mandatory_payload(target_report_count: u16) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&mandatory_mask().into_bytes());
        bytes.extend_from_slice(&3_u16.to_be_bytes()); // revisit index
        bytes.extend_from_slice(&4_u16.to_be_bytes()); // dwell index
        bytes.push(1); // last dwell of revisit
        bytes.extend_from_slice(&target_report_count.to_be_bytes());
        bytes.extend_from_slice(&123_456_u32.to_be_bytes()); // dwell time
        let mut position = [0_u8; 12];
        {
            let mut writer = SliceWriter::new(&mut position);
            crate::codec::write_sflint(38.0, -90.0, 90.0, &mut writer, 4).unwrap();
            crate::codec::write_uflint(283.0, 0.0, 359.999999916, &mut writer, 4).unwrap();
            crate::codec::write_sint(123_000, &mut writer, 4).unwrap();
        }
        bytes.extend_from_slice(&position);
        let mut area = [0_u8; 12];
        {
            let mut writer = SliceWriter::new(&mut area);
            crate::codec::write_sflint(38.1, -90.0, 90.0, &mut writer, 4).unwrap();
            crate::codec::write_uflint(283.1, 0.0, 359.999979, &mut writer, 4).unwrap();
            crate::codec::write_uflint(10.0, 0.0, 255.9928, &mut writer, 2).unwrap();
            crate::codec::write_uflint(45.0, 0.0, 359.9945, &mut writer, 2).unwrap();
        }
        bytes.extend_from_slice(&area);
        for i in 0..target_report_count {
            // Delta lat / delta long only
            bytes.extend_from_slice(&(100 + i).to_be_bytes());
            bytes.extend_from_slice(&(200 + i).to_be_bytes());
        }
        bytes
    }

    #[test]
    fn mandatory_dwell_width_is_exact() {
        let payload = mandatory_payload(2);
        // 8 (mask) + 11 (D2-D6) + 12 (sensor position) + 12 (dwell area)
        // + 2 * 4 (minimum target reports)
        assert_eq!(payload.len(), 43 + 2 * 4);

        let mut reader = SliceReader::new(&payload);
        let dwell = DwellSegment::read(&mut reader).unwrap();
        assert_eq!(reader.remaining_len(), 0);
        assert_eq!(dwell.target_report_count, 2);
        assert_eq!(dwell.target_reports.len(), 2);
        assert_eq!(dwell.revisit_index, 3);
        assert!((dwell.sensor_position.latitude - 38.0).abs() < 1e-4);
        assert!((dwell.sensor_position.longitude - 283.0).abs() < 1e-4);
        assert_eq!(dwell.sensor_position.altitude, 123_000);
        assert!((dwell.dwell_area.range_half_ext - 10.0).abs() < 1e-2);
    }

    #[test]
    fn mandatory_reports_carry_only_position_deltas() {
        let payload = mandatory_payload(1);
        let mut reader = SliceReader::new(&payload);
        let dwell = DwellSegment::read(&mut reader).unwrap();
        let report = &dwell.target_reports[0];
        assert_eq!(report.location.delta_lat, Some(100));
        assert_eq!(report.location.delta_long, Some(200));
        assert!(report.location.hi_res_lat.is_none());
        assert!(report.mti_report_index.is_none());
        assert!(report.snr.is_none());
        assert!(report.classification.is_none());
        assert!(report.truth_tag.is_none());
    }

    #[test]
    fn any_sensor_orientation_bit_pulls_all_three_fields() {
        let mut mask = mandatory_mask().with_sensor_orient_pitch(true);
        let mut payload = mandatory_payload(0);
        payload[..8].copy_from_slice(&mask.into_bytes());
        // Orientation trails the dwell area
        let mut orientation = [0_u8; 6];
        {
            let mut writer = SliceWriter::new(&mut orientation);
            crate::codec::write_uflint(90.0, 0.0, 359.9945, &mut writer, 2).unwrap();
            crate::codec::write_sflint(5.0, -90.0, 90.0, &mut writer, 2).unwrap();
            crate::codec::write_sflint(-5.0, -90.0, 90.0, &mut writer, 2).unwrap();
        }
        payload.extend_from_slice(&orientation);

        let mut reader = SliceReader::new(&payload);
        let dwell = DwellSegment::read(&mut reader).unwrap();
        let orientation = dwell.sensor_orientation.unwrap();
        assert!((orientation.heading - 90.0).abs() < 0.02);
        assert!((orientation.pitch - 5.0).abs() < 0.02);
        assert!((orientation.roll + 5.0).abs() < 0.02);
    }
}
