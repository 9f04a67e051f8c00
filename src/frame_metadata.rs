//! Projection of a [`Timeline`] instant into a flat, frame-level metadata
//! bag.
//!
//! Only fields with a one-to-one mapping into a simple vocabulary are
//! carried over; everything else stays on the timeline. The projection is a
//! table-driven walk over per-standard correspondence maps plus a handful of
//! special cases: geographic points assembled from latitude / longitude /
//! altitude tags (preferring the full-precision variants), the frame corner
//! quadrilateral (reconstructed from offset corners when the full corners
//! are absent), EG 0104 datetime strings, security markings merged from both
//! the top-level ST 0102 set and one embedded in ST 0601, and the freshest
//! quality metrics from ST 1108.

use super::key::LdsKey;
use super::packet::Standard;
use super::timeline::Timeline;
use super::value::{Value, ValueData};
use super::{st0102, st0104, st0601, st1108};
use log::warn;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// The frame-level metadata vocabulary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum FrameMetadataField {
    UnixTimestamp,
    SecurityClassification,
    MissionId,
    MissionNumber,
    PlatformTailNumber,
    PlatformDesignation,
    PlatformCallSign,
    PlatformHeadingAngle,
    PlatformPitchAngle,
    PlatformRollAngle,
    PlatformTrueAirspeed,
    PlatformIndicatedAirspeed,
    PlatformGroundSpeed,
    PlatformVerticalSpeed,
    PlatformMagneticHeading,
    PlatformAngleOfAttack,
    PlatformSideslipAngle,
    PlatformFuelRemaining,
    ImageSourceSensor,
    ImageCoordinateSystem,
    SensorHorizontalFov,
    SensorVerticalFov,
    SensorRelativeAzimuthAngle,
    SensorRelativeElevationAngle,
    SensorRelativeRollAngle,
    SensorRollAngle,
    SensorFovName,
    SensorLocation,
    FrameCenter,
    TargetLocation,
    CornerPoints,
    AngleToNorth,
    ObliquityAngle,
    SlantRange,
    GroundRange,
    TargetWidth,
    TargetTrackGateWidth,
    TargetTrackGateHeight,
    TargetErrorEstimateCe90,
    TargetErrorEstimateLe90,
    StaticPressure,
    DifferentialPressure,
    DensityAltitude,
    OutsideAirTemperature,
    AirfieldBarometricPressure,
    AirfieldElevation,
    RelativeHumidity,
    WindDirection,
    WindSpeed,
    IcingDetected,
    LaserPrfCode,
    StartTimestamp,
    EventStartTimestamp,
    UasLdsVersionNumber,
    AverageGsd,
    Vniirs,
}

/// A geographic point; unknown elevations are NaN.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Elevation in meters, or NaN when unknown.
    pub elevation: f64,
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "( {}, {}, {} )", self.latitude, self.longitude, self.elevation)
    }
}

/// The four frame corner points, upper-left first, clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPolygon {
    /// The corner points.
    pub points: Vec<GeoPoint>,
}

/// A frame-level metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameMetadataValue {
    /// Unsigned integer.
    U64(u64),
    /// Signed integer.
    I64(i64),
    /// Floating-point number.
    F64(f64),
    /// Text.
    String(String),
    /// A geographic point.
    GeoPoint(GeoPoint),
    /// A geographic polygon.
    Polygon(GeoPolygon),
}

impl Display for FrameMetadataValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameMetadataValue::U64(value) => write!(f, "{}", value),
            FrameMetadataValue::I64(value) => write!(f, "{}", value),
            FrameMetadataValue::F64(value) => write!(f, "{}", value),
            FrameMetadataValue::String(value) => write!(f, "{}", value),
            FrameMetadataValue::GeoPoint(value) => write!(f, "{}", value),
            FrameMetadataValue::Polygon(value) => {
                write!(f, "[ ")?;
                for (i, point) in value.points.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", point)?;
                }
                write!(f, " ]")
            }
        }
    }
}

/// Flat bag of frame-level metadata fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameMetadata {
    fields: BTreeMap<FrameMetadataField, FrameMetadataValue>,
}

impl FrameMetadata {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a field, replacing any previous value.
    pub fn add(&mut self, field: FrameMetadataField, value: FrameMetadataValue) {
        self.fields.insert(field, value);
    }

    /// The stored value of `field`, if any.
    pub fn get(&self, field: FrameMetadataField) -> Option<&FrameMetadataValue> {
        self.fields.get(&field)
    }

    /// Whether `field` is present.
    pub fn has(&self, field: FrameMetadataField) -> bool {
        self.fields.contains_key(&field)
    }

    /// All stored fields in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (&FrameMetadataField, &FrameMetadataValue)> {
        self.fields.iter()
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are stored.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ----------------------------------------------------------------------------
fn to_metadata_value(value: &Value) -> Option<FrameMetadataValue> {
    match value.data()? {
        ValueData::U64(v) => Some(FrameMetadataValue::U64(*v)),
        ValueData::I64(v) => Some(FrameMetadataValue::I64(*v)),
        ValueData::F64(v) => Some(FrameMetadataValue::F64(*v)),
        ValueData::String(v) => Some(FrameMetadataValue::String(v.clone())),
        ValueData::Enumeration(v) => Some(FrameMetadataValue::U64(*v)),
        _ => None,
    }
}

fn value_at(timeline: &Timeline, standard: Standard, tag: LdsKey, timestamp: u64) -> Value {
    timeline.at(standard, tag, timestamp).unwrap_or_default()
}

// Assemble a geo point from precedence-ordered tag lists; latitude and
// longitude are required, elevation falls back to NaN.
fn parse_geo_point(
    timeline: &Timeline,
    standard: Standard,
    timestamp: u64,
    latitude_tags: &[LdsKey],
    longitude_tags: &[LdsKey],
    elevation_tags: &[LdsKey],
) -> Option<GeoPoint> {
    let first_valid = |tags: &[LdsKey]| -> Option<f64> {
        tags.iter()
            .map(|&tag| value_at(timeline, standard, tag, timestamp))
            .find(|value| value.is_valid())
            .and_then(|value| value.as_f64().ok())
    };
    let latitude = first_valid(latitude_tags)?;
    let longitude = first_valid(longitude_tags)?;
    let elevation = first_valid(elevation_tags).unwrap_or(f64::NAN);
    Some(GeoPoint {
        latitude,
        longitude,
        elevation,
    })
}

fn apply_direct_map(
    timeline: &Timeline,
    standard: Standard,
    timestamp: u64,
    map: &[(LdsKey, FrameMetadataField)],
    metadata: &mut FrameMetadata,
) {
    for &(tag, field) in map {
        let value = value_at(timeline, standard, tag, timestamp);
        if value.is_valid() {
            match to_metadata_value(&value) {
                Some(converted) => metadata.add(field, converted),
                None => warn!("field {:?} has no frame-level representation", field),
            }
        }
    }
}

// ----------------------------------------------------------------------------
fn project_0102(timeline: &Timeline, timestamp: u64, metadata: &mut FrameMetadata) {
    let standard = Standard::Misb0102;

    // A ST 0102 set may also ride embedded in ST 0601
    let embedded = value_at(
        timeline,
        Standard::Misb0601,
        st0601::tag::SECURITY_LOCAL_SET,
        timestamp,
    );

    let tag_value = |tag: LdsKey| -> Value {
        let direct = value_at(timeline, standard, tag, timestamp);
        if direct.is_valid() {
            return direct;
        }
        embedded
            .as_local_set()
            .ok()
            .and_then(|set| set.find(tag).cloned())
            .unwrap_or_default()
    };

    let classification = tag_value(st0102::tag::SECURITY_CLASSIFICATION);
    if let Ok(value) = classification.as_enumeration() {
        metadata.add(
            FrameMetadataField::SecurityClassification,
            FrameMetadataValue::String(st0102::security_classification_name(value).to_owned()),
        );
    }
}

// ----------------------------------------------------------------------------
fn project_0104(timeline: &Timeline, timestamp: u64, metadata: &mut FrameMetadata) {
    use FrameMetadataField as F;
    let standard = Standard::Misb0104;

    static DIRECT_MAP: [(LdsKey, FrameMetadataField); 13] = [
        (st0104::tag::PLATFORM_HEADING_ANGLE, F::PlatformHeadingAngle),
        (st0104::tag::PLATFORM_PITCH_ANGLE, F::PlatformPitchAngle),
        (st0104::tag::PLATFORM_ROLL_ANGLE, F::PlatformRollAngle),
        (st0104::tag::DEVICE_DESIGNATION, F::PlatformDesignation),
        (st0104::tag::IMAGE_SOURCE_DEVICE, F::ImageSourceSensor),
        (st0104::tag::IMAGE_COORDINATE_SYSTEM, F::ImageCoordinateSystem),
        (st0104::tag::HORIZONTAL_FOV, F::SensorHorizontalFov),
        (st0104::tag::VERTICAL_FOV, F::SensorVerticalFov),
        (st0104::tag::SLANT_RANGE, F::SlantRange),
        (st0104::tag::TARGET_WIDTH, F::TargetWidth),
        (st0104::tag::SENSOR_ROLL_ANGLE, F::SensorRollAngle),
        (st0104::tag::ANGLE_TO_NORTH, F::AngleToNorth),
        (st0104::tag::OBLIQUITY_ANGLE, F::ObliquityAngle),
    ];
    apply_direct_map(timeline, standard, timestamp, &DIRECT_MAP, metadata);

    // The episode number is numeric here but textual downstream
    let episode = value_at(timeline, standard, st0104::tag::EPISODE_NUMBER, timestamp);
    if let Ok(value) = episode.as_f64() {
        metadata.add(
            F::MissionNumber,
            FrameMetadataValue::String(format!("{:.6}", value)),
        );
    }

    // Parse the datetime strings into UNIX microsecond timestamps
    for (tag, field) in [
        (st0104::tag::START_DATETIME, F::StartTimestamp),
        (st0104::tag::EVENT_START_DATETIME, F::EventStartTimestamp),
    ] {
        let value = value_at(timeline, standard, tag, timestamp);
        if let Ok(datetime) = value.as_str() {
            match st0104::datetime_to_unix_microseconds(datetime) {
                Ok(micros) => metadata.add(field, FrameMetadataValue::U64(micros)),
                Err(err) => warn!("bad 0104 datetime {:?}: {}", datetime, err),
            }
        }
    }

    // Sensor location
    if let Some(point) = parse_geo_point(
        timeline,
        standard,
        timestamp,
        &[st0104::tag::DEVICE_LATITUDE],
        &[st0104::tag::DEVICE_LONGITUDE],
        &[st0104::tag::DEVICE_ALTITUDE],
    ) {
        metadata.add(F::SensorLocation, FrameMetadataValue::GeoPoint(point));
    }

    // Frame center location
    if let Some(point) = parse_geo_point(
        timeline,
        standard,
        timestamp,
        &[st0104::tag::FRAME_CENTER_LATITUDE],
        &[st0104::tag::FRAME_CENTER_LONGITUDE],
        &[st0104::tag::FRAME_CENTER_ELEVATION],
    ) {
        metadata.add(F::FrameCenter, FrameMetadataValue::GeoPoint(point));
    }

    // Image frame corner point locations
    let corners = [
        (
            st0104::tag::CORNER_LATITUDE_POINT_1,
            st0104::tag::CORNER_LONGITUDE_POINT_1,
        ),
        (
            st0104::tag::CORNER_LATITUDE_POINT_2,
            st0104::tag::CORNER_LONGITUDE_POINT_2,
        ),
        (
            st0104::tag::CORNER_LATITUDE_POINT_3,
            st0104::tag::CORNER_LONGITUDE_POINT_3,
        ),
        (
            st0104::tag::CORNER_LATITUDE_POINT_4,
            st0104::tag::CORNER_LONGITUDE_POINT_4,
        ),
    ];
    let points: Vec<Option<GeoPoint>> = corners
        .iter()
        .map(|&(latitude, longitude)| {
            parse_geo_point(timeline, standard, timestamp, &[latitude], &[longitude], &[])
        })
        .collect();
    if points.iter().all(|point| point.is_some()) {
        metadata.add(
            F::CornerPoints,
            FrameMetadataValue::Polygon(GeoPolygon {
                points: points.into_iter().flatten().collect(),
            }),
        );
    }
}

// ----------------------------------------------------------------------------
fn project_0601(timeline: &Timeline, timestamp: u64, metadata: &mut FrameMetadata) {
    use FrameMetadataField as F;
    let standard = Standard::Misb0601;

    static DIRECT_MAP: [(LdsKey, FrameMetadataField); 41] = [
        (st0601::tag::MISSION_ID, F::MissionId),
        (st0601::tag::PLATFORM_TAIL_NUMBER, F::PlatformTailNumber),
        (st0601::tag::PLATFORM_HEADING_ANGLE, F::PlatformHeadingAngle),
        (st0601::tag::PLATFORM_PITCH_ANGLE, F::PlatformPitchAngle),
        (st0601::tag::PLATFORM_ROLL_ANGLE, F::PlatformRollAngle),
        (st0601::tag::PLATFORM_TRUE_AIRSPEED, F::PlatformTrueAirspeed),
        (
            st0601::tag::PLATFORM_INDICATED_AIRSPEED,
            F::PlatformIndicatedAirspeed,
        ),
        (st0601::tag::PLATFORM_DESIGNATION, F::PlatformDesignation),
        (st0601::tag::IMAGE_SOURCE_SENSOR, F::ImageSourceSensor),
        (st0601::tag::IMAGE_COORDINATE_SYSTEM, F::ImageCoordinateSystem),
        (st0601::tag::SENSOR_HORIZONTAL_FOV, F::SensorHorizontalFov),
        (st0601::tag::SENSOR_VERTICAL_FOV, F::SensorVerticalFov),
        (
            st0601::tag::SENSOR_RELATIVE_AZIMUTH_ANGLE,
            F::SensorRelativeAzimuthAngle,
        ),
        (
            st0601::tag::SENSOR_RELATIVE_ELEVATION_ANGLE,
            F::SensorRelativeElevationAngle,
        ),
        (
            st0601::tag::SENSOR_RELATIVE_ROLL_ANGLE,
            F::SensorRelativeRollAngle,
        ),
        (st0601::tag::SLANT_RANGE, F::SlantRange),
        (st0601::tag::TARGET_WIDTH, F::TargetWidth),
        (st0601::tag::TARGET_WIDTH_EXTENDED, F::TargetWidth),
        (st0601::tag::STATIC_PRESSURE, F::StaticPressure),
        (st0601::tag::DENSITY_ALTITUDE, F::DensityAltitude),
        (st0601::tag::DENSITY_ALTITUDE_EXTENDED, F::DensityAltitude),
        (st0601::tag::OUTSIDE_AIR_TEMPERATURE, F::OutsideAirTemperature),
        (st0601::tag::WIND_DIRECTION, F::WindDirection),
        (st0601::tag::WIND_SPEED, F::WindSpeed),
        (st0601::tag::TARGET_TRACK_GATE_WIDTH, F::TargetTrackGateWidth),
        (
            st0601::tag::TARGET_TRACK_GATE_HEIGHT,
            F::TargetTrackGateHeight,
        ),
        (
            st0601::tag::TARGET_ERROR_ESTIMATE_CE90,
            F::TargetErrorEstimateCe90,
        ),
        (
            st0601::tag::TARGET_ERROR_ESTIMATE_LE90,
            F::TargetErrorEstimateLe90,
        ),
        (st0601::tag::DIFFERENTIAL_PRESSURE, F::DifferentialPressure),
        (st0601::tag::PLATFORM_ANGLE_OF_ATTACK, F::PlatformAngleOfAttack),
        (st0601::tag::PLATFORM_VERTICAL_SPEED, F::PlatformVerticalSpeed),
        (st0601::tag::PLATFORM_SIDESLIP_ANGLE, F::PlatformSideslipAngle),
        (
            st0601::tag::AIRFIELD_BAROMETRIC_PRESSURE,
            F::AirfieldBarometricPressure,
        ),
        (st0601::tag::AIRFIELD_ELEVATION, F::AirfieldElevation),
        (st0601::tag::RELATIVE_HUMIDITY, F::RelativeHumidity),
        (st0601::tag::PLATFORM_GROUND_SPEED, F::PlatformGroundSpeed),
        (st0601::tag::GROUND_RANGE, F::GroundRange),
        (st0601::tag::PLATFORM_FUEL_REMAINING, F::PlatformFuelRemaining),
        (st0601::tag::PLATFORM_CALL_SIGN, F::PlatformCallSign),
        (st0601::tag::LASER_PRF_CODE, F::LaserPrfCode),
        (
            st0601::tag::PLATFORM_MAGNETIC_HEADING,
            F::PlatformMagneticHeading,
        ),
    ];
    apply_direct_map(timeline, standard, timestamp, &DIRECT_MAP, metadata);

    // Fields with dedicated treatment
    let event_start = value_at(timeline, standard, st0601::tag::EVENT_START_TIME, timestamp);
    if let Ok(value) = event_start.as_u64() {
        metadata.add(F::EventStartTimestamp, FrameMetadataValue::U64(value));
    }
    let version = value_at(timeline, standard, st0601::tag::VERSION_NUMBER, timestamp);
    if let Ok(value) = version.as_u64() {
        metadata.add(F::UasLdsVersionNumber, FrameMetadataValue::U64(value));
    }
    for (tag, field) in [
        (st0601::tag::ICING_DETECTED, F::IcingDetected),
        (st0601::tag::SENSOR_FOV_NAME, F::SensorFovName),
    ] {
        let value = value_at(timeline, standard, tag, timestamp);
        if let Ok(value) = value.as_enumeration() {
            metadata.add(field, FrameMetadataValue::U64(value));
        }
    }

    // Sensor location, preferring the extended-precision height tags
    if let Some(point) = parse_geo_point(
        timeline,
        standard,
        timestamp,
        &[st0601::tag::SENSOR_LATITUDE],
        &[st0601::tag::SENSOR_LONGITUDE],
        &[
            st0601::tag::SENSOR_ELLIPSOID_HEIGHT_EXTENDED,
            st0601::tag::SENSOR_ELLIPSOID_HEIGHT,
            st0601::tag::SENSOR_TRUE_ALTITUDE,
        ],
    ) {
        metadata.add(F::SensorLocation, FrameMetadataValue::GeoPoint(point));
    }

    // Frame center location
    if let Some(point) = parse_geo_point(
        timeline,
        standard,
        timestamp,
        &[st0601::tag::FRAME_CENTER_LATITUDE],
        &[st0601::tag::FRAME_CENTER_LONGITUDE],
        &[
            st0601::tag::FRAME_CENTER_HEIGHT_ABOVE_ELLIPSOID,
            st0601::tag::FRAME_CENTER_ELEVATION,
        ],
    ) {
        metadata.add(F::FrameCenter, FrameMetadataValue::GeoPoint(point));
    }

    // Target location
    let target_location = parse_geo_point(
        timeline,
        standard,
        timestamp,
        &[st0601::tag::TARGET_LOCATION_LATITUDE],
        &[st0601::tag::TARGET_LOCATION_LONGITUDE],
        &[st0601::tag::TARGET_LOCATION_ELEVATION],
    );
    if let Some(point) = target_location {
        metadata.add(F::TargetLocation, FrameMetadataValue::GeoPoint(point));
    }

    // Image frame corner point locations
    let full_corners = [
        (
            st0601::tag::FULL_CORNER_LATITUDE_POINT_1,
            st0601::tag::FULL_CORNER_LONGITUDE_POINT_1,
        ),
        (
            st0601::tag::FULL_CORNER_LATITUDE_POINT_2,
            st0601::tag::FULL_CORNER_LONGITUDE_POINT_2,
        ),
        (
            st0601::tag::FULL_CORNER_LATITUDE_POINT_3,
            st0601::tag::FULL_CORNER_LONGITUDE_POINT_3,
        ),
        (
            st0601::tag::FULL_CORNER_LATITUDE_POINT_4,
            st0601::tag::FULL_CORNER_LONGITUDE_POINT_4,
        ),
    ];
    let offset_corners = [
        (
            st0601::tag::OFFSET_CORNER_LATITUDE_POINT_1,
            st0601::tag::OFFSET_CORNER_LONGITUDE_POINT_1,
        ),
        (
            st0601::tag::OFFSET_CORNER_LATITUDE_POINT_2,
            st0601::tag::OFFSET_CORNER_LONGITUDE_POINT_2,
        ),
        (
            st0601::tag::OFFSET_CORNER_LATITUDE_POINT_3,
            st0601::tag::OFFSET_CORNER_LONGITUDE_POINT_3,
        ),
        (
            st0601::tag::OFFSET_CORNER_LATITUDE_POINT_4,
            st0601::tag::OFFSET_CORNER_LONGITUDE_POINT_4,
        ),
    ];
    let mut corner_points: Vec<Option<GeoPoint>> = full_corners
        .iter()
        .map(|&(latitude, longitude)| {
            parse_geo_point(timeline, standard, timestamp, &[latitude], &[longitude], &[])
        })
        .collect();

    // Reconstruct missing corners from the legacy offset tags
    if let Some(target) = target_location {
        for (corner, &(latitude, longitude)) in corner_points.iter_mut().zip(&offset_corners) {
            if corner.is_none() {
                if let Some(offset) =
                    parse_geo_point(timeline, standard, timestamp, &[latitude], &[longitude], &[])
                {
                    *corner = Some(GeoPoint {
                        latitude: target.latitude + offset.latitude,
                        longitude: target.longitude + offset.longitude,
                        elevation: f64::NAN,
                    });
                }
            }
        }
    }

    // Keep the quadrilateral only when every corner resolved
    if corner_points.iter().all(|point| point.is_some()) {
        metadata.add(
            F::CornerPoints,
            FrameMetadataValue::Polygon(GeoPolygon {
                points: corner_points.into_iter().flatten().collect(),
            }),
        );
    }
}

// ----------------------------------------------------------------------------
fn project_1108(timeline: &Timeline, timestamp: u64, metadata: &mut FrameMetadata) {
    let standard = Standard::Misb1108;

    static METRICS: [(&str, FrameMetadataField); 2] = [
        ("GSD", FrameMetadataField::AverageGsd),
        ("VNIIRS", FrameMetadataField::Vniirs),
    ];

    // Use the most recently calculated valid value of each supported metric
    for (name, field) in &METRICS {
        let mut best: Option<(u64, f64)> = None;
        for metric_value in
            timeline.all_at(standard, st1108::tag::METRIC_LOCAL_SET, timestamp)
        {
            let metric_set = match metric_value.as_local_set() {
                Ok(set) => set,
                Err(_) => continue,
            };
            let matches_name = metric_set
                .at(st1108::metric_tag::NAME)
                .ok()
                .and_then(|value| value.as_str().ok().cloned())
                .map(|metric_name| metric_name == *name)
                .unwrap_or(false);
            if !matches_name {
                continue;
            }
            let time = metric_set
                .at(st1108::metric_tag::TIME)
                .ok()
                .and_then(|value| value.as_u64().ok())
                .unwrap_or(0);
            let value = match metric_set
                .at(st1108::metric_tag::VALUE)
                .ok()
                .and_then(|value| value.as_f64().ok())
            {
                Some(value) => value,
                None => continue,
            };
            if best.map(|(best_time, _)| time > best_time).unwrap_or(true) {
                best = Some((time, value));
            }
        }
        if let Some((_, value)) = best {
            metadata.add(*field, FrameMetadataValue::F64(value));
        }
    }
}

// ----------------------------------------------------------------------------
/// Projects the timeline at `timestamp` into a [`FrameMetadata`] bag.
pub fn collect_frame_metadata(timeline: &Timeline, timestamp: u64) -> FrameMetadata {
    let mut metadata = FrameMetadata::new();
    metadata.add(
        FrameMetadataField::UnixTimestamp,
        FrameMetadataValue::U64(timestamp),
    );
    project_0102(timeline, timestamp, &mut metadata);
    project_0104(timeline, timestamp, &mut metadata);
    project_0601(timeline, timestamp, &mut metadata);
    project_1108(timeline, timestamp, &mut metadata);
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::st0601::tag as t0601;
    use crate::{Demuxer, KlvPacket, LocalSet};

    #[test]
    fn security_classification_merges_from_embedded_0102() {
        let mut timeline = Timeline::new();
        let mut demuxer = Demuxer::new(&mut timeline);

        let mut security = LocalSet::new();
        security.add(
            crate::st0102::tag::SECURITY_CLASSIFICATION,
            ValueData::Enumeration(1),
        );
        let mut set = LocalSet::new();
        set.add(t0601::PRECISION_TIMESTAMP, 1_000_u64);
        set.add(t0601::SECURITY_LOCAL_SET, security);
        demuxer.demux_packet(&KlvPacket::new(crate::st0601::key(), set));

        let metadata = collect_frame_metadata(&timeline, 1_000);
        assert_eq!(
            metadata.get(FrameMetadataField::SecurityClassification),
            Some(&FrameMetadataValue::String("Unclassified".to_owned()))
        );
    }

    #[test]
    fn corner_points_fall_back_to_offsets() {
        let mut timeline = Timeline::new();
        let mut demuxer = Demuxer::new(&mut timeline);

        let mut set = LocalSet::new();
        set.add(t0601::PRECISION_TIMESTAMP, 1_000_u64);
        set.add(t0601::TARGET_LOCATION_LATITUDE, 38.0_f64);
        set.add(t0601::TARGET_LOCATION_LONGITUDE, -77.0_f64);
        set.add(t0601::TARGET_LOCATION_ELEVATION, 100.0_f64);
        for latitude_tag in [
            t0601::OFFSET_CORNER_LATITUDE_POINT_1,
            t0601::OFFSET_CORNER_LATITUDE_POINT_2,
            t0601::OFFSET_CORNER_LATITUDE_POINT_3,
            t0601::OFFSET_CORNER_LATITUDE_POINT_4,
        ] {
            set.add(latitude_tag, 0.01_f64);
        }
        for longitude_tag in [
            t0601::OFFSET_CORNER_LONGITUDE_POINT_1,
            t0601::OFFSET_CORNER_LONGITUDE_POINT_2,
            t0601::OFFSET_CORNER_LONGITUDE_POINT_3,
            t0601::OFFSET_CORNER_LONGITUDE_POINT_4,
        ] {
            set.add(longitude_tag, -0.02_f64);
        }
        demuxer.demux_packet(&KlvPacket::new(crate::st0601::key(), set));

        let metadata = collect_frame_metadata(&timeline, 1_000);
        match metadata.get(FrameMetadataField::CornerPoints) {
            Some(FrameMetadataValue::Polygon(polygon)) => {
                assert_eq!(polygon.points.len(), 4);
                assert!((polygon.points[0].latitude - 38.01).abs() < 1e-9);
                assert!((polygon.points[0].longitude + 77.02).abs() < 1e-9);
            }
            other => panic!("expected corner points, found {:?}", other),
        }
    }

    #[test]
    fn freshest_metric_wins() {
        let mut timeline = Timeline::new();
        let metric = |time: u64, value: f64| {
            let mut set = LocalSet::new();
            set.add(crate::st1108::metric_tag::NAME, "VNIIRS");
            set.add(crate::st1108::metric_tag::TIME, time);
            set.add(crate::st1108::metric_tag::VALUE, value);
            Value::from(set)
        };
        timeline
            .entry(Standard::Misb1108, crate::st1108::tag::METRIC_LOCAL_SET, 0)
            .set(crate::Interval::new(0, 10_000), metric(1_000, 5.0));
        timeline
            .entry(Standard::Misb1108, crate::st1108::tag::METRIC_LOCAL_SET, 1)
            .set(crate::Interval::new(0, 10_000), metric(2_000, 6.0));

        let metadata = collect_frame_metadata(&timeline, 5_000);
        assert_eq!(
            metadata.get(FrameMetadataField::Vniirs),
            Some(&FrameMetadataValue::F64(6.0))
        );
        assert!(!metadata.has(FrameMetadataField::AverageGsd));
    }
}
