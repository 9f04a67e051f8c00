//! MISB ST 0601 UAS Datalink Local Set.
//!
//! The workhorse standard of UAS motion imagery: one local set per metadata
//! update, opened by a precision timestamp and closed by a 16-bit running
//! sum checksum. Alongside the plain scalar tags this module models the
//! record packs the timeline machinery cares about: control commands, the
//! sensor frame rate pack, country codes, and the wavelength / payload /
//! waypoint lists.

use super::checksum::{ChecksumAlgorithm, ChecksumPacketFormat};
use super::codec::{
    ber_length, ber_oid_length, read_ber, read_ber_oid, read_imap, read_sint, read_string,
    read_uint, string_length, write_ber, write_ber_oid, write_imap, write_sint, write_string,
    write_uint,
};
use super::format::{cast_error, FormatImpl, KlvFormat};
use super::format::{
    BlobFormat, EnumFormat, FloatFormat, ImapFormat, SflintFormat, SintFormat, StringFormat,
    U64ListFormat, UflintFormat, UintFormat,
};
use super::key::{LdsKey, UdsKey};
use super::set::LocalSetFormat;
use super::st1204::MiisIdFormat;
use super::tag_traits::{TagCountRange, TagTraits, TagTraitsLookup};
use super::value::ValueData;
use super::{st0102, st0806, st0903};
use super::{Error, ErrorDetails, Result, SliceReader, SliceWriter};
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

/// Local set tags defined by ST 0601.17.
pub mod tag {
    use super::LdsKey;

    /// Unknown tag.
    pub const UNKNOWN: LdsKey = 0;
    /// Checksum.
    pub const CHECKSUM: LdsKey = 1;
    /// Precision timestamp.
    pub const PRECISION_TIMESTAMP: LdsKey = 2;
    /// Mission ID.
    pub const MISSION_ID: LdsKey = 3;
    /// Platform tail number.
    pub const PLATFORM_TAIL_NUMBER: LdsKey = 4;
    /// Platform heading angle.
    pub const PLATFORM_HEADING_ANGLE: LdsKey = 5;
    /// Platform pitch angle.
    pub const PLATFORM_PITCH_ANGLE: LdsKey = 6;
    /// Platform roll angle.
    pub const PLATFORM_ROLL_ANGLE: LdsKey = 7;
    /// Platform true airspeed.
    pub const PLATFORM_TRUE_AIRSPEED: LdsKey = 8;
    /// Platform indicated airspeed.
    pub const PLATFORM_INDICATED_AIRSPEED: LdsKey = 9;
    /// Platform designation.
    pub const PLATFORM_DESIGNATION: LdsKey = 10;
    /// Image source sensor.
    pub const IMAGE_SOURCE_SENSOR: LdsKey = 11;
    /// Image coordinate system.
    pub const IMAGE_COORDINATE_SYSTEM: LdsKey = 12;
    /// Sensor latitude.
    pub const SENSOR_LATITUDE: LdsKey = 13;
    /// Sensor longitude.
    pub const SENSOR_LONGITUDE: LdsKey = 14;
    /// Sensor true altitude.
    pub const SENSOR_TRUE_ALTITUDE: LdsKey = 15;
    /// Sensor horizontal field of view.
    pub const SENSOR_HORIZONTAL_FOV: LdsKey = 16;
    /// Sensor vertical field of view.
    pub const SENSOR_VERTICAL_FOV: LdsKey = 17;
    /// Sensor relative azimuth angle.
    pub const SENSOR_RELATIVE_AZIMUTH_ANGLE: LdsKey = 18;
    /// Sensor relative elevation angle.
    pub const SENSOR_RELATIVE_ELEVATION_ANGLE: LdsKey = 19;
    /// Sensor relative roll angle.
    pub const SENSOR_RELATIVE_ROLL_ANGLE: LdsKey = 20;
    /// Slant range.
    pub const SLANT_RANGE: LdsKey = 21;
    /// Target width.
    pub const TARGET_WIDTH: LdsKey = 22;
    /// Frame center latitude.
    pub const FRAME_CENTER_LATITUDE: LdsKey = 23;
    /// Frame center longitude.
    pub const FRAME_CENTER_LONGITUDE: LdsKey = 24;
    /// Frame center elevation.
    pub const FRAME_CENTER_ELEVATION: LdsKey = 25;
    /// Offset corner latitude, point 1.
    pub const OFFSET_CORNER_LATITUDE_POINT_1: LdsKey = 26;
    /// Offset corner longitude, point 1.
    pub const OFFSET_CORNER_LONGITUDE_POINT_1: LdsKey = 27;
    /// Offset corner latitude, point 2.
    pub const OFFSET_CORNER_LATITUDE_POINT_2: LdsKey = 28;
    /// Offset corner longitude, point 2.
    pub const OFFSET_CORNER_LONGITUDE_POINT_2: LdsKey = 29;
    /// Offset corner latitude, point 3.
    pub const OFFSET_CORNER_LATITUDE_POINT_3: LdsKey = 30;
    /// Offset corner longitude, point 3.
    pub const OFFSET_CORNER_LONGITUDE_POINT_3: LdsKey = 31;
    /// Offset corner latitude, point 4.
    pub const OFFSET_CORNER_LATITUDE_POINT_4: LdsKey = 32;
    /// Offset corner longitude, point 4.
    pub const OFFSET_CORNER_LONGITUDE_POINT_4: LdsKey = 33;
    /// Icing detected.
    pub const ICING_DETECTED: LdsKey = 34;
    /// Wind direction.
    pub const WIND_DIRECTION: LdsKey = 35;
    /// Wind speed.
    pub const WIND_SPEED: LdsKey = 36;
    /// Static pressure.
    pub const STATIC_PRESSURE: LdsKey = 37;
    /// Density altitude.
    pub const DENSITY_ALTITUDE: LdsKey = 38;
    /// Outside air temperature.
    pub const OUTSIDE_AIR_TEMPERATURE: LdsKey = 39;
    /// Target location latitude.
    pub const TARGET_LOCATION_LATITUDE: LdsKey = 40;
    /// Target location longitude.
    pub const TARGET_LOCATION_LONGITUDE: LdsKey = 41;
    /// Target location elevation.
    pub const TARGET_LOCATION_ELEVATION: LdsKey = 42;
    /// Target track gate width.
    pub const TARGET_TRACK_GATE_WIDTH: LdsKey = 43;
    /// Target track gate height.
    pub const TARGET_TRACK_GATE_HEIGHT: LdsKey = 44;
    /// Target error estimate, CE90.
    pub const TARGET_ERROR_ESTIMATE_CE90: LdsKey = 45;
    /// Target error estimate, LE90.
    pub const TARGET_ERROR_ESTIMATE_LE90: LdsKey = 46;
    /// Generic flag data.
    pub const GENERIC_FLAG_DATA: LdsKey = 47;
    /// Security local set (ST 0102).
    pub const SECURITY_LOCAL_SET: LdsKey = 48;
    /// Differential pressure.
    pub const DIFFERENTIAL_PRESSURE: LdsKey = 49;
    /// Platform angle of attack.
    pub const PLATFORM_ANGLE_OF_ATTACK: LdsKey = 50;
    /// Platform vertical speed.
    pub const PLATFORM_VERTICAL_SPEED: LdsKey = 51;
    /// Platform sideslip angle.
    pub const PLATFORM_SIDESLIP_ANGLE: LdsKey = 52;
    /// Airfield barometric pressure.
    pub const AIRFIELD_BAROMETRIC_PRESSURE: LdsKey = 53;
    /// Airfield elevation.
    pub const AIRFIELD_ELEVATION: LdsKey = 54;
    /// Relative humidity.
    pub const RELATIVE_HUMIDITY: LdsKey = 55;
    /// Platform ground speed.
    pub const PLATFORM_GROUND_SPEED: LdsKey = 56;
    /// Ground range.
    pub const GROUND_RANGE: LdsKey = 57;
    /// Platform fuel remaining.
    pub const PLATFORM_FUEL_REMAINING: LdsKey = 58;
    /// Platform call sign.
    pub const PLATFORM_CALL_SIGN: LdsKey = 59;
    /// Weapon load.
    pub const WEAPON_LOAD: LdsKey = 60;
    /// Weapon fired.
    pub const WEAPON_FIRED: LdsKey = 61;
    /// Laser PRF code.
    pub const LASER_PRF_CODE: LdsKey = 62;
    /// Sensor field of view name.
    pub const SENSOR_FOV_NAME: LdsKey = 63;
    /// Platform magnetic heading.
    pub const PLATFORM_MAGNETIC_HEADING: LdsKey = 64;
    /// UAS datalink LS version number.
    pub const VERSION_NUMBER: LdsKey = 65;
    /// Deprecated tag.
    pub const DEPRECATED: LdsKey = 66;
    /// Alternate platform latitude.
    pub const ALTERNATE_PLATFORM_LATITUDE: LdsKey = 67;
    /// Alternate platform longitude.
    pub const ALTERNATE_PLATFORM_LONGITUDE: LdsKey = 68;
    /// Alternate platform altitude.
    pub const ALTERNATE_PLATFORM_ALTITUDE: LdsKey = 69;
    /// Alternate platform name.
    pub const ALTERNATE_PLATFORM_NAME: LdsKey = 70;
    /// Alternate platform heading.
    pub const ALTERNATE_PLATFORM_HEADING: LdsKey = 71;
    /// Event start time.
    pub const EVENT_START_TIME: LdsKey = 72;
    /// RVT local set (ST 0806).
    pub const RVT_LOCAL_SET: LdsKey = 73;
    /// VMTI local set (ST 0903).
    pub const VMTI_LOCAL_SET: LdsKey = 74;
    /// Sensor ellipsoid height.
    pub const SENSOR_ELLIPSOID_HEIGHT: LdsKey = 75;
    /// Alternate platform ellipsoid height.
    pub const ALTERNATE_PLATFORM_ELLIPSOID_HEIGHT: LdsKey = 76;
    /// Operational mode.
    pub const OPERATIONAL_MODE: LdsKey = 77;
    /// Frame center height above ellipsoid.
    pub const FRAME_CENTER_HEIGHT_ABOVE_ELLIPSOID: LdsKey = 78;
    /// Sensor north velocity.
    pub const SENSOR_NORTH_VELOCITY: LdsKey = 79;
    /// Sensor east velocity.
    pub const SENSOR_EAST_VELOCITY: LdsKey = 80;
    /// Image horizon pixel pack.
    pub const IMAGE_HORIZON_PIXEL_PACK: LdsKey = 81;
    /// Full corner latitude, point 1.
    pub const FULL_CORNER_LATITUDE_POINT_1: LdsKey = 82;
    /// Full corner longitude, point 1.
    pub const FULL_CORNER_LONGITUDE_POINT_1: LdsKey = 83;
    /// Full corner latitude, point 2.
    pub const FULL_CORNER_LATITUDE_POINT_2: LdsKey = 84;
    /// Full corner longitude, point 2.
    pub const FULL_CORNER_LONGITUDE_POINT_2: LdsKey = 85;
    /// Full corner latitude, point 3.
    pub const FULL_CORNER_LATITUDE_POINT_3: LdsKey = 86;
    /// Full corner longitude, point 3.
    pub const FULL_CORNER_LONGITUDE_POINT_3: LdsKey = 87;
    /// Full corner latitude, point 4.
    pub const FULL_CORNER_LATITUDE_POINT_4: LdsKey = 88;
    /// Full corner longitude, point 4.
    pub const FULL_CORNER_LONGITUDE_POINT_4: LdsKey = 89;
    /// Full platform pitch angle.
    pub const FULL_PLATFORM_PITCH_ANGLE: LdsKey = 90;
    /// Full platform roll angle.
    pub const FULL_PLATFORM_ROLL_ANGLE: LdsKey = 91;
    /// Full platform angle of attack.
    pub const FULL_PLATFORM_ANGLE_OF_ATTACK: LdsKey = 92;
    /// Full platform sideslip angle.
    pub const FULL_PLATFORM_SIDESLIP_ANGLE: LdsKey = 93;
    /// MIIS core identifier (ST 1204).
    pub const MIIS_CORE_IDENTIFIER: LdsKey = 94;
    /// SAR motion imagery local set.
    pub const SAR_MOTION_IMAGERY_LOCAL_SET: LdsKey = 95;
    /// Target width extended.
    pub const TARGET_WIDTH_EXTENDED: LdsKey = 96;
    /// Range image local set.
    pub const RANGE_IMAGE_LOCAL_SET: LdsKey = 97;
    /// Geo-registration local set.
    pub const GEOREGISTRATION_LOCAL_SET: LdsKey = 98;
    /// Composite imaging local set.
    pub const COMPOSITE_IMAGING_LOCAL_SET: LdsKey = 99;
    /// Segment local set.
    pub const SEGMENT_LOCAL_SET: LdsKey = 100;
    /// Amend local set.
    pub const AMEND_LOCAL_SET: LdsKey = 101;
    /// SDCC-FLP error pack.
    pub const SDCC_FLP: LdsKey = 102;
    /// Density altitude extended.
    pub const DENSITY_ALTITUDE_EXTENDED: LdsKey = 103;
    /// Sensor ellipsoid height extended.
    pub const SENSOR_ELLIPSOID_HEIGHT_EXTENDED: LdsKey = 104;
    /// Alternate platform ellipsoid height extended.
    pub const ALTERNATE_PLATFORM_ELLIPSOID_HEIGHT_EXTENDED: LdsKey = 105;
    /// Stream designator.
    pub const STREAM_DESIGNATOR: LdsKey = 106;
    /// Operational base.
    pub const OPERATIONAL_BASE: LdsKey = 107;
    /// Broadcast source.
    pub const BROADCAST_SOURCE: LdsKey = 108;
    /// Range to recovery location.
    pub const RANGE_TO_RECOVERY_LOCATION: LdsKey = 109;
    /// Time airborne.
    pub const TIME_AIRBORNE: LdsKey = 110;
    /// Propulsion unit speed.
    pub const PROPULSION_UNIT_SPEED: LdsKey = 111;
    /// Platform course angle.
    pub const PLATFORM_COURSE_ANGLE: LdsKey = 112;
    /// Altitude above ground level.
    pub const ALTITUDE_ABOVE_GROUND_LEVEL: LdsKey = 113;
    /// Radar altimeter.
    pub const RADAR_ALTIMETER: LdsKey = 114;
    /// Control command.
    pub const CONTROL_COMMAND: LdsKey = 115;
    /// Control command verification list.
    pub const CONTROL_COMMAND_VERIFICATION_LIST: LdsKey = 116;
    /// Sensor azimuth rate.
    pub const SENSOR_AZIMUTH_RATE: LdsKey = 117;
    /// Sensor elevation rate.
    pub const SENSOR_ELEVATION_RATE: LdsKey = 118;
    /// Sensor roll rate.
    pub const SENSOR_ROLL_RATE: LdsKey = 119;
    /// On-board MI storage percent full.
    pub const ONBOARD_MI_STORAGE_PERCENT_FULL: LdsKey = 120;
    /// Active wavelength list.
    pub const ACTIVE_WAVELENGTH_LIST: LdsKey = 121;
    /// Country codes.
    pub const COUNTRY_CODES: LdsKey = 122;
    /// Number of NAVSATs in view.
    pub const NUMBER_OF_NAVSATS_IN_VIEW: LdsKey = 123;
    /// Positioning method source.
    pub const POSITIONING_METHOD_SOURCE: LdsKey = 124;
    /// Platform status.
    pub const PLATFORM_STATUS: LdsKey = 125;
    /// Sensor control mode.
    pub const SENSOR_CONTROL_MODE: LdsKey = 126;
    /// Sensor frame rate pack.
    pub const SENSOR_FRAME_RATE_PACK: LdsKey = 127;
    /// Wavelengths list.
    pub const WAVELENGTHS_LIST: LdsKey = 128;
    /// Target ID.
    pub const TARGET_ID: LdsKey = 129;
    /// Airbase locations.
    pub const AIRBASE_LOCATIONS: LdsKey = 130;
    /// Take-off time.
    pub const TAKEOFF_TIME: LdsKey = 131;
    /// Transmission frequency.
    pub const TRANSMISSION_FREQUENCY: LdsKey = 132;
    /// On-board MI storage capacity.
    pub const ONBOARD_MI_STORAGE_CAPACITY: LdsKey = 133;
    /// Zoom percentage.
    pub const ZOOM_PERCENTAGE: LdsKey = 134;
    /// Communications method.
    pub const COMMUNICATIONS_METHOD: LdsKey = 135;
    /// Leap seconds.
    pub const LEAP_SECONDS: LdsKey = 136;
    /// Correction offset.
    pub const CORRECTION_OFFSET: LdsKey = 137;
    /// Payload list.
    pub const PAYLOAD_LIST: LdsKey = 138;
    /// Active payloads.
    pub const ACTIVE_PAYLOADS: LdsKey = 139;
    /// Weapons stores.
    pub const WEAPONS_STORES: LdsKey = 140;
    /// Waypoint list.
    pub const WAYPOINT_LIST: LdsKey = 141;
    /// View domain.
    pub const VIEW_DOMAIN: LdsKey = 142;
}

/// Member names for the icing detected enumeration.
pub static ICING_DETECTED_NAMES: [&str; 3] =
    ["Detector off", "No icing detected", "Icing detected"];

/// Member names for the discrete sensor field of view enumeration.
pub static SENSOR_FOV_NAMES: [&str; 9] = [
    "Ultranarrow",
    "Narrow",
    "Medium",
    "Wide",
    "Ultrawide",
    "Narrow Medium",
    "2x Ultranarrow",
    "4x Ultranarrow",
    "Continuous Zoom",
];

/// Member names for the operational mode enumeration.
pub static OPERATIONAL_MODE_NAMES: [&str; 6] = [
    "Other",
    "Operational",
    "Training",
    "Exercise",
    "Maintenance",
    "Test",
];

/// Member names for the platform status enumeration.
pub static PLATFORM_STATUS_NAMES: [&str; 13] = [
    "Active",
    "Pre-flight",
    "Pre-flight taxiing",
    "Run-up",
    "Take-off",
    "Ingress",
    "Manual operation",
    "Automated orbit",
    "Transitioning",
    "Egress",
    "Landing",
    "Landing taxiing",
    "Landed parked",
];

/// Member names for the sensor control mode enumeration.
pub static SENSOR_CONTROL_MODE_NAMES: [&str; 7] = [
    "Off",
    "Home position",
    "Uncontrolled",
    "Manual control",
    "Calibrating",
    "Auto holding position",
    "Auto tracking",
];

// ----------------------------------------------------------------------------
/// Record of a command sent to the UAV.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ControlCommand {
    /// Identifier unique to this command within the stream.
    pub id: u16,
    /// The commanded operation, as free text.
    pub message: String,
    /// Time of commit to the command, in microseconds; zero when not
    /// reported.
    pub timestamp: u64,
}

impl Display for ControlCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ ID: {}, Message: \"{}\", Timestamp: {} }}",
            self.id, self.message, self.timestamp
        )
    }
}

/// Interprets data as a ST 0601 control command pack.
#[derive(Clone, Default)]
pub struct ControlCommandFormat;

impl ControlCommandFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

impl FormatImpl for ControlCommandFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "control command of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, _length: usize) -> Result<ValueData> {
        let remaining = reader.remaining_len();
        let id = read_ber_oid(reader, remaining)?;
        let id = u16::try_from(id).map_err(|_| reader.make_error(ErrorDetails::TypeOverflow))?;
        let remaining = reader.remaining_len();
        let message_length = read_ber(reader, remaining)? as usize;
        if message_length > reader.remaining_len() {
            return Err(reader.make_error(ErrorDetails::BufferOverrun(message_length)));
        }
        let message = read_string(reader, message_length)?;
        let timestamp = match reader.remaining_len() {
            0 => 0,
            8 => read_uint(reader, 8)?,
            other => return Err(reader.make_error(ErrorDetails::BufferOverrun(other))),
        };
        Ok(ValueData::ControlCommand(ControlCommand {
            id,
            message,
            timestamp,
        }))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        let command = match data {
            ValueData::ControlCommand(command) => command,
            _ => return Err(cast_error("ControlCommand", data)),
        };
        let remaining = writer.remaining_len();
        write_ber_oid(u64::from(command.id), writer, remaining)?;
        let remaining = writer.remaining_len();
        write_ber(string_length(&command.message) as u64, writer, remaining)?;
        write_string(&command.message, writer)?;
        if command.timestamp != 0 {
            write_uint(command.timestamp, writer, 8)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        let command = match data {
            ValueData::ControlCommand(command) => command,
            _ => return Err(cast_error("ControlCommand", data)),
        };
        let message_length = string_length(&command.message);
        Ok(ber_oid_length(u64::from(command.id))
            + ber_length(message_length as u64)
            + message_length
            + if command.timestamp != 0 { 8 } else { 0 })
    }
}

// ----------------------------------------------------------------------------
/// Frame rate expressed as a ratio of integers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameRate {
    /// Frames per `denominator` seconds.
    pub numerator: u32,
    /// Time base; 1 for integral rates.
    pub denominator: u32,
}

impl Display for FrameRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

/// Interprets data as a ST 0601 sensor frame rate pack.
#[derive(Clone, Default)]
pub struct FrameRateFormat;

impl FrameRateFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

impl FormatImpl for FrameRateFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "frame rate of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, _length: usize) -> Result<ValueData> {
        let remaining = reader.remaining_len();
        let numerator = read_ber_oid(reader, remaining)?;
        let denominator = if reader.remaining_len() > 0 {
            let remaining = reader.remaining_len();
            read_ber_oid(reader, remaining)?
        } else {
            1
        };
        let numerator =
            u32::try_from(numerator).map_err(|_| reader.make_error(ErrorDetails::TypeOverflow))?;
        let denominator = u32::try_from(denominator)
            .map_err(|_| reader.make_error(ErrorDetails::TypeOverflow))?;
        Ok(ValueData::FrameRate(FrameRate {
            numerator,
            denominator,
        }))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        let rate = match data {
            ValueData::FrameRate(rate) => rate,
            _ => return Err(cast_error("FrameRate", data)),
        };
        let remaining = writer.remaining_len();
        write_ber_oid(u64::from(rate.numerator), writer, remaining)?;
        if rate.denominator != 1 {
            let remaining = writer.remaining_len();
            write_ber_oid(u64::from(rate.denominator), writer, remaining)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        let rate = match data {
            ValueData::FrameRate(rate) => rate,
            _ => return Err(cast_error("FrameRate", data)),
        };
        Ok(ber_oid_length(u64::from(rate.numerator))
            + if rate.denominator != 1 {
                ber_oid_length(u64::from(rate.denominator))
            } else {
                0
            })
    }
}

// ----------------------------------------------------------------------------
/// Record of the involvement of various countries in production of the FMV.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CountryCodes {
    /// The ST 0102 country coding method the codes below use.
    pub coding_method: u64,
    /// Country over which the platform was flying.
    pub overflight_country: Option<String>,
    /// Country operating the platform.
    pub operator_country: Option<String>,
    /// Country in which the platform was manufactured.
    pub country_of_manufacture: Option<String>,
}

impl Display for CountryCodes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ Coding Method: {}", self.coding_method)?;
        if let Some(country) = &self.overflight_country {
            write!(f, ", Overflight Country: \"{}\"", country)?;
        }
        if let Some(country) = &self.operator_country {
            write!(f, ", Operator Country: \"{}\"", country)?;
        }
        if let Some(country) = &self.country_of_manufacture {
            write!(f, ", Country of Manufacture: \"{}\"", country)?;
        }
        write!(f, " }}")
    }
}

/// Interprets data as a ST 0601 country codes pack: the coding method
/// followed by up to three length-prefixed country strings, with trailing
/// entries omissible and zero lengths marking interior omissions.
#[derive(Clone, Default)]
pub struct CountryCodesFormat;

impl CountryCodesFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

fn read_optional_string(reader: &mut SliceReader<'_>) -> Result<Option<String>> {
    if reader.remaining_len() == 0 {
        return Ok(None);
    }
    let remaining = reader.remaining_len();
    let length = read_ber(reader, remaining)? as usize;
    if length == 0 {
        return Ok(None);
    }
    if length > reader.remaining_len() {
        return Err(reader.make_error(ErrorDetails::BufferOverrun(length)));
    }
    Ok(Some(read_string(reader, length)?))
}

impl FormatImpl for CountryCodesFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "country codes of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, _length: usize) -> Result<ValueData> {
        let remaining = reader.remaining_len();
        let coding_method = read_ber_oid(reader, remaining)?;
        let overflight_country = read_optional_string(reader)?;
        let operator_country = read_optional_string(reader)?;
        let country_of_manufacture = read_optional_string(reader)?;
        Ok(ValueData::CountryCodes(CountryCodes {
            coding_method,
            overflight_country,
            operator_country,
            country_of_manufacture,
        }))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        let codes = match data {
            ValueData::CountryCodes(codes) => codes,
            _ => return Err(cast_error("CountryCodes", data)),
        };
        let remaining = writer.remaining_len();
        write_ber_oid(codes.coding_method, writer, remaining)?;
        let fields = [
            &codes.overflight_country,
            &codes.operator_country,
            &codes.country_of_manufacture,
        ];
        let last_present = fields.iter().rposition(|field| field.is_some());
        if let Some(last) = last_present {
            for field in &fields[..=last] {
                match field {
                    Some(country) => {
                        let remaining = writer.remaining_len();
                        write_ber(string_length(country) as u64, writer, remaining)?;
                        write_string(country, writer)?;
                    }
                    None => {
                        let remaining = writer.remaining_len();
                        write_ber(0, writer, remaining)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        let codes = match data {
            ValueData::CountryCodes(codes) => codes,
            _ => return Err(cast_error("CountryCodes", data)),
        };
        let mut total = ber_oid_length(codes.coding_method);
        let fields = [
            &codes.overflight_country,
            &codes.operator_country,
            &codes.country_of_manufacture,
        ];
        if let Some(last) = fields.iter().rposition(|field| field.is_some()) {
            for field in &fields[..=last] {
                total += match field {
                    Some(country) => {
                        ber_length(string_length(country) as u64) + string_length(country)
                    }
                    None => 1,
                };
            }
        }
        Ok(total)
    }
}

// ----------------------------------------------------------------------------
/// One sensed wavelength band of the platform's payload.
#[derive(Debug, Clone)]
pub struct WavelengthRecord {
    /// Identifier referenced by other tags.
    pub id: u64,
    /// Lower bound of the band, in nanometers.
    pub min: f64,
    /// Upper bound of the band, in nanometers.
    pub max: f64,
    /// Short descriptive name (e.g. "NIR", "MWIR").
    pub name: String,
}

impl PartialEq for WavelengthRecord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WavelengthRecord {}

impl PartialOrd for WavelengthRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WavelengthRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.min.total_cmp(&other.min))
            .then_with(|| self.max.total_cmp(&other.max))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl Display for WavelengthRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ ID: {}, Min: {} nm, Max: {} nm, Name: \"{}\" }}",
            self.id, self.min, self.max, self.name
        )
    }
}

const WAVELENGTH_BOUNDS: (f64, f64) = (0.0, 1.0e9);

/// Interprets data as the ST 0601 wavelengths list: a sequence of
/// BER-length-prefixed wavelength records.
#[derive(Clone, Default)]
pub struct WavelengthListFormat;

impl WavelengthListFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

impl FormatImpl for WavelengthListFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "wavelength list of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, _length: usize) -> Result<ValueData> {
        let (lo, hi) = WAVELENGTH_BOUNDS;
        let mut records = Vec::new();
        while reader.remaining_len() > 0 {
            let remaining = reader.remaining_len();
            let record_length = read_ber(reader, remaining)? as usize;
            let mut record = reader.sub_reader(record_length)?;
            let remaining = record.remaining_len();
            let id = read_ber_oid(&mut record, remaining)?;
            let min = read_imap(lo, hi, &mut record, 4)?;
            let max = read_imap(lo, hi, &mut record, 4)?;
            let remaining = record.remaining_len();
            let name = read_string(&mut record, remaining)?;
            records.push(WavelengthRecord { id, min, max, name });
        }
        Ok(ValueData::WavelengthList(records))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        let records = match data {
            ValueData::WavelengthList(records) => records,
            _ => return Err(cast_error("Vec<WavelengthRecord>", data)),
        };
        let (lo, hi) = WAVELENGTH_BOUNDS;
        for record in records {
            let record_length = ber_oid_length(record.id) + 8 + string_length(&record.name);
            let remaining = writer.remaining_len();
            write_ber(record_length as u64, writer, remaining)?;
            let remaining = writer.remaining_len();
            write_ber_oid(record.id, writer, remaining)?;
            write_imap(record.min, lo, hi, writer, 4)?;
            write_imap(record.max, lo, hi, writer, 4)?;
            write_string(&record.name, writer)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        let records = match data {
            ValueData::WavelengthList(records) => records,
            _ => return Err(cast_error("Vec<WavelengthRecord>", data)),
        };
        let mut total = 0;
        for record in records {
            let record_length = ber_oid_length(record.id) + 8 + string_length(&record.name);
            total += ber_length(record_length as u64) + record_length;
        }
        Ok(total)
    }
}

// ----------------------------------------------------------------------------
/// One payload carried by the platform.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PayloadRecord {
    /// Identifier referenced by the active payloads tag.
    pub id: u64,
    /// Kind of payload (0 = electro-optical MI sensor).
    pub payload_type: u64,
    /// Human-readable payload name.
    pub name: String,
}

impl Display for PayloadRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ ID: {}, Type: {}, Name: \"{}\" }}",
            self.id, self.payload_type, self.name
        )
    }
}

/// Interprets data as the ST 0601 payload list: a sequence of
/// BER-length-prefixed payload records.
#[derive(Clone, Default)]
pub struct PayloadListFormat;

impl PayloadListFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

impl FormatImpl for PayloadListFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "payload list of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, _length: usize) -> Result<ValueData> {
        let mut records = Vec::new();
        while reader.remaining_len() > 0 {
            let remaining = reader.remaining_len();
            let record_length = read_ber(reader, remaining)? as usize;
            let mut record = reader.sub_reader(record_length)?;
            let remaining = record.remaining_len();
            let id = read_ber_oid(&mut record, remaining)?;
            let remaining = record.remaining_len();
            let payload_type = read_ber_oid(&mut record, remaining)?;
            let remaining = record.remaining_len();
            let name = read_string(&mut record, remaining)?;
            records.push(PayloadRecord {
                id,
                payload_type,
                name,
            });
        }
        Ok(ValueData::PayloadList(records))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        let records = match data {
            ValueData::PayloadList(records) => records,
            _ => return Err(cast_error("Vec<PayloadRecord>", data)),
        };
        for record in records {
            let record_length = ber_oid_length(record.id)
                + ber_oid_length(record.payload_type)
                + string_length(&record.name);
            let remaining = writer.remaining_len();
            write_ber(record_length as u64, writer, remaining)?;
            let remaining = writer.remaining_len();
            write_ber_oid(record.id, writer, remaining)?;
            let remaining = writer.remaining_len();
            write_ber_oid(record.payload_type, writer, remaining)?;
            write_string(&record.name, writer)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        let records = match data {
            ValueData::PayloadList(records) => records,
            _ => return Err(cast_error("Vec<PayloadRecord>", data)),
        };
        let mut total = 0;
        for record in records {
            let record_length = ber_oid_length(record.id)
                + ber_oid_length(record.payload_type)
                + string_length(&record.name);
            total += ber_length(record_length as u64) + record_length;
        }
        Ok(total)
    }
}

// ----------------------------------------------------------------------------
/// One waypoint of the platform's flight plan.
#[derive(Debug, Clone)]
pub struct WaypointRecord {
    /// Identifier unique within the list.
    pub id: u64,
    /// Prosecution order; negative values mean "not prosecuted".
    pub prosecution_order: i16,
    /// Bit 0: automated mode, bit 1: adhoc source.
    pub info: u8,
    /// Waypoint location as (latitude, longitude, height above ellipsoid),
    /// when reported.
    pub location: Option<(f64, f64, f64)>,
}

impl PartialEq for WaypointRecord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WaypointRecord {}

impl PartialOrd for WaypointRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WaypointRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        fn location_key(record: &WaypointRecord) -> (u8, [u64; 3]) {
            match record.location {
                None => (0, [0; 3]),
                Some((lat, lon, alt)) => (
                    1,
                    [
                        lat.to_bits() ^ (1 << 63),
                        lon.to_bits() ^ (1 << 63),
                        alt.to_bits() ^ (1 << 63),
                    ],
                ),
            }
        }
        self.id
            .cmp(&other.id)
            .then_with(|| self.prosecution_order.cmp(&other.prosecution_order))
            .then_with(|| self.info.cmp(&other.info))
            .then_with(|| location_key(self).cmp(&location_key(other)))
    }
}

impl Display for WaypointRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ ID: {}, Prosecution Order: {}, Info: {:#04X}",
            self.id, self.prosecution_order, self.info
        )?;
        if let Some((latitude, longitude, height)) = self.location {
            write!(
                f,
                ", Location: ({} degrees, {} degrees, {} m)",
                latitude, longitude, height
            )?;
        }
        write!(f, " }}")
    }
}

/// Interprets data as the ST 0601 waypoint list: a sequence of
/// BER-length-prefixed waypoint records.
#[derive(Clone, Default)]
pub struct WaypointListFormat;

impl WaypointListFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

impl FormatImpl for WaypointListFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "waypoint list of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, _length: usize) -> Result<ValueData> {
        let mut records = Vec::new();
        while reader.remaining_len() > 0 {
            let remaining = reader.remaining_len();
            let record_length = read_ber(reader, remaining)? as usize;
            let mut record = reader.sub_reader(record_length)?;
            let remaining = record.remaining_len();
            let id = read_ber_oid(&mut record, remaining)?;
            let prosecution_order = read_sint(&mut record, 2)?;
            let prosecution_order = i16::try_from(prosecution_order)
                .map_err(|_| record.make_error(ErrorDetails::TypeOverflow))?;
            let info = read_uint(&mut record, 1)? as u8;
            let location = if record.remaining_len() >= 12 {
                let latitude = read_imap(-90.0, 90.0, &mut record, 4)?;
                let longitude = read_imap(-180.0, 180.0, &mut record, 4)?;
                let height = read_imap(-900.0, 9000.0, &mut record, 4)?;
                Some((latitude, longitude, height))
            } else {
                None
            };
            records.push(WaypointRecord {
                id,
                prosecution_order,
                info,
                location,
            });
        }
        Ok(ValueData::WaypointList(records))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        let records = match data {
            ValueData::WaypointList(records) => records,
            _ => return Err(cast_error("Vec<WaypointRecord>", data)),
        };
        for record in records {
            let record_length =
                ber_oid_length(record.id) + 3 + if record.location.is_some() { 12 } else { 0 };
            let remaining = writer.remaining_len();
            write_ber(record_length as u64, writer, remaining)?;
            let remaining = writer.remaining_len();
            write_ber_oid(record.id, writer, remaining)?;
            write_sint(i64::from(record.prosecution_order), writer, 2)?;
            write_uint(u64::from(record.info), writer, 1)?;
            if let Some((latitude, longitude, height)) = record.location {
                write_imap(latitude, -90.0, 90.0, writer, 4)?;
                write_imap(longitude, -180.0, 180.0, writer, 4)?;
                write_imap(height, -900.0, 9000.0, writer, 4)?;
            }
        }
        Ok(())
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        let records = match data {
            ValueData::WaypointList(records) => records,
            _ => return Err(cast_error("Vec<WaypointRecord>", data)),
        };
        let mut total = 0;
        for record in records {
            let record_length =
                ber_oid_length(record.id) + 3 + if record.location.is_some() { 12 } else { 0 };
            total += ber_length(record_length as u64) + record_length;
        }
        Ok(total)
    }
}

// ----------------------------------------------------------------------------
/// The UDS key for a MISB ST 0601 local set.
pub fn key() -> UdsKey {
    UdsKey::new(0x060E2B34_020B0101, 0x0E01030101000000)
}

// ----------------------------------------------------------------------------
/// The format for a MISB ST 0601 local set: precision timestamp first,
/// running-sum-16 checksum trailer last.
pub fn local_set_format() -> LocalSetFormat {
    LocalSetFormat::new("ST 0601 local set", traits())
        .with_checksum(ChecksumPacketFormat::new(
            ChecksumAlgorithm::RunningSum16,
            [tag::CHECKSUM as u8, 2],
        ))
        .with_leading_timestamp(tag::PRECISION_TIMESTAMP)
}

// ----------------------------------------------------------------------------
/// The traits of every ST 0601 tag.
pub fn traits() -> &'static TagTraitsLookup {
    static LOOKUP: OnceLock<TagTraitsLookup> = OnceLock::new();
    LOOKUP.get_or_init(build_traits)
}

fn build_traits() -> TagTraitsLookup {
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
            "Checksum used to detect errors within a ST 0601 packet.",
            Count::FORBIDDEN,
        ),
        entry(
            none,
            tag::PRECISION_TIMESTAMP,
            "PRECISION_TIMESTAMP",
            UintFormat::fixed(8).into(),
            "Precision Timestamp",
            "Timestamp for all metadata in a ST 0601 local set. Used to coordinate with Motion \
             Imagery.",
            Count::EXACTLY_ONE,
        ),
        entry(
            none,
            tag::MISSION_ID,
            "MISSION_ID",
            StringFormat::new().into(),
            "Mission ID",
            "Descriptive mission identifier to distinguish an event or sortie.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_TAIL_NUMBER,
            "PLATFORM_TAIL_NUMBER",
            StringFormat::new().into(),
            "Platform Tail Number",
            "Identifier of platform as posted.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_HEADING_ANGLE,
            "PLATFORM_HEADING_ANGLE",
            UflintFormat::fixed(0.0, 360.0, 2).into(),
            "Platform Heading Angle",
            "Angle between longitudinal axis and true north measured in the horizontal plane. \
             Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_PITCH_ANGLE,
            "PLATFORM_PITCH_ANGLE",
            SflintFormat::fixed(-20.0, 20.0, 2).into(),
            "Platform Pitch Angle",
            "Angle between longitudinal axis and horizontal plane. Positive angles above \
             horizontal plane. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_ROLL_ANGLE,
            "PLATFORM_ROLL_ANGLE",
            SflintFormat::fixed(-50.0, 50.0, 2).into(),
            "Platform Roll Angle",
            "Angle between transverse axis and transverse-longitudinal plane. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_TRUE_AIRSPEED,
            "PLATFORM_TRUE_AIRSPEED",
            UflintFormat::fixed(0.0, 255.0, 1).into(),
            "Platform True Airspeed",
            "True airspeed of the platform: indicated airspeed adjusted for temperature and \
             altitude. Measured in meters per second.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_INDICATED_AIRSPEED,
            "PLATFORM_INDICATED_AIRSPEED",
            UflintFormat::fixed(0.0, 255.0, 1).into(),
            "Platform Indicated Airspeed",
            "Indicated airspeed of the platform. Derived from Pitot tube and static pressure \
             sensors. Measured in meters per second.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_DESIGNATION,
            "PLATFORM_DESIGNATION",
            StringFormat::new().into(),
            "Platform Designation",
            "Model name for the platform. Examples: 'Predator', 'Reaper'.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::IMAGE_SOURCE_SENSOR,
            "IMAGE_SOURCE_SENSOR",
            StringFormat::new().into(),
            "Image Source Sensor",
            "Name of the currently active sensor. Examples: 'EO Nose', 'TESAR Imagery'.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::IMAGE_COORDINATE_SYSTEM,
            "IMAGE_COORDINATE_SYSTEM",
            StringFormat::new().into(),
            "Image Coordinate System",
            "Name of the image coordinate system used.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_LATITUDE,
            "SENSOR_LATITUDE",
            SflintFormat::fixed(-90.0, 90.0, 4).into(),
            "Sensor Latitude",
            "Sensor latitude. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_LONGITUDE,
            "SENSOR_LONGITUDE",
            SflintFormat::fixed(-180.0, 180.0, 4).into(),
            "Sensor Longitude",
            "Sensor longitude. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_TRUE_ALTITUDE,
            "SENSOR_TRUE_ALTITUDE",
            UflintFormat::fixed(-900.0, 19000.0, 2).into(),
            "Sensor True Altitude",
            "Altitude of sensor above mean sea level. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_HORIZONTAL_FOV,
            "SENSOR_HORIZONTAL_FOV",
            UflintFormat::fixed(0.0, 180.0, 2).into(),
            "Sensor Horizontal Field of View",
            "Horizontal field of view of the active sensor. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_VERTICAL_FOV,
            "SENSOR_VERTICAL_FOV",
            UflintFormat::fixed(0.0, 180.0, 2).into(),
            "Sensor Vertical Field of View",
            "Vertical field of view of the active sensor. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_RELATIVE_AZIMUTH_ANGLE,
            "SENSOR_RELATIVE_AZIMUTH_ANGLE",
            UflintFormat::fixed(0.0, 360.0, 4).into(),
            "Sensor Relative Azimuth Angle",
            "Azimuth of the sensor relative to the platform's longitudinal axis. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_RELATIVE_ELEVATION_ANGLE,
            "SENSOR_RELATIVE_ELEVATION_ANGLE",
            SflintFormat::fixed(-180.0, 180.0, 4).into(),
            "Sensor Relative Elevation Angle",
            "Elevation of the sensor relative to the platform's horizontal plane. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_RELATIVE_ROLL_ANGLE,
            "SENSOR_RELATIVE_ROLL_ANGLE",
            UflintFormat::fixed(0.0, 360.0, 4).into(),
            "Sensor Relative Roll Angle",
            "Roll of the sensor relative to an active imaging plane. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SLANT_RANGE,
            "SLANT_RANGE",
            UflintFormat::fixed(0.0, 5.0e6, 4).into(),
            "Slant Range",
            "Distance between the sensor and the frame center. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TARGET_WIDTH,
            "TARGET_WIDTH",
            UflintFormat::fixed(0.0, 1.0e4, 2).into(),
            "Target Width",
            "Target width within the sensor field of view. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FRAME_CENTER_LATITUDE,
            "FRAME_CENTER_LATITUDE",
            SflintFormat::fixed(-90.0, 90.0, 4).into(),
            "Frame Center Latitude",
            "Latitude of the frame center. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FRAME_CENTER_LONGITUDE,
            "FRAME_CENTER_LONGITUDE",
            SflintFormat::fixed(-180.0, 180.0, 4).into(),
            "Frame Center Longitude",
            "Longitude of the frame center. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FRAME_CENTER_ELEVATION,
            "FRAME_CENTER_ELEVATION",
            UflintFormat::fixed(-900.0, 19000.0, 2).into(),
            "Frame Center Elevation",
            "Elevation of the frame center above mean sea level. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::OFFSET_CORNER_LATITUDE_POINT_1,
            "OFFSET_CORNER_LATITUDE_POINT_1",
            SflintFormat::fixed(-0.075, 0.075, 2).into(),
            "Offset Corner Latitude Point 1",
            "Latitude offset of the upper-left image corner from the frame center. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::OFFSET_CORNER_LONGITUDE_POINT_1,
            "OFFSET_CORNER_LONGITUDE_POINT_1",
            SflintFormat::fixed(-0.075, 0.075, 2).into(),
            "Offset Corner Longitude Point 1",
            "Longitude offset of the upper-left image corner from the frame center. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::OFFSET_CORNER_LATITUDE_POINT_2,
            "OFFSET_CORNER_LATITUDE_POINT_2",
            SflintFormat::fixed(-0.075, 0.075, 2).into(),
            "Offset Corner Latitude Point 2",
            "Latitude offset of the upper-right image corner from the frame center. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::OFFSET_CORNER_LONGITUDE_POINT_2,
            "OFFSET_CORNER_LONGITUDE_POINT_2",
            SflintFormat::fixed(-0.075, 0.075, 2).into(),
            "Offset Corner Longitude Point 2",
            "Longitude offset of the upper-right image corner from the frame center. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::OFFSET_CORNER_LATITUDE_POINT_3,
            "OFFSET_CORNER_LATITUDE_POINT_3",
            SflintFormat::fixed(-0.075, 0.075, 2).into(),
            "Offset Corner Latitude Point 3",
            "Latitude offset of the lower-right image corner from the frame center. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::OFFSET_CORNER_LONGITUDE_POINT_3,
            "OFFSET_CORNER_LONGITUDE_POINT_3",
            SflintFormat::fixed(-0.075, 0.075, 2).into(),
            "Offset Corner Longitude Point 3",
            "Longitude offset of the lower-right image corner from the frame center. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::OFFSET_CORNER_LATITUDE_POINT_4,
            "OFFSET_CORNER_LATITUDE_POINT_4",
            SflintFormat::fixed(-0.075, 0.075, 2).into(),
            "Offset Corner Latitude Point 4",
            "Latitude offset of the lower-left image corner from the frame center. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::OFFSET_CORNER_LONGITUDE_POINT_4,
            "OFFSET_CORNER_LONGITUDE_POINT_4",
            SflintFormat::fixed(-0.075, 0.075, 2).into(),
            "Offset Corner Longitude Point 4",
            "Longitude offset of the lower-left image corner from the frame center. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ICING_DETECTED,
            "ICING_DETECTED",
            EnumFormat::new(&ICING_DETECTED_NAMES, 1).into(),
            "Icing Detected",
            "Whether ice forming on the aircraft has been detected.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::WIND_DIRECTION,
            "WIND_DIRECTION",
            UflintFormat::fixed(0.0, 360.0, 2).into(),
            "Wind Direction",
            "Direction the wind is coming from, relative to true north. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::WIND_SPEED,
            "WIND_SPEED",
            UflintFormat::fixed(0.0, 100.0, 1).into(),
            "Wind Speed",
            "Wind speed. Measured in meters per second.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::STATIC_PRESSURE,
            "STATIC_PRESSURE",
            UflintFormat::fixed(0.0, 5000.0, 2).into(),
            "Static Pressure",
            "Static pressure at the platform's location. Measured in millibar.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::DENSITY_ALTITUDE,
            "DENSITY_ALTITUDE",
            UflintFormat::fixed(-900.0, 19000.0, 2).into(),
            "Density Altitude",
            "Density altitude at the platform's location. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::OUTSIDE_AIR_TEMPERATURE,
            "OUTSIDE_AIR_TEMPERATURE",
            SflintFormat::fixed(-127.0, 127.0, 1).into(),
            "Outside Air Temperature",
            "Air temperature outside the platform. Measured in degrees Celsius.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TARGET_LOCATION_LATITUDE,
            "TARGET_LOCATION_LATITUDE",
            SflintFormat::fixed(-90.0, 90.0, 4).into(),
            "Target Location Latitude",
            "Latitude of the target of the crosshair. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TARGET_LOCATION_LONGITUDE,
            "TARGET_LOCATION_LONGITUDE",
            SflintFormat::fixed(-180.0, 180.0, 4).into(),
            "Target Location Longitude",
            "Longitude of the target of the crosshair. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TARGET_LOCATION_ELEVATION,
            "TARGET_LOCATION_ELEVATION",
            UflintFormat::fixed(-900.0, 19000.0, 2).into(),
            "Target Location Elevation",
            "Elevation of the target of the crosshair above mean sea level. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TARGET_TRACK_GATE_WIDTH,
            "TARGET_TRACK_GATE_WIDTH",
            UflintFormat::fixed(0.0, 510.0, 1).into(),
            "Target Track Gate Width",
            "Width of the box around the tracked target. Measured in pixels.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TARGET_TRACK_GATE_HEIGHT,
            "TARGET_TRACK_GATE_HEIGHT",
            UflintFormat::fixed(0.0, 510.0, 1).into(),
            "Target Track Gate Height",
            "Height of the box around the tracked target. Measured in pixels.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TARGET_ERROR_ESTIMATE_CE90,
            "TARGET_ERROR_ESTIMATE_CE90",
            UflintFormat::fixed(0.0, 4095.0, 2).into(),
            "Target Error Estimate CE90",
            "Radius of the 90% circular error of the target location. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TARGET_ERROR_ESTIMATE_LE90,
            "TARGET_ERROR_ESTIMATE_LE90",
            UflintFormat::fixed(0.0, 4095.0, 2).into(),
            "Target Error Estimate LE90",
            "Half the interval of the 90% linear error of the target elevation. Measured in \
             meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::GENERIC_FLAG_DATA,
            "GENERIC_FLAG_DATA",
            UintFormat::fixed(1).into(),
            "Generic Flag Data",
            "Miscellaneous boolean values: laser range, auto-track, IR polarity, icing status, \
             slant range source, image validity.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SECURITY_LOCAL_SET,
            "SECURITY_LOCAL_SET",
            KlvFormat::from(st0102::local_set_format()),
            "Security Local Set",
            "MISB ST 0102 local set for security metadata.",
            Count::OPTIONAL,
        )
        .with_subtags(st0102::traits()),
        entry(
            none,
            tag::DIFFERENTIAL_PRESSURE,
            "DIFFERENTIAL_PRESSURE",
            UflintFormat::fixed(0.0, 5000.0, 2).into(),
            "Differential Pressure",
            "Differential pressure at the platform's location. Measured in millibar.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_ANGLE_OF_ATTACK,
            "PLATFORM_ANGLE_OF_ATTACK",
            SflintFormat::fixed(-20.0, 20.0, 2).into(),
            "Platform Angle of Attack",
            "Angle between the platform's longitudinal axis and the relative wind. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_VERTICAL_SPEED,
            "PLATFORM_VERTICAL_SPEED",
            SflintFormat::fixed(-180.0, 180.0, 2).into(),
            "Platform Vertical Speed",
            "Vertical speed of the aircraft relative to zenith. Measured in meters per second.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_SIDESLIP_ANGLE,
            "PLATFORM_SIDESLIP_ANGLE",
            SflintFormat::fixed(-20.0, 20.0, 2).into(),
            "Platform Sideslip Angle",
            "Angle between the platform's longitudinal axis and the relative wind, in the \
             horizontal plane. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::AIRFIELD_BAROMETRIC_PRESSURE,
            "AIRFIELD_BAROMETRIC_PRESSURE",
            UflintFormat::fixed(0.0, 5000.0, 2).into(),
            "Airfield Barometric Pressure",
            "Local pressure at the airfield of known height. Measured in millibar.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::AIRFIELD_ELEVATION,
            "AIRFIELD_ELEVATION",
            UflintFormat::fixed(-900.0, 19000.0, 2).into(),
            "Airfield Elevation",
            "Elevation of the airfield above mean sea level. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::RELATIVE_HUMIDITY,
            "RELATIVE_HUMIDITY",
            UflintFormat::fixed(0.0, 100.0, 1).into(),
            "Relative Humidity",
            "Relative humidity at the platform's location. Measured in percent.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_GROUND_SPEED,
            "PLATFORM_GROUND_SPEED",
            UflintFormat::fixed(0.0, 255.0, 1).into(),
            "Platform Ground Speed",
            "Speed of the platform projected onto the ground. Measured in meters per second.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::GROUND_RANGE,
            "GROUND_RANGE",
            UflintFormat::fixed(0.0, 5.0e6, 4).into(),
            "Ground Range",
            "Horizontal distance between the platform and the target of the crosshair. Measured \
             in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_FUEL_REMAINING,
            "PLATFORM_FUEL_REMAINING",
            UflintFormat::fixed(0.0, 1.0e4, 2).into(),
            "Platform Fuel Remaining",
            "Fuel remaining on the platform. Measured in kilograms.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_CALL_SIGN,
            "PLATFORM_CALL_SIGN",
            StringFormat::new().into(),
            "Platform Call Sign",
            "Call sign of the platform or operating unit.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::WEAPON_LOAD,
            "WEAPON_LOAD",
            UintFormat::fixed(2).into(),
            "Weapon Load",
            "Current weapons stored on the aircraft, encoded as station, hardpoint, and weapon \
             type nibbles.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::WEAPON_FIRED,
            "WEAPON_FIRED",
            UintFormat::fixed(1).into(),
            "Weapon Fired",
            "Signal of a weapon's launch, encoded as station and hardpoint nibbles.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::LASER_PRF_CODE,
            "LASER_PRF_CODE",
            UintFormat::fixed(2).into(),
            "Laser PRF Code",
            "Pulse repetition frequency code of the laser designator.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_FOV_NAME,
            "SENSOR_FOV_NAME",
            EnumFormat::new(&SENSOR_FOV_NAMES, 1).into(),
            "Sensor Field of View Name",
            "One of several discrete zoom levels.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_MAGNETIC_HEADING,
            "PLATFORM_MAGNETIC_HEADING",
            UflintFormat::fixed(0.0, 360.0, 2).into(),
            "Platform Magnetic Heading",
            "Angle between the longitudinal axis and magnetic north measured in the horizontal \
             plane. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::VERSION_NUMBER,
            "VERSION_NUMBER",
            UintFormat::fixed(1).into(),
            "Version Number",
            "Version of MISB ST 0601 used as the source standard when encoding this local set.",
            Count::EXACTLY_ONE,
        ),
        entry(
            none,
            tag::DEPRECATED,
            "DEPRECATED",
            BlobFormat::new().into(),
            "Deprecated Tag",
            "Deprecated tag. No longer written.",
            Count::FORBIDDEN,
        ),
        entry(
            none,
            tag::ALTERNATE_PLATFORM_LATITUDE,
            "ALTERNATE_PLATFORM_LATITUDE",
            SflintFormat::fixed(-90.0, 90.0, 4).into(),
            "Alternate Platform Latitude",
            "Latitude of the platform connected to the UAS via direct datalink. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ALTERNATE_PLATFORM_LONGITUDE,
            "ALTERNATE_PLATFORM_LONGITUDE",
            SflintFormat::fixed(-180.0, 180.0, 4).into(),
            "Alternate Platform Longitude",
            "Longitude of the platform connected to the UAS via direct datalink. Measured in \
             degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ALTERNATE_PLATFORM_ALTITUDE,
            "ALTERNATE_PLATFORM_ALTITUDE",
            UflintFormat::fixed(-900.0, 19000.0, 2).into(),
            "Alternate Platform Altitude",
            "Altitude of the alternate platform above mean sea level. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ALTERNATE_PLATFORM_NAME,
            "ALTERNATE_PLATFORM_NAME",
            StringFormat::new().into(),
            "Alternate Platform Name",
            "Name of the alternate platform connected to the UAS via direct datalink.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ALTERNATE_PLATFORM_HEADING,
            "ALTERNATE_PLATFORM_HEADING",
            UflintFormat::fixed(0.0, 360.0, 2).into(),
            "Alternate Platform Heading",
            "Heading angle of the alternate platform. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::EVENT_START_TIME,
            "EVENT_START_TIME",
            UintFormat::fixed(8).into(),
            "Event Start Time",
            "Start time of the scene, project, event, or operation. Measured in microseconds \
             since the UNIX epoch.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::RVT_LOCAL_SET,
            "RVT_LOCAL_SET",
            KlvFormat::from(st0806::local_set_format()),
            "RVT Local Set",
            "MISB ST 0806 local set for remote video terminals.",
            Count::OPTIONAL,
        )
        .with_subtags(st0806::traits()),
        entry(
            none,
            tag::VMTI_LOCAL_SET,
            "VMTI_LOCAL_SET",
            KlvFormat::from(st0903::local_set_format()),
            "VMTI Local Set",
            "MISB ST 0903 local set for the video moving target indicator.",
            Count::OPTIONAL,
        )
        .with_subtags(st0903::traits()),
        entry(
            none,
            tag::SENSOR_ELLIPSOID_HEIGHT,
            "SENSOR_ELLIPSOID_HEIGHT",
            UflintFormat::fixed(-900.0, 19000.0, 2).into(),
            "Sensor Ellipsoid Height",
            "Height of the sensor above the WGS84 ellipsoid. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ALTERNATE_PLATFORM_ELLIPSOID_HEIGHT,
            "ALTERNATE_PLATFORM_ELLIPSOID_HEIGHT",
            UflintFormat::fixed(-900.0, 19000.0, 2).into(),
            "Alternate Platform Ellipsoid Height",
            "Height of the alternate platform above the WGS84 ellipsoid. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::OPERATIONAL_MODE,
            "OPERATIONAL_MODE",
            EnumFormat::new(&OPERATIONAL_MODE_NAMES, 1).into(),
            "Operational Mode",
            "The operational mode of the FMV-producing platform.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FRAME_CENTER_HEIGHT_ABOVE_ELLIPSOID,
            "FRAME_CENTER_HEIGHT_ABOVE_ELLIPSOID",
            UflintFormat::fixed(-900.0, 19000.0, 2).into(),
            "Frame Center Height Above Ellipsoid",
            "Height of the frame center above the WGS84 ellipsoid. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_NORTH_VELOCITY,
            "SENSOR_NORTH_VELOCITY",
            SflintFormat::fixed(-327.0, 327.0, 2).into(),
            "Sensor North Velocity",
            "Northing component of the sensor velocity. Measured in meters per second.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_EAST_VELOCITY,
            "SENSOR_EAST_VELOCITY",
            SflintFormat::fixed(-327.0, 327.0, 2).into(),
            "Sensor East Velocity",
            "Easting component of the sensor velocity. Measured in meters per second.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::IMAGE_HORIZON_PIXEL_PACK,
            "IMAGE_HORIZON_PIXEL_PACK",
            BlobFormat::new().into(),
            "Image Horizon Pixel Pack",
            "Location of the earth-sky horizon in the image.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FULL_CORNER_LATITUDE_POINT_1,
            "FULL_CORNER_LATITUDE_POINT_1",
            SflintFormat::fixed(-90.0, 90.0, 4).into(),
            "Full Corner Latitude Point 1",
            "Latitude of the upper-left image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FULL_CORNER_LONGITUDE_POINT_1,
            "FULL_CORNER_LONGITUDE_POINT_1",
            SflintFormat::fixed(-180.0, 180.0, 4).into(),
            "Full Corner Longitude Point 1",
            "Longitude of the upper-left image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FULL_CORNER_LATITUDE_POINT_2,
            "FULL_CORNER_LATITUDE_POINT_2",
            SflintFormat::fixed(-90.0, 90.0, 4).into(),
            "Full Corner Latitude Point 2",
            "Latitude of the upper-right image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FULL_CORNER_LONGITUDE_POINT_2,
            "FULL_CORNER_LONGITUDE_POINT_2",
            SflintFormat::fixed(-180.0, 180.0, 4).into(),
            "Full Corner Longitude Point 2",
            "Longitude of the upper-right image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FULL_CORNER_LATITUDE_POINT_3,
            "FULL_CORNER_LATITUDE_POINT_3",
            SflintFormat::fixed(-90.0, 90.0, 4).into(),
            "Full Corner Latitude Point 3",
            "Latitude of the lower-right image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FULL_CORNER_LONGITUDE_POINT_3,
            "FULL_CORNER_LONGITUDE_POINT_3",
            SflintFormat::fixed(-180.0, 180.0, 4).into(),
            "Full Corner Longitude Point 3",
            "Longitude of the lower-right image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FULL_CORNER_LATITUDE_POINT_4,
            "FULL_CORNER_LATITUDE_POINT_4",
            SflintFormat::fixed(-90.0, 90.0, 4).into(),
            "Full Corner Latitude Point 4",
            "Latitude of the lower-left image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FULL_CORNER_LONGITUDE_POINT_4,
            "FULL_CORNER_LONGITUDE_POINT_4",
            SflintFormat::fixed(-180.0, 180.0, 4).into(),
            "Full Corner Longitude Point 4",
            "Longitude of the lower-left image corner. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FULL_PLATFORM_PITCH_ANGLE,
            "FULL_PLATFORM_PITCH_ANGLE",
            SflintFormat::fixed(-90.0, 90.0, 4).into(),
            "Full Platform Pitch Angle",
            "Full-range version of the platform pitch angle. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FULL_PLATFORM_ROLL_ANGLE,
            "FULL_PLATFORM_ROLL_ANGLE",
            SflintFormat::fixed(-90.0, 90.0, 4).into(),
            "Full Platform Roll Angle",
            "Full-range version of the platform roll angle. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FULL_PLATFORM_ANGLE_OF_ATTACK,
            "FULL_PLATFORM_ANGLE_OF_ATTACK",
            SflintFormat::fixed(-90.0, 90.0, 4).into(),
            "Full Platform Angle of Attack",
            "Full-range version of the platform angle of attack. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::FULL_PLATFORM_SIDESLIP_ANGLE,
            "FULL_PLATFORM_SIDESLIP_ANGLE",
            SflintFormat::fixed(-180.0, 180.0, 4).into(),
            "Full Platform Sideslip Angle",
            "Full-range version of the platform sideslip angle. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::MIIS_CORE_IDENTIFIER,
            "MIIS_CORE_IDENTIFIER",
            MiisIdFormat::new().into(),
            "MIIS Core Identifier",
            "MISB ST 1204 core identifier binary value.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SAR_MOTION_IMAGERY_LOCAL_SET,
            "SAR_MOTION_IMAGERY_LOCAL_SET",
            BlobFormat::new().into(),
            "SAR Motion Imagery Local Set",
            "MISB ST 1206 local set for synthetic aperture radar motion imagery.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TARGET_WIDTH_EXTENDED,
            "TARGET_WIDTH_EXTENDED",
            ImapFormat::new(0.0, 1.5e6).into(),
            "Target Width Extended",
            "Target width within the sensor field of view. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::RANGE_IMAGE_LOCAL_SET,
            "RANGE_IMAGE_LOCAL_SET",
            BlobFormat::new().into(),
            "Range Image Local Set",
            "MISB ST 1002 local set for range imagery.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::GEOREGISTRATION_LOCAL_SET,
            "GEOREGISTRATION_LOCAL_SET",
            BlobFormat::new().into(),
            "Geo-Registration Local Set",
            "MISB ST 1601 local set for geo-registration.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::COMPOSITE_IMAGING_LOCAL_SET,
            "COMPOSITE_IMAGING_LOCAL_SET",
            BlobFormat::new().into(),
            "Composite Imaging Local Set",
            "MISB ST 1602 local set for composite imaging.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SEGMENT_LOCAL_SET,
            "SEGMENT_LOCAL_SET",
            BlobFormat::new().into(),
            "Segment Local Set",
            "MISB ST 1607 local set grouping metadata with common properties.",
            Count::ANY,
        ),
        entry(
            none,
            tag::AMEND_LOCAL_SET,
            "AMEND_LOCAL_SET",
            BlobFormat::new().into(),
            "Amend Local Set",
            "MISB ST 1607 local set correcting erroneous metadata.",
            Count::ANY,
        ),
        entry(
            none,
            tag::SDCC_FLP,
            "SDCC_FLP",
            BlobFormat::new().into(),
            "SDCC-FLP",
            "MISB ST 1010 standard deviation and cross-correlation metadata.",
            Count::ANY,
        ),
        entry(
            none,
            tag::DENSITY_ALTITUDE_EXTENDED,
            "DENSITY_ALTITUDE_EXTENDED",
            ImapFormat::new(-900.0, 40000.0).into(),
            "Density Altitude Extended",
            "Density altitude at the platform's location. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_ELLIPSOID_HEIGHT_EXTENDED,
            "SENSOR_ELLIPSOID_HEIGHT_EXTENDED",
            ImapFormat::new(-900.0, 40000.0).into(),
            "Sensor Ellipsoid Height Extended",
            "Height of the sensor above the WGS84 ellipsoid. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ALTERNATE_PLATFORM_ELLIPSOID_HEIGHT_EXTENDED,
            "ALTERNATE_PLATFORM_ELLIPSOID_HEIGHT_EXTENDED",
            ImapFormat::new(-900.0, 40000.0).into(),
            "Alternate Platform Ellipsoid Height Extended",
            "Height of the alternate platform above the WGS84 ellipsoid. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::STREAM_DESIGNATOR,
            "STREAM_DESIGNATOR",
            StringFormat::new().into(),
            "Stream Designator",
            "Shorthand descriptor of the origin of the stream.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::OPERATIONAL_BASE,
            "OPERATIONAL_BASE",
            StringFormat::new().into(),
            "Operational Base",
            "Base hosting the ground control station.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::BROADCAST_SOURCE,
            "BROADCAST_SOURCE",
            StringFormat::new().into(),
            "Broadcast Source",
            "Name of the source where the Motion Imagery is first broadcast.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::RANGE_TO_RECOVERY_LOCATION,
            "RANGE_TO_RECOVERY_LOCATION",
            ImapFormat::new(0.0, 21000.0).into(),
            "Range to Recovery Location",
            "Distance between the platform and its recovery site. Measured in kilometers.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TIME_AIRBORNE,
            "TIME_AIRBORNE",
            UintFormat::variable().into(),
            "Time Airborne",
            "Number of seconds the platform has been airborne.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PROPULSION_UNIT_SPEED,
            "PROPULSION_UNIT_SPEED",
            UintFormat::variable().into(),
            "Propulsion Unit Speed",
            "Speed at which the engine or motor is rotating. Measured in revolutions per minute.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_COURSE_ANGLE,
            "PLATFORM_COURSE_ANGLE",
            ImapFormat::new(0.0, 360.0).into(),
            "Platform Course Angle",
            "Direction of travel of the platform relative to true north. Measured in degrees.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ALTITUDE_ABOVE_GROUND_LEVEL,
            "ALTITUDE_ABOVE_GROUND_LEVEL",
            ImapFormat::new(-900.0, 40000.0).into(),
            "Altitude Above Ground Level",
            "Vertical distance between the platform and the ground. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::RADAR_ALTIMETER,
            "RADAR_ALTIMETER",
            ImapFormat::new(-900.0, 40000.0).into(),
            "Radar Altimeter",
            "Vertical distance between the platform and the ground, as measured by a radar \
             altimeter. Measured in meters.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::CONTROL_COMMAND,
            "CONTROL_COMMAND",
            ControlCommandFormat::new().into(),
            "Control Command",
            "Record of command sent to the platform.",
            Count::ANY,
        ),
        entry(
            none,
            tag::CONTROL_COMMAND_VERIFICATION_LIST,
            "CONTROL_COMMAND_VERIFICATION_LIST",
            U64ListFormat::new().into(),
            "Control Command Verification List",
            "Acknowledgement by the platform of one or more control commands.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_AZIMUTH_RATE,
            "SENSOR_AZIMUTH_RATE",
            ImapFormat::new(-1000.0, 1000.0).into(),
            "Sensor Azimuth Rate",
            "Rate of change of the sensor's azimuth. Measured in degrees per second.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_ELEVATION_RATE,
            "SENSOR_ELEVATION_RATE",
            ImapFormat::new(-1000.0, 1000.0).into(),
            "Sensor Elevation Rate",
            "Rate of change of the sensor's elevation. Measured in degrees per second.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_ROLL_RATE,
            "SENSOR_ROLL_RATE",
            ImapFormat::new(-1000.0, 1000.0).into(),
            "Sensor Roll Rate",
            "Rate of change of the sensor's roll. Measured in degrees per second.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ONBOARD_MI_STORAGE_PERCENT_FULL,
            "ONBOARD_MI_STORAGE_PERCENT_FULL",
            ImapFormat::new(0.0, 100.0).into(),
            "On-board MI Storage Percent Full",
            "Percentage of on-board Motion Imagery storage used.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ACTIVE_WAVELENGTH_LIST,
            "ACTIVE_WAVELENGTH_LIST",
            BlobFormat::new().into(),
            "Active Wavelength List",
            "List of wavelength identifiers in use by the active sensor.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::COUNTRY_CODES,
            "COUNTRY_CODES",
            CountryCodesFormat::new().into(),
            "Country Codes",
            "Record of the countries involved in production of the FMV.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::NUMBER_OF_NAVSATS_IN_VIEW,
            "NUMBER_OF_NAVSATS_IN_VIEW",
            UintFormat::fixed(1).into(),
            "Number of NAVSATs in View",
            "Count of navigation satellites in view of the platform.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::POSITIONING_METHOD_SOURCE,
            "POSITIONING_METHOD_SOURCE",
            UintFormat::fixed(1).into(),
            "Positioning Method Source",
            "Bitmap of the sources the navigation solution draws from.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PLATFORM_STATUS,
            "PLATFORM_STATUS",
            EnumFormat::new(&PLATFORM_STATUS_NAMES, 1).into(),
            "Platform Status",
            "General status of the aircraft.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_CONTROL_MODE,
            "SENSOR_CONTROL_MODE",
            EnumFormat::new(&SENSOR_CONTROL_MODE_NAMES, 1).into(),
            "Sensor Control Mode",
            "How the sensor is being operated.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::SENSOR_FRAME_RATE_PACK,
            "SENSOR_FRAME_RATE_PACK",
            FrameRateFormat::new().into(),
            "Sensor Frame Rate Pack",
            "Frame rate of the Motion Imagery at the sensor.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::WAVELENGTHS_LIST,
            "WAVELENGTHS_LIST",
            WavelengthListFormat::new().into(),
            "Wavelengths List",
            "List of wavelength bands provided by all available sensors.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TARGET_ID,
            "TARGET_ID",
            StringFormat::new().into(),
            "Target ID",
            "Alphanumeric identification of the target.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::AIRBASE_LOCATIONS,
            "AIRBASE_LOCATIONS",
            BlobFormat::new().into(),
            "Airbase Locations",
            "Take-off and recovery locations of the platform.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TAKEOFF_TIME,
            "TAKEOFF_TIME",
            UintFormat::variable().into(),
            "Take-off Time",
            "Time of the platform's take-off. Measured in microseconds since the UNIX epoch.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::TRANSMISSION_FREQUENCY,
            "TRANSMISSION_FREQUENCY",
            ImapFormat::new(1.0, 99999.0).into(),
            "Transmission Frequency",
            "Radio frequency used to transmit the Motion Imagery. Measured in megahertz.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ONBOARD_MI_STORAGE_CAPACITY,
            "ONBOARD_MI_STORAGE_CAPACITY",
            UintFormat::variable().into(),
            "On-board MI Storage Capacity",
            "Total capacity of on-board Motion Imagery storage. Measured in gigabytes.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ZOOM_PERCENTAGE,
            "ZOOM_PERCENTAGE",
            ImapFormat::new(0.0, 100.0).into(),
            "Zoom Percentage",
            "Position of the sensor within its zoom range.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::COMMUNICATIONS_METHOD,
            "COMMUNICATIONS_METHOD",
            StringFormat::new().into(),
            "Communications Method",
            "Type of communications used with the platform.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::LEAP_SECONDS,
            "LEAP_SECONDS",
            SintFormat::variable().into(),
            "Leap Seconds",
            "Number of leap seconds to convert the precision timestamp to UTC.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::CORRECTION_OFFSET,
            "CORRECTION_OFFSET",
            SintFormat::variable().into(),
            "Correction Offset",
            "Post-flight correction to the precision timestamp. Measured in microseconds.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::PAYLOAD_LIST,
            "PAYLOAD_LIST",
            PayloadListFormat::new().into(),
            "Payload List",
            "List of payloads available on the platform.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::ACTIVE_PAYLOADS,
            "ACTIVE_PAYLOADS",
            BlobFormat::new().into(),
            "Active Payloads",
            "Bitmap of the payloads currently in use.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::WEAPONS_STORES,
            "WEAPONS_STORES",
            BlobFormat::new().into(),
            "Weapons Stores",
            "Inventory of weapons on the platform.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::WAYPOINT_LIST,
            "WAYPOINT_LIST",
            WaypointListFormat::new().into(),
            "Waypoint List",
            "List of flight plan waypoints.",
            Count::OPTIONAL,
        ),
        entry(
            none,
            tag::VIEW_DOMAIN,
            "VIEW_DOMAIN",
            BlobFormat::new().into(),
            "View Domain",
            "The sensor's possible range of azimuth, elevation, and roll.",
            Count::OPTIONAL,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SliceWriter;

    #[test]
    fn control_command_round_trip() {
        let format = KlvFormat::from(ControlCommandFormat::new());
        let command = ControlCommand {
            id: 5,
            message: "Fly to Waypoint 1".to_owned(),
            timestamp: 1_000_000,
        };
        let value = crate::Value::from(command.clone());
        let length = format.length_of(&value).unwrap();
        let mut buffer = vec![0_u8; length];
        let mut writer = SliceWriter::new(&mut buffer);
        format.write(&value, &mut writer).unwrap();
        drop(writer);

        let mut reader = SliceReader::new(&buffer);
        let parsed = format.read(&mut reader, length).unwrap();
        assert_eq!(parsed.as_control_command().unwrap(), &command);
    }

    #[test]
    fn control_command_without_timestamp_is_shorter() {
        let format = KlvFormat::from(ControlCommandFormat::new());
        let command = ControlCommand {
            id: 1,
            message: "Land".to_owned(),
            timestamp: 0,
        };
        let with_timestamp = ControlCommand {
            timestamp: 1,
            ..command.clone()
        };
        let short = format.length_of(&crate::Value::from(command)).unwrap();
        let long = format.length_of(&crate::Value::from(with_timestamp)).unwrap();
        assert_eq!(long, short + 8);
    }

    #[test]
    fn wavelength_list_round_trip() {
        let format = KlvFormat::from(WavelengthListFormat::new());
        let records = vec![
            WavelengthRecord {
                id: 1,
                min: 380.0,
                max: 750.0,
                name: "VIS".to_owned(),
            },
            WavelengthRecord {
                id: 2,
                min: 750.0,
                max: 100000.0,
                name: "IR".to_owned(),
            },
        ];
        let value = crate::Value::from(records.clone());
        let length = format.length_of(&value).unwrap();
        let mut buffer = vec![0_u8; length];
        let mut writer = SliceWriter::new(&mut buffer);
        format.write(&value, &mut writer).unwrap();
        drop(writer);

        let mut reader = SliceReader::new(&buffer);
        let parsed = format.read(&mut reader, length).unwrap();
        let parsed = parsed.as_wavelength_list().unwrap();
        assert_eq!(parsed.len(), 2);
        for (a, b) in parsed.iter().zip(&records) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.name, b.name);
            assert!((a.min - b.min).abs() < 1.0);
            assert!((a.max - b.max).abs() < 1.0);
        }
    }

    #[test]
    fn traits_cover_every_tag() {
        let lookup = traits();
        for tag_number in 1..=142 {
            let traits = lookup.by_tag(tag_number);
            assert_eq!(traits.tag(), tag_number, "missing tag {}", tag_number);
        }
    }
}
