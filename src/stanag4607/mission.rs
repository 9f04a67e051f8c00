//! The STANAG 4607 mission segment.

use super::{from_primitive, trim_whitespace};
use crate::{codec, Result, SliceReader};
use std::fmt::{Display, Formatter};

/// The type of platform that originated the data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, num_derive::FromPrimitive)]
#[allow(missing_docs)]
pub enum MissionPlatform {
    Unidentified = 0,
    Acs = 1,
    ArlM = 2,
    Sentinel = 3,
    RotaryWingRadar = 4,
    GlobalHawkNavy = 5,
    Horizon = 6,
    E8 = 7,
    P3C = 8,
    Predator = 9,
    Radarsat2 = 10,
    U2 = 11,
    E10 = 12,
    UgsSingle = 13,
    UgsCluster = 14,
    GroundBased = 15,
    UavMarines = 16,
    UavNavy = 17,
    UavAirForce = 18,
    GlobalHawkAirForce = 19,
    GlobalHawkAustralia = 20,
    GlobalHawkGermany = 21,
    PaulRevere = 22,
    MarinerUav = 23,
    Bac111 = 24,
    Coyote = 25,
    KingAir = 26,
    Limit = 27,
    NrlNp3B = 28,
    SostarX = 29,
    WatchKeeper = 30,
    AllianceGroundSurveillance = 31,
    Stryker = 32,
    Ags = 33,
    Sidm = 34,
    Reaper = 35,
    WarriorA = 36,
    Warrior = 37,
    TwinOtter = 38,
    Other = 255,
}

impl Display for MissionPlatform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MissionPlatform::Unidentified => "Unidentified",
            MissionPlatform::Acs => "ACS",
            MissionPlatform::ArlM => "ARL-M",
            MissionPlatform::Sentinel => "Sentinel",
            MissionPlatform::RotaryWingRadar => "Rotary Wing Radar",
            MissionPlatform::GlobalHawkNavy => "Global Hawk-Navy",
            MissionPlatform::Horizon => "HORIZON",
            MissionPlatform::E8 => "E-8 (Joint STARS)",
            MissionPlatform::P3C => "P-3C",
            MissionPlatform::Predator => "Predator",
            MissionPlatform::Radarsat2 => "RADARSAT2",
            MissionPlatform::U2 => "U-2",
            MissionPlatform::E10 => "E-10",
            MissionPlatform::UgsSingle => "UGS - Single",
            MissionPlatform::UgsCluster => "UGS - Cluster",
            MissionPlatform::GroundBased => "Ground Based",
            MissionPlatform::UavMarines => "UAV-Marines",
            MissionPlatform::UavNavy => "UAV-Navy",
            MissionPlatform::UavAirForce => "UAV-Air Force",
            MissionPlatform::GlobalHawkAirForce => "Global Hawk-Air Force",
            MissionPlatform::GlobalHawkAustralia => "Global Hawk-Australia",
            MissionPlatform::GlobalHawkGermany => "Global Hawk-Germany",
            MissionPlatform::PaulRevere => "Paul Revere",
            MissionPlatform::MarinerUav => "Mariner UAV",
            MissionPlatform::Bac111 => "BAC-111",
            MissionPlatform::Coyote => "Coyote",
            MissionPlatform::KingAir => "King Air",
            MissionPlatform::Limit => "LIMIT",
            MissionPlatform::NrlNp3B => "NRL NP-3B",
            MissionPlatform::SostarX => "SOSTAR-X",
            MissionPlatform::WatchKeeper => "WatchKeeper",
            MissionPlatform::AllianceGroundSurveillance => "Alliance Ground Surveillance",
            MissionPlatform::Stryker => "Stryker",
            MissionPlatform::Ags => "AGS (HALE UAV)",
            MissionPlatform::Sidm => "SIDM",
            MissionPlatform::Reaper => "Reaper",
            MissionPlatform::WarriorA => "Warrior A",
            MissionPlatform::Warrior => "Warrior",
            MissionPlatform::TwinOtter => "Twin Otter",
            MissionPlatform::Other => "Other",
        };
        write!(f, "{}", name)
    }
}

/// UTC date on which the mission originated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MissionReferenceTime {
    /// Four-digit year.
    pub year: u16,
    /// Month of the year, 1 through 12.
    pub month: u8,
    /// Day of the month, 1 through 31.
    pub day: u8,
}

impl Display for MissionReferenceTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Year: {}, Month: {}, Day: {} }}",
            self.year, self.month, self.day
        )
    }
}

/// Information concerning the mission: 39 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionSegment {
    /// Mission plan identifier, space padding trimmed.
    pub mission_plan: String,
    /// Flight plan identifier, space padding trimmed.
    pub flight_plan: String,
    /// The type of platform that originated the data.
    pub platform_type: MissionPlatform,
    /// Platform configuration identifier, space padding trimmed.
    pub platform_configuration: String,
    /// UTC date on which the mission originated.
    pub reference_time: MissionReferenceTime,
}

/// Number of bytes in a mission segment body.
pub const MISSION_SEGMENT_LENGTH: usize = 39;

impl MissionSegment {
    /// Read a mission segment from the next 39 bytes.
    pub fn read(reader: &mut SliceReader<'_>) -> Result<Self> {
        let mission_plan = trim_whitespace(codec::read_string(reader, 12)?);
        let flight_plan = trim_whitespace(codec::read_string(reader, 12)?);
        let platform_type = from_primitive(u64::from(reader.read_u8()?), reader)?;
        let platform_configuration = trim_whitespace(codec::read_string(reader, 10)?);
        let reference_time = MissionReferenceTime {
            year: reader.read_be_u16()?,
            month: reader.read_u8()?,
            day: reader.read_u8()?,
        };
        Ok(Self {
            mission_plan,
            flight_plan,
            platform_type,
            platform_configuration,
            reference_time,
        })
    }
}

impl Display for MissionSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ Mission Plan: \"{}\", Flight Plan: \"{}\", Platform Type: {}, \
             Platform Configuration: \"{}\", Reference Time: {} }}",
            self.mission_plan,
            self.flight_plan,
            self.platform_type,
            self.platform_configuration,
            self.reference_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mission_segment_layout() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"OP EAGLE    ");
        bytes.extend_from_slice(b"FP-0042     ");
        bytes.push(9); // Predator
        bytes.extend_from_slice(b"BLOCK 5   ");
        bytes.extend_from_slice(&2024_u16.to_be_bytes());
        bytes.push(6);
        bytes.push(15);
        assert_eq!(bytes.len(), MISSION_SEGMENT_LENGTH);

        let mut reader = SliceReader::new(&bytes);
        let segment = MissionSegment::read(&mut reader).unwrap();
        assert_eq!(segment.mission_plan, "OP EAGLE");
        assert_eq!(segment.flight_plan, "FP-0042");
        assert_eq!(segment.platform_type, MissionPlatform::Predator);
        assert_eq!(segment.platform_configuration, "BLOCK 5");
        assert_eq!(
            segment.reference_time,
            MissionReferenceTime {
                year: 2024,
                month: 6,
                day: 15
            }
        );
    }
}
