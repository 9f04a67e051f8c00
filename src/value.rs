use super::packet::KlvPacket;
use super::set::{LocalSet, UniversalSet};
use super::st0601::{
    ControlCommand, CountryCodes, FrameRate, PayloadRecord, WavelengthRecord, WaypointRecord,
};
use super::st1108::{MetricImplementer, MetricPeriodPack, WindowCornersPack};
use super::st1204::MiisId;
use super::{Error, ErrorDetails, Result};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Raw bytes of a field that could not be parsed (or that has no more
/// specific interpretation).
///
/// Keeping the bytes around means a failed parse loses no information: the
/// blob serializes back to exactly the bytes it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Blob(SmallVec<[u8; 16]>);

impl Blob {
    /// The contained bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Number of contained bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the blob holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Self(SmallVec::from_slice(bytes))
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(SmallVec::from_vec(bytes))
    }
}

impl Display for Blob {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, byte) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        write!(f, ")")
    }
}

/// Every payload a KLV field can carry.
///
/// This is the sealed sum over all semantic types produced by the format
/// layer: plain scalars, strings, raw bytes, nested sets, and the
/// standard-specific record packs.
#[derive(Debug, Clone)]
pub enum ValueData {
    /// Unsigned integer of up to 64 bits.
    U64(u64),
    /// Signed integer of up to 64 bits.
    I64(i64),
    /// Floating-point number (IEEE-754 or fixed-point decoded).
    F64(f64),
    /// Bounded ASCII string.
    String(String),
    /// An enumerated field, held as its raw unsigned value. The field's
    /// format knows the member names.
    Enumeration(u64),
    /// A sequence of unsigned integers (e.g. the ST 0601 control command
    /// verification list).
    U64List(Vec<u64>),
    /// Raw bytes that could not (or need not) be parsed.
    Blob(Blob),
    /// A nested local set.
    LocalSet(LocalSet),
    /// A nested universal set.
    UniversalSet(UniversalSet),
    /// ST 0601 control command pack.
    ControlCommand(ControlCommand),
    /// ST 0601 sensor frame rate pack.
    FrameRate(FrameRate),
    /// ST 0601 country codes pack.
    CountryCodes(CountryCodes),
    /// ST 0601 wavelengths list.
    WavelengthList(Vec<WavelengthRecord>),
    /// ST 0601 payload list.
    PayloadList(Vec<PayloadRecord>),
    /// ST 0601 waypoint list.
    WaypointList(Vec<WaypointRecord>),
    /// ST 1108 metric period pack.
    MetricPeriod(MetricPeriodPack),
    /// ST 1108 window corners pack.
    WindowCorners(WindowCornersPack),
    /// ST 1108 metric implementer.
    MetricImplementer(MetricImplementer),
    /// ST 1204 MIIS identifier.
    MiisId(MiisId),
    /// A list of whole packets; used internally to accumulate packets of
    /// unknown type on a timeline.
    Packets(Vec<KlvPacket>),
}

impl ValueData {
    /// A short name for the contained type.
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueData::U64(_) => "u64",
            ValueData::I64(_) => "i64",
            ValueData::F64(_) => "f64",
            ValueData::String(_) => "string",
            ValueData::Enumeration(_) => "enumeration",
            ValueData::U64List(_) => "u64 list",
            ValueData::Blob(_) => "blob",
            ValueData::LocalSet(_) => "local set",
            ValueData::UniversalSet(_) => "universal set",
            ValueData::ControlCommand(_) => "control command",
            ValueData::FrameRate(_) => "frame rate",
            ValueData::CountryCodes(_) => "country codes",
            ValueData::WavelengthList(_) => "wavelength list",
            ValueData::PayloadList(_) => "payload list",
            ValueData::WaypointList(_) => "waypoint list",
            ValueData::MetricPeriod(_) => "metric period pack",
            ValueData::WindowCorners(_) => "window corners pack",
            ValueData::MetricImplementer(_) => "metric implementer",
            ValueData::MiisId(_) => "MIIS ID",
            ValueData::Packets(_) => "packet list",
        }
    }

    // Total order over variants; payloads only compare within one variant.
    fn rank(&self) -> u8 {
        match self {
            ValueData::U64(_) => 0,
            ValueData::I64(_) => 1,
            ValueData::F64(_) => 2,
            ValueData::String(_) => 3,
            ValueData::Enumeration(_) => 4,
            ValueData::U64List(_) => 5,
            ValueData::Blob(_) => 6,
            ValueData::LocalSet(_) => 7,
            ValueData::UniversalSet(_) => 8,
            ValueData::ControlCommand(_) => 9,
            ValueData::FrameRate(_) => 10,
            ValueData::CountryCodes(_) => 11,
            ValueData::WavelengthList(_) => 12,
            ValueData::PayloadList(_) => 13,
            ValueData::WaypointList(_) => 14,
            ValueData::MetricPeriod(_) => 15,
            ValueData::WindowCorners(_) => 16,
            ValueData::MetricImplementer(_) => 17,
            ValueData::MiisId(_) => 18,
            ValueData::Packets(_) => 19,
        }
    }
}

impl PartialEq for ValueData {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ValueData {}

impl PartialOrd for ValueData {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ValueData {
    fn cmp(&self, other: &Self) -> Ordering {
        use ValueData::*;
        match (self, other) {
            (U64(a), U64(b)) => a.cmp(b),
            (I64(a), I64(b)) => a.cmp(b),
            (F64(a), F64(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Enumeration(a), Enumeration(b)) => a.cmp(b),
            (U64List(a), U64List(b)) => a.cmp(b),
            (Blob(a), Blob(b)) => a.cmp(b),
            (LocalSet(a), LocalSet(b)) => a.cmp(b),
            (UniversalSet(a), UniversalSet(b)) => a.cmp(b),
            (ControlCommand(a), ControlCommand(b)) => a.cmp(b),
            (FrameRate(a), FrameRate(b)) => a.cmp(b),
            (CountryCodes(a), CountryCodes(b)) => a.cmp(b),
            (WavelengthList(a), WavelengthList(b)) => a.cmp(b),
            (PayloadList(a), PayloadList(b)) => a.cmp(b),
            (WaypointList(a), WaypointList(b)) => a.cmp(b),
            (MetricPeriod(a), MetricPeriod(b)) => a.cmp(b),
            (WindowCorners(a), WindowCorners(b)) => a.cmp(b),
            (MetricImplementer(a), MetricImplementer(b)) => a.cmp(b),
            (MiisId(a), MiisId(b)) => a.cmp(b),
            (Packets(a), Packets(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Display for ValueData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueData::U64(value) => write!(f, "{}", value),
            ValueData::I64(value) => write!(f, "{}", value),
            ValueData::F64(value) => write!(f, "{}", value),
            ValueData::String(value) => write!(f, "\"{}\"", value),
            ValueData::Enumeration(value) => write!(f, "{}", value),
            ValueData::U64List(values) => {
                write!(f, "[ ")?;
                for (i, value) in values.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, " ]")
            }
            ValueData::Blob(blob) => write!(f, "{}", blob),
            ValueData::LocalSet(set) => write!(f, "{}", set),
            ValueData::UniversalSet(set) => write!(f, "{}", set),
            ValueData::ControlCommand(value) => write!(f, "{}", value),
            ValueData::FrameRate(value) => write!(f, "{}", value),
            ValueData::CountryCodes(value) => write!(f, "{}", value),
            ValueData::WavelengthList(values) => write_record_list(f, values),
            ValueData::PayloadList(values) => write_record_list(f, values),
            ValueData::WaypointList(values) => write_record_list(f, values),
            ValueData::MetricPeriod(value) => write!(f, "{}", value),
            ValueData::WindowCorners(value) => write!(f, "{}", value),
            ValueData::MetricImplementer(value) => write!(f, "{}", value),
            ValueData::MiisId(value) => write!(f, "{}", value),
            ValueData::Packets(packets) => write!(f, "({} packets)", packets.len()),
        }
    }
}

fn write_record_list<T: Display>(f: &mut Formatter<'_>, values: &[T]) -> std::fmt::Result {
    write!(f, "[ ")?;
    for (i, value) in values.iter().enumerate() {
        if i != 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", value)?;
    }
    write!(f, " ]")
}

/// Container for the value of one KLV field.
///
/// A value is either *empty* (the field exists but carries nothing), *valid*
/// (a typed [`ValueData`]), or *invalid* (a [`ValueData::Blob`] left behind
/// by a failed parse). It also carries an optional byte-length hint: some
/// formats vary their encoded length to reflect the precision of the value,
/// and preserving the original length lets the value re-serialize with the
/// same precision.
#[derive(Debug, Clone, Default)]
pub struct Value {
    data: Option<ValueData>,
    length_hint: Option<usize>,
}

macro_rules! value_accessor {
    ($(#[$meta:meta])* $name:ident, $variant:ident, $type:ty) => {
        $(#[$meta])*
        pub fn $name(&self) -> Result<&$type> {
            match &self.data {
                Some(ValueData::$variant(value)) => Ok(value),
                _ => Err(self.bad_cast(stringify!($type))),
            }
        }
    };
}

macro_rules! value_copy_accessor {
    ($(#[$meta:meta])* $name:ident, $variant:ident, $type:ty) => {
        $(#[$meta])*
        pub fn $name(&self) -> Result<$type> {
            match &self.data {
                Some(ValueData::$variant(value)) => Ok(*value),
                _ => Err(self.bad_cast(stringify!($type))),
            }
        }
    };
}

impl Value {
    /// Creates an empty value.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a value from its payload.
    pub fn new(data: ValueData) -> Self {
        Self {
            data: Some(data),
            length_hint: None,
        }
    }

    /// Creates a value from its payload and the number of bytes it occupied
    /// on the wire.
    pub fn with_length_hint(data: ValueData, length_hint: usize) -> Self {
        Self {
            data: Some(data),
            length_hint: Some(length_hint),
        }
    }

    /// Check if the value contains nothing.
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    /// Check if the value contains a payload which is not a [`Blob`].
    pub fn is_valid(&self) -> bool {
        !matches!(&self.data, None | Some(ValueData::Blob(_)))
    }

    /// The contained payload, if any.
    pub fn data(&self) -> Option<&ValueData> {
        self.data.as_ref()
    }

    /// A short name for the contained type.
    pub fn type_name(&self) -> &'static str {
        match &self.data {
            None => "empty",
            Some(data) => data.type_name(),
        }
    }

    /// The number of bytes this value occupied on the wire, or should occupy
    /// when written.
    pub fn length_hint(&self) -> Option<usize> {
        self.length_hint
    }

    /// Set the number of bytes this value should be written with.
    pub fn set_length_hint(&mut self, length_hint: usize) {
        self.length_hint = Some(length_hint);
    }

    fn bad_cast(&self, expected: &'static str) -> Error {
        Error::new(
            0,
            ErrorDetails::BadCast {
                expected,
                actual: self.type_name(),
            },
        )
    }

    value_copy_accessor!(
        /// The contained unsigned integer.
        as_u64, U64, u64
    );
    value_copy_accessor!(
        /// The contained signed integer.
        as_i64, I64, i64
    );
    value_copy_accessor!(
        /// The contained floating-point number.
        as_f64, F64, f64
    );
    value_copy_accessor!(
        /// The contained raw enumeration value.
        as_enumeration, Enumeration, u64
    );
    value_accessor!(
        /// The contained string.
        as_str, String, String
    );
    value_accessor!(
        /// The contained unsigned integer list.
        as_u64_list, U64List, Vec<u64>
    );
    value_accessor!(
        /// The contained raw bytes.
        as_blob, Blob, Blob
    );
    value_accessor!(
        /// The contained local set.
        as_local_set, LocalSet, LocalSet
    );
    value_accessor!(
        /// The contained universal set.
        as_universal_set, UniversalSet, UniversalSet
    );
    value_accessor!(
        /// The contained control command.
        as_control_command, ControlCommand, ControlCommand
    );
    value_accessor!(
        /// The contained frame rate pack.
        as_frame_rate, FrameRate, FrameRate
    );
    value_accessor!(
        /// The contained country codes pack.
        as_country_codes, CountryCodes, CountryCodes
    );
    value_accessor!(
        /// The contained wavelengths list.
        as_wavelength_list, WavelengthList, Vec<WavelengthRecord>
    );
    value_accessor!(
        /// The contained payload list.
        as_payload_list, PayloadList, Vec<PayloadRecord>
    );
    value_accessor!(
        /// The contained waypoint list.
        as_waypoint_list, WaypointList, Vec<WaypointRecord>
    );
    value_accessor!(
        /// The contained metric period pack.
        as_metric_period, MetricPeriod, MetricPeriodPack
    );
    value_accessor!(
        /// The contained window corners pack.
        as_window_corners, WindowCorners, WindowCornersPack
    );
    value_accessor!(
        /// The contained metric implementer.
        as_metric_implementer, MetricImplementer, MetricImplementer
    );
    value_accessor!(
        /// The contained MIIS identifier.
        as_miis_id, MiisId, MiisId
    );
    value_accessor!(
        /// The contained packet list.
        as_packets, Packets, Vec<KlvPacket>
    );

    /// Mutable access to the contained packet list.
    pub fn as_packets_mut(&mut self) -> Result<&mut Vec<KlvPacket>> {
        match &mut self.data {
            Some(ValueData::Packets(packets)) => Ok(packets),
            _ => Err(Error::new(
                0,
                ErrorDetails::BadCast {
                    expected: "Vec<KlvPacket>",
                    actual: "other",
                },
            )),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        // The length hint plays no role in a value's identity
        self.data == other.data
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.data, &other.data) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.data {
            None => write!(f, "(empty)"),
            Some(data) => write!(f, "{}", data),
        }
    }
}

impl From<ValueData> for Value {
    fn from(data: ValueData) -> Self {
        Value::new(data)
    }
}

macro_rules! value_from {
    ($type:ty, $variant:ident) => {
        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                Value::new(ValueData::$variant(value))
            }
        }
    };
}

value_from!(u64, U64);
value_from!(i64, I64);
value_from!(f64, F64);
value_from!(String, String);
value_from!(Vec<u64>, U64List);
value_from!(Blob, Blob);
value_from!(LocalSet, LocalSet);
value_from!(UniversalSet, UniversalSet);
value_from!(ControlCommand, ControlCommand);
value_from!(FrameRate, FrameRate);
value_from!(CountryCodes, CountryCodes);
value_from!(Vec<WavelengthRecord>, WavelengthList);
value_from!(Vec<PayloadRecord>, PayloadList);
value_from!(Vec<WaypointRecord>, WaypointList);
value_from!(MetricPeriodPack, MetricPeriod);
value_from!(WindowCornersPack, WindowCorners);
value_from!(MetricImplementer, MetricImplementer);
value_from!(MiisId, MiisId);
value_from!(Vec<KlvPacket>, Packets);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::new(ValueData::String(value.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_equal() {
        assert_eq!(Value::empty(), Value::empty());
        assert!(Value::empty().is_empty());
        assert!(!Value::empty().is_valid());
    }

    #[test]
    fn blob_is_invalid_but_not_empty() {
        let value = Value::from(Blob::from(&[1_u8, 2, 3][..]));
        assert!(!value.is_empty());
        assert!(!value.is_valid());
    }

    #[test]
    fn length_hint_does_not_affect_identity() {
        let a = Value::with_length_hint(ValueData::U64(17), 1);
        let b = Value::with_length_hint(ValueData::U64(17), 4);
        assert_eq!(a, b);
    }

    #[test]
    fn mismatched_variants_order_by_rank() {
        let a = Value::from(5_u64);
        let b = Value::from("five");
        assert!(a < b);
        assert_eq!(
            a.as_str().unwrap_err().details,
            ErrorDetails::BadCast {
                expected: "String",
                actual: "u64"
            }
        );
    }

    #[test]
    fn floats_order_totally() {
        let a = Value::from(-1.5_f64);
        let b = Value::from(2.5_f64);
        assert!(a < b);
        assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
    }
}
