use super::codec;
use super::set::{LocalSetFormat, UniversalSetFormat};
use super::st0601::{
    ControlCommandFormat, CountryCodesFormat, FrameRateFormat, PayloadListFormat,
    WavelengthListFormat, WaypointListFormat,
};
use super::st1108::{MetricImplementerFormat, MetricPeriodPackFormat, WindowCornersPackFormat};
use super::st1204::MiisIdFormat;
use super::value::{Blob, Value, ValueData};
use super::{Error, ErrorDetails, Result, SliceReader, SliceWriter};
use enum_dispatch::enum_dispatch;
use log::{error, warn};

// ----------------------------------------------------------------------------
pub(crate) fn cast_error(expected: &'static str, data: &ValueData) -> Error {
    Error::new(
        0,
        ErrorDetails::BadCast {
            expected,
            actual: data.type_name(),
        },
    )
}

pub(crate) fn length_description(fixed_length: usize) -> String {
    if fixed_length == 0 {
        "variable length".to_owned()
    } else {
        format!("{} bytes", fixed_length)
    }
}

// ----------------------------------------------------------------------------
// Typed core of a data format. Implementors only deal with well-formed
// payloads of their own type; the shared edge-case handling (zero lengths,
// fixed-length checks, parse failures, blob passthrough, length bookkeeping)
// lives in the inherent methods of KlvFormat.
#[enum_dispatch]
pub(crate) trait FormatImpl {
    // Exact encoded length, or 0 when the length varies per value.
    fn fixed_length(&self) -> usize;

    // Textual description used in diagnostics.
    fn description(&self) -> String;

    fn read_typed(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<ValueData>;

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        length: usize,
    ) -> Result<()>;

    // Bytes required to encode the payload; only consulted for
    // variable-length formats.
    fn length_of_typed(&self, data: &ValueData, length_hint: Option<usize>) -> Result<usize>;

    // Value rendering; overridden by formats that know more than the raw
    // payload does (e.g. enumeration names).
    fn print_typed(&self, data: &ValueData) -> String {
        data.to_string()
    }
}

/// A data format: the object that knows how to map one semantic type to and
/// from bytes.
///
/// Every KLV tag is associated with exactly one format through its
/// [`TagTraits`](crate::TagTraits) entry. The closed set of formats doubles
/// as the discriminator that the demuxer and muxer use to recognize special
/// field kinds without any runtime type inspection.
#[enum_dispatch(FormatImpl)]
#[derive(Clone)]
pub enum KlvFormat {
    /// Big-endian unsigned integer.
    Uint(UintFormat),
    /// Big-endian signed integer.
    Sint(SintFormat),
    /// BER-OID encoded unsigned integer.
    BerOid(BerOidFormat),
    /// IEEE-754 floating point, 4 or 8 bytes.
    Float(FloatFormat),
    /// IMAP fixed-point value.
    Imap(ImapFormat),
    /// Unsigned FLINT fixed-point value.
    Uflint(UflintFormat),
    /// Signed FLINT fixed-point value.
    Sflint(SflintFormat),
    /// Bounded ASCII string.
    String(StringFormat),
    /// Raw bytes.
    Blob(BlobFormat),
    /// Enumerated unsigned integer.
    Enum(EnumFormat),
    /// Sequence of BER-OID unsigned integers.
    U64List(U64ListFormat),
    /// ST 0601 control command pack.
    ControlCommand(ControlCommandFormat),
    /// ST 0601 sensor frame rate pack.
    FrameRate(FrameRateFormat),
    /// ST 0601 country codes pack.
    CountryCodes(CountryCodesFormat),
    /// ST 0601 wavelengths list.
    WavelengthList(WavelengthListFormat),
    /// ST 0601 payload list.
    PayloadList(PayloadListFormat),
    /// ST 0601 waypoint list.
    WaypointList(WaypointListFormat),
    /// ST 1108 metric period pack.
    MetricPeriod(MetricPeriodPackFormat),
    /// ST 1108 window corners pack.
    WindowCorners(WindowCornersPackFormat),
    /// ST 1108 metric implementer.
    MetricImplementer(MetricImplementerFormat),
    /// ST 1204 MIIS identifier pack.
    MiisId(MiisIdFormat),
    /// KLV local set.
    LocalSet(LocalSetFormat),
    /// KLV universal set.
    UniversalSet(UniversalSetFormat),
}

impl KlvFormat {
    /// Parse exactly `length` bytes into a [`Value`].
    ///
    /// A `length` of zero yields the empty value. When the payload fails to
    /// parse as this format's type, the bytes are preserved in a
    /// [`Blob`] value and the failure is logged; parsing continues. Only
    /// framing problems (a truncated buffer, or a fixed-length format handed
    /// the wrong number of bytes) surface as errors.
    pub fn read(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<Value> {
        if length == 0 {
            // Zero length: null / unknown value
            return Ok(Value::empty());
        }
        let fixed_length = self.fixed_length();
        if fixed_length != 0 && length != fixed_length {
            return Err(reader.make_error(ErrorDetails::BadFixedLength {
                expected: fixed_length,
                actual: length,
            }));
        }

        let payload = reader.read(length)?;
        let mut sub = SliceReader::new(payload);
        match self.read_typed(&mut sub, length) {
            Ok(data) => Ok(Value::with_length_hint(data, length)),
            Err(err) => {
                // Keep the bytes when parsing fails
                error!(
                    "error occurred while parsing {}: {}",
                    self.description(),
                    err
                );
                Ok(Value::with_length_hint(
                    ValueData::Blob(Blob::from(payload)),
                    length,
                ))
            }
        }
    }

    /// Write a [`Value`] out as this format.
    ///
    /// Empty values write nothing; invalid (blob) values are written back as
    /// their raw bytes. Valid values are written using exactly
    /// [`KlvFormat::length_of`] bytes.
    ///
    /// # Panics
    ///
    /// Panics if the typed serializer produces a different number of bytes
    /// than [`KlvFormat::length_of`] claimed; that is a bug in the format,
    /// not a recoverable condition.
    pub fn write(&self, value: &Value, writer: &mut SliceWriter<'_>) -> Result<()> {
        match value.data() {
            None => Ok(()),
            Some(ValueData::Blob(blob)) => codec::write_blob(blob, writer),
            Some(data) => {
                let value_length = self.length_of(value)?;
                if value_length > writer.remaining_len() {
                    return Err(writer.make_error(ErrorDetails::BufferOverrun(value_length)));
                }
                let mark = writer.location();
                self.write_typed(data, writer, value_length)?;
                let written = writer.location() - mark;
                if written != value_length {
                    panic!(
                        "format `{}`: written length ({}) and calculated length ({}) not equal",
                        self.description(),
                        written,
                        value_length
                    );
                }
                Ok(())
            }
        }
    }

    /// Number of bytes required to write `value`.
    pub fn length_of(&self, value: &Value) -> Result<usize> {
        match value.data() {
            None => Ok(0),
            Some(ValueData::Blob(blob)) => Ok(blob.len()),
            Some(data) => {
                let fixed_length = self.fixed_length();
                if fixed_length != 0 {
                    Ok(fixed_length)
                } else {
                    self.length_of_typed(data, value.length_hint())
                }
            }
        }
    }

    /// A string rendering of `value` as interpreted by this format.
    pub fn print(&self, value: &Value) -> String {
        match value.data() {
            Some(data) if value.is_valid() => self.print_typed(data),
            _ => value.to_string(),
        }
    }

    /// Textual description of this format.
    pub fn describe(&self) -> String {
        self.description()
    }
}

// ----------------------------------------------------------------------------
/// Interprets data as a big-endian unsigned integer of up to 8 bytes.
#[derive(Clone)]
pub struct UintFormat {
    fixed_length: usize,
}

impl UintFormat {
    /// A format of exactly `length` bytes.
    pub fn fixed(length: usize) -> Self {
        Self {
            fixed_length: length,
        }
    }

    /// A format whose byte length tracks the precision of the value.
    pub fn variable() -> Self {
        Self { fixed_length: 0 }
    }
}

impl FormatImpl for UintFormat {
    fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    fn description(&self) -> String {
        format!(
            "unsigned integer of {}",
            length_description(self.fixed_length)
        )
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<ValueData> {
        Ok(ValueData::U64(codec::read_uint(reader, length)?))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        length: usize,
    ) -> Result<()> {
        match data {
            ValueData::U64(value) => codec::write_uint(*value, writer, length),
            _ => Err(cast_error("u64", data)),
        }
    }

    fn length_of_typed(&self, data: &ValueData, length_hint: Option<usize>) -> Result<usize> {
        match data {
            ValueData::U64(value) => Ok(length_hint.unwrap_or_else(|| codec::uint_length(*value))),
            _ => Err(cast_error("u64", data)),
        }
    }
}

// ----------------------------------------------------------------------------
/// Interprets data as a big-endian signed integer of up to 8 bytes.
#[derive(Clone)]
pub struct SintFormat {
    fixed_length: usize,
}

impl SintFormat {
    /// A format of exactly `length` bytes.
    pub fn fixed(length: usize) -> Self {
        Self {
            fixed_length: length,
        }
    }

    /// A format whose byte length tracks the precision of the value.
    pub fn variable() -> Self {
        Self { fixed_length: 0 }
    }
}

impl FormatImpl for SintFormat {
    fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    fn description(&self) -> String {
        format!("signed integer of {}", length_description(self.fixed_length))
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<ValueData> {
        Ok(ValueData::I64(codec::read_sint(reader, length)?))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        length: usize,
    ) -> Result<()> {
        match data {
            ValueData::I64(value) => codec::write_sint(*value, writer, length),
            _ => Err(cast_error("i64", data)),
        }
    }

    fn length_of_typed(&self, data: &ValueData, length_hint: Option<usize>) -> Result<usize> {
        match data {
            ValueData::I64(value) => Ok(length_hint.unwrap_or_else(|| codec::sint_length(*value))),
            _ => Err(cast_error("i64", data)),
        }
    }
}

// ----------------------------------------------------------------------------
/// Interprets data as a BER-OID encoded unsigned integer.
#[derive(Clone, Default)]
pub struct BerOidFormat;

impl BerOidFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

impl FormatImpl for BerOidFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "BER-OID integer of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<ValueData> {
        Ok(ValueData::U64(codec::read_ber_oid(reader, length)?))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        length: usize,
    ) -> Result<()> {
        match data {
            ValueData::U64(value) => codec::write_ber_oid(*value, writer, length),
            _ => Err(cast_error("u64", data)),
        }
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        match data {
            ValueData::U64(value) => Ok(codec::ber_oid_length(*value)),
            _ => Err(cast_error("u64", data)),
        }
    }
}

// ----------------------------------------------------------------------------
/// Interprets data as an IEEE-754 floating-point number of 4 or 8 bytes.
#[derive(Clone)]
pub struct FloatFormat {
    fixed_length: usize,
}

impl FloatFormat {
    /// A format of exactly `length` bytes (4 or 8).
    pub fn fixed(length: usize) -> Self {
        Self {
            fixed_length: length,
        }
    }

    /// A format accepting either 4- or 8-byte encodings.
    pub fn variable() -> Self {
        Self { fixed_length: 0 }
    }
}

impl FormatImpl for FloatFormat {
    fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    fn description(&self) -> String {
        format!(
            "IEEE-754 float of {}",
            length_description(self.fixed_length)
        )
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<ValueData> {
        match length {
            4 => Ok(ValueData::F64(f64::from(f32::from_bits(
                reader.read_be_u32()?,
            )))),
            8 => Ok(ValueData::F64(f64::from_bits(reader.read_be_u64()?))),
            _ => Err(reader.make_error(ErrorDetails::BadFixedLength {
                expected: 8,
                actual: length,
            })),
        }
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        length: usize,
    ) -> Result<()> {
        let value = match data {
            ValueData::F64(value) => *value,
            _ => return Err(cast_error("f64", data)),
        };
        match length {
            4 => writer.write(&(value as f32).to_bits().to_be_bytes()),
            8 => writer.write(&value.to_bits().to_be_bytes()),
            _ => Err(writer.make_error(ErrorDetails::BadFixedLength {
                expected: 8,
                actual: length,
            })),
        }
    }

    fn length_of_typed(&self, data: &ValueData, length_hint: Option<usize>) -> Result<usize> {
        match data {
            ValueData::F64(_) => Ok(length_hint.unwrap_or(8)),
            _ => Err(cast_error("f64", data)),
        }
    }
}

// ----------------------------------------------------------------------------
/// Interprets data as an IMAP fixed-point value on `[lo, hi]`, per the
/// uniform-quantization mapping of MISB ST 1201.
#[derive(Clone)]
pub struct ImapFormat {
    lo: f64,
    hi: f64,
    fixed_length: usize,
}

impl ImapFormat {
    /// A variable-length format on `[lo, hi]`; the encoded length follows
    /// each value's length hint.
    pub fn new(lo: f64, hi: f64) -> Self {
        Self {
            lo,
            hi,
            fixed_length: 0,
        }
    }

    /// A format of exactly `length` bytes on `[lo, hi]`.
    pub fn fixed(lo: f64, hi: f64, length: usize) -> Self {
        Self {
            lo,
            hi,
            fixed_length: length,
        }
    }
}

impl FormatImpl for ImapFormat {
    fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    fn description(&self) -> String {
        format!(
            "IMAP value on [{}, {}] of {}",
            self.lo,
            self.hi,
            length_description(self.fixed_length)
        )
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<ValueData> {
        Ok(ValueData::F64(codec::read_imap(
            self.lo, self.hi, reader, length,
        )?))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        length: usize,
    ) -> Result<()> {
        match data {
            ValueData::F64(value) => codec::write_imap(*value, self.lo, self.hi, writer, length),
            _ => Err(cast_error("f64", data)),
        }
    }

    fn length_of_typed(&self, data: &ValueData, length_hint: Option<usize>) -> Result<usize> {
        match data {
            ValueData::F64(_) => {
                length_hint.ok_or_else(|| Error::new(0, ErrorDetails::MissingLengthHint))
            }
            _ => Err(cast_error("f64", data)),
        }
    }
}

// ----------------------------------------------------------------------------
/// Interprets data as an unsigned FLINT fixed-point value on `[lo, hi]`.
#[derive(Clone)]
pub struct UflintFormat {
    lo: f64,
    hi: f64,
    fixed_length: usize,
}

impl UflintFormat {
    /// A format of exactly `length` bytes on `[lo, hi]`.
    pub fn fixed(lo: f64, hi: f64, length: usize) -> Self {
        Self {
            lo,
            hi,
            fixed_length: length,
        }
    }
}

impl FormatImpl for UflintFormat {
    fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    fn description(&self) -> String {
        format!(
            "unsigned fixed-point value on [{}, {}] of {}",
            self.lo,
            self.hi,
            length_description(self.fixed_length)
        )
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<ValueData> {
        Ok(ValueData::F64(codec::read_uflint(
            self.lo, self.hi, reader, length,
        )?))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        length: usize,
    ) -> Result<()> {
        match data {
            ValueData::F64(value) => codec::write_uflint(*value, self.lo, self.hi, writer, length),
            _ => Err(cast_error("f64", data)),
        }
    }

    fn length_of_typed(&self, data: &ValueData, length_hint: Option<usize>) -> Result<usize> {
        match data {
            ValueData::F64(_) => {
                length_hint.ok_or_else(|| Error::new(0, ErrorDetails::MissingLengthHint))
            }
            _ => Err(cast_error("f64", data)),
        }
    }
}

// ----------------------------------------------------------------------------
/// Interprets data as a signed FLINT fixed-point value on `[lo, hi]`.
#[derive(Clone)]
pub struct SflintFormat {
    lo: f64,
    hi: f64,
    fixed_length: usize,
}

impl SflintFormat {
    /// A format of exactly `length` bytes on `[lo, hi]`.
    pub fn fixed(lo: f64, hi: f64, length: usize) -> Self {
        Self {
            lo,
            hi,
            fixed_length: length,
        }
    }
}

impl FormatImpl for SflintFormat {
    fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    fn description(&self) -> String {
        format!(
            "signed fixed-point value on [{}, {}] of {}",
            self.lo,
            self.hi,
            length_description(self.fixed_length)
        )
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<ValueData> {
        Ok(ValueData::F64(codec::read_sflint(
            self.lo, self.hi, reader, length,
        )?))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        length: usize,
    ) -> Result<()> {
        match data {
            ValueData::F64(value) => codec::write_sflint(*value, self.lo, self.hi, writer, length),
            _ => Err(cast_error("f64", data)),
        }
    }

    fn length_of_typed(&self, data: &ValueData, length_hint: Option<usize>) -> Result<usize> {
        match data {
            ValueData::F64(_) => {
                length_hint.ok_or_else(|| Error::new(0, ErrorDetails::MissingLengthHint))
            }
            _ => Err(cast_error("f64", data)),
        }
    }
}

// ----------------------------------------------------------------------------
/// Interprets data as a bounded ASCII string.
#[derive(Clone, Default)]
pub struct StringFormat;

impl StringFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

impl FormatImpl for StringFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "string of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<ValueData> {
        Ok(ValueData::String(codec::read_string(reader, length)?))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        match data {
            ValueData::String(value) => codec::write_string(value, writer),
            _ => Err(cast_error("String", data)),
        }
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        match data {
            ValueData::String(value) => Ok(codec::string_length(value)),
            _ => Err(cast_error("String", data)),
        }
    }
}

// ----------------------------------------------------------------------------
/// Passes raw bytes through unchanged.
#[derive(Clone, Default)]
pub struct BlobFormat;

impl BlobFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

impl FormatImpl for BlobFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "raw bytes of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<ValueData> {
        Ok(ValueData::Blob(codec::read_blob(reader, length)?))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        match data {
            ValueData::Blob(value) => codec::write_blob(value, writer),
            _ => Err(cast_error("Blob", data)),
        }
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        match data {
            ValueData::Blob(value) => Ok(value.len()),
            _ => Err(cast_error("Blob", data)),
        }
    }
}

// ----------------------------------------------------------------------------
/// Interprets data as an enumerated unsigned integer.
///
/// Out-of-range values decode to member 0 (the "unknown" member by
/// convention in every MISB enumeration) with a warning.
#[derive(Clone)]
pub struct EnumFormat {
    names: &'static [&'static str],
    fixed_length: usize,
}

impl EnumFormat {
    /// A format of exactly `length` bytes whose members are described by
    /// `names`, indexed by raw value.
    pub fn new(names: &'static [&'static str], length: usize) -> Self {
        Self {
            names,
            fixed_length: length,
        }
    }
}

impl FormatImpl for EnumFormat {
    fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    fn description(&self) -> String {
        format!("enumeration of {}", length_description(self.fixed_length))
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, length: usize) -> Result<ValueData> {
        let value = codec::read_uint(reader, length)?;
        if value >= self.names.len() as u64 {
            warn!(
                "enumeration value {} out of range; treating as {}",
                value, self.names[0]
            );
            return Ok(ValueData::Enumeration(0));
        }
        Ok(ValueData::Enumeration(value))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        length: usize,
    ) -> Result<()> {
        match data {
            ValueData::Enumeration(value) => codec::write_uint(*value, writer, length),
            _ => Err(cast_error("enumeration", data)),
        }
    }

    fn length_of_typed(&self, data: &ValueData, length_hint: Option<usize>) -> Result<usize> {
        match data {
            ValueData::Enumeration(value) => {
                Ok(length_hint.unwrap_or_else(|| codec::uint_length(*value)))
            }
            _ => Err(cast_error("enumeration", data)),
        }
    }

    fn print_typed(&self, data: &ValueData) -> String {
        match data {
            ValueData::Enumeration(value) => {
                let index = (*value as usize).min(self.names.len().saturating_sub(1));
                self.names[index].to_owned()
            }
            _ => data.to_string(),
        }
    }
}

// ----------------------------------------------------------------------------
/// Interprets data as a sequence of BER-OID encoded unsigned integers.
#[derive(Clone, Default)]
pub struct U64ListFormat;

impl U64ListFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }
}

impl FormatImpl for U64ListFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        "BER-OID integer list of variable length".to_owned()
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, _length: usize) -> Result<ValueData> {
        let mut values = Vec::new();
        while reader.remaining_len() > 0 {
            let remaining = reader.remaining_len();
            values.push(codec::read_ber_oid(reader, remaining)?);
        }
        Ok(ValueData::U64List(values))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        match data {
            ValueData::U64List(values) => {
                for &value in values {
                    let remaining = writer.remaining_len();
                    codec::write_ber_oid(value, writer, remaining)?;
                }
                Ok(())
            }
            _ => Err(cast_error("Vec<u64>", data)),
        }
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        match data {
            ValueData::U64List(values) => {
                Ok(values.iter().map(|&value| codec::ber_oid_length(value)).sum())
            }
            _ => Err(cast_error("Vec<u64>", data)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_reads_empty() {
        let format = KlvFormat::from(UintFormat::fixed(2));
        let mut reader = SliceReader::new(&[]);
        let value = format.read(&mut reader, 0).unwrap();
        assert!(value.is_empty());
        assert_eq!(format.length_of(&value).unwrap(), 0);
    }

    #[test]
    fn fixed_length_mismatch_is_a_framing_error() {
        let format = KlvFormat::from(UintFormat::fixed(2));
        let data = [0x00_u8, 0x11, 0x22];
        let mut reader = SliceReader::new(&data);
        let err = format.read(&mut reader, 3).unwrap_err();
        assert_eq!(
            err.details,
            ErrorDetails::BadFixedLength {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn parse_failure_round_trips_as_blob() {
        // 9 bytes cannot parse as a u64, but the bytes must survive
        let format = KlvFormat::from(UintFormat::variable());
        let data = [1_u8, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut reader = SliceReader::new(&data);
        let value = format.read(&mut reader, 9).unwrap();
        assert!(!value.is_valid());
        assert_eq!(format.length_of(&value).unwrap(), 9);

        let mut buffer = [0_u8; 9];
        let mut writer = SliceWriter::new(&mut buffer);
        format.write(&value, &mut writer).unwrap();
        assert_eq!(buffer, data);
    }

    #[test]
    fn uint_round_trip_preserves_precision() {
        let format = KlvFormat::from(UintFormat::variable());
        let data = [0x00_u8, 0x00, 0x11];
        let mut reader = SliceReader::new(&data);
        let value = format.read(&mut reader, 3).unwrap();
        assert_eq!(value.as_u64().unwrap(), 0x11);
        // Length hint preserves the original 3-byte encoding
        assert_eq!(format.length_of(&value).unwrap(), 3);
        let mut buffer = [0_u8; 3];
        let mut writer = SliceWriter::new(&mut buffer);
        format.write(&value, &mut writer).unwrap();
        assert_eq!(buffer, data);
    }

    #[test]
    fn enum_format_names_members() {
        static NAMES: [&str; 3] = ["Unknown", "Off", "On"];
        let format = KlvFormat::from(EnumFormat::new(&NAMES, 1));
        let data = [0x02_u8];
        let mut reader = SliceReader::new(&data);
        let value = format.read(&mut reader, 1).unwrap();
        assert_eq!(value.as_enumeration().unwrap(), 2);
        assert_eq!(format.print(&value), "On");

        // Out of range decodes as the unknown member
        let data = [0x09_u8];
        let mut reader = SliceReader::new(&data);
        let value = format.read(&mut reader, 1).unwrap();
        assert_eq!(value.as_enumeration().unwrap(), 0);
    }
}
