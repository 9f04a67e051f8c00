//! Library for reading and writing MISB KLV metadata and STANAG 4607 GMTI
//! packets.
//!
//! # Usage
//! Simply add this crate as a dependency in your `Cargo.toml`.
//!
//! ```toml
//! [dependencies]
//! misb-io = "~0.1.0"
//! ```
//!
//! The crate has three layers:
//!
//! 1. Byte-level codecs: [`SliceReader`] / [`SliceWriter`] cursors, the
//!    primitive integer / BER / BER-OID / IMAP / FLINT codecs in [`codec`],
//!    and the checksum algorithms in [`checksum`].
//! 2. The KLV object model: [`Value`], [`LocalSet`], [`UniversalSet`],
//!    per-tag [`TagTraits`] catalogs for each supported MISB standard, and
//!    the [`read_klv_packet`] / [`write_klv_packet`] framer. STANAG 4607
//!    packets have their own framer in [`stanag4607`].
//! 3. The stream model: a [`Timeline`] of per-tag interval maps, filled by a
//!    [`Demuxer`] and drained back into packets by a [`Muxer`], plus the
//!    [`frame_metadata`] projection of a timeline instant into a flat field
//!    bag.
//!
//! All diagnostics are emitted through the [`log`] facade; the library never
//! installs a logger itself.

#![allow(unused)]
#![deny(missing_docs, unsafe_code)]

use std::fmt::{Debug, Display, Formatter};
use std::result;

mod slice_reader;
pub use slice_reader::{SliceReader, SliceWriter};

pub mod codec;

mod key;
pub use key::{LdsKey, UdsKey, UdsKeyCategory, UdsKeyGroupType};

mod value;
pub use value::{Blob, Value, ValueData};

mod format;
pub use format::{
    BerOidFormat, BlobFormat, EnumFormat, FloatFormat, ImapFormat, KlvFormat, SflintFormat,
    SintFormat, StringFormat, U64ListFormat, UflintFormat, UintFormat,
};

mod set;
pub use set::{LocalSet, LocalSetFormat, Set, UniversalSet, UniversalSetFormat};

mod tag_traits;
pub use tag_traits::{TagCountRange, TagTraits, TagTraitsLookup};

pub mod checksum;
pub use checksum::{ChecksumAlgorithm, ChecksumPacketFormat};

mod packet;
pub use packet::{
    klv_packet_length, klv_packet_timestamp, packet_traits, read_klv_packet, write_klv_packet,
    KlvPacket, Standard,
};

pub mod st0102;
pub mod st0104;
pub mod st0601;
pub mod st0806;
pub mod st0903;
pub mod st1002;
pub mod st1108;
pub mod st1204;

mod timeline;
pub use timeline::{Interval, IntervalMap, Timeline, TimelineKey};

mod demuxer;
pub use demuxer::Demuxer;

mod muxer;
pub use muxer::Muxer;

pub mod frame_metadata;

pub mod stanag4607;

/// Errors that may be encountered while parsing or serializing metadata.
///
/// Only *framing* failures surface as errors: a truncated buffer, a missing
/// or malformed header, a value too wide for its encoding. Field-level parse
/// failures are recoverable and are handled inside the format layer by
/// wrapping the offending bytes in a [`Blob`] value instead (see
/// [`KlvFormat::read`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetails {
    /// A read or write would run past the end of the buffer.
    /// The [`usize`] parameter is the length of the offending access.
    BufferOverrun(usize),
    /// A value does not fit in the requested native or encoded width.
    TypeOverflow,
    /// No UDS key prefix was found while scanning for the next packet.
    KeyNotFound,
    /// A UDS key prefix was found, but the attached 16 bytes do not form a
    /// valid SMPTE Universal Label.
    InvalidKey,
    /// A fixed-length format was handed the wrong number of bytes.
    BadFixedLength {
        /// Length the format requires.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// A ST 0601 local set did not begin with the precision timestamp.
    MissingTimestamp,
    /// A checksum trailer was expected but its header bytes were absent.
    MissingChecksum,
    /// A value of a variable-precision format carries no length hint, so its
    /// encoded length cannot be determined.
    MissingLengthHint,
    /// A [`Value`] was queried for a type it does not contain.
    BadCast {
        /// Name of the requested type.
        expected: &'static str,
        /// Name of the contained type.
        actual: &'static str,
    },
    /// A single-entry query matched more than one entry.
    AmbiguousKey,
    /// A single-entry query matched nothing.
    ValueNotFound,
    /// An enumerated field held a value outside its defined range.
    UnknownEnumVariant(u64),
    /// [`Muxer::receive_frame`] was called more times than
    /// [`Muxer::send_frame`].
    MoreFramesThanSent,
}

impl Display for ErrorDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorDetails::BufferOverrun(length) => {
                write!(f, "access of {} bytes overruns buffer", length)
            }
            ErrorDetails::TypeOverflow => write!(f, "value overflows requested type"),
            ErrorDetails::KeyNotFound => write!(f, "universal key not found in data buffer"),
            ErrorDetails::InvalidKey => write!(f, "invalid universal key"),
            ErrorDetails::BadFixedLength { expected, actual } => write!(
                f,
                "fixed-length format expected {} bytes, received {}",
                expected, actual
            ),
            ErrorDetails::MissingTimestamp => {
                write!(f, "timestamp not present at beginning of packet")
            }
            ErrorDetails::MissingChecksum => write!(f, "checksum header not present"),
            ErrorDetails::MissingLengthHint => {
                write!(f, "variable-precision value carries no length hint")
            }
            ErrorDetails::BadCast { expected, actual } => {
                write!(f, "value holds {}, not {}", actual, expected)
            }
            ErrorDetails::AmbiguousKey => write!(f, "more than one entry found"),
            ErrorDetails::ValueNotFound => write!(f, "entry not found"),
            ErrorDetails::UnknownEnumVariant(value) => {
                write!(f, "value {} is not a known enumeration member", value)
            }
            ErrorDetails::MoreFramesThanSent => write!(f, "more frames requested than sent"),
        }
    }
}

/// Error type encapsulating all possible parser and serializer errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// Byte index within the enclosing buffer at which the error was
    /// encountered.
    pub location: usize,
    /// Information about the error.
    pub details: ErrorDetails,
}

impl Error {
    /// Creates an error at an explicit buffer location.
    pub fn new(location: usize, details: ErrorDetails) -> Self {
        Self { location, details }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at byte {})", self.details, self.location)
    }
}

impl std::error::Error for Error {}

/// [`std::result::Result`] alias that uses [`Error`].
pub type Result<T> = result::Result<T, Error>;
