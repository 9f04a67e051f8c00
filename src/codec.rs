//! Primitive codecs shared by every KLV and STANAG 4607 format.
//!
//! This module handles the serialization and deserialization of the basic
//! wire encodings:
//!
//! - int: general signed or unsigned integer of any byte length up to 8,
//!   written MSB first. Important to get this one precisely right because it
//!   is the base of most KLV data.
//! - BER: unsigned integer which encodes its own length. Up to 127 it is
//!   identical to a one-byte int, otherwise the first byte encodes the
//!   number of following bytes.
//! - BER-OID: unsigned integer which encodes its own length. The first bit
//!   of each byte signals whether there is another following byte; the lower
//!   seven bits concatenated together form the actual value.
//! - IMAP / FLINT: fixed-point mappings of an integer onto a real interval.
//! - Bounded ASCII strings and raw byte blobs.
//!
//! All readers advance the cursor by exactly the number of bytes consumed on
//! success and leave it untouched on failure.

use super::value::Blob;
use super::{ErrorDetails, Result, SliceReader, SliceWriter};

// ----------------------------------------------------------------------------
// Number of bits required to store the given unsigned integer.
fn uint_bit_length(value: u64) -> usize {
    if value == 0 {
        1
    } else {
        64 - value.leading_zeros() as usize
    }
}

// ----------------------------------------------------------------------------
// Number of bits required to store the given signed integer, sign included.
fn sint_bit_length(value: i64) -> usize {
    if value == 0 {
        return 1;
    }
    // Transform into an unsigned number of equivalent length
    let unsigned = if value < 0 { !(value as u64) } else { value as u64 } << 1;
    let mut bits = 0;
    let mut remaining = unsigned;
    while remaining != 0 {
        remaining >>= 1;
        bits += 1;
    }
    bits
}

// ----------------------------------------------------------------------------
/// Read a `length`-byte big-endian unsigned integer.
///
/// Fails with [`ErrorDetails::TypeOverflow`] when `length` exceeds eight
/// bytes. A `length` of zero yields zero.
pub fn read_uint(reader: &mut SliceReader<'_>, length: usize) -> Result<u64> {
    if length > 8 {
        return Err(reader.make_error(ErrorDetails::TypeOverflow));
    }
    if length == 0 {
        return Ok(0);
    }
    let bytes = reader.read(length)?;
    Ok(bytes.iter().fold(0_u64, |value, &byte| (value << 8) | u64::from(byte)))
}

// ----------------------------------------------------------------------------
/// Read a `length`-byte big-endian signed integer, extending the sign bit.
///
/// Fails with [`ErrorDetails::TypeOverflow`] when `length` exceeds eight
/// bytes. A `length` of zero yields zero.
pub fn read_sint(reader: &mut SliceReader<'_>, length: usize) -> Result<i64> {
    let mut result = read_uint(reader, length)?;
    if length > 0 && length < 8 {
        let sign_bit = 1_u64 << (8 * length - 1);
        if result & sign_bit != 0 {
            result |= !0_u64 << (8 * length);
        }
    }
    Ok(result as i64)
}

// ----------------------------------------------------------------------------
/// Write a big-endian unsigned integer using exactly `length` bytes,
/// left-zero-padding as needed.
///
/// Fails with [`ErrorDetails::TypeOverflow`] when `value` does not fit.
pub fn write_uint(value: u64, writer: &mut SliceWriter<'_>, length: usize) -> Result<()> {
    if uint_length(value) > length {
        return Err(writer.make_error(ErrorDetails::TypeOverflow));
    }
    for i in 0..length {
        let shift_amount = (length - i - 1) * 8;
        writer.write_u8((value >> shift_amount) as u8)?;
    }
    Ok(())
}

// ----------------------------------------------------------------------------
/// Write a big-endian signed integer using exactly `length` bytes,
/// sign-extending into the padding.
///
/// Fails with [`ErrorDetails::TypeOverflow`] when `value` does not fit.
pub fn write_sint(value: i64, writer: &mut SliceWriter<'_>, length: usize) -> Result<()> {
    if sint_length(value) > length {
        return Err(writer.make_error(ErrorDetails::TypeOverflow));
    }
    for i in 0..length {
        let shift_amount = (length - i - 1) * 8;
        writer.write_u8((value >> shift_amount) as u8)?;
    }
    Ok(())
}

// ----------------------------------------------------------------------------
/// Minimum number of bytes required to store the given unsigned integer.
/// At least 1.
pub fn uint_length(value: u64) -> usize {
    (uint_bit_length(value) + 7) / 8
}

// ----------------------------------------------------------------------------
/// Minimum number of bytes required to store the given signed integer.
/// At least 1.
pub fn sint_length(value: i64) -> usize {
    (sint_bit_length(value) + 7) / 8
}

// ----------------------------------------------------------------------------
/// Read an unsigned integer in BER form.
///
/// Short form: high bit of the lead byte clear, remaining bits are the value.
/// Long form: high bit set, low seven bits give the count of big-endian
/// value bytes that follow.
///
/// Fails with [`ErrorDetails::BufferOverrun`] when decoding would read more
/// than `max_length` bytes.
pub fn read_ber(reader: &mut SliceReader<'_>, max_length: usize) -> Result<u64> {
    if max_length == 0 {
        return Err(reader.make_error(ErrorDetails::BufferOverrun(1)));
    }
    let lead = reader.peek(1)?[0];
    if lead & 0x80 == 0 {
        reader.skip(1)?;
        return Ok(u64::from(lead));
    }
    let total_length = usize::from(lead & 0x7F) + 1;
    if total_length > max_length {
        return Err(reader.make_error(ErrorDetails::BufferOverrun(total_length)));
    }
    let rewind = reader.clone();
    reader.skip(1)?;
    match read_uint(reader, total_length - 1) {
        Ok(value) => Ok(value),
        Err(error) => {
            *reader = rewind;
            Err(error)
        }
    }
}

// ----------------------------------------------------------------------------
/// Write an unsigned integer in BER form.
///
/// Fails with [`ErrorDetails::BufferOverrun`] when encoding would write more
/// than `max_length` bytes.
pub fn write_ber(value: u64, writer: &mut SliceWriter<'_>, max_length: usize) -> Result<()> {
    let value_length = ber_length(value);
    if value_length > max_length {
        return Err(writer.make_error(ErrorDetails::BufferOverrun(value_length)));
    }
    if value < 128 {
        writer.write_u8(value as u8)
    } else {
        writer.write_u8(0x80 | (value_length - 1) as u8)?;
        write_uint(value, writer, value_length - 1)
    }
}

// ----------------------------------------------------------------------------
/// Number of bytes required to store the given integer in BER form.
pub fn ber_length(value: u64) -> usize {
    if value > 127 {
        uint_length(value) + 1
    } else {
        1
    }
}

// ----------------------------------------------------------------------------
/// Read an unsigned integer in BER-OID form.
///
/// Seven value bits per byte; a set high bit means another byte follows.
///
/// Fails with [`ErrorDetails::BufferOverrun`] when no terminating byte is
/// found within `max_length` bytes and with [`ErrorDetails::TypeOverflow`]
/// when the accumulated value would exceed 64 bits.
pub fn read_ber_oid(reader: &mut SliceReader<'_>, max_length: usize) -> Result<u64> {
    let rewind = reader.clone();
    let mut remaining = max_length;
    let mut value = 0_u64;
    loop {
        if remaining == 0 {
            let error = reader.make_error(ErrorDetails::BufferOverrun(max_length + 1));
            *reader = rewind;
            return Err(error);
        }
        remaining -= 1;

        if value >> 57 != 0 {
            let error = reader.make_error(ErrorDetails::TypeOverflow);
            *reader = rewind;
            return Err(error);
        }

        let byte = reader.read_u8()?;
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
}

// ----------------------------------------------------------------------------
/// Write an unsigned integer in BER-OID form.
///
/// Fails with [`ErrorDetails::BufferOverrun`] when encoding would write more
/// than `max_length` bytes.
pub fn write_ber_oid(value: u64, writer: &mut SliceWriter<'_>, max_length: usize) -> Result<()> {
    let mut value_length = ber_oid_length(value);
    if value_length > max_length {
        return Err(writer.make_error(ErrorDetails::BufferOverrun(value_length)));
    }
    while value_length > 0 {
        value_length -= 1;
        let shift_amount = value_length * 7;
        let top_bit = if value_length > 0 { 0x80 } else { 0x00 };
        writer.write_u8(top_bit | ((value >> shift_amount) & 0x7F) as u8)?;
    }
    Ok(())
}

// ----------------------------------------------------------------------------
/// Number of bytes required to store the given integer in BER-OID form.
pub fn ber_oid_length(value: u64) -> usize {
    (uint_bit_length(value) + 6) / 7
}

// ----------------------------------------------------------------------------
/// Read `length` bytes as a bounded ASCII string.
///
/// Trailing spaces are preserved; trimming is a caller policy. Bytes outside
/// the ASCII range are replaced rather than rejected.
pub fn read_string(reader: &mut SliceReader<'_>, length: usize) -> Result<String> {
    let bytes = reader.read(length)?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

// ----------------------------------------------------------------------------
/// Write a string as raw bytes.
pub fn write_string(value: &str, writer: &mut SliceWriter<'_>) -> Result<()> {
    writer.write(value.as_bytes())
}

// ----------------------------------------------------------------------------
/// Number of bytes required to store the given string.
pub fn string_length(value: &str) -> usize {
    value.as_bytes().len()
}

// ----------------------------------------------------------------------------
/// Read `length` raw bytes into a [`Blob`].
pub fn read_blob(reader: &mut SliceReader<'_>, length: usize) -> Result<Blob> {
    Ok(Blob::from(reader.read(length)?))
}

// ----------------------------------------------------------------------------
/// Write a [`Blob`] back out as raw bytes.
pub fn write_blob(value: &Blob, writer: &mut SliceWriter<'_>) -> Result<()> {
    writer.write(value.as_slice())
}

// ----------------------------------------------------------------------------
/// Read a `length`-byte IMAP fixed-point value mapped onto `[lo, hi]`.
///
/// The integer range is mapped uniformly: one count equals
/// `(hi - lo) / (2^(8 * length) - 1)`.
pub fn read_imap(lo: f64, hi: f64, reader: &mut SliceReader<'_>, length: usize) -> Result<f64> {
    let int_value = read_uint(reader, length)?;
    Ok(int_value as f64 * imap_scale(lo, hi, length) + lo)
}

// ----------------------------------------------------------------------------
/// Write a value in `[lo, hi]` as a `length`-byte IMAP fixed-point integer,
/// rounding to the nearest representable count.
pub fn write_imap(
    value: f64,
    lo: f64,
    hi: f64,
    writer: &mut SliceWriter<'_>,
    length: usize,
) -> Result<()> {
    let scale = imap_scale(lo, hi, length);
    let clamped = value.max(lo).min(hi);
    let int_value = ((clamped - lo) / scale).round() as u64;
    write_uint(int_value, writer, length)
}

fn imap_scale(lo: f64, hi: f64, length: usize) -> f64 {
    (hi - lo) / (2.0_f64.powi(8 * length as i32) - 1.0)
}

// ----------------------------------------------------------------------------
/// Read a `length`-byte unsigned FLINT fixed-point value mapped onto
/// `[lo, hi]`.
///
/// One count equals `(hi - lo) / (2^(8 * length - 1) - 1)`.
pub fn read_uflint(lo: f64, hi: f64, reader: &mut SliceReader<'_>, length: usize) -> Result<f64> {
    let int_value = read_uint(reader, length)?;
    Ok(int_value as f64 * uflint_scale(lo, hi, length) + lo)
}

// ----------------------------------------------------------------------------
/// Write a value in `[lo, hi]` as a `length`-byte unsigned FLINT integer.
pub fn write_uflint(
    value: f64,
    lo: f64,
    hi: f64,
    writer: &mut SliceWriter<'_>,
    length: usize,
) -> Result<()> {
    let scale = uflint_scale(lo, hi, length);
    let clamped = value.max(lo).min(hi);
    let int_value = ((clamped - lo) / scale).round() as u64;
    write_uint(int_value, writer, length)
}

fn uflint_scale(lo: f64, hi: f64, length: usize) -> f64 {
    (hi - lo) / (2.0_f64.powi(8 * length as i32 - 1) - 1.0)
}

// ----------------------------------------------------------------------------
/// Read a `length`-byte signed FLINT fixed-point value mapped onto the
/// symmetric interval `[lo, hi]`.
///
/// The top bit of the two's complement integer carries the sign; the
/// magnitude range maps onto `[0, (hi - lo) / 2]` with one count equal to
/// `(hi - lo) / 2 / (2^(8 * length - 1) - 1)`.
pub fn read_sflint(lo: f64, hi: f64, reader: &mut SliceReader<'_>, length: usize) -> Result<f64> {
    let int_value = read_sint(reader, length)?;
    Ok(int_value as f64 * sflint_scale(lo, hi, length))
}

// ----------------------------------------------------------------------------
/// Write a value in `[lo, hi]` as a `length`-byte signed FLINT integer.
pub fn write_sflint(
    value: f64,
    lo: f64,
    hi: f64,
    writer: &mut SliceWriter<'_>,
    length: usize,
) -> Result<()> {
    let scale = sflint_scale(lo, hi, length);
    let clamped = value.max(lo).min(hi);
    let int_value = (clamped / scale).round() as i64;
    write_sint(int_value, writer, length)
}

fn sflint_scale(lo: f64, hi: f64, length: usize) -> f64 {
    (hi - lo) / 2.0 / (2.0_f64.powi(8 * length as i32 - 1) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_to_vec<F>(length: usize, write: F) -> Vec<u8>
    where
        F: FnOnce(&mut SliceWriter<'_>),
    {
        let mut buffer = vec![0_u8; length];
        let mut writer = SliceWriter::new(&mut buffer);
        write(&mut writer);
        let written = writer.location();
        drop(writer);
        buffer.truncate(written);
        buffer
    }

    #[test]
    fn uint_round_trip() {
        for &(value, length) in &[
            (0_u64, 1_usize),
            (1, 1),
            (255, 1),
            (256, 2),
            (0xFFFF, 2),
            (0x0102_0304, 4),
            (u64::MAX, 8),
        ] {
            let bytes = write_to_vec(8, |w| write_uint(value, w, length).unwrap());
            assert_eq!(bytes.len(), length);
            let mut reader = SliceReader::new(&bytes);
            assert_eq!(read_uint(&mut reader, length).unwrap(), value);
        }
    }

    #[test]
    fn sint_sign_extension() {
        let bytes = [0xFF_u8, 0x7F];
        let mut reader = SliceReader::new(&bytes);
        assert_eq!(read_sint(&mut reader, 2).unwrap(), -129);

        let bytes = write_to_vec(4, |w| write_sint(-129, w, 4).unwrap());
        assert_eq!(bytes, [0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn uint_overflow_detected() {
        let mut buffer = [0_u8; 1];
        let mut writer = SliceWriter::new(&mut buffer);
        assert_eq!(
            write_uint(256, &mut writer, 1).unwrap_err().details,
            ErrorDetails::TypeOverflow
        );
    }

    #[test]
    fn int_length_minimums() {
        assert_eq!(uint_length(0), 1);
        assert_eq!(uint_length(255), 1);
        assert_eq!(uint_length(256), 2);
        assert_eq!(sint_length(127), 1);
        assert_eq!(sint_length(128), 2);
        assert_eq!(sint_length(-128), 1);
        assert_eq!(sint_length(-129), 2);
    }

    #[test]
    fn ber_encodings_match_reference() {
        // Values and encodings from the MISB Motion Imagery Handbook
        for &(value, ref bytes) in &[
            (0_u64, vec![0x00_u8]),
            (127, vec![0x7F]),
            (128, vec![0x81, 0x80]),
            (65535, vec![0x82, 0xFF, 0xFF]),
            (16777216, vec![0x84, 0x01, 0x00, 0x00, 0x00]),
        ] {
            let encoded = write_to_vec(16, |w| write_ber(value, w, 16).unwrap());
            assert_eq!(&encoded, bytes);
            assert_eq!(ber_length(value), bytes.len());
            let mut reader = SliceReader::new(bytes);
            assert_eq!(read_ber(&mut reader, bytes.len()).unwrap(), value);
            assert_eq!(reader.remaining_len(), 0);
        }
    }

    #[test]
    fn ber_oid_boundaries() {
        for &value in &[
            0_u64,
            1,
            127,
            128,
            255,
            256,
            0xFFFF,
            0x1_0000,
            0xFFFF_FFFF,
            0x1_0000_0000,
            u64::MAX,
        ] {
            let encoded = write_to_vec(16, |w| write_ber_oid(value, w, 16).unwrap());
            assert_eq!(encoded.len(), ber_oid_length(value).max(1));
            let mut reader = SliceReader::new(&encoded);
            assert_eq!(read_ber_oid(&mut reader, encoded.len()).unwrap(), value);
            assert_eq!(reader.remaining_len(), 0);
        }
    }

    #[test]
    fn ber_oid_missing_terminator() {
        let bytes = [0x81_u8, 0x82, 0x83];
        let mut reader = SliceReader::new(&bytes);
        let err = read_ber_oid(&mut reader, bytes.len()).unwrap_err();
        assert_eq!(err.details, ErrorDetails::BufferOverrun(4));
        // Cursor must be rewound on failure
        assert_eq!(reader.remaining_len(), 3);
    }

    #[test]
    fn imap_monotonic_and_inverse() {
        let (lo, hi, length) = (-900.0, 19000.0, 2);
        let mut previous = f64::NEG_INFINITY;
        for int_value in (0..=0xFFFF_u64).step_by(0x111) {
            let bytes = write_to_vec(2, |w| write_uint(int_value, w, length).unwrap());
            let mut reader = SliceReader::new(&bytes);
            let value = read_imap(lo, hi, &mut reader, length).unwrap();
            assert!(value >= previous);
            previous = value;

            let rewritten = write_to_vec(2, |w| write_imap(value, lo, hi, w, length).unwrap());
            assert_eq!(rewritten, bytes);
        }
    }

    #[test]
    fn sflint_is_symmetric() {
        let (lo, hi, length) = (-90.0, 90.0, 4);
        let bytes = write_to_vec(4, |w| write_sflint(45.0, lo, hi, w, length).unwrap());
        let mut reader = SliceReader::new(&bytes);
        let decoded = read_sflint(lo, hi, &mut reader, length).unwrap();
        assert!((decoded - 45.0).abs() < 1e-6);

        let bytes = write_to_vec(4, |w| write_sflint(-45.0, lo, hi, w, length).unwrap());
        let mut reader = SliceReader::new(&bytes);
        let decoded = read_sflint(lo, hi, &mut reader, length).unwrap();
        assert!((decoded + 45.0).abs() < 1e-6);
    }

    #[test]
    fn string_preserves_trailing_spaces() {
        let bytes = b"AF-101  ";
        let mut reader = SliceReader::new(bytes);
        assert_eq!(read_string(&mut reader, bytes.len()).unwrap(), "AF-101  ");
    }
}
