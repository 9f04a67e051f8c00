//! Checksum algorithms used by the MISB local sets, and the trailer packets
//! that carry them.
//!
//! Three algorithms appear across the standards: a 16-bit running sum of
//! big-endian words (ST 0601), CRC-16-CCITT with a 16-bit zero augmentation
//! (ST 0903, ST 1002, ST 1108), and CRC-32-MPEG (ST 0806). The two CRCs come
//! from the [`crc`] crate: `CRC_16_SPI_FUJITSU` is the catalogued name for
//! the augmented CCITT variant (polynomial `0x1021`, initial value `0xFFFF`
//! before augmentation), and `CRC_32_MPEG_2` matches the MPEG checksum
//! exactly.

use super::codec::{read_uint, write_uint};
use super::{ErrorDetails, Result, SliceReader, SliceWriter};
use crc::{Crc, CRC_16_SPI_FUJITSU, CRC_32_MPEG_2};

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_SPI_FUJITSU);
const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);

// ----------------------------------------------------------------------------
/// Calculate a running sum of each 16-bit big-endian word in the given
/// bytes.
///
/// If there are an odd number of bytes, the result is the same as if one
/// zero byte were appended. `parity` shifts the alternation so that a buffer
/// may be summed in pieces: pass the running total and the low bit of the
/// byte count consumed so far.
pub fn running_sum_16(data: &[u8], initial_value: u16, parity: bool) -> u16 {
    let mut sum = initial_value;
    let mut odd = parity;
    for &byte in data {
        let word = if odd {
            u16::from(byte)
        } else {
            u16::from(byte) << 8
        };
        sum = sum.wrapping_add(word);
        odd = !odd;
    }
    sum
}

// ----------------------------------------------------------------------------
/// Calculate the CRC-16-CCITT checksum of the given bytes.
///
/// Polynomial `0x1021`, initial value `0xFFFF`, 16 bits of zero shifted in
/// after the data, no reflection, no output XOR. The empty input therefore
/// evaluates to `0x1D0F` rather than the initial value.
pub fn crc_16_ccitt(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}

// ----------------------------------------------------------------------------
/// Calculate the CRC-32-MPEG checksum of the given bytes.
///
/// Polynomial `0x04C11DB7`, initial value `0xFFFFFFFF`, no reflection, no
/// output XOR.
pub fn crc_32_mpeg(data: &[u8]) -> u32 {
    CRC32.checksum(data)
}

// ----------------------------------------------------------------------------
/// The checksum algorithms used across the MISB standards.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    /// 16-bit running sum of big-endian words (ST 0601).
    RunningSum16,
    /// CRC-16-CCITT with zero augmentation (ST 0903, ST 1002, ST 1108).
    Crc16Ccitt,
    /// CRC-32-MPEG (ST 0806).
    Crc32Mpeg,
}

impl ChecksumAlgorithm {
    /// Width in bytes of the checksum this algorithm produces.
    pub fn payload_length(&self) -> usize {
        match self {
            ChecksumAlgorithm::RunningSum16 | ChecksumAlgorithm::Crc16Ccitt => 2,
            ChecksumAlgorithm::Crc32Mpeg => 4,
        }
    }
}

// ----------------------------------------------------------------------------
/// A checksum trailer: a fixed two-byte header (the checksum's tag and
/// length) immediately followed by the big-endian checksum value.
///
/// The checksum is computed over all set bytes that precede the trailer,
/// with the trailer header itself folded in at the end, so that the bytes
/// covered are exactly the bytes of the stream up to the checksum value.
#[derive(Debug, Copy, Clone)]
pub struct ChecksumPacketFormat {
    algorithm: ChecksumAlgorithm,
    header: [u8; 2],
}

impl ChecksumPacketFormat {
    /// Creates a trailer format for `algorithm` headed by `header`.
    pub fn new(algorithm: ChecksumAlgorithm, header: [u8; 2]) -> Self {
        Self { algorithm, header }
    }

    /// The trailer's header bytes.
    pub fn header(&self) -> [u8; 2] {
        self.header
    }

    /// Total trailer length: header plus checksum value.
    pub fn length(&self) -> usize {
        2 + self.algorithm.payload_length()
    }

    /// Compute the checksum of `data` followed by the trailer header.
    pub fn evaluate(&self, data: &[u8]) -> u64 {
        match self.algorithm {
            ChecksumAlgorithm::RunningSum16 => {
                let sum = running_sum_16(data, 0, false);
                u64::from(running_sum_16(&self.header, sum, data.len() % 2 == 1))
            }
            ChecksumAlgorithm::Crc16Ccitt => {
                let mut digest = CRC16.digest();
                digest.update(data);
                digest.update(&self.header);
                u64::from(digest.finalize())
            }
            ChecksumAlgorithm::Crc32Mpeg => {
                let mut digest = CRC32.digest();
                digest.update(data);
                digest.update(&self.header);
                u64::from(digest.finalize())
            }
        }
    }

    /// Whether `payload` ends with this trailer's header in the position a
    /// trailer would occupy.
    pub fn is_present(&self, payload: &[u8]) -> bool {
        payload.len() >= self.length()
            && payload[payload.len() - self.length()..][..2] == self.header
    }

    /// Read the checksum value out of `trailer`, verifying the header.
    ///
    /// `trailer` must be exactly [`ChecksumPacketFormat::length`] bytes.
    pub fn read(&self, trailer: &[u8]) -> Result<u64> {
        let mut reader = SliceReader::new(trailer);
        if reader.read_array::<2>()? != self.header {
            return Err(reader.make_error(ErrorDetails::MissingChecksum));
        }
        read_uint(&mut reader, self.algorithm.payload_length())
    }

    /// Write the trailer header followed by the checksum value.
    pub fn write(&self, value: u64, writer: &mut SliceWriter<'_>) -> Result<()> {
        writer.write(&self.header)?;
        write_uint(value, writer, self.algorithm.payload_length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc_16_reference_vectors() {
        assert_eq!(crc_16_ccitt(&[]), 0x1D0F);
        assert_eq!(crc_16_ccitt(b"123456789"), 0xE5CC);
    }

    #[test]
    fn crc_32_reference_vector() {
        assert_eq!(crc_32_mpeg(b"123456789"), 0x0376_E6E7);
    }

    #[test]
    fn crc_32_of_message_and_checksum_is_zero() {
        let message = b"metadata stream";
        let crc = crc_32_mpeg(message);
        let mut with_trailer = message.to_vec();
        with_trailer.extend_from_slice(&crc.to_be_bytes());
        assert_eq!(crc_32_mpeg(&with_trailer), 0);
    }

    #[test]
    fn running_sum_alternates_words() {
        // 0x0102 + 0x0304 = 0x0406
        assert_eq!(running_sum_16(&[1, 2, 3, 4], 0, false), 0x0406);
        // Odd byte count behaves as if zero-padded: 0x0102 + 0x0300
        assert_eq!(running_sum_16(&[1, 2, 3], 0, false), 0x0402);
        // Split computation must match the single pass
        let whole = running_sum_16(&[1, 2, 3, 4, 5], 0, false);
        let first = running_sum_16(&[1, 2, 3], 0, false);
        assert_eq!(running_sum_16(&[4, 5], first, true), whole);
    }

    #[test]
    fn single_byte_flip_changes_every_checksum() {
        let data = b"0123456789abcdef";
        for algorithm in [
            ChecksumAlgorithm::RunningSum16,
            ChecksumAlgorithm::Crc16Ccitt,
            ChecksumAlgorithm::Crc32Mpeg,
        ] {
            let format = ChecksumPacketFormat::new(algorithm, [0x01, 0x02]);
            let baseline = format.evaluate(data);
            for i in 0..data.len() {
                let mut altered = data.to_vec();
                altered[i] ^= 0x40;
                assert_ne!(format.evaluate(&altered), baseline);
            }
        }
    }

    #[test]
    fn trailer_round_trip() {
        let format = ChecksumPacketFormat::new(ChecksumAlgorithm::Crc16Ccitt, [0x0B, 0x02]);
        let mut buffer = [0_u8; 4];
        let mut writer = SliceWriter::new(&mut buffer);
        format.write(0xBEEF, &mut writer).unwrap();
        drop(writer);
        assert_eq!(buffer, [0x0B, 0x02, 0xBE, 0xEF]);
        assert!(format.is_present(&buffer));
        assert_eq!(format.read(&buffer).unwrap(), 0xBEEF);
    }
}
