use super::{Error, ErrorDetails, Result};

/// Simple reader state for extracting data from a `&[u8]` slice.
///
/// Unlike the [`std::io::Read`] implementation for `&[u8]`, this keeps track
/// of the location within the enclosing buffer for more informative errors
/// via [`Result`].
///
/// # Example
///
/// ```
/// use misb_io::SliceReader;
/// let some_data = [0x42];
/// let mut reader = SliceReader::new(&some_data);
/// assert_eq!(reader.read_u8()?, 0x42);
/// # Ok::<(), misb_io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    slice: &'a [u8],
    location: usize,
}

impl<'a> SliceReader<'a> {
    /// Initializes a reader from any byte slice.
    pub fn new(slice: &'a [u8]) -> Self {
        Self { slice, location: 0 }
    }

    /// Creates a fixed `length` sub-reader at the current position, then
    /// advances this reader to the sub-reader's end position.
    ///
    /// The sub-reader semantic makes reading nested data of known lengths
    /// easier with correct bounds checking of the nested data.
    pub fn sub_reader(&mut self, length: usize) -> Result<Self> {
        let location = self.location;
        Ok(Self {
            slice: self.read(length)?,
            location,
        })
    }

    /// Creates an [`Error`] using the contained location.
    pub fn make_error(&self, details: ErrorDetails) -> Error {
        Error {
            location: self.location,
            details,
        }
    }

    /// Byte index of the reader within the original buffer.
    pub fn location(&self) -> usize {
        self.location
    }

    /// Number of bytes remaining in the slice reader.
    pub fn remaining_len(&self) -> usize {
        self.slice.len()
    }

    /// Advance reader without extracting any data from the slice.
    pub fn skip(&mut self, length: usize) -> Result<()> {
        if length > self.slice.len() {
            Err(self.make_error(ErrorDetails::BufferOverrun(length)))
        } else {
            self.location += length;
            self.slice = &self.slice[length..];
            Ok(())
        }
    }

    /// Extract a fixed `length` sub-slice from this reader and advance.
    pub fn read(&mut self, length: usize) -> Result<&'a [u8]> {
        if length > self.slice.len() {
            Err(self.make_error(ErrorDetails::BufferOverrun(length)))
        } else {
            self.location += length;
            let (left, right) = self.slice.split_at(length);
            self.slice = right;
            Ok(left)
        }
    }

    /// Extract a sub-slice of all data remaining to be read.
    pub fn read_to_end(&mut self) -> Result<&'a [u8]> {
        self.read(self.slice.len())
    }

    /// Same as [`SliceReader::read`] but also copies the bytes into an array
    /// of length `N`.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0_u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    /// Read one byte interpreted as [`u8`].
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read two bytes interpreted as big-endian [`u16`].
    pub fn read_be_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array::<2>()?))
    }

    /// Read four bytes interpreted as big-endian [`u32`].
    pub fn read_be_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array::<4>()?))
    }

    /// Read eight bytes interpreted as big-endian [`u64`].
    pub fn read_be_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array::<8>()?))
    }

    /// Extract a fixed `length` sub-slice from this reader without advancing.
    pub fn peek(&self, length: usize) -> Result<&'a [u8]> {
        if length > self.slice.len() {
            Err(self.make_error(ErrorDetails::BufferOverrun(length)))
        } else {
            Ok(&self.slice[0..length])
        }
    }

    /// All data remaining to be read, without advancing.
    pub fn peek_remaining(&self) -> &'a [u8] {
        self.slice
    }
}

/// Writer counterpart of [`SliceReader`]: sequential output into a
/// `&mut [u8]` slice with location tracking.
///
/// # Example
///
/// ```
/// use misb_io::SliceWriter;
/// let mut buffer = [0_u8; 2];
/// let mut writer = SliceWriter::new(&mut buffer);
/// writer.write(&[0x0A, 0x0B])?;
/// assert_eq!(buffer, [0x0A, 0x0B]);
/// # Ok::<(), misb_io::Error>(())
/// ```
#[derive(Debug)]
pub struct SliceWriter<'a> {
    slice: &'a mut [u8],
    location: usize,
}

impl<'a> SliceWriter<'a> {
    /// Initializes a writer over any mutable byte slice.
    pub fn new(slice: &'a mut [u8]) -> Self {
        Self { slice, location: 0 }
    }

    /// Creates an [`Error`] using the contained location.
    pub fn make_error(&self, details: ErrorDetails) -> Error {
        Error {
            location: self.location,
            details,
        }
    }

    /// Byte index of the writer within the original buffer.
    pub fn location(&self) -> usize {
        self.location
    }

    /// Number of bytes remaining in the output slice.
    pub fn remaining_len(&self) -> usize {
        self.slice.len() - self.location
    }

    /// Copy `bytes` into the output and advance.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining_len() {
            return Err(self.make_error(ErrorDetails::BufferOverrun(bytes.len())));
        }
        self.slice[self.location..self.location + bytes.len()].copy_from_slice(bytes);
        self.location += bytes.len();
        Ok(())
    }

    /// Write one byte.
    pub fn write_u8(&mut self, byte: u8) -> Result<()> {
        self.write(&[byte])
    }

    /// Bytes written since the given mark, as returned by
    /// [`SliceWriter::location`].
    ///
    /// Used to checksum serialized data without a second pass.
    pub fn written_since(&self, mark: usize) -> &[u8] {
        &self.slice[mark..self.location]
    }
}

/// Convenience macro to read a modular bitfield from a [`SliceReader`].
///
/// Wraps [`SliceReader::read_array`] to read the exact number of bytes
/// required by the bitfield type. Must be expanded in a function that
/// returns [`Result`].
///
/// # Example
///
/// ```
/// use modular_bitfield_msb::prelude::*;
/// use misb_io::{read_bitfield, SliceReader};
/// #[bitfield]
/// pub(crate) struct MyBitfield {
///     pub a_bit: B1,
///     #[skip]
///     padding: B7,
/// }
///
/// let some_data = [0x80];
/// let mut reader = SliceReader::new(&some_data);
/// let the_bitfield = read_bitfield!(reader, MyBitfield);
/// assert_eq!(the_bitfield.a_bit(), 1);
/// # Ok::<(), misb_io::Error>(())
/// ```
#[macro_export]
macro_rules! read_bitfield {
    ($reader:expr, $type:ty) => {
        <$type>::from_bytes($reader.read_array::<{ std::mem::size_of::<$type>() }>()?)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_reader_advances_parent() {
        let data = [1_u8, 2, 3, 4, 5];
        let mut reader = SliceReader::new(&data);
        let mut sub = reader.sub_reader(3).unwrap();
        assert_eq!(sub.read_to_end().unwrap(), &[1, 2, 3]);
        assert_eq!(reader.location(), 3);
        assert_eq!(reader.read_to_end().unwrap(), &[4, 5]);
    }

    #[test]
    fn read_past_end_reports_location() {
        let data = [1_u8, 2];
        let mut reader = SliceReader::new(&data);
        reader.read_u8().unwrap();
        let err = reader.read_array::<4>().unwrap_err();
        assert_eq!(err.location, 1);
        assert_eq!(err.details, ErrorDetails::BufferOverrun(4));
    }

    #[test]
    fn writer_tracks_written_region() {
        let mut buffer = [0_u8; 8];
        let mut writer = SliceWriter::new(&mut buffer);
        writer.write_u8(0xAA).unwrap();
        let mark = writer.location();
        writer.write(&[1, 2, 3]).unwrap();
        assert_eq!(writer.written_since(mark), &[1, 2, 3]);
        assert_eq!(writer.remaining_len(), 4);
    }
}
