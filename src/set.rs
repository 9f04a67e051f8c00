use super::checksum::ChecksumPacketFormat;
use super::codec::{ber_length, read_ber, write_ber};
use super::format::{cast_error, length_description, FormatImpl, KlvFormat};
use super::key::{read_lds_key, read_uds_key, write_lds_key, write_uds_key, LdsKey, UdsKey};
use super::tag_traits::TagTraitsLookup;
use super::value::{Blob, Value, ValueData};
use super::{ErrorDetails, Result, SliceReader, SliceWriter};
use log::{debug, warn};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Ordered multimap from tag keys to [`Value`]s, the container behind KLV
/// universal and local sets.
///
/// Usually there will be only one entry per key, so [`Set::find`] and
/// [`Set::at`] extract a single item while checking its singularity.
/// Insertion order is retained for serialization, but it plays no role in a
/// set's identity: two sets holding the same entries in different orders
/// compare equal, through [`Set::fully_sorted`].
#[derive(Debug, Clone, Default)]
pub struct Set<K> {
    items: Vec<(K, Value)>,
}

impl<K: Ord + Copy> Set<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of entries across all keys.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set holds no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(K, Value)> {
        self.items.iter()
    }

    /// Number of entries stored under `key`.
    pub fn count(&self, key: K) -> usize {
        self.items.iter().filter(|(k, _)| *k == key).count()
    }

    /// Whether at least one entry is stored under `key`.
    pub fn has(&self, key: K) -> bool {
        self.items.iter().any(|(k, _)| *k == key)
    }

    /// Appends an entry.
    pub fn add<V: Into<Value>>(&mut self, key: K, value: V) {
        self.items.push((key, value.into()));
    }

    /// Removes every entry stored under `key`.
    pub fn erase(&mut self, key: K) {
        self.items.retain(|(k, _)| *k != key);
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The single entry stored under `key`, or `None` unless exactly one
    /// entry matches.
    pub fn find(&self, key: K) -> Option<&Value> {
        let mut matches = self.items.iter().filter(|(k, _)| *k == key);
        match (matches.next(), matches.next()) {
            (Some((_, value)), None) => Some(value),
            _ => None,
        }
    }

    /// The single value stored under `key`.
    ///
    /// Fails with [`ErrorDetails::ValueNotFound`] if no entry is present and
    /// [`ErrorDetails::AmbiguousKey`] if more than one is.
    pub fn at(&self, key: K) -> Result<&Value> {
        let mut matches = self.items.iter().filter(|(k, _)| *k == key);
        match (matches.next(), matches.next()) {
            (Some((_, value)), None) => Ok(value),
            (None, _) => Err(super::Error::new(0, ErrorDetails::ValueNotFound)),
            _ => Err(super::Error::new(0, ErrorDetails::AmbiguousKey)),
        }
    }

    /// Every value stored under `key`, in insertion order.
    pub fn all_at(&self, key: K) -> impl Iterator<Item = &Value> {
        self.items
            .iter()
            .filter(move |(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    /// References to all entries, sorted by key and then by value.
    ///
    /// The result is stable across runs and is the basis of set equality and
    /// ordering.
    pub fn fully_sorted(&self) -> Vec<&(K, Value)> {
        let mut sorted: Vec<&(K, Value)> = self.items.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        sorted
    }
}

impl<K: Ord + Copy> PartialEq for Set<K> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.fully_sorted()
            .iter()
            .zip(other.fully_sorted())
            .all(|(a, b)| a.0 == b.0 && a.1 == b.1)
    }
}

impl<K: Ord + Copy> Eq for Set<K> {}

impl<K: Ord + Copy> PartialOrd for Set<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord + Copy> Ord for Set<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len().cmp(&other.len()).then_with(|| {
            let lhs = self.fully_sorted();
            let rhs = other.fully_sorted();
            for (a, b) in lhs.iter().zip(rhs) {
                let ordering = a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        })
    }
}

impl<K: Ord + Copy + Display> Display for Set<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ ")?;
        for (i, (key, value)) in self.fully_sorted().iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, " }}")
    }
}

/// Multimap from LDS keys to values.
pub type LocalSet = Set<LdsKey>;

/// Multimap from 16-byte UDS keys to values.
pub type UniversalSet = Set<UdsKey>;

// ----------------------------------------------------------------------------
/// Interprets data as a KLV local set: a sequence of
/// `BER-OID tag, BER length, value` triples.
///
/// A format may be configured with a checksum trailer; reads then verify the
/// trailing checksum (logging mismatches, per the KLV convention that a
/// damaged packet is still returned for the application to judge) and writes
/// recompute and append it. ST 0601 additionally requires the precision
/// timestamp triple to open the set.
#[derive(Clone)]
pub struct LocalSetFormat {
    name: &'static str,
    lookup: &'static TagTraitsLookup,
    checksum: Option<ChecksumPacketFormat>,
    leading_timestamp: Option<LdsKey>,
}

impl LocalSetFormat {
    /// Creates a set format over the given member catalog.
    pub fn new(name: &'static str, lookup: &'static TagTraitsLookup) -> Self {
        Self {
            name,
            lookup,
            checksum: None,
            leading_timestamp: None,
        }
    }

    /// Adds a checksum trailer to the wire form of this set.
    pub fn with_checksum(mut self, checksum: ChecksumPacketFormat) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// Requires the set to open with an 8-byte timestamp under `tag`.
    pub fn with_leading_timestamp(mut self, tag: LdsKey) -> Self {
        self.leading_timestamp = Some(tag);
        self
    }

    /// The member catalog of this set.
    pub fn lookup(&self) -> &'static TagTraitsLookup {
        self.lookup
    }

    /// The checksum trailer, if this set carries one.
    pub fn checksum(&self) -> Option<&ChecksumPacketFormat> {
        self.checksum.as_ref()
    }

    fn read_entry(&self, reader: &mut SliceReader<'_>) -> Result<(LdsKey, Value)> {
        let remaining = reader.remaining_len();
        let tag = read_lds_key(reader, remaining)?;
        let remaining = reader.remaining_len();
        let length = read_ber(reader, remaining)? as usize;
        if length > reader.remaining_len() {
            return Err(reader.make_error(ErrorDetails::BufferOverrun(length)));
        }
        let format = self.lookup.by_tag(tag).format();
        match format.read(reader, length) {
            Ok(value) => Ok((tag, value)),
            Err(err) => {
                // Wrong fixed length; keep the bytes under the tag
                warn!("{}: tag {}: {}", self.name, tag, err);
                let bytes = reader.read(length)?;
                Ok((
                    tag,
                    Value::with_length_hint(ValueData::Blob(Blob::from(bytes)), length),
                ))
            }
        }
    }

    fn read_entries(&self, body: &[u8]) -> LocalSet {
        let mut set = LocalSet::new();
        let mut reader = SliceReader::new(body);
        while reader.remaining_len() > 0 {
            match self.read_entry(&mut reader) {
                Ok((tag, value)) => set.add(tag, value),
                Err(err) => {
                    warn!(
                        "{}: {}; keeping {} trailing bytes raw",
                        self.name,
                        err,
                        reader.remaining_len()
                    );
                    let rest = reader.peek_remaining();
                    set.add(0, Value::from(Blob::from(rest)));
                    break;
                }
            }
        }
        set
    }
}

impl FormatImpl for LocalSetFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        format!("{} of {}", self.name, length_description(0))
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, _length: usize) -> Result<ValueData> {
        let payload = reader.read_to_end()?;

        if let Some(timestamp_tag) = self.leading_timestamp {
            // The timestamp triple must open the set
            if payload.len() < 10
                || u64::from(payload[0]) != u64::from(timestamp_tag)
                || payload[1] != 8
            {
                return Err(super::Error::new(0, ErrorDetails::MissingTimestamp));
            }
        }

        let mut body = payload;
        if let Some(checksum) = &self.checksum {
            if checksum.is_present(payload) {
                let split = payload.len() - checksum.length();
                body = &payload[..split];
                let stored = checksum.read(&payload[split..])?;
                let computed = checksum.evaluate(body);
                if stored != computed {
                    warn!(
                        "{}: checksum mismatch (stored {:#06X}, computed {:#06X})",
                        self.name, stored, computed
                    );
                }
            } else {
                debug!("{}: no checksum trailer present", self.name);
            }
        }

        Ok(ValueData::LocalSet(self.read_entries(body)))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        let set = match data {
            ValueData::LocalSet(set) => set,
            _ => return Err(cast_error("LocalSet", data)),
        };
        let checksum_tag = self.checksum.map(|checksum| LdsKey::from(checksum.header()[0]));
        let mark = writer.location();
        // The timestamp triple must open the set regardless of insertion
        // order; everything else follows in insertion order.
        let ordered = set
            .iter()
            .filter(|(tag, _)| self.leading_timestamp == Some(*tag))
            .chain(
                set.iter()
                    .filter(|(tag, _)| self.leading_timestamp != Some(*tag)),
            );
        for (tag, value) in ordered {
            if Some(*tag) == checksum_tag {
                continue;
            }
            let format = self.lookup.by_tag(*tag).format();
            let value_length = format.length_of(value)?;
            let remaining = writer.remaining_len();
            write_lds_key(*tag, writer, remaining)?;
            let remaining = writer.remaining_len();
            write_ber(value_length as u64, writer, remaining)?;
            format.write(value, writer)?;
        }
        if let Some(checksum) = &self.checksum {
            let computed = checksum.evaluate(writer.written_since(mark));
            checksum.write(computed, writer)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        let set = match data {
            ValueData::LocalSet(set) => set,
            _ => return Err(cast_error("LocalSet", data)),
        };
        let checksum_tag = self.checksum.map(|checksum| LdsKey::from(checksum.header()[0]));
        let mut total = 0;
        for (tag, value) in set.iter() {
            if Some(*tag) == checksum_tag {
                continue;
            }
            let value_length = self.lookup.by_tag(*tag).format().length_of(value)?;
            total += super::codec::ber_oid_length(u64::from(*tag))
                + ber_length(value_length as u64)
                + value_length;
        }
        if let Some(checksum) = &self.checksum {
            total += checksum.length();
        }
        Ok(total)
    }
}

// ----------------------------------------------------------------------------
/// Interprets data as a KLV universal set: a sequence of
/// `16-byte key, BER length, value` triples.
#[derive(Clone)]
pub struct UniversalSetFormat {
    name: &'static str,
    lookup: &'static TagTraitsLookup,
}

impl UniversalSetFormat {
    /// Creates a set format over the given member catalog.
    pub fn new(name: &'static str, lookup: &'static TagTraitsLookup) -> Self {
        Self { name, lookup }
    }

    /// The member catalog of this set.
    pub fn lookup(&self) -> &'static TagTraitsLookup {
        self.lookup
    }

    fn read_entry(&self, reader: &mut SliceReader<'_>) -> Result<(UdsKey, Value)> {
        let key = read_uds_key(reader)?;
        let remaining = reader.remaining_len();
        let length = read_ber(reader, remaining)? as usize;
        if length > reader.remaining_len() {
            return Err(reader.make_error(ErrorDetails::BufferOverrun(length)));
        }
        let format = self.lookup.by_uds_key(key).format();
        match format.read(reader, length) {
            Ok(value) => Ok((key, value)),
            Err(err) => {
                warn!("{}: key {}: {}", self.name, key, err);
                let bytes = reader.read(length)?;
                Ok((
                    key,
                    Value::with_length_hint(ValueData::Blob(Blob::from(bytes)), length),
                ))
            }
        }
    }
}

impl FormatImpl for UniversalSetFormat {
    fn fixed_length(&self) -> usize {
        0
    }

    fn description(&self) -> String {
        format!("{} of {}", self.name, length_description(0))
    }

    fn read_typed(&self, reader: &mut SliceReader<'_>, _length: usize) -> Result<ValueData> {
        let mut set = UniversalSet::new();
        while reader.remaining_len() > 0 {
            match self.read_entry(reader) {
                Ok((key, value)) => set.add(key, value),
                Err(err) => {
                    warn!(
                        "{}: {}; keeping {} trailing bytes raw",
                        self.name,
                        err,
                        reader.remaining_len()
                    );
                    let rest = reader.read_to_end()?;
                    set.add(UdsKey::NONE, Value::from(Blob::from(rest)));
                    break;
                }
            }
        }
        Ok(ValueData::UniversalSet(set))
    }

    fn write_typed(
        &self,
        data: &ValueData,
        writer: &mut SliceWriter<'_>,
        _length: usize,
    ) -> Result<()> {
        let set = match data {
            ValueData::UniversalSet(set) => set,
            _ => return Err(cast_error("UniversalSet", data)),
        };
        for (key, value) in set.iter() {
            let format = self.lookup.by_uds_key(*key).format();
            let value_length = format.length_of(value)?;
            write_uds_key(*key, writer)?;
            let remaining = writer.remaining_len();
            write_ber(value_length as u64, writer, remaining)?;
            format.write(value, writer)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, data: &ValueData, _length_hint: Option<usize>) -> Result<usize> {
        let set = match data {
            ValueData::UniversalSet(set) => set,
            _ => return Err(cast_error("UniversalSet", data)),
        };
        let mut total = 0;
        for (key, value) in set.iter() {
            let value_length = self.lookup.by_uds_key(*key).format().length_of(value)?;
            total += UdsKey::LENGTH + ber_length(value_length as u64) + value_length;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_does_not_affect_equality() {
        let mut a = LocalSet::new();
        a.add(1, 10_u64);
        a.add(2, 20_u64);
        let mut b = LocalSet::new();
        b.add(2, 20_u64);
        b.add(1, 10_u64);
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_values_compare_as_multisets() {
        let mut a = LocalSet::new();
        a.add(1, 10_u64);
        a.add(1, 20_u64);
        let mut b = LocalSet::new();
        b.add(1, 20_u64);
        b.add(1, 10_u64);
        assert_eq!(a, b);

        let mut c = LocalSet::new();
        c.add(1, 10_u64);
        c.add(1, 10_u64);
        assert_ne!(a, c);
    }

    #[test]
    fn find_requires_singularity() {
        let mut set = LocalSet::new();
        set.add(5, 1_u64);
        assert!(set.find(5).is_some());
        set.add(5, 2_u64);
        assert!(set.find(5).is_none());
        assert_eq!(set.at(5).unwrap_err().details, ErrorDetails::AmbiguousKey);
        assert_eq!(set.at(9).unwrap_err().details, ErrorDetails::ValueNotFound);
        assert_eq!(set.all_at(5).count(), 2);
    }

    #[test]
    fn ordering_is_size_major() {
        let mut small = LocalSet::new();
        small.add(9, 9_u64);
        let mut large = LocalSet::new();
        large.add(1, 1_u64);
        large.add(2, 2_u64);
        assert!(small < large);
    }
}
