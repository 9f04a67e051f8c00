use super::key::LdsKey;
use super::packet::Standard;
use super::value::Value;
use super::{Error, ErrorDetails, Result};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::ops::Bound;

/// Half-open interval over microsecond timestamps: inclusive lower bound,
/// exclusive upper bound.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interval {
    /// Inclusive lower bound.
    pub lower: u64,
    /// Exclusive upper bound.
    pub upper: u64,
}

impl Interval {
    /// Creates the interval `[lower, upper)`.
    pub fn new(lower: u64, upper: u64) -> Self {
        Self { lower, upper }
    }

    /// Whether `time` lies within the interval.
    pub fn contains(&self, time: u64) -> bool {
        self.lower <= time && time < self.upper
    }

    /// Whether no timestamps lie within the interval.
    pub fn is_degenerate(&self) -> bool {
        self.lower >= self.upper
    }

    /// Length of the interval.
    pub fn span(&self) -> u64 {
        self.upper.saturating_sub(self.lower)
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

/// Map from half-open time intervals to [`Value`]s.
///
/// Entries form a disjoint partition of time; setting a value over an
/// interval overwrites whatever it overlaps, splitting partially-covered
/// entries. Adjacent intervals holding equal values are coalesced, so an
/// absent entry always means "no value known".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalMap {
    // start -> (end, value)
    map: BTreeMap<u64, (u64, Value)>,
}

impl IntervalMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of disjoint intervals held.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// All entries in time order.
    pub fn iter(&self) -> impl Iterator<Item = (Interval, &Value)> {
        self.map
            .iter()
            .map(|(&lower, (upper, value))| (Interval::new(lower, *upper), value))
    }

    /// The first entry in time order.
    pub fn first(&self) -> Option<(Interval, &Value)> {
        self.iter().next()
    }

    /// The entry in effect at `time`.
    pub fn find(&self, time: u64) -> Option<(Interval, &Value)> {
        let (&lower, (upper, value)) = self
            .map
            .range((Bound::Unbounded, Bound::Included(time)))
            .next_back()?;
        let interval = Interval::new(lower, *upper);
        if interval.contains(time) {
            Some((interval, value))
        } else {
            None
        }
    }

    /// All entries intersecting `interval`, in time order.
    pub fn find_interval(&self, interval: Interval) -> Vec<(Interval, &Value)> {
        if interval.is_degenerate() {
            return Vec::new();
        }
        self.map
            .range((Bound::Unbounded, Bound::Excluded(interval.upper)))
            .filter(|(_, (upper, _))| *upper > interval.lower)
            .map(|(&lower, (upper, value))| (Interval::new(lower, *upper), value))
            .collect()
    }

    /// Mutable access to the value in effect at `time`.
    pub fn find_mut(&mut self, time: u64) -> Option<(Interval, &mut Value)> {
        let (&lower, (upper, value)) = self
            .map
            .range_mut((Bound::Unbounded, Bound::Included(time)))
            .next_back()?;
        let interval = Interval::new(lower, *upper);
        if interval.contains(time) {
            Some((interval, value))
        } else {
            None
        }
    }

    /// Sets `value` over `interval`, overwriting any overlapped entries and
    /// coalescing with adjacent entries holding an equal value.
    pub fn set(&mut self, interval: Interval, value: Value) {
        if interval.is_degenerate() {
            return;
        }
        self.erase(interval);

        let mut lower = interval.lower;
        let mut upper = interval.upper;

        // Coalesce with the entry ending exactly at our start
        if let Some((&left_lower, (left_upper, left_value))) = self
            .map
            .range((Bound::Unbounded, Bound::Excluded(lower)))
            .next_back()
        {
            if *left_upper == lower && *left_value == value {
                lower = left_lower;
                self.map.remove(&left_lower);
            }
        }

        // Coalesce with the entry starting exactly at our end
        if let Some((right_upper, right_value)) = self.map.get(&upper) {
            if *right_value == value {
                let right_upper = *right_upper;
                self.map.remove(&upper);
                upper = right_upper;
            }
        }

        self.map.insert(lower, (upper, value));
    }

    /// Removes all values over `interval`, truncating partially-covered
    /// entries.
    pub fn erase(&mut self, interval: Interval) {
        if interval.is_degenerate() {
            return;
        }

        let affected: Vec<u64> = self
            .map
            .range((Bound::Unbounded, Bound::Excluded(interval.upper)))
            .filter(|(_, (upper, _))| *upper > interval.lower)
            .map(|(&lower, _)| lower)
            .collect();

        for lower in affected {
            let (upper, value) = self.map.remove(&lower).expect("entry collected above");
            if lower < interval.lower {
                // Left remnant survives
                self.map.insert(lower, (interval.lower, value.clone()));
            }
            if upper > interval.upper {
                // Right remnant survives
                self.map.insert(interval.upper, (upper, value));
            }
        }
    }
}

/// Composite key of one sub-timeline: which standard, which tag, and which
/// concurrent instance of that tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimelineKey {
    /// The standard the tag belongs to.
    pub standard: Standard,
    /// The tag within the standard.
    pub tag: LdsKey,
    /// Disambiguates concurrent instances of the same tag. Either an
    /// externally meaningful id or an arbitrary integer assigned on first
    /// insertion.
    pub index: u64,
}

/// Tracks the value of every KLV field over time.
///
/// This is the final product of KLV parsing: one [`IntervalMap`] per
/// `(standard, tag, index)` triple, holding enough information to validly
/// (though not necessarily byte-identically) re-encode the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    map: BTreeMap<TimelineKey, IntervalMap>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// All sub-timelines, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&TimelineKey, &IntervalMap)> {
        self.map.iter()
    }

    /// Number of sub-timelines.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the timeline holds no sub-timelines.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn standard_range(standard: Standard) -> (Bound<TimelineKey>, Bound<TimelineKey>) {
        (
            Bound::Included(TimelineKey {
                standard,
                tag: 0,
                index: 0,
            }),
            Bound::Included(TimelineKey {
                standard,
                tag: LdsKey::MAX,
                index: u64::MAX,
            }),
        )
    }

    fn tag_range(standard: Standard, tag: LdsKey) -> (Bound<TimelineKey>, Bound<TimelineKey>) {
        (
            Bound::Included(TimelineKey {
                standard,
                tag,
                index: 0,
            }),
            Bound::Included(TimelineKey {
                standard,
                tag,
                index: u64::MAX,
            }),
        )
    }

    /// All sub-timelines of `standard`.
    pub fn find_all(&self, standard: Standard) -> impl Iterator<Item = (&TimelineKey, &IntervalMap)> {
        self.map.range(Self::standard_range(standard))
    }

    /// All sub-timelines of `(standard, tag)`.
    pub fn find_all_tag(
        &self,
        standard: Standard,
        tag: LdsKey,
    ) -> impl Iterator<Item = (&TimelineKey, &IntervalMap)> {
        self.map.range(Self::tag_range(standard, tag))
    }

    /// The single sub-timeline of `(standard, tag)`, or `None` when absent.
    ///
    /// Fails with [`ErrorDetails::AmbiguousKey`] when more than one instance
    /// exists.
    pub fn find(
        &self,
        standard: Standard,
        tag: LdsKey,
    ) -> Result<Option<(&TimelineKey, &IntervalMap)>> {
        let mut matches = self.map.range(Self::tag_range(standard, tag));
        match (matches.next(), matches.next()) {
            (None, _) => Ok(None),
            (Some(entry), None) => Ok(Some(entry)),
            _ => Err(Error::new(0, ErrorDetails::AmbiguousKey)),
        }
    }

    /// The sub-timeline at `(standard, tag, index)`, or `None` when absent.
    pub fn get(&self, standard: Standard, tag: LdsKey, index: u64) -> Option<&IntervalMap> {
        self.map.get(&TimelineKey {
            standard,
            tag,
            index,
        })
    }

    /// The value in effect at `time` for `(standard, tag)`, or the empty
    /// value.
    ///
    /// Fails with [`ErrorDetails::AmbiguousKey`] when values are in effect
    /// under more than one index.
    pub fn at(&self, standard: Standard, tag: LdsKey, time: u64) -> Result<Value> {
        let mut result: Option<&Value> = None;
        for (_, timeline) in self.find_all_tag(standard, tag) {
            if let Some((_, value)) = timeline.find(time) {
                if result.is_some() {
                    return Err(Error::new(0, ErrorDetails::AmbiguousKey));
                }
                result = Some(value);
            }
        }
        Ok(result.cloned().unwrap_or_default())
    }

    /// The value in effect at `time` for `(standard, tag, index)`, or the
    /// empty value.
    pub fn at_index(&self, standard: Standard, tag: LdsKey, index: u64, time: u64) -> Value {
        self.get(standard, tag, index)
            .and_then(|timeline| timeline.find(time))
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }

    /// Every value in effect at `time` for `(standard, tag)`, across all
    /// indices.
    pub fn all_at(&self, standard: Standard, tag: LdsKey, time: u64) -> Vec<Value> {
        self.find_all_tag(standard, tag)
            .filter_map(|(_, timeline)| timeline.find(time))
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Creates a new sub-timeline for `(standard, tag)` under an unused
    /// index, and returns that index.
    pub fn insert(&mut self, standard: Standard, tag: LdsKey) -> u64 {
        let last_index = self
            .find_all_tag(standard, tag)
            .last()
            .map(|(key, _)| key.index);
        let index = match last_index {
            None => 0,
            Some(u64::MAX) => {
                // Index space exhausted at the top; scan for a gap
                let mut candidate = 0;
                while self.get(standard, tag, candidate).is_some() {
                    candidate += 1;
                }
                candidate
            }
            Some(last) => last + 1,
        };
        self.map.insert(
            TimelineKey {
                standard,
                tag,
                index,
            },
            IntervalMap::new(),
        );
        index
    }

    /// Mutable access to the sub-timeline at `(standard, tag, index)`,
    /// creating it when absent.
    pub fn entry(&mut self, standard: Standard, tag: LdsKey, index: u64) -> &mut IntervalMap {
        self.map
            .entry(TimelineKey {
                standard,
                tag,
                index,
            })
            .or_insert_with(IntervalMap::new)
    }

    /// Mutable access to the single sub-timeline of `(standard, tag)`,
    /// creating index 0 when absent.
    ///
    /// Fails with [`ErrorDetails::AmbiguousKey`] when more than one instance
    /// exists.
    pub fn entry_single(&mut self, standard: Standard, tag: LdsKey) -> Result<&mut IntervalMap> {
        let index = match self.find(standard, tag)? {
            Some((key, _)) => key.index,
            None => 0,
        };
        Ok(self.entry(standard, tag, index))
    }

    /// Removes the sub-timeline at `(standard, tag, index)`.
    pub fn remove(&mut self, standard: Standard, tag: LdsKey, index: u64) {
        self.map.remove(&TimelineKey {
            standard,
            tag,
            index,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(n: u64) -> Value {
        Value::from(n)
    }

    #[test]
    fn set_and_find() {
        let mut map = IntervalMap::new();
        map.set(Interval::new(10, 20), value(1));
        assert!(map.find(9).is_none());
        assert_eq!(map.find(10).unwrap().1, &value(1));
        assert_eq!(map.find(19).unwrap().1, &value(1));
        assert!(map.find(20).is_none());
    }

    #[test]
    fn overlapping_set_overwrites() {
        let mut map = IntervalMap::new();
        map.set(Interval::new(0, 100), value(1));
        map.set(Interval::new(40, 60), value(2));
        assert_eq!(map.len(), 3);
        assert_eq!(map.find(39).unwrap().1, &value(1));
        assert_eq!(map.find(40).unwrap().1, &value(2));
        assert_eq!(map.find(59).unwrap().1, &value(2));
        assert_eq!(map.find(60).unwrap().1, &value(1));
        // The remnants keep their original bounds
        assert_eq!(map.find(0).unwrap().0, Interval::new(0, 40));
        assert_eq!(map.find(99).unwrap().0, Interval::new(60, 100));
    }

    #[test]
    fn adjacent_equal_values_coalesce() {
        let mut map = IntervalMap::new();
        map.set(Interval::new(0, 10), value(7));
        map.set(Interval::new(10, 20), value(7));
        assert_eq!(map.len(), 1);
        assert_eq!(map.find(5).unwrap().0, Interval::new(0, 20));

        // Differing values stay separate
        map.set(Interval::new(20, 30), value(8));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn coalescing_bridges_a_gap_fill() {
        let mut map = IntervalMap::new();
        map.set(Interval::new(0, 10), value(7));
        map.set(Interval::new(20, 30), value(7));
        assert_eq!(map.len(), 2);
        map.set(Interval::new(10, 20), value(7));
        assert_eq!(map.len(), 1);
        assert_eq!(map.find(15).unwrap().0, Interval::new(0, 30));
    }

    #[test]
    fn erase_truncates_partial_overlaps() {
        let mut map = IntervalMap::new();
        map.set(Interval::new(0, 100), value(1));
        map.erase(Interval::new(30, 70));
        assert_eq!(map.len(), 2);
        assert_eq!(map.find(29).unwrap().0, Interval::new(0, 30));
        assert!(map.find(30).is_none());
        assert!(map.find(69).is_none());
        assert_eq!(map.find(70).unwrap().0, Interval::new(70, 100));
    }

    #[test]
    fn find_interval_returns_intersections_in_order() {
        let mut map = IntervalMap::new();
        map.set(Interval::new(0, 10), value(1));
        map.set(Interval::new(10, 20), value(2));
        map.set(Interval::new(30, 40), value(3));
        let hits = map.find_interval(Interval::new(5, 35));
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].0, Interval::new(0, 10));
        assert_eq!(hits[2].0, Interval::new(30, 40));

        assert!(map.find_interval(Interval::new(20, 30)).is_empty());
    }

    #[test]
    fn timeline_indices_allocate_upward() {
        let mut timeline = Timeline::new();
        assert_eq!(timeline.insert(Standard::Misb0601, 5), 0);
        assert_eq!(timeline.insert(Standard::Misb0601, 5), 1);
        assert_eq!(timeline.insert(Standard::Misb0601, 6), 0);
        assert!(timeline.find(Standard::Misb0601, 6).unwrap().is_some());
        assert_eq!(
            timeline.find(Standard::Misb0601, 5).unwrap_err().details,
            ErrorDetails::AmbiguousKey
        );
    }

    #[test]
    fn at_reflects_find() {
        let mut timeline = Timeline::new();
        timeline
            .entry(Standard::Misb0601, 5, 0)
            .set(Interval::new(100, 200), value(42));
        assert_eq!(
            timeline.at(Standard::Misb0601, 5, 150).unwrap(),
            value(42)
        );
        assert!(timeline.at(Standard::Misb0601, 5, 200).unwrap().is_empty());
        assert_eq!(
            timeline.at_index(Standard::Misb0601, 5, 0, 150),
            value(42)
        );
        assert_eq!(timeline.all_at(Standard::Misb0601, 5, 150).len(), 1);
    }
}
