use super::format::KlvFormat;
use super::key::{LdsKey, UdsKey};
use std::collections::HashMap;

/// Closed interval bounding how many times a tag may appear in its parent
/// set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TagCountRange {
    lower: u64,
    upper: u64,
}

impl TagCountRange {
    /// The tag must appear exactly once.
    pub const EXACTLY_ONE: TagCountRange = TagCountRange { lower: 1, upper: 1 };

    /// The tag may appear at most once.
    pub const OPTIONAL: TagCountRange = TagCountRange { lower: 0, upper: 1 };

    /// The tag must not appear at all.
    pub const FORBIDDEN: TagCountRange = TagCountRange { lower: 0, upper: 0 };

    /// The tag may appear any number of times.
    pub const ANY: TagCountRange = TagCountRange {
        lower: 0,
        upper: u64::MAX,
    };

    /// The tag must appear at least once.
    pub const ONE_OR_MORE: TagCountRange = TagCountRange {
        lower: 1,
        upper: u64::MAX,
    };

    /// An arbitrary closed interval.
    pub const fn new(lower: u64, upper: u64) -> Self {
        Self { lower, upper }
    }

    /// Minimum allowed number of appearances.
    pub fn lower(&self) -> u64 {
        self.lower
    }

    /// Maximum allowed number of appearances; `u64::MAX` means unbounded.
    pub fn upper(&self) -> u64 {
        self.upper
    }

    /// Whether the tag must appear at least once.
    pub fn is_mandatory(&self) -> bool {
        self.lower > 0
    }
}

/// Everything the library knows about one tag: its keys, format, naming, and
/// allowed multiplicity.
pub struct TagTraits {
    uds_key: UdsKey,
    tag: LdsKey,
    enum_name: &'static str,
    format: KlvFormat,
    name: &'static str,
    description: &'static str,
    count: TagCountRange,
    subtags: Option<&'static TagTraitsLookup>,
}

impl TagTraits {
    /// Assembles a traits entry.
    pub fn new(
        uds_key: UdsKey,
        tag: LdsKey,
        enum_name: &'static str,
        format: KlvFormat,
        name: &'static str,
        description: &'static str,
        count: TagCountRange,
    ) -> Self {
        Self {
            uds_key,
            tag,
            enum_name,
            format,
            name,
            description,
            count,
            subtags: None,
        }
    }

    /// Attaches a lookup for the members of this tag's nested set.
    pub fn with_subtags(mut self, subtags: &'static TagTraitsLookup) -> Self {
        self.subtags = Some(subtags);
        self
    }

    /// The 16-byte universal key of the tag, or [`UdsKey::NONE`] for tags
    /// addressed only by local key.
    pub fn uds_key(&self) -> UdsKey {
        self.uds_key
    }

    /// The local key of the tag.
    pub fn tag(&self) -> LdsKey {
        self.tag
    }

    /// The identifier-style name of the tag.
    pub fn enum_name(&self) -> &'static str {
        self.enum_name
    }

    /// The data format used to read and write this tag's values.
    pub fn format(&self) -> &KlvFormat {
        &self.format
    }

    /// The display name of the tag.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// A prose description of the tag.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// How many times the tag may appear in its parent set.
    pub fn count(&self) -> TagCountRange {
        self.count
    }

    /// Traits of the members of this tag's nested set, when it has one.
    pub fn subtags(&self) -> Option<&'static TagTraitsLookup> {
        self.subtags
    }
}

/// Dual-indexed table of [`TagTraits`].
///
/// Built once per standard and kept for the lifetime of the process. The
/// first entry is the "unknown" trait; lookups that miss fall back to it so
/// unrecognized tags decode as blobs instead of failing.
pub struct TagTraitsLookup {
    traits: Vec<TagTraits>,
    by_tag: HashMap<LdsKey, usize>,
    by_uds_key: HashMap<UdsKey, usize>,
}

impl TagTraitsLookup {
    /// Builds the two indices from a list of traits.
    ///
    /// # Panics
    ///
    /// Panics if `traits` is empty; the first entry is required as the
    /// unknown-tag fallback.
    pub fn new(traits: Vec<TagTraits>) -> Self {
        assert!(
            !traits.is_empty(),
            "tag traits lookup requires an unknown entry"
        );
        let mut by_tag = HashMap::new();
        let mut by_uds_key = HashMap::new();
        for (index, entry) in traits.iter().enumerate() {
            by_tag.entry(entry.tag).or_insert(index);
            if entry.uds_key != UdsKey::NONE {
                by_uds_key.entry(entry.uds_key).or_insert(index);
            }
        }
        Self {
            traits,
            by_tag,
            by_uds_key,
        }
    }

    /// All traits, unknown entry first.
    pub fn iter(&self) -> impl Iterator<Item = &TagTraits> {
        self.traits.iter()
    }

    /// The traits of `tag`, or the unknown entry when the tag is not
    /// registered.
    pub fn by_tag(&self, tag: LdsKey) -> &TagTraits {
        match self.by_tag.get(&tag) {
            Some(&index) => &self.traits[index],
            None => &self.traits[0],
        }
    }

    /// The traits of the tag with universal key `key`, or the unknown entry
    /// when the key is not registered.
    pub fn by_uds_key(&self, key: UdsKey) -> &TagTraits {
        match self.by_uds_key.get(&key) {
            Some(&index) => &self.traits[index],
            None => &self.traits[0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{BlobFormat, UintFormat};

    fn lookup() -> TagTraitsLookup {
        TagTraitsLookup::new(vec![
            TagTraits::new(
                UdsKey::NONE,
                0,
                "UNKNOWN",
                BlobFormat::new().into(),
                "Unknown",
                "Unknown tag.",
                TagCountRange::FORBIDDEN,
            ),
            TagTraits::new(
                UdsKey::new(0x060E2B34_01010101, 0x0E01050600000000),
                9,
                "STREAM_BITRATE",
                UintFormat::fixed(2).into(),
                "Stream Bitrate",
                "Expressed in kilobits / second.",
                TagCountRange::EXACTLY_ONE,
            ),
        ])
    }

    #[test]
    fn lookups_hit_both_indices() {
        let lookup = lookup();
        assert_eq!(lookup.by_tag(9).name(), "Stream Bitrate");
        let key = UdsKey::new(0x060E2B34_01010101, 0x0E01050600000000);
        assert_eq!(lookup.by_uds_key(key).tag(), 9);
    }

    #[test]
    fn misses_fall_back_to_unknown() {
        let lookup = lookup();
        assert_eq!(lookup.by_tag(77).enum_name(), "UNKNOWN");
        let bogus = UdsKey::new(0x060E2B34_01010101, 0x7700000000000000);
        assert_eq!(lookup.by_uds_key(bogus).enum_name(), "UNKNOWN");
    }
}
