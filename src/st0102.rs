//! MISB ST 0102 Security Metadata Local Set.
//!
//! Carries the classification and handling markings of the metadata stream,
//! either as its own top-level packet or embedded inside a ST 0601 local
//! set.

use super::format::{BlobFormat, EnumFormat, StringFormat, UintFormat};
use super::key::{LdsKey, UdsKey};
use super::set::LocalSetFormat;
use super::tag_traits::{TagCountRange, TagTraits, TagTraitsLookup};
use std::sync::OnceLock;

/// Local set tags defined by ST 0102.12.
pub mod tag {
    use super::LdsKey;

    /// Unknown tag.
    pub const UNKNOWN: LdsKey = 0;
    /// Security classification.
    pub const SECURITY_CLASSIFICATION: LdsKey = 1;
    /// Classifying country and releasing instructions country coding method.
    pub const COUNTRY_CODING_METHOD: LdsKey = 2;
    /// Classifying country.
    pub const CLASSIFYING_COUNTRY: LdsKey = 3;
    /// Security SCI / SHI information.
    pub const SCI_SHI_INFORMATION: LdsKey = 4;
    /// Caveats.
    pub const CAVEATS: LdsKey = 5;
    /// Releasing instructions.
    pub const RELEASING_INSTRUCTIONS: LdsKey = 6;
    /// Classified by.
    pub const CLASSIFIED_BY: LdsKey = 7;
    /// Derived from.
    pub const DERIVED_FROM: LdsKey = 8;
    /// Classification reason.
    pub const CLASSIFICATION_REASON: LdsKey = 9;
    /// Declassification date.
    pub const DECLASSIFICATION_DATE: LdsKey = 10;
    /// Classification and marking system.
    pub const CLASSIFICATION_AND_MARKING_SYSTEM: LdsKey = 11;
    /// Object country coding method.
    pub const OBJECT_COUNTRY_CODING_METHOD: LdsKey = 12;
    /// Object country codes.
    pub const OBJECT_COUNTRY_CODES: LdsKey = 13;
    /// Classification comments.
    pub const CLASSIFICATION_COMMENTS: LdsKey = 14;
    /// ST 0102 version.
    pub const VERSION: LdsKey = 15;
    /// Country coding method version date.
    pub const COUNTRY_CODING_METHOD_VERSION_DATE: LdsKey = 16;
    /// Object country coding method version date.
    pub const OBJECT_COUNTRY_CODING_METHOD_VERSION_DATE: LdsKey = 17;
}

/// Member names for the security classification enumeration.
pub static SECURITY_CLASSIFICATION_NAMES: [&str; 6] = [
    "Unknown",
    "Unclassified",
    "Restricted",
    "Confidential",
    "Secret",
    "Top Secret",
];

/// Member names for the country coding method enumeration.
pub static COUNTRY_CODING_METHOD_NAMES: [&str; 15] = [
    "Unknown",
    "ISO 3166-1 Two Letter",
    "ISO 3166-1 Three Letter",
    "FIPS 10-4 Two Letter",
    "FIPS 10-4 Four Letter",
    "ISO 3166-1 Numeric",
    "STANAG 1059 Two Letter",
    "STANAG 1059 Three Letter",
    "Omitted",
    "Omitted",
    "FIPS 10-4 Mixed",
    "ISO 3166-1 Mixed",
    "STANAG 1059 Mixed",
    "GENC Two Letter",
    "GENC Three Letter",
];

/// The display name of a raw security classification value.
pub fn security_classification_name(value: u64) -> &'static str {
    let index = (value as usize).min(SECURITY_CLASSIFICATION_NAMES.len() - 1);
    SECURITY_CLASSIFICATION_NAMES[index]
}

// ----------------------------------------------------------------------------
/// The UDS key for a MISB ST 0102 local set.
pub fn key() -> UdsKey {
    UdsKey::new(0x060E2B34_02030101, 0x0E01030302000000)
}

// ----------------------------------------------------------------------------
/// The format for a MISB ST 0102 local set. ST 0102 defines no checksum.
pub fn local_set_format() -> LocalSetFormat {
    LocalSetFormat::new("ST 0102 local set", traits())
}

// ----------------------------------------------------------------------------
/// The traits of every ST 0102 tag.
pub fn traits() -> &'static TagTraitsLookup {
    static LOOKUP: OnceLock<TagTraitsLookup> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        use TagCountRange as Count;
        let none = UdsKey::NONE;
        let entry = TagTraits::new;
        TagTraitsLookup::new(vec![
            entry(
                none,
                tag::UNKNOWN,
                "UNKNOWN",
                BlobFormat::new().into(),
                "Unknown Tag",
                "Unknown tag.",
                Count::FORBIDDEN,
            ),
            entry(
                none,
                tag::SECURITY_CLASSIFICATION,
                "SECURITY_CLASSIFICATION",
                EnumFormat::new(&SECURITY_CLASSIFICATION_NAMES, 1).into(),
                "Security Classification",
                "Overall security classification of the Motion Imagery.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                tag::COUNTRY_CODING_METHOD,
                "COUNTRY_CODING_METHOD",
                EnumFormat::new(&COUNTRY_CODING_METHOD_NAMES, 1).into(),
                "Country Coding Method",
                "Coding method used by the classifying country and releasing instructions.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                tag::CLASSIFYING_COUNTRY,
                "CLASSIFYING_COUNTRY",
                StringFormat::new().into(),
                "Classifying Country",
                "Country which classified the Motion Imagery, prefixed with '//'.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                tag::SCI_SHI_INFORMATION,
                "SCI_SHI_INFORMATION",
                StringFormat::new().into(),
                "SCI / SHI Information",
                "Sensitive compartmented or special handling instructions.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::CAVEATS,
                "CAVEATS",
                StringFormat::new().into(),
                "Caveats",
                "Pertinent caveats or code words.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::RELEASING_INSTRUCTIONS,
                "RELEASING_INSTRUCTIONS",
                StringFormat::new().into(),
                "Releasing Instructions",
                "Countries the Motion Imagery is releasable to, space separated.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::CLASSIFIED_BY,
                "CLASSIFIED_BY",
                StringFormat::new().into(),
                "Classified By",
                "Name and type of authority used to classify the Motion Imagery.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::DERIVED_FROM,
                "DERIVED_FROM",
                StringFormat::new().into(),
                "Derived From",
                "Information about the source material the classification derives from.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::CLASSIFICATION_REASON,
                "CLASSIFICATION_REASON",
                StringFormat::new().into(),
                "Classification Reason",
                "Reason for the classification or citation from a document.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::DECLASSIFICATION_DATE,
                "DECLASSIFICATION_DATE",
                StringFormat::new().into(),
                "Declassification Date",
                "Date when the classified material may be declassified, as YYYYMMDD.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::CLASSIFICATION_AND_MARKING_SYSTEM,
                "CLASSIFICATION_AND_MARKING_SYSTEM",
                StringFormat::new().into(),
                "Classification and Marking System",
                "Classification or marking system used, as determined by the appropriate \
                 security entity.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::OBJECT_COUNTRY_CODING_METHOD,
                "OBJECT_COUNTRY_CODING_METHOD",
                EnumFormat::new(&COUNTRY_CODING_METHOD_NAMES, 1).into(),
                "Object Country Coding Method",
                "Coding method used by the object country codes.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::OBJECT_COUNTRY_CODES,
                "OBJECT_COUNTRY_CODES",
                StringFormat::new().into(),
                "Object Country Codes",
                "Countries whose territory is under the sensor's view, semicolon separated.",
                Count::EXACTLY_ONE,
            ),
            entry(
                none,
                tag::CLASSIFICATION_COMMENTS,
                "CLASSIFICATION_COMMENTS",
                StringFormat::new().into(),
                "Classification Comments",
                "Security-related comments and format changes necessary for future amendments.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::VERSION,
                "VERSION",
                UintFormat::fixed(2).into(),
                "Version",
                "Version of MISB ST 0102 used to encode this local set.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::COUNTRY_CODING_METHOD_VERSION_DATE,
                "COUNTRY_CODING_METHOD_VERSION_DATE",
                StringFormat::new().into(),
                "Country Coding Method Version Date",
                "Effective date of the country coding method, as YYYY-MM-DD.",
                Count::OPTIONAL,
            ),
            entry(
                none,
                tag::OBJECT_COUNTRY_CODING_METHOD_VERSION_DATE,
                "OBJECT_COUNTRY_CODING_METHOD_VERSION_DATE",
                StringFormat::new().into(),
                "Object Country Coding Method Version Date",
                "Effective date of the object country coding method, as YYYY-MM-DD.",
                Count::OPTIONAL,
            ),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_names_clamp() {
        assert_eq!(security_classification_name(1), "Unclassified");
        assert_eq!(security_classification_name(5), "Top Secret");
        assert_eq!(security_classification_name(99), "Top Secret");
    }

    #[test]
    fn key_is_a_valid_local_set_key() {
        assert!(key().is_valid());
    }
}
