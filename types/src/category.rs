//! Fixed category set for futures.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The subject area a future belongs to.
///
/// Stored values outside the known set (or a missing value) read back as
/// [`Category::Other`]; deserialization never fails on an unknown name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Climate,
    Health,
    Finance,
    Tech,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Climate,
        Category::Health,
        Category::Finance,
        Category::Tech,
        Category::Other,
    ];

    /// Stable name used in stored documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Climate => "Climate",
            Self::Health => "Health",
            Self::Finance => "Finance",
            Self::Tech => "Tech",
            Self::Other => "Other",
        }
    }

    /// Map a stored name onto the category set. Matching ignores case and
    /// surrounding whitespace; anything unrecognised is `Other`.
    pub fn normalize(raw: &str) -> Self {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(raw))
            .unwrap_or(Self::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Non-string values (numbers, null) normalise like unknown names.
        let value = Option::<loose::Loose>::deserialize(deserializer)?;
        Ok(match value {
            Some(loose::Loose::Text(s)) => Self::normalize(&s),
            _ => Self::Other,
        })
    }
}

mod loose {
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    /// Accepts any scalar, keeping only strings.
    pub enum Loose {
        Text(String),
        Ignored,
    }

    impl<'de> serde::Deserialize<'de> for Loose {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct LooseVisitor;

            impl<'de> Visitor<'de> for LooseVisitor {
                type Value = Loose;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    write!(f, "a category name")
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<Loose, E> {
                    Ok(Loose::Text(v.to_string()))
                }

                fn visit_bool<E: de::Error>(self, _: bool) -> Result<Loose, E> {
                    Ok(Loose::Ignored)
                }

                fn visit_i64<E: de::Error>(self, _: i64) -> Result<Loose, E> {
                    Ok(Loose::Ignored)
                }

                fn visit_u64<E: de::Error>(self, _: u64) -> Result<Loose, E> {
                    Ok(Loose::Ignored)
                }

                fn visit_f64<E: de::Error>(self, _: f64) -> Result<Loose, E> {
                    Ok(Loose::Ignored)
                }

                fn visit_unit<E: de::Error>(self) -> Result<Loose, E> {
                    Ok(Loose::Ignored)
                }

                fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Loose, A::Error> {
                    while seq.next_element::<de::IgnoredAny>()?.is_some() {}
                    Ok(Loose::Ignored)
                }

                fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Loose, A::Error> {
                    while map
                        .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
                        .is_some()
                    {}
                    Ok(Loose::Ignored)
                }
            }

            deserializer.deserialize_any(LooseVisitor)
        }
    }
}
