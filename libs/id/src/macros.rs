//! `define_id!`: one newtype per entity so an animal id can never be passed
//! where a barn id is expected.

/// Declares `$name`, a ULID tagged with `$prefix` in its text form.
///
/// Text form is `{prefix}_{ulid}` everywhere: `Display`, `FromStr`, serde
/// and the database columns all agree on it.
///
/// ```ignore
/// define_id!(AnimalId, "anml");
///
/// let bessie: AnimalId = "anml_01HV4Z2WQXKJNM8GPQY6VBKC3D".parse()?;
/// assert_eq!(bessie.to_string(), "anml_01HV4Z2WQXKJNM8GPQY6VBKC3D");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[doc = concat!("Identifier written as `", $prefix, "_<ulid>`.")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($crate::Ulid);

        impl $name {
            /// Tag before the `_` separator.
            pub const PREFIX: &'static str = $prefix;

            /// Mints an id; ids minted later sort after earlier ones except
            /// within the same millisecond.
            #[must_use]
            pub fn new() -> Self {
                Self($crate::Ulid::new())
            }

            /// Wraps an existing ULID.
            #[must_use]
            pub const fn from_ulid(ulid: $crate::Ulid) -> Self {
                Self(ulid)
            }

            #[must_use]
            pub const fn ulid(&self) -> $crate::Ulid {
                self.0
            }

            /// Accepts only `{prefix}_{ulid}` with this type's prefix; an id of
            /// another entity is rejected with `IdError::InvalidPrefix`.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                match s.split_once('_') {
                    _ if s.is_empty() => Err($crate::IdError::Empty),
                    None => Err($crate::IdError::MissingSeparator),
                    Some((tag, _)) if tag != Self::PREFIX => Err($crate::IdError::InvalidPrefix {
                        expected: Self::PREFIX,
                        actual: tag.to_owned(),
                    }),
                    Some((_, raw)) => raw
                        .parse::<$crate::Ulid>()
                        .map(Self)
                        .map_err(|e| $crate::IdError::InvalidUlid(e.to_string())),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}_{}", Self::PREFIX, self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
                Self::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}
