//! Canonical query-string encoding.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use url::form_urlencoded;
use xxhash_rust::xxh3::xxh3_64;

/// Type encodable as query-string parameters.
pub trait Encode {
    /// Encodes the parameters of this value into the provided [`Encoder`].
    ///
    /// Unset optional parameters contribute nothing, so values differing
    /// only in unset fields encode identically.
    fn encode(&self, to: &mut Encoder);
}

impl Encode for () {
    fn encode(&self, _: &mut Encoder) {}
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, to: &mut Encoder) {
        if let Some(value) = self {
            value.encode(to);
        }
    }
}

/// Accumulator of query-string parameters.
#[derive(Debug, Default)]
pub struct Encoder {
    /// Collected parameters.
    pairs: Vec<(String, String)>,
}

impl Encoder {
    /// Creates a new empty [`Encoder`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter with the provided `key` and `value`.
    pub fn param(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.pairs.push((key.into(), value.to_string()));
    }

    /// Finishes the encoding, producing the [`Canonical`] form of the
    /// collected parameters.
    ///
    /// Parameters are sorted bytewise by key (then by value), so the result
    /// doesn't depend on the order they were appended in.
    #[must_use]
    pub fn finish(mut self) -> Canonical {
        self.pairs.sort_unstable();
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            let _ = query.append_pair(key, value);
        }
        Canonical::new(query.finish())
    }
}

/// Canonical query-string form of a list query.
///
/// Equal query states always produce equal [`Canonical`]s, and states
/// differing in any set field always produce different ones, so a
/// [`Canonical`] identifies a query as a cache/fetch key.
#[derive(Clone, Debug, derive_more::Display, Eq)]
#[display("{query}")]
pub struct Canonical {
    /// Canonical query string.
    query: String,

    /// Precomputed `xxh3` digest of the [`Canonical::query`].
    digest: u64,
}

impl Canonical {
    /// Creates a new [`Canonical`] from an already normalized query string.
    fn new(query: String) -> Self {
        let digest = xxh3_64(query.as_bytes());
        Self { query, digest }
    }

    /// Encodes the provided value into its [`Canonical`] form.
    #[must_use]
    pub fn of(value: &impl Encode) -> Self {
        let mut encoder = Encoder::new();
        value.encode(&mut encoder);
        encoder.finish()
    }

    /// Returns the canonical query string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// Returns the precomputed digest of this [`Canonical`].
    #[must_use]
    pub const fn digest(&self) -> u64 {
        self.digest
    }
}

impl PartialEq for Canonical {
    fn eq(&self, other: &Self) -> bool {
        self.digest == other.digest && self.query == other.query
    }
}

impl Hash for Canonical {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.digest);
    }
}

#[cfg(test)]
mod spec {
    use super::{Canonical, Encode, Encoder};

    struct Pairs(Vec<(&'static str, &'static str)>);

    impl Encode for Pairs {
        fn encode(&self, to: &mut Encoder) {
            for (key, value) in &self.0 {
                to.param(*key, value);
            }
        }
    }

    #[test]
    fn is_deterministic_regardless_of_append_order() {
        let one = Canonical::of(&Pairs(vec![
            ("limit", "10"),
            ("offset", "0"),
            ("search", "flu"),
        ]));
        let other = Canonical::of(&Pairs(vec![
            ("search", "flu"),
            ("limit", "10"),
            ("offset", "0"),
        ]));

        assert_eq!(one, other);
        assert_eq!(one.as_str(), other.as_str());
        assert_eq!(one.digest(), other.digest());
    }

    #[test]
    fn sorts_parameters_by_key() {
        let canonical = Canonical::of(&Pairs(vec![
            ("search", "flu"),
            ("limit", "10"),
            ("offset", "0"),
        ]));

        assert_eq!(canonical.as_str(), "limit=10&offset=0&search=flu");
    }

    #[test]
    fn percent_encodes_values() {
        let canonical =
            Canonical::of(&Pairs(vec![("search", "john doe"), ("a", "b&c")]));

        assert_eq!(canonical.as_str(), "a=b%26c&search=john+doe");
    }

    #[test]
    fn distinguishes_different_values() {
        let one = Canonical::of(&Pairs(vec![("search", "flu")]));
        let other = Canonical::of(&Pairs(vec![("search", "cold")]));

        assert_ne!(one, other);
        assert_ne!(one.as_str(), other.as_str());
    }

    #[test]
    fn nothing_encodes_into_empty_string() {
        let canonical = Canonical::of(&Pairs(vec![]));

        assert_eq!(canonical.as_str(), "");
    }

    #[test]
    fn empty_filter_encodes_same_as_no_filter() {
        struct Filter {
            term: Option<&'static str>,
        }

        impl Encode for Filter {
            fn encode(&self, to: &mut Encoder) {
                if let Some(term) = self.term {
                    to.param("term", term);
                }
            }
        }

        let base = Canonical::of(&Pairs(vec![("limit", "10")]));
        let with_empty = {
            let mut encoder = Encoder::new();
            Pairs(vec![("limit", "10")]).encode(&mut encoder);
            Filter { term: None }.encode(&mut encoder);
            encoder.finish()
        };

        assert_eq!(base, with_empty);
    }
}
