//! Candidate key registry.
//!
//! A relation always carries at least one candidate key. When none are
//! declared the full attribute set is used, which is always a valid (if weak)
//! key for a distinct relation.
//!
//! Keys are kept in canonical form so that logically equal registries compare
//! and print identically:
//! - attribute names inside a key are sorted and deduplicated;
//! - keys are sorted by cardinality, then lexicographically by member names;
//! - repeated keys are dropped.

use crate::error::{RelCsvError, Result};
use crate::schema::Schema;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A non-empty, sorted set of attribute names.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CandidateKey(Vec<String>);

impl CandidateKey {
    fn canonical<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = names.into_iter().map(Into::into).collect::<BTreeSet<String>>();
        Self(set.into_iter().collect())
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the key has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }
}

impl Ord for CandidateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for CandidateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CandidateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.join(", "))
    }
}

/// The canonically ordered collection of a relation's candidate keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CandidateKeys(Vec<CandidateKey>);

impl CandidateKeys {
    /// The single key made of every attribute in `schema`.
    #[must_use]
    pub fn full(schema: &Schema) -> Self {
        Self(vec![CandidateKey::canonical(schema.names())])
    }

    /// Validate and canonicalize declared keys against `schema`.
    ///
    /// An empty declaration yields [`CandidateKeys::full`].
    ///
    /// ```
    /// use relcsv::keys::CandidateKeys;
    /// use relcsv::schema::Schema;
    ///
    /// let s = Schema::parse([("PNO", "int"), ("SNO", "int"), ("Qty", "int")]).unwrap();
    /// let keys = CandidateKeys::declare(&s, [vec!["SNO", "PNO"], vec!["PNO", "SNO"]]).unwrap();
    /// assert_eq!(keys.to_string(), "{PNO, SNO}");
    /// ```
    ///
    /// # Errors
    /// [`RelCsvError::KeyValidation`] if a key is empty or names an attribute
    /// that is not in `schema`.
    pub fn declare<I, K, S>(schema: &Schema, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut declared = Vec::new();
        for key in keys {
            let names = key
                .into_iter()
                .map(|n| n.as_ref().to_string())
                .collect::<Vec<_>>();
            if names.is_empty() {
                return Err(RelCsvError::KeyValidation("empty candidate key".into()));
            }
            if let Some(unknown) = names.iter().find(|n| !schema.contains(n)) {
                return Err(RelCsvError::KeyValidation(format!(
                    "attribute {unknown} is not in heading ({})",
                    schema.heading()
                )));
            }
            declared.push(CandidateKey::canonical(names));
        }
        if declared.is_empty() {
            return Ok(Self::full(schema));
        }
        Ok(Self::canonical(declared))
    }

    fn canonical(mut keys: Vec<CandidateKey>) -> Self {
        keys.sort();
        keys.dedup();
        Self(keys)
    }

    /// Replace every member name by its image under `rename`, then re-canonicalize.
    ///
    /// # Errors
    /// [`RelCsvError::KeyValidation`] if a name used in any key has no image.
    pub fn remap(&self, rename: &HashMap<String, String>) -> Result<Self> {
        let mut keys = Vec::with_capacity(self.0.len());
        for key in &self.0 {
            let mut names = Vec::with_capacity(key.len());
            for name in &key.0 {
                let image = rename.get(name).ok_or_else(|| {
                    RelCsvError::KeyValidation(format!(
                        "rename does not map key attribute {name}"
                    ))
                })?;
                names.push(image.clone());
            }
            keys.push(CandidateKey::canonical(names));
        }
        Ok(Self::canonical(keys))
    }

    #[must_use]
    pub fn keys(&self) -> &[CandidateKey] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateKey> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if no keys are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` if some key has exactly the given members (in any order).
    #[must_use]
    pub fn contains<S: AsRef<str>>(&self, names: &[S]) -> bool {
        let probe = CandidateKey::canonical(names.iter().map(|n| n.as_ref().to_string()));
        self.0.contains(&probe)
    }

    /// Member names of every key, outermost order canonical.
    #[must_use]
    pub fn to_names(&self) -> Vec<Vec<String>> {
        self.0.iter().map(|k| k.0.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a CandidateKeys {
    type Item = &'a CandidateKey;
    type IntoIter = std::slice::Iter<'a, CandidateKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for CandidateKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}
