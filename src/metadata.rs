//! Bidirectional column-index (colour) <-> sample-name mapping, persisted in
//! the store under the `sample:name:<name>` / `sample:colour:<n>` key
//! prefixes from the external KV schema.

use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::storage::Storage;

fn name_key(name: &str) -> String {
    format!("sample:name:{name}")
}

fn colour_key(colour: u64) -> String {
    format!("sample:colour:{colour}")
}

/// Thin view over a [`Storage`] handle's sample-metadata keys. Holds no
/// state of its own; colours are assigned densely in `[0, num_samples)` and
/// never reused.
pub struct SampleMetadata;

impl SampleMetadata {
    /// Assign the next dense colours, in order, to `names`. Rejects the
    /// whole batch if any name already exists — the index is left
    /// unchanged (storage writes for earlier names in the batch are not
    /// rolled back by this call; callers wanting atomicity across the
    /// group should pre-check with [`Self::get_colour`]).
    #[instrument(skip(storage, names))]
    pub fn add_samples<S: Storage>(storage: &mut S, names: &[String]) -> Result<Vec<u64>> {
        let mut next = Self::num_samples(storage)?;
        let mut colours = Vec::with_capacity(names.len());
        for name in names {
            if Self::get_colour(storage, name)?.is_some() {
                return Err(Error::DuplicateSample { name: name.clone() });
            }
            let colour = next;
            storage.set_string(&name_key(name), &colour.to_string())?;
            storage.set_string(&colour_key(colour), name)?;
            colours.push(colour);
            next += 1;
        }
        storage.set_integer("number_of_cols", next as i64)?;
        storage.sync()?;
        debug!(added = names.len(), total = next, "registered samples");
        Ok(colours)
    }

    pub fn get_colour<S: Storage>(storage: &S, name: &str) -> Result<Option<u64>> {
        match storage.get_string(&name_key(name))? {
            Some(s) => Ok(Some(s.parse().expect("stored colour is always a valid u64"))),
            None => Ok(None),
        }
    }

    pub fn get_name<S: Storage>(storage: &S, colour: u64) -> Result<Option<String>> {
        storage.get_string(&colour_key(colour))
    }

    pub fn num_samples<S: Storage>(storage: &S) -> Result<u64> {
        Ok(storage.get_integer("number_of_cols")?.unwrap_or(0) as u64)
    }

    pub fn list<S: Storage>(storage: &S) -> Result<Vec<String>> {
        let n = Self::num_samples(storage)?;
        (0..n)
            .map(|c| {
                Self::get_name(storage, c)?
                    .ok_or_else(|| Error::StorageError(format!("missing sample name for colour {c}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn add_and_lookup_both_directions() {
        let mut s = MemoryStorage::new();
        let colours = SampleMetadata::add_samples(&mut s, &["s1".into(), "s2".into()]).unwrap();
        assert_eq!(colours, vec![0, 1]);
        assert_eq!(SampleMetadata::get_colour(&s, "s1").unwrap(), Some(0));
        assert_eq!(SampleMetadata::get_colour(&s, "s2").unwrap(), Some(1));
        assert_eq!(SampleMetadata::get_name(&s, 0).unwrap(), Some("s1".into()));
        assert_eq!(SampleMetadata::num_samples(&s).unwrap(), 2);
        assert_eq!(SampleMetadata::list(&s).unwrap(), vec!["s1", "s2"]);
    }

    #[test]
    fn colours_are_dense_across_calls() {
        let mut s = MemoryStorage::new();
        SampleMetadata::add_samples(&mut s, &["a".into()]).unwrap();
        let colours = SampleMetadata::add_samples(&mut s, &["b".into(), "c".into()]).unwrap();
        assert_eq!(colours, vec![1, 2]);
    }

    // P9: duplicate insert is rejected and leaves prior state untouched.
    #[test]
    fn p9_duplicate_name_rejected() {
        let mut s = MemoryStorage::new();
        SampleMetadata::add_samples(&mut s, &["s1".into()]).unwrap();
        let before = SampleMetadata::num_samples(&s).unwrap();
        let err = SampleMetadata::add_samples(&mut s, &["s1".into()]).unwrap_err();
        assert!(matches!(err, Error::DuplicateSample { name } if name == "s1"));
        assert_eq!(SampleMetadata::num_samples(&s).unwrap(), before);
    }
}
