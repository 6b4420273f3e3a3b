// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::HashMap;
use text_runs::FontSlant;

use super::{FontDescription, FontId};

/// Lookup key for a resolved face. Floating point attributes are keyed by their bits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FontKey {
    family: Option<String>,
    weight: u32,
    width: u32,
    slant: FontSlant,
    point_size: u32,
}

impl FontKey {
    fn new(description: &FontDescription, point_size: f32) -> Self {
        Self {
            family: description.family.clone(),
            weight: description.weight.value().to_bits(),
            width: description.width.ratio().to_bits(),
            slant: description.slant,
            point_size: point_size.to_bits(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    epoch: u64,
    id: FontId,
}

/// A least-recently-used cache of font lookups.
///
/// Font validation asks for the same few descriptions over and over; this keeps the
/// round trips to the [`FontClient`](super::FontClient) down to one per distinct
/// `(family, weight, width, slant, size)`.
#[derive(Debug)]
pub(crate) struct FontIdCache {
    entries: HashMap<FontKey, Entry>,
    epoch: u64,
    max_entries: usize,
}

impl FontIdCache {
    pub(crate) fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            epoch: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Returns the cached face for `description` at `point_size`, calling `resolve`
    /// on a miss. The least recently used entry is evicted when the cache is full.
    pub(crate) fn font_id(
        &mut self,
        description: &FontDescription,
        point_size: f32,
        resolve: impl FnOnce() -> FontId,
    ) -> FontId {
        let key = FontKey::new(description, point_size);
        self.epoch += 1;
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.epoch = self.epoch;
            return entry.id;
        }

        if self.entries.len() >= self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.epoch)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                self.entries.remove(&oldest);
            }
        }

        let id = resolve();
        self.entries.insert(
            key,
            Entry {
                epoch: self.epoch,
                id,
            },
        );
        id
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::FontIdCache;
    use crate::{FontDescription, FontId};
    use text_runs::FontWeight;

    fn family(name: &str) -> FontDescription {
        FontDescription::with_family(name)
    }

    #[test]
    fn retrieve_existing_entry() {
        let mut cache = FontIdCache::new(3);
        assert_eq!(cache.font_id(&family("a"), 12.0, || FontId(42)), FontId(42));
        let id = cache.font_id(&family("a"), 12.0, || panic!("should not resolve again"));
        assert_eq!(id, FontId(42));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn size_and_weight_are_part_of_the_key() {
        let mut cache = FontIdCache::new(8);
        cache.font_id(&family("a"), 12.0, || FontId(1));
        assert_eq!(cache.font_id(&family("a"), 13.0, || FontId(2)), FontId(2));

        let mut bold = family("a");
        bold.weight = FontWeight::BOLD;
        assert_eq!(cache.font_id(&bold, 12.0, || FontId(3)), FontId(3));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let mut cache = FontIdCache::new(3);
        cache.font_id(&family("key1"), 10.0, || FontId(1));
        cache.font_id(&family("key2"), 10.0, || FontId(2));
        cache.font_id(&family("key3"), 10.0, || FontId(3));

        // Touch key1 so key2 becomes the oldest.
        cache.font_id(&family("key1"), 10.0, || panic!("should not create"));
        cache.font_id(&family("key4"), 10.0, || FontId(4));

        let id = cache.font_id(&family("key1"), 10.0, || panic!("key1 should still be present"));
        assert_eq!(id, FontId(1));

        let mut was_created = false;
        cache.font_id(&family("key2"), 10.0, || {
            was_created = true;
            FontId(20)
        });
        assert!(was_created, "key2 should have been evicted");
    }
}
