use crate::domain::constants::{SeedRecord, SEED_RECORDS};
use crate::domain::entities::{Entry, EntryCollection, Product, Review};
use crate::domain::value_objects::{Coordinates, EntryId, Rating};

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn seed_entry(record: &SeedRecord) -> Entry {
    Entry::from_parts(
        EntryId::new(record.id).unwrap_or_else(|_| EntryId::generate()),
        record.name,
        Coordinates::from(record.coords),
        Product::new(
            text(record.product_id),
            text(record.product_name),
            text(record.product_image_url),
            text(record.product_link),
            text(record.price),
        ),
        Review::new(
            text(record.review),
            Rating::new(record.rating).unwrap_or_default(),
            text(record.user_image),
        ),
    )
}

/// 初回起動時とリセット時に使う組み込みコレクション
pub fn seed_collection() -> EntryCollection {
    EntryCollection::new(SEED_RECORDS.iter().map(seed_entry).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_entries_are_valid_and_stable() {
        let seed = seed_collection();
        assert_eq!(seed.len(), 2);
        assert!(seed.iter().all(|entry| entry.validate().is_ok()));
        assert_eq!(seed, seed_collection());

        let first = &seed.as_slice()[0];
        assert_eq!(first.id().as_str(), "1");
        assert_eq!(first.display_name(), "Priya Sharma");
        assert_eq!(first.product().price(), Some("₹1,299"));
        assert_eq!(first.review().rating().value(), 5.0);
    }
}
