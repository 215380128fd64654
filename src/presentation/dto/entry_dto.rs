use crate::domain::entities::Entry;
use serde::Serialize;

/// CLI の一覧表示用
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    pub id: String,
    pub name: String,
    pub coords: [f64; 2],
    pub product_name: Option<String>,
    pub price: Option<String>,
    pub rating: f64,
    pub stars: Vec<&'static str>,
    pub review: Option<String>,
}

impl From<&Entry> for EntryView {
    fn from(entry: &Entry) -> Self {
        let rating = entry.review().rating();
        Self {
            id: entry.id().to_string(),
            name: entry.display_name().to_string(),
            coords: entry.coordinates().into(),
            product_name: entry.product().name().map(str::to_string),
            price: entry.product().price().map(str::to_string),
            rating: rating.value(),
            stars: rating.stars().iter().map(|star| star.icon_name()).collect(),
            review: entry.review().comment().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed::seed_collection;

    #[test]
    fn seed_entry_view_carries_star_icons() {
        let entries = seed_collection();
        let view = EntryView::from(entries.iter().next().unwrap());

        assert_eq!(view.name, "Priya Sharma");
        assert_eq!(view.coords, [12.9716, 77.5946]);
        assert_eq!(view.stars, vec!["star"; 5]);
        assert_eq!(view.product_name.as_deref(), Some("Shikaarvani Bodycon Dress"));
    }
}
