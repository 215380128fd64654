use crate::application::ports::map_widget::{MarkerIcon, MarkerSpec};
use crate::domain::entities::Entry;
use std::fmt::Write as _;

const MARKER_ICON_CLASS: &str = "entry-marker-icon";
const MARKER_ICON_HTML: &str = r#"<div class="marker-dot"></div>"#;
const MARKER_ICON_SIZE: u32 = 20;

/// HTML 断片に埋め込む文字列をエスケープする
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn marker_icon() -> MarkerIcon {
    MarkerIcon {
        class_name: MARKER_ICON_CLASS.to_string(),
        html: MARKER_ICON_HTML.to_string(),
        size: [MARKER_ICON_SIZE, MARKER_ICON_SIZE],
        anchor: [MARKER_ICON_SIZE / 2, MARKER_ICON_SIZE / 2],
    }
}

pub fn stars_html(entry: &Entry) -> String {
    entry
        .review()
        .rating()
        .stars()
        .iter()
        .map(|star| format!(r#"<span class="material-icons">{}</span>"#, star.icon_name()))
        .collect()
}

/// Entry から popup の HTML を毎回組み立てる
pub fn popup_html(entry: &Entry) -> String {
    let mut html = String::new();
    html.push_str(r#"<div class="custom-popup">"#);

    let _ = write!(
        html,
        r#"<div class="popup-header"><span class="material-icons-outlined">place</span><p>A purchase from <strong>{}</strong></p></div>"#,
        escape_html(entry.display_name())
    );

    if let Some(image) = entry.review().user_image() {
        let _ = write!(
            html,
            r#"<img src="{}" alt="User provided content" class="popup-user-image">"#,
            escape_html(image)
        );
    }

    if let Some(name) = entry.product().name() {
        let _ = write!(
            html,
            r#"<div class="product-details"><h4>{}</h4></div>"#,
            escape_html(name)
        );
    }

    html.push_str(r#"<div class="review-section">"#);
    let _ = write!(html, r#"<div class="review-stars">{}</div>"#, stars_html(entry));
    if let Some(comment) = entry.review().comment() {
        let _ = write!(html, "<blockquote>\"{}\"</blockquote>", escape_html(comment));
    }
    html.push_str("</div>");

    if let Some(link) = entry.product().link() {
        let _ = write!(
            html,
            r#"<a href="{}" class="view-product-btn" target="_blank" rel="noopener noreferrer">View Product</a>"#,
            escape_html(link)
        );
    }

    html.push_str("</div>");
    html
}

pub fn marker_for(entry: &Entry) -> MarkerSpec {
    MarkerSpec {
        entry_id: entry.id().to_string(),
        position: entry.coordinates(),
        icon: marker_icon(),
        popup_html: popup_html(entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Product, Review};
    use crate::domain::value_objects::{Coordinates, EntryId, Rating};

    fn entry(rating: f64, image: Option<&str>, link: Option<&str>) -> Entry {
        Entry::from_parts(
            EntryId::new("5").unwrap(),
            "Kavya <Admin>",
            Coordinates::new(19.076, 72.8777).unwrap(),
            Product::new(
                None,
                Some("Silk Saree".to_string()),
                None,
                link.map(str::to_string),
                None,
            ),
            Review::new(
                Some("Soft & light".to_string()),
                Rating::new(rating).unwrap(),
                image.map(str::to_string),
            ),
        )
    }

    #[test]
    fn popup_escapes_user_text() {
        let html = popup_html(&entry(4.0, None, None));
        assert!(html.contains("<strong>Kavya &lt;Admin&gt;</strong>"));
        assert!(html.contains("\"Soft &amp; light\""));
        assert!(!html.contains("<Admin>"));
    }

    #[test]
    fn popup_renders_five_star_icons() {
        let html = popup_html(&entry(2.5, None, None));
        assert_eq!(html.matches(">star<").count(), 2);
        assert_eq!(html.matches(">star_half<").count(), 1);
        assert_eq!(html.matches(">star_border<").count(), 2);
    }

    #[test]
    fn optional_sections_follow_entry_fields() {
        let bare = popup_html(&entry(5.0, None, None));
        assert!(!bare.contains("popup-user-image"));
        assert!(!bare.contains("view-product-btn"));

        let full = popup_html(&entry(
            5.0,
            Some("data:image/png;base64,AAAA"),
            Some("https://example.com/saree"),
        ));
        assert!(full.contains(r#"<img src="data:image/png;base64,AAAA""#));
        assert!(full.contains(r#"href="https://example.com/saree""#));
    }

    #[test]
    fn marker_is_deterministic() {
        let e = entry(3.0, None, Some("https://example.com"));
        assert_eq!(marker_for(&e), marker_for(&e));
        assert_eq!(marker_for(&e).entry_id, "5");
        assert_eq!(marker_for(&e).icon.anchor, [10, 10]);
    }
}
