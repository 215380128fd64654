use super::admin_panel::{AdminForm, AdminPanel, SubmitStart};
use super::entry_store::EntryStore;
use super::map_view::MapViewController;
use crate::application::ports::geocoder::{GeocodeError, Geocoder};
use crate::domain::constants::{CUSTOM_PRODUCT_ID, CUSTOM_PRODUCT_PRICE};
use crate::domain::entities::{Entry, EntryCollection, Product, Review};
use crate::domain::value_objects::{Coordinates, Rating};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Added {
        entry: Entry,
        entries: EntryCollection,
    },
    /// 郵便番号が空
    Skipped,
    PanelClosed,
    AlreadyPending,
    /// 送信中にパネルが閉じられた
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("Location not found for pincode: {0}")]
    NotFound(String),

    #[error("Geocoding failed: {0}")]
    Transport(String),

    #[error("Geocoding timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    #[error("Failed to save entry: {0}")]
    Storage(String),
}

impl SubmitError {
    /// フォームに表示する文言
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::NotFound(_) => "Could not find location for this pincode.",
            _ => "Error finding location.",
        }
    }
}

impl From<GeocodeError> for SubmitError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound(pincode) => SubmitError::NotFound(pincode),
            GeocodeError::Transport(message) => SubmitError::Transport(message),
            GeocodeError::Timeout(timeout) => SubmitError::Timeout(timeout),
        }
    }
}

/// フォーム送信を Entry の追加・描画・フォーカスへつなぐ
pub struct EntryComposer {
    geocoder: Arc<dyn Geocoder>,
    store: Arc<Mutex<EntryStore>>,
    map: Arc<Mutex<MapViewController>>,
}

impl EntryComposer {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        store: Arc<Mutex<EntryStore>>,
        map: Arc<Mutex<MapViewController>>,
    ) -> Self {
        Self {
            geocoder,
            store,
            map,
        }
    }

    pub async fn submit(&self, panel: &Mutex<AdminPanel>) -> Result<SubmitOutcome, SubmitError> {
        let ticket = match panel.lock().await.begin_submit() {
            SubmitStart::Ready(ticket) => ticket,
            SubmitStart::EmptyPincode => return Ok(SubmitOutcome::Skipped),
            SubmitStart::PanelClosed => return Ok(SubmitOutcome::PanelClosed),
            SubmitStart::AlreadyPending => {
                warn!("Submit refused, geocoding already in progress");
                return Ok(SubmitOutcome::AlreadyPending);
            }
        };

        let rating = match Rating::from_stars(ticket.form().rating) {
            Ok(rating) => rating,
            Err(reason) => {
                panel.lock().await.finish(&ticket, false);
                return Err(SubmitError::InvalidRating(reason));
            }
        };

        let pincode = ticket.form().pincode.trim().to_string();
        let resolved = self.geocoder.resolve(&pincode).await;

        // ロック順は panel → store → map
        let mut panel = panel.lock().await;
        if !panel.is_current(&ticket) {
            info!("Discarding geocoding result for dismissed form (pincode {pincode})");
            return Ok(SubmitOutcome::Discarded);
        }

        let coordinates = match resolved {
            Ok(coordinates) => coordinates,
            Err(err) => {
                warn!("Failed to resolve pincode {pincode}: {err}");
                panel.finish(&ticket, false);
                return Err(err.into());
            }
        };

        let entry = compose_entry(ticket.form(), coordinates, rating);
        let appended = self.store.lock().await.append(entry.clone());
        let entries = match appended {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Failed to append entry: {err}");
                panel.finish(&ticket, false);
                return Err(SubmitError::Storage(err.to_string()));
            }
        };

        {
            let mut map = self.map.lock().await;
            map.render(&entries);
            map.focus(coordinates);
        }
        panel.finish(&ticket, true);

        info!("Added entry {} at {coordinates}", entry.id());
        Ok(SubmitOutcome::Added { entry, entries })
    }
}

/// 管理フォームの入力から Entry を組み立てる。ユーザー画像は商品画像を兼ねる。
pub fn compose_entry(form: &AdminForm, coordinates: Coordinates, rating: Rating) -> Entry {
    let product = Product::new(
        Some(CUSTOM_PRODUCT_ID.to_string()),
        Some(form.product_name.clone()),
        form.user_image.clone(),
        Some(form.product_link.clone()),
        Some(CUSTOM_PRODUCT_PRICE.to_string()),
    );
    let review = Review::new(
        Some(form.review.clone()),
        rating,
        form.user_image.clone(),
    );
    Entry::new(form.name.clone(), coordinates, product, review)
}
