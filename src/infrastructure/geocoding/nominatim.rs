use crate::application::ports::geocoder::{GeocodeError, Geocoder};
use crate::domain::value_objects::Coordinates;
use crate::shared::config::GeocoderConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Nominatim の `/search` エンドポイントを使う Geocoder
///
/// リトライ・キャッシュ・レート制限は行わない。
pub struct NominatimGeocoder {
    client: Client,
    search_url: Url,
    country: String,
    timeout: Option<Duration>,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, AppError> {
        let search_url = Url::parse(&format!(
            "{}/search",
            config.base_url.trim_end_matches('/')
        ))
        .map_err(|err| {
            AppError::ConfigurationError(format!("Invalid geocoder base_url: {err}"))
        })?;

        let timeout = config.timeout();
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| {
            AppError::ConfigurationError(format!("Failed to build HTTP client: {err}"))
        })?;

        Ok(Self {
            client,
            search_url,
            country: config.country.clone(),
            timeout,
        })
    }

    fn request_url(&self, pincode: &str) -> Url {
        let query = format!("{},{}", pincode.trim(), self.country);
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", &query);
        url
    }

    fn transport_error(&self, err: reqwest::Error) -> GeocodeError {
        match self.timeout {
            Some(timeout) if err.is_timeout() => GeocodeError::Timeout(timeout),
            _ => GeocodeError::Transport(err.to_string()),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, pincode: &str) -> Result<Coordinates, GeocodeError> {
        let url = self.request_url(pincode);
        debug!("Geocoding pincode {pincode} via {}", self.search_url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.transport_error(err))?;
        if !status.is_success() {
            return Err(GeocodeError::Transport(format!(
                "Geocoding service error ({status}): {body}"
            )));
        }

        let places: Vec<NominatimPlace> = serde_json::from_str(&body).map_err(|err| {
            GeocodeError::Transport(format!("Unexpected geocoding response: {err}"))
        })?;

        let Some(place) = places.into_iter().next() else {
            return Err(GeocodeError::NotFound(pincode.trim().to_string()));
        };

        let coordinates = Coordinates::parse(&place.lat, &place.lon).map_err(|err| {
            warn!("Geocoding service returned unusable coordinates: {err}");
            GeocodeError::Transport(err)
        })?;
        debug!(
            "Resolved pincode {pincode} to {coordinates} ({})",
            place.display_name.as_deref().unwrap_or("unnamed")
        );
        Ok(coordinates)
    }
}
