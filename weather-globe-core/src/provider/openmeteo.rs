use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Config, CurrentWeather, GeoResult, WeatherCode, error::LookupError, provider::WeatherProvider,
};

const USER_AGENT: &str = concat!("weather-globe/", env!("CARGO_PKG_VERSION"));

/// Open-Meteo forecast timestamps carry no offset; they are local to the requested timezone.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Client for the Open-Meteo geocoding and forecast APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    geocoding_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(geocoding_url: impl Into<String>, forecast_url: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_client(geocoding_url, forecast_url, Client::builder())
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::with_client(
            config.geocoding_url.as_str(),
            config.forecast_url.as_str(),
            Client::builder().timeout(config.request_timeout()),
        )
    }

    fn with_client(
        geocoding_url: impl Into<String>,
        forecast_url: impl Into<String>,
        builder: reqwest::ClientBuilder,
    ) -> anyhow::Result<Self> {
        let http = builder
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { geocoding_url: geocoding_url.into(), forecast_url: forecast_url.into(), http })
    }

    async fn fetch_geocode(&self, city: &str) -> anyhow::Result<Option<GeoResult>> {
        let res = self
            .http
            .get(&self.geocoding_url)
            .query(&[("name", city), ("count", "1")])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (geocoding)")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Open-Meteo geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmGeocodeResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo geocoding JSON")?;

        Ok(parsed.results.into_iter().next().map(|place| GeoResult {
            latitude: place.latitude,
            longitude: place.longitude,
            display_name: place.name,
            country: place.country.unwrap_or_default(),
            timezone: place.timezone.unwrap_or_else(|| "auto".to_string()),
        }))
    }

    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> anyhow::Result<CurrentWeather> {
        let res = self
            .http
            .get(&self.forecast_url)
            .query(&[
                ("latitude", latitude.to_string().as_str()),
                ("longitude", longitude.to_string().as_str()),
                ("current_weather", "true"),
                ("timezone", timezone),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (current weather)")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Open-Meteo forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmForecastResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo forecast JSON")?;

        let current = parsed.current_weather;
        let observed_at = NaiveDateTime::parse_from_str(&current.time, TIME_FORMAT)
            .with_context(|| format!("Unexpected observation time '{}'", current.time))?;

        Ok(CurrentWeather {
            temperature_c: current.temperature,
            wind_kph: current.windspeed,
            code: WeatherCode(current.weathercode),
            observed_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    latitude: f64,
    longitude: f64,
    name: String,
    country: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmGeocodeResponse {
    #[serde(default)]
    results: Vec<OmPlace>,
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    windspeed: f64,
    weathercode: u16,
    time: String,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current_weather: OmCurrentWeather,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn geocode(&self, city: &str) -> Result<GeoResult, LookupError> {
        match self.fetch_geocode(city).await? {
            Some(geo) => {
                tracing::debug!(city, lat = geo.latitude, lon = geo.longitude, tz = %geo.timezone, "geocoded");
                Ok(geo)
            }
            None => Err(LookupError::NotFound(city.to_string())),
        }
    }

    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> Result<CurrentWeather, LookupError> {
        Ok(self.fetch_current(latitude, longitude, timezone).await?)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
