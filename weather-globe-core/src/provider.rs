use crate::{
    Config, CurrentWeather, GeoResult, error::LookupError, provider::openmeteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

/// Geocoding and current-conditions lookups.
///
/// The two calls are independent; callers chain them (geocode first, then
/// fetch weather with the resolved timezone).
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a free-text city name to its first match.
    ///
    /// Returns [`LookupError::NotFound`] when the service has no match, and
    /// [`LookupError::Transient`] for everything else that goes wrong.
    async fn geocode(&self, city: &str) -> Result<GeoResult, LookupError>;

    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> Result<CurrentWeather, LookupError>;
}

/// Construct the provider described by the config endpoints.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenMeteoProvider::from_config(config)?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_default_config_builds() {
        let provider = provider_from_config(&Config::default());
        assert!(provider.is_ok());
    }
}
