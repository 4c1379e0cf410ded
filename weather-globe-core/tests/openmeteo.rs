//! Integration tests for OpenMeteoProvider using wiremock.

use weather_globe_core::{
    LookupError, WeatherCode, WeatherProvider, provider::openmeteo::OpenMeteoProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> OpenMeteoProvider {
    OpenMeteoProvider::new(
        format!("{}/v1/search", server.uri()),
        format!("{}/v1/forecast", server.uri()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_geocode_returns_first_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "id": 2988507,
                "name": "Paris",
                "latitude": 48.8566,
                "longitude": 2.3522,
                "country": "FR",
                "timezone": "Europe/Paris"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let geo = provider_for(&mock_server).geocode("Paris").await.unwrap();

    assert_eq!(geo.display_name, "Paris");
    assert_eq!(geo.country, "FR");
    assert_eq!(geo.timezone, "Europe/Paris");
    assert_eq!(geo.latitude, 48.8566);
    assert_eq!(geo.longitude, 2.3522);
}

#[tokio::test]
async fn test_geocode_without_results_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generationtime_ms": 0.3
        })))
        .mount(&mock_server)
        .await;

    let err = provider_for(&mock_server).geocode("Zzzxyz123").await.unwrap_err();
    assert!(matches!(err, LookupError::NotFound(ref city) if city == "Zzzxyz123"));
    assert_eq!(err.user_message(), "City not found. Try again!");
}

#[tokio::test]
async fn test_geocode_empty_results_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": []
        })))
        .mount(&mock_server)
        .await;

    let err = provider_for(&mock_server).geocode("Nowhere").await.unwrap_err();
    assert!(matches!(err, LookupError::NotFound(_)));
}

#[tokio::test]
async fn test_geocode_fills_missing_country_and_timezone() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{ "name": "Atlantis", "latitude": 1.0, "longitude": 2.0 }]
        })))
        .mount(&mock_server)
        .await;

    let geo = provider_for(&mock_server).geocode("Atlantis").await.unwrap();
    assert_eq!(geo.country, "");
    assert_eq!(geo.timezone, "auto");
}

#[tokio::test]
async fn test_geocode_server_error_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let err = provider_for(&mock_server).geocode("Paris").await.unwrap_err();
    assert!(matches!(err, LookupError::Transient(_)));
    let msg = format!("{err:#}");
    assert!(msg.contains("503"), "Error should mention status: {msg}");
    assert!(msg.contains("maintenance"));
}

#[tokio::test]
async fn test_geocode_malformed_json_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let err = provider_for(&mock_server).geocode("Paris").await.unwrap_err();
    assert!(matches!(err, LookupError::Transient(_)));
    assert_eq!(err.user_message(), "Something went wrong. Please try again.");
}

#[tokio::test]
async fn test_current_weather_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "48.8566"))
        .and(query_param("longitude", "2.3522"))
        .and(query_param("current_weather", "true"))
        .and(query_param("timezone", "Europe/Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 48.86,
            "longitude": 2.35,
            "current_weather": {
                "temperature": 18.0,
                "windspeed": 10.0,
                "winddirection": 200,
                "weathercode": 1,
                "time": "2026-10-19T14:00"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let weather = provider_for(&mock_server)
        .current_weather(48.8566, 2.3522, "Europe/Paris")
        .await
        .unwrap();

    assert_eq!(weather.temperature_c, 18.0);
    assert_eq!(weather.wind_kph, 10.0);
    assert_eq!(weather.code, WeatherCode(1));
    assert_eq!(weather.local_hour(), 14);
    assert!(weather.is_daytime());
}

#[tokio::test]
async fn test_current_weather_missing_block_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 48.86
        })))
        .mount(&mock_server)
        .await;

    let err = provider_for(&mock_server)
        .current_weather(48.8566, 2.3522, "Europe/Paris")
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Transient(_)));
}

#[tokio::test]
async fn test_current_weather_bad_timestamp_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current_weather": {
                "temperature": 18.0,
                "windspeed": 10.0,
                "weathercode": 1,
                "time": "yesterday"
            }
        })))
        .mount(&mock_server)
        .await;

    let err = provider_for(&mock_server)
        .current_weather(48.8566, 2.3522, "Europe/Paris")
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("yesterday"));
}

#[tokio::test]
async fn test_current_weather_bad_request_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Invalid timezone"
        })))
        .mount(&mock_server)
        .await;

    let err = provider_for(&mock_server)
        .current_weather(0.0, 0.0, "Mars/Olympus")
        .await
        .unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("400"), "Error should mention 400 status: {msg}");
}
