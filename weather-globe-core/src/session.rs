//! Search/result orchestration.
//!
//! [`SessionState`] is the single mutable state behind the UI. It only changes
//! through the transition methods below, and every transition past `submit`
//! carries the generation it was issued for: results from a search that has
//! since been superseded are dropped without touching the state.
//!
//! [`Orchestrator`] drives the two network calls and publishes each state
//! change on a `watch` channel for the globe driver and the view.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{CurrentWeather, GeoResult, error::LookupError, provider::WeatherProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Success,
    NotFoundError,
    GenericError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub query_text: String,
    pub phase: SearchPhase,
    pub error_message: Option<String>,
    pub has_searched_once: bool,
    pub geo: Option<GeoResult>,
    pub weather: Option<CurrentWeather>,
    pub is_daytime: bool,
    /// Generation of the most recently submitted search; 0 before the first one.
    pub generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            query_text: String::new(),
            phase: SearchPhase::Idle,
            error_message: None,
            has_searched_once: false,
            geo: None,
            weather: None,
            is_daytime: true,
            generation: 0,
        }
    }
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }

    /// Start a new search for `query`.
    ///
    /// Blank queries only set the validation message and leave the phase,
    /// the previous result and `has_searched_once` as they were.
    pub fn submit(&mut self, query: &str) -> Result<u64, LookupError> {
        self.query_text = query.to_string();

        if query.trim().is_empty() {
            let err = LookupError::Validation;
            self.error_message = Some(err.user_message().to_string());
            return Err(err);
        }

        self.generation += 1;
        self.error_message = None;
        self.weather = None;
        self.has_searched_once = true;
        self.phase = SearchPhase::Loading;
        Ok(self.generation)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Store the geocoding match; the search stays loading until the weather arrives.
    pub fn record_geo(&mut self, generation: u64, geo: GeoResult) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.geo = Some(geo);
        true
    }

    /// Apply the final outcome of a search and leave the loading phase.
    ///
    /// Returns `false` (and changes nothing) if a newer search was submitted in the meantime.
    pub fn finish(
        &mut self,
        generation: u64,
        result: &Result<CurrentWeather, LookupError>,
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        match result {
            Ok(weather) => {
                self.is_daytime = weather.is_daytime();
                self.weather = Some(weather.clone());
                self.error_message = None;
                self.phase = SearchPhase::Success;
            }
            Err(err) => {
                self.weather = None;
                self.error_message = Some(err.user_message().to_string());
                self.phase = match err {
                    LookupError::NotFound(_) => SearchPhase::NotFoundError,
                    _ => SearchPhase::GenericError,
                };
            }
        }
        true
    }
}

/// What happened to a search once its calls returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The result was written to the session.
    Applied,
    /// A newer search was submitted first; the result was dropped.
    Superseded,
}

#[derive(Debug)]
pub struct Orchestrator {
    provider: Arc<dyn WeatherProvider>,
    state: watch::Sender<SessionState>,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { provider, state }
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Run one search: geocode `query`, then fetch current weather for the match.
    ///
    /// Errors are returned only when they were applied to the session; a
    /// superseded search always yields `Ok(SearchOutcome::Superseded)`.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, LookupError> {
        let mut submitted = Err(LookupError::Validation);
        self.state.send_modify(|s| submitted = s.submit(query));
        let generation = submitted?;
        let pending = PendingSearch { state: &self.state, generation, settled: false };

        let outcome = self.lookup(generation, query.trim()).await;
        pending.settle();
        outcome
    }

    async fn lookup(&self, generation: u64, city: &str) -> Result<SearchOutcome, LookupError> {
        tracing::info!(city, generation, "search started");

        let geo = match self.provider.geocode(city).await {
            Ok(geo) => geo,
            Err(err) => return self.finish(generation, Err(err)),
        };

        let (latitude, longitude) = (geo.latitude, geo.longitude);
        let timezone = geo.timezone.clone();
        if !self.state.send_if_modified(|s| s.record_geo(generation, geo)) {
            tracing::debug!(generation, "dropping geocode result from superseded search");
            return Ok(SearchOutcome::Superseded);
        }

        let result = self.provider.current_weather(latitude, longitude, &timezone).await;
        self.finish(generation, result)
    }

    fn finish(
        &self,
        generation: u64,
        result: Result<CurrentWeather, LookupError>,
    ) -> Result<SearchOutcome, LookupError> {
        if !self.state.send_if_modified(|s| s.finish(generation, &result)) {
            tracing::debug!(generation, "dropping result from superseded search");
            return Ok(SearchOutcome::Superseded);
        }

        match result {
            Ok(weather) => {
                tracing::info!(
                    generation,
                    temperature_c = weather.temperature_c,
                    code = weather.code.0,
                    "search completed"
                );
                Ok(SearchOutcome::Applied)
            }
            Err(err @ LookupError::NotFound(_)) => {
                tracing::info!(generation, "{err}");
                Err(err)
            }
            Err(err) => {
                tracing::warn!(generation, "search failed: {err:#}");
                Err(err)
            }
        }
    }
}

/// Fails a submitted search that is dropped before its calls return.
struct PendingSearch<'a> {
    state: &'a watch::Sender<SessionState>,
    generation: u64,
    settled: bool,
}

impl PendingSearch<'_> {
    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingSearch<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let generation = self.generation;
        let cancelled = Err(LookupError::Transient(anyhow::anyhow!("search was cancelled")));
        if self.state.send_if_modified(|s| s.finish(generation, &cancelled)) {
            tracing::warn!(generation, "search cancelled before completing");
        }
    }
}
