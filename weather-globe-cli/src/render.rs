use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use tokio::sync::watch;
use weather_globe_core::{
    SessionState, ViewModel,
    globe::{CameraView, GlobeAnnotations, GlobeRenderer},
};

pub fn print_view(view: &ViewModel) {
    if let Some(prompt) = &view.idle_prompt {
        println!("{}", prompt.title);
        println!("{}", prompt.body);
    }

    if let Some(message) = &view.error_banner {
        println!("⚠ {message}");
    }

    if let Some(card) = &view.card {
        println!("┌ {}", card.place);
        println!("│ {}", card.date);
        println!("│ {}   {}", card.temperature, card.wind);
        println!("└ {} {}", card.icon, card.condition);
    }
}

pub fn print_globe(frame: &GlobeAnnotations, camera: CameraView) {
    println!(
        "🌐 camera {:.2}°, {:.2}° at altitude {:.1}  (atmosphere {})",
        camera.lat, camera.lng, camera.altitude, frame.scene.atmosphere_color
    );

    let Some(focus) = &frame.focus_point else {
        println!("   spinning, nothing focused");
        return;
    };
    println!("   focus     {:.4}, {:.4}", focus.lat, focus.lng);

    if let Some(arc) = frame.arcs.first() {
        println!("   arcs      {} inbound, {} → {}", frame.arcs.len(), arc.colors[0], arc.colors[1]);
    }
    if let Some(particle) = frame.particles.first() {
        println!("   particles {} in {}", frame.particles.len(), particle.color);
    }
    if let Some(label) = &frame.label {
        println!("   label     {}", label.text.replace('\n', " · "));
    }
}

/// Globe renderer for the terminal: keeps the camera and the last drawn frame
/// so the CLI can describe them after a search.
pub struct TextGlobe {
    view: Mutex<CameraView>,
    frames: watch::Sender<Option<GlobeAnnotations>>,
}

impl TextGlobe {
    pub fn new() -> Self {
        let (frames, _) = watch::channel(None);
        Self { view: Mutex::new(CameraView::OVERVIEW), frames }
    }

    pub fn view(&self) -> CameraView {
        *self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait until the drawn frame reflects `state`, giving up after `wait`.
    pub async fn frame_for(&self, state: &SessionState, wait: Duration) -> Option<GlobeAnnotations> {
        let mut frames = self.frames.subscribe();
        let matches = |frame: &Option<GlobeAnnotations>| {
            frame
                .as_ref()
                .is_some_and(|f| f.depicts(state.geo.as_ref(), state.weather.as_ref(), state.is_daytime))
        };

        let frame = tokio::time::timeout(wait, frames.wait_for(matches)).await.ok()?.ok()?;
        frame.clone()
    }
}

impl Default for TextGlobe {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobeRenderer for TextGlobe {
    fn point_of_view(&self) -> CameraView {
        self.view()
    }

    fn fly_to(&self, view: CameraView, transition: Duration) {
        *self.view.lock().unwrap_or_else(PoisonError::into_inner) = view;
        if !transition.is_zero() {
            tracing::debug!(lat = view.lat, lng = view.lng, altitude = view.altitude, ?transition, "camera move");
        }
    }

    fn show(&self, annotations: &GlobeAnnotations) {
        self.frames.send_replace(Some(annotations.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::{SeedableRng, rngs::StdRng};
    use weather_globe_core::{CurrentWeather, GeoResult, WeatherCode, globe::derive_annotations};

    fn place(name: &str, country: &str, latitude: f64, longitude: f64) -> GeoResult {
        GeoResult {
            latitude,
            longitude,
            display_name: name.into(),
            country: country.into(),
            timezone: "auto".into(),
        }
    }

    fn searched(geo: GeoResult, temperature_c: f64) -> SessionState {
        let mut state = SessionState::default();
        let generation = state.submit(&geo.display_name).expect("submit");
        state.record_geo(generation, geo);
        state.finish(
            generation,
            &Ok(CurrentWeather {
                temperature_c,
                wind_kph: 10.0,
                code: WeatherCode(1),
                observed_at: NaiveDate::from_ymd_opt(2026, 10, 19)
                    .and_then(|d| d.and_hms_opt(14, 0, 0))
                    .expect("valid timestamp"),
            }),
        );
        state
    }

    fn draw(globe: &TextGlobe, state: &SessionState) {
        let mut rng = StdRng::seed_from_u64(1);
        globe.show(&derive_annotations(state.geo.as_ref(), state.weather.as_ref(), state.is_daytime, &mut rng));
    }

    #[tokio::test(start_paused = true)]
    async fn previous_city_frame_is_not_reported_for_new_city() {
        let globe = TextGlobe::new();
        let paris = searched(place("Paris", "FR", 48.8566, 2.3522), 18.0);
        let tokyo = searched(place("Tokyo", "JP", 35.6762, 139.6503), 22.0);
        draw(&globe, &paris);

        assert!(globe.frame_for(&tokyo, Duration::from_millis(200)).await.is_none());

        let frame = globe.frame_for(&paris, Duration::from_millis(200)).await.expect("paris frame");
        assert!(frame.label.expect("label").text.contains("Paris, FR"));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_the_matching_frame() {
        let globe = std::sync::Arc::new(TextGlobe::new());
        let paris = searched(place("Paris", "FR", 48.8566, 2.3522), 18.0);
        let tokyo = searched(place("Tokyo", "JP", 35.6762, 139.6503), 22.0);
        draw(&globe, &paris);

        let drawer = {
            let globe = std::sync::Arc::clone(&globe);
            let tokyo = tokyo.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                draw(&globe, &tokyo);
            })
        };

        let frame = globe.frame_for(&tokyo, Duration::from_secs(1)).await.expect("tokyo frame");
        assert!(frame.label.expect("label").text.contains("Tokyo, JP"));
        drawer.await.expect("drawer");
    }
}
