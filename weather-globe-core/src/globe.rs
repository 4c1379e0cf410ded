//! Globe annotations derived from the current search result.
//!
//! Everything here is a pure function of `(geo, weather, is_daytime)` plus a
//! random source. The renderer gets a complete [`GlobeAnnotations`] value on
//! every change; nothing is patched in place.

use std::time::Duration;

use rand::Rng;

use crate::{CurrentWeather, GeoResult, conditions::Color};

pub mod driver;

pub use driver::{GlobeDriver, GlobeHandle, GlobeRenderer};

pub const ARC_COUNT: usize = 5;
pub const PARTICLE_COUNT: usize = 25;

/// Max particle offset from the focus, in degrees, on each axis.
const PARTICLE_JITTER_DEG: f64 = 3.0;
/// The camera sits this many degrees north of the focus so the label stays in view.
const CAMERA_LAT_OFFSET_DEG: f64 = 3.0;

const FOCUS_POINT_SIZE: f64 = 1.2;
const LABEL_SIZE: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub lat: f64,
    pub lng: f64,
    pub altitude: f64,
}

impl CameraView {
    /// Whole-globe view used while nothing is focused.
    pub const OVERVIEW: CameraView = CameraView { lat: 0.0, lng: 0.0, altitude: 2.5 };
}

/// Where the camera should go and how long the move takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMove {
    pub view: CameraView,
    pub transition: Duration,
}

pub fn camera_target(geo: Option<&GeoResult>) -> CameraMove {
    match geo {
        Some(geo) => CameraMove {
            view: CameraView {
                lat: geo.latitude + CAMERA_LAT_OFFSET_DEG,
                lng: geo.longitude,
                altitude: 2.0,
            },
            transition: Duration::from_secs(2),
        },
        None => CameraMove { view: CameraView::OVERVIEW, transition: Duration::from_secs(1) },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FocusPoint {
    pub lat: f64,
    pub lng: f64,
    pub size: f64,
    pub color: Color,
}

/// Decorative arc from a random spot on the globe to the focus.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPath {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    /// Gradient from start to end.
    pub colors: [Color; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub lat: f64,
    pub lng: f64,
    pub size: f64,
    pub altitude: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub lat: f64,
    pub lng: f64,
    pub text: String,
    pub color: Color,
    pub size: f64,
}

/// Imagery and atmosphere settings that follow day/night at the focus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneStyle {
    pub globe_image_url: &'static str,
    pub bump_image_url: &'static str,
    pub background_image_url: &'static str,
    pub atmosphere_color: &'static str,
    pub atmosphere_altitude: f64,
}

impl SceneStyle {
    pub fn for_daylight(is_daytime: bool) -> Self {
        let (globe_image_url, atmosphere_color) = if is_daytime {
            ("//unpkg.com/three-globe/example/img/earth-blue-marble.jpg", "rgba(100,150,255,0.4)")
        } else {
            ("//unpkg.com/three-globe/example/img/earth-night.jpg", "rgba(0,0,50,0.3)")
        };

        Self {
            globe_image_url,
            bump_image_url: "//unpkg.com/three-globe/example/img/earth-topology.png",
            background_image_url: "//unpkg.com/three-globe/example/img/night-sky.png",
            atmosphere_color,
            atmosphere_altitude: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobeAnnotations {
    pub focus_point: Option<FocusPoint>,
    pub arcs: Vec<ArcPath>,
    pub particles: Vec<Particle>,
    pub label: Option<Label>,
    pub scene: SceneStyle,
}

impl GlobeAnnotations {
    pub fn empty(is_daytime: bool) -> Self {
        Self {
            focus_point: None,
            arcs: Vec::new(),
            particles: Vec::new(),
            label: None,
            scene: SceneStyle::for_daylight(is_daytime),
        }
    }

    /// Whether this frame was derived from exactly these inputs.
    ///
    /// Arcs and particles are random, so only the deterministic parts are compared.
    pub fn depicts(&self, geo: Option<&GeoResult>, weather: Option<&CurrentWeather>, is_daytime: bool) -> bool {
        if self.scene != SceneStyle::for_daylight(is_daytime) {
            return false;
        }

        let focus_matches = match (&self.focus_point, geo) {
            (None, None) => true,
            (Some(focus), Some(geo)) => focus.lat == geo.latitude && focus.lng == geo.longitude,
            _ => false,
        };

        let label_matches = match (&self.label, geo.zip(weather)) {
            (None, None) => true,
            (Some(label), Some((geo, weather))) => label.text == label_text(geo, weather),
            _ => false,
        };

        focus_matches && label_matches
    }
}

/// Build the full annotation set for the current result.
///
/// Without a coordinate there is nothing to annotate. Particles and the label
/// additionally need the weather; arcs only need the coordinate.
pub fn derive_annotations<R: Rng>(
    geo: Option<&GeoResult>,
    weather: Option<&CurrentWeather>,
    is_daytime: bool,
    rng: &mut R,
) -> GlobeAnnotations {
    let mut annotations = GlobeAnnotations::empty(is_daytime);
    let Some(geo) = geo else {
        return annotations;
    };
    let (lat, lng) = (geo.latitude, geo.longitude);

    annotations.focus_point = Some(FocusPoint { lat, lng, size: FOCUS_POINT_SIZE, color: Color::ORANGE });

    let arc_color = weather.map_or(Color::GOLD, |w| w.code.condition().color);
    annotations.arcs = (0..ARC_COUNT)
        .map(|_| ArcPath {
            start_lat: rng.gen_range(-90.0..=90.0),
            start_lng: rng.gen_range(-180.0..=180.0),
            end_lat: lat,
            end_lng: lng,
            colors: [arc_color, Color::WHITE],
        })
        .collect();

    if let Some(weather) = weather {
        let condition = weather.code.condition();

        annotations.particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                lat: lat + rng.gen_range(-PARTICLE_JITTER_DEG..=PARTICLE_JITTER_DEG),
                lng: lng + rng.gen_range(-PARTICLE_JITTER_DEG..=PARTICLE_JITTER_DEG),
                size: rng.gen_range(0.4..=1.0),
                altitude: rng.gen_range(0.05..=0.25),
                color: condition.particle_color,
            })
            .collect();

        annotations.label = Some(Label {
            lat,
            lng,
            text: label_text(geo, weather),
            color: Color::GOLD,
            size: LABEL_SIZE,
        });
    }

    annotations
}

pub fn label_text(geo: &GeoResult, weather: &CurrentWeather) -> String {
    let condition = weather.code.condition();
    format!(
        "{} {}\n{}, {}\n🌡 {}°C | 💨 {} km/h",
        condition.icon, condition.label, geo.display_name, geo.country, weather.temperature_c, weather.wind_kph,
    )
}

/// Wrap a longitude into `[-180, 180)`.
pub fn normalize_longitude(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}
