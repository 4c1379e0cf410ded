//! Runtime side of the globe: readiness gate, camera moves and idle rotation.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::{JoinError, JoinHandle},
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    CurrentWeather, GeoResult,
    config::GlobeConfig,
    globe::{CameraView, GlobeAnnotations, camera_target, derive_annotations, normalize_longitude},
    session::SessionState,
};

/// Capability interface of the 3D globe renderer.
///
/// Implementations own all drawing; they receive declarative annotation sets
/// and camera commands.
pub trait GlobeRenderer: Send + Sync {
    fn point_of_view(&self) -> CameraView;

    /// Move the camera; a zero `transition` jumps immediately.
    fn fly_to(&self, view: CameraView, transition: Duration);

    /// Replace everything currently drawn with `annotations`.
    fn show(&self, annotations: &GlobeAnnotations);
}

pub struct GlobeDriver {
    renderer: Arc<dyn GlobeRenderer>,
    settings: GlobeConfig,
}

/// Owns the running driver. Dropping it stops every timer the driver started.
#[derive(Debug)]
pub struct GlobeHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl GlobeHandle {
    /// Stop the driver and wait for its task to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        log_join_error("globe driver", (&mut self.task).await);
    }
}

impl Drop for GlobeHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Inputs the annotations are derived from; a change in any of them redraws.
type DerivedFrom = (Option<GeoResult>, Option<CurrentWeather>, bool);

impl GlobeDriver {
    pub fn new(renderer: Arc<dyn GlobeRenderer>, settings: GlobeConfig) -> Self {
        Self { renderer, settings }
    }

    /// Start following `states` on the current tokio runtime.
    pub fn spawn(self, states: watch::Receiver<SessionState>) -> GlobeHandle {
        let token = CancellationToken::new();
        let task = tokio::spawn(self.run(states, token.child_token()));
        GlobeHandle { token, task }
    }

    async fn run(self, mut states: watch::Receiver<SessionState>, token: CancellationToken) {
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = time::sleep(self.settings.ready_delay()) => {}
        }
        tracing::debug!("globe ready");

        let mut drawn: Option<DerivedFrom> = None;
        let mut rotation: Option<IdleRotation> = None;

        loop {
            let state = states.borrow_and_update().clone();
            self.apply(&state, &mut drawn, &mut rotation, &token).await;

            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                changed = states.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("globe driver stopped");
    }

    async fn apply(
        &self,
        state: &SessionState,
        drawn: &mut Option<DerivedFrom>,
        rotation: &mut Option<IdleRotation>,
        token: &CancellationToken,
    ) {
        // Rotation writes the camera too; it must be fully stopped before a focus move.
        let idle = state.geo.is_none() && !state.is_loading();
        if !idle {
            if let Some(spinning) = rotation.take() {
                spinning.stop().await;
            }
        }

        let inputs = (state.geo.clone(), state.weather.clone(), state.is_daytime);
        if drawn.as_ref() != Some(&inputs) {
            let (geo, weather, is_daytime) = &inputs;
            let annotations =
                derive_annotations(geo.as_ref(), weather.as_ref(), *is_daytime, &mut rand::thread_rng());
            let camera = camera_target(geo.as_ref());

            tracing::debug!(
                focused = geo.is_some(),
                arcs = annotations.arcs.len(),
                particles = annotations.particles.len(),
                "redrawing globe"
            );
            self.renderer.fly_to(camera.view, camera.transition);
            self.renderer.show(&annotations);
            *drawn = Some(inputs);
        }

        if idle && rotation.is_none() {
            *rotation = Some(IdleRotation::start(
                Arc::clone(&self.renderer),
                &self.settings,
                token.child_token(),
            ));
        }
    }
}

/// Spins the globe while nothing is focused. Stops when dropped.
struct IdleRotation {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl IdleRotation {
    fn start(renderer: Arc<dyn GlobeRenderer>, settings: &GlobeConfig, token: CancellationToken) -> Self {
        let step = settings.rotation_step_deg;
        let mut ticker = time::interval(settings.tick());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let cancelled = token.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        let view = renderer.point_of_view();
                        let next = CameraView { lng: normalize_longitude(view.lng + step), ..view };
                        renderer.fly_to(next, Duration::ZERO);
                    }
                }
            }
        });

        tracing::trace!("idle rotation started");
        Self { token, task }
    }

    /// Cancel and wait until the last tick has finished touching the renderer.
    async fn stop(mut self) {
        self.token.cancel();
        log_join_error("idle rotation", (&mut self.task).await);
    }
}

impl Drop for IdleRotation {
    fn drop(&mut self) {
        self.token.cancel();
        self.task.abort();
        tracing::trace!("idle rotation stopped");
    }
}

fn log_join_error(task: &str, joined: Result<(), JoinError>) {
    if let Err(err) = joined {
        if err.is_panic() {
            tracing::warn!(task, "task panicked: {err}");
        }
    }
}
