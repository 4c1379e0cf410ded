use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{CustomType, InquireError, Text};
use weather_globe_core::{
    Config, Orchestrator, ViewModel,
    globe::{GlobeDriver, GlobeHandle},
    provider::provider_from_config,
    view::SEARCH_PLACEHOLDER,
};

use crate::render::{self, TextGlobe};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-globe", version, about = "Live weather for any city, on a globe")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the geocoding and forecast endpoints.
    Configure,

    /// Show the current weather for a city.
    Show {
        /// City name.
        city: String,

        /// Also describe what the globe would draw.
        #[arg(long)]
        globe: bool,
    },

    /// Search repeatedly from a prompt; Esc or Ctrl-C quits.
    Interactive {
        #[arg(long)]
        globe: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match self.command {
            Command::Configure => {
                configure(config, self.config).await?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, globe } => {
                let app = App::start(&config, globe)?;
                let applied = app.search(&city).await;
                app.stop().await;
                Ok(if applied { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
            Command::Interactive { globe } => {
                let app = App::start(&config, globe)?;
                render::print_view(&ViewModel::project(&app.orchestrator.snapshot(), today()));

                while let Some(query) = prompt_city().await? {
                    app.search(&query).await;
                }
                app.stop().await;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Orchestrator plus, optionally, a globe driver feeding the text renderer.
struct App {
    orchestrator: Orchestrator,
    globe: Option<(Arc<TextGlobe>, GlobeHandle)>,
    frame_wait: Duration,
}

impl App {
    fn start(config: &Config, with_globe: bool) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        let orchestrator = Orchestrator::new(Arc::from(provider));

        let globe = with_globe.then(|| {
            let renderer = Arc::new(TextGlobe::new());
            let handle = GlobeDriver::new(renderer.clone(), config.globe.clone())
                .spawn(orchestrator.subscribe());
            (renderer, handle)
        });

        Ok(Self {
            orchestrator,
            globe,
            frame_wait: config.globe.ready_delay() + Duration::from_secs(1),
        })
    }

    /// Run one search and print the outcome. Returns whether it produced a result.
    async fn search(&self, query: &str) -> bool {
        let result = self.orchestrator.search(query).await;
        let state = self.orchestrator.snapshot();
        render::print_view(&ViewModel::project(&state, today()));

        if let Some((renderer, _)) = &self.globe {
            match renderer.frame_for(&state, self.frame_wait).await {
                Some(frame) => render::print_globe(&frame, renderer.view()),
                None => tracing::warn!("globe did not redraw in time"),
            }
        }

        result.is_ok()
    }

    async fn stop(self) {
        if let Some((_, handle)) = self.globe {
            handle.shutdown().await;
        }
    }
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}

/// Read the next city from the terminal; `None` once the user quits.
async fn prompt_city() -> anyhow::Result<Option<String>> {
    let answer = tokio::task::spawn_blocking(|| {
        Text::new("City:").with_placeholder(SEARCH_PLACEHOLDER).prompt()
    })
    .await
    .context("Prompt task failed")?;

    match answer {
        Ok(query) => Ok(Some(query)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read city name"),
    }
}

async fn configure(current: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    let updated = tokio::task::spawn_blocking(move || -> anyhow::Result<Config> {
        let geocoding_url = Text::new("Geocoding endpoint:")
            .with_default(&current.geocoding_url)
            .prompt()?;
        let forecast_url = Text::new("Forecast endpoint:")
            .with_default(&current.forecast_url)
            .prompt()?;
        let request_timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
            .with_default(current.request_timeout_secs)
            .with_error_message("Please enter a whole number of seconds")
            .prompt()?;

        Ok(Config { geocoding_url, forecast_url, request_timeout_secs, ..current })
    })
    .await
    .context("Prompt task failed")??;

    let saved_to = match path {
        Some(path) => {
            updated.save_to(&path)?;
            path
        }
        None => updated.save()?,
    };

    println!("Saved configuration to {}", saved_to.display());
    Ok(())
}
