//! Projection of [`SessionState`] onto what the screen shows.

use chrono::NaiveDate;

use crate::session::SessionState;

pub const SEARCH_PLACEHOLDER: &str = "Search city...";
pub const SEARCH_LABEL: &str = "Search";
pub const BUSY_LABEL: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchControl {
    pub placeholder: &'static str,
    pub button_label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    /// "City, Country".
    pub place: String,
    /// Today's date, e.g. "Monday, October 19".
    pub date: String,
    pub temperature: String,
    pub wind: String,
    pub icon: &'static str,
    pub condition: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdlePrompt {
    pub title: &'static str,
    pub body: &'static str,
}

const IDLE_PROMPT: IdlePrompt = IdlePrompt {
    title: "Discover Global Weather 🌍",
    body: "Enter a city name above to see its live weather on the globe",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub search: SearchControl,
    pub error_banner: Option<String>,
    pub card: Option<ResultCard>,
    pub idle_prompt: Option<IdlePrompt>,
}

impl ViewModel {
    pub fn project(state: &SessionState, today: NaiveDate) -> Self {
        let loading = state.is_loading();

        let search = SearchControl {
            placeholder: SEARCH_PLACEHOLDER,
            button_label: if loading { BUSY_LABEL } else { SEARCH_LABEL },
            enabled: !loading,
        };

        let error_banner = state.error_message.clone().filter(|msg| !msg.is_empty());

        let card = state.weather.as_ref().map(|weather| {
            let condition = weather.code.condition();
            let (city, country) = state
                .geo
                .as_ref()
                .map(|geo| (geo.display_name.as_str(), geo.country.as_str()))
                .unwrap_or_default();

            ResultCard {
                place: format!("{city}, {country}"),
                date: today.format("%A, %B %-d").to_string(),
                temperature: format!("{}°C", weather.temperature_c),
                wind: format!("💨 {} km/h", weather.wind_kph),
                icon: condition.icon,
                condition: condition.label,
            }
        });

        let idle_prompt = (!state.has_searched_once && !loading).then_some(IDLE_PROMPT);

        Self { search, error_banner, card, idle_prompt }
    }
}
