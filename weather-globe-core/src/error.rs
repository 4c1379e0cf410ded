use thiserror::Error;

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a city name";
pub const NOT_FOUND_MESSAGE: &str = "City not found. Try again!";
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Why a city search did not produce a weather result.
///
/// Every variant ends the current attempt; the user has to search again.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The query was empty or whitespace only. Nothing was sent over the network.
    #[error("query is empty")]
    Validation,

    /// The geocoding service had no match for the query.
    #[error("no location matches '{0}'")]
    NotFound(String),

    /// Transport, status or parsing failure from either service.
    #[error(transparent)]
    Transient(#[from] anyhow::Error),
}

impl LookupError {
    /// Message shown in the error banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::Validation => EMPTY_QUERY_MESSAGE,
            LookupError::NotFound(_) => NOT_FOUND_MESSAGE,
            LookupError::Transient(_) => GENERIC_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_match_taxonomy() {
        assert_eq!(LookupError::Validation.user_message(), "Please enter a city name");
        assert_eq!(
            LookupError::NotFound("Zzzxyz123".into()).user_message(),
            "City not found. Try again!"
        );
        let transient = LookupError::from(anyhow::anyhow!("connection reset"));
        assert_eq!(transient.user_message(), "Something went wrong. Please try again.");
    }

    #[test]
    fn transient_keeps_underlying_cause() {
        let err = LookupError::from(anyhow::anyhow!("status 502"));
        assert!(err.to_string().contains("status 502"));
    }
}
