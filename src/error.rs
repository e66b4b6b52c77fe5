//! Error types and handling for the `tripcast` application

use thiserror::Error;

/// Classified failure of a single HTTP request.
///
/// Every variant except [`FetchError::Fatal`] is recoverable: it stands for
/// "no data" and the caller decides whether its flow can continue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("Could not decode the text into json: {0}")]
    Decode(String),

    #[error("A connection error occurred: {0}")]
    Connection(String),

    #[error("The URL provided was somehow invalid: {0}")]
    InvalidUrl(String),

    /// The API answered with an error status and an explanation body
    #[error("API returned status {status}: {reason}")]
    Api { status: u16, reason: String },

    #[error("Unrecoverable request failure: {0}")]
    Fatal(String),
}

impl FetchError {
    /// Whether this failure is the "no result" sentinel rather than a fatal error
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FetchError::Fatal(_))
    }
}

/// Main error type for the `tripcast` application
#[derive(Error, Debug)]
pub enum TripcastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Geocoding returned no candidates
    #[error("Localization did not find - please check City and Street ({city}, {street})")]
    LocationNotFound { city: String, street: String },

    /// HTTP request failures, already classified and logged by the client
    #[error("Request failed: {0}")]
    Fetch(#[from] FetchError),

    /// A response parsed fine but lacks the fields a flow needs
    #[error("Missing data in response: {message}")]
    MissingData { message: String },

    /// Date arithmetic produced an impossible calendar date
    #[error("Invalid calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// Trip input table could not be read
    #[error("{message}")]
    TripInput { message: String },

    /// Chart or map rendering errors
    #[error("Render error: {message}")]
    Render { message: String },

    /// Interactive prompt errors
    #[error("Prompt error: {message}")]
    Prompt { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TripcastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn missing_data<S: Into<String>>(message: S) -> Self {
        Self::MissingData {
            message: message.into(),
        }
    }

    pub fn trip_input<S: Into<String>>(message: S) -> Self {
        Self::TripInput {
            message: message.into(),
        }
    }

    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    pub fn prompt<S: Into<String>>(message: S) -> Self {
        Self::Prompt {
            message: message.into(),
        }
    }

    /// True when the failure was logged where it happened, so the binary
    /// must not log it a second time before exiting.
    #[must_use]
    pub fn already_reported(&self) -> bool {
        matches!(self, TripcastError::Fetch(_) | TripcastError::TripInput { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripcastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            TripcastError::Validation { message } => format!("Error: {message}"),
            TripcastError::LocationNotFound { .. } => {
                "Localization did not find - please Check City and Street".to_string()
            }
            TripcastError::Fetch(FetchError::Fatal(_)) => {
                "Fatal error: App will be closed".to_string()
            }
            TripcastError::Fetch(_) => {
                "Unable to get data from the weather service. Please check your internet connection."
                    .to_string()
            }
            TripcastError::MissingData { message } => {
                format!("Error: incomplete weather data ({message})")
            }
            TripcastError::InvalidDate { .. } => format!("Error: {self}"),
            TripcastError::TripInput { message } => message.clone(),
            TripcastError::Render { .. } => {
                "Could not render the output. Please check the output path.".to_string()
            }
            TripcastError::Prompt { message } => format!("Error: {message}"),
            TripcastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
