use console::style;
use ground_core::{DecodeError, GroundError};
use std::fmt;

/// Error with suggestions for the user
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), context: None, suggestions: Vec::new() }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Explain a geometry decode failure
pub fn decode_failed(source: &str, error: &DecodeError) -> CliError {
    let err = CliError::new(format!("Cannot read {} geometry", source)).with_context(error.to_string());

    match error {
        DecodeError::InvalidIndexSequence { .. } | DecodeError::NonNumericIndex { .. } => err
            .with_suggestion("Index keys must be \"0\", \"1\", \"2\", ... with no gaps")
            .with_suggestion("Check that no ring or polygon entry was deleted by hand"),
        DecodeError::MissingType | DecodeError::InvalidType { .. } | DecodeError::UnknownType(_) => {
            err.with_suggestion("Set \"type\" to one of: Point, Polygon, MultiPolygon")
        }
        DecodeError::Protobuf(_) | DecodeError::GeometryNotSet => {
            err.with_suggestion("Make sure the input holds a serialized Geometry message")
        }
        _ => err,
    }
}

/// Explain why no project could be activated for the session
pub fn project_unavailable(user_email: &str, error: &GroundError) -> CliError {
    let err = CliError::new("Cannot open a project for drawing").with_context(error.to_string());

    match error {
        GroundError::ProjectIndexOutOfRange { available: 0, .. } => err
            .with_suggestion(format!("Add {} to the members of a project in the script", user_email))
            .with_suggestion("Or leave a project's members empty to grant it to the configured user"),
        GroundError::ProjectIndexOutOfRange { available, .. } => err.with_suggestion(format!(
            "Set active_project to a value below {}; indexes count only projects {} can open",
            available, user_email
        )),
        _ => err,
    }
}
