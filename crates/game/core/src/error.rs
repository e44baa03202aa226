use thiserror::Error;

/// Failure to parse a named identifier from configuration text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    #[error("unknown skill `{0}`")]
    UnknownSkill(String),
}

/// Semantic problems in an otherwise well-formed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("character name must not be empty")]
    EmptyCharacterName,

    #[error("no runs configured")]
    NoRuns,

    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },

    #[error("{field} is {value}, expected a percentage up to 100")]
    PercentOutOfRange { field: &'static str, value: u8 },
}
