// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Error Types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FusionRateError {
    #[error("Could not resolve reaction '{name}'. Known reactions: {}", .known.join(", "))]
    UnresolvedReaction { name: String, known: Vec<String> },

    #[error("Reaction '{name}' is ambiguous; it matches: {}", .candidates.join(", "))]
    AmbiguousReaction {
        name: String,
        candidates: Vec<String>,
    },

    #[error("Unknown particle '{name}'. Valid particles: {}", .valid.join(", "))]
    UnknownParticle { name: String, valid: Vec<String> },

    #[error("Reaction '{0}' contains more than one reactant/product separator")]
    MultipleSeparators(String),

    #[error("'{description}' must contain {expected} particles, found {found}")]
    ParticleCount {
        description: String,
        expected: String,
        found: usize,
    },

    #[error("{} issue(s) in request:\n  {}", .0.len(), .0.join("\n  "))]
    InvalidRequest(Vec<String>),

    #[error("Scheme '{scheme}' is not available for {reaction}. Available: {}", .available.join(", "))]
    SchemeUnavailable {
        reaction: String,
        scheme: String,
        available: Vec<String>,
    },

    #[error("No analytic fit is available for {0}")]
    NoAnalyticFit(String),

    #[error("Derivatives are not available from {0}")]
    DerivativesUnavailable(String),

    #[error("Data file not found: {0}")]
    DataNotFound(String),

    #[error("Malformed data in {path}: {message}")]
    MalformedData { path: String, message: String },

    #[error("Rate coefficient table error: {0}")]
    Table(String),

    #[error("Integration at {point} reached relative error {relative_error:e}, above the limit {limit:e}")]
    IntegrationNotConverged {
        point: String,
        relative_error: f64,
        limit: f64,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Linear algebra error: {0}")]
    LinAlg(String),

    #[error("Root finding failed: {0}")]
    RootNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FusionRateResult<T> = Result<T, FusionRateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_lists_every_issue() {
        let err = FusionRateError::InvalidRequest(vec![
            "first problem".to_string(),
            "second problem".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 issue(s)"), "{msg}");
        assert!(msg.contains("first problem") && msg.contains("second problem"));
    }

    #[test]
    fn test_scheme_unavailable_lists_alternatives() {
        let err = FusionRateError::SchemeUnavailable {
            reaction: "D(d,p)T".to_string(),
            scheme: "interpolation".to_string(),
            available: vec!["analytic".to_string(), "integration".to_string()],
        };
        assert!(err.to_string().contains("analytic, integration"));
    }

    #[test]
    fn test_io_error_converts() {
        fn open_missing() -> FusionRateResult<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.csv")?)
        }
        assert!(matches!(open_missing(), Err(FusionRateError::Io(_))));
    }
}
