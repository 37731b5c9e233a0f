//! Application error types using thiserror
//!
//! Error hierarchy:
//! - VersionError: Malformed version strings
//! - ParseError: Requirement strings the grammar cannot read
//! - UpdateError: Fatal updater conditions (unknown operator, conflicting sources)
//! - ManifestError: Issues reading or patching manifest files
//! - ConfigError: Issues with the request file or CLI configuration

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Ecosystem;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Updater errors
    #[error(transparent)]
    Update(#[from] UpdateError),

    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised when a version string is malformed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Not a version under the shared rules
    #[error("invalid version '{input}'")]
    InvalidVersion { input: String },

    /// Not a legal version for the ecosystem
    #[error("invalid {ecosystem} version '{input}': {message}")]
    InvalidForEcosystem {
        input: String,
        ecosystem: Ecosystem,
        message: String,
    },
}

/// Errors raised by the requirement grammar parser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blank requirement
    #[error("empty requirement")]
    Empty,

    /// An operator, hyphen or alias keyword was not followed by a version
    #[error("expected a version at offset {offset} in '{input}'")]
    ExpectedVersion { input: String, offset: usize },

    /// A token that cannot appear at this position
    #[error("unexpected '{token}' at offset {offset} in '{input}'")]
    UnexpectedToken {
        input: String,
        token: String,
        offset: usize,
    },

    /// A separator the ecosystem's grammar does not allow
    #[error("'{separator}' is not a valid separator for {ecosystem} in '{input}'")]
    UnsupportedSeparator {
        input: String,
        separator: String,
        ecosystem: Ecosystem,
    },
}

/// Fatal updater errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// A constraint the target violates uses an operator with no bump rule
    #[error("unexpected operator '{operator}' in requirement '{requirement}'")]
    UnknownOperator {
        operator: String,
        requirement: String,
    },

    /// Requirements of one dependency disagree on where it comes from
    #[error("multiple incompatible sources: {}", .sources.join(", "))]
    MultipleIncompatibleSources { sources: Vec<String> },

    /// The target version is not valid for the ecosystem
    #[error(transparent)]
    InvalidTarget(#[from] VersionError),

    /// No updater is registered for the ecosystem
    #[error("no requirement updater registered for {ecosystem}")]
    UnsupportedEcosystem { ecosystem: Ecosystem },
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error (package.json, composer.json)
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// TOML parsing error (Cargo.toml)
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// The dependency's current requirement is not in the file
    #[error("requirement '{requirement}' for '{package}' not found in {path}")]
    RequirementNotFound {
        path: PathBuf,
        package: String,
        requirement: String,
    },

    /// No patcher handles this file
    #[error("unsupported manifest format: {path}")]
    UnsupportedFormat { path: PathBuf },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Request file could not be read
    #[error("failed to read request file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Request file content is malformed
    #[error("invalid request file {path}: {message}")]
    InvalidRequest { path: PathBuf, message: String },

    /// Request file extension is neither JSON nor TOML
    #[error("unsupported request file format '{path}': expected .json or .toml")]
    UnsupportedFormat { path: PathBuf },

    /// A dependency has no ecosystem and the request sets no default
    #[error("dependency '{name}' has no ecosystem")]
    MissingEcosystem { name: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

impl VersionError {
    /// Creates a new InvalidVersion error
    pub fn invalid(input: impl Into<String>) -> Self {
        VersionError::InvalidVersion {
            input: input.into(),
        }
    }

    /// Creates a new InvalidForEcosystem error
    pub fn invalid_for(
        input: impl Into<String>,
        ecosystem: Ecosystem,
        message: impl Into<String>,
    ) -> Self {
        VersionError::InvalidForEcosystem {
            input: input.into(),
            ecosystem,
            message: message.into(),
        }
    }
}

impl UpdateError {
    /// Creates a new UnknownOperator error
    pub fn unknown_operator(operator: impl Into<String>, requirement: impl Into<String>) -> Self {
        UpdateError::UnknownOperator {
            operator: operator.into(),
            requirement: requirement.into(),
        }
    }
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new RequirementNotFound error
    pub fn requirement_not_found(
        path: impl Into<PathBuf>,
        package: impl Into<String>,
        requirement: impl Into<String>,
    ) -> Self {
        ManifestError::RequirementNotFound {
            path: path.into(),
            package: package.into(),
            requirement: requirement.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new InvalidRequest error
    pub fn invalid_request(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::InvalidRequest {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_error_messages() {
        let err = VersionError::invalid("abc");
        assert_eq!(err.to_string(), "invalid version 'abc'");

        let err = VersionError::invalid_for("1.2", Ecosystem::Cargo, "unexpected end of input");
        let msg = err.to_string();
        assert!(msg.contains("Cargo"));
        assert!(msg.contains("unexpected end of input"));
    }

    #[test]
    fn test_parse_error_messages() {
        let err = ParseError::ExpectedVersion {
            input: ">=".to_string(),
            offset: 2,
        };
        assert_eq!(err.to_string(), "expected a version at offset 2 in '>='");

        let err = ParseError::UnsupportedSeparator {
            input: "1.0 || 2.0".to_string(),
            separator: "||".to_string(),
            ecosystem: Ecosystem::Cargo,
        };
        assert!(err.to_string().contains("not a valid separator for Cargo"));
    }

    #[test]
    fn test_update_error_unknown_operator() {
        let err = UpdateError::unknown_operator(">", ">3.0.0");
        assert_eq!(
            err.to_string(),
            "unexpected operator '>' in requirement '>3.0.0'"
        );
    }

    #[test]
    fn test_update_error_multiple_sources() {
        let err = UpdateError::MultipleIncompatibleSources {
            sources: vec!["git a".to_string(), "git b".to_string()],
        };
        assert_eq!(err.to_string(), "multiple incompatible sources: git a, git b");
    }

    #[test]
    fn test_update_error_from_version_error() {
        let err: UpdateError = VersionError::invalid("x").into();
        assert!(matches!(err, UpdateError::InvalidTarget(_)));
    }

    #[test]
    fn test_manifest_error_requirement_not_found() {
        let err = ManifestError::requirement_not_found("package.json", "lodash", "^1.0.0");
        let msg = err.to_string();
        assert!(msg.contains("'^1.0.0'"));
        assert!(msg.contains("lodash"));
        assert!(msg.contains("package.json"));
    }

    #[test]
    fn test_config_error_invalid_request() {
        let err = ConfigError::invalid_request("deps.json", "missing field `name`");
        assert!(err.to_string().contains("missing field `name`"));
    }

    #[test]
    fn test_app_error_from_update_error() {
        let app_err: AppError = UpdateError::unknown_operator("!", "!1").into();
        assert!(app_err.to_string().contains("unexpected operator"));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::MissingEcosystem {
            name: "x".to_string(),
        }
        .into();
        assert_eq!(app_err.to_string(), "dependency 'x' has no ecosystem");
    }
}
