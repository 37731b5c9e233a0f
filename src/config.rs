//! Request file loading
//!
//! A request lists the dependencies to update together with their target
//! versions. It is read from JSON or TOML, chosen by file extension:
//!
//! ```toml
//! ecosystem = "npm"
//! library = false
//!
//! [[dependencies]]
//! name = "lodash"
//! latest_resolvable_version = "4.17.21"
//! requirements = [{ requirement = "^3.10.0", file = "package.json" }]
//! ```
//!
//! Per-dependency `ecosystem` and `library` override the top-level values.

use crate::domain::{Dependency, Ecosystem, GitRefContext, Requirement, UpdateTarget, Version};
use crate::error::ConfigError;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Request file encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFormat {
    /// `.json`
    Json,
    /// `.toml`
    Toml,
}

impl RequestFormat {
    /// Picks the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(RequestFormat::Json),
            Some("toml") => Ok(RequestFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A loaded update request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Where the request was read from
    pub path: PathBuf,
    /// Dependencies in file order
    pub dependencies: Vec<Dependency>,
}

impl UpdateRequest {
    /// Overrides the library flag of every dependency
    pub fn with_library(mut self, library: bool) -> Self {
        for dependency in &mut self.dependencies {
            dependency.library = library;
        }
        self
    }

    /// Number of dependencies in the request
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Returns true if the request lists no dependencies
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRequest {
    #[serde(default)]
    ecosystem: Option<String>,
    #[serde(default)]
    library: bool,
    #[serde(default)]
    dependencies: Vec<RawDependency>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDependency {
    name: String,
    #[serde(default)]
    ecosystem: Option<String>,
    #[serde(default)]
    library: Option<bool>,
    #[serde(default)]
    requirements: Vec<Requirement>,
    #[serde(default)]
    latest_version: Option<String>,
    #[serde(default)]
    latest_resolvable_version: Option<String>,
    #[serde(default)]
    git: Option<GitRefContext>,
}

/// Loads a request file
pub fn load_request(path: &Path) -> Result<UpdateRequest, ConfigError> {
    let format = RequestFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_request(&content, format, path)
}

/// Parses request text; `path` is only used in error messages
pub fn parse_request(
    content: &str,
    format: RequestFormat,
    path: &Path,
) -> Result<UpdateRequest, ConfigError> {
    let raw: RawRequest = match format {
        RequestFormat::Json => serde_json::from_str(content)
            .map_err(|e| ConfigError::invalid_request(path, e.to_string()))?,
        RequestFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::invalid_request(path, e.to_string()))?
        }
    };

    let default_ecosystem = raw
        .ecosystem
        .as_deref()
        .map(|e| parse_ecosystem(e, path))
        .transpose()?;

    let dependencies = raw
        .dependencies
        .into_iter()
        .map(|dep| build_dependency(dep, default_ecosystem, raw.library, path))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Loaded {} dependencies from {}",
        dependencies.len(),
        path.display()
    );

    Ok(UpdateRequest {
        path: path.to_path_buf(),
        dependencies,
    })
}

fn parse_ecosystem(name: &str, path: &Path) -> Result<Ecosystem, ConfigError> {
    name.parse::<Ecosystem>()
        .map_err(|message| ConfigError::invalid_request(path, message))
}

fn parse_version(
    text: Option<&str>,
    dependency: &str,
    path: &Path,
) -> Result<Option<Version>, ConfigError> {
    text.map(|t| {
        Version::parse(t).map_err(|e| {
            ConfigError::invalid_request(path, format!("dependency '{}': {}", dependency, e))
        })
    })
    .transpose()
}

fn build_dependency(
    raw: RawDependency,
    default_ecosystem: Option<Ecosystem>,
    default_library: bool,
    path: &Path,
) -> Result<Dependency, ConfigError> {
    let ecosystem = match raw.ecosystem.as_deref() {
        Some(name) => parse_ecosystem(name, path)?,
        None => default_ecosystem.ok_or_else(|| ConfigError::MissingEcosystem {
            name: raw.name.clone(),
        })?,
    };

    let target = UpdateTarget {
        latest_version: parse_version(raw.latest_version.as_deref(), &raw.name, path)?,
        latest_resolvable_version: parse_version(
            raw.latest_resolvable_version.as_deref(),
            &raw.name,
            path,
        )?,
    };

    let mut dependency = Dependency::new(raw.name, ecosystem, raw.requirements, target)
        .as_library(raw.library.unwrap_or(default_library));
    if let Some(git) = raw.git {
        dependency = dependency.with_git(git);
    }
    Ok(dependency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse_json(content: &str) -> Result<UpdateRequest, ConfigError> {
        parse_request(content, RequestFormat::Json, Path::new("request.json"))
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            RequestFormat::from_path(Path::new("deps.json")).unwrap(),
            RequestFormat::Json
        );
        assert_eq!(
            RequestFormat::from_path(Path::new("deps.TOML")).unwrap(),
            RequestFormat::Toml
        );
        assert!(matches!(
            RequestFormat::from_path(Path::new("deps.yaml")),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_parse_json_request() {
        let request = parse_json(
            r#"{
                "ecosystem": "npm",
                "dependencies": [{
                    "name": "lodash",
                    "latest_version": "4.17.21",
                    "latest_resolvable_version": "4.17.21",
                    "requirements": [
                        {"requirement": "^3.10.0", "file": "package.json", "groups": ["dependencies"]}
                    ]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(request.len(), 1);
        let dep = &request.dependencies[0];
        assert_eq!(dep.name, "lodash");
        assert_eq!(dep.ecosystem, Ecosystem::Npm);
        assert!(!dep.library);
        assert_eq!(
            dep.target.latest_resolvable_version,
            Some(Version::parse("4.17.21").unwrap())
        );
        assert_eq!(dep.requirements[0].groups, vec!["dependencies".to_string()]);
    }

    #[test]
    fn test_parse_toml_request_with_overrides() {
        let content = r#"
            ecosystem = "composer"
            library = true

            [[dependencies]]
            name = "monolog/monolog"
            latest_resolvable_version = "2.0.0"
            requirements = [{ requirement = "^1.0", file = "composer.json" }]

            [[dependencies]]
            name = "serde"
            ecosystem = "cargo"
            library = false
            latest_resolvable_version = "1.0.200"
            requirements = [{ requirement = "1.0", file = "Cargo.toml" }]
        "#;
        let request =
            parse_request(content, RequestFormat::Toml, Path::new("request.toml")).unwrap();

        assert_eq!(request.dependencies[0].ecosystem, Ecosystem::Composer);
        assert!(request.dependencies[0].library);
        assert_eq!(request.dependencies[1].ecosystem, Ecosystem::Cargo);
        assert!(!request.dependencies[1].library);
    }

    #[test]
    fn test_git_context_and_source() {
        let request = parse_json(
            r#"{
                "ecosystem": "yarn",
                "dependencies": [{
                    "name": "is-number",
                    "latest_resolvable_version": "4.0.0",
                    "git": {"registry_release": true},
                    "requirements": [{
                        "requirement": null,
                        "file": "package.json",
                        "source": {"type": "git", "url": "https://github.com/jonschlinkert/is-number", "ref": "master"}
                    }]
                }]
            }"#,
        )
        .unwrap();

        let dep = &request.dependencies[0];
        assert_eq!(dep.ecosystem, Ecosystem::Npm);
        assert_eq!(
            dep.git,
            Some(GitRefContext {
                latest_tag: None,
                registry_release: true
            })
        );
        let source = dep.requirements[0].source.as_ref().unwrap();
        assert_eq!(source.kind, SourceKind::Git);
        assert_eq!(source.reference.as_deref(), Some("master"));
    }

    #[test]
    fn test_missing_ecosystem() {
        let result = parse_json(r#"{"dependencies": [{"name": "left-pad", "requirements": []}]}"#);
        assert!(matches!(
            result,
            Err(ConfigError::MissingEcosystem { ref name }) if name == "left-pad"
        ));
    }

    #[test]
    fn test_unknown_ecosystem() {
        let result = parse_json(r#"{"ecosystem": "cobol", "dependencies": []}"#);
        assert!(matches!(result, Err(ConfigError::InvalidRequest { .. })));
    }

    #[test]
    fn test_invalid_version() {
        let result = parse_json(
            r#"{"ecosystem": "npm", "dependencies": [
                {"name": "x", "latest_resolvable_version": "latest", "requirements": []}
            ]}"#,
        );
        match result {
            Err(ConfigError::InvalidRequest { message, .. }) => {
                assert!(message.contains("dependency 'x'"));
            }
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = parse_json(r#"{"ecosystem": "npm", "dependencies": [], "extra": 1}"#);
        assert!(matches!(result, Err(ConfigError::InvalidRequest { .. })));
    }

    #[test]
    fn test_with_library_override() {
        let request = parse_json(
            r#"{"ecosystem": "hex", "library": false, "dependencies": [
                {"name": "plug", "requirements": []},
                {"name": "phoenix", "library": false, "requirements": []}
            ]}"#,
        )
        .unwrap()
        .with_library(true);
        assert!(request.dependencies.iter().all(|d| d.library));
    }

    #[test]
    fn test_load_request_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"ecosystem": "python", "dependencies": [{{"name": "requests", "requirements": [{{"requirement": "==2.0.0", "file": "requirements.txt"}}]}}]}}"#
        )
        .unwrap();

        let request = load_request(file.path()).unwrap();
        assert_eq!(request.dependencies[0].ecosystem, Ecosystem::Python);
        assert_eq!(request.path, file.path());
    }

    #[test]
    fn test_load_request_missing_file() {
        let result = load_request(Path::new("/nonexistent/request.json"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_load_request_unsupported_extension() {
        let file = NamedTempFile::new().unwrap();
        let result = load_request(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }
}
