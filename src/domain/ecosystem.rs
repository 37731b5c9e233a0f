//! Ecosystem type definitions for supported package managers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported package-manager ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ecosystem {
    /// npm and yarn (package.json)
    Npm,
    /// Composer (composer.json)
    Composer,
    /// Cargo (Cargo.toml)
    Cargo,
    /// pip, Pipenv and Poetry
    Python,
    /// Terraform modules and providers
    Terraform,
    /// Hex (mix.exs)
    Hex,
    /// Go dep (Gopkg.toml)
    GoDep,
    /// Maven (pom.xml)
    Maven,
}

impl Ecosystem {
    /// Returns the display name for this ecosystem
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Composer => "Composer",
            Ecosystem::Cargo => "Cargo",
            Ecosystem::Python => "Python",
            Ecosystem::Terraform => "Terraform",
            Ecosystem::Hex => "Hex",
            Ecosystem::GoDep => "Go dep",
            Ecosystem::Maven => "Maven",
        }
    }

    /// Returns all supported ecosystems
    pub fn all() -> &'static [Ecosystem] {
        &[
            Ecosystem::Npm,
            Ecosystem::Composer,
            Ecosystem::Cargo,
            Ecosystem::Python,
            Ecosystem::Terraform,
            Ecosystem::Hex,
            Ecosystem::GoDep,
            Ecosystem::Maven,
        ]
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Ecosystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" | "yarn" | "npm_and_yarn" | "node" => Ok(Ecosystem::Npm),
            "composer" | "php" => Ok(Ecosystem::Composer),
            "cargo" | "rust" => Ok(Ecosystem::Cargo),
            "python" | "pip" | "pipenv" | "poetry" => Ok(Ecosystem::Python),
            "terraform" => Ok(Ecosystem::Terraform),
            "hex" | "mix" | "elixir" => Ok(Ecosystem::Hex),
            "go_dep" | "dep" | "godep" => Ok(Ecosystem::GoDep),
            "maven" | "java" => Ok(Ecosystem::Maven),
            other => Err(format!("unknown ecosystem '{}'", other)),
        }
    }
}
