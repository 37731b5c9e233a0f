//! depbump - Multi-ecosystem dependency requirement updater library
//!
//! Given a dependency's declared requirement strings and the newest
//! version it may move to, computes rewritten requirements for:
//! - npm and yarn (package.json)
//! - Composer (composer.json)
//! - Cargo (Cargo.toml)
//! - Python (PEP 440 specifiers and Poetry carets)
//! - Terraform, Hex, Go dep and Maven
//!
//! The `update` module holds the per-ecosystem rules, `parser` the
//! requirement grammar, and `manifest` the optional in-place patching.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod update;
