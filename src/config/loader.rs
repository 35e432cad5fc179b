// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::TOML_EXTENSION;
use crate::config::ProjectionInterface;
use crate::errors::{ProjectionError, ProjectionResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Projector configuration.
///
/// Carries the behavior flags of a projector and, optionally, the interface
/// descriptors it should know up front. Typically loaded from a YAML file; files
/// ending in `.toml` are read as TOML.
///
/// # Fields
/// * `flags` - Behavior flags (optional, defaults to none)
/// * `interfaces` - Interface descriptors to register (optional)
///
/// # Example
/// ```yaml
/// flags: [SYNCHRONIZE_ON_DOCUMENTS]
/// interfaces:
///   - name: Book
///     methods:
///       - name: getTitle
///         read: //title
///         returns: string
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectorConfig {
    #[serde(default)]
    pub flags: Vec<Flag>,
    #[serde(default)]
    pub interfaces: Vec<ProjectionInterface>,
}

/// Projector behavior flags.
///
/// # Variants
/// * `SynchronizeOnDocuments` - Serialize every invocation on the owning document
///   with a re-entrant per-document lock
/// * `ToStringRendersXml` - `toString` / `Display` of a projection renders the bound
///   node as XML instead of a short description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flag {
    SynchronizeOnDocuments,
    ToStringRendersXml,
}

impl ProjectorConfig {
    pub fn with_flag(mut self, flag: Flag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }
}

fn parse_config(path: &Path, content: &str) -> ProjectionResult<ProjectorConfig> {
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(TOML_EXTENSION));
    if is_toml {
        toml::from_str(content).map_err(|e| {
            ProjectionError::Config(format!("{}: {}", path.display(), e))
        })
    } else {
        serde_yaml::from_str(content).map_err(|e| {
            ProjectionError::Config(format!("{}: {}", path.display(), e))
        })
    }
}

/// Load a projector config from a YAML or TOML file
pub fn load_projector_config<P: AsRef<Path>>(path: P) -> ProjectionResult<ProjectorConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    parse_config(path, &content)
}

/// Load the interface descriptors listed in a config file
pub fn load_interfaces<P: AsRef<Path>>(path: P) -> ProjectionResult<Vec<ProjectionInterface>> {
    Ok(load_projector_config(path)?.interfaces)
}

/// Load interface descriptors and validate each of them.
///
/// Fails with the first interface that does not pass
/// [`crate::config::validate_projection_interface`], reporting all of its problems.
pub fn load_and_validate_interfaces<P: AsRef<Path>>(
    path: P,
) -> ProjectionResult<Vec<ProjectionInterface>> {
    let interfaces = load_interfaces(path)?;

    for interface in &interfaces {
        if let Err(errors) = crate::config::validate_projection_interface(interface) {
            return Err(ProjectionError::InvalidInterface {
                interface: interface.name.clone(),
                errors,
            });
        }
    }

    Ok(interfaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValueType;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
flags: [SYNCHRONIZE_ON_DOCUMENTS, TO_STRING_RENDERS_XML]
interfaces:
  - name: Book
    methods:
      - name: getTitle
        read: //title
        returns: string
"#;

        let cfg: ProjectorConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.has_flag(Flag::SynchronizeOnDocuments));
        assert!(cfg.has_flag(Flag::ToStringRendersXml));
        assert_eq!(cfg.interfaces.len(), 1);
        assert_eq!(cfg.interfaces[0].methods[0].returns, ValueType::String);
    }

    #[test]
    fn parse_empty_config() {
        let cfg: ProjectorConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, ProjectorConfig::default());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let result: Result<ProjectorConfig, _> = serde_yaml::from_str("flags: [OMIT_EVERYTHING]");
        assert!(result.is_err());
    }

    #[test]
    fn with_flag_is_idempotent() {
        let cfg = ProjectorConfig::default()
            .with_flag(Flag::ToStringRendersXml)
            .with_flag(Flag::ToStringRendersXml);
        assert_eq!(cfg.flags, vec![Flag::ToStringRendersXml]);
    }
}
