use crate::catalog::model::FIXME;
use crate::error::{GenError, Result};
use crate::gradle::patterns::{property_assignment, variable_assignment};
use crate::utils::verbose;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Binds pending version variables to the literals assigned to them.
///
/// The matchers are built from the pending names only, so assignments to
/// unrelated variables that happen to look the same are never picked up.
pub struct VariableResolver {
    script: Regex,
    properties: Regex,
}

impl VariableResolver {
    /// Returns `None` when there is nothing to resolve.
    pub fn for_names(names: &[&str]) -> Result<Option<Self>> {
        if names.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            script: variable_assignment(names)?,
            properties: property_assignment(names)?,
        }))
    }

    /// Applies `name = "value"` assignments found in a build script.
    pub fn bind_script(&self, text: &str, versions: &mut BTreeMap<String, String>) {
        for caps in self.script.captures_iter(text) {
            versions.insert(caps[1].to_string(), caps[2].to_string());
        }
    }

    /// Applies `name=value` lines from a properties file.
    pub fn bind_properties(&self, text: &str, versions: &mut BTreeMap<String, String>) {
        for caps in self.properties.captures_iter(text) {
            let value = caps[2].trim();
            if !value.is_empty() {
                versions.insert(caps[1].to_string(), value.to_string());
            }
        }
    }
}

/// Second pass over the inputs: scripts first, then the properties file,
/// whose bindings win. Names bound nowhere keep [`FIXME`].
pub fn resolve_versions(
    versions: &mut BTreeMap<String, String>,
    script_paths: &[PathBuf],
    properties_path: Option<&Path>,
) -> Result<()> {
    let names: Vec<String> = versions
        .iter()
        .filter(|(_, value)| value.as_str() == FIXME)
        .map(|(name, _)| name.clone())
        .collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();

    let Some(resolver) = VariableResolver::for_names(&names)? else {
        return Ok(());
    };

    for path in script_paths {
        let content = fs::read_to_string(path)?;
        resolver.bind_script(&content, versions);
    }

    if let Some(path) = properties_path {
        match fs::read_to_string(path) {
            Ok(content) => resolver.bind_properties(&content, versions),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                verbose!("No properties file at {}", path.display());
            }
            Err(e) => return Err(GenError::Io(e)),
        }
    }

    for (name, value) in versions.iter() {
        if value == FIXME {
            verbose!("Version variable '{}' is unresolved", name);
        }
    }

    Ok(())
}
