use crate::catalog::model::{FIXME, VersionSpec};
use crate::error::Result;
use crate::gradle::patterns::{LibraryMatch, Patterns, PluginMatch};
use crate::utils::verbose;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// A dependency declaration lifted from a build script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredLibrary {
    pub configuration: String,
    pub group: String,
    pub name: String,
    pub version: VersionSpec,
    pub classifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredPlugin {
    pub id: String,
    pub version: VersionSpec,
}

/// Aggregated result of scanning one or more scripts.
///
/// `versions` holds every variable a declaration referred to; after
/// extraction all of them map to [`FIXME`] until the resolver binds them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub versions: BTreeMap<String, String>,
    pub libraries: Vec<DeclaredLibrary>,
    pub plugins: Vec<DeclaredPlugin>,
}

impl Extraction {
    pub fn absorb(&mut self, other: Extraction) {
        self.versions.extend(other.versions);
        self.libraries.extend(other.libraries);
        self.plugins.extend(other.plugins);
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty() && self.libraries.is_empty() && self.plugins.is_empty()
    }

    /// Variables still waiting for a value.
    pub fn pending_variables(&self) -> Vec<&str> {
        self.versions
            .iter()
            .filter(|(_, value)| value.as_str() == FIXME)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Pulls library and plugin declarations out of build script text.
pub struct ScriptExtractor<'p> {
    patterns: &'p Patterns,
}

impl<'p> ScriptExtractor<'p> {
    pub fn new(patterns: &'p Patterns) -> Self {
        Self { patterns }
    }

    pub fn extract_files(&self, paths: &[PathBuf]) -> Result<Extraction> {
        let mut aggregated = Extraction::default();
        for path in paths {
            let content = fs::read_to_string(path)?;
            let found = self.extract_text(&content);
            verbose!(
                "{}: {} libraries, {} plugins, {} variables",
                path.display(),
                found.libraries.len(),
                found.plugins.len(),
                found.versions.len()
            );
            for library in &found.libraries {
                match &library.classifier {
                    Some(classifier) => verbose!(
                        "  {} {}:{} ({})",
                        library.configuration,
                        library.group,
                        library.name,
                        classifier
                    ),
                    None => verbose!(
                        "  {} {}:{}",
                        library.configuration,
                        library.group,
                        library.name
                    ),
                }
            }
            aggregated.absorb(found);
        }
        Ok(aggregated)
    }

    pub fn extract_text(&self, text: &str) -> Extraction {
        let mut extraction = Extraction::default();

        for found in self.patterns.libraries(text) {
            let version = declared_version(found.version.as_deref(), &mut extraction.versions);
            extraction.libraries.push(declared_library(&found, version));
        }

        for found in self.patterns.plugins(text) {
            let version = declared_version(Some(found.version), &mut extraction.versions);
            extraction.plugins.push(declared_plugin(&found, version));
        }

        extraction
    }
}

/// Turns a raw version token into a spec, registering variables as pending.
fn declared_version(token: Option<&str>, pending: &mut BTreeMap<String, String>) -> VersionSpec {
    let Some(token) = token else {
        return VersionSpec::Literal(FIXME.to_string());
    };

    let version = VersionSpec::from_token(token);
    if let VersionSpec::Ref(name) = &version {
        pending.insert(name.clone(), FIXME.to_string());
    }
    version
}

fn declared_library(found: &LibraryMatch<'_>, version: VersionSpec) -> DeclaredLibrary {
    DeclaredLibrary {
        configuration: found.configuration.to_string(),
        group: found.group.to_string(),
        name: found.name.to_string(),
        version,
        classifier: found.classifier.map(str::to_string),
    }
}

fn declared_plugin(found: &PluginMatch<'_>, version: VersionSpec) -> DeclaredPlugin {
    DeclaredPlugin {
        id: found.id.to_string(),
        version,
    }
}
