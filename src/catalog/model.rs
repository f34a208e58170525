use serde::Deserialize;
use std::collections::BTreeMap;

/// Placeholder for a version that still needs to be filled in by hand.
pub const FIXME: &str = "FIXME";

/// Prefix marking a version token as a variable reference (`$foo`, `${foo}`).
pub const VARIABLE_SIGIL: char = '$';

/// In-memory form of `gradle/libs.versions.toml`.
///
/// Every section is a `BTreeMap`, so iteration (and therefore output) is
/// ordered by key rather than by insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
    #[serde(default)]
    pub libraries: BTreeMap<String, LibraryEntry>,
    #[serde(default)]
    pub bundles: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginEntry>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
            && self.libraries.is_empty()
            && self.bundles.is_empty()
            && self.plugins.is_empty()
    }

    /// Names in `[versions]` still holding the placeholder.
    pub fn unresolved_versions(&self) -> Vec<&str> {
        self.versions
            .iter()
            .filter(|(_, value)| value.as_str() == FIXME)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Library keys whose inline version is still the placeholder.
    pub fn unresolved_libraries(&self) -> Vec<&str> {
        self.libraries
            .iter()
            .filter(|(_, entry)| entry.version.as_ref().is_some_and(VersionSpec::is_fixme))
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

/// Version of a library or plugin entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawVersion")]
pub enum VersionSpec {
    /// `version = "1.0"`
    Literal(String),
    /// `version.ref = "name"`
    Ref(String),
    /// `version = { strictly = "...", prefer = "..." }`
    Rich(RichVersion),
}

impl VersionSpec {
    /// Interprets a version token lifted from a build script.
    ///
    /// `$name` and `${name}` become references, anything else is a literal.
    pub fn from_token(token: &str) -> Self {
        match variable_name(token) {
            Some(name) => VersionSpec::Ref(name.to_string()),
            None => VersionSpec::Literal(token.to_string()),
        }
    }

    /// Collapses a rich constraint carrying nothing but `ref` into a plain reference.
    pub fn normalized(self) -> Self {
        match self {
            VersionSpec::Rich(RichVersion {
                version_ref: Some(name),
                strictly: None,
                prefer: None,
                require: None,
                reject: None,
                reject_all: None,
            }) => VersionSpec::Ref(name),
            other => other,
        }
    }

    pub fn is_fixme(&self) -> bool {
        matches!(self, VersionSpec::Literal(v) if v == FIXME)
    }

    pub fn as_ref_name(&self) -> Option<&str> {
        match self {
            VersionSpec::Ref(name) => Some(name),
            VersionSpec::Rich(rich) => rich.version_ref.as_deref(),
            VersionSpec::Literal(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RichVersion {
    #[serde(rename = "ref", default)]
    pub version_ref: Option<String>,
    #[serde(default)]
    pub strictly: Option<String>,
    #[serde(default)]
    pub prefer: Option<String>,
    #[serde(default)]
    pub require: Option<String>,
    #[serde(default)]
    pub reject: Option<Rejection>,
    #[serde(rename = "rejectAll", default)]
    pub reject_all: Option<bool>,
}

/// `reject` accepts a single version or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Rejection {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVersion {
    Literal(String),
    Rich(RichVersion),
}

impl From<RawVersion> for VersionSpec {
    fn from(raw: RawVersion) -> Self {
        match raw {
            RawVersion::Literal(v) => VersionSpec::Literal(v),
            RawVersion::Rich(rich) => VersionSpec::Rich(rich).normalized(),
        }
    }
}

/// How a library names its artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryCoordinate {
    /// `module = "group:name"`
    Module(String),
    /// `group = "...", name = "..."`
    GroupName { group: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawLibrary")]
pub struct LibraryEntry {
    pub coordinate: LibraryCoordinate,
    pub version: Option<VersionSpec>,
}

impl LibraryEntry {
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: VersionSpec) -> Self {
        Self {
            coordinate: LibraryCoordinate::GroupName {
                group: group.into(),
                name: name.into(),
            },
            version: Some(version.normalized()),
        }
    }

    /// `(group, name)` regardless of which notation the entry uses.
    pub fn group_and_name(&self) -> Option<(&str, &str)> {
        match &self.coordinate {
            LibraryCoordinate::GroupName { group, name } => Some((group, name)),
            LibraryCoordinate::Module(module) => module.split_once(':'),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLibrary {
    Notation(String),
    Table(LibraryTable),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LibraryTable {
    module: Option<String>,
    group: Option<String>,
    name: Option<String>,
    version: Option<VersionSpec>,
}

impl TryFrom<RawLibrary> for LibraryEntry {
    type Error = String;

    fn try_from(raw: RawLibrary) -> Result<Self, Self::Error> {
        match raw {
            RawLibrary::Notation(notation) => {
                let parts: Vec<&str> = notation.split(':').collect();
                match parts.as_slice() {
                    [group, name] => Ok(Self {
                        coordinate: LibraryCoordinate::Module(format!("{group}:{name}")),
                        version: None,
                    }),
                    [group, name, version] => Ok(Self {
                        coordinate: LibraryCoordinate::Module(format!("{group}:{name}")),
                        version: Some(VersionSpec::Literal(version.to_string())),
                    }),
                    _ => Err(format!(
                        "invalid library notation '{notation}', expected group:name[:version]"
                    )),
                }
            }
            RawLibrary::Table(table) => {
                let coordinate = match (table.module, table.group, table.name) {
                    (Some(module), _, _) => LibraryCoordinate::Module(module),
                    (None, Some(group), Some(name)) => LibraryCoordinate::GroupName { group, name },
                    _ => {
                        return Err(
                            "library entry needs either `module` or both `group` and `name`"
                                .to_string(),
                        );
                    }
                };
                Ok(Self {
                    coordinate,
                    version: table.version,
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawPlugin")]
pub struct PluginEntry {
    pub id: String,
    pub version: Option<VersionSpec>,
}

impl PluginEntry {
    pub fn new(id: impl Into<String>, version: VersionSpec) -> Self {
        Self {
            id: id.into(),
            version: Some(version.normalized()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPlugin {
    Notation(String),
    Table(PluginTable),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginTable {
    id: String,
    version: Option<VersionSpec>,
}

impl TryFrom<RawPlugin> for PluginEntry {
    type Error = String;

    fn try_from(raw: RawPlugin) -> Result<Self, Self::Error> {
        match raw {
            RawPlugin::Notation(notation) => match notation.split_once(':') {
                Some((id, version)) if !id.is_empty() && !version.is_empty() => Ok(Self {
                    id: id.to_string(),
                    version: Some(VersionSpec::Literal(version.to_string())),
                }),
                _ => Err(format!(
                    "invalid plugin notation '{notation}', expected plugin.id:version"
                )),
            },
            RawPlugin::Table(table) => Ok(Self {
                id: table.id,
                version: table.version,
            }),
        }
    }
}

/// Extracts the variable name from `$name` or `${name}`.
pub fn variable_name(token: &str) -> Option<&str> {
    let rest = token.strip_prefix(VARIABLE_SIGIL)?;
    if let Some(inner) = rest.strip_prefix('{') {
        return inner.strip_suffix('}').filter(|name| !name.is_empty());
    }
    if rest.is_empty() || rest.contains(['{', '}']) {
        return None;
    }
    Some(rest)
}
