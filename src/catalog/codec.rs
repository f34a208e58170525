use crate::catalog::model::{
    Catalog, LibraryCoordinate, LibraryEntry, PluginEntry, Rejection, RichVersion, VersionSpec,
};
use crate::error::{GenError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use toml_edit::{Array, DocumentMut, InlineTable, Item, Table, Value, value};

/// Parses catalog text.
pub fn decode(content: &str) -> Result<Catalog> {
    toml::from_str(content)
        .map_err(|e| GenError::TomlParsing(format!("Failed to parse TOML: {}", e)))
}

/// Renders a catalog deterministically.
///
/// Sections come out as versions, libraries, bundles, plugins; empty sections
/// are omitted and entries are sorted by key, so `encode(decode(encode(c)))`
/// is byte-identical to `encode(c)`.
pub fn encode(catalog: &Catalog) -> String {
    let mut doc = DocumentMut::new();
    let mut first = true;

    if !catalog.versions.is_empty() {
        let mut table = section(&mut first);
        for (name, version) in &catalog.versions {
            table.insert(name, value(version.as_str()));
        }
        doc.insert("versions", Item::Table(table));
    }

    if !catalog.libraries.is_empty() {
        let mut table = section(&mut first);
        for (key, library) in &catalog.libraries {
            table.insert(key, Item::Value(Value::InlineTable(library_inline(library))));
        }
        doc.insert("libraries", Item::Table(table));
    }

    if !catalog.bundles.is_empty() {
        let mut table = section(&mut first);
        for (name, members) in &catalog.bundles {
            let array: Array = members.iter().map(String::as_str).collect();
            table.insert(name, Item::Value(Value::Array(array)));
        }
        doc.insert("bundles", Item::Table(table));
    }

    if !catalog.plugins.is_empty() {
        let mut table = section(&mut first);
        for (key, plugin) in &catalog.plugins {
            table.insert(key, Item::Value(Value::InlineTable(plugin_inline(plugin))));
        }
        doc.insert("plugins", Item::Table(table));
    }

    doc.to_string()
}

/// Loads the catalog at `path`; a missing file yields an empty catalog.
pub fn read_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Catalog::default()),
        Err(e) => return Err(GenError::Io(e)),
    };

    decode(&content).map_err(|e| match e {
        GenError::TomlParsing(msg) => {
            GenError::TomlParsing(format!("{} ({})", msg, path.display()))
        }
        other => other,
    })
}

pub fn write_catalog<P: AsRef<Path>>(path: P, catalog: &Catalog) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, encode(catalog))?;
    Ok(())
}

fn section(first: &mut bool) -> Table {
    let mut table = Table::new();
    if !*first {
        table.decor_mut().set_prefix("\n");
    }
    *first = false;
    table
}

fn library_inline(library: &LibraryEntry) -> InlineTable {
    let mut entry = InlineTable::new();
    match &library.coordinate {
        LibraryCoordinate::Module(module) => {
            entry.insert("module", Value::from(module.as_str()));
        }
        LibraryCoordinate::GroupName { group, name } => {
            entry.insert("group", Value::from(group.as_str()));
            entry.insert("name", Value::from(name.as_str()));
        }
    }
    if let Some(version) = &library.version {
        entry.insert("version", version_value(version));
    }
    entry.fmt();
    entry
}

fn plugin_inline(plugin: &PluginEntry) -> InlineTable {
    let mut entry = InlineTable::new();
    entry.insert("id", Value::from(plugin.id.as_str()));
    if let Some(version) = &plugin.version {
        entry.insert("version", version_value(version));
    }
    entry.fmt();
    entry
}

/// `version = "1.0"`, `version.ref = "name"` or `version = { ... }`.
fn version_value(version: &VersionSpec) -> Value {
    match version.clone().normalized() {
        VersionSpec::Literal(v) => Value::from(v),
        VersionSpec::Ref(name) => {
            let mut dotted = InlineTable::new();
            dotted.insert("ref", Value::from(name));
            dotted.set_dotted(true);
            Value::InlineTable(dotted)
        }
        VersionSpec::Rich(rich) => Value::InlineTable(rich_inline(&rich)),
    }
}

fn rich_inline(rich: &RichVersion) -> InlineTable {
    let mut table = InlineTable::new();
    let fields = [
        ("ref", &rich.version_ref),
        ("strictly", &rich.strictly),
        ("prefer", &rich.prefer),
        ("require", &rich.require),
    ];
    for (name, field) in fields {
        if let Some(v) = field {
            table.insert(name, Value::from(v.as_str()));
        }
    }
    match &rich.reject {
        Some(Rejection::One(v)) => {
            table.insert("reject", Value::from(v.as_str()));
        }
        Some(Rejection::Many(vs)) => {
            let array: Array = vs.iter().map(String::as_str).collect();
            table.insert("reject", Value::Array(array));
        }
        None => {}
    }
    if let Some(reject_all) = rich.reject_all {
        table.insert("rejectAll", Value::from(reject_all));
    }
    table.fmt();
    table
}
