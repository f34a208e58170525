use crate::catalog::key::{library_key, plugin_key};
use crate::catalog::model::{Catalog, FIXME, LibraryEntry, PluginEntry};
use crate::gradle::Extraction;

/// Folds freshly extracted declarations into a previously loaded catalog.
///
/// New records overwrite entries under the same key, with one exception: a
/// placeholder (`FIXME`) never replaces something that is already there.
/// Entries that were not rediscovered are left untouched, and bundles are
/// passed through as loaded.
pub fn merge(mut catalog: Catalog, found: &Extraction) -> Catalog {
    for (name, value) in &found.versions {
        if value == FIXME && catalog.versions.contains_key(name) {
            continue;
        }
        catalog.versions.insert(name.clone(), value.clone());
    }

    for library in &found.libraries {
        let key = library_key(&library.group, &library.name);
        if library.version.is_fixme() && catalog.libraries.contains_key(&key) {
            continue;
        }
        catalog.libraries.insert(
            key,
            LibraryEntry::new(&library.group, &library.name, library.version.clone()),
        );
    }

    for plugin in &found.plugins {
        let key = plugin_key(&plugin.id);
        if plugin.version.is_fixme() && catalog.plugins.contains_key(&key) {
            continue;
        }
        catalog
            .plugins
            .insert(key, PluginEntry::new(&plugin.id, plugin.version.clone()));
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::codec;
    use crate::catalog::model::{LibraryCoordinate, VersionSpec};
    use crate::gradle::extractor::{DeclaredLibrary, DeclaredPlugin};

    fn declared(group: &str, name: &str, version: VersionSpec) -> DeclaredLibrary {
        DeclaredLibrary {
            configuration: "implementation".into(),
            group: group.into(),
            name: name.into(),
            version,
            classifier: None,
        }
    }

    #[test]
    fn merging_into_empty_catalog_uses_normalized_keys() {
        let mut found = Extraction::default();
        found.libraries.push(declared(
            "foo",
            "bar",
            VersionSpec::Literal("1.1".into()),
        ));
        found.libraries.push(declared(
            "com.example.a123",
            "d_A_S_h",
            VersionSpec::Literal("1.2.3-M4".into()),
        ));

        let catalog = merge(Catalog::default(), &found);

        assert_eq!(catalog.libraries.len(), 2);
        assert_eq!(
            catalog.libraries["foo-bar"],
            LibraryEntry::new("foo", "bar", VersionSpec::Literal("1.1".into()))
        );
        let dash = &catalog.libraries["com-example-a123-d-a-s-h"];
        assert_eq!(
            dash.coordinate,
            LibraryCoordinate::GroupName {
                group: "com.example.a123".into(),
                name: "d_A_S_h".into()
            }
        );
    }

    #[test]
    fn variable_versions_become_references() {
        let mut found = Extraction::default();
        found.versions.insert("fooVersion".into(), "1.0".into());
        found.libraries.push(declared(
            "foo",
            "foo",
            VersionSpec::Ref("fooVersion".into()),
        ));
        found.plugins.push(DeclaredPlugin {
            id: "org.jetbrains.kotlin.jvm".into(),
            version: VersionSpec::Ref("kotlin".into()),
        });
        found.versions.insert("kotlin".into(), FIXME.into());

        let catalog = merge(Catalog::default(), &found);

        assert_eq!(catalog.versions["fooVersion"], "1.0");
        assert_eq!(catalog.versions["kotlin"], FIXME);
        assert_eq!(
            catalog.libraries["foo-foo"].version,
            Some(VersionSpec::Ref("fooVersion".into()))
        );
        assert_eq!(
            catalog.plugins["org-jetbrains-kotlin-jvm"].version,
            Some(VersionSpec::Ref("kotlin".into()))
        );
    }

    #[test]
    fn empty_extraction_leaves_catalog_unchanged() {
        let original = codec::decode(
            r#"
[versions]
bar = "2.0"

[libraries]
guava = { group = "com.google.guava", name = "guava", version = "32.0.0-jre" }
foo-bar = { module = "org.example:foo-bar", version.ref = "bar" }

[bundles]
all = ["guava", "foo-bar"]

[plugins]
kotlin = { id = "org.jetbrains.kotlin.jvm", version = "1.9.0" }
"#,
        )
        .unwrap();

        let merged = merge(original.clone(), &Extraction::default());

        assert_eq!(merged, original);
        assert_eq!(codec::encode(&merged), codec::encode(&original));
    }

    #[test]
    fn placeholder_never_replaces_existing_values() {
        let mut catalog = Catalog::default();
        catalog.versions.insert("fooVersion".into(), "1.0".into());
        catalog.libraries.insert(
            "foo-bar".into(),
            LibraryEntry::new("foo", "bar", VersionSpec::Literal("3.0".into())),
        );

        let mut found = Extraction::default();
        found.versions.insert("fooVersion".into(), FIXME.into());
        found.libraries.push(declared(
            "foo",
            "bar",
            VersionSpec::Literal(FIXME.into()),
        ));

        let merged = merge(catalog.clone(), &found);
        assert_eq!(merged, catalog);
    }

    #[test]
    fn newly_discovered_literal_overwrites_existing_entry() {
        let mut catalog = Catalog::default();
        catalog.libraries.insert(
            "foo-bar".into(),
            LibraryEntry::new("foo", "bar", VersionSpec::Literal(FIXME.into())),
        );
        catalog
            .bundles
            .insert("web".into(), vec!["foo-bar".into()]);

        let mut found = Extraction::default();
        found.libraries.push(declared(
            "foo",
            "bar",
            VersionSpec::Literal("2.0".into()),
        ));

        let merged = merge(catalog, &found);
        assert_eq!(
            merged.libraries["foo-bar"].version,
            Some(VersionSpec::Literal("2.0".into()))
        );
        assert_eq!(merged.bundles["web"], vec!["foo-bar".to_string()]);
    }
}
