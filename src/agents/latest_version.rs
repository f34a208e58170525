use crate::catalog::model::{Catalog, VersionSpec};
use crate::repository::{Coordinate, RepositoryClient};
use crate::utils::verbose;
use indicatif::{ProgressBar, ProgressStyle};

/// Something still marked `FIXME` that a remote lookup may fill in.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Library(String),
    Version(String),
}

/// Fills placeholder versions with the latest release reported by a repository.
///
/// Lookups never fail the run: any error or empty answer leaves the
/// placeholder in place.
pub struct LatestVersionAgent<'c> {
    client: &'c dyn RepositoryClient,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LookupReport {
    pub resolved: Vec<(String, String)>,
    pub unresolved: Vec<String>,
}

impl<'c> LatestVersionAgent<'c> {
    pub fn new(client: &'c dyn RepositoryClient) -> Self {
        Self { client }
    }

    pub fn fill_unresolved(&self, catalog: &mut Catalog) -> LookupReport {
        let targets = Self::collect_targets(catalog);
        let mut report = LookupReport::default();
        if targets.is_empty() {
            return report;
        }

        let pb = ProgressBar::new(targets.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("  [{bar:40}] {pos}/{len} {msg}") {
            pb.set_style(style.progress_chars("=>-"));
        }

        for (target, coordinate) in targets {
            let label = match &target {
                Target::Library(key) | Target::Version(key) => key.clone(),
            };
            pb.set_message(format!("Searching {}", label));

            match self.lookup(&coordinate) {
                Some(version) => {
                    match &target {
                        Target::Library(key) => {
                            if let Some(entry) = catalog.libraries.get_mut(key) {
                                entry.version = Some(VersionSpec::Literal(version.clone()));
                            }
                        }
                        Target::Version(name) => {
                            catalog.versions.insert(name.clone(), version.clone());
                        }
                    }
                    report.resolved.push((label, version));
                }
                None => report.unresolved.push(label),
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        report
    }

    fn lookup(&self, coordinate: &Coordinate) -> Option<String> {
        match self.client.fetch_latest_version(coordinate) {
            Ok(Some(version)) => Some(version),
            Ok(None) => {
                verbose!(
                    "No published version found for {}:{}",
                    coordinate.group,
                    coordinate.artifact
                );
                None
            }
            Err(e) => {
                verbose!(
                    "Lookup failed for {}:{}: {}",
                    coordinate.group,
                    coordinate.artifact,
                    e
                );
                None
            }
        }
    }

    /// Libraries with a `FIXME` literal, then `FIXME` version variables paired
    /// with the first library that references them.
    fn collect_targets(catalog: &Catalog) -> Vec<(Target, Coordinate)> {
        let mut targets = Vec::new();

        for (key, entry) in &catalog.libraries {
            if !entry.version.as_ref().is_some_and(VersionSpec::is_fixme) {
                continue;
            }
            if let Some((group, name)) = entry.group_and_name() {
                targets.push((Target::Library(key.clone()), Coordinate::new(group, name)));
            }
        }

        for name in catalog.unresolved_versions() {
            let representative = catalog.libraries.values().find_map(|entry| {
                let uses = entry
                    .version
                    .as_ref()
                    .and_then(VersionSpec::as_ref_name)
                    .is_some_and(|r| r == name);
                if uses { entry.group_and_name() } else { None }
            });
            if let Some((group, artifact)) = representative {
                targets.push((
                    Target::Version(name.to_string()),
                    Coordinate::new(group, artifact),
                ));
            }
        }

        targets
    }
}
