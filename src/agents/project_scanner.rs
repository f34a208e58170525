use crate::error::{GenError, Result};
use crate::utils::verbose;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory that marks a Gradle project and holds the catalog.
pub const GRADLE_DIR: &str = "gradle";
pub const CATALOG_FILE: &str = "gradle/libs.versions.toml";
pub const PROPERTIES_FILE: &str = "gradle.properties";
/// How many directory levels below the root are searched for build scripts.
pub const SCAN_DEPTH: usize = 3;

const SCRIPT_EXTENSIONS: &[&str] = &[".gradle", ".gradle.kts"];
/// The root settings script cannot use the catalog it would declare.
const ROOT_SETTINGS: &[&str] = &["settings.gradle", "settings.gradle.kts"];

/// ProjectScannerAgent validates the project and lists its build scripts
pub struct ProjectScannerAgent {
    project_path: PathBuf,
}

impl ProjectScannerAgent {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    /// Validates the project structure
    pub fn validate(&self) -> Result<ProjectLayout> {
        let project_path = self.project_path.canonicalize().map_err(|e| {
            GenError::ProjectValidation(format!(
                "Invalid path '{}': {e}",
                self.project_path.display()
            ))
        })?;

        if !project_path.is_dir() {
            return Err(GenError::ProjectValidation(format!(
                "Path '{}' is not a directory",
                project_path.display()
            )));
        }

        let gradle_dir = project_path.join(GRADLE_DIR);
        if !gradle_dir.is_dir() {
            return Err(GenError::ProjectValidation(format!(
                "Not a Gradle project seemingly: {} (no '{}' directory)",
                project_path.display(),
                GRADLE_DIR
            )));
        }

        Ok(ProjectLayout {
            catalog_path: project_path.join(CATALOG_FILE),
            properties_path: project_path.join(PROPERTIES_FILE),
            project_path,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub project_path: PathBuf,
    pub catalog_path: PathBuf,
    pub properties_path: PathBuf,
}

impl ProjectLayout {
    pub fn build_scripts(&self) -> Vec<PathBuf> {
        find_build_scripts(&self.project_path, SCAN_DEPTH)
    }
}

/// Lists `.gradle` / `.gradle.kts` files up to `max_depth` levels below `root`.
///
/// The root-level settings script is skipped; nested ones are kept. A
/// directory that cannot be read is reported and skipped. Entries are visited
/// in file-name order so results are stable across platforms.
pub fn find_build_scripts(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut found = Vec::new();
    collect_build_scripts(root, max_depth, 0, &mut found);
    found
}

fn collect_build_scripts(dir: &Path, max_depth: usize, depth: usize, found: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir.display(), e);
            return;
        }
    };

    let mut entries: Vec<_> = entries.filter_map(|entry| entry.ok()).collect();
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            verbose!("Skipping {}: unknown file type", path.display());
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();

        if file_type.is_dir() {
            collect_build_scripts(&path, max_depth, depth + 1, found);
        } else if is_build_script(&name) {
            if depth == 0 && ROOT_SETTINGS.contains(&name.as_str()) {
                verbose!("Skipping root settings script {}", path.display());
                continue;
            }
            found.push(path);
        }
    }
}

fn is_build_script(name: &str) -> bool {
    SCRIPT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// True for `settings.gradle` / `settings.gradle.kts`, wherever they live.
pub fn is_settings_script(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| ROOT_SETTINGS.contains(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn depth_bounds_the_search() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "build.gradle");
        touch(root, "foo/build.gradle");
        touch(root, "bar/build.gradle");
        touch(root, "bar/bar/build.gradle");
        touch(root, "bar/bar/bar/build.gradle");
        touch(root, "bar/bar/bar/bar/build.gradle");

        let counts: Vec<usize> = (0..=5)
            .map(|depth| find_build_scripts(root, depth).len())
            .collect();
        assert_eq!(counts, vec![1, 3, 4, 5, 6, 6]);
    }

    #[test]
    fn only_root_settings_is_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "settings.gradle.kts");
        touch(root, "build.gradle.kts");
        touch(root, "buildSrc/settings.gradle.kts");
        touch(root, "buildSrc/build.gradle.kts");
        touch(root, "README.md");

        let found = find_build_scripts(root, SCAN_DEPTH);
        let relative: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            relative,
            vec![
                "build.gradle.kts",
                "buildSrc/build.gradle.kts",
                "buildSrc/settings.gradle.kts",
            ]
        );
    }

    #[test]
    fn missing_gradle_dir_is_rejected() {
        let dir = tempdir().unwrap();
        let err = ProjectScannerAgent::new(dir.path()).validate().unwrap_err();
        assert!(matches!(err, GenError::ProjectValidation(msg) if msg.contains("Not a Gradle project")));
    }

    #[test]
    fn file_path_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("build.gradle");
        fs::write(&file, "").unwrap();
        let err = ProjectScannerAgent::new(&file).validate().unwrap_err();
        assert!(matches!(err, GenError::ProjectValidation(_)));
    }

    #[test]
    fn valid_project_reports_catalog_location() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("gradle")).unwrap();
        let info = ProjectScannerAgent::new(dir.path()).validate().unwrap();
        assert!(info.catalog_path.ends_with("gradle/libs.versions.toml"));
        assert!(info.properties_path.ends_with("gradle.properties"));
    }

    #[test]
    fn settings_scripts_are_recognized_anywhere() {
        assert!(is_settings_script(Path::new("buildSrc/settings.gradle.kts")));
        assert!(!is_settings_script(Path::new("buildSrc/build.gradle.kts")));
    }
}
