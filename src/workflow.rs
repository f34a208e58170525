use crate::agents::project_scanner::is_settings_script;
use crate::agents::{LatestVersionAgent, ProjectScannerAgent, ReferenceEmbedder};
use crate::catalog::codec::{read_catalog, write_catalog};
use crate::catalog::merge;
use crate::error::Result;
use crate::gradle::{Patterns, ScriptExtractor, resolve_versions};
use crate::maven::MavenSearchClient;
use crate::repository::RepositoryClient;
use crate::utils::verbose;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Outcome of one generate run.
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub project_path: PathBuf,
    pub catalog_path: PathBuf,
    pub scripts: Vec<PathBuf>,
    pub rewritten: Vec<PathBuf>,
    /// Version names and library keys still set to `FIXME`.
    pub unresolved: Vec<String>,
    /// Step headings in the order they were printed.
    pub steps: Vec<String>,
}

/// Numbers step headings in the order they are printed.
#[derive(Debug, Default)]
struct Steps {
    headings: Vec<String>,
}

impl Steps {
    fn start(&mut self, title: &str) {
        let heading = format!("{}. {}", self.headings.len() + 1, title);
        println!("\n{}", heading.yellow());
        self.headings.push(heading);
    }
}

/// Execute the generate workflow
pub fn execute_generate(path: Option<PathBuf>, search_latest: bool) -> Result<()> {
    let project_path = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    println!("{}", "Generating Gradle version catalog...".cyan().bold());

    let client = if search_latest {
        Some(MavenSearchClient::new()?)
    } else {
        None
    };
    let lookup = client.as_ref().map(|c| c as &dyn RepositoryClient);

    let report = run_generate(&project_path, lookup)?;
    print_generate_report(&report);

    Ok(())
}

/// Runs the whole pipeline against `project_path`.
///
/// The existing catalog is read before anything is written, so a catalog
/// that fails to decode aborts the run with every file untouched. The
/// catalog is written once, then the scripts are rewritten.
pub fn run_generate(
    project_path: &Path,
    lookup: Option<&dyn RepositoryClient>,
) -> Result<GenerateReport> {
    let mut steps = Steps::default();

    steps.start("Validating project structure...");
    let layout = ProjectScannerAgent::new(project_path).validate()?;
    println!("{}", "✓ Project structure is valid".green());

    steps.start("Discovering build scripts...");
    let scripts = layout.build_scripts();
    println!("   Found {} script files:", scripts.len());
    for script in &scripts {
        println!("   • {}", relative(&layout.project_path, script).bright_cyan());
    }

    steps.start("Reading existing version catalog...");
    let existing = read_catalog(&layout.catalog_path)?;
    if existing.is_empty() {
        println!("   No existing entries");
    } else {
        println!(
            "   {} versions, {} libraries, {} bundles, {} plugins",
            existing.versions.len(),
            existing.libraries.len(),
            existing.bundles.len(),
            existing.plugins.len()
        );
    }

    steps.start("Extracting declarations...");
    let patterns = Patterns::standard()?;
    let mut extraction = ScriptExtractor::new(&patterns).extract_files(&scripts)?;
    if extraction.is_empty() {
        println!("   No inline declarations found");
    } else {
        println!(
            "{}",
            format!(
                "✓ Found {} libraries and {} plugins",
                extraction.libraries.len(),
                extraction.plugins.len()
            )
            .green()
        );
    }

    steps.start("Resolving version variables...");
    let pending = extraction.pending_variables().len();
    if pending == 0 {
        println!("   No version variables to resolve");
    } else {
        resolve_versions(
            &mut extraction.versions,
            &scripts,
            Some(layout.properties_path.as_path()),
        )?;
        let left = extraction.pending_variables().len();
        println!(
            "{}",
            format!("✓ Resolved {} of {}", pending - left, pending).green()
        );
    }

    let mut catalog = merge(existing, &extraction);

    steps.start("Searching latest versions for unresolved entries...");
    let unresolved = catalog.unresolved_libraries().len() + catalog.unresolved_versions().len();
    match lookup {
        None => println!("   Skipped (enable with --search-latest)"),
        Some(_) if unresolved == 0 => println!("   Nothing to search for"),
        Some(client) => {
            let found = LatestVersionAgent::new(client).fill_unresolved(&mut catalog);
            for (key, version) in &found.resolved {
                println!("   {} {} → {}", "✓".green(), key, version.green());
            }
            for key in &found.unresolved {
                verbose!("No version found for {}", key);
            }
        }
    }

    steps.start("Writing version catalog...");
    write_catalog(&layout.catalog_path, &catalog)?;
    println!(
        "{}",
        format!("✓ Wrote {}", layout.catalog_path.display()).green()
    );

    steps.start("Rewriting build scripts...");
    let rewritten = ReferenceEmbedder::new(&patterns).embed_files(&scripts)?;
    println!(
        "{}",
        format!("✓ Rewrote {} of {} files", rewritten.len(), scripts.len()).green()
    );

    let mut unresolved: Vec<String> = catalog
        .unresolved_versions()
        .into_iter()
        .map(|name| format!("versions.{}", name))
        .collect();
    unresolved.extend(
        catalog
            .unresolved_libraries()
            .into_iter()
            .map(|key| format!("libraries.{}", key)),
    );

    Ok(GenerateReport {
        project_path: layout.project_path,
        catalog_path: layout.catalog_path,
        scripts,
        rewritten,
        unresolved,
        steps: steps.headings,
    })
}

fn print_generate_report(report: &GenerateReport) {
    for path in report.rewritten.iter().filter(|p| is_settings_script(p)) {
        println!(
            "\n{} {} was updated; that build must import the version catalog itself.",
            "Note:".yellow().bold(),
            relative(&report.project_path, path)
        );
    }

    if !report.unresolved.is_empty() {
        println!(
            "\n{}",
            format!("{} entries need a version (FIXME):", report.unresolved.len()).yellow()
        );
        for entry in &report.unresolved {
            println!("   • {}", entry);
        }
    }

    println!(
        "\n{} {}",
        "✨ Version catalog generated:".green().bold(),
        report.catalog_path.display()
    );
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Execute the version command
pub fn execute_version() -> Result<()> {
    println!("Version:  {}", env!("CARGO_PKG_VERSION"));
    println!(
        "Revision: {}",
        option_env!("GVCGEN_REVISION").unwrap_or("dev")
    );
    println!("OS:       {}", std::env::consts::OS);
    println!("Arch:     {}", std::env::consts::ARCH);
    Ok(())
}
