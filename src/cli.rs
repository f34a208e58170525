use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gvcgen",
    about = "Generate a Gradle version catalog from the dependencies declared in build scripts",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract dependencies into gradle/libs.versions.toml and rewrite build scripts
    Generate {
        /// Path to the project directory (defaults to current directory)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Look up the latest published version for entries left as FIXME
        #[arg(
            long,
            value_name = "BOOL",
            default_value_t = false,
            action = ArgAction::Set,
            num_args = 0..=1,
            default_missing_value = "true"
        )]
        search_latest: bool,
    },

    /// Print version and build information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("gvcgen").chain(args.iter().copied()))
    }

    #[test]
    fn generate_defaults() {
        let cli = parse(&["generate"]).unwrap();
        match cli.command {
            Commands::Generate {
                path,
                search_latest,
            } => {
                assert_eq!(path, None);
                assert!(!search_latest);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn search_latest_accepts_bare_flag_and_explicit_value() {
        for (args, expected) in [
            (vec!["generate", "--search-latest"], true),
            (vec!["generate", "--search-latest=true"], true),
            (vec!["generate", "--search-latest=false"], false),
            (vec!["generate", "demo", "--search-latest", "true"], true),
        ] {
            let cli = parse(&args).unwrap();
            let Commands::Generate { search_latest, .. } = cli.command else {
                panic!("expected generate");
            };
            assert_eq!(search_latest, expected, "args: {args:?}");
        }
    }

    #[test]
    fn invalid_bool_is_rejected() {
        assert!(parse(&["generate", "--search-latest=maybe"]).is_err());
    }

    #[test]
    fn extra_positional_is_rejected() {
        assert!(parse(&["generate", "one", "two"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = parse(&["generate", "-v", "demo"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Generate { path: Some(p), .. } if p == PathBuf::from("demo")));
    }
}
