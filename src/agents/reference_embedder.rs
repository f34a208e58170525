use crate::catalog::key::{access_path, library_key, plugin_key};
use crate::error::Result;
use crate::gradle::Patterns;
use crate::utils::verbose;
use std::fs;
use std::path::PathBuf;

/// Rewrites build scripts so that inline declarations point into the catalog.
///
/// Only the literal declaration shapes are matched; a `libs.` accessor is
/// never touched again, so running twice leaves files as the first run did.
pub struct ReferenceEmbedder<'p> {
    patterns: &'p Patterns,
}

impl<'p> ReferenceEmbedder<'p> {
    pub fn new(patterns: &'p Patterns) -> Self {
        Self { patterns }
    }

    /// Rewrites every file in place and returns the ones whose content changed.
    pub fn embed_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut rewritten = Vec::new();
        for path in paths {
            let content = fs::read_to_string(path)?;
            let embedded = self.embed_text(&content);
            if embedded != content {
                fs::write(path, embedded)?;
                verbose!("Rewrote {}", path.display());
                rewritten.push(path.clone());
            }
        }
        Ok(rewritten)
    }

    pub fn embed_text(&self, text: &str) -> String {
        let text = self.patterns.replace_libraries(text, |found| {
            let path = access_path(&library_key(found.group, found.name));
            match found.classifier {
                Some(classifier) => format!(
                    r#"{}(variantOf(libs.{}) {{ classifier("{}") }})"#,
                    found.configuration, path, classifier
                ),
                None => format!("{}(libs.{})", found.configuration, path),
            }
        });

        self.patterns.replace_plugins(&text, |found| {
            let path = access_path(&plugin_key(found.id));
            format!("{}alias(libs.plugins.{})", found.lead, path)
        })
    }
}
