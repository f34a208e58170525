use crate::error::{GenError, Result};
use regex::{Captures, Regex};

/// Dependency configurations recognised in build scripts.
pub const DEFAULT_CONFIGURATIONS: &[&str] = &[
    "api",
    "annotationProcessor",
    "classpath",
    "implementation",
    "compileOnly",
    "compileOnlyApi",
    "platform",
    "integrationTestImplementation",
    "integrationTestRuntimeOnly",
    "runtimeOnly",
    "testImplementation",
    "testCompileOnly",
    "testRuntimeOnly",
];

/// The set of configuration verbs the library matchers are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configurations(Vec<String>);

impl Configurations {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    fn alternation(&self) -> String {
        self.0
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl Default for Configurations {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIGURATIONS.iter().copied())
    }
}

/// `group:name[:version[:classifier]]` inside a quoted string.
const COORDINATE: &str = r#"(?P<group>[^:"']+):(?P<name>[^:"']+)(?::(?P<version>[^:"']+)(?::(?P<classifier>[a-zA-Z0-9_-]+))?)?"#;

/// `group: 'g', name: 'n'[, version: <expr>][, classifier: 'c']`, with `:` or `=`.
const NAMED_ARGUMENTS: &str = r#"group\s*[:=]\s*["'](?P<group>[^"']+)["']\s*,\s*name\s*[:=]\s*["'](?P<name>[^"']+)["'](?:\s*,\s*version\s*[:=]\s*(?:["'](?P<version>[^"']+)["']|(?P<bare>[A-Za-z_][A-Za-z0-9_]*)))?(?:\s*,\s*classifier\s*[:=]\s*["'](?P<classifier>[A-Za-z0-9_-]+)["'])?"#;

/// `id("plugin.id") version "1.0"` and its Groovy/variable variants.
const PLUGIN: &str = r#"(?P<lead>\W)id\W+(?P<id>[\w.-]+)\W+version[ ("']+(?P<version>[\w.${}-]+)["')]+"#;

/// Compiled matchers shared by extraction and reference embedding.
#[derive(Debug, Clone)]
pub struct Patterns {
    coordinate: Regex,
    named_arguments: Regex,
    plugin: Regex,
}

impl Patterns {
    pub fn new(configurations: &Configurations) -> Result<Self> {
        let configs = configurations.alternation();
        let coordinate = Regex::new(&format!(
            r#"(?P<config>{configs})\s*\(?["']{COORDINATE}["']\)?"#
        ))?;
        // Map notation must run to the end of the line, so a version
        // expression or argument it cannot consume rules the match out.
        let named_arguments = Regex::new(&format!(
            r#"(?mR)(?P<config>{configs})[ \t]*\(?[ \t]*{NAMED_ARGUMENTS}[ \t]*\)?[ \t]*$"#
        ))?;
        let plugin = Regex::new(PLUGIN)?;

        Ok(Self {
            coordinate,
            named_arguments,
            plugin,
        })
    }

    /// Matchers for the built-in configuration list.
    pub fn standard() -> Result<Self> {
        Self::new(&Configurations::default())
    }

    /// Every library declaration in `text`, colon-string form first.
    pub fn libraries<'t>(&self, text: &'t str) -> Vec<LibraryMatch<'t>> {
        self.coordinate
            .captures_iter(text)
            .chain(self.named_arguments.captures_iter(text))
            .map(|caps| LibraryMatch::from_captures(&caps))
            .collect()
    }

    pub fn plugins<'t>(&self, text: &'t str) -> Vec<PluginMatch<'t>> {
        self.plugin
            .captures_iter(text)
            .map(|caps| PluginMatch::from_captures(&caps))
            .collect()
    }

    /// Replaces each library declaration with the string `render` produces for it.
    pub fn replace_libraries<F>(&self, text: &str, render: F) -> String
    where
        F: Fn(&LibraryMatch<'_>) -> String,
    {
        let once = self
            .coordinate
            .replace_all(text, |caps: &Captures| {
                render(&LibraryMatch::from_captures(caps))
            })
            .into_owned();
        self.named_arguments
            .replace_all(&once, |caps: &Captures| {
                render(&LibraryMatch::from_captures(caps))
            })
            .into_owned()
    }

    pub fn replace_plugins<F>(&self, text: &str, render: F) -> String
    where
        F: Fn(&PluginMatch<'_>) -> String,
    {
        self.plugin
            .replace_all(text, |caps: &Captures| {
                render(&PluginMatch::from_captures(caps))
            })
            .into_owned()
    }
}

/// One matched dependency declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryMatch<'t> {
    pub configuration: &'t str,
    pub group: &'t str,
    pub name: &'t str,
    /// Raw version token; bare identifiers are reported with a `$` prefix.
    pub version: Option<String>,
    pub classifier: Option<&'t str>,
}

impl<'t> LibraryMatch<'t> {
    fn from_captures(caps: &Captures<'t>) -> Self {
        let version = match (caps.name("version"), caps.name("bare")) {
            (Some(quoted), _) => Some(quoted.as_str().to_string()),
            (None, Some(bare)) => Some(format!("${}", bare.as_str())),
            (None, None) => None,
        };

        Self {
            configuration: group_str(caps, "config"),
            group: group_str(caps, "group"),
            name: group_str(caps, "name"),
            version,
            classifier: caps.name("classifier").map(|m| m.as_str()),
        }
    }
}

/// One matched `id(...) version ...` plugin declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMatch<'t> {
    /// The non-word character right before `id`, kept when rewriting.
    pub lead: &'t str,
    pub id: &'t str,
    pub version: &'t str,
}

impl<'t> PluginMatch<'t> {
    fn from_captures(caps: &Captures<'t>) -> Self {
        Self {
            lead: group_str(caps, "lead"),
            id: group_str(caps, "id"),
            version: group_str(caps, "version"),
        }
    }
}

fn group_str<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

/// Matches `<name> = "<value>"` in scripts, restricted to `names`.
pub fn variable_assignment(names: &[&str]) -> Result<Regex> {
    if names.is_empty() {
        return Err(GenError::ProjectValidation(
            "No variable names to match".to_string(),
        ));
    }
    let keys = escaped_alternation(names);
    Ok(Regex::new(&format!(r#"\W({keys})\W?=\W*["']([^"']+)["']"#))?)
}

/// Matches `<name>=<value>` lines of a properties file, restricted to `names`.
pub fn property_assignment(names: &[&str]) -> Result<Regex> {
    if names.is_empty() {
        return Err(GenError::ProjectValidation(
            "No variable names to match".to_string(),
        ));
    }
    let keys = escaped_alternation(names);
    Ok(Regex::new(&format!(
        r#"(?m)^[ \t]*({keys})[ \t]*=[ \t]*([^"'\r\n]+)"#
    ))?)
}

fn escaped_alternation(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> Patterns {
        Patterns::standard().unwrap()
    }

    #[test]
    fn colon_form_is_matched_in_every_quoting_style() {
        let text = r#"
            implementation "foo:bar:1.2.3"
            implementation "foo:no-version"
            api 'foo-bar:quax:4.5.6-b'
            testImplementation('a.b.c:foo-bar:1.2')
            runtimeOnly("org.lwjgl:lwjgl:3.3.3:natives-linux")
        "#;
        let found = patterns().libraries(text);
        let coords: Vec<_> = found
            .iter()
            .map(|m| (m.configuration, m.group, m.name, m.version.as_deref(), m.classifier))
            .collect();
        assert_eq!(
            coords,
            vec![
                ("implementation", "foo", "bar", Some("1.2.3"), None),
                ("implementation", "foo", "no-version", None, None),
                ("api", "foo-bar", "quax", Some("4.5.6-b"), None),
                ("testImplementation", "a.b.c", "foo-bar", Some("1.2"), None),
                ("runtimeOnly", "org.lwjgl", "lwjgl", Some("3.3.3"), Some("natives-linux")),
            ]
        );
    }

    #[test]
    fn named_argument_form_is_matched() {
        let text = r#"
            implementation group: 'com.google.guava', name: 'guava', version: '32.0.0-jre'
            api(group = "org.slf4j", name = "slf4j-api", version = "$slf4jVersion")
            compileOnly group: 'org.projectlombok', name: 'lombok', version: lombokVersion
            testRuntimeOnly group: 'org.example', name: 'bom'
        "#;
        let found = patterns().libraries(text);
        let coords: Vec<_> = found
            .iter()
            .map(|m| (m.group, m.name, m.version.as_deref()))
            .collect();
        assert_eq!(
            coords,
            vec![
                ("com.google.guava", "guava", Some("32.0.0-jre")),
                ("org.slf4j", "slf4j-api", Some("$slf4jVersion")),
                ("org.projectlombok", "lombok", Some("$lombokVersion")),
                ("org.example", "bom", None),
            ]
        );
    }

    #[test]
    fn named_argument_form_needs_a_clean_line_end() {
        let text = "implementation group: 'org.slf4j', name: 'slf4j-api', version: rootProject.ext.slf4jVersion\n\
             implementation(group = \"a\", name = \"b\", version = libs.versions.b.get())\n\
             implementation group: 'a', name: 'c', version: '1.0', ext: 'aar'\r\n\
             implementation group: 'a', name: 'd', version: dVersion\r\n\
             implementation(group: 'a', name: 'e', version: '2.0')";
        let found = patterns().libraries(text);
        let coords: Vec<_> = found
            .iter()
            .map(|m| (m.name, m.version.as_deref()))
            .collect();
        assert_eq!(coords, vec![("d", Some("$dVersion")), ("e", Some("2.0"))]);
    }

    #[test]
    fn plugin_declarations_are_matched() {
        let text = r#"
plugins {
    id("org.jetbrains.kotlin.jvm") version "1.9.0"
    id 'com.diffplug.spotless' version '6.25.0' apply false
    id("io.gitlab.arturbosch.detekt") version("$detektVersion")
    id("java")
}
"#;
        let found = patterns().plugins(text);
        let ids: Vec<_> = found.iter().map(|m| (m.id, m.version)).collect();
        assert_eq!(
            ids,
            vec![
                ("org.jetbrains.kotlin.jvm", "1.9.0"),
                ("com.diffplug.spotless", "6.25.0"),
                ("io.gitlab.arturbosch.detekt", "$detektVersion"),
            ]
        );
        assert_eq!(found[0].lead, " ");
    }

    #[test]
    fn configuration_table_limits_matches() {
        let only_api = Patterns::new(&Configurations::new(["api"])).unwrap();
        let text = r#"
            api("foo:bar:1.0")
            implementation("foo:baz:1.0")
        "#;
        let found = only_api.libraries(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "bar");
    }

    #[test]
    fn already_embedded_references_do_not_match() {
        let text = r#"
            implementation(libs.foo.bar)
            implementation(variantOf(libs.org.lwjgl.lwjgl) { classifier("natives-linux") })
            alias(libs.plugins.org.jetbrains.kotlin.jvm)
        "#;
        assert!(patterns().libraries(text).is_empty());
        assert!(patterns().plugins(text).is_empty());
    }

    #[test]
    fn variable_assignment_only_matches_requested_names() {
        let re = variable_assignment(&["fooVersion"]).unwrap();
        let text = r#"
            val fooVersion = "1.0"
            val barVersion = "2.0"
        "#;
        let caps: Vec<_> = re
            .captures_iter(text)
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect();
        assert_eq!(caps, vec![("fooVersion".to_string(), "1.0".to_string())]);
    }

    #[test]
    fn property_assignment_reads_unquoted_values() {
        let re = property_assignment(&["kotlinVersion", "ktor.version"]).unwrap();
        let text = "kotlinVersion=1.9.0\nktor.version = 2.3.7  \nktorXversion=0\n";
        let caps: Vec<_> = re
            .captures_iter(text)
            .map(|c| (c[1].to_string(), c[2].trim().to_string()))
            .collect();
        assert_eq!(
            caps,
            vec![
                ("kotlinVersion".to_string(), "1.9.0".to_string()),
                ("ktor.version".to_string(), "2.3.7".to_string()),
            ]
        );
    }

    #[test]
    fn assignment_matchers_need_names() {
        assert!(variable_assignment(&[]).is_err());
        assert!(property_assignment(&[]).is_err());
    }
}
