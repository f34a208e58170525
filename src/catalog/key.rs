use heck::ToKebabCase;

/// Catalog key for a library, derived from `group.name`.
pub fn library_key(group: &str, name: &str) -> String {
    safe_key(&format!("{group}.{name}"))
}

/// Catalog key for a plugin, derived from its id.
pub fn plugin_key(id: &str) -> String {
    safe_key(id)
}

/// Accessor path used inside build scripts: `foo-bar-baz` → `foo.bar.baz`.
pub fn access_path(key: &str) -> String {
    key.replace('-', ".")
}

/// Normalizes an arbitrary string into a TOML-safe, kebab-case key.
///
/// Runs of characters outside `[A-Za-z0-9_-]` become a single hyphen, the
/// result is kebab-cased, and finally every hyphen directly followed by a
/// digit is dropped so that `runtime_2.12` turns into `runtime212` instead of
/// `runtime-2-12`. Total over any input.
pub fn safe_key(src: &str) -> String {
    let kebab = kebab_case(&replace_non_id_chars(src));
    drop_hyphens_before_digits(&kebab)
}

/// Kebab-cases `src` without treating a digit followed by an uppercase
/// letter as a word boundary (`HTTP2Client` → `http2client`).
///
/// `src` must be ASCII.
fn kebab_case(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut out = String::with_capacity(src.len() + 4);
    let mut start = 0;
    for i in 1..bytes.len() {
        if bytes[i - 1].is_ascii_digit() && bytes[i].is_ascii_uppercase() {
            out.push_str(&src[start..i].to_kebab_case());
            start = i;
        }
    }
    out.push_str(&src[start..].to_kebab_case());
    out
}

fn replace_non_id_chars(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut in_run = false;
    for c in src.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    out
}

fn drop_hyphens_before_digits(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' && chars.peek().is_some_and(char::is_ascii_digit) {
            continue;
        }
        out.push(c);
    }
    out
}
