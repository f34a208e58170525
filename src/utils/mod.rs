/// Environment variable toggled by `--verbose`.
pub const VERBOSE_ENV: &str = "GVCGEN_VERBOSE";

pub fn verbose_enabled() -> bool {
    std::env::var(VERBOSE_ENV).is_ok()
}

/// Prints a `[VERBOSE]` diagnostic line to stderr when verbose output is on.
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::utils::verbose_enabled() {
            eprintln!("[VERBOSE] {}", format_args!($($arg)*));
        }
    };
}

pub(crate) use verbose;
