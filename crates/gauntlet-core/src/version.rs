use std::fmt::Write;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build profile the workloads were compiled with.
#[must_use]
pub fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

/// Returns a formatted version string including build metadata if available.
#[must_use]
pub fn version_string() -> String {
    let mut s = format!("gauntlet {VERSION}");

    if let Some(hash) = option_env!("GAUNTLET_BUILD_GIT_HASH") {
        let _ = write!(s, " ({hash})");
    }

    let _ = write!(s, " [{}]", build_profile());
    s
}
