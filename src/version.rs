use std::sync::LazyLock;

/// Version of the software: the Cargo package version, suffixed with the git commit hash when
/// `DAGCORRECT_GIT_HASH` is set at build time.
pub static VERSION: LazyLock<String> = LazyLock::new(|| match option_env!("DAGCORRECT_GIT_HASH") {
    Some(hash) if !hash.is_empty() => format!("{}-{hash}", env!("CARGO_PKG_VERSION")),
    _ => env!("CARGO_PKG_VERSION").to_string(),
});
