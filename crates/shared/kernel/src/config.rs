use crate::error::{KernelError, KernelErrorExt};
use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info};

/// Prefix of environment overrides (`PHUB__PRICING__TAX_RATE=0.12`).
pub const ENV_PREFIX: &str = "PHUB";

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest precedence first:
/// 1. **Defaults**: whatever `T`'s `#[serde(default)]` impls provide.
/// 2. **File**: the given file (`.toml`, `.json`, `.yaml`, ... picked by extension). Required
///    when a path is passed, skipped otherwise.
/// 3. **Environment**: variables prefixed with `PHUB__`. Nested keys use double underscores
///    (`PHUB__BOOKING__ID_PREFIX` maps to `booking.id_prefix`).
///
/// # Errors
/// This function will return an error if:
/// * The given configuration file cannot be found or parsed.
/// * The merged content does not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use phub_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, KernelError>
where
    T: DeserializeOwned,
{
    build_config(path.as_ref().map(|p| p.as_ref()), None)
}

fn build_config<T>(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<T, KernelError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    if let Some(path) = path {
        info!("Loading config from {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    } else {
        debug!("No config file given, using defaults and environment");
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake)
                .source(env),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
