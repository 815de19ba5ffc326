//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports ergonomic helpers for config loading,
//! boundary validation, and time.
//!
//! ## Config loading
//! ```rust,ignore
//! use phub_kernel::config::load_config;
//! use phub_kernel::domain::config::EngineConfig;
//!
//! let cfg: EngineConfig = load_config(Some("phub.toml")).unwrap_or_default();
//! ```
//!
//! ## Validation
//! ```rust
//! use phub_kernel::validation::InputGuard;
//!
//! let code = InputGuard::postal_code(" 110001 ").unwrap();
//! assert_eq!(code.as_str(), "110001");
//! assert!(InputGuard::postal_code("11001").is_err());
//! ```
pub mod clock;
pub mod config;
pub mod error;
pub mod validation;

pub use error::{KernelError, KernelErrorExt};
pub use phub_domain as domain;
