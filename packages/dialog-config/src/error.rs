pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures while loading or validating the service configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read config file at {path:?}.")]
	Read { path: std::path::PathBuf, source: std::io::Error },
	#[error("Config file at {path:?} is not valid TOML.")]
	Parse { path: std::path::PathBuf, source: toml::de::Error },
	#[error("Invalid config: {field} {requirement}.")]
	Invalid { field: &'static str, requirement: &'static str },
}

impl Error {
	pub fn invalid(field: &'static str, requirement: &'static str) -> Self {
		Self::Invalid { field, requirement }
	}
}
