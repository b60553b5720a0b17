use dialog_domain::ValidationIssue;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String, fields: Vec<String> },
	#[error("Forbidden: {message}")]
	Forbidden { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Upstream error: {message}")]
	Upstream { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}

impl Error {
	pub fn invalid(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into(), fields: Vec::new() }
	}

	pub fn not_found(message: impl Into<String>) -> Self {
		Self::NotFound { message: message.into() }
	}

	pub fn conflict(message: impl Into<String>) -> Self {
		Self::Conflict { message: message.into() }
	}

	pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
		Self::InvalidRequest {
			message: "Validation failed.".to_string(),
			fields: issues
				.into_iter()
				.map(|issue| format!("{}: {}", issue.field, issue.message))
				.collect(),
		}
	}
}

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<dialog_storage::Error> for Error {
	fn from(err: dialog_storage::Error) -> Self {
		match err {
			dialog_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			dialog_storage::Error::Json(inner) => Self::Storage { message: inner.to_string() },
			dialog_storage::Error::InvalidArgument(message) => {
				Self::InvalidRequest { message, fields: Vec::new() }
			},
			dialog_storage::Error::NotFound(message) => Self::NotFound { message },
			dialog_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}

impl From<dialog_pagination::Error> for Error {
	fn from(err: dialog_pagination::Error) -> Self {
		Self::InvalidRequest { message: err.to_string(), fields: Vec::new() }
	}
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Upstream { message: err.to_string() }
	}
}
