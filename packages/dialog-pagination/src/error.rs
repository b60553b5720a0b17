pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Unknown order field: {name}.")]
	UnknownField { name: String },
	#[error("Duplicate order field: {name}.")]
	DuplicateField { name: String },
	#[error("Invalid order segment: {raw}.")]
	InvalidSegment { raw: String },
	#[error("Continuation token is not valid base64.")]
	TokenBase64,
	#[error("Continuation token payload is not valid JSON.")]
	TokenJson,
	#[error("Unsupported continuation token version: {version}.")]
	TokenVersion { version: u8 },
	#[error("Continuation token key count does not match the order set.")]
	TokenKeyCount,
	#[error("Continuation token order does not match the requested order.")]
	OrderMismatch,
	#[error("Continuation token key {index} is not a valid {expected}.")]
	TokenKeyValue { index: usize, expected: &'static str },
}
