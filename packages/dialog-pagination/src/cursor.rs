use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::{
	Error, Result,
	order::{OrderSet, SortField},
};

const TOKEN_VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Wire {
	v: u8,
	k: Vec<Option<String>>,
	o: Vec<String>,
}

/// An opaque continuation token: the last row's key values plus the signed
/// order tokens they were produced under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken {
	pub keys: Vec<Option<String>>,
	pub order: Vec<String>,
}

impl ContinuationToken {
	pub fn new(keys: Vec<Option<String>>, order: Vec<String>) -> Self {
		Self { keys, order }
	}

	pub fn encode(&self) -> String {
		let wire =
			Wire { v: TOKEN_VERSION, k: self.keys.clone(), o: self.order.clone() };
		// Wire holds only strings and options; serialization cannot fail.
		let json = serde_json::to_vec(&wire).unwrap_or_default();

		URL_SAFE_NO_PAD.encode(json)
	}

	pub fn decode(raw: &str) -> Result<Self> {
		let bytes = URL_SAFE_NO_PAD.decode(raw.trim()).map_err(|_| Error::TokenBase64)?;
		let wire: Wire = serde_json::from_slice(&bytes).map_err(|_| Error::TokenJson)?;

		if wire.v != TOKEN_VERSION {
			return Err(Error::TokenVersion { version: wire.v });
		}

		Ok(Self { keys: wire.k, order: wire.o })
	}

	/// A token is only valid against the order set it was produced under.
	pub fn validate_against<F: SortField>(&self, order: &OrderSet<F>) -> Result<()> {
		if !order.matches_signed_tokens(&self.order) {
			return Err(Error::OrderMismatch);
		}
		if self.keys.len() != order.keys().len() {
			return Err(Error::TokenKeyCount);
		}

		Ok(())
	}
}
