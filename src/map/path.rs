use std::fmt;

use crate::map::{MapError, Result};

/// One step in a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
	/// Select a named record field.
	Field(String),
	/// Select a sequence element by zero-based index.
	Index(usize),
	/// Select a mapping entry by arbitrary key.
	Key(String),
}

/// Location inside a value or document, rendered as `$.a.b[0]["key"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
	/// Ordered sequence of path steps.
	pub steps: Vec<PathStep>,
}

impl FieldPath {
	/// Empty path pointing at the document root.
	pub fn root() -> Self {
		Self::default()
	}

	/// Parse dotted field syntax with `[index]` and `["key"]` selectors.
	///
	/// A leading `$` is accepted; `$` alone is the root. Quoted keys use JSON string escapes,
	/// so every rendered path parses back to the same steps.
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = || MapError::InvalidFieldPath { path: input.to_owned() };
		let (body, mut want_field) = match input.strip_prefix('$') {
			Some(rest) => (rest, false),
			None => (input, true),
		};

		let bytes = body.as_bytes();
		let mut idx = 0_usize;
		let mut steps = Vec::new();

		while idx < bytes.len() {
			if want_field {
				let start = idx;
				while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'_' || bytes[idx] == b'-') {
					idx += 1;
				}
				if idx == start {
					return Err(invalid());
				}
				steps.push(PathStep::Field(body[start..idx].to_owned()));
				want_field = false;
				continue;
			}

			match bytes[idx] {
				b'.' => {
					idx += 1;
					want_field = true;
				}
				b'[' => {
					idx += 1;
					if idx < bytes.len() && bytes[idx] == b'"' {
						let start = idx;
						idx += 1;
						while idx < bytes.len() && bytes[idx] != b'"' {
							if bytes[idx] == b'\\' {
								idx += 1;
							}
							idx += 1;
						}
						if idx >= bytes.len() {
							return Err(invalid());
						}
						idx += 1;
						let key: String = serde_json::from_str(&body[start..idx]).map_err(|_| invalid())?;
						steps.push(PathStep::Key(key));
					} else {
						let start = idx;
						while idx < bytes.len() && bytes[idx].is_ascii_digit() {
							idx += 1;
						}
						if idx == start {
							return Err(invalid());
						}
						let number = body[start..idx].parse::<usize>().map_err(|_| invalid())?;
						steps.push(PathStep::Index(number));
					}
					if idx >= bytes.len() || bytes[idx] != b']' {
						return Err(invalid());
					}
					idx += 1;
				}
				_ => return Err(invalid()),
			}
		}

		if want_field {
			return Err(invalid());
		}
		Ok(Self { steps })
	}

	/// Number of steps below the root.
	pub fn depth(&self) -> usize {
		self.steps.len()
	}

	pub(crate) fn push(&mut self, step: PathStep) {
		self.steps.push(step);
	}

	pub(crate) fn pop(&mut self) {
		self.steps.pop();
	}

	/// Render with a trailing field step without mutating the path.
	pub(crate) fn with_field(&self, name: &str) -> String {
		let mut out = self.to_string();
		out.push('.');
		out.push_str(name);
		out
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("$")?;
		for step in &self.steps {
			match step {
				PathStep::Field(name) => write!(f, ".{name}")?,
				PathStep::Index(index) => write!(f, "[{index}]")?,
				PathStep::Key(key) => match serde_json::to_string(key) {
					Ok(quoted) => write!(f, "[{quoted}]")?,
					Err(_) => write!(f, "[{key:?}]")?,
				},
			}
		}
		Ok(())
	}
}
