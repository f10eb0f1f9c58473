use std::path::PathBuf;
use thiserror::Error;

use crate::helpers::HelperError;

#[derive(Debug, Error)]
pub enum AskError {
	#[error("could not load templates from {}: {reason}", .path.display())]
	ConfigLoad { path: PathBuf, reason: String },
	#[error("malformed template at byte {position}: {reason}")]
	TemplateSyntax { position: usize, reason: String },
	#[error("no value supplied for placeholder '{0}'")]
	MissingValue(String),
	#[error("unknown task '{0}'")]
	UnknownTask(String),
	#[error("cancelled by user")]
	UserCancelled,
	#[error("completion service error: {0}")]
	CompletionService(String),
	#[error("configuration error: {0}")]
	Config(String),
	#[error(transparent)]
	Helper(#[from] HelperError),
}

impl AskError {
	pub fn config_load<R: Into<String>>(path: impl Into<PathBuf>, reason: R) -> Self {
		AskError::ConfigLoad { path: path.into(), reason: reason.into() }
	}

	pub fn syntax<R: Into<String>>(position: usize, reason: R) -> Self {
		AskError::TemplateSyntax { position, reason: reason.into() }
	}

	pub fn service<M: Into<String>>(msg: M) -> Self {
		AskError::CompletionService(msg.into())
	}

	pub fn is_cancelled(&self) -> bool {
		matches!(self, AskError::UserCancelled)
	}
}

impl From<reqwest::Error> for AskError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() {
			AskError::service(format!("request timed out: {}", err))
		} else {
			AskError::service(err.to_string())
		}
	}
}
