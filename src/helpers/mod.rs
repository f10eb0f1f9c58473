use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::env;
use std::string;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HelperError {
	#[error("IO error: {0}")]
	Io(#[from] io::Error),
	#[error("Serde error: {0}")]
	Serde(#[from] serde_json::Error),
	#[error("FromUtf8 error: {0}")]
	FromUtf8Error(#[from] string::FromUtf8Error),
	#[error("Other Error {0}")]
	FromString(String),
}

impl HelperError {
	pub fn msg<M: Into<String>>(msg: M) -> Self {
		HelperError::FromString(msg.into())
	}
}

/// Resolve `$XDG_CONFIG_HOME/<name>`, falling back to `$HOME/.config/<name>`.
pub fn config_get_dir(name: Option<&str>) -> Result<PathBuf, HelperError> {
	config_get_dir_with(name, |key| env::var(key).ok())
}

pub fn config_get_dir_with<F>(name: Option<&str>, lookup: F) -> Result<PathBuf, HelperError>
where
	F: Fn(&str) -> Option<String>,
{
	let mut pb = if let Some(config_home) = lookup("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
		PathBuf::from(config_home)
	} else if let Some(home) = lookup("HOME") {
		let mut config_home = PathBuf::from(home);
		config_home.push(".config");
		config_home
	} else {
		return Err(HelperError::msg("XDG_CONFIG_HOME or HOME not found"));
	};
	if let Some(app_name) = name {
		pb.push(app_name);
	}
	log::debug!("config dir: {}", pb.display());
	Ok(pb)
}

/// Read an API key from a file, ignoring surrounding whitespace.
pub fn read_api_key_file(file_path: impl AsRef<Path>) -> Result<String, HelperError> {
	let content = fs::read_to_string(file_path.as_ref())?;
	let key = content.trim();
	if key.is_empty() {
		return Err(HelperError::msg(format!("{} is empty", file_path.as_ref().display())));
	}
	Ok(key.to_string())
}

pub fn save_to_json<T: Serialize>(file_path: impl AsRef<Path>, object: &T) -> Result<(), HelperError> {
	let serialised = serde_json::to_string_pretty(&object)?;
	let mut file = OpenOptions::new()
		.read(true)
		.write(true)
		.create(true)
		.truncate(true)
		.open(file_path.as_ref())?;
	writeln!(file, "{}", &serialised)?;
	Ok(())
}
