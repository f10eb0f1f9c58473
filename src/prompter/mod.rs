use std::io::ErrorKind;
use dialoguer::{Error as DialoguerError, Input, Select};

use crate::errors::AskError;

/// Interactive input. Both calls return `UserCancelled` when the user aborts.
pub trait Prompter {
	fn select_one(&mut self, prompt: &str, options: &[String]) -> Result<String, AskError>;
	fn ask_text(&mut self, label: &str) -> Result<String, AskError>;
}

#[derive(Default)]
pub struct TermPrompter;

impl TermPrompter {
	pub fn new() -> Self {
		TermPrompter
	}
}

pub(crate) fn map_dialoguer_error(err: DialoguerError) -> AskError {
	match err {
		DialoguerError::IO(err) if err.kind() == ErrorKind::Interrupted => AskError::UserCancelled,
		err => AskError::Config(format!("terminal input failed: {}", err)),
	}
}

impl Prompter for TermPrompter {
	fn select_one(&mut self, prompt: &str, options: &[String]) -> Result<String, AskError> {
		if options.is_empty() {
			return Err(AskError::Config("nothing to choose from".to_string()));
		}
		let selection = Select::new()
			.with_prompt(prompt)
			.items(options)
			.default(0)
			.interact_opt()
			.map_err(map_dialoguer_error)?;
		match selection {
			Some(index) => Ok(options[index].clone()),
			None => Err(AskError::UserCancelled),
		}
	}

	fn ask_text(&mut self, label: &str) -> Result<String, AskError> {
		Input::<String>::new()
			.with_prompt(label)
			.allow_empty(true)
			.interact_text()
			.map_err(map_dialoguer_error)
	}
}
