use std::collections::HashMap;
use std::fs;
use std::path::Path;
use serde_yaml::{Mapping, Value};

use crate::errors::AskError;

pub const FREETEXT: &str = "freetext";

/// Named prompt templates, in the order they appear in the prompts file.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
	names: Vec<String>,
	templates: HashMap<String, String>,
}

impl TemplateCatalog {
	pub fn load(path: &Path) -> Result<Self, AskError> {
		let content = fs::read_to_string(path).map_err(|e| AskError::config_load(path, e.to_string()))?;
		let catalog = Self::parse(&content).map_err(|reason| AskError::config_load(path, reason))?;
		log::debug!("loaded {} templates from {}", catalog.len(), path.display());
		Ok(catalog)
	}

	#[allow(dead_code)]
	pub fn from_yaml_str(content: &str) -> Result<Self, AskError> {
		Self::parse(content).map_err(|reason| AskError::config_load("<inline>", reason))
	}

	fn parse(content: &str) -> Result<Self, String> {
		let document: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
		let mapping: Mapping = match document {
			Value::Mapping(mapping) => mapping,
			Value::Null => return Err("file is empty".to_string()),
			_ => return Err("top level must be a mapping of task names to templates".to_string()),
		};

		let mut catalog = TemplateCatalog::default();
		for (key, value) in mapping {
			let name = match key {
				Value::String(name) => name,
				other => return Err(format!("task name {:?} is not a string", other)),
			};
			let template = match value {
				Value::String(template) => template,
				other => return Err(format!("template for '{}' is not a string: {:?}", name, other)),
			};
			catalog.names.push(name.clone());
			catalog.templates.insert(name, template);
		}
		Ok(catalog)
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.templates.get(name).map(String::as_str)
	}

	pub fn names(&self) -> &[String] {
		&self.names
	}

	/// Task names for the selection menu; `freetext` is always offered.
	pub fn choices(&self) -> Vec<String> {
		let mut choices = self.names().to_vec();
		if !self.templates.contains_key(FREETEXT) {
			choices.push(FREETEXT.to_string());
		}
		choices
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}
