//! `{name}` placeholder templates.
//!
//! Syntax follows the usual format-string rules: `{name}` is a placeholder,
//! `{{` and `}}` are literal braces. Anything else involving a brace is a
//! syntax error, reported with the byte offset of the offending brace.
//! Format specs and conversions (`{x:>5}`, `{x!r}`) are not supported and
//! are rejected at the `:` or `!`.

use std::collections::HashMap;

use crate::errors::AskError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	Literal(String),
	Placeholder(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
	Normal,
	PossibleOpen,
	InKey,
	PossibleClose,
}

pub fn parse(template: &str) -> Result<Vec<Segment>, AskError> {
	let mut segments = Vec::new();
	let mut state = State::Normal;
	let mut literal = String::new();
	let mut current_key = String::new();
	let mut brace_at = 0;

	for (pos, ch) in template.char_indices() {
		match state {
			State::Normal => {
				match ch {
					'{' => {
						brace_at = pos;
						state = State::PossibleOpen;
					}
					'}' => {
						brace_at = pos;
						state = State::PossibleClose;
					}
					_ => literal.push(ch),
				}
			}
			State::PossibleOpen => {
				match ch {
					'{' => {
						literal.push('{');
						state = State::Normal;
					}
					'}' | ':' | '!' => return Err(AskError::syntax(brace_at, "empty placeholder name")),
					_ => {
						if !literal.is_empty() {
							segments.push(Segment::Literal(std::mem::take(&mut literal)));
						}
						current_key.clear();
						current_key.push(ch);
						state = State::InKey;
					}
				}
			}
			State::InKey => {
				match ch {
					'}' => {
						segments.push(Segment::Placeholder(std::mem::take(&mut current_key)));
						state = State::Normal;
					}
					'{' => return Err(AskError::syntax(pos, "'{' inside placeholder name")),
					':' | '!' => {
						return Err(AskError::syntax(pos, format!("format spec or conversion after '{}' is not supported", current_key)));
					}
					_ => current_key.push(ch),
				}
			}
			State::PossibleClose => {
				if ch == '}' {
					literal.push('}');
					state = State::Normal;
				} else {
					return Err(AskError::syntax(brace_at, "single '}' outside a placeholder (use '}}')"));
				}
			}
		}
	}

	match state {
		State::Normal => {}
		State::PossibleOpen | State::InKey => {
			return Err(AskError::syntax(brace_at, "unmatched '{'"));
		}
		State::PossibleClose => {
			return Err(AskError::syntax(brace_at, "single '}' outside a placeholder (use '}}')"));
		}
	}

	if !literal.is_empty() {
		segments.push(Segment::Literal(literal));
	}
	Ok(segments)
}

fn distinct_names(segments: &[Segment]) -> Vec<String> {
	let mut names: Vec<String> = Vec::new();
	for segment in segments {
		if let Segment::Placeholder(name) = segment {
			if !names.iter().any(|n| n == name) {
				names.push(name.clone());
			}
		}
	}
	names
}

/// Distinct placeholder names in order of first appearance.
#[allow(dead_code)]
pub fn placeholders(template: &str) -> Result<Vec<String>, AskError> {
	Ok(distinct_names(&parse(template)?))
}

/// Asks once per distinct placeholder, then substitutes every occurrence.
///
/// The template is parsed before `ask` is called, so a malformed template
/// never prompts. An error from `ask` (typically `UserCancelled`) stops the
/// fill and is returned unchanged.
pub fn fill<F>(template: &str, mut ask: F) -> Result<String, AskError>
where
	F: FnMut(&str) -> Result<String, AskError>,
{
	let segments = parse(template)?;
	let mut processor = TemplateProcessor::new();
	for name in distinct_names(&segments) {
		log::debug!("asking for placeholder '{}'", name);
		let value = ask(&name)?;
		processor.add_replacement(name, value);
	}
	processor.render(&segments)
}

#[derive(Default)]
pub struct TemplateProcessor {
	replacements: HashMap<String, String>,
}

impl TemplateProcessor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_replacement(&mut self, key: String, value: String) {
		self.replacements.insert(key, value);
	}

	#[allow(dead_code)]
	pub fn process_template(&self, template: &str) -> Result<String, AskError> {
		self.render(&parse(template)?)
	}

	pub fn render(&self, segments: &[Segment]) -> Result<String, AskError> {
		let mut output = String::new();
		for segment in segments {
			match segment {
				Segment::Literal(text) => output.push_str(text),
				Segment::Placeholder(name) => {
					let value = self.replacements.get(name).ok_or_else(|| AskError::MissingValue(name.clone()))?;
					output.push_str(value);
				}
			}
		}
		Ok(output)
	}
}
