use crate::catalog::{TemplateCatalog, FREETEXT};
use crate::errors::AskError;
use crate::openaiapi::CompletionClient;
use crate::prompter::Prompter;
use crate::template;

#[derive(Debug, Default)]
pub struct SessionOptions {
	/// Run this task instead of showing the menu.
	pub task: Option<String>,
}

/// Builds the final prompt for the chosen task.
pub fn build_prompt<P: Prompter>(catalog: &TemplateCatalog, prompter: &mut P, task: &str) -> Result<String, AskError> {
	if task == FREETEXT {
		return prompter.ask_text("Ask GPT");
	}
	let template_text = catalog.get(task).ok_or_else(|| AskError::UnknownTask(task.to_string()))?;
	eprintln!("\nPrompt template: {}\n", template_text);
	template::fill(template_text, |name| prompter.ask_text(name))
}

/// One run: select, fill, complete. Without a client the filled prompt is
/// returned as is.
pub async fn run_session<P: Prompter>(
	catalog: &TemplateCatalog,
	prompter: &mut P,
	client: Option<&CompletionClient>,
	options: &SessionOptions,
) -> Result<String, AskError> {
	let task = match options.task.as_deref() {
		Some(task) => task.to_string(),
		None => prompter.select_one("What do you want to do?", &catalog.choices())?,
	};
	log::debug!("selected task '{}'", task);

	let prompt = build_prompt(catalog, prompter, &task)?;

	match client {
		Some(client) => {
			eprintln!("\nGenerating response....\n");
			client.complete(&prompt).await
		}
		None => Ok(prompt),
	}
}
