use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use std::env;

mod catalog;
mod errors;
mod helpers;
mod openaiapi;
mod prompter;
mod session;
mod template;


use catalog::TemplateCatalog;
use errors::AskError;
use openaiapi::{ApiEndpoint, CompletionClient};
use prompter::TermPrompter;
use session::SessionOptions;

const PROMPTS_FILE: &str = "prompts.yaml";
const EXIT_FAILURE: u8 = 1;
const EXIT_CANCELLED: u8 = 130;

#[derive(Parser)]
#[clap(name = "askgpt", about = "Fill in a prompt template and send it to a completion API")]
struct Cli {
	/// Task to run (skips the menu; use "freetext" to type the whole prompt)
	task: Option<String>,
	#[clap(long)]
	/// prompts file (default: ./prompts.yaml, then $XDG_CONFIG_HOME/askgpt/prompts.yaml)
	prompts: Option<PathBuf>,
	#[clap(long, default_value = "apikey.file")]
	/// file holding the API key, used when OPENAI_API_KEY is not set
	api_key_file: PathBuf,
	#[clap(long, default_value = "120", value_parser = clap::value_parser!(u64).range(1..))]
	/// seconds to wait for the completion service (at least 1)
	timeout_secs: u64,
	#[clap(long, default_value = "false")]
	/// write last_request.json and last_response.json to the current directory
	write_req_resp: bool,
	#[clap(long)]
	/// print the filled prompt, do not perform an API call
	no_network: bool,
	#[clap(short, long)]
	verbose: bool,
}

fn setup_logging(verbose: bool) {
	let level = if verbose { "debug" } else { "warn" };
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
		.format_timestamp(None)
		.init();
}

fn resolve_prompts_path(explicit: Option<PathBuf>) -> PathBuf {
	if let Some(path) = explicit {
		return path;
	}
	let local = PathBuf::from(PROMPTS_FILE);
	if local.exists() {
		return local;
	}
	match helpers::config_get_dir(Some("askgpt")) {
		Ok(dir) => dir.join(PROMPTS_FILE),
		Err(_) => local,
	}
}

fn build_client(api_key_file: &Path, timeout_secs: u64, write_req_resp: bool) -> Result<CompletionClient, AskError> {
	build_client_with(|key| env::var(key).ok(), api_key_file, timeout_secs, write_req_resp)
}

fn build_client_with<F>(lookup: F, api_key_file: &Path, timeout_secs: u64, write_req_resp: bool) -> Result<CompletionClient, AskError>
where
	F: Fn(&str) -> Option<String>,
{
	let endpoint = ApiEndpoint::resolve(lookup, api_key_file)?;
	log::debug!("using endpoint {:?}", endpoint);
	let mut client = CompletionClient::new(endpoint, Duration::from_secs(timeout_secs))?;
	if write_req_resp {
		client.dump_dir = Some(PathBuf::from("."));
	}
	Ok(client)
}

async fn run(args: Cli) -> Result<String, AskError> {
	let prompts_path = resolve_prompts_path(args.prompts);
	log::debug!("prompts file: {}", prompts_path.display());
	let catalog = TemplateCatalog::load(&prompts_path)?;
	if catalog.is_empty() {
		log::warn!("{} defines no templates, only freetext is available", prompts_path.display());
	}

	let client = if args.no_network {
		None
	} else {
		Some(build_client(&args.api_key_file, args.timeout_secs, args.write_req_resp)?)
	};

	let options = SessionOptions { task: args.task };
	let mut prompter = TermPrompter::new();
	session::run_session(&catalog, &mut prompter, client.as_ref(), &options).await
}

fn exit_status(err: &AskError) -> u8 {
	if err.is_cancelled() {
		EXIT_CANCELLED
	} else {
		EXIT_FAILURE
	}
}

fn failure_message(err: &AskError) -> String {
	if err.is_cancelled() {
		"Cancelled.".to_string()
	} else {
		format!("askgpt: {}", err)
	}
}

#[tokio::main]
async fn main() -> ExitCode {
	let args = Cli::parse();
	setup_logging(args.verbose);

	match run(args).await {
		Ok(response) => {
			println!("{}", response);
			ExitCode::SUCCESS
		}
		Err(err) => {
			eprintln!("{}", failure_message(&err));
			ExitCode::from(exit_status(&err))
		}
	}
}
