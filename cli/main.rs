//! This module contains the main entrypoint to the explorer cli.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use explorer_core::{
	chart::ChartKind,
	dataframe::FromCsvOptions,
	session::{PREVIEW_ROWS_DEFAULT, PREVIEW_ROWS_MAX, PREVIEW_ROWS_MIN},
	ChartError, ChartRequest, Config, Session,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod report;

#[derive(Parser)]
#[command(
	name = "explorer",
	about = "Profile a csv file and describe charts of its numeric columns.",
	disable_help_subcommand = true
)]
struct Options {
	/// log debug messages to stderr
	#[arg(short, long, global = true)]
	verbose: bool,
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// print basic information, a preview, column information and descriptive statistics
	Profile(ProfileOptions),
	/// print the specification of a chart as json
	Chart(ChartOptions),
	/// write the loaded data back out as csv
	Export(ExportOptions),
}

#[derive(clap::Args, Debug)]
struct ProfileOptions {
	/// the path to your .csv file
	#[arg(short, long)]
	file: PathBuf,
	/// the path to a config file
	#[arg(short, long)]
	config: Option<PathBuf>,
	/// the number of rows to preview, between 5 and 50
	#[arg(short, long)]
	rows: Option<usize>,
	/// print the profile report as json
	#[arg(long)]
	json: bool,
}

#[derive(clap::Args, Debug)]
struct ChartOptions {
	/// the path to your .csv file
	#[arg(short, long)]
	file: PathBuf,
	/// histogram, box-plot, scatter-plot or correlation-heatmap
	#[arg(short, long)]
	kind: ChartKind,
	/// a column to chart, repeat for a scatter plot's x and y columns
	#[arg(long = "column")]
	columns: Vec<String>,
	/// the path to a config file
	#[arg(short, long)]
	config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct ExportOptions {
	/// the path to your .csv file
	#[arg(short, long)]
	file: PathBuf,
	/// the path to write the .csv file to
	#[arg(short, long)]
	output: Option<PathBuf>,
	/// the path to a config file
	#[arg(short, long)]
	config: Option<PathBuf>,
}

fn main() {
	let options = Options::parse();
	init_tracing(options.verbose);
	let result = match options.command {
		Command::Profile(options) => cli_profile(options),
		Command::Chart(options) => cli_chart(options),
		Command::Export(options) => cli_export(options),
	};
	if let Err(error) = result {
		eprintln!("{}: {:#}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

fn init_tracing(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn cli_profile(options: ProfileOptions) -> Result<()> {
	let config = load_config(options.config.as_deref())?;
	let session = load_session(&options.file, config.as_ref())?;
	let report = session.profile();
	if options.json {
		println!("{}", serde_json::to_string_pretty(&report)?);
		return Ok(());
	}
	let rows = options
		.rows
		.or_else(|| config.as_ref().and_then(|config| config.preview_rows))
		.unwrap_or(PREVIEW_ROWS_DEFAULT);
	if !(PREVIEW_ROWS_MIN..=PREVIEW_ROWS_MAX).contains(&rows) {
		tracing::warn!(
			rows,
			"the preview size must be between {} and {}",
			PREVIEW_ROWS_MIN,
			PREVIEW_ROWS_MAX
		);
	}
	println!("{}", report::basic_information(&report));
	println!("{}", "Data Preview".bold());
	println!("{}", report::preview_table(&session.preview(rows))?);
	println!("{}", "Column Information".bold());
	println!("{}", report::column_info_table(&report)?);
	println!("{}", "Statistical Summary".bold());
	match report.numeric_summary.as_deref() {
		Some(summaries) => println!("{}", report::describe_table(summaries)?),
		None => println!("{}", report::NO_NUMERIC_COLUMNS_MESSAGE),
	}
	Ok(())
}

fn cli_chart(options: ChartOptions) -> Result<()> {
	let config = load_config(options.config.as_deref())?;
	let session = load_session(&options.file, config.as_ref())?;
	let request = ChartRequest {
		kind: options.kind,
		columns: options.columns,
	};
	match session.chart(&request) {
		Ok(spec) => {
			println!("{}", serde_json::to_string_pretty(&spec)?);
			Ok(())
		}
		// There is nothing to draw, but the request itself was fine.
		Err(ChartError::InsufficientData(message)) => {
			eprintln!("{}: {}", "info".blue().bold(), message);
			Ok(())
		}
		Err(error) => Err(error.into()),
	}
}

fn cli_export(options: ExportOptions) -> Result<()> {
	let config = load_config(options.config.as_deref())?;
	let session = load_session(&options.file, config.as_ref())?;
	let export = session.export()?;
	// Retrieve the output path from the command line arguments or generate a default.
	let output_path = match options.output {
		Some(output) => output,
		None => {
			let dir = std::env::current_dir()?;
			let (name, extension) = export
				.file_name
				.rsplit_once('.')
				.unwrap_or((export.file_name, "csv"));
			available_path(&dir, name, extension)?
		}
	};
	std::fs::write(&output_path, &export.bytes)
		.with_context(|| format!("failed to write {}", output_path.display()))?;
	eprintln!("Your data was written to {}.", output_path.display());
	Ok(())
}

fn load_config(config_path: Option<&Path>) -> Result<Option<Config>> {
	if let Some(config_path) = config_path {
		let config = std::fs::read_to_string(config_path)
			.with_context(|| format!("failed to read config file {}", config_path.display()))?;
		let config = serde_yaml::from_str(&config)
			.with_context(|| format!("failed to parse config file {}", config_path.display()))?;
		Ok(Some(config))
	} else {
		Ok(None)
	}
}

fn load_session(file_path: &Path, config: Option<&Config>) -> Result<Session> {
	let options = match config {
		Some(config) => config.to_options()?,
		None => FromCsvOptions::default(),
	};
	let extension = match file_path.extension().and_then(|extension| extension.to_str()) {
		Some(extension) => extension,
		None => bail!("{} has no file extension", file_path.display()),
	};
	let bytes = std::fs::read(file_path)
		.with_context(|| format!("failed to read {}", file_path.display()))?;
	let session = Session::load(&bytes, extension, options)
		.with_context(|| format!("failed to load {}", file_path.display()))?;
	Ok(session)
}

/// This function checks if a file with the given name and extension already exists in the directory `dir`, and if it does, it appends " 1", " 2", etc. to it until it finds a name that will not overwrite an existing file.
fn available_path(dir: &Path, name: &str, extension: &str) -> Result<PathBuf> {
	let mut i = 0;
	loop {
		let mut path = PathBuf::from(dir);
		let mut filename = String::new();
		filename.push_str(name);
		if i > 0 {
			filename.push(' ');
			filename.push_str(&i.to_string());
		}
		filename.push('.');
		filename.push_str(extension);
		path.push(filename);
		match std::fs::metadata(&path) {
			// If a file at the path does not exist, return the path.
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
				return Ok(path);
			}
			Err(error) => return Err(error.into()),
			// If a file at the path exists, try the next number.
			Ok(_) => {
				i += 1;
				continue;
			}
		}
	}
}
