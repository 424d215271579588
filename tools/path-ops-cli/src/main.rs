use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fern::colors::{Color, ColoredLevelConfig};
use path_bool::{BooleanError, FillRule, PathBooleanOperation, path_from_path_data, path_to_path_data};
use path_ops_editor::consts::{SIMPLIFY_JUST_COALESCE_PREFERENCE, SIMPLIFY_THRESHOLD_PREFERENCE};
use path_ops_editor::history::{StatusLog, UndoHistory};
use path_ops_editor::preferences::MemoryPreferences;
use path_ops_editor::utility_traits::SelectionDocument;
use path_ops_editor::{BooleanCommand, EditorContext, ItemId, MemoryDocument, PathItem, SimplifyCommand};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "path-ops")]
#[command(about = "Combine or simplify SVG path data")]
struct Args {
	/// Log everything down to trace level
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Fold a boolean operation over the given paths, in order
	Boolean {
		/// union, intersection, difference or xor
		#[arg(value_parser = parse_operation)]
		operation: PathBooleanOperation,

		/// SVG path data of each operand
		#[arg(required = true, num_args = 1..)]
		paths: Vec<String>,

		/// Fill rule of every operand
		#[arg(short, long, default_value = "nonzero", value_parser = parse_fill_rule)]
		fill_rule: FillRule,
	},
	/// Simplify each path, relative to the size of all of them together
	Simplify {
		/// SVG path data of each path
		#[arg(required = true, num_args = 1..)]
		paths: Vec<String>,

		/// JSON file of preferences keyed by preference path
		#[arg(short, long)]
		preferences: Option<PathBuf>,

		/// Tolerance as a fraction of the selection size
		#[arg(short, long)]
		threshold: Option<f64>,

		/// Only merge nearly straight segments
		#[arg(long)]
		just_coalesce: bool,

		/// Run the command this many times in quick succession
		#[arg(short, long, default_value_t = 1)]
		repeat: usize,
	},
}

fn parse_operation(value: &str) -> Result<PathBooleanOperation, BooleanError> {
	value.parse()
}

fn parse_fill_rule(value: &str) -> Result<FillRule, BooleanError> {
	value.parse()
}

fn setup_logging(verbose: bool) -> Result<()> {
	let colors = ColoredLevelConfig::new().debug(Color::Magenta).info(Color::Green).error(Color::Red);
	fern::Dispatch::new()
		.chain(std::io::stderr())
		.level(if verbose { log::LevelFilter::Trace } else { log::LevelFilter::Info })
		.format(move |out, message, record| {
			out.finish(format_args!(
				"[{}]{} {}",
				// This will color the log level only, not the whole line. Just a touch.
				colors.color(record.level()),
				chrono::Utc::now().format("[%Y-%m-%d %H:%M:%S]"),
				message
			))
		})
		.apply()
		.context("Failed to install the logger")
}

/// A document holding one path item per argument, all of them selected.
fn document_from_arguments(paths: &[String], fill_rule: FillRule) -> Result<(MemoryDocument, Vec<ItemId>)> {
	let mut document = MemoryDocument::new();
	let mut ids = Vec::with_capacity(paths.len());
	for (index, data) in paths.iter().enumerate() {
		let path = path_from_path_data(data).with_context(|| format!("Failed to parse path {}", index + 1))?;
		ids.push(document.add_path_item(PathItem::new(path, fill_rule)));
	}
	document.set_selection(&ids);
	Ok((document, ids))
}

fn print_paths(document: &MemoryDocument, ids: &[ItemId]) {
	for &id in ids {
		if let Some(item) = document.path_item(id) {
			println!("{}", path_to_path_data(&item.path));
		}
	}
}

fn main() -> Result<()> {
	let args = Args::parse();
	setup_logging(args.verbose)?;

	let mut preferences = MemoryPreferences::default();
	let mut undo = UndoHistory::default();
	let mut status = StatusLog::default();

	match args.command {
		Command::Boolean { operation, paths, fill_rule } => {
			let (mut document, _) = document_from_arguments(&paths, fill_rule)?;
			let mut context = EditorContext {
				document: &mut document,
				preferences: &preferences,
				undo: &mut undo,
				status: &mut status,
			};
			let created = BooleanCommand::new(operation).execute(&mut context, false)?;
			if let Some(id) = created {
				print_paths(&document, &[id]);
			}
		}
		Command::Simplify {
			paths,
			preferences: preferences_file,
			threshold,
			just_coalesce,
			repeat,
		} => {
			if let Some(file) = preferences_file {
				let json = std::fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))?;
				preferences = MemoryPreferences::from_json(&json)?;
			}
			if let Some(threshold) = threshold {
				preferences.set_double(SIMPLIFY_THRESHOLD_PREFERENCE, threshold);
			}
			if just_coalesce {
				preferences.set_bool(SIMPLIFY_JUST_COALESCE_PREFERENCE, true);
			}

			let (mut document, ids) = document_from_arguments(&paths, FillRule::NonZero)?;
			let mut command = SimplifyCommand::default();
			for _ in 0..repeat {
				let mut context = EditorContext {
					document: &mut document,
					preferences: &preferences,
					undo: &mut undo,
					status: &mut status,
				};
				command.execute(&mut context, Instant::now(), false)?;
			}
			print_paths(&document, &ids);
		}
	}

	log::debug!("Committed {:?}, cancelled {}", undo.committed, undo.cancelled);
	Ok(())
}
