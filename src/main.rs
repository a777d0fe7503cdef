#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	binary_embed::{
		config::EmbedConfig, embed, error::EmbedError, groupThousands, identifier, DEFAULT_OUTPUT,
	},
	clap::{value_parser, Parser},
	std::{
		panic,
		path::PathBuf,
		process::{self, ExitCode},
	},
};

const USAGE_EXAMPLES: &str = "\
Examples:
  binary_embed data.bin                    # Creates Buffer.embed
  binary_embed image.png image_data.embed  # Creates image_data.embed
  binary_embed -n my_data file.bin         # Uses 'g_my_data' as array name";

/// Convert binary files to C-style uint8_t arrays for embedding
#[derive(Parser)]
#[clap(name = "binary_embed", version, after_help = USAGE_EXAMPLES)]
struct Args {
	/// Input binary file to convert
	#[clap(value_parser)]
	inputFile: PathBuf,

	/// Output .embed filename
	#[clap(value_parser, default_value = DEFAULT_OUTPUT)]
	outputFile: PathBuf,

	/// Custom name for the array variable (default: derived from input filename)
	#[clap(short, long, value_parser)]
	name: Option<String>,

	/// Enable verbose output
	#[clap(short, long)]
	verbose: bool,

	/// Bytes per line in the array body
	#[clap(short, long, value_parser = value_parser!(u32).range(1..))]
	bytesPerLine: Option<u32>,

	/// TOML file with formatting settings
	#[clap(short, long, value_parser)]
	config: Option<PathBuf>,
}

fn main() -> ExitCode {
	ctrlc::set_handler(|| {
		eprintln!("\nOperation cancelled by user.");
		process::exit(1);
	})
	.unwrap_or_else(|err| eprintln!("Warning: cannot install interrupt handler: {err}"));

	let args = Args::parse();
	panic::set_hook(Box::new(|info| eprintln!("Unexpected error: {info}")));
	match panic::catch_unwind(move || run(args)) {
		Ok(Ok(())) => ExitCode::SUCCESS,
		Ok(Err(err)) => {
			eprintln!("Error: {err}");
			ExitCode::FAILURE
		}
		Err(_) => ExitCode::FAILURE,
	}
}

fn run(Args { inputFile, outputFile, name, verbose, bytesPerLine, config }: Args) -> Result<(), EmbedError> {
	let config = {
		let mut config = match config {
			Some(path) => EmbedConfig::fromTomlFile(&path)?,
			None => EmbedConfig::default(),
		};
		if let Some(bytesPerLine) = bytesPerLine {
			config.bytesPerLine = bytesPerLine as _;
		}
		config
	};
	let outputFile = embed::outputPathFor(&outputFile);
	let arrayName = match name {
		Some(name) => identifier::fromName(&name, &config),
		None => identifier::fromFilename(&inputFile, &config),
	};

	embed::validateInput(&inputFile)?;

	if verbose {
		println!("Converting: {}", inputFile.display());
		println!("Output: {}", outputFile.display());
		println!("Array name: {arrayName}");
	}

	let byteCount = embed::convert(&inputFile, &outputFile, &arrayName, &config)?;
	println!("Successfully converted {} bytes to '{}'", groupThousands(byteCount), outputFile.display());

	if verbose {
		let includeName = outputFile.file_name().unwrap_or(outputFile.as_os_str()).to_string_lossy();
		println!("Include in your C++ code with: #include \"{includeName}\"");
	}
	Ok(())
}
