#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use const_format::concatcp;

pub const EMBED_EXTENSION: &str = "embed";
pub const DEFAULT_OUTPUT: &str = concatcp!("Buffer.", EMBED_EXTENSION);
pub const SIZE_SUFFIX: &str = "_Size";

pub mod error {
	use {
		std::{io, path::PathBuf},
		thiserror::Error,
	};

	/// Every failure carries the path it happened on, tagged where it happened.
	#[derive(Debug, Error)]
	pub enum EmbedError {
		#[error("Input file '{}' does not exist.", .0.display())]
		InputMissing(PathBuf),

		#[error("'{}' is not a regular file.", .0.display())]
		InputNotAFile(PathBuf),

		#[error("Cannot read input file: {}: {source}", .path.display())]
		Read { path: PathBuf, source: io::Error },

		#[error("Cannot write to output file: {}: {source}", .path.display())]
		Write { path: PathBuf, source: io::Error },

		#[error("Cannot read config file: {}: {source}", .path.display())]
		ConfigRead { path: PathBuf, source: io::Error },

		#[error("Invalid config file: {}: {source}", .path.display())]
		ConfigParse { path: PathBuf, source: toml::de::Error },

		#[error("Invalid config: {0}")]
		Config(String),
	}
}

pub mod config {
	use {
		crate::error::EmbedError,
		serde::{Deserialize, Serialize},
		std::{fs, path::Path},
	};

	#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
	#[serde(default, deny_unknown_fields)]
	pub struct EmbedConfig {
		pub bytesPerLine: usize,
		pub indent: String,
		pub namePrefix: String,
		pub fallbackName: String,
	}

	impl Default for EmbedConfig {
		fn default() -> Self {
			EmbedConfig {
				bytesPerLine: 16,
				indent: "    ".to_owned(),
				namePrefix: "g_".to_owned(),
				fallbackName: "Buffer".to_owned(),
			}
		}
	}

	impl EmbedConfig {
		pub fn fromTomlFile(path: &Path) -> Result<EmbedConfig, EmbedError> {
			let text = fs::read_to_string(path)
				.map_err(|source| EmbedError::ConfigRead { path: path.to_owned(), source })?;
			let config: EmbedConfig = toml::from_str(&text)
				.map_err(|source| EmbedError::ConfigParse { path: path.to_owned(), source })?;
			config.validate()?;
			Ok(config)
		}

		/// The prefix must start a valid identifier on its own; stems may begin
		/// with a digit.
		pub fn validate(&self) -> Result<(), EmbedError> {
			if self.bytesPerLine == 0 {
				return Err(EmbedError::Config("bytesPerLine must be at least 1".to_owned()));
			}
			if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
				return Err(EmbedError::Config("indent may only contain spaces and tabs".to_owned()));
			}
			match self.namePrefix.chars().next() {
				Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
				_ => {
					return Err(EmbedError::Config(format!(
						"namePrefix {:?} must start with a letter or underscore",
						self.namePrefix
					)))
				}
			}
			for (field, value) in [("namePrefix", &self.namePrefix), ("fallbackName", &self.fallbackName)] {
				if !value.chars().all(|c| c == '_' || c.is_ascii_alphanumeric()) {
					return Err(EmbedError::Config(format!(
						"{field} {value:?} may only contain ASCII letters, digits and underscores"
					)));
				}
			}
			Ok(())
		}
	}
}

pub mod identifier {
	use {
		crate::{config::EmbedConfig, SIZE_SUFFIX},
		std::path::Path,
	};

	/// Array name for a file: the stem, sanitised and prefixed.
	pub fn fromFilename(filename: &Path, config: &EmbedConfig) -> String {
		let stem = filename.file_stem().map(|stem| stem.to_string_lossy()).unwrap_or_default();
		fromName(&stem, config)
	}

	pub fn fromName(name: &str, config: &EmbedConfig) -> String {
		let sanitised = sanitise(name);
		let body = if sanitised.is_empty() { config.fallbackName.as_str() } else { &sanitised };
		let mut identifier = String::with_capacity(config.namePrefix.len() + body.len());
		identifier.push_str(&config.namePrefix);
		identifier.push_str(body);
		identifier
	}

	/// One `_` per offending char, so the length in chars is preserved.
	pub fn sanitise(name: &str) -> String {
		name.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
	}

	pub fn sizeConstantName(identifier: &str) -> String {
		[identifier, SIZE_SUFFIX].concat()
	}
}

pub mod format {
	use {crate::config::EmbedConfig, core::slice};

	const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";
	const BYTE_LITERAL_LEN: usize = "0xFF, ".len();

	/// Lines of an array body, rendered on demand. A clone continues
	/// independently from the position it was cloned at.
	#[derive(Clone)]
	pub struct HexLines<'a> {
		chunks: slice::Chunks<'a, u8>,
		indent: &'a str,
	}

	/// # Panics
	/// If `config.bytesPerLine` is zero; [`EmbedConfig::validate`] rejects that.
	pub fn hexLines<'a>(bytes: &'a [u8], config: &'a EmbedConfig) -> HexLines<'a> {
		HexLines { chunks: bytes.chunks(config.bytesPerLine), indent: &config.indent }
	}

	impl Iterator for HexLines<'_> {
		type Item = String;

		fn next(&mut self) -> Option<String> {
			let chunk = self.chunks.next()?;
			let mut line = String::with_capacity(self.indent.len() + chunk.len() * BYTE_LITERAL_LEN);
			line.push_str(self.indent);
			for (i, &byte) in chunk.iter().enumerate() {
				if i > 0 {
					line.push_str(", ");
				}
				line.push_str("0x");
				line.push(HEX_DIGITS[(byte >> 4) as usize] as char);
				line.push(HEX_DIGITS[(byte & 0xF) as usize] as char);
			}
			if self.chunks.len() > 0 {
				line.push(',');
			}
			Some(line)
		}

		fn size_hint(&self) -> (usize, Option<usize>) {
			self.chunks.size_hint()
		}
	}

	impl ExactSizeIterator for HexLines<'_> {}
}

pub mod embed {
	use {
		crate::{config::EmbedConfig, error::EmbedError, format::hexLines, identifier::sizeConstantName, EMBED_EXTENSION},
		std::{
			fs::{self, File},
			io::{self, BufWriter, Write},
			path::{Path, PathBuf},
		},
	};

	/// Whatever extension was given, the output ends in `.embed`.
	pub fn outputPathFor(requested: &Path) -> PathBuf {
		requested.with_extension(EMBED_EXTENSION)
	}

	pub fn validateInput(inputPath: &Path) -> Result<(), EmbedError> {
		match fs::metadata(inputPath) {
			Err(err) if err.kind() == io::ErrorKind::NotFound => Err(EmbedError::InputMissing(inputPath.to_owned())),
			Err(source) => Err(EmbedError::Read { path: inputPath.to_owned(), source }),
			Ok(metadata) if !metadata.is_file() => Err(EmbedError::InputNotAFile(inputPath.to_owned())),
			Ok(_) => Ok(()),
		}
	}

	pub fn writeDeclaration<W: Write>(
		out: &mut W,
		sourceName: &str,
		bytes: &[u8],
		identifier: &str,
		config: &EmbedConfig,
	) -> io::Result<()> {
		writeln!(out, "// Generated from: {sourceName}")?;
		writeln!(out, "// Size: {} bytes\n", bytes.len())?;
		writeln!(out, "#include <cstdint>\n")?;
		writeln!(out, "const uint8_t {identifier}[] =\n{{")?;
		for line in hexLines(bytes, config) {
			writeln!(out, "{line}")?;
		}
		writeln!(out, "}};\n")?;
		writeln!(out, "const size_t {} = sizeof({identifier});", sizeConstantName(identifier))
	}

	/// Reads all of `inputPath` and writes its declaration to `outputPath`.
	/// Returns the number of bytes embedded. The output is left untouched when
	/// reading fails.
	pub fn convert(
		inputPath: &Path,
		outputPath: &Path,
		identifier: &str,
		config: &EmbedConfig,
	) -> Result<usize, EmbedError> {
		let bytes = fs::read(inputPath).map_err(|source| EmbedError::Read { path: inputPath.to_owned(), source })?;
		let sourceName = inputPath.file_name().unwrap_or(inputPath.as_os_str()).to_string_lossy();
		let writeFailed = |source: io::Error| EmbedError::Write { path: outputPath.to_owned(), source };
		let mut out = BufWriter::new(File::create(outputPath).map_err(writeFailed)?);
		writeDeclaration(&mut out, &sourceName, &bytes, identifier, config)
			.and_then(|()| out.flush())
			.map_err(writeFailed)?;
		Ok(bytes.len())
	}
}

/// `1234567` becomes `1,234,567`.
pub fn groupThousands(n: usize) -> String {
	let digits = n.to_string();
	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, digit) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(digit);
	}
	grouped
}
