//! Command-line front-end for threshold secret sharing.
//!
//! `rtss split` turns a secret into shares, one per stdout line; `rtss
//! combine` reads shares back (arguments or standard input) and prints
//! the recovered secret. Exit code is 0 on success and 1 on any fault.

use std::io::Read;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rtss::{
	combine, split, CombineOpts, HashAlgorithm, Identifier, SelectBy, SplitConfig, TssError,
	IDENTIFIER_LEN,
};

#[derive(Parser)]
#[command(name = "rtss", version, about = "Threshold secret sharing for octet strings")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Split a secret into shares
	Split {
		/// Minimum number of shares needed to reconstruct
		#[arg(short = 't', long)]
		threshold: u8,
		/// Total number of shares to produce
		#[arg(short = 'n', long = "shares")]
		num_shares: u8,
		/// The secret; read from standard input when omitted
		#[arg(short, long)]
		secret: Option<String>,
		/// Identifier of up to 16 printable characters; generated when omitted
		#[arg(short, long)]
		identifier: Option<String>,
		/// Digest algorithm: none, sha1 or sha256
		#[arg(long, default_value = "sha256")]
		hash: String,
		/// PKCS#7 padding block size; 0 disables padding
		#[arg(long, default_value_t = 16)]
		pad: u8,
		/// Output encoding for the shares
		#[arg(long, value_enum, default_value = "human")]
		format: Format,
	},
	/// Reconstruct a secret from shares
	Combine {
		/// Subset selection when more shares than the threshold are given
		#[arg(long, value_enum, default_value = "first")]
		select: Select,
		/// Treat share payloads as unpadded
		#[arg(long)]
		no_padding: bool,
		/// Shares; read one per line from standard input when omitted
		shares: Vec<String>,
	},
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
	/// tss~ strings that survive copy-paste
	Human,
	/// Hex-encoded binary shares
	Binary,
}

#[derive(Clone, Copy, ValueEnum)]
enum Select {
	/// First threshold-many shares in input order
	First,
	/// A uniformly random subset
	Sample,
	/// Every subset until one verifies (needs an embedded digest)
	Combinations,
}

impl From<Select> for SelectBy {
	fn from(select: Select) -> Self {
		match select {
			Select::First => SelectBy::First,
			Select::Sample => SelectBy::Sample,
			Select::Combinations => SelectBy::Combinations,
		}
	}
}

fn main() -> ExitCode {
	match run(Cli::parse()) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("error: {}", e);
			ExitCode::FAILURE
		},
	}
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
	match cli.command {
		Command::Split { threshold, num_shares, secret, identifier, hash, pad, format } => {
			let secret = match secret {
				Some(s) => s,
				None => read_stdin()?,
			};

			let mut config = SplitConfig::new(threshold, num_shares)?
				.with_hash(HashAlgorithm::from_name(&hash)?)
				.with_pad_blocksize(pad);
			if let Some(text) = identifier {
				config = config.with_identifier(parse_identifier(&text)?);
			}

			let shares = split(secret.as_bytes(), &config)?;
			for share in &shares {
				match format {
					Format::Human => println!("{}", share.to_human()?),
					Format::Binary => println!("{}", hex::encode(share.to_bytes())),
				}
			}
			Ok(())
		},
		Command::Combine { select, no_padding, shares } => {
			let lines = if shares.is_empty() {
				read_stdin()?.lines().map(str::to_string).collect()
			} else {
				shares
			};

			let mut inputs = Vec::with_capacity(lines.len());
			for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
				if line.starts_with("tss~") {
					inputs.push(line.as_bytes().to_vec());
				} else {
					inputs.push(hex::decode(line)?);
				}
			}

			let opts = CombineOpts { select_by: select.into(), padding: !no_padding };
			let recovered = combine(&inputs, &opts)?;

			eprintln!(
				"recovered {} octets (threshold {}, hash {}, {} ms)",
				recovered.secret().len(),
				recovered.threshold(),
				recovered.hash(),
				recovered.elapsed_ms()
			);
			match core::str::from_utf8(recovered.secret()) {
				Ok(text) => println!("{}", text),
				Err(_) => println!("{}", hex::encode(recovered.secret())),
			}
			Ok(())
		},
	}
}

fn read_stdin() -> Result<String, std::io::Error> {
	let mut buf = String::new();
	std::io::stdin().read_to_string(&mut buf)?;
	// A trailing newline is an artifact of the pipe, not the input.
	if buf.ends_with('\n') {
		buf.pop();
		if buf.ends_with('\r') {
			buf.pop();
		}
	}
	Ok(buf)
}

/// NUL-pad a printable identifier of up to 16 characters.
fn parse_identifier(text: &str) -> Result<Identifier, TssError> {
	if text.len() > IDENTIFIER_LEN || !text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
		return Err(TssError::InvalidIdentifier {
			reason: "identifier must be at most 16 printable ASCII characters",
		});
	}
	let mut id = [0u8; IDENTIFIER_LEN];
	id[..text.len()].copy_from_slice(text.as_bytes());
	Ok(id)
}
