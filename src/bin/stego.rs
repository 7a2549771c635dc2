//! # Stego Binary Entry Point
//!
//! Command-line front-end for hiding and recovering encrypted messages in PNG images.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin stego -- embed --input cover.png --output secret.png \
//!   --message "meet at noon" --passphrase "correct-horse"
//!
//! cargo run --bin stego -- extract --input secret.png --passphrase "correct-horse"
//!
//! cargo run --bin stego -- capacity --input cover.png
//! ```
//!
//! Without `--passphrase` or `--key`, `embed` generates a random key and prints
//! it once; the message cannot be recovered without it.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use rand::rngs::OsRng;

use stego_vault::common::logging::init_logger;
use stego_vault::pipeline::{self, user_message};
use stego_vault::processing::image_io::{load_png, save_png};
use stego_vault::{KeyMaterial, SecretKey, StegoConfig, StegoResult};

/// Command-line arguments for the stego binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a configuration file (TOML format); defaults apply when omitted
    ///
    /// Example: config/stego.toml
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt a message and hide it in a PNG image
    Embed {
        /// Cover image
        #[arg(short, long)]
        input: String,
        /// Where to write the PNG carrying the message
        #[arg(short, long)]
        output: String,
        /// Message to hide
        #[arg(short, long)]
        message: String,
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Recover a hidden message from a PNG image
    Extract {
        #[arg(short, long)]
        input: String,
        #[command(flatten)]
        key: KeyArgs,
        /// Print a JSON result object instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Show how many bytes an image can hide
    Capacity {
        #[arg(short, long)]
        input: String,
        #[command(flatten)]
        key: KeyArgs,
        #[arg(long)]
        json: bool,
    },
    /// Print a fresh random key (base64) for use with --key
    Keygen,
}

#[derive(Args, Debug)]
struct KeyArgs {
    /// Passphrase to derive the key from
    #[arg(short, long, conflicts_with = "key")]
    passphrase: Option<String>,
    /// Base64-encoded 256-bit key
    #[arg(short, long)]
    key: Option<String>,
}

impl KeyArgs {
    /// Key material from the flags; `None` when neither flag was given.
    fn resolve(&self) -> Result<Option<KeyMaterial>> {
        if let Some(passphrase) = &self.passphrase {
            return Ok(Some(KeyMaterial::Passphrase(passphrase.clone())));
        }
        if let Some(key) = &self.key {
            return Ok(Some(KeyMaterial::Raw(SecretKey::from_base64(key)?)));
        }
        Ok(None)
    }
}

fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Load configuration from TOML file
    let config = match &cli.config {
        Some(path) => StegoConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => StegoConfig::default(),
    };

    // Initialize logging
    init_logger(&config.logging.level);

    match cli.command {
        Command::Embed {
            input,
            output,
            message,
            key,
        } => run_embed(&config, &input, &output, &message, &key),
        Command::Extract { input, key, json } => run_extract(&config, &input, &key, json),
        Command::Capacity { input, key, json } => run_capacity(&config, &input, &key, json),
        Command::Keygen => {
            println!("{}", SecretKey::generate(&mut OsRng).to_base64());
            Ok(())
        }
    }
}

fn run_embed(
    config: &StegoConfig,
    input: &str,
    output: &str,
    message: &str,
    key: &KeyArgs,
) -> Result<()> {
    let key = key.resolve()?.unwrap_or(KeyMaterial::Generate);
    let cover = load_png(input).with_context(|| format!("failed to read cover image {}", input))?;

    let embedded = pipeline::embed(&cover, message.as_bytes(), &key, config, &mut OsRng)
        .map_err(|e| anyhow::anyhow!(user_message(&e)))?;

    save_png(output, &embedded.image).with_context(|| format!("failed to write {}", output))?;
    info!("Saved image with hidden message to {}", output);

    if let Some(generated) = embedded.generated_key {
        eprintln!("No key given: generated one. Store it, the message cannot be recovered without it:");
        println!("{}", generated.to_base64());
    }
    Ok(())
}

fn run_extract(config: &StegoConfig, input: &str, key: &KeyArgs, json: bool) -> Result<()> {
    let Some(key) = key.resolve()? else {
        bail!("extract needs --passphrase or --key");
    };
    let image = load_png(input).with_context(|| format!("failed to read image {}", input))?;

    let outcome = pipeline::extract(&image, &key, config).and_then(|plaintext| {
        String::from_utf8(plaintext).map_err(|_| {
            stego_vault::StegoError::InvalidInput("hidden message is not valid UTF-8".to_string())
        })
    });

    match outcome {
        Ok(text) if json => println!("{}", serde_json::to_string_pretty(&StegoResult::ok(text))?),
        Ok(text) => println!("{}", text),
        Err(e) => {
            error!("Extraction failed: {}", e);
            if json {
                println!("{}", serde_json::to_string_pretty(&StegoResult::failed(&e))?);
                std::process::exit(1);
            }
            bail!(user_message(&e));
        }
    }
    Ok(())
}

fn run_capacity(config: &StegoConfig, input: &str, key: &KeyArgs, json: bool) -> Result<()> {
    let key = key.resolve()?.unwrap_or(KeyMaterial::Generate);
    let image = load_png(input).with_context(|| format!("failed to read image {}", input))?;
    let report = pipeline::inspect_capacity(&image, &key, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Image:            {}x{} ({} channel bytes)",
            report.width, report.height, report.channel_bytes
        );
        println!("Max blob:         {} bytes", report.max_blob_bytes);
        println!("Max message:      {} bytes ({})", report.max_plaintext_bytes, key.kind());
        println!("Policy limit:     {} bytes", report.policy_limit_bytes);
        println!("Usable message:   {} bytes", report.usable_plaintext_bytes());
    }
    Ok(())
}
