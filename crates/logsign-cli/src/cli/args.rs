use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "logsign",
    version,
    about = "Inspect and cosign append-only log signing requests"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode a signing request and print its contents
    Inspect(InspectArgs),
    /// Print the bytes a declared signer must sign (hex)
    Signable(SignableArgs),
    /// Sign a request with an ed25519 private key
    Sign(SignArgs),
}

/// Where and how to read the request.
#[derive(Args, Debug, Clone)]
pub struct RequestInput {
    /// Request file, or `-` for stdin
    pub request: PathBuf,

    /// Input is hex text instead of raw bytes
    #[arg(long)]
    pub hex: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: RequestInput,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct SignableArgs {
    #[command(flatten)]
    pub input: RequestInput,

    /// Signer public key (z-base-32 id or hex)
    #[arg(long)]
    pub public_key: String,

    /// Derive the sub-log (blobs) signable instead of the log signable
    #[arg(long)]
    pub blobs: bool,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub input: RequestInput,

    /// Private key file (PKCS#8 PEM)
    #[arg(long, short, env = "LOGSIGN_KEY")]
    pub key: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
