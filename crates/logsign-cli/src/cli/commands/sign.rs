use anyhow::Context;
use ed25519_dalek::{Signer as _, SigningKey};
use pkcs8::DecodePrivateKey;
use serde::Serialize;
use std::path::Path;

use logsign_core::{blob_signable, signable, SigningRequest};

use super::{exit_code_for, load_request};
use crate::cli::args::{OutputFormat, SignArgs};
use crate::exit_codes;

#[derive(Debug, Serialize)]
struct SignOutput {
    id: String,
    length: u64,
    fork: u64,
    public_key: String,
    signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    blobs_signature: Option<String>,
}

pub fn cmd_sign(args: SignArgs) -> i32 {
    match run_sign(&args) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => exit_code_for(&e),
    }
}

fn run_sign(args: &SignArgs) -> anyhow::Result<()> {
    let request = load_request(&args.input)?;
    let key = load_private_key_pem(&args.key)?;
    let output = sign_request(&key, &request)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Text => {
            println!("{}", output.signature);
            if let Some(blobs) = &output.blobs_signature {
                println!("{blobs}");
            }
        }
    }
    Ok(())
}

/// Drive requests get a second signature over the blobs signable.
fn sign_request(key: &SigningKey, request: &SigningRequest) -> anyhow::Result<SignOutput> {
    let public_key = key.verifying_key().to_bytes();

    let payload = signable(&public_key, request)?;
    let signature = key.sign(&payload);

    let blobs_signature = if request.is_drive() {
        let payload = blob_signable(&public_key, request)?;
        Some(hex::encode(key.sign(&payload).to_bytes()))
    } else {
        None
    };

    tracing::info!(id = %request.id(), length = request.length(), "signed request");

    Ok(SignOutput {
        id: request.id().to_string(),
        length: request.length(),
        fork: request.fork(),
        public_key: hex::encode(public_key),
        signature: hex::encode(signature.to_bytes()),
        blobs_signature,
    })
}

fn load_private_key_pem(path: &Path) -> anyhow::Result<SigningKey> {
    let pem = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read private key {}", path.display()))?;
    SigningKey::from_pkcs8_pem(&pem)
        .with_context(|| format!("invalid PKCS#8 ed25519 key in {}", path.display()))
}
