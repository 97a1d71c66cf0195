use serde::Serialize;

use logsign_core::{ManifestVersion, SigningRequest};

use super::{exit_code_for, load_request};
use crate::cli::args::{InspectArgs, OutputFormat};
use crate::exit_codes;

#[derive(Debug, Serialize)]
struct SignerSummary {
    public_key: String,
    id: String,
    namespace: String,
}

#[derive(Debug, Serialize)]
struct BlobsSummary {
    length: u64,
    tree_hash: String,
}

#[derive(Debug, Serialize)]
struct RequestSummary {
    version: u64,
    id: String,
    key: String,
    length: u64,
    fork: u64,
    tree_hash: String,
    manifest_version: u64,
    quorum: u64,
    allow_patch: bool,
    signers: Vec<SignerSummary>,
    is_drive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    blobs: Option<BlobsSummary>,
}

impl From<&SigningRequest> for RequestSummary {
    fn from(request: &SigningRequest) -> Self {
        let manifest = request.manifest();
        Self {
            version: request.version(),
            id: request.id().to_string(),
            key: hex::encode(request.key()),
            length: request.length(),
            fork: request.fork(),
            tree_hash: hex::encode(request.tree_hash()),
            manifest_version: manifest.version.as_u64(),
            quorum: manifest.quorum,
            allow_patch: manifest.allow_patch,
            signers: manifest
                .signers
                .iter()
                .map(|s| SignerSummary {
                    public_key: hex::encode(s.public_key),
                    id: logsign_core::normalize(&s.public_key),
                    namespace: hex::encode(s.namespace),
                })
                .collect(),
            is_drive: request.is_drive(),
            blobs: request.blobs().map(|b| BlobsSummary {
                length: b.length,
                tree_hash: hex::encode(b.tree_hash),
            }),
        }
    }
}

pub fn cmd_inspect(args: InspectArgs) -> i32 {
    match run_inspect(&args) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => exit_code_for(&e),
    }
}

fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let request = load_request(&args.input)?;
    let summary = RequestSummary::from(&request);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print_text(&summary, request.manifest().version),
    }
    Ok(())
}

fn print_text(summary: &RequestSummary, version: ManifestVersion) {
    println!("id:        {}", summary.id);
    println!("key:       {}", summary.key);
    println!("length:    {}", summary.length);
    println!("fork:      {}", summary.fork);
    println!("tree hash: {}", summary.tree_hash);
    println!(
        "manifest:  v{} quorum {} of {}{}",
        summary.manifest_version,
        summary.quorum,
        summary.signers.len(),
        if version == ManifestVersion::V0 {
            " (legacy)"
        } else {
            ""
        }
    );
    for signer in &summary.signers {
        println!("  signer:  {}", signer.id);
    }
    match &summary.blobs {
        Some(blobs) => println!("blobs:     length {} tree {}", blobs.length, blobs.tree_hash),
        None => println!("blobs:     none"),
    }
}
