use anyhow::Context;
use std::io::Read;

use logsign_core::{SigningError, SigningRequest};

use super::args::{Cli, Command, RequestInput};
use crate::exit_codes;

pub mod inspect;
pub mod sign;
pub mod signable;

pub fn dispatch(cli: Cli) -> i32 {
    match cli.cmd {
        Command::Inspect(args) => inspect::cmd_inspect(args),
        Command::Signable(args) => signable::cmd_signable(args),
        Command::Sign(args) => sign::cmd_sign(args),
    }
}

/// Map a command failure to its exit code and report it on stderr.
pub(crate) fn exit_code_for(err: &anyhow::Error) -> i32 {
    eprintln!("error: {err:#}");
    match err.downcast_ref::<SigningError>() {
        Some(signing_err) => signing_err.exit_code(),
        None => exit_codes::USAGE_ERROR,
    }
}

/// Read raw request bytes from a file or stdin (`-`).
pub(crate) fn read_request_bytes(input: &RequestInput) -> anyhow::Result<Vec<u8>> {
    let raw = if input.request.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read request from stdin")?;
        buf
    } else {
        std::fs::read(&input.request)
            .with_context(|| format!("failed to read request {}", input.request.display()))?
    };

    if !input.hex {
        return Ok(raw);
    }

    let text = std::str::from_utf8(&raw).context("hex request is not valid UTF-8")?;
    hex::decode(text.trim()).context("request is not valid hex")
}

/// Read and strictly decode a request.
pub(crate) fn load_request(input: &RequestInput) -> anyhow::Result<SigningRequest> {
    let bytes = read_request_bytes(input)?;
    let request = logsign_core::decode(&bytes)?;
    tracing::debug!(id = %request.id(), length = request.length(), "loaded signing request");
    Ok(request)
}
