use logsign_core::{blob_signable, decode_key, signable};

use super::{exit_code_for, load_request};
use crate::cli::args::SignableArgs;
use crate::exit_codes;

pub fn cmd_signable(args: SignableArgs) -> i32 {
    match run_signable(&args) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => exit_code_for(&e),
    }
}

fn run_signable(args: &SignableArgs) -> anyhow::Result<()> {
    let request = load_request(&args.input)?;
    let public_key = decode_key(&args.public_key)?;

    let payload = if args.blobs {
        blob_signable(&public_key, &request)?
    } else {
        signable(&public_key, &request)?
    };

    println!("{}", hex::encode(payload));
    Ok(())
}
