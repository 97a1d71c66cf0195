#![no_main]
use libfuzzer_sys::fuzz_target;
use logsign_core::{blob_signable, decode, encode, signable};

fuzz_target!(|data: &[u8]| {
    let Ok(request) = decode(data) else {
        return;
    };

    // Anything accepted must re-decode to the same request.
    let reencoded = encode(&request);
    assert_eq!(decode(&reencoded).ok().as_ref(), Some(&request));

    for signer in &request.manifest().signers {
        let _ = signable(&signer.public_key, &request);
        let _ = blob_signable(&signer.public_key, &request);
    }
});
