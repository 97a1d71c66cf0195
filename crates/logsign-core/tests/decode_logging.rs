//! Log levels of the strict decoder: rejections surface at WARN, accepted
//! requests stay at DEBUG.

use logsign_core::{decode, encode, Manifest, SigningRequest};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl std::io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_at(filter: &str) -> (CaptureWriter, tracing::subscriber::DefaultGuard) {
    let writer = CaptureWriter {
        buf: Arc::new(Mutex::new(Vec::new())),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_env_filter(EnvFilter::new(filter))
        .with_ansi(false)
        .finish();
    (writer, tracing::subscriber::set_default(subscriber))
}

fn output(writer: &CaptureWriter) -> String {
    String::from_utf8(writer.buf.lock().unwrap().clone()).unwrap()
}

fn valid_bytes() -> Vec<u8> {
    let request =
        SigningRequest::new(10, 0, [0x33; 32], Manifest::single_signer([0x01; 32]), None).unwrap();
    encode(&request)
}

#[test]
fn rejected_decode_logs_warning() {
    let (writer, _guard) = capture_at("warn");

    let mut bytes = valid_bytes();
    bytes.push(0x00);
    assert!(decode(&bytes).is_err());
    assert!(decode(&[0x02]).is_err());

    let out = output(&writer);
    assert_eq!(out.matches("WARN").count(), 2, "{out}");
    assert!(out.contains("rejected signing request"), "{out}");
    assert!(out.contains("trailing bytes"), "{out}");
    assert!(out.contains("unknown signing request version: 2"), "{out}");
}

#[test]
fn accepted_decode_is_quiet_at_warn() {
    let (writer, _guard) = capture_at("warn");
    decode(&valid_bytes()).unwrap();
    assert!(output(&writer).is_empty());

    let (writer, _guard) = capture_at("debug");
    decode(&valid_bytes()).unwrap();
    assert!(output(&writer).contains("decoded signing request"));
}
