//! Subcommand execution over generic readers and writers.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use seal::{Encoding, KeyMaterial, Value};
use tracing::info;
use zeroize::Zeroizing;

use crate::cli::Command;
use crate::config::Config;

/// Run `command`, reading its input from `input` and writing to `output`.
///
/// Library failures propagate as [`seal::SealError`] inside the returned
/// [`anyhow::Error`] so the caller can map them to exit statuses.
pub fn run<R, W>(command: &Command, cfg: &Config, input: &mut R, output: &mut W) -> Result<()>
where
    R: Read,
    W: Write,
{
    match command {
        Command::Derive {
            length,
            salt,
            iterations,
        } => {
            let salt = salt.as_deref().unwrap_or(&cfg.kdf_salt);
            let iterations = iterations.unwrap_or(cfg.kdf_iterations);
            let derived = Zeroizing::new(seal::derive(
                cfg.passphrase.as_bytes(),
                salt.as_bytes(),
                iterations,
                *length,
            )?);
            let encoded = Zeroizing::new(hex::encode(derived.as_slice()));
            writeln!(output, "{}", encoded.as_str()).context("failed to write key")?;
            info!(length, iterations, "derived key material");
        }
        Command::Seal { base64 } => {
            let key = envelope_key(cfg)?;
            let plaintext = read_all(input)?;
            let encoding = Encoding::from_base64_flag(*base64);
            let sealed = seal::seal_bytes(&plaintext, key.as_bytes(), encoding)?;
            write_envelope(output, &sealed, encoding)?;
            info!(plaintext_len = plaintext.len(), base64, "sealed input");
        }
        Command::Open { base64 } => {
            let key = envelope_key(cfg)?;
            let sealed = read_all(input)?;
            let plaintext = Zeroizing::new(seal::open_bytes(
                &sealed,
                key.as_bytes(),
                Encoding::from_base64_flag(*base64),
            )?);
            output
                .write_all(&plaintext)
                .context("failed to write plaintext")?;
            info!(plaintext_len = plaintext.len(), base64, "opened input");
        }
        Command::SealJson { base64 } => {
            let key = envelope_key(cfg)?;
            let json: serde_json::Value = serde_json::from_reader(input)
                .context("input is not a valid JSON document")?;
            let value = Value::from(json);
            let encoding = Encoding::from_base64_flag(*base64);
            let sealed = seal::seal_value(&value, key.as_bytes(), encoding)?;
            write_envelope(output, &sealed, encoding)?;
            info!(kind = value.kind(), base64, "sealed JSON value");
        }
        Command::OpenJson { base64 } => {
            let key = envelope_key(cfg)?;
            let sealed = read_all(input)?;
            let value: Value =
                seal::open_value(&sealed, key.as_bytes(), Encoding::from_base64_flag(*base64))?;
            let kind = value.kind();
            serde_json::to_writer_pretty(&mut *output, &serde_json::Value::from(value))
                .context("failed to write JSON")?;
            writeln!(output).context("failed to write JSON")?;
            info!(kind, base64, "opened JSON value");
        }
    }
    output.flush().context("failed to flush output")
}

fn envelope_key(cfg: &Config) -> Result<KeyMaterial> {
    Ok(seal::derive_key(
        cfg.passphrase.as_bytes(),
        cfg.kdf_salt.as_bytes(),
        cfg.kdf_iterations,
    )?)
}

fn read_all<R: Read>(input: &mut R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    input
        .read_to_end(&mut buf)
        .context("failed to read input")?;
    Ok(buf)
}

fn write_envelope<W: Write>(output: &mut W, sealed: &[u8], encoding: Encoding) -> Result<()> {
    output
        .write_all(sealed)
        .context("failed to write envelope")?;
    if encoding == Encoding::Base64 {
        writeln!(output).context("failed to write envelope")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use seal::SealError;

    use super::*;

    fn cfg(passphrase: &str) -> Config {
        Config {
            passphrase: passphrase.into(),
            kdf_salt: "salt".into(),
            kdf_iterations: 10,
            log_level: "info".into(),
        }
    }

    fn exec(command: Command, cfg: &Config, input: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        run(&command, cfg, &mut Cursor::new(input.to_vec()), &mut out)?;
        Ok(out)
    }

    fn seal_error(err: &anyhow::Error) -> Option<&SealError> {
        err.downcast_ref::<SealError>()
    }

    #[test]
    fn derive_prints_hex_of_requested_length() {
        let out = exec(
            Command::Derive {
                length: 16,
                salt: None,
                iterations: None,
            },
            &cfg("pw"),
            b"",
        )
        .unwrap();
        let line = String::from_utf8(out).unwrap();
        let expected = hex::encode(seal::derive(b"pw", b"salt", 10, 16).unwrap());
        assert_eq!(line.trim_end(), expected);
    }

    #[test]
    fn derive_zero_length_is_invalid_parameter() {
        let err = exec(
            Command::Derive {
                length: 0,
                salt: None,
                iterations: None,
            },
            &cfg("pw"),
            b"",
        )
        .unwrap_err();
        assert!(matches!(seal_error(&err), Some(SealError::InvalidParameter(_))));
    }

    #[test]
    fn seal_then_open_binary() {
        let c = cfg("pw");
        let sealed = exec(Command::Seal { base64: false }, &c, b"payload").unwrap();
        let opened = exec(Command::Open { base64: false }, &c, &sealed).unwrap();
        assert_eq!(opened, b"payload");
    }

    #[test]
    fn seal_then_open_base64() {
        let c = cfg("pw");
        let sealed = exec(Command::Seal { base64: true }, &c, b"payload").unwrap();
        assert!(sealed.ends_with(b"\n"));
        let opened = exec(Command::Open { base64: true }, &c, &sealed).unwrap();
        assert_eq!(opened, b"payload");
    }

    #[test]
    fn open_with_other_passphrase_fails_authentication() {
        let sealed = exec(Command::Seal { base64: false }, &cfg("pw"), b"payload").unwrap();
        let err = exec(Command::Open { base64: false }, &cfg("other"), &sealed).unwrap_err();
        let e = seal_error(&err).unwrap();
        assert!(matches!(e, SealError::AuthenticationFailed));
        assert_eq!(e.exit_code(), 5);
    }

    #[test]
    fn open_truncated_input_is_malformed() {
        let err = exec(Command::Open { base64: false }, &cfg("pw"), b"short").unwrap_err();
        assert!(matches!(seal_error(&err), Some(SealError::MalformedEnvelope(_))));
    }

    #[test]
    fn json_round_trip() {
        let c = cfg("pw");
        let doc = br#"{"name": "Alice", "scores": [1, 2.5], "meta": {"ok": true}}"#;
        let sealed = exec(Command::SealJson { base64: true }, &c, doc).unwrap();
        let opened = exec(Command::OpenJson { base64: true }, &c, &sealed).unwrap();
        let expected: serde_json::Value = serde_json::from_slice(doc).unwrap();
        let actual: serde_json::Value = serde_json::from_slice(&opened).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn seal_json_rejects_invalid_json() {
        let err = exec(Command::SealJson { base64: false }, &cfg("pw"), b"{not json").unwrap_err();
        assert!(seal_error(&err).is_none());
    }

    #[test]
    fn open_json_on_raw_bytes_is_deserialization_error() {
        let c = cfg("pw");
        let sealed = exec(Command::Seal { base64: false }, &c, b"\xff\xff").unwrap();
        let err = exec(Command::OpenJson { base64: false }, &c, &sealed).unwrap_err();
        assert!(matches!(seal_error(&err), Some(SealError::Deserialization(_))));
    }
}
