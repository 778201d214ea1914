//! Command-line arguments.

use clap::{Parser, Subcommand};

/// Seal and open password-derived envelopes over stdin/stdout.
///
/// The passphrase and KDF salt come from `SEALCTL_PASSPHRASE` and
/// `SEALCTL_KDF_SALT`.
#[derive(Debug, Parser)]
#[command(name = "sealctl", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print hex-encoded key material derived from the configured passphrase.
    Derive {
        /// Number of bytes to derive.
        #[arg(long, default_value_t = 32)]
        length: usize,
        /// Salt override (defaults to SEALCTL_KDF_SALT).
        #[arg(long)]
        salt: Option<String>,
        /// Iteration override (defaults to SEALCTL_KDF_ITERATIONS).
        #[arg(long)]
        iterations: Option<u32>,
    },
    /// Seal stdin bytes into an envelope.
    Seal {
        /// Emit base64 text instead of binary.
        #[arg(long)]
        base64: bool,
    },
    /// Open an envelope from stdin and write the plaintext.
    Open {
        /// Expect base64 text instead of binary.
        #[arg(long)]
        base64: bool,
    },
    /// Seal a JSON document from stdin as a structured value.
    SealJson {
        /// Emit base64 text instead of binary.
        #[arg(long)]
        base64: bool,
    },
    /// Open a structured-value envelope and print it as JSON.
    OpenJson {
        /// Expect base64 text instead of binary.
        #[arg(long)]
        base64: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_seal_json_with_base64() {
        let cli = Cli::try_parse_from(["sealctl", "seal-json", "--base64"]).unwrap();
        assert!(matches!(cli.command, Command::SealJson { base64: true }));
    }

    #[test]
    fn derive_defaults_to_cipher_key_length() {
        let cli = Cli::try_parse_from(["sealctl", "derive"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Derive {
                length: 32,
                salt: None,
                iterations: None
            }
        ));
    }
}
