//! toxcrypt: key generation, nonce arithmetic and crypto request tooling.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tox_common::error::decode_hex;
use tox_common::{load_keypair, parse_public_key};
use tox_crypto::{request_id, CryptoCore, KeyPair, Nonce, RequestCodec, NET_PACKET_CRYPTO};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "toxcrypt")]
#[command(about = "Tox crypto core tools")]
struct Args {
    /// Packet type byte written in front of crypto requests
    #[arg(long, global = true, env = "TOXCRYPT_PACKET_TYPE", default_value_t = NET_PACKET_CRYPTO)]
    packet_type: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new X25519 key pair
    Keygen,

    /// Derive the public key for a secret key
    PublicKey {
        /// Secret key (hex)
        #[arg(long, env = "TOXCRYPT_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
    },

    /// Precompute the shared key with a peer
    Precompute {
        #[arg(long, env = "TOXCRYPT_SECRET_KEY", hide_env_values = true)]
        secret_key: String,

        /// Peer public key (hex)
        #[arg(long)]
        peer: String,
    },

    /// Nonce generation and arithmetic
    Nonce {
        #[command(subcommand)]
        command: NonceCommand,
    },

    /// Encrypt a message to a peer
    Encrypt {
        #[arg(long, env = "TOXCRYPT_SECRET_KEY", hide_env_values = true)]
        secret_key: String,

        #[arg(long)]
        peer: String,

        /// Nonce (hex); a fresh random one if omitted
        #[arg(long)]
        nonce: Option<String>,

        /// Message text
        message: String,
    },

    /// Decrypt a message from a peer
    Decrypt {
        #[arg(long, env = "TOXCRYPT_SECRET_KEY", hide_env_values = true)]
        secret_key: String,

        #[arg(long)]
        peer: String,

        #[arg(long)]
        nonce: String,

        /// Ciphertext (hex)
        ciphertext: String,
    },

    /// Build or open crypto request packets
    Request {
        #[command(subcommand)]
        command: RequestCommand,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
enum NonceCommand {
    /// Print a fresh random nonce
    Random,

    /// Add to a nonce as a big-endian counter
    Increment {
        nonce: String,

        #[arg(long, default_value_t = 1)]
        by: u64,
    },
}

#[derive(Subcommand, Debug)]
enum RequestCommand {
    /// Create a request packet to a peer
    Create {
        #[arg(long, env = "TOXCRYPT_SECRET_KEY", hide_env_values = true)]
        secret_key: String,

        /// Receiver public key (hex)
        #[arg(long)]
        to: String,

        /// Request id (purpose byte)
        #[arg(long, default_value_t = request_id::FRIEND_REQ)]
        id: u8,

        /// Payload text
        data: String,
    },

    /// Open a request packet addressed to us
    Open {
        #[arg(long, env = "TOXCRYPT_SECRET_KEY", hide_env_values = true)]
        secret_key: String,

        /// Packet (hex)
        packet: String,
    },
}

#[derive(Serialize)]
struct KeygenOutput {
    public_key: String,
    secret_key: String,
}

#[derive(Serialize)]
struct BoxOutput {
    nonce: String,
    ciphertext: String,
}

#[derive(Serialize)]
struct RequestOutput {
    packet_type: u8,
    sender_public_key: String,
    request_id: u8,
    data_hex: String,
    data_utf8: Option<String>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tox_common::init_tracing_with_default("warn");

    let args = Args::parse();
    debug!(packet_type = args.packet_type, "starting toxcrypt");
    let core = CryptoCore::nacl();

    match args.command {
        Command::Keygen => {
            let keypair = KeyPair::generate()?;
            print_json(&KeygenOutput {
                public_key: keypair.public_key().to_hex(),
                secret_key: keypair.secret_key().to_hex(),
            })?;
        }
        Command::PublicKey { secret_key } => {
            let keypair = load_keypair(&secret_key).context("invalid secret key")?;
            println!("{}", keypair.public_key());
        }
        Command::Precompute { secret_key, peer } => {
            let keypair = load_keypair(&secret_key).context("invalid secret key")?;
            let peer = parse_public_key("peer public key", &peer)?;
            let shared = core.precompute_shared_key(&peer, keypair.secret_key())?;
            println!("{}", shared.to_hex());
        }
        Command::Nonce { command } => match command {
            NonceCommand::Random => println!("{}", core.random_nonce()?),
            NonceCommand::Increment { nonce, by } => {
                let nonce = Nonce::from_hex(&nonce).context("invalid nonce")?;
                println!("{}", nonce.incremented_by(by));
            }
        },
        Command::Encrypt {
            secret_key,
            peer,
            nonce,
            message,
        } => {
            let keypair = load_keypair(&secret_key).context("invalid secret key")?;
            let peer = parse_public_key("peer public key", &peer)?;
            let nonce = match nonce {
                Some(hex) => Nonce::from_hex(&hex).context("invalid nonce")?,
                None => core.new_nonce()?,
            };

            let ciphertext = core.encrypt(&peer, keypair.secret_key(), &nonce, message.as_bytes())?;
            print_json(&BoxOutput {
                nonce: nonce.to_hex(),
                ciphertext: hex::encode_upper(ciphertext),
            })?;
        }
        Command::Decrypt {
            secret_key,
            peer,
            nonce,
            ciphertext,
        } => {
            let keypair = load_keypair(&secret_key).context("invalid secret key")?;
            let peer = parse_public_key("peer public key", &peer)?;
            let nonce = Nonce::from_hex(&nonce).context("invalid nonce")?;
            let ciphertext = decode_hex("ciphertext", &ciphertext)?;

            let plaintext = core.decrypt(&peer, keypair.secret_key(), &nonce, &ciphertext)?;
            match String::from_utf8(plaintext) {
                Ok(text) => println!("{}", text),
                Err(e) => println!("{}", hex::encode_upper(e.into_bytes())),
            }
        }
        Command::Request { command } => {
            let codec = RequestCodec::new(args.packet_type);
            match command {
                RequestCommand::Create {
                    secret_key,
                    to,
                    id,
                    data,
                } => {
                    let keypair = load_keypair(&secret_key).context("invalid secret key")?;
                    let recv = parse_public_key("receiver public key", &to)?;

                    let packet = codec.create_request(
                        keypair.public_key(),
                        keypair.secret_key(),
                        &recv,
                        id,
                        data.as_bytes(),
                    )?;
                    println!("{}", hex::encode_upper(packet.encode()));
                }
                RequestCommand::Open { secret_key, packet } => {
                    let keypair = load_keypair(&secret_key).context("invalid secret key")?;
                    let raw = decode_hex("packet", &packet)?;

                    let request =
                        codec.handle_request(keypair.public_key(), keypair.secret_key(), &raw)?;
                    print_json(&RequestOutput {
                        packet_type: raw[0],
                        sender_public_key: request.sender_public_key.to_hex(),
                        request_id: request.request_id,
                        data_hex: hex::encode_upper(&request.data),
                        data_utf8: String::from_utf8(request.data).ok(),
                    })?;
                }
            }
        }
        Command::Version => {
            println!("toxcrypt {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
