//! Cryptographic primitives for laurel.
//!
//! - **BIP-340 Schnorr** over secp256k1 for event signing and verification
//! - **SHA-256** for event id computation
//! - bech32 key codec: `nsec1…` secret keys, `npub1…` public keys

pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use error::KeyError;
pub use hash::sha256;
pub use keys::{
    normalize_public_key, npub_from_public_key, nsec_from_private_key, private_key_from_nsec,
    public_from_private, public_key_from_npub,
};
pub use sign::{sign_digest, verify_digest};
