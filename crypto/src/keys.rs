//! bech32 key codec and public key derivation.
//!
//! Secret keys travel as `nsec1…`, public keys as `npub1…` (bech32, 32-byte
//! payload). Recipients may also be given as bare 64-character hex; see
//! [`normalize_public_key`].

use bech32::{FromBase32, ToBase32, Variant};
use secp256k1::{Keypair, Secp256k1, SecretKey, XOnlyPublicKey};

use crate::KeyError;
use laurel_types::{PrivateKey, PublicKey};

const NSEC_HRP: &str = "nsec";
const NPUB_HRP: &str = "npub";

/// Decode a bech32 string with the expected prefix into a 32-byte payload.
fn decode_key_payload(s: &str, expected: &'static str) -> Result<[u8; 32], KeyError> {
    let (hrp, data, variant) = bech32::decode(s).map_err(|e| KeyError::Bech32(e.to_string()))?;
    if hrp != expected {
        return Err(KeyError::WrongPrefix {
            expected,
            found: hrp,
        });
    }
    if variant != Variant::Bech32 {
        return Err(KeyError::Bech32("bech32m variant is not valid here".into()));
    }
    let bytes = Vec::<u8>::from_base32(&data).map_err(|e| KeyError::Bech32(e.to_string()))?;
    let len = bytes.len();
    let arr: [u8; 32] = bytes.try_into().map_err(|_| KeyError::BadLength(len))?;
    Ok(arr)
}

/// Parse an `nsec1…` string into a private key, validating the scalar.
pub fn private_key_from_nsec(nsec: &str) -> Result<PrivateKey, KeyError> {
    let bytes = decode_key_payload(nsec.trim(), NSEC_HRP)?;
    SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidSecretKey)?;
    Ok(PrivateKey(bytes))
}

/// Encode a private key as `nsec1…`.
pub fn nsec_from_private_key(private: &PrivateKey) -> String {
    bech32::encode(NSEC_HRP, private.0.to_base32(), Variant::Bech32)
        .expect("nsec prefix is a valid hrp")
}

/// Parse an `npub1…` string into a public key, validating the curve point.
pub fn public_key_from_npub(npub: &str) -> Result<PublicKey, KeyError> {
    let bytes = decode_key_payload(npub.trim(), NPUB_HRP)?;
    XOnlyPublicKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
    Ok(PublicKey(bytes))
}

/// Encode a public key as `npub1…`.
pub fn npub_from_public_key(public: &PublicKey) -> String {
    bech32::encode(NPUB_HRP, public.0.to_base32(), Variant::Bech32)
        .expect("npub prefix is a valid hrp")
}

/// Derive the x-only public key for a private key.
pub fn public_from_private(private: &PrivateKey) -> Result<PublicKey, KeyError> {
    let secp = Secp256k1::new();
    let keypair =
        Keypair::from_seckey_slice(&secp, &private.0).map_err(|_| KeyError::InvalidSecretKey)?;
    let (xonly, _parity) = keypair.x_only_public_key();
    Ok(PublicKey(xonly.serialize()))
}

/// Normalize a public key given as either `npub1…` or 64-character hex.
///
/// The hex form is also curve-checked, so a well-formed but off-curve
/// string is rejected rather than carried into an event.
pub fn normalize_public_key(input: &str) -> Result<PublicKey, KeyError> {
    let input = input.trim();
    if input.starts_with("npub1") {
        return public_key_from_npub(input);
    }
    match PublicKey::from_hex(input) {
        Some(pk) => {
            XOnlyPublicKey::from_slice(pk.as_bytes()).map_err(|_| KeyError::InvalidPublicKey)?;
            Ok(pk)
        }
        None => Err(KeyError::BadPublicKeyFormat(input.to_string())),
    }
}
