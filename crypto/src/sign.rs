//! BIP-340 Schnorr signing and verification.

use secp256k1::{schnorr, Keypair, Message, Secp256k1, XOnlyPublicKey};

use crate::KeyError;
use laurel_types::{PrivateKey, PublicKey, Sig};

/// Sign a 32-byte digest with a private key, returning the signature.
///
/// Uses the deterministic (no auxiliary randomness) signing variant, so
/// signing the same digest with the same key always yields the same bytes.
pub fn sign_digest(digest: &[u8; 32], private: &PrivateKey) -> Result<Sig, KeyError> {
    let secp = Secp256k1::new();
    let keypair =
        Keypair::from_seckey_slice(&secp, &private.0).map_err(|_| KeyError::InvalidSecretKey)?;
    let msg = Message::from_digest(*digest);
    let sig = secp.sign_schnorr_no_aux_rand(&msg, &keypair);
    Ok(Sig(sig.serialize()))
}

/// Verify a signature over a digest against an x-only public key.
///
/// Returns `true` if the signature is valid, `false` otherwise. Malformed
/// keys or signatures verify as `false` rather than erroring.
pub fn verify_digest(digest: &[u8; 32], sig: &Sig, public: &PublicKey) -> bool {
    let secp = Secp256k1::new();
    let Ok(xonly) = XOnlyPublicKey::from_slice(public.as_bytes()) else {
        return false;
    };
    let Ok(schnorr_sig) = schnorr::Signature::from_slice(sig.as_bytes()) else {
        return false;
    };
    let msg = Message::from_digest(*digest);
    secp.verify_schnorr(&schnorr_sig, &msg, &xonly).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::public_from_private;
    use crate::sha256;

    fn keypair(seed: u8) -> (PrivateKey, PublicKey) {
        let private = PrivateKey([seed; 32]);
        let public = public_from_private(&private).unwrap();
        (private, public)
    }

    #[test]
    fn sign_and_verify() {
        let (sk, pk) = keypair(1);
        let digest = sha256(b"test message for laurel");
        let sig = sign_digest(&digest, &sk).unwrap();
        assert!(verify_digest(&digest, &sig, &pk));
    }

    #[test]
    fn wrong_digest_fails() {
        let (sk, pk) = keypair(1);
        let sig = sign_digest(&sha256(b"correct message"), &sk).unwrap();
        assert!(!verify_digest(&sha256(b"wrong message"), &sig, &pk));
    }

    #[test]
    fn wrong_key_fails() {
        let (sk1, _) = keypair(1);
        let (_, pk2) = keypair(2);
        let digest = sha256(b"test");
        let sig = sign_digest(&digest, &sk1).unwrap();
        assert!(!verify_digest(&digest, &sig, &pk2));
    }

    #[test]
    fn signature_deterministic() {
        let (sk, _) = keypair(99);
        let digest = sha256(b"deterministic test");
        let sig1 = sign_digest(&digest, &sk).unwrap();
        let sig2 = sign_digest(&digest, &sk).unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn invalid_secret_key_rejected() {
        let digest = sha256(b"test");
        let result = sign_digest(&digest, &PrivateKey([0u8; 32]));
        assert!(matches!(result, Err(KeyError::InvalidSecretKey)));
    }

    #[test]
    fn invalid_public_key_verifies_false() {
        let (sk, _) = keypair(1);
        let digest = sha256(b"test");
        let sig = sign_digest(&digest, &sk).unwrap();
        assert!(!verify_digest(&digest, &sig, &PublicKey([0xFF; 32])));
    }
}
