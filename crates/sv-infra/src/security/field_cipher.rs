use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::aead::{Aead, Payload};
use chacha20poly1305::{KeyInit, XChaCha20Poly1305, XNonce};
use rand::RngCore;
use sv_core::ports::FieldCipherPort;
use sv_core::security::{FieldCipherError, FieldKey};

const FORMAT_V1: u8 = 0x01;
const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;
const FIELD_AAD: &[u8] = b"settings-vault/field/v1";

/// XChaCha20-Poly1305 protection for individual settings fields.
///
/// Envelope: base64(`0x01 || nonce(24) || ciphertext || tag`). The key is
/// provisioned per account by [`FieldKeyMaterial`](crate::FieldKeyMaterial).
pub struct XChaChaFieldCipher {
    cipher: XChaCha20Poly1305,
}

impl XChaChaFieldCipher {
    pub fn new(key: &FieldKey) -> Result<Self, FieldCipherError> {
        let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
            .map_err(|_| FieldCipherError::InvalidKey)?;
        Ok(Self { cipher })
    }
}

impl FieldCipherPort for XChaChaFieldCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, FieldCipherError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: plaintext.as_bytes(),
                    aad: FIELD_AAD,
                },
            )
            .map_err(|_| FieldCipherError::EncryptFailed)?;

        let mut envelope = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        envelope.push(FORMAT_V1);
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(envelope))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, FieldCipherError> {
        let envelope = STANDARD
            .decode(ciphertext)
            .map_err(|_| FieldCipherError::NotBase64)?;

        let (&version, rest) = envelope
            .split_first()
            .ok_or(FieldCipherError::Truncated)?;
        if version != FORMAT_V1 {
            return Err(FieldCipherError::UnsupportedVersion(version));
        }
        if rest.len() < NONCE_LEN + TAG_LEN {
            return Err(FieldCipherError::Truncated);
        }

        let (nonce, sealed) = rest.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: FIELD_AAD,
                },
            )
            .map_err(|_| FieldCipherError::Tampered)?;

        String::from_utf8(plaintext).map_err(|_| FieldCipherError::NotUtf8)
    }
}

impl std::fmt::Debug for XChaChaFieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("XChaChaFieldCipher([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher(fill: u8) -> XChaChaFieldCipher {
        XChaChaFieldCipher::new(&FieldKey::from_bytes(&[fill; 32]).unwrap()).unwrap()
    }

    #[test]
    fn try_decrypt_reverses_encrypt() {
        let cipher = cipher(7);
        for plain in ["sk-live-123", "with spaces and ünïcode", "x"] {
            let sealed = cipher.encrypt(plain).unwrap();
            assert_ne!(sealed, plain);
            assert_eq!(cipher.try_decrypt(&sealed), plain);
        }
    }

    #[test]
    fn nonce_is_fresh_per_encryption() {
        let cipher = cipher(7);
        assert_ne!(cipher.encrypt("same").unwrap(), cipher.encrypt("same").unwrap());
    }

    #[test]
    fn plain_text_passes_through_try_decrypt() {
        let cipher = cipher(7);
        assert_eq!(cipher.try_decrypt("Light"), "Light");
        assert_eq!(cipher.try_decrypt("my api key"), "my api key");
        assert_eq!(cipher.try_decrypt(""), "");
    }

    #[test]
    fn base64_that_is_not_an_envelope_passes_through() {
        let cipher = cipher(7);
        // Valid base64 ("abcd" decodes to 3 bytes), wrong version byte.
        assert_eq!(cipher.try_decrypt("abcd"), "abcd");
        assert!(matches!(
            cipher.decrypt("abcd"),
            Err(FieldCipherError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn other_key_cannot_decrypt() {
        let sealed = cipher(7).encrypt("secret").unwrap();

        assert_eq!(cipher(8).decrypt(&sealed), Err(FieldCipherError::Tampered));
        assert_eq!(cipher(8).try_decrypt(&sealed), sealed);
    }

    #[test]
    fn tampered_envelope_is_rejected() {
        let cipher = cipher(7);
        let sealed = cipher.encrypt("secret").unwrap();
        let mut bytes = STANDARD.decode(&sealed).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        assert_eq!(
            cipher.decrypt(&STANDARD.encode(bytes)),
            Err(FieldCipherError::Tampered)
        );
    }

    #[test]
    fn short_envelope_is_truncated() {
        let cipher = cipher(7);
        let short = STANDARD.encode([FORMAT_V1, 0, 0, 0]);

        assert_eq!(cipher.decrypt(&short), Err(FieldCipherError::Truncated));
        assert_eq!(cipher.decrypt("not base64!"), Err(FieldCipherError::NotBase64));
    }
}
