use crate::security::{looks_like_ciphertext, FieldCipherError};

/// Reversible, account-scoped protection for individual settings fields.
///
/// Ciphertext is a printable string so it can be stored in place of the
/// plaintext value. Ciphertext produced under one user/machine identity need not
/// be decryptable under another.
pub trait FieldCipherPort: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String, FieldCipherError>;

    /// Decrypt a value produced by [`encrypt`](Self::encrypt). Fails on
    /// anything else.
    fn decrypt(&self, ciphertext: &str) -> Result<String, FieldCipherError>;

    /// Decrypt `value` if it looks like ciphertext, otherwise return it unchanged.
    ///
    /// Any decryption failure also yields the input unchanged: a value that
    /// cannot be decrypted is treated as never having been encrypted.
    fn try_decrypt(&self, value: &str) -> String {
        if value.is_empty() || !looks_like_ciphertext(value) {
            return value.to_string();
        }

        self.decrypt(value.trim())
            .unwrap_or_else(|_| value.to_string())
    }
}

#[cfg(test)]
mockall::mock! {
    pub FieldCipher {}

    impl FieldCipherPort for FieldCipher {
        fn encrypt(&self, plaintext: &str) -> Result<String, FieldCipherError>;
        fn decrypt(&self, ciphertext: &str) -> Result<String, FieldCipherError>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_decrypt_skips_values_that_are_not_base64() {
        let mut cipher = MockFieldCipher::new();
        cipher.expect_decrypt().never();

        assert_eq!(cipher.try_decrypt("hello world"), "hello world");
        assert_eq!(cipher.try_decrypt(""), "");
        assert_eq!(cipher.try_decrypt("abc"), "abc");
    }

    #[test]
    fn try_decrypt_returns_plaintext_on_success() {
        let mut cipher = MockFieldCipher::new();
        cipher
            .expect_decrypt()
            .times(1)
            .returning(|_| Ok("secret".to_string()));

        assert_eq!(cipher.try_decrypt("c2VjcmV0"), "secret");
    }

    #[test]
    fn try_decrypt_returns_input_on_failure() {
        let mut cipher = MockFieldCipher::new();
        cipher
            .expect_decrypt()
            .returning(|_| Err(FieldCipherError::Tampered));

        assert_eq!(cipher.try_decrypt("QUJDRA=="), "QUJDRA==");
    }
}
