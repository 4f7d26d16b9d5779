//! Credential decryption seam
//!
//! The configuration store hands out properties whose secret-flagged values
//! (see [`is_secret_key`](crate::is_secret_key)) are encrypted at rest.
//! Decryption is mandatory and total: every property set passed to a factory
//! must already be plaintext, so [`Decrypter::decrypt_all`] is applied before
//! properties leave the configuration layer. The cipher itself lives behind
//! this trait and is out of scope here.

use crate::{is_secret_key, ConnectionProperties, DirstoreError, Result};

/// Decrypts secret property values
pub trait Decrypter: Send + Sync {
    /// Decrypt a single encrypted value
    fn decrypt(&self, value: &str) -> Result<String>;

    /// Decrypt every secret-flagged property, leaving the rest untouched.
    ///
    /// Fails with `DecryptionFailed` naming the offending key if any secret
    /// value cannot be decrypted.
    fn decrypt_all(&self, props: &ConnectionProperties) -> Result<ConnectionProperties> {
        let mut plain = ConnectionProperties::new();
        let mut secrets = 0usize;
        for (key, value) in props.iter() {
            if is_secret_key(key) {
                let decrypted = self.decrypt(value).map_err(|err| {
                    DirstoreError::DecryptionFailed(format!("property {key:?}: {err}"))
                })?;
                plain.insert(key, decrypted);
                secrets += 1;
            } else {
                plain.insert(key, value);
            }
        }
        tracing::debug!(properties = plain.len(), secrets, "decrypted connection properties");
        Ok(plain)
    }
}

/// Passthrough decrypter for stores that keep properties in plaintext
pub struct PlaintextDecrypter;

impl Decrypter for PlaintextDecrypter {
    fn decrypt(&self, value: &str) -> Result<String> {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Treats values prefixed with "enc:" as encrypted; anything else is
    /// rejected the way a real cipher rejects garbage input.
    struct PrefixDecrypter;

    impl Decrypter for PrefixDecrypter {
        fn decrypt(&self, value: &str) -> Result<String> {
            value
                .strip_prefix("enc:")
                .map(str::to_string)
                .ok_or_else(|| DirstoreError::DecryptionFailed("missing enc prefix".into()))
        }
    }

    #[test]
    fn test_decrypt_all_decrypts_only_secrets() {
        let props = ConnectionProperties::new()
            .with("bindDn", "cn=admin")
            .with("bindPassword", "enc:hunter2")
            .with("servers", "localhost:1636");

        let plain = PrefixDecrypter.decrypt_all(&props).unwrap();
        assert_eq!(plain.get("bindPassword"), Some("hunter2"));
        assert_eq!(plain.get("bindDn"), Some("cn=admin"));
        assert_eq!(plain.get("servers"), Some("localhost:1636"));
    }

    #[test]
    fn test_decrypt_all_names_failing_key() {
        let props = ConnectionProperties::new().with("auth.bindPassword", "not-encrypted");
        let err = PrefixDecrypter.decrypt_all(&props).unwrap_err();
        assert!(matches!(
            err,
            DirstoreError::DecryptionFailed(msg) if msg.contains("auth.bindPassword")
        ));
    }

    #[test]
    fn test_plaintext_decrypter_is_identity() {
        let props = ConnectionProperties::new().with("bindPassword", "plain");
        let out = PlaintextDecrypter.decrypt_all(&props).unwrap();
        assert_eq!(out.get("bindPassword"), Some("plain"));
    }
}
