use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroizing;

const MAGIC: &[u8; 4] = b"BNST";
const VERSION: u8 = 1;
const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
/// magic | version | m_cost | t_cost | p_cost | salt | nonce
const HEADER_LEN: usize = MAGIC.len() + 1 + 12 + SALT_LEN + NONCE_LEN;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key derivation failed: {0}")]
    KeyDerivation(argon2::Error),
    #[error("encryption failed")]
    Encryption,
    #[error("decryption failed, wrong passphrase or corrupted data")]
    Decryption,
    #[error("invalid data format")]
    InvalidFormat,
    #[error("unsupported data version {0}")]
    UnsupportedVersion(u8),
    #[error("key derivation parameters out of range: {0:?}")]
    KdfOutOfRange(KdfParams),
}

/// Argon2id cost parameters. Stored in every sealed file so they can be
/// raised later without breaking old data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Upper bounds accepted when sealing or opening.
    pub const MAX: KdfParams = KdfParams {
        memory_kib: 4 * 65536,
        iterations: 16,
        parallelism: 8,
    };

    pub fn within_limits(&self) -> bool {
        self.memory_kib <= Self::MAX.memory_kib
            && self.iterations <= Self::MAX.iterations
            && self.parallelism <= Self::MAX.parallelism
    }

    fn derive_key(
        &self,
        passphrase: &str,
        salt: &[u8],
    ) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, Some(KEY_LEN))
            .map_err(CryptoError::KeyDerivation)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        argon2
            .hash_password_into(passphrase.as_bytes(), salt, &mut key[..])
            .map_err(CryptoError::KeyDerivation)?;
        Ok(key)
    }
}

#[cfg(test)]
pub const TEST_KDF: KdfParams = KdfParams {
    memory_kib: 64,
    iterations: 1,
    parallelism: 1,
};

fn cipher_for(key: &[u8; KEY_LEN]) -> Result<Aes256Gcm, CryptoError> {
    Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::InvalidFormat)
}

/// Encrypt `plaintext` under a key derived from `passphrase`.
///
/// The whole header is authenticated as associated data, so altering the
/// stored KDF parameters makes decryption fail instead of silently deriving
/// a different key.
pub fn seal(passphrase: &str, plaintext: &[u8], kdf: &KdfParams) -> Result<Vec<u8>, CryptoError> {
    if !kdf.within_limits() {
        return Err(CryptoError::KdfOutOfRange(*kdf));
    }
    let mut salt = [0u8; SALT_LEN];
    let mut nonce_bytes = [0u8; NONCE_LEN];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce_bytes);

    let mut header = Vec::with_capacity(HEADER_LEN);
    header.extend_from_slice(MAGIC);
    header.push(VERSION);
    header.extend_from_slice(&kdf.memory_kib.to_le_bytes());
    header.extend_from_slice(&kdf.iterations.to_le_bytes());
    header.extend_from_slice(&kdf.parallelism.to_le_bytes());
    header.extend_from_slice(&salt);
    header.extend_from_slice(&nonce_bytes);

    let key = kdf.derive_key(passphrase, &salt)?;
    let ciphertext = cipher_for(&key)?
        .encrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|_| CryptoError::Encryption)?;

    let mut sealed = header;
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(buf)
}

/// Decrypt data produced by [`seal`].
pub fn open(passphrase: &str, sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if sealed.len() < HEADER_LEN || &sealed[..MAGIC.len()] != MAGIC {
        return Err(CryptoError::InvalidFormat);
    }
    let version = sealed[MAGIC.len()];
    if version != VERSION {
        return Err(CryptoError::UnsupportedVersion(version));
    }

    let params_at = MAGIC.len() + 1;
    let kdf = KdfParams {
        memory_kib: read_u32(sealed, params_at),
        iterations: read_u32(sealed, params_at + 4),
        parallelism: read_u32(sealed, params_at + 8),
    };
    if !kdf.within_limits() {
        return Err(CryptoError::KdfOutOfRange(kdf));
    }
    let salt_at = params_at + 12;
    let salt = &sealed[salt_at..salt_at + SALT_LEN];
    let nonce_bytes = &sealed[salt_at + SALT_LEN..HEADER_LEN];
    let (header, ciphertext) = sealed.split_at(HEADER_LEN);

    // Tampered parameters can be rejected by argon2 before the tag is checked
    let key = kdf.derive_key(passphrase, salt).map_err(|_| CryptoError::Decryption)?;
    let plaintext = cipher_for(&key)?
        .decrypt(
            Nonce::from_slice(nonce_bytes),
            Payload {
                msg: ciphertext,
                aad: header,
            },
        )
        .map_err(|_| CryptoError::Decryption)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let sealed = seal("test-passphrase-123", b"hello bienestar", &TEST_KDF).unwrap();
        assert_eq!(&sealed[..4], b"BNST");
        let opened = open("test-passphrase-123", &sealed).unwrap();
        assert_eq!(opened.as_slice(), b"hello bienestar");
    }

    #[test]
    fn wrong_passphrase_fails() {
        let sealed = seal("correct", b"secret data", &TEST_KDF).unwrap();
        assert!(matches!(open("wrong", &sealed), Err(CryptoError::Decryption)));
    }

    #[test]
    fn short_input_is_invalid() {
        assert!(matches!(open("any", &[0u8; 10]), Err(CryptoError::InvalidFormat)));
    }

    #[test]
    fn tampered_params_fail() {
        let mut sealed = seal("pass", b"data", &TEST_KDF).unwrap();
        // bump t_cost
        sealed[9] = 2;
        assert!(matches!(open("pass", &sealed), Err(CryptoError::Decryption)));
    }

    #[test]
    fn oversized_memory_cost_is_rejected_before_hashing() {
        let mut sealed = seal("pass", b"data", &TEST_KDF).unwrap();
        sealed[5..9].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            open("pass", &sealed),
            Err(CryptoError::KdfOutOfRange(KdfParams { memory_kib: u32::MAX, .. }))
        ));
    }

    #[test]
    fn sealing_refuses_excessive_params() {
        let kdf = KdfParams {
            iterations: 1000,
            ..TEST_KDF
        };
        assert!(matches!(
            seal("pass", b"data", &kdf),
            Err(CryptoError::KdfOutOfRange(_))
        ));
        assert!(KdfParams::default().within_limits());
    }

    #[test]
    fn unknown_version_rejected() {
        let mut sealed = seal("pass", b"data", &TEST_KDF).unwrap();
        sealed[4] = 9;
        assert!(matches!(open("pass", &sealed), Err(CryptoError::UnsupportedVersion(9))));
    }
}
