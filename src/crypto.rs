//! The crypto primitives consumed by the mechanisms, behind a small
//! provider trait so that hosts can substitute a platform implementation
//! and tests can pin the nonce source.

use crate::{SaslError, SaslResult};
use hmac::{Hmac, Mac};
use md5::Md5;
use pbkdf2::pbkdf2;
use rand::{thread_rng, RngCore};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::sync::Arc;

/// The hash functions the mechanisms are parameterized over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Digest size in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

/// Shared handle to the crypto provider used by an `Authenticator` and
/// its mechanisms.
pub type SharedCrypto = Arc<dyn CryptoProvider>;

/// The contract between the mechanisms and the ambient crypto runtime.
///
/// All operations are pure except `random_bytes`. Implementations must be
/// callable from the single thread that drives the `Authenticator`.
pub trait CryptoProvider: std::fmt::Debug + Send + Sync {
    /// Returns `n` bytes from a cryptographically secure source.
    fn random_bytes(&self, n: usize) -> SaslResult<Vec<u8>>;

    /// One-shot hash of `data`.
    fn digest(&self, alg: HashAlgorithm, data: &[u8]) -> SaslResult<Vec<u8>>;

    /// HMAC over `data` with `key`.
    fn hmac(&self, alg: HashAlgorithm, key: &[u8], data: &[u8]) -> SaslResult<Vec<u8>>;

    /// PBKDF2 with HMAC-`alg` as the PRF.
    ///
    /// `iterations` and `key_len` must be positive.
    fn pbkdf2(
        &self,
        alg: HashAlgorithm,
        password: &[u8],
        salt: &[u8],
        iterations: u32,
        key_len: usize,
    ) -> SaslResult<Vec<u8>>;
}

/// Default provider backed by the RustCrypto crates and the thread-local
/// CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdCrypto;

impl CryptoProvider for StdCrypto {
    fn random_bytes(&self, n: usize) -> SaslResult<Vec<u8>> {
        let mut buf = vec![0_u8; n];
        thread_rng().fill_bytes(&mut buf);
        Ok(buf)
    }

    fn digest(&self, alg: HashAlgorithm, data: &[u8]) -> SaslResult<Vec<u8>> {
        Ok(match alg {
            HashAlgorithm::Md5 => Md5::digest(data).to_vec(),
            HashAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
            HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            HashAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        })
    }

    fn hmac(&self, alg: HashAlgorithm, key: &[u8], data: &[u8]) -> SaslResult<Vec<u8>> {
        match alg {
            HashAlgorithm::Md5 => {
                let mut mac = Hmac::<Md5>::new_from_slice(key).map_err(crypto_err)?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            HashAlgorithm::Sha1 => {
                let mut mac = Hmac::<Sha1>::new_from_slice(key).map_err(crypto_err)?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            HashAlgorithm::Sha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(key).map_err(crypto_err)?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            HashAlgorithm::Sha384 => {
                let mut mac = Hmac::<Sha384>::new_from_slice(key).map_err(crypto_err)?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            HashAlgorithm::Sha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(key).map_err(crypto_err)?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
        }
    }

    fn pbkdf2(
        &self,
        alg: HashAlgorithm,
        password: &[u8],
        salt: &[u8],
        iterations: u32,
        key_len: usize,
    ) -> SaslResult<Vec<u8>> {
        if iterations == 0 {
            return Err(SaslError::Crypto(
                "PBKDF2 iteration count must be positive".to_string(),
            ));
        }
        if key_len == 0 {
            return Err(SaslError::Crypto(
                "PBKDF2 key length must be positive".to_string(),
            ));
        }
        let mut out = vec![0_u8; key_len];
        match alg {
            HashAlgorithm::Md5 => {
                pbkdf2::<Hmac<Md5>>(password, salt, iterations, &mut out).map_err(crypto_err)?;
            }
            HashAlgorithm::Sha1 => {
                pbkdf2::<Hmac<Sha1>>(password, salt, iterations, &mut out).map_err(crypto_err)?;
            }
            HashAlgorithm::Sha256 => {
                pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut out)
                    .map_err(crypto_err)?;
            }
            HashAlgorithm::Sha384 => {
                pbkdf2::<Hmac<Sha384>>(password, salt, iterations, &mut out)
                    .map_err(crypto_err)?;
            }
            HashAlgorithm::Sha512 => {
                pbkdf2::<Hmac<Sha512>>(password, salt, iterations, &mut out)
                    .map_err(crypto_err)?;
            }
        }
        Ok(out)
    }
}

fn crypto_err<E: std::fmt::Display>(e: E) -> SaslError {
    SaslError::Crypto(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::{CryptoProvider, HashAlgorithm, StdCrypto};
    use crate::SaslError;

    fn hex(bytes: &[u8]) -> String {
        let mut out = String::with_capacity(2 * bytes.len());
        for b in bytes {
            out.push_str(&format!("{b:02x}"));
        }
        out
    }

    #[test]
    fn test_digest_sha256() {
        let out = StdCrypto.digest(HashAlgorithm::Sha256, b"abc").unwrap();
        assert_eq!(
            hex(&out),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    // RFC 2202, test case 1
    #[test]
    fn test_hmac_md5() {
        let out = StdCrypto
            .hmac(HashAlgorithm::Md5, &[0x0b; 16], b"Hi There")
            .unwrap();
        assert_eq!(hex(&out), "9294727a3638bb1c13f48ef8158bfc9d");
    }

    // RFC 6070, test cases 1 and 2
    #[test]
    fn test_pbkdf2_sha1() {
        let out = StdCrypto
            .pbkdf2(HashAlgorithm::Sha1, b"password", b"salt", 1, 20)
            .unwrap();
        assert_eq!(hex(&out), "0c60c80f961f0e71f3a9b524af6012062fe037a6");

        let out = StdCrypto
            .pbkdf2(HashAlgorithm::Sha1, b"password", b"salt", 2, 20)
            .unwrap();
        assert_eq!(hex(&out), "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957");
    }

    #[test]
    fn test_pbkdf2_rejects_zero_iterations() {
        assert!(matches!(
            StdCrypto.pbkdf2(HashAlgorithm::Sha256, b"pw", b"salt", 0, 32),
            Err(SaslError::Crypto(_))
        ));
        assert!(matches!(
            StdCrypto.pbkdf2(HashAlgorithm::Sha256, b"pw", b"salt", 1, 0),
            Err(SaslError::Crypto(_))
        ));
    }

    #[test]
    fn test_random_bytes_len_and_variation() {
        let a = StdCrypto.random_bytes(32).unwrap();
        let b = StdCrypto.random_bytes(32).unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
