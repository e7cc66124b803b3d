use super::Mechanism;
use crate::credentials::AuthCredentials;
use crate::crypto::{HashAlgorithm, SharedCrypto};
use crate::saslprep::saslprep;
use crate::{codec, SaslError, SaslResult};
use std::sync::Arc;

/// CRAM-MD5 (RFC 2195): keyed digest of the server's timestamp challenge.
#[derive(Debug)]
pub struct CramMd5 {
    credentials: AuthCredentials,
    crypto: SharedCrypto,
    done: bool,
}

impl CramMd5 {
    pub(crate) fn new(credentials: &AuthCredentials, crypto: &SharedCrypto) -> Self {
        Self {
            credentials: credentials.clone(),
            crypto: Arc::clone(crypto),
            done: false,
        }
    }
}

impl Mechanism for CramMd5 {
    fn name(&self) -> &str {
        "CRAM-MD5"
    }

    fn client_first(&self) -> bool {
        false
    }

    fn is_valid(&self, credentials: &AuthCredentials) -> bool {
        credentials.user().is_some() && credentials.pass().is_some()
    }

    fn step(&mut self, server_challenge: &str) -> SaslResult<String> {
        if self.done {
            return Err(SaslError::TooManySteps);
        }
        self.done = true;
        let (user, pass) = match (self.credentials.user(), self.credentials.pass()) {
            (Some(user), Some(pass)) => (saslprep(user), saslprep(pass.unsecure())),
            _ => return Err(SaslError::Usage("CRAM-MD5 requires user and pass")),
        };
        let challenge = codec::b64_decode(server_challenge)?;
        let mac = self
            .crypto
            .hmac(HashAlgorithm::Md5, pass.as_bytes(), &challenge)?;
        let mut mac_hex = String::with_capacity(2 * mac.len());
        for b in &mac {
            mac_hex.push_str(&format!("{b:02x}"));
        }
        Ok(codec::b64_encode_str(&format!("{user} {mac_hex}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{CramMd5, Mechanism};
    use crate::credentials::AuthCredentials;
    use crate::crypto::{SharedCrypto, StdCrypto};
    use crate::SaslError;
    use std::sync::Arc;

    // RFC 2195 example exchange
    #[test]
    fn test_keyed_digest_response() {
        let credentials = AuthCredentials::new()
            .with_user("tim")
            .with_pass("tanstaaftanstaaf");
        let crypto: SharedCrypto = Arc::new(StdCrypto);
        let mut cram = CramMd5::new(&credentials, &crypto);
        assert!(!cram.client_first());
        assert_eq!(
            cram.step("PDE4OTYuNjk3MTcwOTUyQHBvc3RvZmZpY2UucmVzdG9uLm1jaS5uZXQ+")
                .unwrap(),
            "dGltIGI5MTNhNjAyYzdlZGE3YTQ5NWI0ZTZlNzMzNGQzODkw"
        );
        assert!(matches!(cram.step(""), Err(SaslError::TooManySteps)));
    }

    #[test]
    fn test_rejects_malformed_challenge() {
        let credentials = AuthCredentials::new().with_user("tim").with_pass("pw");
        let crypto: SharedCrypto = Arc::new(StdCrypto);
        let mut cram = CramMd5::new(&credentials, &crypto);
        assert!(matches!(
            cram.step("not base64!"),
            Err(SaslError::MalformedInput { .. })
        ));
    }
}
