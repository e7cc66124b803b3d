use super::Mechanism;
use crate::credentials::AuthCredentials;
use crate::saslprep::saslprep;
use crate::{codec, SaslError, SaslResult};

/// PLAIN (RFC 4616): authcid and password in the clear, single message,
/// empty authzid.
#[derive(Debug)]
pub struct Plain {
    credentials: AuthCredentials,
    done: bool,
}

impl Plain {
    pub(crate) fn new(credentials: &AuthCredentials) -> Self {
        Self {
            credentials: credentials.clone(),
            done: false,
        }
    }
}

impl Mechanism for Plain {
    fn name(&self) -> &str {
        "PLAIN"
    }

    fn client_first(&self) -> bool {
        true
    }

    fn is_valid(&self, credentials: &AuthCredentials) -> bool {
        credentials.user().is_some() && credentials.pass().is_some()
    }

    fn step(&mut self, _server_challenge: &str) -> SaslResult<String> {
        if self.done {
            return Err(SaslError::TooManySteps);
        }
        self.done = true;
        let (user, pass) = match (self.credentials.user(), self.credentials.pass()) {
            (Some(user), Some(pass)) => (saslprep(user), saslprep(pass.unsecure())),
            _ => return Err(SaslError::Usage("PLAIN requires user and pass")),
        };
        Ok(codec::b64_encode_str(&format!("\0{user}\0{pass}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{Mechanism, Plain};
    use crate::credentials::AuthCredentials;
    use crate::SaslError;

    fn credentials() -> AuthCredentials {
        AuthCredentials::new()
            .with_user("tim")
            .with_pass("tanstaaftanstaaf")
    }

    // RFC 4616-style exchange with the RFC 2195 test account
    #[test]
    fn test_single_response() {
        let mut plain = Plain::new(&credentials());
        assert!(plain.client_first());
        assert_eq!(plain.step("").unwrap(), "AHRpbQB0YW5zdGFhZnRhbnN0YWFm");
        assert!(matches!(plain.step(""), Err(SaslError::TooManySteps)));
    }

    #[test]
    fn test_saslprep_is_applied() {
        // soft hyphens disappear before the message is assembled
        let shy = AuthCredentials::new()
            .with_user("ti\u{00AD}m")
            .with_pass("tanst\u{00AD}aaftanstaaf");
        let mut plain = Plain::new(&shy);
        assert_eq!(plain.step("").unwrap(), "AHRpbQB0YW5zdGFhZnRhbnN0YWFm");
    }

    #[test]
    fn test_validity() {
        let plain = Plain::new(&credentials());
        assert!(plain.is_valid(&credentials()));
        assert!(!plain.is_valid(&AuthCredentials::new().with_user("tim")));
        assert!(!plain.is_valid(&AuthCredentials::new().with_pass("pw")));
    }
}
