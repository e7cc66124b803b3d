use super::Mechanism;
use crate::credentials::AuthCredentials;
use crate::saslprep::saslprep;
use crate::{codec, SaslError, SaslResult};

/// XOAUTH2 (Google/Microsoft): user plus OAuth 2.0 bearer token in one
/// message.
///
/// On failure the server does not fail the protocol turn directly; it
/// sends a JSON status blob as an extra challenge and expects an empty
/// response before it reports the error. That blob is logged at `debug`
/// level and otherwise discarded.
#[derive(Debug)]
pub struct XOAuth2 {
    credentials: AuthCredentials,
    step: u8,
}

impl XOAuth2 {
    pub(crate) fn new(credentials: &AuthCredentials) -> Self {
        Self {
            credentials: credentials.clone(),
            step: 0,
        }
    }
}

impl Mechanism for XOAuth2 {
    fn name(&self) -> &str {
        "XOAUTH2"
    }

    fn client_first(&self) -> bool {
        true
    }

    fn is_valid(&self, credentials: &AuthCredentials) -> bool {
        credentials.user().is_some() && credentials.oauthbearer().is_some()
    }

    fn step(&mut self, server_challenge: &str) -> SaslResult<String> {
        self.step += 1;
        match self.step {
            1 => {
                let (user, token) =
                    match (self.credentials.user(), self.credentials.oauthbearer()) {
                        (Some(user), Some(token)) => (saslprep(user), token),
                        _ => return Err(SaslError::Usage("XOAUTH2 requires user and oauthbearer")),
                    };
                Ok(codec::b64_encode_str(&format!(
                    "user={user}\x01auth=Bearer {}\x01\x01",
                    token.unsecure()
                )))
            }
            2 => {
                match codec::b64_decode(server_challenge) {
                    Ok(blob) if !blob.is_empty() => debug!(
                        "XOAUTH2 error continuation: {}",
                        String::from_utf8_lossy(&blob)
                    ),
                    _ => {}
                }
                // empty response lets the server complete the failure turn
                Ok(String::new())
            }
            _ => Err(SaslError::TooManySteps),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Mechanism, XOAuth2};
    use crate::credentials::AuthCredentials;
    use crate::{codec, SaslError};

    fn credentials() -> AuthCredentials {
        AuthCredentials::new()
            .with_user("someuser@example.com")
            .with_oauthbearer("ya29.vF9dft4qmTc2Nvb3RlckBhdHRhdmlzdGEuY29tCg")
    }

    // token line as documented for the Gmail IMAP/SMTP endpoints
    #[test]
    fn test_initial_response() {
        let mut xoauth2 = XOAuth2::new(&credentials());
        assert_eq!(
            xoauth2.step("").unwrap(),
            "dXNlcj1zb21ldXNlckBleGFtcGxlLmNvbQFhdXRoPUJlYXJlciB5YTI5LnZGOWRmdDRxbVRjMk52\
             YjNSbGNrQmhkSFJoZG1semRHRXVZMjl0Q2cBAQ=="
        );
    }

    #[test]
    fn test_error_continuation_yields_empty_response() {
        let mut xoauth2 = XOAuth2::new(&credentials());
        xoauth2.step("").unwrap();
        let blob = codec::b64_encode_str(r#"{"status":"401","schemes":"bearer"}"#);
        assert_eq!(xoauth2.step(&blob).unwrap(), "");
        assert!(matches!(xoauth2.step(""), Err(SaslError::TooManySteps)));
    }

    #[test]
    fn test_validity() {
        let xoauth2 = XOAuth2::new(&credentials());
        assert!(xoauth2.is_valid(&credentials()));
        assert!(!xoauth2.is_valid(
            &AuthCredentials::new()
                .with_user("someuser@example.com")
                .with_pass("pw")
        ));
    }
}
