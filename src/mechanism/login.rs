use super::Mechanism;
use crate::credentials::AuthCredentials;
use crate::saslprep::saslprep;
use crate::{codec, SaslError, SaslResult};

/// Legacy LOGIN: username and password in two turns. The server prompts
/// (`User Name`, `Password`) are decorative and ignored.
#[derive(Debug)]
pub struct Login {
    credentials: AuthCredentials,
    step: u8,
}

impl Login {
    pub(crate) fn new(credentials: &AuthCredentials) -> Self {
        Self {
            credentials: credentials.clone(),
            step: 0,
        }
    }
}

impl Mechanism for Login {
    fn name(&self) -> &str {
        "LOGIN"
    }

    fn client_first(&self) -> bool {
        false
    }

    fn is_valid(&self, credentials: &AuthCredentials) -> bool {
        credentials.user().is_some() && credentials.pass().is_some()
    }

    fn step(&mut self, _server_challenge: &str) -> SaslResult<String> {
        self.step += 1;
        match self.step {
            1 => match self.credentials.user() {
                Some(user) => Ok(codec::b64_encode_str(&saslprep(user))),
                None => Err(SaslError::Usage("LOGIN requires user and pass")),
            },
            2 => match self.credentials.pass() {
                Some(pass) => Ok(codec::b64_encode_str(&saslprep(pass.unsecure()))),
                None => Err(SaslError::Usage("LOGIN requires user and pass")),
            },
            _ => Err(SaslError::TooManySteps),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Login, Mechanism};
    use crate::credentials::AuthCredentials;
    use crate::SaslError;

    #[test]
    fn test_two_responses() {
        let credentials = AuthCredentials::new()
            .with_user("tim")
            .with_pass("tanstaaftanstaaf");
        let mut login = Login::new(&credentials);
        assert!(!login.client_first());
        // "User Name\0" / "Password\0" prompts as sent by common servers
        assert_eq!(login.step("VXNlciBOYW1lAA==").unwrap(), "dGlt");
        assert_eq!(
            login.step("UGFzc3dvcmQA").unwrap(),
            "dGFuc3RhYWZ0YW5zdGFhZg=="
        );
        assert!(matches!(login.step(""), Err(SaslError::TooManySteps)));
    }
}
