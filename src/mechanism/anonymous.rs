use super::Mechanism;
use crate::credentials::AuthCredentials;
use crate::{codec, SaslError, SaslResult};

/// ANONYMOUS (RFC 4505): a single trace token, by convention the user
/// field or nothing.
///
/// Neither the default nor the encrypted priority list contains this
/// mechanism, so it only takes part in negotiation when the caller names
/// it in an explicit mechanism list.
#[derive(Debug)]
pub struct Anonymous {
    trace: Option<String>,
    done: bool,
}

impl Anonymous {
    pub(crate) fn new(credentials: &AuthCredentials) -> Self {
        Self {
            trace: credentials.user().map(str::to_string),
            done: false,
        }
    }
}

impl Mechanism for Anonymous {
    fn name(&self) -> &str {
        "ANONYMOUS"
    }

    fn client_first(&self) -> bool {
        true
    }

    fn is_valid(&self, _credentials: &AuthCredentials) -> bool {
        true
    }

    fn step(&mut self, _server_challenge: &str) -> SaslResult<String> {
        if self.done {
            return Err(SaslError::TooManySteps);
        }
        self.done = true;
        // the trace token is not an identity, SASLprep does not apply
        Ok(codec::b64_encode_str(self.trace.as_deref().unwrap_or("")))
    }
}
