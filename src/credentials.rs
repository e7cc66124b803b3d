use secstr::SecUtf8;

/// Which mechanisms the caller wants, in which order.
///
/// The effective priority list is built from this before it is filtered
/// by the server-advertised set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DesiredMechanisms {
    /// `XOAUTH2`, then the challenge-response mechanisms, then `PLAIN`
    /// and `LOGIN`.
    #[default]
    Default,
    /// Only mechanisms that never put the password on the wire:
    /// the SCRAM family in decreasing hash strength, then `CRAM-MD5`.
    Encrypted,
    /// Exactly these mechanisms, in exactly this order.
    List(Vec<String>),
}

/// The credentials an [`Authenticator`](crate::Authenticator) selects
/// mechanisms against and hands to the selected mechanism.
///
/// Every field is optional; a mechanism whose required fields are absent
/// is skipped during negotiation. Secrets are held as
/// [`SecUtf8`](https://docs.rs/secstr) so they are zeroed on drop and
/// redacted in `Debug` output.
///
/// ```rust
/// use saslconnect::AuthCredentials;
///
/// let credentials = AuthCredentials::new()
///     .with_user("alice@example.org")
///     .with_pass("correct horse battery staple");
/// ```
#[derive(Clone, Debug, Default)]
pub struct AuthCredentials {
    user: Option<String>,
    pass: Option<SecUtf8>,
    oauthbearer: Option<SecUtf8>,
    desired: DesiredMechanisms,
}

impl AuthCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the authentication identity.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn with_pass(mut self, pass: impl Into<String>) -> Self {
        self.pass = Some(SecUtf8::from(pass.into()));
        self
    }

    /// Sets the OAuth 2.0 bearer token used by `XOAUTH2`.
    #[must_use]
    pub fn with_oauthbearer(mut self, token: impl Into<String>) -> Self {
        self.oauthbearer = Some(SecUtf8::from(token.into()));
        self
    }

    /// Selects the mechanisms to negotiate.
    #[must_use]
    pub fn with_desired(mut self, desired: DesiredMechanisms) -> Self {
        self.desired = desired;
        self
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn pass(&self) -> Option<&SecUtf8> {
        self.pass.as_ref()
    }

    pub fn oauthbearer(&self) -> Option<&SecUtf8> {
        self.oauthbearer.as_ref()
    }

    pub fn desired(&self) -> &DesiredMechanisms {
        &self.desired
    }
}
