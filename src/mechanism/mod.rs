mod anonymous;
mod cram_md5;
mod login;
mod plain;
mod scram;
mod xoauth2;

pub(crate) use self::anonymous::Anonymous;
pub(crate) use self::cram_md5::CramMd5;
pub(crate) use self::login::Login;
pub(crate) use self::plain::Plain;
pub(crate) use self::scram::Scram;
pub(crate) use self::xoauth2::XOAuth2;

use crate::credentials::AuthCredentials;
use crate::SaslResult;

/// A single authentication mechanism, driven step by step.
///
/// Instances are created by
/// [`Authenticator::try_next_auth`](crate::Authenticator::try_next_auth)
/// and live for one authentication attempt. Each [`step`](Self::step)
/// consumes one base64 server challenge and yields one base64 client
/// response; once the mechanism has produced all of its responses, any
/// further step fails with [`SaslError::TooManySteps`](crate::SaslError).
pub trait Mechanism: std::fmt::Debug {
    /// Canonical uppercase mechanism name, e.g. `"SCRAM-SHA-256"`.
    fn name(&self) -> &str;

    /// Whether the mechanism sends the first message of the exchange.
    ///
    /// Client-first mechanisms expect the empty string as their initial
    /// challenge.
    fn client_first(&self) -> bool;

    /// Whether the given credentials are sufficient for this mechanism.
    fn is_valid(&self, credentials: &AuthCredentials) -> bool;

    /// Consumes the next base64 server challenge and produces the next
    /// base64 client response.
    fn step(&mut self, server_challenge: &str) -> SaslResult<String>;
}
