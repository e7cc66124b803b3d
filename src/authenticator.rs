use crate::credentials::{AuthCredentials, DesiredMechanisms};
use crate::crypto::{SharedCrypto, StdCrypto};
use crate::mechanism::Mechanism;
use crate::registry::{MechanismRegistry, SaslModule};
use crate::{SaslError, SaslResult};
use std::collections::HashSet;
use std::sync::Arc;

// challenge-response mechanisms that keep the password off the wire,
// strongest hash first
const ENCRYPTED_MECHANISMS: [&str; 5] = [
    "SCRAM-SHA-512",
    "SCRAM-SHA-384",
    "SCRAM-SHA-256",
    "SCRAM-SHA-1",
    "CRAM-MD5",
];

/// The mechanism picked by [`Authenticator::try_next_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMechanism {
    /// Canonical mechanism name to announce to the server.
    pub name: String,
    /// Whether the first [`auth_step`](Authenticator::auth_step) call
    /// must be made with the empty initial challenge.
    pub client_first: bool,
}

/// Drives SASL authentication for one connection attempt.
///
/// The host protocol announces the server-advertised mechanism list and
/// the credentials, then pumps the exchange: pick a mechanism with
/// [`try_next_auth`](Self::try_next_auth), relay base64 tokens through
/// [`auth_step`](Self::auth_step) until the server reports success or
/// failure, and on failure ask `try_next_auth` for the next candidate.
///
/// ```rust,no_run
/// use saslconnect::{AuthCredentials, Authenticator};
///
/// # fn main() -> saslconnect::SaslResult<()> {
/// let credentials = AuthCredentials::new()
///     .with_user("user")
///     .with_pass("pencil");
/// let mut authenticator = Authenticator::new(
///     "imap",
///     "mail.example.org",
///     &["SCRAM-SHA-256", "PLAIN"],
///     credentials,
/// )?;
///
/// while let Some(selected) = authenticator.try_next_auth() {
///     // announce selected.name to the server, then:
///     let mut challenge = String::new(); // empty for client-first
///     loop {
///         let response = authenticator.auth_step(&challenge)?;
///         // send response, receive the server's next challenge or
///         // its final verdict, update `challenge`, break on verdict
///         # break;
///     }
///     # break;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Authenticator {
    service_name: String,
    hostname: String,
    credentials: AuthCredentials,
    crypto: SharedCrypto,
    registry: MechanismRegistry,
    // reverse priority: the top of the stack is the last element
    candidates: Vec<String>,
    current: Option<Box<dyn Mechanism + Send + Sync>>,
}

impl Authenticator {
    /// Creates an authenticator with the default crypto provider.
    ///
    /// `supported_mechanisms` is the server-advertised list (any case);
    /// `options` selects credentials and the desired mechanism order.
    ///
    /// # Errors
    ///
    /// `SaslError::InvalidArgument` if the service name, the hostname,
    /// or the mechanism list is empty.
    pub fn new<S: AsRef<str>>(
        service_name: &str,
        hostname: &str,
        supported_mechanisms: &[S],
        options: AuthCredentials,
    ) -> SaslResult<Self> {
        Self::with_crypto(
            service_name,
            hostname,
            supported_mechanisms,
            options,
            Arc::new(StdCrypto),
        )
    }

    /// Like [`new`](Self::new), with an explicit crypto provider.
    pub fn with_crypto<S: AsRef<str>>(
        service_name: &str,
        hostname: &str,
        supported_mechanisms: &[S],
        options: AuthCredentials,
        crypto: SharedCrypto,
    ) -> SaslResult<Self> {
        if service_name.is_empty() {
            return Err(SaslError::InvalidArgument(
                "service name must not be empty".to_string(),
            ));
        }
        if hostname.is_empty() {
            return Err(SaslError::InvalidArgument(
                "hostname must not be empty".to_string(),
            ));
        }
        if supported_mechanisms.is_empty() {
            return Err(SaslError::InvalidArgument(
                "the server must advertise at least one mechanism".to_string(),
            ));
        }

        let supported: HashSet<String> = supported_mechanisms
            .iter()
            .map(|m| m.as_ref().to_uppercase())
            .collect();

        let priority: Vec<String> = match options.desired() {
            DesiredMechanisms::Default => std::iter::once("XOAUTH2")
                .chain(ENCRYPTED_MECHANISMS)
                .chain(["PLAIN", "LOGIN"])
                .map(str::to_string)
                .collect(),
            DesiredMechanisms::Encrypted => {
                ENCRYPTED_MECHANISMS.into_iter().map(str::to_string).collect()
            }
            DesiredMechanisms::List(list) => list.iter().map(|m| m.to_uppercase()).collect(),
        };

        let mut candidates: Vec<String> = priority
            .into_iter()
            .filter(|m| supported.contains(m))
            .collect();
        debug!("authenticating {service_name} on {hostname}, candidates: {candidates:?}");
        candidates.reverse();

        Ok(Self {
            service_name: service_name.to_string(),
            hostname: hostname.to_string(),
            credentials: options,
            crypto,
            registry: MechanismRegistry::default(),
            candidates,
            current: None,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Installs an additional mechanism module, replacing any existing
    /// registration with the same canonical name.
    ///
    /// Candidates already on the stack pick up the new module when they
    /// are tried.
    pub fn register_module(&mut self, module: SaslModule) {
        self.registry.register(module);
    }

    /// Moves on to the most preferred remaining mechanism.
    ///
    /// Candidates without a registered module or with insufficient
    /// credentials are discarded. Returns `None` once the candidate
    /// stack is exhausted; the caller should then give up on SASL for
    /// this connection.
    pub fn try_next_auth(&mut self) -> Option<SelectedMechanism> {
        self.current = None;
        while let Some(name) = self.candidates.pop() {
            let Some(module) = self.registry.get(&name) else {
                debug!("no module registered for {name}, skipping");
                continue;
            };
            match module.build(&self.credentials, &self.crypto) {
                Ok(mechanism) => {
                    if !mechanism.is_valid(&self.credentials) {
                        trace!("credentials insufficient for {name}, skipping");
                        continue;
                    }
                    debug!("selected mechanism {name}");
                    let client_first = mechanism.client_first();
                    self.current = Some(mechanism);
                    return Some(SelectedMechanism { name, client_first });
                }
                Err(e) => warn!("could not instantiate {name}: {e}"),
            }
        }
        trace!("no candidate mechanisms left");
        None
    }

    /// Feeds the next base64 server challenge to the current mechanism
    /// and returns the base64 client response to relay.
    ///
    /// For a client-first mechanism the first call must pass `""`. An
    /// empty return value means the client has nothing to say in this
    /// turn (e.g. the final SCRAM acknowledgment).
    ///
    /// # Errors
    ///
    /// Any mechanism-level failure (`MalformedInput`, `Utf8`,
    /// `MalformedServerResponse`, `ServerVerificationFailed`,
    /// `TooManySteps`, `Crypto`) ends the current attempt: the caller
    /// must abort the exchange with the server and may call
    /// [`try_next_auth`](Self::try_next_auth) to fall back. Calling
    /// without a current mechanism fails with `Usage`.
    pub fn auth_step(&mut self, server_challenge: &str) -> SaslResult<String> {
        let Some(mechanism) = self.current.as_mut() else {
            return Err(SaslError::Usage(
                "auth_step() requires a preceding successful try_next_auth()",
            ));
        };
        trace!(
            "auth_step for {} with a challenge of {} bytes",
            mechanism.name(),
            server_challenge.len()
        );
        match mechanism.step(server_challenge) {
            Ok(response) => Ok(response),
            Err(e) => {
                self.current = None;
                Err(e)
            }
        }
    }
}
