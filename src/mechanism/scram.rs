//! SCRAM (RFC 5802) without channel binding, parameterized over the hash.
//!
//! The client proves knowledge of the password through a PBKDF2-derived
//! key schedule and in return verifies a signature that only a server
//! holding the stored credentials can produce.

use super::Mechanism;
use crate::credentials::AuthCredentials;
use crate::crypto::{HashAlgorithm, SharedCrypto};
use crate::saslprep::saslprep;
use crate::{codec, SaslError, SaslResult};
use std::mem;
use std::sync::Arc;

// no channel binding, no authzid
const GS2_HEADER: &str = "n,,";

/// One SCRAM authentication attempt.
///
/// The exchange is a three-step state machine: emit `client-first`,
/// answer `server-first` with `client-final`, verify `server-final`.
#[derive(Debug)]
pub struct Scram {
    name: &'static str,
    alg: HashAlgorithm,
    credentials: AuthCredentials,
    crypto: SharedCrypto,
    client_nonce: String,
    state: State,
}

#[derive(Debug)]
enum State {
    ClientFirst,
    ServerFirst {
        client_first_bare: String,
    },
    ServerFinal {
        server_signature: Vec<u8>,
    },
    Done,
}

impl Scram {
    pub(crate) fn new(
        name: &'static str,
        alg: HashAlgorithm,
        credentials: &AuthCredentials,
        crypto: &SharedCrypto,
    ) -> SaslResult<Self> {
        let nonce = crypto.random_bytes(alg.output_len())?;
        Ok(Self {
            name,
            alg,
            credentials: credentials.clone(),
            crypto: Arc::clone(crypto),
            client_nonce: codec::b64_encode(&nonce),
            state: State::ClientFirst,
        })
    }

    fn emit_client_first(&mut self) -> SaslResult<String> {
        let user = match self.credentials.user() {
            Some(user) => saslprep(user),
            None => return Err(SaslError::Usage("SCRAM requires user and pass")),
        };
        let client_first_bare = format!(
            "n={},r={}",
            escape_username(&user),
            self.client_nonce
        );
        let message = format!("{GS2_HEADER}{client_first_bare}");
        self.state = State::ServerFirst { client_first_bare };
        Ok(codec::b64_encode_str(&message))
    }

    fn emit_client_final(
        &mut self,
        server_challenge: &str,
        client_first_bare: String,
    ) -> SaslResult<String> {
        let pass = match self.credentials.pass() {
            Some(pass) => saslprep(pass.unsecure()),
            None => return Err(SaslError::Usage("SCRAM requires user and pass")),
        };
        let server_first = codec::b64_decode_utf8(server_challenge)?;
        let parsed = parse_server_first(&server_first)?;
        if !parsed.nonce.starts_with(&self.client_nonce) {
            return Err(SaslError::MalformedServerResponse(
                "server nonce does not extend the client nonce".to_string(),
            ));
        }

        let hash_len = self.alg.output_len();
        let salted_password = self.crypto.pbkdf2(
            self.alg,
            pass.as_bytes(),
            &parsed.salt,
            parsed.iterations,
            hash_len,
        )?;
        let client_key = self.crypto.hmac(self.alg, &salted_password, b"Client Key")?;
        let stored_key = self.crypto.digest(self.alg, &client_key)?;

        let client_final_no_proof = format!(
            "c={},r={}",
            codec::b64_encode_str(GS2_HEADER),
            parsed.nonce
        );
        let auth_message = format!("{client_first_bare},{server_first},{client_final_no_proof}");

        let client_signature = self
            .crypto
            .hmac(self.alg, &stored_key, auth_message.as_bytes())?;
        let client_proof: Vec<u8> = client_key
            .iter()
            .zip(&client_signature)
            .map(|(key, sig)| key ^ sig)
            .collect();

        let server_key = self.crypto.hmac(self.alg, &salted_password, b"Server Key")?;
        let server_signature = self
            .crypto
            .hmac(self.alg, &server_key, auth_message.as_bytes())?;
        self.state = State::ServerFinal { server_signature };

        Ok(codec::b64_encode_str(&format!(
            "{client_final_no_proof},p={}",
            codec::b64_encode(&client_proof)
        )))
    }

    fn check_server_signature(
        &mut self,
        server_challenge: &str,
        server_signature: &[u8],
    ) -> SaslResult<String> {
        let server_final = codec::b64_decode_utf8(server_challenge)?;
        let expected = format!("v={}", codec::b64_encode(server_signature));
        if server_final != expected {
            warn!(
                "{}: server signature mismatch - \
                 this indicates a severe security issue with the server's identity!",
                self.name
            );
            return Err(SaslError::ServerVerificationFailed);
        }
        trace!("{}: server signature verified", self.name);
        Ok(String::new())
    }
}

impl Mechanism for Scram {
    fn name(&self) -> &str {
        self.name
    }

    fn client_first(&self) -> bool {
        true
    }

    fn is_valid(&self, credentials: &AuthCredentials) -> bool {
        credentials.user().is_some() && credentials.pass().is_some()
    }

    fn step(&mut self, server_challenge: &str) -> SaslResult<String> {
        match mem::replace(&mut self.state, State::Done) {
            State::ClientFirst => self.emit_client_first(),
            State::ServerFirst { client_first_bare } => {
                self.emit_client_final(server_challenge, client_first_bare)
            }
            State::ServerFinal { server_signature } => {
                self.check_server_signature(server_challenge, &server_signature)
            }
            State::Done => Err(SaslError::TooManySteps),
        }
    }
}

// "," and "=" may not appear verbatim in a saslname
fn escape_username(user: &str) -> String {
    let mut escaped = String::with_capacity(user.len());
    for c in user.chars() {
        match c {
            ',' => escaped.push_str("=2C"),
            '=' => escaped.push_str("=3D"),
            _ => escaped.push(c),
        }
    }
    escaped
}

struct ServerFirst {
    nonce: String,
    salt: Vec<u8>,
    iterations: u32,
}

// r=..., s=..., i=... in exactly this order, after an optional leading
// extension attribute; anything else is a protocol violation
fn parse_server_first(message: &str) -> SaslResult<ServerFirst> {
    let mut attributes = message.split(',');
    let mut attribute = attributes.next();
    if attribute.is_some_and(|a| a.starts_with("m=")) {
        attribute = attributes.next();
    }

    let nonce = match attribute.and_then(|a| a.strip_prefix("r=")) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => {
            return Err(SaslError::MalformedServerResponse(
                "expected r= as first attribute of server-first-message".to_string(),
            ))
        }
    };
    let salt = match attributes.next().and_then(|a| a.strip_prefix("s=")) {
        Some(value) => codec::b64_decode(value)?,
        None => {
            return Err(SaslError::MalformedServerResponse(
                "expected s= after the server nonce".to_string(),
            ))
        }
    };
    let iterations = match attributes.next().and_then(|a| a.strip_prefix("i=")) {
        Some(value) => value
            .parse::<u32>()
            .ok()
            .filter(|i| *i > 0)
            .ok_or_else(|| {
                SaslError::MalformedServerResponse(
                    "i= must be a positive iteration count".to_string(),
                )
            })?,
        None => {
            return Err(SaslError::MalformedServerResponse(
                "expected i= after the salt".to_string(),
            ))
        }
    };

    Ok(ServerFirst {
        nonce,
        salt,
        iterations,
    })
}
