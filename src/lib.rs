//! Client-side SASL (RFC 4422) for line-oriented application protocols.
//!
//! `saslconnect` negotiates an authentication mechanism against the
//! server-advertised list and then drives the challenge/response exchange
//! one step at a time. It speaks base64 tokens only; connecting, framing
//! (IMAP `AUTHENTICATE`, SMTP `AUTH`, XMPP `<auth/>`), TLS, and the final
//! success/failure verdict stay with the host protocol.
//!
//! Supported out of the box: `PLAIN`, `LOGIN`, `ANONYMOUS`, `XOAUTH2`,
//! `CRAM-MD5`, and `SCRAM-SHA-1/-256/-384/-512` including server
//! signature verification. Usernames and passwords are prepared with
//! [`saslprep`] (RFC 4013), and all crypto is reached through the
//! injectable [`CryptoProvider`].
//!
//! The entry point is [`Authenticator`]: construct it with the server's
//! mechanism list and [`AuthCredentials`], pick mechanisms with
//! [`Authenticator::try_next_auth`], and pump tokens through
//! [`Authenticator::auth_step`].

#![deny(missing_debug_implementations)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate log;

mod authenticator;
pub mod codec;
mod credentials;
mod crypto;
mod mechanism;
mod registry;
mod sasl_error;
mod saslprep;

pub use crate::authenticator::{Authenticator, SelectedMechanism};
pub use crate::credentials::{AuthCredentials, DesiredMechanisms};
pub use crate::crypto::{CryptoProvider, HashAlgorithm, SharedCrypto, StdCrypto};
pub use crate::mechanism::Mechanism;
pub use crate::registry::{MechanismRegistry, SaslModule};
pub use crate::sasl_error::{SaslError, SaslResult};
pub use crate::saslprep::saslprep;
