use crate::credentials::AuthCredentials;
use crate::crypto::{HashAlgorithm, SharedCrypto};
use crate::mechanism::{Anonymous, CramMd5, Login, Mechanism, Plain, Scram, XOAuth2};
use crate::SaslResult;
use std::collections::HashMap;
use std::fmt;

type MechanismFactory = Box<
    dyn Fn(&AuthCredentials, &SharedCrypto) -> SaslResult<Box<dyn Mechanism + Send + Sync>>
        + Send
        + Sync,
>;

/// A registered mechanism: canonical name plus a factory producing a
/// fresh instance per authentication attempt.
///
/// Use this to plug a custom [`Mechanism`] into an
/// [`Authenticator`](crate::Authenticator):
///
/// ```rust,no_run
/// # use saslconnect::{Mechanism, SaslModule};
/// # fn mechanism_for(name: &str) -> Box<dyn Mechanism + Send + Sync> { unimplemented!() }
/// let module = SaslModule::new("X-EXAMPLE", |_credentials, _crypto| {
///     Ok(mechanism_for("X-EXAMPLE"))
/// });
/// ```
pub struct SaslModule {
    name: String,
    factory: MechanismFactory,
}

impl SaslModule {
    /// Creates a module under the canonical (uppercase) form of `name`.
    pub fn new<F>(name: &str, factory: F) -> Self
    where
        F: Fn(&AuthCredentials, &SharedCrypto) -> SaslResult<Box<dyn Mechanism + Send + Sync>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.to_uppercase(),
            factory: Box::new(factory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn build(
        &self,
        credentials: &AuthCredentials,
        crypto: &SharedCrypto,
    ) -> SaslResult<Box<dyn Mechanism + Send + Sync>> {
        (self.factory)(credentials, crypto)
    }
}

impl fmt::Debug for SaslModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaslModule").field("name", &self.name).finish()
    }
}

/// The mechanisms an [`Authenticator`](crate::Authenticator) can build,
/// keyed by canonical name.
///
/// `Default` carries the built-ins; [`register`](Self::register) installs
/// additional modules and replaces same-named ones.
#[derive(Debug)]
pub struct MechanismRegistry {
    modules: HashMap<String, SaslModule>,
}

impl MechanismRegistry {
    pub fn register(&mut self, module: SaslModule) {
        self.modules.insert(module.name().to_string(), module);
    }

    pub(crate) fn get(&self, name: &str) -> Option<&SaslModule> {
        self.modules.get(name)
    }
}

impl Default for MechanismRegistry {
    fn default() -> Self {
        let mut registry = Self {
            modules: HashMap::new(),
        };
        registry.register(SaslModule::new("PLAIN", |credentials, _| {
            Ok(Box::new(Plain::new(credentials)))
        }));
        registry.register(SaslModule::new("LOGIN", |credentials, _| {
            Ok(Box::new(Login::new(credentials)))
        }));
        registry.register(SaslModule::new("ANONYMOUS", |credentials, _| {
            Ok(Box::new(Anonymous::new(credentials)))
        }));
        registry.register(SaslModule::new("XOAUTH2", |credentials, _| {
            Ok(Box::new(XOAuth2::new(credentials)))
        }));
        registry.register(SaslModule::new("CRAM-MD5", |credentials, crypto| {
            Ok(Box::new(CramMd5::new(credentials, crypto)))
        }));
        for (name, alg) in [
            ("SCRAM-SHA-1", HashAlgorithm::Sha1),
            ("SCRAM-SHA-256", HashAlgorithm::Sha256),
            ("SCRAM-SHA-384", HashAlgorithm::Sha384),
            ("SCRAM-SHA-512", HashAlgorithm::Sha512),
        ] {
            registry.register(SaslModule::new(name, move |credentials, crypto| {
                Ok(Box::new(Scram::new(name, alg, credentials, crypto)?))
            }));
        }
        registry
    }
}
