use thiserror::Error;

/// A list specifying categories of [`SaslError`](crate::SaslError).
///
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SaslError {
    /// The `Authenticator` was constructed with invalid arguments.
    #[error("Invalid argument: {}", _0)]
    InvalidArgument(String),

    /// The server sent a payload that is not valid base64.
    #[error("Malformed base64 payload")]
    MalformedInput {
        /// The causing Error.
        #[from]
        source: base64::DecodeError,
    },

    /// A decoded server payload is not valid UTF-8.
    #[error("Payload is not valid UTF-8")]
    Utf8 {
        /// The causing Error.
        #[from]
        source: std::string::FromUtf8Error,
    },

    /// A mechanism could not parse the server's challenge.
    #[error("Malformed server response: {}", _0)]
    MalformedServerResponse(String),

    /// The server's signature did not match the expected one -
    /// this indicates a severe security issue with the server's identity!
    #[error("Server signature verification failed")]
    ServerVerificationFailed,

    /// The current mechanism has already produced all of its responses.
    #[error("The mechanism has no further steps")]
    TooManySteps,

    /// A crypto primitive rejected its input.
    #[error("Crypto operation failed: {}", _0)]
    Crypto(String),

    /// Error caused by wrong usage.
    #[error("Wrong usage: {}", _0)]
    Usage(&'static str),
}

/// Abbreviation of `Result<T, SaslError>`.
pub type SaslResult<T> = std::result::Result<T, SaslError>;
