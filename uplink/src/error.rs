//! Errors returned by this crate.

use crate::collaborator;

use std::error as stderr;
use std::fmt;
use std::io;

/// Convenient type alias to shorten the signature on every usage.
///
/// It's the type of the failures that a [`Collaborator`](crate::collaborator::Collaborator)
/// returns.
pub type BoxError = Box<dyn stderr::Error + Send + Sync>;

/// Placeholder used in place of credential material found in an error.
const REDACTED: &str = "[REDACTED]";

/// The error type that this crate uses for every failure.
///
/// It always carries a stable [`Kind`] for branching on it programmatically, a human friendly
/// message and, when the error was produced by the collaborator, the original failure as its
/// [`source`](std::error::Error::source).
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: Kind,
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl Error {
    /// Creates an error of `kind` without any cause.
    pub(crate) fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Creates an error of `kind` whose origin is `cause`.
    pub(crate) fn with_cause(kind: Kind, message: impl Into<String>, cause: BoxError) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: Some(cause),
        }
    }

    /// Convenient constructor for an [`Kind::InvalidCredentialFormat`] error.
    pub(crate) fn new_invalid_credential(msg: &str) -> Self {
        Self::new(Kind::InvalidCredentialFormat, msg)
    }

    /// Convenient constructor for an [`Kind::InvalidScopeFormat`] error.
    pub(crate) fn new_invalid_scope(msg: &str) -> Self {
        Self::new(Kind::InvalidScopeFormat, msg)
    }

    /// Convenient constructor for an [`Kind::UnsupportedOption`] error.
    pub(crate) fn new_unsupported_option(msg: &str) -> Self {
        Self::new(Kind::UnsupportedOption, msg)
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the human friendly message of this error.
    ///
    /// For errors translated from a collaborator failure, it's the failure's message verbatim.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if the error is due to a misuse of this crate.
    pub fn is_caller_error(&self) -> bool {
        self.kind.class() == Class::Caller
    }

    /// Returns `true` if the error is due to a failure of the network or the system.
    pub fn is_environment_error(&self) -> bool {
        self.kind.class() == Class::Environment
    }

    /// Removes any occurrence of `secret` from the message and the cause of this error.
    ///
    /// The cause is replaced by a textual copy of itself with the secret removed when its
    /// rendering, or the rendering of any error in its chain, contains the secret.
    pub(crate) fn redact(mut self, secret: &str) -> Self {
        if secret.is_empty() {
            return self;
        }

        if self.message.contains(secret) {
            self.message = self.message.replace(secret, REDACTED);
        }

        if let Some(cause) = self.cause.take() {
            let chain = render_chain(&*cause);
            self.cause = if chain.contains(secret) {
                Some(Box::new(Redacted(chain.replace(secret, REDACTED))))
            } else {
                Some(cause)
            };
        }

        self
    }
}

/// The closed set of error kinds that this crate returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The network connection to a satellite or any other peer couldn't be established or it
    /// was lost.
    ConnectionFailed,
    /// The satellite rejected the credential.
    AuthenticationFailed,
    /// A credential couldn't be parsed from its encoded form.
    InvalidCredentialFormat,
    /// A scope couldn't be parsed from its serialized token or its values are invalid.
    InvalidScopeFormat,
    /// A configuration option isn't known or it has an invalid value.
    UnsupportedOption,
    /// The client context couldn't be opened.
    ClientInitializationFailed,
    /// The operation was requested on a closed manager.
    ManagerClosed,
    /// A session couldn't be derived from the client context.
    SessionEstablishmentFailed,
    /// A failure without any recognized structure. The original failure is always attached as
    /// the cause.
    Unknown,
}

impl Kind {
    /// Returns the class that this kind belongs to.
    pub fn class(&self) -> Class {
        match self {
            Self::InvalidCredentialFormat
            | Self::InvalidScopeFormat
            | Self::UnsupportedOption
            | Self::ManagerClosed => Class::Caller,
            Self::ConnectionFailed
            | Self::AuthenticationFailed
            | Self::ClientInitializationFailed
            | Self::SessionEstablishmentFailed => Class::Environment,
            Self::Unknown => Class::Unknown,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let code = match self {
            Self::ConnectionFailed => "connection failed",
            Self::AuthenticationFailed => "authentication failed",
            Self::InvalidCredentialFormat => "invalid credential format",
            Self::InvalidScopeFormat => "invalid scope format",
            Self::UnsupportedOption => "unsupported option",
            Self::ClientInitializationFailed => "client initialization failed",
            Self::ManagerClosed => "manager closed",
            Self::SessionEstablishmentFailed => "session establishment failed",
            Self::Unknown => "unknown",
        };

        write!(f, "{}", code)
    }
}

/// Partition of the error kinds by who is responsible of the failure.
///
/// This crate never retries any operation; the class helps callers to decide their own retry
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    /// Misuse of this crate. Retrying the same operation fails again.
    Caller,
    /// The network or the system failed. Retrying may succeed.
    Environment,
    /// It cannot be determined.
    Unknown,
}

/// Translates a failure returned by the collaborator into an [`Error`].
///
/// It never fails: a failure without a recognized structure is translated to
/// [`Kind::Unknown`]. The message of the returned error is the message of the failure and the
/// failure is kept as its cause.
pub fn translate(raw: BoxError) -> Error {
    let raw = match raw.downcast::<Error>() {
        Ok(err) => return *err,
        Err(raw) => raw,
    };

    let kind = if let Some(failure) = raw.downcast_ref::<collaborator::Failure>() {
        kind_from_failure_code(failure.code())
    } else if let Some(ioerr) = raw.downcast_ref::<io::Error>() {
        kind_from_io_error(ioerr)
    } else {
        Kind::Unknown
    };

    Error::with_cause(kind, raw.to_string(), raw)
}

fn kind_from_failure_code(code: u32) -> Kind {
    match code {
        collaborator::ERROR_DIAL_FAILED | collaborator::ERROR_TIMEOUT => Kind::ConnectionFailed,
        collaborator::ERROR_PERMISSION_DENIED | collaborator::ERROR_API_KEY_INVALID => {
            Kind::AuthenticationFailed
        }
        collaborator::ERROR_CONFIG_INVALID => Kind::ClientInitializationFailed,
        collaborator::ERROR_PROJECT_OPEN_FAILED => Kind::SessionEstablishmentFailed,
        _ => Kind::Unknown,
    }
}

fn kind_from_io_error(err: &io::Error) -> Kind {
    match err.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::AddrNotAvailable
        | io::ErrorKind::TimedOut
        | io::ErrorKind::BrokenPipe => Kind::ConnectionFailed,
        _ => Kind::Unknown,
    }
}

/// Renders an error and all its sources in a single line.
fn render_chain(err: &(dyn stderr::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        rendered.push_str(": ");
        rendered.push_str(&s.to_string());
        source = s.source();
    }

    rendered
}

/// A textual copy of a failure whose content had to be redacted.
#[derive(Debug)]
struct Redacted(String);

impl fmt::Display for Redacted {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.0)
    }
}

impl stderr::Error for Redacted {}
