//! Contract of the library that performs the actual work against the Storj network.
//!
//! Connection caching, the RPCs to the satellites, the encryption key derivation and the
//! erasure coding live in the library that implements [`Collaborator`]; this crate only drives
//! its lifecycle and translates its failures (see [`translate`](crate::error::translate)).

use crate::config::Config;
use crate::error::BoxError;

/// Code of a failure without any more specific code.
pub const ERROR_INTERNAL: u32 = 0x02;
/// Code of a failure due to an operation cancellation.
pub const ERROR_CANCELED: u32 = 0x03;
/// Code of a failure due to passing a handle that isn't valid anymore.
pub const ERROR_INVALID_HANDLE: u32 = 0x04;
/// Code of a failure dialing a satellite or any other peer.
pub const ERROR_DIAL_FAILED: u32 = 0x05;
/// Code of a failure due to exceeding the dial timeout or any other network deadline.
pub const ERROR_TIMEOUT: u32 = 0x06;
/// Code of a failure due to the satellite denying the operation.
pub const ERROR_PERMISSION_DENIED: u32 = 0x07;
/// Code of a failure due to the satellite not recognizing the API key.
pub const ERROR_API_KEY_INVALID: u32 = 0x08;
/// Code of a failure due to a configuration that the library cannot use.
pub const ERROR_CONFIG_INVALID: u32 = 0x09;
/// Code of a failure opening a project.
pub const ERROR_PROJECT_OPEN_FAILED: u32 = 0x0a;

/// The operations that this crate needs from the library which does the heavy lifting.
///
/// All of them are blocking and may perform network or file system I/O. Any failure is
/// returned as a [`BoxError`] which is translated by this crate into one of its
/// [error kinds](crate::error::Kind); implementations should prefer returning a [`Failure`]
/// so their failures are translated to the most specific kind.
pub trait Collaborator {
    /// The live client context; it's exclusively owned by the manager that opened it.
    type Client;
    /// A session derived from a client context; it's owned by the caller.
    type Session;

    /// Opens a client context with the passed configuration.
    fn open_client(&self, config: &Config) -> Result<Self::Client, BoxError>;

    /// Derives a session from `client` for the satellite at `satellite_address` authorized by
    /// the serialized API key `credential`.
    ///
    /// `credential` is secret material; implementations must not include it in the returned
    /// failures.
    fn open_session(
        &self,
        client: &Self::Client,
        satellite_address: &str,
        credential: &[u8],
    ) -> Result<Self::Session, BoxError>;

    /// Closes a client context, releasing its resources.
    fn close_client(&self, client: Self::Client) -> Result<(), BoxError>;
}

/// A failure reported by the library with one of the `ERROR_*` codes of this module.
///
/// Codes not defined by this module are accepted and translated as
/// [`Kind::Unknown`](crate::error::Kind::Unknown).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    code: u32,
    message: String,
}

impl Failure {
    /// Creates a failure with a code and the message that describes it.
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns the failure code.
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Returns the failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
