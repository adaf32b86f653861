//! Storj DCS Uplink client context.

use crate::access::{Credential, Scope};
use crate::collaborator::Collaborator;
use crate::config::{Config, Opt};
use crate::error::{self, Error, Kind};
use crate::{Project, Result};

use std::mem;

/// Lifecycle state of the client context of an [`Uplink`].
///
/// There isn't any "unopened" nor "failed" state: the context is opened when an `Uplink` is
/// created and if it fails, no `Uplink` is returned.
enum State<T> {
    Open(T),
    Closed,
}

/// Represents the main entry point to the Storj network.
///
/// An uplink owns a client context, which caches connections and resources, and derives from
/// it project sessions delineated by specific access scopes.
///
/// The client context is closed by [`Self::close`] or, if it wasn't explicitly closed, when the
/// uplink drops. Closing takes `&mut self`, hence it cannot run concurrently with
/// [`Self::open_session`] on the same instance.
pub struct Uplink<C: Collaborator> {
    collaborator: C,
    config: Config,
    state: State<C::Client>,
}

impl<C: Collaborator> Uplink<C> {
    /// Opens an uplink whose client context is configured with `opts`.
    ///
    /// It returns an [`UnsupportedOption`](Kind::UnsupportedOption) error if the options don't
    /// build a valid configuration (see [`Config::build`]) or a
    /// [`ClientInitializationFailed`](Kind::ClientInitializationFailed) error if the client
    /// context cannot be opened.
    pub fn new(collaborator: C, opts: impl IntoIterator<Item = Opt>) -> Result<Self> {
        let config = Config::build(opts)?;
        Self::with_config(collaborator, config)
    }

    /// Opens an uplink whose client context is configured with `config`.
    ///
    /// It returns a [`ClientInitializationFailed`](Kind::ClientInitializationFailed) error if
    /// the client context cannot be opened. The failure that caused it is its source.
    pub fn with_config(collaborator: C, config: Config) -> Result<Self> {
        tracing::debug!(
            user_agent = config.user_agent(),
            in_memory = config.is_in_memory(),
            dial_timeout_ms = config.dial_timeout().as_millis() as u64,
            max_concurrent_connections = config.max_concurrent_connections(),
            "opening client context"
        );

        let client = collaborator.open_client(&config).map_err(|raw| {
            let err = error::translate(raw);
            tracing::debug!(error = %err, "opening client context failed");

            if err.kind() == Kind::ClientInitializationFailed {
                err
            } else {
                let msg = String::from(err.message());
                Error::with_cause(Kind::ClientInitializationFailed, msg, Box::new(err))
            }
        })?;

        Ok(Self {
            collaborator,
            config,
            state: State::Open(client),
        })
    }

    /// Opens a session for the project that the satellite at `satellite_address` associates to
    /// the API key `credential`.
    ///
    /// It returns a [`ManagerClosed`](Kind::ManagerClosed) error if the uplink is closed,
    /// otherwise the translation of the collaborator's failure. The credential never appears in
    /// the returned error nor in the log events.
    pub fn open_session(
        &self,
        satellite_address: &str,
        credential: &Credential,
    ) -> Result<Project<C::Session>> {
        let client = match &self.state {
            State::Open(client) => client,
            State::Closed => {
                return Err(Error::new(Kind::ManagerClosed, "the uplink is closed"));
            }
        };

        tracing::debug!(satellite_address, "opening project session");

        let serialized = credential.serialize();
        let session = self
            .collaborator
            .open_session(client, satellite_address, serialized.as_bytes())
            .map_err(|raw| {
                let err = error::translate(raw).redact(&serialized);
                tracing::debug!(satellite_address, error = %err, "opening project session failed");
                err
            })?;

        Ok(Project::new(satellite_address, session))
    }

    /// Opens a session for the project that `scope` grants access to.
    ///
    /// It's the same than calling [`Self::open_session`] with the satellite address and the
    /// credential of `scope`.
    pub fn open_scope_session(&self, scope: &Scope) -> Result<Project<C::Session>> {
        self.open_session(scope.satellite_address(), scope.credential())
    }

    /// Closes the client context releasing its resources.
    ///
    /// The uplink is closed after calling it, even when an error is returned. Closing a closed
    /// uplink does nothing. The projects opened by this uplink aren't closed.
    pub fn close(&mut self) -> Result<()> {
        match mem::replace(&mut self.state, State::Closed) {
            State::Closed => Ok(()),
            State::Open(client) => {
                tracing::debug!("closing client context");
                self.collaborator
                    .close_client(client)
                    .map_err(error::translate)
            }
        }
    }

    /// Returns the configuration that the client context was opened with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns `true` if the client context is open.
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// Returns `true` if the uplink is closed.
    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }
}

impl<C: Collaborator> Drop for Uplink<C> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(error = %err, "closing client context on drop failed");
        }
    }
}
