//! Storj DCS Project.

/// A session for a project, derived from a client context and an access scope.
///
/// It's owned by the caller. The [`Uplink`](crate::Uplink) that opened it doesn't keep track of
/// it and doesn't close it when it's closed; whether the session is still usable after that
/// depends on the library that implements the [`Collaborator`](crate::Collaborator).
#[derive(Debug)]
pub struct Project<S> {
    /// The satellite address that the session was opened for.
    satellite_address: String,
    /// The session value returned by the collaborator.
    inner: S,
}

impl<S> Project<S> {
    pub(crate) fn new(satellite_address: &str, inner: S) -> Self {
        Self {
            satellite_address: String::from(satellite_address),
            inner,
        }
    }

    /// Returns the address of the satellite that the session was opened for.
    pub fn satellite_address(&self) -> &str {
        &self.satellite_address
    }

    /// Returns a reference to the underlying session.
    pub fn handle(&self) -> &S {
        &self.inner
    }

    /// Returns a mutable reference to the underlying session.
    pub fn handle_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consumes this project returning the underlying session.
    pub fn into_inner(self) -> S {
        self.inner
    }
}
