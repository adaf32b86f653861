//! Storj DCS API key credentials and access scopes.

use crate::error::{Error, Kind};
use crate::{helpers, Result};

use std::fmt;
use std::str::FromStr;

/// Version of the scope token layout produced by [`Scope::serialize`].
const SCOPE_TOKEN_VERSION: u8 = 1;

/// Represents an API key.
///
/// An API key is opaque secret material issued by a satellite for a project. Its text form is
/// the URL-safe base64 encoding, without padding, of its bytes.
///
/// The `Debug` implementation never shows the key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential {
    key: Vec<u8>,
}

impl Credential {
    /// Parses a credential from its text form, passed as a string or as its bytes.
    ///
    /// It returns an [`InvalidCredentialFormat`](Kind::InvalidCredentialFormat) error if
    /// `encoded` isn't a canonical URL-safe base64 string without padding or it's empty.
    pub fn parse(encoded: impl AsRef<[u8]>) -> Result<Self> {
        let key = helpers::decode_fn_arg(
            Kind::InvalidCredentialFormat,
            "credential",
            encoded.as_ref(),
        )?;
        Self::from_bytes(key)
    }

    /// Creates a credential from the raw bytes of an API key.
    ///
    /// It returns an [`InvalidCredentialFormat`](Kind::InvalidCredentialFormat) error if `key`
    /// is empty.
    pub fn from_bytes(key: impl Into<Vec<u8>>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::new_invalid_credential("credential cannot be empty"));
        }

        Ok(Self { key })
    }

    /// Serializes the credential to its text form which [`Self::parse`] accepts.
    pub fn serialize(&self) -> String {
        helpers::encode(&self.key)
    }

    /// Returns the raw bytes of the API key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credential").finish_non_exhaustive()
    }
}

impl FromStr for Credential {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Represents an access scope.
///
/// A scope is a capability which combines the address of the satellite responsible for a
/// project and an API key for it. It can be serialized to a single token for delegating the
/// access without sharing the parts separately. It doesn't hold any live resource.
///
/// A satellite address has the form `[<node-id>@]<host>:<port>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    satellite_address: String,
    credential: Credential,
}

impl Scope {
    /// Creates a scope for the satellite at `satellite_address` and the API key `credential`.
    ///
    /// It returns an [`InvalidScopeFormat`](Kind::InvalidScopeFormat) error if the satellite
    /// address is invalid.
    pub fn new(satellite_address: &str, credential: Credential) -> Result<Self> {
        check_satellite_address(satellite_address)?;

        Ok(Self {
            satellite_address: String::from(satellite_address),
            credential,
        })
    }

    /// Parses a scope from a token, passed as a string or as its bytes, which
    /// [`Self::serialize`] produced.
    ///
    /// It returns an [`InvalidScopeFormat`](Kind::InvalidScopeFormat) error if the token isn't
    /// valid; a scope is never partially decoded.
    pub fn parse(token: impl AsRef<[u8]>) -> Result<Self> {
        let raw = helpers::decode_fn_arg(Kind::InvalidScopeFormat, "token", token.as_ref())?;

        let (&version, rest) = raw
            .split_first()
            .ok_or_else(|| Error::new_invalid_scope("token is empty"))?;
        if version != SCOPE_TOKEN_VERSION {
            return Err(Error::new_invalid_scope(&format!(
                "token version {} isn't supported",
                version
            )));
        }

        if rest.len() < 2 {
            return Err(Error::new_invalid_scope("token is truncated"));
        }
        let (addr_len, rest) = rest.split_at(2);
        let addr_len = u16::from_be_bytes([addr_len[0], addr_len[1]]) as usize;
        if rest.len() < addr_len {
            return Err(Error::new_invalid_scope("token is truncated"));
        }

        let (addr, key) = rest.split_at(addr_len);
        let addr = std::str::from_utf8(addr)
            .map_err(|_| Error::new_invalid_scope("satellite address isn't valid UTF-8"))?;
        if key.is_empty() {
            return Err(Error::new_invalid_scope("token doesn't contain an API key"));
        }

        let credential = Credential::from_bytes(key)
            .map_err(|err| Error::new_invalid_scope(err.message()))?;
        Self::new(addr, credential)
    }

    /// Serializes the scope to a token which [`Self::parse`] accepts.
    ///
    /// The token contains the API key, so it must be kept as secret as the API key itself.
    pub fn serialize(&self) -> String {
        let addr = self.satellite_address.as_bytes();
        let key = self.credential.as_bytes();

        let mut raw = Vec::with_capacity(3 + addr.len() + key.len());
        raw.push(SCOPE_TOKEN_VERSION);
        // The address length is checked at construction time.
        raw.extend_from_slice(&(addr.len() as u16).to_be_bytes());
        raw.extend_from_slice(addr);
        raw.extend_from_slice(key);

        helpers::encode(&raw)
    }

    /// Returns the address of the satellite of this scope.
    pub fn satellite_address(&self) -> &str {
        &self.satellite_address
    }

    /// Returns the API key of this scope.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Checks that `addr` has the form `[<node-id>@]<host>:<port>`.
fn check_satellite_address(addr: &str) -> Result<()> {
    if addr.is_empty() {
        return Err(Error::new_invalid_scope("satellite_address cannot be empty"));
    }

    if addr.len() > u16::MAX as usize {
        return Err(Error::new_invalid_scope(&format!(
            "satellite_address cannot be longer than {} bytes",
            u16::MAX
        )));
    }

    helpers::check_text_fn_arg(Kind::InvalidScopeFormat, "satellite_address", addr)?;
    if let Some(pos) = addr.find(char::is_whitespace) {
        return Err(Error::new_invalid_scope(&format!(
            "satellite_address cannot contain whitespaces. Whitespace found at {}",
            pos
        )));
    }

    let host_port = match addr.split_once('@') {
        Some(("", _)) => {
            return Err(Error::new_invalid_scope(
                "satellite_address has an empty node ID",
            ))
        }
        Some((_, host_port)) => host_port,
        None => addr,
    };

    let (host, port) = host_port
        .rsplit_once(':')
        .ok_or_else(|| Error::new_invalid_scope("satellite_address is missing the port"))?;
    if host.is_empty() {
        return Err(Error::new_invalid_scope(
            "satellite_address is missing the host",
        ));
    }

    if let Err(err) = port.parse::<u16>() {
        return Err(Error::new_invalid_scope(&format!(
            "satellite_address has an invalid port. {}",
            err
        )));
    }

    Ok(())
}
