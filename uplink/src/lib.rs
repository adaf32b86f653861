//! Storj DCS Uplink access scopes and client sessions.
//!
//! This crate drives the lifecycle of the library which performs the actual work against the
//! Storj network (connection caching, satellite RPCs, encryption and erasure coding), which is
//! abstracted by the [`Collaborator`] trait:
//!
//! 1. A [`Config`] is built from zero or more [`Opt`](config::Opt)s.
//! 2. An [`Uplink`] opens a client context with it.
//! 3. A [`Project`] session is opened from the uplink for an access [`Scope`](access::Scope),
//!    or for a satellite address and a [`Credential`](access::Credential).
//! 4. The uplink is closed explicitly or when it drops.
//!
//! All the failures are returned as an [`Error`] with a stable [`Kind`](error::Kind).
//!
//! ```ignore
//! use uplink_session::access::Scope;
//! use uplink_session::config::Opt;
//! use uplink_session::Uplink;
//!
//! let scope = Scope::parse(serialized_scope)?;
//! let mut uplink = Uplink::new(library, [Opt::InMemory])?;
//! let project = uplink.open_scope_session(&scope)?;
//! // ...
//! uplink.close()?;
//! ```

#![deny(missing_docs)]

pub(crate) mod client;
pub(crate) mod helpers;
pub(crate) mod project;

pub mod access;
pub mod collaborator;
pub mod config;
pub mod error;
pub use client::Uplink;
pub use collaborator::Collaborator;
pub use config::Config;
pub use error::Error;
pub use project::Project;

/// A specialized [`Result`](https://doc.rust-lang.org/std/result/enum.Result.html)
/// type for Storj Uplink operations.
///
/// This type is broadly used across this crate for any operations which may
/// produce an error.
///
/// This type is generally used to avoid writing out `uplink_session::Error`
/// directly and reduce repetition making the signature functions more concise.
pub type Result<T> = std::result::Result<T, error::Error>;
