//! Helper functions which are used across the modules of this crate.

use crate::error::{Error, Kind};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

/// Checks that a function text argument doesn't contain any control character and if it does, it
/// returns an error of `kind` mentioning the passed argument's name.
pub(crate) fn check_text_fn_arg(kind: Kind, arg_name: &str, arg_val: &str) -> Result<(), Error> {
    match arg_val.char_indices().find(|(_, c)| c.is_control()) {
        Some((pos, _)) => Err(Error::new(
            kind,
            format!(
                "{} cannot contain control characters. Control character found at {}",
                arg_name, pos
            ),
        )),
        None => Ok(()),
    }
}

/// Decodes a function argument encoded in URL-safe base64 without padding and if it isn't, it
/// returns an error of `kind` mentioning the passed argument's name.
///
/// Only canonical encodings are accepted, so encoding the returned bytes produces `arg_val`.
///
/// The error never contains any part of `arg_val` because it may be secret material.
pub(crate) fn decode_fn_arg(kind: Kind, arg_name: &str, arg_val: &[u8]) -> Result<Vec<u8>, Error> {
    URL_SAFE_NO_PAD.decode(arg_val).map_err(|_| {
        Error::new(
            kind,
            format!("{} isn't a canonical URL-safe base64 string without padding", arg_name),
        )
    })
}

/// Encodes `bytes` in URL-safe base64 without padding.
pub(crate) fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}
