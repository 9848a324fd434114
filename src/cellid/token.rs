//! Compact hexadecimal tokens for cell identifiers
//!
//! A token is the 16-digit lowercase hex form of the identifier with trailing
//! zeros removed, so coarse cells get short tokens. The invalid identifier `0`
//! is spelled `X`.

use std::str::FromStr;

use super::CellId;
use crate::error::{CellError, Result};

const MAX_TOKEN_LEN: usize = 16;

impl CellId {
    /// Encode as a token
    ///
    /// # Example
    ///
    /// ```
    /// use rust_s2_cells::CellId;
    ///
    /// let face = CellId::from_face(5).unwrap();
    /// assert_eq!(face.to_token(), "b");
    /// assert_eq!(CellId::from_token("b").unwrap(), face);
    /// ```
    pub fn to_token(&self) -> String {
        if self.0 == 0 {
            return "X".to_string();
        }
        let hex = format!("{:016x}", self.0);
        hex.trim_end_matches('0').to_string()
    }

    /// Decode a token produced by [`CellId::to_token`]
    ///
    /// Upper-case digits are accepted. The result is not checked for
    /// validity; `X` decodes to [`CellId::none`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` for an empty token, more than 16 digits, or a
    /// non-hexadecimal character
    pub fn from_token(token: &str) -> Result<CellId> {
        if token == "X" {
            return Ok(CellId::none());
        }
        if token.is_empty()
            || token.len() > MAX_TOKEN_LEN
            || !token.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(CellError::InvalidToken(token.to_string()));
        }
        let value = u64::from_str_radix(token, 16)
            .map_err(|_| CellError::InvalidToken(token.to_string()))?;
        Ok(CellId(value << (4 * (MAX_TOKEN_LEN - token.len()))))
    }
}

impl FromStr for CellId {
    type Err = CellError;

    fn from_str(s: &str) -> Result<CellId> {
        CellId::from_token(s)
    }
}
