//! Sanity bounds applied while decoding length-prefixed binary values.

use serde::Deserialize;

use crate::error::{Result, WireError};

/// Upper bound for a single string's byte length, inclusive.
pub const MAX_STRING_BYTES_CEILING: usize = 64 * 1024 * 1024;
/// Upper bound for a single list's element count, inclusive.
pub const MAX_LIST_LEN_CEILING: usize = 16 * 1024 * 1024;

/// Length-prefix bounds. A prefix above the bound is treated as corrupt input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecodeLimits {
    #[serde(default = "default_max_string_bytes")]
    pub max_string_bytes: usize,

    #[serde(default = "default_max_list_len")]
    pub max_list_len: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_string_bytes: default_max_string_bytes(),
            max_list_len: default_max_list_len(),
        }
    }
}

impl DecodeLimits {
    /// Widest accepted bounds; used for bytes produced in-process.
    pub fn ceiling() -> Self {
        Self {
            max_string_bytes: MAX_STRING_BYTES_CEILING,
            max_list_len: MAX_LIST_LEN_CEILING,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_STRING_BYTES_CEILING).contains(&self.max_string_bytes) {
            return Err(WireError::Config(format!(
                "codec.max_string_bytes must be between 1 and {MAX_STRING_BYTES_CEILING}"
            )));
        }
        if !(1..=MAX_LIST_LEN_CEILING).contains(&self.max_list_len) {
            return Err(WireError::Config(format!(
                "codec.max_list_len must be between 1 and {MAX_LIST_LEN_CEILING}"
            )));
        }
        Ok(())
    }
}

fn default_max_string_bytes() -> usize {
    1024 * 1024
}
fn default_max_list_len() -> usize {
    65_536
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(DecodeLimits::default().validate().is_ok());
    }

    #[test]
    fn zero_bounds_rejected() {
        let lim = DecodeLimits {
            max_string_bytes: 0,
            ..DecodeLimits::default()
        };
        assert_eq!(lim.validate().unwrap_err().code().as_str(), "CONFIG_ERROR");
    }
}
