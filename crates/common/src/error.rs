//! Errors for the shared instruction model.

use thiserror::Error;

/// A mnemonic that names no instruction kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown instruction mnemonic '{0}'")]
pub struct UnknownMnemonic(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_mnemonic() {
        assert_eq!(
            UnknownMnemonic("halt".to_string()).to_string(),
            "unknown instruction mnemonic 'halt'"
        );
    }
}
