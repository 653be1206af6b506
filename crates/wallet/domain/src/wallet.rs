//! Wallet credentials carried by requests.

use core::{fmt, str::FromStr};

use zeroize::{Zeroize, ZeroizeOnDrop};

/// The name of a wallet in the wallet store.
///
/// Only non-blank names are representable; whether the wallet exists is resolved by the
/// wallet store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalletName(String);

/// The password unlocking a wallet.
///
/// The secret is wiped from memory on drop and never rendered by [`fmt::Debug`].
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct WalletPassword(String);

/// Errors that can occur when constructing wallet credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletValueError {
    /// The wallet name is empty or whitespace only.
    #[error("wallet name must not be blank")]
    BlankName,

    /// The wallet password is empty or whitespace only.
    #[error("wallet password must not be blank")]
    BlankPassword,
}

impl WalletName {
    /// Creates a wallet name.
    ///
    /// # Errors
    ///
    /// Returns [`WalletValueError::BlankName`] for blank names.
    pub fn new(name: impl Into<String>) -> Result<Self, WalletValueError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(WalletValueError::BlankName);
        }

        Ok(Self(name))
    }

    /// Returns the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for WalletName {
    type Err = WalletValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for WalletName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl WalletPassword {
    /// Creates a wallet password.
    ///
    /// # Errors
    ///
    /// Returns [`WalletValueError::BlankPassword`] for blank passwords.
    pub fn new(password: impl Into<String>) -> Result<Self, WalletValueError> {
        let mut password = password.into();

        if password.trim().is_empty() {
            password.zeroize();
            return Err(WalletValueError::BlankPassword);
        }

        Ok(Self(password))
    }

    /// Returns the secret. Callers must not log or persist it.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WalletPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WalletPassword(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert_eq!(WalletName::new(""), Err(WalletValueError::BlankName));
        assert_eq!(" \t".parse::<WalletName>(), Err(WalletValueError::BlankName));
        assert_eq!(WalletPassword::new("   "), Err(WalletValueError::BlankPassword));
    }

    #[test]
    fn names_keep_their_text() {
        let name = WalletName::new("savings").unwrap();

        assert_eq!(name.as_str(), "savings");
        assert_eq!(name.to_string(), "savings");
    }

    #[test]
    fn password_is_redacted() {
        let password = WalletPassword::new("correct horse").unwrap();

        assert_eq!(password.expose_secret(), "correct horse");
        assert_eq!(format!("{password:?}"), "WalletPassword(<redacted>)");
    }
}
