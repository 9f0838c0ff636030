//! Core types for the TOTP display engine.

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Algorithm
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Hash algorithm used for HMAC-based code derivation.
///
/// SHA-1 is the default and what standard authenticator secrets expect;
/// the others exist so the hash can be swapped without touching the
/// truncation or time-step logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Sha1
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
            Self::Sha512 => write!(f, "SHA512"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generation parameters: digit width, time-step period, hash.
///
/// The defaults (6 digits, 30 seconds, SHA-1) match every secret the
/// original pages handled; non-default values are validated once at
/// construction so the generation path stays total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotpConfig {
    /// Number of digits in the generated code.
    pub digits: u8,
    /// Time-step period in seconds.
    pub period: u32,
    /// HMAC hash algorithm.
    pub algorithm: Algorithm,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            digits: 6,
            period: 30,
            algorithm: Algorithm::Sha1,
        }
    }
}

impl TotpConfig {
    /// Smallest accepted digit width (one page variant renders 5-digit codes).
    pub const MIN_DIGITS: u8 = 5;
    /// Largest accepted digit width: 10^9 still covers the 31-bit truncated value.
    pub const MAX_DIGITS: u8 = 9;

    /// Build a validated configuration.
    pub fn new(digits: u8, period: u32, algorithm: Algorithm) -> Result<Self, TotpError> {
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(TotpError::new(
                TotpErrorKind::InvalidDigits,
                format!(
                    "digits must be {}..={}, got {}",
                    Self::MIN_DIGITS,
                    Self::MAX_DIGITS,
                    digits
                ),
            ));
        }
        if period == 0 {
            return Err(TotpError::new(TotpErrorKind::InvalidPeriod, "period must be non-zero"));
        }
        Ok(Self {
            digits,
            period,
            algorithm,
        })
    }

    /// Builder: set digit width.
    pub fn with_digits(self, digits: u8) -> Result<Self, TotpError> {
        Self::new(digits, self.period, self.algorithm)
    }

    /// Builder: set period.
    pub fn with_period(self, period: u32) -> Result<Self, TotpError> {
        Self::new(self.digits, period, self.algorithm)
    }

    /// Builder: set hash algorithm.
    pub fn with_algorithm(self, algorithm: Algorithm) -> Self {
        Self { algorithm, ..self }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Current code
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A derived code pinned to the time step it was derived for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentCode {
    /// Fixed-width decimal code string, leading zeros preserved.
    pub code: String,
    /// The time-step counter the code belongs to.
    pub step: u64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Error kind for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotpErrorKind {
    /// No secret material at all after cleaning (user hasn't typed yet).
    EmptySecret,
    /// Secret contains non-Base32 characters or decodes to zero bytes.
    InvalidSecret,
    InvalidDigits,
    InvalidPeriod,
    /// A share link or path segment could not be parsed.
    InvalidLink,
}

/// Crate-level error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotpError {
    pub kind: TotpErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl fmt::Display for TotpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(d) = &self.detail {
            write!(f, " ({})", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for TotpError {}

impl TotpError {
    pub fn new(kind: TotpErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<TotpError> for String {
    fn from(e: TotpError) -> String {
        e.to_string()
    }
}
