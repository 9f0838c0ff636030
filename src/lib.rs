//! # Toolbox – TOTP Code Display Engine
//!
//! The engine behind the toolbox `/2fa` pages:
//!
//! - **RFC 4226 / 6238** – TOTP generation with SHA-1 (default), SHA-256, SHA-512
//! - **Base32 secrets** – Tolerant decoding (whitespace, dashes, mixed case,
//!   optional padding) with empty and invalid input kept distinct
//! - **Countdown bookkeeping** – Time-step counter and seconds-remaining
//!   aligned to 30-second UNIX-epoch boundaries, always derived from a single
//!   explicitly-passed instant
//! - **Display session** – A caller-ticked state machine that re-derives the
//!   code only when the time step rolls over and surfaces sentinel states
//!   instead of crashing the refresh loop
//! - **Share links** – Build and parse `/2fa/2fa/<secret>` quick-access paths

pub mod totp;
