//! # sv-reels — Reel draw and payout resolution for Spinvault
//!
//! Turns a random draw over a fixed symbol set into a winnings amount.
//! Holds no player state; the economy layer owns balances and streaks.
//!
//! ## Architecture
//!
//! ```text
//! SymbolSet (immutable, supplied at construction)
//!     │
//!     ├── ReelGenerator ──> ReelOutcome [a, b, c]
//!     │                          │
//!     └── PayTable ──────────────┴──> Evaluation { tier, winnings }
//! ```

pub mod draw;
pub mod error;
pub mod paytable;
pub mod symbols;

pub use draw::*;
pub use error::*;
pub use paytable::*;
pub use symbols::*;
