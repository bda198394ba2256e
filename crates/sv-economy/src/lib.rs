//! # sv-economy — Player economy for Spinvault
//!
//! Applies reel payouts to persistent player state: balances, win streaks,
//! levels, daily bonuses, the double-or-nothing gamble, achievements and
//! the cumulative leaderboard.
//!
//! ## Architecture
//!
//! ```text
//! EconomyEngine
//!     ├── ReelGenerator + PayTable   (sv-reels)
//!     ├── StdRng                     (coin flips, daily bonus)
//!     ├── PlayerStore ───────┐
//!     └── LeaderboardStore ──┴── RecordStore<V> ── Persistence<V>
//!                                                    ├── JsonFileBackend
//!                                                    └── MemoryBackend
//! Session ──> SessionSummary ──> close_session() folds into both stores
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use sv_economy::{EconomyEngine, GameConfig, Session};
//!
//! let config = GameConfig::default();
//! let mut engine = EconomyEngine::open(&config, None)?;
//! engine.login("ana")?;
//!
//! let mut session = Session::new();
//! session.record(engine.play_spin("ana", 10.0, None)?);
//! let summary = engine.close_session("ana", &session)?;
//! println!("won {:.2}", summary.total_winnings);
//! # Ok::<(), sv_economy::EconomyError>(())
//! ```

pub mod bonus;
pub mod config;
pub mod engine;
pub mod error;
pub mod gamble;
pub mod leaderboard;
pub mod player;
pub mod session;
pub mod store;

pub use bonus::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use gamble::*;
pub use leaderboard::*;
pub use player::*;
pub use session::*;
pub use store::*;
