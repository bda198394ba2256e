//! Economy rules engine
//!
//! One spin runs in two phases so a gamble can sit between them:
//!
//! ```text
//! spin()    debit bet → credit winnings → last_win → streak   (persist)
//! gamble()  optional, any number of times while last_win > 0  (persist)
//! settle()  streak bonus → level check                        (persist)
//! ```
//!
//! `settle` consumes the [`PendingSpin`], so the streak bonus is paid at
//! most once per spin.

use chrono::{Local, NaiveDate};
use rand::prelude::*;
use serde::Serialize;
use sv_reels::{Evaluation, PayTable, ReelGenerator, ReelOutcome, SymbolSet};

use crate::bonus::{self, Achievement, DailyBonus};
use crate::config::{EconomyConfig, GameConfig};
use crate::error::{EconomyError, EconomyResult};
use crate::gamble::{self, CoinSide, GambleOutcome};
use crate::leaderboard::{LeaderboardEntry, LeaderboardStore};
use crate::player::{PlayerRecord, PlayerSnapshot};
use crate::session::{Session, SessionSummary, SpinRecord};
use crate::store::PlayerStore;

/// Offset between the reel seed and the coin/bonus seed
const AUX_SEED_SALT: u64 = 0x5EED_C0FF_EE00_0001;

/// Result of [`EconomyEngine::login`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Login {
    /// Trimmed name the record is stored under
    pub name: String,
    pub record: PlayerRecord,
    /// First time this name was seen
    pub created: bool,
}

/// A spin whose payout is applied but whose streak bonus and level check
/// have not run yet. Finish it with [`EconomyEngine::settle`].
#[derive(Debug)]
#[must_use = "a pending spin must be settled"]
pub struct PendingSpin {
    name: String,
    bet: f64,
    outcome: ReelOutcome,
    evaluation: Evaluation,
    streak: u32,
    balance: f64,
    gambles: Vec<GambleOutcome>,
}

impl PendingSpin {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bet(&self) -> f64 {
        self.bet
    }

    pub fn outcome(&self) -> ReelOutcome {
        self.outcome
    }

    pub fn evaluation(&self) -> Evaluation {
        self.evaluation
    }

    pub fn winnings(&self) -> f64 {
        self.evaluation.winnings
    }

    /// Streak after this spin's result
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Balance right after the payout was credited
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Gambles played on this spin, in order
    pub fn gambles(&self) -> &[GambleOutcome] {
        &self.gambles
    }

    fn record_gamble(&mut self, outcome: GambleOutcome) {
        if outcome != GambleOutcome::NothingToGamble {
            self.gambles.push(outcome);
        }
    }
}

/// Spin resolution and player economy
pub struct EconomyEngine {
    config: EconomyConfig,
    paytable: PayTable,
    reels: ReelGenerator,
    /// Coin flips and bonus draws, independent of the reels
    rng: StdRng,
    players: PlayerStore,
    leaderboard: LeaderboardStore,
}

impl EconomyEngine {
    /// Create an engine with OS-seeded randomness. Fails on an invalid config.
    pub fn new(
        config: EconomyConfig,
        symbols: SymbolSet,
        players: PlayerStore,
        leaderboard: LeaderboardStore,
    ) -> EconomyResult<Self> {
        config.validate()?;
        Ok(Self {
            paytable: PayTable::with_pair_multiplier(symbols.clone(), config.pair_multiplier),
            reels: ReelGenerator::new(symbols),
            rng: StdRng::from_os_rng(),
            config,
            players,
            leaderboard,
        })
    }

    /// Create an engine whose reels, coin flips and bonus draws replay
    /// identically for the same seed
    pub fn seeded(
        config: EconomyConfig,
        symbols: SymbolSet,
        players: PlayerStore,
        leaderboard: LeaderboardStore,
        seed: u64,
    ) -> EconomyResult<Self> {
        let mut engine = Self::new(config, symbols, players, leaderboard)?;
        engine.seed(seed);
        Ok(engine)
    }

    /// Open the JSON stores named by `config` with the classic symbol set
    pub fn open(config: &GameConfig, seed: Option<u64>) -> EconomyResult<Self> {
        let players = PlayerStore::json_file(config.storage.players_path())?;
        let leaderboard = LeaderboardStore::json_file(config.storage.leaderboard_path())?;
        let symbols = SymbolSet::classic();

        match seed {
            Some(seed) => Self::seeded(config.economy.clone(), symbols, players, leaderboard, seed),
            None => Self::new(config.economy.clone(), symbols, players, leaderboard),
        }
    }

    /// Reseed both random streams
    pub fn seed(&mut self, seed: u64) {
        self.reels.seed(seed);
        self.rng = StdRng::seed_from_u64(seed ^ AUX_SEED_SALT);
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn symbols(&self) -> &SymbolSet {
        self.paytable.symbols()
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    pub fn players(&self) -> &PlayerStore {
        &self.players
    }

    pub fn leaderboard_store(&self) -> &LeaderboardStore {
        &self.leaderboard
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PLAYERS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Load a player, creating them with the starting balance on first sight
    pub fn login(&self, name: &str) -> EconomyResult<Login> {
        let name = normalize_name(name)?;
        let created = self
            .players
            .insert_if_absent(name, PlayerRecord::new(self.config.starting_balance))?;
        if created {
            log::info!(
                "Created player {} with balance {:.2}",
                name,
                self.config.starting_balance
            );
        }
        let record = self.record(name)?;
        Ok(Login {
            name: name.to_string(),
            record,
            created,
        })
    }

    pub fn balance(&self, name: &str) -> EconomyResult<f64> {
        Ok(self.record(name)?.balance)
    }

    pub fn player(&self, name: &str) -> EconomyResult<PlayerSnapshot> {
        let name = normalize_name(name)?;
        Ok(PlayerSnapshot {
            name: name.to_string(),
            record: self.record(name)?,
        })
    }

    fn record(&self, name: &str) -> EconomyResult<PlayerRecord> {
        let name = normalize_name(name)?;
        self.players
            .get(name)
            .ok_or_else(|| EconomyError::UnknownPlayer(name.to_string()))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPINS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Draw the reels and apply the payout
    pub fn spin(&mut self, name: &str, bet: f64) -> EconomyResult<PendingSpin> {
        validate_bet(bet)?;
        // Reject before drawing so a refused bet does not advance the reels
        let balance = self.balance(name)?;
        if bet > balance {
            log::warn!("Bet {:.2} exceeds balance {:.2} for {}", bet, balance, name.trim());
            return Err(EconomyError::InsufficientBalance { bet, balance });
        }
        let outcome = self.reels.draw();
        self.spin_with_outcome(name, bet, outcome)
    }

    /// Apply the payout for a known outcome
    pub fn spin_with_outcome(
        &self,
        name: &str,
        bet: f64,
        outcome: ReelOutcome,
    ) -> EconomyResult<PendingSpin> {
        validate_bet(bet)?;
        let name = normalize_name(name)?;
        let evaluation = self.paytable.evaluate(&outcome, bet);

        let applied = self.players.try_update(name, |record| {
            if bet > record.balance {
                return Err(EconomyError::InsufficientBalance {
                    bet,
                    balance: record.balance,
                });
            }
            record.balance -= bet;
            record.balance += evaluation.winnings;
            record.last_win = evaluation.winnings;
            record.streak = if evaluation.is_win() {
                record.streak + 1
            } else {
                0
            };
            Ok((record.streak, record.balance))
        });

        let (streak, balance) = match applied {
            Ok(Some(applied)) => applied,
            Ok(None) => return Err(EconomyError::UnknownPlayer(name.to_string())),
            Err(e) => {
                if e.is_recoverable() {
                    log::warn!("Spin rejected for {}: {}", name, e);
                }
                return Err(e);
            }
        };

        log::debug!(
            "{} spun {} for {:.2}: {} pays {:.2}, streak {}",
            name,
            outcome.display(self.paytable.symbols()),
            bet,
            evaluation.tier.display_name(),
            evaluation.winnings,
            streak
        );

        Ok(PendingSpin {
            name: name.to_string(),
            bet,
            outcome,
            evaluation,
            streak,
            balance,
            gambles: Vec::new(),
        })
    }

    /// Pay the streak bonus and run the level check
    pub fn settle(&self, pending: PendingSpin) -> EconomyResult<SpinRecord> {
        let threshold = self.config.streak_bonus_threshold;
        let per_win = self.config.streak_bonus_per_win;

        let settled = self.players.try_update(&pending.name, |record| {
            let streak_bonus = if record.streak >= threshold {
                record.streak as f64 * per_win
            } else {
                0.0
            };
            record.balance += streak_bonus;
            let leveled_up = self.apply_level_check(record);
            Ok::<_, EconomyError>(SpinRecord {
                index: 0,
                outcome: pending.outcome,
                tier: pending.evaluation.tier,
                bet: pending.bet,
                winnings: pending.evaluation.winnings,
                gambles: pending.gambles.clone(),
                streak: record.streak,
                streak_bonus,
                level: record.level,
                leveled_up,
                balance: record.balance,
            })
        })?;

        let spin = settled.ok_or_else(|| EconomyError::UnknownPlayer(pending.name.clone()))?;
        if spin.streak_bonus > 0.0 {
            log::info!(
                "{} earned a {:.2} streak bonus ({} in a row)",
                pending.name,
                spin.streak_bonus,
                spin.streak
            );
        }
        Ok(spin)
    }

    /// Spin, optionally gamble the winnings once, and settle
    pub fn play_spin(
        &mut self,
        name: &str,
        bet: f64,
        gamble: Option<CoinSide>,
    ) -> EconomyResult<SpinRecord> {
        let mut pending = self.spin(name, bet)?;
        if let Some(call) = gamble {
            self.gamble_spin(&mut pending, call)?;
        }
        self.settle(pending)
    }

    /// Play `count` spins at a fixed bet without gambling.
    ///
    /// Spins the balance cannot cover are skipped, as are any after it.
    pub fn play_spins(&mut self, name: &str, count: u32, bet: f64) -> EconomyResult<Session> {
        if count == 0 {
            return Err(EconomyError::InvalidSpinCount);
        }
        let mut session = Session::new();
        for _ in 0..count {
            match self.play_spin(name, bet, None) {
                Ok(spin) => {
                    session.record(spin);
                }
                Err(EconomyError::InsufficientBalance { .. }) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(session)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // GAMBLE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Double-or-nothing on the player's `last_win` with a fresh coin flip
    pub fn gamble(&mut self, name: &str, call: CoinSide) -> EconomyResult<GambleOutcome> {
        let record = self.record(name)?;
        if record.last_win <= 0.0 {
            return Ok(GambleOutcome::NothingToGamble);
        }
        let flip = CoinSide::flip(&mut self.rng);
        self.gamble_with_flip(name, call, flip)
    }

    /// Double-or-nothing with a known flip
    pub fn gamble_with_flip(
        &self,
        name: &str,
        call: CoinSide,
        flip: CoinSide,
    ) -> EconomyResult<GambleOutcome> {
        let name = normalize_name(name)?;
        if self.record(name)?.last_win <= 0.0 {
            log::debug!("{} has nothing to gamble", name);
            return Ok(GambleOutcome::NothingToGamble);
        }

        let outcome = self
            .players
            .try_update(name, |record| {
                Ok::<_, EconomyError>(gamble::settle_gamble(
                    &mut record.balance,
                    &mut record.last_win,
                    call,
                    flip,
                ))
            })?
            .ok_or_else(|| EconomyError::UnknownPlayer(name.to_string()))?;

        log::debug!(
            "{} called {} and the coin shows {}: {:+.2}",
            name,
            call,
            flip,
            outcome.delta()
        );
        Ok(outcome)
    }

    /// Gamble on a pending spin and remember the result for its record
    pub fn gamble_spin(
        &mut self,
        pending: &mut PendingSpin,
        call: CoinSide,
    ) -> EconomyResult<GambleOutcome> {
        let outcome = self.gamble(&pending.name, call)?;
        pending.record_gamble(outcome);
        Ok(outcome)
    }

    /// [`gamble_spin`](Self::gamble_spin) with a known flip
    pub fn gamble_spin_with_flip(
        &self,
        pending: &mut PendingSpin,
        call: CoinSide,
        flip: CoinSide,
    ) -> EconomyResult<GambleOutcome> {
        let outcome = self.gamble_with_flip(&pending.name, call, flip)?;
        pending.record_gamble(outcome);
        Ok(outcome)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BONUSES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Claim today's bonus
    pub fn claim_daily_bonus(&mut self, name: &str) -> EconomyResult<DailyBonus> {
        self.claim_daily_bonus_on(name, Local::now().date_naive())
    }

    /// Claim the bonus for `date`; a second claim on the same date is a no-op
    pub fn claim_daily_bonus_on(&mut self, name: &str, date: NaiveDate) -> EconomyResult<DailyBonus> {
        let name = normalize_name(name)?;
        let (min, max) = (self.config.daily_bonus_min, self.config.daily_bonus_max);
        let rng = &mut self.rng;

        let claim = self
            .players
            .try_update(name, |record| {
                if record.claimed_bonus_on(date) {
                    return Ok::<_, EconomyError>(DailyBonus::AlreadyClaimed { date });
                }
                let amount = rng.random_range(min..=max) as f64;
                Ok(bonus::apply_daily_bonus(record, date, amount))
            })?
            .ok_or_else(|| EconomyError::UnknownPlayer(name.to_string()))?;

        match claim {
            DailyBonus::Claimed { amount, balance } => {
                log::info!("{} claimed a daily bonus of {:.2}, balance {:.2}", name, amount, balance)
            }
            DailyBonus::AlreadyClaimed { date } => {
                log::debug!("{} already claimed the bonus for {}", name, date)
            }
        }
        Ok(claim)
    }

    pub fn achievements(&self, name: &str) -> EconomyResult<Vec<Achievement>> {
        let record = self.record(name)?;
        Ok(bonus::achievements(&record, &self.config.achievements))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SESSIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Fold a finished session into the player and leaderboard stores.
    ///
    /// An empty session is reported but not folded.
    pub fn close_session(&self, name: &str, session: &Session) -> EconomyResult<SessionSummary> {
        let name = normalize_name(name)?;
        if session.is_empty() {
            let record = self.record(name)?;
            return Ok(session.summary(record.balance, record.level));
        }

        let total_winnings = session.total_winnings();
        let (balance, level, leveled_up) = self
            .players
            .try_update(name, |record| {
                record.total_won += total_winnings;
                record.games += 1;
                let leveled_up = self.apply_level_check(record);
                Ok::<_, EconomyError>((record.balance, record.level, leveled_up))
            })?
            .ok_or_else(|| EconomyError::UnknownPlayer(name.to_string()))?;

        let score = self.leaderboard.add_score(name, total_winnings)?;
        let summary = SessionSummary {
            leveled_up,
            ..session.summary(balance, level)
        };
        log::info!(
            "{} closed a session: {} spins, won {:.2} of {:.2} bet, leaderboard {:.2}",
            name,
            summary.spins,
            summary.total_winnings,
            summary.total_bet,
            score
        );
        Ok(summary)
    }

    /// Top entries; `None` means the configured leaderboard size
    pub fn leaderboard(&self, n: Option<usize>) -> Vec<LeaderboardEntry> {
        self.leaderboard
            .top(n.unwrap_or(self.config.leaderboard_size))
    }

    /// Raise the level to match `total_won`. Never lowers it.
    fn apply_level_check(&self, record: &mut PlayerRecord) -> bool {
        let target = self.config.level_for(record.total_won);
        if target > record.level {
            log::info!("Level up: {} -> {}", record.level, target);
            record.level = target;
            true
        } else {
            false
        }
    }
}

fn normalize_name(name: &str) -> EconomyResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EconomyError::EmptyName);
    }
    Ok(name)
}

fn validate_bet(bet: f64) -> EconomyResult<()> {
    if bet.is_finite() && bet > 0.0 {
        Ok(())
    } else {
        log::warn!("Rejected bet {}", bet);
        Err(EconomyError::InvalidBet { bet })
    }
}
