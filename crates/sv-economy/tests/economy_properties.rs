//! Player economy integration tests
//!
//! Drives the engine through its public API only:
//! - Payout tiers over every outcome
//! - Streak and level invariants across many spins
//! - Daily bonus, gamble and leaderboard rules
//! - JSON persistence across restarts

use chrono::NaiveDate;
use sv_economy::{
    CoinSide, DailyBonus, EconomyConfig, EconomyEngine, EconomyError, GambleOutcome, GameConfig,
    LeaderboardStore, PlayerStore, Session, StorageConfig,
};
use sv_reels::{PayTable, PayTier, ReelOutcome, SymbolSet};

const PLAYER: &str = "ana";
const BELL: u32 = 3;

fn memory_engine(seed: u64) -> EconomyEngine {
    let engine = EconomyEngine::seeded(
        EconomyConfig::default(),
        SymbolSet::classic(),
        PlayerStore::in_memory(),
        LeaderboardStore::in_memory(),
        seed,
    )
    .unwrap();
    engine.login(PLAYER).unwrap();
    engine
}

fn all_outcomes(symbols: &SymbolSet) -> Vec<ReelOutcome> {
    let ids: Vec<u32> = symbols.iter().map(|s| s.id).collect();
    let mut outcomes = Vec::new();
    for &a in &ids {
        for &b in &ids {
            for &c in &ids {
                outcomes.push(ReelOutcome::new(a, b, c));
            }
        }
    }
    outcomes
}

// ═══════════════════════════════════════════════════════════════════════════════
// PAYOUT TIERS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_payout_tiers_over_all_outcomes() {
    let symbols = SymbolSet::classic();
    let table = PayTable::new(symbols.clone());
    let bet = 3.0;

    for outcome in all_outcomes(&symbols) {
        let [a, b, c] = outcome.0;
        let winnings = table.resolve(&outcome, bet);
        if a == b && b == c {
            let multiplier = symbols.multiplier(a).unwrap() as f64;
            assert_eq!(winnings, bet * multiplier, "{outcome:?}");
            assert!(winnings > bet * 2.0);
        } else if a == b || b == c || a == c {
            assert_eq!(winnings, bet * 2.0, "{outcome:?}");
        } else {
            assert_eq!(winnings, 0.0, "{outcome:?}");
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SPIN RULES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_end_to_end_jackpot_session() {
    let engine = memory_engine(1);
    let pending = engine
        .spin_with_outcome(PLAYER, 10.0, ReelOutcome::new(BELL, BELL, BELL))
        .unwrap();
    let mut session = Session::new();
    let spin = session.record(engine.settle(pending).unwrap()).clone();

    assert_eq!(spin.index, 1);
    assert!(matches!(spin.tier, PayTier::Jackpot { multiplier: 10, .. }));
    assert_eq!(spin.balance, 190.0);
    assert_eq!(spin.streak, 1);

    engine.close_session(PLAYER, &session).unwrap();
    let record = engine.player(PLAYER).unwrap().record;
    assert_eq!(record.total_won, 100.0);
    assert_eq!(record.balance, 190.0);
}

#[test]
fn test_streak_equals_winning_suffix() {
    let mut engine = memory_engine(42);
    let mut winnings = Vec::new();

    for _ in 0..300 {
        if engine.balance(PLAYER).unwrap() < 1.0 {
            break;
        }
        let spin = engine.play_spin(PLAYER, 1.0, None).unwrap();
        winnings.push(spin.winnings);

        let suffix = winnings.iter().rev().take_while(|&&w| w > 0.0).count() as u32;
        assert_eq!(spin.streak, suffix);
    }
    assert!(winnings.len() > 10);
}

#[test]
fn test_level_matches_total_won_after_every_session() {
    let mut engine = memory_engine(9);
    let config = engine.config().clone();

    for _ in 0..20 {
        let balance = engine.balance(PLAYER).unwrap();
        if balance < 5.0 {
            break;
        }
        let session = engine.play_spins(PLAYER, 10, 5.0).unwrap();
        engine.close_session(PLAYER, &session).unwrap();

        let record = engine.player(PLAYER).unwrap().record;
        assert_eq!(record.level, config.level_for(record.total_won));
    }
}

#[test]
fn test_rejected_bet_leaves_state_untouched() {
    let mut engine = memory_engine(3);
    let before = engine.player(PLAYER).unwrap();

    let err = engine.spin(PLAYER, 150.0).unwrap_err();
    assert!(matches!(
        err,
        EconomyError::InsufficientBalance {
            bet: 150.0,
            balance: 100.0
        }
    ));
    assert_eq!(engine.player(PLAYER).unwrap(), before);
}

// ═══════════════════════════════════════════════════════════════════════════════
// GAMBLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Spin a pair at bet 20 so `last_win` is 40
fn engine_with_stake_of_40() -> EconomyEngine {
    let engine = memory_engine(5);
    let pending = engine
        .spin_with_outcome(PLAYER, 20.0, ReelOutcome::new(1, 1, 2))
        .unwrap();
    assert_eq!(pending.winnings(), 40.0);
    engine.settle(pending).unwrap();
    engine
}

#[test]
fn test_gamble_win_doubles_stake() {
    let engine = engine_with_stake_of_40();
    let before = engine.balance(PLAYER).unwrap();

    let outcome = engine
        .gamble_with_flip(PLAYER, CoinSide::Heads, CoinSide::Heads)
        .unwrap();
    assert_eq!(outcome.delta(), 40.0);

    let record = engine.player(PLAYER).unwrap().record;
    assert_eq!(record.balance, before + 40.0);
    assert_eq!(record.last_win, 80.0);
}

#[test]
fn test_gamble_loss_clears_stake() {
    let engine = engine_with_stake_of_40();
    let before = engine.balance(PLAYER).unwrap();

    let outcome = engine
        .gamble_with_flip(PLAYER, CoinSide::Heads, CoinSide::Tails)
        .unwrap();
    assert_eq!(outcome.delta(), -40.0);

    let record = engine.player(PLAYER).unwrap().record;
    assert_eq!(record.balance, before - 40.0);
    assert_eq!(record.last_win, 0.0);

    // The stake is gone; a second gamble has nothing to play with
    assert_eq!(
        engine
            .gamble_with_flip(PLAYER, CoinSide::Heads, CoinSide::Heads)
            .unwrap(),
        GambleOutcome::NothingToGamble
    );
}

#[test]
fn test_gamble_loss_may_go_negative() {
    let engine = memory_engine(6);
    // Bet everything on a pair, then lose the winnings
    let pending = engine
        .spin_with_outcome(PLAYER, 100.0, ReelOutcome::new(4, 2, 4))
        .unwrap();
    engine.settle(pending).unwrap();
    engine
        .players()
        .update(PLAYER, |r| r.balance = 50.0)
        .unwrap();

    engine
        .gamble_with_flip(PLAYER, CoinSide::Tails, CoinSide::Heads)
        .unwrap();
    assert_eq!(engine.balance(PLAYER).unwrap(), -150.0);
}

// ═══════════════════════════════════════════════════════════════════════════════
// BONUS & LEADERBOARD
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_daily_bonus_once_per_date() {
    let mut engine = memory_engine(11);
    let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

    let first = engine.claim_daily_bonus_on(PLAYER, day).unwrap();
    let after_first = engine.balance(PLAYER).unwrap();
    assert!(matches!(first, DailyBonus::Claimed { .. }));

    let second = engine.claim_daily_bonus_on(PLAYER, day).unwrap();
    assert_eq!(second, DailyBonus::AlreadyClaimed { date: day });
    assert_eq!(engine.balance(PLAYER).unwrap(), after_first);

    let next_day = day.succ_opt().unwrap();
    assert!(matches!(
        engine.claim_daily_bonus_on(PLAYER, next_day).unwrap(),
        DailyBonus::Claimed { .. }
    ));
}

#[test]
fn test_leaderboard_accumulates_sessions() {
    let engine = memory_engine(12);
    for bet in [25.0, 15.0] {
        let mut session = Session::new();
        // A pair pays bet x 2: 50 then 30
        let pending = engine
            .spin_with_outcome(PLAYER, bet, ReelOutcome::new(6, 7, 6))
            .unwrap();
        session.record(engine.settle(pending).unwrap());
        engine.close_session(PLAYER, &session).unwrap();
    }

    let top = engine.leaderboard(None);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, PLAYER);
    assert_eq!(top[0].score, 80.0);
    assert_eq!(engine.player(PLAYER).unwrap().record.games, 2);
}

// ═══════════════════════════════════════════════════════════════════════════════
// PERSISTENCE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig {
        economy: EconomyConfig::default(),
        storage: StorageConfig {
            data_dir: dir.path().join("data"),
            ..Default::default()
        },
    };

    let expected = {
        let mut engine = EconomyEngine::open(&config, Some(77)).unwrap();
        engine.login(PLAYER).unwrap();
        let session = engine.play_spins(PLAYER, 5, 2.0).unwrap();
        engine.close_session(PLAYER, &session).unwrap();
        engine.player(PLAYER).unwrap()
    };

    let engine = EconomyEngine::open(&config, None).unwrap();
    let login = engine.login(PLAYER).unwrap();
    assert!(!login.created);
    assert_eq!(engine.player(PLAYER).unwrap(), expected);
    assert_eq!(
        engine.leaderboard(None)[0].score,
        expected.record.total_won
    );
    assert!(config.storage.players_path().exists());
    assert!(config.storage.leaderboard_path().exists());
}

#[test]
fn test_open_rejects_invalid_economy() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig {
        economy: EconomyConfig {
            daily_bonus_min: 50,
            daily_bonus_max: 5,
            ..EconomyConfig::default()
        },
        storage: StorageConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        },
    };
    assert!(matches!(
        EconomyEngine::open(&config, Some(1)),
        Err(EconomyError::Config(_))
    ));
}

#[test]
fn test_reads_existing_player_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("players.json");
    std::fs::write(
        &path,
        r#"{
  "bob": {
    "balance": 320.5,
    "total_won": 610.0,
    "games": 7,
    "last_bonus": "2024-11-02",
    "level": 4,
    "streak": 0,
    "last_win": 0.0
  }
}"#,
    )
    .unwrap();

    let engine = EconomyEngine::new(
        EconomyConfig::default(),
        SymbolSet::classic(),
        PlayerStore::json_file(&path).unwrap(),
        LeaderboardStore::in_memory(),
    )
    .unwrap();
    let record = engine.player("bob").unwrap().record;
    assert_eq!(record.balance, 320.5);
    assert_eq!(record.level, 4);
    assert_eq!(
        record.last_bonus_date,
        NaiveDate::from_ymd_opt(2024, 11, 2)
    );
    assert_eq!(engine.achievements("bob").unwrap().len(), 2);
}
