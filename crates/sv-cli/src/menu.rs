//! Main menu and play loop

use std::io::{BufRead, Write};

use anyhow::Result;
use sv_economy::{
    CoinSide, DailyBonus, EconomyEngine, EconomyError, GambleOutcome, PendingSpin, Session,
};
use sv_reels::PayTier;

use crate::prompt::{Prompter, positive_amount, positive_count};

/// What the main loop does next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// One logged-in player at the machine
pub struct Menu<R, W> {
    engine: EconomyEngine,
    prompter: Prompter<R, W>,
    player: String,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(engine: EconomyEngine, prompter: Prompter<R, W>, player: String) -> Self {
        Self {
            engine,
            prompter,
            player,
        }
    }

    /// Show the menu until the player exits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.prompter.say("")?;
            self.prompter.say(format!("===== MAIN MENU ({}) =====", self.player))?;
            self.prompter.say("1. Play Slot Machine")?;
            self.prompter.say("2. Claim Daily Bonus")?;
            self.prompter.say("3. View Leaderboard")?;
            self.prompter.say("4. Check Achievements")?;
            self.prompter.say("5. Show Stats")?;
            self.prompter.say("6. Exit")?;

            let Some(choice) = self.prompter.ask("Choose an option: ")? else {
                return Ok(());
            };
            let flow = match choice.as_str() {
                "1" => self.play()?,
                "2" => self.daily_bonus()?,
                "3" => self.leaderboard()?,
                "4" => self.achievements()?,
                "5" => self.stats()?,
                "6" => Flow::Exit,
                _ => {
                    self.prompter.say("Invalid option.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                self.prompter.say("Thanks for playing!")?;
                return Ok(());
            }
        }
    }

    fn play(&mut self) -> Result<Flow> {
        let balance = self.engine.balance(&self.player)?;
        self.prompter.say(format!("Your balance: {balance:.2}"))?;

        let Some(spins) = self.prompter.ask_until(
            "How many spins would you like to play? ",
            "Invalid input.",
            positive_count,
        )?
        else {
            return Ok(Flow::Exit);
        };

        let mut session = Session::new();
        for i in 1..=spins {
            let balance = self.engine.balance(&self.player)?;
            let Some(answer) = self
                .prompter
                .ask(&format!("Spin {i}: Enter your bet (Current Balance: {balance:.2}): "))?
            else {
                break;
            };
            let Some(bet) = positive_amount(&answer) else {
                self.prompter.say("Invalid bet. Spin skipped.")?;
                continue;
            };

            let mut pending = match self.engine.spin(&self.player, bet) {
                Ok(pending) => pending,
                Err(e) if e.is_recoverable() => {
                    self.prompter.say(format!("{e}. Spin skipped."))?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let evaluation = pending.evaluation();
            let reels = pending.outcome().display(self.engine.symbols());
            self.prompter.say(match evaluation.tier {
                PayTier::Jackpot { .. } => {
                    format!("JACKPOT! {reels} - You win {:.2}!", evaluation.winnings)
                }
                PayTier::Pair { .. } => format!("Nice! {reels} - You win {:.2}!", evaluation.winnings),
                PayTier::NoMatch => format!("{reels} - No match. You lost your bet."),
            })?;

            if self.prompter.confirm("Play Double or Nothing? (y/n): ")? {
                self.double_or_nothing(&mut pending)?;
            }

            let spin = self.engine.settle(pending)?;
            if spin.streak_bonus > 0.0 {
                self.prompter.say(format!(
                    "Streak Bonus! You gained {:.2} for a {}-win streak!",
                    spin.streak_bonus, spin.streak
                ))?;
            }
            if spin.leveled_up {
                self.prompter
                    .say(format!("Congrats {}, you've reached Level {}!", self.player, spin.level))?;
            }
            session.record(spin);
        }

        if session.is_empty() {
            self.prompter.say("No spins played.")?;
            return Ok(Flow::Continue);
        }

        self.spin_table(&session)?;
        let summary = self.engine.close_session(&self.player, &session)?;
        self.prompter.say("")?;
        self.prompter.say("===== SESSION SUMMARY =====")?;
        self.prompter.say(format!("Total Spins     : {}", summary.spins))?;
        self.prompter.say(format!("Total Bet       : {:.2}", summary.total_bet))?;
        self.prompter.say(format!("Total Winnings  : {:.2}", summary.total_winnings))?;
        self.prompter.say(format!("Win Rate        : {:.1}%", summary.win_rate * 100.0))?;
        self.prompter.say(format!("Final Balance   : {:.2}", summary.final_balance))?;
        self.prompter.say("============================")?;
        if summary.leveled_up {
            self.prompter.say(format!(
                "Congrats {}, you've reached Level {}!",
                self.player, summary.level
            ))?;
        }
        Ok(Flow::Continue)
    }

    fn double_or_nothing(&mut self, pending: &mut PendingSpin) -> Result<()> {
        if pending.winnings() <= 0.0 {
            self.prompter.say("No winnings to gamble.")?;
            return Ok(());
        }
        self.prompter.say("Double or Nothing! Guess heads or tails.")?;
        let call = match self.prompter.ask_parsed::<CoinSide>("Enter 'heads' or 'tails': ")? {
            Some(Ok(call)) => call,
            Some(Err(e)) => {
                self.prompter.say(format!("{e}. Gamble skipped."))?;
                return Ok(());
            }
            None => return Ok(()),
        };

        match self.engine.gamble_spin(pending, call)? {
            GambleOutcome::NothingToGamble => self.prompter.say("No winnings to gamble.")?,
            GambleOutcome::Won { flip, stake, .. } => {
                self.prompter.say(format!("Coin toss: {flip}"))?;
                self.prompter.say(format!("You won an extra {stake:.2}!"))?;
            }
            GambleOutcome::Lost { flip, .. } => {
                self.prompter.say(format!("Coin toss: {flip}"))?;
                self.prompter.say("You lost your winnings.")?;
            }
        }
        Ok(())
    }

    fn spin_table(&mut self, session: &Session) -> Result<()> {
        self.prompter.say("")?;
        self.prompter.say("----- SPIN RESULTS -----")?;
        self.prompter.say(format!(
            "{:<5} {:<20} {:<8} {:<10} {:<10}",
            "Spin", "Symbols", "Bet", "Winnings", "Balance"
        ))?;
        for spin in session.spins() {
            let reels = spin.outcome.display(self.engine.symbols());
            self.prompter.say(format!(
                "{:<5} {:<20} {:<8.2} {:<10.2} {:<10.2}",
                spin.index, reels, spin.bet, spin.winnings, spin.balance
            ))?;
        }
        self.prompter.say("------------------------")?;
        Ok(())
    }

    fn daily_bonus(&mut self) -> Result<Flow> {
        match self.engine.claim_daily_bonus(&self.player)? {
            DailyBonus::Claimed { amount, balance } => self.prompter.say(format!(
                "Daily Bonus: You received {amount:.2}! New balance: {balance:.2}"
            ))?,
            DailyBonus::AlreadyClaimed { .. } => {
                self.prompter.say("You already claimed your daily bonus.")?
            }
        }
        Ok(Flow::Continue)
    }

    fn leaderboard(&mut self) -> Result<Flow> {
        let top = self.engine.leaderboard(None);
        if top.is_empty() {
            self.prompter.say("No leaderboard data yet.")?;
            return Ok(Flow::Continue);
        }
        self.prompter.say("")?;
        self.prompter.say("===== LEADERBOARD =====")?;
        for entry in top {
            self.prompter
                .say(format!("{}. {:<12} {:.2}", entry.rank, entry.name, entry.score))?;
        }
        self.prompter.say("=======================")?;
        Ok(Flow::Continue)
    }

    fn achievements(&mut self) -> Result<Flow> {
        let unlocked = self.engine.achievements(&self.player)?;
        if unlocked.is_empty() {
            self.prompter.say("No achievements yet.")?;
            return Ok(Flow::Continue);
        }
        self.prompter.say("Achievements Unlocked:")?;
        for achievement in unlocked {
            self.prompter.say(format!("- {}", achievement.title()))?;
        }
        Ok(Flow::Continue)
    }

    fn stats(&mut self) -> Result<Flow> {
        let snapshot = self.engine.player(&self.player)?;
        let record = &snapshot.record;
        self.prompter.say("")?;
        self.prompter.say("===== PLAYER STATS =====")?;
        self.prompter.say(format!("Player         : {}", snapshot.name))?;
        self.prompter.say(format!("Level          : {}", record.level))?;
        self.prompter.say(format!("Balance        : {:.2}", record.balance))?;
        self.prompter.say(format!("Total Winnings : {:.2}", record.total_won))?;
        self.prompter.say(format!("Games Played   : {}", record.games))?;
        self.prompter.say(format!("Win Streak     : {}", record.streak))?;
        self.prompter.say("========================")?;
        Ok(Flow::Continue)
    }
}

/// Ask for a player name until a usable one is given, then log in
pub fn login<R: BufRead, W: Write>(
    engine: &EconomyEngine,
    prompter: &mut Prompter<R, W>,
    name: Option<String>,
) -> Result<Option<String>> {
    let mut preset = name;
    loop {
        let answer = match preset.take() {
            Some(name) => name,
            None => match prompter.ask("Enter your player name: ")? {
                Some(answer) => answer,
                None => return Ok(None),
            },
        };
        match engine.login(&answer) {
            Ok(login) => {
                if login.created {
                    prompter.say("Creating new player profile...")?;
                } else {
                    prompter.say(format!("Welcome back, {}!", login.name))?;
                }
                return Ok(Some(login.name));
            }
            Err(EconomyError::EmptyName) => prompter.say("Invalid name.")?,
            Err(e) => return Err(e.into()),
        }
    }
}
