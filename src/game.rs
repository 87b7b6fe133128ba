// 🎮 Savings Quest - Gamified Savings Tracker
// Point/XP/level/streak engine behind the savings game. Goals carry their
// own XP and streak; the player profile accumulates everything plus
// spendable store points.

use crate::calculators::goal_progress_percent;
use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

// XP awards
const GOAL_CREATED_XP: u32 = 50;
const ACTIVITY_XP: u32 = 10;
const STREAK_BONUS_PER_DAY: u32 = 5;
const MAX_CONTRIBUTION_POINTS: u32 = 50;

/// Level from total XP: exponential curve, level 1 at 0 XP.
pub fn level_for_xp(xp: u32) -> u32 {
    (xp as f64 / 100.0).sqrt().floor() as u32 + 1
}

/// Total XP required to finish the given level.
pub fn xp_for_next_level(level: u32) -> u32 {
    level * level * 100
}

// ============================================================================
// GOALS, PROFILE, ACHIEVEMENTS
// ============================================================================

/// One savings goal with its own progression state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub icon: String,
    pub level: u32,
    pub xp: u32,
    pub streak: u32,
    pub last_contribution: Option<NaiveDate>,
    pub achieved: bool,
}

impl SavingsGoal {
    fn new(name: &str, target_amount: f64, icon: &str) -> Self {
        SavingsGoal {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            target_amount,
            current_amount: 0.0,
            icon: icon.to_string(),
            level: 1,
            xp: 0,
            streak: 0,
            last_contribution: None,
            achieved: false,
        }
    }

    pub fn progress_percent(&self) -> u8 {
        goal_progress_percent(self.current_amount, self.target_amount)
    }

    pub fn is_complete(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub level: u32,
    pub xp: u32,
    /// Spendable store currency, earned per contribution
    pub points: u32,
}

impl PlayerProfile {
    fn new(name: &str) -> Self {
        PlayerProfile {
            name: name.to_string(),
            level: 1,
            xp: 0,
            points: 0,
        }
    }

    fn add_xp(&mut self, xp: u32) {
        self.xp += xp;
        self.level = level_for_xp(self.xp);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub earned_on: NaiveDate,
}

/// What one contribution earned, for the UI to celebrate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionOutcome {
    pub xp_earned: u32,
    pub points_earned: u32,
    pub streak: u32,
    pub goal_completed: bool,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// The whole game state for one player. All mutation goes through
/// `create_goal`, `contribute`, and `spend_points`; achievements are
/// appended as their triggers fire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGame {
    pub profile: PlayerProfile,
    pub goals: Vec<SavingsGoal>,
    pub achievements: Vec<Achievement>,
}

impl SavingsGame {
    pub fn new(player_name: &str) -> Self {
        SavingsGame {
            profile: PlayerProfile::new(player_name),
            goals: Vec::new(),
            achievements: Vec::new(),
        }
    }

    pub fn goal(&self, goal_id: &str) -> Option<&SavingsGoal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    /// Create a goal and award the creation XP. Milestone achievements
    /// fire at the first and third goal.
    pub fn create_goal(
        &mut self,
        name: &str,
        target_amount: f64,
        icon: &str,
        today: NaiveDate,
    ) -> Result<&SavingsGoal> {
        if name.trim().is_empty() {
            bail!("Goal name must not be empty");
        }
        if !(target_amount > 0.0) {
            bail!("Goal target must be a positive amount");
        }

        let goal_index = self.goals.len();
        self.goals.push(SavingsGoal::new(name, target_amount, icon));
        self.profile.add_xp(GOAL_CREATED_XP);

        match self.goals.len() {
            1 => self.unlock(
                "First Goal Created!",
                "You set your first savings goal.",
                today,
            ),
            3 => self.unlock(
                "Goal Master",
                "You are managing multiple goals like a pro!",
                today,
            ),
            _ => {}
        }

        Ok(&self.goals[goal_index])
    }

    /// Record a contribution toward a goal on `today`.
    ///
    /// Streak rules: a contribution the day after the previous one extends
    /// the streak and pays a 5 XP/day bonus; a second contribution the same
    /// day leaves it unchanged; any longer gap resets it to zero. Base XP
    /// is the percentage of the goal contributed; points are half that,
    /// capped at 50 per contribution.
    pub fn contribute(
        &mut self,
        goal_id: &str,
        amount: f64,
        today: NaiveDate,
    ) -> Result<ContributionOutcome> {
        if !(amount > 0.0) {
            bail!("Contribution must be a positive amount");
        }

        let goal_index = self
            .goals
            .iter()
            .position(|g| g.id == goal_id)
            .ok_or_else(|| anyhow::anyhow!("Unknown goal id: {}", goal_id))?;

        let goal = &mut self.goals[goal_index];

        let mut streak_bonus = 0;
        match goal.last_contribution {
            Some(last) if last == today - Duration::days(1) => {
                streak_bonus = goal.streak * STREAK_BONUS_PER_DAY;
                goal.streak += 1;
            }
            Some(last) if last == today => {}
            Some(_) => goal.streak = 0,
            None => {}
        }

        let percent_of_goal = amount / goal.target_amount;
        let base_xp = (percent_of_goal * 100.0).round() as u32;
        let points_earned =
            ((percent_of_goal * 50.0).round() as u32).min(MAX_CONTRIBUTION_POINTS);

        goal.current_amount += amount;
        goal.last_contribution = Some(today);
        goal.xp += base_xp + streak_bonus;
        goal.level = level_for_xp(goal.xp);

        let streak = goal.streak;
        let newly_completed = goal.is_complete() && !goal.achieved;
        if newly_completed {
            goal.achieved = true;
        }
        let goal_name = goal.name.clone();
        let goal_target = goal.target_amount;

        let xp_earned = base_xp + streak_bonus + ACTIVITY_XP;
        self.profile.add_xp(xp_earned);
        self.profile.points += points_earned;

        match streak {
            3 => self.unlock("Consistency is Key", "You saved 3 days in a row!", today),
            7 => self.unlock("Week Warrior", "You saved for 7 consecutive days!", today),
            _ => {}
        }

        if newly_completed {
            self.unlock(
                &format!("{} Completed!", goal_name),
                &format!("You reached your goal of saving {}!", goal_target),
                today,
            );
        }

        Ok(ContributionOutcome {
            xp_earned,
            points_earned,
            streak,
            goal_completed: newly_completed,
        })
    }

    /// Spend store points on an accessory. Fails when the balance is short.
    pub fn spend_points(&mut self, price: u32) -> Result<()> {
        if self.profile.points < price {
            bail!(
                "Not enough points: have {}, need {}",
                self.profile.points,
                price
            );
        }
        self.profile.points -= price;
        Ok(())
    }

    fn unlock(&mut self, title: &str, description: &str, today: NaiveDate) {
        self.achievements.push(Achievement {
            title: title.to_string(),
            description: description.to_string(),
            earned_on: today,
        });
    }
}

// ============================================================================
// TESTS
// ============================================================================
