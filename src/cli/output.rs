//! Output formatting utilities for CLI.

use kingdom::autoplay::{GameResult, Stance};
use kingdom::Kingdom;
use serde::Serialize;

/// JSON-serializable game result.
#[derive(Debug, Serialize)]
pub(super) struct JsonGameResult {
    /// Summary numbers.
    #[serde(flatten)]
    pub(super) result: GameResult,
    /// Objective completion.
    pub(super) objectives: Vec<JsonObjective>,
    /// Event log, oldest first.
    pub(super) log: Vec<String>,
}

/// JSON-serializable objective.
#[derive(Debug, Serialize)]
pub(super) struct JsonObjective {
    /// Objective id.
    pub(super) id: String,
    /// Player-facing description.
    pub(super) description: String,
    /// Whether it was met.
    pub(super) completed: bool,
}

impl JsonGameResult {
    /// Create from a result and the kingdom it ended with.
    pub(super) fn new(result: GameResult, kingdom: &Kingdom) -> Self {
        let objectives = kingdom
            .objectives()
            .iter()
            .map(|o| JsonObjective {
                id: o.id.clone(),
                description: o.description.clone(),
                completed: o.completed,
            })
            .collect();
        let mut log: Vec<String> = kingdom.state().event_log.iter().map(str::to_string).collect();
        log.reverse();
        Self {
            result,
            objectives,
            log,
        }
    }
}

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult, kingdom: &Kingdom) -> String {
    let mut output = String::new();

    output.push_str(&format!("Game Result (seed: {}, stance: {})\n", result.seed, result.stance));
    if result.fell {
        output.push_str(&format!("  The crown fell on day {}\n", result.final_day));
    } else {
        output.push_str(&format!("  The crown stood through day {}\n", result.final_day));
    }
    output.push_str(&format!("  Coins: {}\n", result.final_coins));
    output.push_str(&format!("  Greed defeated: {}\n", result.enemies_defeated));
    output.push_str(&format!(
        "  Built: {} farms, {} walls, {} archers\n\n",
        result.farms_built, result.walls_built, result.archers_trained
    ));

    output.push_str(&format!(
        "Objectives ({}/{}):\n",
        result.objectives_completed,
        kingdom.objectives().len()
    ));
    for objective in kingdom.objectives().iter() {
        let mark = if objective.completed { "x" } else { " " };
        output.push_str(&format!("  [{mark}] {}\n", objective.description));
    }

    output
}

/// Aggregated statistics over many games.
#[derive(Debug, Default)]
pub(super) struct SimulationStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Games in which the crown fell.
    pub(super) falls: u64,
    /// Sum of final days.
    total_days: u64,
    /// Final day sum of squares for std dev calculation.
    day_sq_sum: f64,
    /// Shortest game.
    min_day: Option<u32>,
    /// Longest game.
    max_day: u32,
    /// Total Greed defeated.
    total_defeated: u64,
    /// Total objectives completed.
    total_objectives: u64,
    /// Total coins held at the end.
    total_coins: u64,
}

impl SimulationStats {
    /// Create empty stats.
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Add a game result to the stats.
    pub(super) fn add_result(&mut self, result: &GameResult) {
        let day = result.final_day;
        self.games_played += 1;
        if result.fell {
            self.falls += 1;
        }
        self.total_days += u64::from(day);
        self.day_sq_sum += f64::from(day) * f64::from(day);
        self.min_day = Some(self.min_day.map_or(day, |m| m.min(day)));
        self.max_day = self.max_day.max(day);
        self.total_defeated += u64::from(result.enemies_defeated);
        self.total_objectives += result.objectives_completed as u64;
        self.total_coins += u64::from(result.final_coins);
    }

    /// Merge stats gathered on another thread.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.falls += other.falls;
        self.total_days += other.total_days;
        self.day_sq_sum += other.day_sq_sum;
        self.min_day = match (self.min_day, other.min_day) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_day = self.max_day.max(other.max_day);
        self.total_defeated += other.total_defeated;
        self.total_objectives += other.total_objectives;
        self.total_coins += other.total_coins;
    }

    fn mean(&self, total: u64) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        total as f64 / self.games_played as f64
    }

    /// Share of games in which the crown fell (0.0-1.0).
    pub(super) fn fall_rate(&self) -> f64 {
        self.mean(self.falls)
    }

    /// Average final day.
    pub(super) fn avg_day(&self) -> f64 {
        self.mean(self.total_days)
    }

    /// Final day standard deviation.
    pub(super) fn day_std_dev(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let mean = self.avg_day();
        let variance = (self.day_sq_sum / self.games_played as f64) - (mean * mean);
        if variance < 0.0 {
            0.0
        } else {
            variance.sqrt()
        }
    }

    /// Average Greed defeated per game.
    pub(super) fn avg_defeated(&self) -> f64 {
        self.mean(self.total_defeated)
    }

    /// Average objectives completed per game.
    pub(super) fn avg_objectives(&self) -> f64 {
        self.mean(self.total_objectives)
    }

    /// Average final treasury.
    pub(super) fn avg_coins(&self) -> f64 {
        self.mean(self.total_coins)
    }
}

/// JSON-serializable simulation result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulationResult {
    stance: Stance,
    games_played: u64,
    falls: u64,
    fall_rate: f64,
    avg_day: f64,
    day_std_dev: f64,
    min_day: u32,
    max_day: u32,
    avg_defeated: f64,
    avg_objectives: f64,
    avg_coins: f64,
}

impl JsonSimulationResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &SimulationStats, stance: Stance) -> Self {
        Self {
            stance,
            games_played: stats.games_played,
            falls: stats.falls,
            fall_rate: stats.fall_rate(),
            avg_day: stats.avg_day(),
            day_std_dev: stats.day_std_dev(),
            min_day: stats.min_day.unwrap_or(0),
            max_day: stats.max_day,
            avg_defeated: stats.avg_defeated(),
            avg_objectives: stats.avg_objectives(),
            avg_coins: stats.avg_coins(),
        }
    }
}

/// Format simulation stats as human-readable text.
pub(super) fn format_simulation_text(stats: &SimulationStats, stance: Stance) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Simulation Results ({} games, stance: {stance})\n",
        stats.games_played
    ));
    output.push_str("========================================\n\n");

    output.push_str(&format!(
        "Crown fell: {:.1}% ({} games)\n",
        stats.fall_rate() * 100.0,
        stats.falls
    ));
    output.push_str(&format!(
        "Final day: {:.1} (+/- {:.1}), range {}-{}\n",
        stats.avg_day(),
        stats.day_std_dev(),
        stats.min_day.unwrap_or(0),
        stats.max_day
    ));
    output.push_str(&format!("Greed defeated: {:.1} per game\n", stats.avg_defeated()));
    output.push_str(&format!("Objectives: {:.2} per game\n", stats.avg_objectives()));
    output.push_str(&format!("Final coins: {:.1}\n", stats.avg_coins()));

    output
}

/// Format simulation stats as CSV.
pub(super) fn format_simulation_csv(stats: &SimulationStats, stance: Stance) -> String {
    let mut output = String::new();

    output.push_str("stance,games,falls,fall_rate,avg_day,day_std_dev,avg_defeated,avg_objectives,avg_coins\n");
    output.push_str(&format!(
        "{},{},{},{:.4},{:.2},{:.2},{:.2},{:.2},{:.2}\n",
        stance,
        stats.games_played,
        stats.falls,
        stats.fall_rate(),
        stats.avg_day(),
        stats.day_std_dev(),
        stats.avg_defeated(),
        stats.avg_objectives(),
        stats.avg_coins()
    ));

    output
}
