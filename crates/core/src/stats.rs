//! Admin dashboard aggregates computed over a roster snapshot.

use serde::Serialize;

use crate::player::Player;

/// Headline numbers shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_players: usize,
    /// Mean WPM rounded to one decimal, `0.0` for an empty roster.
    pub average_wpm: f64,
    /// Mean accuracy rounded to one decimal, `0.0` for an empty roster.
    pub average_accuracy: f64,
}

impl DashboardStats {
    pub fn from_players(players: &[Player]) -> Self {
        let total_players = players.len();
        if total_players == 0 {
            return Self {
                total_players,
                average_wpm: 0.0,
                average_accuracy: 0.0,
            };
        }

        let count = total_players as f64;
        let wpm_sum: f64 = players.iter().map(|p| p.wpm).sum();
        let accuracy_sum: f64 = players.iter().map(|p| p.accuracy).sum();

        Self {
            total_players,
            average_wpm: round_one_decimal(wpm_sum / count),
            average_accuracy: round_one_decimal(accuracy_sum / count),
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn player(wpm: f64, accuracy: f64) -> Player {
        Player {
            id: Uuid::new_v4(),
            name: "p".into(),
            wpm,
            accuracy,
            rank: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_roster_reports_zeroes() {
        let stats = DashboardStats::from_players(&[]);
        assert_eq!(stats.total_players, 0);
        assert_eq!(stats.average_wpm, 0.0);
        assert_eq!(stats.average_accuracy, 0.0);
    }

    #[test]
    fn averages_are_rounded_to_one_decimal() {
        let stats = DashboardStats::from_players(&[
            player(120.0, 98.0),
            player(95.0, 99.0),
            player(150.0, 97.5),
        ]);
        assert_eq!(stats.total_players, 3);
        assert_eq!(stats.average_wpm, 121.7);
        assert_eq!(stats.average_accuracy, 98.2);
    }
}
