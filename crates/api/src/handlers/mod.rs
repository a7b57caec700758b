pub mod admin;
pub mod health;
pub mod leaderboard;
pub mod players;
