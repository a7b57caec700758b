pub mod player_repo;

pub use player_repo::PlayerRepo;
