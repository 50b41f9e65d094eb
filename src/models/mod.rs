pub mod common;
pub mod giveaway;
pub mod leaderboard;
pub mod participant;
pub mod requirement;
pub mod user;
pub mod voter;

pub use common::*;
pub use giveaway::*;
pub use leaderboard::*;
pub use participant::*;
pub use requirement::*;
pub use user::*;
pub use voter::*;
