pub mod client_log;
pub mod giveaway;
pub mod participant;
pub mod voter;

pub use client_log::client_log_config;
pub use giveaway::giveaway_config;
pub use participant::participant_config;
pub use voter::voter_config;
