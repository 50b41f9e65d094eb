pub mod giveaways;
pub mod participants;
pub mod voters;

pub use giveaways as giveaway_entity;
pub use participants as participant_entity;
pub use voters as voter_entity;
pub use voters::VoteState;
