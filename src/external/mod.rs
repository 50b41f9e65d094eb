pub mod capability;
pub mod telegram;

pub use capability::*;
pub use telegram::*;
