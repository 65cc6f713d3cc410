mod card;
mod fares;
mod journey;
mod journey_log;
mod money;
mod station;

pub use card::*;
pub use fares::*;
pub use journey::*;
pub use journey_log::*;
pub use money::*;
pub use station::*;
