pub mod catchers;
pub mod clips;
pub mod stats;

pub use catchers::*;
pub use clips::*;
pub use stats::*;
