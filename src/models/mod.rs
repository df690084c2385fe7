pub mod macros;
pub mod settings;
pub mod time;
pub mod weekday;

pub use settings::*;
pub use time::*;
pub use weekday::*;
