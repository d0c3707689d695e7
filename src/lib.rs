pub mod error;
pub mod load;
pub mod split;

pub use error::SplitError;
pub use load::{load, RawTable};
pub use split::split_by_day;
