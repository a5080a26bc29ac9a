//! Order source abstraction and the simple sources.

mod file;
mod traits;
mod unavailable;

pub use file::JsonFileSource;
pub use traits::OrderSource;
pub use unavailable::UnavailableSource;
