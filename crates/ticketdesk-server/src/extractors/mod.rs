pub mod query;

pub use query::SearchParams;
