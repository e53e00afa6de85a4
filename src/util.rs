pub mod date;

pub use date::{DateError, parse_date};
