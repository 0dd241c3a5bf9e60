//! Row sources backed by files.

pub mod csv;

pub use self::csv::CsvSource;
