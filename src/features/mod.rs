pub mod builder;
pub mod calendar;
pub mod error;
pub mod feature_set;
pub mod table;
