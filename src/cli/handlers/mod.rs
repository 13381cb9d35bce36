pub mod convert;
pub mod formats;
