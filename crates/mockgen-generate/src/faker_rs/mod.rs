pub mod adapter;
pub mod locales;

pub use adapter::{FakerSource, SUPPORTED_HINTS, ValueSource};
pub use locales::LocaleKey;
