pub mod config;
pub mod error;
pub mod i18n;
pub mod locale;

pub use config::AtelierConfig;
pub use error::{AtelierError, Result};
pub use i18n::{translations, Translations};
pub use locale::{Direction, Locale};
