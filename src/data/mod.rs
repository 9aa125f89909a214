pub mod config;
pub mod locale;
pub mod model;
pub mod persistence;
pub mod selection;
pub mod validation;

pub use config::DatepickerConfig;
pub use persistence::Persistable;
