pub mod settings;

pub use settings::{Gateway, History, LiveFeed, Logger, Settings};
