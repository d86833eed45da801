pub mod console;
pub mod control;
pub mod feed;
pub mod history;
pub mod monitor;
pub mod settings;

pub use console::CommandError;
pub use control::ControlError;
pub use feed::FeedError;
pub use history::HistoryError;
pub use monitor::MonitorError;
pub use settings::SettingsError;
