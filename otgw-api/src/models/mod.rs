mod history;

pub use history::{Channel, FeedEntry, FeedResponse, HistoryData, TimeSeriesPoint};
