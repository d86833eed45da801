pub mod control;
pub mod history;
pub mod live_feed;
pub mod transcript;

pub use control::HeatingControl;
pub use history::{HistoryClient, HistoryState};
pub use live_feed::{Connector, FeedEvent, LinkState, LiveFeed, MessageStream, WebSocketConnector};
pub use transcript::Transcript;
