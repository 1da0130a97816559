//! View state for the discovery grid and the watch page.
//!
//! Everything here is plain state plus async drivers that talk to a
//! [`provider::DataProvider`]. Rendering is someone else's job; the server
//! crate serializes these states as JSON.

pub mod engagement;
pub mod feed;
pub mod format;
pub mod gate;
pub mod player;
pub mod route;
pub mod search;
pub mod session;
pub mod watch;

pub use engagement::{CommentError, CommentThread, Engagement};
pub use feed::{FeedController, FeedEngine, FeedPhase, FeedSnapshot, LoadOutcome, ScrollMetrics};
pub use gate::{AuthPrompt, GatedAction};
pub use player::PlaybackControls;
pub use route::Route;
pub use search::SearchBox;
pub use session::{SessionState, SessionStore};
pub use watch::{WatchPage, WatchState, WatchView, load_watch_page};
