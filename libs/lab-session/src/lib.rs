//! lab-session - Session state for the virtual lab tools
//!
//! Everything here sits around the calculators rather than inside them:
//!
//! - **Persistence port**: [`StateStore`] with in-memory, null and JSON file backends
//! - **Favorites**: [`Favorites`] keeps the student's starred lab tools
//! - **Lesson progress**: a pure [`reduce`] function plus [`ProgressTracker`] auto-save
//! - **Playback**: [`Ticker`] frame clock and cancellable projectile [`Playback`]
//!
//! # Example
//!
//! ```rust
//! use lab_session::{MemoryStateStore, ProgressAction, ProgressTracker};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread()
//! #     .enable_all()
//! #     .build()
//! #     .unwrap();
//! # rt.block_on(async {
//! let mut tracker = ProgressTracker::load(MemoryStateStore::new(), "algebra-1")
//!     .await
//!     .unwrap();
//! tracker
//!     .apply(ProgressAction::CompleteSection { section: 0 })
//!     .await
//!     .unwrap();
//! assert!(tracker.state().completed_sections.contains(&0));
//! # });
//! ```

pub mod error;
pub mod favorites;
pub mod playback;
pub mod progress;
pub mod state;
pub mod ticker;

pub use error::{Result, SessionError};
pub use favorites::Favorites;
pub use playback::{Playback, PlaybackHandle, PlaybackOutcome};
pub use progress::{reduce, LessonProgress, ProgressAction, ProgressTracker};
pub use state::{JsonFileStateStore, MemoryStateStore, NullStateStore, StateStore};
pub use ticker::{IntervalTicker, Ticker};
