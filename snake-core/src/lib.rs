pub mod constants;
pub mod error;
pub mod grid;
pub mod input;
pub mod leaderboard;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod submission;

pub use error::{InputError, StoreError};
pub use grid::{Actor, Collectible, Direction, GridPosition, StepEvent, WasteKind};
pub use leaderboard::{build_display_leaderboard, LeaderboardEntry};
pub use rng::{RandomSource, SeededRng};
pub use session::{GameOverCause, RunResult, SessionController, SessionState, SessionStatus};
pub use submission::{
    plan_submission, submit_run, Identity, LeaderboardStore, ProfileStore, ProfileUpdate,
    SubmitReport,
};
