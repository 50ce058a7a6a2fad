// Board
pub const GRID_SIZE: i32 = 20;
pub const GRID_CELLS: usize = (GRID_SIZE * GRID_SIZE) as usize;
pub const START_X: i32 = 10;
pub const START_Y: i32 = 10;

// Timing
pub const TICK_INTERVAL_MS: u64 = 150;

// Scoring (points per consumed collectible)
pub const SCORE_PLASTIC: u32 = 10;
pub const SCORE_PAPER: u32 = 5;
pub const SCORE_CAN: u32 = 15;

// Placement: rejection draws before falling back to a free-cell scan.
pub const PLACEMENT_MAX_DRAWS: u32 = 64;

// Leaderboard
pub const LEADERBOARD_DISPLAY_LIMIT: usize = 10;
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";
