//! Spatial state of the board and the per-tick step function.
//!
//! [`step`] is a pure transition: it reads the current actor, collectible and
//! heading and returns the proposed next values plus the event that produced
//! them. Nothing here owns session state; the controller decides what to keep.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::{
    GRID_CELLS, GRID_SIZE, PLACEMENT_MAX_DRAWS, SCORE_CAN, SCORE_PAPER, SCORE_PLASTIC, START_X,
    START_Y,
};
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn start() -> Self {
        Self::new(START_X, START_Y)
    }

    pub fn in_bounds(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    pub fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    fn from_cell_index(index: u32) -> Self {
        let index = index as i32;
        Self::new(index % GRID_SIZE, index / GRID_SIZE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Screen coordinates: `y` grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteKind {
    Plastic,
    Paper,
    Can,
}

impl WasteKind {
    pub const ALL: [WasteKind; 3] = [Self::Plastic, Self::Paper, Self::Can];

    pub fn points(self) -> u32 {
        match self {
            Self::Plastic => SCORE_PLASTIC,
            Self::Paper => SCORE_PAPER,
            Self::Can => SCORE_CAN,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plastic => "plastic",
            Self::Paper => "paper",
            Self::Can => "can",
        }
    }

    fn random(rng: &mut impl RandomSource) -> Self {
        Self::ALL[rng.next_below(Self::ALL.len() as u32) as usize]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectible {
    pub position: GridPosition,
    pub kind: WasteKind,
}

/// Head-first body. Never empty, including after deserialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ActorRepr")]
pub struct Actor {
    segments: VecDeque<GridPosition>,
}

#[derive(Deserialize)]
struct ActorRepr {
    segments: VecDeque<GridPosition>,
}

impl TryFrom<ActorRepr> for Actor {
    type Error = &'static str;

    fn try_from(repr: ActorRepr) -> Result<Self, Self::Error> {
        Self::from_segments(repr.segments).ok_or("actor needs at least one segment")
    }
}

impl Actor {
    pub fn new(head: GridPosition) -> Self {
        Self {
            segments: VecDeque::from([head]),
        }
    }

    /// Build an actor from explicit segments, head first. Returns `None` for
    /// an empty body.
    pub fn from_segments(segments: impl IntoIterator<Item = GridPosition>) -> Option<Self> {
        let segments: VecDeque<GridPosition> = segments.into_iter().collect();
        if segments.is_empty() {
            return None;
        }
        Some(Self { segments })
    }

    pub fn head(&self) -> GridPosition {
        // Non-empty by construction.
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn occupies(&self, position: GridPosition) -> bool {
        self.segments.contains(&position)
    }

    pub fn segments(&self) -> impl Iterator<Item = &GridPosition> {
        self.segments.iter()
    }

    pub fn to_vec(&self) -> Vec<GridPosition> {
        self.segments.iter().copied().collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepEvent {
    Moved,
    Consumed,
    CollidedWall,
    CollidedSelf,
}

impl StepEvent {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::CollidedWall | Self::CollidedSelf)
    }
}

/// Proposed result of one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    pub event: StepEvent,
    pub actor: Actor,
    /// `None` only after a `Consumed` step that left no free cell.
    pub collectible: Option<Collectible>,
    /// Points earned this tick (non-zero only for `Consumed`).
    pub points: u32,
}

/// Advance the board by one tick in `direction`.
pub fn step(
    actor: &Actor,
    collectible: &Collectible,
    direction: Direction,
    rng: &mut impl RandomSource,
) -> StepOutcome {
    let candidate = actor.head().offset(direction);

    if !candidate.in_bounds() {
        return StepOutcome {
            event: StepEvent::CollidedWall,
            actor: actor.clone(),
            collectible: Some(*collectible),
            points: 0,
        };
    }

    // The tail cell is checked too, even though it would be vacated this tick.
    if actor.occupies(candidate) {
        return StepOutcome {
            event: StepEvent::CollidedSelf,
            actor: actor.clone(),
            collectible: Some(*collectible),
            points: 0,
        };
    }

    let mut next = actor.clone();
    next.segments.push_front(candidate);

    if candidate == collectible.position {
        let relocated = place_collectible(&next, rng);
        return StepOutcome {
            event: StepEvent::Consumed,
            actor: next,
            collectible: relocated,
            points: collectible.kind.points(),
        };
    }

    next.segments.pop_back();
    StepOutcome {
        event: StepEvent::Moved,
        actor: next,
        collectible: Some(*collectible),
        points: 0,
    }
}

/// Place a collectible of random kind on a uniformly random cell the actor
/// does not occupy. Returns `None` when the actor covers the whole board.
pub fn place_collectible(actor: &Actor, rng: &mut impl RandomSource) -> Option<Collectible> {
    if actor.len() >= GRID_CELLS {
        return None;
    }

    let cells = GRID_CELLS as u32;
    for _ in 0..PLACEMENT_MAX_DRAWS {
        let position = GridPosition::from_cell_index(rng.next_below(cells));
        if !actor.occupies(position) {
            return Some(Collectible {
                position,
                kind: WasteKind::random(rng),
            });
        }
    }

    // Crowded board: pick uniformly among what is left.
    let free: Vec<GridPosition> = (0..cells)
        .map(GridPosition::from_cell_index)
        .filter(|position| !actor.occupies(*position))
        .collect();
    if free.is_empty() {
        return None;
    }
    let position = free[rng.next_below(free.len() as u32) as usize];
    Some(Collectible {
        position,
        kind: WasteKind::random(rng),
    })
}
