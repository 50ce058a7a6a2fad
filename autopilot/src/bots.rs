use ecocity_snake_core::constants::{GRID_CELLS, GRID_SIZE};
use ecocity_snake_core::{Direction, GridPosition, SessionState, SessionStatus};
use serde::Serialize;
use std::collections::VecDeque;

/// A bot steers a running session by proposing at most one heading per tick.
pub trait AutopilotBot: Send {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    fn next_direction(&mut self, state: &SessionState) -> Option<Direction>;
}

#[derive(Clone, Debug, Serialize)]
pub struct BotManifestEntry {
    pub id: &'static str,
    pub description: &'static str,
}

const BOT_IDS: &[&str] = &["straight", "greedy", "flood"];

pub fn bot_ids() -> &'static [&'static str] {
    BOT_IDS
}

pub fn create_bot(id: &str) -> Option<Box<dyn AutopilotBot>> {
    match id {
        "straight" => Some(Box::new(StraightBot)),
        "greedy" => Some(Box::new(GreedyBot::default())),
        "flood" => Some(Box::new(FloodBot::default())),
        _ => None,
    }
}

pub fn describe_bots() -> Vec<(&'static str, &'static str)> {
    bot_manifest_entries()
        .into_iter()
        .map(|entry| (entry.id, entry.description))
        .collect()
}

pub fn bot_manifest_entries() -> Vec<BotManifestEntry> {
    BOT_IDS
        .iter()
        .filter_map(|id| create_bot(id))
        .map(|bot| BotManifestEntry {
            id: bot.id(),
            description: bot.description(),
        })
        .collect()
}

/// Never steers. Baseline that runs into the right wall.
pub struct StraightBot;

impl AutopilotBot for StraightBot {
    fn id(&self) -> &'static str {
        "straight"
    }

    fn description(&self) -> &'static str {
        "Holds the initial heading until it hits a wall."
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_direction(&mut self, _state: &SessionState) -> Option<Direction> {
        None
    }
}

/// Heads for the collectible along the shortest axis, never into an occupied
/// or out-of-bounds cell when a safe one exists.
#[derive(Default)]
pub struct GreedyBot {
    // Breaks distance ties so seeds do not all trace the same path.
    prefer_vertical: bool,
}

impl AutopilotBot for GreedyBot {
    fn id(&self) -> &'static str {
        "greedy"
    }

    fn description(&self) -> &'static str {
        "Shortest Manhattan step toward the collectible among safe moves."
    }

    fn reset(&mut self, seed: u32) {
        self.prefer_vertical = seed & 1 == 1;
    }

    fn next_direction(&mut self, state: &SessionState) -> Option<Direction> {
        if state.status != SessionStatus::Running {
            return None;
        }
        let target = state.collectible?.position;
        let head = state.actor.head();

        candidate_moves(state)
            .filter(|&dir| is_safe(state, head.offset(dir)))
            .min_by_key(|&dir| {
                let next = head.offset(dir);
                (manhattan(next, target), self.axis_rank(dir))
            })
            .or(Some(state.direction))
    }
}

impl GreedyBot {
    fn axis_rank(&self, dir: Direction) -> u8 {
        let vertical = matches!(dir, Direction::Up | Direction::Down);
        u8::from(vertical != self.prefer_vertical)
    }
}

/// Greedy toward the collectible, but only through moves that leave enough
/// reachable space for the whole body. Falls back to the roomiest move.
#[derive(Default)]
pub struct FloodBot {
    greedy: GreedyBot,
}

impl AutopilotBot for FloodBot {
    fn id(&self) -> &'static str {
        "flood"
    }

    fn description(&self) -> &'static str {
        "Greedy pursuit gated by a flood-fill check on the space left behind."
    }

    fn reset(&mut self, seed: u32) {
        self.greedy.reset(seed);
    }

    fn next_direction(&mut self, state: &SessionState) -> Option<Direction> {
        if state.status != SessionStatus::Running {
            return None;
        }
        let target = state.collectible?.position;
        let head = state.actor.head();

        let mut scored: Vec<(Direction, usize, i32)> = candidate_moves(state)
            .filter(|&dir| is_safe(state, head.offset(dir)))
            .map(|dir| {
                let next = head.offset(dir);
                let body = body_after_move(state, next, next == target);
                (dir, reachable_cells(next, &body), manhattan(next, target))
            })
            .collect();

        if scored.is_empty() {
            return Some(state.direction);
        }

        let needed = state.actor.len() + 1;
        let roomy: Vec<_> = scored
            .iter()
            .filter(|(_, room, _)| *room >= needed)
            .copied()
            .collect();
        if !roomy.is_empty() {
            return roomy
                .into_iter()
                .min_by_key(|&(dir, _, dist)| (dist, self.greedy.axis_rank(dir)))
                .map(|(dir, _, _)| dir);
        }

        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
        scored.first().map(|(dir, _, _)| *dir)
    }
}

/// Headings the controller would accept. Reversal is refused at every length,
/// a single-segment actor included.
fn candidate_moves(state: &SessionState) -> impl Iterator<Item = Direction> {
    let reverse = state.direction.opposite();
    Direction::ALL.into_iter().filter(move |&dir| dir != reverse)
}

fn is_safe(state: &SessionState, cell: GridPosition) -> bool {
    cell.in_bounds() && !state.actor.occupies(cell)
}

fn manhattan(a: GridPosition, b: GridPosition) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

fn cell_index(cell: GridPosition) -> usize {
    (cell.y * GRID_SIZE + cell.x) as usize
}

fn body_after_move(state: &SessionState, next: GridPosition, grows: bool) -> Vec<GridPosition> {
    let mut body = Vec::with_capacity(state.actor.len() + 1);
    body.push(next);
    body.extend(state.actor.segments().copied());
    if !grows {
        body.pop();
    }
    body
}

/// Cells reachable from `from` without crossing `body`, counting `from`.
fn reachable_cells(from: GridPosition, body: &[GridPosition]) -> usize {
    let mut blocked = vec![false; GRID_CELLS];
    for cell in body {
        blocked[cell_index(*cell)] = true;
    }

    let mut queue = VecDeque::from([from]);
    blocked[cell_index(from)] = true;
    let mut count = 0;
    while let Some(cell) = queue.pop_front() {
        count += 1;
        for dir in Direction::ALL {
            let next = cell.offset(dir);
            if next.in_bounds() && !blocked[cell_index(next)] {
                blocked[cell_index(next)] = true;
                queue.push_back(next);
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecocity_snake_core::rng::ScriptedRng;
    use ecocity_snake_core::{Actor, Collectible, SessionController, StepEvent, WasteKind};

    /// Drives `bot` until the first collectible is eaten or the session ends.
    fn chase_first_collectible(bot: &mut dyn AutopilotBot, draws: Vec<u32>) -> Vec<StepEvent> {
        let mut session = SessionController::new(ScriptedRng::new(draws));
        session.start(0);
        let mut events = Vec::new();
        let mut now = 0;
        for _ in 0..100 {
            if let Some(dir) = bot.next_direction(session.state()) {
                if dir != session.state().direction {
                    assert!(session.request_direction(dir), "bot proposed refused {dir:?}");
                }
            }
            now += session.timer().period_ms();
            for report in session.advance_to(now) {
                events.push(report.event);
            }
            if session.status() != SessionStatus::Running
                || events.last() == Some(&StepEvent::Consumed)
            {
                break;
            }
        }
        events
    }

    fn running(actor: Actor, direction: Direction, target: GridPosition) -> SessionState {
        SessionState {
            status: SessionStatus::Running,
            score: 0,
            direction,
            pending_direction: direction,
            actor,
            collectible: Some(Collectible {
                position: target,
                kind: WasteKind::Paper,
            }),
        }
    }

    #[test]
    fn every_listed_bot_can_be_created() {
        for id in bot_ids() {
            let bot = create_bot(id).unwrap();
            assert_eq!(bot.id(), *id);
        }
        assert!(create_bot("nope").is_none());
        assert_eq!(bot_manifest_entries().len(), bot_ids().len());
    }

    #[test]
    fn greedy_turns_toward_target() {
        let mut bot = GreedyBot::default();
        let state = running(
            Actor::new(GridPosition::new(10, 10)),
            Direction::Right,
            GridPosition::new(10, 3),
        );
        assert_eq!(bot.next_direction(&state), Some(Direction::Up));
    }

    #[test]
    fn greedy_avoids_wall() {
        let mut bot = GreedyBot::default();
        let state = running(
            Actor::new(GridPosition::new(19, 0)),
            Direction::Right,
            GridPosition::new(19, 0).offset(Direction::Down),
        );
        let dir = bot.next_direction(&state).unwrap();
        assert!(GridPosition::new(19, 0).offset(dir).in_bounds());
    }

    #[test]
    fn greedy_never_reverses_a_long_body() {
        let mut bot = GreedyBot::default();
        let actor = Actor::from_segments([
            GridPosition::new(5, 5),
            GridPosition::new(4, 5),
            GridPosition::new(3, 5),
        ])
        .unwrap();
        let state = running(actor, Direction::Right, GridPosition::new(0, 5));
        assert_ne!(bot.next_direction(&state), Some(Direction::Left));
    }

    #[test]
    fn flood_skips_dead_end_pocket() {
        // Body walls off the single cell at (0,0); moving Up into it is a trap.
        let actor = Actor::from_segments([
            GridPosition::new(0, 1),
            GridPosition::new(1, 1),
            GridPosition::new(1, 0),
            GridPosition::new(2, 0),
        ])
        .unwrap();
        let state = running(actor, Direction::Left, GridPosition::new(0, 0));
        let mut bot = FloodBot::default();
        assert_eq!(bot.next_direction(&state), Some(Direction::Down));
    }

    #[test]
    fn single_segment_never_proposes_reversal() {
        let state = running(
            Actor::new(GridPosition::start()),
            Direction::Right,
            GridPosition::new(3, 10),
        );
        assert_ne!(GreedyBot::default().next_direction(&state), Some(Direction::Left));
        assert_ne!(FloodBot::default().next_direction(&state), Some(Direction::Left));
    }

    #[test]
    fn collectible_behind_the_head_is_reached_without_hitting_the_wall() {
        // Cell 203 is (3,10): same row as the start, behind the initial heading.
        for id in ["greedy", "flood"] {
            let mut bot = create_bot(id).unwrap();
            bot.reset(0);
            let events = chase_first_collectible(bot.as_mut(), vec![203, 0]);
            assert!(!events.contains(&StepEvent::CollidedWall), "{id}: {events:?}");
            assert_eq!(events.last(), Some(&StepEvent::Consumed), "{id}");
        }
    }

    #[test]
    fn reachable_counts_open_board() {
        let from = GridPosition::new(0, 0);
        assert_eq!(reachable_cells(from, &[from]), GRID_CELLS);
    }

    #[test]
    fn idle_session_gets_no_input() {
        let mut state = running(
            Actor::new(GridPosition::start()),
            Direction::Right,
            GridPosition::new(0, 0),
        );
        state.status = SessionStatus::GameOver;
        assert_eq!(GreedyBot::default().next_direction(&state), None);
        assert_eq!(FloodBot::default().next_direction(&state), None);
    }
}
