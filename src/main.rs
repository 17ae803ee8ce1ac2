/// Entry point and session loop.

mod ui;

use crossterm::event;
use tracing::{info, warn};

use starpusher::config::{GameConfig, PlayConfig};
use starpusher::domain::entity::PuzzleState;
use starpusher::logging;
use starpusher::sim::event::GameEvent;
use starpusher::sim::level::{self, LevelPack};
use starpusher::sim::save::{self, SaveData};
use starpusher::sim::world::WorldState;
use ui::input::{self, Command};
use ui::renderer::{Renderer, Scene};

fn main() {
    let data_dir = save::save_dir();
    if let Err(e) = logging::init(&data_dir.join(logging::LOG_FILE)) {
        eprintln!("Logging disabled: {e}");
    }

    let config = GameConfig::load();
    let pack = level::load_pack(&config.levels_file);
    if pack.is_empty() {
        eprintln!("No levels found in {}", config.levels_file.display());
        return;
    }

    let save_path = data_dir.join(&config.save_file);
    let resume = save::load_session(&save_path).unwrap_or_else(|e| {
        warn!("{e}; starting from the first level");
        None
    });

    let mut session = Session::new(pack, config.play.clone(), resume);
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = session_loop(&mut session, &mut renderer);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    if let Err(e) = save::save_session(&save_path, &session.save_data()) {
        warn!("{e}");
        eprintln!("Could not save progress: {e}");
    }

    println!();
    println!("Thanks for playing Star Pusher!");
}

// ══════════════════════════════════════════════════════════════
// Session: which level is up and its engine
// ══════════════════════════════════════════════════════════════

struct Session {
    pack: LevelPack,
    play: PlayConfig,
    /// 0-based pack index.
    index: usize,
    /// None when the current level failed to load; see `load_error`.
    world: Option<WorldState>,
    load_error: String,
    solved: bool,
    message: String,
}

impl Session {
    fn new(pack: LevelPack, play: PlayConfig, resume: Option<SaveData>) -> Self {
        let mut session = Session {
            pack,
            play,
            index: 0,
            world: None,
            load_error: String::new(),
            solved: false,
            message: String::new(),
        };
        match resume {
            Some(data) if data.level < session.pack.len() => {
                session.open(data.level, data.snapshot);
            }
            Some(data) => {
                warn!(level = data.level, levels = session.pack.len(), "saved level out of range");
                session.open(0, None);
            }
            None => session.open(0, None),
        }
        session
    }

    /// Switch to level `index`, resuming `snapshot` if it fits.
    fn open(&mut self, index: usize, snapshot: Option<PuzzleState>) {
        self.index = index;
        self.solved = false;
        self.message.clear();
        self.load_error.clear();
        self.world = match &self.pack[index] {
            Ok(level) => {
                let limit = self.play.history_limit;
                let restored = snapshot.and_then(|snap| {
                    WorldState::restore(level, snap, limit)
                        .map_err(|e| warn!(level = level.number, "{e}; starting level fresh"))
                        .ok()
                });
                info!(level = level.number, resumed = restored.is_some(), "level opened");
                Some(restored.unwrap_or_else(|| WorldState::with_history_limit(level, limit)))
            }
            Err(e) => {
                warn!(index, "{e}");
                self.load_error = e.to_string();
                None
            }
        };
    }

    /// One level forward or back, wrapping around the pack.
    fn advance(&mut self, forward: bool) {
        let len = self.pack.len();
        let next = if forward { (self.index + 1) % len } else { (self.index + len - 1) % len };
        self.open(next, None);
    }

    fn save_data(&self) -> SaveData {
        match &self.world {
            Some(_) if self.solved => SaveData::level_start((self.index + 1) % self.pack.len()),
            Some(world) => SaveData::capture(self.index, world),
            None => SaveData::level_start(self.index),
        }
    }

    fn scene(&self) -> Scene<'_> {
        let total = self.pack.len();
        match &self.world {
            Some(world) if self.solved => Scene::Solved { world, total },
            Some(world) => Scene::Playing { world, total, message: &self.message },
            None => Scene::LevelError { number: self.index + 1, total, error: &self.load_error },
        }
    }

    /// Apply one command. Returns false to quit.
    fn handle(&mut self, cmd: Command, renderer: &Renderer) -> bool {
        match cmd {
            Command::Quit => return false,
            Command::Redraw => {}
            Command::NextLevel => self.advance(true),
            Command::PrevLevel => self.advance(false),
            cmd => {
                let Some(world) = self.world.as_mut() else { return true };
                let result = match cmd {
                    Command::Step { dir, count: 1 } => world.step(dir),
                    Command::Step { dir, count } => world.step_repeat(dir, count),
                    Command::Click { col, row } => match renderer.screen_to_cell(col, row) {
                        Some(cell) => world.click(cell),
                        None => return true,
                    },
                    Command::Undo => world.undo(),
                    Command::Redo => world.redo(),
                    Command::Reset => Ok(world.reset()),
                    _ => return true,
                };
                match result {
                    Ok(ev) => {
                        self.message.clear();
                        if moves_stars(&ev) && world.is_complete() {
                            info!(level = world.level_number(), steps = world.current_state().steps, "level solved");
                            self.solved = true;
                        }
                    }
                    Err(why) => self.message = why.to_string(),
                }
            }
        }
        true
    }
}

/// Only movement can complete a level.
fn moves_stars(ev: &GameEvent) -> bool {
    matches!(
        ev,
        GameEvent::Walked { .. }
            | GameEvent::Stepped { .. }
            | GameEvent::StarPushed { .. }
            | GameEvent::Teleported { .. }
            | GameEvent::StarMoved { .. }
    )
}

fn session_loop(session: &mut Session, renderer: &mut Renderer) -> std::io::Result<()> {
    loop {
        renderer.render(&session.scene())?;

        let ev = event::read()?;
        let cmd = input::translate(&ev, &session.play);

        if session.solved {
            match cmd {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Redraw) | None if !input::is_key_press(&ev) => {}
                Some(Command::PrevLevel) => session.advance(false),
                _ => session.advance(true),
            }
            continue;
        }

        if let Some(cmd) = cmd {
            if !session.handle(cmd, renderer) {
                return Ok(());
            }
        }
    }
}
