/// Presentation layer: terminal renderer.
///
/// Each frame is composed into a `Screen` of glyph rows and compared with
/// the frame already shown. Rows that changed are rewritten in full; the
/// commands are batched with `queue!` and flushed once.
///
/// Each map cell is two terminal columns wide. The camera maps world cells
/// to screen cells and back (for mouse clicks).

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use starpusher::domain::entity::Cell;
use starpusher::domain::tile::Tile;
use starpusher::sim::world::WorldState;

/// What the screen shows this frame.
pub enum Scene<'a> {
    Playing { world: &'a WorldState, total: usize, message: &'a str },
    Solved { world: &'a WorldState, total: usize },
    /// The level failed to load; `error` is the loader's message.
    LevelError { number: usize, total: usize, error: &'a str },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum SceneKind {
    Playing,
    Solved,
    LevelError,
}

impl Scene<'_> {
    fn kind(&self) -> SceneKind {
        match self {
            Scene::Playing { .. } => SceneKind::Playing,
            Scene::Solved { .. } => SceneKind::Solved,
            Scene::LevelError { .. } => SceneKind::LevelError,
        }
    }
}

// ── Screen: rows of glyphs, repainted a row at a time ──

const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Glyph {
    Char { ch: char, fg: Color, bg: Color },
    /// Right half of a double-width char; the terminal fills it.
    Tail,
}

const BLANK: Glyph = Glyph::Char { ch: ' ', fg: Color::White, bg: BASE_BG };

#[derive(Clone, PartialEq, Eq, Debug, Default)]
struct Screen {
    width: usize,
    rows: Vec<Vec<Glyph>>,
}

impl Screen {
    fn blank(width: usize, height: usize) -> Self {
        Screen { width, rows: vec![vec![BLANK; width]; height] }
    }

    fn height(&self) -> usize {
        self.rows.len()
    }

    fn put(&mut self, x: usize, y: usize, g: Glyph) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = g;
        }
    }

    /// One char per column, clipped at the right edge.
    fn text(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.put(x + i, y, Glyph::Char { ch, fg, bg });
        }
    }

    fn band(&mut self, y: usize, bg: Color) {
        if let Some(row) = self.rows.get_mut(y) {
            row.fill(Glyph::Char { ch: ' ', fg: Color::White, bg });
        }
    }

    /// Rows that differ from `shown`, the frame already on the terminal.
    fn dirty_rows(&self, shown: &Screen) -> Vec<usize> {
        (0..self.height())
            .filter(|&y| shown.rows.get(y) != Some(&self.rows[y]))
            .collect()
    }
}

// ── Camera ──

/// Viewport into the map. `(x, y)` is the world cell at the top-left of the
/// viewport and may be negative when a small map is centered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
    pub view_w: usize,
    pub view_h: usize,
}

impl Camera {
    /// Size the viewport to the terminal, leaving room for the bars.
    pub fn fit(&mut self, term_w: usize, term_h: usize) {
        self.view_w = term_w / CELL_W;
        self.view_h = term_h.saturating_sub(MAP_ROW + 4).max(1);
    }

    /// Center maps that fit; otherwise keep `target` inside a dead zone.
    pub fn follow(&mut self, target: Cell, world_w: usize, world_h: usize) {
        if self.view_w == 0 || self.view_h == 0 { return; }
        self.x = follow_axis(self.x, target.x as i32, self.view_w as i32, world_w as i32);
        self.y = follow_axis(self.y, target.y as i32, self.view_h as i32, world_h as i32);
    }

    /// World cell under a screen position, if it is on the map.
    pub fn screen_to_cell(&self, col: u16, row: u16) -> Option<Cell> {
        let row = row as usize;
        if row < MAP_ROW || row >= MAP_ROW + self.view_h { return None; }
        let vx = col as usize / CELL_W;
        if vx >= self.view_w { return None; }
        let wx = self.x + vx as i32;
        let wy = self.y + (row - MAP_ROW) as i32;
        if wx < 0 || wy < 0 { return None; }
        Some(Cell::new(wx as usize, wy as usize))
    }
}

fn follow_axis(pos: i32, target: i32, view: i32, world: i32) -> i32 {
    if world <= view {
        return -((view - world) / 2);
    }
    let margin = view / 5;
    let mut pos = pos;
    if target < pos + margin {
        pos = target - margin;
    } else if target > pos + view - margin - 1 {
        pos = target - view + margin + 1;
    }
    pos.clamp(0, world - view)
}

// ── Renderer ──

const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const WALL_FG: Color = Color::Rgb { r: 150, g: 100, b: 60 };
const CORNER_FG: Color = Color::Rgb { r: 120, g: 80, b: 50 };
const FLOOR_BG: Color = Color::Rgb { r: 60, g: 60, b: 72 };
const GRASS_FG: Color = Color::Rgb { r: 60, g: 150, b: 60 };
const GRASS_BG: Color = Color::Rgb { r: 25, g: 70, b: 30 };
const GOAL_FG: Color = Color::Rgb { r: 230, g: 200, b: 60 };
const GOAL_BG: Color = Color::Rgb { r: 90, g: 80, b: 40 };
const SELECT_BG: Color = Color::Rgb { r: 150, g: 60, b: 160 };

const HELP: &str = " Arrows/WASD move (Ctrl x5, Shift x100)  Click select/push/go  ^Z undo  ^Y redo  N/B level  Bksp reset  Esc quit";

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    /// Frame being composed.
    screen: Screen,
    /// Frame currently on the terminal.
    shown: Screen,
    camera: Camera,
    last_scene: Option<SceneKind>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            screen: Screen::default(),
            shown: Screen::default(),
            camera: Camera::default(),
            last_scene: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Map cell under a mouse position, using the last frame's camera.
    pub fn screen_to_cell(&self, col: u16, row: u16) -> Option<Cell> {
        self.camera.screen_to_cell(col, row)
    }

    pub fn render(&mut self, scene: &Scene) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);

        // New size or new scene: forget what is shown and repaint it all.
        let kind = scene.kind();
        if tw != self.shown.width || th != self.shown.height() || self.last_scene != Some(kind) {
            self.shown = Screen::default();
            self.last_scene = Some(kind);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }

        self.screen = Screen::blank(tw, th);
        match scene {
            Scene::Playing { world, total, message } => {
                self.compose_game(world, *total, message);
            }
            Scene::Solved { world, total } => {
                self.compose_game(world, *total, "");
                self.compose_solved_overlay();
            }
            Scene::LevelError { number, total, error } => {
                self.compose_level_error(*number, *total, error);
            }
        }

        self.paint()?;
        self.shown = std::mem::take(&mut self.screen);
        Ok(())
    }

    /// Rewrite each changed row from its first column.
    fn paint(&mut self) -> io::Result<()> {
        for y in self.screen.dirty_rows(&self.shown) {
            queue!(self.writer, MoveTo(0, y as u16))?;
            let mut colors = None;
            for g in &self.screen.rows[y] {
                let Glyph::Char { ch, fg, bg } = *g else { continue };
                if colors != Some((fg, bg)) {
                    queue!(self.writer, SetForegroundColor(fg), SetBackgroundColor(bg))?;
                    colors = Some((fg, bg));
                }
                queue!(self.writer, Print(ch))?;
            }
        }
        self.writer.flush()
    }

    // ── Compose: build the next frame ──

    fn compose_game(&mut self, w: &WorldState, total: usize, message: &str) {
        let grid = w.grid();
        let state = w.current_state();

        self.camera.fit(self.screen.width, self.screen.height());
        self.camera.follow(state.player, grid.width(), grid.height());

        // ── HUD row ──
        let hud = format!(
            " Level {} of {}   Steps: {}{}",
            w.level_number(), total, state.steps, jump_label(w.last_jump()),
        );
        self.screen.band(HUD_ROW, HUD_BG);
        self.screen.text(0, HUD_ROW, &hud, Color::White, HUD_BG);

        // ── Map ──
        let cam = self.camera;
        for vy in 0..cam.view_h {
            let row = MAP_ROW + vy;
            if row >= self.screen.height() { break; }
            for vx in 0..cam.view_w {
                let col = vx * CELL_W;
                if col + 1 >= self.screen.width { break; }
                let wx = cam.x + vx as i32;
                let wy = cam.y + vy as i32;
                if wx < 0 || wy < 0 { continue; }
                let cell = Cell::new(wx as usize, wy as usize);
                if grid.in_bounds(cell) {
                    self.compose_cell(w, cell, col, row);
                }
            }
        }

        // ── Message bar ──
        let msg_row = MAP_ROW + cam.view_h + 1;
        if !message.is_empty() {
            let bar = Color::Rgb { r: 200, g: 180, b: 50 };
            self.screen.band(msg_row, bar);
            self.screen.text(0, msg_row, &format!(" {} ", message), Color::Black, bar);
        }

        // ── Help bar ──
        self.screen.text(0, MAP_ROW + cam.view_h + 3, HELP, Color::DarkGrey, BASE_BG);
    }

    /// Two terminal columns for one map cell: terrain, then goal, star
    /// and player on top.
    fn compose_cell(&mut self, w: &WorldState, cell: Cell, col: usize, row: usize) {
        let state = w.current_state();
        let goal = w.is_goal(cell);

        if state.player == cell {
            let bg = if goal { GOAL_BG } else { FLOOR_BG };
            self.set_wide(col, row, '🙂', bg);
            return;
        }

        if let Some(star) = state.star_at(cell) {
            let bg = if state.selected == Some(star) {
                SELECT_BG
            } else if goal {
                GOAL_BG
            } else {
                FLOOR_BG
            };
            self.set_wide(col, row, '⭐', bg);
            return;
        }

        if goal {
            self.set_pair(col, row, '(', ')', GOAL_FG, GOAL_BG);
            return;
        }

        match w.grid().tile(cell) {
            Tile::Wall => self.set_pair(col, row, '█', '█', WALL_FG, BASE_BG),
            Tile::CornerWall => self.set_pair(col, row, '▓', '▓', CORNER_FG, BASE_BG),
            Tile::InteriorFloor => self.set_pair(col, row, ' ', ' ', Color::White, FLOOR_BG),
            Tile::ExteriorFloor => self.set_pair(col, row, '"', ' ', GRASS_FG, GRASS_BG),
        }
    }

    fn set_pair(&mut self, col: usize, row: usize, a: char, b: char, fg: Color, bg: Color) {
        self.screen.put(col, row, Glyph::Char { ch: a, fg, bg });
        self.screen.put(col + 1, row, Glyph::Char { ch: b, fg, bg });
    }

    fn set_wide(&mut self, col: usize, row: usize, ch: char, bg: Color) {
        self.screen.put(col, row, Glyph::Char { ch, fg: Color::Reset, bg });
        self.screen.put(col + 1, row, Glyph::Tail);
    }

    fn compose_solved_overlay(&mut self) {
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        let hdr = Color::Rgb { r: 255, g: 220, b: 50 };
        let view_cols = (self.camera.view_w * CELL_W).max(30);
        let box_w = 30_usize.min(view_cols);
        let box_h = 5;
        let box_x = view_cols.saturating_sub(box_w) / 2;
        let box_y = MAP_ROW + self.camera.view_h.saturating_sub(box_h) / 2;

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.screen.put(x, y, Glyph::Char { ch: ' ', fg: Color::White, bg: dim });
            }
        }
        self.screen.text(box_x + 10, box_y + 1, "SOLVED!", hdr, dim);
        self.screen.text(box_x + 2, box_y + 3, "Press a key for next level", Color::Grey, dim);
    }

    fn compose_level_error(&mut self, number: usize, total: usize, error: &str) {
        let hud = format!(" Level {} of {}", number, total);
        self.screen.band(HUD_ROW, HUD_BG);
        self.screen.text(0, HUD_ROW, &hud, Color::White, HUD_BG);

        let red = Color::Rgb { r: 230, g: 90, b: 80 };
        self.screen.text(2, MAP_ROW + 1, "This level cannot be played:", red, BASE_BG);
        let width = self.screen.width.saturating_sub(4).max(10);
        for (i, line) in wrap(error, width).iter().enumerate() {
            self.screen.text(2, MAP_ROW + 3 + i, line, Color::White, BASE_BG);
        }
        self.screen.text(2, MAP_ROW + 8, "N: next level   B: previous level   Esc: quit", Color::DarkGrey, BASE_BG);
    }
}

/// HUD suffix for the last long-range action; single steps show nothing.
fn jump_label(jump: u32) -> String {
    if jump >= 2 { format!(" +{jump}") } else { String::new() }
}

/// Greedy word wrap.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = vec![];
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() { line.push(' '); }
        line.push_str(word);
    }
    if !line.is_empty() { lines.push(line); }
    lines
}
