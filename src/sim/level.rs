/// Level loader for Star Pusher level packs.
///
/// ## Sources (priority order):
///   1. The configured levels file (`starPusherLevels.txt` by default)
///   2. Built-in embedded levels
///
/// ## Pack format:
///   ```text
///   ; comment lines (and trailing comments) start with ';'
///   #####
///   #@$.#
///   #####
///
///   <next level after a blank line>
///   ```
///
/// Levels are separated by one or more blank lines. Short rows are padded
/// with floor so every level is rectangular.
///
/// ## Tile legend:
///   '#' / 'x' = Wall          '@' = Player start
///   '+' = Player on goal      '.' = Goal
///   '$' = Star                '*' = Star on goal
///   anything else = Floor
///
/// Every level is validated on its own; a broken level yields an error in
/// its slot and does not affect the others.

use std::path::Path;

use tracing::{info, warn};

use crate::domain::entity::{Cell, PuzzleState};
use crate::domain::grid::Grid;
use crate::error::LevelError;

/// A validated, classified level.
#[derive(Clone, Debug)]
pub struct Level {
    /// 1-based position in the pack.
    pub number: usize,
    pub grid: Grid,
    pub goals: Vec<Cell>,
    pub start: PuzzleState,
}

/// One slot per level in the pack, in file order.
pub type LevelPack = Vec<Result<Level, LevelError>>;

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load the pack at `path`, falling back to the embedded levels if the file
/// is unreadable or contains no levels.
pub fn load_pack(path: &Path) -> LevelPack {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let pack = parse_pack(&content);
            if !pack.is_empty() {
                info!(path = %path.display(), levels = pack.len(), "loaded level pack");
                return pack;
            }
            warn!(path = %path.display(), "level file has no levels, using built-in pack");
        }
        Err(e) => {
            let err = LevelError::from(e);
            warn!(path = %path.display(), "{err}; using built-in pack");
        }
    }
    embedded_pack()
}

/// Parse every level in a pack file.
pub fn parse_pack(content: &str) -> LevelPack {
    let mut levels = vec![];
    let mut rows: Vec<String> = vec![];

    // A trailing blank line flushes the last level.
    let lines = content.lines().chain(std::iter::once(""));
    for (idx, raw) in lines.enumerate() {
        let line = match raw.find(';') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let line = line.trim_end_matches(['\r', '\n']);

        if !line.is_empty() {
            rows.push(line.to_string());
        } else if !rows.is_empty() {
            let number = levels.len() + 1;
            levels.push(parse_level(&rows, number, idx + 1));
            rows.clear();
        }
    }

    levels
}

/// Parse one level's map rows. `line` is where the level ended in the file,
/// used in error messages.
pub fn parse_level(rows: &[String], number: usize, line: usize) -> Result<Level, LevelError> {
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let height = rows.len();

    let mut walls = vec![vec![false; width]; height];
    let mut start: Option<Cell> = None;
    let mut goals = vec![];
    let mut stars = vec![];

    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let cell = Cell::new(x, y);
            match ch {
                '#' | 'x' => walls[y][x] = true,
                '@' | '+' => {
                    if start.is_some() {
                        return Err(LevelError::MultipleStarts { level: number, line });
                    }
                    start = Some(cell);
                }
                _ => {}
            }
            if matches!(ch, '.' | '+' | '*') {
                goals.push(cell);
            }
            if matches!(ch, '$' | '*') {
                stars.push(cell);
            }
        }
    }

    let start = start.ok_or(LevelError::MissingStart { level: number, line })?;
    if goals.is_empty() {
        return Err(LevelError::NoGoals { level: number, line });
    }
    if stars.len() < goals.len() {
        return Err(LevelError::NotEnoughStars {
            level: number,
            line,
            goals: goals.len(),
            stars: stars.len(),
        });
    }

    Ok(Level {
        number,
        grid: Grid::classify(&walls, start),
        goals,
        start: PuzzleState::new(start, stars),
    })
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback levels
// ══════════════════════════════════════════════════════════════

const EMBEDDED: &str = "\
; Star Pusher built-in levels

   ####
 ###  ####
 #     $ #
 # #  #$ #
 # . .#@ #
 #########

########
#      #
# .**$@#
#      #
#####  #
    ####

 #######
 #     #
 # .$. #
## $@$ #
#  .$. #
#      #
########

  ####
###  #####
#   $  $ #
# . .#   #
##  #  @ #
 #  ######
 ####

#####
#   #####
# $ #   #
#  $  . #
##@# #. #
 #      #
 ########
";

pub fn embedded_pack() -> LevelPack {
    parse_pack(EMBEDDED)
}
