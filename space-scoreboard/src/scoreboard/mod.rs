/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Ranked scoreboard rendering.
//!
//! [`render_lines`] is the pure part: it turns a [`ScoreSnapshot`] into the
//! exact text rows of one frame.  [`Scoreboard`] pushes those rows to a
//! [`Surface`] after clearing it.
//!
//! ```text
//! ====== Scoreboard ======
//!         A -  10
//!         C -   7
//! ========================
//! ```
//!
//! # Ranking rules
//! * Slot `i` is shown as the `i`-th capital letter (`0 → 'A'`).
//! * Slots holding [`ABSENT_SCORE`] are not shown at all.
//! * Rows are ordered by score, highest first.  The sort is stable, so equal
//!   scores keep slot order and the same snapshot always renders the same
//!   text.

use std::io::{self, Write};

use crate::snapshot::{ScoreSnapshot, ABSENT_SCORE, MAX_PARTICIPANTS};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Column width every row is centred in.
pub const BOARD_WIDTH: usize = 24;

pub const HEADER: &str = "====== Scoreboard ======";
pub const FOOTER: &str = "========================";

/// Clear screen and move the cursor home.
const ANSI_CLEAR: &str = "\x1b[2J\x1b[H";

// ── Ranking ───────────────────────────────────────────────────────────────────

/// One visible row of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedEntry {
    pub symbol: char,
    pub score: i32,
}

impl RankedEntry {
    /// `"{symbol} - {score:3}"` centred in [`BOARD_WIDTH`] columns.
    pub fn line(&self) -> String {
        let cell = format!("{} - {:3}", self.symbol, self.score);
        format!("{cell:^BOARD_WIDTH$}")
    }
}

/// Letter shown for slot `index`: `0 → 'A'` … `25 → 'Z'`.
///
/// Returns `None` past `'Z'`; snapshots never get there because they are
/// capped at [`MAX_PARTICIPANTS`].
pub fn symbol_for(index: usize) -> Option<char> {
    if index >= MAX_PARTICIPANTS {
        return None;
    }
    u8::try_from(index).ok().map(|i| char::from(b'A' + i))
}

/// Visible entries of `snapshot`, best score first.
pub fn rank(snapshot: &ScoreSnapshot) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = snapshot
        .scores()
        .iter()
        .enumerate()
        .filter(|&(_, &score)| score != ABSENT_SCORE)
        .filter_map(|(index, &score)| symbol_for(index).map(|symbol| RankedEntry { symbol, score }))
        .collect();

    // `sort_by` is stable: ties keep slot order.
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}

/// Every row of one frame: header, ranked entries, footer.
pub fn render_lines(snapshot: &ScoreSnapshot) -> Vec<String> {
    let mut lines = Vec::with_capacity(snapshot.len() + 2);
    lines.push(HEADER.to_string());
    lines.extend(rank(snapshot).iter().map(RankedEntry::line));
    lines.push(FOOTER.to_string());
    lines
}

// ── Display surface ───────────────────────────────────────────────────────────

/// Where frames are drawn.
pub trait Surface {
    /// Wipe whatever the previous frame left.
    fn clear(&mut self) -> io::Result<()>;

    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

/// Plain-text console surface.
///
/// Clearing uses the ANSI erase-display sequence unless disabled, in which
/// case frames are simply appended (useful when stdout is a pipe).
pub struct Terminal<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Terminal<io::Stdout> {
    pub fn stdout(clear_screen: bool) -> Self {
        Self::new(io::stdout(), clear_screen)
    }
}

impl<W: Write> Surface for Terminal<W> {
    fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            self.out.write_all(ANSI_CLEAR.as_bytes())?;
        }
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

// ── Scoreboard ────────────────────────────────────────────────────────────────

/// Draws snapshots onto a [`Surface`], one full frame per call.
pub struct Scoreboard<S: Surface> {
    surface: S,
}

impl<S: Surface> Scoreboard<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Clear the surface and draw `snapshot`.
    pub fn draw(&mut self, snapshot: &ScoreSnapshot) -> io::Result<()> {
        self.surface.clear()?;
        for line in render_lines(snapshot) {
            self.surface.write_line(&line)?;
        }
        self.surface.flush()
    }

    /// Print a one-off status message (e.g. while waiting for the first
    /// update).
    pub fn notice(&mut self, message: &str) -> io::Result<()> {
        self.surface.write_line(message)?;
        self.surface.flush()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Surface that records frames instead of printing them.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub(crate) frames: Vec<Vec<String>>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self) -> io::Result<()> {
            self.frames.push(Vec::new());
            Ok(())
        }

        fn write_line(&mut self, line: &str) -> io::Result<()> {
            if self.frames.is_empty() {
                self.frames.push(Vec::new());
            }
            if let Some(frame) = self.frames.last_mut() {
                frame.push(line.to_string());
            }
            Ok(())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn snap(scores: &[i32]) -> ScoreSnapshot {
        ScoreSnapshot::new(scores.to_vec()).unwrap()
    }

    /// The entry rows only (header and footer stripped).
    fn body(scores: &[i32]) -> Vec<String> {
        let lines = render_lines(&snap(scores));
        lines[1..lines.len() - 1].to_vec()
    }

    fn centred(cell: &str) -> String {
        let pad = BOARD_WIDTH - cell.len();
        format!("{}{}{}", " ".repeat(pad / 2), cell, " ".repeat(pad - pad / 2))
    }

    // ── symbol_for ────────────────────────────────────────────────────────────

    #[test]
    fn symbols_span_a_to_z() {
        assert_eq!(symbol_for(0), Some('A'));
        assert_eq!(symbol_for(1), Some('B'));
        assert_eq!(symbol_for(25), Some('Z'));
    }

    #[test]
    fn no_symbol_past_z() {
        assert_eq!(symbol_for(26), None);
        assert_eq!(symbol_for(1000), None);
    }

    // ── formatting ────────────────────────────────────────────────────────────

    #[test]
    fn header_and_footer_are_board_width() {
        assert_eq!(HEADER.len(), BOARD_WIDTH);
        assert_eq!(FOOTER.len(), BOARD_WIDTH);
    }

    #[test]
    fn entry_line_pads_score_and_centres() {
        let line = RankedEntry { symbol: 'C', score: 7 }.line();
        assert_eq!(line, centred("C -   7"));
        assert_eq!(line.len(), BOARD_WIDTH);
    }

    #[test]
    fn wide_scores_are_not_truncated() {
        let line = RankedEntry { symbol: 'A', score: 12345 }.line();
        assert_eq!(line.trim(), "A - 12345");
    }

    // ── ranking ───────────────────────────────────────────────────────────────

    #[test]
    fn absent_slots_are_hidden() {
        assert_eq!(body(&[10, -1, 7]), vec![centred("A -  10"), centred("C -   7")]);
    }

    #[test]
    fn ties_keep_slot_order() {
        let entries = rank(&snap(&[5, 5, 3]));
        let symbols: Vec<char> = entries.iter().map(|e| e.symbol).collect();
        assert_eq!(symbols, vec!['A', 'B', 'C']);
    }

    #[test]
    fn sorted_descending_with_stable_ties() {
        let entries = rank(&snap(&[2, 9, -1, 2, 9, 0, -1, 4]));
        let got: Vec<(char, i32)> = entries.iter().map(|e| (e.symbol, e.score)).collect();
        assert_eq!(
            got,
            vec![('B', 9), ('E', 9), ('H', 4), ('A', 2), ('D', 2), ('F', 0)]
        );
    }

    #[test]
    fn other_negative_scores_are_still_ranked() {
        let entries = rank(&snap(&[-2, -1, 1]));
        let got: Vec<(char, i32)> = entries.iter().map(|e| (e.symbol, e.score)).collect();
        assert_eq!(got, vec![('C', 1), ('A', -2)]);
    }

    #[test]
    fn all_absent_renders_empty_board() {
        assert_eq!(
            render_lines(&snap(&[-1; 8])),
            vec![HEADER.to_string(), FOOTER.to_string()]
        );
    }

    #[test]
    fn full_alphabet_is_ranked() {
        let scores: Vec<i32> = (0..MAX_PARTICIPANTS as i32).collect();
        let entries = rank(&snap(&scores));
        assert_eq!(entries.len(), MAX_PARTICIPANTS);
        assert_eq!(entries[0], RankedEntry { symbol: 'Z', score: 25 });
        assert_eq!(entries[25], RankedEntry { symbol: 'A', score: 0 });
    }

    // ── Scoreboard / Surface ──────────────────────────────────────────────────

    #[test]
    fn drawing_twice_is_identical() {
        let mut board = Scoreboard::new(RecordingSurface::default());
        let s = snap(&[4, -1, 8, 8, 1]);
        board.draw(&s).unwrap();
        board.draw(&s).unwrap();

        let frames = &board.surface().frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], frames[1]);
        assert_eq!(frames[0], render_lines(&s));
    }

    #[test]
    fn terminal_clears_before_each_frame() {
        let mut board = Scoreboard::new(Terminal::new(Vec::new(), true));
        board.draw(&snap(&[1])).unwrap();
        let out = String::from_utf8(board.into_surface().into_inner()).unwrap();
        assert!(out.starts_with(ANSI_CLEAR));
        assert!(out.ends_with(&format!("{FOOTER}\n")));
    }

    #[test]
    fn terminal_without_clear_emits_plain_text() {
        let mut board = Scoreboard::new(Terminal::new(Vec::new(), false));
        board.draw(&snap(&[10, -1, 7])).unwrap();
        let out = String::from_utf8(board.into_surface().into_inner()).unwrap();
        let expected = format!(
            "{HEADER}\n{}\n{}\n{FOOTER}\n",
            centred("A -  10"),
            centred("C -   7")
        );
        assert_eq!(out, expected);
    }
}
