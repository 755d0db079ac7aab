//! GameView: maps the mirrored chess state into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The board is drawn with the local player's colour at the bottom (White when
//! no colour has been assigned yet). Highlights, strongest first: armed square,
//! keyboard cursor, legal targets of the armed square, last move.

use crate::core::{GameState, InteractionController, Notice, NoticeKind};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Colour, Piece, Square, BOARD_FILES, BOARD_RANKS};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Connection status line shown in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkStatusView {
    pub label: &'static str,
    pub open: bool,
}

/// Everything one frame shows.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub state: &'a GameState,
    /// Source of the selection, its legal targets and the promotion choice.
    pub controller: &'a InteractionController,
    pub cursor: Option<Square>,
    pub notice: Option<&'a Notice>,
    pub link: Option<LinkStatusView>,
}

impl<'a> Scene<'a> {
    pub fn new(state: &'a GameState, controller: &'a InteractionController) -> Self {
        Self {
            state,
            controller,
            cursor: None,
            notice: None,
            link: None,
        }
    }
}

/// Colour drawn at the bottom of the board.
pub fn bottom_colour(state: &GameState) -> Colour {
    state.local_colour().unwrap_or(Colour::White)
}

const LIGHT: Rgb = Rgb::new(240, 217, 181);
const DARK: Rgb = Rgb::new(181, 136, 99);
const ARMED: Rgb = Rgb::new(246, 246, 105);
const LAST_MOVE: Rgb = Rgb::new(205, 210, 106);
const TARGET: Rgb = Rgb::new(110, 170, 90);
const CURSOR: Rgb = Rgb::new(70, 130, 220);
const WHITE_PIECE: Rgb = Rgb::new(255, 255, 255);
const BLACK_PIECE: Rgb = Rgb::new(20, 20, 20);

/// Screen placement of the board for one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    frame_x: u16,
    frame_y: u16,
    frame_w: u16,
    frame_h: u16,
    board_x: u16,
    board_y: u16,
}

pub struct GameView {
    /// Square width in terminal columns.
    cell_w: u16,
    /// Square height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 3x1 keeps squares roughly square and leaves room for cursor brackets.
        Self {
            cell_w: 3,
            cell_h: 1,
        }
    }
}

impl GameView {
    fn layout(&self, viewport: Viewport) -> Layout {
        let board_w = BOARD_FILES as u16 * self.cell_w;
        let board_h = BOARD_RANKS as u16 * self.cell_h;
        // Rank labels take two columns on the left, file labels one row below.
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;
        let total_w = frame_w + 2;
        let total_h = frame_h + 1;

        let frame_x = viewport.width.saturating_sub(total_w + SIDE_PANEL_W) / 2 + 2;
        let frame_y = viewport.height.saturating_sub(total_h) / 2;
        Layout {
            frame_x,
            frame_y,
            frame_w,
            frame_h,
            board_x: frame_x + 1,
            board_y: frame_y + 1,
        }
    }

    /// Screen position of the top-left corner of `sq`.
    fn square_origin(&self, layout: &Layout, sq: Square, bottom: Colour) -> (u16, u16) {
        let (col, row) = match bottom {
            Colour::White => (sq.file(), BOARD_RANKS - 1 - sq.rank()),
            Colour::Black => (BOARD_FILES - 1 - sq.file(), sq.rank()),
        };
        (
            layout.board_x + col as u16 * self.cell_w,
            layout.board_y + row as u16 * self.cell_h,
        )
    }

    /// The square under screen cell `(x, y)`, if any.
    pub fn square_at(&self, viewport: Viewport, bottom: Colour, x: u16, y: u16) -> Option<Square> {
        let layout = self.layout(viewport);
        let dx = x.checked_sub(layout.board_x)?;
        let dy = y.checked_sub(layout.board_y)?;
        let col = dx / self.cell_w;
        let row = dy / self.cell_h;
        if col >= BOARD_FILES as u16 || row >= BOARD_RANKS as u16 {
            return None;
        }
        let (col, row) = (col as u8, row as u8);
        match bottom {
            Colour::White => Square::new(col, BOARD_RANKS - 1 - row),
            Colour::Black => Square::new(BOARD_FILES - 1 - col, row),
        }
    }

    /// Render one frame into an existing framebuffer.
    ///
    /// Allocation-free once `fb` has the viewport's size; reuse it across frames.
    pub fn render_into(&self, scene: &Scene<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let layout = self.layout(viewport);
        let bottom = bottom_colour(scene.state);
        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        self.draw_border(fb, &layout, border);
        self.draw_labels(fb, &layout, bottom);

        let armed = scene.controller.selection().square();
        let targets = target_mask(scene);
        let last = scene.state.last_move();
        for index in 0..(BOARD_FILES as usize * BOARD_RANKS as usize) {
            let Some(sq) = Square::from_index(index) else {
                continue;
            };
            let mut bg = if sq.is_light() { LIGHT } else { DARK };
            if last.is_some_and(|m| m.from == sq || m.to == sq) {
                bg = bg.mix(LAST_MOVE, 160);
            }
            let is_target = targets & (1u64 << index) != 0;
            if is_target {
                bg = bg.mix(TARGET, 140);
            }
            if armed == Some(sq) {
                bg = ARMED;
            }
            self.draw_square(fb, &layout, sq, bottom, bg, scene.state.board().piece_at(sq), is_target);
        }

        if let Some(cursor) = scene.cursor {
            self.draw_cursor(fb, &layout, cursor, bottom);
        }

        self.draw_side_panel(fb, scene, viewport, &layout);

        if scene.state.is_game_over() {
            let title = if scene.state.board().is_empty() {
                "NO GAME"
            } else {
                "GAME OVER"
            };
            self.draw_overlay_text(fb, &layout, title, "w/b/r: new game");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, scene: &Scene<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(scene, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: &Layout, style: CellStyle) {
        let (x, y, w, h) = (layout.frame_x, layout.frame_y, layout.frame_w, layout.frame_h);
        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_labels(&self, fb: &mut FrameBuffer, layout: &Layout, bottom: Colour) {
        let style = CellStyle::new(Rgb::new(150, 150, 150), Rgb::new(0, 0, 0));
        let label_y = layout.frame_y + layout.frame_h;
        for i in 0..BOARD_FILES {
            // Files along the bottom edge, ranks up the left.
            let Some(file_sq) = Square::new(i, 0) else { continue };
            let Some(rank_sq) = Square::new(0, i) else { continue };
            let (fx, _) = self.square_origin(layout, file_sq, bottom);
            fb.put_char(fx + self.cell_w / 2, label_y, file_sq.file_char(), style);
            let (_, ry) = self.square_origin(layout, rank_sq, bottom);
            if let Some(lx) = layout.frame_x.checked_sub(2) {
                fb.put_char(lx, ry + self.cell_h / 2, rank_sq.rank_char(), style);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_square(
        &self,
        fb: &mut FrameBuffer,
        layout: &Layout,
        sq: Square,
        bottom: Colour,
        bg: Rgb,
        piece: Option<Piece>,
        is_target: bool,
    ) {
        let (px, py) = self.square_origin(layout, sq, bottom);
        let base = CellStyle::new(BLACK_PIECE, bg);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', base);

        let cx = px + self.cell_w / 2;
        let cy = py + self.cell_h / 2;
        match piece {
            Some(piece) => {
                let fg = match piece.colour {
                    Colour::White => WHITE_PIECE,
                    Colour::Black => BLACK_PIECE,
                };
                // Filled glyphs read better on coloured squares; colour comes from fg.
                let glyph = Piece::new(piece.kind, Colour::Black).glyph();
                fb.put_char(cx, cy, glyph, CellStyle::new(fg, bg).bold());
            }
            None if is_target => {
                fb.put_char(cx, cy, '•', CellStyle::new(TARGET.mix(BLACK_PIECE, 100), bg));
            }
            None => {}
        }
    }

    fn draw_cursor(&self, fb: &mut FrameBuffer, layout: &Layout, sq: Square, bottom: Colour) {
        let (px, py) = self.square_origin(layout, sq, bottom);
        let cy = py + self.cell_h / 2;
        let right = px + self.cell_w - 1;
        for x in [px, right] {
            let bg = fb.get(x, cy).map(|c| c.style.bg).unwrap_or_default();
            let ch = if x == px { '[' } else { ']' };
            fb.put_char(x, cy, ch, CellStyle::new(CURSOR, bg).bold());
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, scene: &Scene<'_>, viewport: Viewport, layout: &Layout) {
        let panel_x = layout.frame_x.saturating_add(layout.frame_w).saturating_add(3);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0)).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let state = scene.state;

        let mut y = layout.frame_y;
        let row = |fb: &mut FrameBuffer, y: &mut u16, name: &str, text: &str, style: CellStyle| {
            let end = fb.put_str(panel_x, *y, name, label);
            fb.put_str_max(end + 1, *y, text, panel_w.saturating_sub(name.len() as u16 + 1), style);
            *y = y.saturating_add(1);
        };

        row(
            fb,
            &mut y,
            "YOU",
            state.local_colour().map(|c| c.as_str()).unwrap_or("-"),
            value,
        );
        let turn = if state.is_game_over() {
            "-"
        } else if state.is_local_turn() {
            "yours"
        } else {
            "opponent"
        };
        row(fb, &mut y, "TURN", turn, value);
        y = y.saturating_add(1);

        let end = fb.put_str(panel_x, y, "W/L/D", label);
        let mut x = end + 1;
        let record = state.record();
        for (i, n) in [record.wins, record.losses, record.draws].into_iter().enumerate() {
            if i > 0 {
                fb.put_char(x, y, '/', value);
                x += 1;
            }
            x = fb.put_u32(x, y, n, value);
        }
        y = y.saturating_add(2);

        row(fb, &mut y, "PROMOTE", scene.controller.promotion().as_str(), value);
        if let Some(link) = scene.link {
            let style = if link.open {
                value
            } else {
                CellStyle::new(Rgb::new(230, 180, 80), Rgb::new(0, 0, 0))
            };
            row(fb, &mut y, "LINK", link.label, style);
        }
        y = y.saturating_add(1);

        if !state.message().is_empty() {
            fb.put_str_max(panel_x, y, state.message(), panel_w, value);
            y = y.saturating_add(1);
        }
        if let Some(notice) = scene.notice {
            let fg = match notice.kind {
                NoticeKind::Error => Rgb::new(240, 100, 100),
                NoticeKind::Okay => Rgb::new(120, 220, 120),
                NoticeKind::Local => Rgb::new(230, 180, 80),
            };
            fb.put_str_max(panel_x, y, &notice.message, panel_w, CellStyle::new(fg, Rgb::new(0, 0, 0)));
        }

        let help_y = layout.frame_y + layout.frame_h;
        if help_y < viewport.height {
            fb.put_str_max(
                panel_x,
                help_y,
                "x resign  u undo  p promo  q quit",
                panel_w,
                value.dim(),
            );
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, layout: &Layout, title: &str, hint: &str) {
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        let mid_y = layout.frame_y.saturating_add(layout.frame_h / 2);
        for (dy, (text, style)) in [(title, style), (hint, style.dim())].into_iter().enumerate() {
            let text_w = text.chars().count() as u16;
            let x = layout
                .frame_x
                .saturating_add(layout.frame_w.saturating_sub(text_w) / 2);
            fb.put_str(x, mid_y.saturating_sub(1) + dy as u16, text, style);
        }
    }
}

/// Legal destinations of the armed square, one bit per square index.
fn target_mask(scene: &Scene<'_>) -> u64 {
    scene
        .controller
        .highlighted_targets(scene.state)
        .fold(0, |mask, to| mask | 1u64 << to.index())
}

/// Columns reserved for the side panel when centring the board.
const SIDE_PANEL_W: u16 = 24;
