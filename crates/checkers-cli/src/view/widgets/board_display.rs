use std::iter;

use checkers_engine::{BOARD_DIM, Board, BoardCell, Highlight, Position, Side};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::widgets::color;

const CELL_WIDTH: u16 = 4;
const CELL_HEIGHT: u16 = 2;
const DIM: usize = BOARD_DIM as usize;

/// Piece drawn on a cell once travel offsets are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Occupant {
    side: Side,
    king: bool,
    captured: bool,
}

/// Top-down view of the board.
///
/// Columns run down the screen, so player 0 crowns on the top line and
/// player 1 on the bottom one.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    cursor: Option<Position>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            cursor: None,
            block: None,
        }
    }

    pub fn cursor(self, cursor: Position) -> Self {
        Self {
            cursor: Some(cursor),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        u16::from(BOARD_DIM) * CELL_WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::from(BOARD_DIM) * CELL_HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }

    fn cell_style(&self, cell: &BoardCell) -> Style {
        let pos = cell.position();
        if !cell.fall_in_frame().visible {
            return Style::new().bg(color::BLACK);
        }
        let pulse = self.board.highlight_phase().sin() >= 0.0;
        let bg = if self.cursor == Some(pos) {
            color::CURSOR
        } else if self.board.selected() == Some(cell.id()) {
            color::SELECTED
        } else {
            match self.board.highlight(cell.id()) {
                Highlight::Move if pulse => color::MOVE,
                Highlight::Move => color::MOVE_DIM,
                Highlight::Capture if pulse => color::CAPTURE,
                Highlight::Capture => color::CAPTURE_DIM,
                Highlight::None if pos.is_dark() => color::DARK_CELL,
                Highlight::None => color::LIGHT_CELL,
            }
        };
        Style::new().bg(bg)
    }
}

/// Where every visible piece stands, indexed by `[row][col]`.
///
/// A travelling piece is drawn on the cell nearest to it and hides whatever
/// it passes over.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn occupants(board: &Board) -> [[Option<Occupant>; DIM]; DIM] {
    let mut grid = [[None; DIM]; DIM];
    let mut travellers = vec![];
    for cell in board.cells() {
        let Some(piece) = cell.piece() else {
            continue;
        };
        if !cell.creation_anim_is_over() {
            continue;
        }
        let occupant = Occupant {
            side: piece.side(),
            king: piece.is_king(),
            captured: cell.is_being_captured(),
        };
        let pos = cell.position();
        match cell.travel() {
            Some(travel) => {
                let offset = travel.offset();
                let max = f32::from(BOARD_DIM - 1);
                let row = (f32::from(pos.row()) + offset.x).round().clamp(0.0, max) as usize;
                let col = (f32::from(pos.col()) + offset.y).round().clamp(0.0, max) as usize;
                travellers.push((row, col, occupant));
            }
            None => grid[usize::from(pos.row())][usize::from(pos.col())] = Some(occupant),
        }
    }
    for (row, col, occupant) in travellers {
        grid[row][col] = Some(occupant);
    }
    grid
}

fn piece_line(occupant: Occupant) -> Line<'static> {
    let glyph = if occupant.king { "♛" } else { "●" };
    let fg = match occupant.side {
        Side::Player0 => color::PLAYER0,
        Side::Player1 => color::PLAYER1,
    };
    let mut style = Style::new().fg(fg).add_modifier(Modifier::BOLD);
    if occupant.captured {
        style = style.add_modifier(Modifier::DIM);
    }
    Line::styled(glyph, style).centered()
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let horizontal =
            Layout::horizontal((0..DIM).map(|_| Constraint::Length(CELL_WIDTH))).flex(Flex::Center);
        let vertical = Layout::vertical((0..DIM).map(|_| Constraint::Length(CELL_HEIGHT)));
        let grid_lines = area
            .layout::<DIM>(&vertical)
            .into_iter()
            .map(|line| line.layout::<DIM>(&horizontal));

        let occupants = occupants(self.board);
        for (col, grid_line) in iter::zip(0..BOARD_DIM, grid_lines) {
            for (row, cell_area) in iter::zip(0..BOARD_DIM, grid_line) {
                let Some(pos) = Position::new(row, col) else {
                    continue;
                };
                let cell = self.board.cell(pos.id());
                buf.set_style(cell_area, self.cell_style(cell));
                if let Some(occupant) = occupants[usize::from(row)][usize::from(col)] {
                    let text_area = cell_area.centered_vertically(Constraint::Length(1));
                    piece_line(occupant).render(text_area, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use checkers_engine::{KingRule, Settings};

    use super::*;

    fn cell_text(buf: &Buffer, pos: Position) -> String {
        let x0 = u16::from(pos.row()) * CELL_WIDTH;
        let y0 = u16::from(pos.col()) * CELL_HEIGHT;
        let mut text = String::new();
        for y in y0..y0 + CELL_HEIGHT {
            for x in x0..x0 + CELL_WIDTH {
                text.push_str(buf[(x, y)].symbol());
            }
        }
        text
    }

    #[test]
    fn test_draws_standard_layout() {
        let mut board = Board::standard(Settings::default(), KingRule::Default, Side::Player0);
        board.skip_creation();
        let empty = Position::new(1, 4).unwrap();
        let display = BoardDisplay::new(&board).cursor(empty);
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);

        let p0 = Position::new(0, 5).unwrap();
        let p1 = Position::new(1, 2).unwrap();
        assert!(cell_text(&buf, p0).contains('●'));
        assert!(cell_text(&buf, p1).contains('●'));
        assert!(!cell_text(&buf, empty).contains('●'));
        assert_eq!(buf[(CELL_WIDTH, 4 * CELL_HEIGHT)].bg, color::CURSOR);
        assert_eq!(buf[(0, 0)].bg, color::LIGHT_CELL);
    }

    #[test]
    fn test_pieces_hidden_until_created() {
        let board = Board::standard(Settings::default(), KingRule::Default, Side::Player0);
        let grid = occupants(&board);
        assert!(grid.iter().flatten().all(Option::is_none));
    }
}
