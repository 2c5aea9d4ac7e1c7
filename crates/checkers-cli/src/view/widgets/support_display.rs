use checkers_engine::{PieceSupport, Side};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt, Paragraph, Widget, Wrap},
};

use crate::view::widgets::{color, style};

/// The pieces a player has lost, in the order they were captured.
#[derive(Debug)]
pub struct SupportDisplay<'a> {
    support: &'a PieceSupport,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SupportDisplay<'a> {
    pub fn new(support: &'a PieceSupport) -> Self {
        Self {
            support,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn height(&self) -> u16 {
        2 + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for SupportDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let fg = match self.support.side() {
            Side::Player0 => color::PLAYER0,
            Side::Player1 => color::PLAYER1,
        };
        let mut spans = vec![Span::styled(
            format!("{:>2} ", self.support.len()),
            style::LABEL,
        )];
        spans.extend(self.support.pieces().iter().map(|piece| {
            let glyph = if piece.is_king() { "♛" } else { "●" };
            Span::styled(glyph, Style::new().fg(fg))
        }));
        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
