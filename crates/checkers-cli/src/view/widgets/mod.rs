use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{board_display::*, clock_display::*, key_binding_display::*, support_display::*};

mod board_display;
mod clock_display;
mod key_binding_display;
mod support_display;

pub mod color {
    use ratatui::style::Color;

    pub const LIGHT_CELL: Color = Color::Rgb(222, 196, 150);
    pub const DARK_CELL: Color = Color::Rgb(120, 78, 44);
    pub const PLAYER0: Color = Color::Rgb(250, 250, 240);
    pub const PLAYER1: Color = Color::Rgb(200, 30, 30);
    pub const MOVE: Color = Color::Rgb(40, 160, 60);
    pub const MOVE_DIM: Color = Color::Rgb(30, 100, 45);
    pub const CAPTURE: Color = Color::Rgb(220, 120, 0);
    pub const CAPTURE_DIM: Color = Color::Rgb(140, 80, 0);
    pub const SELECTED: Color = Color::Rgb(0, 140, 200);
    pub const CURSOR: Color = Color::Rgb(230, 200, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::view::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const LABEL: Style = Style::new().fg(color::GRAY);
    pub const ACTIVE_CLOCK: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const EXPIRING_CLOCK: Style = fg_bg(color::WHITE, color::RED);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
