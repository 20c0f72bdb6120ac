use blockfall_engine::{Cell, ShapeKind};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use super::style;

/// One board or figure cell drawn as a two-column square.
#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_cell(cell: Cell, show_dots: bool) -> Self {
        if cell.is_empty() {
            return if show_dots {
                Self::new(style::EMPTY_DOT, ".")
            } else {
                Self::new(style::EMPTY, "")
            };
        }
        match cell.color() {
            Some(kind) => Self::new(shape_style(kind), ""),
            None => Self::new(style::BLOCKED, ""),
        }
    }
}

fn shape_style(kind: ShapeKind) -> Style {
    match kind {
        ShapeKind::I => style::I_BLOCK,
        ShapeKind::O => style::O_BLOCK,
        ShapeKind::S => style::S_BLOCK,
        ShapeKind::Z => style::Z_BLOCK,
        ShapeKind::J => style::J_BLOCK,
        ShapeKind::L => style::L_BLOCK,
        ShapeKind::T => style::T_BLOCK,
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Paragraph fills the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
