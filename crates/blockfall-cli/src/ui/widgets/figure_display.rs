use blockfall_engine::{MAX_SHAPE_HEIGHT, MAX_SHAPE_WIDTH, ShapeKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{CellDisplay, to_u16};

/// Preview of a shape in its spawn orientation.
#[derive(Debug, Default)]
pub struct FigureDisplay<'a> {
    kind: Option<ShapeKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> FigureDisplay<'a> {
    pub fn new() -> Self {
        Self {
            kind: None,
            block: None,
        }
    }

    pub fn kind(self, kind: ShapeKind) -> Self {
        Self {
            kind: Some(kind),
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
        to_u16(MAX_SHAPE_WIDTH) * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        to_u16(MAX_SHAPE_HEIGHT) * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for FigureDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &FigureDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(kind) = self.kind else {
            return;
        };
        let cells = kind.shape().cells();
        let (width, height) = (to_u16(cells.width()), to_u16(cells.height()));
        let figure_area = area.centered(
            Constraint::Length(width * CellDisplay::width()),
            Constraint::Length(height * CellDisplay::height()),
        );

        let horizontal = Layout::horizontal(
            (0..width).map(|_| Constraint::Length(CellDisplay::width())),
        )
        .flex(Flex::Center);
        let vertical = Layout::vertical((0..height).map(|_| Constraint::Length(CellDisplay::height())));
        let grid_rows = figure_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in grid_rows.zip(cells.rows()) {
            for (grid_cell, cell) in grid_row.into_iter().zip(row) {
                CellDisplay::from_cell(*cell, false).render(grid_cell, buf);
            }
        }
    }
}
