use std::iter;

use blockfall_engine::{Board, Cell, Figure};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use super::{CellDisplay, to_u16};

/// Locked board cells with the active figure drawn on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    figure: Option<&'a Figure>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            figure: None,
            block: None,
        }
    }

    pub fn figure(self, figure: Option<&'a Figure>) -> Self {
        Self { figure, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        to_u16(self.board.width())
            .saturating_mul(CellDisplay::width())
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        to_u16(self.board.height())
            .saturating_mul(CellDisplay::height())
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }

    /// Board rows with the figure's occupied cells merged in.
    fn merged_rows(&self) -> Vec<Vec<Cell>> {
        let mut rows: Vec<Vec<Cell>> = self.board.rows().map(<[Cell]>::to_vec).collect();
        if let Some(figure) = self.figure {
            for (x, y, cell) in figure.occupied_positions() {
                let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                    continue;
                };
                if let Some(target) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                    *target = cell;
                }
            }
        }
        rows
    }
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

        let col_constraints =
            (0..self.board.width()).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints =
            (0..self.board.height()).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.merged_rows()) {
            for (grid_cell, cell) in iter::zip(grid_row, row) {
                CellDisplay::from_cell(cell, true).render(grid_cell, buf);
            }
        }
    }
}
