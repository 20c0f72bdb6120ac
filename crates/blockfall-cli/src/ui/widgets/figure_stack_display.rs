use std::iter;

use blockfall_engine::{MAX_SHAPE_HEIGHT, ShapeKind};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{CellDisplay, FigureDisplay, to_u16};

/// Upcoming figures, first to spawn on top.
#[derive(Debug)]
pub struct FigureStackDisplay<'a> {
    kinds: Vec<ShapeKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> FigureStackDisplay<'a> {
    pub fn new<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = ShapeKind>,
    {
        Self {
            kinds: kinds.into_iter().collect(),
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        FigureDisplay::new().width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let count = to_u16(self.kinds.len());
        let padding = count.saturating_sub(1);
        slot_height()
            .saturating_mul(count)
            .saturating_add(padding)
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }
}

fn slot_height() -> u16 {
    to_u16(MAX_SHAPE_HEIGHT) * CellDisplay::height()
}

impl Widget for FigureStackDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &FigureStackDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        let layout =
            Layout::vertical((0..self.kinds.len()).map(|_| Constraint::Length(slot_height())))
                .flex(Flex::SpaceBetween);
        let slots = area.layout_vec(&layout);

        for (slot, kind) in iter::zip(slots, &self.kinds) {
            FigureDisplay::new().kind(*kind).render(slot, buf);
        }
    }
}
