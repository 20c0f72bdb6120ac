use std::iter;

use blockfall_engine::Game;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{style, to_u16};
use crate::model::SessionStats;

pub struct StatsDisplay<'a> {
    game: &'a Game,
    stats: &'a SessionStats,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(game: &'a Game, stats: &'a SessionStats) -> Self {
        Self {
            game,
            stats,
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
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        to_u16(ROWS.len()) + super::block_vertical_margin(self.block.as_ref())
    }
}

type Value = &'static dyn Fn(&Game, &SessionStats) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(Value),
    LabelValue(&'static str, Value),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|game, _| game.score().to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|game, _| {
        let dur = game.elapsed();
        format!(
            "{:0}:{:0>2}.{:0>2}",
            dur.as_secs() / 60,
            dur.as_secs() % 60,
            dur.subsec_millis() / 10
        )
    }),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|game, _| game.level().to_string()),
    Row::LabelValue("SPEED:", &|game, _| {
        format!("{}ms", game.clock_period().as_millis())
    }),
    Row::LabelValue("LINES:", &|_, stats| stats.cleared_lines().to_string()),
    Row::Empty,
    Row::LabelValue("FIGURES:", &|_, stats| stats.locked_figures().to_string()),
    Row::LabelValue("SINGLES:", &|_, stats| {
        stats.line_cleared_counter()[1].to_string()
    }),
    Row::LabelValue("DOUBLES:", &|_, stats| {
        stats.line_cleared_counter()[2].to_string()
    }),
    Row::LabelValue("TRIPLES:", &|_, stats| {
        stats.line_cleared_counter()[3].to_string()
    }),
    Row::LabelValue("QUADS:", &|_, stats| {
        stats.line_cleared_counter()[4].to_string()
    }),
    Row::LabelValue("LOSSES:", &|_, stats| stats.losses().to_string()),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.game, self.stats), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.game, self.stats), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
