use blockfall_engine::{Figure, Game};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use super::{BoardDisplay, FigureStackDisplay, StatsDisplay, style};
use crate::model::SessionStats;

/// Full play screen: stats on the left, board in the center, queue on the right.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    game: &'a Game,
    stats: &'a SessionStats,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> GameDisplay<'a> {
    pub fn new(game: &'a Game, stats: &'a SessionStats) -> Self {
        Self {
            game,
            stats,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    fn border_style(&self) -> ratatui::style::Color {
        if self.game.is_paused() {
            style::BORDER_PAUSED
        } else {
            style::BORDER_PLAYING
        }
    }

    fn board(&self) -> BoardDisplay<'a> {
        BoardDisplay::new(self.game.board())
            .figure(self.game.figure())
            .block(
                Block::bordered()
                    .border_style(self.border_style())
                    .style(style::DEFAULT),
            )
    }

    fn figure_stack(&self) -> FigureStackDisplay<'a> {
        FigureStackDisplay::new(self.game.next_figures().map(Figure::kind)).block(
            Block::bordered()
                .title(Line::from("NEXT").centered())
                .padding(Padding::symmetric(
                    self.horizontal_padding,
                    self.vertical_padding,
                ))
                .border_style(self.border_style())
                .style(style::DEFAULT),
        )
    }

    fn stats_panel(&self) -> StatsDisplay<'a> {
        StatsDisplay::new(self.game, self.stats).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(Padding::symmetric(
                    self.horizontal_padding,
                    self.vertical_padding,
                ))
                .border_style(self.border_style())
                .style(style::DEFAULT),
        )
    }

    pub fn height(&self) -> u16 {
        self.board()
            .height()
            .max(self.figure_stack().height())
            .max(self.stats_panel().height())
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let game_board = self.board();
        let figure_stack = self.figure_stack();
        let stats_panel = self.stats_panel();

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(stats_panel.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(figure_stack.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(stats_panel.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [stack_area] =
            Layout::vertical([Constraint::Length(figure_stack.height())]).areas(right_column);

        let game_board_width = game_board.width();
        stats_panel.render(stats_area, buf);
        game_board.render(board_area, buf);
        figure_stack.render(stack_area, buf);

        if self.game.is_paused() {
            let block = Block::new().style(style::PAUSED);
            let text = Text::styled("PAUSED", style::PAUSED).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
