//! Terminal UI rendering with ratatui

use crate::menu::{Menu, MenuItem, MenuItemType};
use crate::screen::{GameScreen, OverlayAction};
use crate::settings::Settings;
use arcade::Phase;
use arcade::board::{BOARD_WIDTH, Cell};
use arcade::tetromino::Shape;
use arcade::TetrisView;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const EMPTY: &str = "  ";
const BLOCK: &str = "██";
const GHOST: &str = "░░";

/// Total width needed: hold(12) + board(22) + next/stats(16) = 50
const GAME_WIDTH: u16 = 50;
/// HUD(1) + board(20 + 2 borders) + hint(1)
const GAME_HEIGHT: u16 = 24;

/// Render the home screen
pub fn render_home(frame: &mut Frame, menu: &Menu, settings: &Settings) {
    let area = frame.area();
    let menu_area = center_rect(area, 44, 22);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(8)])
        .split(menu_area);

    let title = Paragraph::new(vec![
        Line::raw(""),
        Line::styled("NOSTALGIA ARCADE", Style::default().fg(Color::Cyan).bold()),
        Line::styled("pick a game", Style::default().fg(Color::DarkGray)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    let mut lines = vec![Line::raw("")];
    for (i, item) in menu.items.iter().enumerate() {
        lines.push(render_menu_item(item, i == menu.selected, settings));
        if matches!(item.item_type, MenuItemType::Game(_)) {
            lines.push(Line::raw(""));
        }
    }

    lines.push(Line::raw(""));
    let hint = match menu.items.get(menu.selected).map(|item| &item.item_type) {
        Some(MenuItemType::Toggle { .. } | MenuItemType::Number { .. }) => "↑↓ Select  ←→ Adjust  q Quit",
        _ => "↑↓ Select  Enter Play  q Quit",
    };
    lines.push(Line::styled(hint, Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Render a single menu item based on its type
fn render_menu_item(item: &MenuItem, is_selected: bool, settings: &Settings) -> Line<'static> {
    let prefix = if is_selected { "▶ " } else { "  " };
    let base_style = if is_selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    };

    match &item.item_type {
        MenuItemType::Game(info) => {
            let best = settings
                .best_score(info.id)
                .map(|b| format!("  best {}", b))
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(format!("{}{}", prefix, info.name), base_style),
                Span::styled(format!("  {}", info.tagline), Style::default().fg(Color::Gray)),
                Span::styled(best, Style::default().fg(Color::Magenta)),
            ])
        }
        MenuItemType::Toggle { value, .. } => {
            let value_str = if *value { "ON" } else { "OFF" };
            let value_color = if *value { Color::Green } else { Color::Red };
            Line::from(vec![
                Span::styled(format!("{}{}: ", prefix, item.label), base_style),
                Span::styled(format!("< {} >", value_str), Style::default().fg(value_color).bold()),
            ])
        }
        MenuItemType::Number { value, .. } => Line::from(vec![
            Span::styled(format!("{}{}: ", prefix, item.label), base_style),
            Span::styled(format!("< {} >", value), Style::default().fg(Color::Cyan)),
        ]),
        _ => Line::styled(format!("{}{}", prefix, item.label), base_style),
    }
}

/// Where the game screen draws its board, for mouse hit-testing
pub fn board_area(area: Rect) -> Rect {
    let columns = game_columns(center_rect(area, GAME_WIDTH, GAME_HEIGHT));
    columns[1]
}

fn game_rows(game_area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // HUD
            Constraint::Length(22), // Board (20 + 2 for borders)
            Constraint::Length(1),  // Controls hint
        ])
        .split(game_area)
}

fn game_columns(game_area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Hold box
            Constraint::Length(22), // Board (10*2 + 2 for borders)
            Constraint::Length(16), // Next + stats
        ])
        .split(game_rows(game_area)[1])
}

/// Render the entire game screen
pub fn render_game(frame: &mut Frame, screen: &GameScreen, settings: &Settings) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);
    let rows = game_rows(game_area);
    let columns = game_columns(game_area);

    render_hud(frame, rows[0], screen, settings);

    let Some(view) = &screen.view else {
        return;
    };

    render_hold(frame, columns[0], view);
    render_board(frame, columns[1], view, settings.gameplay.show_ghost);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(columns[2]);
    render_next(frame, right[0], view.next);
    render_stats(frame, right[1], view);

    let hint = screen.notice.as_deref().unwrap_or("←→↓ Move  ↑ Rotate  Space Drop  C Hold  P Pause  R Restart");
    frame.render_widget(
        Paragraph::new(Line::styled(hint.to_string(), Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center),
        rows[2],
    );

    if let Some(outcome) = &screen.outcome {
        render_game_over(frame, area, screen, &outcome.message());
    } else if view.phase == Phase::Paused {
        render_overlay(frame, area, "PAUSED", "Press P to resume");
    }
}

fn render_hud(frame: &mut Frame, area: Rect, screen: &GameScreen, settings: &Settings) {
    let sound = if settings.audio.muted {
        "muted".to_string()
    } else {
        format!("vol {}", settings.audio.volume)
    };
    let line = Line::from(vec![
        Span::styled("Score: ", Style::default().fg(Color::Gray)),
        Span::styled(screen.score.to_string(), Style::default().fg(Color::Yellow).bold()),
        Span::raw("   "),
        Span::styled("Best: ", Style::default().fg(Color::Gray)),
        Span::styled(screen.best.to_string(), Style::default().fg(Color::Magenta)),
        Span::raw("   "),
        Span::styled(sound, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn titled_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
}

fn render_hold(frame: &mut Frame, area: Rect, view: &TetrisView) {
    let block = titled_block(" HOLD ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(shape) = view.held {
        // dimmed while hold is spent for this piece
        render_mini_piece(frame, inner, shape, !view.can_hold);
    }
}

fn render_next(frame: &mut Frame, area: Rect, next: Shape) {
    let block = titled_block(" NEXT ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    render_mini_piece(frame, inner, next, false);
}

/// Render a small piece preview (for hold and next)
fn render_mini_piece(frame: &mut Frame, area: Rect, shape: Shape, dim: bool) {
    if area.height < 2 || area.width < 8 {
        return;
    }

    let mut style = Style::default().fg(shape.color());
    if dim {
        style = style.dim();
    }
    let cells = shape.spawn_cells();

    // spawn cells span x in -1..=2 and y in 0..=1
    let lines: Vec<Line> = (0..2)
        .map(|y| {
            let spans: Vec<Span> = (-1..3)
                .map(|x| {
                    if cells.contains(&(x, y)) {
                        Span::styled(BLOCK, style)
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Render the board: locked cells, ghost, active piece and flashing rows
fn render_board(frame: &mut Frame, area: Rect, view: &TetrisView, show_ghost: bool) {
    let block = Block::default()
        .title(" TETRIS ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active = view.active.map(|piece| piece.positions());
    let ghost = match (view.active, view.ghost_y) {
        (Some(piece), Some(ghost_y)) if show_ghost && ghost_y != piece.y => {
            Some(piece.positions().map(|(x, y)| (x, y + ghost_y - piece.y)))
        }
        _ => None,
    };
    let piece_color = view.active.map(|piece| piece.color).unwrap_or(Color::Gray);

    let mut lines: Vec<Line> = Vec::new();
    for (y, row) in view.board.visible_rows() {
        let flashing = view.flashing.contains(&y);
        let mut spans = Vec::with_capacity(BOARD_WIDTH);
        for (x, cell) in row.iter().enumerate() {
            let pos = (x as i32, y as i32);
            let span = if active.is_some_and(|cells| cells.contains(&pos)) {
                Span::styled(BLOCK, Style::default().fg(piece_color))
            } else if flashing {
                Span::styled(BLOCK, Style::default().fg(Color::White).bold())
            } else if let Cell::Filled(color) = cell {
                Span::styled(BLOCK, Style::default().fg(*color))
            } else if ghost.is_some_and(|cells| cells.contains(&pos)) {
                Span::styled(GHOST, Style::default().fg(piece_color).dim())
            } else {
                Span::raw(EMPTY)
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_stats(frame: &mut Frame, area: Rect, view: &TetrisView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::styled("LEVEL", Style::default().fg(Color::Gray)),
        Line::styled(view.level.to_string(), Style::default().fg(Color::Cyan)),
        Line::raw(""),
        Line::styled("LINES", Style::default().fg(Color::Gray)),
        Line::styled(view.lines.to_string(), Style::default().fg(Color::Green)),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_game_over(frame: &mut Frame, area: Rect, screen: &GameScreen, message: &str) {
    let popup_area = center_rect(area, 40, 11);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" GAME OVER ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let buttons: Vec<Span> = OverlayAction::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| {
            if i == screen.overlay_selected {
                Span::styled(format!("[{}]", action.label()), Style::default().fg(Color::Yellow).bold())
            } else {
                Span::styled(format!(" {} ", action.label()), Style::default().fg(Color::Gray))
            }
        })
        .collect();

    let lines = vec![
        Line::from(vec![
            Span::styled("Final Score: ", Style::default().fg(Color::Gray)),
            Span::styled(screen.score.to_string(), Style::default().fg(Color::Yellow).bold()),
        ]),
        Line::raw(""),
        Line::styled(message.to_string(), Style::default().fg(Color::White)),
        Line::raw(""),
        Line::from(buttons),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

/// Render an overlay (for pause)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_area = center_rect(area, 24, 5);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

