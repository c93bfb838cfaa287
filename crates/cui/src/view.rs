use crate::app::{format_clock, App};
use bingo_core::{Card, Cell, Phase, CARD_COLS, CARD_ROWS};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const BOARD_COLUMNS: usize = 10;
const TICKET_HEIGHT: u16 = CARD_ROWS as u16 + 2;
const TICKETS_PER_ROW: usize = 2;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(8),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(30)])
        .split(root[1]);

    draw_board(frame, middle[0], app);
    draw_tickets(frame, middle[1], app);
    draw_events(frame, root[2], app);

    if app.show_help {
        draw_help_popup(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.state();
    let progress = match state.phase {
        Phase::Countdown { remaining } => {
            format!("starts in {}", format_clock(u64::from(remaining)))
        }
        _ => format!("Ball {} / {}", state.calls_made(), state.max_numbers),
    };
    let current = state
        .current_number()
        .map_or_else(|| "--".to_string(), |n| n.to_string());
    let next_tick = app
        .next_tick_in()
        .map_or_else(|| "-".to_string(), |left| format!("{:.1}s", left.as_secs_f32()));
    let lines = vec![
        Line::from(vec![
            "Bingo".bold(),
            Span::raw(format!(" | {} | {progress} | ", state.phase.name())),
            Span::styled(
                format!(" {current} "),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!(
            "speed {} | next tick {next_tick} | round {} | seed {} | tickets {}",
            state.extract_interval,
            state.token,
            app.seed,
            state.card_count
        )),
        Line::from(format!("Status: {}", app.status_line)),
    ];
    let block = Block::default().borders(Borders::ALL).title("Round");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.state();
    let current = state.current_index;
    let numbers: Vec<u8> = (1..=state.max_numbers).collect();
    let lines: Vec<Line<'_>> = numbers
        .chunks(BOARD_COLUMNS)
        .map(|chunk| {
            let spans: Vec<Span<'_>> = chunk
                .iter()
                .map(|&n| {
                    let style = match state.call_index(n) {
                        Some(index) if Some(index) == current => Style::default()
                            .fg(Color::Black)
                            .bg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                        Some(_) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                        None => Style::default().fg(Color::DarkGray),
                    };
                    Span::styled(format!("{n:>3} "), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    let block = Block::default().borders(Borders::ALL).title("Board");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_tickets(frame: &mut Frame, area: Rect, app: &App) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(format!("Your tickets (round {})", app.state().ticket_token()));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let visible_rows = usize::from((inner.height / TICKET_HEIGHT).max(1));
    let focused_row = app.focused_ticket / TICKETS_PER_ROW;
    let first_row = (focused_row + 1).saturating_sub(visible_rows);
    let rows: Vec<&[Card]> = app
        .tickets
        .chunks(TICKETS_PER_ROW)
        .skip(first_row)
        .take(visible_rows)
        .collect();

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(TICKET_HEIGHT); rows.len()])
        .split(inner);
    for (offset, (cards, row_area)) in rows.iter().zip(row_areas.iter()).enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Ratio(1, TICKETS_PER_ROW as u32);
                TICKETS_PER_ROW
            ])
            .split(*row_area);
        for (slot, card) in cards.iter().enumerate() {
            let index = (first_row + offset) * TICKETS_PER_ROW + slot;
            draw_ticket(frame, cols[slot], app, index, card);
        }
    }
}

fn draw_ticket(frame: &mut Frame, area: Rect, app: &App, index: usize, card: &Card) {
    let matched = app.engine.matched_cells(card);
    let lines: Vec<Line<'_>> = (0..CARD_ROWS)
        .map(|row| {
            let spans: Vec<Span<'_>> = (0..CARD_COLS)
                .map(|col| {
                    let cell = card.cell(row, col);
                    match cell {
                        Cell::Blank => Span::styled(" ·", Style::default().fg(Color::DarkGray)),
                        Cell::Number(n) if matched[col * CARD_ROWS + row] => Span::styled(
                            format!("{n:>2}"),
                            Style::default()
                                .fg(Color::Black)
                                .bg(Color::Green)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Cell::Number(n) => Span::raw(format!("{n:>2}")),
                    }
                })
                .flat_map(|span| [span, Span::raw(" ")])
                .collect();
            Line::from(spans)
        })
        .collect();
    let progress = app.engine.card_progress(card);
    let title = format!("#{} {}/{}", index + 1, progress.marked, progress.total);
    frame.render_widget(
        Paragraph::new(lines).block(pane_block(title, index == app.focused_ticket)),
        area,
    );
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let capacity = area.height.saturating_sub(2) as usize;
    let start = app.event_log.len().saturating_sub(capacity);
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .skip(start)
        .map(|line| Line::from(line.clone()))
        .collect();
    let block = Block::default().borders(Borders::ALL).title("Events");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from("q quit | ? help | esc close"),
        Line::from("p/space pause or resume"),
        Line::from("s slow speed | f fast speed"),
        Line::from("b/enter claim Bingo on the focused ticket"),
        Line::from("tab/arrows focus ticket | +/- ticket count"),
        Line::from("n restart with a new countdown"),
    ];
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if focused {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    block
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
