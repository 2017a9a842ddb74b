use std::rc::Rc;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use schulte::{
    config::GameSettings,
    session::{Outcome, Session, Status},
    viewport::Viewport,
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 1;

fn chunks(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(1), // status banner
            Constraint::Min(3),    // play field
            Constraint::Length(1), // next indicator
            Constraint::Length(1), // key help
        ])
        .split(area)
}

fn field_block() -> Block<'static> {
    Block::default().borders(Borders::ALL)
}

/// Viewport of the play field for a terminal of size `area`.
/// Shared by rendering and mouse hit-testing so both agree on cell layout.
pub fn viewport(area: Rect, settings: &GameSettings) -> Viewport {
    let field = chunks(area)[2];
    Viewport::new(field_block().inner(field), settings)
}

fn target_style(outcome: Option<Outcome>, auto_play: bool) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    let style = match outcome {
        Some(Outcome::Correct(_)) => base.bg(Color::Green).fg(Color::Black),
        Some(Outcome::Wrong(_)) => base.bg(Color::Red).fg(Color::White),
        None => base.bg(Color::Gray).fg(Color::Black),
    };
    if auto_play {
        style.add_modifier(Modifier::ITALIC)
    } else {
        style
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.game.session();
    let dim = Style::default().add_modifier(Modifier::DIM);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled("Points: ", dim),
        Span::styled(format!("[{:>2}]", app.points.text()), bold),
        Span::raw("   "),
        Span::styled("Time: ", dim),
        Span::styled(format!("{:.1}s", session.elapsed_secs()), bold),
        Span::raw("   "),
        Span::styled(format!("(enter) {}", session.start_label()), bold.fg(Color::Cyan)),
    ];

    if session.is_running() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("(a) {}", session.auto_play_label()),
            bold.fg(Color::Magenta),
        ));
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Let's Play"))
        .render(area, buf);
}

fn render_status(session: &Session, area: Rect, buf: &mut Buffer) {
    let color = match session.status() {
        Status::GameOver => Color::Red,
        Status::AllClear => Color::Green,
        Status::Idle | Status::Running => return,
    };

    Paragraph::new(Span::styled(
        session.status().to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(area, buf);
}

fn render_field(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.game.session();
    let block = field_block();
    let viewport = Viewport::new(block.inner(area), app.game.settings());
    block.render(area, buf);

    // Targets are only on the board while a game is in progress
    if !session.is_running() {
        return;
    }

    for target in session.visible_targets() {
        let rect = viewport.target_rect(target.position);
        let mut lines = vec![Line::from(target.rank.to_string())];
        if let Some(outcome) = target.outcome {
            let time = format!("{:.1}s", outcome.at().as_secs_f64());
            if rect.height > 1 {
                lines.push(Line::from(time));
            } else {
                lines = vec![Line::from(format!("{} {}", target.rank, time))];
            }
        }

        Clear.render(rect, buf);
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(target_style(target.outcome, session.auto_play()))
            .render(rect, buf);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = chunks(area);
        let session = self.game.session();

        render_header(self, chunks[0], buf);
        render_status(session, chunks[1], buf);
        render_field(self, chunks[2], buf);

        if let Some(next) = session.next_label() {
            Paragraph::new(Line::from(vec![
                Span::styled("Next: ", Style::default().add_modifier(Modifier::DIM)),
                Span::styled(next, Style::default().add_modifier(Modifier::BOLD)),
            ]))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
        }

        Paragraph::new(Span::styled(
            "(0-9/↑/↓) points  (enter) play  (a) auto play  (click) target  (esc) quit",
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
    }
}
