use std::net::SocketAddr;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use netpong::{GameState, LinkState, Paddle, Role, SessionStatus};

const BALL: &str = "@";
const PADDLE: &str = "█";
const CENTER_LINE: &str = "┊";

/// Status line drawn into the bottom border of the field.
#[derive(Debug, Clone, Default)]
pub struct Footer {
    pub role: Option<Role>,
    pub peer: Option<SocketAddr>,
    pub link: Option<LinkState>,
}

impl Footer {
    fn text(&self) -> String {
        let Some(role) = self.role else {
            return " local  w/s left  ↑/↓ right  q quit ".to_string();
        };

        let peer = self
            .peer
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "-".to_string());

        match &self.link {
            Some(LinkState {
                closed: Some(reason),
                ..
            }) => format!(" {}  opponent disconnected ({})  q quit ", role.as_str(), reason),
            Some(link) => format!(
                " {}  {}  sync {}  out {} / in {}  q quit ",
                role.as_str(),
                peer,
                link.stats.cycles,
                format_bytes(link.stats.bytes_sent),
                format_bytes(link.stats.bytes_received)
            ),
            None => format!(" {}  {}  q quit ", role.as_str(), peer),
        }
    }

    fn style(&self) -> Style {
        match &self.link {
            Some(link) if !link.is_open() => Style::default().fg(Color::Red),
            _ => Style::default().fg(Color::DarkGray),
        }
    }
}

/// The playing field in game coordinates: row 0 and column 0 are the
/// top-left border cell of `area`.
struct Field<'a> {
    state: &'a GameState,
    footer: &'a Footer,
}

impl Widget for Field<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
            .title_bottom(Line::styled(self.footer.text(), self.footer.style()))
            .render(area, buf);

        let center_x = i32::from(area.width) / 2;
        for row in 1..i32::from(area.height) - 1 {
            put(buf, area, center_x, row, CENTER_LINE, Color::DarkGray);
        }

        let max_y = i32::from(area.height);
        let max_x = i32::from(area.width);
        let score = self.state.score;
        put(
            buf,
            area,
            max_x / 4,
            max_y / 7,
            &score.p1.to_string(),
            Color::Yellow,
        );
        put(
            buf,
            area,
            max_x / 2 + max_x / 4,
            max_y / 7,
            &score.p2.to_string(),
            Color::Yellow,
        );

        draw_paddle(buf, area, &self.state.left);
        draw_paddle(buf, area, &self.state.right);

        let ball = self.state.ball;
        put(buf, area, ball.x, ball.y, BALL, Color::White);
    }
}

fn draw_paddle(buf: &mut Buffer, area: Rect, paddle: &Paddle) {
    for row in paddle.y..paddle.y + paddle.h {
        put(buf, area, paddle.x, row, PADDLE, Color::Cyan);
    }
}

/// Writes `symbol` at a game coordinate, dropping anything off screen.
fn put(buf: &mut Buffer, area: Rect, x: i32, y: i32, symbol: &str, color: Color) {
    let (Ok(dx), Ok(dy)) = (u16::try_from(x), u16::try_from(y)) else {
        return;
    };
    if dx >= area.width || dy >= area.height {
        return;
    }
    buf.set_string(
        area.x + dx,
        area.y + dy,
        symbol,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    );
}

pub fn render_game(frame: &mut Frame, state: &GameState, footer: &Footer) {
    frame.render_widget(Field { state, footer }, frame.area());
}

pub fn render_status(frame: &mut Frame, status: &SessionStatus) {
    let lines = match status {
        SessionStatus::Starting | SessionStatus::Local => vec![Line::from("Starting...")],
        SessionStatus::WaitingForPeer {
            game_id,
            listen_addr,
        } => vec![
            Line::from(vec![
                Span::styled("Game ID: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    game_id.to_string(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::styled(
                format!("Listening on {}", listen_addr),
                Style::default().fg(Color::DarkGray),
            ),
            Line::from(""),
            Line::from("Waiting for player to connect..."),
            Line::from(""),
            help_line("Press 'q' to quit"),
        ],
        SessionStatus::Connecting { target } => vec![
            Line::from(format!("Connecting to {}...", target)),
            Line::from(""),
            help_line("Press 'q' to quit"),
        ],
        SessionStatus::Connected { peer, role } => vec![Line::styled(
            format!("Connected to {} as {}", peer, role.as_str()),
            Style::default().fg(Color::Green),
        )],
    };

    render_dialog(frame, " netpong ", Color::Cyan, lines);
}

pub fn render_failure(frame: &mut Frame, error: &str) {
    let lines = vec![
        Line::styled(
            "Connection failed!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Error: {}", error)),
        Line::from(""),
        help_line("Press any key..."),
    ];

    render_dialog(frame, " Error ", Color::Red, lines);
}

fn help_line(text: &str) -> Line<'_> {
    Line::styled(
        text,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )
}

fn render_dialog(frame: &mut Frame, title: &str, color: Color, lines: Vec<Line>) {
    let area = frame.area();
    let width = lines
        .iter()
        .map(|line| line.width() as u16)
        .max()
        .unwrap_or(0)
        .max(30)
        + 4;
    let height = lines.len() as u16 + 2;
    let dialog_area = centered_rect(width, height, area);
    frame.render_widget(Clear, dialog_area);

    let dialog = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let text = Paragraph::new(lines)
        .block(dialog)
        .alignment(Alignment::Center);
    frame.render_widget(text, dialog_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use netpong::{Ball, Bounds, SyncStats};

    use super::*;

    fn render(state: &GameState, footer: &Footer) -> Buffer {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        Field { state, footer }.render(area, &mut buf);
        buf
    }

    #[test]
    fn field_places_ball_and_paddles_at_game_coordinates() {
        let mut state = GameState::new(Bounds::new(24, 80), 10);
        state.ball = Ball::new(5, 9, 1, 1);

        let buf = render(&state, &Footer::default());

        assert_eq!(buf[(9, 5)].symbol(), BALL);
        assert_eq!(buf[(2, 7)].symbol(), PADDLE);
        assert_eq!(buf[(2, 16)].symbol(), PADDLE);
        assert_eq!(buf[(77, 7)].symbol(), PADDLE);
        assert_ne!(buf[(2, 17)].symbol(), PADDLE);
    }

    #[test]
    fn scores_sit_a_seventh_down() {
        let mut state = GameState::new(Bounds::new(24, 80), 10);
        state.score.p1 = 4;
        state.score.p2 = 7;

        let buf = render(&state, &Footer::default());

        assert_eq!(buf[(20, 3)].symbol(), "4");
        assert_eq!(buf[(60, 3)].symbol(), "7");
    }

    #[test]
    fn off_screen_ball_is_clipped() {
        let mut state = GameState::new(Bounds::new(24, 80), 10);
        state.ball = Ball::new(-1, 200, 1, 1);

        render(&state, &Footer::default());
    }

    #[test]
    fn footer_reports_disconnect() {
        let footer = Footer {
            role: Some(Role::Host),
            peer: None,
            link: Some(LinkState {
                stats: SyncStats::default(),
                closed: Some("peer closed the connection".to_string()),
            }),
        };

        assert!(footer.text().contains("opponent disconnected"));
    }

    #[test]
    fn bytes_are_humanized() {
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(2048), "2.0KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0MB");
    }
}
