use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::mood::Mood;
use crate::session::ChatSession;
use crate::state::ChatRole;

const INPUT_PLACEHOLDER: &str = "Meow your question here... 🐾";
const INPUT_ROWS: u16 = 3;

/// Style a reply line: `**bold**` and `*action*` spans, everything else plain.
fn parse_cat_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c != '*' {
            current_text.push(c);
            continue;
        }

        let bold = chars.peek() == Some(&'*');
        if bold {
            chars.next();
        }

        // Collect up to the matching closer
        let mut inner = String::new();
        let mut found_close = false;
        while let Some(c) = chars.next() {
            if c == '*' {
                if !bold {
                    found_close = true;
                    break;
                }
                if chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
            }
            inner.push(c);
        }

        let marker = if bold { "**" } else { "*" };
        if found_close && !inner.is_empty() {
            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }
            let style = if bold {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                // Asterisks stay visible around actions
                inner = format!("*{}*", inner);
                Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC)
            };
            spans.push(Span::styled(inner, style));
        } else {
            // No closer, treat as literal
            current_text.push_str(marker);
            current_text.push_str(&inner);
            if found_close {
                current_text.push_str(marker);
            }
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(INPUT_ROWS + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    if app.show_mood_picker {
        render_mood_picker(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let model = app.session.selected_model().unwrap_or("finding a model...");

    let title = Line::from(vec![
        Span::styled(" 🐱 Cat GPT 🐱 ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!(" {} ", app.session.mood().display_name()),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(format!(" {} ", model), Style::default().fg(Color::White)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

/// The transcript as rendered in the chat pane, before the border and scroll
/// offset are applied. Scroll limits are measured on this same paragraph.
pub fn transcript_paragraph(session: &ChatSession, animation_frame: u8) -> Paragraph<'static> {
    let awaiting = session.is_awaiting_response();
    let you_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let cat_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let chat_text = if session.transcript().is_empty() && !awaiting {
        Text::from(Span::styled(
            "Say something to the cat. It may or may not care.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line<'static>> = Vec::new();

        for msg in session.transcript() {
            match msg.role {
                ChatRole::User => {
                    lines.push(Line::from(Span::styled("You:", you_style)));
                    for line in msg.content.lines() {
                        lines.push(Line::from(line.to_string()));
                    }
                }
                ChatRole::Assistant => {
                    lines.push(Line::from(Span::styled("Cat:", cat_style)));
                    for line in msg.content.lines() {
                        lines.push(parse_cat_line(line));
                    }
                }
            }
            lines.push(Line::default());
        }

        if awaiting {
            lines.push(Line::from(Span::styled("Cat:", cat_style)));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("*thinking* mrow{}", dots),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    Paragraph::new(chat_text).wrap(Wrap { trim: false })
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store area for mouse hit-testing and inner size for scroll calculations
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Chat ");

    let chat = transcript_paragraph(&app.session, app.animation_frame)
        .block(block)
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

/// Row and display column of the cursor within multi-line input.
fn cursor_row_col(input: &str, cursor: usize) -> (usize, usize) {
    let before: String = input.chars().take(cursor).collect();
    let row = before.matches('\n').count();
    let col = before
        .rsplit('\n')
        .next()
        .map(UnicodeWidthStr::width)
        .unwrap_or(0);
    (row, col)
}
fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let enabled = app.session.can_submit() && !app.show_mood_picker;

    let (border_color, title) = if app.session.is_awaiting_response() {
        (Color::DarkGray, " The cat is thinking... ")
    } else if app.session.selected_model().is_none() {
        (Color::DarkGray, " Waking the cat up... ")
    } else {
        (Color::Yellow, " Message ")
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let input = &app.session.pending_input;
    if input.is_empty() {
        let placeholder = Paragraph::new(INPUT_PLACEHOLDER)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        if enabled {
            frame.set_cursor_position((area.x + 1, area.y + 1));
        }
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let (row, col) = cursor_row_col(input, app.input_cursor);

    // Scroll offsets that keep the cursor visible
    let row_offset = if inner_height > 0 && row >= inner_height {
        row + 1 - inner_height
    } else {
        0
    };
    let col_offset = if inner_width > 0 && col >= inner_width {
        col + 1 - inner_width
    } else {
        0
    };

    let text_style = if enabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let paragraph = Paragraph::new(input.as_str())
        .style(text_style)
        .block(block)
        .scroll((row_offset as u16, col_offset as u16));
    frame.render_widget(paragraph, area);

    if enabled {
        frame.set_cursor_position((
            area.x + 1 + (col - col_offset) as u16,
            area.y + 1 + (row - row_offset) as u16,
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = if app.show_mood_picker {
        vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" nav ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" select ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" cancel ", label_style),
        ]
    } else {
        vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Shift+Enter ", key_style),
            Span::styled(" newline ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" mood ", label_style),
            Span::styled(" PgUp/PgDn ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" quit ", label_style),
        ]
    };

    let footer = Paragraph::new(Line::from(hints)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_mood_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let moods = Mood::all();

    // Calculate popup size and position (centered)
    let popup_width = 40.min(area.width.saturating_sub(4));
    let popup_height = (moods.len() as u16 + 2).min(area.height.saturating_sub(4));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Cat Mood ");

    let current = app.session.mood();
    let items: Vec<ListItem> = moods
        .iter()
        .map(|mood| {
            let style = if *mood == current {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!(" {} ", mood.display_name())).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut app.mood_picker_state);
}
