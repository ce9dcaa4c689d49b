use crate::app::{App, Screen};
use crate::models::{DetailViewModel, ViewState};
use crate::utils::{dex_number, format_name, relation_rows, type_rgb, wants_dark_text};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use std::io::Stdout;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

fn type_style(name: &str) -> Style {
    let rgb = type_rgb(name);
    let (r, g, b) = rgb;
    let fg = if wants_dark_text(rgb) {
        Color::Black
    } else {
        Color::White
    };
    Style::default().fg(fg).bg(Color::Rgb(r, g, b))
}

fn type_badges(types: &[String]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, t) in types.iter().enumerate() {
        spans.push(Span::styled(format!(" {} ", format_name(t)), type_style(t)));
        if i + 1 < types.len() {
            spans.push(Span::raw(" "));
        }
    }
    spans
}

// helper to compute a centered rect for popups
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_w = r.width.saturating_mul(percent_x) / 100;
    let popup_h = r.height.saturating_mul(percent_y) / 100;
    let popup_x = r.x + (r.width.saturating_sub(popup_w) / 2);
    let popup_y = r.y + (r.height.saturating_sub(popup_h) / 2);
    Rect::new(popup_x, popup_y, popup_w, popup_h)
}

fn loading(app: &App, title: &str) -> Paragraph<'static> {
    Paragraph::new(format!("{} Loading...", SPINNER[app.tick % SPINNER.len()]))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
}

pub fn draw_ui(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> io::Result<()> {
    terminal
        .draw(|f| {
            let size = f.size();
            match app.screen {
                Screen::Listing => draw_listing(f, app, size),
                Screen::Detail => draw_detail(f, app, size),
            }
            if app.show_help {
                draw_help(f, size);
            }
        })
        .map(|_| ())
}

fn draw_listing<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = app
        .visible
        .iter()
        .filter_map(|&i| app.cards.get(i))
        .map(|slot| {
            let line = match &slot.state {
                ViewState::Ready(card) => Spans::from(vec![
                    Span::raw(format!("{:>5} ", dex_number(card.id))),
                    Span::styled(
                        format!(" {} ", format_name(&card.name).to_uppercase()),
                        type_style(&card.primary_type),
                    ),
                ]),
                ViewState::Pending => Spans::from(Span::styled(
                    format!("  ... {}", format_name(&slot.name)),
                    Style::default().fg(Color::DarkGray),
                )),
                ViewState::NotFound | ViewState::Failed(_) => Spans::from(Span::styled(
                    format!("    ? {}", format_name(&slot.name)),
                    Style::default().fg(Color::Red),
                )),
            };
            ListItem::new(vec![line])
        })
        .collect();

    let title = match &app.listing {
        ViewState::Pending => format!("Pokémon {}", SPINNER[app.tick % SPINNER.len()]),
        ViewState::Failed(reason) => format!("Pokémon (load failed: {})", reason),
        _ => format!("Pokémon ({})", app.cards.len()),
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.visible.is_empty() {
        state.select(Some(app.selected_visible));
    }
    f.render_stateful_widget(list, chunks[0], &mut state);

    let footer = if app.search_mode {
        format!("/{}", app.search_query)
    } else if app.next_page.is_some() {
        "Press '/' to search, Enter for details, 'n' to load more.".to_string()
    } else {
        "Press '/' to search, Enter for details.".to_string()
    };
    let search_para = Paragraph::new(vec![Spans::from(Span::raw(footer))])
        .block(Block::default().borders(Borders::ALL).title("Search"));
    f.render_widget(search_para, chunks[1]);
}

fn draw_detail<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let key = app.detail_key.clone().unwrap_or_default();
    match &app.detail {
        ViewState::Pending => f.render_widget(loading(app, &key), area),
        ViewState::NotFound => f.render_widget(
            Paragraph::new("...NOT FOUND")
                .block(Block::default().borders(Borders::ALL).title(key)),
            area,
        ),
        ViewState::Failed(reason) => f.render_widget(
            Paragraph::new(vec![
                Spans::from(Span::styled(
                    "Could not load this entry.",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Spans::from(Span::raw(reason.clone())),
                Spans::from(Span::raw("")),
                Spans::from(Span::raw("Esc to go back.")),
            ])
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(key)),
            area,
        ),
        ViewState::Ready(d) => draw_detail_ready(f, d, area),
    }
}

fn draw_detail_ready<B: Backend>(f: &mut Frame<B>, p: &DetailViewModel, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(6)])
        .split(area);

    let mut info_lines: Vec<Spans> = Vec::new();
    info_lines.push(Spans::from(Span::styled(
        format!("{} {}", format_name(&p.name), dex_number(p.id)),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    let mut type_spans = vec![Span::raw("Types: ")];
    type_spans.extend(type_badges(&p.types));
    info_lines.push(Spans::from(type_spans));
    info_lines.push(Spans::from(Span::raw(format!(
        "Weight: {}kg  Height: {}m",
        p.weight, p.height
    ))));
    info_lines.push(Spans::from(Span::raw(format!(
        "Ability: {}",
        p.abilities.join(", ")
    ))));
    info_lines.push(Spans::from(Span::styled(
        p.artwork.clone(),
        Style::default().fg(Color::DarkGray),
    )));
    let nav = format!(
        "{}  |  {}",
        p.previous
            .as_deref()
            .map(|n| format!("< {}", format_name(n)))
            .unwrap_or_default(),
        p.next
            .as_deref()
            .map(|n| format!("{} >", format_name(n)))
            .unwrap_or_default(),
    );
    let info_para = Paragraph::new(info_lines)
        .block(Block::default().borders(Borders::ALL).title(nav))
        .wrap(Wrap { trim: true });
    f.render_widget(info_para, chunks[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(10)])
        .split(chunks[1]);

    // NAME | VALUE | [bar...]
    let inner_w = bottom[0].width.saturating_sub(2) as usize;
    let name_w = 15usize;
    let val_w = 4usize;
    let bar_max_w = inner_w.saturating_sub(name_w + val_w + 2);
    let scale_max = 255.0f32;
    let accent = p
        .types
        .first()
        .map(|t| {
            let (r, g, b) = type_rgb(t);
            Color::Rgb(r, g, b)
        })
        .unwrap_or(Color::Gray);

    let stat_lines: Vec<Spans> = p
        .stats
        .iter()
        .map(|st| {
            let bar_len = (((st.value as f32) / scale_max).min(1.0) * (bar_max_w as f32)).round()
                as usize;
            Spans::from(vec![
                Span::raw(format!(
                    "{:<name_w$} {:>val_w$} ",
                    st.label,
                    st.value,
                    name_w = name_w,
                    val_w = val_w
                )),
                Span::styled("█".repeat(bar_len), Style::default().fg(accent)),
            ])
        })
        .collect();
    let stats_para = Paragraph::new(stat_lines)
        .block(Block::default().borders(Borders::ALL).title("Base Stats"));
    f.render_widget(stats_para, bottom[0]);

    let mut rel_lines: Vec<Spans> = Vec::new();
    for tr in &p.damage_relations {
        rel_lines.push(Spans::from(Span::styled(
            format!(" {} ", format_name(&tr.type_name)),
            type_style(&tr.type_name),
        )));
        for (heading, names) in relation_rows(&tr.relations) {
            rel_lines.push(Spans::from(Span::raw(format!("  {:<10} {}", heading, names))));
        }
    }
    let rel_para = Paragraph::new(rel_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Damage Relations"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(rel_para, bottom[1]);
}

fn draw_help<B: Backend>(f: &mut Frame<B>, area: Rect) {
    let popup = centered_rect(60, 50, area);
    let help_lines = vec![
        Spans::from(Span::styled(
            "Keybindings",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::raw("")),
        Spans::from(Span::raw("q          Quit")),
        Spans::from(Span::raw("/          Filter by name or type")),
        Spans::from(Span::raw("Enter/Esc  Finish search mode")),
        Spans::from(Span::raw("Up/Down    Navigate list")),
        Spans::from(Span::raw("Enter      Open details")),
        Spans::from(Span::raw("n          Load next page")),
        Spans::from(Span::raw("Left/Right Previous/next entry (details)")),
        Spans::from(Span::raw("Esc        Back to list (details)")),
        Spans::from(Span::raw("?          Toggle this help")),
    ];
    let help_para = Paragraph::new(help_lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    f.render_widget(ratatui::widgets::Clear, popup);
    f.render_widget(help_para, popup);
}
