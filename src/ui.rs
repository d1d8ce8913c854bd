use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_tree_widget::{Tree, TreeItem};

use crate::app::{App, LoadState};
use crate::config::ColorConfig;
use crate::dashboard::{BadgeKind, DashboardRow, RepoDashboard};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let status_height = if app.config.layout.show_status_bar { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(status_height)])
        .split(frame.area());

    if matches!(app.load_state, LoadState::Loaded(_)) {
        draw_dashboard(frame, app, chunks[0]);
    } else {
        draw_load_state(frame, app, chunks[0]);
    }

    if status_height > 0 {
        draw_status_bar(frame, app, chunks[1]);
    }
}

fn draw_load_state(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.config.colors;
    let (message, style) = match &app.load_state {
        LoadState::Failed(message) => (
            format!("Failed to load code intelligence summary for repository: {}", message),
            Style::default().fg(colors.badge_errored),
        ),
        _ => (
            "Loading code intelligence summary...".to_string(),
            Style::default().fg(colors.muted),
        ),
    };

    let block = Block::default()
        .title(format!(" {} ", app.repo))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.config.colors.border));
    let paragraph = Paragraph::new(message)
        .block(block)
        .style(style)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_dashboard(frame: &mut Frame, app: &mut App, area: Rect) {
    let LoadState::Loaded(dashboard) = &app.load_state else {
        return;
    };
    let colors = &app.config.colors;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(app.config.layout.header_height),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(header_lines(dashboard, colors)), chunks[0]);

    let block = Block::default()
        .title(" Roots ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));

    if dashboard.tree.is_empty() {
        let message = if dashboard.is_empty() {
            "No code intel available."
        } else {
            "No code intel below the repository root."
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(colors.muted));
        frame.render_widget(paragraph, chunks[1]);
        return;
    }

    let rows = dashboard.rows();
    let items = match build_items(&rows, &dashboard.tree.root().children, dashboard, colors) {
        Ok(items) => items,
        Err(e) => {
            log::error!("🎨 ui: cannot build tree items: {}", e);
            frame.render_widget(Paragraph::new(e.to_string()).block(block), chunks[1]);
            return;
        }
    };

    let highlight = Style::default()
        .fg(colors.selected_fg)
        .bg(colors.selected_bg)
        .add_modifier(Modifier::BOLD);
    let tree = match Tree::new(&items) {
        Ok(tree) => tree.block(block).highlight_style(highlight).highlight_symbol("> "),
        Err(e) => {
            log::error!("🎨 ui: cannot build tree widget: {}", e);
            return;
        }
    };

    frame.render_stateful_widget(tree, chunks[1], &mut app.tree_state);
}

fn header_lines<'a>(dashboard: &RepoDashboard, colors: &ColorConfig) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(
            dashboard.title(),
            Style::default().fg(colors.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(dashboard.index_scan_line(), Style::default().fg(colors.muted))),
        Line::from(Span::styled(
            dashboard.retention_scan_line(),
            Style::default().fg(colors.muted),
        )),
    ];

    if let Some(root) = dashboard.root_row() {
        let mut spans = vec![Span::styled("/", Style::default().fg(colors.directory))];
        spans.extend(annotation_spans(&root, colors));
        lines.push(Line::from(spans));
    }

    lines
}

fn build_items<'a>(
    rows: &[DashboardRow],
    ids: &[usize],
    dashboard: &RepoDashboard,
    colors: &ColorConfig,
) -> std::io::Result<Vec<TreeItem<'a, usize>>> {
    ids.iter()
        .filter_map(|&id| rows.iter().find(|row| row.id == id))
        .map(|row| {
            let line = row_line(row, colors);
            let children = dashboard
                .tree
                .get(row.id)
                .map(|node| node.children.as_slice())
                .unwrap_or_default();
            if children.is_empty() {
                Ok(TreeItem::new_leaf(row.id, line))
            } else {
                let child_items = build_items(rows, children, dashboard, colors)?;
                TreeItem::new(row.id, line, child_items)
            }
        })
        .collect()
}

fn row_line<'a>(row: &DashboardRow, colors: &ColorConfig) -> Line<'a> {
    let mut spans = vec![Span::styled(
        row.display_name.clone(),
        Style::default().fg(colors.directory),
    )];
    spans.extend(annotation_spans(row, colors));
    Line::from(spans)
}

fn annotation_spans<'a>(row: &DashboardRow, colors: &ColorConfig) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    for badge in &row.badges {
        spans.push(Span::raw("  "));
        for kind in &badge.kinds {
            spans.push(Span::styled(kind.symbol(), Style::default().fg(badge_color(*kind, colors))));
        }
        spans.push(Span::styled(
            format!(" {}", badge.indexer),
            Style::default().fg(colors.muted),
        ));
    }
    for suggestion in &row.suggestions {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            suggestion.label(),
            Style::default().fg(colors.suggestion).add_modifier(Modifier::BOLD),
        ));
    }
    spans
}

fn badge_color(kind: BadgeKind, colors: &ColorConfig) -> ratatui::style::Color {
    match kind {
        BadgeKind::Success => colors.badge_success,
        BadgeKind::InProgress => colors.badge_in_progress,
        BadgeKind::Queued => colors.badge_queued,
        BadgeKind::Errored => colors.badge_errored,
        BadgeKind::Inactive => colors.badge_inactive,
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let keys = &app.config.keybindings;
    let help = format!(
        "{} quit · {} reload · ←/→ collapse/expand · ↑/↓ move",
        keys.quit, keys.reload
    );

    let line = Line::from(vec![
        Span::raw(format!(" {} ", app.status_message)),
        Span::raw(" | "),
        Span::raw(help),
    ]);
    let paragraph = Paragraph::new(line).style(
        Style::default()
            .bg(app.config.colors.status_bar_bg)
            .fg(app.config.colors.status_bar_fg),
    );
    frame.render_widget(paragraph, area);
}
