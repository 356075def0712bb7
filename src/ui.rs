use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::{Picker, PickerState};

const BORDER: Color = Color::Indexed(240);
const SELECTED_FG: Color = Color::Indexed(229);
const SELECTED_BG: Color = Color::Indexed(57);
const MUTED: Color = Color::Indexed(245);

pub fn render(frame: &mut Frame, picker: &mut Picker, visible_rows: usize) {
    if picker.state() != PickerState::Browsing {
        return;
    }

    let table_height = (visible_rows.max(1) as u16).saturating_add(3);
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(table_height),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(frame.area());

    picker.set_page_size(table_rows_visible(root[0]));
    render_table(frame, root[0], picker);
    render_footer(frame, root[1]);
}

fn render_table(frame: &mut Frame, area: Rect, picker: &Picker) {
    let header = Row::new(picker.columns().iter().map(|column| {
        Cell::from(column.title.clone()).style(Style::default().add_modifier(Modifier::BOLD))
    }))
    .height(1);

    // The phase cell keeps its own colors.
    let rows = picker.rows().iter().map(|row| {
        Row::new(vec![
            Cell::from(row.key.clone()),
            Cell::from(row.created.clone()),
            Cell::from(Line::from(row.phase.to_span())),
        ])
    });

    let constraints = picker
        .columns()
        .iter()
        .map(|column| Constraint::Length(column.width))
        .collect::<Vec<_>>();

    let table = Table::new(rows, constraints)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BORDER)),
        )
        .column_spacing(1)
        .row_highlight_style(Style::default().fg(SELECTED_FG).bg(SELECTED_BG));

    let mut state = TableState::default();
    state.select(picker.selected_index());
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let hint = Line::from(vec![
        Span::styled("↑/k ↓/j", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" move  "),
        Span::styled("enter", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" select  "),
        Span::styled("esc/q", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" cancel"),
    ]);
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(MUTED)),
        area,
    );
}

fn table_rows_visible(area: Rect) -> usize {
    area.height.saturating_sub(3).max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::app::{Column, Picker};
    use crate::input::Action;
    use crate::model::PickerRow;
    use crate::paint::paint;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;

    fn picker(count: usize) -> Picker {
        let rows = (0..count)
            .map(|index| PickerRow {
                key: format!("pod-{index}"),
                created: "2024-01-01 00:00:00".to_string(),
                phase: paint(Color::Indexed(37), "Running"),
            })
            .collect();
        Picker::new(
            vec![
                Column::new("Name", 30),
                Column::new("Created", 20),
                Column::new("Status", 12),
            ],
            rows,
        )
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_headers_and_rows() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");
        let mut picker = picker(3);
        terminal
            .draw(|frame| render(frame, &mut picker, 7))
            .expect("draw");

        let text = screen(&terminal);
        assert!(text.contains("Name"));
        assert!(text.contains("Created"));
        assert!(text.contains("pod-2"));
        assert!(text.contains("Running"));
        assert!(text.contains("cancel"));
    }

    #[test]
    fn page_size_tracks_visible_rows() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");
        let mut picker = picker(20);
        terminal
            .draw(|frame| render(frame, &mut picker, 7))
            .expect("draw");

        picker.apply(Action::PageDown);
        assert_eq!(picker.selected_index(), Some(6));
    }

    #[test]
    fn finished_picker_draws_nothing() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");
        let mut picker = picker(3);
        picker.apply(Action::Commit);
        terminal
            .draw(|frame| render(frame, &mut picker, 7))
            .expect("draw");

        assert!(screen(&terminal).trim().is_empty());
    }
}
