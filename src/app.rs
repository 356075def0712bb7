use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEventKind};
use futures::{Stream, StreamExt};
use std::future::Future;
use std::io;
use tracing::debug;

use crate::input::{Action, map_key};
use crate::model::{PickerRow, SelectionOutcome};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PickerState {
    Browsing,
    Committed,
    Cancelled,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Column {
    pub title: String,
    pub width: u16,
}

impl Column {
    pub fn new(title: impl Into<String>, width: u16) -> Self {
        Self {
            title: title.into(),
            width,
        }
    }
}

// Committed and Cancelled are terminal; later actions are ignored.
#[derive(Debug, Clone)]
pub struct Picker {
    columns: Vec<Column>,
    rows: Vec<PickerRow>,
    selected: usize,
    page_size: usize,
    state: PickerState,
}

impl Picker {
    pub fn new(columns: Vec<Column>, rows: Vec<PickerRow>) -> Self {
        Self {
            columns,
            rows,
            selected: 0,
            page_size: 1,
            state: PickerState::Browsing,
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[PickerRow] {
        &self.rows
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.rows.is_empty() {
            None
        } else {
            Some(self.selected.min(self.rows.len() - 1))
        }
    }

    pub fn set_page_size(&mut self, rows: usize) {
        self.page_size = rows.max(1);
    }

    pub fn apply(&mut self, action: Action) -> PickerState {
        if self.state != PickerState::Browsing {
            return self.state;
        }

        match action {
            Action::Cancel => self.state = PickerState::Cancelled,
            Action::Commit => self.state = PickerState::Committed,
            Action::Down => self.move_selection(1),
            Action::Up => self.move_selection(-1),
            Action::PageDown => self.move_selection(self.page_step()),
            Action::PageUp => self.move_selection(-self.page_step()),
            Action::HalfPageDown => self.move_selection(self.half_page_step()),
            Action::HalfPageUp => self.move_selection(-self.half_page_step()),
            Action::Top => self.selected = 0,
            Action::Bottom => self.selected = self.rows.len().saturating_sub(1),
        }
        self.state
    }

    pub fn outcome(&self) -> Option<SelectionOutcome> {
        match self.state {
            PickerState::Browsing => None,
            PickerState::Cancelled => Some(SelectionOutcome::Cancelled),
            PickerState::Committed => {
                let key = self
                    .selected_index()
                    .map(|index| self.rows[index].key.clone())
                    .unwrap_or_default();
                Some(SelectionOutcome::Selected(key))
            }
        }
    }

    fn page_step(&self) -> isize {
        self.page_size.saturating_sub(1).max(1) as isize
    }

    fn half_page_step(&self) -> isize {
        (self.page_size / 2).max(1) as isize
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.selected = 0;
            return;
        }

        let max_index = self.rows.len().saturating_sub(1) as isize;
        let current = self.selected.min(max_index as usize) as isize;
        self.selected = (current + delta).clamp(0, max_index) as usize;
    }
}

pub async fn drive<S, I, D>(
    picker: &mut Picker,
    events: &mut S,
    interrupt: I,
    mut draw: D,
) -> Result<SelectionOutcome>
where
    S: Stream<Item = io::Result<Event>> + Unpin,
    I: Future<Output = ()>,
    D: FnMut(&mut Picker) -> Result<()>,
{
    tokio::pin!(interrupt);

    loop {
        if let Some(outcome) = picker.outcome() {
            debug!("picker finished: {outcome:?}");
            return Ok(outcome);
        }

        draw(picker)?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = map_key(key) {
                        debug!("action={action:?}");
                        picker.apply(action);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    return Err(error).context("failed to read terminal event");
                }
                None => {
                    picker.apply(Action::Cancel);
                }
            },
            _ = &mut interrupt => {
                debug!("interrupt received while picking");
                picker.apply(Action::Cancel);
            }
        }
    }
}
