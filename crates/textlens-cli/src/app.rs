use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use textlens_engine::{
    DocRange, Document, EditError, EditorSession, IssueId, IssueType, Point, UnifiedIssue,
    Viewport, io,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Editor,
    Issues,
}

/// Caret in block coordinates: block index plus char offset in the block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub block: usize,
    pub column: usize,
}

pub struct App {
    pub path: PathBuf,
    pub session: EditorSession,
    pub pane: Pane,
    pub cursor: Cursor,
    /// First block shown in the editor pane
    pub scroll: usize,
    pub issue_list_state: ListState,
    pub issues: Vec<UnifiedIssue>,
    /// Applied issue ids, most recent last
    applied_order: Vec<IssueId>,
    pub status: Option<String>,
    pub dirty: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(path: PathBuf, session: EditorSession) -> Self {
        Self {
            path,
            session,
            pane: Pane::Editor,
            cursor: Cursor::default(),
            scroll: 0,
            issue_list_state: ListState::default(),
            issues: Vec::new(),
            applied_order: Vec::new(),
            status: None,
            dirty: false,
            should_quit: false,
        }
    }

    pub fn document(&self) -> &Document {
        self.session.document()
    }

    /// Pick up whatever the session produced since the last frame
    pub fn refresh(&mut self) {
        self.issues = self.session.issues();
        let selected = match self.issue_list_state.selected() {
            _ if self.issues.is_empty() => None,
            Some(index) => Some(index.min(self.issues.len() - 1)),
            None => Some(0),
        };
        self.issue_list_state.select(selected);
        if let Some(notice) = self.session.take_notice() {
            self.status = Some(notice);
        }
    }

    /// Keep the cursor on screen and tell the session which blocks are visible
    pub fn update_viewport(&mut self, height: usize, now: Instant) {
        let height = height.max(1);
        if self.cursor.block < self.scroll {
            self.scroll = self.cursor.block;
        } else if self.cursor.block >= self.scroll + height {
            self.scroll = self.cursor.block + 1 - height;
        }
        self.session
            .set_viewport(Viewport::new(self.scroll..self.scroll + height), now);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => self.save(),
                KeyCode::Char('c') => self.should_quit = true,
                _ => {}
            }
            return Ok(());
        }

        match (self.pane, key.code) {
            (_, KeyCode::Esc) => self.should_quit = true,
            (_, KeyCode::Tab) => {
                self.pane = match self.pane {
                    Pane::Editor => Pane::Issues,
                    Pane::Issues => Pane::Editor,
                };
            }
            (Pane::Issues, code) => self.handle_issue_key(code, now),
            (Pane::Editor, code) => self.handle_editor_key(code, now),
        }
        Ok(())
    }

    fn handle_issue_key(&mut self, code: KeyCode, now: Instant) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.select_issue(1),
            KeyCode::Up | KeyCode::Char('k') => self.select_issue(-1),
            KeyCode::Enter => self.apply_selected(now),
            KeyCode::Char('u') => self.undo_last(now),
            KeyCode::Char('f') => self.cycle_filter(now),
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, code: KeyCode, now: Instant) {
        let result = match code {
            KeyCode::Left => {
                self.move_left();
                Ok(())
            }
            KeyCode::Right => {
                self.move_right();
                Ok(())
            }
            KeyCode::Up => {
                self.move_vertical(-1);
                Ok(())
            }
            KeyCode::Down => {
                self.move_vertical(1);
                Ok(())
            }
            KeyCode::Home => {
                self.cursor.column = 0;
                Ok(())
            }
            KeyCode::End => {
                self.cursor.column = self.block_len(self.cursor.block);
                Ok(())
            }
            KeyCode::Char(c) => self.insert_char(c, now),
            KeyCode::Backspace => self.backspace(now),
            KeyCode::Enter => self.split_line(now),
            _ => Ok(()),
        };
        if let Err(e) = result {
            log::warn!("edit failed: {e}");
            self.status = Some(format!("Edit failed: {e}"));
        }
    }

    fn select_issue(&mut self, delta: isize) {
        if self.issues.is_empty() {
            return;
        }
        let len = self.issues.len() as isize;
        let current = self.issue_list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.issue_list_state.select(Some(next));

        let id = self.issues[next].id.clone();
        match self.session.scroll_to_issue(&id) {
            Ok(range) => self.move_cursor_to(range),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn selected_issue(&self) -> Option<&UnifiedIssue> {
        self.issue_list_state
            .selected()
            .and_then(|index| self.issues.get(index))
    }

    fn apply_selected(&mut self, now: Instant) {
        let Some(issue) = self.selected_issue() else {
            return;
        };
        let Some(suggestion) = issue.suggestions.first().cloned() else {
            self.status = Some("No suggestion to apply".to_string());
            return;
        };
        let id = issue.id.clone();
        if self.session.apply_suggestion(&id, &suggestion, now) {
            self.applied_order.push(id);
            self.dirty = true;
            self.clamp_cursor();
        }
    }

    fn undo_last(&mut self, now: Instant) {
        let Some(id) = self.applied_order.pop() else {
            self.status = Some("Nothing to undo".to_string());
            return;
        };
        if self.session.revert_suggestion(&id, now) {
            self.dirty = true;
            self.clamp_cursor();
        }
    }

    fn cycle_filter(&mut self, now: Instant) {
        let next = match self.session.filter() {
            Some(IssueType::Readability) => None,
            Some(issue_type) => Some(issue_type.next()),
            None => Some(IssueType::Grammar),
        };
        self.session.set_filter(next, now);
        self.issue_list_state.select(None);
    }

    fn save(&mut self) {
        match io::write_document(&self.path, self.session.document()) {
            Ok(()) => {
                log::info!("saved {}", self.path.display());
                self.dirty = false;
                self.status = Some(format!("Saved {}", self.path.display()));
            }
            Err(e) => {
                log::error!("failed to save {}: {e}", self.path.display());
                self.status = Some(format!("Save failed: {e}"));
            }
        }
    }

    fn block_len(&self, block: usize) -> usize {
        self.document()
            .block(block)
            .map(|block| block.char_len())
            .unwrap_or(0)
    }

    /// The run position of the cursor
    fn cursor_point(&self) -> Result<Point, EditError> {
        let Cursor { block, column } = self.cursor;
        self.document()
            .range_in_block(block, column..column)
            .map(|range| Point::new(range.path, range.start))
            .ok_or(EditError::BlockOutOfBounds(block))
    }

    fn move_cursor_to(&mut self, range: DocRange) {
        let run_start = self
            .document()
            .run_offset_in_block(range.path)
            .unwrap_or(0);
        self.cursor = Cursor {
            block: range.path.block,
            column: run_start + range.start,
        };
    }

    fn clamp_cursor(&mut self) {
        let last = self.document().block_count().saturating_sub(1);
        self.cursor.block = self.cursor.block.min(last);
        self.cursor.column = self.cursor.column.min(self.block_len(self.cursor.block));
    }

    fn move_left(&mut self) {
        if self.cursor.column > 0 {
            self.cursor.column -= 1;
        } else if self.cursor.block > 0 {
            self.cursor.block -= 1;
            self.cursor.column = self.block_len(self.cursor.block);
        }
    }

    fn move_right(&mut self) {
        if self.cursor.column < self.block_len(self.cursor.block) {
            self.cursor.column += 1;
        } else if self.cursor.block + 1 < self.document().block_count() {
            self.cursor.block += 1;
            self.cursor.column = 0;
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let last = self.document().block_count().saturating_sub(1);
        self.cursor.block = self.cursor.block.saturating_add_signed(delta).min(last);
        self.clamp_cursor();
    }

    fn insert_char(&mut self, c: char, now: Instant) -> Result<(), EditError> {
        let point = self.cursor_point()?;
        self.session
            .edit(now, |doc| doc.insert_text(point, c.encode_utf8(&mut [0; 4])))?;
        self.cursor.column += 1;
        self.dirty = true;
        Ok(())
    }

    fn backspace(&mut self, now: Instant) -> Result<(), EditError> {
        let Cursor { block, column } = self.cursor;
        if column > 0 {
            let range = self
                .document()
                .range_in_block(block, column - 1..column)
                .ok_or(EditError::BlockOutOfBounds(block))?;
            self.session
                .edit(now, |doc| doc.delete_text(Point::new(range.path, range.start), 1))?;
            self.cursor.column -= 1;
        } else if block > 0 {
            let column = self.block_len(block - 1);
            self.session.edit(now, |doc| doc.merge_block(block))?;
            self.cursor = Cursor {
                block: block - 1,
                column,
            };
        } else {
            return Ok(());
        }
        self.dirty = true;
        Ok(())
    }

    fn split_line(&mut self, now: Instant) -> Result<(), EditError> {
        let point = self.cursor_point()?;
        self.session.edit(now, |doc| doc.split_block(point))?;
        self.cursor = Cursor {
            block: self.cursor.block + 1,
            column: 0,
        };
        self.dirty = true;
        Ok(())
    }
}
