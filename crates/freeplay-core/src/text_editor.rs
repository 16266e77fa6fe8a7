//! Embedded text-editing session for a single text block.

use crate::shapes::{FontSpec, MIN_TEXT_WIDTH, Rgba, Text};
use kurbo::{Point, Rect};

/// Caret/selection state for the text block being typed.
///
/// While an editor is live, the underlying shape is absent from the
/// scene; committing materializes a fresh [`Text`]. An abandoned edit
/// therefore loses the buffer -- and, when editing an existing shape,
/// that shape too. Known limitation.
#[derive(Debug, Clone)]
pub struct TextEditor {
    buffer: String,
    /// Caret byte offset into `buffer`, always on a char boundary.
    caret: usize,
    /// Selection anchor byte offset; the caret is the moving end.
    anchor: Option<usize>,
    /// Baseline of the first line, in world coordinates.
    origin: Point,
    color: Rgba,
    font: FontSpec,
}

impl TextEditor {
    /// Start a fresh empty edit anchored at a world point.
    pub fn new(origin: Point, color: Rgba, font: FontSpec) -> Self {
        Self {
            buffer: String::new(),
            caret: 0,
            anchor: None,
            origin,
            color,
            font,
        }
    }

    /// Start editing existing content, caret at the end.
    pub fn with_content(origin: Point, content: String, color: Rgba, font: FontSpec) -> Self {
        let caret = content.len();
        Self {
            buffer: content,
            caret,
            anchor: None,
            origin,
            color,
            font,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn font(&self) -> FontSpec {
        self.font
    }

    /// Restyle the live edit (style pickers act on the editor too).
    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    /// The active selection as a normalized `[start, end)` byte range,
    /// or None when collapsed.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        if anchor == self.caret {
            return None;
        }
        Some((anchor.min(self.caret), anchor.max(self.caret)))
    }

    /// The selected text, empty when nothing is selected (the copy
    /// contract: collaborators put exactly this on the system clipboard).
    pub fn selected_text(&self) -> String {
        match self.selection() {
            Some((start, end)) => self.buffer[start..end].to_string(),
            None => String::new(),
        }
    }

    /// Insert text at the caret, replacing the selection if present.
    pub fn insert(&mut self, text: &str) {
        self.delete_selection();
        self.buffer.insert_str(self.caret, text);
        self.caret += text.len();
    }

    /// Paste clipboard text (identical to insert; the collaborator owns
    /// the system clipboard).
    pub fn paste(&mut self, text: &str) {
        self.insert(text);
    }

    /// Delete the selection or the code point left of the caret.
    pub fn backspace(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.caret > 0 {
            let prev = self.prev_boundary(self.caret);
            self.buffer.replace_range(prev..self.caret, "");
            self.caret = prev;
        }
    }

    /// Delete the selection or the code point right of the caret.
    pub fn delete_forward(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.caret < self.buffer.len() {
            let next = self.next_boundary(self.caret);
            self.buffer.replace_range(self.caret..next, "");
        }
    }

    /// Move one code point left. Without `select`, an active selection
    /// collapses to its start instead of moving.
    pub fn move_left(&mut self, select: bool) {
        if !select {
            if let Some((start, _)) = self.selection() {
                self.caret = start;
                self.anchor = None;
                return;
            }
        }
        self.begin_motion(select);
        self.caret = self.prev_boundary(self.caret);
        self.collapse_empty_selection();
    }

    /// Move one code point right. Without `select`, an active selection
    /// collapses to its end instead of moving.
    pub fn move_right(&mut self, select: bool) {
        if !select {
            if let Some((_, end)) = self.selection() {
                self.caret = end;
                self.anchor = None;
                return;
            }
        }
        self.begin_motion(select);
        self.caret = self.next_boundary(self.caret);
        self.collapse_empty_selection();
    }

    /// Move up one line, keeping the column clamped to the target line's
    /// length. From the first line the caret goes to the buffer start.
    pub fn move_up(&mut self, select: bool) {
        self.begin_motion(select);
        let (line, col) = self.line_col();
        self.caret = if line == 0 {
            0
        } else {
            self.offset_at(line - 1, col)
        };
        self.collapse_empty_selection();
    }

    /// Move down one line, column clamped. From the last line the caret
    /// goes to the buffer end.
    pub fn move_down(&mut self, select: bool) {
        self.begin_motion(select);
        let (line, col) = self.line_col();
        let last = self.line_starts().len() - 1;
        self.caret = if line >= last {
            self.buffer.len()
        } else {
            self.offset_at(line + 1, col)
        };
        self.collapse_empty_selection();
    }

    /// Move to the start of the current line.
    pub fn move_line_start(&mut self, select: bool) {
        self.begin_motion(select);
        let (line, _) = self.line_col();
        self.caret = self.line_starts()[line];
        self.collapse_empty_selection();
    }

    /// Move to the end of the current line.
    pub fn move_line_end(&mut self, select: bool) {
        self.begin_motion(select);
        let (line, _) = self.line_col();
        self.caret = self.line_end(line);
        self.collapse_empty_selection();
    }

    /// Select the whole buffer.
    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.caret = self.buffer.len();
    }

    /// Place the caret from a world-space click.
    ///
    /// The line is located by vertical offset from the first baseline,
    /// clamped to the last line; the column is found by accumulating
    /// character advances until the click falls within half an advance.
    pub fn click(&mut self, world: Point, select: bool) {
        self.begin_motion(select);

        let rel_x = world.x - self.origin.x;
        let rel_y = world.y - self.origin.y;
        let line_count = self.line_starts().len();
        let line = (((rel_y + self.font.ascent()) / self.font.line_height()).floor() as i64)
            .clamp(0, line_count as i64 - 1) as usize;

        let start = self.line_starts()[line];
        let end = self.line_end(line);
        let advance = self.font.char_advance();
        let mut accumulated = 0.0;
        let mut offset = start;
        for ch in self.buffer[start..end].chars() {
            if rel_x <= accumulated + advance / 2.0 {
                break;
            }
            accumulated += advance;
            offset += ch.len_utf8();
        }
        self.caret = offset;
        self.collapse_empty_selection();
    }

    /// The live bounding box, measured the same way a committed text
    /// shape measures itself.
    pub fn bounds(&self) -> Rect {
        let (width, height) = self.font.measure(&self.buffer);
        let top = self.origin.y - self.font.ascent();
        Rect::new(
            self.origin.x,
            top,
            self.origin.x + width.max(MIN_TEXT_WIDTH),
            top + height,
        )
    }

    /// Materialize the buffer into a text shape.
    ///
    /// An empty buffer commits nothing.
    pub fn commit(self) -> Option<Text> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(Text::new(self.origin, self.buffer, self.color, self.font))
    }

    fn begin_motion(&mut self, select: bool) {
        if select {
            if self.anchor.is_none() {
                self.anchor = Some(self.caret);
            }
        } else {
            self.anchor = None;
        }
    }

    fn collapse_empty_selection(&mut self) {
        if self.anchor == Some(self.caret) {
            self.anchor = None;
        }
    }

    /// Remove the selected range if any; the caret lands at its start.
    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection() else {
            self.anchor = None;
            return false;
        };
        self.buffer.replace_range(start..end, "");
        self.caret = start;
        self.anchor = None;
        true
    }

    fn prev_boundary(&self, pos: usize) -> usize {
        self.buffer[..pos]
            .chars()
            .next_back()
            .map(|c| pos - c.len_utf8())
            .unwrap_or(0)
    }

    fn next_boundary(&self, pos: usize) -> usize {
        self.buffer[pos..]
            .chars()
            .next()
            .map(|c| pos + c.len_utf8())
            .unwrap_or(pos)
    }

    /// Byte offset of the start of every line.
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, c) in self.buffer.char_indices() {
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    /// Byte offset just past the last character of a line (before its
    /// newline, if any).
    fn line_end(&self, line: usize) -> usize {
        let starts = self.line_starts();
        if line + 1 < starts.len() {
            starts[line + 1] - 1
        } else {
            self.buffer.len()
        }
    }

    /// The caret's (line index, character column).
    fn line_col(&self) -> (usize, usize) {
        let starts = self.line_starts();
        let line = starts
            .iter()
            .rposition(|&start| start <= self.caret)
            .unwrap_or(0);
        let col = self.buffer[starts[line]..self.caret].chars().count();
        (line, col)
    }

    /// Byte offset of a character column on a line, clamped to the
    /// line's length.
    fn offset_at(&self, line: usize, col: usize) -> usize {
        let start = self.line_starts()[line];
        let end = self.line_end(line);
        let mut offset = start;
        for ch in self.buffer[start..end].chars().take(col) {
            offset += ch.len_utf8();
        }
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> TextEditor {
        TextEditor::new(Point::new(0.0, 0.0), Rgba::black(), FontSpec::default())
    }

    fn editor_with(content: &str) -> TextEditor {
        TextEditor::with_content(
            Point::new(0.0, 0.0),
            content.to_string(),
            Rgba::black(),
            FontSpec::default(),
        )
    }

    #[test]
    fn test_typing() {
        let mut ed = editor();
        for c in "hi".chars() {
            ed.insert(&c.to_string());
        }
        ed.insert("\n");
        for c in "there".chars() {
            ed.insert(&c.to_string());
        }
        assert_eq!(ed.buffer(), "hi\nthere");
        assert_eq!(ed.caret(), 8);
    }

    #[test]
    fn test_backspace() {
        let mut ed = editor_with("abc");
        ed.backspace();
        assert_eq!(ed.buffer(), "ab");
        ed.backspace();
        ed.backspace();
        ed.backspace(); // no-op at the start
        assert_eq!(ed.buffer(), "");
        assert_eq!(ed.caret(), 0);
    }

    #[test]
    fn test_delete_forward() {
        let mut ed = editor_with("abc");
        ed.move_left(false);
        ed.delete_forward();
        assert_eq!(ed.buffer(), "ab");
        ed.delete_forward(); // no-op at the end
        assert_eq!(ed.buffer(), "ab");
    }

    #[test]
    fn test_caret_moves_by_code_point() {
        let mut ed = editor_with("aä");
        assert_eq!(ed.caret(), 3); // 'ä' is two bytes
        ed.move_left(false);
        assert_eq!(ed.caret(), 1);
        ed.move_left(false);
        assert_eq!(ed.caret(), 0);
        ed.move_right(false);
        assert_eq!(ed.caret(), 1);
    }

    #[test]
    fn test_shift_selection_and_copy() {
        let mut ed = editor_with("hello");
        ed.move_left(true);
        ed.move_left(true);
        assert_eq!(ed.selection(), Some((3, 5)));
        assert_eq!(ed.selected_text(), "lo");

        // Plain motion collapses to the selection edge
        ed.move_left(false);
        assert_eq!(ed.selection(), None);
        assert_eq!(ed.caret(), 3);
        assert_eq!(ed.selected_text(), "");
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut ed = editor_with("hello");
        ed.select_all();
        ed.insert("x");
        assert_eq!(ed.buffer(), "x");
        assert_eq!(ed.caret(), 1);
    }

    #[test]
    fn test_backspace_removes_selection() {
        let mut ed = editor_with("hello");
        ed.move_left(true);
        ed.move_left(true);
        ed.backspace();
        assert_eq!(ed.buffer(), "hel");
        assert_eq!(ed.caret(), 3);
    }

    #[test]
    fn test_paste_over_selection() {
        let mut ed = editor_with("hello world");
        ed.select_all();
        ed.paste("bye");
        assert_eq!(ed.buffer(), "bye");
    }

    #[test]
    fn test_up_down_clamps_column() {
        let mut ed = editor_with("hello\nhi\nworld");
        // Caret at the end of "world" (col 5)
        ed.move_up(false);
        // "hi" only has 2 chars; clamped to its end
        assert_eq!(ed.caret(), 8);
        ed.move_up(false);
        // Column 2 is preserved from the clamped position
        assert_eq!(ed.caret(), 2);
        ed.move_up(false);
        // First line: caret goes to the start
        assert_eq!(ed.caret(), 0);
    }

    #[test]
    fn test_down_from_last_line_goes_to_end() {
        let mut ed = editor_with("ab\ncd");
        ed.move_down(false);
        assert_eq!(ed.caret(), ed.buffer().len());
    }

    #[test]
    fn test_line_start_end() {
        let mut ed = editor_with("ab\ncdef");
        ed.move_line_start(false);
        assert_eq!(ed.caret(), 3);
        ed.move_line_end(false);
        assert_eq!(ed.caret(), 7);
    }

    #[test]
    fn test_click_places_caret() {
        // Monospace 10pt: advance 6, line height 12, ascent 8.
        let font = FontSpec {
            family: crate::shapes::FontFamily::Monospace,
            size: 10.0,
            style: crate::shapes::FontStyle::Regular,
        };
        let mut ed =
            TextEditor::with_content(Point::new(0.0, 0.0), "ab\ncd".to_string(), Rgba::black(), font);

        // On the first line, between 'a' and 'b'
        ed.click(Point::new(7.0, 0.0), false);
        assert_eq!(ed.caret(), 1);

        // Left edge of the second line
        ed.click(Point::new(0.0, 12.0), false);
        assert_eq!(ed.caret(), 3);

        // Far beyond the text clamps to the last line's end
        ed.click(Point::new(500.0, 500.0), false);
        assert_eq!(ed.caret(), 5);
    }

    #[test]
    fn test_commit_materializes_shape() {
        let mut ed = TextEditor::new(Point::new(5.0, 5.0), Rgba::black(), FontSpec::default());
        ed.insert("hi\nthere");
        let text = ed.commit().expect("non-empty buffer commits");
        assert_eq!(text.content, "hi\nthere");
        assert_eq!(text.origin, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_commit_empty_is_none() {
        assert!(editor().commit().is_none());
    }

    #[test]
    fn test_bounds_track_buffer() {
        let mut ed = editor();
        let empty = ed.bounds();
        ed.insert("a long line of text here");
        ed.insert("\nsecond");
        let grown = ed.bounds();
        assert!(grown.width() > empty.width());
        assert!(grown.height() > empty.height());
    }
}
