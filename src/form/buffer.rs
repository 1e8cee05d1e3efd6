use ropey::Rope;
use unicode_width::UnicodeWidthStr;

/// Edit buffer for a single field value.
///
/// Backed by a rope so long values (notes, free-text columns) stay cheap to
/// edit. The cursor is a char index into the value.
pub struct FieldBuffer {
    rope: Rope,
    cursor: usize,
    dirty: bool,
}

impl FieldBuffer {
    /// Create a buffer seeded with `text`, cursor at the end.
    pub fn from_text(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let cursor = rope.len_chars();
        Self {
            rope,
            cursor,
            dirty: false,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Cursor position as a char index.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the value changed since the buffer was seeded or last marked clean.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The full value.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text before and after the cursor.
    pub fn split_at_cursor(&self) -> (String, String) {
        (
            self.rope.slice(..self.cursor).to_string(),
            self.rope.slice(self.cursor..).to_string(),
        )
    }

    /// Terminal columns occupied by the text before the cursor.
    pub fn cursor_display_col(&self) -> usize {
        self.rope.slice(..self.cursor).to_string().width()
    }

    /// Replace the whole value, moving the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = self.rope.len_chars();
        self.dirty = true;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.rope.insert_char(self.cursor, ch);
        self.cursor += 1;
        self.dirty = true;
    }

    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.rope.insert(self.cursor, s);
        self.cursor += s.chars().count();
        self.dirty = true;
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.rope.remove(self.cursor - 1..self.cursor);
        self.cursor -= 1;
        self.dirty = true;
        true
    }

    /// Delete the character at the cursor (Delete).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(self.cursor..=self.cursor);
        self.dirty = true;
        true
    }

    /// Clear the value (Ctrl+U).
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        self.rope = Rope::new();
        self.cursor = 0;
        self.dirty = true;
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.rope.len_chars() {
            self.cursor += 1;
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.rope.len_chars();
    }

    /// Move to the start of the previous word (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        let chars: Vec<char> = self.rope.slice(..self.cursor).chars().collect();
        let mut idx = chars.len();
        while idx > 0 && !is_word_char(chars[idx - 1]) {
            idx -= 1;
        }
        while idx > 0 && is_word_char(chars[idx - 1]) {
            idx -= 1;
        }
        self.cursor = idx;
    }

    /// Move past the current word and the separators after it (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let len = self.rope.len_chars();
        let mut idx = self.cursor;
        while idx < len && is_word_char(self.rope.char(idx)) {
            idx += 1;
        }
        while idx < len && !is_word_char(self.rope.char(idx)) {
            idx += 1;
        }
        self.cursor = idx;
    }

    /// Move the cursor to a char index, clamped to the value length.
    pub fn move_to(&mut self, idx: usize) {
        self.cursor = idx.min(self.rope.len_chars());
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Default for FieldBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for FieldBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBuffer")
            .field("text", &self.rope.to_string())
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_buffer_is_clean_with_cursor_at_end() {
        let buf = FieldBuffer::from_text("2001");
        assert_eq!(buf.text(), "2001");
        assert_eq!(buf.cursor(), 4);
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_insert_and_delete_back() {
        let mut buf = FieldBuffer::from_text("200");
        buf.insert_char('1');
        assert_eq!(buf.text(), "2001");
        assert!(buf.is_dirty());
        assert!(buf.delete_back());
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "20");
    }

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = FieldBuffer::from_text("ab");
        buf.move_home();
        assert!(!buf.delete_back());
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_delete_forward() {
        let mut buf = FieldBuffer::from_text("abc");
        buf.move_to(1);
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "ac");
        buf.move_end();
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_insert_in_middle() {
        let mut buf = FieldBuffer::from_text("ac");
        buf.move_to(1);
        buf.insert_char('b');
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn test_multibyte_chars_move_by_char() {
        let mut buf = FieldBuffer::from_text("héllo");
        buf.move_to(2);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "hllo");
        buf.move_right();
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn test_cursor_display_col_counts_wide_chars() {
        let mut buf = FieldBuffer::from_text("日本x");
        buf.move_to(2);
        assert_eq!(buf.cursor_display_col(), 4);
    }

    #[test]
    fn test_word_movement() {
        let mut buf = FieldBuffer::from_text("deep learning, survey");
        buf.move_word_left();
        assert_eq!(buf.cursor(), 15);
        buf.move_word_left();
        assert_eq!(buf.cursor(), 5);
        buf.move_word_right();
        assert_eq!(buf.cursor(), 15);
    }

    #[test]
    fn test_clear_and_set_text() {
        let mut buf = FieldBuffer::from_text("old");
        buf.clear();
        assert!(buf.is_empty());
        assert!(buf.is_dirty());
        buf.mark_clean();
        buf.set_text("new");
        assert_eq!(buf.text(), "new");
        assert_eq!(buf.cursor(), 3);
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_split_at_cursor() {
        let mut buf = FieldBuffer::from_text("ICSE");
        buf.move_to(2);
        assert_eq!(buf.split_at_cursor(), ("IC".to_string(), "SE".to_string()));
    }
}
