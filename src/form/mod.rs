//! Edit form for the record under the cursor.
//!
//! The form holds one [`FieldBuffer`] per editable field, keyed directly by
//! field name. It is seeded from the session whenever the displayed record,
//! the table or the editable set changes, and it is the only source of the
//! values handed to [`Session::submit`].

mod buffer;

pub use buffer::FieldBuffer;

use std::collections::HashMap;

use crate::session::Session;

/// One editable input.
#[derive(Debug)]
pub struct FormField {
    pub name: String,
    pub buffer: FieldBuffer,
}

/// Edit buffers for the currently displayed record.
#[derive(Debug, Default)]
pub struct EditForm {
    record: usize,
    fields: Vec<FormField>,
    focus: usize,
}

impl EditForm {
    /// Build a form for the session's current record and editable set.
    pub fn seed(session: &Session) -> Self {
        let record = session.current_record();
        let fields = session
            .editable_fields()
            .iter()
            .map(|name| FormField {
                name: name.clone(),
                buffer: FieldBuffer::from_text(
                    record.and_then(|r| r.get(name)).unwrap_or_default(),
                ),
            })
            .collect();
        Self {
            record: session.cursor(),
            fields,
            focus: 0,
        }
    }

    /// Rebuild after the editable set changed on the same record.
    ///
    /// Buffers of fields that stay selected keep their pending edits;
    /// buffers of deselected fields are dropped.
    pub fn reseed_keeping_edits(&mut self, session: &Session) {
        let mut next = Self::seed(session);
        if next.record == self.record {
            let focused = self.focused_name().map(str::to_owned);
            for field in &mut next.fields {
                if let Some(old) = self.fields.iter_mut().find(|f| f.name == field.name)
                    && old.buffer.is_dirty()
                {
                    std::mem::swap(&mut field.buffer, &mut old.buffer);
                }
            }
            if let Some(name) = focused {
                next.focus_field(&name);
            }
        }
        *self = next;
    }

    /// The 1-based record this form was seeded from.
    pub const fn record(&self) -> usize {
        self.record
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Buffer for a field by name.
    pub fn buffer(&self, name: &str) -> Option<&FieldBuffer> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.buffer)
    }

    pub fn buffer_mut(&mut self, name: &str) -> Option<&mut FieldBuffer> {
        self.fields
            .iter_mut()
            .find(|f| f.name == name)
            .map(|f| &mut f.buffer)
    }

    /// Index of the focused input.
    pub const fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_name(&self) -> Option<&str> {
        self.fields.get(self.focus).map(|f| f.name.as_str())
    }

    pub fn focused_buffer_mut(&mut self) -> Option<&mut FieldBuffer> {
        self.fields.get_mut(self.focus).map(|f| &mut f.buffer)
    }

    /// Move focus to the next input, wrapping.
    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    /// Move focus to the previous input, wrapping.
    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = self
                .focus
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    /// Focus an input by index; out-of-range indices are ignored.
    pub fn focus_index(&mut self, idx: usize) {
        if idx < self.fields.len() {
            self.focus = idx;
        }
    }

    /// Focus an input by field name. Returns false if there is no such input.
    pub fn focus_field(&mut self, name: &str) -> bool {
        match self.fields.iter().position(|f| f.name == name) {
            Some(idx) => {
                self.focus = idx;
                true
            }
            None => false,
        }
    }

    /// Whether any buffer differs from the value it was seeded with.
    pub fn is_dirty(&self) -> bool {
        self.fields.iter().any(|f| f.buffer.is_dirty())
    }

    /// Current buffer values keyed by field name, ready for submit.
    pub fn values(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.buffer.text()))
            .collect()
    }

    /// Mark every buffer clean after a successful submit.
    pub fn mark_saved(&mut self) {
        for field in &mut self.fields {
            field.buffer.mark_clean();
        }
    }
}
