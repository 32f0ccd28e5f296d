use std::fmt;

use crate::domain::{DateWindow, Transaction, TransactionType};

/// Which screen the shell is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Form,
    Report,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Form => f.write_str("form"),
            View::Report => f.write_str("report"),
        }
    }
}

/// Screen state for the shell: the entry form and the report filters.
///
/// `editing` switches the form from create to update; while it is set the form type is
/// pinned to the edited entry's type.
#[derive(Debug, Clone)]
pub struct ShellState {
    pub view: View,
    form_type: TransactionType,
    editing: Option<Transaction>,
    pub window: DateWindow,
    search: Option<String>,
}

impl ShellState {
    pub fn new(window: DateWindow) -> Self {
        Self {
            view: View::Form,
            form_type: TransactionType::Receipt,
            editing: None,
            window,
            search: None,
        }
    }

    pub fn form_type(&self) -> TransactionType {
        self.form_type
    }

    /// Rejected while an entry is being edited.
    pub fn set_form_type(&mut self, kind: TransactionType) -> Result<(), String> {
        if let Some(editing) = &self.editing {
            if editing.kind != kind {
                return Err(format!(
                    "cannot change the type of an existing {} entry",
                    editing.kind
                ));
            }
        }
        self.form_type = kind;
        Ok(())
    }

    pub fn editing(&self) -> Option<&Transaction> {
        self.editing.as_ref()
    }

    pub fn begin_edit(&mut self, txn: Transaction) {
        self.form_type = txn.kind;
        self.editing = Some(txn);
        self.view = View::Form;
    }

    pub fn finish_edit(&mut self) -> Option<Transaction> {
        self.editing.take()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn set_search(&mut self, query: &str) {
        let trimmed = query.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    pub fn prompt_label(&self) -> String {
        match (self.view, &self.editing) {
            (View::Form, Some(txn)) => format!("form:edit {}", txn.short_id()),
            (View::Form, None) => format!("form:{}", self.form_type.to_string().to_lowercase()),
            (View::Report, _) => "report".into(),
        }
    }
}
