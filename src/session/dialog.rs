//! Modal dialog contract.
//!
//! The gate describes a dialog (title, message, inputs, buttons) and the host
//! renders it. When the user presses a button, the host calls that action's
//! callback with the collected input values and a control for closing the
//! dialog or showing an inline error. Dismissing a dialog any other way
//! (Escape, clicking outside) must run the `Cancel` action.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Password,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogField {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionRole {
    Primary,
    Cancel,
}

/// Host-side handle to an open dialog.
pub trait DialogControl: Send + Sync {
    fn close(&self);
    /// Show `message` inline, below the inputs.
    fn show_error(&self, message: &str);
}

pub type ActionCallback = Arc<dyn Fn(&DialogValues, &dyn DialogControl) + Send + Sync>;

#[derive(Clone)]
pub struct DialogAction {
    pub id: String,
    pub label: String,
    pub role: ActionRole,
    pub on_press: ActionCallback,
}

impl fmt::Debug for DialogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Values typed into a dialog, keyed by field id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogValues(HashMap<String, String>);

impl DialogValues {
    /// Value of field `id`, empty when the field was left blank or is unknown.
    pub fn get(&self, id: &str) -> &str {
        self.0.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(id.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DialogValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Clone, Debug)]
pub struct DialogSpec {
    pub title: String,
    pub message: String,
    pub fields: Vec<DialogField>,
    pub actions: Vec<DialogAction>,
}

impl DialogSpec {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            fields: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn password_field(mut self, id: &str, label: &str) -> Self {
        self.fields.push(DialogField {
            id: id.to_string(),
            label: label.to_string(),
            kind: FieldKind::Password,
        });
        self
    }

    pub fn action<F>(mut self, id: &str, label: &str, role: ActionRole, on_press: F) -> Self
    where
        F: Fn(&DialogValues, &dyn DialogControl) + Send + Sync + 'static,
    {
        self.actions.push(DialogAction {
            id: id.to_string(),
            label: label.to_string(),
            role,
            on_press: Arc::new(on_press),
        });
        self
    }

    pub fn find_action(&self, id: &str) -> Option<&DialogAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Action to run when the dialog is dismissed without a button.
    pub fn cancel_action(&self) -> Option<&DialogAction> {
        self.actions.iter().find(|a| a.role == ActionRole::Cancel)
    }
}

/// Renders modal dialogs on behalf of the gate.
pub trait DialogPresenter: Send + Sync {
    fn present(&self, dialog: DialogSpec);
}
