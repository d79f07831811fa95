//! State of the add/edit investment form.
use crate::core::record::{InvestmentFields, InvestmentId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Adding,
    Editing(InvestmentId),
}

/// The investment form and the mode it was opened in.
#[derive(Debug, Clone)]
pub struct Modal {
    state: ModalState,
    form: InvestmentFields,
}

impl Default for Modal {
    fn default() -> Self {
        Modal {
            state: ModalState::Closed,
            form: InvestmentFields::default(),
        }
    }
}

impl Modal {
    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn form(&self) -> &InvestmentFields {
        &self.form
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn title(&self) -> Option<&'static str> {
        match self.state {
            ModalState::Closed => None,
            ModalState::Adding => Some("Add New Investment"),
            ModalState::Editing(_) => Some("Edit Investment"),
        }
    }

    /// Opens the form empty, for a new record.
    pub fn open_add(&mut self) {
        self.state = ModalState::Adding;
        self.form = InvestmentFields::default();
    }

    /// Opens the form pre-filled from an existing record.
    pub fn open_edit(&mut self, id: InvestmentId, current: InvestmentFields) {
        self.state = ModalState::Editing(id);
        self.form = current;
    }

    /// Closes the form and resets its fields.
    pub fn close(&mut self) {
        self.state = ModalState::Closed;
        self.form = InvestmentFields::default();
    }
}
