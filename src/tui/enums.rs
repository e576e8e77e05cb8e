//! Enumerations for TUI state management.

/// Which part of the screen receives key presses.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Focus {
    #[default]
    TaskList,
    /// Entry form above the list.
    AddForm,
    Search,
    Drawer,
    /// Inline edit popup for one task.
    EditForm,
    Help,
}

impl Focus {
    /// Hint shown in the status bar when no notification is up.
    pub fn hint(self) -> &'static str {
        match self {
            Focus::TaskList => {
                "a add | / search | m menu | s sort | t theme | space done | enter expand | e edit | d delete | ? help"
            }
            Focus::AddForm => "Tab next field | ←/→ change option | Enter add | Esc back",
            Focus::Search => "Type to search | Enter keep | Esc clear",
            Focus::Drawer => "↑/↓ choose | Enter apply | Esc close",
            Focus::EditForm => "Tab next field | ←/→ change option | Enter save | Esc cancel",
            Focus::Help => "Esc close help",
        }
    }
}
