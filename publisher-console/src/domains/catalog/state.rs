//! Snapshot of one paginated entity screen.

use publisher_model::{DEFAULT_PAGE_SIZE, PageQuery, SortDirection};

use crate::domains::catalog::kind::EntityKind;

/// Which form the dialog is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open(DialogMode),
}

/// Everything a screen renders. Owned by its controller; callers only ever
/// see clones.
#[derive(Debug, Clone)]
pub struct ControllerState<K: EntityKind> {
    pub items: Vec<K::Item>,
    /// Zero-based page index of the last requested load
    pub page: u32,
    pub page_size: u32,
    pub total_records: u64,
    pub total_pages: u32,
    pub sort: SortDirection,
    pub loading: bool,
    pub dialog: DialogState,
    /// Edit mode; implies `selected` is set
    pub editing: bool,
    pub selected: Option<K::Item>,
    pub pending_delete: Option<K::Item>,
    pub draft: K::Draft,
    pub saving: bool,
    pub deleting: bool,
    pub last_error: Option<String>,
}

impl<K: EntityKind> Default for ControllerState<K> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            total_records: 0,
            total_pages: 0,
            sort: SortDirection::default(),
            loading: false,
            dialog: DialogState::Closed,
            editing: false,
            selected: None,
            pending_delete: None,
            draft: K::Draft::default(),
            saving: false,
            deleting: false,
            last_error: None,
        }
    }
}

impl<K: EntityKind> ControllerState<K> {
    pub fn with_query(query: PageQuery) -> Self {
        Self {
            page: query.page,
            page_size: query.size,
            sort: query.sort,
            ..Self::default()
        }
    }

    /// Cursor the next reload will use
    pub fn query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            size: self.page_size,
            sort: self.sort,
        }
    }

    pub fn dialog_open(&self) -> bool {
        matches!(self.dialog, DialogState::Open(_))
    }

    pub fn confirmation_visible(&self) -> bool {
        self.pending_delete.is_some()
    }

    pub(crate) fn close_dialog(&mut self) {
        self.dialog = DialogState::Closed;
        self.editing = false;
        self.selected = None;
        self.draft = K::Draft::default();
    }
}
