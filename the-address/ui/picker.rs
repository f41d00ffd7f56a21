//! The four address picker fields and the widget that composes them.
//!
//! Each field is a `Closed`/`Open` state machine over a shared open token.
//! Candidate lists are derived on demand from the store and the current
//! selection, so there is no copy to go stale when an ancestor changes.

use std::sync::Arc;

use crate::{
  config::AddressConfig,
  hierarchy::HierarchyStore,
  selection::{
    AddressSelection,
    SelectionController,
  },
  ui::{
    Event,
    EventResult,
    Key,
    PickerId,
    Rect,
    overlay::Overlay,
    positioning::{
      self,
      PanelAnchor,
    },
  },
};

/// One row in an open candidate panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateRow {
  /// Primary text; what gets committed on selection.
  pub label:  String,
  /// Disambiguating context. Postal candidates show their ancestor chain.
  pub detail: Option<String>,
}

impl CandidateRow {
  fn plain(label: &str) -> Self {
    Self {
      label:  label.to_string(),
      detail: None,
    }
  }
}

/// Per-field interactive state. The postal field's query lives in the
/// controller (it is the pending zipcode text); the other three keep a
/// picker-local query that never touches the selection.
#[derive(Debug, Default)]
struct PickerField {
  query:     String,
  highlight: usize,
  trigger:   Rect,
}

/// The composed widget: four picker fields, one controller, one open token.
pub struct AddressWidget {
  store:      Arc<HierarchyStore>,
  controller: SelectionController,
  config:     AddressConfig,
  overlay:    Overlay,
  fields:     [PickerField; 4],
  viewport:   (f32, f32),
}

impl AddressWidget {
  pub fn new(store: Arc<HierarchyStore>, config: AddressConfig) -> Self {
    let controller = SelectionController::new(store.clone(), config.clone());
    Self {
      store,
      controller,
      config,
      overlay: Overlay::new(),
      fields: Default::default(),
      viewport: (0.0, 0.0),
    }
  }

  /// Seed from a previously stored address. Stale values degrade to empty
  /// candidate lists rather than failing.
  pub fn with_selection(
    store: Arc<HierarchyStore>,
    config: AddressConfig,
    seed: AddressSelection,
  ) -> Self {
    let controller = SelectionController::with_selection(store.clone(), config.clone(), seed);
    Self {
      store,
      controller,
      config,
      overlay: Overlay::new(),
      fields: Default::default(),
      viewport: (0.0, 0.0),
    }
  }

  /// Observer for committed mutations; never fired on keystrokes.
  pub fn set_on_change(&mut self, listener: impl Fn(&AddressSelection) + 'static) {
    self.controller.set_on_change(listener);
  }

  pub fn selection(&self) -> &AddressSelection {
    self.controller.selection()
  }

  /// Explicit reset of the whole widget.
  pub fn clear(&mut self) {
    self.overlay.close();
    self.controller.clear();
  }

  pub fn set_viewport(&mut self, width: f32, height: f32) {
    self.viewport = (width, height);
  }

  /// Trigger geometry for a field, fed by the host's layout pass.
  pub fn set_trigger(&mut self, id: PickerId, rect: Rect) {
    self.fields[id as usize].trigger = rect;
  }

  /// Open `id`'s panel, closing any sibling panel first. The anchor is
  /// computed once, from the trigger rectangle as it is right now.
  pub fn open(&mut self, id: PickerId) {
    if id != PickerId::PostalCode {
      self.fields[id as usize].query.clear();
    }
    self.fields[id as usize].highlight = 0;

    let rows = self.candidate_rows(id).len();
    let trigger = self.fields[id as usize].trigger;
    let estimated = self.estimated_panel_height(rows);
    let anchor = positioning::compute_anchor(trigger, self.viewport.1, estimated);
    self.overlay.open(id, anchor);
    log::debug!("opened {id:?} panel with {rows} candidates");
  }

  pub fn close(&mut self) {
    self.overlay.close();
  }

  /// The open picker, if any. This is the one shared token.
  pub fn open_picker(&self) -> Option<PickerId> {
    self.overlay.open_id()
  }

  /// Anchor of the open panel.
  pub fn panel_anchor(&self) -> Option<PanelAnchor> {
    self.overlay.anchor()
  }

  /// Text a field should display in its query box.
  pub fn query(&self, id: PickerId) -> &str {
    match id {
      PickerId::PostalCode => self.controller.postal_display(),
      _ => &self.fields[id as usize].query,
    }
  }

  /// Highlighted row of the open panel.
  pub fn highlight(&self) -> usize {
    match self.overlay.open_id() {
      Some(id) => self.fields[id as usize].highlight,
      None => 0,
    }
  }

  /// Candidate rows for the open panel. Empty while everything is closed.
  pub fn candidates(&self) -> Vec<CandidateRow> {
    match self.overlay.open_id() {
      Some(id) => self.candidate_rows(id),
      None => Vec::new(),
    }
  }

  pub fn handle_event(&mut self, event: &Event) -> EventResult {
    match event {
      Event::MouseDown { x, y } => self.handle_mouse_down(*x, *y),
      Event::Key(key) => self.handle_key(*key),
    }
  }

  fn handle_mouse_down(&mut self, x: f32, y: f32) -> EventResult {
    if !self.overlay.wants_dismiss_events() {
      return EventResult::Ignored;
    }
    let inside_panel = self
      .overlay
      .anchor()
      .is_some_and(|anchor| anchor.rect().contains(x, y));
    let inside_trigger = self
      .overlay
      .open_id()
      .is_some_and(|id| self.fields[id as usize].trigger.contains(x, y));
    if inside_panel || inside_trigger {
      // Row hit-testing stays with the host; it commits via open()/Enter.
      return EventResult::Ignored;
    }
    self.overlay.close();
    EventResult::Consumed
  }

  fn handle_key(&mut self, key: Key) -> EventResult {
    let Some(id) = self.overlay.open_id() else {
      return EventResult::Ignored;
    };
    match key {
      Key::Escape => {
        self.overlay.close();
      },
      Key::Up => {
        let field = &mut self.fields[id as usize];
        field.highlight = field.highlight.saturating_sub(1);
      },
      Key::Down => {
        let len = self.candidate_rows(id).len();
        let field = &mut self.fields[id as usize];
        if len > 0 {
          field.highlight = (field.highlight + 1).min(len - 1);
        }
      },
      Key::Enter => {
        self.commit_highlighted(id);
      },
      Key::Char(c) => {
        self.edit_query(id, Some(c));
      },
      Key::Backspace => {
        self.edit_query(id, None);
      },
    }
    EventResult::Consumed
  }

  fn edit_query(&mut self, id: PickerId, c: Option<char>) {
    if id == PickerId::PostalCode {
      let mut text = self.controller.postal_display().to_string();
      match c {
        Some(c) => text.push(c),
        None => {
          text.pop();
        },
      }
      let resolved = self.controller.set_zipcode(&text);
      if resolved {
        // Unique full-length match: the field is complete, nothing left to
        // pick from.
        self.overlay.close();
        return;
      }
    } else {
      let field = &mut self.fields[id as usize];
      match c {
        Some(c) => field.query.push(c),
        None => {
          field.query.pop();
        },
      }
    }
    self.fields[id as usize].highlight = 0;
  }

  fn commit_highlighted(&mut self, id: PickerId) {
    let rows = self.candidate_rows(id);
    let highlight = self.fields[id as usize].highlight;
    let Some(row) = rows.get(highlight) else {
      // Empty panel: Enter does nothing, the panel stays for more typing.
      return;
    };
    match id {
      PickerId::Province => self.controller.set_province(&row.label),
      PickerId::District => self.controller.set_district(&row.label),
      PickerId::Subdistrict => self.controller.set_subdistrict(&row.label),
      PickerId::PostalCode => {
        self.controller.commit_postal_candidate(highlight);
      },
    }
    self.overlay.close();
  }

  fn candidate_rows(&self, id: PickerId) -> Vec<CandidateRow> {
    let selection = self.controller.selection();
    match id {
      PickerId::Province => {
        self
          .store
          .search_provinces(&self.fields[id as usize].query)
          .into_iter()
          .map(|province| CandidateRow::plain(&province.name))
          .collect()
      },
      PickerId::District => {
        // An unset or stale province cannot scope anything: empty list.
        let Some(province) = self.store.province_by_name(&selection.province) else {
          return Vec::new();
        };
        self
          .store
          .search_districts(&self.fields[id as usize].query, Some(province.id))
          .into_iter()
          .map(|district| CandidateRow::plain(&district.name))
          .collect()
      },
      PickerId::Subdistrict => {
        let district = self
          .store
          .province_by_name(&selection.province)
          .and_then(|province| self.store.district_by_name(province.id, &selection.district));
        let Some(district) = district else {
          return Vec::new();
        };
        self
          .store
          .search_subdistricts(&self.fields[id as usize].query, Some(district.id))
          .into_iter()
          .map(|subdistrict| CandidateRow::plain(&subdistrict.name))
          .collect()
      },
      PickerId::PostalCode => {
        self
          .controller
          .postal_candidates()
          .iter()
          .map(|candidate| {
            CandidateRow {
              label:  candidate.subdistrict.name.clone(),
              detail: Some(format!(
                "{} ({}, {})",
                candidate.subdistrict.zipcode, candidate.district.name, candidate.province.name
              )),
            }
          })
          .collect()
      },
    }
  }

  fn estimated_panel_height(&self, rows: usize) -> f32 {
    let visible = rows.clamp(1, self.config.max_visible_rows as usize);
    visible as f32 * self.config.row_height
  }
}
