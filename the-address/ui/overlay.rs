//! The single-open-panel invariant.
//!
//! One shared token identifies the open picker, or none. Opening a picker
//! replaces the token, which closes the previous panel as part of the same
//! transition; four independent booleans cannot drift out of sync because
//! they do not exist.

use crate::ui::{
  PickerId,
  positioning::PanelAnchor,
};

#[derive(Clone, Copy, Debug)]
struct OpenPanel {
  id:     PickerId,
  anchor: PanelAnchor,
}

/// Owns the shared open-panel token.
#[derive(Debug, Default)]
pub struct Overlay {
  open: Option<OpenPanel>,
}

impl Overlay {
  pub fn new() -> Self {
    Self::default()
  }

  /// Open `id`'s panel at `anchor`. Any sibling panel is closed first.
  pub fn open(&mut self, id: PickerId, anchor: PanelAnchor) {
    if let Some(previous) = self.open.take() {
      if previous.id != id {
        log::debug!("closing {:?} panel before opening {:?}", previous.id, id);
      }
    }
    self.open = Some(OpenPanel { id, anchor });
  }

  pub fn close(&mut self) {
    self.open = None;
  }

  /// Which picker's panel is open, if any.
  pub fn open_id(&self) -> Option<PickerId> {
    self.open.map(|panel| panel.id)
  }

  pub fn is_open(&self, id: PickerId) -> bool {
    self.open_id() == Some(id)
  }

  /// Anchor of the open panel.
  pub fn anchor(&self) -> Option<PanelAnchor> {
    self.open.map(|panel| panel.anchor)
  }

  /// Outside-interaction events are only routed while a panel is open: the
  /// headless equivalent of registering the dismiss listener on open and
  /// tearing it down on close.
  pub fn wants_dismiss_events(&self) -> bool {
    self.open.is_some()
  }
}
