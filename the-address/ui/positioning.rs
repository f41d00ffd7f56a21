//! Anchored, viewport-aware placement for candidate panels.
//!
//! Placement is a pure function of the trigger rectangle, the viewport
//! height, and the estimated panel height. It is computed once per open
//! event and not recomputed on scroll.

use crate::ui::Rect;

/// Gap between the trigger edge and the panel.
const TRIGGER_PANEL_MARGIN: f32 = 4.0;

/// Minimum useful panel height. With less space than this on both sides the
/// panel is pinned rather than shrunk into unusability.
const MIN_PANEL_HEIGHT: f32 = 28.0;

/// Which trigger edge the panel hangs off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelEdge {
  /// Panel opens above the trigger (flipped).
  Top,
  /// Panel opens below the trigger (default).
  Bottom,
}

/// Resolved placement for one open event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelAnchor {
  pub edge:   PanelEdge,
  pub left:   f32,
  pub top:    f32,
  pub width:  f32,
  pub height: f32,
}

impl PanelAnchor {
  pub fn rect(&self) -> Rect {
    Rect {
      x:      self.left,
      y:      self.top,
      width:  self.width,
      height: self.height,
    }
  }
}

/// Free space above and below the trigger.
pub fn available_space(trigger: Rect, viewport_height: f32) -> (f32, f32) {
  let above = (trigger.y - TRIGGER_PANEL_MARGIN).max(0.0);
  let below = (viewport_height - trigger.bottom() - TRIGGER_PANEL_MARGIN).max(0.0);
  (above, below)
}

/// Compute the anchor for a panel opening off `trigger`. Opens below by
/// default; flips above when the panel does not fit below and more space
/// exists above. Height is constrained to the chosen side.
pub fn compute_anchor(trigger: Rect, viewport_height: f32, estimated_height: f32) -> PanelAnchor {
  let (above, below) = available_space(trigger, viewport_height);
  let open_below = estimated_height <= below || below >= above;

  let space = if open_below { below } else { above };
  let height = estimated_height.min(space).max(MIN_PANEL_HEIGHT);
  let top = if open_below {
    trigger.bottom() + TRIGGER_PANEL_MARGIN
  } else {
    (trigger.y - TRIGGER_PANEL_MARGIN - height).max(0.0)
  };

  PanelAnchor {
    edge: if open_below {
      PanelEdge::Bottom
    } else {
      PanelEdge::Top
    },
    left: trigger.x.max(0.0),
    top,
    width: trigger.width,
    height,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn trigger(y: f32, height: f32) -> Rect {
    Rect {
      x: 40.0,
      y,
      width: 240.0,
      height,
    }
  }

  #[test]
  fn opens_below_by_default() {
    let anchor = compute_anchor(trigger(100.0, 32.0), 600.0, 200.0);
    assert_eq!(anchor.edge, PanelEdge::Bottom);
    assert_eq!(anchor.top, 136.0);
    assert_eq!(anchor.left, 40.0);
    assert_eq!(anchor.width, 240.0);
    assert_eq!(anchor.height, 200.0);
  }

  #[test]
  fn flips_above_when_below_is_tight() {
    // Trigger near the bottom: 568..600 leaves no room below.
    let anchor = compute_anchor(trigger(540.0, 32.0), 600.0, 200.0);
    assert_eq!(anchor.edge, PanelEdge::Top);
    assert!(anchor.top + anchor.height <= 540.0);
    assert_eq!(anchor.height, 200.0);
  }

  #[test]
  fn stays_below_when_above_is_even_tighter() {
    // Cramped viewport: neither side fits, below has more room.
    let anchor = compute_anchor(trigger(20.0, 32.0), 160.0, 200.0);
    assert_eq!(anchor.edge, PanelEdge::Bottom);
    assert!(anchor.height < 200.0);
  }

  #[test]
  fn height_is_constrained_to_chosen_side() {
    // 100..132 leaves 464 below; the 500-tall estimate gets clamped to it.
    let anchor = compute_anchor(trigger(100.0, 32.0), 600.0, 500.0);
    assert_eq!(anchor.edge, PanelEdge::Bottom);
    assert!((anchor.height - 464.0).abs() < f32::EPSILON);
  }

  #[test]
  fn degenerate_space_pins_to_minimum_height() {
    let anchor = compute_anchor(trigger(0.0, 32.0), 30.0, 200.0);
    assert!(anchor.height >= MIN_PANEL_HEIGHT);
    assert!(anchor.top >= 0.0);
  }
}
