//! Selection state and the transitions that keep it consistent.
//!
//! All mutation goes through [`SelectionController`]. Every operation either
//! leaves the state untouched or commits a fully consistent tuple and then
//! notifies exactly once, so observers never see a partially invalidated
//! selection. Ancestor changes cascade: a new province clears district,
//! subdistrict, and zipcode, because their previous values are not guaranteed
//! valid under the new ancestor.

use std::sync::Arc;

use serde::{
  Deserialize,
  Serialize,
};

use crate::{
  config::{
    AddressConfig,
    PendingZipPolicy,
  },
  hierarchy::HierarchyStore,
  postal::{
    self,
    PostalCandidate,
    PostalLookup,
  },
};

/// The committed address tuple. Empty strings mean unset.
///
/// Invariants on every committed value: `district` belongs to `province`,
/// `subdistrict` belongs to `district`, and `zipcode` equals the zipcode of
/// the committed subdistrict. Unresolved postal digits live outside this
/// tuple, in the controller's pending text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressSelection {
  pub province:    String,
  pub district:    String,
  pub subdistrict: String,
  pub zipcode:     String,
}

impl AddressSelection {
  pub fn is_empty(&self) -> bool {
    self.province.is_empty()
      && self.district.is_empty()
      && self.subdistrict.is_empty()
      && self.zipcode.is_empty()
  }
}

/// Callback fired after every committed mutation.
pub type ChangeListener = Box<dyn Fn(&AddressSelection)>;

/// Owns the current [`AddressSelection`] and the pending postal text.
pub struct SelectionController {
  store:       Arc<HierarchyStore>,
  config:      AddressConfig,
  selection:   AddressSelection,
  /// Digits typed into the postal field that have not resolved yet. `None`
  /// when the field shows the committed zipcode.
  pending_zip: Option<String>,
  on_change:   Option<ChangeListener>,
}

impl SelectionController {
  pub fn new(store: Arc<HierarchyStore>, config: AddressConfig) -> Self {
    Self {
      store,
      config,
      selection: AddressSelection::default(),
      pending_zip: None,
      on_change: None,
    }
  }

  /// Seed from a caller-supplied partial selection, e.g. a stored customer
  /// record. Names are kept verbatim for display; if the seeded chain
  /// resolves, the zipcode is re-derived from the subdistrict record. A
  /// stale chain is not an error: scoped candidate lookups against it will
  /// simply come back empty.
  pub fn with_selection(
    store: Arc<HierarchyStore>,
    config: AddressConfig,
    seed: AddressSelection,
  ) -> Self {
    let mut controller = Self::new(store, config);
    controller.selection = seed;
    controller.heal_seed();
    controller
  }

  fn heal_seed(&mut self) {
    if self.selection.is_empty() {
      return;
    }
    let province = self.store.province_by_name(&self.selection.province);
    let district = province
      .and_then(|province| self.store.district_by_name(province.id, &self.selection.district));
    let subdistrict = district
      .and_then(|district| self.store.subdistrict_by_name(district.id, &self.selection.subdistrict));

    match subdistrict {
      Some(subdistrict) => self.selection.zipcode = subdistrict.zipcode.clone(),
      None if !self.selection.subdistrict.is_empty() => {
        log::warn!(
          "seeded subdistrict {:?} does not resolve under {:?}/{:?}",
          self.selection.subdistrict,
          self.selection.province,
          self.selection.district,
        );
      },
      None => {
        if !self.selection.district.is_empty() && district.is_none() {
          log::warn!(
            "seeded district {:?} does not belong to province {:?}",
            self.selection.district,
            self.selection.province,
          );
        }
      },
    }
  }

  /// Install the observer. It fires only after committed mutations, never on
  /// intermediate keystrokes.
  pub fn set_on_change(&mut self, listener: impl Fn(&AddressSelection) + 'static) {
    self.on_change = Some(Box::new(listener));
  }

  pub fn selection(&self) -> &AddressSelection {
    &self.selection
  }

  /// Unresolved postal digits, if any.
  pub fn pending_zip(&self) -> Option<&str> {
    self.pending_zip.as_deref()
  }

  /// Text the postal field should display: pending digits while unresolved,
  /// the committed zipcode otherwise.
  pub fn postal_display(&self) -> &str {
    self.pending_zip.as_deref().unwrap_or(&self.selection.zipcode)
  }

  /// Select a province. Descendants are unconditionally cleared.
  pub fn set_province(&mut self, name: &str) {
    let next = AddressSelection {
      province: name.to_string(),
      ..AddressSelection::default()
    };
    if self.commit(next) {
      self.apply_pending_policy();
    }
  }

  /// Select a district. No-op while no province is set; clears subdistrict
  /// and zipcode.
  pub fn set_district(&mut self, name: &str) {
    if self.selection.province.is_empty() {
      return;
    }
    let next = AddressSelection {
      province: self.selection.province.clone(),
      district: name.to_string(),
      ..AddressSelection::default()
    };
    if self.commit(next) {
      self.apply_pending_policy();
    }
  }

  /// Select a subdistrict and derive its zipcode. No-op while no district is
  /// set, or when the name no longer resolves under the current district:
  /// committing it anyway would leave the zipcode underivable.
  pub fn set_subdistrict(&mut self, name: &str) {
    if self.selection.district.is_empty() {
      return;
    }
    let Some(zipcode) = self
      .resolved_district_id()
      .and_then(|district_id| self.store.subdistrict_by_name(district_id, name))
      .map(|subdistrict| subdistrict.zipcode.clone())
    else {
      log::warn!(
        "subdistrict {name:?} not found under district {:?}",
        self.selection.district
      );
      return;
    };
    let next = AddressSelection {
      province: self.selection.province.clone(),
      district: self.selection.district.clone(),
      subdistrict: name.to_string(),
      zipcode,
    };
    if self.commit(next) {
      self.apply_pending_policy();
    }
  }

  /// Reverse path: free-typed postal digits. Input is digit-filtered and
  /// capped; keystrokes never notify. A full-length unique match commits the
  /// whole ancestor chain atomically, in one notification. Returns whether
  /// that resolution happened.
  pub fn set_zipcode(&mut self, raw: &str) -> bool {
    let digits = postal::sanitize(raw);
    let resolved = match postal::lookup(&self.store, &digits, self.config.min_postal_digits) {
      PostalLookup::Resolved(candidate) => Some(owned_chain(&candidate)),
      _ => None,
    };
    match resolved {
      Some(next) => {
        self.pending_zip = None;
        self.commit(next);
        true
      },
      None => {
        self.pending_zip = if digits.is_empty() { None } else { Some(digits) };
        false
      },
    }
  }

  /// Candidates for the digits currently pending in the postal field.
  pub fn postal_candidates(&self) -> Vec<PostalCandidate<'_>> {
    let Some(digits) = self.pending_zip.as_deref() else {
      return Vec::new();
    };
    match postal::lookup(&self.store, digits, self.config.min_postal_digits) {
      PostalLookup::Candidates(candidates) => candidates,
      PostalLookup::Resolved(candidate) => vec![candidate],
      PostalLookup::Pending | PostalLookup::NoMatch => Vec::new(),
    }
  }

  /// Commit one candidate from an ambiguous postal match. Same atomic
  /// ancestor-chain commit as the unique-match path. Returns false for an
  /// out-of-range index (stale UI state).
  pub fn commit_postal_candidate(&mut self, index: usize) -> bool {
    let Some(next) = self.postal_candidates().get(index).map(owned_chain) else {
      return false;
    };
    self.pending_zip = None;
    self.commit(next);
    true
  }

  /// Explicit reset. Notifies once, unless already empty.
  pub fn clear(&mut self) {
    self.pending_zip = None;
    self.commit(AddressSelection::default());
  }

  fn resolved_district_id(&self) -> Option<u32> {
    let province = self.store.province_by_name(&self.selection.province)?;
    let district = self
      .store
      .district_by_name(province.id, &self.selection.district)?;
    Some(district.id)
  }

  /// Commit `next` if it differs from the current selection and notify.
  /// Re-selecting the current value stays silent.
  fn commit(&mut self, next: AddressSelection) -> bool {
    if next == self.selection {
      return false;
    }
    self.selection = next;
    log::debug!(
      "committed selection {:?}/{:?}/{:?} {:?}",
      self.selection.province,
      self.selection.district,
      self.selection.subdistrict,
      self.selection.zipcode,
    );
    if let Some(listener) = &self.on_change {
      listener(&self.selection);
    }
    true
  }

  fn apply_pending_policy(&mut self) {
    if self.config.pending_zip_policy == PendingZipPolicy::Discard {
      self.pending_zip = None;
    }
  }
}

fn owned_chain(candidate: &PostalCandidate<'_>) -> AddressSelection {
  AddressSelection {
    province:    candidate.province.name.clone(),
    district:    candidate.district.name.clone(),
    subdistrict: candidate.subdistrict.name.clone(),
    zipcode:     candidate.subdistrict.zipcode.clone(),
  }
}
