//! Widget configuration.
//!
//! Everything here has a sensible default; hosts typically deserialize a
//! fragment of their application config (TOML in ours) into [`AddressConfig`]
//! and hand it to the widget at construction.

use serde::Deserialize;

use crate::postal;

/// What happens to unresolved postal digits when the user commits a
/// selection through the hierarchy pickers instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PendingZipPolicy {
  /// Drop the digits. The committed subdistrict derives the authoritative
  /// zipcode, so stale digits in the field would contradict it.
  #[default]
  Discard,
  /// Leave the typed digits visible as residue.
  Keep,
}

/// Tunables for the address widget.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AddressConfig {
  /// Policy for pending postal text when a hierarchy commit supersedes it.
  pub pending_zip_policy: PendingZipPolicy,
  /// Candidate rows visible in an open panel before it scrolls.
  pub max_visible_rows:   u16,
  /// Estimated height of one candidate row, in logical pixels. Used for the
  /// panel height estimate that placement is computed from.
  pub row_height:         f32,
  /// Digits required before the postal picker exposes candidates.
  pub min_postal_digits:  usize,
}

impl Default for AddressConfig {
  fn default() -> Self {
    Self {
      pending_zip_policy: PendingZipPolicy::default(),
      max_visible_rows:   8,
      row_height:         28.0,
      min_postal_digits:  postal::MIN_QUERY_DIGITS,
    }
  }
}
