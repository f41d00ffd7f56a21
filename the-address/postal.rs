//! Reverse resolution from postal codes to subdistrict candidates.
//!
//! The postal field is the one bottom-up entry point into the hierarchy: the
//! user may type a zipcode before choosing a province, so the search is
//! unscoped. Candidates carry their pre-resolved ancestor chain so a unique
//! match (or a manually chosen candidate) can be committed in one step.

use crate::hierarchy::{
  District,
  HierarchyStore,
  Province,
  Subdistrict,
  ZIPCODE_LEN,
};

/// Digits required before any candidates are exposed. Bounds the result set;
/// a single digit would match a fifth of the country.
pub const MIN_QUERY_DIGITS: usize = 2;

/// Keep only the digits of `raw`, capped at a full zipcode. Non-digit input
/// is filtered silently, never rejected.
pub fn sanitize(raw: &str) -> String {
  raw
    .chars()
    .filter(|c| c.is_ascii_digit())
    .take(ZIPCODE_LEN)
    .collect()
}

/// A postal match with its ancestor chain pre-resolved.
#[derive(Clone, Copy, Debug)]
pub struct PostalCandidate<'a> {
  pub subdistrict: &'a Subdistrict,
  pub district:    &'a District,
  pub province:    &'a Province,
}

/// Outcome of matching typed digits against the dataset.
#[derive(Debug)]
pub enum PostalLookup<'a> {
  /// Not enough digits to search yet.
  Pending,
  /// Searched, nothing matched.
  NoMatch,
  /// One or more candidates. A full-length match that is also unique is
  /// reported as `Resolved` instead.
  Candidates(Vec<PostalCandidate<'a>>),
  /// Exactly five digits matching exactly one subdistrict.
  Resolved(PostalCandidate<'a>),
}

/// Unscoped prefix search across all subdistricts. `digits` must already be
/// sanitized. At full length, prefix matching is equality.
pub fn lookup<'a>(store: &'a HierarchyStore, digits: &str, min_digits: usize) -> PostalLookup<'a> {
  if digits.len() < min_digits {
    return PostalLookup::Pending;
  }

  let mut candidates = Vec::new();
  for subdistrict in store.subdistricts() {
    if !subdistrict.zipcode.starts_with(digits) {
      continue;
    }
    let Some(candidate) = resolve_chain(store, subdistrict) else {
      continue;
    };
    candidates.push(candidate);
  }

  if candidates.is_empty() {
    return PostalLookup::NoMatch;
  }
  if digits.len() == ZIPCODE_LEN && candidates.len() == 1 {
    return PostalLookup::Resolved(candidates[0]);
  }
  PostalLookup::Candidates(candidates)
}

/// Walk subdistrict → district → province. Store validation makes a broken
/// chain unreachable for datasets built through `HierarchyStore::new`; if one
/// shows up anyway the candidate is dropped rather than surfaced half-built.
fn resolve_chain<'a>(
  store: &'a HierarchyStore,
  subdistrict: &'a Subdistrict,
) -> Option<PostalCandidate<'a>> {
  let district = store.district_of(subdistrict);
  let province = district.and_then(|district| store.province_of(district));
  match (district, province) {
    (Some(district), Some(province)) => {
      Some(PostalCandidate {
        subdistrict,
        district,
        province,
      })
    },
    _ => {
      log::warn!("subdistrict {} has a broken ancestor chain", subdistrict.id);
      None
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::hierarchy::fixtures;

  #[test]
  fn sanitize_filters_and_caps() {
    assert_eq!(sanitize("10230"), "10230");
    assert_eq!(sanitize("1a0b2c3d0e"), "10230");
    assert_eq!(sanitize("102304567"), "10230");
    assert_eq!(sanitize("ลาดพร้าว"), "");
  }

  quickcheck::quickcheck! {
      fn sanitize_is_digits_capped_at_five(raw: String) -> bool {
          let digits = sanitize(&raw);
          digits.len() <= ZIPCODE_LEN && digits.chars().all(|c| c.is_ascii_digit())
      }
  }

  #[test]
  fn below_minimum_is_pending() {
    let store = fixtures::store();
    assert!(matches!(lookup(&store, "", MIN_QUERY_DIGITS), PostalLookup::Pending));
    assert!(matches!(lookup(&store, "1", MIN_QUERY_DIGITS), PostalLookup::Pending));
  }

  #[test]
  fn partial_digits_match_by_prefix() {
    let store = fixtures::store();
    match lookup(&store, "109", MIN_QUERY_DIGITS) {
      PostalLookup::Candidates(candidates) => {
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.subdistrict.zipcode == "10900"));
      },
      other => panic!("expected candidates, got {other:?}"),
    }
  }

  #[test]
  fn unique_full_length_match_resolves_chain() {
    let store = fixtures::store();
    match lookup(&store, "10230", MIN_QUERY_DIGITS) {
      PostalLookup::Resolved(candidate) => {
        assert_eq!(candidate.subdistrict.name, "Lat Phrao");
        assert_eq!(candidate.district.name, "Chatuchak");
        assert_eq!(candidate.province.name, "Bangkok");
      },
      other => panic!("expected resolved, got {other:?}"),
    }
  }

  #[test]
  fn ambiguous_full_length_match_stays_candidates() {
    let store = fixtures::store();
    match lookup(&store, "11000", MIN_QUERY_DIGITS) {
      PostalLookup::Candidates(candidates) => {
        assert_eq!(candidates.len(), 2);
      },
      other => panic!("expected candidates, got {other:?}"),
    }
  }

  #[test]
  fn unmatched_digits_report_no_match() {
    let store = fixtures::store();
    assert!(matches!(
      lookup(&store, "99", MIN_QUERY_DIGITS),
      PostalLookup::NoMatch
    ));
    assert!(matches!(
      lookup(&store, "99999", MIN_QUERY_DIGITS),
      PostalLookup::NoMatch
    ));
  }
}
