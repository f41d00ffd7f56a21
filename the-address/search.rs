//! Substring filtering over candidate names.
//!
//! Matching is deliberately plain: case-insensitive substring with collapsed
//! whitespace. An empty query selects the whole scoped population, so an open
//! panel always shows options rather than an empty state.

/// Normalize a name or query for matching: lowercase, trim, and collapse
/// interior whitespace runs to single spaces.
pub fn normalize(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for word in text.split_whitespace() {
    if !out.is_empty() {
      out.push(' ');
    }
    for c in word.chars() {
      out.extend(c.to_lowercase());
    }
  }
  out
}

/// Whether `name` matches `query` under the widget's search policy.
pub fn matches(name: &str, query: &str) -> bool {
  let query = normalize(query);
  if query.is_empty() {
    return true;
  }
  normalize(name).contains(&query)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_query_matches_everything() {
    assert!(matches("Bangkok", ""));
    assert!(matches("", ""));
    assert!(matches("Lat Phrao", "   "));
  }

  #[test]
  fn substring_is_case_insensitive() {
    assert!(matches("Chatuchak", "CHATU"));
    assert!(matches("Bang Rak", "g r"));
    assert!(!matches("Chatuchak", "phrao"));
  }

  #[test]
  fn interior_whitespace_is_collapsed() {
    assert!(matches("Lat  Phrao", "lat phrao"));
    assert!(matches("Lat Phrao", "  lat   phrao  "));
  }

  #[test]
  fn thai_names_match_verbatim() {
    assert!(matches("ลาดพร้าว", "ลาด"));
    assert!(matches("จตุจักร", "จตุจักร"));
    assert!(!matches("จตุจักร", "ลาด"));
  }
}
