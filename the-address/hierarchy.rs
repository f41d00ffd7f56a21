//! Read-only access to the administrative reference dataset.
//!
//! The dataset (provinces, districts, subdistricts with postal codes) is
//! produced once by the embedding application's loader and treated as
//! immutable shared data for the process lifetime. Referential integrity is
//! checked at construction; after that, every lookup is synchronous and
//! degrades to an empty result instead of failing.

use indexmap::IndexMap;
use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

use crate::search;

/// Length of a well-formed Thai postal code.
pub const ZIPCODE_LEN: usize = 5;

/// A first-level administrative division.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
  pub id:   u32,
  pub name: String,
}

/// A district within a province.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
  pub id:          u32,
  pub province_id: u32,
  pub name:        String,
}

/// A subdistrict within a district. Carries the postal code; a postal code
/// may be shared by several subdistricts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdistrict {
  pub id:          u32,
  pub district_id: u32,
  pub name:        String,
  pub zipcode:     String,
}

/// Integrity violations detected while building the store.
#[derive(Debug, Error)]
pub enum DatasetError {
  #[error("district {district} references unknown province {province}")]
  OrphanDistrict { district: u32, province: u32 },

  #[error("subdistrict {subdistrict} references unknown district {district}")]
  OrphanSubdistrict { subdistrict: u32, district: u32 },

  #[error("subdistrict {subdistrict} has malformed zipcode {zipcode:?}")]
  MalformedZipcode { subdistrict: u32, zipcode: String },

  #[error("duplicate {kind} id {id}")]
  DuplicateId { kind: &'static str, id: u32 },
}

/// In-memory store over the reference dataset.
///
/// Backed by insertion-ordered maps so candidate lists come out in dataset
/// order, which is the order the upstream dataset ships them in.
pub struct HierarchyStore {
  provinces:    IndexMap<u32, Province>,
  districts:    IndexMap<u32, District>,
  subdistricts: IndexMap<u32, Subdistrict>,
}

impl HierarchyStore {
  /// Build a store, validating references and zipcode shape.
  pub fn new(
    provinces: Vec<Province>,
    districts: Vec<District>,
    subdistricts: Vec<Subdistrict>,
  ) -> Result<Self, DatasetError> {
    let mut province_map = IndexMap::with_capacity(provinces.len());
    for province in provinces {
      let id = province.id;
      if province_map.insert(id, province).is_some() {
        return Err(DatasetError::DuplicateId {
          kind: "province",
          id,
        });
      }
    }

    let mut district_map = IndexMap::with_capacity(districts.len());
    for district in districts {
      if !province_map.contains_key(&district.province_id) {
        return Err(DatasetError::OrphanDistrict {
          district: district.id,
          province: district.province_id,
        });
      }
      let id = district.id;
      if district_map.insert(id, district).is_some() {
        return Err(DatasetError::DuplicateId {
          kind: "district",
          id,
        });
      }
    }

    let mut subdistrict_map = IndexMap::with_capacity(subdistricts.len());
    for subdistrict in subdistricts {
      if !district_map.contains_key(&subdistrict.district_id) {
        return Err(DatasetError::OrphanSubdistrict {
          subdistrict: subdistrict.id,
          district:    subdistrict.district_id,
        });
      }
      if subdistrict.zipcode.len() != ZIPCODE_LEN
        || !subdistrict.zipcode.bytes().all(|b| b.is_ascii_digit())
      {
        return Err(DatasetError::MalformedZipcode {
          subdistrict: subdistrict.id,
          zipcode:     subdistrict.zipcode,
        });
      }
      let id = subdistrict.id;
      if subdistrict_map.insert(id, subdistrict).is_some() {
        return Err(DatasetError::DuplicateId {
          kind: "subdistrict",
          id,
        });
      }
    }

    Ok(Self {
      provinces:    province_map,
      districts:    district_map,
      subdistricts: subdistrict_map,
    })
  }

  /// All provinces in dataset order.
  pub fn provinces(&self) -> impl Iterator<Item = &Province> {
    self.provinces.values()
  }

  /// All subdistricts in dataset order.
  pub fn subdistricts(&self) -> impl Iterator<Item = &Subdistrict> {
    self.subdistricts.values()
  }

  pub fn province_by_id(&self, id: u32) -> Option<&Province> {
    self.provinces.get(&id)
  }

  pub fn district_by_id(&self, id: u32) -> Option<&District> {
    self.districts.get(&id)
  }

  /// Exact-name province lookup, used when reconstructing an ancestor chain
  /// from a leaf match.
  pub fn province_by_name(&self, name: &str) -> Option<&Province> {
    self.provinces.values().find(|province| province.name == name)
  }

  /// Exact-name district lookup scoped to a province.
  pub fn district_by_name(&self, province_id: u32, name: &str) -> Option<&District> {
    self
      .districts
      .values()
      .find(|district| district.province_id == province_id && district.name == name)
  }

  /// Exact-name subdistrict lookup scoped to a district.
  pub fn subdistrict_by_name(&self, district_id: u32, name: &str) -> Option<&Subdistrict> {
    self
      .subdistricts
      .values()
      .find(|subdistrict| subdistrict.district_id == district_id && subdistrict.name == name)
  }

  /// Districts belonging to a province. Unknown ids yield an empty list.
  pub fn districts_of(&self, province_id: u32) -> Vec<&District> {
    self
      .districts
      .values()
      .filter(|district| district.province_id == province_id)
      .collect()
  }

  /// Subdistricts belonging to a district. Unknown ids yield an empty list.
  pub fn subdistricts_of(&self, district_id: u32) -> Vec<&Subdistrict> {
    self
      .subdistricts
      .values()
      .filter(|subdistrict| subdistrict.district_id == district_id)
      .collect()
  }

  /// Provinces matching `query`. Empty query returns the full population.
  pub fn search_provinces(&self, query: &str) -> Vec<&Province> {
    self
      .provinces
      .values()
      .filter(|province| search::matches(&province.name, query))
      .collect()
  }

  /// Districts matching `query`, optionally scoped to a province.
  pub fn search_districts(&self, query: &str, province_id: Option<u32>) -> Vec<&District> {
    self
      .districts
      .values()
      .filter(|district| province_id.is_none_or(|id| district.province_id == id))
      .filter(|district| search::matches(&district.name, query))
      .collect()
  }

  /// Subdistricts matching `query`, optionally scoped to a district.
  pub fn search_subdistricts(&self, query: &str, district_id: Option<u32>) -> Vec<&Subdistrict> {
    self
      .subdistricts
      .values()
      .filter(|subdistrict| district_id.is_none_or(|id| subdistrict.district_id == id))
      .filter(|subdistrict| search::matches(&subdistrict.name, query))
      .collect()
  }

  /// One level up from a subdistrict.
  pub fn district_of(&self, subdistrict: &Subdistrict) -> Option<&District> {
    self.districts.get(&subdistrict.district_id)
  }

  /// One level up from a district.
  pub fn province_of(&self, district: &District) -> Option<&Province> {
    self.provinces.get(&district.province_id)
  }
}

#[cfg(test)]
pub(crate) mod fixtures {
  use super::*;

  fn province(id: u32, name: &str) -> Province {
    Province {
      id,
      name: name.to_string(),
    }
  }

  fn district(id: u32, province_id: u32, name: &str) -> District {
    District {
      id,
      province_id,
      name: name.to_string(),
    }
  }

  fn subdistrict(id: u32, district_id: u32, name: &str, zipcode: &str) -> Subdistrict {
    Subdistrict {
      id,
      district_id,
      name: name.to_string(),
      zipcode: zipcode.to_string(),
    }
  }

  /// Small dataset with one unique zipcode (10230) and two ambiguous ones
  /// (10900 within one district, 11000 across another).
  pub(crate) fn store() -> HierarchyStore {
    HierarchyStore::new(
      vec![
        province(1, "Bangkok"),
        province(2, "Chiang Mai"),
        province(3, "Nonthaburi"),
      ],
      vec![
        district(11, 1, "Chatuchak"),
        district(12, 1, "Bang Rak"),
        district(13, 1, "Phaya Thai"),
        district(21, 2, "Mueang Chiang Mai"),
        district(22, 2, "Hang Dong"),
        district(31, 3, "Mueang Nonthaburi"),
      ],
      vec![
        subdistrict(111, 11, "Lat Phrao", "10230"),
        subdistrict(112, 11, "Chan Kasem", "10900"),
        subdistrict(113, 11, "Chom Phon", "10900"),
        subdistrict(121, 12, "Si Lom", "10500"),
        subdistrict(122, 12, "Suriyawong", "10501"),
        subdistrict(131, 13, "Sam Sen Nai", "10400"),
        subdistrict(211, 21, "Si Phum", "50200"),
        subdistrict(221, 22, "Nong Khwai", "50230"),
        subdistrict(311, 31, "Suan Yai", "11000"),
        subdistrict(312, 31, "Talat Khwan", "11000"),
      ],
    )
    .expect("fixture dataset is well formed")
  }
}
