//! Headless cascading address picker for the Thai administrative hierarchy
//! (province → district → subdistrict → postal code).
//!
//! The widget keeps the referential invariant between the four fields under
//! partial, out-of-order, and ambiguous input: ancestor changes cascade down,
//! a subdistrict commit derives the postal code, and a typed postal code
//! resolves the whole chain bottom-up. The host toolkit feeds input events in
//! and renders from the exposed state; nothing here touches a screen, the
//! network, or a disk.

pub mod config;
pub mod hierarchy;
pub mod postal;
pub mod search;
pub mod selection;
pub mod ui;

pub use config::{
  AddressConfig,
  PendingZipPolicy,
};
pub use hierarchy::{
  DatasetError,
  District,
  HierarchyStore,
  Province,
  Subdistrict,
};
pub use selection::{
  AddressSelection,
  SelectionController,
};
pub use ui::{
  Event,
  EventResult,
  Key,
  PickerId,
  picker::AddressWidget,
};
