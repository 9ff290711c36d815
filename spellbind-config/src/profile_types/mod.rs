//! Profile types, collection manager and persistent store.
//!
//! ## Sub-modules
//!
//! - [`profile`]: Core `Profile` struct and its per-(expansion, class) entries
//! - [`manager`]: `ProfileManager`, an ordered in-memory collection with merge-on-save
//! - [`store`]: `ProfileStore`, the `ProfileManager` persisted under the `wowProfiles` key

pub mod manager;
pub mod profile;
pub mod store;

pub use manager::ProfileManager;
pub use profile::{Profile, ProfileData, ProfileEntry};
pub use store::ProfileStore;
