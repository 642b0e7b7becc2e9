//! Entity modules - typed access to stored records.
//!
//! They depend on the storage ports and provide the building blocks for use cases.

pub mod character;

pub use character::{character_key, class_resources_key, magic_key, CharacterRecords};
