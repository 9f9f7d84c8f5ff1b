//! # Tinker Common
//!
//! Identity primitives shared by the Tinker crafting crates.
//!
//! This crate provides the names the host engine hands to the crafting
//! module:
//! - Entity and recipe identifiers
//! - Module-qualified resource URNs (`module:resource#fragment`)
//! - Block family URIs (`module:family[:module:shape]`)
//! - Parse errors for the above
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod urn;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::urn::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_generation() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        assert_ne!(id1, id2);
        assert!(id1.is_valid());
        assert!(!EntityId::NULL.is_valid());
    }

    #[test]
    fn test_urn_short_name() {
        let urn: ResourceUrn = "Core:Plank".parse().expect("valid urn");
        assert_eq!(urn.resource(), "Plank");
        assert_eq!(urn.to_string(), "Core:Plank");
    }

    #[test]
    fn test_block_uri_short_name() {
        let uri: BlockUri = "core:stone".parse().expect("valid uri");
        assert_eq!(uri.short_name(), "stone");
    }
}
