//! Loading creature catalogs.
//!
//! Catalogs are JSON arrays of archetypes. Every field except the name has
//! a default, so an entry only needs to spell out what differs:
//!
//! ```json
//! [
//!   { "name": "rat", "hp": 4, "attacks": [{ "name": "bite", "damage": 1 }] },
//!   { "name": "guard", "faction": "Ally", "behavior": "Wanderer" }
//! ]
//! ```
use game_core::{Archetype, ArchetypeRegistry};

use crate::api::{Result, RuntimeError};

/// Parses a catalog into a read-only registry.
pub fn load_archetypes(json: &str) -> Result<ArchetypeRegistry> {
    let archetypes: Vec<Archetype> = serde_json::from_str(json).map_err(RuntimeError::Catalog)?;
    let registry = ArchetypeRegistry::from_archetypes(archetypes)?;
    tracing::info!("loaded {} archetypes", registry.len());
    Ok(registry)
}
