//! # Resource Kinds
//!
//! The closed set of API collections the client knows how to talk to.
//!
//! Every kind maps to one REST collection path. Dispatch happens with a
//! `match` on [`ResourceKind`], so adding a kind is a compile error until
//! every table below handles it.
//!
//! ```text
//! ┌──────────────┬──────────────┬───────────┬─────────────┬──────────────┐
//! │ Kind         │ Collection   │ Paginated │ All states  │ Venue sync   │
//! ├──────────────┼──────────────┼───────────┼─────────────┼──────────────┤
//! │ Venue        │ venues       │     -     │     yes     │      -       │
//! │ Layer        │ layers       │     -     │     yes     │     yes      │
//! │ Place        │ places       │    yes    │     yes     │     yes      │
//! │ PlaceList    │ placeLists   │     -     │     yes     │     yes      │
//! │ Connector    │ connectors   │     -     │      -      │     yes      │
//! │ Beacon       │ beacons      │    yes    │     yes     │     yes      │
//! │ Universe     │ universes    │     -     │     yes     │     yes      │
//! │ RouteGraph   │ routegraphs  │     -     │      -      │      -       │
//! └──────────────┴──────────────┴───────────┴─────────────┴──────────────┘
//! ```
//!
//! "All states" means the list endpoint takes `isPublished=all` so that
//! unpublished records are returned too.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A resource collection of the venue-mapping API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Venue,
    Layer,
    Place,
    PlaceList,
    Connector,
    Beacon,
    Universe,
    RouteGraph,
}

impl ResourceKind {
    /// Every kind, in declaration order.
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::Venue,
        ResourceKind::Layer,
        ResourceKind::Place,
        ResourceKind::PlaceList,
        ResourceKind::Connector,
        ResourceKind::Beacon,
        ResourceKind::Universe,
        ResourceKind::RouteGraph,
    ];

    /// Kinds that can be reconciled against a venue by name.
    pub const VENUE_SYNCABLE: [ResourceKind; 6] = [
        ResourceKind::Layer,
        ResourceKind::Place,
        ResourceKind::PlaceList,
        ResourceKind::Connector,
        ResourceKind::Beacon,
        ResourceKind::Universe,
    ];

    /// REST collection path segment (`/api/v1/{collection}`).
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::Venue => "venues",
            ResourceKind::Layer => "layers",
            ResourceKind::Place => "places",
            ResourceKind::PlaceList => "placeLists",
            ResourceKind::Connector => "connectors",
            ResourceKind::Beacon => "beacons",
            ResourceKind::Universe => "universes",
            ResourceKind::RouteGraph => "routegraphs",
        }
    }

    /// Singular name used in logs and errors.
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Venue => "venue",
            ResourceKind::Layer => "layer",
            ResourceKind::Place => "place",
            ResourceKind::PlaceList => "placeList",
            ResourceKind::Connector => "connector",
            ResourceKind::Beacon => "beacon",
            ResourceKind::Universe => "universe",
            ResourceKind::RouteGraph => "routeGraph",
        }
    }

    /// Returns true if the list endpoint is paged with `page=1,2,...`.
    pub fn is_paginated(&self) -> bool {
        matches!(self, ResourceKind::Place | ResourceKind::Beacon)
    }

    /// Returns true if the list endpoint accepts `isPublished=all`.
    pub fn lists_all_publication_states(&self) -> bool {
        !matches!(self, ResourceKind::Connector | ResourceKind::RouteGraph)
    }

    /// Returns true if the kind can be reconciled with the sync engine.
    pub fn is_venue_syncable(&self) -> bool {
        Self::VENUE_SYNCABLE.contains(self)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.singular())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "venue" | "venues" => Ok(ResourceKind::Venue),
            "layer" | "layers" => Ok(ResourceKind::Layer),
            "place" | "places" => Ok(ResourceKind::Place),
            "placelist" | "placelists" => Ok(ResourceKind::PlaceList),
            "connector" | "connectors" => Ok(ResourceKind::Connector),
            "beacon" | "beacons" => Ok(ResourceKind::Beacon),
            "universe" | "universes" => Ok(ResourceKind::Universe),
            "routegraph" | "routegraphs" => Ok(ResourceKind::RouteGraph),
            _ => Err(CoreError::UnknownResourceKind(s.to_string())),
        }
    }
}
