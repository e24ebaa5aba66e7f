//! # Comparable Views
//!
//! Converts a raw record into the canonical form used to decide whether a
//! server record already matches what the caller wants.
//!
//! ## Normalization Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    record ──► comparable view                           │
//! │                                                                         │
//! │  1. PICK      keep only the kind's semantic fields                      │
//! │               (_id and bookkeeping never survive)                       │
//! │                                                                         │
//! │  2. DEFAULT   fill every ABSENT optional field from the kind's table    │
//! │               (a present `null` is kept as null)                        │
//! │                                                                         │
//! │  3. UNORDER   set-like arrays become maps:                              │
//! │               translations  [{language:"fr",_id,..}]  → {"fr": {..}}    │
//! │               universes     ["u1","u2"]               → {"u1": true,..} │
//! │                                                                         │
//! │  4. NUMBERS   integral floats become integers (0.0 == 0)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! JSON objects compare as maps, so key order never matters. Array order
//! matters everywhere except the collections rewritten in step 3.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Number, Value};

use crate::kind::ResourceKind;
use crate::record::Record;
use crate::ID_FIELD;

// =============================================================================
// Field Tables
// =============================================================================

const LAYER_FIELDS: &[&str] = &[
    "owner",
    "venueId",
    "name",
    "alias",
    "floor",
    "isPublished",
    "universes",
];

const PLACE_FIELDS: &[&str] = &[
    "owner",
    "venueId",
    "placeTypeId",
    "name",
    "alias",
    "floor",
    "geometry",
    "marker",
    "entrance",
    "order",
    "isPublished",
    "isSearchable",
    "isVisible",
    "isClickable",
    "style",
    "data",
    "universes",
];

const PLACE_LIST_FIELDS: &[&str] = &[
    "owner",
    "venueId",
    "name",
    "alias",
    "placeIds",
    "isPublished",
    "isSearchable",
    "data",
    "icon",
    "universes",
];

const CONNECTOR_FIELDS: &[&str] = &[
    "owner",
    "venueId",
    "name",
    "type",
    "direction",
    "isAccessible",
    "waitTime",
    "timePerFloor",
    "isActive",
    "icon",
];

const BEACON_FIELDS: &[&str] = &[
    "owner",
    "venueId",
    "name",
    "alias",
    "type",
    "floor",
    "location",
    "properties",
    "isPublished",
    "data",
];

const UNIVERSE_FIELDS: &[&str] = &[
    "owner",
    "venueId",
    "name",
    "alias",
    "description",
    "isPublished",
];

const VENUE_FIELDS: &[&str] = &[
    "owner",
    "name",
    "alias",
    "isPublished",
    "marker",
    "defaultCenter",
    "defaultZoom",
    "data",
];

const ROUTE_GRAPH_FIELDS: &[&str] = &["owner", "venueId", "floor", "nodes", "edges"];

static NON_WORD_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

// =============================================================================
// Public API
// =============================================================================

/// Returns the alias a record gets when none is supplied.
///
/// Each run of non-word characters becomes a single `_`, then the result is
/// lower-cased.
///
/// ```rust
/// use venuesync_core::default_alias;
///
/// assert_eq!(default_alias("Room 101"), "room_101");
/// assert_eq!(default_alias("Café -- Bar"), "caf_bar");
/// ```
pub fn default_alias(name: &str) -> String {
    NON_WORD_RUN.replace_all(name, "_").to_lowercase()
}

/// Builds the comparable view of a record for the given kind.
pub fn comparable(kind: ResourceKind, record: &Record) -> Value {
    let view = match kind {
        ResourceKind::Layer => comparable_layer(record),
        ResourceKind::Place => comparable_place(record),
        ResourceKind::PlaceList => comparable_place_list(record),
        ResourceKind::Connector => comparable_connector(record),
        ResourceKind::Beacon => comparable_beacon(record),
        ResourceKind::Universe => comparable_universe(record),
        ResourceKind::Venue => comparable_venue(record),
        ResourceKind::RouteGraph => comparable_route_graph(record),
    };
    canonical_numbers(Value::Object(view))
}

/// Returns true if both records have equal content for the given kind.
///
/// The server identifier and any field outside the kind's table are ignored.
pub fn is_equal(kind: ResourceKind, a: &Record, b: &Record) -> bool {
    comparable(kind, a) == comparable(kind, b)
}

// =============================================================================
// Per-Kind Views
// =============================================================================

fn comparable_layer(layer: &Record) -> Map<String, Value> {
    let mut view = pick(layer, LAYER_FIELDS);
    apply_defaults(
        &mut view,
        vec![
            ("alias", alias_for(layer)),
            ("isPublished", json!(false)),
            ("universes", json!({})),
        ],
    );
    normalize_universes(&mut view);
    view
}

fn comparable_place(place: &Record) -> Map<String, Value> {
    let mut view = pick(place, PLACE_FIELDS);
    apply_defaults(
        &mut view,
        vec![
            ("alias", alias_for(place)),
            ("order", json!(0)),
            ("isPublished", json!(false)),
            ("isSearchable", json!(true)),
            ("isVisible", json!(true)),
            ("isClickable", json!(true)),
            ("style", json!({})),
            ("data", json!({})),
            ("universes", json!({})),
        ],
    );
    normalize_universes(&mut view);
    view.insert("translations".into(), keyed_translations(place));
    view
}

fn comparable_place_list(place_list: &Record) -> Map<String, Value> {
    let mut view = pick(place_list, PLACE_LIST_FIELDS);
    apply_defaults(
        &mut view,
        vec![
            ("alias", alias_for(place_list)),
            ("isPublished", json!(false)),
            ("isSearchable", json!(true)),
            ("data", json!({})),
            ("universes", json!({})),
        ],
    );
    normalize_universes(&mut view);
    view.insert("translations".into(), keyed_translations(place_list));
    view
}

fn comparable_connector(connector: &Record) -> Map<String, Value> {
    let mut view = pick(connector, CONNECTOR_FIELDS);
    apply_defaults(
        &mut view,
        vec![
            ("isAccessible", json!(true)),
            ("waitTime", json!(0)),
            ("timePerFloor", json!(0)),
            ("isActive", json!(true)),
            ("icon", Value::Null),
        ],
    );
    view
}

fn comparable_beacon(beacon: &Record) -> Map<String, Value> {
    let mut view = pick(beacon, BEACON_FIELDS);
    apply_defaults(
        &mut view,
        vec![
            ("alias", alias_for(beacon)),
            ("isPublished", json!(false)),
            ("properties", json!({})),
            ("data", json!({})),
        ],
    );
    view
}

fn comparable_universe(universe: &Record) -> Map<String, Value> {
    let mut view = pick(universe, UNIVERSE_FIELDS);
    apply_defaults(
        &mut view,
        vec![
            ("alias", alias_for(universe)),
            ("description", json!("")),
            ("isPublished", json!(false)),
        ],
    );
    view
}

fn comparable_venue(venue: &Record) -> Map<String, Value> {
    let mut view = pick(venue, VENUE_FIELDS);
    apply_defaults(
        &mut view,
        vec![
            ("alias", alias_for(venue)),
            ("isPublished", json!(false)),
            ("data", json!({})),
        ],
    );
    view.insert("translations".into(), keyed_translations(venue));
    view
}

fn comparable_route_graph(route_graph: &Record) -> Map<String, Value> {
    let mut view = pick(route_graph, ROUTE_GRAPH_FIELDS);
    apply_defaults(&mut view, vec![("nodes", json!([])), ("edges", json!([]))]);
    view
}

// =============================================================================
// Helpers
// =============================================================================

fn pick(record: &Record, fields: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|field| {
            record
                .get(field)
                .map(|value| ((*field).to_string(), value.clone()))
        })
        .collect()
}

fn apply_defaults(view: &mut Map<String, Value>, defaults: Vec<(&str, Value)>) {
    for (field, value) in defaults {
        view.entry(field).or_insert(value);
    }
}

fn alias_for(record: &Record) -> Value {
    Value::String(default_alias(record.name().unwrap_or_default()))
}

/// Translations keyed by language, each stripped of its own `_id`.
///
/// A translation without a language is keyed by the empty string; when two
/// translations share a language the later one wins.
fn keyed_translations(record: &Record) -> Value {
    let items: Vec<&Value> = match record.get("translations") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => map.values().collect(),
        _ => Vec::new(),
    };

    let mut keyed = Map::new();
    for item in items {
        if let Value::Object(translation) = item {
            let mut translation = translation.clone();
            translation.remove(ID_FIELD);
            let language = match translation.get("language") {
                Some(Value::String(language)) => language.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            keyed.insert(language, Value::Object(translation));
        }
    }
    Value::Object(keyed)
}

/// Rewrites a universe membership list as `{ universeId: true }`.
///
/// Members may be plain ids or objects carrying an `_id`. An object-shaped
/// membership keeps only the entries set to `true`.
fn normalize_universes(view: &mut Map<String, Value>) {
    let Some(universes) = view.get_mut("universes") else {
        return;
    };

    let members: Option<Map<String, Value>> = match universes {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(member_id)
                .map(|id| (id, Value::Bool(true)))
                .collect(),
        ),
        Value::Object(map) => Some(
            map.iter()
                .filter(|(_, flag)| **flag == Value::Bool(true))
                .map(|(id, _)| (id.clone(), Value::Bool(true)))
                .collect(),
        ),
        _ => None,
    };

    if let Some(members) = members {
        *universes = Value::Object(members);
    }
}

fn member_id(member: &Value) -> Option<String> {
    match member {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        Value::Object(map) => map.get(ID_FIELD).and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Integral floats become integers so `1.0` and `1` compare equal.
fn canonical_numbers(value: Value) -> Value {
    match value {
        Value::Number(number) => Value::Number(canonical_number(number)),
        Value::Array(items) => Value::Array(items.into_iter().map(canonical_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, canonical_numbers(value)))
                .collect(),
        ),
        other => other,
    }
}

fn canonical_number(number: Number) -> Number {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53

    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() <= MAX_EXACT => {
            if float >= 0.0 {
                Number::from(float as u64)
            } else {
                Number::from(float as i64)
            }
        }
        _ => number,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn test_default_alias() {
        assert_eq!(default_alias("Room 101"), "room_101");
        assert_eq!(default_alias("Main  Entrance!!"), "main_entrance_");
        assert_eq!(default_alias("snake_case"), "snake_case");
        assert_eq!(default_alias(""), "");
    }

    #[test]
    fn test_place_defaults() {
        let place = record(json!({
            "owner": "o1",
            "venueId": "v1",
            "name": "Meeting Room A"
        }));

        assert_eq!(
            comparable(ResourceKind::Place, &place),
            json!({
                "owner": "o1",
                "venueId": "v1",
                "name": "Meeting Room A",
                "alias": "meeting_room_a",
                "order": 0,
                "isPublished": false,
                "isSearchable": true,
                "isVisible": true,
                "isClickable": true,
                "style": {},
                "data": {},
                "universes": {},
                "translations": {}
            })
        );
    }

    #[test]
    fn test_missing_is_published_defaults_to_false() {
        for kind in [
            ResourceKind::Layer,
            ResourceKind::Place,
            ResourceKind::PlaceList,
            ResourceKind::Beacon,
            ResourceKind::Universe,
            ResourceKind::Venue,
        ] {
            let view = comparable(kind, &record(json!({"name": "X"})));
            assert_eq!(view["isPublished"], json!(false), "kind {kind}");
        }
    }

    #[test]
    fn test_present_null_is_not_defaulted() {
        let place = record(json!({"name": "A", "alias": null}));
        assert_eq!(comparable(ResourceKind::Place, &place)["alias"], Value::Null);
    }

    #[test]
    fn test_explicit_defaults_equal_absent_fields() {
        let sparse = record(json!({"name": "Lift 1", "venueId": "v1"}));
        let explicit = record(json!({
            "name": "Lift 1",
            "venueId": "v1",
            "isAccessible": true,
            "waitTime": 0,
            "timePerFloor": 0.0,
            "isActive": true,
            "icon": null
        }));
        assert!(is_equal(ResourceKind::Connector, &sparse, &explicit));
    }

    #[test]
    fn test_id_and_unknown_fields_are_ignored() {
        let a = record(json!({"_id": "1", "name": "L1", "floor": 0, "updatedAt": "yesterday"}));
        let b = record(json!({"_id": "2", "name": "L1", "floor": 0, "updatedAt": "today"}));

        assert_eq!(
            comparable(ResourceKind::Layer, &a),
            comparable(ResourceKind::Layer, &b)
        );
        assert!(comparable(ResourceKind::Layer, &a).get("_id").is_none());
    }

    #[test]
    fn test_translation_order_and_ids_do_not_matter() {
        let a = record(json!({
            "name": "Shop",
            "translations": [
                {"_id": "t1", "language": "en", "title": "Shop"},
                {"_id": "t2", "language": "fr", "title": "Boutique"}
            ]
        }));
        let b = record(json!({
            "name": "Shop",
            "translations": [
                {"language": "fr", "title": "Boutique"},
                {"_id": "t9", "language": "en", "title": "Shop"}
            ]
        }));

        assert!(is_equal(ResourceKind::Place, &a, &b));
        assert!(is_equal(ResourceKind::PlaceList, &a, &b));
    }

    #[test]
    fn test_translation_content_matters() {
        let a = record(json!({"name": "Shop", "translations": [{"language": "fr", "title": "Boutique"}]}));
        let b = record(json!({"name": "Shop", "translations": [{"language": "fr", "title": "Magasin"}]}));
        assert!(!is_equal(ResourceKind::Place, &a, &b));
    }

    #[test]
    fn test_universe_membership_is_a_set() {
        let a = record(json!({"name": "Desk", "universes": ["u1", "u2"]}));
        let b = record(json!({"name": "Desk", "universes": ["u2", {"_id": "u1"}]}));
        let c = record(json!({"name": "Desk", "universes": {"u1": true, "u2": true, "u3": false}}));

        assert!(is_equal(ResourceKind::Place, &a, &b));
        assert!(is_equal(ResourceKind::Place, &a, &c));
        assert_eq!(
            comparable(ResourceKind::Place, &a)["universes"],
            json!({"u1": true, "u2": true})
        );
    }

    #[test]
    fn test_empty_universes_equal_absent_universes() {
        let a = record(json!({"name": "Floor 1", "universes": []}));
        let b = record(json!({"name": "Floor 1"}));
        assert!(is_equal(ResourceKind::Layer, &a, &b));
    }

    #[test]
    fn test_array_order_matters_elsewhere() {
        let a = record(json!({"name": "Favourites", "placeIds": ["p1", "p2"]}));
        let b = record(json!({"name": "Favourites", "placeIds": ["p2", "p1"]}));
        assert!(!is_equal(ResourceKind::PlaceList, &a, &b));
    }

    #[test]
    fn test_nested_key_order_does_not_matter() {
        let a = record(json!({"name": "A", "data": {"x": 1, "y": {"p": 1, "q": 2}}}));
        let b: Record = serde_json::from_str(r#"{"name":"A","data":{"y":{"q":2,"p":1},"x":1.0}}"#).unwrap();
        assert!(is_equal(ResourceKind::Place, &a, &b));
    }

    #[test]
    fn test_route_graph_view() {
        let graph = record(json!({"_id": "g", "venueId": "v1", "floor": 2}));
        assert_eq!(
            comparable(ResourceKind::RouteGraph, &graph),
            json!({"venueId": "v1", "floor": 2, "nodes": [], "edges": []})
        );
    }

    #[test]
    fn test_canonical_number_keeps_fractions() {
        let a = record(json!({"name": "B", "location": {"lat": 48.5, "lon": 2.0}}));
        assert_eq!(
            comparable(ResourceKind::Beacon, &a)["location"],
            json!({"lat": 48.5, "lon": 2})
        );
    }
}
