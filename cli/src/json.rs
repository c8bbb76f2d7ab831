//! Plain JSON → compound tag conversion for waypoint files

use serde_json::Value;
use waypoints_core::waypoint::LoadFailure;
use waypoints_core::{CompoundTag, Tag, WaypointError, WaypointList};

/// Load a waypoint file's top-level array. Entries that are not objects
/// (including `null`) are reported at their own position, like any other
/// malformed waypoint.
pub fn load_list(value: &Value) -> Result<(WaypointList, Vec<LoadFailure>), String> {
    let Value::Array(items) = value else {
        return Err(format!("expected an array of waypoints, found {}", type_name(value)));
    };

    let mut compounds = Vec::with_capacity(items.len());
    let mut failures = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match to_compound(item) {
            Some(compound) => compounds.push((index, compound)),
            None => failures.push(LoadFailure {
                index,
                error: WaypointError::WrongType {
                    field: "waypoints[]",
                    expected: "object",
                    found: type_name(item),
                },
            }),
        }
    }

    let (list, nested) = WaypointList::from_tags(compounds.iter().map(|(_, compound)| compound));
    failures.extend(nested.into_iter().map(|failure| LoadFailure {
        index: compounds[failure.index].0,
        error: failure.error,
    }));
    failures.sort_by_key(|failure| failure.index);
    Ok((list, failures))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert a JSON value. `null` has no tag counterpart and yields `None`;
/// inside nested arrays it is dropped.
pub fn to_tag(value: &Value) -> Option<Tag> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(Tag::Byte(i8::from(*b))),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(match i32::try_from(i) {
                    Ok(small) => Tag::Int(small),
                    Err(_) => Tag::Long(i),
                })
            } else {
                n.as_f64().map(Tag::Double)
            }
        }
        Value::String(s) => Some(Tag::String(s.clone())),
        Value::Array(items) => Some(Tag::List(items.iter().filter_map(to_tag).collect())),
        Value::Object(_) => to_compound(value).map(Tag::Compound),
    }
}

pub fn to_compound(value: &Value) -> Option<CompoundTag> {
    let Value::Object(map) = value else {
        return None;
    };
    let mut compound = CompoundTag::new();
    for (key, value) in map {
        if let Some(tag) = to_tag(value) {
            compound.put(key.as_str(), tag);
        }
    }
    Some(compound)
}

pub fn from_tag(tag: &Tag) -> Value {
    match tag {
        Tag::Byte(b) => Value::from(*b),
        Tag::Int(i) => Value::from(*i),
        Tag::Long(l) => Value::from(*l),
        Tag::Double(d) => Value::from(*d),
        Tag::String(s) => Value::from(s.as_str()),
        Tag::List(items) => Value::Array(items.iter().map(from_tag).collect()),
        Tag::Compound(compound) => from_compound(compound),
    }
}

pub fn from_compound(compound: &CompoundTag) -> Value {
    let map = compound
        .keys()
        .filter_map(|key| compound.get(key).map(|tag| (key.to_string(), from_tag(tag))))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_keep_their_kind() {
        assert_eq!(to_tag(&json!(5)), Some(Tag::Int(5)));
        assert_eq!(to_tag(&json!(5_000_000_000i64)), Some(Tag::Long(5_000_000_000)));
        assert_eq!(to_tag(&json!(1.5)), Some(Tag::Double(1.5)));
        assert_eq!(to_tag(&json!(null)), None);
    }

    #[test]
    fn test_object_drops_nulls() {
        let compound = to_compound(&json!({ "name": "Home", "material": null })).unwrap();
        assert_eq!(compound.len(), 1);
        assert_eq!(compound.get("name").and_then(Tag::as_str), Some("Home"));
        assert!(to_compound(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_load_list_reports_nulls_in_place() {
        let value = json!([
            null,
            { "type": "private", "name": "Home", "world": "world", "x": 0, "y": 64, "z": 0 },
            { "type": "private", "world": "world", "x": 0, "y": 64, "z": 0 },
        ]);
        let (list, failures) = load_list(&value).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].index, 0);
        assert!(matches!(
            failures[0].error,
            WaypointError::WrongType { found: "null", .. }
        ));
        assert_eq!(failures[1].index, 2);
        assert_eq!(failures[1].error, WaypointError::MissingField { field: "name" });
    }

    #[test]
    fn test_load_list_rejects_non_array_file() {
        assert!(load_list(&json!(null)).is_err());
        assert!(load_list(&json!({ "name": "Home" })).is_err());
        let (list, failures) = load_list(&json!([])).unwrap();
        assert!(list.is_empty() && failures.is_empty());
    }

    #[test]
    fn test_back_to_json() {
        let value = json!({ "name": "Home", "x": 1.5, "tags": ["a"] });
        let compound = to_compound(&value).unwrap();
        assert_eq!(from_compound(&compound), value);
    }
}
