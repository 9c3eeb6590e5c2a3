//! Schedule documents and their normalisation into an ordered list of screen slots.
//!
//! A document is either a flat `screens` mapping or an ordered `groups` list whose members
//! each carry their own `screens` mapping. Both shapes flatten into the same `Vec<ScreenSlot>`
//! so the builder only ever sees one layout. Mapping order is preserved for both JSON and
//! YAML sources.

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::ScheduleError;

/// Parsed form of the value attached to a screen id.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenSpec {
    /// `date: 2` or `date: "2"`; the value is the frequency itself.
    Bare(Value),
    /// `date: { frequency: 2, alt: {...} }`.
    Detailed {
        frequency: Option<Value>,
        alt: Option<Value>,
    },
}

impl ScreenSpec {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Mapping(map) => Self::Detailed {
                frequency: map.get("frequency").cloned(),
                alt: map.get("alt").filter(|alt| !alt.is_null()).cloned(),
            },
            other => Self::Bare(other.clone()),
        }
    }
}

/// One `(id, spec)` pair from the flattened document.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSlot {
    pub id: String,
    pub spec: ScreenSpec,
    /// Name of the group the slot came from, when the document used `groups`.
    pub group: Option<String>,
}

/// Reads a schedule document from disk. `.json` files go through `serde_json`, anything else
/// is read as YAML.
pub fn load_schedule_document(path: impl AsRef<Path>) -> Result<Value, ScheduleError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&raw)?)
    } else {
        Ok(serde_yaml::from_str(&raw)?)
    }
}

/// Rejects documents that are not a mapping or that carry no screen source at all.
pub fn check_shape(document: &Value) -> Result<(), ScheduleError> {
    let Some(root) = document.as_mapping() else {
        return Err(ScheduleError::MalformedDocument(
            "schedule configuration must be an object".into(),
        ));
    };
    if root.get("groups").is_none() && root.get("screens").is_none() {
        return Err(ScheduleError::MalformedDocument(
            "expected a 'screens' mapping or a 'groups' list".into(),
        ));
    }
    Ok(())
}

/// Flattens a document into ordered slots.
///
/// `groups` wins over `screens` when both are present. Ill-typed sources yield an empty list
/// rather than an error; the builder reports that as "no enabled screens". A screen id that
/// appears more than once keeps its first position and takes the last value.
pub fn normalize(document: &Value) -> Vec<ScreenSlot> {
    let mut slots = Vec::new();
    let Some(root) = document.as_mapping() else {
        return slots;
    };

    if let Some(groups) = root.get("groups") {
        let Some(groups) = groups.as_sequence() else {
            warn!("'groups' is not a list; no screens loaded");
            return slots;
        };
        for (index, group) in groups.iter().enumerate() {
            let Some(group) = group.as_mapping() else {
                warn!(index, "schedule group is not an object; skipping");
                continue;
            };
            let name = group.get("name").and_then(Value::as_str).map(str::to_owned);
            match group.get("screens") {
                None | Some(Value::Null) => continue,
                Some(Value::Mapping(screens)) => {
                    push_screens(&mut slots, screens, name.as_deref());
                }
                Some(_) => {
                    warn!(index, group = ?name, "group 'screens' is not a mapping; skipping");
                }
            }
        }
    } else if let Some(screens) = root.get("screens").and_then(Value::as_mapping) {
        push_screens(&mut slots, screens, None);
    }

    slots
}

fn push_screens(slots: &mut Vec<ScreenSlot>, screens: &Mapping, group: Option<&str>) {
    for (key, value) in screens {
        let id = render_key(key);
        let spec = ScreenSpec::from_value(value);
        if let Some(existing) = slots.iter_mut().find(|slot| slot.id == id) {
            warn!(screen = %id, ?group, "screen listed more than once; later entry wins");
            existing.spec = spec;
            existing.group = group.map(str::to_owned);
            continue;
        }
        slots.push(ScreenSlot {
            id,
            spec,
            group: group.map(str::to_owned),
        });
    }
}

fn render_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_owned(),
        _ => "<non-scalar key>".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(input: &str) -> Value {
        serde_yaml::from_str(input).expect("valid yaml")
    }

    fn ids(slots: &[ScreenSlot]) -> Vec<&str> {
        slots.iter().map(|slot| slot.id.as_str()).collect()
    }

    #[test]
    fn flat_screens_keep_document_order() {
        let doc = yaml("screens:\n  travel: 2\n  date: 1\n  inside: 3\n");
        let slots = normalize(&doc);
        assert_eq!(ids(&slots), ["travel", "date", "inside"]);
        assert!(slots.iter().all(|slot| slot.group.is_none()));
    }

    #[test]
    fn bare_and_detailed_specs_are_tagged() {
        let doc = yaml(
            r#"
screens:
  date: "2"
  travel:
    frequency: 3
    alt: ~
"#,
        );
        let slots = normalize(&doc);
        assert_eq!(slots[0].spec, ScreenSpec::Bare(Value::String("2".into())));
        assert_eq!(
            slots[1].spec,
            ScreenSpec::Detailed {
                frequency: Some(Value::Number(3.into())),
                alt: None,
            }
        );
    }

    #[test]
    fn duplicate_ids_collapse_to_first_position() {
        let doc = yaml(
            r#"
groups:
  - name: a
    screens:
      date: 1
      time: 2
  - name: b
    screens:
      date: 4
"#,
        );
        let slots = normalize(&doc);
        assert_eq!(ids(&slots), ["date", "time"]);
        assert_eq!(slots[0].spec, ScreenSpec::Bare(Value::Number(4.into())));
        assert_eq!(slots[0].group.as_deref(), Some("b"));
    }

    #[test]
    fn ill_typed_groups_yield_nothing() {
        assert!(normalize(&yaml("groups: {a: 1}\nscreens: {date: 1}\n")).is_empty());
        assert!(normalize(&yaml("screens: [date]\n")).is_empty());
        assert!(normalize(&yaml("- date\n")).is_empty());
    }

    #[test]
    fn shape_check_requires_a_screen_source() {
        assert!(check_shape(&yaml("{}")).is_err());
        assert!(check_shape(&yaml("[1, 2]")).is_err());
        assert!(check_shape(&yaml("screens: {}")).is_ok());
        assert!(check_shape(&yaml("groups: []")).is_ok());
    }
}
