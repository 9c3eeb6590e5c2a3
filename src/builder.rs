use std::num::NonZeroU32;
use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::catalog::ScreenCatalog;
use crate::document::{ScreenSlot, ScreenSpec, check_shape, load_schedule_document, normalize};
use crate::error::ScheduleError;
use crate::schedule::{AlternateSchedule, ScheduleEntry, ScreenScheduler};

/// Reads, validates and builds a scheduler from a schedule document on disk.
pub fn load_scheduler(
    path: impl AsRef<Path>,
    catalog: &ScreenCatalog,
) -> Result<ScreenScheduler, ScheduleError> {
    let document = load_schedule_document(path)?;
    build_scheduler(&document, catalog)
}

/// Validates an already parsed document and returns a scheduler with its cursor at zero.
pub fn build_scheduler(
    document: &Value,
    catalog: &ScreenCatalog,
) -> Result<ScreenScheduler, ScheduleError> {
    check_shape(document)?;
    let slots = normalize(document);
    let entries = build_entries(&slots, catalog)?;
    Ok(ScreenScheduler::new(entries))
}

/// Turns flattened slots into schedule entries, dropping disabled (frequency zero) slots.
pub fn build_entries(
    slots: &[ScreenSlot],
    catalog: &ScreenCatalog,
) -> Result<Vec<ScheduleEntry>, ScheduleError> {
    let mut entries = Vec::with_capacity(slots.len());

    for slot in slots {
        if !catalog.is_known_id(&slot.id) {
            return Err(ScheduleError::UnknownScreen(slot.id.clone()));
        }

        let (raw_frequency, alternate) = match &slot.spec {
            ScreenSpec::Bare(value) => (value, None),
            ScreenSpec::Detailed { frequency, alt } => {
                let Some(frequency) = frequency else {
                    return Err(ScheduleError::InvalidFrequency {
                        screen: slot.id.clone(),
                        reason: "must be provided",
                    });
                };
                let alternate = alt
                    .as_ref()
                    .map(|alt| parse_alternate(&slot.id, alt, catalog))
                    .transpose()?;
                (frequency, alternate)
            }
        };

        let frequency = parse_frequency(&slot.id, raw_frequency)?;
        let Some(frequency) = NonZeroU32::new(frequency) else {
            debug!(screen = %slot.id, "frequency is zero; screen disabled");
            continue;
        };

        let mut entry = ScheduleEntry::new(slot.id.clone(), frequency);
        if let Some(alternate) = alternate {
            entry = entry.with_alternate(alternate);
        }
        entries.push(entry);
    }

    if entries.is_empty() {
        return Err(ScheduleError::NoEnabledScreens);
    }
    Ok(entries)
}

fn parse_frequency(screen: &str, raw: &Value) -> Result<u32, ScheduleError> {
    let invalid = |reason| ScheduleError::InvalidFrequency {
        screen: screen.to_owned(),
        reason,
    };
    let value = parse_integer(raw).ok_or_else(|| invalid("must be an integer"))?;
    if value < 0 {
        return Err(invalid("cannot be negative"));
    }
    u32::try_from(value).map_err(|_| invalid("is too large"))
}

fn parse_alternate(
    screen: &str,
    alt: &Value,
    catalog: &ScreenCatalog,
) -> Result<AlternateSchedule, ScheduleError> {
    let malformed = |reason: String| ScheduleError::MalformedAlternate {
        screen: screen.to_owned(),
        reason,
    };
    let Some(alt) = alt.as_mapping() else {
        return Err(malformed("must be an object".into()));
    };

    let screen_ids = match alt.get("screen") {
        Some(Value::String(id)) => vec![id.clone()],
        Some(Value::Sequence(list)) => {
            if list.is_empty() {
                return Err(malformed("screen list cannot be empty".into()));
            }
            list.iter()
                .enumerate()
                .map(|(index, item)| {
                    item.as_str().map(str::to_owned).ok_or_else(|| {
                        malformed(format!("screen id at index {index} must be a string"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        _ => {
            return Err(malformed(
                "screen must be a string or list of strings".into(),
            ));
        }
    };

    if let Some(unknown) = screen_ids.iter().find(|id| !catalog.is_known_id(id)) {
        return Err(ScheduleError::UnknownAlternate {
            screen: screen.to_owned(),
            alternate: unknown.clone(),
        });
    }

    let invalid = |reason| ScheduleError::InvalidAlternateFrequency {
        screen: screen.to_owned(),
        reason,
    };
    let frequency = alt
        .get("frequency")
        .and_then(parse_integer)
        .ok_or_else(|| invalid("must be an integer"))?;
    if frequency < 0 {
        return Err(invalid("cannot be negative"));
    }
    let frequency = u32::try_from(frequency).map_err(|_| invalid("is too large"))?;
    let frequency = NonZeroU32::new(frequency).ok_or_else(|| invalid("must be greater than zero"))?;

    AlternateSchedule::new(screen_ids, frequency)
        .ok_or_else(|| malformed("screen list cannot be empty".into()))
}

/// Integers, integral floats and numeric strings are accepted; everything else is not.
fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}
