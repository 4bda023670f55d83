//! Admin CRUD. Every mutation rewrites the whole collection through
//! [`ContentState::modify`], which issues a single save.

use serde_json::Value as JsonValue;

use crate::app::content_state::ContentState;
use crate::app::error::ContentError;
use crate::domain::model::{next_record_id, with_collection, Collection, CollectionKind, Record};

/// Appends `record` with a fresh timestamp id and returns that id.
///
/// Two creates within the same millisecond would collide, so the id is bumped
/// until it is unused in the collection.
pub async fn create<C: Collection>(
    state: &ContentState,
    mut record: C::Item,
) -> Result<i64, ContentError> {
    let mut assigned = next_record_id();
    state
        .modify::<C>(|items| {
            while items.iter().any(|r| r.id() == assigned) {
                assigned += 1;
            }
            record.set_id(assigned);
            items.push(record);
            true
        })
        .await?;
    Ok(assigned)
}

/// Replaces the record with `id` in place, keeping its position.
pub async fn update<C: Collection>(
    state: &ContentState,
    id: i64,
    mut record: C::Item,
) -> Result<(), ContentError> {
    record.set_id(id);
    let found = state
        .modify::<C>(move |items| match items.iter_mut().find(|r| r.id() == id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        })
        .await?;
    if !found {
        return Err(ContentError::RecordNotFound { kind: C::KIND, id });
    }
    Ok(())
}

pub async fn delete<C: Collection>(state: &ContentState, id: i64) -> Result<(), ContentError> {
    let removed = state
        .modify::<C>(move |items| {
            let before = items.len();
            items.retain(|r| r.id() != id);
            items.len() != before
        })
        .await?;
    if !removed {
        return Err(ContentError::RecordNotFound { kind: C::KIND, id });
    }
    Ok(())
}

// Runtime-kind variants used by the HTTP layer.

pub async fn create_value(
    state: &ContentState,
    kind: CollectionKind,
    record: JsonValue,
) -> Result<i64, ContentError> {
    with_collection!(kind, C => {
        let record = parse_record::<C>(kind, record)?;
        create::<C>(state, record).await
    })
}

pub async fn update_value(
    state: &ContentState,
    kind: CollectionKind,
    id: i64,
    record: JsonValue,
) -> Result<(), ContentError> {
    with_collection!(kind, C => {
        let record = parse_record::<C>(kind, record)?;
        update::<C>(state, id, record).await
    })
}

pub async fn delete_value(
    state: &ContentState,
    kind: CollectionKind,
    id: i64,
) -> Result<(), ContentError> {
    with_collection!(kind, C => delete::<C>(state, id).await)
}

/// Parses a record body. A missing `id` is allowed; it gets assigned.
fn parse_record<C: Collection>(kind: CollectionKind, mut record: JsonValue) -> Result<C::Item, ContentError> {
    if let Some(obj) = record.as_object_mut() {
        obj.entry("id").or_insert(JsonValue::from(0));
    }
    serde_json::from_value(record).map_err(|source| ContentError::InvalidPayload { kind, source })
}
