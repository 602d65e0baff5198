//! Data grouping stage.
//!
//! Clusters items by a field, keeping groups in first-seen order and members
//! in their original relative order. Each group is emitted as a marker row
//! followed by its members.

use std::collections::HashMap;

use serde_json::Value;

use crate::binding::{is_truthy, lookup_field, value_to_string};
use crate::model::RowItem;

/// Wrap each item with its index in the source array.
pub fn index_items(items: &[Value]) -> Vec<RowItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, value)| RowItem::Data {
            index,
            value: value.clone(),
        })
        .collect()
}

/// Partition `items` by `item[group_by]` and interleave group markers.
///
/// Items whose group value is missing or falsy land in `unclassified`.
pub fn group_items(items: &[Value], group_by: &str, unclassified: &str) -> Vec<RowItem> {
    let mut order: Vec<(String, Vec<RowItem>)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for (index, item) in items.iter().enumerate() {
        let name = match lookup_field(item, group_by) {
            Some(v) if is_truthy(v) => value_to_string(v),
            _ => unclassified.to_string(),
        };
        let slot = *slots.entry(name.clone()).or_insert_with(|| {
            order.push((name, Vec::new()));
            order.len() - 1
        });
        order[slot].1.push(RowItem::Data {
            index,
            value: item.clone(),
        });
    }

    log::debug!("Grouped {} items by '{}' into {} groups", items.len(), group_by, order.len());

    let mut result = Vec::with_capacity(items.len() + order.len());
    for (name, members) in order {
        result.push(RowItem::Group { name });
        result.extend(members);
    }
    result
}
