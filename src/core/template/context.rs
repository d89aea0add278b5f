use crate::core::item::Item;
use serde_json::{Map, Value};

/// Reserved key under which the current item is exposed to templates.
pub const FILE_KEY: &str = "file";
/// Convenience key holding the item's basename.
pub const FILENAME_KEY: &str = "filename";

/// Values a header template is rendered against.
///
/// Built per item by layering, lowest precedence first: the item's own
/// `data` map, `filename`, the static template data, and finally the
/// reserved `file` key. Static data therefore never clobbers `file`.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    values: Map<String, Value>,
}

impl RenderContext {
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn for_item(static_data: &Map<String, Value>, item: &Item) -> Self {
        let mut values = item.data.clone();
        values.insert(FILENAME_KEY.to_string(), Value::String(item.basename()));
        for (key, value) in static_data {
            values.insert(key.clone(), value.clone());
        }
        values.insert(FILE_KEY.to_string(), item.context_value());
        Self { values }
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}
