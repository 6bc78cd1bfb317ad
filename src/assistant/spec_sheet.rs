use crate::model::CatalogRecord;
use crate::utils::humanize_key;
use serde_json::Value;

const HIDDEN_KEYS: [&str; 3] = ["displayName", "brand", "id"];

#[derive(Debug, Clone, PartialEq)]
pub struct SpecRow {
    pub label: String,
    pub value: String,
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Rows for every attribute worth showing, price included, in record order.
pub fn spec_rows(record: &CatalogRecord) -> Vec<SpecRow> {
    record
        .attributes
        .iter()
        .map(|(k, v)| (k.as_str(), v))
        .filter(|(key, _)| !HIDDEN_KEYS.contains(key))
        .filter_map(|(key, value)| {
            let value = render_value(value);
            if value.trim().is_empty() {
                return None;
            }
            Some(SpecRow {
                label: humanize_key(key),
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_attributes_for_display() {
        let record: CatalogRecord = serde_json::from_value(json!({
            "id": "mb-001",
            "displayName": "ASUS PRIME B650-PLUS",
            "brand": "ASUS",
            "price": 9500,
            "socket": "AM5",
            "memoryType": ["DDR5"],
            "wifi": false,
            "notes": "  ",
            "m2_slots": 2
        }))
        .unwrap();

        let rows = spec_rows(&record);
        let pairs: Vec<(&str, &str)> = rows.iter().map(|r| (r.label.as_str(), r.value.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("Price", "9500"),
                ("Socket", "AM5"),
                ("Memory Type", "DDR5"),
                ("Wifi", "No"),
                ("M2 Slots", "2"),
            ]
        );
    }

    #[test]
    fn price_keeps_its_place_in_record_order() {
        let record: CatalogRecord = serde_json::from_value(json!({
            "displayName": "Corsair RM750e",
            "wattage": 750,
            "efficiency": "80+ Gold",
            "price": "5,500",
            "modular": true
        }))
        .unwrap();

        let labels: Vec<String> = spec_rows(&record).into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Wattage", "Efficiency", "Price", "Modular"]);
    }
}
