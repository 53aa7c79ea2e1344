use serde_json::Value;

use super::cell_text;

/// Headline field per command, checked in order.
const HEADLINE_KEYS: [&str; 14] = [
    "status",
    "intrinsic_value_per_share",
    "base_case_value",
    "spread",
    "risk_score",
    "average_correlation",
    "amount",
    "cagr_pct",
    "roi_pct",
    "pe_ratio",
    "emi",
    "margin_pct",
    "ratio",
    "units",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let headline = HEADLINE_KEYS
                .iter()
                .find_map(|k| map.get(*k).filter(|v| !v.is_null()));
            match headline {
                Some(val) => println!("{}", cell_text(val)),
                None => {
                    if let Some((key, val)) = map.iter().next() {
                        println!("{key}: {}", cell_text(val));
                    }
                }
            }
        }
        // Search hits: one symbol per line.
        Value::Array(items) => {
            for item in items {
                match item.get("symbol") {
                    Some(sym) => println!("{}", cell_text(sym)),
                    None => println!("{}", cell_text(item)),
                }
            }
        }
        other => println!("{}", cell_text(other)),
    }
}
