use std::collections::HashMap;

pub const DEFAULT_APP_NAME: &str = "나라장터 입찰공고";

/// The bundled web server listens here by default
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

pub const DEFAULT_EXPORT_FILENAME: &str = "나라장터_입찰공고_{{ timestamp }}.xlsx";

/// Bid type codes accepted by the search endpoint, with their display labels
pub const BID_TYPES: &[(&str, &str)] = &[
    ("all", "전체"),
    ("servc", "용역"),
    ("cnstwk", "건설공사"),
    ("thng", "물품"),
];

/// Agency filter value meaning "no filter"
pub const ALL_AGENCIES: &str = "all";

/// Default keybindings for the application, command name -> key
pub fn default_keybindings() -> HashMap<String, String> {
    let mut bindings = HashMap::new();

    // Global
    bindings.insert("quit".to_string(), "q".to_string());
    bindings.insert("search".to_string(), "/".to_string());

    // Navigation
    bindings.insert("down".to_string(), "j".to_string());
    bindings.insert("up".to_string(), "k".to_string());
    bindings.insert("top".to_string(), "g".to_string());
    bindings.insert("bottom".to_string(), "G".to_string());

    // Selection
    bindings.insert("toggle_row".to_string(), "space".to_string());
    bindings.insert("toggle_all".to_string(), "a".to_string());
    bindings.insert("select_all".to_string(), "A".to_string());

    // Remote actions
    bindings.insert("delete".to_string(), "d".to_string());
    bindings.insert("export".to_string(), "e".to_string());

    bindings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keybindings_are_unique() {
        let bindings = default_keybindings();
        let mut keys: Vec<&String> = bindings.values().collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), bindings.len());
    }

    #[test]
    fn test_bid_types_start_with_all() {
        assert_eq!(BID_TYPES[0].0, "all");
        assert_eq!(BID_TYPES.len(), 4);
    }
}
