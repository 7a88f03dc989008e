use crate::search::config::{ConfigError, KnowledgeLevel, SearchConfig};

#[test]
fn default_yaml_matches_default_struct() {
    let config = SearchConfig::from_default_yaml().expect("default yaml should parse");
    assert_eq!(config, SearchConfig::default());
    assert_eq!(config.max_depth, 100);
    assert_eq!(config.knowledge.tree_level, KnowledgeLevel::Legal);
}

#[test]
fn partial_yaml_keeps_defaults_for_missing_fields() {
    let config = SearchConfig::from_yaml_str(
        "num_simulations: 50\nuse_rave: true\nknowledge:\n  rollout_level: smart\n",
    )
    .expect("partial yaml should parse");

    assert_eq!(config.num_simulations, 50);
    assert!(config.use_rave);
    assert_eq!(config.knowledge.rollout_level, KnowledgeLevel::Smart);
    assert_eq!(config.knowledge.smart_tree_count, 10);
    assert_eq!(config.num_start_states, 1000);
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        "num_simulations: 0",
        "num_start_states: 0",
        "max_depth: 0",
        "exploration_constant: -1.0",
        "rave_discount: 0.0",
        "rave_discount: 1.5",
        "rave_constant: -0.1",
        "node_capacity: 0",
    ];

    for yaml in cases {
        match SearchConfig::from_yaml_str(yaml) {
            Err(ConfigError::Invalid(_)) => {}
            other => panic!("`{yaml}` should be invalid, got {other:?}"),
        }
    }
}

#[test]
fn malformed_yaml_reports_a_parse_error() {
    let err = SearchConfig::from_yaml_str("num_simulations: [").expect_err("yaml is malformed");
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn missing_file_reports_an_io_error() {
    let err = SearchConfig::from_yaml_path("/definitely/not/here.yaml")
        .expect_err("file does not exist");
    assert!(matches!(err, ConfigError::Io(_)));
}
