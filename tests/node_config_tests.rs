use datadock::datadock_node::config::{load_node_config, NodeConfig};
use std::env;
use std::path::PathBuf;

#[test]
fn default_data_dir() {
    let config = NodeConfig::default();
    assert_eq!(config.data_dir, PathBuf::from("data"));
}

#[test]
fn default_when_file_missing() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("missing.json");
    let config = load_node_config(missing.to_str()).unwrap();
    assert_eq!(config.data_dir, PathBuf::from("data"));
}

#[test]
fn reads_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("node_config.json");
    std::fs::write(&path, r#"{"data_dir": "/var/lib/datadock"}"#).unwrap();
    let config = load_node_config(path.to_str()).unwrap();
    assert_eq!(config.data_dir, PathBuf::from("/var/lib/datadock"));
}

#[test]
fn unparseable_config_is_invalid_data() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("node_config.json");
    std::fs::write(&path, "data_dir = nope").unwrap();
    let err = load_node_config(path.to_str()).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn env_var_points_at_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("env_config.json");
    std::fs::write(&path, r#"{"data_dir": "env_docs"}"#).unwrap();
    env::set_var("NODE_CONFIG", path.to_str().unwrap());
    let config = load_node_config(None).unwrap();
    env::remove_var("NODE_CONFIG");
    assert_eq!(config.data_dir, PathBuf::from("env_docs"));
}
