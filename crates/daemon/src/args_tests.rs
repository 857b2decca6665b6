use super::*;

#[test]
fn defaults_apply_with_no_arguments() {
    let args = Args::parse_from(["ggdeploymentd"]);
    assert_eq!(args.queue_capacity, DEFAULT_CAPACITY);
    assert_eq!(args.log_level, "info");
    assert!(args.log_file.is_none());
}

#[test]
fn explicit_flags_override_defaults() {
    let args = Args::parse_from([
        "ggdeploymentd",
        "--root-path",
        "/tmp/ecd",
        "--queue-capacity",
        "25",
        "--log-level",
        "debug",
    ]);
    assert_eq!(args.root_path, PathBuf::from("/tmp/ecd"));
    assert_eq!(args.queue_capacity, 25);
    assert_eq!(args.log_level, "debug");
}
