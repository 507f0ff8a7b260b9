//! Loading a real analytics plugin
//!
//! The `edgeward-mask-analytics` workspace member is built once per test run
//! into its own target directory and loaded through the public loader.

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use std::thread;

use edgeward::analytics::{AnalyticsProcessor, AnalyticsRecord};
use edgeward::config::AnalyticsPluginConfig;
use edgeward::plugins::{load_analytics_handler, LoadError};

fn mask_plugin() -> &'static Path {
    static PLUGIN: OnceLock<PathBuf> = OnceLock::new();
    PLUGIN.get_or_init(build_mask_plugin)
}

fn build_mask_plugin() -> PathBuf {
    // A separate target directory avoids waiting on the lock held by the
    // running `cargo test`.
    let target_dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("plugins");
    let profile = if cfg!(debug_assertions) { "debug" } else { "release" };

    let mut cmd = Command::new(env!("CARGO"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["build", "--quiet", "-p", "edgeward-mask-analytics", "--target-dir"])
        .arg(&target_dir);
    if !cfg!(debug_assertions) {
        cmd.arg("--release");
    }

    let status = cmd.status().expect("failed to run cargo");
    assert!(status.success(), "building the mask-analytics plugin failed");

    let library = target_dir
        .join(profile)
        .join(format!("{}mask_analytics{}", DLL_PREFIX, DLL_SUFFIX));
    assert!(library.exists(), "plugin not found at {}", library.display());
    library
}

fn record_with_key(key: &str) -> AnalyticsRecord {
    AnalyticsRecord {
        method: "GET".to_string(),
        api_key: key.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_resolved_handler_behaves_the_same_on_every_call() {
    let handler = load_analytics_handler(mask_plugin(), "MaskAnalyticsData").unwrap();
    assert_eq!(handler.symbol(), "MaskAnalyticsData");
    assert_eq!(handler.path(), mask_plugin());

    for _ in 0..3 {
        let mut record = record_with_key("secret");
        handler.call(&mut record);
        assert_eq!(record.api_key, "masked");
        assert_eq!(record.method, "GET");
        assert_eq!(record.tags, vec!["masked".to_string()]);
    }
}

#[test]
fn test_handler_is_shared_between_threads() {
    let handler = load_analytics_handler(mask_plugin(), "MaskAnalyticsData").unwrap();

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let handler = handler.clone();
            thread::spawn(move || {
                let mut record = record_with_key(&format!("key-{}", i));
                handler.call(&mut record);
                record
            })
        })
        .collect();

    for worker in workers {
        let record = worker.join().unwrap();
        assert_eq!(record.api_key, "masked");
    }
}

#[test]
fn test_loading_the_same_plugin_twice() {
    let first = load_analytics_handler(mask_plugin(), "MaskAnalyticsData").unwrap();
    let second = load_analytics_handler(mask_plugin(), "MaskAnalyticsData").unwrap();

    let mut record = record_with_key("secret");
    first.call(&mut record);
    second.call(&mut record);
    assert_eq!(record.api_key, "masked");
    assert_eq!(record.tags.len(), 2);
}

#[test]
fn test_absent_symbol_in_plugin_is_not_found() {
    let err = load_analytics_handler(mask_plugin(), "Nope").unwrap_err();
    match err {
        LoadError::SymbolNotFound { path, symbol, .. } => {
            assert_eq!(symbol, "Nope");
            assert_eq!(path, mask_plugin());
        }
        other => panic!("expected missing symbol, got {:?}", other),
    }
}

#[test]
fn test_plain_c_export_is_signature_mismatch() {
    let err = load_analytics_handler(mask_plugin(), "mask_analytics_version").unwrap_err();
    match err {
        LoadError::SignatureMismatch { found, .. } => assert_eq!(found, "not an exported descriptor"),
        other => panic!("expected signature mismatch, got {:?}", other),
    }
}

#[test]
fn test_processor_runs_configured_plugin() {
    let config = AnalyticsPluginConfig {
        enabled: true,
        plugin_path: mask_plugin().to_path_buf(),
        func_name: "MaskAnalyticsData".to_string(),
    };

    let processor = AnalyticsProcessor::try_from_config(&config).unwrap();
    assert!(processor.is_active());

    let mut record = record_with_key("secret");
    processor.process(&mut record);
    assert_eq!(record.api_key, "masked");
}
