use super::*;
use crate::config::ConfigError;
use tempfile::TempDir;

#[tokio::test]
async fn search_rejects_out_of_range_limit() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let config = Config {
        base_dir: temp_dir.path().to_path_buf(),
        ..Config::default()
    };

    for limit in [0, 51] {
        let error = search_once(config.clone(), "apply for IPO", Some(limit), false)
            .await
            .expect_err("limit should be rejected");

        assert!(matches!(
            error.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidTopK(k)) if *k == limit
        ));
    }
    assert!(!config.cache_file_path().exists());
}
