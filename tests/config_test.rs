use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use vet_console::{
    Config, ConfigError, ConsoleState, PagePolicy, PurchaseMode, purchase::WizardStep,
};

#[test]
fn defaults_match_the_local_backend() {
    let config = Config::default();

    assert_eq!(config.api_base_url, "http://127.0.0.1:8000/api");
    assert_eq!(config.purchase_close_delay, Duration::from_millis(1500));
    assert_eq!(config.purchase_mode, PurchaseMode::Saga);
    assert_eq!(config.page_policy, PagePolicy::Clamp);
    assert_eq!(config.session_file(), PathBuf::from("data").join("session.json"));
    assert_eq!(
        config.purchase_ledger_file(),
        PathBuf::from("data").join("purchases.json")
    );
}

#[tokio::test]
async fn console_state_wires_config_into_screens() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = Config {
        data_path: dir.path().to_path_buf(),
        purchase_mode: PurchaseMode::Sequential,
        page_policy: PagePolicy::Unclamped,
        ..Config::default()
    };
    let state = ConsoleState::new(config);

    let view = state.list_view::<vet_console::models::Sale>();
    assert_eq!(view.policy(), PagePolicy::Unclamped);
    assert_eq!(view.page_size(), 8);

    let wizard = state.purchase_wizard();
    assert_eq!(wizard.mode(), PurchaseMode::Sequential);
    assert_eq!(wizard.step(), WizardStep::Closed);

    let ledger = state.open_ledger().await.expect("open ledger");
    assert!(ledger.intents().is_empty());

    let session = state.session().await.expect("init session");
    assert!(!session.is_authenticated().await);
}

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |var: &str| vars.get(var).cloned()
}

#[test]
fn environment_values_override_defaults() {
    let config = Config::from_lookup(lookup(&[
        ("API_BASE_URL", "https://clinic.example.com/api/"),
        ("DATA_PATH", "/var/lib/vet-console"),
        ("PURCHASE_CLOSE_DELAY_MS", " 250 "),
        ("PURCHASE_MODE", "sequential"),
        ("PAGE_POLICY", "legacy"),
    ]))
    .expect("valid config");

    assert_eq!(config.api_base_url, "https://clinic.example.com/api");
    assert_eq!(config.data_path, PathBuf::from("/var/lib/vet-console"));
    assert_eq!(config.purchase_close_delay, Duration::from_millis(250));
    assert_eq!(config.purchase_mode, PurchaseMode::Sequential);
    assert_eq!(config.page_policy, PagePolicy::Unclamped);
}

#[test]
fn invalid_values_are_config_errors() {
    assert!(matches!(
        Config::from_lookup(lookup(&[("API_BASE_URL", "ftp://clinic")])),
        Err(ConfigError::Invalid { var: "API_BASE_URL", .. })
    ));
    assert!(matches!(
        Config::from_lookup(lookup(&[("API_BASE_URL", "not a url")])),
        Err(ConfigError::Invalid { var: "API_BASE_URL", .. })
    ));
    assert_eq!(
        Config::from_lookup(lookup(&[("DATA_PATH", "  ")])).err(),
        Some(ConfigError::Empty("DATA_PATH"))
    );
    assert!(matches!(
        Config::from_lookup(lookup(&[("PURCHASE_CLOSE_DELAY_MS", "soon")])),
        Err(ConfigError::Invalid { var: "PURCHASE_CLOSE_DELAY_MS", value, .. }) if value == "soon"
    ));
    assert!(matches!(
        Config::from_lookup(lookup(&[("PURCHASE_MODE", "rollback")])),
        Err(ConfigError::Invalid { var: "PURCHASE_MODE", .. })
    ));
    assert!(matches!(
        Config::from_lookup(lookup(&[("PAGE_POLICY", "sticky")])),
        Err(ConfigError::Invalid { var: "PAGE_POLICY", .. })
    ));
}
