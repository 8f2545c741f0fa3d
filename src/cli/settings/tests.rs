use super::handlers::{
    http_endpoint_handler, ws_endpoint_handler, PageSizeHandler, ThemeHandler, UserEnvHandler,
};
use super::*;
use crate::core::theme::ThemeVariant;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn registry_lists_keys_in_display_order() {
    let registry = SettingRegistry::new();
    assert_eq!(
        registry.keys_display_order(),
        &["http-endpoint", "ws-endpoint", "theme", "page-size", "user-env"]
    );
    assert!(registry.get("default-model").is_none());
}

#[test]
fn http_endpoint_is_validated_and_normalized() {
    let mut config = Config::default();
    let handler = http_endpoint_handler();

    let message = handler
        .set(&args(&["https://chat.example.com/"]), &mut config)
        .expect("valid endpoint");
    assert!(message.contains("https://chat.example.com"));
    assert_eq!(
        config.http_endpoint.as_deref(),
        Some("https://chat.example.com")
    );

    let err = handler
        .set(&args(&["chat.example.com"]), &mut config)
        .expect_err("scheme required");
    assert!(matches!(err, SettingError::InvalidValue { key: "http-endpoint", .. }));

    let err = handler
        .set(&args(&["wss://chat.example.com"]), &mut config)
        .expect_err("websocket scheme is not an http endpoint");
    assert!(matches!(err, SettingError::InvalidValue { .. }));

    handler.unset(None, &mut config).unwrap();
    assert!(config.http_endpoint.is_none());
    assert!(handler.format(&config).contains("(unset"));
}

#[test]
fn ws_endpoint_accepts_websocket_schemes() {
    let mut config = Config::default();
    ws_endpoint_handler()
        .set(&args(&["wss://socket.example.com"]), &mut config)
        .expect("wss endpoint");
    assert_eq!(
        config.ws_endpoint.as_deref(),
        Some("wss://socket.example.com")
    );
    assert_eq!(
        ws_endpoint_handler().format(&config),
        "  ws-endpoint: wss://socket.example.com"
    );
}

#[test]
fn theme_rejects_unknown_variants() {
    let mut config = Config::default();
    let handler = ThemeHandler;

    handler.set(&args(&["Light"]), &mut config).unwrap();
    assert_eq!(config.theme, Some(ThemeVariant::Light));

    let err = handler.set(&args(&["solarized"]), &mut config).unwrap_err();
    assert!(err.to_string().contains("solarized"));
    assert_eq!(config.theme, Some(ThemeVariant::Light));

    let err = handler.set(&[], &mut config).unwrap_err();
    assert!(matches!(err, SettingError::MissingArgs { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn page_size_must_be_positive() {
    let mut config = Config::default();
    let handler = PageSizeHandler;

    assert!(handler.set(&args(&["0"]), &mut config).is_err());
    assert!(handler.set(&args(&["-3"]), &mut config).is_err());
    assert!(handler.set(&args(&["ten"]), &mut config).is_err());
    assert_eq!(config.page_size, None);

    handler.set(&args(&["50"]), &mut config).unwrap();
    assert_eq!(config.page_size, Some(50));
    assert_eq!(handler.format(&config), "  page-size: 50");
}

#[test]
fn user_env_sets_and_unsets_named_variables() {
    let mut config = Config::default();
    let handler = UserEnvHandler;

    handler
        .set(&args(&["OPENAI_API_KEY=sk-a=b"]), &mut config)
        .unwrap();
    handler.set(&args(&["ORG=acme"]), &mut config).unwrap();
    assert_eq!(
        config.user_env.get("OPENAI_API_KEY").map(String::as_str),
        Some("sk-a=b")
    );

    let shown = handler.format(&config);
    assert!(shown.contains("OPENAI_API_KEY: (set)"));
    assert!(!shown.contains("sk-a=b"));

    assert!(handler.set(&args(&["NO_EQUALS"]), &mut config).is_err());
    assert!(handler.set(&args(&["=value"]), &mut config).is_err());

    handler.unset(Some("ORG"), &mut config).unwrap();
    assert!(!config.user_env.contains_key("ORG"));
    let message = handler.unset(Some("ORG"), &mut config).unwrap();
    assert!(message.contains("was not set"));

    handler.unset(None, &mut config).unwrap();
    assert!(config.user_env.is_empty());
}

#[test]
fn format_all_covers_every_key() {
    let registry = SettingRegistry::new();
    let lines = registry.format_all(&Config::default());
    assert_eq!(lines.len(), registry.keys_display_order().len());
    assert!(lines[0].starts_with("  http-endpoint:"));
    assert_eq!(lines[4], "  user-env: (none set)");
}
