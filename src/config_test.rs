use std::sync::Mutex;

use super::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// # Safety
/// Callers must hold `ENV_LOCK` to avoid env races.
unsafe fn clear_raslan_env() {
    unsafe {
        std::env::remove_var("RASLAN_API_URL");
        std::env::remove_var("RASLAN_CHAT_PATH");
        std::env::remove_var("RASLAN_MODEL");
        std::env::remove_var("RASLAN_MAX_TOKENS");
    }
}

#[test]
fn from_env_uses_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_raslan_env() };

    let cfg = RaslanConfig::from_env().unwrap();
    assert_eq!(cfg, RaslanConfig::default());
    assert_eq!(cfg.health_url(), "http://localhost:8000/api/core/health/");
    assert_eq!(cfg.chat_url(), "http://localhost:8000/api/core/chat/");
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_raslan_env();
        std::env::set_var("RASLAN_API_URL", "http://127.0.0.1:8000/api/core/");
        std::env::set_var("RASLAN_CHAT_PATH", "anthropic/");
        std::env::set_var("RASLAN_MODEL", "claude-test");
        std::env::set_var("RASLAN_MAX_TOKENS", "256");
    }

    let cfg = RaslanConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "http://127.0.0.1:8000/api/core");
    assert_eq!(cfg.chat_url(), "http://127.0.0.1:8000/api/core/anthropic/");
    assert_eq!(cfg.model, "claude-test");
    assert_eq!(cfg.max_tokens, 256);

    unsafe { clear_raslan_env() };
}

#[test]
fn from_env_rejects_bad_max_tokens() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_raslan_env();
        std::env::set_var("RASLAN_MAX_TOKENS", "lots");
    }

    let err = RaslanConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("RASLAN_MAX_TOKENS"));
    assert!(err.contains("lots"));

    unsafe { clear_raslan_env() };
}

#[test]
fn parse_max_tokens_rejects_zero() {
    assert!(parse_max_tokens("0").is_err());
    assert_eq!(parse_max_tokens(" 42 ").unwrap(), 42);
}
