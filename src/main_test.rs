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
fn no_flags_or_env_gives_default_config() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_raslan_env() };

    let cli = Cli::try_parse_from(["raslan"]).unwrap();
    assert_eq!(resolve_config(&cli), RaslanConfig::default());
    assert!(cli.command.is_none());
}

#[test]
fn env_fills_in_missing_flags() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_raslan_env();
        std::env::set_var("RASLAN_API_URL", "http://proxy.test/api/core/");
        std::env::set_var("RASLAN_MAX_TOKENS", "256");
    }

    let cli = Cli::try_parse_from(["raslan", "health"]).unwrap();
    let config = resolve_config(&cli);
    unsafe { clear_raslan_env() };

    assert_eq!(config.base_url, "http://proxy.test/api/core");
    assert_eq!(config.max_tokens, 256);
    assert_eq!(config.chat_path, config::DEFAULT_CHAT_PATH);
}

#[test]
fn flags_override_env() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_raslan_env();
        std::env::set_var("RASLAN_MODEL", "from-env");
        std::env::set_var("RASLAN_CHAT_PATH", "/chat/");
    }

    let cli = Cli::try_parse_from(["raslan", "--model", "from-flag", "--chat-path", "anthropic/"]).unwrap();
    let config = resolve_config(&cli);
    unsafe { clear_raslan_env() };

    assert_eq!(config.model, "from-flag");
    assert_eq!(config.chat_path, "/anthropic/");
}

#[test]
fn bad_max_tokens_from_env_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_raslan_env();
        std::env::set_var("RASLAN_MAX_TOKENS", "0");
    }

    let parsed = Cli::try_parse_from(["raslan"]);
    unsafe { clear_raslan_env() };

    assert!(parsed.is_err());
}

#[test]
fn ask_joins_trailing_words() {
    let cli = Cli::try_parse_from(["raslan", "ask", "what", "is", "rust"]).unwrap();
    match cli.command {
        Some(Command::Ask { text }) => assert_eq!(text.join(" "), "what is rust"),
        other => panic!("unexpected command: {other:?}"),
    }
}
