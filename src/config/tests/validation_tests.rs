//! Validation and environment-loading tests for backend configurations.

use crate::config::{
    ConfigError, JiraConfig, MapEnv, ServiceConfig, ServiceKind, TrelloConfig,
};
use rstest::rstest;

const PLAUSIBLE_KEY: &str = "0123456789abcdef";
const PLAUSIBLE_TOKEN: &str = "fedcba9876543210";

fn valid_trello() -> TrelloConfig {
    TrelloConfig::new(PLAUSIBLE_KEY, PLAUSIBLE_TOKEN, "Team Board")
}

fn valid_jira() -> JiraConfig {
    JiraConfig::new(
        "https://example.atlassian.net",
        "dev@example.com",
        PLAUSIBLE_TOKEN,
        "OPS",
    )
}

// ============================================================================
// Card board configuration
// ============================================================================

#[rstest]
fn complete_trello_config_validates() {
    assert_eq!(valid_trello().validate(), Ok(()));
}

#[rstest]
fn trello_missing_keys_are_listed_together() {
    let config = TrelloConfig::new("", PLAUSIBLE_TOKEN, "");
    let result = config.validate();
    assert_eq!(
        result,
        Err(ConfigError::MissingConfiguration {
            service: "trello".to_owned(),
            keys: vec!["api_key".to_owned(), "board_name".to_owned()],
        })
    );
}

#[rstest]
#[case::short_key("short", PLAUSIBLE_TOKEN, "api_key")]
#[case::short_token(PLAUSIBLE_KEY, "short", "api_token")]
fn trello_short_credentials_are_rejected(
    #[case] api_key: &str,
    #[case] api_token: &str,
    #[case] offending: &str,
) {
    let config = TrelloConfig::new(api_key, api_token, "Team Board");
    let result = config.validate();
    assert!(matches!(
        result,
        Err(ConfigError::InvalidConfiguration { key, .. }) if key == offending
    ));
}

#[rstest]
fn trello_config_loads_from_environment() {
    let env = MapEnv::new([
        ("TRELLO_API_KEY", PLAUSIBLE_KEY),
        ("TRELLO_API_TOKEN", PLAUSIBLE_TOKEN),
        ("TRELLO_BOARD_NAME", "Team Board"),
    ]);
    let config = TrelloConfig::from_env(&env);
    assert_eq!(config, valid_trello());
}

#[rstest]
fn trello_unset_environment_fails_validation_with_all_keys() {
    let config = TrelloConfig::from_env(&MapEnv::default());
    let result = config.validate();
    assert!(matches!(
        result,
        Err(ConfigError::MissingConfiguration { keys, .. }) if keys.len() == 3
    ));
}

// ============================================================================
// Issue tracker configuration
// ============================================================================

#[rstest]
fn complete_jira_config_validates() {
    assert_eq!(valid_jira().validate(), Ok(()));
}

#[rstest]
fn jira_missing_keys_are_listed_together() {
    let config = JiraConfig::new("", "", PLAUSIBLE_TOKEN, "OPS");
    let result = config.validate();
    assert_eq!(
        result,
        Err(ConfigError::MissingConfiguration {
            service: "jira".to_owned(),
            keys: vec!["server_url".to_owned(), "username".to_owned()],
        })
    );
}

#[rstest]
fn jira_server_url_requires_http_scheme() {
    let config = JiraConfig::new("example.atlassian.net", "dev", PLAUSIBLE_TOKEN, "OPS");
    let result = config.validate();
    assert!(matches!(
        result,
        Err(ConfigError::InvalidConfiguration { key, .. }) if key == "server_url"
    ));
}

#[rstest]
fn jira_short_project_key_is_rejected() {
    let config = JiraConfig::new("https://example.net", "dev", PLAUSIBLE_TOKEN, "O");
    let result = config.validate();
    assert!(matches!(
        result,
        Err(ConfigError::InvalidConfiguration { key, .. }) if key == "project_key"
    ));
}

#[rstest]
fn jira_server_url_trailing_slash_is_trimmed() {
    let config = JiraConfig::new("https://example.net/", "dev", PLAUSIBLE_TOKEN, "OPS");
    assert_eq!(config.server_url(), "https://example.net");
}

// ============================================================================
// Service kinds and the configuration sum type
// ============================================================================

#[rstest]
#[case("trello", ServiceKind::Trello)]
#[case("JIRA", ServiceKind::Jira)]
#[case("  Trello  ", ServiceKind::Trello)]
fn service_kinds_parse_case_insensitively(#[case] input: &str, #[case] expected: ServiceKind) {
    assert_eq!(ServiceKind::try_from(input), Ok(expected));
}

#[rstest]
fn unknown_service_kind_is_rejected() {
    let result = ServiceKind::try_from("asana");
    assert!(result.is_err());
}

#[rstest]
fn service_config_from_env_matches_kind() {
    let env = MapEnv::new([
        ("JIRA_SERVER_URL", "https://example.net"),
        ("JIRA_USERNAME", "dev"),
        ("JIRA_API_TOKEN", PLAUSIBLE_TOKEN),
        ("JIRA_PROJECT_KEY", "OPS"),
    ]);
    let config = ServiceConfig::from_env(ServiceKind::Jira, &env);
    assert_eq!(config.kind(), ServiceKind::Jira);
    assert_eq!(config.validate(), Ok(()));
}

#[rstest]
fn missing_configuration_message_names_the_keys() {
    let err = ConfigError::MissingConfiguration {
        service: "trello".to_owned(),
        keys: vec!["api_key".to_owned(), "api_token".to_owned()],
    };
    assert_eq!(
        err.to_string(),
        "Missing required configuration for trello: api_key, api_token"
    );
}
