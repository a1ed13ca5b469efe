use std::path::PathBuf;

use blogless::config::{ConfigFlags, ThemeMode, load_config_flags, parse_flag_tokens, save_theme_pref};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".bloglessrc");
    let content = r#"
# comment
--theme light

--manifest assets/index.json
   
--debug-log=render.log
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert_eq!(flags.theme, Some(ThemeMode::Light));
    assert_eq!(flags.manifest.as_deref(), Some("assets/index.json"));
    assert_eq!(flags.debug_log, Some(PathBuf::from("render.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".bloglessrc");
    let content = "--theme light\n--manifest assets/posts.json\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "blogless".to_string(),
        "https://blog.example.net".to_string(),
        "--theme".to_string(),
        "dark".to_string(),
        "--perf".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert_eq!(effective.theme, Some(ThemeMode::Dark), "cli should override theme");
    assert!(effective.perf, "cli flags should be applied");
    assert_eq!(
        effective.manifest.as_deref(),
        Some("assets/posts.json"),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "blogless".to_string(),
        "--theme=dark".to_string(),
        "--manifest=assets/index.json".to_string(),
        "--debug-log=render.log".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.theme, Some(ThemeMode::Dark));
    assert_eq!(flags.manifest.as_deref(), Some("assets/index.json"));
    assert_eq!(flags.debug_log, Some(PathBuf::from("render.log")));
}

#[test]
fn test_missing_config_file_is_empty_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope");
    assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
}

#[test]
fn test_theme_toggle_persists_across_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");

    save_theme_pref(&path, ThemeMode::Dark).unwrap();
    assert_eq!(load_config_flags(&path).unwrap().theme, Some(ThemeMode::Dark));

    save_theme_pref(&path, ThemeMode::Light).unwrap();
    assert_eq!(load_config_flags(&path).unwrap().theme, Some(ThemeMode::Light));
}
