use super::*;

#[test]
fn defaults_bind_separate_local_listeners() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.public_addr.to_string(), "127.0.0.1:3000");
    assert_eq!(settings.server.admin_addr.to_string(), "127.0.0.1:3001");
    assert_eq!(settings.admin.page_size.get(), DEFAULT_ADMIN_PAGE_SIZE);
    assert!(settings.database.url.is_none());
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.public_port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        public_port: Some(4321),
        log_level: Some("debug".to_string()),
        admin_page_size: Some(50),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.admin.page_size.get(), 50);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn database_override_replaces_configured_url() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("postgres://file/db".to_string());

    raw.apply_database_override(&DatabaseOverride {
        database_url: Some("postgres://cli/db".to_string()),
    });
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.database.url.as_deref(), Some("postgres://cli/db"));
}

#[test]
fn blank_database_url_is_treated_as_missing() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());
}

#[test]
fn zero_page_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.admin.page_size = Some(0);

    match Settings::from_raw(raw) {
        Err(LoadError::Invalid { key, .. }) => assert_eq!(key, "admin.page_size"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn oversized_page_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.admin.page_size = Some(MAX_ADMIN_PAGE_SIZE + 1);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "admin.page_size",
            ..
        })
    ));
}

#[test]
fn listeners_must_not_collide() {
    let mut raw = RawSettings::default();
    raw.server.admin_port = Some(DEFAULT_PUBLIC_PORT);

    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "server.admin_port",
            ..
        })
    ));
}

#[test]
fn invalid_log_level_is_reported() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());

    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "logging.level",
            ..
        })
    ));
}

#[test]
fn export_command_parses_filters() {
    let args = CliArgs::try_parse_from([
        "bulletin",
        "export-contacts",
        "--status",
        "read",
        "--month",
        "2024-05",
        "out.xlsx",
    ])
    .expect("parsed");

    match args.command {
        Some(Command::ExportContacts(export)) => {
            assert_eq!(export.status.as_deref(), Some("read"));
            assert_eq!(export.month.as_deref(), Some("2024-05"));
            assert_eq!(export.sort, "newest");
            assert_eq!(export.file.to_str(), Some("out.xlsx"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
