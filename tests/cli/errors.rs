use anyhow::Result;

use crate::{CliTest, stderr};

#[test]
fn test_missing_api_key_is_fatal() -> Result<()> {
    let test = CliTest::with_app("import { t } from './i18n';\n\nt`Hello`;\n")?;

    let output = test.command().arg(".").arg("--add-language").arg("fr").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("API key"));
    assert!(!test.root().join("i18n").exists());

    Ok(())
}

#[test]
fn test_missing_project_root_is_fatal() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("does-not-exist").arg("--no-translate").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Project root does not exist"));

    Ok(())
}

#[test]
fn test_invalid_config_is_fatal() -> Result<()> {
    let test = CliTest::with_app("import { t } from './i18n';\n\nt`Hello`;\n")?;
    test.write_file(".transyncrc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let output = test.sync_command(&[]).output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("ignores"));

    Ok(())
}

#[test]
fn test_debug_prints_error_chain() -> Result<()> {
    let test = CliTest::with_app("import { t } from './i18n';\n\nt`Hello`;\n")?;
    test.write_file(".transyncrc.json", "{ nope")?;

    let output = test.sync_command(&["--debug"]).output()?;
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("Failed to parse config file"));
    assert!(err.contains("Caused by"));

    Ok(())
}

#[test]
fn test_parse_error_is_reported_not_fatal() -> Result<()> {
    let test = CliTest::with_app("import { t } from './i18n';\n\nt`Hello`;\n")?;
    test.write_file("src/broken.ts", "const = ;\n")?;

    let output = test.sync_command(&["--add-language", "fr"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("parse-error"));
    assert!(test.read_file("i18n/fr.ts")?.contains("`Hello`"));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;
    let output = test.command().arg("--help").output()?;
    assert!(output.status.success());
    let out = String::from_utf8_lossy(&output.stdout);
    assert!(out.contains("--add-language"));
    assert!(out.contains("--no-translate"));

    Ok(())
}
