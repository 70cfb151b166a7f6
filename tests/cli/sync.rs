use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_zero_param_module_entry() -> Result<()> {
    let test = CliTest::with_app(
        "import { t } from './i18n';\n\nexport const greeting = t`Hello`;\n",
    )?;

    let output = test.sync_command(&["--add-language", "fr"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("1 file(s) updated"));

    let content = test.read_file("i18n/fr.ts")?;
    assert!(content.starts_with("const translations: {"));
    assert!(content.contains("(...args: any[]) => string } = {\n"));
    assert!(content.contains("  '`Hello`': () => {\n"));
    assert!(content.contains("     * To translate: `Hello`\n"));
    assert!(content.contains("    return '`Hello`';\n"));
    assert!(content.trim_end().ends_with("export default translations;"));

    Ok(())
}

#[test]
fn test_parameterized_module_entry() -> Result<()> {
    let test = CliTest::with_app(
        "import { t } from './i18n';\n\nexport function footer(count: number) {\n  return t`Total: ${count}`; // Cart footer\n}\n",
    )?;

    let output = test.sync_command(&["--add-language", "fr"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let content = test.read_file("i18n/fr.ts")?;
    assert!(content.contains("  '`Total: ${0}`': (count: number) => {\n"));
    assert!(content.contains("     * Cart footer\n"));
    assert!(content.contains("    return `Total: ${count}`;\n"));

    Ok(())
}

#[test]
fn test_document_catalogs() -> Result<()> {
    let test = CliTest::with_app(
        "import { t } from './i18n';\n\nconst count: number = 3;\nt`Total: ${count}`;\n",
    )?;

    let output = test
        .sync_command(&["--document", "--add-language", "fr"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("2 file(s) updated"));

    assert_eq!(test.read_json("i18n/base.json")?, json!({ "TotalCount": "Total: ${0}" }));
    assert_eq!(test.read_json("i18n/fr.json")?, json!({ "TotalCount": "Total: ${0}" }));
    assert!(!test.root().join("i18n/fr.ts").exists());

    Ok(())
}

#[test]
fn test_trailing_whitespace_gives_distinct_keys() -> Result<()> {
    let test = CliTest::with_app("import { t } from './i18n';\n\nt`Hello`;\nt`Hello `;\n")?;

    let output = test.sync_command(&["--add-language", "fr"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let content = test.read_file("i18n/fr.ts")?;
    assert!(content.contains("'`Hello`': () => {"));
    assert!(content.contains("'`Hello `': () => {"));

    Ok(())
}

#[test]
fn test_second_run_updates_nothing() -> Result<()> {
    let test = CliTest::with_app("import { t } from './i18n';\n\nt`Hello`;\nt`Bye ${name}`;\n")?;

    let first = test
        .sync_command(&["--module", "--document", "--add-language", "fr"])
        .output()?;
    assert!(first.status.success(), "stderr: {}", stderr(&first));
    let module = test.read_file("i18n/fr.ts")?;
    let document = test.read_file("i18n/fr.json")?;

    let second = test.sync_command(&["--module", "--document"]).output()?;
    assert!(second.status.success(), "stderr: {}", stderr(&second));
    assert!(stdout(&second).contains("0 file(s) updated"));
    assert_eq!(test.read_file("i18n/fr.ts")?, module);
    assert_eq!(test.read_file("i18n/fr.json")?, document);

    Ok(())
}

#[test]
fn test_hand_edited_entries_are_kept() -> Result<()> {
    let test = CliTest::with_app("import { t } from './i18n';\n\nt`Hello`;\nt`Goodbye`;\n")?;
    test.write_file(
        "i18n/fr.ts",
        "const translations = {\n  '`Hello`': () => 'Bonjour',\n};\n\nexport default translations;\n",
    )?;

    let output = test.sync_command(&[]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let content = test.read_file("i18n/fr.ts")?;
    assert!(content.contains("  '`Hello`': () => 'Bonjour',\n"));
    assert!(content.contains("'`Goodbye`': () => {"));
    assert_eq!(content.matches("`Hello`").count(), 1);

    Ok(())
}

#[test]
fn test_unrelated_tags_are_ignored() -> Result<()> {
    let test = CliTest::with_app(
        "import { t } from './i18n';\nimport { css } from './styles';\n\nt`Hello`;\ncss`color: red`;\n",
    )?;

    let output = test.sync_command(&["--add-language", "fr"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let content = test.read_file("i18n/fr.ts")?;
    assert!(content.contains("`Hello`"));
    assert!(!content.contains("color: red"));

    Ok(())
}

#[test]
fn test_missing_translator_warns_and_keeps_going() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", "t`Hello`;\n")?;

    let output = test.sync_command(&["--add-language", "fr"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("warning:"));
    assert!(out.contains("missing-translator"));
    assert!(test.read_file("i18n/fr.ts")?.contains("`Hello`"));

    Ok(())
}

#[test]
fn test_malformed_language_is_skipped() -> Result<()> {
    let test = CliTest::with_app("import { t } from './i18n';\n\nt`Hello`;\n")?;

    let output = test
        .sync_command(&["--add-language", "french", "--add-language", "de"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("error:"));
    assert!(out.contains("unsupported-language"));
    assert!(test.root().join("i18n/de.ts").exists());
    assert!(!test.root().join("i18n/french.ts").exists());

    Ok(())
}

#[test]
fn test_config_file_is_used() -> Result<()> {
    let test = CliTest::with_app("import { t } from './i18n';\n\nt`Hello`;\n")?;
    test.write_file(
        ".transyncrc.json",
        r#"{ "outputDir": "./locales", "languages": ["es"], "outputs": ["document"] }"#,
    )?;

    let output = test.sync_command(&[]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(test.read_json("locales/es.json")?, json!({ "Hello": "Hello" }));

    Ok(())
}

#[test]
fn test_output_flag_overrides_config() -> Result<()> {
    let test = CliTest::with_app("import { t } from './i18n';\n\nt`Hello`;\n")?;

    let output = test
        .sync_command(&["-o", "generated/i18n", "--add-language", "fr"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("generated/i18n/fr.ts").exists());

    Ok(())
}
