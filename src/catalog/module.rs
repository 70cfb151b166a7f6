//! Module catalogs: one `<lang>.ts` file exporting a mapping from catalog
//! key to a function returning the translated string.

use std::{collections::HashSet, fs, path::Path, sync::Arc};

use anyhow::{Context, Result, anyhow};
use swc_common::{SourceMap, Spanned};
use swc_ecma_ast::{
    Decl, ExportDecl, Expr, Module, ModuleDecl, ModuleItem, ObjectLit, Prop, PropName,
    PropOrSpread, Stmt, VarDecl,
};

use crate::core::parsers::source::parse_source;
use crate::core::{ParameterDescriptor, TemplateRecord};
use crate::issues::{Issue, ParseErrorIssue};
use crate::translate::placeholder::escape_backticks;
use crate::translate::{Translation, TranslationPipeline};

use super::{FileUpdate, StrategyOutcome};

/// Content of a newly created module catalog.
pub const MODULE_TEMPLATE: &str = "const translations: { [key: string]: (...args: any[]) => string } = {
};

export default translations;
";

/// A module catalog with the location of its translation mapping.
pub struct ModuleCatalog {
    code: String,
    keys: HashSet<String>,
    /// Byte offset of the mapping's closing brace.
    close: usize,
    /// End offset of the last property, if any.
    last_prop_end: Option<usize>,
}

impl ModuleCatalog {
    pub fn parse(file_path: &str, code: String) -> Result<Self> {
        let parsed = parse_source(code, file_path, Arc::new(SourceMap::default()))?;
        let object = find_mapping(&parsed.module)
            .ok_or_else(|| anyhow!("no translation object literal found"))?;

        let keys = object.props.iter().filter_map(prop_key).collect();
        let close = parsed
            .offset(object.span.hi)
            .and_then(|end| end.checked_sub(1))
            .ok_or_else(|| anyhow!("translation object outside of file"))?;
        let last_prop_end = object
            .props
            .last()
            .and_then(|prop| parsed.offset(prop.span().hi));

        Ok(Self {
            code: parsed.code,
            keys,
            close,
            last_prop_end,
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Insert rendered entries before the mapping's closing brace.
    pub fn splice(&self, entries: &[String]) -> String {
        let added: usize = entries.iter().map(String::len).sum();
        let mut out = String::with_capacity(self.code.len() + added + 1);

        let mut cursor = 0;
        if let Some(end) = self.last_prop_end {
            let between = &self.code[end..self.close];
            if !skip_trivia(between).starts_with(',') {
                out.push_str(&self.code[..end]);
                out.push(',');
                cursor = end;
            }
        }

        // Keep the closing brace's indentation on its own line.
        let before_close = &self.code[..self.close];
        let insert_at = before_close.trim_end_matches([' ', '\t']).len();
        let on_own_line = before_close[..insert_at].ends_with('\n');
        let insert_at = if on_own_line { insert_at } else { self.close };

        out.push_str(&self.code[cursor..insert_at]);
        if !on_own_line {
            out.push('\n');
        }
        for entry in entries {
            out.push_str(entry);
        }
        out.push_str(&self.code[insert_at..]);
        out
    }
}

/// Whether `path` holds a module catalog, i.e. a source file with a
/// translation mapping.
pub fn is_module_catalog(path: &Path) -> bool {
    fs::read_to_string(path)
        .is_ok_and(|code| ModuleCatalog::parse(&path.to_string_lossy(), code).is_ok())
}

/// Skip leading whitespace and comments.
fn skip_trivia(mut text: &str) -> &str {
    loop {
        text = text.trim_start();
        if let Some(rest) = text.strip_prefix("//") {
            text = rest.find('\n').map_or("", |i| &rest[i..]);
        } else if let Some(rest) = text.strip_prefix("/*") {
            text = rest.find("*/").map_or("", |i| &rest[i + 2..]);
        } else {
            return text;
        }
    }
}

fn find_mapping(module: &Module) -> Option<&ObjectLit> {
    module.body.iter().find_map(|item| match item {
        ModuleItem::Stmt(Stmt::Decl(Decl::Var(var)))
        | ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
            decl: Decl::Var(var),
            ..
        })) => object_of_var(var),
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => object_of(&export.expr),
        _ => None,
    })
}

fn object_of_var(var: &VarDecl) -> Option<&ObjectLit> {
    var.decls
        .iter()
        .find_map(|decl| decl.init.as_deref().and_then(object_of))
}

fn object_of(expr: &Expr) -> Option<&ObjectLit> {
    match expr {
        Expr::Object(object) => Some(object),
        Expr::Paren(paren) => object_of(&paren.expr),
        Expr::TsAs(as_expr) => object_of(&as_expr.expr),
        Expr::TsSatisfies(satisfies) => object_of(&satisfies.expr),
        Expr::TsConstAssertion(assertion) => object_of(&assertion.expr),
        Expr::TsTypeAssertion(assertion) => object_of(&assertion.expr),
        _ => None,
    }
}

fn prop_key(prop: &PropOrSpread) -> Option<String> {
    let PropOrSpread::Prop(prop) = prop else {
        return None;
    };
    match &**prop {
        Prop::KeyValue(kv) => prop_name(&kv.key),
        Prop::Method(method) => prop_name(&method.key),
        Prop::Getter(getter) => prop_name(&getter.key),
        Prop::Shorthand(ident) => Some(ident.sym.to_string()),
        _ => None,
    }
}

fn prop_name(name: &PropName) -> Option<String> {
    match name {
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Num(num) => Some(number_key(num.value)),
        PropName::Computed(_) | PropName::BigInt(_) => None,
    }
}

/// Property name of a numeric key, as JavaScript would stringify it.
fn number_key(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Single-quoted JavaScript string literal whose value is exactly `text`.
fn single_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn push_doc_lines(doc: &mut String, text: &str) {
    for line in text.replace("*/", "*\\/").lines() {
        doc.push_str("     *");
        if !line.is_empty() {
            doc.push(' ');
            doc.push_str(line.trim_end());
        }
        doc.push('\n');
    }
}

fn param_list(params: &[ParameterDescriptor]) -> String {
    params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty.to_typescript()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render one mapping entry, including its trailing comma and newline.
pub fn render_entry(record: &TemplateRecord, language: &str, translation: &Translation) -> String {
    let headline = match translation {
        Translation::Machine(_) => {
            format!("Machine translated ({}) from: {}", language, record.literal)
        }
        Translation::Pending => format!("To translate: {}", record.literal),
    };

    let mut doc = String::from("    /**\n");
    push_doc_lines(&mut doc, &headline);
    if let Some(full) = record.notes.full() {
        push_doc_lines(&mut doc, full);
    }
    for param in &record.params {
        let note = record
            .param_note(param)
            .unwrap_or(&param.original_source_text);
        push_doc_lines(&mut doc, &format!("@param {} {}", param.name, note));
    }
    doc.push_str("     */\n");

    let body = match (translation, record.has_params()) {
        (Translation::Pending, false) => single_quoted(&record.literal),
        (Translation::Pending, true) => record.literal.clone(),
        (Translation::Machine(text), false) => single_quoted(&format!("`{}`", text)),
        (Translation::Machine(text), true) => format!("`{}`", escape_backticks(text)),
    };

    format!(
        "  {}: ({}) => {{\n{}    return {};\n  }},\n",
        single_quoted(record.catalog_key()),
        param_list(&record.params),
        doc,
        body
    )
}

/// Bring every module catalog up to date with the string table.
pub async fn sync_modules(
    records: &[&TemplateRecord],
    output_dir: &Path,
    languages: &[String],
    pipeline: &mut TranslationPipeline<'_>,
) -> Result<StrategyOutcome> {
    let mut outcome = StrategyOutcome::default();

    for language in languages {
        let path = output_dir.join(format!("{language}.ts"));
        let path_str = path.to_string_lossy().to_string();
        let existed = path.exists();
        let code = if existed {
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read module catalog: {}", path.display()))?
        } else {
            MODULE_TEMPLATE.to_string()
        };

        let catalog = match ModuleCatalog::parse(&path_str, code) {
            Ok(catalog) => catalog,
            Err(err) => {
                outcome.issues.push(Issue::ParseError(ParseErrorIssue {
                    file_path: path_str,
                    error: err.to_string(),
                }));
                continue;
            }
        };

        let pending_before = pipeline.pending();
        let mut entries = Vec::new();
        for record in records.iter().filter(|r| !catalog.contains(r.catalog_key())) {
            let translation = pipeline.translate(record.stripped_literal(), language).await;
            entries.push(render_entry(record, language, &translation));
        }

        if entries.is_empty() && existed {
            tracing::debug!(language = language.as_str(), "module catalog up to date");
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&path, catalog.splice(&entries))
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        tracing::debug!(
            language = language.as_str(),
            added = entries.len(),
            path = %path.display(),
            "updated module catalog"
        );
        outcome.updates.push(FileUpdate {
            path: path_str,
            language: Some(language.clone()),
            added: entries.len(),
            pending: pipeline.pending() - pending_before,
            created: !existed,
        });
    }

    Ok(outcome)
}
