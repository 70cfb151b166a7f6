//! Discovery of the designated translator function.
//!
//! The translator is the function whose leading doc comment carries the
//! marker tag (`@translator` by default):
//!
//! ```ts
//! /** @translator */
//! export function t(strings: TemplateStringsArray, ...values: unknown[]): string { ... }
//! ```
//!
//! Only top-level declarations are eligible. Files are searched in the order
//! given; the first match wins.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use swc_common::BytePos;
use swc_ecma_ast::{Decl, DefaultDecl, Expr, ModuleDecl, ModuleItem, Pat, Stmt, VarDecl};

use crate::core::data::ParamType;
use crate::core::extract::types::{annotation_type, return_type};
use crate::core::parsers::source::ParsedSource;
use crate::utils::normalize_path;

/// Extensions tried when resolving an extensionless import.
pub const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx"];

/// The designated translator function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorTarget {
    /// Declared name, `default` for an anonymous default export.
    pub name: String,
    /// Declaring file, lexically normalized.
    pub file_path: PathBuf,
    /// Declared return type, used as a type fallback for expression slots.
    pub return_type: ParamType,
    pub is_default_export: bool,
}

impl TranslatorTarget {
    /// Whether `file_path` is the declaring file.
    pub fn is_declared_in(&self, file_path: &str) -> bool {
        normalize_path(Path::new(file_path)) == self.file_path
    }
}

/// Whether a comment body carries `@<tag>` as a whole token.
fn has_marker(text: &str, tag: &str) -> bool {
    let marker = format!("@{}", tag);
    text.match_indices(&marker).any(|(idx, _)| {
        text[idx + marker.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_' || c == '-'))
    })
}

fn is_marked(source: &ParsedSource, positions: &[BytePos], tag: &str) -> bool {
    positions.iter().any(|pos| {
        source
            .comments
            .leading_at(*pos)
            .iter()
            .any(|cmt| has_marker(&cmt.text, tag))
    })
}

/// `const t = (...) => ...` or `const t = function () {}`.
fn var_function(source: &ParsedSource, var: &VarDecl) -> Option<(String, ParamType)> {
    let decl = var.decls.first()?;
    let Pat::Ident(ident) = &decl.name else {
        return None;
    };
    let ty = match decl.init.as_deref()? {
        Expr::Arrow(arrow) => arrow
            .return_type
            .as_deref()
            .map(|ann| annotation_type(source, ann))
            .unwrap_or(ParamType::Unknown),
        Expr::Fn(fn_expr) => return_type(source, &fn_expr.function),
        _ => return None,
    };
    Some((ident.id.sym.to_string(), ty))
}

fn decl_function(source: &ParsedSource, decl: &Decl) -> Option<(String, ParamType, BytePos)> {
    match decl {
        Decl::Fn(fn_decl) => Some((
            fn_decl.ident.sym.to_string(),
            return_type(source, &fn_decl.function),
            fn_decl.function.span.lo,
        )),
        Decl::Var(var) => {
            let (name, ty) = var_function(source, var)?;
            Some((name, ty, var.span.lo))
        }
        _ => None,
    }
}

/// Find a marked function among the top-level items of one file.
pub fn find_in_file(file_path: &str, source: &ParsedSource, tag: &str) -> Option<TranslatorTarget> {
    let target = |name: String, return_type: ParamType, is_default_export: bool| TranslatorTarget {
        name,
        file_path: normalize_path(Path::new(file_path)),
        return_type,
        is_default_export,
    };

    for item in &source.module.body {
        match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) => {
                if let Some((name, ty, lo)) = decl_function(source, decl)
                    && is_marked(source, &[lo], tag)
                {
                    return Some(target(name, ty, false));
                }
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                if let Some((name, ty, lo)) = decl_function(source, &export.decl)
                    && is_marked(source, &[export.span.lo, lo], tag)
                {
                    return Some(target(name, ty, false));
                }
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => {
                if let DefaultDecl::Fn(fn_expr) = &export.decl
                    && is_marked(source, &[export.span.lo, fn_expr.function.span.lo], tag)
                {
                    let name = fn_expr
                        .ident
                        .as_ref()
                        .map(|i| i.sym.to_string())
                        .unwrap_or_else(|| "default".to_string());
                    return Some(target(name, return_type(source, &fn_expr.function), true));
                }
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
                let ty = match &*export.expr {
                    Expr::Arrow(arrow) => arrow
                        .return_type
                        .as_deref()
                        .map(|ann| annotation_type(source, ann)),
                    Expr::Fn(fn_expr) => Some(return_type(source, &fn_expr.function)),
                    _ => None,
                };
                if let Some(ty) = ty
                    && is_marked(source, &[export.span.lo], tag)
                {
                    return Some(target("default".to_string(), ty, true));
                }
            }
            _ => {}
        }
    }
    None
}

/// Find the translator across files, in iteration order.
pub fn find_translator<'a>(
    files: impl IntoIterator<Item = (&'a str, &'a ParsedSource)>,
    tag: &str,
) -> Option<TranslatorTarget> {
    files
        .into_iter()
        .find_map(|(file_path, source)| find_in_file(file_path, source, tag))
}

/// Resolve a relative import specifier to one of the known files.
///
/// Tries the path as written, then with each source extension, then as a
/// directory with an `index` file. A `.js` specifier also matches its `.ts`
/// sibling. Bare package specifiers never resolve.
pub fn resolve_import_path(
    importer: &str,
    specifier: &str,
    known_files: &HashSet<PathBuf>,
) -> Option<PathBuf> {
    if !(specifier.starts_with("./") || specifier.starts_with("../")) {
        return None;
    }
    let dir = Path::new(importer).parent().unwrap_or(Path::new(""));
    let base = normalize_path(&dir.join(specifier));

    let mut candidates = vec![base.clone()];
    if let Some(ext) = base.extension().and_then(|e| e.to_str())
        && matches!(ext, "js" | "jsx" | "mjs" | "cjs")
    {
        let ts_ext = match ext {
            "jsx" => "tsx",
            "mjs" => "mts",
            "cjs" => "cts",
            _ => "ts",
        };
        candidates.push(base.with_extension(ts_ext));
    }
    for ext in RESOLVE_EXTENSIONS {
        let mut with_ext = base.clone().into_os_string();
        with_ext.push(".");
        with_ext.push(ext);
        candidates.push(PathBuf::from(with_ext));
    }
    for ext in RESOLVE_EXTENSIONS {
        candidates.push(base.join(format!("index.{}", ext)));
    }

    candidates.into_iter().find(|c| known_files.contains(c))
}
