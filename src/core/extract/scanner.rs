//! Translator-call scanner.
//!
//! Walks one parsed file and turns every tagged template whose tag resolves
//! to the designated translator into a [`TemplateRecord`]:
//!
//! ```ts
//! import { t } from "./i18n";
//!
//! const count: number = cart.items.length;
//! t`Total: ${count}`; // Cart summary line
//! ```
//!
//! yields the key `` `Total: ${0}` ``, the literal `` `Total: ${count}` ``, a
//! `count: number` parameter, and the `full` note "Cart summary line".
//!
//! Declarations are hoisted into their scope before the scope body is
//! visited, so slot identifiers and the translator binding resolve
//! regardless of declaration order within a scope.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CatchClause, Constructor, Decl, Expr, ForHead,
    ForInStmt, ForOfStmt, ForStmt, Function, ImportDecl, ImportSpecifier, MemberProp, Module,
    ModuleDecl, ModuleExportName, ModuleItem, ParamOrTsParamProp, Pat, Stmt, TaggedTpl,
    TsParamPropParam, VarDecl, VarDeclOrExpr,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::data::{Notes, ParamType, SourceLocation, TemplateRecord};
use crate::core::extract::canonical::Skeleton;
use crate::core::extract::node::NodeKind;
use crate::core::extract::notes::{call_annotation, slot_note};
use crate::core::extract::params::ParamResolver;
use crate::core::extract::scope::{Binding, ScopeStack, binding_names};
use crate::core::extract::translator_fn::{TranslatorTarget, resolve_import_path};
use crate::core::extract::types::{
    annotation_type, declarator_binding, infer_expr_type, pat_annotation, return_type,
};
use crate::core::parsers::source::ParsedSource;
use crate::issues::SkippedNodeIssue;

/// Result of scanning a single file.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Records in source order. The same key may appear more than once.
    pub records: Vec<TemplateRecord>,
    pub skipped: Vec<SkippedNodeIssue>,
}

pub struct TemplateScanner<'a> {
    /// Path of the file being scanned, as reported in locations.
    file_path: &'a str,
    source: &'a ParsedSource,
    /// `None` means every tagged template is translatable.
    target: Option<&'a TranslatorTarget>,
    /// Normalized paths of every scanned file, for import resolution.
    known_files: &'a HashSet<PathBuf>,
    scopes: ScopeStack,
    /// Type for expression slots whose own type cannot be inferred.
    fallback_type: ParamType,
    records: Vec<TemplateRecord>,
    skipped: Vec<SkippedNodeIssue>,
}

impl<'a> TemplateScanner<'a> {
    pub fn new(
        file_path: &'a str,
        source: &'a ParsedSource,
        target: Option<&'a TranslatorTarget>,
        known_files: &'a HashSet<PathBuf>,
    ) -> Self {
        let fallback_type = target
            .map(|t| t.return_type.clone())
            .unwrap_or(ParamType::Unknown);
        Self {
            file_path,
            source,
            target,
            known_files,
            scopes: ScopeStack::new(),
            fallback_type,
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Main entry point: scan the module and return its records.
    pub fn scan(mut self) -> ScanResult {
        let source = self.source;
        self.visit_module(&source.module);
        ScanResult {
            records: self.records,
            skipped: self.skipped,
        }
    }

    // ============================================================
    // Hoisting
    // ============================================================

    fn hoist_module(&mut self, module: &Module) {
        if let Some(target) = self.target
            && target.is_declared_in(self.file_path)
        {
            self.scopes.insert(target.name.clone(), Binding::Translator);
        }

        for item in &module.body {
            match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => self.hoist_import(import),
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    self.hoist_decl(&export.decl)
                }
                ModuleItem::Stmt(stmt) => self.hoist_stmt(stmt),
                _ => {}
            }
        }
    }

    fn hoist_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.hoist_stmt(stmt);
        }
    }

    fn hoist_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::Decl(decl) = stmt {
            self.hoist_decl(decl);
        }
    }

    fn hoist_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Fn(fn_decl) => {
                let binding = Binding::Function {
                    return_type: return_type(self.source, &fn_decl.function),
                };
                self.scopes
                    .insert_if_absent(fn_decl.ident.sym.to_string(), binding);
            }
            Decl::Var(var) => self.hoist_var(var),
            Decl::Class(class) => self
                .scopes
                .insert_if_absent(class.ident.sym.to_string(), Binding::Value(ParamType::Unknown)),
            Decl::TsEnum(ts_enum) => self
                .scopes
                .insert_if_absent(ts_enum.id.sym.to_string(), Binding::Value(ParamType::Unknown)),
            _ => {}
        }
    }

    fn hoist_var(&mut self, var: &VarDecl) {
        for decl in &var.decls {
            match &decl.name {
                Pat::Ident(ident) => {
                    let binding = declarator_binding(self.source, decl, &self.scopes);
                    self.scopes.insert_if_absent(ident.id.sym.to_string(), binding);
                }
                other => {
                    for name in binding_names(other) {
                        self.scopes
                            .insert_if_absent(name, Binding::Value(ParamType::Unknown));
                    }
                }
            }
        }
    }

    fn hoist_import(&mut self, import: &ImportDecl) {
        let resolves_to_target = self.target.is_some_and(|target| {
            let specifier = import.src.value.as_str().unwrap_or_default();
            resolve_import_path(self.file_path, specifier, self.known_files)
                .is_some_and(|path| path == target.file_path)
        });

        for specifier in &import.specifiers {
            let (local, binding) = match specifier {
                ImportSpecifier::Named(named) => {
                    let imported = match &named.imported {
                        Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                        Some(ModuleExportName::Str(s)) => {
                            s.value.as_str().unwrap_or_default().to_string()
                        }
                        None => named.local.sym.to_string(),
                    };
                    let is_translator = resolves_to_target
                        && self.target.is_some_and(|t| imported == export_name(t));
                    (&named.local, is_translator.then_some(Binding::Translator))
                }
                ImportSpecifier::Default(default) => {
                    let is_translator =
                        resolves_to_target && self.target.is_some_and(|t| t.is_default_export);
                    (&default.local, is_translator.then_some(Binding::Translator))
                }
                ImportSpecifier::Namespace(ns) => (
                    &ns.local,
                    resolves_to_target.then_some(Binding::TranslatorNamespace),
                ),
            };
            let binding = binding.unwrap_or(Binding::Value(ParamType::Unknown));
            self.scopes.insert(local.sym.to_string(), binding);
        }
    }

    /// Bind a function parameter in the current scope.
    fn bind_param(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(ident) => {
                let ty = pat_annotation(self.source, pat).unwrap_or(ParamType::Unknown);
                self.scopes.insert(ident.id.sym.to_string(), Binding::Value(ty));
            }
            Pat::Assign(assign) if matches!(&*assign.left, Pat::Ident(_)) => {
                let ty = pat_annotation(self.source, pat)
                    .or_else(|| infer_expr_type(self.source, &assign.right, &self.scopes))
                    .unwrap_or(ParamType::Unknown);
                for name in binding_names(&assign.left) {
                    self.scopes.insert(name, Binding::Value(ty.clone()));
                }
            }
            other => {
                for name in binding_names(other) {
                    self.scopes.insert(name, Binding::Value(ParamType::Unknown));
                }
            }
        }
    }

    // ============================================================
    // Record construction
    // ============================================================

    fn is_translator_tag(&self, tag: &Expr) -> bool {
        let Some(target) = self.target else {
            return true;
        };
        match tag {
            Expr::Ident(ident) => matches!(self.scopes.get(&ident.sym), Some(Binding::Translator)),
            Expr::Member(member) => {
                let (Expr::Ident(obj), MemberProp::Ident(prop)) = (&*member.obj, &member.prop)
                else {
                    return false;
                };
                matches!(
                    self.scopes.get(&obj.sym),
                    Some(Binding::TranslatorNamespace)
                ) && &*prop.sym == export_name(target)
            }
            _ => false,
        }
    }

    fn location(&self, tagged: &TaggedTpl) -> SourceLocation {
        let (line, col) = self.source.line_col(tagged.span.lo);
        SourceLocation::new(self.file_path, line, col)
    }

    fn build_record(&self, tagged: &TaggedTpl) -> Result<TemplateRecord> {
        let tpl = &tagged.tpl;
        let skeleton = Skeleton::of(tpl).ok_or_else(|| {
            anyhow!(
                "{} literal chunks for {} slots",
                tpl.quasis.len(),
                tpl.exprs.len()
            )
        })?;

        let params = match NodeKind::of_template(tpl) {
            NodeKind::SlotTemplate(tpl) => {
                ParamResolver::new(self.source, &self.scopes, &self.fallback_type)
                    .resolve(&tpl.exprs)?
            }
            _ => Vec::new(),
        };

        let annotation = call_annotation(self.source, tagged.span.hi);
        let mut notes = Notes::new();
        if let Some(text) = annotation.text {
            notes.set_full_if_absent(text);
        }
        for (param, window) in params.iter().zip(tpl.quasis.windows(2)) {
            if let Some(text) = slot_note(self.source, window[0].span.hi, window[1].span.lo) {
                notes.insert_param_if_absent(param.name.clone(), text);
            }
        }

        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        Ok(TemplateRecord {
            canonical_key: skeleton.canonical_key(),
            literal: skeleton.inline(&names),
            params,
            notes,
            explicit_key_override: annotation.key_override,
            location: self.location(tagged),
        })
    }

    fn collect(&mut self, tagged: &TaggedTpl) {
        match self.build_record(tagged) {
            Ok(record) => self.records.push(record),
            Err(err) => {
                let location = self.location(tagged);
                tracing::debug!(%location, error = %err, "skipping tagged template");
                self.skipped.push(SkippedNodeIssue {
                    location,
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Name under which the translator is exported from its declaring file.
fn export_name(target: &TranslatorTarget) -> &str {
    if target.is_default_export {
        "default"
    } else {
        &target.name
    }
}

impl<'a> Visit for TemplateScanner<'a> {
    fn visit_module(&mut self, node: &Module) {
        self.hoist_module(node);
        node.visit_children_with(self);
    }

    fn visit_expr(&mut self, node: &Expr) {
        if let NodeKind::TaggedTemplate(tagged) = NodeKind::classify(node)
            && self.is_translator_tag(&tagged.tag)
        {
            self.collect(tagged);
        }
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, node: &Function) {
        node.decorators.visit_with(self);
        self.scopes.enter_scope();
        for param in &node.params {
            self.bind_param(&param.pat);
        }
        node.params.visit_with(self);
        if let Some(body) = &node.body {
            self.hoist_stmts(&body.stmts);
            body.stmts.visit_with(self);
        }
        self.scopes.exit_scope();
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        self.scopes.enter_scope();
        for param in &node.params {
            match param {
                ParamOrTsParamProp::Param(param) => self.bind_param(&param.pat),
                ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                    TsParamPropParam::Ident(ident) => {
                        let ty = ident
                            .type_ann
                            .as_deref()
                            .map(|ann| annotation_type(self.source, ann))
                            .unwrap_or(ParamType::Unknown);
                        self.scopes
                            .insert(ident.id.sym.to_string(), Binding::Value(ty));
                    }
                    TsParamPropParam::Assign(assign) => {
                        for name in binding_names(&assign.left) {
                            self.scopes.insert(name, Binding::Value(ParamType::Unknown));
                        }
                    }
                },
            }
        }
        node.params.visit_with(self);
        if let Some(body) = &node.body {
            self.hoist_stmts(&body.stmts);
            body.stmts.visit_with(self);
        }
        self.scopes.exit_scope();
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.scopes.enter_scope();
        for param in &node.params {
            self.bind_param(param);
        }
        node.params.visit_with(self);
        match &*node.body {
            BlockStmtOrExpr::BlockStmt(block) => {
                self.hoist_stmts(&block.stmts);
                block.stmts.visit_with(self);
            }
            BlockStmtOrExpr::Expr(expr) => expr.visit_with(self),
        }
        self.scopes.exit_scope();
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        self.scopes.enter_scope();
        self.hoist_stmts(&node.stmts);
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        self.scopes.enter_scope();
        if let Some(param) = &node.param {
            for name in binding_names(param) {
                self.scopes.insert(name, Binding::Value(ParamType::Unknown));
            }
        }
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_for_stmt(&mut self, node: &ForStmt) {
        self.scopes.enter_scope();
        if let Some(VarDeclOrExpr::VarDecl(var)) = &node.init {
            self.hoist_var(var);
        }
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        self.scopes.enter_scope();
        // for-in always iterates over string keys
        self.bind_for_head(&node.left, ParamType::known("string"));
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        self.scopes.enter_scope();
        self.bind_for_head(&node.left, ParamType::Unknown);
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }
}

impl<'a> TemplateScanner<'a> {
    fn bind_for_head(&mut self, head: &ForHead, ty: ParamType) {
        if let ForHead::VarDecl(var) = head {
            for decl in &var.decls {
                for name in binding_names(&decl.name) {
                    self.scopes.insert(name, Binding::Value(ty.clone()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use swc_common::SourceMap;

    use super::*;
    use crate::core::extract::translator_fn::find_in_file;
    use crate::core::parsers::source::parse_source;
    use crate::utils::normalize_path;

    const I18N: &str = "/** @translator */\nexport function t(s: TemplateStringsArray, ...v: unknown[]): string { return ''; }\n";

    fn parse(code: &str, file_path: &str) -> ParsedSource {
        parse_source(code.to_string(), file_path, Arc::new(SourceMap::default())).unwrap()
    }

    /// Scan `code` as `src/app.ts` with `src/i18n.ts` as the translator's file.
    fn scan_app(code: &str) -> ScanResult {
        let i18n = parse(I18N, "src/i18n.ts");
        let target = find_in_file("src/i18n.ts", &i18n, "translator").unwrap();
        let known: HashSet<PathBuf> = ["src/i18n.ts", "src/app.ts"]
            .iter()
            .map(|p| normalize_path(Path::new(p)))
            .collect();
        let app = parse(code, "src/app.ts");
        TemplateScanner::new("src/app.ts", &app, Some(&target), &known).scan()
    }

    fn keys(result: &ScanResult) -> Vec<&str> {
        result.records.iter().map(|r| r.catalog_key()).collect()
    }

    #[test]
    fn test_literal_only_template() {
        let result = scan_app("import { t } from './i18n';\nt`Hello`;");
        assert_eq!(keys(&result), vec!["`Hello`"]);
        let record = &result.records[0];
        assert_eq!(record.literal, "`Hello`");
        assert!(record.params.is_empty());
        assert_eq!(record.location, SourceLocation::new("src/app.ts", 2, 1));
    }

    #[test]
    fn test_template_with_annotated_param() {
        let result = scan_app(
            "import { t } from './i18n';\nconst count: number = 3;\nt`Total: ${count}`;",
        );
        let record = &result.records[0];
        assert_eq!(record.canonical_key, "`Total: ${0}`");
        assert_eq!(record.literal, "`Total: ${count}`");
        assert_eq!(record.params[0].name, "count");
        assert_eq!(record.params[0].ty, ParamType::known("number"));
    }

    #[test]
    fn test_renaming_keeps_key() {
        let a = scan_app("import { t } from './i18n';\nconst a = 1;\nt`Total: ${a}`;");
        let b = scan_app("import { t } from './i18n';\nconst b = 1;\nt`Total: ${b}`;");
        assert_eq!(a.records[0].canonical_key, b.records[0].canonical_key);
    }

    #[test]
    fn test_trailing_whitespace_gives_distinct_keys() {
        let result = scan_app("import { t } from './i18n';\nt`Hello`;\nt`Hello `;");
        assert_eq!(keys(&result), vec!["`Hello`", "`Hello `"]);
    }

    #[test]
    fn test_expression_slot_uses_return_type_fallback() {
        let result = scan_app("import { t } from './i18n';\nt`Hi ${user.name}`;");
        let param = &result.records[0].params[0];
        assert_eq!(param.name, "p0");
        assert_eq!(param.ty, ParamType::known("string"));
        assert_eq!(param.original_source_text, "user.name");
        assert_eq!(result.records[0].literal, "`Hi ${p0}`");
    }

    #[test]
    fn test_function_params_resolve() {
        let result = scan_app(
            "import { t } from './i18n';\nexport function greet(name: string) {\n  return t`Hello ${name}`;\n}",
        );
        let param = &result.records[0].params[0];
        assert_eq!(param.name, "name");
        assert_eq!(param.ty, ParamType::known("string"));
    }

    #[test]
    fn test_hoisted_declaration_resolves() {
        let result = scan_app(
            "import { t } from './i18n';\nfunction show() { return t`Left: ${left}`; }\nconst left = 2;",
        );
        let param = &result.records[0].params[0];
        assert_eq!(param.name, "left");
        assert_eq!(param.ty, ParamType::known("number"));
    }

    #[test]
    fn test_other_tags_are_ignored() {
        let result = scan_app("import { t } from './i18n';\ncss`color: red`;\nt`Hello`;");
        assert_eq!(keys(&result), vec!["`Hello`"]);
    }

    #[test]
    fn test_import_from_other_module_is_ignored() {
        let result = scan_app("import { t } from './other';\nt`Hello`;");
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_aliased_import() {
        let result = scan_app("import { t as tr } from './i18n';\ntr`Hello`;");
        assert_eq!(keys(&result), vec!["`Hello`"]);
    }

    #[test]
    fn test_namespace_import() {
        let result = scan_app("import * as i18n from './i18n';\ni18n.t`Hello`;");
        assert_eq!(keys(&result), vec!["`Hello`"]);
    }

    #[test]
    fn test_shadowed_tag_is_ignored() {
        let result = scan_app(
            "import { t } from './i18n';\nfunction f(t: any) { return t`Inner`; }\nt`Outer`;",
        );
        assert_eq!(keys(&result), vec!["`Outer`"]);
    }

    #[test]
    fn test_tag_in_declaring_file() {
        let i18n = parse(
            &format!("{}export const title = t`Title`;\n", I18N),
            "src/i18n.ts",
        );
        let target = find_in_file("src/i18n.ts", &i18n, "translator").unwrap();
        let known: HashSet<PathBuf> = [PathBuf::from("src/i18n.ts")].into_iter().collect();
        let result = TemplateScanner::new("src/i18n.ts", &i18n, Some(&target), &known).scan();
        assert_eq!(keys(&result), vec!["`Title`"]);
    }

    #[test]
    fn test_without_target_every_tagged_template_counts() {
        let app = parse("css`color: red`;\nt`Hello`;", "src/app.ts");
        let known = HashSet::new();
        let result = TemplateScanner::new("src/app.ts", &app, None, &known).scan();
        assert_eq!(keys(&result), vec!["`color: red`", "`Hello`"]);
    }

    #[test]
    fn test_call_note_and_key_override() {
        let result = scan_app(
            "import { t } from './i18n';\nt`Welcome back`; // @welcome Shown after login\nt`Bye`; // Shown on logout",
        );
        assert_eq!(keys(&result), vec!["welcome", "`Bye`"]);
        assert_eq!(result.records[0].notes.full(), Some("Shown after login"));
        assert_eq!(result.records[1].notes.full(), Some("Shown on logout"));
    }

    #[test]
    fn test_comment_on_next_line_is_not_a_note() {
        let result = scan_app("import { t } from './i18n';\nt`Hello`;\n// unrelated\n");
        assert_eq!(result.records[0].notes, Notes::new());
    }

    #[test]
    fn test_slot_note() {
        let result = scan_app(
            "import { t } from './i18n';\nconst n = 1;\nt`Items: ${n /* item count */}`;",
        );
        let record = &result.records[0];
        assert_eq!(record.notes.param("n"), Some("item count"));
        assert_eq!(record.param_note(&record.params[0]), Some("item count"));
    }

    #[test]
    fn test_param_named_full_keeps_slot_note() {
        let result = scan_app(
            "import { t } from './i18n';\nconst full = 1;\nt`${full /* count of items */} items`; // Shown in cart",
        );
        let record = &result.records[0];
        assert_eq!(record.params[0].name, "full");
        assert_eq!(record.notes.full(), Some("Shown in cart"));
        assert_eq!(record.param_note(&record.params[0]), Some("count of items"));
    }

    #[test]
    fn test_nested_tagged_template_in_slot() {
        let result = scan_app("import { t } from './i18n';\nt`Outer ${t`Inner`}`;");
        assert_eq!(keys(&result), vec!["`Outer ${0}`", "`Inner`"]);
        assert_eq!(result.records[0].params[0].ty, ParamType::known("string"));
    }

    #[test]
    fn test_for_in_key_is_string() {
        let result = scan_app(
            "import { t } from './i18n';\nfor (const key in obj) { t`Key ${key}`; }",
        );
        assert_eq!(result.records[0].params[0].ty, ParamType::known("string"));
    }
}
