//! Best-effort static type descriptors.
//!
//! There is no type checker behind swc's AST, so types come from two places:
//! explicit annotations (rendered from the source text of the annotation) and
//! a small inference over expression shapes whose type is obvious:
//!
//! - literals, template literals, tagged templates
//! - arithmetic, comparison, and logical operators
//! - `as` / `satisfies` / `<T>` assertions
//! - identifiers already resolved in scope
//! - calls to functions with a declared return type
//!
//! Anything else is left unresolved so the caller can pick its own fallback.

use swc_common::Spanned;
use swc_ecma_ast::{
    BinaryOp, Callee, Expr, Function, Lit, MemberProp, Pat, TsType, TsTypeAnn, UnaryOp,
    VarDeclarator,
};

use crate::core::data::ParamType;
use crate::core::extract::scope::{Binding, ScopeStack};
use crate::core::parsers::source::ParsedSource;

/// String methods whose result is always a string.
const STRING_METHODS: &[&str] = &[
    "toString",
    "toFixed",
    "toPrecision",
    "toLocaleString",
    "toUpperCase",
    "toLowerCase",
    "trim",
    "trimStart",
    "trimEnd",
    "join",
    "padStart",
    "padEnd",
    "slice",
    "substring",
    "replace",
    "replaceAll",
];

/// Render a type node from its source text, with whitespace collapsed.
pub fn type_text(source: &ParsedSource, ty: &TsType) -> ParamType {
    source
        .text(ty.span())
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
        .map(ParamType::Known)
        .unwrap_or(ParamType::Unknown)
}

pub fn annotation_type(source: &ParsedSource, ann: &TsTypeAnn) -> ParamType {
    type_text(source, &ann.type_ann)
}

/// Declared type of a pattern (`x: number`), if any.
pub fn pat_annotation(source: &ParsedSource, pat: &Pat) -> Option<ParamType> {
    let type_ann = match pat {
        Pat::Ident(ident) => ident.type_ann.as_deref(),
        Pat::Assign(assign) => return pat_annotation(source, &assign.left),
        Pat::Array(arr) => arr.type_ann.as_deref(),
        Pat::Object(obj) => obj.type_ann.as_deref(),
        Pat::Rest(rest) => rest.type_ann.as_deref(),
        _ => None,
    }?;
    Some(annotation_type(source, type_ann))
}

/// Declared return type of a function, `Unknown` when not annotated.
pub fn return_type(source: &ParsedSource, function: &Function) -> ParamType {
    function
        .return_type
        .as_deref()
        .map(|ann| annotation_type(source, ann))
        .unwrap_or(ParamType::Unknown)
}

/// Binding introduced by a variable declarator with a simple identifier name.
pub fn declarator_binding(
    source: &ParsedSource,
    decl: &VarDeclarator,
    scopes: &ScopeStack,
) -> Binding {
    if let Some(init) = &decl.init {
        match &**init {
            Expr::Arrow(arrow) => {
                let return_type = arrow
                    .return_type
                    .as_deref()
                    .map(|ann| annotation_type(source, ann))
                    .unwrap_or(ParamType::Unknown);
                return Binding::Function { return_type };
            }
            Expr::Fn(fn_expr) => {
                return Binding::Function {
                    return_type: return_type(source, &fn_expr.function),
                };
            }
            _ => {}
        }
    }

    let ty = pat_annotation(source, &decl.name)
        .or_else(|| {
            decl.init
                .as_deref()
                .and_then(|init| infer_expr_type(source, init, scopes))
        })
        .unwrap_or(ParamType::Unknown);
    Binding::Value(ty)
}

fn known(ty: &str) -> Option<ParamType> {
    Some(ParamType::known(ty))
}

fn is(ty: &Option<ParamType>, name: &str) -> bool {
    matches!(ty, Some(ParamType::Known(t)) if t == name)
}

/// Infer the type of an expression, `None` when it cannot be derived.
pub fn infer_expr_type(
    source: &ParsedSource,
    expr: &Expr,
    scopes: &ScopeStack,
) -> Option<ParamType> {
    match expr {
        Expr::Lit(lit) => match lit {
            Lit::Str(_) => known("string"),
            Lit::Num(_) => known("number"),
            Lit::Bool(_) => known("boolean"),
            Lit::BigInt(_) => known("bigint"),
            Lit::Null(_) => known("null"),
            Lit::Regex(_) => known("RegExp"),
            _ => None,
        },
        Expr::Tpl(_) | Expr::TaggedTpl(_) => known("string"),
        Expr::Paren(paren) => infer_expr_type(source, &paren.expr, scopes),
        Expr::TsNonNull(non_null) => infer_expr_type(source, &non_null.expr, scopes),
        Expr::TsConstAssertion(assertion) => infer_expr_type(source, &assertion.expr, scopes),
        Expr::TsAs(as_expr) => Some(type_text(source, &as_expr.type_ann)),
        Expr::TsTypeAssertion(assertion) => Some(type_text(source, &assertion.type_ann)),
        Expr::TsSatisfies(satisfies) => infer_expr_type(source, &satisfies.expr, scopes)
            .or_else(|| Some(type_text(source, &satisfies.type_ann))),
        Expr::Unary(unary) => match unary.op {
            UnaryOp::Bang | UnaryOp::Delete => known("boolean"),
            UnaryOp::TypeOf => known("string"),
            UnaryOp::Minus | UnaryOp::Plus | UnaryOp::Tilde => known("number"),
            UnaryOp::Void => known("undefined"),
        },
        Expr::Update(_) => known("number"),
        Expr::Bin(bin) => match bin.op {
            BinaryOp::Add => {
                let left = infer_expr_type(source, &bin.left, scopes);
                let right = infer_expr_type(source, &bin.right, scopes);
                if is(&left, "string") || is(&right, "string") {
                    known("string")
                } else if is(&left, "number") && is(&right, "number") {
                    known("number")
                } else {
                    None
                }
            }
            BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Mod
            | BinaryOp::Exp
            | BinaryOp::LShift
            | BinaryOp::RShift
            | BinaryOp::ZeroFillRShift
            | BinaryOp::BitOr
            | BinaryOp::BitXor
            | BinaryOp::BitAnd => known("number"),
            BinaryOp::EqEq
            | BinaryOp::NotEq
            | BinaryOp::EqEqEq
            | BinaryOp::NotEqEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq
            | BinaryOp::In
            | BinaryOp::InstanceOf => known("boolean"),
            BinaryOp::LogicalOr | BinaryOp::LogicalAnd | BinaryOp::NullishCoalescing => {
                let left = infer_expr_type(source, &bin.left, scopes)?;
                let right = infer_expr_type(source, &bin.right, scopes)?;
                (left == right).then_some(left)
            }
        },
        Expr::Cond(cond) => {
            let cons = infer_expr_type(source, &cond.cons, scopes)?;
            let alt = infer_expr_type(source, &cond.alt, scopes)?;
            (cons == alt).then_some(cons)
        }
        Expr::Ident(ident) => scopes
            .get(&ident.sym)
            .map(Binding::value_type)
            .filter(|ty| !ty.is_unknown()),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) if &*prop.sym == "length" => known("number"),
            _ => None,
        },
        Expr::Call(call) => {
            let Callee::Expr(callee) = &call.callee else {
                return None;
            };
            match &**callee {
                Expr::Ident(ident) => match scopes.get(&ident.sym) {
                    Some(Binding::Function { return_type }) if !return_type.is_unknown() => {
                        Some(return_type.clone())
                    }
                    _ => None,
                },
                Expr::Member(member) => match &member.prop {
                    MemberProp::Ident(prop) if STRING_METHODS.contains(&&*prop.sym) => {
                        known("string")
                    }
                    _ => None,
                },
                _ => None,
            }
        }
        _ => None,
    }
}
