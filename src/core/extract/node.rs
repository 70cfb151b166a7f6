//! Closed classification of the expression shapes the scanner cares about.

use swc_ecma_ast::{Expr, Ident, TaggedTpl, Tpl};

/// What an expression is, from the scanner's point of view.
#[derive(Debug, Clone, Copy)]
pub enum NodeKind<'a> {
    /// `` tag`...` ``, a candidate translator call.
    TaggedTemplate(&'a TaggedTpl),
    /// A template literal without substitutions.
    LiteralTemplate(&'a Tpl),
    /// A template literal with one or more `${...}` slots.
    SlotTemplate(&'a Tpl),
    /// A bare identifier.
    Identifier(&'a Ident),
    /// Anything else.
    Expression(&'a Expr),
}

impl<'a> NodeKind<'a> {
    pub fn classify(expr: &'a Expr) -> Self {
        match expr {
            Expr::TaggedTpl(tagged) => NodeKind::TaggedTemplate(tagged),
            Expr::Tpl(tpl) => Self::of_template(tpl),
            Expr::Ident(ident) => NodeKind::Identifier(ident),
            other => NodeKind::Expression(other),
        }
    }

    pub fn of_template(tpl: &'a Tpl) -> Self {
        if tpl.exprs.is_empty() {
            NodeKind::LiteralTemplate(tpl)
        } else {
            NodeKind::SlotTemplate(tpl)
        }
    }
}
