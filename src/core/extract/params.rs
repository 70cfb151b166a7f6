//! Slot parameter resolution.
//!
//! Each `${...}` slot becomes a [`ParameterDescriptor`]. A bare identifier that
//! resolves in scope keeps its name and binding type; every other expression
//! gets a positional `p<ordinal>` name and an inferred type.

use std::collections::HashSet;

use anyhow::{Result, anyhow};
use swc_common::Spanned;
use swc_ecma_ast::Expr;

use crate::core::data::{ParamType, ParameterDescriptor};
use crate::core::extract::node::NodeKind;
use crate::core::extract::scope::ScopeStack;
use crate::core::extract::types::infer_expr_type;
use crate::core::parsers::source::ParsedSource;

/// A slot's name before uniqueness is enforced.
struct Candidate {
    ident: Option<String>,
    ty: ParamType,
    text: String,
}

pub struct ParamResolver<'a> {
    source: &'a ParsedSource,
    scopes: &'a ScopeStack,
    /// Type used for non-identifier slots whose own type cannot be inferred.
    fallback_type: &'a ParamType,
}

impl<'a> ParamResolver<'a> {
    pub fn new(
        source: &'a ParsedSource,
        scopes: &'a ScopeStack,
        fallback_type: &'a ParamType,
    ) -> Self {
        Self {
            source,
            scopes,
            fallback_type,
        }
    }

    /// Resolve every slot of a template, in order.
    ///
    /// Fails when a slot's span cannot be mapped back to source text.
    pub fn resolve(&self, exprs: &[Box<Expr>]) -> Result<Vec<ParameterDescriptor>> {
        let candidates = exprs
            .iter()
            .map(|expr| self.candidate(expr))
            .collect::<Result<Vec<_>>>()?;
        Ok(assign_names(candidates))
    }

    fn candidate(&self, expr: &Expr) -> Result<Candidate> {
        let span = expr.span();
        let text = self
            .source
            .text(span)
            .ok_or_else(|| anyhow!("slot span {:?} is outside the file", span))?
            .to_string();

        if let NodeKind::Identifier(ident) = NodeKind::classify(expr)
            && let Some(binding) = self.scopes.get(&ident.sym)
        {
            return Ok(Candidate {
                ident: Some(ident.sym.to_string()),
                ty: binding.value_type(),
                text,
            });
        }

        let ty = infer_expr_type(self.source, expr, self.scopes)
            .unwrap_or_else(|| self.fallback_type.clone());
        Ok(Candidate {
            ident: None,
            ty,
            text,
        })
    }
}

/// Give every slot a unique name.
///
/// The first occurrence of an identifier keeps its name. Repeats and
/// non-identifier slots take `p<ordinal>`, moving to the next free ordinal
/// when that name is already taken by a real identifier.
fn assign_names(candidates: Vec<Candidate>) -> Vec<ParameterDescriptor> {
    let idents: HashSet<String> = candidates
        .iter()
        .filter_map(|c| c.ident.clone())
        .collect();
    let mut used: HashSet<String> = HashSet::new();

    candidates
        .into_iter()
        .enumerate()
        .map(|(ordinal, candidate)| {
            let name = match candidate.ident {
                Some(ident) if !used.contains(&ident) => ident,
                _ => {
                    let mut n = ordinal;
                    loop {
                        let name = format!("p{}", n);
                        if !used.contains(&name) && !idents.contains(&name) {
                            break name;
                        }
                        n += 1;
                    }
                }
            };
            used.insert(name.clone());
            ParameterDescriptor::new(name, candidate.ty, candidate.text)
        })
        .collect()
}
