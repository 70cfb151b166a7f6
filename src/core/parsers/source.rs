use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use swc_common::{
    BytePos, FileName, Globals, SourceMap, Span,
    comments::{Comment, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Comments extracted from SingleThreadedComments during parsing.
///
/// Keeps swc's leading map (used to find doc comments on declarations) and a
/// position-sorted list of every comment (used for trailing annotations).
#[derive(Debug, Clone)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    sorted: Vec<Comment>,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        let leading: CommentMap = leading.iter().map(|(k, v)| (*k, v.clone())).collect();

        let mut sorted: Vec<Comment> = leading
            .values()
            .chain(trailing.values())
            .flat_map(|cmts| cmts.iter().cloned())
            .collect();
        sorted.sort_by_key(|cmt| cmt.span.lo);
        sorted.dedup_by_key(|cmt| cmt.span.lo);

        Self { leading, sorted }
    }

    /// Comments attached before the token starting at `pos`.
    pub fn leading_at(&self, pos: BytePos) -> &[Comment] {
        self.leading.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First comment starting at or after `pos`.
    pub fn first_from(&self, pos: BytePos) -> Option<&Comment> {
        let idx = self.sorted.partition_point(|cmt| cmt.span.lo < pos);
        self.sorted.get(idx)
    }

    /// Comments fully contained in `[lo, hi]`, in source order.
    pub fn within(&self, lo: BytePos, hi: BytePos) -> impl Iterator<Item = &Comment> {
        let start = self.sorted.partition_point(|cmt| cmt.span.lo < lo);
        self.sorted[start..]
            .iter()
            .take_while(move |cmt| cmt.span.hi <= hi)
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

/// A parsed source file: the module AST plus what the scanner needs to map
/// spans back to text, lines, and comments.
pub struct ParsedSource {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
    /// Original file content.
    pub code: String,
    /// Position of the first byte of `code` in `source_map`.
    pub start_pos: BytePos,
}

impl ParsedSource {
    /// Source text covered by a span, if the span belongs to this file.
    pub fn text(&self, span: Span) -> Option<&str> {
        let lo = self.offset(span.lo)?;
        let hi = self.offset(span.hi)?;
        self.code.get(lo..hi)
    }

    /// Source text between two positions.
    pub fn text_between(&self, lo: BytePos, hi: BytePos) -> Option<&str> {
        let lo = self.offset(lo)?;
        let hi = self.offset(hi)?;
        self.code.get(lo..hi)
    }

    /// 1-indexed line and column of a position.
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        let loc = self.source_map.lookup_char_pos(pos);
        (loc.line, loc.col_display + 1)
    }

    /// Byte offset of a position into `code`.
    pub fn offset(&self, pos: BytePos) -> Option<usize> {
        pos.0
            .checked_sub(self.start_pos.0)
            .map(|offset| offset as usize)
    }
}

/// Pick the swc syntax for a file: JSX parsing only for `.tsx`/`.jsx`, so
/// `<T>value` type assertions in `.ts` files keep parsing.
fn syntax_for(file_path: &str) -> Syntax {
    let tsx = matches!(
        Path::new(file_path).extension().and_then(|e| e.to_str()),
        Some("tsx" | "jsx")
    );
    Syntax::Typescript(TsSyntax {
        tsx,
        decorators: true,
        ..Default::default()
    })
}

/// Parse a TS/TSX/JS/JSX source string into an AST.
///
/// Accepts a shared SourceMap for thread-safe parallel parsing.
pub fn parse_source(
    code: String,
    file_path: &str,
    source_map: Arc<SourceMap>,
) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code.clone());
        let start_pos = source_file.start_pos;

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse source: {:?}", e))?;

        // Extract comments immediately (before SingleThreadedComments drops)
        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedSource {
            module,
            source_map,
            comments: extracted_comments,
            code,
            start_pos,
        })
    })
}
