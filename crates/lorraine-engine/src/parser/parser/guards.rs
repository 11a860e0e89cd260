//! Parser guards against runaway recursion

use super::Parser;
use crate::parser::error::SyntaxError;

/// Maximum nesting depth before rejecting parse
///
/// Blocks, expressions and types share one counter. Debug builds overflow the
/// call stack well before a few hundred levels of recursive descent, and no
/// hand-written Lua++ comes anywhere near this.
pub const MAX_PARSE_DEPTH: usize = 64;

/// Run `inner` one nesting level deeper, failing once the limit is reached.
///
/// The depth is restored on every exit path so `?` can be used freely inside
/// `inner`.
pub fn with_depth<'src, 'c, T>(
    parser: &mut Parser<'src, 'c>,
    construct: &'static str,
    inner: impl FnOnce(&mut Parser<'src, 'c>) -> Result<T, SyntaxError>,
) -> Result<T, SyntaxError> {
    deepen(parser, construct)?;
    let result = inner(parser);
    parser.depth -= 1;
    result
}

/// Run a suffix loop such as `f()()` or `number[][]`.
///
/// Suffixes nest the tree without recursing, so the loop calls [`deepen`]
/// once per suffix. The depth on entry is restored when `inner` returns.
pub fn with_chain<'src, 'c, T>(
    parser: &mut Parser<'src, 'c>,
    inner: impl FnOnce(&mut Parser<'src, 'c>) -> Result<T, SyntaxError>,
) -> Result<T, SyntaxError> {
    let depth = parser.depth;
    let result = inner(parser);
    parser.depth = depth;
    result
}

/// Take one nesting level, failing once the limit is reached.
pub fn deepen(parser: &mut Parser<'_, '_>, construct: &'static str) -> Result<(), SyntaxError> {
    if parser.depth >= MAX_PARSE_DEPTH {
        return Err(SyntaxError::parser_limit_exceeded(
            parser.current().location,
            format!(
                "maximum nesting depth ({}) exceeded in {}",
                MAX_PARSE_DEPTH, construct
            ),
        ));
    }
    parser.depth += 1;
    Ok(())
}
