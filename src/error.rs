//! Structured errors the construction driver surfaces (§7).
///
/// Hand-rolled in the style this codebase's pattern-parser error type already uses
/// (no `thiserror`/`anyhow` in the dependency graph); `StateLimitExceeded` is *not*
/// produced by the normal build path (an incomplete DFA is a valid degrade-gracefully
/// artifact, not a failure — see [`crate::dfa::Dfa::build`]) but is reserved for APIs
/// that require a complete DFA up front, like the minimizer and optimizer.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BuildError {
	/// The input tree has no root; construction refuses.
	ExpressionEmpty,
	/// Construction could not finish within the caller-provided state cap.
	StateLimitExceeded,
	/// A parent/child link in the expression tree does not reconcile when back
	/// references or operator twins are patched. Indicates a bug in whatever
	/// produced the tree, not a user error.
	InconsistentTree,
	/// A character-class (or transition-filling) operation was passed a node type it
	/// cannot summarize.
	InvalidExpressionType,
}

impl std::fmt::Display for BuildError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let msg = match self {
			Self::ExpressionEmpty => "expression tree has no root",
			Self::StateLimitExceeded => "DFA construction exceeded the configured state limit",
			Self::InconsistentTree => "expression tree has an inconsistent parent/child link",
			Self::InvalidExpressionType => "node type cannot be summarized as a character class",
		};
		f.write_str(msg)
	}
}

impl std::error::Error for BuildError {}
