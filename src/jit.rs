//! Read-only output contract for an external JIT emitter (§6 "Output contract to
//! the external JIT emitter").
///
/// No emitter is implemented in this crate (§9 "Process-wide state for the JIT
/// emitter (x86-specific)" — ISA/ABI selection is the emitter's concern, not the
/// core's); this trait exists so one can be added later against a stable,
/// narrow surface rather than reaching into [`crate::dfa::Dfa`]'s internals.
use crate::dfa::AlterTrans;
use crate::dfa::Dfa;
use crate::expr::ExprArena;
use crate::expr::ExprId;
use crate::expr::ExprKind;

/// Per-expression metadata an emitter can use for filter-prefix fast paths: which
/// bytes can occur anywhere in a match (`involve`), and the shortest possible
/// match length (`min_length`). "Longest keyword" filter-prefix selection from the
/// original JIT (§9 open question 2) is not reproduced here — it has no meaning
/// without an emitter to consume it.
#[derive(Debug, Clone, Copy)]
pub struct ExprMetadata {
	pub involve: [bool; 256],
	pub min_length: u32,
}

/// Walks every state-bearing node reachable from `root` and unions the bytes it
/// can consume into `involve`; `min_length` is read straight off the root (already
/// computed bottom-up by the syntax front-end / arena builders, §3).
pub fn metadata(arena: &ExprArena, root: ExprId) -> ExprMetadata {
	let mut involve = [false; 256];
	collect_involve(arena, root, &mut involve);
	ExprMetadata {
		involve,
		min_length: arena[root].min_length,
	}
}

fn collect_involve(arena: &ExprArena, id: ExprId, involve: &mut [bool; 256]) {
	match &arena[id].kind {
		ExprKind::Literal(b) => involve[*b as usize] = true,
		ExprKind::CharClass { negated, bytes } => {
			for c in 0..256 {
				if bytes[c] != *negated {
					involve[c] = true;
				}
			}
		},
		ExprKind::Dot { .. } => involve.fill(true),
		ExprKind::BegLine | ExprKind::EndLine | ExprKind::Eop | ExprKind::Operator { .. } => {},
		ExprKind::Concat(l, r) => {
			let (l, r) = (*l, *r);
			collect_involve(arena, l, involve);
			collect_involve(arena, r, involve);
		},
		ExprKind::Union(l, r) => {
			let (l, r) = (*l, *r);
			collect_involve(arena, l, involve);
			collect_involve(arena, r, involve);
		},
		ExprKind::Qmark(l) | ExprKind::Star(l) | ExprKind::Plus(l) => {
			let l = *l;
			collect_involve(arena, l, involve);
		},
		ExprKind::Intersection { wrapped_lhs, wrapped_rhs, .. } | ExprKind::Xor { wrapped_lhs, wrapped_rhs, .. } => {
			let (l, r) = (*wrapped_lhs, *wrapped_rhs);
			collect_involve(arena, l, involve);
			collect_involve(arena, r, involve);
		},
	}
}

pub trait JitView {
	fn num_states(&self) -> usize;
	fn accept(&self, id: u32) -> bool;
	fn transitions(&self, id: u32) -> &[u32; 256];
	fn alter_transition(&self, id: u32) -> AlterTrans;
	fn inline_level(&self, id: u32) -> u32;
	/// A symbol name an emitter can use to label the compiled block for state `id`.
	fn state2label(&self, id: u32) -> String;
}

impl JitView for Dfa<'_> {
	fn num_states(&self) -> usize {
		Dfa::num_states(self)
	}

	fn accept(&self, id: u32) -> bool {
		self.state(id).accept
	}

	fn transitions(&self, id: u32) -> &[u32; 256] {
		&self.state(id).transitions
	}

	fn alter_transition(&self, id: u32) -> AlterTrans {
		self.state(id).alter_transition
	}

	fn inline_level(&self, id: u32) -> u32 {
		self.state(id).inline_level
	}

	fn state2label(&self, id: u32) -> String {
		format!("dfa_state_{id}")
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::dfa::DfaBuilder;
	use crate::expr::ExprArena;
	use crate::options::Options;

	#[test]
	fn jit_view_exposes_transition_rows() {
		let mut arena = ExprArena::new();
		let a = arena.literal(b'a');
		let eop = arena.eop();
		let root = arena.concat(a, eop);
		arena.fill_transitions(root);
		let dfa = DfaBuilder::new(&mut arena, Options::default()).build(root, 100).unwrap();

		assert_eq!(JitView::num_states(&dfa), dfa.num_states());
		assert!(!JitView::accept(&dfa, 0));
		assert_eq!(JitView::state2label(&dfa, 0), "dfa_state_0");
		let row = JitView::transitions(&dfa, 0);
		assert_ne!(row[b'a' as usize], crate::dfa::REJECT);
	}

	#[test]
	fn metadata_collects_involved_bytes_and_min_length() {
		let mut arena = ExprArena::new();
		let a = arena.literal(b'a');
		let b = arena.literal(b'b');
		let cat = arena.concat(a, b);
		let meta = metadata(&arena, cat);
		assert!(meta.involve[b'a' as usize]);
		assert!(meta.involve[b'b' as usize]);
		assert!(!meta.involve[b'c' as usize]);
		assert_eq!(meta.min_length, 2);
	}
}
