//! Optimizer (§4.7): `EliminateBranch` (alternate-transition extraction) and
//! `Reduce` (chain inlining).
///
/// Grounded on `DFA::EliminateBranch`/`DFA::Reduce` in
/// `original_source/src/dfa.cc`. Neither pass is required for interpreter
/// correctness (§4.7 closing note) — they populate `alter_transition`/`inline_level`
/// metadata an external JIT emitter would consume, but are deterministic and
/// independently testable here without one.
use crate::dfa::AlterTrans;
use crate::dfa::DfaState;
use crate::dfa::REJECT;
use crate::dfa::UNDEF;

/// Chains longer than this are truncated (§4.7, §8 "MAX_REDUCE cap").
pub const MAX_REDUCE: u32 = 10;

/// Scans a state's 256-wide row left to right for at most two maximal runs,
/// mirroring the original's linear scan exactly (not a generic "count distinct
/// targets" reimplementation) so the "begin/end is the *minority* run" property
/// falls out the same way it does there.
fn eliminate_branch_one(state: &mut DfaState) {
	let row = &state.transitions;
	let mut next1 = row[0];
	let mut next2 = UNDEF;
	let mut begin = 0u32;
	// Sentinel for "ran off the end of the row still inside the first run" — must
	// fit in `u8` once cast into `key`, unlike the run-length counter `c`.
	let mut end = 255u32;

	let mut c = 1usize;
	while c < 256 && row[c] == next1 {
		c += 1;
	}
	if c < 256 {
		next2 = next1;
		next1 = row[c];
		begin = c as u32;
		c += 1;
		while c < 256 && row[c] == next1 {
			c += 1;
		}
	}
	if c < 256 {
		end = (c - 1) as u32;
		c += 1;
		while c < 256 && row[c] == next2 {
			c += 1;
		}
	}
	if c < 256 {
		next1 = UNDEF;
		next2 = UNDEF;
	}

	state.alter_transition = AlterTrans {
		next1,
		next2,
		key: (begin as u8, end as u8),
	};
}

pub fn eliminate_branch(states: &mut [DfaState]) {
	for state in states.iter_mut() {
		eliminate_branch_one(state);
	}
}

/// Computes `inline_level[s]` for every state: the depth of a deterministic
/// straight-line chain rooted at `s` (§4.7 "Reduce").
///
/// Faithful to the original's `states_[0].src_states.insert(UNDEF)` trick: state 0
/// is never itself inlined into a predecessor, since nothing should eliminate the
/// DFA's externally-visible entry point.
pub fn reduce(states: &mut [DfaState]) {
	if states.is_empty() {
		return;
	}

	states[0].src_states.insert(UNDEF);

	let n = states.len();
	let mut inlined = vec![false; n];

	for start in 0..n {
		if inlined[start] {
			continue;
		}
		let mut current = start;
		loop {
			let dst = &states[current].dst_states;
			if dst.len() > 2 || dst.is_empty() {
				break;
			}
			if dst.len() == 2 && !dst.contains(&REJECT) {
				break;
			}
			if dst.len() == 1 && dst.contains(&REJECT) {
				break;
			}
			// The real (non-REJECT) successor is always numerically smaller, since
			// REJECT == u32::MAX - 1.
			let target = *dst.iter().next().unwrap();
			let target = target as usize;

			if states[target].alter_transition.next1 == UNDEF {
				break;
			}
			if states[target].src_states.len() != 1 || states[target].accept {
				break;
			}
			if inlined[target] {
				break;
			}

			inlined[target] = true;
			current = target;
			states[start].inline_level += 1;
			if states[start].inline_level >= MAX_REDUCE {
				break;
			}
		}
	}

	states[0].src_states.remove(&UNDEF);
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::dfa::DfaBuilder;
	use crate::dfa::REJECT;
	use crate::expr::ExprArena;
	use crate::options::Options;

	fn build(pattern: &[u8]) -> (ExprArena, crate::expr::ExprId) {
		let mut arena = ExprArena::new();
		let mut chars = pattern.iter().map(|&b| arena.literal(b));
		let mut acc = chars.next().unwrap();
		for c in chars {
			acc = arena.concat(acc, c);
		}
		let eop = arena.eop();
		let root = arena.concat(acc, eop);
		arena.fill_transitions(root);
		(arena, root)
	}

	#[test]
	fn constant_row_has_single_target() {
		let mut state = blank_state();
		for t in state.transitions.iter_mut() {
			*t = 5;
		}
		eliminate_branch_one(&mut state);
		assert_eq!(state.alter_transition.next1, 5);
		assert_eq!(state.alter_transition.next2, UNDEF);
		assert_eq!(state.alter_transition.key, (0, 255));
	}

	#[test]
	fn two_way_contiguous_split_detected() {
		let mut state = blank_state();
		for (c, t) in state.transitions.iter_mut().enumerate() {
			*t = if (b'a' as usize..=b'z' as usize).contains(&c) { 1 } else { 2 };
		}
		eliminate_branch_one(&mut state);
		assert_eq!(state.alter_transition.next1, 1);
		assert_eq!(state.alter_transition.next2, 2);
		assert_eq!(state.alter_transition.key, (b'a', b'z'));
	}

	#[test]
	fn three_way_split_has_no_alternate_form() {
		let mut state = blank_state();
		for (c, t) in state.transitions.iter_mut().enumerate() {
			*t = (c % 3) as u32;
		}
		eliminate_branch_one(&mut state);
		assert_eq!(state.alter_transition.next1, UNDEF);
		assert_eq!(state.alter_transition.next2, UNDEF);
	}

	#[test]
	fn reduce_caps_chain_depth_at_max_reduce() {
		let (mut arena, root) = build(b"aaaaaaaaaaaaaaa");
		let dfa = DfaBuilder::new(&mut arena, Options::default()).build(root, 100).unwrap();
		let mut states = dfa.into_parts().2;
		eliminate_branch(&mut states);
		reduce(&mut states);
		assert!(states[0].inline_level <= MAX_REDUCE);
	}

	fn blank_state() -> DfaState {
		DfaState {
			accept: false,
			transitions: Box::new([REJECT; 256]),
			dst_states: Default::default(),
			src_states: Default::default(),
			alter_transition: AlterTrans::NONE,
			inline_level: 0,
		}
	}
}
