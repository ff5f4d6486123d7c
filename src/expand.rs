//! Expansion engine (§4.1): closes a position set under the ε-like rules arising
//! from `Intersection`/`XOR` twin pairing and `BegLine`/`EndLine` anchors.
///
/// Grounded on `DFA::ExpandStates` in the original source. That implementation
/// tracks incremental "seen" bookkeeping (`intersections`/`exclusives`/`exclusives_`)
/// across a `goto entry`-restarted scan; since no rule here ever removes anything
/// from the position set, recomputing each predicate directly against the *current*
/// set on every pass converges to the same fixed point without needing that
/// bookkeeping or a non-local jump (§9 "Non-local control flow").
use std::collections::BTreeMap;

use crate::expr::ExprArena;
use crate::expr::ExprId;
use crate::expr::ExprKind;
use crate::expr::OperatorKind;
use crate::expr::PositionSet;

pub fn expand_states(arena: &ExprArena, states: &mut PositionSet, begline: bool, endline: bool) {
	loop {
		let size_before = states.len();
		let mut to_add: PositionSet = PositionSet::new();

		apply_intersection_pairing(arena, states, &mut to_add);
		apply_xor_pairing(arena, states, &mut to_add);
		if begline {
			apply_anchor(arena, states, &mut to_add, |e| matches!(e.kind, ExprKind::BegLine));
		}
		if endline {
			apply_anchor(arena, states, &mut to_add, |e| matches!(e.kind, ExprKind::EndLine));
		}

		states.extend(to_add);
		if states.len() == size_before {
			break;
		}
	}
}

fn apply_intersection_pairing(arena: &ExprArena, states: &PositionSet, to_add: &mut PositionSet) {
	for &p in states.iter() {
		if let ExprKind::Operator {
			kind: OperatorKind::Intersection,
			pair,
			..
		} = arena[p].kind
		{
			if states.contains(&pair) {
				to_add.extend(arena[p].follow.iter().copied());
			}
		}
	}
}

fn apply_xor_pairing(arena: &ExprArena, states: &PositionSet, to_add: &mut PositionSet) {
	let mut by_id: BTreeMap<u32, Vec<ExprId>> = BTreeMap::new();
	for &p in states.iter() {
		if let ExprKind::Operator { kind: OperatorKind::Xor, id, .. } = arena[p].kind {
			by_id.entry(id).or_default().push(p);
		}
	}
	for (_, nodes) in by_id {
		// Both twins share one `id`; if only one of the (at most two) twins is
		// present, its twin is absent and its follow set fires.
		if nodes.len() == 1 {
			to_add.extend(arena[nodes[0]].follow.iter().copied());
		}
	}
}

fn apply_anchor(
	arena: &ExprArena,
	states: &PositionSet,
	to_add: &mut PositionSet,
	is_anchor: impl Fn(&crate::expr::Expr) -> bool,
) {
	for &p in states.iter() {
		if is_anchor(&arena[p]) {
			to_add.extend(arena[p].follow.iter().copied());
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::expr::ExprArena;

	#[test]
	fn intersection_fires_only_when_both_twins_present() {
		let mut arena = ExprArena::new();
		let a = arena.literal(b'a');
		let b = arena.literal(b'b');
		let inter = arena.intersection(a, b);
		let eop = arena.eop();
		arena.fill_transitions(inter);
		let ExprKind::Intersection { wrapped_lhs, wrapped_rhs, .. } = arena[inter].kind else {
			panic!()
		};
		// Manually thread "after the intersection comes eop" since we didn't wrap
		// with a real root Concat in this unit test.
		for &p in arena[inter].last.clone().iter() {
			arena[p].follow.insert(eop);
		}

		let lop = *arena[wrapped_lhs].last.iter().next().unwrap();
		let rop = *arena[wrapped_rhs].last.iter().next().unwrap();

		let mut only_lhs: PositionSet = [lop].into_iter().collect();
		expand_states(&arena, &mut only_lhs, false, false);
		assert!(!only_lhs.contains(&eop));

		let mut both: PositionSet = [lop, rop].into_iter().collect();
		expand_states(&arena, &mut both, false, false);
		assert!(both.contains(&eop));
	}

	#[test]
	fn xor_fires_only_when_exactly_one_twin_present() {
		let mut arena = ExprArena::new();
		let a = arena.literal(b'a');
		let b = arena.literal(b'b');
		let x = arena.xor(a, b);
		let eop = arena.eop();
		arena.fill_transitions(x);
		let ExprKind::Xor { wrapped_lhs, wrapped_rhs, .. } = arena[x].kind else {
			panic!()
		};
		for &p in arena[x].last.clone().iter() {
			arena[p].follow.insert(eop);
		}
		let lop = *arena[wrapped_lhs].last.iter().next().unwrap();
		let rop = *arena[wrapped_rhs].last.iter().next().unwrap();

		let mut only_lhs: PositionSet = [lop].into_iter().collect();
		expand_states(&arena, &mut only_lhs, false, false);
		assert!(only_lhs.contains(&eop));

		let mut both: PositionSet = [lop, rop].into_iter().collect();
		expand_states(&arena, &mut both, false, false);
		assert!(!both.contains(&eop));
	}
}
