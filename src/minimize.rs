//! DFA minimization (§4.6): pairwise-distinction (table-filling) equivalence
//! reduction, and complementation.
///
/// Grounded on `DFA::Minimize`/`DFA::Complementify` in `original_source/src/dfa.cc`.
/// Takes ownership of a [`crate::dfa::Dfa`] (via its private `into_parts`/`from_parts`
/// escape hatch) rather than mutating in place, since both passes may change the
/// number of live states.
use std::collections::BTreeSet;

use crate::dfa::AlterTrans;
use crate::dfa::Dfa;
use crate::dfa::DfaState;
use crate::dfa::REJECT;
use crate::dfa::SubsetCache;
use crate::expr::ExprArena;
use crate::expr::PositionSet;

#[tracing::instrument(skip(dfa))]
pub fn minimize<'arena>(dfa: Dfa<'arena>) -> Result<Dfa<'arena>, crate::error::BuildError> {
	let (arena, options, states, cache, limit, complete, _minimum) = dfa.into_parts();
	debug_assert!(complete);

	let n = states.len();
	if n == 0 {
		return Ok(Dfa::from_parts(arena, options, states, cache, limit, complete, true));
	}

	// `distinct[i][j]` for `i < j`: whether states `i` and `j` are provably
	// distinguishable (§4.6 step 1-2).
	let mut distinct = vec![vec![false; n]; n];
	for i in 0..n {
		for j in (i + 1)..n {
			distinct[i][j] = states[i].accept != states[j].accept;
		}
	}

	loop {
		let mut changed = false;
		for i in 0..n {
			for j in (i + 1)..n {
				if distinct[i][j] {
					continue;
				}
				for c in 0..256usize {
					let n1 = states[i].transitions[c];
					let n2 = states[j].transitions[c];
					if n1 == n2 {
						continue;
					}
					let pair_distinct = if n1 == REJECT || n2 == REJECT {
						true
					} else {
						let (lo, hi) = (n1.min(n2) as usize, n1.max(n2) as usize);
						distinct[lo][hi]
					};
					if pair_distinct {
						distinct[i][j] = true;
						changed = true;
						break;
					}
				}
			}
		}
		if !changed {
			break;
		}
	}

	// Each `j`'s representative is the smallest `i < j` with `!distinct[i][j]`
	// (§4.6 step 3 — "choose the smallest i<j with D[i][j]=false").
	let mut rep = vec![usize::MAX; n];
	for j in 0..n {
		let mut chosen = j;
		for i in 0..j {
			if !distinct[i][j] {
				chosen = i;
				break;
			}
		}
		rep[j] = chosen;
	}

	let mut renumber = vec![u32::MAX; n];
	let mut next_id = 0u32;
	for i in 0..n {
		if rep[i] == i {
			renumber[i] = next_id;
			next_id += 1;
		}
	}
	for i in 0..n {
		if renumber[i] == u32::MAX {
			renumber[i] = renumber[rep[i]];
		}
	}

	let mut new_states: Vec<DfaState> = Vec::with_capacity(next_id as usize);
	let mut new_reverse: Vec<PositionSet> = Vec::with_capacity(next_id as usize);
	for (i, old) in states.iter().enumerate() {
		if rep[i] != i {
			continue;
		}
		let mut transitions = Box::new([REJECT; 256]);
		let mut dst_states = BTreeSet::new();
		for c in 0..256 {
			let t = old.transitions[c];
			let renamed = if t == REJECT { REJECT } else { renumber[t as usize] };
			transitions[c] = renamed;
			dst_states.insert(renamed);
		}
		new_states.push(DfaState {
			accept: old.accept,
			transitions,
			dst_states,
			src_states: BTreeSet::new(),
			alter_transition: AlterTrans::NONE,
			inline_level: 0,
		});
		new_reverse.push(cache.reverse(i as u32).clone());
	}

	let edges: Vec<(u32, u32)> = new_states
		.iter()
		.enumerate()
		.flat_map(|(i, s)| {
			s.dst_states
				.iter()
				.copied()
				.filter(|&j| j != REJECT)
				.map(move |j| (i as u32, j))
		})
		.collect();
	for (i, j) in edges {
		new_states[j as usize].src_states.insert(i);
	}

	let mut new_cache = SubsetCache::default();
	for set in new_reverse {
		new_cache.insert_new(set);
	}

	Ok(Dfa::from_parts(arena, options, new_states, new_cache, limit, true, true))
}

/// §4.6 "Complementation": flip `accept` everywhere, then redirect every `REJECT`
/// edge to a single, lazily-created absorbing accept state.
#[tracing::instrument(skip(dfa))]
pub fn complement(dfa: Dfa<'_>) -> Dfa<'_> {
	let (arena, options, mut states, mut cache, limit, complete, minimum) = dfa.into_parts();

	for s in states.iter_mut() {
		s.accept = !s.accept;
	}

	let has_reject = states.iter().any(|s| s.dst_states.contains(&REJECT));
	if has_reject {
		let sink_id = states.len() as u32;
		let mut sink = DfaState {
			accept: true,
			transitions: Box::new([sink_id; 256]),
			dst_states: BTreeSet::from([sink_id]),
			src_states: BTreeSet::from([sink_id]),
			alter_transition: AlterTrans::NONE,
			inline_level: 0,
		};

		for s in states.iter_mut() {
			let mut redirected = false;
			for t in s.transitions.iter_mut() {
				if *t == REJECT {
					*t = sink_id;
					redirected = true;
				}
			}
			if redirected {
				s.dst_states.remove(&REJECT);
				s.dst_states.insert(sink_id);
			}
		}
		for (i, s) in states.iter().enumerate() {
			if s.dst_states.contains(&sink_id) {
				sink.src_states.insert(i as u32);
			}
		}
		states.push(sink);
		cache.insert_new(PositionSet::new());
	}

	Dfa::from_parts(arena, options, states, cache, limit, complete, minimum)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::dfa::DfaBuilder;
	use crate::dfa::REJECT;
	use crate::options::Options;

	fn alternation_dfa(arena: &mut ExprArena) -> crate::expr::ExprId {
		let a = arena.literal(b'a');
		let b = arena.literal(b'b');
		let u = arena.union(a, b);
		let eop = arena.eop();
		let root = arena.concat(u, eop);
		arena.fill_transitions(root);
		root
	}

	#[test]
	fn minimize_merges_equivalent_states() {
		let mut arena = ExprArena::new();
		let root = alternation_dfa(&mut arena);
		let dfa = DfaBuilder::new(&mut arena, Options::default()).build(root, 100).unwrap();
		let before = dfa.num_states();
		let min = dfa.minimize().unwrap();
		assert!(min.minimum());
		assert!(min.num_states() <= before);

		let accept_a = min.is_accept(min.state(0).transitions[b'a' as usize]);
		let accept_b = min.is_accept(min.state(0).transitions[b'b' as usize]);
		assert!(accept_a);
		assert!(accept_b);
	}

	#[test]
	fn minimize_is_idempotent() {
		let mut arena = ExprArena::new();
		let root = alternation_dfa(&mut arena);
		let dfa = DfaBuilder::new(&mut arena, Options::default()).build(root, 100).unwrap();
		let min1 = dfa.minimize().unwrap();
		let n1 = min1.num_states();
		let min2 = min1.minimize().unwrap();
		assert_eq!(n1, min2.num_states());
	}

	#[test]
	fn complement_flips_acceptance() {
		let mut arena = ExprArena::new();
		let a = arena.literal(b'a');
		let eop = arena.eop();
		let root = arena.concat(a, eop);
		arena.fill_transitions(root);
		let dfa = DfaBuilder::new(&mut arena, Options::default()).build(root, 100).unwrap();
		let accepted_before = dfa.is_accept(dfa.state(0).transitions[b'a' as usize]);
		assert!(accepted_before);

		let comp = dfa.complement();
		let s1 = comp.state(0).transitions[b'a' as usize];
		assert_ne!(s1, REJECT);
		assert!(!comp.is_accept(s1));
		// A byte the original rejected is now accepted by the complement's sink.
		let s2 = comp.state(0).transitions[b'x' as usize];
		assert!(comp.is_accept(s2));
	}
}
