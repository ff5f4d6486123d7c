//! Non-greedy rewriter (§4.2).
///
/// Grounded on `DFA::MakeNonGreedy` / `DFA::TrimNonGreedy` in the original source:
/// cloning is memoized per-position (`non_greedy_pair`/`near_root_non_greedy_pair`)
/// so repeated visits to the same position during construction don't keep allocating
/// fresh twins.
use crate::expr::ExprArena;
use crate::expr::ExprId;
use crate::expr::PositionSet;

/// Rewrites `state`'s follow set so every non-`EOP`, not-yet-non-greedy successor is
/// replaced by its non-greedy twin (cloning one into the arena's pool on first use).
/// Idempotent: a no-op once `complete_non_greedy` is set.
pub fn make_non_greedy(arena: &mut ExprArena, state: ExprId) {
	if arena[state].complete_non_greedy {
		return;
	}

	let follow: Vec<ExprId> = arena[state].follow.iter().copied().collect();
	let root_non_greedy = arena[state].root_non_greedy;
	let mut new_follow = PositionSet::new();

	for next in follow {
		if arena[next].non_greedy || arena[next].is_eop() {
			new_follow.insert(next);
			continue;
		}

		let existing = if root_non_greedy {
			arena[next].near_root_non_greedy_pair
		} else {
			arena[next].non_greedy_pair
		};

		let twin = existing.unwrap_or_else(|| {
			let twin = arena.clone_leaf(next);
			arena[twin].non_greedy = true;
			arena[twin].follow = arena[next].follow.clone();
			if root_non_greedy {
				arena[next].near_root_non_greedy_pair = Some(twin);
				arena[twin].near_root_non_greedy_pair = Some(next);
			} else {
				arena[next].non_greedy_pair = Some(twin);
				arena[twin].non_greedy_pair = Some(next);
			}
			twin
		});
		new_follow.insert(twin);
	}

	arena[state].follow = new_follow;
	arena[state].complete_non_greedy = true;
}

/// Removes every non-greedy position from `states` once an accept position (`EOP`)
/// is reachable, reinstating each trimmed position's greedy twin so alternatives
/// elsewhere in the pattern still survive.
pub fn trim_non_greedy(arena: &ExprArena, states: &mut PositionSet) {
	let trimmed: Vec<ExprId> = states.iter().copied().filter(|&p| arena[p].non_greedy).collect();
	for p in trimmed {
		if let Some(pair) = arena[p].non_greedy_pair {
			states.insert(pair);
		}
		states.remove(&p);
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::expr::ExprArena;

	#[test]
	fn twin_is_memoized_across_calls() {
		let mut arena = ExprArena::new();
		let a = arena.literal(b'a');
		let b = arena.literal(b'b');
		arena[a].follow.insert(b);
		arena[a].non_greedy = true;
		arena[a].root_non_greedy = true;

		make_non_greedy(&mut arena, a);
		let first_twin = *arena[a].follow.iter().next().unwrap();
		arena[a].complete_non_greedy = false;
		make_non_greedy(&mut arena, a);
		let second_twin = *arena[a].follow.iter().next().unwrap();
		assert_eq!(first_twin, second_twin);
		assert_ne!(first_twin, b);
	}

	#[test]
	fn trim_reinstates_greedy_partner() {
		let mut arena = ExprArena::new();
		let a = arena.literal(b'a');
		let twin = arena.clone_leaf(a);
		arena[a].non_greedy_pair = Some(twin);
		arena[twin].non_greedy_pair = Some(a);
		arena[twin].non_greedy = true;

		let mut set: PositionSet = [twin].into_iter().collect();
		trim_non_greedy(&arena, &mut set);
		assert!(set.contains(&a));
		assert!(!set.contains(&twin));
	}
}
