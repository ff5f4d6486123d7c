//! Matching driver over a built [`crate::dfa::Dfa`] (§4.5), for both complete and
//! on-the-fly DFAs.
///
/// Grounded on `DFA::Match`/`DFA::OnTheFlyMatch` in `original_source/src/dfa.cc`.
/// Unified here into one driver rather than the original's two near-duplicate
/// functions: [`crate::dfa::Dfa::step_on_the_fly`] already returns the cached
/// transition immediately when one exists, so calling it unconditionally costs
/// nothing extra on a complete DFA and removes the need to special-case
/// `complete()` at the call site (documented as a resolved design choice in
/// `DESIGN.md`, not a behavior change).
use crate::dfa::REJECT;
use crate::dfa::UNDEF;
use crate::dfa::Dfa;

/// A matched sub-range of the original (not reversed) input, `start..end` in byte
/// offsets, half-open.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MatchRange {
	pub start: usize,
	pub end: usize,
}

/// Reports whether some substring of `input` is accepted, trying successive start
/// offsets (forward mode) or end offsets (reverse mode) until [`is_match_anchored`]
/// succeeds or the input is exhausted — see [`find`] for why this sliding retry is
/// needed on top of the single anchored-at-offset-0 scan §4.5 describes.
pub fn is_match(dfa: &mut Dfa<'_>, input: &[u8]) -> bool {
	let options = *dfa.options();
	if options.reverse_match {
		(0..=input.len()).rev().any(|end| is_match_anchored(dfa, &input[..end]))
	} else {
		(0..=input.len()).any(|start| is_match_anchored(dfa, &input[start..]))
	}
}

/// Runs the scan once (§4.5 steps 1-3), anchored at offset 0 of `input` (or its end,
/// in reverse mode), and reports whether it is accepted, without tracking a match
/// boundary. Cheaper than [`find_anchored`] when the caller only needs a yes/no
/// answer.
fn is_match_anchored(dfa: &mut Dfa<'_>, input: &[u8]) -> bool {
	let options = *dfa.options();
	let len = input.len();
	let mut state = 0u32;
	let mut pos = if options.reverse_match { len } else { 0 };

	loop {
		if options.reverse_match {
			if pos == 0 {
				break;
			}
		} else if pos == len {
			break;
		}
		let idx = if options.reverse_match { pos - 1 } else { pos };
		let b = input[idx];
		let next = dfa.step_on_the_fly(state, b);
		if next == REJECT {
			return false;
		}
		state = next;
		pos = if options.reverse_match { pos - 1 } else { pos + 1 };
	}

	if dfa.is_accept(state) {
		return true;
	}
	if state != REJECT {
		let begline = options.reverse_match && len == 0 || !options.reverse_match && input.is_empty();
		return dfa.reaccepts_at_boundary(state, begline);
	}
	false
}

/// Reports the leftmost sub-range of `input` that [`find_anchored`] accepts, trying
/// successive start offsets (forward mode) or end offsets (reverse mode).
///
/// §4.5 only describes a single scan anchored at offset 0 (or `len`, reverse mode);
/// that alone can never find a match that doesn't begin at the very start of the
/// buffer (e.g. `"abc"` against `"xabcy"`, SPEC_FULL.md §8 scenario 1, sub-range
/// `[1, 4)`). Every caller that wants substring search — `demos/grep.rs` included —
/// goes through this sliding retry rather than [`find_anchored`] directly.
pub fn find(dfa: &mut Dfa<'_>, input: &[u8]) -> Option<MatchRange> {
	let options = *dfa.options();
	if options.reverse_match {
		// Truncating from the right preserves offset 0 as the buffer's true start,
		// so `find_anchored`'s sub-range needs no adjustment here.
		(0..=input.len()).rev().find_map(|end| find_anchored(dfa, &input[..end]))
	} else {
		(0..=input.len()).find_map(|start| {
			find_anchored(dfa, &input[start..]).map(|range| MatchRange {
				start: range.start + start,
				end: range.end + start,
			})
		})
	}
}

/// Runs the scan with leftmost-longest boundary tracking (§4.5 steps 1-4), anchored
/// at offset 0 of `input` (or its end, in reverse mode), and reports the matched
/// sub-range, if any.
fn find_anchored(dfa: &mut Dfa<'_>, input: &[u8]) -> Option<MatchRange> {
	let options = *dfa.options();
	let len = input.len();
	let mut state = 0u32;
	let mut pos = if options.reverse_match { len } else { 0 };
	let mut matchptr: Option<usize> = None;

	if dfa.is_accept(state) {
		matchptr = Some(pos);
	}

	loop {
		if options.reverse_match {
			if pos == 0 {
				break;
			}
		} else if pos == len {
			break;
		}
		let idx = if options.reverse_match { pos - 1 } else { pos };
		let b = input[idx];
		let next = dfa.step_on_the_fly(state, b);
		if next == REJECT {
			break;
		}
		state = next;
		pos = if options.reverse_match { pos - 1 } else { pos + 1 };
		if dfa.is_accept(state) {
			matchptr = Some(pos);
		}
	}

	let mut accept = dfa.is_accept(state);
	if !accept && state != REJECT && pos == (if options.reverse_match { 0 } else { len }) {
		let begline = options.reverse_match && len == 0 || !options.reverse_match && input.is_empty();
		accept = dfa.reaccepts_at_boundary(state, begline);
	}

	let matched = accept || matchptr.is_some();
	if !matched {
		return None;
	}
	let boundary = matchptr.unwrap_or(pos);

	if options.suffix_match && accept {
		// "Extends to end of input": forward mode reports the whole slice (matching
		// always starts at offset 0 in this single-pass matcher); reverse mode
		// reports from the true start of the buffer up to wherever the backward
		// scan's own boundary landed.
		return Some(if options.reverse_match {
			MatchRange { start: 0, end: boundary }
		} else {
			MatchRange { start: 0, end: len }
		});
	}

	Some(if options.reverse_match {
		MatchRange { start: boundary, end: len }
	} else {
		MatchRange { start: 0, end: boundary }
	})
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::dfa::DfaBuilder;
	use crate::dfa::UNDEF as _UNDEF;
	use crate::expr::ExprArena;
	use crate::expr::ExprId;
	use crate::options::Options;
	use crate::options::OptionsBuilder;

	fn build(pattern: &[u8], options: Options) -> (ExprArena, ExprId, Options) {
		let mut arena = ExprArena::new();
		let mut chars = pattern.iter().map(|&b| arena.literal(b));
		let mut acc = chars.next().unwrap();
		for c in chars {
			acc = arena.concat(acc, c);
		}
		let eop = arena.eop();
		let root = arena.concat(acc, eop);
		arena.fill_transitions(root);
		(arena, root, options)
	}

	#[test]
	fn exact_literal_matches_whole_input() {
		let (mut arena, root, options) = build(b"abc", Options::default());
		let mut dfa = DfaBuilder::new(&mut arena, options).build(root, 100).unwrap();
		assert!(is_match(&mut dfa, b"abc"));
		assert!(!is_match(&mut dfa, b"abd"));
	}

	#[test]
	fn find_reports_leftmost_longest_prefix_match() {
		let (mut arena, root, options) = build(b"ab", Options::default());
		let mut dfa = DfaBuilder::new(&mut arena, options).build(root, 100).unwrap();
		// "ab" accepts only the exact two-byte string; a longer input with a
		// trailing REJECT byte still reports the accepted prefix via matchptr.
		let range = find(&mut dfa, b"ab").expect("should match");
		assert_eq!(range, MatchRange { start: 0, end: 2 });
	}

	#[test]
	fn find_locates_match_not_anchored_at_start() {
		// SPEC_FULL.md §8 scenario 1: "abc" against "xabcy" matches [1, 4).
		let (mut arena, root, options) = build(b"abc", Options::default());
		let mut dfa = DfaBuilder::new(&mut arena, options).build(root, 100).unwrap();
		let range = find(&mut dfa, b"xabcy").expect("should match as a substring");
		assert_eq!(range, MatchRange { start: 1, end: 4 });
		assert!(is_match(&mut dfa, b"xabcy"));
		assert!(!is_match(&mut dfa, b"xaby"));
	}

	#[test]
	fn reverse_match_scans_from_the_end() {
		let options = OptionsBuilder::new().reverse_match(true).build();
		let (mut arena, root, options) = build(b"abc", options);
		let mut dfa = DfaBuilder::new(&mut arena, options).build(root, 100).unwrap();
		assert!(is_match(&mut dfa, b"abc"));
	}

	#[test]
	fn shortest_match_accepts_as_soon_as_possible() {
		let options = OptionsBuilder::new().shortest_match(true).build();
		let mut arena = ExprArena::new();
		let a = arena.literal(b'a');
		let a2 = arena.literal(b'a');
		let star = arena.star(a2, false);
		let cat = arena.concat(a, star);
		let eop = arena.eop();
		let root = arena.concat(cat, eop);
		arena.fill_transitions(root);
		let mut dfa = DfaBuilder::new(&mut arena, options).build(root, 100).unwrap();
		assert!(is_match(&mut dfa, b"a"));
		let _ = _UNDEF;
	}
}
