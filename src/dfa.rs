//! DFA state representation, subset cache, and the construction driver (§3, §4.3, §4.4).
///
/// Grounded on `DFA::Construct`/`DFA::FillTransition`/`DFA::get_new_state` in
/// `original_source/src/dfa.cc`: a BFS over position sets ("subsets"), deduplicated
/// against a forward/reverse cache, each dequeued subset producing one 256-wide
/// transition row. The `kernels: BTreeMap<Kernel, usize>` dedup pattern this
/// codebase already uses for tagged-NFA determinization (see the old `Tdfa` this
/// file replaced) is the same shape, generalized here to position-set keys.
use std::collections::BTreeSet;
use std::collections::VecDeque;

use crate::error::BuildError;
use crate::expand::expand_states;
use crate::expr::Expr;
use crate::expr::ExprArena;
use crate::expr::ExprId;
use crate::expr::ExprKind;
use crate::expr::PositionSet;
use crate::nongreedy::make_non_greedy;
use crate::nongreedy::trim_non_greedy;
use crate::options::Options;

/// Absorbing non-accepting sink: "definitely no match on this path."
pub const REJECT: u32 = u32::MAX - 1;
/// "Transition not yet computed" sentinel, used by on-the-fly matching.
pub const UNDEF: u32 = u32::MAX;

/// A compact summary of a state's transition row (§4.7): up to two targets over a
/// contiguous byte interval, consumed by an external JIT emitter. `next1` is always
/// the minority/interior target.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AlterTrans {
	pub next1: u32,
	pub next2: u32,
	pub key: (u8, u8),
}

impl AlterTrans {
	pub const NONE: Self = Self {
		next1: UNDEF,
		next2: UNDEF,
		key: (0, 0),
	};
}

impl Default for AlterTrans {
	fn default() -> Self {
		Self::NONE
	}
}

#[derive(Debug, Clone)]
pub struct DfaState {
	pub accept: bool,
	pub transitions: Box<[u32; 256]>,
	/// Distinct targets that appear in `transitions`, *including* `REJECT` when
	/// present (mirrors `State::dst_states` in `dfa.cc`, which is filled the same
	/// way during `Construct`). `UNDEF` only appears here for a partially built
	/// (`complete = false`) DFA.
	pub dst_states: BTreeSet<u32>,
	pub src_states: BTreeSet<u32>,
	pub alter_transition: AlterTrans,
	pub inline_level: u32,
}

impl DfaState {
	fn new(accept: bool) -> Self {
		Self {
			accept,
			transitions: Box::new([UNDEF; 256]),
			dst_states: BTreeSet::new(),
			src_states: BTreeSet::new(),
			alter_transition: AlterTrans::NONE,
			inline_level: 0,
		}
	}
}

/// Two-way mapping between position sets and DFA state ids (§2 "Subset cache").
/// `reverse` is indexed directly by id since ids are dense and assigned in order.
#[derive(Debug, Default)]
pub struct SubsetCache {
	forward: std::collections::BTreeMap<PositionSet, u32>,
	reverse: Vec<PositionSet>,
}

impl SubsetCache {
	pub(crate) fn len(&self) -> u32 {
		self.reverse.len() as u32
	}

	pub(crate) fn get(&self, set: &PositionSet) -> Option<u32> {
		self.forward.get(set).copied()
	}

	pub(crate) fn insert_new(&mut self, set: PositionSet) -> u32 {
		let id = self.len();
		self.forward.insert(set.clone(), id);
		self.reverse.push(set);
		id
	}

	pub fn reverse(&self, id: u32) -> &PositionSet {
		&self.reverse[id as usize]
	}
}

/// Whether state-bearing position `p` consumes byte `b`, honoring delimiter/one_line
/// rules (§4.3 step 3). Shared between eager transition-filling and the on-the-fly
/// matcher's single-byte evaluation so the two never drift apart.
fn matches_byte(kind: &ExprKind, options: &Options, b: u8) -> bool {
	match kind {
		ExprKind::Literal(l) => *l == b && (*l != options.delimiter || options.one_line),
		ExprKind::CharClass { negated, bytes } => {
			if b == options.delimiter && !options.one_line {
				return false;
			}
			let member = bytes[b as usize];
			if *negated { !member } else { member }
		},
		ExprKind::Dot { matches_delimiter } => {
			if b == options.delimiter && !options.one_line && !matches_delimiter {
				return false;
			}
			true
		},
		ExprKind::BegLine | ExprKind::EndLine => !options.one_line && b == options.delimiter,
		_ => false,
	}
}

fn contains_eop(arena: &ExprArena, set: &PositionSet) -> bool {
	set.iter().any(|&p| arena[p].is_eop())
}

/// Owns the expression arena exclusively while building (§5 "pool allocator... owned
/// by the DFA builder"); the resulting [`Dfa`] keeps the same mutable reference so
/// on-the-fly matching can keep extending the pool afterwards.
pub struct DfaBuilder<'arena> {
	arena: &'arena mut ExprArena,
	options: Options,
}

impl<'arena> DfaBuilder<'arena> {
	pub fn new(arena: &'arena mut ExprArena, options: Options) -> Self {
		Self { arena, options }
	}

	/// Runs the BFS construction driver (§4.3). Returns `Err(ExpressionEmpty)` only
	/// when the arena has no nodes at all; a state-limit overrun is not an error —
	/// it yields a `Dfa` with `complete() == false` that degrades to on-the-fly
	/// matching (§7).
	#[tracing::instrument(skip(self))]
	pub fn build(self, root: ExprId, limit: u32) -> Result<Dfa<'arena>, BuildError> {
		let Self { arena, options } = self;
		if arena.len() == 0 {
			return Err(BuildError::ExpressionEmpty);
		}

		let mut cache = SubsetCache::default();
		let mut states: Vec<DfaState> = Vec::new();
		let mut queue: VecDeque<u32> = VecDeque::new();
		let mut limit_over = false;

		let mut s0 = arena[root].first.clone();
		expand_states(arena, &mut s0, true, false);
		if contains_eop(arena, &s0) {
			trim_non_greedy(arena, &mut s0);
		}
		let id0 = cache.insert_new(s0);
		debug_assert_eq!(id0, 0);
		states.push(DfaState::new(false));
		queue.push_back(0);

		while let Some(id) = queue.pop_front() {
			let set = cache.reverse(id).clone();
			let accept = contains_eop(arena, &set);
			let mut state = DfaState::new(accept);

			// Leftmost-shortest fast path (§4.3 step 2): once accepting, there is
			// nothing further worth matching.
			if !options.suffix_match && options.shortest_match && accept {
				for t in state.transitions.iter_mut() {
					*t = REJECT;
				}
				state.dst_states.insert(REJECT);
				states[id as usize] = state;
				continue;
			}

			for &p in set.iter() {
				if arena[p].non_greedy {
					make_non_greedy(arena, p);
				}
			}

			let mut successors: [PositionSet; 256] = std::array::from_fn(|_| PositionSet::new());
			for &p in set.iter() {
				let kind = arena[p].kind.clone();
				for c in 0u16..256 {
					if matches_byte(&kind, &options, c as u8) {
						successors[c as usize].extend(arena[p].follow.iter().copied());
					}
				}
			}

			for c in 0..256usize {
				if successors[c].is_empty() {
					state.transitions[c] = REJECT;
					state.dst_states.insert(REJECT);
					continue;
				}

				let mut succ = std::mem::take(&mut successors[c]);
				expand_states(arena, &mut succ, false, false);
				if contains_eop(arena, &succ) {
					trim_non_greedy(arena, &mut succ);
				}

				let next_id = if let Some(existing) = cache.get(&succ) {
					existing
				} else if cache.len() < limit {
					let new_id = cache.insert_new(succ);
					states.push(DfaState::new(false));
					queue.push_back(new_id);
					new_id
				} else {
					limit_over = true;
					UNDEF
				};
				state.transitions[c] = next_id;
				state.dst_states.insert(next_id);
			}

			states[id as usize] = state;
		}

		if !limit_over {
			finalize_adjacency(&mut states);
		}

		Ok(Dfa {
			arena,
			options,
			states,
			cache,
			limit,
			complete: !limit_over,
			minimum: false,
		})
	}
}

/// Computes `src_states` from `dst_states` (§4.3 step 5, `DFA::Finalize`).
fn finalize_adjacency(states: &mut [DfaState]) {
	let edges: Vec<(u32, u32)> = states
		.iter()
		.enumerate()
		.flat_map(|(i, s)| {
			s.dst_states
				.iter()
				.copied()
				.filter(|&j| j != REJECT && j != UNDEF)
				.map(move |j| (i as u32, j))
		})
		.collect();
	for (i, j) in edges {
		states[j as usize].src_states.insert(i);
	}
}

/// A built (possibly partial) DFA over an arena it exclusively borrows mutably, so
/// on-the-fly extension (§4.4) can keep allocating non-greedy twins into the same
/// pool the eager construction driver used (§5 "Memory discipline").
pub struct Dfa<'arena> {
	arena: &'arena mut ExprArena,
	options: Options,
	states: Vec<DfaState>,
	cache: SubsetCache,
	limit: u32,
	complete: bool,
	minimum: bool,
}

impl<'arena> Dfa<'arena> {
	pub fn options(&self) -> &Options {
		&self.options
	}

	pub fn complete(&self) -> bool {
		self.complete
	}

	pub fn minimum(&self) -> bool {
		self.minimum
	}

	pub fn num_states(&self) -> usize {
		self.states.len()
	}

	pub fn state(&self, id: u32) -> &DfaState {
		&self.states[id as usize]
	}

	pub(crate) fn states_mut(&mut self) -> &mut [DfaState] {
		&mut self.states
	}

	pub fn is_accept(&self, id: u32) -> bool {
		id != REJECT && id != UNDEF && self.states[id as usize].accept
	}

	/// Looks up (or lazily computes) `transitions[state][b]`, extending the subset
	/// cache and expression pool in place (§4.4). Only meaningful while
	/// `complete() == false`; callers drive matching through
	/// [`crate::matcher`] instead of calling this directly.
	#[tracing::instrument(skip(self))]
	pub fn step_on_the_fly(&mut self, state: u32, b: u8) -> u32 {
		let cur = self.states[state as usize].transitions[b as usize];
		if cur != UNDEF {
			return cur;
		}

		let set = self.cache.reverse(state).clone();
		for &p in set.iter() {
			if self.arena[p].non_greedy {
				make_non_greedy(self.arena, p);
			}
		}

		let mut succ = PositionSet::new();
		for &p in set.iter() {
			if matches_byte(&self.arena[p].kind.clone(), &self.options, b) {
				succ.extend(self.arena[p].follow.iter().copied());
			}
		}

		if succ.is_empty() {
			self.states[state as usize].transitions[b as usize] = REJECT;
			self.states[state as usize].dst_states.insert(REJECT);
			return REJECT;
		}

		expand_states(self.arena, &mut succ, false, false);
		if contains_eop(self.arena, &succ) {
			trim_non_greedy(self.arena, &mut succ);
		}

		// `self.limit` bounds only the eager BFS in `DfaBuilder::build` (how many
		// states to precompute up front); once a caller is stepping on the fly it has
		// already accepted paying subset-construction cost per state visited; §4.4
		// promises matching against automata of unbounded size this way, so growth
		// here is never re-capped against `self.limit`.
		let next_id = if let Some(existing) = self.cache.get(&succ) {
			existing
		} else {
			let accept = contains_eop(self.arena, &succ);
			let id = self.cache.insert_new(succ);
			self.states.push(DfaState::new(accept));
			id
		};

		self.states[state as usize].transitions[b as usize] = next_id;
		self.states[state as usize].dst_states.insert(next_id);
		self.states[next_id as usize].src_states.insert(state);
		next_id
	}

	/// Re-expands `reverse[state]` under `endline`/`begline` and reports whether the
	/// result contains `EOP` — the "end-of-input counts as end-of-line" anchor rule
	/// used by the matcher (§4.5 step 3) on both complete and on-the-fly DFAs.
	pub fn reaccepts_at_boundary(&mut self, state: u32, begline: bool) -> bool {
		let mut set = self.cache.reverse(state).clone();
		expand_states(self.arena, &mut set, begline, true);
		contains_eop(self.arena, &set)
	}

	/// Table-filling minimization (§4.6). Consumes `self` since the resulting DFA
	/// reuses the same arena borrow; fails only if called on an incomplete DFA.
	pub fn minimize(self) -> Result<Dfa<'arena>, BuildError> {
		if !self.complete {
			return Err(BuildError::StateLimitExceeded);
		}
		if self.minimum {
			return Ok(self);
		}
		crate::minimize::minimize(self)
	}

	/// Flips acceptance and redirects every `REJECT` edge to a single absorbing
	/// "reject-accept" state (§4.6 "Complementation").
	pub fn complement(self) -> Dfa<'arena> {
		crate::minimize::complement(self)
	}

	/// Populates `alter_transition` on every state (§4.7). In place: the pass only
	/// annotates existing states, it never changes their number or transitions.
	pub fn eliminate_branch(&mut self) {
		crate::optimize::eliminate_branch(&mut self.states);
	}

	/// Computes `inline_level` for every state via chain inlining (§4.7). Requires
	/// `eliminate_branch` to have run first, since a state can only be inlined into
	/// a predecessor once `alter_transition.next1 != UNDEF` confirms that
	/// predecessor has a simple enough row to splice into.
	pub fn reduce(&mut self) {
		crate::optimize::reduce(&mut self.states);
	}

	/// Runs the optimizer passes selected by `options().compile_level` (§4.7, §6).
	pub fn optimize(&mut self) {
		use crate::options::CompileLevel;
		match self.options.compile_level {
			CompileLevel::O0 | CompileLevel::O1 => {},
			CompileLevel::O2 => self.eliminate_branch(),
			CompileLevel::O3 => {
				self.eliminate_branch();
				self.reduce();
			},
		}
	}

	pub(crate) fn into_parts(self) -> (&'arena mut ExprArena, Options, Vec<DfaState>, SubsetCache, u32, bool, bool) {
		(self.arena, self.options, self.states, self.cache, self.limit, self.complete, self.minimum)
	}

	pub(crate) fn from_parts(
		arena: &'arena mut ExprArena,
		options: Options,
		states: Vec<DfaState>,
		cache: SubsetCache,
		limit: u32,
		complete: bool,
		minimum: bool,
	) -> Self {
		Self {
			arena,
			options,
			states,
			cache,
			limit,
			complete,
			minimum,
		}
	}
}

impl std::fmt::Debug for Dfa<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dfa")
			.field("num_states", &self.states.len())
			.field("complete", &self.complete)
			.field("minimum", &self.minimum)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::expr::ExprArena;

	fn build_literal(pattern: &[u8], options: Options, limit: u32) -> (ExprArena, ExprId) {
		let mut arena = ExprArena::new();
		let mut chars = pattern.iter().map(|&b| arena.literal(b));
		let mut acc = chars.next().unwrap();
		for c in chars {
			acc = arena.concat(acc, c);
		}
		let eop = arena.eop();
		let root = arena.concat(acc, eop);
		arena.fill_transitions(root);
		let _ = options;
		let _ = limit;
		(arena, root)
	}

	#[test]
	fn accepts_exact_literal() {
		let (mut arena, root) = build_literal(b"abc", Options::default(), 100);
		let dfa = DfaBuilder::new(&mut arena, Options::default()).build(root, 100).unwrap();
		assert!(dfa.complete());
		// Walk "abc" through the transition table directly.
		let mut state = 0u32;
		for &b in b"abc" {
			state = dfa.state(state).transitions[b as usize];
			assert_ne!(state, REJECT);
		}
		assert!(dfa.is_accept(state));
	}

	#[test]
	fn rejects_wrong_byte() {
		let (mut arena, root) = build_literal(b"ab", Options::default(), 100);
		let dfa = DfaBuilder::new(&mut arena, Options::default()).build(root, 100).unwrap();
		let s1 = dfa.state(0).transitions[b'a' as usize];
		let s2 = dfa.state(s1 as usize as u32).transitions[b'x' as usize];
		assert_eq!(s2, REJECT);
	}

	#[test]
	fn empty_arena_is_rejected() {
		let mut arena = ExprArena::new();
		let err = DfaBuilder::new(&mut arena, Options::default()).build(0, 10);
		assert!(matches!(err, Err(BuildError::ExpressionEmpty)));
	}

	#[test]
	fn state_limit_of_one_yields_incomplete_dfa() {
		let (mut arena, root) = build_literal(b"aaaa", Options::default(), 1);
		let dfa = DfaBuilder::new(&mut arena, Options::default()).build(root, 1).unwrap();
		assert!(!dfa.complete());
	}

	#[test]
	fn on_the_fly_extends_incomplete_dfa() {
		let (mut arena, root) = build_literal(b"aaaa", Options::default(), 1);
		let mut dfa = DfaBuilder::new(&mut arena, Options::default()).build(root, 1).unwrap();
		assert!(!dfa.complete());
		let mut state = 0u32;
		for _ in 0..4 {
			state = dfa.step_on_the_fly(state, b'a');
			assert_ne!(state, REJECT);
		}
		assert!(dfa.is_accept(state));
	}

	#[test]
	fn on_the_fly_dfa_finds_substring_match_via_sliding_search() {
		let (mut arena, root) = build_literal(b"aaaa", Options::default(), 1);
		let mut dfa = DfaBuilder::new(&mut arena, Options::default()).build(root, 1).unwrap();
		assert!(!dfa.complete());
		let range = crate::matcher::find(&mut dfa, b"xxaaaayy").expect("should match as a substring");
		assert_eq!(range, crate::matcher::MatchRange { start: 2, end: 6 });
	}
}
