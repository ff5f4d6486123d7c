//! Arena-based Glushkov position-automaton expression tree.
///
/// Mirrors the node kinds and `FillPosition`/`FillTransition` annotation passes of a
/// classic Glushkov-construction regex engine: every state-bearing leaf is a single
/// input-consuming "position"; composite nodes thread `first`/`last`/`follow` sets
/// bottom-up so the construction driver never needs to walk the tree itself.
use std::collections::BTreeSet;

pub type ExprId = usize;
pub type PositionSet = BTreeSet<ExprId>;

#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
pub enum OperatorKind {
	Intersection,
	Xor,
	BackRef,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
	Literal(u8),
	/// A 256-wide membership bitmap; built from the syntax front-end's range list
	/// (`[a-z0-9]`-style) at parse time, but stored flat here since every consumer
	/// (expansion, transition-filling) tests single bytes rather than ranges.
	CharClass { negated: bool, bytes: Box<[bool; 256]> },
	Dot { matches_delimiter: bool },
	BegLine,
	EndLine,
	/// End-of-pattern sentinel; the canonical accept marker (§3).
	Eop,
	/// Non-consuming twin marker for `Intersection`/`XOR`; contributes no bytes in
	/// [`super::expand`], only participates in pairing/cancellation.
	Operator { kind: OperatorKind, id: u32, pair: ExprId },
	Concat(ExprId, ExprId),
	Union(ExprId, ExprId),
	Qmark(ExprId),
	Star(ExprId),
	Plus(ExprId),
	/// Desugars at construction time into `Concat(lhs, lop)` / `Concat(rhs, rop)`
	/// joined through a shared [`OperatorKind::Intersection`] pair; see [`ExprArena::intersection`].
	Intersection { orig_lhs: ExprId, orig_rhs: ExprId, wrapped_lhs: ExprId, wrapped_rhs: ExprId },
	/// Same desugaring shape as `Intersection`, with [`OperatorKind::Xor`] twins.
	Xor { orig_lhs: ExprId, orig_rhs: ExprId, wrapped_lhs: ExprId, wrapped_rhs: ExprId },
}

#[derive(Debug, Clone)]
pub struct Expr {
	pub kind: ExprKind,
	pub follow: PositionSet,
	pub first: PositionSet,
	pub last: PositionSet,
	pub nullable: bool,
	pub min_length: u32,
	/// `None` means unbounded (e.g. under `Star`/`Plus`); mirrors the original's use of
	/// `SIZE_MAX` as a sentinel. Metadata only — never consulted by the matching core.
	pub max_length: Option<u32>,
	pub non_greedy: bool,
	pub root_non_greedy: bool,
	pub complete_non_greedy: bool,
	pub non_greedy_pair: Option<ExprId>,
	pub near_root_non_greedy_pair: Option<ExprId>,
}

impl Expr {
	fn leaf(kind: ExprKind) -> Self {
		Self {
			kind,
			follow: PositionSet::new(),
			first: PositionSet::new(),
			last: PositionSet::new(),
			nullable: false,
			min_length: 1,
			max_length: Some(1),
			non_greedy: false,
			root_non_greedy: false,
			complete_non_greedy: false,
			non_greedy_pair: None,
			near_root_non_greedy_pair: None,
		}
	}

	pub fn is_state_bearing(&self) -> bool {
		matches!(
			self.kind,
			ExprKind::Literal(_)
				| ExprKind::CharClass { .. }
				| ExprKind::Dot { .. }
				| ExprKind::BegLine
				| ExprKind::EndLine
				| ExprKind::Eop
				| ExprKind::Operator { .. }
		)
	}

	pub fn is_eop(&self) -> bool {
		matches!(self.kind, ExprKind::Eop)
	}
}

/// Owns every node in an expression tree; cross-links (operator twins, non-greedy
/// twins) are non-owning [`ExprId`] indices rather than `Rc`/`RefCell`, so cycles in
/// the logical graph never become ownership cycles (§9 "Cyclic node references").
#[derive(Debug, Clone, Default)]
pub struct ExprArena {
	nodes: Vec<Expr>,
	xor_num: u32,
}

impl std::ops::Index<ExprId> for ExprArena {
	type Output = Expr;

	fn index(&self, id: ExprId) -> &Expr {
		&self.nodes[id]
	}
}

impl std::ops::IndexMut<ExprId> for ExprArena {
	fn index_mut(&mut self, id: ExprId) -> &mut Expr {
		&mut self.nodes[id]
	}
}

impl ExprArena {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	fn push(&mut self, e: Expr) -> ExprId {
		self.nodes.push(e);
		self.nodes.len() - 1
	}

	/// Pushes a state-bearing leaf and threads its own freshly-allocated id back
	/// into its `first`/`last` sets: per §3, a position `p` is `first(p) = last(p)
	/// = {p}`. Every leaf constructor (and the `Operator` twins `intersection`/`xor`
	/// allocate directly) must go through this rather than the bare `push`, or no
	/// real `ExprId` ever enters any position set in the tree.
	fn push_leaf(&mut self, e: Expr) -> ExprId {
		let id = self.push(e);
		self[id].first.insert(id);
		self[id].last.insert(id);
		id
	}

	pub fn literal(&mut self, byte: u8) -> ExprId {
		self.push_leaf(Expr::leaf(ExprKind::Literal(byte)))
	}

	pub fn char_class(&mut self, bytes: [bool; 256], negated: bool) -> ExprId {
		self.push_leaf(Expr::leaf(ExprKind::CharClass {
			negated,
			bytes: Box::new(bytes),
		}))
	}

	pub fn dot(&mut self, matches_delimiter: bool) -> ExprId {
		self.push_leaf(Expr::leaf(ExprKind::Dot { matches_delimiter }))
	}

	pub fn beg_line(&mut self) -> ExprId {
		self.push_leaf(Expr::leaf(ExprKind::BegLine))
	}

	pub fn end_line(&mut self) -> ExprId {
		self.push_leaf(Expr::leaf(ExprKind::EndLine))
	}

	pub fn eop(&mut self) -> ExprId {
		let mut e = Expr::leaf(ExprKind::Eop);
		// Unlike a real position, EOP consumes nothing: the whole tree is nullable
		// exactly when its root is, so `Concat(root, Eop)` must pass `nullable`
		// through unchanged.
		e.nullable = true;
		e.min_length = 0;
		e.max_length = Some(0);
		self.push_leaf(e)
	}

	/// Clones a state-bearing leaf's kind into a fresh node with default flags; used
	/// by [`crate::nongreedy`] to allocate non-greedy twins from the same pool that
	/// owns the rest of the tree (§9 "pool allocator").
	pub fn clone_leaf(&mut self, id: ExprId) -> ExprId {
		debug_assert!(self[id].is_state_bearing());
		let kind = self[id].kind.clone();
		self.push_leaf(Expr::leaf(kind))
	}

	/// `Concat(lhs, rhs)`: matches `lhs` then `rhs`. `Expr::Connect()`-equivalent
	/// threading of `lhs.last -> rhs.first` happens in [`Self::fill_transitions`],
	/// not here — `FillPosition` and `FillTransition` are separate passes upstream and
	/// are kept separate here for the same reason (follow-threading needs every
	/// sibling's `first`/`last` already computed).
	pub fn concat(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
		let (max_length, min_length, nullable, first, last) = {
			let l = &self[lhs];
			let r = &self[rhs];
			let max_length = match (l.max_length, r.max_length) {
				(Some(a), Some(b)) => Some(a + b),
				_ => None,
			};
			let min_length = l.min_length + r.min_length;
			let nullable = l.nullable && r.nullable;
			let mut first = l.first.clone();
			if l.nullable {
				first.extend(r.first.iter().copied());
			}
			let mut last = r.last.clone();
			if r.nullable {
				last.extend(l.last.iter().copied());
			}
			(max_length, min_length, nullable, first, last)
		};
		self.push(Expr {
			kind: ExprKind::Concat(lhs, rhs),
			follow: PositionSet::new(),
			first,
			last,
			nullable,
			min_length,
			max_length,
			non_greedy: false,
			root_non_greedy: false,
			complete_non_greedy: false,
			non_greedy_pair: None,
			near_root_non_greedy_pair: None,
		})
	}

	pub fn union(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
		let (max_length, min_length, nullable, first, last) = {
			let l = &self[lhs];
			let r = &self[rhs];
			let max_length = match (l.max_length, r.max_length) {
				(Some(a), Some(b)) => Some(a.max(b)),
				_ => None,
			};
			let min_length = l.min_length.min(r.min_length);
			let nullable = l.nullable || r.nullable;
			let mut first = l.first.clone();
			first.extend(r.first.iter().copied());
			let mut last = l.last.clone();
			last.extend(r.last.iter().copied());
			(max_length, min_length, nullable, first, last)
		};
		self.push(Expr {
			kind: ExprKind::Union(lhs, rhs),
			follow: PositionSet::new(),
			first,
			last,
			nullable,
			min_length,
			max_length,
			non_greedy: false,
			root_non_greedy: false,
			complete_non_greedy: false,
			non_greedy_pair: None,
			near_root_non_greedy_pair: None,
		})
	}

	pub fn qmark(&mut self, lhs: ExprId, non_greedy: bool) -> ExprId {
		let (first, last, min_length, max_length) = {
			let l = &self[lhs];
			// Faithfully reproduces the original's `max_length_ = lhs_->min_length()`:
			// metadata-only (JIT filter-prefix hint), never consulted by the matcher.
			(l.first.clone(), l.last.clone(), 0, Some(l.min_length))
		};
		let id = self.push(Expr {
			kind: ExprKind::Qmark(lhs),
			follow: PositionSet::new(),
			first: first.clone(),
			last,
			nullable: true,
			min_length,
			max_length,
			non_greedy: false,
			root_non_greedy: false,
			complete_non_greedy: false,
			non_greedy_pair: None,
			near_root_non_greedy_pair: None,
		});
		if non_greedy {
			self.mark_root_non_greedy(&first);
		}
		id
	}

	pub fn star(&mut self, lhs: ExprId, non_greedy: bool) -> ExprId {
		let first = self[lhs].first.clone();
		let last = self[lhs].last.clone();
		let id = self.push(Expr {
			kind: ExprKind::Star(lhs),
			follow: PositionSet::new(),
			first: first.clone(),
			last,
			nullable: true,
			min_length: 0,
			max_length: None,
			non_greedy: false,
			root_non_greedy: false,
			complete_non_greedy: false,
			non_greedy_pair: None,
			near_root_non_greedy_pair: None,
		});
		if non_greedy {
			self.mark_root_non_greedy(&first);
		}
		id
	}

	pub fn plus(&mut self, lhs: ExprId, non_greedy: bool) -> ExprId {
		let (first, last, min_length, nullable) = {
			let l = &self[lhs];
			(l.first.clone(), l.last.clone(), l.min_length, l.nullable)
		};
		let id = self.push(Expr {
			kind: ExprKind::Plus(lhs),
			follow: PositionSet::new(),
			first: first.clone(),
			last,
			nullable,
			min_length,
			max_length: None,
			non_greedy: false,
			root_non_greedy: false,
			complete_non_greedy: false,
			non_greedy_pair: None,
			near_root_non_greedy_pair: None,
		});
		if non_greedy {
			self.mark_root_non_greedy(&first);
		}
		id
	}

	/// `Intersection(lhs, rhs)` — grounded on `expr.cc`'s `Intersection::Intersection`
	/// / `FillPosition`: wraps each side in a synthetic `Concat` with a fresh
	/// `Operator::Intersection` twin appended, so the expansion engine's "both twins
	/// present" test (§4.1 rule 1) operates uniformly over `Operator` leaves.
	pub fn intersection(&mut self, orig_lhs: ExprId, orig_rhs: ExprId) -> ExprId {
		let lop = self.push_leaf(Expr::leaf(ExprKind::Operator {
			kind: OperatorKind::Intersection,
			id: 0,
			pair: 0,
		}));
		let rop = self.push_leaf(Expr::leaf(ExprKind::Operator {
			kind: OperatorKind::Intersection,
			id: 0,
			pair: lop,
		}));
		if let ExprKind::Operator { pair, .. } = &mut self[lop].kind {
			*pair = rop;
		}
		let wrapped_lhs = self.concat(orig_lhs, lop);
		let wrapped_rhs = self.concat(orig_rhs, rop);

		let (max_length, min_length, first, last) = {
			let l = &self[wrapped_lhs];
			let r = &self[wrapped_rhs];
			let max_length = match (l.max_length, r.max_length) {
				(Some(a), Some(b)) => Some(a.min(b)),
				(Some(a), None) => Some(a),
				(None, Some(b)) => Some(b),
				(None, None) => None,
			};
			let min_length = l.min_length.max(r.min_length);
			let mut first = l.first.clone();
			first.extend(r.first.iter().copied());
			let mut last = l.last.clone();
			last.extend(r.last.iter().copied());
			(max_length, min_length, first, last)
		};
		let nullable = self[orig_lhs].nullable && self[orig_rhs].nullable;

		self.push(Expr {
			kind: ExprKind::Intersection {
				orig_lhs,
				orig_rhs,
				wrapped_lhs,
				wrapped_rhs,
			},
			follow: PositionSet::new(),
			first,
			last,
			nullable,
			min_length,
			max_length,
			non_greedy: false,
			root_non_greedy: false,
			complete_non_greedy: false,
			non_greedy_pair: None,
			near_root_non_greedy_pair: None,
		})
	}

	/// `XOR(lhs, rhs)` — same desugaring shape as [`Self::intersection`], but twins
	/// cancel (§4.1 rule 2) instead of requiring co-presence, and both twins of a
	/// single `XOR` node share one `id` drawn from a tree-wide counter so the
	/// expansion engine can match twins by id rather than by direct pointer.
	pub fn xor(&mut self, orig_lhs: ExprId, orig_rhs: ExprId) -> ExprId {
		let id = self.xor_num;
		self.xor_num += 1;

		let lop = self.push_leaf(Expr::leaf(ExprKind::Operator {
			kind: OperatorKind::Xor,
			id,
			pair: 0,
		}));
		let rop = self.push_leaf(Expr::leaf(ExprKind::Operator {
			kind: OperatorKind::Xor,
			id,
			pair: lop,
		}));
		if let ExprKind::Operator { pair, .. } = &mut self[lop].kind {
			*pair = rop;
		}
		let wrapped_lhs = self.concat(orig_lhs, lop);
		let wrapped_rhs = self.concat(orig_rhs, rop);

		let (min_length, first, last) = {
			let l = &self[wrapped_lhs];
			let r = &self[wrapped_rhs];
			// Faithful to the original's odd "both branches can be empty" sentinel:
			// `min_length == u32::MAX` there means "effectively never the shortest
			// branch", metadata-only.
			let min_length = if l.min_length == 0 && r.min_length == 0 {
				u32::MAX
			} else {
				l.min_length.min(r.min_length)
			};
			let mut first = l.first.clone();
			first.extend(r.first.iter().copied());
			let mut last = l.last.clone();
			last.extend(r.last.iter().copied());
			(min_length, first, last)
		};
		let nullable = self[orig_lhs].nullable ^ self[orig_rhs].nullable;

		self.push(Expr {
			kind: ExprKind::Xor {
				orig_lhs,
				orig_rhs,
				wrapped_lhs,
				wrapped_rhs,
			},
			follow: PositionSet::new(),
			first,
			last,
			nullable,
			min_length,
			max_length: None,
			non_greedy: false,
			root_non_greedy: false,
			complete_non_greedy: false,
			non_greedy_pair: None,
			near_root_non_greedy_pair: None,
		})
	}

	fn mark_root_non_greedy(&mut self, positions: &PositionSet) {
		for &p in positions.iter() {
			self[p].non_greedy = true;
			self[p].root_non_greedy = true;
		}
	}

	/// Threads `follow` sets through the whole tree given a root node; equivalent to
	/// `Expr::Connect` walking bottom-up via the already-built `first`/`last` sets.
	/// Must run once, after the tree (and all `first`/`last`/`nullable` fields) is
	/// fully built, and before the root is wrapped with an `Eop` sentinel position.
	pub fn fill_transitions(&mut self, root: ExprId) {
		self.fill_transitions_rec(root);
	}

	fn fill_transitions_rec(&mut self, id: ExprId) {
		match self[id].kind.clone() {
			ExprKind::Literal(_)
			| ExprKind::CharClass { .. }
			| ExprKind::Dot { .. }
			| ExprKind::BegLine
			| ExprKind::EndLine
			| ExprKind::Eop
			| ExprKind::Operator { .. } => {},
			ExprKind::Concat(lhs, rhs) => {
				self.fill_transitions_rec(rhs);
				self.fill_transitions_rec(lhs);
				self.connect(&self[lhs].last.clone(), &self[rhs].first.clone());
			},
			ExprKind::Union(lhs, rhs) => {
				self.fill_transitions_rec(rhs);
				self.fill_transitions_rec(lhs);
			},
			ExprKind::Qmark(lhs) => self.fill_transitions_rec(lhs),
			ExprKind::Star(lhs) | ExprKind::Plus(lhs) => {
				self.fill_transitions_rec(lhs);
				self.connect(&self[lhs].last.clone(), &self[lhs].first.clone());
			},
			ExprKind::Intersection { wrapped_lhs, wrapped_rhs, .. } | ExprKind::Xor { wrapped_lhs, wrapped_rhs, .. } => {
				self.fill_transitions_rec(wrapped_rhs);
				self.fill_transitions_rec(wrapped_lhs);
			},
		}
	}

	fn connect(&mut self, src: &PositionSet, dst: &PositionSet) {
		for &s in src.iter() {
			self[s].follow.extend(dst.iter().copied());
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn ascii(arena: &mut ExprArena, s: &str) -> ExprId {
		let mut chars = s.bytes().map(|b| arena.literal(b));
		let first = chars.next().unwrap();
		chars.fold(first, |acc, c| arena.concat(acc, c))
	}

	#[test]
	fn concat_nullable_and_lengths() {
		let mut arena = ExprArena::new();
		let ab = ascii(&mut arena, "ab");
		assert!(!arena[ab].nullable);
		assert_eq!(arena[ab].min_length, 2);
		assert_eq!(arena[ab].max_length, Some(2));
	}

	#[test]
	fn star_is_nullable_unbounded() {
		let mut arena = ExprArena::new();
		let a = arena.literal(b'a');
		let star = arena.star(a, false);
		assert!(arena[star].nullable);
		assert_eq!(arena[star].min_length, 0);
		assert_eq!(arena[star].max_length, None);
	}

	#[test]
	fn intersection_desugars_into_operator_twins() {
		let mut arena = ExprArena::new();
		let a = arena.literal(b'a');
		let b = arena.literal(b'b');
		let inter = arena.intersection(a, b);
		let ExprKind::Intersection { wrapped_lhs, wrapped_rhs, .. } = arena[inter].kind else {
			panic!("expected Intersection");
		};
		assert_eq!(arena[wrapped_lhs].last.len(), 1);
		assert_eq!(arena[wrapped_rhs].last.len(), 1);
		assert_eq!(arena[inter].last.len(), 2);
		assert!(!arena[inter].nullable);
	}

	#[test]
	fn xor_twins_share_id() {
		let mut arena = ExprArena::new();
		let a = arena.literal(b'a');
		let b = arena.literal(b'b');
		let x = arena.xor(a, b);
		let ExprKind::Xor { wrapped_lhs, wrapped_rhs, .. } = arena[x].kind else {
			panic!("expected Xor");
		};
		let &lop = arena[wrapped_lhs].last.iter().next().unwrap();
		let &rop = arena[wrapped_rhs].last.iter().next().unwrap();
		let ExprKind::Operator { id: lid, .. } = arena[lop].kind else { panic!() };
		let ExprKind::Operator { id: rid, .. } = arena[rop].kind else { panic!() };
		assert_eq!(lid, rid);
	}
}
