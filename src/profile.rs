//! BpList algebra (component B, spec §4.1): sort, link, merge, evaluate,
//! reachability, disconnected_merge.
//!
//! Grounded on `original_source/ev_routing/helper/break_points_list.py` and,
//! for `disconnected_merge`, on the splice performed in
//! `original_source/ev_routing/cs_floyd_warshall.py::final` (the standalone
//! helper module never names the operation explicitly; it's reconstructed
//! here from that call site plus spec §8 scenario 4's worked example).

use std::convert::TryFrom;

use crate::bp::{BreakPoint, Slope};
use crate::f64nn::f64s;

/// A canonical SoC profile: break-points sorted strictly by `x`, `x[0] = 0`,
/// `x[last] = M` (spec §3 invariants I1-I5).
#[derive(Clone, PartialEq, Debug, serde::Serialize)]
pub struct BpList(pub Vec<BreakPoint>);

impl BpList {
	pub fn as_slice(&self) -> &[BreakPoint] {
		&self.0
	}
	pub fn into_inner(self) -> Vec<BreakPoint> {
		self.0
	}
	pub fn len(&self) -> usize {
		self.0.len()
	}
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// The identity profile `[(0,0,1),(M,M,0)]`: every initial charge maps
	/// to itself.
	pub fn identity(m: f64s) -> Self {
		Self(vec![BreakPoint::new(0.0, 0.0, Slope::Unit), BreakPoint::new(m.f(), m.f(), Slope::Flat)])
	}

	/// The sentinel unreachable profile `[(0,-inf,0),(M,-inf,0)]` (spec §7).
	pub fn unreachable(m: f64s) -> Self {
		Self(vec![
			BreakPoint::new(0.0, f64::NEG_INFINITY, Slope::Flat),
			BreakPoint::new(m.f(), f64::NEG_INFINITY, Slope::Flat),
		])
	}

	/// Wraps an already-canonical list (e.g. the output of `bp::edge_profile`).
	pub fn from_canonical(bps: Vec<BreakPoint>) -> Self {
		let l = Self(bps);
		l.debug_validate();
		l
	}

	/// Asserts invariants I1-I3 (spec §3). Fatal on violation (spec §7:
	/// "malformed break-point list ... programmer bug; fatal").
	pub fn debug_validate(&self) {
		debug_assert!(!self.0.is_empty(), "break-point list is empty");
		debug_assert_eq!(self.0[0].x, 0.0, "first break-point must be at x=0");
		for w in self.0.windows(2) {
			debug_assert!(w[0].x.f() < w[1].x.f(), "break-points must be strictly increasing in x");
		}
		for bp in &self.0 {
			debug_assert!(bp.y.f() <= self.0.last().unwrap().x.f() || bp.y.is_infinite(), "y must not exceed M");
		}
	}

	/// `evaluate f(L, x)` (spec §4.1). `x < x[0]` yields `-inf`; `x > x[last]`
	/// is a programmer bug and panics.
	pub fn evaluate_f(&self, x: f64s) -> f64s {
		let bps = &self.0;
		if x.f() < bps[0].x.f() {
			return f64s::NEG_INFINITY;
		}
		let last = bps.last().unwrap();
		assert!(x.f() <= last.x.f(), "evaluate_f: x={} exceeds profile domain [0,{}]", x, last.x);
		for w in bps.windows(2) {
			if w[0].x.f() <= x.f() && x.f() < w[1].x.f() {
				return match w[0].s {
					Slope::Flat => w[0].y,
					Slope::Unit => x - w[0].x + w[0].y,
				};
			}
		}
		last.y
	}

	/// `evaluate slope _s(L, x)` (spec §4.1).
	pub fn evaluate_s(&self, x: f64s) -> Slope {
		let bps = &self.0;
		if x.f() < bps[0].x.f() {
			return Slope::Flat;
		}
		let last = bps.last().unwrap();
		assert!(x.f() <= last.x.f(), "evaluate_s: x={} exceeds profile domain [0,{}]", x, last.x);
		for w in bps.windows(2) {
			if w[0].x.f() <= x.f() && x.f() < w[1].x.f() {
				return w[0].s;
			}
		}
		last.s
	}

	/// Index of the segment whose x-domain contains `x`, or `None` if out of
	/// bounds.
	pub fn search_domain(&self, x: f64s) -> Option<usize> {
		let bps = &self.0;
		let last = bps.last().unwrap();
		if x.f() < 0.0 || x.f() > last.x.f() {
			return None;
		}
		for i in 0..bps.len() - 1 {
			if bps[i].x.f() <= x.f() && x.f() < bps[i + 1].x.f() {
				return Some(i);
			}
		}
		if x.f() == last.x.f() {
			return Some(bps.len() - 1);
		}
		None
	}

	/// Index of the segment whose y-range contains `y`, or `None`.
	pub fn search_range(&self, y: f64s) -> Option<usize> {
		let bps = &self.0;
		if y.f() < 0.0 {
			return None;
		}
		for i in 0..bps.len() - 1 {
			match bps[i].s {
				Slope::Flat => {
					if y == bps[i].y {
						return Some(i);
					}
				}
				Slope::Unit => {
					let xlen = bps[i + 1].x.f() - bps[i].x.f();
					if bps[i].y.f() <= y.f() && y.f() < bps[i].y.f() + xlen {
						return Some(i);
					}
				}
			}
		}
		if bps.last().unwrap().y == y {
			return Some(bps.len() - 1);
		}
		None
	}

	/// True iff any break-point has `y >= 0` (spec I4).
	pub fn reachable(&self) -> bool {
		self.0.iter().any(|bp| bp.y.f() >= 0.0)
	}

	/// Minimum initial charge at which the profile is reachable, or `None`
	/// if the profile is unreachable everywhere.
	pub fn min_reachable_charge(&self) -> Option<f64s> {
		self.0.iter().find(|bp| bp.y.f() >= 0.0).map(|bp| bp.x)
	}

	/// `sort(L)` (spec §4.1): canonicalize a list possibly containing
	/// duplicate x-coordinates produced by `link`. Among equal-x items keep
	/// the one with the largest y; ties keep slope 1.
	pub fn sort(raw: Vec<BreakPoint>) -> Self {
		if raw.len() < 2 {
			return Self(raw);
		}
		let mut out: Vec<BreakPoint> = vec![raw[0]];
		for bp in raw.into_iter().skip(1) {
			let mut found = false;
			for existing in out.iter_mut() {
				if existing.x == bp.x {
					found = true;
					let better = bp.y.f() > existing.y.f()
						|| (bp.y == existing.y && bp.s == Slope::Unit && existing.s == Slope::Flat);
					if better {
						*existing = bp;
					}
				}
			}
			if !found {
				out.push(bp);
			}
		}
		out.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
		Self(out)
	}

	/// `link(L_ik, L_kj)` (spec §4.1): function composition of the profile
	/// on i->k with the profile on k->j. Unsorted, may contain duplicate
	/// x-coordinates; caller follows with `BpList::sort`.
	pub fn link(&self, l_kj: &BpList) -> Vec<BreakPoint> {
		let l_ik = self;
		let mut out = Vec::with_capacity(l_ik.len() + l_kj.len());

		for ik in &l_ik.0 {
			let charge_at_j = l_kj.evaluate_f(ik.y);
			if charge_at_j.is_neg_infinite() {
				out.push(BreakPoint { x: ik.x, y: f64s::NEG_INFINITY, s: Slope::Flat });
				continue;
			}
			if ik.y.f() >= 0.0 {
				if let Some(idx) = l_kj.search_domain(ik.y) {
					let s = if ik.s == Slope::Unit && l_kj.0[idx].s == Slope::Unit { Slope::Unit } else { Slope::Flat };
					out.push(BreakPoint { x: ik.x, y: charge_at_j, s });
				}
			}
		}

		for jk in &l_kj.0 {
			if let Some(idx) = l_ik.search_range(jk.x) {
				match l_ik.0[idx].s {
					Slope::Flat => out.push(BreakPoint { x: l_ik.0[idx].x, y: jk.y, s: Slope::Flat }),
					Slope::Unit => {
						let xnew = l_ik.0[idx].x.f() + (jk.x.f() - l_ik.0[idx].y.f());
						let last_x = l_ik.0.last().unwrap().x.f();
						if 0.0 < xnew && xnew < last_x {
							out.push(BreakPoint { x: f64s::try_from(xnew).unwrap(), y: jk.y, s: jk.s });
						}
					}
				}
			}
		}

		out
	}

	/// `merge(L_old, L_new, M)` (spec §4.1): point-wise maximum over [0,M],
	/// with crossing-point insertion and collinear-redundancy removal.
	pub fn merge(l1: &BpList, l2: &BpList, m: f64s) -> Self {
		let a = &l1.0;
		let b = &l2.0;
		let mut merged: Vec<BreakPoint> = Vec::with_capacity(a.len() + b.len());
		let mut i = 0usize;
		let mut j = 0usize;
		let mut prev: Option<(f64s, f64s, Slope, f64s, Slope)> = None;

		while i < a.len() || j < b.len() {
			let a_has = i < a.len();
			let b_has = j < b.len();
			let x;
			let f1;
			let s1;
			let f2;
			let s2;
			let di;
			let dj;

			if a_has && (!b_has || a[i].x.f() < b[j].x.f()) {
				x = a[i].x;
				f1 = a[i].y;
				s1 = a[i].s;
				f2 = l2.evaluate_f(x);
				s2 = l2.evaluate_s(x);
				di = 1;
				dj = 0;
			} else if b_has && (!a_has || b[j].x.f() < a[i].x.f()) {
				x = b[j].x;
				f2 = b[j].y;
				s2 = b[j].s;
				f1 = l1.evaluate_f(x);
				s1 = l1.evaluate_s(x);
				di = 0;
				dj = 1;
			} else {
				x = a[i].x;
				f1 = a[i].y;
				s1 = a[i].s;
				f2 = b[j].y;
				s2 = b[j].s;
				di = 1;
				dj = 1;
			}

			if let Some((xp, f1p, s1p, f2p, s2p)) = prev {
				let diff_prev = soc_diff(f2p, f1p);
				let diff_cur = soc_diff(f2, f1);
				if diff_prev * diff_cur < 0.0 && s1p != s2p {
					let denom = s2p.as_f64() - s1p.as_f64();
					let xcross = xp.f() + (f1p.f() - f2p.f()) / denom;
					let ycross = f1p.f() + s1p.as_f64() * (xcross - xp.f());
					if xcross > 0.0 && xcross < m.f() && ycross < m.f() {
						merged.push(BreakPoint { x: f64s::try_from(xcross).unwrap(), y: f64s::try_from(ycross).unwrap(), s: s1p });
					}
				}
			}

			let dominant = if f1 != f2 {
				if f1.f() > f2.f() {
					BreakPoint { x, y: f1, s: s1 }
				} else {
					BreakPoint { x, y: f2, s: s2 }
				}
			} else if (s1 as u8) > (s2 as u8) {
				BreakPoint { x, y: f1, s: s1 }
			} else {
				BreakPoint { x, y: f2, s: s2 }
			};
			merged.push(dominant);

			prev = Some((x, f1, s1, f2, s2));
			i += di;
			j += dj;
		}

		remove_redundant(&mut merged);
		Self(merged)
	}

	/// Splices an i->s prefix profile, a scalar station-to-station cost
	/// `c_seg`, an s'->j suffix profile and its reference cost `c_ref` into
	/// a single i->j profile (spec §4.1, worked example in §8 scenario 4).
	///
	/// Computed as the point-wise maximum of the two profiles each shifted
	/// down (in `y`) by its cost: `merge(shift(L_prefix,c_seg),
	/// shift(L_suffix,c_ref), D)`.
	pub fn disconnected_merge(l_prefix: &BpList, c_seg: f64s, l_suffix: &BpList, c_ref: f64s, d: f64s) -> Self {
		let shifted_prefix = BpList(shift(&l_prefix.0, c_seg));
		let shifted_suffix = BpList(shift(&l_suffix.0, c_ref));
		BpList::merge(&shifted_prefix, &shifted_suffix, d)
	}
}

fn shift(l: &[BreakPoint], c: f64s) -> Vec<BreakPoint> {
	l.iter()
		.map(|bp| BreakPoint { x: bp.x, y: if bp.y.is_neg_infinite() { bp.y } else { bp.y - c }, s: bp.s })
		.collect()
}

fn soc_diff(f2: f64s, f1: f64s) -> f64 {
	if f1 == f2 {
		0.0
	} else {
		f2.f() - f1.f()
	}
}

/// Removes collinear redundant break-points (spec §4.1 `merge`, I5):
/// if two adjacent break-points share slope and the second lies on the
/// line through the first with that slope (within 3-decimal rounding,
/// spec §5), delete the second.
fn remove_redundant(l: &mut Vec<BreakPoint>) {
	if l.len() <= 2 {
		return;
	}
	let mut i = 0;
	while i < l.len() - 2 {
		if l[i].s != l[i + 1].s {
			i += 1;
			continue;
		}
		let predicted = if l[i].y.is_neg_infinite() {
			f64::NEG_INFINITY
		} else {
			l[i].y.f() + l[i].s.as_f64() * (l[i + 1].x.f() - l[i].x.f())
		};
		let actual = l[i + 1].y.f();
		if round3(predicted) == round3(actual) {
			l.remove(i + 1);
		} else {
			i += 1;
		}
	}
}

fn round3(v: f64) -> f64 {
	if v.is_finite() {
		(v * 1000.0).round() / 1000.0
	} else {
		v
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	fn bp(x: f64, y: f64, s: Slope) -> BreakPoint {
		BreakPoint::new(x, y, s)
	}

	/// Scenario 3 (spec §8): sort dedup.
	#[test]
	fn sort_deduplicates_and_orders() {
		let raw = vec![
			bp(0.0, 0.0, Slope::Unit),
			bp(600.0, 600.0, Slope::Flat),
			bp(300.0, 200.0, Slope::Unit),
			bp(1000.0, 1000.0, Slope::Flat),
			bp(100.0, 100.0, Slope::Flat),
			bp(1000.0, 1000.0, Slope::Flat),
		];
		let sorted = BpList::sort(raw);
		assert_eq!(sorted.len(), 5);
		for w in sorted.as_slice().windows(2) {
			assert!(w[0].x.f() < w[1].x.f());
		}
	}

	/// Scenario 4 (spec §8): disconnected_merge worked example.
	#[test]
	fn disconnected_merge_worked_example() {
		let l1 = BpList(vec![
			bp(0.0, f64::NEG_INFINITY, Slope::Flat),
			bp(5.0, 0.0, Slope::Unit),
			bp(10.0, 6.0, Slope::Unit),
			bp(12.0, 9.0, Slope::Unit),
			bp(15.0, 12.0, Slope::Flat),
		]);
		let l2 = BpList(vec![
			bp(0.0, f64::NEG_INFINITY, Slope::Flat),
			bp(4.0, 0.0, Slope::Unit),
			bp(7.0, 9.0, Slope::Unit),
			bp(13.0, 15.0, Slope::Flat),
			bp(15.0, 15.0, Slope::Flat),
		]);
		let c1 = f64s::try_from(36.0).unwrap();
		let c2 = f64s::try_from(46.0).unwrap();
		let d = f64s::try_from(15.0).unwrap();

		let result = BpList::disconnected_merge(&l1, c1, &l2, c2, d);

		let expected = vec![
			bp(0.0, f64::NEG_INFINITY, Slope::Flat),
			bp(4.0, -46.0, Slope::Unit),
			bp(5.0, -36.0, Slope::Unit),
			bp(10.0, -30.0, Slope::Unit),
			bp(12.0, -27.0, Slope::Unit),
			bp(15.0, -24.0, Slope::Flat),
		];
		assert_eq!(result.len(), expected.len());
		for (got, want) in result.as_slice().iter().zip(expected.iter()) {
			assert_eq!(got.s, want.s);
			if want.y.is_infinite() {
				assert!(got.y.is_neg_infinite());
			} else {
				assert_relative_eq!(got.y.f(), want.y.f(), epsilon = 1e-6);
			}
			assert_relative_eq!(got.x.f(), want.x.f(), epsilon = 1e-6);
		}
	}

	#[test]
	fn evaluate_f_at_breakpoints_returns_y() {
		// P8: evaluate f at x=x_i returns y_i for every break-point.
		let l = BpList(vec![bp(0.0, f64::NEG_INFINITY, Slope::Flat), bp(3.0, 0.0, Slope::Unit), bp(10.0, 7.0, Slope::Flat)]);
		for p in l.as_slice() {
			assert_eq!(l.evaluate_f(p.x), p.y);
		}
	}

	#[test]
	fn link_with_identity_is_noop() {
		// P5: link(identity, L) and link(L, identity) both canonicalize to L.
		let m = f64s::try_from(10.0).unwrap();
		let l = BpList(vec![bp(0.0, f64::NEG_INFINITY, Slope::Flat), bp(3.0, 0.0, Slope::Unit), bp(10.0, 7.0, Slope::Flat)]);
		let id = BpList::identity(m);

		let left = BpList::sort(id.link(&l));
		assert_eq!(left.as_slice(), l.as_slice());

		let right = BpList::sort(l.link(&id));
		assert_eq!(right.as_slice(), l.as_slice());
	}

	#[test]
	fn merge_is_idempotent() {
		// P6: merge(L, L, M) = L.
		let m = f64s::try_from(10.0).unwrap();
		let l = BpList(vec![bp(0.0, f64::NEG_INFINITY, Slope::Flat), bp(3.0, 0.0, Slope::Unit), bp(10.0, 7.0, Slope::Flat)]);
		let merged = BpList::merge(&l, &l, m);
		assert_eq!(merged.as_slice(), l.as_slice());
	}

	#[test]
	fn merge_of_dominant_returns_dominant() {
		// P9: if L1 <= L2 pointwise then merge(L1,L2,M) = L2.
		let m = f64s::try_from(10.0).unwrap();
		let lower = BpList::unreachable(m);
		let upper = BpList(vec![bp(0.0, f64::NEG_INFINITY, Slope::Flat), bp(3.0, 0.0, Slope::Unit), bp(10.0, 7.0, Slope::Flat)]);
		let merged = BpList::merge(&lower, &upper, m);
		assert_eq!(merged.as_slice(), upper.as_slice());
	}
}
