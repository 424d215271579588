use crate::util::aabb::Aabb;
use glam::{DVec2, IVec2};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Uniform hash grid used for broad-phase lookups of bounding boxes.
pub(crate) struct Grid<T> {
	cell_factor: f64,
	cells: FxHashMap<IVec2, SmallVec<[T; 6]>>,
}

impl<T: Copy> Grid<T> {
	pub(crate) fn new(cell_size: f64, capacity: usize) -> Self {
		Grid {
			cell_factor: cell_size.recip(),
			cells: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
		}
	}

	pub(crate) fn insert(&mut self, bbox: &Aabb, value: T) {
		let min_cell = self.point_to_cell_floor(bbox.min());
		let max_cell = self.point_to_cell_ceil(bbox.max());

		for i in min_cell.x..=max_cell.x {
			for j in min_cell.y..=max_cell.y {
				self.cells.entry((i, j).into()).or_default().push(value);
			}
		}
	}

	/// Visits every value whose cells touch `bbox`. A value may be visited more than once.
	pub(crate) fn query(&self, bbox: &Aabb, mut visit: impl FnMut(T)) {
		let min_cell = self.point_to_cell_floor(bbox.min());
		let max_cell = self.point_to_cell_ceil(bbox.max());

		for i in min_cell.x..=max_cell.x {
			for j in min_cell.y..=max_cell.y {
				if let Some(values) = self.cells.get(&(i, j).into()) {
					values.iter().copied().for_each(&mut visit);
				}
			}
		}
	}

	fn point_to_cell_ceil(&self, point: DVec2) -> IVec2 {
		(point * self.cell_factor).ceil().as_ivec2()
	}
	fn point_to_cell_floor(&self, point: DVec2) -> IVec2 {
		(point * self.cell_factor).floor().as_ivec2()
	}
}

pub struct BitVec {
	data: Vec<u64>,
}

impl BitVec {
	pub fn new(capacity: usize) -> Self {
		let num_words = capacity.div_ceil(64).max(1);
		BitVec { data: vec![0; num_words] }
	}

	pub fn set(&mut self, index: usize) {
		let word_index = index / 64;
		let bit_index = index % 64;
		self.data[word_index] |= 1u64 << bit_index;
	}

	pub fn clear(&mut self) {
		self.data.fill(0);
	}

	pub fn iter_set_bits(&self) -> BitVecIterator<'_> {
		BitVecIterator {
			bit_vec: self,
			current_word: self.data[0],
			word_index: 0,
		}
	}
}

pub struct BitVecIterator<'a> {
	bit_vec: &'a BitVec,
	current_word: u64,
	word_index: usize,
}

impl Iterator for BitVecIterator<'_> {
	type Item = usize;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if self.current_word == 0 {
				self.word_index += 1;
				if self.word_index == self.bit_vec.data.len() {
					return None;
				}
				self.current_word = self.bit_vec.data[self.word_index];
				continue;
			}
			let tz = self.current_word.trailing_zeros() as usize;
			self.current_word ^= 1 << tz;

			return Some(self.word_index * 64 + tz);
		}
	}
}
