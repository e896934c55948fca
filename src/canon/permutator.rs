use std::collections::HashMap;

/// Enumerates the permutations of a list of blank node identifiers with the
/// Steinhaus-Johnson-Trotter algorithm, in a fixed order so that path pruning
/// and tie-breaking are reproducible.
pub struct Permutator {
	list: Vec<String>,
	done: bool,
	left: HashMap<String, bool>,
}

impl Permutator {
	pub fn new(mut list: Vec<String>) -> Self {
		list.sort_unstable();
		let left = list.iter().map(|element| (element.clone(), true)).collect();
		Self {
			list,
			done: false,
			left,
		}
	}

	/// Returns true if there is another permutation.
	pub fn has_next(&self) -> bool {
		!self.done
	}

	/// Gets the next permutation. Call [`Permutator::has_next`] first.
	pub fn next(&mut self) -> Vec<String> {
		let rval = self.list.clone();

		// find the largest mobile element: an element pointing at a smaller
		// neighbour
		let length = self.list.len();
		let mut k: Option<String> = None;
		let mut pos = 0;
		for i in 0..length {
			let element = &self.list[i];
			let left = self.left[element];
			let is_largest = k.as_ref().map(|k| element > k).unwrap_or(true);
			let mobile = (left && i > 0 && element > &self.list[i - 1])
				|| (!left && i < length - 1 && element > &self.list[i + 1]);
			if is_largest && mobile {
				k = Some(element.clone());
				pos = i;
			}
		}

		match k {
			// no more permutations
			None => self.done = true,
			Some(k) => {
				// swap k with the element it is pointing at
				let swap = if self.left[&k] { pos - 1 } else { pos + 1 };
				self.list.swap(pos, swap);

				// reverse the direction of all elements larger than k
				for element in &self.list {
					if element > &k {
						if let Some(direction) = self.left.get_mut(element) {
							*direction = !*direction;
						}
					}
				}
			}
		}

		rval
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	fn factorial(n: usize) -> usize {
		(1..=n).product()
	}

	#[test]
	fn enumerates_exactly_n_factorial_permutations() {
		for n in 1..=5 {
			let list: Vec<String> = (0..n).map(|i| format!("_:b{i}")).collect();
			let mut permutator = Permutator::new(list);
			let mut seen = HashSet::new();
			let mut count = 0;
			while permutator.has_next() {
				let permutation = permutator.next();
				assert!(seen.insert(permutation), "duplicate permutation");
				count += 1;
			}
			assert_eq!(count, factorial(n));
			assert!(!permutator.has_next());
		}
	}

	#[test]
	fn first_permutation_is_sorted() {
		let mut permutator =
			Permutator::new(vec!["_:z".to_string(), "_:a".to_string(), "_:m".to_string()]);
		assert_eq!(permutator.next(), vec!["_:a", "_:m", "_:z"]);
	}
}
