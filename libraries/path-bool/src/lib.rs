mod error;
mod path;
mod path_boolean;
mod util;

pub use error::BooleanError;
pub use path::intersection_path_segment::{MAX_SUBDIVISION_PAIRS, path_cubic_segment_self_intersection, path_segment_intersection, segments_equal};
#[cfg(feature = "parsing")]
pub use path::path_data::{path_from_path_data, path_to_path_data};
pub use path::path_segment::PathSegment;
pub use path::{PathVector, SubPath, compare_points};
pub use path_boolean::arrangement::{Arrangement, Edge, EdgeKey, MAX_INTERSECTIONS, Vertex, VertexKey};
pub use path_boolean::edge_walk::combine;
pub use path_boolean::fill_classifier::{Classification, EdgeClassification, Inside, classify};
pub use path_boolean::{FillRule, PathBooleanOperation, path_boolean, path_boolean_all};
pub use util::aabb::{Aabb, merge_bounding_boxes};
pub use util::epsilons::{EPS, Epsilons};

#[cfg(all(test, feature = "parsing"))]
mod test {
	use crate::{BooleanError, FillRule, PathBooleanOperation, PathVector, path_boolean, path_boolean_all, path_from_path_data, path_to_path_data};
	use pretty_assertions::assert_eq;

	const BIG: &str = "M 0,0 L 0,2 L 2,2 L 2,0 z";
	const OVERLAPPING: &str = "M 0,1.5 L 0.5,1.5 L 0.5,2.5 L 0,2.5 z";
	const NESTED: &str = "M 0.5,0.5 L 0.5,1.5 L 1.5,1.5 L 1.5,0.5 z";
	const CIRCLE_A: &str = "M 1,0 A 1,1 0 0 1 -1,0 A 1,1 0 0 1 1,0 Z";
	const CIRCLE_B: &str = "M 2,0 A 1,1 0 0 1 0,0 A 1,1 0 0 1 2,0 Z";

	fn path(data: &str) -> PathVector {
		path_from_path_data(data).unwrap()
	}

	fn boolean(a: &str, b: &str, op: PathBooleanOperation) -> PathVector {
		path_boolean(&path(a), FillRule::EvenOdd, &path(b), FillRule::EvenOdd, op).unwrap()
	}

	fn boolean_data(a: &str, b: &str, op: PathBooleanOperation) -> String {
		path_to_path_data(&boolean(a, b, op))
	}

	#[test]
	fn union_of_overlapping_squares() {
		assert_eq!(boolean_data(BIG, OVERLAPPING, PathBooleanOperation::Union), "M0,0 L0,1.5 L0,2 L0,2.5 L0.5,2.5 L0.5,2 L2,2 L2,0 Z");
	}

	#[test]
	fn union_is_commutative() {
		assert_eq!(boolean_data(OVERLAPPING, BIG, PathBooleanOperation::Union), boolean_data(BIG, OVERLAPPING, PathBooleanOperation::Union));
		assert_eq!(boolean_data(NESTED, BIG, PathBooleanOperation::Union), boolean_data(BIG, NESTED, PathBooleanOperation::Union));

		// Crossings on curves are only accurate to the intersection tolerance, so the operand order may move them slightly
		for op in [PathBooleanOperation::Union, PathBooleanOperation::Intersection, PathBooleanOperation::Xor] {
			let forward = boolean(CIRCLE_A, CIRCLE_B, op);
			let backward = boolean(CIRCLE_B, CIRCLE_A, op);
			assert!(!forward.is_empty());
			assert!(forward.same_geometry(&backward, 1e-3), "{op:?} differs by operand order:\n{forward:?}\n{backward:?}");
		}
	}

	#[test]
	fn union_absorbs_nested_region() {
		assert_eq!(boolean_data(BIG, NESTED, PathBooleanOperation::Union), "M0,0 L0,2 L2,2 L2,0 Z");
	}

	#[test]
	fn intersection_with_nested_square() {
		assert_eq!(boolean_data(BIG, NESTED, PathBooleanOperation::Intersection), "M0.5,0.5 L0.5,1.5 L1.5,1.5 L1.5,0.5 Z");
	}

	#[test]
	fn difference_of_nested_regions() {
		assert_eq!(boolean_data(BIG, NESTED, PathBooleanOperation::Difference), "");
		// The inner boundary comes back reversed as a hole
		assert_eq!(boolean_data(NESTED, BIG, PathBooleanOperation::Difference), "M0,0 L0,2 L2,2 L2,0 Z M0.5,0.5 L1.5,0.5 L1.5,1.5 L0.5,1.5 Z");
	}

	#[test]
	fn intersection_of_overlapping_squares() {
		assert_eq!(boolean_data(BIG, OVERLAPPING, PathBooleanOperation::Intersection), "M0,1.5 L0,2 L0.5,2 L0.5,1.5 Z");
	}

	#[test]
	fn xor_of_crossing_squares() {
		let result = boolean("M 0,0 L 0,2 L 2,2 L 2,0 Z", "M 1,1 L 1,3 L 3,3 L 3,1 Z", PathBooleanOperation::Xor);
		assert!((result.signed_area() - 6.).abs() < 1e-9);
		assert!(result.subpaths.iter().all(|subpath| subpath.closed));
	}

	#[test]
	fn empty_operands() {
		let empty = PathVector::default();
		let big = path(BIG);
		let run = |a: &PathVector, b: &PathVector, op| path_boolean(a, FillRule::NonZero, b, FillRule::NonZero, op).unwrap();

		assert_eq!(run(&empty, &big, PathBooleanOperation::Union), big);
		assert_eq!(run(&big, &empty, PathBooleanOperation::Xor), big);
		assert_eq!(run(&big, &empty, PathBooleanOperation::Intersection), empty);
		assert_eq!(run(&empty, &big, PathBooleanOperation::Difference), big);
		assert_eq!(run(&big, &empty, PathBooleanOperation::Difference), empty);
	}

	#[test]
	fn identical_operands() {
		let big = path(BIG);
		let run = |op| path_boolean(&big, FillRule::NonZero, &big, FillRule::NonZero, op).unwrap();

		assert_eq!(run(PathBooleanOperation::Union), big);
		assert_eq!(run(PathBooleanOperation::Intersection), big);
		assert!(run(PathBooleanOperation::Difference).is_empty());
		assert!(run(PathBooleanOperation::Xor).is_empty());
	}

	#[test]
	fn open_subpaths_pass_through() {
		let a = path("M 0,0 L 0,2 L 2,2 L 2,0 Z M 5,5 L 6,6");
		let result = path_boolean(&a, FillRule::NonZero, &path(NESTED), FillRule::NonZero, PathBooleanOperation::Intersection).unwrap();
		assert_eq!(path_to_path_data(&result), "M0.5,0.5 L0.5,1.5 L1.5,1.5 L1.5,0.5 Z M5,5 L6,6");
	}

	#[test]
	fn self_intersecting_bow_tie() {
		let bow_tie = path("M 0,0 L 2,2 L 2,0 L 0,2 Z");
		let far = path("M 10,10 L 10,11 L 11,11 L 11,10 Z");
		let result = path_boolean(&bow_tie, FillRule::NonZero, &far, FillRule::NonZero, PathBooleanOperation::Union).unwrap();
		assert_eq!(result.len(), 3);
		assert!(result.subpaths.iter().all(|subpath| subpath.signed_area() > 0.));
		assert!((result.signed_area() - 3.).abs() < 1e-9);
	}

	#[test]
	fn overlapping_circles() {
		// Area of the lens shared by two unit circles one radius apart
		let lens = 2. * (0.5_f64).acos() - 0.5 * 3_f64.sqrt();

		let union = boolean(CIRCLE_A, CIRCLE_B, PathBooleanOperation::Union);
		assert_eq!(union.len(), 1);
		assert!((union.signed_area() - (2. * std::f64::consts::PI - lens)).abs() < 1e-2);

		let intersection = boolean(CIRCLE_A, CIRCLE_B, PathBooleanOperation::Intersection);
		assert_eq!(intersection.len(), 1);
		assert!((intersection.signed_area() - lens).abs() < 1e-2);

		let difference = boolean(CIRCLE_A, CIRCLE_B, PathBooleanOperation::Difference);
		assert_eq!(difference.len(), 1);
		assert!((difference.signed_area() - (std::f64::consts::PI - lens)).abs() < 1e-2);
	}

	#[test]
	fn fold_over_selection() {
		let operands: Vec<(PathVector, FillRule)> = [BIG, OVERLAPPING, "M 1.5,-1 L 1.5,0.5 L 3,0.5 L 3,-1 Z"].iter().map(|data| (path(data), FillRule::NonZero)).collect();
		let union = path_boolean_all(&operands, PathBooleanOperation::Union).unwrap();
		assert_eq!(union.len(), 1);
		assert!((union.signed_area() - (4. + 0.25 + 2.25 - 0.25)).abs() < 1e-9);

		let cut = path_boolean_all(&[(path(NESTED), FillRule::NonZero), (path(BIG), FillRule::NonZero)], PathBooleanOperation::Difference).unwrap();
		assert!((cut.signed_area() - 3.).abs() < 1e-9);
		assert!(path_boolean_all(&[], PathBooleanOperation::Union).unwrap().is_empty());
	}

	#[test]
	fn painted_dreams_areas_are_consistent() {
		let a = path(
			"M0,340C161.737914,383.575765 107.564182,490.730587 273,476 C419,463 481.741198,514.692273 481.333333,768 C481.333333,768 -0,768 -0,768 C-0,768 0,340 0,340 Z",
		);
		let b = path(
			"M458.370270,572.165771C428.525848,486.720093 368.618805,467.485992 273,476 C107.564178,490.730591 161.737915,383.575775 0,340 C0,340 0,689 0,689 C56,700 106.513901,779.342590 188,694.666687 C306.607422,571.416260 372.033966,552.205139 458.370270,572.165771 Z",
		);
		let run = |op| path_boolean(&a, FillRule::NonZero, &b, FillRule::NonZero, op).unwrap().signed_area();
		let (area_a, area_b) = (a.signed_area().abs(), b.signed_area().abs());
		let (union, intersection) = (run(PathBooleanOperation::Union), run(PathBooleanOperation::Intersection));

		assert!(intersection > 1.);
		assert!((union + intersection - area_a - area_b).abs() < 1e-3 * area_a);
		// Cutting `a` out of `b` leaves what the intersection does not cover
		assert!((run(PathBooleanOperation::Difference) - (area_b - intersection)).abs() < 1e-3 * area_a);
	}

	#[test]
	fn malformed_paths_are_rejected() {
		let mut broken = path(BIG);
		broken.subpaths[0].segments.remove(1);
		let result = path_boolean(&broken, FillRule::NonZero, &path(NESTED), FillRule::NonZero, PathBooleanOperation::Union);
		assert_eq!(result, Err(BooleanError::MalformedPath { subpath: 0, segment: 1 }));
	}

	#[test]
	fn operators_and_fill_rules_from_text() {
		assert_eq!("Union".parse::<PathBooleanOperation>(), Ok(PathBooleanOperation::Union));
		assert_eq!("even-odd".parse::<FillRule>(), Ok(FillRule::EvenOdd));
		assert_eq!("cut".parse::<PathBooleanOperation>(), Err(BooleanError::InvalidFillRuleOrOperator("cut".to_string())));
	}
}
