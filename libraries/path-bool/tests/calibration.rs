use path_bool::{FillRule, PathBooleanOperation, PathVector, path_boolean, path_from_path_data, path_to_path_data};
use pretty_assertions::assert_eq;

const BIG: &str = "M 0,0 L 0,2 L 2,2 L 2,0 z";
const OVERLAPPING: &str = "M 0,1.5 L 0.5,1.5 L 0.5,2.5 L 0,2.5 z";
const NESTED: &str = "M 0.5,0.5 L 0.5,1.5 L 1.5,1.5 L 1.5,0.5 z";

fn parse(data: &str) -> PathVector {
	path_from_path_data(data).unwrap()
}

fn run(a: &str, b: &str, op: PathBooleanOperation) -> String {
	let result = path_boolean(&parse(a), FillRule::EvenOdd, &parse(b), FillRule::EvenOdd, op).unwrap();
	path_to_path_data(&result)
}

#[test]
fn union_of_big_and_overlapping() {
	assert_eq!(run(BIG, OVERLAPPING, PathBooleanOperation::Union), "M0,0 L0,1.5 L0,2 L0,2.5 L0.5,2.5 L0.5,2 L2,2 L2,0 Z");
}

#[test]
fn intersection_keeps_nested_square() {
	assert_eq!(run(BIG, NESTED, PathBooleanOperation::Intersection), "M0.5,0.5 L0.5,1.5 L1.5,1.5 L1.5,0.5 Z");
}

#[test]
fn difference_of_big_and_nested_is_empty() {
	assert_eq!(run(BIG, NESTED, PathBooleanOperation::Difference), "");
}

#[test]
fn results_survive_path_data_round_trip() {
	for op in [PathBooleanOperation::Union, PathBooleanOperation::Intersection, PathBooleanOperation::Difference, PathBooleanOperation::Xor] {
		for (a, b) in [(BIG, OVERLAPPING), (NESTED, BIG), (OVERLAPPING, NESTED)] {
			let result = path_boolean(&parse(a), FillRule::NonZero, &parse(b), FillRule::NonZero, op).unwrap();
			assert_eq!(parse(&path_to_path_data(&result)), result, "{op:?} of {a} and {b}");
		}
	}
}

#[test]
fn outer_contours_have_positive_area() {
	let result = path_boolean(&parse(NESTED), FillRule::NonZero, &parse(BIG), FillRule::NonZero, PathBooleanOperation::Difference).unwrap();
	assert_eq!(result.len(), 2);
	assert!(result.subpaths[0].signed_area() > 0.);
	assert!(result.subpaths[1].signed_area() < 0.);
}
