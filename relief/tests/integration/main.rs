mod util;

mod test_contour;
mod test_fold;
mod test_landscape;
mod test_roundtrip;
mod test_simplify;
