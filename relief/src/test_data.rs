//! Shared fixtures for unit tests.

use crate::complex::ScalarComplex;

/// Scalar values of the 12-vertex reference complex (two stacked 3×4 grids with diagonals).
pub const WENGER_VALUES : [f64; 12] =
	// 0   1   2   3   4   5   6   7   8   9  10  11
	[ 25., 62., 45., 66., 16., 32., 64., 39., 58., 51., 53., 30. ];

/// Edges of the 12-vertex reference complex.
pub const WENGER_EDGES : [(usize, usize); 23] = [
	(0, 1), (1, 2), (3, 4), (4, 5), (6, 7), (7, 8), (9, 10), (10, 11), (0, 3),
	(1, 4), (2, 5), (3, 6), (4, 7), (5, 8), (6, 9), (7, 10), (8, 11), (0, 4),
	(1, 5), (3, 7), (4, 8), (6, 10), (7, 11)
];

/// Builds the 12-vertex reference complex.
pub fn wenger_complex() -> ScalarComplex {
	let mut plex = ScalarComplex::new();
	for value in WENGER_VALUES {
		plex.add_vertex( value );
	}
	for (u, v) in WENGER_EDGES {
		plex.add_edge( u, v );
	}
	plex
}
