use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use relief::ScalarMemberTree;
use relief::carr::CarrsAlgorithm;
use relief::complex::ScalarComplex;
use relief::pg::is_tree;
use relief::simplify::is_regular;

use crate::util::{
	assert_partitions_vertices, random_complex, tree_shape, WENGER_EDGES, WENGER_VALUES
};


#[test]
fn test_contour_trees_are_trees() {
	for seed in 0..20 {
		let num_vertices = 5 + ( seed as usize ) * 7;
		let plex = random_complex( seed, num_vertices, 2 * num_vertices );
		let tree = CarrsAlgorithm::new().compute( &plex ).unwrap();

		assert!( is_tree( &tree ), "seed {seed} produced a non-tree" );
		assert_partitions_vertices( &tree, num_vertices );

		// no regular nodes survive construction
		for v in tree.nodes() {
			assert!( !is_regular( &tree, v ), "seed {seed} left a regular node" );
		}
	}
}

#[test]
fn test_edge_order_does_not_matter() {
	let reference = {
		let mut plex = ScalarComplex::new();
		for value in WENGER_VALUES {
			plex.add_vertex( value );
		}
		for (u, v) in WENGER_EDGES {
			plex.add_edge( u, v );
		}
		tree_shape( &CarrsAlgorithm::new().compute( &plex ).unwrap() )
	};

	let mut rng = StdRng::seed_from_u64( 99 );
	for _ in 0..10 {
		let mut edges = WENGER_EDGES.to_vec();
		edges.shuffle( &mut rng );

		let mut plex = ScalarComplex::new();
		for value in WENGER_VALUES {
			plex.add_vertex( value );
		}
		for (u, v) in edges {
			plex.add_edge( u, v );
		}

		let tree = CarrsAlgorithm::new().compute( &plex ).unwrap();
		assert_eq!( tree_shape( &tree ), reference );
	}
}

#[test]
fn test_extrema_are_leaves() {
	for seed in 100..110 {
		let plex = random_complex( seed, 40, 80 );
		let tree = CarrsAlgorithm::new().compute( &plex ).unwrap();

		// every vertex that is a strict local extremum of the complex must survive as a leaf
		for v in 0..40 {
			let value = plex.value( v );
			let is_min = plex.neighbors( v ).all( |w| plex.value( w ) > value );
			let is_max = plex.neighbors( v ).all( |w| plex.value( w ) < value );

			if is_min || is_max {
				let node = tree.node_by_id( v )
					.unwrap_or_else( || panic!( "seed {seed}: extremum {v} was absorbed" ) );
				assert_eq!( tree.degree( node ), 1, "seed {seed}: extremum {v} is not a leaf" );
			}
		}
	}
}
