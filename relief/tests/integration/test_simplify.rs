use relief::ScalarMemberTree;
use relief::carr::CarrsAlgorithm;
use relief::fold::FoldedContourTree;
use relief::pg::is_tree;
use relief::simplify::{
	max_persistence, persistence, preserve_for_reduction, PersistenceSimplifier
};

use crate::util::{random_complex, tree_shape};


fn assert_leaf_edges_persistent( folded : &FoldedContourTree<'_>, threshold : f64 ) {
	for e in folded.edges() {
		let u = folded.edge_u( e );
		let v = folded.edge_v( e );
		if folded.degree( u ) != 1 && folded.degree( v ) != 1 {
			continue;
		}

		assert!(
			persistence( folded, e ) >= threshold || preserve_for_reduction( folded, e ),
			"leaf edge with persistence {} survived threshold {}",
			persistence( folded, e ),
			threshold );
	}
}

#[test]
fn test_surviving_leaves_exceed_threshold() {
	for seed in 0..15 {
		let num_vertices = 20 + ( seed as usize ) * 4;
		let plex = random_complex( seed, num_vertices, 3 * num_vertices );
		let tree = CarrsAlgorithm::new().compute( &plex ).unwrap();

		for threshold in [0., 0.1, 0.4, 0.9] {
			let mut folded = FoldedContourTree::new( &tree );
			PersistenceSimplifier::new( threshold ).unwrap()
				.simplify( &mut folded )
				.unwrap();

			assert!( is_tree( &folded ), "seed {seed}: simplification broke the tree" );
			assert_leaf_edges_persistent( &folded, threshold );
		}
	}
}

#[test]
fn test_simplify_is_idempotent() {
	for seed in 30..40 {
		let plex = random_complex( seed, 50, 150 );
		let tree = CarrsAlgorithm::new().compute( &plex ).unwrap();

		let simplifier = PersistenceSimplifier::new( 0.3 ).unwrap();

		let mut folded = FoldedContourTree::new( &tree );
		simplifier.simplify( &mut folded ).unwrap();
		let once = tree_shape( &folded );

		simplifier.simplify( &mut folded ).unwrap();
		assert_eq!( tree_shape( &folded ), once, "seed {seed}: second pass changed the tree" );
	}
}

#[test]
fn test_total_simplification_leaves_a_trunk() {
	for seed in 60..70 {
		let plex = random_complex( seed, 40, 100 );
		let tree = CarrsAlgorithm::new().compute( &plex ).unwrap();

		let mut folded = FoldedContourTree::new( &tree );
		let threshold = max_persistence( &folded ) + 1.;
		PersistenceSimplifier::new( threshold ).unwrap()
			.simplify( &mut folded )
			.unwrap();

		// a single monotone edge remains
		assert_eq!( folded.number_of_nodes(), 2, "seed {seed}" );
		assert_eq!( folded.number_of_edges(), 1, "seed {seed}" );

		let e = folded.edges()[0];
		assert!( persistence( &folded, e ) > 0. );
	}
}
