use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use relief::{EdgeIdx, NodeIdx, ScalarMemberTree};
use relief::carr::CarrsAlgorithm;
use relief::contour::ContourTree;
use relief::fold::FoldedContourTree;
use relief::pg::is_tree;

use crate::util::{random_complex, tree_shape};


enum Undo {
	Uncollapse( NodeIdx ),
	Unreduce( EdgeIdx )
}

fn leaf_edges( folded : &FoldedContourTree<'_> ) -> Vec<EdgeIdx> {
	folded.edges().into_iter()
		.filter( |&e| {
			folded.degree( folded.edge_u( e ) ) == 1 || folded.degree( folded.edge_v( e ) ) == 1
		} )
		.collect()
}

fn degree_two_nodes( folded : &FoldedContourTree<'_> ) -> Vec<NodeIdx> {
	folded.nodes().into_iter().filter( |&v| folded.degree( v ) == 2 ).collect()
}

fn fold_randomly(
	folded : &mut FoldedContourTree<'_>,
	steps : usize,
	rng : &mut StdRng )
	-> Vec<Undo>
{
	let mut undo_stack = Vec::new();

	for _ in 0..steps {
		if folded.number_of_nodes() <= 2 {
			break;
		}

		if rng.gen_bool( 0.5 ) {
			let candidates = leaf_edges( folded );
			if let Some( &edge ) = candidates.choose( rng ) {
				let leaf = if folded.degree( folded.edge_u( edge ) ) == 1 {
					folded.edge_u( edge )
				}
				else {
					folded.edge_v( edge )
				};
				let parent = folded.opposite( leaf, edge );

				folded.collapse( edge ).unwrap();
				undo_stack.push( Undo::Uncollapse( parent ) );
			}
		}
		else {
			let candidates = degree_two_nodes( folded );
			if let Some( &v ) = candidates.choose( rng ) {
				let bridge = folded.reduce( v ).unwrap();
				undo_stack.push( Undo::Unreduce( bridge ) );
			}
		}
	}

	undo_stack
}

fn unfold( folded : &mut FoldedContourTree<'_>, undo_stack : Vec<Undo> ) {
	for undo in undo_stack.into_iter().rev() {
		match undo {
			Undo::Uncollapse( parent ) => {
				folded.uncollapse( parent, None ).unwrap();
			}
			Undo::Unreduce( bridge ) => {
				folded.unreduce( bridge ).unwrap();
			}
		}
	}
}


#[test]
fn test_random_fold_sequences_undo_cleanly() {
	for seed in 0..20 {
		let num_vertices = 10 + ( seed as usize ) * 5;
		let plex = random_complex( seed, num_vertices, 2 * num_vertices );
		let tree : ContourTree = CarrsAlgorithm::new().compute( &plex ).unwrap();

		let mut folded = FoldedContourTree::new( &tree );
		let before = tree_shape( &folded );

		let mut rng = StdRng::seed_from_u64( seed.wrapping_mul( 31 ) );
		let undo_stack = fold_randomly( &mut folded, 30, &mut rng );

		// the folded tree stays a tree throughout
		assert!( is_tree( &folded ), "seed {seed}: folding broke the tree" );

		unfold( &mut folded, undo_stack );
		assert_eq!( tree_shape( &folded ), before, "seed {seed}: undo did not restore" );
	}
}

#[test]
fn test_folding_preserves_treeness_and_lookup() {
	for seed in 40..50 {
		let plex = random_complex( seed, 30, 60 );
		let tree = CarrsAlgorithm::new().compute( &plex ).unwrap();

		let mut folded = FoldedContourTree::new( &tree );
		let mut rng = StdRng::seed_from_u64( seed );
		fold_randomly( &mut folded, 10, &mut rng );

		assert!( is_tree( &folded ) );

		// every live node still resolves through the id lookup, with matching values
		for v in folded.nodes() {
			let id = folded.id( v );
			assert_eq!( folded.node_by_id( id ), Some( v ) );
			assert_eq!( folded.value( v ), tree.value( tree.node_by_id( id ).unwrap() ) );
		}
	}
}
