use relief::{find_min_leaf, ScalarMemberTree};
use relief::carr::CarrsAlgorithm;
use relief::contour::ContourTree;
use relief::rectangular::{RectangularLandscape, Triangle};

use crate::util::random_complex;


fn triangle_area( lscape : &RectangularLandscape<'_, ContourTree>, t : Triangle ) -> f64 {
	let a = lscape.point( t.a );
	let b = lscape.point( t.b );
	let c = lscape.point( t.c );
	( ( b.x - a.x ) * ( c.y - a.y ) - ( c.x - a.x ) * ( b.y - a.y ) ).abs() / 2.
}

#[test]
fn test_embeddings_tile_the_unit_square() {
	for seed in 0..15 {
		let num_vertices = 10 + ( seed as usize ) * 6;
		let plex = random_complex( seed, num_vertices, 2 * num_vertices );
		let tree = CarrsAlgorithm::new().compute( &plex ).unwrap();

		let root = find_min_leaf( &tree ).unwrap();
		let lscape = RectangularLandscape::build( &tree, root, None ).unwrap();

		let total : f64 = lscape.triangles().iter()
			.map( |&t| triangle_area( &lscape, t ) )
			.sum();
		assert!( ( total - 1. ).abs() < 1e-9, "seed {seed}: triangles cover area {total}" );

		// heights lie within the scalar range of the field
		let (min_value, max_value) = tree.nodes().into_iter()
			.map( |v| tree.value( v ) )
			.fold( (f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
				( lo.min( v ), hi.max( v ) )
			} );
		for i in 0..lscape.number_of_points() {
			let z = lscape.point( i ).z;
			assert!( z >= min_value && z <= max_value, "seed {seed}: height {z} out of range" );
		}
	}
}

#[test]
fn test_triangle_counts_and_back_references() {
	for seed in 20..30 {
		let plex = random_complex( seed, 40, 80 );
		let tree = CarrsAlgorithm::new().compute( &plex ).unwrap();

		let root = find_min_leaf( &tree ).unwrap();
		let lscape = RectangularLandscape::build( &tree, root, None ).unwrap();

		let leaf_arcs = lscape.tree().arcs().into_iter()
			.filter( |&a| lscape.tree().is_leaf( lscape.tree().target( a ) ) )
			.count();
		let branch_arcs = lscape.tree().number_of_arcs() - leaf_arcs;

		assert_eq!(
			lscape.number_of_triangles(),
			4 * leaf_arcs + 8 * branch_arcs,
			"seed {seed}" );

		// every triangle names a live arc of the landscape tree, and the per-arc counts
		// match the arc's shape
		for arc in lscape.tree().arcs() {
			let count = lscape.triangles().iter().filter( |t| t.arc == arc ).count();
			if lscape.tree().is_leaf( lscape.tree().target( arc ) ) {
				assert_eq!( count, 4 );
			}
			else {
				assert_eq!( count, 8 );
			}
		}
	}
}

#[test]
fn test_total_weight_counts_nodes_plus_members() {
	for seed in 50..60 {
		let num_vertices = 25 + ( seed as usize - 50 ) * 3;
		let plex = random_complex( seed, num_vertices, 50 );
		let tree = CarrsAlgorithm::new().compute( &plex ).unwrap();

		let root = find_min_leaf( &tree ).unwrap();
		let lscape = RectangularLandscape::build( &tree, root, None ).unwrap();

		let root_node = lscape.tree().root();
		assert_eq!(
			lscape.weights().total_weight( root_node ),
			tree.nodes_plus_members() as f64,
			"seed {seed}" );

		// with default weights the total equals the vertex count
		assert_eq!( lscape.weights().total_weight( root_node ), num_vertices as f64 );
	}
}
