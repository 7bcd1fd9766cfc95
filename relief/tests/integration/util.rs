use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::SeedableRng;

use relief::ScalarMemberTree;
use relief::complex::ScalarComplex;
use relief::generate::generate_complex;

/// Scalar values of the 12-vertex reference complex.
pub const WENGER_VALUES : [f64; 12] =
	[ 25., 62., 45., 66., 16., 32., 64., 39., 58., 51., 53., 30. ];

/// Edges of the 12-vertex reference complex.
pub const WENGER_EDGES : [(usize, usize); 23] = [
	(0, 1), (1, 2), (3, 4), (4, 5), (6, 7), (7, 8), (9, 10), (10, 11), (0, 3),
	(1, 4), (2, 5), (3, 6), (4, 7), (5, 8), (6, 9), (7, 10), (8, 11), (0, 4),
	(1, 5), (3, 7), (4, 8), (6, 10), (7, 11)
];

#[allow(dead_code)]
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

/// A seeded random connected complex.
#[allow(dead_code)]
pub fn random_complex( seed : u64, num_vertices : usize, num_extra_edges : usize )
		-> ScalarComplex
{
	let mut rng = StdRng::seed_from_u64( seed );
	generate_complex( num_vertices, num_extra_edges, &mut rng )
}

pub type NodeShape = BTreeMap<usize, f64>;
pub type EdgeShape = BTreeMap<(usize, usize), BTreeSet<(usize, u64)>>;

/// The id-level shape of a tree: node values plus per-edge member sets.
///
/// Member values are compared bit-exactly.
#[allow(dead_code)]
pub fn tree_shape<TTree : ScalarMemberTree>( tree : &TTree ) -> (NodeShape, EdgeShape) {
	let nodes = tree.nodes().into_iter()
		.map( |v| ( tree.id( v ), tree.value( v ) ) )
		.collect();

	let edges = tree.edges().into_iter().map( |e| {
		let u = tree.id( tree.edge_u( e ) );
		let v = tree.id( tree.edge_v( e ) );
		let members = tree.edge_members( e ).iter()
			.map( |m| ( m.id(), m.value().to_bits() ) )
			.collect();
		( ( u.min( v ), u.max( v ) ), members )
	} ).collect();

	( nodes, edges )
}

/// Every vertex id of `0..n` must appear exactly once: as a node or as a member.
#[allow(dead_code)]
pub fn assert_partitions_vertices<TTree : ScalarMemberTree>( tree : &TTree, n : usize ) {
	let mut seen : Vec<usize> = Vec::new();

	for v in tree.nodes() {
		seen.push( tree.id( v ) );
	}
	for e in tree.edges() {
		for m in tree.edge_members( e ) {
			seen.push( m.id() );
		}
	}

	seen.sort();
	assert_eq!( seen, (0..n).collect::<Vec<usize>>() );
}
