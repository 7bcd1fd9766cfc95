//! Various helpers to randomly generate stuff.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::complex::ScalarComplex;


/// Return the edges of a random tree with the given number of vertices.
///
/// The edges have the form (parent, child), i.e., are oriented away from a random root.
pub fn generate_tree_edges<'a>( num_vertices : usize, rng : &'a mut impl Rng )
		-> impl Iterator<Item = (usize, usize)> + 'a
{
	let mut nodes : Vec<usize> = (0..num_vertices).collect();
	nodes.shuffle( rng );

	(1..num_vertices).map( move |v| {
		( nodes[rng.gen_range( 0..v )], nodes[v] )
	} )
}


/// Generate a uniformly random edge `(u,v)`, where `u` and `v` are distinct and in
/// `0..num_vertices`.
pub fn generate_edge( num_vertices : usize, rng : &mut impl Rng ) -> (usize, usize) {
	let u = rng.gen_range( 0..num_vertices );
	let mut v = rng.gen_range( 0..num_vertices - 1 );
	if v >= u {
		v += 1;
	}
	( u, v )
}


/// Generate a random connected scalar complex: uniform values on a random spanning tree plus
/// extra random edges (possibly duplicates, which coalesce).
pub fn generate_complex(
	num_vertices : usize,
	num_extra_edges : usize,
	rng : &mut impl Rng )
	-> ScalarComplex
{
	assert!( num_vertices >= 2, "need at least two vertices" );

	let mut plex = ScalarComplex::new();
	for _ in 0..num_vertices {
		plex.add_vertex( rng.gen::<f64>() );
	}

	let tree_edges : Vec<(usize, usize)> = generate_tree_edges( num_vertices, rng ).collect();
	for (u, v) in tree_edges {
		plex.add_edge( u, v );
	}

	for _ in 0..num_extra_edges {
		let (u, v) = generate_edge( num_vertices, rng );
		plex.add_edge( u, v );
	}

	plex
}
