/*!
Data structures to compute, simplify and embed contour trees of scalar fields.

This crate takes a scalar function sampled on the vertices of a simplicial complex (given by its
1-skeleton) and summarizes the topology of its level sets as a *contour tree*. The tree can be
simplified by persistence while keeping every operation reversible, and embedded as a *rectangular
landscape*: a triangulated 2.5D terrain in which every triangle knows which tree arc it renders.

The pipeline is strictly layered: [complex::ScalarComplex] → [contour::ContourTree] (via
[carr::CarrsAlgorithm]) → [fold::FoldedContourTree] (optionally pruned by
[simplify::PersistenceSimplifier]) → [landscape::LandscapeTree] →
[rectangular::RectangularLandscape].


# Examples

```
use relief::ScalarMemberTree;
use relief::carr::CarrsAlgorithm;
use relief::complex::ScalarComplex;

// A path of monotonically increasing values collapses to a single edge
let mut plex = ScalarComplex::new();
for value in [0., 1., 2., 3., 4.] {
	plex.add_vertex( value );
}
for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 4)] {
	plex.add_edge( u, v );
}

let tree = CarrsAlgorithm::new().compute( &plex ).unwrap();
assert_eq!( tree.number_of_nodes(), 2 );
assert_eq!( tree.number_of_edges(), 1 );

// The three interior vertices survive as members of the only edge
let edge = tree.edges()[0];
assert_eq!( tree.edge_members( edge ).len(), 3 );
```

```
use relief::{find_min_leaf, ScalarMemberTree};
use relief::carr::CarrsAlgorithm;
use relief::complex::ScalarComplex;
use relief::fold::FoldedContourTree;
use relief::rectangular::RectangularLandscape;

// A 'W'-shaped profile has a saddle between its two maxima
let mut plex = ScalarComplex::new();
for value in [0., 2., 1., 3., 0.5] {
	plex.add_vertex( value );
}
for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 4)] {
	plex.add_edge( u, v );
}

let tree = CarrsAlgorithm::new().compute( &plex ).unwrap();
let folded = FoldedContourTree::new( &tree );

// Embed the terrain, rooted at the lowest leaf
let root = find_min_leaf( &folded ).unwrap();
let landscape = RectangularLandscape::build( &folded, root, None ).unwrap();
assert!( landscape.number_of_triangles() > 0 );
```

# Crate feature flags

The following crate feature flags are available. They are configured in your `Cargo.toml`.

* `space_efficient_nodes`
	* Optional, requires the `nonmax` crate.
	* Improve handle space usage. Disallows the maximum slot index 2^64-1 and incurs a small
		runtime cost to check that this index is not used.
* `petgraph`
	* Optional, requires the `petgraph` crate.
	* Enable petgraph-based reference checks. These are slow and only intended to be used for
		comparison or verification.
* `generate`
	* Optional, requires the `rand` crate.
	* Enables functionality to randomly generate stuff. Used for tests.
* `verbose_carr`
	* Optional. WARNING: slow.
	* Print out extra information while computing contour trees.
* `verbose_simplify`
	* Optional. WARNING: slow.
	* Print out extra information during persistence simplification.

# Literature

\[CSA03\] Hamish Carr, Jack Snoeyink, and Ulrike Axen. Computing contour trees in all dimensions.
Computational Geometry, 24(2):75–94, 2003.
doi:[10.1016/S0925-7721(02)00093-7](https://doi.org/10.1016/S0925-7721(02)00093-7)

\[ELZ02\] Herbert Edelsbrunner, David Letscher, and Afra Zomorodian. Topological persistence and
simplification. Discrete & Computational Geometry, 28:511–533, 2002.
doi:[10.1007/s00454-002-2885-2](https://doi.org/10.1007/s00454-002-2885-2)

\[WBP07\] Gunther Weber, Peer-Timo Bremer, and Valerio Pascucci. Topological landscapes: a terrain
metaphor for scientific data. IEEE Transactions on Visualization and Computer Graphics,
13(6):1416–1423, 2007.
doi:[10.1109/TVCG.2007.70601](https://doi.org/10.1109/TVCG.2007.70601)
*/

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::private_doc_tests)]


use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::contour::Members;
use crate::maps::StaticNodeMap;

pub mod carr;
pub mod complex;
pub mod contour;
pub mod fileio;
pub mod fold;
pub mod graph;
pub mod landscape;
pub mod maps;
pub mod order;
pub mod rectangular;
pub mod simplify;

#[cfg( feature = "generate" )]
pub mod generate;

#[cfg( feature = "petgraph" )]
pub mod pg;

#[cfg(test)]
pub(crate) mod test_data;


#[cfg( not( feature = "space_efficient_nodes" ) )]
type RawIdx = usize;

#[cfg( feature = "space_efficient_nodes" )]
type RawIdx = nonmax::NonMaxUsize;

#[cfg( not( feature = "space_efficient_nodes" ) )]
fn pack_raw_idx( idx : usize ) -> RawIdx {
	idx
}

#[cfg( not( feature = "space_efficient_nodes" ) )]
fn unpack_raw_idx( raw : RawIdx ) -> usize {
	raw
}

#[cfg( feature = "space_efficient_nodes" )]
fn pack_raw_idx( idx : usize ) -> RawIdx {
	nonmax::NonMaxUsize::new( idx ).unwrap()
}

#[cfg( feature = "space_efficient_nodes" )]
fn unpack_raw_idx( raw : RawIdx ) -> usize {
	raw.get()
}


/// A handle with a compact integer identifier, usable as an attribute map key.
///
/// Handles are stable: they survive unrelated insertions and removals in the owning store.
pub trait IndexHandle : Copy {
	/// Convert `usize` into a handle.
	///
	/// Use with care, as this can circumvent bounds checking.
	fn new( idx : usize ) -> Self;

	/// The compact identifier of this handle.
	fn index( &self ) -> usize;
}

/// Represents a node of a graph store to the outside world.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeIdx {
	raw_idx : RawIdx
}

/// Represents an undirected edge of a graph store to the outside world.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EdgeIdx {
	raw_idx : RawIdx
}

/// Represents a directed arc of a graph store to the outside world.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ArcIdx {
	raw_idx : RawIdx
}

macro_rules! impl_index_handle {
	( $handle : ident ) => {
		impl IndexHandle for $handle {
			fn new( idx : usize ) -> $handle {
				$handle { raw_idx : pack_raw_idx( idx ) }
			}

			#[inline]
			fn index( &self ) -> usize {
				unpack_raw_idx( self.raw_idx )
			}
		}

		impl $handle {
			/// Convert `usize` into a handle.
			///
			/// Use with care, as this can circumvent bounds checking.
			pub fn new( idx : usize ) -> $handle {
				<$handle as IndexHandle>::new( idx )
			}

			/// Convert this into `usize`.
			#[inline]
			pub fn index( &self ) -> usize {
				<$handle as IndexHandle>::index( self )
			}
		}

		impl Display for $handle {
			fn fmt( &self, f : &mut Formatter<'_> ) -> std::fmt::Result {
				write!( f, "{}", self.index() )
			}
		}
	}
}

impl_index_handle!( NodeIdx );
impl_index_handle!( EdgeIdx );
impl_index_handle!( ArcIdx );


/// Structural errors surfaced by tree construction, folding, simplification, and embedding.
#[derive(Debug, Error)]
pub enum TreeError {
	/// Contour tree construction requires a connected 1-skeleton.
	#[error( "the input 1-skeleton is not connected" )]
	Disconnected,

	/// Collapsing is only defined for edges incident to a degree-1 node.
	#[error( "cannot collapse an edge with no leaf endpoint" )]
	CollapseNonLeaf,

	/// Reduction is only defined for nodes of degree exactly 2.
	#[error( "cannot reduce a node of degree {0}" )]
	ReduceDegree( usize ),

	/// Tried to restore a collapsed edge that is not in the collapse list.
	#[error( "no collapsed edge at index {index} (collapse list has {len} entries)" )]
	UncollapseOutOfRange {
		/// Requested position in the collapse list.
		index : usize,
		/// Length of the collapse list.
		len : usize
	},

	/// Only edges created by a reduction can be unreduced.
	#[error( "the edge was not created by a reduction" )]
	UnreduceWithoutFold,

	/// The rectangular embedder requires a root with exactly one child.
	#[error( "the landscape root must have exactly one child, but has {0}" )]
	MultiChildRoot( usize ),

	/// Persistence thresholds are absolute value differences and cannot be negative.
	#[error( "the simplification threshold must be nonnegative, got {0}" )]
	NegativeThreshold( f64 ),
}


/// Read access to an undirected tree carrying scalar values, external IDs, and member sets.
///
/// Implemented by [contour::ContourTree] and [fold::FoldedContourTree]; the simplifier, the
/// landscape builder and the file codecs are generic over this trait.
#[portrait::make]
pub trait ScalarMemberTree {
	/// All live nodes, in store iteration order.
	fn nodes( &self ) -> Vec<NodeIdx>;

	/// All live edges, in store iteration order.
	fn edges( &self ) -> Vec<EdgeIdx>;

	/// The number of live nodes.
	fn number_of_nodes( &self ) -> usize;

	/// The number of live edges.
	fn number_of_edges( &self ) -> usize;

	/// Whether `v` refers to a live node.
	fn is_node_valid( &self, v : NodeIdx ) -> bool;

	/// The number of edges incident to `v`.
	fn degree( &self, v : NodeIdx ) -> usize;

	/// The edges incident to `v`, in insertion order.
	fn incident_edges( &self, v : NodeIdx ) -> Vec<EdgeIdx>;

	/// One endpoint of `e`.
	fn edge_u( &self, e : EdgeIdx ) -> NodeIdx;

	/// The other endpoint of `e`.
	fn edge_v( &self, e : EdgeIdx ) -> NodeIdx;

	/// The endpoint of `e` that is not `v`.
	fn opposite( &self, v : NodeIdx, e : EdgeIdx ) -> NodeIdx;

	/// The scalar value of `v`.
	fn value( &self, v : NodeIdx ) -> f64;

	/// The external ID of `v`.
	fn id( &self, v : NodeIdx ) -> usize;

	/// The live node with the given external ID, if any.
	fn node_by_id( &self, id : usize ) -> Option<NodeIdx>;

	/// The member set of `v`. By convention a node is a member of itself.
	fn node_members( &self, v : NodeIdx ) -> &Members;

	/// The member set of `e`.
	fn edge_members( &self, e : EdgeIdx ) -> &Members;

	/// The total number of members over all live nodes and edges.
	fn nodes_plus_members( &self ) -> usize;

	/// An exclusive upper bound on live node identifiers, for sizing attribute maps.
	fn max_node_identifier( &self ) -> usize;

	/// An exclusive upper bound on live edge identifiers, for sizing attribute maps.
	fn max_edge_identifier( &self ) -> usize;
}


/// Breadth-first traversal of a tree, starting at `root`.
///
/// Returns one `(parent, child, edge)` triple per edge, in visit order. Children are visited in
/// the order of their parent's incidence list.
pub fn bfs_edges<TTree : ScalarMemberTree>( tree : &TTree, root : NodeIdx )
		-> Vec<(NodeIdx, NodeIdx, EdgeIdx)>
{
	bfs_edges_avoiding( tree, root, None )
}

/// Breadth-first traversal of a tree starting at `start`, never crossing through `avoid`.
pub fn bfs_edges_avoiding<TTree : ScalarMemberTree>(
	tree : &TTree,
	start : NodeIdx,
	avoid : Option<NodeIdx> )
	-> Vec<(NodeIdx, NodeIdx, EdgeIdx)>
{
	let mut visited : StaticNodeMap<bool> =
		StaticNodeMap::with_capacity( tree.max_node_identifier() );
	let mut result = Vec::new();
	let mut queue = VecDeque::new();

	visited[start] = true;
	if let Some( blocked ) = avoid {
		visited[blocked] = true;
	}
	queue.push_back( start );

	while let Some( parent ) = queue.pop_front() {
		for e in tree.incident_edges( parent ) {
			let child = tree.opposite( parent, e );
			if !visited[child] {
				visited[child] = true;
				result.push( ( parent, child, e ) );
				queue.push_back( child );
			}
		}
	}

	result
}


fn find_leaf_by<TTree : ScalarMemberTree>(
	tree : &TTree,
	better : impl Fn( f64, f64 ) -> bool )
	-> Option<NodeIdx>
{
	let mut best : Option<(NodeIdx, f64)> = None;

	for v in tree.nodes() {
		if tree.degree( v ) != 1 {
			continue;
		}
		let value = tree.value( v );
		match best {
			Some( (_, best_value) ) if !better( value, best_value ) => {},
			_ => best = Some( (v, value) )
		}
	}

	best.map( |(v, _)| v )
}

/// Find the leaf with the minimum scalar value, if the tree has any leaf.
pub fn find_min_leaf<TTree : ScalarMemberTree>( tree : &TTree ) -> Option<NodeIdx> {
	find_leaf_by( tree, |a, b| a < b )
}

/// Find the leaf with the maximum scalar value, if the tree has any leaf.
pub fn find_max_leaf<TTree : ScalarMemberTree>( tree : &TTree ) -> Option<NodeIdx> {
	find_leaf_by( tree, |a, b| a > b )
}

/// Find the node with the minimum scalar value.
pub fn find_min_node<TTree : ScalarMemberTree>( tree : &TTree ) -> Option<NodeIdx> {
	tree.nodes().into_iter().reduce( |best, v| {
		if tree.value( v ) < tree.value( best ) { v } else { best }
	} )
}

/// Find the node with the maximum scalar value.
pub fn find_max_node<TTree : ScalarMemberTree>( tree : &TTree ) -> Option<NodeIdx> {
	tree.nodes().into_iter().reduce( |best, v| {
		if tree.value( v ) > tree.value( best ) { v } else { best }
	} )
}
