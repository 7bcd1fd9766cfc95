//! Scalar fields on the 1-skeleton of a simplicial complex.

use std::collections::VecDeque;

use crate::NodeIdx;
use crate::graph::UndirectedGraph;
use crate::maps::{ObservingNodeMap, StaticNodeMap};


/// A scalar function sampled on the vertices of a simplicial complex, plus the 1-skeleton.
///
/// Vertices are identified by their 0-based insertion index. Self-loops are dropped silently and
/// duplicate edges coalesce, so the stored skeleton is always simple.
pub struct ScalarComplex {
	graph : UndirectedGraph,
	node_to_value : ObservingNodeMap<f64>,
	vertices : Vec<NodeIdx>
}

impl ScalarComplex {
	/// Creates an empty complex.
	pub fn new() -> Self {
		let mut graph = UndirectedGraph::new();
		let node_to_value = ObservingNodeMap::new( graph.attach_node_observer() );
		ScalarComplex{ graph, node_to_value, vertices : Vec::new() }
	}

	/// Adds a vertex carrying the given scalar value; returns its node handle.
	///
	/// The vertex's index is the number of vertices added before it.
	pub fn add_vertex( &mut self, value : f64 ) -> NodeIdx {
		let node = self.graph.add_node();
		self.node_to_value[node] = value;
		self.vertices.push( node );
		node
	}

	/// Adds the edge `{u, v}`, given by vertex indices.
	///
	/// Self-loops are ignored; adding an existing edge is a no-op. Indices must refer to
	/// previously added vertices.
	pub fn add_edge( &mut self, u : usize, v : usize ) {
		if u == v {
			return;
		}
		let un = self.vertices[u];
		let vn = self.vertices[v];
		if self.graph.find_edge( un, vn ).is_none() {
			self.graph.add_edge( un, vn );
		}
	}

	/// The number of vertices.
	pub fn number_of_vertices( &self ) -> usize {
		self.vertices.len()
	}

	/// The number of (coalesced) edges.
	pub fn number_of_edges( &self ) -> usize {
		self.graph.number_of_edges()
	}

	/// The node handle of the vertex with the given index.
	pub fn vertex( &self, index : usize ) -> NodeIdx {
		self.vertices[index]
	}

	/// The index of a vertex node. Inverse of [vertex](Self::vertex()).
	pub fn index_of( &self, node : NodeIdx ) -> usize {
		// vertex handles are allocated consecutively and never removed
		node.index()
	}

	/// The scalar value at the vertex with the given index.
	pub fn value( &self, index : usize ) -> f64 {
		self.node_to_value[self.vertices[index]]
	}

	/// All scalar values, indexed by vertex.
	pub fn values( &self ) -> Vec<f64> {
		(0..self.vertices.len()).map( |i| self.value( i ) ).collect()
	}

	/// Iterate over the indices of the vertices adjacent to vertex `index`, in insertion order.
	pub fn neighbors( &self, index : usize ) -> impl Iterator<Item = usize> + '_ {
		self.graph.neighbors( self.vertices[index] ).map( |w| self.index_of( w ) )
	}

	/// All edges as index pairs, in insertion order.
	pub fn edges( &self ) -> impl Iterator<Item = (usize, usize)> + '_ {
		self.graph.edges().map( |e| {
			( self.index_of( self.graph.u( e ) ), self.index_of( self.graph.v( e ) ) )
		} )
	}
}

impl Default for ScalarComplex {
	fn default() -> Self {
		Self::new()
	}
}


/// Whether the 1-skeleton is connected. The empty complex counts as connected.
pub fn is_connected( plex : &ScalarComplex ) -> bool {
	let n = plex.number_of_vertices();
	if n == 0 {
		return true;
	}

	let mut seen : StaticNodeMap<bool> = StaticNodeMap::with_capacity( n );
	let mut queue = VecDeque::new();
	let mut count = 1;

	seen[plex.vertex( 0 )] = true;
	queue.push_back( 0 );

	while let Some( v ) = queue.pop_front() {
		for w in plex.neighbors( v ) {
			if !seen[plex.vertex( w )] {
				seen[plex.vertex( w )] = true;
				count += 1;
				queue.push_back( w );
			}
		}
	}

	count == n
}
