//! Contour trees and the member-carrying graph they are built on.
//!
//! A contour tree node is a retained critical vertex; regular vertices absorbed during
//! construction live on as *members* of the edge that swallowed them. Member sets are keyed by
//! vertex id, which also fixes the iteration order the file codec relies on.

use std::collections::BTreeMap;
use std::cmp::Ordering;

use crate::*;
use crate::graph::UndirectedGraph;
use crate::maps::{ObservingEdgeMap, ObservingNodeMap};


/// A vertex absorbed into a contour tree node or edge: an `(id, value)` pair keyed by id.
#[derive(Clone, Copy, Debug)]
pub struct Member {
	id : usize,
	value : f64
}

impl Member {
	/// Creates a member.
	pub fn new( id : usize, value : f64 ) -> Member {
		Member{ id, value }
	}

	/// The vertex id of this member.
	pub fn id( &self ) -> usize {
		self.id
	}

	/// The scalar value of this member.
	pub fn value( &self ) -> f64 {
		self.value
	}
}

impl PartialEq for Member {
	fn eq( &self, rhs : &Member ) -> bool {
		self.id == rhs.id
	}
}

impl Eq for Member {}

impl PartialOrd for Member {
	fn partial_cmp( &self, rhs : &Member ) -> Option<Ordering> {
		Some( self.cmp( rhs ) )
	}
}

impl Ord for Member {
	fn cmp( &self, rhs : &Member ) -> Ordering {
		self.id.cmp( &rhs.id )
	}
}

/// A set of members, ordered by id.
pub type Members = std::collections::BTreeSet<Member>;


/// An undirected graph whose nodes carry ids and scalar values and whose nodes and edges carry
/// member sets.
///
/// This is the mutable structure [crate::carr::CarrsAlgorithm] and the contour tree codec build
/// into; [ContourTree] is its frozen read-only form.
#[derive(Debug)]
pub struct MemberGraph {
	graph : UndirectedGraph,
	node_to_id : ObservingNodeMap<usize>,
	node_to_value : ObservingNodeMap<f64>,
	node_to_members : ObservingNodeMap<Members>,
	edge_to_members : ObservingEdgeMap<Members>,
	id_to_node : BTreeMap<usize, NodeIdx>,
	nodes_plus_members : usize
}

impl MemberGraph {
	/// Creates an empty graph.
	pub fn new() -> Self {
		let mut graph = UndirectedGraph::new();
		let node_to_id = ObservingNodeMap::new( graph.attach_node_observer() );
		let node_to_value = ObservingNodeMap::new( graph.attach_node_observer() );
		let node_to_members = ObservingNodeMap::new( graph.attach_node_observer() );
		let edge_to_members = ObservingEdgeMap::new( graph.attach_edge_observer() );

		MemberGraph{
			graph,
			node_to_id,
			node_to_value,
			node_to_members,
			edge_to_members,
			id_to_node : BTreeMap::new(),
			nodes_plus_members : 0
		}
	}

	/// Adds a node with the given id and scalar value.
	///
	/// The node starts out with itself as its only member.
	pub fn add_node( &mut self, id : usize, value : f64 ) -> NodeIdx {
		let node = self.graph.add_node();
		self.node_to_id[node] = id;
		self.node_to_value[node] = value;
		self.id_to_node.insert( id, node );

		let mut members = Members::new();
		members.insert( Member::new( id, value ) );
		self.node_to_members[node] = members;
		self.nodes_plus_members += 1;

		node
	}

	/// Adds an edge with an empty member set.
	pub fn add_edge( &mut self, u : NodeIdx, v : NodeIdx ) -> EdgeIdx {
		let edge = self.graph.add_edge( u, v );
		self.edge_to_members[edge] = Members::new();
		edge
	}

	/// Removes a node, its members, and its incident edges (with their members).
	pub fn remove_node( &mut self, node : NodeIdx ) {
		let incident : Vec<EdgeIdx> = self.graph.incident_edges( node ).collect();
		for e in incident {
			self.remove_edge( e );
		}

		self.nodes_plus_members -= self.node_to_members[node].len();
		self.id_to_node.remove( &self.node_to_id[node] );
		self.graph.remove_node( node );
	}

	/// Removes an edge and its members.
	pub fn remove_edge( &mut self, edge : EdgeIdx ) {
		self.nodes_plus_members -= self.edge_to_members[edge].len();
		self.graph.remove_edge( edge );
	}

	/// Inserts a member into the node's member set.
	pub fn insert_node_member( &mut self, node : NodeIdx, member : Member ) {
		if self.node_to_members[node].insert( member ) {
			self.nodes_plus_members += 1;
		}
	}

	/// Inserts a member into the edge's member set.
	pub fn insert_edge_member( &mut self, edge : EdgeIdx, member : Member ) {
		if self.edge_to_members[edge].insert( member ) {
			self.nodes_plus_members += 1;
		}
	}

	/// Inserts all of `members` into the node's member set.
	pub fn insert_node_members( &mut self, node : NodeIdx, members : Members ) {
		for member in members {
			self.insert_node_member( node, member );
		}
	}

	/// Inserts all of `members` into the edge's member set.
	pub fn insert_edge_members( &mut self, edge : EdgeIdx, members : Members ) {
		for member in members {
			self.insert_edge_member( edge, member );
		}
	}

	/// Removes all nodes and edges.
	pub fn clear( &mut self ) {
		self.graph.clear();
		self.id_to_node.clear();
		self.nodes_plus_members = 0;
	}
}

impl Default for MemberGraph {
	fn default() -> Self {
		Self::new()
	}
}

impl ScalarMemberTree for MemberGraph {
	fn nodes( &self ) -> Vec<NodeIdx> {
		self.graph.nodes().collect()
	}

	fn edges( &self ) -> Vec<EdgeIdx> {
		self.graph.edges().collect()
	}

	fn number_of_nodes( &self ) -> usize {
		self.graph.number_of_nodes()
	}

	fn number_of_edges( &self ) -> usize {
		self.graph.number_of_edges()
	}

	fn is_node_valid( &self, v : NodeIdx ) -> bool {
		self.graph.is_node_valid( v )
	}

	fn degree( &self, v : NodeIdx ) -> usize {
		self.graph.degree( v )
	}

	fn incident_edges( &self, v : NodeIdx ) -> Vec<EdgeIdx> {
		self.graph.incident_edges( v ).collect()
	}

	fn edge_u( &self, e : EdgeIdx ) -> NodeIdx {
		self.graph.u( e )
	}

	fn edge_v( &self, e : EdgeIdx ) -> NodeIdx {
		self.graph.v( e )
	}

	fn opposite( &self, v : NodeIdx, e : EdgeIdx ) -> NodeIdx {
		self.graph.opposite( v, e )
	}

	fn value( &self, v : NodeIdx ) -> f64 {
		self.node_to_value[v]
	}

	fn id( &self, v : NodeIdx ) -> usize {
		self.node_to_id[v]
	}

	fn node_by_id( &self, id : usize ) -> Option<NodeIdx> {
		self.id_to_node.get( &id ).copied()
	}

	fn node_members( &self, v : NodeIdx ) -> &Members {
		&self.node_to_members[v]
	}

	fn edge_members( &self, e : EdgeIdx ) -> &Members {
		&self.edge_to_members[e]
	}

	fn nodes_plus_members( &self ) -> usize {
		self.nodes_plus_members
	}

	fn max_node_identifier( &self ) -> usize {
		self.graph.max_node_identifier()
	}

	fn max_edge_identifier( &self ) -> usize {
		self.graph.max_edge_identifier()
	}
}


/// A contour tree: the output of Carr's algorithm, immutable once built.
///
/// Further editing happens on a [crate::fold::FoldedContourTree] layered above, never here.
#[derive(Debug)]
pub struct ContourTree {
	graph : MemberGraph
}

impl ContourTree {
	/// Wraps a precomputed member graph as a contour tree.
	///
	/// The graph is expected to be a tree; [crate::carr::CarrsAlgorithm::compute] and
	/// [crate::fileio::read_contour_tree] produce suitable inputs.
	pub fn from_graph( graph : MemberGraph ) -> Self {
		ContourTree{ graph }
	}
}

#[portrait::fill(portrait::delegate(MemberGraph; self.graph))]
impl ScalarMemberTree for ContourTree {}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_member_identity_is_id_only() {
		let mut members = Members::new();
		members.insert( Member::new( 4, 1.0 ) );
		members.insert( Member::new( 4, 2.0 ) );
		members.insert( Member::new( 2, 0.5 ) );

		assert_eq!( members.len(), 2 );
		let ids : Vec<usize> = members.iter().map( Member::id ).collect();
		assert_eq!( ids, vec![ 2, 4 ] );
	}

	#[test]
	fn test_member_graph_counts() {
		let mut g = MemberGraph::new();
		let a = g.add_node( 0, 1.0 );
		let b = g.add_node( 1, 2.0 );
		let e = g.add_edge( a, b );

		assert_eq!( g.nodes_plus_members(), 2 );

		g.insert_edge_member( e, Member::new( 7, 1.5 ) );
		assert_eq!( g.nodes_plus_members(), 3 );

		// duplicate members do not count twice
		g.insert_edge_member( e, Member::new( 7, 1.5 ) );
		assert_eq!( g.nodes_plus_members(), 3 );

		g.remove_node( b );
		assert_eq!( g.nodes_plus_members(), 1 );
		assert_eq!( g.node_by_id( 1 ), None );
		assert_eq!( g.node_by_id( 0 ), Some( a ) );
	}

	#[test]
	fn test_contour_tree_forwards() {
		let mut g = MemberGraph::new();
		let a = g.add_node( 3, 1.0 );
		let b = g.add_node( 5, 2.0 );
		g.add_edge( a, b );

		let tree = ContourTree::from_graph( g );
		assert_eq!( tree.number_of_nodes(), 2 );
		assert_eq!( tree.id( a ), 3 );
		assert_eq!( tree.value( b ), 2.0 );
		assert_eq!( tree.node_by_id( 5 ), Some( b ) );
		assert_eq!( tree.node_members( a ).len(), 1 );
	}
}
