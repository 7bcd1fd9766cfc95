//! Carr's algorithm for computing contour trees.
//!
//! The sweep follows \[CSA03\]: build the join tree (ascending) and the split tree (descending)
//! with an order-aware disjoint-set forest, merge the two into one undirected tree by repeatedly
//! peeling leaves, then eliminate regular nodes so that only critical vertices remain as nodes.

use std::collections::VecDeque;

use crate::{NodeIdx, ScalarMemberTree, TreeError};
use crate::complex::{is_connected, ScalarComplex};
use crate::contour::{ContourTree, Member, MemberGraph, Members};
use crate::graph::DirectedGraph;
use crate::order::{DisjointSetForest, TotalOrder};

const LOG_VERBOSE : bool = cfg!( feature = "verbose_carr" );


/// A join or split tree: a directed tree over the vertex indices of a complex.
///
/// Nodes are allocated once, in index order, before any arc exists, so a node's slot index *is*
/// its vertex index. During the merge phase nodes are removed or spliced out in place.
#[derive(Clone)]
pub struct JoinSplitTree {
	graph : DirectedGraph
}

impl JoinSplitTree {
	/// Creates a tree with `n` isolated nodes for the vertices `0..n`.
	pub fn new( n : usize ) -> Self {
		let mut graph = DirectedGraph::new();
		for _ in 0..n {
			graph.add_node();
		}
		JoinSplitTree{ graph }
	}

	fn node( v : usize ) -> NodeIdx {
		NodeIdx::new( v )
	}

	/// Adds the arc `u → v`, identified by vertex indices.
	pub fn add_arc( &mut self, u : usize, v : usize ) {
		self.graph.add_arc( Self::node( u ), Self::node( v ) );
	}

	/// Whether vertex `v` is still present.
	pub fn is_valid( &self, v : usize ) -> bool {
		self.graph.is_node_valid( Self::node( v ) )
	}

	/// The number of arcs leaving `v`.
	pub fn out_degree( &self, v : usize ) -> usize {
		self.graph.out_degree( Self::node( v ) )
	}

	/// The number of arcs entering `v`.
	pub fn in_degree( &self, v : usize ) -> usize {
		self.graph.in_degree( Self::node( v ) )
	}

	/// The source of the first arc entering `v`, if any.
	pub fn in_neighbor( &self, v : usize ) -> Option<usize> {
		self.graph.first_in_arc( Self::node( v ) )
			.map( |a| self.graph.source( a ).index() )
	}

	/// The target of the first arc leaving `v`, if any.
	pub fn out_neighbor( &self, v : usize ) -> Option<usize> {
		self.graph.first_out_arc( Self::node( v ) )
			.map( |a| self.graph.target( a ).index() )
	}

	/// Removes vertex `v` and all its arcs.
	pub fn remove_node( &mut self, v : usize ) {
		self.graph.remove_node( Self::node( v ) );
	}

	/// Splices vertex `v` out of the tree.
	///
	/// If `v` has a parent, its unique in-arc and unique out-arc are replaced by one arc from
	/// parent to child; either way `v` is removed.
	pub fn reduce_node( &mut self, v : usize ) {
		if self.in_degree( v ) > 0 {
			let parent = self.in_neighbor( v ).unwrap();
			let child = self.out_neighbor( v ).unwrap();
			self.add_arc( parent, child );
		}
		self.remove_node( v );
	}

	/// The number of remaining nodes.
	pub fn number_of_nodes( &self ) -> usize {
		self.graph.number_of_nodes()
	}

	/// The number of remaining arcs.
	pub fn number_of_arcs( &self ) -> usize {
		self.graph.number_of_arcs()
	}

	/// The remaining vertices, in insertion order.
	pub fn nodes( &self ) -> Vec<usize> {
		self.graph.nodes().map( |v| v.index() ).collect()
	}

	/// All arcs as `(source, target)` vertex pairs, in insertion order.
	pub fn arcs( &self ) -> Vec<(usize, usize)> {
		self.graph.arcs()
			.map( |a| ( self.graph.source( a ).index(), self.graph.target( a ).index() ) )
			.collect()
	}
}


/// Computes contour trees from scalar simplicial complexes.
///
/// The join and split trees are consumed by the merge phase; set
/// [keep_join_split_trees](Self::keep_join_split_trees()) to retain pre-merge copies for
/// inspection or file output.
pub struct CarrsAlgorithm {
	keep_join_split : bool,
	join_tree : Option<JoinSplitTree>,
	split_tree : Option<JoinSplitTree>
}

impl CarrsAlgorithm {
	/// Creates the algorithm with default settings.
	pub fn new() -> Self {
		CarrsAlgorithm{ keep_join_split : false, join_tree : None, split_tree : None }
	}

	/// Retain copies of the join and split trees across [compute](Self::compute()).
	pub fn keep_join_split_trees( &mut self, keep : bool ) {
		self.keep_join_split = keep;
	}

	/// The join tree of the last computation, if retained.
	pub fn join_tree( &self ) -> Option<&JoinSplitTree> {
		self.join_tree.as_ref()
	}

	/// The split tree of the last computation, if retained.
	pub fn split_tree( &self ) -> Option<&JoinSplitTree> {
		self.split_tree.as_ref()
	}

	/// Computes the contour tree of `plex`.
	///
	/// Fails with [TreeError::Disconnected] if the 1-skeleton is not connected.
	pub fn compute( &mut self, plex : &ScalarComplex ) -> Result<ContourTree, TreeError> {
		if !is_connected( plex ) {
			return Err( TreeError::Disconnected );
		}

		let order = TotalOrder::compute( &plex.values() );

		let mut join_tree = Self::compute_join_tree( plex, &order );
		let mut split_tree = Self::compute_split_tree( plex, &order );

		if self.keep_join_split {
			self.join_tree = Some( join_tree.clone() );
			self.split_tree = Some( split_tree.clone() );
		}
		else {
			self.join_tree = None;
			self.split_tree = None;
		}

		let mut graph = MemberGraph::new();
		Self::compute_merge_tree( plex, &mut join_tree, &mut split_tree, &mut graph );
		Self::remove_regular_nodes( &mut graph, &order );

		Ok( ContourTree::from_graph( graph ) )
	}

	/// Computes the join tree: an ascending sweep linking each vertex to the maxima of the
	/// sublevel components it merges.
	pub fn compute_join_tree( plex : &ScalarComplex, order : &TotalOrder ) -> JoinSplitTree {
		let mut tree = JoinSplitTree::new( order.size() );
		let mut forest = DisjointSetForest::new( order );

		for i in 0..order.size() {
			let vi = order.position_to_element( i );

			for vj in plex.neighbors( vi ) {
				if order.element_to_position( vj ) < order.element_to_position( vi )
						&& forest.find( vi ) != forest.find( vj ) {
					let vk = forest.find_max( vj );
					if LOG_VERBOSE {
						println!( "join: {vi} -> {vk} (via neighbor {vj})" );
					}
					tree.add_arc( vi, vk );
					forest.union( vi, vj );
				}
			}
		}

		tree
	}

	/// Computes the split tree: the symmetric descending sweep over superlevel components.
	pub fn compute_split_tree( plex : &ScalarComplex, order : &TotalOrder ) -> JoinSplitTree {
		let mut tree = JoinSplitTree::new( order.size() );
		let mut forest = DisjointSetForest::new( order );

		for i in (0..order.size()).rev() {
			let vi = order.position_to_element( i );

			for vj in plex.neighbors( vi ) {
				if order.element_to_position( vj ) > order.element_to_position( vi )
						&& forest.find( vi ) != forest.find( vj ) {
					let vk = forest.find_min( vj );
					if LOG_VERBOSE {
						println!( "split: {vi} -> {vk} (via neighbor {vj})" );
					}
					tree.add_arc( vi, vk );
					forest.union( vi, vj );
				}
			}
		}

		tree
	}

	/// Merges the join and split trees into the (undirected) merge tree.
	///
	/// Both input trees are consumed in the process. A vertex is ready to transfer when its
	/// combined out-degree is one; the queue never holds a vertex twice because out-degrees
	/// only decrease.
	pub fn compute_merge_tree(
		plex : &ScalarComplex,
		join_tree : &mut JoinSplitTree,
		split_tree : &mut JoinSplitTree,
		merge_tree : &mut MemberGraph )
	{
		let n = plex.number_of_vertices();

		let mut merge_tree_nodes : Vec<NodeIdx> = Vec::with_capacity( n );
		let mut merge_queue : VecDeque<usize> = VecDeque::new();

		for vi in 0..n {
			merge_tree_nodes.push( merge_tree.add_node( vi, plex.value( vi ) ) );

			if join_tree.out_degree( vi ) + split_tree.out_degree( vi ) == 1 {
				merge_queue.push_back( vi );
			}
		}

		while merge_queue.len() > 1 {
			let vi = merge_queue.pop_front().unwrap();

			let vk;
			if join_tree.out_degree( vi ) == 0 {
				// join-tree leaf: transfer the arc from its join parent
				vk = join_tree.in_neighbor( vi ).unwrap();
				merge_tree.add_edge( merge_tree_nodes[vi], merge_tree_nodes[vk] );

				join_tree.remove_node( vi );
				split_tree.reduce_node( vi );
			}
			else {
				// split-tree leaf: symmetric
				vk = split_tree.in_neighbor( vi ).unwrap();
				merge_tree.add_edge( merge_tree_nodes[vi], merge_tree_nodes[vk] );

				split_tree.remove_node( vi );
				join_tree.reduce_node( vi );
			}

			if LOG_VERBOSE {
				println!( "merge: transferred {vi}, edge ({vi}, {vk})" );
			}

			if join_tree.out_degree( vk ) + split_tree.out_degree( vk ) == 1 {
				merge_queue.push_back( vk );
			}
		}
	}

	/// Whether `node` is regular: degree 2 with its neighbors straddling it in the order.
	pub fn is_regular_node(
		tree : &MemberGraph,
		node : NodeIdx,
		order : &TotalOrder )
		-> bool
	{
		if tree.degree( node ) != 2 {
			return false;
		}

		let incident = tree.incident_edges( node );
		let first = tree.opposite( node, incident[0] );
		let second = tree.opposite( node, incident[1] );

		let pi = order.element_to_position( tree.id( first ) );
		let pj = order.element_to_position( tree.id( node ) );
		let pk = order.element_to_position( tree.id( second ) );

		( pi < pj && pj < pk ) || ( pi > pj && pj > pk )
	}

	/// Removes every regular node, absorbing it (and its edges' members) into a bridging edge.
	///
	/// Removing one regular node never makes a neighbor irregular, and it leaves other regular
	/// nodes regular, so a single pass over the initial set suffices and the removal order only
	/// affects handle numbering.
	pub fn remove_regular_nodes( tree : &mut MemberGraph, order : &TotalOrder ) {
		let mut regular : VecDeque<NodeIdx> = VecDeque::new();
		for node in tree.nodes() {
			if Self::is_regular_node( tree, node, order ) {
				regular.push_back( node );
			}
		}

		while let Some( v ) = regular.pop_front() {
			let incident = tree.incident_edges( v );
			let edge_uv = incident[0];
			let edge_vw = incident[1];

			let u = tree.opposite( v, edge_uv );
			let w = tree.opposite( v, edge_vw );

			let members_uv : Members = tree.edge_members( edge_uv ).clone();
			let members_vw : Members = tree.edge_members( edge_vw ).clone();

			let edge_uw = tree.add_edge( u, w );
			tree.insert_edge_member( edge_uw, Member::new( tree.id( v ), tree.value( v ) ) );
			tree.insert_edge_members( edge_uw, members_uv );
			tree.insert_edge_members( edge_uw, members_vw );

			if LOG_VERBOSE {
				println!( "regular: absorbed {} into ({}, {})", tree.id( v ), tree.id( u ), tree.id( w ) );
			}

			tree.remove_node( v );
		}
	}
}

impl Default for CarrsAlgorithm {
	fn default() -> Self {
		Self::new()
	}
}
