//! Reversible folding of contour trees.
//!
//! A [FoldTree] is a live undirected tree plus a journal: every node and edge owns a *fold
//! record* in a grow-only arena, and the records survive removal of their live handles. A
//! collapse or reduction writes enough into the records to be undone later, so a simplified
//! tree can be selectively re-expanded.
//!
//! Fold ids are never reused. Live handles are a separate namespace: restoring a node or edge
//! allocates a fresh live slot and points the old record at it.

use crate::*;
use crate::contour::{ContourTree, Members};
use crate::graph::UndirectedGraph;
use crate::maps::{ObservingEdgeMap, ObservingNodeMap, StaticNodeMap};


struct NodeFoldRep {
	/// The most recent live handle of this node.
	node : NodeIdx,
	/// Edge folds collapsed into this node, oldest first.
	collapsed : Vec<usize>,
	/// The two edge folds this node connected before it was reduced.
	reduced : Option<(usize, usize)>
}

struct EdgeFoldRep {
	/// The most recent live handle of this edge.
	edge : EdgeIdx,
	u_fold : usize,
	v_fold : usize,
	/// The node fold whose reduction created this edge.
	reduced_fold : Option<usize>
}

/// An undirected tree that records collapses and reductions and supports their inverses.
pub struct FoldTree {
	graph : UndirectedGraph,
	node_folds : Vec<NodeFoldRep>,
	edge_folds : Vec<EdgeFoldRep>,
	node_to_fold : ObservingNodeMap<usize>,
	edge_to_fold : ObservingEdgeMap<usize>
}

impl FoldTree {
	/// Creates an empty tree.
	pub fn new() -> Self {
		let mut graph = UndirectedGraph::new();
		let node_to_fold = ObservingNodeMap::new( graph.attach_node_observer() );
		let edge_to_fold = ObservingEdgeMap::new( graph.attach_edge_observer() );
		FoldTree{
			graph,
			node_folds : Vec::new(),
			edge_folds : Vec::new(),
			node_to_fold,
			edge_to_fold
		}
	}

	/// Adds a node with a fresh fold record.
	pub fn add_node( &mut self ) -> NodeIdx {
		let node = self.graph.add_node();
		let fold_id = self.node_folds.len();
		self.node_folds.push( NodeFoldRep{ node, collapsed : Vec::new(), reduced : None } );
		self.node_to_fold[node] = fold_id;
		node
	}

	/// Adds an edge with a fresh fold record.
	pub fn add_edge( &mut self, u : NodeIdx, v : NodeIdx ) -> EdgeIdx {
		let edge = self.graph.add_edge( u, v );
		let fold_id = self.edge_folds.len();
		self.edge_folds.push( EdgeFoldRep{
			edge,
			u_fold : self.node_to_fold[u],
			v_fold : self.node_to_fold[v],
			reduced_fold : None
		} );
		self.edge_to_fold[edge] = fold_id;
		edge
	}

	fn restore_node( &mut self, fold_id : usize ) -> NodeIdx {
		let node = self.graph.add_node();
		self.node_folds[fold_id].node = node;
		self.node_to_fold[node] = fold_id;
		node
	}

	fn restore_edge( &mut self, fold_id : usize ) -> EdgeIdx {
		let u = self.node_folds[self.edge_folds[fold_id].u_fold].node;
		let v = self.node_folds[self.edge_folds[fold_id].v_fold].node;

		let edge = self.graph.add_edge( u, v );
		self.edge_folds[fold_id].edge = edge;
		self.edge_to_fold[edge] = fold_id;
		edge
	}

	/// The fold id of a live node.
	pub fn node_fold_id( &self, v : NodeIdx ) -> usize {
		self.node_to_fold[v]
	}

	/// The fold id of a live edge.
	pub fn edge_fold_id( &self, e : EdgeIdx ) -> usize {
		self.edge_to_fold[e]
	}

	/// The number of node folds ever created, i.e. the node count of the fully unfolded tree.
	pub fn number_of_node_folds( &self ) -> usize {
		self.node_folds.len()
	}

	/// The edge folds collapsed into `v`, oldest first.
	pub fn collapsed_edge_folds( &self, v : NodeIdx ) -> &[usize] {
		&self.node_folds[self.node_to_fold[v]].collapsed
	}

	/// Collapses the degree-1 endpoint of `edge` into the other endpoint.
	///
	/// The child node and the edge leave the live tree; the edge fold is appended to the
	/// parent's collapse list.
	pub fn collapse( &mut self, edge : EdgeIdx ) -> Result<(), TreeError> {
		let u = self.graph.u( edge );
		let v = self.graph.v( edge );

		let (parent, child) = if self.graph.degree( u ) == 1 { (v, u) } else { (u, v) };
		if self.graph.degree( child ) != 1 {
			return Err( TreeError::CollapseNonLeaf );
		}

		let edge_fold = self.edge_to_fold[edge];
		let parent_fold = self.node_to_fold[parent];
		self.node_folds[parent_fold].collapsed.push( edge_fold );

		self.graph.remove_node( child );
		Ok( () )
	}

	/// Reduces the degree-2 node `v`, bridging its neighbors with a new edge.
	///
	/// Returns the bridging edge. Its fold records which node it replaced, and `v`'s fold
	/// records the two edges it once connected.
	pub fn reduce( &mut self, v : NodeIdx ) -> Result<EdgeIdx, TreeError> {
		if self.graph.degree( v ) != 2 {
			return Err( TreeError::ReduceDegree( self.graph.degree( v ) ) );
		}

		let incident : Vec<EdgeIdx> = self.graph.incident_edges( v ).collect();
		let edge_uv = incident[0];
		let edge_vw = incident[1];
		let u = self.graph.opposite( v, edge_uv );
		let w = self.graph.opposite( v, edge_vw );

		let edge_uw = self.add_edge( u, w );

		let v_fold = self.node_to_fold[v];
		self.node_folds[v_fold].reduced =
			Some( ( self.edge_to_fold[edge_uv], self.edge_to_fold[edge_vw] ) );
		let uw_fold = self.edge_to_fold[edge_uw];
		self.edge_folds[uw_fold].reduced_fold = Some( v_fold );

		self.graph.remove_node( v );
		Ok( edge_uw )
	}

	/// Restores the collapsed edge at `index` in `u`'s collapse list (default: the last one).
	///
	/// The opposite endpoint comes back as a live node under its original fold id.
	pub fn uncollapse( &mut self, u : NodeIdx, index : Option<usize> )
			-> Result<EdgeIdx, TreeError>
	{
		let u_fold = self.node_to_fold[u];
		let len = self.node_folds[u_fold].collapsed.len();
		let index = index.unwrap_or( len.wrapping_sub( 1 ) );
		if index >= len {
			return Err( TreeError::UncollapseOutOfRange{ index, len } );
		}

		let uv_fold = self.node_folds[u_fold].collapsed.remove( index );

		let v_fold = {
			let rep = &self.edge_folds[uv_fold];
			if rep.u_fold == u_fold { rep.v_fold } else { rep.u_fold }
		};

		self.restore_node( v_fold );
		Ok( self.restore_edge( uv_fold ) )
	}

	/// Undoes the reduction that created `uw`: the reduced node and its two edges come back,
	/// and `uw` leaves the live tree.
	pub fn unreduce( &mut self, uw : EdgeIdx ) -> Result<NodeIdx, TreeError> {
		let uw_fold = self.edge_to_fold[uw];
		let v_fold = match self.edge_folds[uw_fold].reduced_fold {
			Some( fold_id ) => fold_id,
			None => return Err( TreeError::UnreduceWithoutFold )
		};

		let v = self.restore_node( v_fold );

		// the reduction freed uv before vw; restoring in reverse order hands every record its
		// original slot back, so outstanding handles stay meaningful
		let (uv_fold, vw_fold) = self.node_folds[v_fold].reduced.unwrap();
		self.restore_edge( vw_fold );
		self.restore_edge( uv_fold );

		self.graph.remove_edge( uw );

		Ok( v )
	}

	// read access to the live tree

	/// All live nodes, in insertion order.
	pub fn nodes( &self ) -> Vec<NodeIdx> {
		self.graph.nodes().collect()
	}

	/// All live edges, in insertion order.
	pub fn edges( &self ) -> Vec<EdgeIdx> {
		self.graph.edges().collect()
	}

	/// The number of live nodes.
	pub fn number_of_nodes( &self ) -> usize {
		self.graph.number_of_nodes()
	}

	/// The number of live edges.
	pub fn number_of_edges( &self ) -> usize {
		self.graph.number_of_edges()
	}

	/// Whether `v` is live.
	pub fn is_node_valid( &self, v : NodeIdx ) -> bool {
		self.graph.is_node_valid( v )
	}

	/// Whether `e` is live.
	pub fn is_edge_valid( &self, e : EdgeIdx ) -> bool {
		self.graph.is_edge_valid( e )
	}

	/// The number of edges incident to `v`.
	pub fn degree( &self, v : NodeIdx ) -> usize {
		self.graph.degree( v )
	}

	/// The edges incident to `v`, in insertion order.
	pub fn incident_edges( &self, v : NodeIdx ) -> Vec<EdgeIdx> {
		self.graph.incident_edges( v ).collect()
	}

	/// One endpoint of `e`.
	pub fn u( &self, e : EdgeIdx ) -> NodeIdx {
		self.graph.u( e )
	}

	/// The other endpoint of `e`.
	pub fn v( &self, e : EdgeIdx ) -> NodeIdx {
		self.graph.v( e )
	}

	/// The endpoint of `e` that is not `v`.
	pub fn opposite( &self, v : NodeIdx, e : EdgeIdx ) -> NodeIdx {
		self.graph.opposite( v, e )
	}

	/// An exclusive upper bound on live node identifiers.
	pub fn max_node_identifier( &self ) -> usize {
		self.graph.max_node_identifier()
	}

	/// An exclusive upper bound on live edge identifiers.
	pub fn max_edge_identifier( &self ) -> usize {
		self.graph.max_edge_identifier()
	}
}

impl Default for FoldTree {
	fn default() -> Self {
		Self::new()
	}
}


/// A folded view of a contour tree.
///
/// Starts out structurally identical to the backing tree and is then edited through
/// [collapse](Self::collapse()), [reduce](Self::reduce()) and their inverses. Scalar values,
/// ids and member sets are forwarded to the backing tree through the stable fold-id mapping;
/// edges created by reductions have no backing edge and therefore empty member sets.
pub struct FoldedContourTree<'a> {
	contour_tree : &'a ContourTree,
	fold_tree : FoldTree,
	ct_to_fold : StaticNodeMap<Option<NodeIdx>>,
	fold_id_to_ct_node : Vec<NodeIdx>,
	fold_id_to_ct_edge : Vec<Option<EdgeIdx>>,
	empty_members : Members
}

impl<'a> FoldedContourTree<'a> {
	/// Creates a folded view with the structure of `contour_tree`.
	pub fn new( contour_tree : &'a ContourTree ) -> Self {
		let mut fold_tree = FoldTree::new();
		let mut ct_to_fold : StaticNodeMap<Option<NodeIdx>> =
			StaticNodeMap::with_capacity( contour_tree.max_node_identifier() );
		let mut fold_id_to_ct_node = Vec::new();
		let mut fold_id_to_ct_edge = Vec::new();

		for ct_node in contour_tree.nodes() {
			let node = fold_tree.add_node();
			fold_id_to_ct_node.push( ct_node );
			ct_to_fold[ct_node] = Some( node );
		}

		for ct_edge in contour_tree.edges() {
			let u = ct_to_fold[contour_tree.edge_u( ct_edge )].unwrap();
			let v = ct_to_fold[contour_tree.edge_v( ct_edge )].unwrap();
			fold_tree.add_edge( u, v );
			fold_id_to_ct_edge.push( Some( ct_edge ) );
		}

		FoldedContourTree{
			contour_tree,
			fold_tree,
			ct_to_fold,
			fold_id_to_ct_node,
			fold_id_to_ct_edge,
			empty_members : Members::new()
		}
	}

	/// The backing contour tree.
	pub fn contour_tree( &self ) -> &'a ContourTree {
		self.contour_tree
	}

	/// The contour tree node behind a live folded node.
	pub fn contour_node( &self, v : NodeIdx ) -> NodeIdx {
		self.fold_id_to_ct_node[self.fold_tree.node_fold_id( v )]
	}

	/// The contour tree edge behind a live folded edge, if the edge has one.
	pub fn contour_edge( &self, e : EdgeIdx ) -> Option<EdgeIdx> {
		self.fold_id_to_ct_edge
			.get( self.fold_tree.edge_fold_id( e ) )
			.copied()
			.flatten()
	}

	/// The underlying fold tree.
	pub fn fold_tree( &self ) -> &FoldTree {
		&self.fold_tree
	}

	/// Collapses an edge. See [FoldTree::collapse()].
	pub fn collapse( &mut self, edge : EdgeIdx ) -> Result<(), TreeError> {
		self.fold_tree.collapse( edge )
	}

	/// Reduces a node. See [FoldTree::reduce()].
	pub fn reduce( &mut self, v : NodeIdx ) -> Result<EdgeIdx, TreeError> {
		let edge = self.fold_tree.reduce( v )?;
		if self.fold_tree.edge_fold_id( edge ) == self.fold_id_to_ct_edge.len() {
			// a reduction bridge has no counterpart in the backing tree
			self.fold_id_to_ct_edge.push( None );
		}
		Ok( edge )
	}

	/// Restores a collapsed edge of `u`. See [FoldTree::uncollapse()].
	pub fn uncollapse( &mut self, u : NodeIdx, index : Option<usize> )
			-> Result<EdgeIdx, TreeError>
	{
		let edge = self.fold_tree.uncollapse( u, index )?;

		let restored = self.fold_tree.opposite( u, edge );
		let ct_node = self.contour_node( restored );
		self.ct_to_fold[ct_node] = Some( restored );

		Ok( edge )
	}

	/// Undoes the reduction behind `uw`. See [FoldTree::unreduce()].
	pub fn unreduce( &mut self, uw : EdgeIdx ) -> Result<NodeIdx, TreeError> {
		let restored = self.fold_tree.unreduce( uw )?;

		let ct_node = self.contour_node( restored );
		self.ct_to_fold[ct_node] = Some( restored );

		Ok( restored )
	}
}

impl<'a> ScalarMemberTree for FoldedContourTree<'a> {
	fn nodes( &self ) -> Vec<NodeIdx> {
		self.fold_tree.nodes()
	}

	fn edges( &self ) -> Vec<EdgeIdx> {
		self.fold_tree.edges()
	}

	fn number_of_nodes( &self ) -> usize {
		self.fold_tree.number_of_nodes()
	}

	fn number_of_edges( &self ) -> usize {
		self.fold_tree.number_of_edges()
	}

	fn is_node_valid( &self, v : NodeIdx ) -> bool {
		self.fold_tree.is_node_valid( v )
	}

	fn degree( &self, v : NodeIdx ) -> usize {
		self.fold_tree.degree( v )
	}

	fn incident_edges( &self, v : NodeIdx ) -> Vec<EdgeIdx> {
		self.fold_tree.incident_edges( v )
	}

	fn edge_u( &self, e : EdgeIdx ) -> NodeIdx {
		self.fold_tree.u( e )
	}

	fn edge_v( &self, e : EdgeIdx ) -> NodeIdx {
		self.fold_tree.v( e )
	}

	fn opposite( &self, v : NodeIdx, e : EdgeIdx ) -> NodeIdx {
		self.fold_tree.opposite( v, e )
	}

	fn value( &self, v : NodeIdx ) -> f64 {
		self.contour_tree.value( self.contour_node( v ) )
	}

	fn id( &self, v : NodeIdx ) -> usize {
		self.contour_tree.id( self.contour_node( v ) )
	}

	fn node_by_id( &self, id : usize ) -> Option<NodeIdx> {
		let ct_node = self.contour_tree.node_by_id( id )?;
		let v = self.ct_to_fold[ct_node]?;

		// the recorded handle may be stale: its slot can have been freed by a collapse and
		// reused by the restoration of a different node
		if self.fold_tree.is_node_valid( v ) && self.contour_node( v ) == ct_node {
			Some( v )
		}
		else {
			None
		}
	}

	fn node_members( &self, v : NodeIdx ) -> &Members {
		self.contour_tree.node_members( self.contour_node( v ) )
	}

	fn edge_members( &self, e : EdgeIdx ) -> &Members {
		match self.contour_edge( e ) {
			Some( ct_edge ) => self.contour_tree.edge_members( ct_edge ),
			None => &self.empty_members
		}
	}

	fn nodes_plus_members( &self ) -> usize {
		let node_sum : usize =
			self.nodes().iter().map( |&v| self.node_members( v ).len() ).sum();
		let edge_sum : usize =
			self.edges().iter().map( |&e| self.edge_members( e ).len() ).sum();
		node_sum + edge_sum
	}

	fn max_node_identifier( &self ) -> usize {
		self.fold_tree.max_node_identifier()
	}

	fn max_edge_identifier( &self ) -> usize {
		self.fold_tree.max_edge_identifier()
	}
}
