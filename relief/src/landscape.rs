//! Rooted, weighted orientations of contour trees.
//!
//! A landscape tree fixes a root and turns the undirected contour tree into an arborescence by
//! breadth-first search. Nodes and arcs keep two-way mappings to the tree they came from, and
//! carry weights derived from member counts (or an external weight map) that later drive the
//! area-proportional embedding.

use std::collections::BTreeMap;

use crate::{bfs_edges, ArcIdx, EdgeIdx, NodeIdx, ScalarMemberTree};
use crate::contour::Members;
use crate::graph::DirectedGraph;
use crate::maps::{ArcIndexed, NodeIndexed, StaticArcMap, StaticEdgeMap, StaticNodeMap};


/// External weights per vertex id. Ids missing from the map weigh 1.
pub type WeightMap = BTreeMap<usize, f64>;


/// A rooted orientation of a contour or folded contour tree.
///
/// There is a 1-1 relationship between backing tree nodes and landscape nodes, and between
/// backing tree edges and landscape arcs. Arcs point from parent to child.
pub struct LandscapeTree<'a, TTree : ScalarMemberTree> {
	graph : DirectedGraph,
	backing : &'a TTree,
	root : NodeIdx,
	tree_to_landscape_node : StaticNodeMap<Option<NodeIdx>>,
	tree_to_landscape_arc : StaticEdgeMap<Option<ArcIdx>>,
	// landscape handles are allocated sequentially and never removed, so plain vectors
	// indexed by slot serve as the reverse maps
	landscape_to_tree_node : Vec<NodeIdx>,
	landscape_to_tree_edge : Vec<EdgeIdx>
}

impl<'a, TTree : ScalarMemberTree> LandscapeTree<'a, TTree> {
	/// Roots `backing` at `root` (a backing-tree node) by breadth-first search.
	pub fn new( backing : &'a TTree, root : NodeIdx ) -> Self {
		let mut lscape = LandscapeTree{
			graph : DirectedGraph::new(),
			backing,
			root : NodeIdx::new( 0 ),
			tree_to_landscape_node :
				StaticNodeMap::with_capacity( backing.max_node_identifier() ),
			tree_to_landscape_arc :
				StaticEdgeMap::with_capacity( backing.max_edge_identifier() ),
			landscape_to_tree_node : Vec::new(),
			landscape_to_tree_edge : Vec::new()
		};

		lscape.root = lscape.add_node( root );

		for (parent, child, edge) in bfs_edges( backing, root ) {
			let child_node = lscape.add_node( child );
			let parent_node = lscape.tree_to_landscape_node[parent].unwrap();
			lscape.add_arc( parent_node, child_node, edge );
		}

		lscape
	}

	fn add_node( &mut self, tree_node : NodeIdx ) -> NodeIdx {
		let node = self.graph.add_node();
		self.tree_to_landscape_node[tree_node] = Some( node );
		self.landscape_to_tree_node.push( tree_node );
		node
	}

	fn add_arc( &mut self, parent : NodeIdx, child : NodeIdx, tree_edge : EdgeIdx ) -> ArcIdx {
		let arc = self.graph.add_arc( parent, child );
		self.tree_to_landscape_arc[tree_edge] = Some( arc );
		self.landscape_to_tree_edge.push( tree_edge );
		arc
	}

	/// The root node.
	pub fn root( &self ) -> NodeIdx {
		self.root
	}

	/// The backing tree.
	pub fn backing( &self ) -> &'a TTree {
		self.backing
	}

	/// The backing tree node behind a landscape node.
	pub fn tree_node( &self, node : NodeIdx ) -> NodeIdx {
		self.landscape_to_tree_node[node.index()]
	}

	/// The backing tree edge behind a landscape arc.
	pub fn tree_edge( &self, arc : ArcIdx ) -> EdgeIdx {
		self.landscape_to_tree_edge[arc.index()]
	}

	/// The landscape node of a backing tree node.
	pub fn landscape_node( &self, tree_node : NodeIdx ) -> NodeIdx {
		self.tree_to_landscape_node[tree_node].unwrap()
	}

	/// The landscape arc of a backing tree edge.
	pub fn landscape_arc( &self, tree_edge : EdgeIdx ) -> ArcIdx {
		self.tree_to_landscape_arc[tree_edge].unwrap()
	}

	/// The scalar value of a landscape node.
	pub fn value( &self, node : NodeIdx ) -> f64 {
		self.backing.value( self.tree_node( node ) )
	}

	/// The external id of a landscape node.
	pub fn id( &self, node : NodeIdx ) -> usize {
		self.backing.id( self.tree_node( node ) )
	}

	/// The landscape node with the given external id, if any.
	pub fn node_by_id( &self, id : usize ) -> Option<NodeIdx> {
		self.backing.node_by_id( id ).map( |v| self.landscape_node( v ) )
	}

	/// The member set of a landscape node.
	pub fn node_members( &self, node : NodeIdx ) -> &Members {
		self.backing.node_members( self.tree_node( node ) )
	}

	/// The member set of a landscape arc.
	pub fn arc_members( &self, arc : ArcIdx ) -> &Members {
		self.backing.edge_members( self.tree_edge( arc ) )
	}

	/// All nodes, in BFS order (parents before children).
	pub fn nodes( &self ) -> Vec<NodeIdx> {
		self.graph.nodes().collect()
	}

	/// All arcs, in BFS order.
	pub fn arcs( &self ) -> Vec<ArcIdx> {
		self.graph.arcs().collect()
	}

	/// The number of nodes.
	pub fn number_of_nodes( &self ) -> usize {
		self.graph.number_of_nodes()
	}

	/// The number of arcs.
	pub fn number_of_arcs( &self ) -> usize {
		self.graph.number_of_arcs()
	}

	/// The number of children of `node`.
	pub fn out_degree( &self, node : NodeIdx ) -> usize {
		self.graph.out_degree( node )
	}

	/// Whether `node` has no children.
	pub fn is_leaf( &self, node : NodeIdx ) -> bool {
		self.graph.out_degree( node ) == 0
	}

	/// The arcs leaving `node`, in child order.
	pub fn out_arcs( &self, node : NodeIdx ) -> Vec<ArcIdx> {
		self.graph.out_arcs( node ).collect()
	}

	/// The parent end of an arc.
	pub fn source( &self, arc : ArcIdx ) -> NodeIdx {
		self.graph.source( arc )
	}

	/// The child end of an arc.
	pub fn target( &self, arc : ArcIdx ) -> NodeIdx {
		self.graph.target( arc )
	}

	/// An exclusive upper bound on node identifiers, for sizing attribute maps.
	pub fn max_node_identifier( &self ) -> usize {
		self.graph.max_node_identifier()
	}

	/// An exclusive upper bound on arc identifiers, for sizing attribute maps.
	pub fn max_arc_identifier( &self ) -> usize {
		self.graph.max_arc_identifier()
	}
}

impl<'a, TTree : ScalarMemberTree> NodeIndexed for LandscapeTree<'a, TTree> {
	fn max_node_identifier( &self ) -> usize {
		LandscapeTree::max_node_identifier( self )
	}
}

impl<'a, TTree : ScalarMemberTree> ArcIndexed for LandscapeTree<'a, TTree> {
	fn max_arc_identifier( &self ) -> usize {
		LandscapeTree::max_arc_identifier( self )
	}
}


/// Node, arc and subtree weights of a landscape tree.
///
/// The weight of a node or arc is the summed weight of its members, where a member weighs 1
/// unless a [WeightMap] says otherwise. The total weight of a node adds, over each child arc,
/// the arc's weight and the child's total.
pub struct LandscapeWeights {
	node_weight : StaticNodeMap<f64>,
	total_weight : StaticNodeMap<f64>,
	arc_weight : StaticArcMap<f64>
}

impl LandscapeWeights {
	/// Computes all weights for `tree`, optionally scaled by a weight map.
	pub fn new<TTree : ScalarMemberTree>(
		tree : &LandscapeTree<'_, TTree>,
		weight_map : Option<&WeightMap> )
		-> Self
	{
		let mut weights = LandscapeWeights{
			node_weight : StaticNodeMap::for_nodes( tree ),
			total_weight : StaticNodeMap::for_nodes( tree ),
			arc_weight : StaticArcMap::for_arcs( tree )
		};

		let sum_members = |members : &Members| -> f64 {
			match weight_map {
				Some( map ) => members.iter()
					.map( |m| map.get( &m.id() ).copied().unwrap_or( 1. ) )
					.sum(),
				None => members.len() as f64
			}
		};

		for node in tree.nodes() {
			weights.node_weight[node] = sum_members( tree.node_members( node ) );
		}
		for arc in tree.arcs() {
			weights.arc_weight[arc] = sum_members( tree.arc_members( arc ) );
		}

		// nodes are stored in BFS order, so the reverse is a valid post-order
		for node in tree.nodes().into_iter().rev() {
			let mut total = weights.node_weight[node];
			for arc in tree.out_arcs( node ) {
				total += weights.arc_weight[arc];
				total += weights.total_weight[tree.target( arc )];
			}
			weights.total_weight[node] = total;
		}

		weights
	}

	/// The weight of the node's own members.
	pub fn node_weight( &self, node : NodeIdx ) -> f64 {
		self.node_weight[node]
	}

	/// The weight of the arc's members.
	pub fn arc_weight( &self, arc : ArcIdx ) -> f64 {
		self.arc_weight[arc]
	}

	/// The weight of the subtree rooted at `node`, including its incoming arc's child side.
	pub fn total_weight( &self, node : NodeIdx ) -> f64 {
		self.total_weight[node]
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use crate::carr::CarrsAlgorithm;
	use crate::contour::ContourTree;
	use crate::test_data::wenger_complex;

	fn wenger_tree() -> ContourTree {
		CarrsAlgorithm::new().compute( &wenger_complex() ).unwrap()
	}

	#[test]
	fn test_bfs_orientation() {
		let tree = wenger_tree();
		let root = tree.node_by_id( 4 ).unwrap();
		let lscape = LandscapeTree::new( &tree, root );

		assert_eq!( lscape.number_of_nodes(), 9 );
		assert_eq!( lscape.number_of_arcs(), 8 );
		assert_eq!( lscape.id( lscape.root() ), 4 );
		assert_eq!( lscape.out_degree( lscape.root() ), 1 );

		// arcs point away from the root
		for arc in lscape.arcs() {
			assert_ne!( lscape.target( arc ), lscape.root() );
		}

		// the mappings invert each other
		for node in lscape.nodes() {
			assert_eq!( lscape.landscape_node( lscape.tree_node( node ) ), node );
		}
		for arc in lscape.arcs() {
			assert_eq!( lscape.landscape_arc( lscape.tree_edge( arc ) ), arc );
		}
	}

	#[test]
	fn test_default_weights() {
		let tree = wenger_tree();
		let root = tree.node_by_id( 4 ).unwrap();
		let lscape = LandscapeTree::new( &tree, root );
		let weights = LandscapeWeights::new( &lscape, None );

		// 9 nodes plus 3 edge members
		assert_eq!( weights.total_weight( lscape.root() ), 12. );

		// every node is its own single member
		for node in lscape.nodes() {
			assert_eq!( weights.node_weight( node ), 1. );
		}

		// the arc from the root carries absorbed vertex 0
		let root_arc = lscape.out_arcs( lscape.root() )[0];
		assert_eq!( weights.arc_weight( root_arc ), 1. );

		let node5 = lscape.node_by_id( 5 ).unwrap();
		assert_eq!( weights.total_weight( node5 ), 10. );
		let node7 = lscape.node_by_id( 7 ).unwrap();
		assert_eq!( weights.total_weight( node7 ), 7. );
	}

	#[test]
	fn test_weight_map_overrides() {
		let tree = wenger_tree();
		let root = tree.node_by_id( 4 ).unwrap();
		let lscape = LandscapeTree::new( &tree, root );

		// vertex 0 is a member of the root arc; everything else defaults to 1
		let mut map = WeightMap::new();
		map.insert( 0, 3.5 );
		let weights = LandscapeWeights::new( &lscape, Some( &map ) );

		let root_arc = lscape.out_arcs( lscape.root() )[0];
		assert_eq!( weights.arc_weight( root_arc ), 3.5 );
		assert_eq!( weights.total_weight( lscape.root() ), 14.5 );
	}
}
