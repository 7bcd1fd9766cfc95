//! Petgraph-based reference checks.
//!
//! These conversions are slow and only intended to be used for comparison or verification.

use std::collections::BTreeMap;

use petgraph::algo;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::ScalarMemberTree;


/// Converts the live structure of a tree into a petgraph graph, with vertex ids as node
/// weights.
pub fn to_petgraph<TTree : ScalarMemberTree>( tree : &TTree ) -> UnGraph<usize, ()> {
	let mut g = UnGraph::new_undirected();

	let mut handles : BTreeMap<crate::NodeIdx, NodeIndex> = BTreeMap::new();
	for v in tree.nodes() {
		handles.insert( v, g.add_node( tree.id( v ) ) );
	}
	for e in tree.edges() {
		g.add_edge( handles[&tree.edge_u( e )], handles[&tree.edge_v( e )], () );
	}

	g
}


/// Whether the live structure is a tree: connected, with one edge less than nodes.
pub fn is_tree<TTree : ScalarMemberTree>( tree : &TTree ) -> bool {
	let g = to_petgraph( tree );
	if g.node_count() == 0 {
		return true;
	}
	algo::connected_components( &g ) == 1 && g.edge_count() == g.node_count() - 1
}
