//! Persistence-driven simplification of folded contour trees.
//!
//! The simplifier repeatedly collapses the least persistent leaf edge, reducing parents that
//! become regular, until every remaining candidate exceeds the threshold. All pruning goes
//! through the fold layer, so it can be undone.
//!
//! The queue is a plain binary heap without decrease-key: an entry whose leaf has since been
//! collapsed is simply skipped when popped. This is the termination rule, not an error.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::{bfs_edges_avoiding, EdgeIdx, NodeIdx, ScalarMemberTree, TreeError};
use crate::fold::FoldedContourTree;
use crate::maps::StaticNodeMap;

const LOG_VERBOSE : bool = cfg!( feature = "verbose_simplify" );


/// The persistence of an edge: the absolute value difference of its endpoints.
pub fn persistence<TTree : ScalarMemberTree>( tree : &TTree, e : EdgeIdx ) -> f64 {
	( tree.value( tree.edge_u( e ) ) - tree.value( tree.edge_v( e ) ) ).abs()
}

/// The largest edge persistence in the tree, or 0 if the tree has no edges.
pub fn max_persistence<TTree : ScalarMemberTree>( tree : &TTree ) -> f64 {
	tree.edges().into_iter()
		.map( |e| persistence( tree, e ) )
		.fold( 0., f64::max )
}

/// Compares nodes by `(value, id)` lexicographically.
pub fn node_less<TTree : ScalarMemberTree>( tree : &TTree, u : NodeIdx, v : NodeIdx ) -> bool {
	let u_value = tree.value( u );
	let v_value = tree.value( v );

	if u_value < v_value {
		true
	}
	else if u_value > v_value {
		false
	}
	else {
		tree.id( u ) < tree.id( v )
	}
}

/// The number of neighbors of `node` that come after it under [node_less].
pub fn up_degree<TTree : ScalarMemberTree>( tree : &TTree, node : NodeIdx ) -> usize {
	tree.incident_edges( node ).into_iter()
		.filter( |&e| node_less( tree, node, tree.opposite( node, e ) ) )
		.count()
}

/// The number of neighbors of `node` that come before it under [node_less].
pub fn down_degree<TTree : ScalarMemberTree>( tree : &TTree, node : NodeIdx ) -> usize {
	tree.incident_edges( node ).into_iter()
		.filter( |&e| node_less( tree, tree.opposite( node, e ), node ) )
		.count()
}

/// Whether `node` is regular: exactly one neighbor above and one below.
pub fn is_regular<TTree : ScalarMemberTree>( tree : &TTree, node : NodeIdx ) -> bool {
	up_degree( tree, node ) == 1 && down_degree( tree, node ) == 1
}

/// The degree-1 endpoint of a leaf edge.
fn leaf_of<TTree : ScalarMemberTree>( tree : &TTree, e : EdgeIdx ) -> NodeIdx {
	if tree.degree( tree.edge_u( e ) ) == 1 {
		tree.edge_u( e )
	}
	else {
		tree.edge_v( e )
	}
}

/// Whether collapsing this leaf edge would destroy the only monotone branch at its parent.
///
/// A leaf below its parent whose parent has no other down-branch (or symmetrically above with
/// no other up-branch) carries the unique descending (ascending) path through the parent;
/// pruning it would change the extrema structure, so it is preserved.
pub fn preserve_for_reduction<TTree : ScalarMemberTree>( tree : &TTree, e : EdgeIdx ) -> bool {
	let child = leaf_of( tree, e );
	let parent = tree.opposite( child, e );

	if node_less( tree, child, parent ) && down_degree( tree, parent ) == 1 {
		true
	}
	else if node_less( tree, parent, child ) && up_degree( tree, parent ) == 1 {
		true
	}
	else {
		false
	}
}


/// A queue entry: a leaf with the persistence of its edge at enqueue time.
///
/// Ordered so that the heap yields the least persistent leaf first, ties broken toward the
/// smaller node index for determinism.
struct LeafPriority {
	priority : f64,
	persistence : f64,
	leaf : NodeIdx
}

impl LeafPriority {
	fn new( leaf : NodeIdx, persistence : f64 ) -> Self {
		LeafPriority{ priority : 1. / ( persistence + 1. ), persistence, leaf }
	}
}

impl PartialEq for LeafPriority {
	fn eq( &self, rhs : &Self ) -> bool {
		self.cmp( rhs ) == Ordering::Equal
	}
}

impl Eq for LeafPriority {}

impl PartialOrd for LeafPriority {
	fn partial_cmp( &self, rhs : &Self ) -> Option<Ordering> {
		Some( self.cmp( rhs ) )
	}
}

impl Ord for LeafPriority {
	fn cmp( &self, rhs : &Self ) -> Ordering {
		self.priority.total_cmp( &rhs.priority )
			.then_with( || rhs.leaf.index().cmp( &self.leaf.index() ) )
	}
}


/// Prunes low-persistence features from a folded contour tree.
pub struct PersistenceSimplifier {
	threshold : f64
}

impl PersistenceSimplifier {
	/// Creates a simplifier with the given persistence threshold.
	pub fn new( threshold : f64 ) -> Result<Self, TreeError> {
		if threshold < 0. {
			return Err( TreeError::NegativeThreshold( threshold ) );
		}
		Ok( PersistenceSimplifier{ threshold } )
	}

	/// The current threshold.
	pub fn threshold( &self ) -> f64 {
		self.threshold
	}

	/// Replaces the threshold.
	pub fn set_threshold( &mut self, threshold : f64 ) -> Result<(), TreeError> {
		if threshold < 0. {
			return Err( TreeError::NegativeThreshold( threshold ) );
		}
		self.threshold = threshold;
		Ok( () )
	}

	/// Simplifies the whole tree.
	pub fn simplify( &self, tree : &mut FoldedContourTree<'_> ) -> Result<(), TreeError> {
		self.simplify_core( tree, |_| false )
	}

	/// Simplifies the subtree hanging off `parent` on the `pivot` side.
	///
	/// Every node outside that subtree is protected, as is `parent` itself; `pivot` and
	/// everything reached from it without crossing back through `parent` may be pruned.
	pub fn simplify_subtree(
		&self,
		tree : &mut FoldedContourTree<'_>,
		parent : NodeIdx,
		pivot : NodeIdx )
		-> Result<(), TreeError>
	{
		let mut protected : StaticNodeMap<bool> =
			StaticNodeMap::with_capacity( tree.max_node_identifier() );

		for v in tree.nodes() {
			protected[v] = true;
		}
		for (_, child, _) in bfs_edges_avoiding( &*tree, pivot, Some( parent ) ) {
			protected[child] = false;
		}
		protected[parent] = true;
		protected[pivot] = false;

		self.simplify_core( tree, |v| protected[v] )
	}

	fn simplify_core(
		&self,
		tree : &mut FoldedContourTree<'_>,
		protected : impl Fn( NodeIdx ) -> bool )
		-> Result<(), TreeError>
	{
		// start from a fully reduced tree
		let reducible : Vec<NodeIdx> = tree.nodes().into_iter()
			.filter( |&v| is_regular( &*tree, v ) )
			.collect();
		for v in reducible {
			tree.reduce( v )?;
		}

		let mut queue : BinaryHeap<LeafPriority> = BinaryHeap::new();

		for e in tree.edges() {
			let u = tree.edge_u( e );
			let v = tree.edge_v( e );

			if protected( u ) || protected( v ) {
				continue;
			}
			if tree.degree( u ) == 1 || tree.degree( v ) == 1 {
				queue.push( LeafPriority::new( leaf_of( &*tree, e ), persistence( &*tree, e ) ) );
			}
		}

		while let Some( entry ) = queue.pop() {
			let leaf = entry.leaf;

			// stale entries are skipped; node slots are never reused while simplifying, since
			// collapse and reduce only ever remove nodes
			if !tree.is_node_valid( leaf ) {
				continue;
			}

			let incident = tree.incident_edges( leaf );
			if incident.len() != 1 {
				continue;
			}
			let edge = incident[0];
			let parent = tree.opposite( leaf, edge );

			if protected( parent ) || protected( leaf ) {
				continue;
			}
			if preserve_for_reduction( &*tree, edge ) {
				continue;
			}
			if entry.persistence > self.threshold {
				// the queue is priority-ordered, so everything left exceeds the threshold too
				break;
			}

			if LOG_VERBOSE {
				println!( "simplify: collapsing leaf {} (persistence {})",
					tree.id( leaf ), entry.persistence );
			}

			tree.collapse( edge )?;

			if is_regular( &*tree, parent ) {
				let bridge = tree.reduce( parent )?;

				// the reduction may have exposed new candidates at either end of the bridge
				for endpoint in [ tree.edge_u( bridge ), tree.edge_v( bridge ) ] {
					if tree.degree( endpoint ) == 1 {
						queue.push( LeafPriority::new(
							endpoint, persistence( &*tree, bridge ) ) );
					}
					else {
						for e in tree.incident_edges( endpoint ) {
							let neighbor = tree.opposite( endpoint, e );
							if tree.degree( neighbor ) == 1 {
								queue.push( LeafPriority::new(
									neighbor, persistence( &*tree, e ) ) );
							}
						}
					}
				}
			}
			else if tree.degree( parent ) == 1 {
				let parent_edge = tree.incident_edges( parent )[0];
				queue.push( LeafPriority::new( parent, persistence( &*tree, parent_edge ) ) );
			}
		}

		Ok( () )
	}
}
