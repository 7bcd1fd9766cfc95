//! Handle-indexed attribute maps.
//!
//! Two flavors, mirroring the two lifecycles of the graphs they annotate:
//!
//! * [ObservingMap] attaches to a store watermark (see [crate::graph]) and grows with the store,
//!   so it can annotate a graph that is still being mutated.
//! * [StaticMap] is sized once against a frozen graph.
//!
//! Values are default-initialized and looked up in O(1) by the handle's compact identifier.
//! Reading a slot that was never written yields the default; writing past the published
//! watermark is a programming error and panics.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::{ArcIdx, EdgeIdx, IndexHandle, NodeIdx};
use crate::graph::Watermark;


/// A graph whose live node identifiers are bounded, so node maps can be sized against it.
pub trait NodeIndexed {
	/// An exclusive upper bound on live node identifiers.
	fn max_node_identifier( &self ) -> usize;
}

/// A graph whose live edge identifiers are bounded, so edge maps can be sized against it.
pub trait EdgeIndexed {
	/// An exclusive upper bound on live edge identifiers.
	fn max_edge_identifier( &self ) -> usize;
}

/// A graph whose live arc identifiers are bounded, so arc maps can be sized against it.
pub trait ArcIndexed {
	/// An exclusive upper bound on live arc identifiers.
	fn max_arc_identifier( &self ) -> usize;
}

impl NodeIndexed for crate::graph::UndirectedGraph {
	fn max_node_identifier( &self ) -> usize {
		self.max_node_identifier()
	}
}

impl EdgeIndexed for crate::graph::UndirectedGraph {
	fn max_edge_identifier( &self ) -> usize {
		self.max_edge_identifier()
	}
}

impl NodeIndexed for crate::graph::DirectedGraph {
	fn max_node_identifier( &self ) -> usize {
		self.max_node_identifier()
	}
}

impl ArcIndexed for crate::graph::DirectedGraph {
	fn max_arc_identifier( &self ) -> usize {
		self.max_arc_identifier()
	}
}

/// A map that follows its graph: the backing array grows to the watermark on demand.
#[derive(Debug)]
pub struct ObservingMap<TKey : IndexHandle, TValue : Clone + Default> {
	mark : Watermark,
	values : Vec<TValue>,
	default : TValue,
	_key : PhantomData<TKey>
}

/// An observing map keyed by nodes.
pub type ObservingNodeMap<TValue> = ObservingMap<NodeIdx, TValue>;

/// An observing map keyed by edges.
pub type ObservingEdgeMap<TValue> = ObservingMap<EdgeIdx, TValue>;

/// An observing map keyed by arcs.
pub type ObservingArcMap<TValue> = ObservingMap<ArcIdx, TValue>;

impl<TKey : IndexHandle, TValue : Clone + Default> ObservingMap<TKey, TValue> {
	/// Creates a map attached to the given watermark.
	///
	/// Obtain the watermark from the store being annotated, e.g. via
	/// [UndirectedGraph::attach_node_observer](crate::graph::UndirectedGraph::attach_node_observer()).
	pub fn new( mark : Watermark ) -> Self {
		let size = mark.get();
		ObservingMap{
			mark,
			values : vec![ TValue::default(); size ],
			default : TValue::default(),
			_key : PhantomData
		}
	}

	fn grow_to_mark( &mut self ) {
		let mark = self.mark.get();
		if mark > self.values.len() {
			self.values.resize( mark, self.default.clone() );
		}
	}

	/// The value stored for `key`, or the default if the slot was never written.
	pub fn get( &self, key : TKey ) -> &TValue {
		self.values.get( key.index() ).unwrap_or( &self.default )
	}

	/// Mutable access to the value stored for `key`.
	///
	/// Panics if `key` lies beyond the store's published watermark.
	pub fn get_mut( &mut self, key : TKey ) -> &mut TValue {
		self.grow_to_mark();
		if key.index() >= self.values.len() {
			panic!( "invalid handle {}", key.index() );
		}
		&mut self.values[key.index()]
	}
}

impl<TKey : IndexHandle, TValue : Clone + Default> Index<TKey> for ObservingMap<TKey, TValue> {
	type Output = TValue;

	fn index( &self, key : TKey ) -> &TValue {
		self.get( key )
	}
}

impl<TKey : IndexHandle, TValue : Clone + Default> IndexMut<TKey> for ObservingMap<TKey, TValue> {
	fn index_mut( &mut self, key : TKey ) -> &mut TValue {
		self.get_mut( key )
	}
}


/// A map sized once against a frozen graph.
pub struct StaticMap<TKey : IndexHandle, TValue> {
	values : Vec<TValue>,
	_key : PhantomData<TKey>
}

/// A static map keyed by nodes.
pub type StaticNodeMap<TValue> = StaticMap<NodeIdx, TValue>;

/// A static map keyed by edges.
pub type StaticEdgeMap<TValue> = StaticMap<EdgeIdx, TValue>;

/// A static map keyed by arcs.
pub type StaticArcMap<TValue> = StaticMap<ArcIdx, TValue>;

impl<TKey : IndexHandle, TValue : Clone + Default> StaticMap<TKey, TValue> {
	/// Creates a default-initialized map with the given capacity.
	pub fn with_capacity( capacity : usize ) -> Self {
		StaticMap{ values : vec![ TValue::default(); capacity ], _key : PhantomData }
	}
}

impl<TValue : Clone + Default> StaticMap<NodeIdx, TValue> {
	/// Creates a map covering every live node of `graph`.
	pub fn for_nodes( graph : &impl NodeIndexed ) -> Self {
		Self::with_capacity( graph.max_node_identifier() )
	}
}

impl<TValue : Clone + Default> StaticMap<EdgeIdx, TValue> {
	/// Creates a map covering every live edge of `graph`.
	pub fn for_edges( graph : &impl EdgeIndexed ) -> Self {
		Self::with_capacity( graph.max_edge_identifier() )
	}
}

impl<TValue : Clone + Default> StaticMap<ArcIdx, TValue> {
	/// Creates a map covering every live arc of `graph`.
	pub fn for_arcs( graph : &impl ArcIndexed ) -> Self {
		Self::with_capacity( graph.max_arc_identifier() )
	}
}

impl<TKey : IndexHandle, TValue> Index<TKey> for StaticMap<TKey, TValue> {
	type Output = TValue;

	fn index( &self, key : TKey ) -> &TValue {
		&self.values[key.index()]
	}
}

impl<TKey : IndexHandle, TValue> IndexMut<TKey> for StaticMap<TKey, TValue> {
	fn index_mut( &mut self, key : TKey ) -> &mut TValue {
		&mut self.values[key.index()]
	}
}
