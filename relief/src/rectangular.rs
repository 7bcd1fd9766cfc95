//! Rectangular landscape embeddings.
//!
//! Every subtree of a landscape tree becomes an axis-aligned rectangle at the height of its
//! node, nested inside its parent's rectangle with area proportional to subtree weight. The
//! nesting rings and leaf basins are triangulated, and each triangle remembers the landscape
//! arc it renders, which is what makes picking in a viewer possible.
//!
//! Split orientation alternates between levels. Boundary points of a split are indexed
//! counter-clockwise; the corner index arithmetic below names, for each child rectangle, its
//! four corners within the parent boundary.

use kurbo::{Point, Rect, Size};

use crate::{ArcIdx, NodeIdx, ScalarMemberTree, TreeError};
use crate::landscape::{LandscapeTree, LandscapeWeights, WeightMap};
use crate::maps::StaticNodeMap;


fn south_west( r : &Rect ) -> Point {
	Point::new( r.x0, r.y0 )
}

fn south_east( r : &Rect ) -> Point {
	Point::new( r.x1, r.y0 )
}

fn north_east( r : &Rect ) -> Point {
	Point::new( r.x1, r.y1 )
}

fn north_west( r : &Rect ) -> Point {
	Point::new( r.x0, r.y1 )
}

/// Shrinks `r` around its center so that the area ratio to the original is `factor`.
fn shrink( r : &Rect, factor : f64 ) -> Rect {
	debug_assert!( factor > 0. && factor <= 1., "shrink factor must be in (0, 1]" );
	let lambda = factor.sqrt();
	Rect::from_center_size(
		r.center(),
		Size::new( r.width() * lambda, r.height() * lambda ) )
}


/// An ordered partition of a rectangle into weighted child rectangles.
///
/// A horizontal split stacks its children bottom-to-top; a vertical split packs them left to
/// right. The composite boundary has `2n + 2` points, indexed counter-clockwise from the
/// south-west corner.
pub struct RectangleSplit {
	rects : Vec<Rect>,
	horizontal : bool
}

impl RectangleSplit {
	/// The number of child rectangles.
	pub fn number_of_rectangles( &self ) -> usize {
		self.rects.len()
	}

	/// The `i`-th child rectangle.
	pub fn rectangle( &self, i : usize ) -> Rect {
		self.rects[i]
	}

	/// The number of boundary points.
	pub fn size( &self ) -> usize {
		self.rects.len() * 2 + 2
	}

	/// The `i`-th boundary point.
	pub fn boundary_point( &self, i : usize ) -> Point {
		let n = self.rects.len();

		if self.horizontal {
			if i == 0 {
				south_west( &self.rects[0] )
			}
			else if i == n + 1 {
				north_east( &self.rects[n - 1] )
			}
			else if i < n + 1 {
				south_east( &self.rects[i - 1] )
			}
			else {
				north_west( &self.rects[2 * n + 1 - i] )
			}
		}
		else {
			if i == n {
				south_east( &self.rects[n - 1] )
			}
			else if i == 2 * n + 1 {
				north_west( &self.rects[0] )
			}
			else if i < n {
				south_west( &self.rects[i] )
			}
			else {
				north_east( &self.rects[2 * n - i] )
			}
		}
	}

	/// The boundary index of the `i`-th outer corner, `i` in `0..4`.
	pub fn corner_index( &self, i : usize ) -> usize {
		let n = self.rects.len();

		if self.horizontal {
			match i {
				0 => 0,
				1 => 1,
				2 => n + 1,
				_ => n + 2
			}
		}
		else {
			match i {
				0 => 0,
				1 => n,
				2 => n + 1,
				_ => 2 * n + 1
			}
		}
	}

	/// The boundary index of corner `corner` (in `0..4`) of child rectangle `k`.
	pub fn rectangle_corner_index( &self, k : usize, corner : usize ) -> usize {
		let n = self.rects.len();

		if self.horizontal {
			match corner {
				0 => ( 2 * n + 2 - k ) % ( 2 * n + 2 ),
				1 => k + 1,
				2 => k + 2,
				_ => 2 * n + 1 - k
			}
		}
		else {
			match corner {
				0 => k,
				1 => k + 1,
				2 => 2 * n - k,
				_ => 2 * n - k + 1
			}
		}
	}
}


/// Builds a [RectangleSplit] from a rectangle, an orientation and a weight per child.
pub struct RectangleSplitter {
	rect : Rect,
	weights : Vec<f64>,
	sum_of_weights : f64,
	horizontal : bool
}

impl RectangleSplitter {
	/// Starts a (horizontal) split of `rect`.
	pub fn new( rect : Rect ) -> Self {
		RectangleSplitter{ rect, weights : Vec::new(), sum_of_weights : 0., horizontal : true }
	}

	/// Stack the children bottom-to-top.
	pub fn horizontally( mut self ) -> Self {
		self.horizontal = true;
		self
	}

	/// Pack the children left to right.
	pub fn vertically( mut self ) -> Self {
		self.horizontal = false;
		self
	}

	/// Appends a child with the given share. Weights must be positive.
	pub fn add_weight( mut self, weight : f64 ) -> Self {
		if weight <= 0. {
			panic!( "split weights must be positive, got {weight}" );
		}
		self.weights.push( weight );
		self.sum_of_weights += weight;
		self
	}

	/// Performs the split.
	pub fn split( self ) -> RectangleSplit {
		let mut rects = Vec::with_capacity( self.weights.len() );

		if self.horizontal {
			let mut cursor_y = self.rect.y0;
			for &weight in &self.weights {
				let height = weight / self.sum_of_weights * self.rect.height();
				rects.push( Rect::new( self.rect.x0, cursor_y, self.rect.x1, cursor_y + height ) );
				cursor_y += height;
			}
		}
		else {
			let mut cursor_x = self.rect.x0;
			for &weight in &self.weights {
				let width = weight / self.sum_of_weights * self.rect.width();
				rects.push( Rect::new( cursor_x, self.rect.y0, cursor_x + width, self.rect.y1 ) );
				cursor_x += width;
			}
		}

		RectangleSplit{ rects, horizontal : self.horizontal }
	}
}


/// A point of the embedding: plane position plus the scalar value of its owner as height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point3 {
	/// Plane x.
	pub x : f64,
	/// Plane y.
	pub y : f64,
	/// Height: the owning node's scalar value.
	pub z : f64
}

/// The 3D points of a rectangular landscape, grouped by owning landscape node.
///
/// Each node owns three disjoint groups of point handles: its *contour* (boundary) points, the
/// four *corner* points among them, and the four *container* points on its parent's boundary
/// that frame its rectangle.
pub struct Embedding {
	points : Vec<Point3>,
	contour_points : StaticNodeMap<Vec<usize>>,
	corner_points : StaticNodeMap<Vec<usize>>,
	container_points : StaticNodeMap<Vec<usize>>,
	min_point : usize,
	max_point : usize
}

impl Embedding {
	fn new( max_node_identifier : usize ) -> Self {
		Embedding{
			points : Vec::new(),
			contour_points : StaticNodeMap::with_capacity( max_node_identifier ),
			corner_points : StaticNodeMap::with_capacity( max_node_identifier ),
			container_points : StaticNodeMap::with_capacity( max_node_identifier ),
			min_point : 0,
			max_point : 0
		}
	}

	fn insert_point( &mut self, p : Point, z : f64, owner : NodeIdx ) -> usize {
		let index = self.points.len();
		self.points.push( Point3{ x : p.x, y : p.y, z } );
		self.contour_points[owner].push( index );

		if index == 0 || z < self.points[self.min_point].z {
			self.min_point = index;
		}
		if index == 0 || z > self.points[self.max_point].z {
			self.max_point = index;
		}

		index
	}

	/// The number of points.
	pub fn number_of_points( &self ) -> usize {
		self.points.len()
	}

	/// The point behind a handle.
	pub fn point( &self, index : usize ) -> Point3 {
		self.points[index]
	}

	/// A handle to the lowest point.
	pub fn min_point( &self ) -> usize {
		self.min_point
	}

	/// A handle to the highest point.
	pub fn max_point( &self ) -> usize {
		self.max_point
	}

	/// The number of boundary points owned by `node`.
	pub fn number_of_contour_points( &self, node : NodeIdx ) -> usize {
		self.contour_points[node].len()
	}

	/// The `i`-th boundary point handle of `node`.
	pub fn contour_point( &self, node : NodeIdx, i : usize ) -> usize {
		self.contour_points[node][i]
	}

	/// The `i`-th corner point handle of `node`, `i` in `0..4`.
	pub fn corner_point( &self, node : NodeIdx, i : usize ) -> usize {
		self.corner_points[node][i]
	}

	/// The `i`-th container point handle of `node`, `i` in `0..4`.
	pub fn container_point( &self, node : NodeIdx, i : usize ) -> usize {
		self.container_points[node][i]
	}

	/// The number of container points recorded for `node`.
	pub fn number_of_container_points( &self, node : NodeIdx ) -> usize {
		self.container_points[node].len()
	}
}


/// A triangle of the landscape surface, with the landscape arc it renders.
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
	/// First point handle.
	pub a : usize,
	/// Second point handle.
	pub b : usize,
	/// Third point handle.
	pub c : usize,
	/// The landscape arc this triangle is part of.
	pub arc : ArcIdx
}


struct Embedder<'a, 'b, TTree : ScalarMemberTree> {
	tree : &'a LandscapeTree<'b, TTree>,
	weights : &'a LandscapeWeights,
	embedding : &'a mut Embedding
}

impl<'a, 'b, TTree : ScalarMemberTree> Embedder<'a, 'b, TTree> {
	fn embed( &mut self ) -> Result<(), TreeError> {
		let root = self.tree.root();

		if self.tree.out_degree( root ) > 1 {
			return Err( TreeError::MultiChildRoot( self.tree.out_degree( root ) ) );
		}

		// the unit square, split trivially into one piece, forms the outermost contour
		let root_rect = Rect::new( -0.5, -0.5, 0.5, 0.5 );
		let split = RectangleSplitter::new( root_rect ).add_weight( 1. ).split();
		self.insert_split( &split, root );

		if let Some( arc ) = self.tree.out_arcs( root ).first().copied() {
			let child = self.tree.target( arc );
			if self.tree.is_leaf( child ) {
				self.embed_leaf( child, root_rect );
			}
			else {
				self.embed_branch( child, root, root_rect, true );
			}
		}

		Ok( () )
	}

	fn embed_branch(
		&mut self,
		current : NodeIdx,
		parent : NodeIdx,
		parent_rect : Rect,
		split_vertically : bool )
	{
		let shrink_ratio =
			self.weights.total_weight( current ) / self.weights.total_weight( parent );
		let current_rect = shrink( &parent_rect, shrink_ratio );

		let mut splitter = RectangleSplitter::new( current_rect );
		splitter = if split_vertically { splitter.vertically() } else { splitter.horizontally() };

		for arc in self.tree.out_arcs( current ) {
			let weight = self.weights.arc_weight( arc )
				+ self.weights.total_weight( self.tree.target( arc ) );
			splitter = splitter.add_weight( weight );
		}

		let split = splitter.split();
		self.insert_split( &split, current );

		for (i, arc) in self.tree.out_arcs( current ).into_iter().enumerate() {
			let child = self.tree.target( arc );
			if self.tree.is_leaf( child ) {
				self.embed_leaf( child, split.rectangle( i ) );
			}
			else {
				self.embed_branch( child, current, split.rectangle( i ), !split_vertically );
			}
		}
	}

	fn embed_leaf( &mut self, current : NodeIdx, parent_rect : Rect ) {
		let z = self.tree.value( current );
		self.embedding.insert_point( parent_rect.center(), z, current );
	}

	fn insert_split( &mut self, split : &RectangleSplit, owner : NodeIdx ) {
		let z = self.tree.value( owner );

		let mut inserted = Vec::with_capacity( split.size() );
		for i in 0..split.size() {
			inserted.push( self.embedding.insert_point( split.boundary_point( i ), z, owner ) );
		}

		for i in 0..4 {
			let point = inserted[split.corner_index( i )];
			self.embedding.corner_points[owner].push( point );
		}

		// each child rectangle's corners frame that child's own contour
		for (k, arc) in self.tree.out_arcs( owner ).into_iter().enumerate() {
			let child = self.tree.target( arc );
			for corner in 0..4 {
				let point = inserted[split.rectangle_corner_index( k, corner )];
				self.embedding.container_points[child].push( point );
			}
		}
	}
}


struct Triangulator<'a, 'b, TTree : ScalarMemberTree> {
	tree : &'a LandscapeTree<'b, TTree>,
	embedding : &'a Embedding,
	triangles : Vec<Triangle>
}

impl<'a, 'b, TTree : ScalarMemberTree> Triangulator<'a, 'b, TTree> {
	fn triangulate( &mut self ) {
		for arc in self.tree.out_arcs( self.tree.root() ) {
			self.triangulate_arc( arc );
		}
	}

	fn triangulate_arc( &mut self, arc : ArcIdx ) {
		let child = self.tree.target( arc );
		if self.tree.is_leaf( child ) {
			self.nested_point( arc );
		}
		else {
			self.nested_rectangle( arc );
			for child_arc in self.tree.out_arcs( child ) {
				self.triangulate_arc( child_arc );
			}
		}
	}

	/// Eight triangles closing the ring between a child's rectangle and its frame.
	fn nested_rectangle( &mut self, arc : ArcIdx ) {
		let inner = self.tree.target( arc );

		for i in 0..4 {
			self.triangles.push( Triangle{
				a : self.embedding.container_point( inner, i ),
				b : self.embedding.container_point( inner, ( i + 1 ) % 4 ),
				c : self.embedding.corner_point( inner, i ),
				arc
			} );
		}

		for i in 0..4 {
			self.triangles.push( Triangle{
				a : self.embedding.corner_point( inner, i ),
				b : self.embedding.corner_point( inner, ( i + 1 ) % 4 ),
				c : self.embedding.container_point( inner, ( i + 1 ) % 4 ),
				arc
			} );
		}
	}

	/// Four triangles fanning from a leaf's point to its frame.
	fn nested_point( &mut self, arc : ArcIdx ) {
		let inner = self.tree.target( arc );
		let tip = self.embedding.contour_point( inner, 0 );

		for i in 0..4 {
			self.triangles.push( Triangle{
				a : self.embedding.container_point( inner, i ),
				b : self.embedding.container_point( inner, ( i + 1 ) % 4 ),
				c : tip,
				arc
			} );
		}
	}
}


/// A contour tree embedded as a triangulated rectangular terrain.
pub struct RectangularLandscape<'a, TTree : ScalarMemberTree> {
	tree : LandscapeTree<'a, TTree>,
	weights : LandscapeWeights,
	embedding : Embedding,
	triangles : Vec<Triangle>
}

impl<'a, TTree : ScalarMemberTree> RectangularLandscape<'a, TTree> {
	/// Roots `backing` at `root`, computes weights, embeds and triangulates.
	///
	/// The root must have exactly one neighbor in the backing tree (use
	/// [crate::find_min_leaf] or [crate::find_max_leaf] to pick one); otherwise
	/// [TreeError::MultiChildRoot] is returned.
	pub fn build(
		backing : &'a TTree,
		root : NodeIdx,
		weight_map : Option<&WeightMap> )
		-> Result<Self, TreeError>
	{
		let tree = LandscapeTree::new( backing, root );
		let weights = LandscapeWeights::new( &tree, weight_map );
		let mut embedding = Embedding::new( tree.max_node_identifier() );

		Embedder{ tree : &tree, weights : &weights, embedding : &mut embedding }.embed()?;

		let mut triangulator =
			Triangulator{ tree : &tree, embedding : &embedding, triangles : Vec::new() };
		triangulator.triangulate();
		let triangles = triangulator.triangles;

		Ok( RectangularLandscape{ tree, weights, embedding, triangles } )
	}

	/// The rooted tree behind this landscape.
	pub fn tree( &self ) -> &LandscapeTree<'a, TTree> {
		&self.tree
	}

	/// The weights used for the embedding.
	pub fn weights( &self ) -> &LandscapeWeights {
		&self.weights
	}

	/// The embedded points.
	pub fn embedding( &self ) -> &Embedding {
		&self.embedding
	}

	/// The number of points.
	pub fn number_of_points( &self ) -> usize {
		self.embedding.number_of_points()
	}

	/// The point behind a handle.
	pub fn point( &self, index : usize ) -> Point3 {
		self.embedding.point( index )
	}

	/// The lowest point.
	pub fn min_point( &self ) -> Point3 {
		self.embedding.point( self.embedding.min_point() )
	}

	/// The highest point.
	pub fn max_point( &self ) -> Point3 {
		self.embedding.point( self.embedding.max_point() )
	}

	/// The number of triangles.
	pub fn number_of_triangles( &self ) -> usize {
		self.triangles.len()
	}

	/// The `i`-th triangle.
	pub fn triangle( &self, i : usize ) -> Triangle {
		self.triangles[i]
	}

	/// All triangles.
	pub fn triangles( &self ) -> &[Triangle] {
		&self.triangles
	}

	/// The members rendered by a triangle: the member set of its arc's backing edge.
	pub fn triangle_members( &self, triangle : Triangle ) -> &crate::contour::Members {
		self.tree.arc_members( triangle.arc )
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use crate::ScalarMemberTree;
	use crate::carr::CarrsAlgorithm;
	use crate::contour::ContourTree;
	use crate::test_data::wenger_complex;

	fn wenger_tree() -> ContourTree {
		CarrsAlgorithm::new().compute( &wenger_complex() ).unwrap()
	}

	#[test]
	fn test_horizontal_split_boundary() {
		let rect = Rect::new( 0., 0., 1., 2. );
		let split = RectangleSplitter::new( rect )
			.horizontally()
			.add_weight( 1. )
			.add_weight( 3. )
			.split();

		assert_eq!( split.number_of_rectangles(), 2 );
		assert_eq!( split.size(), 6 );

		// children stack bottom-to-top, proportional to weight
		assert_eq!( split.rectangle( 0 ), Rect::new( 0., 0., 1., 0.5 ) );
		assert_eq!( split.rectangle( 1 ), Rect::new( 0., 0.5, 1., 2. ) );

		// counter-clockwise boundary from the south-west corner
		assert_eq!( split.boundary_point( 0 ), Point::new( 0., 0. ) );
		assert_eq!( split.boundary_point( 1 ), Point::new( 1., 0. ) );
		assert_eq!( split.boundary_point( 2 ), Point::new( 1., 0.5 ) );
		assert_eq!( split.boundary_point( 3 ), Point::new( 1., 2. ) );
		assert_eq!( split.boundary_point( 4 ), Point::new( 0., 2. ) );
		assert_eq!( split.boundary_point( 5 ), Point::new( 0., 0.5 ) );

		assert_eq!(
			(0..4).map( |i| split.corner_index( i ) ).collect::<Vec<_>>(),
			vec![ 0, 1, 3, 4 ] );

		// child corners walk the same counter-clockwise direction as the outer corners
		assert_eq!(
			(0..4).map( |c| split.rectangle_corner_index( 0, c ) ).collect::<Vec<_>>(),
			vec![ 0, 1, 2, 5 ] );
		assert_eq!(
			(0..4).map( |c| split.rectangle_corner_index( 1, c ) ).collect::<Vec<_>>(),
			vec![ 5, 2, 3, 4 ] );
	}

	#[test]
	fn test_vertical_split_boundary() {
		let rect = Rect::new( 0., 0., 2., 1. );
		let split = RectangleSplitter::new( rect )
			.vertically()
			.add_weight( 1. )
			.add_weight( 1. )
			.split();

		assert_eq!( split.rectangle( 0 ), Rect::new( 0., 0., 1., 1. ) );
		assert_eq!( split.rectangle( 1 ), Rect::new( 1., 0., 2., 1. ) );

		assert_eq!( split.boundary_point( 0 ), Point::new( 0., 0. ) );
		assert_eq!( split.boundary_point( 1 ), Point::new( 1., 0. ) );
		assert_eq!( split.boundary_point( 2 ), Point::new( 2., 0. ) );
		assert_eq!( split.boundary_point( 3 ), Point::new( 2., 1. ) );
		assert_eq!( split.boundary_point( 4 ), Point::new( 1., 1. ) );
		assert_eq!( split.boundary_point( 5 ), Point::new( 0., 1. ) );

		assert_eq!(
			(0..4).map( |i| split.corner_index( i ) ).collect::<Vec<_>>(),
			vec![ 0, 2, 3, 5 ] );
		assert_eq!(
			(0..4).map( |c| split.rectangle_corner_index( 0, c ) ).collect::<Vec<_>>(),
			vec![ 0, 1, 4, 5 ] );
		assert_eq!(
			(0..4).map( |c| split.rectangle_corner_index( 1, c ) ).collect::<Vec<_>>(),
			vec![ 1, 2, 3, 4 ] );
	}

	fn triangle_area( lscape : &RectangularLandscape<'_, ContourTree>, t : Triangle ) -> f64 {
		let a = lscape.point( t.a );
		let b = lscape.point( t.b );
		let c = lscape.point( t.c );
		( ( b.x - a.x ) * ( c.y - a.y ) - ( c.x - a.x ) * ( b.y - a.y ) ).abs() / 2.
	}

	#[test]
	fn test_wenger_embedding() {
		let tree = wenger_tree();
		let root = tree.node_by_id( 4 ).unwrap();
		let lscape = RectangularLandscape::build( &tree, root, None ).unwrap();

		// 5 leaf arcs fan into 4 triangles each; 3 nested branch arcs ring into 8 each
		assert_eq!( lscape.number_of_triangles(), 44 );

		// the triangles tile the unit square
		let total_area : f64 = lscape.triangles().iter()
			.map( |&t| triangle_area( &lscape, t ) )
			.sum();
		assert!( ( total_area - 1. ).abs() < 1e-9 );

		// heights stay within the scalar range
		for i in 0..lscape.number_of_points() {
			let z = lscape.point( i ).z;
			assert!( ( 16. ..=66. ).contains( &z ) );
		}
		assert_eq!( lscape.min_point().z, 16. );
		assert_eq!( lscape.max_point().z, 66. );

		// per-arc triangle counts match the arc's shape
		for arc in lscape.tree().arcs() {
			let count = lscape.triangles().iter().filter( |t| t.arc == arc ).count();
			if lscape.tree().is_leaf( lscape.tree().target( arc ) ) {
				assert_eq!( count, 4 );
			}
			else {
				assert_eq!( count, 8 );
			}
		}
	}

	#[test]
	fn test_multi_child_root_is_rejected() {
		let tree = wenger_tree();
		let saddle = tree.node_by_id( 7 ).unwrap();

		assert!( matches!(
			RectangularLandscape::build( &tree, saddle, None ),
			Err( TreeError::MultiChildRoot( 4 ) ) ) );
	}
}
