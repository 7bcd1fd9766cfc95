//! File codecs for the system boundary.
//!
//! All formats are line-oriented ASCII with whitespace- or tab-delimited tokens. Blank lines
//! are skipped. Every parse error names the offending file and line. Files are open only for
//! the duration of one read or write and are released on all exit paths.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use thiserror::Error;

use crate::ScalarMemberTree;
use crate::carr::JoinSplitTree;
use crate::complex::ScalarComplex;
use crate::contour::{ContourTree, Member, MemberGraph};
use crate::landscape::WeightMap;


/// Color scalars per vertex id, read from a color map file.
pub type ColorMap = BTreeMap<usize, f64>;


/// Errors raised while reading or writing boundary files.
#[derive(Debug, Error)]
pub enum FileFormatError {
	/// The file could not be opened, read, or written.
	#[error( "could not access '{}': {}", .path.display(), .source )]
	Io {
		/// The file involved.
		path : PathBuf,
		/// The underlying I/O error.
		#[source]
		source : io::Error
	},

	/// A line did not match the expected format.
	#[error( "{}:{}: {}", .path.display(), .line, .message )]
	Format {
		/// The file involved.
		path : PathBuf,
		/// 1-based line number.
		line : usize,
		/// What went wrong.
		message : String
	}
}

fn io_error( path : &Path, source : io::Error ) -> FileFormatError {
	FileFormatError::Io{ path : path.to_owned(), source }
}

fn format_error( path : &Path, line : usize, message : String ) -> FileFormatError {
	FileFormatError::Format{ path : path.to_owned(), line, message }
}


/// Reads a file into `(line_number, tokens)` rows, skipping blank lines.
fn tabular_lines( path : &Path ) -> Result<Vec<(usize, Vec<String>)>, FileFormatError> {
	let file = File::open( path ).map_err( |e| io_error( path, e ) )?;

	let mut rows = Vec::new();
	for (index, line) in BufReader::new( file ).lines().enumerate() {
		let line = line.map_err( |e| io_error( path, e ) )?;
		let tokens : Vec<String> = line.split_whitespace().map( str::to_owned ).collect();
		if !tokens.is_empty() {
			rows.push( ( index + 1, tokens ) );
		}
	}

	Ok( rows )
}

fn parse_index(
	token : &str,
	path : &Path,
	line : usize,
	what : &str )
	-> Result<usize, FileFormatError>
{
	token.parse().map_err( |_| {
		format_error( path, line, format!( "could not parse '{token}' as {what}" ) )
	} )
}

fn parse_value(
	token : &str,
	path : &Path,
	line : usize,
	what : &str )
	-> Result<f64, FileFormatError>
{
	token.parse().map_err( |_| {
		format_error( path, line, format!( "could not parse '{token}' as {what}" ) )
	} )
}


/// Reads a vertex value file (one scalar per line) into the complex.
///
/// Line `k` (0-based, blank lines aside) defines the value of vertex `k`.
pub fn read_vertex_values(
	path : &Path,
	plex : &mut ScalarComplex )
	-> Result<(), FileFormatError>
{
	for (line, tokens) in tabular_lines( path )? {
		if tokens.len() != 1 {
			return Err( format_error( path, line,
				format!( "expected one vertex value, found {} tokens", tokens.len() ) ) );
		}
		let value = parse_value( &tokens[0], path, line, "a vertex value" )?;
		plex.add_vertex( value );
	}
	Ok( () )
}

/// Reads an edge file (two vertex indices per line) into the complex.
///
/// Self-edges are dropped silently and duplicates coalesce; endpoints must refer to vertices
/// already present in the complex.
pub fn read_edges(
	path : &Path,
	plex : &mut ScalarComplex )
	-> Result<(), FileFormatError>
{
	let n = plex.number_of_vertices();

	for (line, tokens) in tabular_lines( path )? {
		if tokens.len() != 2 {
			return Err( format_error( path, line,
				format!( "expected two vertex indices, found {} tokens", tokens.len() ) ) );
		}
		let u = parse_index( &tokens[0], path, line, "a vertex index" )?;
		let v = parse_index( &tokens[1], path, line, "a vertex index" )?;

		for endpoint in [u, v] {
			if endpoint >= n {
				return Err( format_error( path, line,
					format!( "edge endpoint {endpoint} out of range ({n} vertices)" ) ) );
			}
		}

		plex.add_edge( u, v );
	}
	Ok( () )
}


/// Writes a contour tree (or folded view) in the contour tree file format.
///
/// First the node count, then one `id value` line per node in iteration order, then one edge
/// line per edge: the two endpoint ids followed by `(member_id, member_value)` pairs in
/// ascending id order.
pub fn write_contour_tree<TTree : ScalarMemberTree>(
	path : &Path,
	tree : &TTree )
	-> Result<(), FileFormatError>
{
	let file = File::create( path ).map_err( |e| io_error( path, e ) )?;
	let mut out = BufWriter::new( file );

	let mut write = || -> io::Result<()> {
		writeln!( out, "{}", tree.number_of_nodes() )?;

		for v in tree.nodes() {
			writeln!( out, "{}\t{}", tree.id( v ), tree.value( v ) )?;
		}

		for e in tree.edges() {
			writeln!( out, "{}\t{}{}",
				tree.id( tree.edge_u( e ) ),
				tree.id( tree.edge_v( e ) ),
				tree.edge_members( e ).iter().format_with( "", |m, f| {
					f( &format_args!( "\t{}\t{}", m.id(), m.value() ) )
				} ) )?;
		}

		out.flush()
	};

	write().map_err( |e| io_error( path, e ) )
}

/// Reads a contour tree file written by [write_contour_tree].
pub fn read_contour_tree( path : &Path ) -> Result<ContourTree, FileFormatError> {
	let rows = tabular_lines( path )?;
	let mut rows = rows.into_iter();

	let n = match rows.next() {
		Some( (line, tokens) ) => {
			if tokens.len() != 1 {
				return Err( format_error( path, line,
					"the header must be a single integer node count".to_owned() ) );
			}
			parse_index( &tokens[0], path, line, "the node count" )?
		}
		None => return Err( format_error( path, 1, "empty contour tree file".to_owned() ) )
	};

	let mut graph = MemberGraph::new();

	for _ in 0..n {
		let (line, tokens) = rows.next().ok_or_else( || {
			format_error( path, 0, format!( "expected {n} node lines" ) )
		} )?;

		if tokens.len() != 2 {
			return Err( format_error( path, line,
				format!( "malformed node definition: expected 'id value', found {} tokens",
					tokens.len() ) ) );
		}
		let id = parse_index( &tokens[0], path, line, "a node id" )?;
		let value = parse_value( &tokens[1], path, line, "a node value" )?;
		graph.add_node( id, value );
	}

	for (line, tokens) in rows {
		if tokens.len() < 2 || tokens.len() % 2 != 0 {
			return Err( format_error( path, line,
				"malformed edge definition: expected 'u v' plus member pairs".to_owned() ) );
		}

		let u_id = parse_index( &tokens[0], path, line, "an endpoint id" )?;
		let v_id = parse_index( &tokens[1], path, line, "an endpoint id" )?;

		if u_id == v_id {
			return Err( format_error( path, line,
				format!( "self-edge between vertex {u_id} and itself is not permitted" ) ) );
		}

		let u = graph.node_by_id( u_id ).ok_or_else( || {
			format_error( path, line, format!( "unknown node id {u_id}" ) )
		} )?;
		let v = graph.node_by_id( v_id ).ok_or_else( || {
			format_error( path, line, format!( "unknown node id {v_id}" ) )
		} )?;

		let edge = graph.add_edge( u, v );

		for pair in tokens[2..].chunks( 2 ) {
			let member_id = parse_index( &pair[0], path, line, "a member id" )?;
			let member_value = parse_value( &pair[1], path, line, "a member value" )?;
			graph.insert_edge_member( edge, Member::new( member_id, member_value ) );
		}
	}

	Ok( ContourTree::from_graph( graph ) )
}


/// Writes a join or split tree: the node count, `id value` lines, then `source target` arcs.
pub fn write_join_split_tree(
	path : &Path,
	tree : &JoinSplitTree,
	plex : &ScalarComplex )
	-> Result<(), FileFormatError>
{
	let file = File::create( path ).map_err( |e| io_error( path, e ) )?;
	let mut out = BufWriter::new( file );

	let mut write = || -> io::Result<()> {
		writeln!( out, "{}", tree.number_of_nodes() )?;

		for v in tree.nodes() {
			writeln!( out, "{}\t{}", v, plex.value( v ) )?;
		}

		for (source, target) in tree.arcs() {
			writeln!( out, "{source}\t{target}" )?;
		}

		out.flush()
	};

	write().map_err( |e| io_error( path, e ) )
}


/// Reads a weight map: `vertex_id weight` per line. Ids absent from the file weigh 1.
pub fn read_weight_map( path : &Path ) -> Result<WeightMap, FileFormatError> {
	let mut map = WeightMap::new();

	for (line, tokens) in tabular_lines( path )? {
		if tokens.len() != 2 {
			return Err( format_error( path, line,
				format!( "expected 'vertex_id weight', found {} tokens", tokens.len() ) ) );
		}
		let id = parse_index( &tokens[0], path, line, "a vertex id" )?;
		let weight = parse_value( &tokens[1], path, line, "a weight" )?;
		map.insert( id, weight );
	}

	Ok( map )
}

/// Reads a color map: `vertex_id color_scalar` per line.
pub fn read_color_map( path : &Path ) -> Result<ColorMap, FileFormatError> {
	let mut map = ColorMap::new();

	for (line, tokens) in tabular_lines( path )? {
		if tokens.len() != 2 {
			return Err( format_error( path, line,
				format!( "expected 'vertex_id color', found {} tokens", tokens.len() ) ) );
		}
		let id = parse_index( &tokens[0], path, line, "a vertex id" )?;
		let color = parse_value( &tokens[1], path, line, "a color scalar" )?;
		map.insert( id, color );
	}

	Ok( map )
}
