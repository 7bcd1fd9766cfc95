use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use relief_tools::tool_util::compute_contour_tree;


/// Compute the contour tree of a scalar field. Alias for `ctree` without the join/split
/// outputs.
#[derive(Parser)]
#[command(name = "compute")]
struct CLI {
	/// A file containing the scalar values defined at the vertices of the simplicial complex,
	/// one per line
	vertex_values : PathBuf,

	/// A tab-delimited file containing the edges of the 1-skeleton
	edges : PathBuf,

	/// The file in which to place the output. The file will be overwritten without warning
	tree_out : PathBuf
}


fn main() {
	let cli = match CLI::try_parse() {
		Ok( cli ) => cli,
		Err( e ) => {
			e.print().expect( "could not write usage" );
			exit( if e.use_stderr() { 1 } else { 0 } );
		}
	};

	if let Err( e ) = compute_contour_tree(
		&cli.vertex_values,
		&cli.edges,
		&cli.tree_out,
		None,
		None )
	{
		eprintln!( "Error: {e}" );
		exit( 1 );
	}
}
