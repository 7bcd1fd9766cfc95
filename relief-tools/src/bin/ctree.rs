use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use relief_tools::tool_util::compute_contour_tree;


/// Compute the contour tree of a scalar field on the 1-skeleton of a simplicial complex.
#[derive(Parser)]
#[command(name = "ctree")]
struct CLI {
	/// A file containing the scalar values defined at the vertices of the simplicial complex,
	/// one per line
	vertex_values : PathBuf,

	/// A tab-delimited file containing the edges of the 1-skeleton, each edge given by the
	/// 0-based indices of the vertices it connects
	edges : PathBuf,

	/// The file in which to place the output. The file will be overwritten without warning
	tree_out : PathBuf,

	/// Also output the join tree to the specified file
	#[arg(long)]
	join : Option<PathBuf>,

	/// Also output the split tree to the specified file
	#[arg(long)]
	split : Option<PathBuf>
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
		cli.join.as_deref(),
		cli.split.as_deref() )
	{
		eprintln!( "Error: {e}" );
		exit( 1 );
	}
}
