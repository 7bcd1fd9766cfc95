//! Shared plumbing for the command-line tools.

use std::error::Error;
use std::path::Path;

use relief::carr::CarrsAlgorithm;
use relief::complex::ScalarComplex;
use relief::fileio;


/// Reads a scalar complex from a vertex value file and an edge file, computes its contour
/// tree, and writes it to `tree_out`; optionally also writes the join and split trees.
pub fn compute_contour_tree(
	vertex_values : &Path,
	edges : &Path,
	tree_out : &Path,
	join_out : Option<&Path>,
	split_out : Option<&Path> )
	-> Result<(), Box<dyn Error>>
{
	let mut plex = ScalarComplex::new();
	fileio::read_vertex_values( vertex_values, &mut plex )?;
	fileio::read_edges( edges, &mut plex )?;

	let mut algorithm = CarrsAlgorithm::new();
	if join_out.is_some() || split_out.is_some() {
		algorithm.keep_join_split_trees( true );
	}

	let tree = algorithm.compute( &plex )?;

	if let Some( path ) = join_out {
		fileio::write_join_split_tree( path, algorithm.join_tree().unwrap(), &plex )?;
	}
	if let Some( path ) = split_out {
		fileio::write_join_split_tree( path, algorithm.split_tree().unwrap(), &plex )?;
	}

	fileio::write_contour_tree( tree_out, &tree )?;

	Ok( () )
}
