//! File logging
//!
//! The terminal belongs to the dashboard, so log output goes to a file in
//! the user cache dir instead.

use std::fs::{ self, File };
use std::path::{ Path, PathBuf };
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;


pub fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map( |p| p.join( "termtune" ).join( "termtune.log" ) )
}


/// Installs the global subscriber writing to `path`.
///
/// Returns false, leaving logging disabled, when the file cannot be created.
pub fn init( path: &Path ) -> bool {
    let file = match path.parent().map( fs::create_dir_all ).transpose().and_then( |_| File::create( path ) ) {
        Ok( file ) => file,
        Err( _ ) => return false,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new( "info" ) );
    tracing_subscriber::fmt()
        .with_env_filter( filter )
        .with_writer( Mutex::new( file ) )
        .with_ansi( false )
        .try_init()
        .is_ok()
}
