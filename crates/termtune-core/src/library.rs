//! Music folder scanning
//!
//! Turns a folder into the ordered, immutable track list a session plays from.

use std::ops::Index;
use std::path::{ Path, PathBuf };

use thiserror::Error;


/// Audio file extensions the player accepts (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &[ "wav", "mp3", "ogg" ];


/// Errors that can occur while building the track list.
#[derive( Debug, Error )]
pub enum LibraryError {
    #[error( "IO error: {0}" )]
    Io( #[from] std::io::Error ),

    #[error( "Folder not found: {0}" )]
    NotFound( PathBuf ),

    #[error( "No playable files in {0}" )]
    Empty( PathBuf ),
}


/// One playable file.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Track {
    pub path: PathBuf,
    pub display_name: String,
}


impl Track {
    /// Creates a track whose display name is the file name of `path`.
    pub fn new( path: PathBuf ) -> Self {
        let display_name = path
            .file_name()
            .map( |n| n.to_string_lossy().to_string() )
            .unwrap_or_else( || path.to_string_lossy().to_string() );
        Self { path, display_name }
    }
}


/// Ordered, non-empty list of tracks.
///
/// A track's identity is its position in this list. The list never changes
/// after construction.
#[derive( Debug, Clone )]
pub struct TrackList {
    tracks: Vec<Track>,
}


impl TrackList {
    /// Wraps `tracks`, returning `None` when there is nothing to play.
    pub fn new( tracks: Vec<Track> ) -> Option<Self> {
        if tracks.is_empty() {
            None
        } else {
            Some( Self { tracks } )
        }
    }


    /// Number of tracks, always at least one.
    pub fn len( &self ) -> usize {
        self.tracks.len()
    }


    /// Always false; present for API symmetry with slices.
    pub fn is_empty( &self ) -> bool {
        false
    }


    pub fn get( &self, index: usize ) -> Option<&Track> {
        self.tracks.get( index )
    }


    pub fn iter( &self ) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }


    pub fn as_slice( &self ) -> &[Track] {
        &self.tracks
    }
}


impl Index<usize> for TrackList {
    type Output = Track;


    fn index( &self, index: usize ) -> &Track {
        &self.tracks[ index ]
    }
}


impl<'a> IntoIterator for &'a TrackList {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;


    fn into_iter( self ) -> Self::IntoIter {
        self.tracks.iter()
    }
}


/// Scans `dir` (non-recursively) for playable files, sorted by file name.
pub fn scan( dir: &Path ) -> Result<TrackList, LibraryError> {
    tracing::info!( "Scanning: {:?}", dir );

    let entries = match std::fs::read_dir( dir ) {
        Ok( e ) => e,
        Err( e ) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err( LibraryError::NotFound( dir.to_path_buf() ) );
        }
        Err( e ) => return Err( LibraryError::Io( e ) ),
    };

    let mut tracks: Vec<Track> = entries
        .flatten()
        .map( |entry| entry.path() )
        .filter( |path| path.is_file() && is_audio_file( path ) )
        .map( Track::new )
        .collect();

    tracks.sort_by( |a, b| a.display_name.cmp( &b.display_name ) );

    tracing::info!( "Found {} tracks", tracks.len() );
    TrackList::new( tracks ).ok_or_else( || LibraryError::Empty( dir.to_path_buf() ) )
}


/// Checks if a file has a supported audio extension.
pub fn is_audio_file( path: &Path ) -> bool {
    path.extension()
        .and_then( |e| e.to_str() )
        .map( |e| SUPPORTED_EXTENSIONS.contains( &e.to_lowercase().as_str() ) )
        .unwrap_or( false )
}


#[cfg( test )]
mod tests {
    use super::*;
    use std::fs;


    fn touch( dir: &Path, name: &str ) {
        fs::write( dir.join( name ), b"" ).unwrap();
    }


    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch( dir.path(), "c.ogg" );
        touch( dir.path(), "a.MP3" );
        touch( dir.path(), "b.Wav" );
        touch( dir.path(), "notes.txt" );
        touch( dir.path(), "cover.jpg" );

        let list = scan( dir.path() ).unwrap();
        let names: Vec<_> = list.iter().map( |t| t.display_name.as_str() ).collect();
        assert_eq!( names, vec![ "a.MP3", "b.Wav", "c.ogg" ] );
    }


    #[test]
    fn test_scan_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join( "album.mp3" );
        fs::create_dir( &nested ).unwrap();
        touch( &nested, "inner.mp3" );
        touch( dir.path(), "top.mp3" );

        let list = scan( dir.path() ).unwrap();
        assert_eq!( list.len(), 1 );
        assert_eq!( list[ 0 ].display_name, "top.mp3" );
    }


    #[test]
    fn test_scan_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        touch( dir.path(), "readme.md" );
        assert!( matches!( scan( dir.path() ), Err( LibraryError::Empty( _ ) ) ) );
    }


    #[test]
    fn test_scan_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join( "nope" );
        assert!( matches!( scan( &missing ), Err( LibraryError::NotFound( _ ) ) ) );
    }


    #[test]
    fn test_track_display_name_is_file_name() {
        let track = Track::new( PathBuf::from( "/music/Some Song.ogg" ) );
        assert_eq!( track.display_name, "Some Song.ogg" );
    }


    #[test]
    fn test_track_list_rejects_empty() {
        assert!( TrackList::new( Vec::new() ).is_none() );
    }
}
