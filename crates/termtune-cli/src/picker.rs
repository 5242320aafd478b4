//! Track list screen and start-track prompt
//!
//! Runs before the dashboard, in plain cooked-mode stdout.

use std::io::{ BufRead, Write };

use thiserror::Error;

use termtune_core::display::truncate;
use termtune_core::TrackList;


/// Columns between the box borders.
const BOX_WIDTH: usize = 40;

/// Longest `N. name` entry before it is cut with `...`.
const ENTRY_WIDTH: usize = 36;


#[derive( Debug, Error, PartialEq, Eq )]
pub enum SelectionError {
    #[error( "Invalid track number: {0:?}" )]
    NotANumber( String ),

    #[error( "Invalid track number: {given} (choose 1-{count})" )]
    OutOfRange { given: i64, count: usize },
}


/// Draws `body` inside a double-line box, with an optional centered header.
pub fn boxed( header: Option<&str>, body: &[String] ) -> Vec<String> {
    let rule = "═".repeat( BOX_WIDTH );
    let mut lines = vec![ format!( "╔{}╗", rule ) ];

    if let Some( header ) = header {
        lines.push( format!( "║{:^width$}║", header, width = BOX_WIDTH ) );
        lines.push( format!( "╠{}╣", rule ) );
    }
    for line in body {
        let line = truncate( line, BOX_WIDTH - 2 );
        lines.push( format!( "║ {:<width$} ║", line, width = BOX_WIDTH - 2 ) );
    }

    lines.push( format!( "╚{}╝", rule ) );
    lines
}


/// Boxes a free-form message, wrapping it instead of cutting it.
pub fn message_box( message: &str ) -> Vec<String> {
    let chars: Vec<char> = message.chars().collect();
    let body: Vec<String> = chars.chunks( BOX_WIDTH - 2 ).map( |c| c.iter().collect() ).collect();
    boxed( None, &body )
}


/// One `N. file name` entry per track, 1-based.
pub fn song_list_lines( tracks: &TrackList ) -> Vec<String> {
    let entries: Vec<String> = tracks
        .iter()
        .enumerate()
        .map( |( i, track )| truncate( &format!( "{}. {}", i + 1, track.display_name ), ENTRY_WIDTH ) )
        .collect();
    boxed( Some( "Tracks" ), &entries )
}


/// Converts the typed 1-based number into a track index.
pub fn parse_selection( input: &str, count: usize ) -> Result<usize, SelectionError> {
    let trimmed = input.trim();
    let given: i64 = trimmed
        .parse()
        .map_err( |_| SelectionError::NotANumber( trimmed.to_string() ) )?;

    if given < 1 || given as u64 > count as u64 {
        return Err( SelectionError::OutOfRange { given, count } );
    }
    Ok( ( given - 1 ) as usize )
}


/// Prints the prompt box and reads one line with the track number.
pub fn prompt_for_track<R: BufRead, W: Write>( input: &mut R, out: &mut W, count: usize ) -> anyhow::Result<usize> {
    for line in boxed( None, &[ format!( "Enter the track number to play (1-{}):", count ) ] ) {
        writeln!( out, "{}", line )?;
    }
    write!( out, "> " )?;
    out.flush()?;

    let mut line = String::new();
    input.read_line( &mut line )?;
    Ok( parse_selection( &line, count )? )
}


#[cfg( test )]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;
    use termtune_core::Track;


    fn tracks( names: &[&str] ) -> TrackList {
        TrackList::new( names.iter().map( |n| Track::new( PathBuf::from( n ) ) ).collect() ).unwrap()
    }


    #[test]
    fn test_parse_selection_accepts_range_with_whitespace() {
        assert_eq!( parse_selection( "1", 3 ), Ok( 0 ) );
        assert_eq!( parse_selection( " 3\n", 3 ), Ok( 2 ) );
    }


    #[test]
    fn test_parse_selection_rejects_bad_input() {
        assert_eq!( parse_selection( "abc", 3 ), Err( SelectionError::NotANumber( "abc".into() ) ) );
        assert_eq!( parse_selection( "", 3 ), Err( SelectionError::NotANumber( String::new() ) ) );
        assert_eq!( parse_selection( "0", 3 ), Err( SelectionError::OutOfRange { given: 0, count: 3 } ) );
        assert_eq!( parse_selection( "4", 3 ), Err( SelectionError::OutOfRange { given: 4, count: 3 } ) );
        assert_eq!( parse_selection( "-2", 3 ), Err( SelectionError::OutOfRange { given: -2, count: 3 } ) );
    }


    #[test]
    fn test_song_list_truncates_long_entries() {
        let long = format!( "{}.mp3", "x".repeat( 50 ) );
        let lines = song_list_lines( &tracks( &[ "a.mp3", &long ] ) );

        assert_eq!( lines.len(), 6 );
        assert!( lines[ 3 ].contains( "1. a.mp3" ) );
        let expected = format!( "2. {}...", "x".repeat( 30 ) );
        assert!( lines[ 4 ].contains( &expected ) );
        // Every row has the same visible width.
        let width = lines[ 0 ].chars().count();
        assert!( lines.iter().all( |l| l.chars().count() == width ) );
    }


    #[test]
    fn test_message_box_wraps_long_text() {
        let message = "y".repeat( 50 );
        let lines = message_box( &message );
        assert_eq!( lines.len(), 4 );
        assert!( lines[ 1 ].contains( &"y".repeat( 38 ) ) );
        assert!( lines[ 2 ].contains( &"y".repeat( 12 ) ) );
    }


    #[test]
    fn test_prompt_reads_number() {
        let mut out = Vec::new();
        let index = prompt_for_track( &mut Cursor::new( "2\n" ), &mut out, 3 ).unwrap();
        assert_eq!( index, 1 );
        assert!( String::from_utf8( out ).unwrap().ends_with( "> " ) );
    }


    #[test]
    fn test_prompt_rejects_out_of_range() {
        let err = prompt_for_track( &mut Cursor::new( "9\n" ), &mut Vec::new(), 3 ).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SelectionError>(),
            Some( &SelectionError::OutOfRange { given: 9, count: 3 } )
        );
    }
}
