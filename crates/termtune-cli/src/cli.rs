//! Command-line argument parsing for termtune.

use std::path::PathBuf;

use clap::Parser;


/// termtune - plays a folder of audio files from the terminal.
#[derive( Parser, Debug )]
#[command( name = "termtune" )]
#[command( version, about, long_about = None )]
pub struct Args {
    /// Folder holding .wav, .mp3 and .ogg files.
    pub folder: Option<PathBuf>,

    /// 1-based number of the track to start with; skips the prompt.
    #[arg( short, long, value_name = "N" )]
    pub track: Option<String>,

    /// Dashboard refresh interval in milliseconds.
    #[arg( long, value_name = "MS" )]
    pub tick_ms: Option<u64>,

    /// Hide the "Next Song" row.
    #[arg( long )]
    pub no_next: bool,
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_parses_all_flags() {
        let args = Args::try_parse_from([ "termtune", "tunes", "--track", "3", "--tick-ms", "50", "--no-next" ]).unwrap();
        assert_eq!( args.folder, Some( PathBuf::from( "tunes" ) ) );
        assert_eq!( args.track.as_deref(), Some( "3" ) );
        assert_eq!( args.tick_ms, Some( 50 ) );
        assert!( args.no_next );
    }


    #[test]
    fn test_everything_is_optional() {
        let args = Args::try_parse_from([ "termtune" ]).unwrap();
        assert!( args.folder.is_none() );
        assert!( args.track.is_none() );
        assert!( !args.no_next );
    }
}
