//! Application settings management
//!
//! Persistent defaults for the music folder and dashboard tunables. Command
//! line flags override these.

use std::fs;
use std::path::{ Path, PathBuf };
use std::time::Duration;

use serde::{ Deserialize, Serialize };

use termtune_core::SessionConfig;


/// Application settings.
#[derive( Debug, Clone, PartialEq, Serialize, Deserialize )]
#[serde( default )]
pub struct Settings {
    /// Folder scanned when none is given on the command line
    pub default_folder: PathBuf,

    /// Dashboard refresh interval
    pub tick_interval_ms: u64,

    /// Seconds skipped by F and R
    pub seek_step_secs: u64,

    /// Time between marquee steps for long titles
    pub marquee_delay_ms: u64,

    /// Columns for the title and next-track rows
    pub title_width: usize,

    /// Cells inside the progress bar brackets
    pub progress_width: usize,

    pub show_next_track: bool,

    /// Seconds a notice stays visible
    pub notice_secs: u64,
}


impl Default for Settings {
    fn default() -> Self {
        Self {
            default_folder: PathBuf::from( "music" ),
            tick_interval_ms: 100,
            seek_step_secs: 10,
            marquee_delay_ms: 200,
            title_width: 26,
            progress_width: termtune_core::display::DEFAULT_PROGRESS_WIDTH,
            show_next_track: true,
            notice_secs: 3,
        }
    }
}


impl Settings {
    /// Returns the path to the settings file.
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map( |p| p.join( "termtune" ).join( "settings.json" ) )
    }


    /// Loads settings from the user config dir, or returns defaults.
    pub fn load() -> Self {
        match Self::settings_path() {
            Some( path ) => Self::load_from( &path ),
            None => Self::default(),
        }
    }


    /// Loads settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_from( path: &Path ) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string( path ) {
            Ok( contents ) => serde_json::from_str( &contents ).unwrap_or_else( |e| {
                tracing::warn!( "Ignoring malformed settings {:?}: {}", path, e );
                Self::default()
            }),
            Err( e ) => {
                tracing::warn!( "Failed to read settings: {}", e );
                Self::default()
            }
        }
    }


    /// Writes settings to `path`, creating its directory if needed.
    pub fn save_to( &self, path: &Path ) -> anyhow::Result<()> {
        if let Some( parent ) = path.parent() {
            fs::create_dir_all( parent )?;
        }
        fs::write( path, serde_json::to_string_pretty( self )? )?;
        Ok(())
    }


    pub fn tick_interval( &self ) -> Duration {
        Duration::from_millis( self.tick_interval_ms.max( 1 ) )
    }


    pub fn to_session_config( &self ) -> SessionConfig {
        SessionConfig {
            seek_step: Duration::from_secs( self.seek_step_secs ),
            marquee_delay: Duration::from_millis( self.marquee_delay_ms ),
            title_width: self.title_width,
            next_width: self.title_width,
            show_next_track: self.show_next_track,
            notice_duration: Duration::from_secs( self.notice_secs ),
        }
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!( Settings::load_from( &dir.path().join( "nope.json" ) ), Settings::default() );
    }


    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "settings.json" );
        fs::write( &path, r#"{ "seek_step_secs": 5, "show_next_track": false }"# ).unwrap();

        let settings = Settings::load_from( &path );
        assert_eq!( settings.seek_step_secs, 5 );
        assert!( !settings.show_next_track );
        assert_eq!( settings.default_folder, PathBuf::from( "music" ) );
        assert_eq!( settings.tick_interval_ms, 100 );
    }


    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "settings.json" );
        fs::write( &path, "{ not json" ).unwrap();
        assert_eq!( Settings::load_from( &path ), Settings::default() );
    }


    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "nested" ).join( "settings.json" );
        let settings = Settings { title_width: 40, notice_secs: 7, ..Settings::default() };

        settings.save_to( &path ).unwrap();
        assert_eq!( Settings::load_from( &path ), settings );
    }


    #[test]
    fn test_session_config_conversion() {
        let config = Settings { seek_step_secs: 15, title_width: 30, ..Settings::default() }.to_session_config();
        assert_eq!( config.seek_step, Duration::from_secs( 15 ) );
        assert_eq!( config.marquee_delay, Duration::from_millis( 200 ) );
        assert_eq!( config.title_width, 30 );
        assert_eq!( config.next_width, 30 );
        assert!( config.show_next_track );
    }
}
