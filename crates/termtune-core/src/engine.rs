//! Playback engine capability
//!
//! The session controller only talks to audio through this trait, so the
//! real decoder/output stack can be swapped for a simulated one.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;


/// Errors reported by a playback engine.
#[derive( Debug, Error )]
pub enum EngineError {
    #[error( "Failed to open file: {0}" )]
    Open( String ),

    #[error( "Decode error: {0}" )]
    Decode( String ),

    #[error( "Audio output error: {0}" )]
    Output( String ),

    #[error( "No track loaded" )]
    NoTrack,
}


/// Status reported by the engine. Exactly one holds at any instant.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum EngineStatus {
    Stopped,
    Playing,
    Paused,
}


/// Audio playback capability consumed by [`crate::Session`].
///
/// Semantics every implementation must follow:
/// - a successful `open` stops whatever was loaded before and leaves the new
///   track Stopped at offset zero; a failed `open` leaves the previous track
///   and its playback untouched;
/// - `stop` rewinds to offset zero;
/// - `set_offset` only has an effect while Playing or Paused;
/// - when a track plays to its end the status becomes Stopped on its own.
pub trait PlaybackEngine: Send {
    fn open( &mut self, path: &Path ) -> Result<(), EngineError>;

    /// Starts from the beginning when Stopped, resumes when Paused.
    fn play( &mut self ) -> Result<(), EngineError>;

    fn pause( &mut self );

    fn stop( &mut self );

    /// Current playing position; zero while Stopped.
    fn offset( &self ) -> Duration;

    /// Length of the loaded track; zero when unknown or nothing is loaded.
    fn duration( &self ) -> Duration;

    fn set_offset( &mut self, offset: Duration ) -> Result<(), EngineError>;

    fn status( &self ) -> EngineStatus;
}


#[cfg( test )]
pub( crate ) mod fake {
    //! Deterministic engine whose clock only moves when a test advances it.

    use std::collections::{ HashMap, HashSet };
    use std::path::{ Path, PathBuf };
    use std::sync::{ Arc, Mutex };
    use std::time::Duration;

    use super::{ EngineError, EngineStatus, PlaybackEngine };


    #[derive( Debug, Default )]
    pub struct FakeState {
        pub durations: HashMap<PathBuf, Duration>,
        pub unopenable: HashSet<PathBuf>,
        pub loaded: Option<PathBuf>,
        pub status: Option<EngineStatus>,
        pub offset: Duration,
        pub opens: usize,
    }


    /// Cloning shares the state, so a test can keep a handle after moving
    /// the engine into a session.
    #[derive( Debug, Clone, Default )]
    pub struct FakeEngine {
        state: Arc<Mutex<FakeState>>,
    }


    impl FakeEngine {
        pub fn new() -> Self {
            Self::default()
        }


        /// Every path opens with a duration of `secs`, unless marked broken.
        pub fn with_default_duration( secs: u64 ) -> Self {
            let engine = Self::new();
            engine.state.lock().unwrap().durations.insert( PathBuf::new(), Duration::from_secs( secs ) );
            engine
        }


        pub fn set_duration( &self, path: impl Into<PathBuf>, duration: Duration ) {
            self.state.lock().unwrap().durations.insert( path.into(), duration );
        }


        pub fn break_path( &self, path: impl Into<PathBuf> ) {
            self.state.lock().unwrap().unopenable.insert( path.into() );
        }


        pub fn loaded( &self ) -> Option<PathBuf> {
            self.state.lock().unwrap().loaded.clone()
        }


        pub fn opens( &self ) -> usize {
            self.state.lock().unwrap().opens
        }


        pub fn current_status( &self ) -> EngineStatus {
            self.state.lock().unwrap().status.unwrap_or( EngineStatus::Stopped )
        }


        pub fn current_offset( &self ) -> Duration {
            self.state.lock().unwrap().offset
        }


        /// Moves simulated time forward; a playing track that reaches its end
        /// stops and rewinds.
        pub fn advance_clock( &self, elapsed: Duration ) {
            let mut state = self.state.lock().unwrap();
            if state.status != Some( EngineStatus::Playing ) {
                return;
            }
            let duration = Self::duration_of( &state );
            state.offset += elapsed;
            if state.offset >= duration {
                state.offset = Duration::ZERO;
                state.status = Some( EngineStatus::Stopped );
            }
        }


        fn duration_of( state: &FakeState ) -> Duration {
            let Some( path ) = state.loaded.as_ref() else {
                return Duration::ZERO;
            };
            state.durations.get( path )
                .or_else( || state.durations.get( Path::new( "" ) ) )
                .copied()
                .unwrap_or( Duration::ZERO )
        }
    }


    impl PlaybackEngine for FakeEngine {
        fn open( &mut self, path: &Path ) -> Result<(), EngineError> {
            let mut state = self.state.lock().unwrap();
            if state.unopenable.contains( path ) {
                return Err( EngineError::Open( path.display().to_string() ) );
            }
            state.loaded = Some( path.to_path_buf() );
            state.status = Some( EngineStatus::Stopped );
            state.offset = Duration::ZERO;
            state.opens += 1;
            Ok(())
        }


        fn play( &mut self ) -> Result<(), EngineError> {
            let mut state = self.state.lock().unwrap();
            if state.loaded.is_none() {
                return Err( EngineError::NoTrack );
            }
            state.status = Some( EngineStatus::Playing );
            Ok(())
        }


        fn pause( &mut self ) {
            let mut state = self.state.lock().unwrap();
            if state.status == Some( EngineStatus::Playing ) {
                state.status = Some( EngineStatus::Paused );
            }
        }


        fn stop( &mut self ) {
            let mut state = self.state.lock().unwrap();
            if state.loaded.is_some() {
                state.status = Some( EngineStatus::Stopped );
            }
            state.offset = Duration::ZERO;
        }


        fn offset( &self ) -> Duration {
            self.state.lock().unwrap().offset
        }


        fn duration( &self ) -> Duration {
            Self::duration_of( &self.state.lock().unwrap() )
        }


        fn set_offset( &mut self, offset: Duration ) -> Result<(), EngineError> {
            let mut state = self.state.lock().unwrap();
            match state.status {
                Some( EngineStatus::Playing ) | Some( EngineStatus::Paused ) => {
                    state.offset = offset;
                    Ok(())
                }
                _ => Ok(()),
            }
        }


        fn status( &self ) -> EngineStatus {
            self.current_status()
        }
    }
}
