//! Playback session controller
//!
//! `Session` owns which track is current and serializes every transition
//! (commands from the input thread, auto-advance from the render thread)
//! behind one lock together with the engine handle. Both loops only ever go
//! through the operations defined here.

use std::sync::atomic::{ AtomicBool, Ordering };
use std::sync::{ Mutex, MutexGuard, PoisonError };
use std::time::{ Duration, Instant };

use thiserror::Error;

use crate::command::Command;
use crate::display::{ self, PlaybackMode, StatusLabel };
use crate::engine::{ EngineError, EngineStatus, PlaybackEngine };
use crate::library::{ Track, TrackList };
use crate::marquee::{ Marquee, DEFAULT_SCROLL_DELAY };


/// Errors returned by session transitions.
#[derive( Debug, Error )]
pub enum SessionError {
    #[error( "Failed to open {name}: {source}" )]
    Open {
        name: String,
        #[source]
        source: EngineError,
    },

    #[error( "Failed to start {name}: {source}" )]
    Playback {
        name: String,
        #[source]
        source: EngineError,
    },

    #[error( "Session has ended" )]
    Quit,
}


/// Tunables for a session.
#[derive( Debug, Clone )]
pub struct SessionConfig {
    /// Distance covered by one forward/backward seek.
    pub seek_step: Duration,
    pub marquee_delay: Duration,
    /// Columns available to the scrolling title.
    pub title_width: usize,
    /// Columns available to the next-track name before it is truncated.
    pub next_width: usize,
    pub show_next_track: bool,
    /// How long a notice stays on screen.
    pub notice_duration: Duration,
}


impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seek_step: Duration::from_secs( 10 ),
            marquee_delay: DEFAULT_SCROLL_DELAY,
            title_width: 26,
            next_width: 26,
            show_next_track: true,
            notice_duration: Duration::from_secs( 3 ),
        }
    }
}


/// Whether the command loop should keep reading.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum Flow {
    Continue,
    Quit,
}


#[derive( Debug, Clone )]
struct Notice {
    message: String,
    expires_at: Instant,
}


/// Everything one dashboard frame shows, captured under a single lock.
#[derive( Debug, Clone, PartialEq )]
pub struct Snapshot {
    /// Marquee-rendered title of the current track.
    pub title: String,
    pub status: StatusLabel,
    pub mode: PlaybackMode,
    pub elapsed: Duration,
    pub total: Duration,
    /// Truncated name of the track that plays next, if enabled.
    pub next_track: Option<String>,
    pub notice: Option<String>,
    pub index: usize,
    pub track_count: usize,
}


impl Snapshot {
    /// `M:SS / M:SS`.
    pub fn time_label( &self ) -> String {
        format!( "{} / {}", display::format_time( self.elapsed ), display::format_time( self.total ) )
    }


    pub fn progress_bar( &self, width: usize ) -> String {
        display::progress_bar( self.elapsed, self.total, width )
    }
}


struct SessionState<E> {
    engine: E,
    current_index: usize,
    paused: bool,
    /// Set by an explicit stop or a failed auto-advance; a Stopped engine
    /// is then not treated as a finished track.
    auto_advance_held: bool,
    mode: PlaybackMode,
    marquee: Marquee,
    notice: Option<Notice>,
}


/// The playback session shared by the render and command loops.
pub struct Session<E: PlaybackEngine> {
    tracks: TrackList,
    config: SessionConfig,
    state: Mutex<SessionState<E>>,
    stop_requested: AtomicBool,
}


/// Normalizes a possibly out-of-range target: below zero wraps to the last
/// track, past the end wraps to the first.
pub fn wrap_index( target: isize, len: usize ) -> usize {
    if target < 0 {
        len - 1
    } else if target as usize >= len {
        0
    } else {
        target as usize
    }
}


impl<E: PlaybackEngine> Session<E> {
    /// Creates a session positioned on `start_index` without starting playback.
    pub fn new( tracks: TrackList, engine: E, config: SessionConfig, start_index: usize ) -> Self {
        let current_index = start_index % tracks.len();
        let marquee = Marquee::new(
            &tracks[ current_index ].display_name,
            config.title_width,
            config.marquee_delay,
            Instant::now(),
        );

        Self {
            state: Mutex::new( SessionState {
                engine,
                current_index,
                paused: false,
                auto_advance_held: false,
                mode: PlaybackMode::default(),
                marquee,
                notice: None,
            }),
            tracks,
            config,
            stop_requested: AtomicBool::new( false ),
        }
    }


    /// Creates a session and starts playing `start_index`.
    ///
    /// Failing to open the first track is returned to the caller, which
    /// treats it as fatal.
    pub fn start( tracks: TrackList, engine: E, config: SessionConfig, start_index: usize ) -> Result<Self, SessionError> {
        let session = Self::new( tracks, engine, config, start_index );
        session.load_and_play( start_index as isize )?;
        Ok( session )
    }


    fn lock( &self ) -> MutexGuard<'_, SessionState<E>> {
        self.state.lock().unwrap_or_else( PoisonError::into_inner )
    }


    /// Opens the track at `target` (wrapped) and starts it.
    ///
    /// On failure nothing changes and the previous track keeps playing.
    pub fn load_and_play( &self, target: isize ) -> Result<(), SessionError> {
        let mut state = self.lock();
        if self.is_quit() {
            return Err( SessionError::Quit );
        }
        self.load_locked( &mut state, target )
    }


    fn load_locked( &self, state: &mut SessionState<E>, target: isize ) -> Result<(), SessionError> {
        let index = wrap_index( target, self.tracks.len() );
        let track = &self.tracks[ index ];

        if let Err( source ) = state.engine.open( &track.path ) {
            tracing::warn!( "Could not open {:?}: {}", track.path, source );
            return Err( SessionError::Open { name: track.display_name.clone(), source } );
        }

        state.current_index = index;
        state.paused = false;
        state.auto_advance_held = false;
        state.marquee = Marquee::new(
            &track.display_name,
            self.config.title_width,
            self.config.marquee_delay,
            Instant::now(),
        );

        if let Err( source ) = state.engine.play() {
            tracing::warn!( "Could not start {:?}: {}", track.path, source );
            state.auto_advance_held = true;
            return Err( SessionError::Playback { name: track.display_name.clone(), source } );
        }

        tracing::info!( "Playing track {}: {}", index + 1, track.display_name );
        Ok(())
    }


    /// Pauses when playing, resumes when paused.
    pub fn toggle_play_pause( &self ) {
        let mut state = self.lock();
        if self.is_quit() {
            return;
        }

        if !state.paused {
            state.engine.pause();
            state.paused = true;
            tracing::info!( "Paused" );
        } else {
            if let Err( e ) = state.engine.play() {
                tracing::warn!( "Resume failed: {}", e );
                self.set_notice( &mut state, format!( "Resume failed: {}", e ) );
            }
            state.paused = false;
            state.auto_advance_held = false;
            tracing::info!( "Resumed" );
        }
    }


    /// Stops and rewinds the current track without moving to another one.
    pub fn stop( &self ) {
        let mut state = self.lock();
        if self.is_quit() {
            return;
        }

        state.engine.stop();
        state.paused = false;
        state.auto_advance_held = true;
        tracing::info!( "Stopped" );
    }


    /// Moves the playing position by `delta_secs`, clamped to the track.
    pub fn seek( &self, delta_secs: i64 ) {
        let mut state = self.lock();
        if self.is_quit() {
            return;
        }

        let offset = state.engine.offset();
        let duration = state.engine.duration();
        let step = Duration::from_secs( delta_secs.unsigned_abs() );
        let target = if delta_secs >= 0 {
            offset.saturating_add( step )
        } else {
            offset.saturating_sub( step )
        }
        .min( duration );

        tracing::debug!( "Seeking {:+}s: {:?} -> {:?}", delta_secs, offset, target );
        if let Err( e ) = state.engine.set_offset( target ) {
            tracing::warn!( "Seek failed: {}", e );
            self.set_notice( &mut state, format!( "Seek failed: {}", e ) );
        }
    }


    /// Switches to the neighbouring track in `direction` (+1 or -1), wrapping
    /// around the ends of the list.
    pub fn advance( &self, direction: isize ) -> Result<(), SessionError> {
        let mut state = self.lock();
        if self.is_quit() {
            return Err( SessionError::Quit );
        }
        self.advance_locked( &mut state, direction )
    }


    fn advance_locked( &self, state: &mut SessionState<E>, direction: isize ) -> Result<(), SessionError> {
        let target = state.current_index as isize + direction;
        let result = self.load_locked( state, target );
        if let Err( ref e ) = result {
            self.set_notice( state, e.to_string() );
        }
        result
    }


    /// Stops playback and ends the session. Nothing has an effect afterwards.
    pub fn request_quit( &self ) {
        let mut state = self.lock();
        if self.is_quit() {
            return;
        }

        state.engine.stop();
        self.stop_requested.store( true, Ordering::SeqCst );
        tracing::info!( "Quit requested" );
    }


    /// Moves to the next track when the current one has finished on its own.
    ///
    /// @returns true if a new track was started
    pub fn poll_auto_advance( &self ) -> bool {
        let mut state = self.lock();
        self.poll_locked( &mut state )
    }


    fn poll_locked( &self, state: &mut SessionState<E> ) -> bool {
        if self.is_quit() || state.paused || state.auto_advance_held {
            return false;
        }
        if state.engine.status() != EngineStatus::Stopped {
            return false;
        }

        tracing::info!( "Track finished: {}", self.tracks[ state.current_index ].display_name );
        match self.advance_locked( state, 1 ) {
            Ok(()) => true,
            Err( e ) => {
                tracing::warn!( "Auto-advance failed: {}", e );
                state.auto_advance_held = true;
                false
            }
        }
    }


    /// Applies one user command.
    pub fn apply( &self, command: Command ) -> Flow {
        if self.is_quit() {
            return Flow::Quit;
        }

        let step = self.config.seek_step.as_secs() as i64;
        match command {
            Command::TogglePlayPause => self.toggle_play_pause(),
            Command::Stop => self.stop(),
            Command::SeekForward => self.seek( step ),
            Command::SeekBackward => self.seek( -step ),
            Command::Next => {
                if let Err( e ) = self.advance( 1 ) {
                    tracing::debug!( "Next ignored: {}", e );
                }
            }
            Command::Previous => {
                if let Err( e ) = self.advance( -1 ) {
                    tracing::debug!( "Previous ignored: {}", e );
                }
            }
            Command::Quit => {
                self.request_quit();
                return Flow::Quit;
            }
        }

        Flow::Continue
    }


    /// Captures the values for one frame.
    pub fn snapshot( &self, now: Instant ) -> Snapshot {
        let mut state = self.lock();
        self.snapshot_locked( &mut state, now )
    }


    /// One render tick: auto-advance check, then a snapshot, atomically.
    pub fn tick( &self, now: Instant ) -> Snapshot {
        let mut state = self.lock();
        self.poll_locked( &mut state );
        self.snapshot_locked( &mut state, now )
    }


    fn snapshot_locked( &self, state: &mut SessionState<E>, now: Instant ) -> Snapshot {
        if state.notice.as_ref().is_some_and( |n| now >= n.expires_at ) {
            state.notice = None;
        }

        let len = self.tracks.len();
        let next_track = self.config.show_next_track.then( || {
            let next = &self.tracks[ ( state.current_index + 1 ) % len ];
            display::truncate( &next.display_name, self.config.next_width )
        });

        let total = state.engine.duration();
        let mut elapsed = state.engine.offset();
        if !total.is_zero() {
            elapsed = elapsed.min( total );
        }

        Snapshot {
            title: state.marquee.render( now ),
            status: StatusLabel::derive( state.paused, state.engine.status() ),
            mode: state.mode,
            elapsed,
            total,
            next_track,
            notice: state.notice.as_ref().map( |n| n.message.clone() ),
            index: state.current_index,
            track_count: len,
        }
    }


    fn set_notice( &self, state: &mut SessionState<E>, message: String ) {
        state.notice = Some( Notice {
            message,
            expires_at: Instant::now() + self.config.notice_duration,
        });
    }


    /// True once quit has been requested.
    pub fn is_quit( &self ) -> bool {
        self.stop_requested.load( Ordering::SeqCst )
    }


    pub fn current_index( &self ) -> usize {
        self.lock().current_index
    }


    pub fn current_track( &self ) -> Track {
        self.tracks[ self.current_index() ].clone()
    }


    pub fn is_paused( &self ) -> bool {
        self.lock().paused
    }


    pub fn tracks( &self ) -> &TrackList {
        &self.tracks
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use crate::engine::fake::FakeEngine;
    use proptest::prelude::*;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::thread;


    fn tracks( names: &[&str] ) -> TrackList {
        TrackList::new( names.iter().map( |n| Track::new( PathBuf::from( n ) ) ).collect() ).unwrap()
    }


    fn started( names: &[&str], start: usize ) -> ( Session<FakeEngine>, FakeEngine ) {
        let engine = FakeEngine::with_default_duration( 180 );
        let session = Session::start( tracks( names ), engine.clone(), SessionConfig::default(), start ).unwrap();
        ( session, engine )
    }


    #[test]
    fn test_start_plays_selected_track() {
        let ( session, engine ) = started( &[ "a.mp3", "b.mp3", "c.mp3" ], 1 );
        assert_eq!( session.current_index(), 1 );
        assert_eq!( engine.loaded(), Some( PathBuf::from( "b.mp3" ) ) );
        assert_eq!( engine.current_status(), EngineStatus::Playing );
        assert!( !session.is_paused() );
    }


    #[test]
    fn test_start_fails_when_track_cannot_open() {
        let engine = FakeEngine::with_default_duration( 180 );
        engine.break_path( "a.mp3" );
        let result = Session::start( tracks( &[ "a.mp3" ] ), engine, SessionConfig::default(), 0 );
        assert!( matches!( result, Err( SessionError::Open { .. } ) ) );
    }


    #[test]
    fn test_wrap_index() {
        assert_eq!( wrap_index( -1, 3 ), 2 );
        assert_eq!( wrap_index( 3, 3 ), 0 );
        assert_eq!( wrap_index( 1, 3 ), 1 );
        assert_eq!( wrap_index( 1, 1 ), 0 );
        assert_eq!( wrap_index( -1, 1 ), 0 );
    }


    #[test]
    fn test_advance_wraps_at_both_ends() {
        let ( session, _ ) = started( &[ "a.mp3", "b.mp3", "c.mp3" ], 2 );
        session.advance( 1 ).unwrap();
        assert_eq!( session.current_index(), 0 );
        session.advance( -1 ).unwrap();
        assert_eq!( session.current_index(), 2 );
    }


    #[test]
    fn test_advance_with_single_track_stays_put() {
        let ( session, engine ) = started( &[ "only.ogg" ], 0 );
        session.advance( 1 ).unwrap();
        assert_eq!( session.current_index(), 0 );
        session.advance( -1 ).unwrap();
        assert_eq!( session.current_index(), 0 );
        assert_eq!( engine.opens(), 3 );
    }


    #[test]
    fn test_advance_clears_pause() {
        let ( session, engine ) = started( &[ "a.mp3", "b.mp3" ], 0 );
        session.toggle_play_pause();
        assert!( session.is_paused() );
        session.advance( 1 ).unwrap();
        assert!( !session.is_paused() );
        assert_eq!( engine.current_status(), EngineStatus::Playing );
    }


    #[test]
    fn test_failed_advance_keeps_current_track_playing() {
        let ( session, engine ) = started( &[ "a.mp3", "b.mp3", "c.mp3" ], 0 );
        engine.break_path( "b.mp3" );
        engine.advance_clock( Duration::from_secs( 30 ) );

        let result = session.advance( 1 );
        assert!( matches!( result, Err( SessionError::Open { .. } ) ) );
        assert_eq!( session.current_index(), 0 );
        assert_eq!( engine.loaded(), Some( PathBuf::from( "a.mp3" ) ) );
        assert_eq!( engine.current_status(), EngineStatus::Playing );
        assert_eq!( engine.current_offset(), Duration::from_secs( 30 ) );

        let snap = session.snapshot( Instant::now() );
        assert!( snap.notice.unwrap().contains( "b.mp3" ) );
    }


    #[test]
    fn test_toggle_twice_restores_pause_flag() {
        let ( session, engine ) = started( &[ "a.mp3" ], 0 );
        session.toggle_play_pause();
        assert!( session.is_paused() );
        assert_eq!( engine.current_status(), EngineStatus::Paused );
        session.toggle_play_pause();
        assert!( !session.is_paused() );
        assert_eq!( engine.current_status(), EngineStatus::Playing );
    }


    #[test]
    fn test_stop_keeps_index_and_does_not_auto_advance() {
        let ( session, engine ) = started( &[ "a.mp3", "b.mp3" ], 0 );
        session.stop();
        assert_eq!( engine.current_status(), EngineStatus::Stopped );
        assert!( !session.poll_auto_advance() );
        assert_eq!( session.current_index(), 0 );
        assert_eq!( session.snapshot( Instant::now() ).status, StatusLabel::Stopped );
    }


    #[test]
    fn test_play_after_stop_restarts_and_rearms_auto_advance() {
        let ( session, engine ) = started( &[ "a.mp3", "b.mp3" ], 0 );
        session.stop();
        session.toggle_play_pause();
        assert_eq!( session.snapshot( Instant::now() ).status, StatusLabel::Paused );
        session.toggle_play_pause();
        assert_eq!( engine.current_status(), EngineStatus::Playing );

        engine.advance_clock( Duration::from_secs( 180 ) );
        assert!( session.poll_auto_advance() );
        assert_eq!( session.current_index(), 1 );
    }


    #[test]
    fn test_natural_end_auto_advances_with_wrap() {
        let ( session, engine ) = started( &[ "a.mp3", "b.mp3" ], 1 );
        assert!( !session.poll_auto_advance() );
        engine.advance_clock( Duration::from_secs( 181 ) );
        assert!( session.poll_auto_advance() );
        assert_eq!( session.current_index(), 0 );
        assert_eq!( engine.current_status(), EngineStatus::Playing );
    }


    #[test]
    fn test_paused_session_does_not_auto_advance() {
        let ( session, engine ) = started( &[ "a.mp3", "b.mp3" ], 0 );
        session.toggle_play_pause();
        engine.advance_clock( Duration::from_secs( 500 ) );
        assert!( !session.poll_auto_advance() );
        assert_eq!( session.current_index(), 0 );
    }


    #[test]
    fn test_failed_auto_advance_is_not_retried_every_tick() {
        let ( session, engine ) = started( &[ "a.mp3", "b.mp3", "c.mp3" ], 0 );
        engine.break_path( "b.mp3" );
        engine.advance_clock( Duration::from_secs( 180 ) );

        let opens_before = engine.opens();
        assert!( !session.poll_auto_advance() );
        assert!( !session.poll_auto_advance() );
        assert!( !session.poll_auto_advance() );
        assert_eq!( engine.opens(), opens_before );
        assert_eq!( session.current_index(), 0 );

        // Skipping manually past the broken file works and re-arms auto-advance.
        session.load_and_play( 2 ).unwrap();
        engine.advance_clock( Duration::from_secs( 180 ) );
        assert!( session.poll_auto_advance() );
        assert_eq!( session.current_index(), 0 );
    }


    #[test]
    fn test_seek_moves_and_clamps() {
        let ( session, engine ) = started( &[ "a.mp3" ], 0 );
        engine.advance_clock( Duration::from_secs( 5 ) );

        session.seek( 10 );
        assert_eq!( engine.current_offset(), Duration::from_secs( 15 ) );
        session.seek( -10 );
        assert_eq!( engine.current_offset(), Duration::from_secs( 5 ) );
        session.seek( -10 );
        assert_eq!( engine.current_offset(), Duration::ZERO );
        session.seek( 10_000 );
        assert_eq!( engine.current_offset(), Duration::from_secs( 180 ) );
    }


    #[test]
    fn test_quit_is_absorbing() {
        let ( session, engine ) = started( &[ "a.mp3", "b.mp3", "c.mp3" ], 0 );
        assert_eq!( session.apply( Command::Quit ), Flow::Quit );
        assert!( session.is_quit() );
        assert_eq!( engine.current_status(), EngineStatus::Stopped );

        let opens = engine.opens();
        for cmd in Command::ALL {
            assert_eq!( session.apply( cmd ), Flow::Quit );
        }
        session.toggle_play_pause();
        session.seek( 10 );
        assert!( matches!( session.advance( 1 ), Err( SessionError::Quit ) ) );
        assert!( matches!( session.load_and_play( 1 ), Err( SessionError::Quit ) ) );
        session.tick( Instant::now() );

        assert_eq!( session.current_index(), 0 );
        assert!( !session.is_paused() );
        assert_eq!( engine.opens(), opens );
        assert_eq!( engine.current_status(), EngineStatus::Stopped );
    }


    #[test]
    fn test_snapshot_reports_next_track_and_time() {
        let names = [ "a.mp3", "a remarkably long file name for a song.mp3" ];
        let ( session, engine ) = started( &names, 0 );
        engine.advance_clock( Duration::from_secs( 65 ) );

        let snap = session.snapshot( Instant::now() );
        assert_eq!( snap.title, "a.mp3" );
        assert_eq!( snap.status, StatusLabel::Playing );
        assert_eq!( snap.mode, PlaybackMode::Normal );
        assert_eq!( snap.time_label(), "1:05 / 3:00" );
        assert_eq!( snap.next_track.as_deref(), Some( "a remarkably long file ..." ) );
        assert_eq!( snap.index, 0 );
        assert_eq!( snap.track_count, 2 );
    }


    #[test]
    fn test_snapshot_without_next_track() {
        let engine = FakeEngine::with_default_duration( 60 );
        let config = SessionConfig { show_next_track: false, ..SessionConfig::default() };
        let session = Session::start( tracks( &[ "a.mp3", "b.mp3" ] ), engine, config, 0 ).unwrap();
        assert_eq!( session.snapshot( Instant::now() ).next_track, None );
    }


    #[test]
    fn test_notice_expires() {
        let engine = FakeEngine::with_default_duration( 60 );
        engine.break_path( "b.mp3" );
        let session = Session::start( tracks( &[ "a.mp3", "b.mp3" ] ), engine, SessionConfig::default(), 0 ).unwrap();
        assert!( session.advance( 1 ).is_err() );

        let now = Instant::now();
        assert!( session.snapshot( now ).notice.is_some() );
        assert!( session.snapshot( now + Duration::from_secs( 4 ) ).notice.is_none() );
    }


    #[test]
    fn test_concurrent_commands_and_ticks_keep_index_valid() {
        let ( session, engine ) = started( &[ "a.mp3", "b.mp3", "c.mp3", "d.mp3" ], 0 );
        let session = Arc::new( session );

        let script = [
            Command::Next,
            Command::TogglePlayPause,
            Command::SeekForward,
            Command::Previous,
            Command::Stop,
            Command::SeekBackward,
        ];
        let commands = {
            let session = Arc::clone( &session );
            thread::spawn( move || {
                for i in 0..500 {
                    session.apply( script[ i % script.len() ] );
                }
            })
        };

        for _ in 0..500 {
            engine.advance_clock( Duration::from_secs( 7 ) );
            let snap = session.tick( Instant::now() );
            assert!( snap.index < snap.track_count );
            assert!( snap.elapsed <= snap.total );
        }

        commands.join().unwrap();
        assert!( session.current_index() < 4 );
        assert!( !session.is_quit() );
    }


    proptest! {
        #[test]
        fn prop_advance_follows_modular_arithmetic(
            len in 1usize..12,
            start in 0usize..12,
            moves in prop::collection::vec( prop::bool::ANY, 0..40 ),
        ) {
            let names: Vec<String> = ( 0..len ).map( |i| format!( "{}.mp3", i ) ).collect();
            let refs: Vec<&str> = names.iter().map( |s| s.as_str() ).collect();
            let start = start % len;
            let ( session, _ ) = started( &refs, start );

            let mut expected = start;
            for forward in moves {
                let direction = if forward { 1 } else { -1 };
                session.advance( direction ).unwrap();
                expected = if forward { ( expected + 1 ) % len } else { ( expected + len - 1 ) % len };
                prop_assert!( session.current_index() < len );
                prop_assert_eq!( session.current_index(), expected );
            }
        }


        #[test]
        fn prop_seek_stays_within_track(
            duration_secs in 0u64..600,
            played_secs in 0u64..600,
            deltas in prop::collection::vec( -100_000i64..100_000, 1..20 ),
        ) {
            let engine = FakeEngine::with_default_duration( duration_secs.max( 1 ) );
            let session = Session::start( tracks( &[ "a.mp3" ] ), engine.clone(), SessionConfig::default(), 0 ).unwrap();
            engine.advance_clock( Duration::from_secs( played_secs % duration_secs.max( 1 ) ) );

            for delta in deltas {
                session.seek( delta );
                let offset = engine.current_offset();
                prop_assert!( offset <= Duration::from_secs( duration_secs.max( 1 ) ) );
            }
        }
    }

}
