//! Render and command loop drivers.
//!
//! Both loops are frontend-agnostic: the render loop hands each snapshot to
//! a sink, the command loop pulls characters from a [`KeySource`]. The CLI
//! plugs the terminal into both.

use std::thread;
use std::time::{ Duration, Instant };

use crate::command::Command;
use crate::engine::PlaybackEngine;
use crate::session::{ Flow, Session, Snapshot };


/// Default render cadence.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis( 100 );

/// How long the command loop waits for a key before re-checking for quit.
pub const KEY_POLL_INTERVAL: Duration = Duration::from_millis( 250 );


/// Source of typed characters.
pub trait KeySource {
    type Error;

    /// Waits up to `timeout` for one character. `Ok(None)` means nothing was
    /// typed in time.
    fn next_key( &mut self, timeout: Duration ) -> Result<Option<char>, Self::Error>;
}


impl<F, E> KeySource for F
where
    F: FnMut( Duration ) -> Result<Option<char>, E>,
{
    type Error = E;


    fn next_key( &mut self, timeout: Duration ) -> Result<Option<char>, E> {
        self( timeout )
    }
}


/// Redraws on a fixed cadence until the session quits.
///
/// Each tick runs the auto-advance check and captures a snapshot atomically,
/// then hands the snapshot to `emit` outside the session lock. If `emit`
/// fails the session is ended so the command loop stops too.
pub fn run_render_loop<E, F, Err>( session: &Session<E>, interval: Duration, mut emit: F ) -> Result<(), Err>
where
    E: PlaybackEngine,
    F: FnMut( &Snapshot ) -> Result<(), Err>,
{
    tracing::debug!( "Render loop: starting ({:?} interval)", interval );

    while !session.is_quit() {
        let snapshot = session.tick( Instant::now() );
        if let Err( e ) = emit( &snapshot ) {
            session.request_quit();
            return Err( e );
        }
        thread::sleep( interval );
    }

    tracing::debug!( "Render loop: exiting" );
    Ok(())
}


/// Reads commands until the user quits or the session ends elsewhere.
///
/// Unknown characters are ignored. A failing key source ends the session.
pub fn run_command_loop<E, K>( session: &Session<E>, keys: &mut K ) -> Result<(), K::Error>
where
    E: PlaybackEngine,
    K: KeySource + ?Sized,
{
    while !session.is_quit() {
        let key = match keys.next_key( KEY_POLL_INTERVAL ) {
            Ok( Some( key ) ) => key,
            Ok( None ) => continue,
            Err( e ) => {
                session.request_quit();
                return Err( e );
            }
        };

        let Some( command ) = Command::from_key( key ) else {
            tracing::debug!( "Ignoring key {:?}", key );
            continue;
        };

        tracing::debug!( "Command: {:?}", command );
        if session.apply( command ) == Flow::Quit {
            break;
        }
    }

    tracing::debug!( "Command loop: exiting" );
    Ok(())
}


#[cfg( test )]
mod tests {
    use super::*;
    use crate::engine::fake::FakeEngine;
    use crate::engine::EngineStatus;
    use crate::library::{ Track, TrackList };
    use crate::session::SessionConfig;
    use std::collections::VecDeque;
    use std::convert::Infallible;
    use std::path::PathBuf;
    use std::sync::Arc;


    fn session( names: &[&str], start: usize ) -> ( Session<FakeEngine>, FakeEngine ) {
        let list = TrackList::new( names.iter().map( |n| Track::new( PathBuf::from( n ) ) ).collect() ).unwrap();
        let engine = FakeEngine::with_default_duration( 120 );
        let session = Session::start( list, engine.clone(), SessionConfig::default(), start ).unwrap();
        ( session, engine )
    }


    #[test]
    fn test_three_nexts_wrap_back_to_start_then_quit_freezes() {
        let ( session, engine ) = session( &[ "a.mp3", "b.mp3", "c.mp3" ], 1 );
        let mut script: VecDeque<char> = "NnNxQnbp".chars().collect();
        let mut seen = vec![ session.current_index() ];

        let mut keys = |_: Duration| -> Result<Option<char>, Infallible> {
            let key = script.pop_front();
            if matches!( key, Some( 'N' | 'n' ) ) {
                // Index observed before the key is applied.
                seen.push( session.current_index() );
            }
            Ok( key )
        };
        run_command_loop( &session, &mut keys ).unwrap();

        seen.push( session.current_index() );
        assert_eq!( seen, vec![ 1, 1, 2, 0, 1 ] );
        assert!( session.is_quit() );
        assert_eq!( engine.current_status(), EngineStatus::Stopped );
        assert_eq!( engine.loaded(), Some( PathBuf::from( "b.mp3" ) ) );
        assert!( !session.is_paused() );
    }


    #[test]
    fn test_command_loop_ignores_unknown_keys_and_timeouts() {
        let ( session, _ ) = session( &[ "a.mp3", "b.mp3" ], 0 );
        let mut script: VecDeque<Option<char>> = vec![ None, Some( 'z' ), None, Some( '?' ), Some( 'q' ) ].into();

        let mut keys = |_: Duration| -> Result<Option<char>, Infallible> {
            Ok( script.pop_front().flatten() )
        };
        run_command_loop( &session, &mut keys ).unwrap();

        assert_eq!( session.current_index(), 0 );
        assert!( session.is_quit() );
    }


    #[test]
    fn test_command_loop_error_ends_session() {
        let ( session, _ ) = session( &[ "a.mp3" ], 0 );
        let mut keys = |_: Duration| -> Result<Option<char>, &'static str> { Err( "stdin closed" ) };
        assert_eq!( run_command_loop( &session, &mut keys ), Err( "stdin closed" ) );
        assert!( session.is_quit() );
    }


    #[test]
    fn test_command_loop_returns_when_session_already_quit() {
        let ( session, _ ) = session( &[ "a.mp3" ], 0 );
        session.request_quit();
        let mut keys = |_: Duration| -> Result<Option<char>, Infallible> {
            panic!( "no key should be read after quit" )
        };
        run_command_loop( &session, &mut keys ).unwrap();
    }


    #[test]
    fn test_render_loop_auto_advances_and_stops_on_quit() {
        let ( session, engine ) = session( &[ "a.mp3", "b.mp3" ], 0 );
        let session = Arc::new( session );

        let render = {
            let session = Arc::clone( &session );
            thread::spawn( move || {
                let mut frames = Vec::new();
                run_render_loop( &session, Duration::from_millis( 1 ), |snap: &Snapshot| -> Result<(), Infallible> {
                    frames.push( snap.clone() );
                    Ok(())
                }).unwrap();
                frames
            })
        };

        engine.advance_clock( Duration::from_secs( 121 ) );
        while session.current_index() != 1 {
            thread::sleep( Duration::from_millis( 1 ) );
        }
        session.apply( Command::Quit );

        let frames = render.join().unwrap();
        assert!( !frames.is_empty() );
        assert!( frames.iter().any( |f| f.index == 1 && f.title == "b.mp3" ) );
    }


    #[test]
    fn test_render_loop_sink_error_requests_quit() {
        let ( session, _ ) = session( &[ "a.mp3" ], 0 );
        let result = run_render_loop( &session, Duration::from_millis( 1 ), |_: &Snapshot| Err( "terminal gone" ) );
        assert_eq!( result, Err( "terminal gone" ) );
        assert!( session.is_quit() );
    }
}
