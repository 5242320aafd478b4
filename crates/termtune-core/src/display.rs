//! Formatting of the values shown on the dashboard.

use std::fmt;
use std::time::Duration;

use crate::engine::EngineStatus;


pub const DEFAULT_PROGRESS_WIDTH: usize = 30;

const FILLED: char = '=';
const CURSOR: char = '>';
const EMPTY: char = ' ';
const ELLIPSIS: &str = "...";


/// Status shown to the user.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum StatusLabel {
    Playing,
    Paused,
    Stopped,
}


impl StatusLabel {
    /// Derives the label from the session's pause flag and the engine status.
    /// The pause flag wins over whatever the engine reports.
    pub fn derive( paused: bool, status: EngineStatus ) -> Self {
        if paused {
            return StatusLabel::Paused;
        }
        match status {
            EngineStatus::Playing => StatusLabel::Playing,
            EngineStatus::Paused | EngineStatus::Stopped => StatusLabel::Stopped,
        }
    }


    pub fn as_str( &self ) -> &'static str {
        match self {
            StatusLabel::Playing => "Playing",
            StatusLabel::Paused => "Paused",
            StatusLabel::Stopped => "Stopped",
        }
    }
}


impl fmt::Display for StatusLabel {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        f.write_str( self.as_str() )
    }
}


/// Playback ordering mode. Only sequential playback exists today.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Default )]
pub enum PlaybackMode {
    #[default]
    Normal,
}


impl fmt::Display for PlaybackMode {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        match self {
            PlaybackMode::Normal => f.write_str( "Normal" ),
        }
    }
}


/// Formats a duration as `M:SS`.
pub fn format_time( d: Duration ) -> String {
    let secs = d.as_secs();
    format!( "{}:{:02}", secs / 60, secs % 60 )
}


/// Shortens `text` to at most `width` characters, ending in `...` when cut.
pub fn truncate( text: &str, width: usize ) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub( ELLIPSIS.len() );
    let mut out: String = text.chars().take( keep ).collect();
    out.push_str( ELLIPSIS );
    out
}


/// Fraction of the track already played, in `[0, 1]`.
pub fn progress_ratio( elapsed: Duration, total: Duration ) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    ( elapsed.as_secs_f64() / total.as_secs_f64() ).clamp( 0.0, 1.0 )
}


/// Renders a bracketed bar such as `[=====>    ]` with `width` inner cells.
pub fn progress_bar( elapsed: Duration, total: Duration, width: usize ) -> String {
    let mut bar = String::with_capacity( width + 2 );
    bar.push( '[' );

    if total.is_zero() {
        bar.extend( std::iter::repeat( EMPTY ).take( width ) );
    } else {
        let filled = ( ( progress_ratio( elapsed, total ) * width as f64 ).round() as usize ).min( width );
        for i in 0..width {
            bar.push( match i.cmp( &filled ) {
                std::cmp::Ordering::Less => FILLED,
                std::cmp::Ordering::Equal => CURSOR,
                std::cmp::Ordering::Greater => EMPTY,
            });
        }
    }

    bar.push( ']' );
    bar
}


#[cfg( test )]
mod tests {
    use super::*;


    fn secs( s: u64 ) -> Duration {
        Duration::from_secs( s )
    }


    #[test]
    fn test_format_time() {
        assert_eq!( format_time( Duration::ZERO ), "0:00" );
        assert_eq!( format_time( secs( 9 ) ), "0:09" );
        assert_eq!( format_time( secs( 75 ) ), "1:15" );
        assert_eq!( format_time( Duration::from_millis( 605_900 ) ), "10:05" );
    }


    #[test]
    fn test_truncate() {
        assert_eq!( truncate( "short", 26 ), "short" );
        assert_eq!( truncate( "abcdefghij", 10 ), "abcdefghij" );
        assert_eq!( truncate( "abcdefghijk", 10 ), "abcdefg..." );
        assert_eq!( truncate( "ééééé", 4 ), "é..." );
    }


    #[test]
    fn test_progress_bar_at_start_has_cursor_first() {
        let bar = progress_bar( Duration::ZERO, secs( 200 ), 10 );
        assert_eq!( bar, "[>         ]" );
    }


    #[test]
    fn test_progress_bar_at_end_is_full() {
        let bar = progress_bar( secs( 200 ), secs( 200 ), 10 );
        assert_eq!( bar, "[==========]" );
    }


    #[test]
    fn test_progress_bar_rounds() {
        assert_eq!( progress_bar( secs( 50 ), secs( 100 ), 10 ), "[=====>    ]" );
        assert_eq!( progress_bar( secs( 36 ), secs( 100 ), 10 ), "[====>     ]" );
    }


    #[test]
    fn test_progress_bar_zero_total_is_empty() {
        assert_eq!( progress_bar( secs( 5 ), Duration::ZERO, 6 ), "[      ]" );
    }


    #[test]
    fn test_progress_bar_elapsed_past_total_is_clamped() {
        assert_eq!( progress_bar( secs( 300 ), secs( 100 ), 4 ), "[====]" );
    }


    #[test]
    fn test_status_label_pause_flag_wins() {
        assert_eq!( StatusLabel::derive( true, EngineStatus::Playing ), StatusLabel::Paused );
        assert_eq!( StatusLabel::derive( true, EngineStatus::Stopped ), StatusLabel::Paused );
        assert_eq!( StatusLabel::derive( false, EngineStatus::Playing ), StatusLabel::Playing );
        assert_eq!( StatusLabel::derive( false, EngineStatus::Stopped ), StatusLabel::Stopped );
    }
}
