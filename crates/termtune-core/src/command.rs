//! Single-key playback commands.
//!
//! Commands are typed one character at a time while the dashboard is
//! showing and are applied to the session immediately.


/// A playback command typed by the user.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum Command {
    TogglePlayPause,
    Stop,
    SeekForward,
    SeekBackward,
    Next,
    Previous,
    Quit,
}


impl Command {
    /// All commands, in legend order.
    pub const ALL: [Command; 7] = [
        Command::TogglePlayPause,
        Command::Next,
        Command::Stop,
        Command::Previous,
        Command::SeekForward,
        Command::Quit,
        Command::SeekBackward,
    ];


    /// Maps a typed character to a command, ignoring case.
    ///
    /// @param key - The character read from the terminal
    ///
    /// @returns The command, or None for keys that mean nothing
    pub fn from_key( key: char ) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'p' => Some( Command::TogglePlayPause ),
            's' => Some( Command::Stop ),
            'f' => Some( Command::SeekForward ),
            'r' => Some( Command::SeekBackward ),
            'n' => Some( Command::Next ),
            'b' => Some( Command::Previous ),
            'q' => Some( Command::Quit ),
            _ => None,
        }
    }


    /// The key that triggers this command, as shown in the legend.
    pub fn key( &self ) -> char {
        match self {
            Command::TogglePlayPause => 'P',
            Command::Stop => 'S',
            Command::SeekForward => 'F',
            Command::SeekBackward => 'R',
            Command::Next => 'N',
            Command::Previous => 'B',
            Command::Quit => 'Q',
        }
    }


    /// Short label for the control legend.
    ///
    /// @param seek_step_secs - Seek distance, shown on the seek entries
    pub fn label( &self, seek_step_secs: u64 ) -> String {
        match self {
            Command::TogglePlayPause => "Play/Pause".to_string(),
            Command::Stop => "Stop".to_string(),
            Command::SeekForward => format!( "Forward (+{}s)", seek_step_secs ),
            Command::SeekBackward => format!( "Backward (-{}s)", seek_step_secs ),
            Command::Next => "Next Track".to_string(),
            Command::Previous => "Previous Track".to_string(),
            Command::Quit => "Quit".to_string(),
        }
    }
}


/// Legend entries in the form `[P] Play/Pause`, in display order.
pub fn legend( seek_step_secs: u64 ) -> Vec<String> {
    Command::ALL
        .iter()
        .map( |cmd| format!( "[{}] {}", cmd.key(), cmd.label( seek_step_secs ) ) )
        .collect()
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_keys_are_case_insensitive() {
        for ( lower, upper, cmd ) in [
            ( 'p', 'P', Command::TogglePlayPause ),
            ( 's', 'S', Command::Stop ),
            ( 'f', 'F', Command::SeekForward ),
            ( 'r', 'R', Command::SeekBackward ),
            ( 'n', 'N', Command::Next ),
            ( 'b', 'B', Command::Previous ),
            ( 'q', 'Q', Command::Quit ),
        ] {
            assert_eq!( Command::from_key( lower ), Some( cmd ) );
            assert_eq!( Command::from_key( upper ), Some( cmd ) );
        }
    }


    #[test]
    fn test_unknown_keys_are_ignored() {
        for key in [ 'x', ' ', '1', '\n', 'é' ] {
            assert_eq!( Command::from_key( key ), None );
        }
    }


    #[test]
    fn test_key_round_trips_through_from_key() {
        for cmd in Command::ALL {
            assert_eq!( Command::from_key( cmd.key() ), Some( cmd ) );
        }
    }


    #[test]
    fn test_legend_mentions_seek_step() {
        let legend = legend( 10 );
        assert_eq!( legend.len(), 7 );
        assert_eq!( legend[ 0 ], "[P] Play/Pause" );
        assert!( legend.contains( &"[F] Forward (+10s)".to_string() ) );
        assert!( legend.contains( &"[R] Backward (-10s)".to_string() ) );
    }
}
