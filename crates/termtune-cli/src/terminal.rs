//! Terminal setup and key input
//!
//! The dashboard runs in raw mode on the alternate screen. `TerminalGuard`
//! restores the terminal when dropped, including on error paths.

use std::io::{ self, Stdout };
use std::time::Duration;

use crossterm::{
    event::{ self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers },
    terminal::{ disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen },
    ExecutableCommand,
};
use ratatui::prelude::*;


pub type Tui = Terminal<CrosstermBackend<Stdout>>;


/// Owns the ratatui terminal for the lifetime of the dashboard.
pub struct TerminalGuard {
    terminal: Tui,
}


impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err( e ) = io::stdout().execute( EnterAlternateScreen ) {
            let _ = disable_raw_mode();
            return Err( e );
        }

        let mut terminal = Terminal::new( CrosstermBackend::new( io::stdout() ) )?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok( Self { terminal } )
    }


    pub fn terminal( &mut self ) -> &mut Tui {
        &mut self.terminal
    }
}


impl Drop for TerminalGuard {
    fn drop( &mut self ) {
        let _ = self.terminal.show_cursor();
        let _ = disable_raw_mode();
        let _ = io::stdout().execute( LeaveAlternateScreen );
    }
}


/// Maps a key press onto a command character.
///
/// Raw mode swallows SIGINT, so Ctrl+C and Esc both mean quit.
pub fn key_char( key: KeyEvent ) -> Option<char> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char( 'c' ) if key.modifiers.contains( KeyModifiers::CONTROL ) => Some( 'q' ),
        KeyCode::Esc => Some( 'q' ),
        KeyCode::Char( c ) => Some( c ),
        _ => None,
    }
}


/// Waits up to `timeout` for one key press.
pub fn read_key( timeout: Duration ) -> io::Result<Option<char>> {
    if !event::poll( timeout )? {
        return Ok( None );
    }
    match event::read()? {
        Event::Key( key ) => Ok( key_char( key ) ),
        _ => Ok( None ),
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    fn press( code: KeyCode, modifiers: KeyModifiers ) -> KeyEvent {
        KeyEvent::new( code, modifiers )
    }


    #[test]
    fn test_plain_characters_pass_through() {
        assert_eq!( key_char( press( KeyCode::Char( 'n' ), KeyModifiers::NONE ) ), Some( 'n' ) );
        assert_eq!( key_char( press( KeyCode::Char( 'P' ), KeyModifiers::SHIFT ) ), Some( 'P' ) );
    }


    #[test]
    fn test_ctrl_c_and_esc_quit() {
        assert_eq!( key_char( press( KeyCode::Char( 'c' ), KeyModifiers::CONTROL ) ), Some( 'q' ) );
        assert_eq!( key_char( press( KeyCode::Esc, KeyModifiers::NONE ) ), Some( 'q' ) );
    }


    #[test]
    fn test_other_keys_and_releases_are_ignored() {
        assert_eq!( key_char( press( KeyCode::Enter, KeyModifiers::NONE ) ), None );

        let mut release = press( KeyCode::Char( 'n' ), KeyModifiers::NONE );
        release.kind = KeyEventKind::Release;
        assert_eq!( key_char( release ), None );
    }
}
